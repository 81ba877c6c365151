use crate::{ClientError, LslClient};
use lsl_proto::constants::uri::{
    API_AUTH_LOGIN, API_AUTH_LOGOUT, API_AUTH_REFRESH, API_AUTH_REGISTER, API_AUTH_VERIFY,
};
use lsl_proto::v1::{
    AuthResponse, LoginRequest, MessageResponse, RefreshResponse, RegisterRequest, VerifyResponse,
};

impl LslClient {
    /// Log in with an email and password. On success the returned access
    /// token becomes this client's bearer token.
    pub async fn auth_login(&self, email: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let req = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let r: AuthResponse = self.perform_post_request(API_AUTH_LOGIN, req).await?;
        self.set_token(r.access_token.clone()).await;
        Ok(r)
    }

    pub async fn auth_register(&self, req: &RegisterRequest) -> Result<AuthResponse, ClientError> {
        let r: AuthResponse = self.perform_post_request(API_AUTH_REGISTER, req).await?;
        self.set_token(r.access_token.clone()).await;
        Ok(r)
    }

    /// Tell the backend the session is over. The bearer token is dropped from
    /// this client whether or not the backend agreed.
    pub async fn auth_logout(&self) -> Result<MessageResponse, ClientError> {
        let r = self.perform_empty_post_request(API_AUTH_LOGOUT).await;
        self.clear_token().await;
        r
    }

    pub async fn auth_verify(&self) -> Result<VerifyResponse, ClientError> {
        self.perform_get_request(API_AUTH_VERIFY).await
    }

    /// Exchange a refresh token for a new access token, which also replaces
    /// this client's bearer token.
    pub async fn auth_refresh(&self, refresh_token: &str) -> Result<RefreshResponse, ClientError> {
        let r: RefreshResponse = self
            .perform_post_request_with_bearer(API_AUTH_REFRESH, refresh_token)
            .await?;
        self.set_token(r.access_token.clone()).await;
        Ok(r)
    }
}
