//! Client library for the Local Supports Local foundation backend.
//!
//! [`LslClient`] wraps a configured `reqwest` client, attaches the current
//! bearer token to every request and exposes one async method per endpoint.
//! The [`session`], [`wizard`] and [`views`] modules build the stateful parts
//! of the tools on top of it.

#![deny(warnings)]
#![warn(unused_extern_crates)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::unreachable)]
#![deny(clippy::await_holding_lock)]
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::trivially_copy_pass_by_ref)]

#[macro_use]
extern crate tracing;

use std::fmt::{Display, Formatter};
use std::fs::File;
#[cfg(target_family = "unix")]
use std::fs::{metadata, Metadata};
use std::io::{ErrorKind, Read};
#[cfg(target_family = "unix")]
use std::os::unix::fs::MetadataExt;
use std::path::Path;
use std::time::Duration;

use lsl_proto::constants::{APPLICATION_JSON, DEFAULT_SERVER_ADDRESS};
use lsl_proto::v1::ErrorResponse;
use lsl_proto::validation::ValidationError;
use reqwest::header::CONTENT_TYPE;
pub use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::error::Error as SerdeJsonError;
use tokio::sync::RwLock;
use url::Url;

mod admin;
mod auth;
mod donation;
mod grant;
mod notification;
mod realtor;
pub mod session;
mod transaction;
pub mod views;
pub mod wizard;

pub use crate::donation::payment_reference;
pub use crate::notification::NotificationQuery;

#[derive(Debug)]
pub enum ClientError {
    /// The backend answered 401, with its error message if it sent one.
    Unauthorized(Option<String>),
    /// Any other non-success status, with the backend's error message and the
    /// path that was requested.
    Http(reqwest::StatusCode, Option<String>, String),
    Transport(reqwest::Error),
    EmptyResponse,
    JsonDecode(reqwest::Error, String),
    JsonEncode(SerdeJsonError),
    SystemError,
    ConfigParseIssue(String),
    CertParseIssue(String),
    Validation(ValidationError),
    TokenStore(String),
}

impl Display for ClientError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Unauthorized(Some(msg)) => write!(f, "Unauthorized: {}", msg),
            ClientError::Unauthorized(None) => write!(f, "Unauthorized"),
            ClientError::Http(status, Some(msg), _) => write!(f, "{} ({})", msg, status),
            ClientError::Http(status, None, dest) => {
                write!(f, "Request to {} failed with {}", dest, status)
            }
            ClientError::Transport(e) => write!(f, "Unable to reach the server: {}", e),
            ClientError::EmptyResponse => write!(f, "The server sent an empty response"),
            ClientError::JsonDecode(e, dest) => {
                write!(f, "Unable to decode the response from {}: {}", dest, e)
            }
            ClientError::JsonEncode(e) => write!(f, "Unable to encode the request: {}", e),
            ClientError::SystemError => write!(f, "System error"),
            ClientError::ConfigParseIssue(e) => write!(f, "Configuration error: {}", e),
            ClientError::CertParseIssue(e) => write!(f, "Certificate error: {}", e),
            ClientError::Validation(e) => write!(f, "{}", e),
            ClientError::TokenStore(e) => write!(f, "Token cache error: {}", e),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<ValidationError> for ClientError {
    fn from(e: ValidationError) -> Self {
        ClientError::Validation(e)
    }
}

impl ClientError {
    /// The message a user should see, preferring what the backend said.
    pub fn message(&self) -> String {
        match self {
            ClientError::Unauthorized(Some(msg)) | ClientError::Http(_, Some(msg), _) => {
                msg.clone()
            }
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct LslClientConfig {
    pub uri: Option<String>,
    pub verify_ca: Option<bool>,
    pub verify_hostnames: Option<bool>,
    pub ca_path: Option<String>,
    pub connect_timeout: Option<u64>,
}

#[derive(Debug, Clone, Default)]
pub struct LslClientBuilder {
    address: Option<String>,
    verify_ca: bool,
    verify_hostnames: bool,
    ca: Option<reqwest::Certificate>,
    connect_timeout: Option<u64>,
}

impl Display for LslClientBuilder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.address {
            Some(value) => writeln!(f, "address: {}", value)?,
            None => writeln!(f, "address: unset")?,
        }
        writeln!(f, "verify_ca: {}", self.verify_ca)?;
        writeln!(f, "verify_hostnames: {}", self.verify_hostnames)?;
        match &self.ca {
            Some(value) => writeln!(f, "ca: {:#?}", value)?,
            None => writeln!(f, "ca: unset")?,
        }
        match self.connect_timeout {
            Some(value) => writeln!(f, "connect_timeout: {}", value),
            None => writeln!(f, "connect_timeout: unset"),
        }
    }
}

#[derive(Debug)]
pub struct LslClient {
    pub(crate) client: reqwest::Client,
    pub(crate) addr: String,
    pub(crate) origin: Url,
    pub(crate) bearer_token: RwLock<Option<String>>,
}

#[cfg(target_family = "unix")]
fn read_file_metadata<P: AsRef<Path>>(path: &P) -> Result<Metadata, ()> {
    metadata(path).map_err(|e| {
        error!(
            "Unable to read metadata for {} - {:?}",
            path.as_ref().to_str().unwrap_or("Alert: invalid path"),
            e
        );
    })
}

impl LslClientBuilder {
    pub fn new() -> Self {
        LslClientBuilder {
            address: None,
            verify_ca: true,
            verify_hostnames: true,
            ca: None,
            connect_timeout: None,
        }
    }

    fn parse_certificate(ca_path: &str) -> Result<reqwest::Certificate, ClientError> {
        let mut buf = Vec::new();
        #[cfg(target_family = "unix")]
        {
            let path = Path::new(ca_path);
            let ca_meta = read_file_metadata(&path).map_err(|e| {
                error!("{:?}", e);
                ClientError::ConfigParseIssue(format!("{:?}", e))
            })?;

            trace!("mode={:o}", ca_meta.mode());
            if (ca_meta.mode() & 0o7133) != 0 {
                warn!("permissions on {} are NOT secure. 0644 is a secure default. Should not be setuid, executable or allow group/other writes.", ca_path);
            }
        }

        let mut f = File::open(ca_path).map_err(|e| {
            error!("{:?}", e);
            ClientError::ConfigParseIssue(format!("{:?}", e))
        })?;
        f.read_to_end(&mut buf).map_err(|e| {
            error!("{:?}", e);
            ClientError::ConfigParseIssue(format!("{:?}", e))
        })?;
        reqwest::Certificate::from_pem(&buf).map_err(|e| {
            error!("{:?}", e);
            ClientError::CertParseIssue(format!("{:?}", e))
        })
    }

    fn apply_config_options(self, lcc: LslClientConfig) -> Result<Self, ClientError> {
        let address = match lcc.uri {
            Some(uri) => Some(uri),
            None => {
                debug!("No URI in config supplied to apply_config_options");
                self.address
            }
        };
        let ca = match lcc.ca_path {
            Some(ca_path) => Some(Self::parse_certificate(ca_path.as_str())?),
            None => self.ca,
        };

        Ok(LslClientBuilder {
            address,
            verify_ca: lcc.verify_ca.unwrap_or(self.verify_ca),
            verify_hostnames: lcc.verify_hostnames.unwrap_or(self.verify_hostnames),
            ca,
            connect_timeout: lcc.connect_timeout.or(self.connect_timeout),
        })
    }

    /// Layer the options from a TOML file over this builder. A missing or
    /// unreadable file leaves the builder unchanged, a malformed one is an
    /// error.
    pub fn read_options_from_optional_config<P: AsRef<Path> + std::fmt::Debug>(
        self,
        config_path: P,
    ) -> Result<Self, ClientError> {
        debug!("Attempting to load configuration from {:#?}", &config_path);

        // Checked up front since opening a missing path under some overlay
        // filesystems reports a misleading error kind.
        if !config_path.as_ref().exists() {
            debug!("{:?} does not exist", config_path);
            return Ok(self);
        };

        let mut f = match File::open(&config_path) {
            Ok(f) => {
                debug!("Successfully opened configuration file {:#?}", &config_path);
                f
            }
            Err(e) => {
                match e.kind() {
                    ErrorKind::NotFound => {
                        debug!(
                            "Configuration file {:#?} not found, skipping.",
                            &config_path
                        );
                    }
                    ErrorKind::PermissionDenied => {
                        warn!(
                            "Permission denied loading configuration file {:#?}, skipping.",
                            &config_path
                        );
                    }
                    _ => {
                        debug!(
                            "Unable to open config file {:#?} [{:?}], skipping ...",
                            &config_path, e
                        );
                    }
                };
                return Ok(self);
            }
        };

        let mut contents = String::new();
        f.read_to_string(&mut contents).map_err(|e| {
            error!("{:?}", e);
            ClientError::ConfigParseIssue(format!("{:?}", e))
        })?;

        let config: LslClientConfig = toml::from_str(contents.as_str()).map_err(|e| {
            error!("{:?}", e);
            ClientError::ConfigParseIssue(format!("{:?}", e))
        })?;

        self.apply_config_options(config)
    }

    pub fn address(self, address: String) -> Self {
        LslClientBuilder {
            address: Some(address),
            ..self
        }
    }

    pub fn danger_accept_invalid_hostnames(self, accept_invalid_hostnames: bool) -> Self {
        LslClientBuilder {
            verify_hostnames: !accept_invalid_hostnames,
            ..self
        }
    }

    pub fn danger_accept_invalid_certs(self, accept_invalid_certs: bool) -> Self {
        LslClientBuilder {
            verify_ca: !accept_invalid_certs,
            ..self
        }
    }

    pub fn connect_timeout(self, secs: u64) -> Self {
        LslClientBuilder {
            connect_timeout: Some(secs),
            ..self
        }
    }

    pub fn add_root_certificate_filepath(self, ca_path: &str) -> Result<Self, ClientError> {
        let ca = Self::parse_certificate(ca_path)?;

        Ok(LslClientBuilder {
            ca: Some(ca),
            ..self
        })
    }

    fn display_warnings(&self, address: &str) {
        if !self.verify_ca {
            warn!("verify_ca set to false in client configuration - this may allow network interception of passwords!");
        }

        if !self.verify_hostnames {
            warn!(
                "verify_hostnames set to false in client configuration - this may allow network interception of passwords!"
            );
        }

        if !address.starts_with("https://") {
            warn!("Address does not start with 'https://' - this may allow network interception of passwords!");
        }
    }

    /// Generates a useragent header based on the package name and version
    pub fn user_agent() -> &'static str {
        static APP_USER_AGENT: &str =
            concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
        APP_USER_AGENT
    }

    /// Build the client ready for usage. Without an address the local
    /// development backend is used.
    pub fn build(self) -> Result<LslClient, ClientError> {
        let address = match &self.address {
            Some(a) => a.trim_end_matches('/').to_string(),
            None => {
                debug!(
                    "No address configured, defaulting to {}",
                    DEFAULT_SERVER_ADDRESS
                );
                DEFAULT_SERVER_ADDRESS.to_string()
            }
        };

        self.display_warnings(address.as_str());

        let uri = Url::parse(&address).map_err(|e| {
            error!(?e, %address, "Unable to parse server address");
            ClientError::ConfigParseIssue(format!("invalid address {}: {}", address, e))
        })?;
        let origin = Url::parse(&uri.origin().ascii_serialization()).map_err(|e| {
            ClientError::ConfigParseIssue(format!("invalid origin for {}: {}", address, e))
        })?;

        let client_builder = reqwest::Client::builder()
            .user_agent(LslClientBuilder::user_agent())
            .danger_accept_invalid_hostnames(!self.verify_hostnames)
            .danger_accept_invalid_certs(!self.verify_ca);

        let client_builder = match &self.ca {
            Some(cert) => client_builder.add_root_certificate(cert.clone()),
            None => client_builder,
        };

        let client_builder = match &self.connect_timeout {
            Some(secs) => client_builder
                .connect_timeout(Duration::from_secs(*secs))
                .timeout(Duration::from_secs(*secs)),
            None => client_builder,
        };

        let client = client_builder.build().map_err(ClientError::Transport)?;

        Ok(LslClient {
            client,
            addr: address,
            origin,
            bearer_token: RwLock::new(None),
        })
    }
}

impl LslClient {
    pub fn get_origin(&self) -> &Url {
        &self.origin
    }

    pub fn get_url(&self) -> &str {
        self.addr.as_str()
    }

    pub async fn set_token(&self, new_token: String) {
        let mut tguard = self.bearer_token.write().await;
        *tguard = Some(new_token);
    }

    pub async fn get_token(&self) -> Option<String> {
        let tguard = self.bearer_token.read().await;
        (*tguard).as_ref().cloned()
    }

    pub async fn clear_token(&self) {
        let mut tguard = self.bearer_token.write().await;
        *tguard = None;
    }

    async fn attach_bearer(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let tguard = self.bearer_token.read().await;
        if let Some(token) = &(*tguard) {
            request.bearer_auth(token)
        } else {
            request
        }
    }

    /// Any 2xx status is a success, the backend answers creations with 201.
    async fn handle_response<T: DeserializeOwned>(
        dest: &str,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        debug!(%dest, %status, "response");

        if status.is_success() {
            if response.content_length() == Some(0) {
                return Err(ClientError::EmptyResponse);
            }
            return response
                .json()
                .await
                .map_err(|e| ClientError::JsonDecode(e, dest.to_string()));
        }

        let message = response
            .json::<ErrorResponse>()
            .await
            .ok()
            .map(|e| e.error);

        match status {
            reqwest::StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized(message)),
            unexpect => Err(ClientError::Http(unexpect, message, dest.to_string())),
        }
    }

    async fn perform_get_request<T: DeserializeOwned>(&self, dest: &str) -> Result<T, ClientError> {
        let url = format!("{}{}", self.get_url(), dest);
        debug!("GET {}", dest);
        let response = self.client.get(url.as_str());
        let response = self.attach_bearer(response).await;
        let response = response.send().await.map_err(ClientError::Transport)?;
        Self::handle_response(dest, response).await
    }

    async fn perform_get_request_query<Q: Serialize, T: DeserializeOwned>(
        &self,
        dest: &str,
        query: &Q,
    ) -> Result<T, ClientError> {
        let url = format!("{}{}", self.get_url(), dest);
        debug!("GET {}", dest);
        let response = self.client.get(url.as_str()).query(query);
        let response = self.attach_bearer(response).await;
        let response = response.send().await.map_err(ClientError::Transport)?;
        Self::handle_response(dest, response).await
    }

    async fn perform_post_request<R: Serialize, T: DeserializeOwned>(
        &self,
        dest: &str,
        request: R,
    ) -> Result<T, ClientError> {
        let url = format!("{}{}", self.get_url(), dest);
        debug!("POST {}", dest);

        let req_string = serde_json::to_string(&request).map_err(ClientError::JsonEncode)?;
        let response = self
            .client
            .post(url.as_str())
            .body(req_string)
            .header(CONTENT_TYPE, APPLICATION_JSON);
        let response = self.attach_bearer(response).await;
        let response = response.send().await.map_err(ClientError::Transport)?;
        Self::handle_response(dest, response).await
    }

    /// Actions with nothing to send post an empty object.
    async fn perform_empty_post_request<T: DeserializeOwned>(
        &self,
        dest: &str,
    ) -> Result<T, ClientError> {
        self.perform_post_request(dest, serde_json::Map::new()).await
    }

    /// A post that authenticates with the given token rather than the
    /// client's current one.
    async fn perform_post_request_with_bearer<T: DeserializeOwned>(
        &self,
        dest: &str,
        token: &str,
    ) -> Result<T, ClientError> {
        let url = format!("{}{}", self.get_url(), dest);
        debug!("POST {}", dest);

        let response = self
            .client
            .post(url.as_str())
            .header(CONTENT_TYPE, APPLICATION_JSON)
            .body("{}")
            .bearer_auth(token)
            .send()
            .await
            .map_err(ClientError::Transport)?;
        Self::handle_response(dest, response).await
    }

    async fn perform_put_request<R: Serialize, T: DeserializeOwned>(
        &self,
        dest: &str,
        request: R,
    ) -> Result<T, ClientError> {
        let url = format!("{}{}", self.get_url(), dest);
        debug!("PUT {}", dest);

        let req_string = serde_json::to_string(&request).map_err(ClientError::JsonEncode)?;
        let response = self
            .client
            .put(url.as_str())
            .header(CONTENT_TYPE, APPLICATION_JSON);
        let response = self.attach_bearer(response).await;
        let response = response
            .body(req_string)
            .send()
            .await
            .map_err(ClientError::Transport)?;
        Self::handle_response(dest, response).await
    }

    async fn perform_multipart_post_request<T: DeserializeOwned>(
        &self,
        dest: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T, ClientError> {
        let url = format!("{}{}", self.get_url(), dest);
        debug!("POST (multipart) {}", dest);

        let response = self.client.post(url.as_str()).multipart(form);
        let response = self.attach_bearer(response).await;
        let response = response.send().await.map_err(ClientError::Transport)?;
        Self::handle_response(dest, response).await
    }
}

#[cfg(test)]
mod tests {
    use super::{ClientError, LslClientBuilder, StatusCode};
    use std::io::Write;

    #[test]
    fn test_builder_defaults_to_local_backend() {
        let client = LslClientBuilder::new()
            .build()
            .expect("failed to build client");
        assert_eq!(client.get_url(), "http://localhost:5000");
        assert_eq!(client.get_origin().as_str(), "http://localhost:5000/");
    }

    #[test]
    fn test_builder_trims_trailing_slash() {
        let client = LslClientBuilder::new()
            .address("https://lsl.example.com/".to_string())
            .build()
            .expect("failed to build client");
        assert_eq!(client.get_url(), "https://lsl.example.com");
    }

    #[test]
    fn test_builder_rejects_garbage_address() {
        let r = LslClientBuilder::new()
            .address("not a url".to_string())
            .build();
        assert!(matches!(r, Err(ClientError::ConfigParseIssue(_))));
    }

    #[test]
    fn test_optional_config_layering() {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let missing = dir.path().join("missing");
        let builder = LslClientBuilder::new()
            .read_options_from_optional_config(&missing)
            .expect("missing config should be skipped");
        assert!(builder.address.is_none());

        let path = dir.path().join("config");
        let mut f = std::fs::File::create(&path).expect("failed to create config");
        writeln!(f, "uri = \"https://lsl.example.com\"\nconnect_timeout = 7")
            .expect("failed to write config");

        let builder = builder
            .read_options_from_optional_config(&path)
            .expect("failed to read config");
        assert_eq!(builder.address.as_deref(), Some("https://lsl.example.com"));
        assert_eq!(builder.connect_timeout, Some(7));
        assert!(builder.verify_ca);
    }

    #[test]
    fn test_bad_config_is_an_error() {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let path = dir.path().join("config");
        std::fs::write(&path, "uri = [").expect("failed to write config");
        let r = LslClientBuilder::new().read_options_from_optional_config(&path);
        assert!(matches!(r, Err(ClientError::ConfigParseIssue(_))));
    }

    #[test]
    fn test_error_message_prefers_backend_text() {
        let e = ClientError::Http(
            StatusCode::CONFLICT,
            Some("Transaction already submitted for this month".to_string()),
            "/api/transactions/submit".to_string(),
        );
        assert_eq!(e.message(), "Transaction already submitted for this month");
        let e = ClientError::Http(StatusCode::BAD_GATEWAY, None, "/api/x".to_string());
        assert_eq!(e.message(), "Request to /api/x failed with 502 Bad Gateway");
    }
}
