use serde::Serialize;

use crate::{ClientError, LslClient};
use lsl_proto::constants::uri::{API_GRANT_APPLICATIONS, API_GRANT_APPLICATIONS_VALIDATE_ADDRESS};
use lsl_proto::constants::GRANT_APPLICATIONS_PER_PAGE;
use lsl_proto::v1::{
    AddressValidationRequest, AddressValidationResponse, GrantApplication, GrantApplicationList,
    GrantApplicationSubmit, GrantApplicationSubmitResponse, GrantStatus, GrantStatusUpdate,
    GrantStatusUpdateResponse,
};

#[derive(Debug, Serialize)]
struct GrantListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<GrantStatus>,
    page: u32,
    per_page: u32,
}

impl LslClient {
    pub async fn grant_validate_address(
        &self,
        req: &AddressValidationRequest,
    ) -> Result<AddressValidationResponse, ClientError> {
        self.perform_post_request(API_GRANT_APPLICATIONS_VALIDATE_ADDRESS, req)
            .await
    }

    pub async fn grant_submit(
        &self,
        req: &GrantApplicationSubmit,
    ) -> Result<GrantApplicationSubmitResponse, ClientError> {
        self.perform_post_request(API_GRANT_APPLICATIONS, req).await
    }

    /// One page of applications, newest first. `None` lists every status.
    pub async fn grant_list(
        &self,
        status: Option<GrantStatus>,
        page: u32,
    ) -> Result<GrantApplicationList, ClientError> {
        let query = GrantListQuery {
            status,
            page,
            per_page: GRANT_APPLICATIONS_PER_PAGE,
        };
        self.perform_get_request_query(API_GRANT_APPLICATIONS, &query)
            .await
    }

    pub async fn grant_get(&self, id: i64) -> Result<GrantApplication, ClientError> {
        self.perform_get_request(&format!("{}{}", API_GRANT_APPLICATIONS, id))
            .await
    }

    pub async fn grant_set_status(
        &self,
        id: i64,
        status: GrantStatus,
        admin_notes: Option<String>,
    ) -> Result<GrantApplication, ClientError> {
        let req = GrantStatusUpdate {
            status,
            admin_notes,
        };
        let r: GrantStatusUpdateResponse = self
            .perform_put_request(&format!("{}{}/status", API_GRANT_APPLICATIONS, id), req)
            .await?;
        Ok(r.application)
    }
}
