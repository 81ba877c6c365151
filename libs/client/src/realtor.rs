use std::path::Path;

use crate::{ClientError, LslClient};
use lsl_proto::constants::uri::{
    API_REALTORS_PROFILE, API_REALTORS_STATS, API_REALTORS_UPLOAD_HEADSHOT,
};
use lsl_proto::v1::{
    HeadshotUploadResponse, ProfileUpdate, ProfileUpdateResponse, Realtor, RealtorStats,
};
use lsl_proto::validation::headshot_content_type;

impl LslClient {
    pub async fn realtor_profile_get(&self) -> Result<Realtor, ClientError> {
        self.perform_get_request(API_REALTORS_PROFILE).await
    }

    pub async fn realtor_profile_update(
        &self,
        update: &ProfileUpdate,
    ) -> Result<ProfileUpdateResponse, ClientError> {
        self.perform_put_request(API_REALTORS_PROFILE, update).await
    }

    /// Upload a headshot image. The extension and size are checked before
    /// anything is read into memory.
    pub async fn realtor_upload_headshot(
        &self,
        path: &Path,
    ) -> Result<HeadshotUploadResponse, ClientError> {
        let meta = tokio::fs::metadata(path).await.map_err(|e| {
            error!(?e, ?path, "Unable to read headshot metadata");
            ClientError::SystemError
        })?;
        let content_type = headshot_content_type(path, meta.len())?;

        let bytes = tokio::fs::read(path).await.map_err(|e| {
            error!(?e, ?path, "Unable to read headshot");
            ClientError::SystemError
        })?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("headshot")
            .to_string();

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(content_type)
            .map_err(ClientError::Transport)?;
        let form = reqwest::multipart::Form::new().part("file", part);

        self.perform_multipart_post_request(API_REALTORS_UPLOAD_HEADSHOT, form)
            .await
    }

    pub async fn realtor_stats(&self) -> Result<RealtorStats, ClientError> {
        self.perform_get_request(API_REALTORS_STATS).await
    }
}
