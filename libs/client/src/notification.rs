use serde::Serialize;

use crate::{ClientError, LslClient};
use lsl_proto::constants::uri::{
    API_NOTIFICATIONS, API_NOTIFICATIONS_MARK_ALL_READ, API_NOTIFICATIONS_UNREAD_COUNT,
};
use lsl_proto::constants::DEFAULT_NOTIFICATION_LIMIT;
use lsl_proto::v1::{
    MessageResponse, Notification, NotificationReadResponse, NotificationsResponse,
    UnreadCountResponse,
};

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct NotificationQuery {
    pub unread_only: bool,
    pub limit: u32,
}

impl Default for NotificationQuery {
    fn default() -> Self {
        NotificationQuery {
            unread_only: false,
            limit: DEFAULT_NOTIFICATION_LIMIT,
        }
    }
}

impl LslClient {
    pub async fn notification_list(
        &self,
        query: NotificationQuery,
    ) -> Result<Vec<Notification>, ClientError> {
        let r: NotificationsResponse = self
            .perform_get_request_query(API_NOTIFICATIONS, &query)
            .await?;
        Ok(r.notifications)
    }

    pub async fn notification_mark_read(&self, id: i64) -> Result<Notification, ClientError> {
        let r: NotificationReadResponse = self
            .perform_empty_post_request(&format!("{}/{}/read", API_NOTIFICATIONS, id))
            .await?;
        Ok(r.notification)
    }

    pub async fn notification_unread_count(&self) -> Result<u64, ClientError> {
        let r: UnreadCountResponse = self
            .perform_get_request(API_NOTIFICATIONS_UNREAD_COUNT)
            .await?;
        Ok(r.unread_count)
    }

    pub async fn notification_mark_all_read(&self) -> Result<MessageResponse, ClientError> {
        self.perform_empty_post_request(API_NOTIFICATIONS_MARK_ALL_READ)
            .await
    }
}
