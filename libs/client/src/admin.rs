use serde::Serialize;

use crate::{ClientError, LslClient};
use lsl_proto::constants::uri::{
    API_ADMIN_DONATIONS, API_ADMIN_REALTORS, API_ADMIN_REALTORS_PENDING,
    API_ADMIN_SEND_MONTHLY_REMINDERS, API_ADMIN_STATS, API_ADMIN_TRANSACTIONS,
};
use lsl_proto::constants::REALTORS_PER_PAGE;
use lsl_proto::v1::{
    AdminDonationsResponse, AdminStats, AdminTransactionsResponse, ApprovalStatus, DenyRequest,
    Donation, PendingRealtorsResponse, Realtor, RealtorDecisionResponse, RealtorList,
    ReminderResponse, Transaction,
};

#[derive(Debug, Serialize)]
struct RealtorListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<ApprovalStatus>,
    page: u32,
    per_page: u32,
}

impl LslClient {
    pub async fn admin_stats(&self) -> Result<AdminStats, ClientError> {
        self.perform_get_request(API_ADMIN_STATS).await
    }

    pub async fn admin_realtor_list(
        &self,
        status: Option<ApprovalStatus>,
        page: u32,
    ) -> Result<RealtorList, ClientError> {
        let query = RealtorListQuery {
            status,
            page,
            per_page: REALTORS_PER_PAGE,
        };
        self.perform_get_request_query(API_ADMIN_REALTORS, &query)
            .await
    }

    pub async fn admin_realtor_pending(&self) -> Result<Vec<Realtor>, ClientError> {
        let r: PendingRealtorsResponse =
            self.perform_get_request(API_ADMIN_REALTORS_PENDING).await?;
        Ok(r.realtors)
    }

    pub async fn admin_realtor_approve(&self, id: i64) -> Result<Realtor, ClientError> {
        let r: RealtorDecisionResponse = self
            .perform_empty_post_request(&format!("{}/{}/approve", API_ADMIN_REALTORS, id))
            .await?;
        Ok(r.realtor)
    }

    pub async fn admin_realtor_deny(&self, id: i64, reason: &str) -> Result<Realtor, ClientError> {
        let req = DenyRequest {
            reason: reason.to_string(),
        };
        let r: RealtorDecisionResponse = self
            .perform_post_request(&format!("{}/{}/deny", API_ADMIN_REALTORS, id), req)
            .await?;
        Ok(r.realtor)
    }

    pub async fn admin_transactions(&self) -> Result<Vec<Transaction>, ClientError> {
        let r: AdminTransactionsResponse = self.perform_get_request(API_ADMIN_TRANSACTIONS).await?;
        Ok(r.transactions)
    }

    pub async fn admin_donations(&self) -> Result<Vec<Donation>, ClientError> {
        let r: AdminDonationsResponse = self.perform_get_request(API_ADMIN_DONATIONS).await?;
        Ok(r.donations)
    }

    pub async fn admin_send_monthly_reminders(&self) -> Result<ReminderResponse, ClientError> {
        self.perform_empty_post_request(API_ADMIN_SEND_MONTHLY_REMINDERS)
            .await
    }
}
