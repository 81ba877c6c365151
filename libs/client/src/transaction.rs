use crate::{ClientError, LslClient};
use lsl_proto::constants::uri::{
    API_TRANSACTIONS_CURRENT_MONTH, API_TRANSACTIONS_HISTORY, API_TRANSACTIONS_PENDING,
    API_TRANSACTIONS_SUBMIT,
};
use lsl_proto::v1::{
    CurrentMonthResponse, PendingPeriod, PendingPeriodsResponse, Transaction,
    TransactionHistoryResponse, TransactionSubmitRequest, TransactionSubmitResponse,
};
use lsl_proto::validation::validate_month;

impl LslClient {
    /// Report the closed transactions for a month. A month that has already
    /// been reported comes back as a 409.
    pub async fn transaction_submit(
        &self,
        closed_transactions_count: u32,
        month: u8,
        year: i32,
    ) -> Result<TransactionSubmitResponse, ClientError> {
        validate_month(month)?;
        let req = TransactionSubmitRequest {
            closed_transactions_count,
            month,
            year,
        };
        self.perform_post_request(API_TRANSACTIONS_SUBMIT, req).await
    }

    pub async fn transaction_history(&self) -> Result<Vec<Transaction>, ClientError> {
        let r: TransactionHistoryResponse =
            self.perform_get_request(API_TRANSACTIONS_HISTORY).await?;
        Ok(r.transactions)
    }

    pub async fn transaction_current_month(&self) -> Result<CurrentMonthResponse, ClientError> {
        self.perform_get_request(API_TRANSACTIONS_CURRENT_MONTH)
            .await
    }

    /// Periods that have not been reported yet.
    pub async fn transaction_pending(&self) -> Result<Vec<PendingPeriod>, ClientError> {
        let r: PendingPeriodsResponse = self.perform_get_request(API_TRANSACTIONS_PENDING).await?;
        Ok(r.pending)
    }
}
