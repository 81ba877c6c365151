use crate::{ClientError, LslClient};
use lsl_proto::constants::uri::{
    API_DONATIONS_HISTORY, API_DONATIONS_PAYMENT, API_DONATIONS_PENDING,
    API_DONATIONS_SHARE_IMAGE, API_DONATIONS_STATS,
};
use lsl_proto::constants::DEFAULT_PAYMENT_METHOD;
use lsl_proto::v1::{
    Donation, DonationHistoryResponse, DonationStats, PaymentRequest, PaymentResponse,
    PendingDonationsResponse, ShareImageResponse, Transaction,
};
use time::OffsetDateTime;

/// The reference recorded against a payment, unique per millisecond.
pub fn payment_reference(now: OffsetDateTime) -> String {
    format!("Payment-{}", now.unix_timestamp_nanos() / 1_000_000)
}

impl LslClient {
    /// Record payment of a transaction's donation. The payment itself is
    /// taken elsewhere, this only tells the backend it happened.
    pub async fn donation_pay(
        &self,
        transaction_id: i64,
        payment_method: Option<&str>,
    ) -> Result<PaymentResponse, ClientError> {
        let req = PaymentRequest {
            transaction_id,
            payment_method: payment_method.unwrap_or(DEFAULT_PAYMENT_METHOD).to_string(),
            payment_reference: payment_reference(OffsetDateTime::now_utc()),
        };
        self.perform_post_request(API_DONATIONS_PAYMENT, req).await
    }

    pub async fn donation_stats(&self) -> Result<DonationStats, ClientError> {
        self.perform_get_request(API_DONATIONS_STATS).await
    }

    pub async fn donation_history(&self) -> Result<Vec<Donation>, ClientError> {
        let r: DonationHistoryResponse = self.perform_get_request(API_DONATIONS_HISTORY).await?;
        Ok(r.donations)
    }

    /// Transactions whose donation is still owed.
    pub async fn donation_pending(&self) -> Result<Vec<Transaction>, ClientError> {
        let r: PendingDonationsResponse = self.perform_get_request(API_DONATIONS_PENDING).await?;
        Ok(r.pending)
    }

    pub async fn donation_share_image(
        &self,
        donation_id: i64,
    ) -> Result<ShareImageResponse, ClientError> {
        self.perform_get_request(&format!("{}/{}", API_DONATIONS_SHARE_IMAGE, donation_id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::payment_reference;
    use time::macros::datetime;

    #[test]
    fn test_payment_reference_is_unix_millis() {
        let now = datetime!(2024-03-01 12:00:00.123 UTC);
        assert_eq!(payment_reference(now), "Payment-1709294400123");
    }
}
