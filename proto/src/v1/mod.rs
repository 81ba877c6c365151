use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::month_name;

mod admin;
mod auth;
mod grant;

pub use self::admin::*;
pub use self::auth::*;
pub use self::grant::*;

/// Where a realtor's registration sits in the admin review queue.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    #[default]
    Pending,
    Approved,
    Denied,
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApprovalStatus::Pending => write!(f, "pending"),
            ApprovalStatus::Approved => write!(f, "approved"),
            ApprovalStatus::Denied => write!(f, "denied"),
        }
    }
}

/// A foundation member, and also the identity of a logged in session.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Realtor {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub brokerage: Option<String>,
    pub license_number: Option<String>,
    pub donation_amount_per_transaction: f64,
    pub headshot_url: Option<String>,
    pub bio: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub is_approved: bool,
    #[serde(default)]
    pub is_admin: bool,
    // Older rows were created before approval existed and carry a null here.
    #[serde(default)]
    pub approval_status: Option<ApprovalStatus>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub approved_at: Option<String>,
}

impl Realtor {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// The review state, treating a missing value the way the backend does.
    pub fn approval(&self) -> ApprovalStatus {
        self.approval_status.unwrap_or_default()
    }
}

impl fmt::Display for Realtor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "---")?;
        writeln!(f, "id: {}", self.id)?;
        writeln!(f, "name: {}", self.full_name())?;
        writeln!(f, "email: {}", self.email)?;
        if let Some(phone) = &self.phone {
            writeln!(f, "phone: {}", phone)?;
        }
        if let Some(brokerage) = &self.brokerage {
            writeln!(f, "brokerage: {}", brokerage)?;
        }
        if let Some(license) = &self.license_number {
            writeln!(f, "license_number: {}", license)?;
        }
        writeln!(
            f,
            "donation_per_transaction: ${:.2}",
            self.donation_amount_per_transaction
        )?;
        writeln!(f, "approval_status: {}", self.approval())?;
        writeln!(f, "is_admin: {}", self.is_admin)?;
        if let Some(created_at) = &self.created_at {
            writeln!(f, "created_at: {}", created_at)?;
        }
        Ok(())
    }
}

/// Fields a realtor may change on their own profile. Anything left as `None`
/// is not sent and stays as it is on the backend.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brokerage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub donation_amount_per_transaction: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self == &ProfileUpdate::default()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProfileUpdateResponse {
    pub message: Option<String>,
    pub realtor: Realtor,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct HeadshotUploadResponse {
    pub message: Option<String>,
    pub headshot_url: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Paid,
    Overdue,
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionStatus::Pending => write!(f, "pending"),
            TransactionStatus::Paid => write!(f, "paid"),
            TransactionStatus::Overdue => write!(f, "overdue"),
        }
    }
}

/// A realtor's report of closed deals for one month.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Transaction {
    pub id: i64,
    pub realtor_id: i64,
    pub month: u8,
    pub year: i32,
    pub closed_transactions_count: u32,
    pub calculated_donation_amount: f64,
    pub status: TransactionStatus,
    pub submitted_at: Option<String>,
    #[serde(default)]
    pub has_donation: bool,
    // Only present on the admin listing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub realtor_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub realtor_email: Option<String>,
}

impl Transaction {
    pub fn period_display(&self) -> String {
        match month_name(self.month) {
            Some(name) => format!("{} {}", name, self.year),
            None => format!("{}/{}", self.month, self.year),
        }
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "---")?;
        writeln!(f, "id: {}", self.id)?;
        if let Some(name) = &self.realtor_name {
            match &self.realtor_email {
                Some(email) => writeln!(f, "realtor: {} <{}>", name, email)?,
                None => writeln!(f, "realtor: {}", name)?,
            }
        }
        writeln!(f, "period: {}", self.period_display())?;
        writeln!(f, "closed_transactions: {}", self.closed_transactions_count)?;
        writeln!(f, "donation: ${:.2}", self.calculated_donation_amount)?;
        writeln!(f, "status: {}", self.status)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TransactionSubmitRequest {
    pub closed_transactions_count: u32,
    pub month: u8,
    pub year: i32,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TransactionSubmitResponse {
    pub message: Option<String>,
    pub transaction: Transaction,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TransactionHistoryResponse {
    pub transactions: Vec<Transaction>,
}

/// The reporting period that is due, which is always the previous month.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CurrentMonthResponse {
    pub month: u8,
    pub year: i32,
    pub submitted: bool,
    pub transaction: Option<Transaction>,
}

impl fmt::Display for CurrentMonthResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let period = match month_name(self.month) {
            Some(name) => format!("{} {}", name, self.year),
            None => format!("{}/{}", self.month, self.year),
        };
        match &self.transaction {
            Some(txn) if self.submitted => write!(
                f,
                "{}: {} closed, ${:.2} donation",
                period, txn.closed_transactions_count, txn.calculated_donation_amount
            ),
            _ => write!(f, "{}: not yet submitted", period),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PendingPeriod {
    pub month: u8,
    pub year: i32,
    pub display: String,
}

impl fmt::Display for PendingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PendingPeriodsResponse {
    pub pending: Vec<PendingPeriod>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Completed,
    Pending,
    Failed,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentStatus::Completed => write!(f, "completed"),
            PaymentStatus::Pending => write!(f, "pending"),
            PaymentStatus::Failed => write!(f, "failed"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Donation {
    pub id: i64,
    pub realtor_id: i64,
    pub transaction_id: i64,
    pub amount: f64,
    pub payment_method: Option<String>,
    pub payment_reference: Option<String>,
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub thank_you_image_generated: bool,
    pub thank_you_image_url: Option<String>,
    #[serde(default)]
    pub social_media_shared: bool,
    pub paid_at: Option<String>,
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction: Option<Transaction>,
}

impl fmt::Display for Donation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "---")?;
        writeln!(f, "id: {}", self.id)?;
        if let Some(txn) = &self.transaction {
            writeln!(f, "period: {}", txn.period_display())?;
        }
        writeln!(f, "amount: ${:.2}", self.amount)?;
        writeln!(
            f,
            "method: {}",
            self.payment_method
                .as_deref()
                .map(|m| m.replace('_', " "))
                .unwrap_or_else(|| "N/A".to_string())
        )?;
        writeln!(f, "status: {}", self.payment_status)?;
        writeln!(
            f,
            "reference: {}",
            self.payment_reference.as_deref().unwrap_or("-")
        )?;
        if let Some(paid_at) = &self.paid_at {
            writeln!(f, "paid_at: {}", paid_at)?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PaymentRequest {
    pub transaction_id: i64,
    pub payment_method: String,
    pub payment_reference: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PaymentResponse {
    pub message: Option<String>,
    pub donation: Donation,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DonationHistoryResponse {
    pub donations: Vec<Donation>,
}

/// Transactions that still have a donation owing.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PendingDonationsResponse {
    pub pending: Vec<Transaction>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ShareImageResponse {
    pub image_url: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MonthlyAmount {
    pub month: u8,
    pub amount: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DonationStats {
    pub total_donations: f64,
    pub ytd_donations: f64,
    pub donation_count: u64,
    #[serde(default)]
    pub monthly_breakdown: Vec<MonthlyAmount>,
}

impl fmt::Display for DonationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "total_donations: ${:.2}", self.total_donations)?;
        writeln!(f, "ytd_donations: ${:.2}", self.ytd_donations)?;
        writeln!(f, "donation_count: {}", self.donation_count)?;
        for m in &self.monthly_breakdown {
            writeln!(
                f,
                "  {}: ${:.2}",
                month_name(m.month).unwrap_or("unknown"),
                m.amount
            )?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RealtorStats {
    pub total_donations: f64,
    pub total_transactions: u64,
    pub ytd_donations: f64,
    pub pending_donations: f64,
    pub donation_per_transaction: f64,
    #[serde(default)]
    pub recent_donations: Vec<Donation>,
}

impl fmt::Display for RealtorStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "total_donations: ${:.2}", self.total_donations)?;
        writeln!(f, "total_transactions: {}", self.total_transactions)?;
        writeln!(f, "ytd_donations: ${:.2}", self.ytd_donations)?;
        writeln!(f, "pending_donations: ${:.2}", self.pending_donations)?;
        writeln!(
            f,
            "donation_per_transaction: ${:.2}",
            self.donation_per_transaction
        )
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Notification {
    pub id: i64,
    pub realtor_id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(alias = "title")]
    pub subject: Option<String>,
    pub message: String,
    pub action_url: Option<String>,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub email_sent: bool,
    pub sent_at: Option<String>,
    pub read_at: Option<String>,
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = if self.is_read { " " } else { "*" };
        writeln!(
            f,
            "{} [{}] {}",
            marker,
            self.id,
            self.subject.as_deref().unwrap_or(self.kind.as_str())
        )?;
        writeln!(f, "    {}", self.message)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NotificationsResponse {
    pub notifications: Vec<Notification>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NotificationReadResponse {
    pub message: Option<String>,
    pub notification: Notification,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UnreadCountResponse {
    pub unread_count: u64,
}

/// The body of most acknowledgements.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

/// The body the backend sends with any non-success status.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}

/// Rendered to stdout by the tools when `--output json` is in use.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CliMessage {
    pub status: String,
    pub message: String,
}

impl fmt::Display for CliMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_realtor_null_approval_is_pending() {
        let r: Realtor = serde_json::from_str(
            r#"{
                "id": 4, "email": "a@b.com", "first_name": "Ann", "last_name": "Lee",
                "phone": null, "brokerage": null, "license_number": null,
                "donation_amount_per_transaction": 25.0, "headshot_url": null, "bio": null,
                "is_active": true, "email_verified": false, "is_approved": false,
                "is_admin": false, "approval_status": null,
                "created_at": null, "updated_at": null, "approved_at": null
            }"#,
        )
        .expect("failed to parse realtor");
        assert_eq!(r.approval(), ApprovalStatus::Pending);
        assert_eq!(r.full_name(), "Ann Lee");
    }

    #[test]
    fn test_profile_update_skips_unset() {
        let update = ProfileUpdate {
            bio: Some("hello".to_string()),
            ..Default::default()
        };
        let v = serde_json::to_value(&update).expect("failed to serialise");
        assert_eq!(v, serde_json::json!({ "bio": "hello" }));
        assert!(ProfileUpdate::default().is_empty());
        assert!(!update.is_empty());
    }

    #[test]
    fn test_notification_title_alias() {
        let n: Notification = serde_json::from_str(
            r#"{"id": 1, "realtor_id": 2, "type": "account_approved",
                "title": "Account Approved", "message": "ok", "action_url": null,
                "is_read": false, "sent_at": null, "read_at": null}"#,
        )
        .expect("failed to parse notification");
        assert_eq!(n.subject.as_deref(), Some("Account Approved"));
        assert!(!n.email_sent);
    }

    #[test]
    fn test_transaction_period_display() {
        let t = Transaction {
            id: 1,
            realtor_id: 1,
            month: 3,
            year: 2024,
            closed_transactions_count: 2,
            calculated_donation_amount: 50.0,
            status: TransactionStatus::Pending,
            submitted_at: None,
            has_donation: false,
            realtor_name: None,
            realtor_email: None,
        };
        assert_eq!(t.period_display(), "March 2024");
    }
}
