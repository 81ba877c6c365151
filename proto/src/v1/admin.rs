use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Donation, Realtor, Transaction};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AdminStats {
    pub pending_realtors: u64,
    pub approved_realtors: u64,
    pub pending_applications: u64,
    pub total_applications: u64,
    pub total_transactions: u64,
    pub total_donations: f64,
}

impl fmt::Display for AdminStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "pending_realtors: {}", self.pending_realtors)?;
        writeln!(f, "approved_realtors: {}", self.approved_realtors)?;
        writeln!(f, "pending_applications: {}", self.pending_applications)?;
        writeln!(f, "total_applications: {}", self.total_applications)?;
        writeln!(f, "total_transactions: {}", self.total_transactions)?;
        writeln!(f, "total_donations: ${:.2}", self.total_donations)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RealtorList {
    pub realtors: Vec<Realtor>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub pages: u32,
    #[serde(default)]
    pub current_page: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PendingRealtorsResponse {
    pub realtors: Vec<Realtor>,
}

/// Returned by both approve and deny.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RealtorDecisionResponse {
    pub message: Option<String>,
    pub realtor: Realtor,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct DenyRequest {
    pub reason: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ReminderResponse {
    pub message: String,
    #[serde(default)]
    pub emails_sent: Option<u64>,
    #[serde(default)]
    pub total_realtors: Option<u64>,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl fmt::Display for ReminderResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.message)?;
        for e in &self.errors {
            writeln!(f, "  failed: {}", e)?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AdminTransactionsResponse {
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AdminDonationsResponse {
    pub donations: Vec<Donation>,
}
