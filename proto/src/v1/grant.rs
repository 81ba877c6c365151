use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Who a grant application is for.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationType {
    /// The homebuyer is applying for themself.
    #[serde(rename = "self")]
    SelfApplicant,
    /// A third party is applying on the homebuyer's behalf.
    SomeoneElse,
}

impl fmt::Display for ApplicationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplicationType::SelfApplicant => write!(f, "self"),
            ApplicationType::SomeoneElse => write!(f, "someone_else"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GrantStatus {
    Pending,
    UnderReview,
    Approved,
    Denied,
}

impl GrantStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GrantStatus::Pending => "pending",
            GrantStatus::UnderReview => "under_review",
            GrantStatus::Approved => "approved",
            GrantStatus::Denied => "denied",
        }
    }
}

impl fmt::Display for GrantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for GrantStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "pending" => Ok(GrantStatus::Pending),
            "under_review" => Ok(GrantStatus::UnderReview),
            "approved" => Ok(GrantStatus::Approved),
            "denied" => Ok(GrantStatus::Denied),
            _ => Err(format!(
                "invalid status '{}', expected one of pending, under_review, approved, denied",
                s
            )),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Applicant {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub email: String,
    pub phone: String,
    pub birthday: Option<String>,
    pub story: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Submitter {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub email: String,
    pub phone: String,
    pub relationship: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct GrantApplication {
    pub id: i64,
    pub application_type: ApplicationType,
    pub applicant: Applicant,
    pub submitter: Option<Submitter>,
    pub status: GrantStatus,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub admin_notes: Option<String>,
    pub reviewed_by: Option<i64>,
    pub reviewed_at: Option<String>,
}

impl fmt::Display for GrantApplication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "---")?;
        writeln!(f, "id: {}", self.id)?;
        writeln!(f, "status: {}", self.status)?;
        writeln!(f, "type: {}", self.application_type)?;
        writeln!(
            f,
            "applicant: {} {}",
            self.applicant.first_name, self.applicant.last_name
        )?;
        writeln!(f, "  email: {}", self.applicant.email)?;
        writeln!(f, "  phone: {}", self.applicant.phone)?;
        writeln!(f, "  address: {}", self.applicant.address)?;
        if let Some(birthday) = &self.applicant.birthday {
            writeln!(f, "  birthday: {}", birthday)?;
        }
        writeln!(f, "  story: {}", self.applicant.story)?;
        if let Some(s) = &self.submitter {
            writeln!(f, "submitter: {} {}", s.first_name, s.last_name)?;
            writeln!(f, "  relationship: {}", s.relationship)?;
            writeln!(f, "  email: {}", s.email)?;
            writeln!(f, "  phone: {}", s.phone)?;
            writeln!(f, "  address: {}", s.address)?;
        }
        if let Some(created_at) = &self.created_at {
            writeln!(f, "created_at: {}", created_at)?;
        }
        if let Some(notes) = &self.admin_notes {
            writeln!(f, "admin_notes: {}", notes)?;
        }
        if let Some(reviewed_at) = &self.reviewed_at {
            writeln!(f, "reviewed_at: {}", reviewed_at)?;
        }
        Ok(())
    }
}

/// The flat body the backend expects when an application is created. The
/// submitter fields are always present and are `null` for a self application.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct GrantApplicationSubmit {
    pub application_type: ApplicationType,
    pub applicant_first_name: String,
    pub applicant_last_name: String,
    pub applicant_address: String,
    pub applicant_email: String,
    pub applicant_phone: String,
    pub applicant_birthday: String,
    pub applicant_story: String,
    pub submitter_first_name: Option<String>,
    pub submitter_last_name: Option<String>,
    pub submitter_address: Option<String>,
    pub submitter_email: Option<String>,
    pub submitter_phone: Option<String>,
    pub submitter_relationship: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GrantApplicationSubmitResponse {
    pub message: Option<String>,
    pub application: GrantApplication,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GrantApplicationList {
    pub applications: Vec<GrantApplication>,
    pub total: u64,
    pub pages: u32,
    pub current_page: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct GrantStatusUpdate {
    pub status: GrantStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GrantStatusUpdateResponse {
    pub message: Option<String>,
    pub application: GrantApplication,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AddressValidationRequest {
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

/// The backend's answer for an address. When `success` is false the other
/// fields are absent and `error` carries the reason.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AddressValidationResponse {
    pub success: bool,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip5: Option<String>,
    #[serde(default)]
    pub zip4: Option<String>,
    #[serde(default)]
    pub full_address: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}
