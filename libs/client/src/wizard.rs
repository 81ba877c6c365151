//! The grant application form.
//!
//! An application is collected over up to three steps. Choosing who the
//! application is for decides whether the submitter step is visited, and each
//! address is checked with the backend before the form moves past it. The
//! step a [`GrantWizard`] is on is a [`WizardStep`], and the only way into
//! [`WizardStep::Submitted`] is through [`GrantWizard::submit`].

use async_trait::async_trait;
use lsl_proto::v1::{
    AddressValidationRequest, AddressValidationResponse, ApplicationType, GrantApplicationSubmit,
    GrantApplicationSubmitResponse,
};
use lsl_proto::validation::{
    format_phone_number, missing_fields, normalise_state, parse_birthday, validate_email,
    validate_story, validate_zip, ValidationError,
};

use crate::{ClientError, LslClient};

const ADDRESS_REJECTED: &str = "Address validation failed. Please check your address.";

#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("Please fill in all required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),
    #[error(transparent)]
    Validation(ValidationError),
    #[error("Cannot {action} from the {from} step")]
    IllegalTransition {
        from: &'static str,
        action: &'static str,
    },
    #[error("{0}")]
    AddressRejected(String),
    #[error("{0}")]
    Client(ClientError),
}

impl From<ValidationError> for WizardError {
    fn from(e: ValidationError) -> Self {
        match e {
            ValidationError::MissingFields(f) => WizardError::MissingFields(f),
            other => WizardError::Validation(other),
        }
    }
}

impl From<ClientError> for WizardError {
    fn from(e: ClientError) -> Self {
        WizardError::Client(e)
    }
}

/// The backend calls the wizard makes.
#[async_trait]
pub trait GrantBackend {
    async fn validate_address(
        &self,
        req: &AddressValidationRequest,
    ) -> Result<AddressValidationResponse, ClientError>;

    async fn submit_application(
        &self,
        req: &GrantApplicationSubmit,
    ) -> Result<GrantApplicationSubmitResponse, ClientError>;
}

#[async_trait]
impl GrantBackend for LslClient {
    async fn validate_address(
        &self,
        req: &AddressValidationRequest,
    ) -> Result<AddressValidationResponse, ClientError> {
        self.grant_validate_address(req).await
    }

    async fn submit_application(
        &self,
        req: &GrantApplicationSubmit,
    ) -> Result<GrantApplicationSubmitResponse, ClientError> {
        self.grant_submit(req).await
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressFields {
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

impl AddressFields {
    fn is_complete(&self) -> bool {
        missing_fields([
            ("address", self.address.as_str()),
            ("city", self.city.as_str()),
            ("state", self.state.as_str()),
            ("zip", self.zip.as_str()),
        ])
        .is_empty()
    }

    fn to_request(&self) -> Result<AddressValidationRequest, ValidationError> {
        if !self.is_complete() {
            return Err(ValidationError::MissingAddressFields);
        }
        let state = normalise_state(&self.state)?;
        validate_zip(&self.zip)?;
        Ok(AddressValidationRequest {
            address: self.address.trim().to_string(),
            city: self.city.trim().to_string(),
            state,
            zip: self.zip.trim().to_string(),
        })
    }
}

/// An address in the canonical form the backend returned for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedAddress(String);

impl ValidatedAddress {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicantDraft {
    pub first_name: String,
    pub last_name: String,
    pub address: AddressFields,
    pub email: String,
    pub phone: String,
    pub birthday: String,
    pub story: String,
}

impl ApplicantDraft {
    pub fn set_phone(&mut self, raw: &str) {
        self.phone = format_phone_number(raw);
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }

    fn check(&self) -> Result<(), ValidationError> {
        let missing = missing_fields([
            ("first_name", self.first_name.as_str()),
            ("last_name", self.last_name.as_str()),
            ("email", self.email.as_str()),
            ("phone", self.phone.as_str()),
            ("birthday", self.birthday.as_str()),
            ("story", self.story.as_str()),
        ]);
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }
        validate_email(&self.email)?;
        parse_birthday(&self.birthday)?;
        validate_story(&self.story)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitterDraft {
    pub first_name: String,
    pub last_name: String,
    pub address: AddressFields,
    pub email: String,
    pub phone: String,
    pub relationship: String,
}

impl SubmitterDraft {
    pub fn set_phone(&mut self, raw: &str) {
        self.phone = format_phone_number(raw);
    }

    fn check(&self) -> Result<(), ValidationError> {
        let missing = missing_fields([
            ("first_name", self.first_name.as_str()),
            ("last_name", self.last_name.as_str()),
            ("email", self.email.as_str()),
            ("phone", self.phone.as_str()),
            ("relationship", self.relationship.as_str()),
        ]);
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }
        validate_email(&self.email)
    }
}

/// Who the application is for, once that has been settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applying {
    ForSelf,
    ForSomeoneElse { submitter_address: ValidatedAddress },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum WizardStep {
    #[default]
    SelectType,
    SubmitterInfo,
    ApplicantInfo { applying: Applying },
    Submitted {
        application_id: i64,
        applicant_name: String,
    },
}

impl WizardStep {
    pub fn name(&self) -> &'static str {
        match self {
            WizardStep::SelectType => "select-type",
            WizardStep::SubmitterInfo => "submitter-info",
            WizardStep::ApplicantInfo { .. } => "applicant-info",
            WizardStep::Submitted { .. } => "submitted",
        }
    }
}

/// The canonical form of an address together with the input it was
/// checked for.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CheckedAddress {
    input: AddressValidationRequest,
    address: ValidatedAddress,
}

#[derive(Debug, Clone, Default)]
pub struct GrantWizard {
    step: WizardStep,
    applicant: ApplicantDraft,
    submitter: SubmitterDraft,
    applicant_checked: Option<CheckedAddress>,
    submitter_checked: Option<CheckedAddress>,
}

/// Check an address with the backend. The typed fields are left as entered
/// and the canonical address is kept in `checked`. An address that has not
/// changed since it was last accepted is not sent again.
async fn check_address<B: GrantBackend + ?Sized>(
    backend: &B,
    fields: &AddressFields,
    checked: &mut Option<CheckedAddress>,
) -> Result<ValidatedAddress, WizardError> {
    let req = fields.to_request()?;
    if let Some(c) = checked.as_ref().filter(|c| c.input == req) {
        debug!("address unchanged since it was accepted");
        return Ok(c.address.clone());
    }
    *checked = None;
    debug!(city = %req.city, state = %req.state, "validating address");

    let resp = backend
        .validate_address(&req)
        .await
        .map_err(|e| match e {
            ClientError::Http(_, Some(msg), _) => WizardError::AddressRejected(msg),
            other => WizardError::Client(other),
        })?;

    if !resp.success {
        return Err(WizardError::AddressRejected(
            resp.error.unwrap_or_else(|| ADDRESS_REJECTED.to_string()),
        ));
    }

    let address = ValidatedAddress(resp.full_address.unwrap_or_else(|| {
        format!("{}, {}, {} {}", req.address, req.city, req.state, req.zip)
    }));
    *checked = Some(CheckedAddress {
        input: req,
        address: address.clone(),
    });
    Ok(address)
}

fn current<'a>(
    fields: &AddressFields,
    checked: &'a Option<CheckedAddress>,
) -> Option<&'a ValidatedAddress> {
    let req = fields.to_request().ok()?;
    checked
        .as_ref()
        .filter(|c| c.input == req)
        .map(|c| &c.address)
}

impl GrantWizard {
    pub fn new() -> Self {
        GrantWizard::default()
    }

    pub fn step(&self) -> &WizardStep {
        &self.step
    }

    pub fn application_type(&self) -> Option<ApplicationType> {
        match &self.step {
            WizardStep::ApplicantInfo {
                applying: Applying::ForSelf,
            } => Some(ApplicationType::SelfApplicant),
            WizardStep::SubmitterInfo
            | WizardStep::ApplicantInfo {
                applying: Applying::ForSomeoneElse { .. },
            } => Some(ApplicationType::SomeoneElse),
            _ => None,
        }
    }

    fn illegal(&self, action: &'static str) -> WizardError {
        WizardError::IllegalTransition {
            from: self.step.name(),
            action,
        }
    }

    pub fn applicant(&self) -> &ApplicantDraft {
        &self.applicant
    }

    pub fn submitter(&self) -> &SubmitterDraft {
        &self.submitter
    }

    /// The canonical applicant address, while it still matches the fields.
    pub fn applicant_address(&self) -> Option<&ValidatedAddress> {
        current(&self.applicant.address, &self.applicant_checked)
    }

    /// The canonical submitter address, while it still matches the fields.
    pub fn submitter_address(&self) -> Option<&ValidatedAddress> {
        current(&self.submitter.address, &self.submitter_checked)
    }

    /// The applicant's fields may only be edited on the applicant step.
    pub fn applicant_mut(&mut self) -> Result<&mut ApplicantDraft, WizardError> {
        match self.step {
            WizardStep::ApplicantInfo { .. } => Ok(&mut self.applicant),
            _ => Err(self.illegal("edit the applicant")),
        }
    }

    /// The submitter's fields may only be edited on the submitter step.
    pub fn submitter_mut(&mut self) -> Result<&mut SubmitterDraft, WizardError> {
        match self.step {
            WizardStep::SubmitterInfo => Ok(&mut self.submitter),
            _ => Err(self.illegal("edit the submitter")),
        }
    }

    pub fn select_type(&mut self, application_type: ApplicationType) -> Result<(), WizardError> {
        if self.step != WizardStep::SelectType {
            return Err(self.illegal("choose the application type"));
        }
        self.step = match application_type {
            ApplicationType::SelfApplicant => WizardStep::ApplicantInfo {
                applying: Applying::ForSelf,
            },
            ApplicationType::SomeoneElse => WizardStep::SubmitterInfo,
        };
        Ok(())
    }

    /// Leave the submitter step once the submitter's address has been
    /// accepted.
    pub async fn advance<B: GrantBackend + ?Sized>(
        &mut self,
        backend: &B,
    ) -> Result<(), WizardError> {
        if self.step != WizardStep::SubmitterInfo {
            return Err(self.illegal("advance"));
        }
        self.submitter.check()?;
        let submitter_address = check_address(backend, &self.submitter.address, &mut self.submitter_checked).await?;
        self.step = WizardStep::ApplicantInfo {
            applying: Applying::ForSomeoneElse { submitter_address },
        };
        Ok(())
    }

    pub fn back(&mut self) -> Result<(), WizardError> {
        self.step = match &self.step {
            WizardStep::SubmitterInfo => WizardStep::SelectType,
            WizardStep::ApplicantInfo {
                applying: Applying::ForSelf,
            } => WizardStep::SelectType,
            WizardStep::ApplicantInfo {
                applying: Applying::ForSomeoneElse { .. },
            } => WizardStep::SubmitterInfo,
            WizardStep::SelectType | WizardStep::Submitted { .. } => {
                return Err(self.illegal("go back"))
            }
        };
        Ok(())
    }

    /// Check the applicant, validate their address and submit. Whatever
    /// fails, the wizard stays on the applicant step so the form can be
    /// corrected and submitted again. A resubmit with the same address reuses
    /// the canonical form from the first attempt.
    pub async fn submit<B: GrantBackend + ?Sized>(
        &mut self,
        backend: &B,
    ) -> Result<&WizardStep, WizardError> {
        let submitter = match &self.step {
            WizardStep::ApplicantInfo { applying } => match applying {
                Applying::ForSelf => None,
                Applying::ForSomeoneElse { submitter_address } => {
                    Some((self.submitter.clone(), submitter_address.clone()))
                }
            },
            _ => return Err(self.illegal("submit")),
        };

        self.applicant.check()?;
        let applicant_address =
            check_address(backend, &self.applicant.address, &mut self.applicant_checked).await?;

        let application_type = match submitter {
            Some(_) => ApplicationType::SomeoneElse,
            None => ApplicationType::SelfApplicant,
        };
        let a = &self.applicant;
        let (s, s_addr) = match submitter {
            Some((s, addr)) => (Some(s), Some(addr)),
            None => (None, None),
        };

        let payload = GrantApplicationSubmit {
            application_type,
            applicant_first_name: a.first_name.trim().to_string(),
            applicant_last_name: a.last_name.trim().to_string(),
            applicant_address: applicant_address.as_str().to_string(),
            applicant_email: a.email.trim().to_string(),
            applicant_phone: format_phone_number(&a.phone),
            applicant_birthday: a.birthday.trim().to_string(),
            applicant_story: a.story.trim().to_string(),
            submitter_first_name: s.as_ref().map(|s| s.first_name.trim().to_string()),
            submitter_last_name: s.as_ref().map(|s| s.last_name.trim().to_string()),
            submitter_address: s_addr.map(|addr| addr.as_str().to_string()),
            submitter_email: s.as_ref().map(|s| s.email.trim().to_string()),
            submitter_phone: s.as_ref().map(|s| format_phone_number(&s.phone)),
            submitter_relationship: s.as_ref().map(|s| s.relationship.trim().to_string()),
        };

        let r = backend.submit_application(&payload).await?;
        info!(application_id = r.application.id, "grant application submitted");

        self.step = WizardStep::Submitted {
            application_id: r.application.id,
            applicant_name: self.applicant.full_name(),
        };
        Ok(&self.step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lsl_proto::v1::{Applicant, GrantApplication, GrantStatus};
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeBackend {
        reject_address: Mutex<Option<String>>,
        fail_submit: Mutex<bool>,
        validations: Mutex<Vec<AddressValidationRequest>>,
        submissions: Mutex<Vec<GrantApplicationSubmit>>,
    }

    impl FakeBackend {
        fn validations(&self) -> usize {
            self.validations.lock().expect("poisoned").len()
        }

        fn submissions(&self) -> Vec<GrantApplicationSubmit> {
            self.submissions.lock().expect("poisoned").clone()
        }
    }

    #[async_trait]
    impl GrantBackend for FakeBackend {
        async fn validate_address(
            &self,
            req: &AddressValidationRequest,
        ) -> Result<AddressValidationResponse, ClientError> {
            self.validations.lock().expect("poisoned").push(req.clone());
            if let Some(e) = self.reject_address.lock().expect("poisoned").clone() {
                return Ok(AddressValidationResponse {
                    success: false,
                    address: None,
                    city: None,
                    state: None,
                    zip5: None,
                    zip4: None,
                    full_address: None,
                    error: Some(e),
                });
            }
            Ok(AddressValidationResponse {
                success: true,
                address: Some(req.address.to_uppercase()),
                city: Some(req.city.to_uppercase()),
                state: Some(req.state.clone()),
                zip5: Some(req.zip.clone()),
                zip4: Some(String::new()),
                full_address: Some(format!(
                    "{}, {}, {} {}",
                    req.address.to_uppercase(),
                    req.city.to_uppercase(),
                    req.state,
                    req.zip
                )),
                error: None,
            })
        }

        async fn submit_application(
            &self,
            req: &GrantApplicationSubmit,
        ) -> Result<GrantApplicationSubmitResponse, ClientError> {
            self.submissions.lock().expect("poisoned").push(req.clone());
            if *self.fail_submit.lock().expect("poisoned") {
                return Err(ClientError::Http(
                    reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                    Some("database is down".to_string()),
                    "/api/grant-applications/".to_string(),
                ));
            }
            Ok(GrantApplicationSubmitResponse {
                message: Some("Application submitted successfully".to_string()),
                application: GrantApplication {
                    id: 42,
                    application_type: req.application_type,
                    applicant: Applicant {
                        first_name: req.applicant_first_name.clone(),
                        last_name: req.applicant_last_name.clone(),
                        address: req.applicant_address.clone(),
                        email: req.applicant_email.clone(),
                        phone: req.applicant_phone.clone(),
                        birthday: Some(req.applicant_birthday.clone()),
                        story: req.applicant_story.clone(),
                    },
                    submitter: None,
                    status: GrantStatus::Pending,
                    created_at: None,
                    updated_at: None,
                    admin_notes: None,
                    reviewed_by: None,
                    reviewed_at: None,
                },
            })
        }
    }

    fn fill_applicant(a: &mut ApplicantDraft) {
        a.first_name = "Jo".to_string();
        a.last_name = "Ray".to_string();
        a.address = AddressFields {
            address: "1 Main St".to_string(),
            city: "Memphis".to_string(),
            state: "tn".to_string(),
            zip: "38103".to_string(),
        };
        a.email = "jo@example.com".to_string();
        a.set_phone("9015551234");
        a.birthday = "1990-01-31".to_string();
        a.story = "We have rented for ten years and want to stay local.".to_string();
    }

    fn fill_submitter(s: &mut SubmitterDraft) {
        s.first_name = "Sam".to_string();
        s.last_name = "Ray".to_string();
        s.address = AddressFields {
            address: "9 Oak Ave".to_string(),
            city: "Germantown".to_string(),
            state: "TN".to_string(),
            zip: "38138".to_string(),
        };
        s.email = "sam@example.com".to_string();
        s.set_phone("901-555-9876");
        s.relationship = "Brother".to_string();
    }

    #[tokio::test]
    async fn test_self_application_sends_null_submitter() {
        let backend = FakeBackend::default();
        let mut w = GrantWizard::new();

        w.select_type(ApplicationType::SelfApplicant)
            .expect("select failed");
        assert_eq!(w.application_type(), Some(ApplicationType::SelfApplicant));
        assert!(w.submitter_mut().is_err());
        fill_applicant(w.applicant_mut().expect("not on applicant step"));

        let step = w.submit(&backend).await.expect("submit failed").clone();
        assert_eq!(
            step,
            WizardStep::Submitted {
                application_id: 42,
                applicant_name: "Jo Ray".to_string()
            }
        );
        assert_eq!(backend.validations(), 1);

        let sent = backend.submissions();
        assert_eq!(sent.len(), 1);
        let sent = &sent[0];
        assert_eq!(sent.application_type, ApplicationType::SelfApplicant);
        assert_eq!(sent.applicant_address, "1 MAIN ST, MEMPHIS, TN 38103");
        assert_eq!(sent.applicant_phone, "(901) 555-1234");
        assert_eq!(sent.submitter_address, None);
        assert_eq!(sent.submitter_first_name, None);
        assert_eq!(sent.submitter_relationship, None);

        let v = serde_json::to_value(sent).expect("serialise");
        assert!(v["submitter_address"].is_null());
    }

    #[tokio::test]
    async fn test_someone_else_requires_both_addresses() {
        let backend = FakeBackend::default();
        let mut w = GrantWizard::new();
        w.select_type(ApplicationType::SomeoneElse)
            .expect("select failed");
        assert_eq!(w.step(), &WizardStep::SubmitterInfo);

        // Nothing is sent while address fields are empty.
        {
            let s = w.submitter_mut().expect("not on submitter step");
            fill_submitter(s);
            s.address.city.clear();
        }
        let e = w.advance(&backend).await.expect_err("advance should fail");
        assert!(matches!(
            e,
            WizardError::Validation(ValidationError::MissingAddressFields)
        ));
        assert_eq!(e.to_string(), "Please fill in all address fields");
        assert_eq!(backend.validations(), 0);
        assert_eq!(w.step(), &WizardStep::SubmitterInfo);

        // A rejected address keeps us on the same step.
        w.submitter_mut().expect("not on submitter step").address.city = "Germantown".to_string();
        *backend.reject_address.lock().expect("poisoned") = Some("Address not found".to_string());
        let e = w.advance(&backend).await.expect_err("advance should fail");
        assert!(matches!(e, WizardError::AddressRejected(ref m) if m == "Address not found"));
        assert_eq!(backend.validations(), 1);
        assert_eq!(w.step(), &WizardStep::SubmitterInfo);

        *backend.reject_address.lock().expect("poisoned") = None;
        w.advance(&backend).await.expect("advance failed");
        assert_eq!(backend.validations(), 2);
        assert_eq!(w.submitter().address.address, "9 Oak Ave");
        assert_eq!(
            w.submitter_address().map(ValidatedAddress::as_str),
            Some("9 OAK AVE, GERMANTOWN, TN 38138")
        );
        assert!(matches!(
            w.step(),
            WizardStep::ApplicantInfo {
                applying: Applying::ForSomeoneElse { .. }
            }
        ));

        fill_applicant(w.applicant_mut().expect("not on applicant step"));
        w.submit(&backend).await.expect("submit failed");
        assert_eq!(backend.validations(), 3);

        let sent = backend.submissions();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].application_type, ApplicationType::SomeoneElse);
        assert_eq!(
            sent[0].submitter_address.as_deref(),
            Some("9 OAK AVE, GERMANTOWN, TN 38138")
        );
        assert_eq!(sent[0].submitter_phone.as_deref(), Some("(901) 555-9876"));
        assert_eq!(sent[0].submitter_relationship.as_deref(), Some("Brother"));
    }

    #[tokio::test]
    async fn test_long_story_blocks_before_any_request() {
        let backend = FakeBackend::default();
        let mut w = GrantWizard::new();
        w.select_type(ApplicationType::SelfApplicant)
            .expect("select failed");
        {
            let a = w.applicant_mut().expect("not on applicant step");
            fill_applicant(a);
            a.story = vec!["home"; 501].join(" ");
        }
        let e = w.submit(&backend).await.expect_err("submit should fail");
        assert!(matches!(
            e,
            WizardError::Validation(ValidationError::StoryTooLong { words: 501, .. })
        ));
        assert_eq!(backend.validations(), 0);
        assert!(backend.submissions().is_empty());

        w.applicant_mut().expect("not on applicant step").story = vec!["home"; 500].join(" ");
        w.submit(&backend).await.expect("submit failed");
        assert_eq!(backend.submissions().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_submit_stays_on_applicant_step() {
        let backend = FakeBackend::default();
        *backend.fail_submit.lock().expect("poisoned") = true;
        let mut w = GrantWizard::new();
        w.select_type(ApplicationType::SelfApplicant)
            .expect("select failed");
        fill_applicant(w.applicant_mut().expect("not on applicant step"));

        let e = w.submit(&backend).await.expect_err("submit should fail");
        assert_eq!(e.to_string(), "database is down (500 Internal Server Error)");
        assert_eq!(w.step().name(), "applicant-info");
        assert_eq!(backend.submissions().len(), 1);

        *backend.fail_submit.lock().expect("poisoned") = false;
        w.submit(&backend).await.expect("resubmit failed");
        assert_eq!(backend.submissions().len(), 2);
        assert_eq!(w.step().name(), "submitted");
    }

    #[tokio::test]
    async fn test_resubmit_keeps_canonical_address() {
        let backend = FakeBackend::default();
        *backend.fail_submit.lock().expect("poisoned") = true;
        let mut w = GrantWizard::new();
        w.select_type(ApplicationType::SelfApplicant)
            .expect("select failed");
        fill_applicant(w.applicant_mut().expect("not on applicant step"));

        w.submit(&backend).await.expect_err("submit should fail");
        assert_eq!(w.applicant().address.address, "1 Main St");
        assert_eq!(
            w.applicant_address().map(ValidatedAddress::as_str),
            Some("1 MAIN ST, MEMPHIS, TN 38103")
        );

        *backend.fail_submit.lock().expect("poisoned") = false;
        w.submit(&backend).await.expect("resubmit failed");

        let sent = backend.submissions();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].applicant_address, "1 MAIN ST, MEMPHIS, TN 38103");
        assert_eq!(sent[1].applicant_address, "1 MAIN ST, MEMPHIS, TN 38103");
        assert_eq!(backend.validations(), 1);
    }

    #[tokio::test]
    async fn test_edited_address_is_checked_again() {
        let backend = FakeBackend::default();
        *backend.fail_submit.lock().expect("poisoned") = true;
        let mut w = GrantWizard::new();
        w.select_type(ApplicationType::SelfApplicant)
            .expect("select failed");
        fill_applicant(w.applicant_mut().expect("not on applicant step"));
        w.submit(&backend).await.expect_err("submit should fail");

        w.applicant_mut().expect("not on applicant step").address.address =
            "2 Main St".to_string();
        assert_eq!(w.applicant_address(), None);

        *backend.fail_submit.lock().expect("poisoned") = false;
        w.submit(&backend).await.expect("resubmit failed");
        assert_eq!(backend.validations(), 2);
        let validations = backend.validations.lock().expect("poisoned").clone();
        assert_eq!(validations[1].address, "2 Main St");
        assert_eq!(
            backend.submissions()[1].applicant_address,
            "2 MAIN ST, MEMPHIS, TN 38103"
        );
    }

    #[tokio::test]
    async fn test_navigation() {
        let backend = FakeBackend::default();
        let mut w = GrantWizard::new();

        assert!(matches!(
            w.back(),
            Err(WizardError::IllegalTransition {
                from: "select-type",
                ..
            })
        ));
        assert!(w.advance(&backend).await.is_err());
        assert!(w.submit(&backend).await.is_err());
        assert!(w.applicant_mut().is_err());

        w.select_type(ApplicationType::SelfApplicant)
            .expect("select failed");
        assert!(w.select_type(ApplicationType::SomeoneElse).is_err());
        assert!(w.advance(&backend).await.is_err());
        w.back().expect("back failed");
        assert_eq!(w.step(), &WizardStep::SelectType);

        w.select_type(ApplicationType::SomeoneElse)
            .expect("select failed");
        fill_submitter(w.submitter_mut().expect("not on submitter step"));
        w.advance(&backend).await.expect("advance failed");
        w.back().expect("back failed");
        assert_eq!(w.step(), &WizardStep::SubmitterInfo);
        // Fields survive going back.
        assert_eq!(w.submitter().relationship, "Brother");
        assert_eq!(w.submitter().address.address, "9 Oak Ave");

        // Advancing again with the same address does not re-check it.
        w.advance(&backend).await.expect("advance failed");
        assert_eq!(backend.validations(), 1);
        assert_eq!(
            w.submitter_address().map(ValidatedAddress::as_str),
            Some("9 OAK AVE, GERMANTOWN, TN 38138")
        );
        w.back().expect("back failed");
        w.back().expect("back failed");
        assert_eq!(w.step(), &WizardStep::SelectType);
        assert_eq!(backend.validations(), 1);
    }
}
