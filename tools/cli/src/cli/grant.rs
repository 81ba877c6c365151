use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};
use lsl_client::session::Session;
use lsl_client::views::GrantApplicationListView;
use lsl_client::wizard::{AddressFields, GrantWizard, WizardError, WizardStep};
use lsl_client::ClientError;
use lsl_proto::constants::STORY_MAX_WORDS;
use lsl_proto::v1::ApplicationType;
use lsl_proto::validation::word_count;

use crate::common::{confirm, print_success};
use crate::{CommonOpt, GrantOpt, OutputMode};

fn input_error(e: dialoguer::Error) -> ClientError {
    error!(?e, "Failed to read input");
    ClientError::SystemError
}

/// Prompt for a field, starting from what was entered last time round.
fn edit(prompt: &str, current: &str) -> Result<String, ClientError> {
    Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .with_initial_text(current)
        .allow_empty(true)
        .interact_text()
        .map_err(input_error)
}

fn edit_address(label: &str, fields: &mut AddressFields) -> Result<(), ClientError> {
    fields.address = edit(&format!("{} street address", label), &fields.address)?;
    fields.city = edit(&format!("{} city", label), &fields.city)?;
    fields.state = edit(&format!("{} state", label), &fields.state)?;
    fields.zip = edit(&format!("{} zip", label), &fields.zip)?;
    Ok(())
}

fn edit_submitter(wizard: &mut GrantWizard) -> Result<(), ClientError> {
    let s = wizard.submitter_mut().map_err(|e| {
        error!("{}", e);
        ClientError::SystemError
    })?;
    println!("About you");
    s.first_name = edit("Your first name", &s.first_name)?;
    s.last_name = edit("Your last name", &s.last_name)?;
    s.email = edit("Your email", &s.email)?;
    let phone = edit("Your phone", &s.phone)?;
    s.set_phone(&phone);
    s.relationship = edit("Relationship to the applicant", &s.relationship)?;
    edit_address("Your", &mut s.address)
}

fn edit_applicant(wizard: &mut GrantWizard, for_self: bool) -> Result<(), ClientError> {
    let whose = if for_self { "Your" } else { "Applicant's" };
    let a = wizard.applicant_mut().map_err(|e| {
        error!("{}", e);
        ClientError::SystemError
    })?;
    println!("About the applicant");
    a.first_name = edit(&format!("{} first name", whose), &a.first_name)?;
    a.last_name = edit(&format!("{} last name", whose), &a.last_name)?;
    a.email = edit(&format!("{} email", whose), &a.email)?;
    let phone = edit(&format!("{} phone", whose), &a.phone)?;
    a.set_phone(&phone);
    a.birthday = edit(&format!("{} birthday (YYYY-MM-DD)", whose), &a.birthday)?;
    edit_address(whose, &mut a.address)?;
    a.story = edit("Tell us your story", &a.story)?;
    println!("{} / {} words", word_count(&a.story), STORY_MAX_WORDS);
    Ok(())
}

enum Retry {
    Again,
    Back,
    Cancel,
}

fn after_failure(e: &WizardError) -> Result<Retry, ClientError> {
    error!("{}", e);
    let choice = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("What would you like to do?")
        .items(&["Edit and try again", "Go back", "Cancel"])
        .default(0)
        .interact_opt()
        .map_err(input_error)?;
    Ok(match choice {
        Some(0) => Retry::Again,
        Some(1) => Retry::Back,
        _ => Retry::Cancel,
    })
}

fn go_back(wizard: &mut GrantWizard) -> Result<(), ClientError> {
    wizard.back().map_err(|e| {
        error!("{}", e);
        ClientError::SystemError
    })
}

/// Walk through the application form until it is submitted or cancelled.
pub async fn apply(copt: &CommonOpt) -> Result<(), ClientError> {
    let client = copt.to_unauth_client()?;
    let mut wizard = GrantWizard::new();

    loop {
        debug!(step = wizard.step().name());
        match wizard.step().clone() {
            WizardStep::SelectType => {
                let choice = Select::with_theme(&ColorfulTheme::default())
                    .with_prompt("Who is this application for?")
                    .items(&["Myself", "Someone else"])
                    .default(0)
                    .interact_opt()
                    .map_err(input_error)?;
                let application_type = match choice {
                    Some(0) => ApplicationType::SelfApplicant,
                    Some(_) => ApplicationType::SomeoneElse,
                    None => {
                        println!("Cancelled");
                        return Ok(());
                    }
                };
                if let Err(e) = wizard.select_type(application_type) {
                    error!("{}", e);
                    return Err(ClientError::SystemError);
                }
            }
            WizardStep::SubmitterInfo => {
                edit_submitter(&mut wizard)?;
                match wizard.advance(&client).await {
                    Ok(()) => {
                        if let Some(addr) = wizard.submitter_address() {
                            println!("Address confirmed: {}", addr.as_str());
                        }
                    }
                    Err(e) => match after_failure(&e)? {
                        Retry::Again => {}
                        Retry::Back => go_back(&mut wizard)?,
                        Retry::Cancel => return Ok(()),
                    },
                }
            }
            WizardStep::ApplicantInfo { .. } => {
                let for_self = wizard.application_type() == Some(ApplicationType::SelfApplicant);
                edit_applicant(&mut wizard, for_self)?;
                if let Err(e) = wizard.submit(&client).await {
                    match after_failure(&e)? {
                        Retry::Again => {}
                        Retry::Back => go_back(&mut wizard)?,
                        Retry::Cancel => return Ok(()),
                    }
                }
            }
            WizardStep::Submitted {
                application_id,
                applicant_name,
            } => {
                print_success(
                    copt.output_mode,
                    &format!(
                        "Application {} for {} has been submitted. We will be in touch by email.",
                        application_id, applicant_name
                    ),
                );
                return Ok(());
            }
        }
    }
}

impl GrantOpt {
    /// Any logged in realtor may browse applications, only admins change them.
    pub fn admin_only(&self) -> bool {
        matches!(self, GrantOpt::SetStatus { .. })
    }

    async fn session(&self, copt: &CommonOpt) -> Result<Session, ClientError> {
        if self.admin_only() {
            copt.to_admin_session().await
        } else {
            copt.to_authed_session().await
        }
    }

    pub async fn exec(&self, copt: &CommonOpt) -> Result<(), ClientError> {
        match self {
            GrantOpt::Apply => apply(copt).await,
            GrantOpt::List { status, page } => {
                let session = self.session(copt).await?;
                let mut view = GrantApplicationListView::new(*status, *page);
                view.refresh(session.client()).await?;
                copt.output_mode.print_list(view.applications());
                if let OutputMode::Text = copt.output_mode {
                    println!(
                        "page {} of {} ({} applications)",
                        view.page(),
                        view.pages(),
                        view.total()
                    );
                }
                Ok(())
            }
            GrantOpt::Get { id } => {
                let session = self.session(copt).await?;
                let app = session.client().grant_get(*id).await?;
                copt.output_mode.print_message(app);
                Ok(())
            }
            GrantOpt::SetStatus {
                id,
                status,
                notes,
                confirm: c,
            } => {
                let session = self.session(copt).await?;
                if !confirm(
                    &format!("Set application {} to {}?", id, status),
                    c.yes,
                ) {
                    println!("No changes were made");
                    return Ok(());
                }
                let app = session
                    .client()
                    .grant_set_status(*id, *status, notes.clone())
                    .await?;
                copt.output_mode.print_message(app);
                Ok(())
            }
        }
    }
}
