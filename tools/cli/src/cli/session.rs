use dialoguer::theme::ColorfulTheme;
use dialoguer::Input;
use lsl_client::session::read_tokens;
use lsl_client::ClientError;
use lsl_proto::v1::RegisterRequest;

use crate::common::print_success;
use crate::{password_prompt, CommonOpt, LoginOpt, SessionOpt};

fn prompt_required(prompt: &str) -> Result<String, ClientError> {
    Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .interact_text()
        .map_err(|e| {
            error!(?e, "Failed to read input");
            ClientError::SystemError
        })
}

fn prompt_optional(prompt: &str) -> Result<Option<String>, ClientError> {
    let value = Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .map_err(|e| {
            error!(?e, "Failed to read input");
            ClientError::SystemError
        })?;
    let value = value.trim();
    Ok((!value.is_empty()).then(|| value.to_string()))
}

impl LoginOpt {
    pub async fn exec(&self, copt: &CommonOpt) -> Result<(), ClientError> {
        let password = match &self.password {
            Some(p) => p.clone(),
            None => rpassword::prompt_password("Enter password: ").map_err(|e| {
                error!(?e, "Failed to read password");
                ClientError::SystemError
            })?,
        };

        let mut session = copt.to_session()?;
        let user = session.login(&self.email, &password).await?;
        print_success(
            copt.output_mode,
            &format!("Login successful, welcome {}", user.full_name()),
        );
        Ok(())
    }
}

pub async fn logout(copt: &CommonOpt) -> Result<(), ClientError> {
    let mut session = copt.to_session()?;
    match session.hydrate().await {
        Ok(Some(_)) => {
            session.logout().await?;
            print_success(copt.output_mode, "Logged out");
        }
        Ok(None) => {
            println!(
                "No session for instance {}",
                copt.instance.as_deref().unwrap_or("default")
            );
        }
        Err(e) => {
            // The cached tokens were rejected and have already been removed.
            debug!(?e, "cached session was not valid");
            print_success(copt.output_mode, "Logged out");
        }
    }
    Ok(())
}

pub async fn register(copt: &CommonOpt) -> Result<(), ClientError> {
    let email = prompt_required("Email")?;
    let first_name = prompt_required("First name")?;
    let last_name = prompt_required("Last name")?;
    let phone = prompt_optional("Phone (optional)")?
        .map(|p| lsl_proto::validation::format_phone_number(&p));
    let brokerage = prompt_optional("Brokerage (optional)")?;
    let license_number = prompt_optional("License number (optional)")?;
    let donation_amount_per_transaction: f64 =
        Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Donation per closed transaction")
            .interact_text()
            .map_err(|e| {
                error!(?e, "Failed to read input");
                ClientError::SystemError
            })?;
    let bio = prompt_optional("Bio (optional)")?;

    let Some(password) = password_prompt("Enter a password: ") else {
        return Err(lsl_proto::validation::ValidationError::PasswordMismatch.into());
    };

    let req = RegisterRequest {
        email,
        confirm_password: password.clone(),
        password,
        first_name,
        last_name,
        phone,
        brokerage,
        license_number,
        donation_amount_per_transaction,
        bio,
    };

    let mut session = copt.to_session()?;
    let user = session.register(&req).await?;
    info!(email = %user.email, "registered");
    print_success(
        copt.output_mode,
        &format!("Registration successful, welcome {}", user.full_name()),
    );
    Ok(())
}

pub async fn whoami(copt: &CommonOpt) -> Result<(), ClientError> {
    let session = copt.to_authed_session().await?;
    let user = session.require_user()?;
    copt.output_mode.print_message(user);
    Ok(())
}

impl SessionOpt {
    pub async fn exec(&self, copt: &CommonOpt) -> Result<(), ClientError> {
        match self {
            SessionOpt::Refresh => {
                let mut session = copt.to_session()?;
                session.refresh().await?;
                print_success(copt.output_mode, "Session refreshed");
            }
            SessionOpt::Show => {
                let store = read_tokens(&copt.get_token_cache_path())?;
                let mut found = false;
                for name in store.instance_names() {
                    let key = (!name.is_empty()).then(|| name.to_string());
                    let Some(inst) = store.instances(&key) else {
                        continue;
                    };
                    found = true;
                    println!("---");
                    println!("instance: {}", key.as_deref().unwrap_or("default"));
                    println!("access token: {}", inst.access_token.is_some());
                    println!("refresh token: {}", inst.refresh_token.is_some());
                }
                if !found {
                    println!("No cached sessions");
                }
            }
        }
        Ok(())
    }
}
