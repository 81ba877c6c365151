use dialoguer::theme::ColorfulTheme;
use dialoguer::Confirm;
use lsl_client::session::Session;
use lsl_client::{ClientError, LslClient, LslClientBuilder};
use lsl_proto::constants::{DEFAULT_CLIENT_CONFIG_PATH, DEFAULT_CLIENT_CONFIG_PATH_HOME};
use lsl_proto::v1::CliMessage;

use crate::{CommonOpt, OutputMode};

impl CommonOpt {
    pub fn to_unauth_client(&self) -> Result<LslClient, ClientError> {
        let config_path: String = shellexpand::tilde(DEFAULT_CLIENT_CONFIG_PATH_HOME).into_owned();

        let client_builder = LslClientBuilder::new()
            .read_options_from_optional_config(DEFAULT_CLIENT_CONFIG_PATH)
            .map_err(|e| {
                error!(
                    "Failed to parse config ({:?}) -- {:?}",
                    DEFAULT_CLIENT_CONFIG_PATH, e
                );
                e
            })
            .and_then(|cb| {
                cb.read_options_from_optional_config(&config_path)
                    .map_err(|e| {
                        error!("Failed to parse config ({:?}) -- {:?}", config_path, e);
                        e
                    })
            })?;
        debug!(
            "Successfully loaded configuration, looked in {} and {} - client builder state: {}",
            DEFAULT_CLIENT_CONFIG_PATH, DEFAULT_CLIENT_CONFIG_PATH_HOME, &client_builder
        );

        let client_builder = match &self.addr {
            Some(a) => client_builder.address(a.to_string()),
            None => client_builder,
        };

        let client_builder = match self.ca_path.as_ref().and_then(|p| p.to_str()) {
            Some(p) => {
                debug!("Adding trusted CA cert {:?}", p);
                client_builder.add_root_certificate_filepath(p)?
            }
            None => client_builder,
        };

        let client_builder = match self.skip_hostname_verification {
            true => {
                warn!(
                    "Accepting invalid hostnames on the certificate for {:?}",
                    &self.addr
                );
                client_builder.danger_accept_invalid_hostnames(true)
            }
            false => client_builder,
        };

        let client_builder = match self.accept_invalid_certs {
            true => {
                warn!("Accepting invalid certificates for {:?}", &self.addr);
                client_builder.danger_accept_invalid_certs(true)
            }
            false => client_builder,
        };

        client_builder.build()
    }

    /// A session that has not been checked against the backend.
    pub fn to_session(&self) -> Result<Session, ClientError> {
        let client = self.to_unauth_client()?;
        Ok(Session::new(
            client,
            self.instance.clone(),
            self.get_token_cache_path(),
        ))
    }

    /// A session restored from the token cache. Fails when nobody is logged
    /// in or the cached token is no longer accepted.
    pub async fn to_authed_session(&self) -> Result<Session, ClientError> {
        let mut session = self.to_session()?;
        if session.hydrate().await?.is_none() {
            return Err(ClientError::Unauthorized(Some(
                "You are not logged in".to_string(),
            )));
        }
        Ok(session)
    }

    pub async fn to_admin_session(&self) -> Result<Session, ClientError> {
        let session = self.to_authed_session().await?;
        session.require_admin()?;
        Ok(session)
    }
}

pub fn handle_client_error(e: &ClientError, output_mode: OutputMode) {
    debug!(?e, "command failed");
    let message = e.message();
    match output_mode {
        OutputMode::Json => {
            output_mode.print_message(CliMessage {
                status: "error".to_string(),
                message,
            });
        }
        OutputMode::Text => {
            error!("{}", message);
        }
    }
    if let ClientError::Unauthorized(_) = e {
        eprintln!("Use 'lsl login' to log in again.");
    }
}

pub fn print_success(output_mode: OutputMode, message: &str) {
    output_mode.print_message(CliMessage {
        status: "success".to_string(),
        message: message.to_string(),
    });
}

/// Ask before doing something that cannot be taken back. Skipped with `--yes`.
pub fn confirm(prompt: &str, yes: bool) -> bool {
    if yes {
        return true;
    }
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()
        .unwrap_or(false)
}
