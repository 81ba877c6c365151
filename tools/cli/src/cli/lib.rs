#![deny(warnings)]
#![warn(unused_extern_crates)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![deny(clippy::unreachable)]
#![deny(clippy::await_holding_lock)]
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::trivially_copy_pass_by_ref)]
// We allow expect since it forces good error messages at the least.
#![allow(clippy::expect_used)]

#[macro_use]
extern crate tracing;

use std::process::ExitCode;

use lsl_client::ClientError;

use crate::common::handle_client_error;

include!("../opt/lsl.rs");

pub mod admin;
pub mod common;
pub mod donation;
pub mod grant;
pub mod history;
pub mod notification;
pub mod profile;
pub mod session;
pub mod transaction;

impl LslClientOpt {
    pub async fn exec(&self, copt: &CommonOpt) -> Result<(), ClientError> {
        match self {
            LslClientOpt::Login(lopt) => lopt.exec(copt).await,
            LslClientOpt::Logout => session::logout(copt).await,
            LslClientOpt::Register => session::register(copt).await,
            LslClientOpt::Whoami => session::whoami(copt).await,
            LslClientOpt::Session { commands } => commands.exec(copt).await,
            LslClientOpt::Profile { commands } => commands.exec(copt).await,
            LslClientOpt::Transaction { commands } => commands.exec(copt).await,
            LslClientOpt::Donation { commands } => commands.exec(copt).await,
            LslClientOpt::Notification { commands } => commands.exec(copt).await,
            LslClientOpt::Grant { commands } => commands.exec(copt).await,
            LslClientOpt::Admin { commands } => commands.exec(copt).await,
            LslClientOpt::History { tab } => history::history(copt, tab).await,
            LslClientOpt::Dashboard => history::dashboard(copt).await,
            LslClientOpt::Version => {
                println!("lsl {}", env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

impl LslClientParser {
    pub fn debug(&self) -> bool {
        self.copt.debug
    }

    pub async fn exec(&self) -> ExitCode {
        match self.commands.exec(&self.copt).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                handle_client_error(&e, self.copt.output_mode);
                ExitCode::FAILURE
            }
        }
    }
}

pub(crate) fn password_prompt(prompt: &str) -> Option<String> {
    for _ in 0..3 {
        let password = rpassword::prompt_password(prompt).ok()?;

        let password_confirm =
            rpassword::prompt_password("Retype the new password to confirm: ").ok()?;

        if password == password_confirm {
            return Some(password);
        } else {
            error!("Passwords do not match");
        }
    }
    None
}
