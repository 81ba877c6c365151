use lsl_client::views::{RealtorFilter, RealtorListView};
use lsl_client::ClientError;

use crate::common::confirm;
use crate::{AdminOpt, CommonOpt, OutputMode};

impl AdminOpt {
    pub async fn exec(&self, copt: &CommonOpt) -> Result<(), ClientError> {
        let session = copt.to_admin_session().await?;
        let client = session.client();
        match self {
            AdminOpt::Stats => {
                let stats = client.admin_stats().await?;
                copt.output_mode.print_message(stats);
            }
            AdminOpt::Realtors { filter, page } => {
                let filter: RealtorFilter = filter.parse().map_err(|e: String| {
                    ClientError::ConfigParseIssue(e)
                })?;
                let mut view = RealtorListView::new(filter, *page);
                view.refresh(client).await?;
                if let OutputMode::Text = copt.output_mode {
                    println!("{}", view.counts());
                }
                copt.output_mode.print_list(&view.visible());
                if let OutputMode::Text = copt.output_mode {
                    println!(
                        "page {} of {} ({} realtors)",
                        view.page(),
                        view.pages(),
                        view.total()
                    );
                }
            }
            AdminOpt::Pending => {
                let pending = client.admin_realtor_pending().await?;
                copt.output_mode.print_list(&pending);
            }
            AdminOpt::Approve { id, confirm: c } => {
                if !confirm(&format!("Approve realtor {}?", id), c.yes) {
                    println!("No changes were made");
                    return Ok(());
                }
                let realtor = client.admin_realtor_approve(*id).await?;
                copt.output_mode.print_message(realtor);
            }
            AdminOpt::Deny {
                id,
                reason,
                confirm: c,
            } => {
                if !confirm(&format!("Deny realtor {}?", id), c.yes) {
                    println!("No changes were made");
                    return Ok(());
                }
                let realtor = client
                    .admin_realtor_deny(*id, reason.as_deref().unwrap_or_default())
                    .await?;
                copt.output_mode.print_message(realtor);
            }
            AdminOpt::Transactions => {
                let transactions = client.admin_transactions().await?;
                copt.output_mode.print_list(&transactions);
            }
            AdminOpt::Donations => {
                let donations = client.admin_donations().await?;
                copt.output_mode.print_list(&donations);
            }
            AdminOpt::SendReminders { confirm: c } => {
                if !confirm("Email a reminder to every approved realtor?", c.yes) {
                    println!("No reminders were sent");
                    return Ok(());
                }
                let r = client.admin_send_monthly_reminders().await?;
                for e in &r.errors {
                    warn!("{}", e);
                }
                copt.output_mode.print_message(r);
            }
        }
        Ok(())
    }
}
