use lsl_client::views::{Dashboard, History, HistoryTab};
use lsl_client::ClientError;

use crate::{CommonOpt, OutputMode};

pub async fn history(copt: &CommonOpt, tab: &str) -> Result<(), ClientError> {
    let tab: HistoryTab = tab.parse().map_err(ClientError::ConfigParseIssue)?;
    let session = copt.to_authed_session().await?;
    let history = History::fetch(&session, tab).await?;

    if let OutputMode::Text = copt.output_mode {
        if history.all_realtors {
            println!("Showing every realtor");
        }
        println!(
            "{} donations totalling ${:.2}, {} reported months",
            history.donations.len(),
            history.total_donated(),
            history.transactions.len()
        );
    }
    match history.tab {
        HistoryTab::Donations => copt.output_mode.print_list(&history.donations),
        HistoryTab::Transactions => copt.output_mode.print_list(&history.transactions),
    }
    Ok(())
}

pub async fn dashboard(copt: &CommonOpt) -> Result<(), ClientError> {
    let session = copt.to_authed_session().await?;
    let dash = Dashboard::fetch(session.client()).await?;

    match copt.output_mode {
        OutputMode::Json => {
            copt.output_mode.print_message(&dash.stats);
            copt.output_mode.print_list(&dash.pending);
            copt.output_mode.print_list(&dash.notifications);
        }
        OutputMode::Text => {
            if let Some(user) = session.user() {
                println!("Welcome back, {}", user.full_name());
            }
            print!("{}", dash.stats);
            if dash.pending.is_empty() {
                println!("No donations are owed");
            } else {
                println!(
                    "You owe ${:.2} for {} months, use 'lsl donation pay' to pay",
                    dash.amount_owed(),
                    dash.pending.len()
                );
                for txn in &dash.pending {
                    println!(
                        "  {}: ${:.2}",
                        txn.period_display(),
                        txn.calculated_donation_amount
                    );
                }
            }
            if !dash.notifications.is_empty() {
                println!("Latest notifications");
                for n in &dash.notifications {
                    println!("{}", n);
                }
            }
        }
    }
    Ok(())
}
