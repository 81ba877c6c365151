use lsl_client::ClientError;
use time::{Month, OffsetDateTime};

use crate::{CommonOpt, OutputMode, TransactionOpt};

/// Transactions are reported for the month that has just ended, so the
/// default period is the one before `now`.
fn reporting_period(now: OffsetDateTime) -> (u8, i32) {
    let previous = now.month().previous();
    let year = match previous {
        Month::December => now.year() - 1,
        _ => now.year(),
    };
    (u8::from(previous), year)
}

fn default_period() -> (u8, i32) {
    #[allow(clippy::disallowed_methods)]
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    reporting_period(now)
}

impl TransactionOpt {
    pub async fn exec(&self, copt: &CommonOpt) -> Result<(), ClientError> {
        let session = copt.to_authed_session().await?;
        let client = session.client();
        match self {
            TransactionOpt::Submit { count, month, year } => {
                let (last_month, last_year) = default_period();
                let r = client
                    .transaction_submit(
                        *count,
                        month.unwrap_or(last_month),
                        year.unwrap_or(last_year),
                    )
                    .await?;
                let txn = r.transaction;
                copt.output_mode.print_message(&txn);
                if txn.calculated_donation_amount > 0.0 {
                    if let OutputMode::Text = copt.output_mode {
                        println!(
                            "Your donation of ${:.2} for {} can be paid with 'lsl donation pay --transaction {}'",
                            txn.calculated_donation_amount,
                            txn.period_display(),
                            txn.id
                        );
                    }
                }
            }
            TransactionOpt::History => {
                let history = client.transaction_history().await?;
                copt.output_mode.print_list(&history);
            }
            TransactionOpt::CurrentMonth => {
                let current = client.transaction_current_month().await?;
                copt.output_mode.print_message(current);
            }
            TransactionOpt::Pending => {
                let pending = client.transaction_pending().await?;
                if pending.is_empty() {
                    if let OutputMode::Text = copt.output_mode {
                        println!("Every month has been reported");
                        return Ok(());
                    }
                }
                copt.output_mode.print_list(&pending);
            }
        }
        Ok(())
    }
}
