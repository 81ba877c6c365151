use lsl_client::ClientError;

use crate::common::print_success;
use crate::{CommonOpt, DonationOpt, OutputMode};

impl DonationOpt {
    pub async fn exec(&self, copt: &CommonOpt) -> Result<(), ClientError> {
        let session = copt.to_authed_session().await?;
        let client = session.client();
        match self {
            DonationOpt::Pay {
                transaction,
                method,
            } => {
                let transaction_id = match transaction {
                    Some(id) => *id,
                    None => {
                        let pending = client.donation_pending().await?;
                        match pending.first() {
                            Some(txn) => {
                                info!(
                                    "Paying ${:.2} for {}",
                                    txn.calculated_donation_amount,
                                    txn.period_display()
                                );
                                txn.id
                            }
                            None => {
                                print_success(copt.output_mode, "No donations are owed");
                                return Ok(());
                            }
                        }
                    }
                };
                let r = client
                    .donation_pay(transaction_id, method.as_deref())
                    .await?;
                copt.output_mode.print_message(r.donation);
            }
            DonationOpt::Stats => {
                let stats = client.donation_stats().await?;
                copt.output_mode.print_message(stats);
            }
            DonationOpt::History => {
                let history = client.donation_history().await?;
                copt.output_mode.print_list(&history);
            }
            DonationOpt::Pending => {
                let pending = client.donation_pending().await?;
                if let OutputMode::Text = copt.output_mode {
                    let owed: f64 = pending.iter().map(|t| t.calculated_donation_amount).sum();
                    println!("Owed: ${:.2}", owed);
                }
                copt.output_mode.print_list(&pending);
            }
            DonationOpt::Share { id } => {
                let r = client.donation_share_image(*id).await?;
                print_success(
                    copt.output_mode,
                    &format!("{} {}", r.message, r.image_url),
                );
            }
        }
        Ok(())
    }
}
