use lsl_client::ClientError;
use lsl_proto::v1::ProfileUpdate;
use lsl_proto::validation::format_phone_number;

use crate::common::print_success;
use crate::{CommonOpt, ProfileOpt, ProfileUpdateOpt};

impl ProfileUpdateOpt {
    fn to_update(&self) -> ProfileUpdate {
        ProfileUpdate {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            phone: self.phone.as_deref().map(format_phone_number),
            brokerage: self.brokerage.clone(),
            license_number: self.license_number.clone(),
            donation_amount_per_transaction: self.donation_amount,
            bio: self.bio.clone(),
        }
    }
}

impl ProfileOpt {
    pub async fn exec(&self, copt: &CommonOpt) -> Result<(), ClientError> {
        match self {
            ProfileOpt::Show => {
                let session = copt.to_authed_session().await?;
                let profile = session.client().realtor_profile_get().await?;
                copt.output_mode.print_message(profile);
            }
            ProfileOpt::Update(uopt) => {
                let patch = uopt.to_update();
                if patch.is_empty() {
                    println!("Nothing to update");
                    return Ok(());
                }
                let mut session = copt.to_authed_session().await?;
                let user = session.update_profile(&patch).await?;
                copt.output_mode.print_message(user);
            }
            ProfileOpt::UploadHeadshot { path } => {
                let session = copt.to_authed_session().await?;
                let r = session.client().realtor_upload_headshot(path).await?;
                print_success(
                    copt.output_mode,
                    &format!("Headshot uploaded to {}", r.headshot_url),
                );
            }
            ProfileOpt::Stats => {
                let session = copt.to_authed_session().await?;
                let stats = session.client().realtor_stats().await?;
                copt.output_mode.print_message(stats);
            }
        }
        Ok(())
    }
}
