use lsl_client::views::NotificationsView;
use lsl_client::{ClientError, NotificationQuery};

use crate::common::print_success;
use crate::{CommonOpt, NotificationOpt, OutputMode};

impl NotificationOpt {
    pub async fn exec(&self, copt: &CommonOpt) -> Result<(), ClientError> {
        let session = copt.to_authed_session().await?;
        let client = session.client();
        match self {
            NotificationOpt::List { unread_only, limit } => {
                let mut query = NotificationQuery {
                    unread_only: *unread_only,
                    ..Default::default()
                };
                if let Some(limit) = limit {
                    query.limit = *limit;
                }
                let mut view = NotificationsView::new(query);
                view.refresh(client).await?;
                if let OutputMode::Text = copt.output_mode {
                    println!("{} unread", view.unread_count);
                }
                copt.output_mode.print_list(&view.notifications);
            }
            NotificationOpt::Read { id } => {
                let n = client.notification_mark_read(*id).await?;
                copt.output_mode.print_message(n);
            }
            NotificationOpt::UnreadCount => {
                let count = client.notification_unread_count().await?;
                match copt.output_mode {
                    OutputMode::Json => println!("{{\"unread_count\":{}}}", count),
                    OutputMode::Text => println!("{}", count),
                }
            }
            NotificationOpt::MarkAllRead => {
                let r = client.notification_mark_all_read().await?;
                print_success(copt.output_mode, &r.message);
            }
        }
        Ok(())
    }
}
