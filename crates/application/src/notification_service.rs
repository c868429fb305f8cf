use std::sync::Arc;

use pulse_core::{AppResult, SubjectIdentity};
use pulse_domain::{Notification, mention};
use tracing::warn;

use crate::{NotificationRepository, SubjectDirectory};

/// Application service that tells subjects they were mentioned.
#[derive(Clone)]
pub struct NotificationService {
    directory: Arc<dyn SubjectDirectory>,
    repository: Arc<dyn NotificationRepository>,
}

impl NotificationService {
    /// Creates a notification service.
    #[must_use]
    pub fn new(
        directory: Arc<dyn SubjectDirectory>,
        repository: Arc<dyn NotificationRepository>,
    ) -> Self {
        Self {
            directory,
            repository,
        }
    }

    /// Notifies every subject whose display name is mentioned in `content`.
    ///
    /// Delivery is best-effort; returns the number of notifications stored.
    pub async fn notify_mentions(
        &self,
        author: &SubjectIdentity,
        content: &str,
        message_url: &str,
    ) -> usize {
        let mut delivered = 0;

        for name in mention::extract_all(content) {
            let recipients = match self.directory.find_by_display_name(&name).await {
                Ok(recipients) => recipients,
                Err(error) => {
                    warn!(mention = %name, error = %error, "failed to look up mentioned subject");
                    continue;
                }
            };

            for recipient in recipients {
                let notification = Notification::mention(
                    recipient.subject.clone(),
                    author.label(),
                    message_url,
                    crate::now_timestamp(),
                );

                match self.repository.add_notification(notification).await {
                    Ok(_) => delivered += 1,
                    Err(error) => warn!(
                        subject = %recipient.subject,
                        error = %error,
                        "failed to store mention notification"
                    ),
                }
            }
        }

        delivered
    }

    /// Marks a notification as read.
    pub async fn mark_read(&self, notification_id: &str) -> AppResult<()> {
        self.repository.mark_read(notification_id).await
    }
}
