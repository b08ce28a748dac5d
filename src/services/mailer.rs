use async_trait::async_trait;
use tracing::info;

use crate::error::AppError;

/// Outgoing mail. Only password reset links are sent today.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_password_reset(&self, to: &str, reset_link: &str) -> Result<(), AppError>;
}

/// Default mailer: no SMTP, the link goes to the log
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_password_reset(&self, to: &str, reset_link: &str) -> Result<(), AppError> {
        info!(to, reset_link, "password reset requested");
        Ok(())
    }
}

#[cfg(test)]
pub mod testing {
    use std::sync::Mutex;

    use super::*;

    /// Keeps every (recipient, link) pair for assertions
    #[derive(Default)]
    pub struct RecordingMailer {
        pub sent: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send_password_reset(&self, to: &str, reset_link: &str) -> Result<(), AppError> {
            self.sent
                .lock()
                .expect("mailer lock")
                .push((to.to_string(), reset_link.to_string()));
            Ok(())
        }
    }
}
