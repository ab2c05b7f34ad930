//! The notification collaborator: short advisory messages such as "+10 Cake!".

use std::time::Duration;

use tracing::info;

use crate::error::ServiceError;

pub trait NotificationService {
    /// Shows `message` for roughly `duration`. Purely advisory.
    fn notify(&mut self, message: &str, duration: Duration) -> Result<(), ServiceError>;
}

/// A [`NotificationService`] that writes every message to the log.
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl NotificationService for TracingNotifier {
    fn notify(&mut self, message: &str, duration: Duration) -> Result<(), ServiceError> {
        info!(duration = ?duration, "{message}");
        Ok(())
    }
}
