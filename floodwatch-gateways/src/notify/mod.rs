use floodwatch_core::{entities::*, gateways::notify::LocalNotificationGateway};

mod expo;
mod send_to_json_file;

pub use self::{expo::*, send_to_json_file::*};

/// Only writes notifications to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl LocalNotificationGateway for LogNotifier {
    fn schedule(&self, notification: &LocalNotification) {
        log::info!(
            "Notification in {}s: {} | {}",
            notification.trigger_after.as_secs(),
            notification.title,
            notification.body
        );
    }
}
