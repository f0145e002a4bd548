use floodwatch_entities::notification::LocalNotification;

/// Delivers notifications to the device of the user.
///
/// Delivery is not guaranteed.
pub trait LocalNotificationGateway {
    fn schedule(&self, notification: &LocalNotification);

    /// Block until all scheduled notifications have been handed over.
    fn flush(&self) {}
}
