use std::time::Duration;

use time::Date;

use crate::{
    prediction::Severity,
    time::{parse_iso_date, Timestamp},
};

/// A flood alert that has already been issued to a user.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationRecord {
    /// ISO 8601 date of the predicted flood.
    pub date: String,
    pub severity: Severity,
    pub message: String,
    pub created_at: Timestamp,
}

impl NotificationRecord {
    pub fn matches(&self, date: &str, severity: Severity) -> bool {
        self.date == date && self.severity == severity
    }

    /// Number of days from `today` until the alert date,
    /// negative for past alerts.
    pub fn days_until(&self, today: Date) -> Option<i64> {
        parse_iso_date(&self.date).map(|date| (date - today).whole_days())
    }
}

/// A notification to be shown on the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalNotification {
    pub title: String,
    pub body: String,
    pub image: Option<String>,
    pub trigger_after: Duration,
}
