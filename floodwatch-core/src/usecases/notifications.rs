use super::prelude::*;
use crate::gateways::notify::LocalNotificationGateway;

/// A predicted flood that the user should be warned about.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FloodAlert {
    pub date: String,
    pub severity: Severity,
}

pub trait FloodAlertFormatter {
    fn format_alert(&self, alert: &FloodAlert) -> LocalNotification;
}

/// Notify the signed in user about predicted floods.
///
/// At most one alert is issued per date and severity.
/// Returns the records of the alerts that have been scheduled.
pub fn send_flood_alerts<R, G, F>(
    repo: &R,
    session: &Session,
    notification_gateway: &G,
    formatter: &F,
    predictions: &[FloodPrediction],
) -> Result<Vec<NotificationRecord>>
where
    R: NotificationRepo + ?Sized,
    G: LocalNotificationGateway + ?Sized,
    F: FloodAlertFormatter + ?Sized,
{
    let user_id = session.require_user()?;
    let existing = repo.load_notification_records(user_id)?;
    let unsent_alerts = find_unsent_alerts(predictions, &existing);
    let notifications = create_notifications(formatter, unsent_alerts);
    let sent_alerts = schedule_notifications(notification_gateway, notifications);
    save_sent_alerts(repo, user_id, &sent_alerts);
    Ok(sent_alerts)
}

fn find_unsent_alerts(
    predictions: &[FloodPrediction],
    existing: &[NotificationRecord],
) -> Vec<FloodAlert> {
    let mut alerts: Vec<FloodAlert> = Vec::new();
    for prediction in predictions {
        let Some(severity) = prediction.severity() else {
            continue;
        };
        let date = &prediction.date;
        let already_sent = existing.iter().any(|r| r.matches(date, severity));
        let already_pending = alerts
            .iter()
            .any(|a| a.date == *date && a.severity == severity);
        if already_sent || already_pending {
            log::debug!("Skip {severity} flood alert for {date}");
            continue;
        }
        alerts.push(FloodAlert {
            date: date.clone(),
            severity,
        });
    }
    alerts
}

fn create_notifications<F>(
    formatter: &F,
    unsent_alerts: Vec<FloodAlert>,
) -> Vec<(FloodAlert, LocalNotification)>
where
    F: FloodAlertFormatter + ?Sized,
{
    unsent_alerts
        .into_iter()
        .map(|alert| {
            let notification = formatter.format_alert(&alert);
            (alert, notification)
        })
        .collect()
}

fn schedule_notifications<G>(
    gateway: &G,
    notifications: Vec<(FloodAlert, LocalNotification)>,
) -> Vec<NotificationRecord>
where
    G: LocalNotificationGateway + ?Sized,
{
    notifications
        .into_iter()
        .map(|(alert, notification)| {
            let created_at = Timestamp::now();
            gateway.schedule(&notification);
            let FloodAlert { date, severity } = alert;
            NotificationRecord {
                date,
                severity,
                message: notification.body,
                created_at,
            }
        })
        .collect()
}

fn save_sent_alerts<R>(repo: &R, user_id: &Id, sent_alerts: &[NotificationRecord])
where
    R: NotificationRepo + ?Sized,
{
    for record in sent_alerts {
        if let Err(err) = repo.append_notification_record(user_id, record) {
            let NotificationRecord { date, severity, .. } = record;
            log::warn!("Unable to save {severity} flood alert for {date} of user {user_id}: {err}");
        }
    }
}

/// All alerts that have been issued to the signed in user,
/// the most recent first.
pub fn load_notifications<R>(repo: &R, session: &Session) -> Result<Vec<NotificationRecord>>
where
    R: NotificationRepo + ?Sized,
{
    let user_id = session.require_user()?;
    let mut records = repo.load_notification_records(user_id)?;
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(records)
}

/// Alerts that are not in the past, paired with the
/// number of days until the flood is expected.
pub fn upcoming_alerts(
    records: &[NotificationRecord],
    today: time::Date,
) -> Vec<(&NotificationRecord, i64)> {
    records
        .iter()
        .filter_map(|r| r.days_until(today).map(|days| (r, days)))
        .filter(|(_, days)| *days >= 0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::tests::{MockDb, MockNotifier};
    use floodwatch_entities::builders::*;
    use rand::prelude::*;
    use std::{collections::HashSet, time::Duration};

    struct PlainFormatter;

    impl FloodAlertFormatter for PlainFormatter {
        fn format_alert(&self, alert: &FloodAlert) -> LocalNotification {
            LocalNotification {
                title: format!("{} flood", alert.severity),
                body: format!("{} {}", alert.date, alert.severity),
                image: None,
                trigger_after: Duration::from_secs(2),
            }
        }
    }

    fn prediction(date: &str, level: u8) -> FloodPrediction {
        FloodPrediction::build().date(date).risk_level(level).finish()
    }

    #[test]
    fn send_alerts_for_floods_only() {
        let db = MockDb::default();
        let notifier = MockNotifier::default();
        let session = Session::signed_in("alice");
        let predictions = vec![
            prediction("2024-10-25", 0),
            prediction("2024-10-26", 1),
            prediction("2024-10-27", 3),
        ];
        let sent =
            send_flood_alerts(&db, &session, &notifier, &PlainFormatter, &predictions).unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(notifier.scheduled.borrow().len(), 2);
        assert_eq!(sent[0].severity, Severity::Minor);
        assert_eq!(sent[1].severity, Severity::Major);
        assert_eq!(sent[1].message, "2024-10-27 Major");
        assert_eq!(db.notification_count("alice"), 2);
    }

    #[test]
    fn do_not_resend_alerts() {
        let db = MockDb::default();
        let notifier = MockNotifier::default();
        let session = Session::signed_in("alice");
        let predictions = vec![prediction("2024-10-26", 2), prediction("2024-10-26", 2)];
        send_flood_alerts(&db, &session, &notifier, &PlainFormatter, &predictions).unwrap();
        assert_eq!(notifier.scheduled.borrow().len(), 1);

        let sent =
            send_flood_alerts(&db, &session, &notifier, &PlainFormatter, &predictions).unwrap();
        assert!(sent.is_empty());
        assert_eq!(notifier.scheduled.borrow().len(), 1);

        // A different severity on the same date is a new alert
        let predictions = vec![prediction("2024-10-26", 3)];
        let sent =
            send_flood_alerts(&db, &session, &notifier, &PlainFormatter, &predictions).unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(db.notification_count("alice"), 2);
    }

    #[test]
    fn never_store_duplicate_records() {
        let db = MockDb::default();
        let notifier = MockNotifier::default();
        let session = Session::signed_in("alice");
        let mut rng = rand::thread_rng();
        for _ in 0..20 {
            let predictions: Vec<_> = (0..rng.gen_range(0..15))
                .map(|_| {
                    let date = format!("2024-10-{}", rng.gen_range(20..24));
                    prediction(&date, rng.gen_range(0..4))
                })
                .collect();
            send_flood_alerts(&db, &session, &notifier, &PlainFormatter, &predictions).unwrap();
        }
        let records = db.notifications.borrow().get("alice").cloned().unwrap_or_default();
        let unique: HashSet<_> = records.iter().map(|r| (&r.date, r.severity)).collect();
        assert_eq!(unique.len(), records.len());
    }

    #[test]
    fn failed_persistence_is_not_fatal() {
        let db = MockDb::default();
        db.fail_notification_writes.set(true);
        let notifier = MockNotifier::default();
        let session = Session::signed_in("alice");
        let predictions = vec![prediction("2024-10-26", 1)];
        let sent =
            send_flood_alerts(&db, &session, &notifier, &PlainFormatter, &predictions).unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(db.notification_count("alice"), 0);

        // The next run sends the alert again
        db.fail_notification_writes.set(false);
        send_flood_alerts(&db, &session, &notifier, &PlainFormatter, &predictions).unwrap();
        assert_eq!(notifier.scheduled.borrow().len(), 2);
        assert_eq!(db.notification_count("alice"), 1);
    }

    #[test]
    fn alerts_require_a_user() {
        let db = MockDb::default();
        let notifier = MockNotifier::default();
        let predictions = vec![prediction("2024-10-26", 1)];
        let result = send_flood_alerts(
            &db,
            &Session::anonymous(),
            &notifier,
            &PlainFormatter,
            &predictions,
        );
        assert!(matches!(result, Err(Error::Unauthorized)));
        assert!(notifier.scheduled.borrow().is_empty());
    }

    #[test]
    fn list_upcoming_alerts() {
        let record = |date: &str| NotificationRecord {
            date: date.into(),
            severity: Severity::Minor,
            message: String::new(),
            created_at: Timestamp::now(),
        };
        let records = vec![record("2024-10-20"), record("2024-10-26"), record("invalid")];
        let upcoming = upcoming_alerts(&records, time::macros::date!(2024 - 10 - 24));
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].0.date, "2024-10-26");
        assert_eq!(upcoming[0].1, 2);
    }
}
