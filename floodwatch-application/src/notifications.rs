use super::*;
use floodwatch_core::{
    gateways::{notify::LocalNotificationGateway, prediction::FloodPredictionGateway},
    usecases::FloodAlertFormatter,
};
use std::collections::HashSet;

/// Remembers the predictions that have already been
/// processed during the current session.
#[derive(Debug, Default)]
pub struct AlertGuard {
    processed: HashSet<Vec<FloodPrediction>>,
}

impl AlertGuard {
    /// `true` only for the first call with the given predictions.
    pub fn first_time(&mut self, predictions: &[FloodPrediction]) -> bool {
        self.processed.insert(predictions.to_vec())
    }
}

pub fn predict_floods<G>(gateway: &G, rain_data: &[RainfallSample]) -> Result<Vec<FloodPrediction>>
where
    G: FloodPredictionGateway + ?Sized,
{
    Ok(usecases::predict_floods(gateway, rain_data).map_err(|err| {
        warn!("Failed to predict floods: {}", err);
        err
    })?)
}

/// Warn the signed in user about predicted floods
/// if the alerts are enabled.
pub fn send_flood_alerts<R, G, F>(
    repo: &R,
    session: &Session,
    preferences: &UserPreferences,
    notification_gateway: &G,
    formatter: &F,
    guard: &mut AlertGuard,
    predictions: &[FloodPrediction],
) -> Result<Vec<NotificationRecord>>
where
    R: NotificationRepo + ?Sized,
    G: LocalNotificationGateway + ?Sized,
    F: FloodAlertFormatter + ?Sized,
{
    if !preferences.flood_alerts_enabled() {
        debug!("Flood alerts are disabled");
        return Ok(vec![]);
    }
    if !is_signed_in(session, "sending flood alerts") {
        return Ok(vec![]);
    }
    if !guard.first_time(predictions) {
        debug!("Flood alerts for these predictions have already been sent");
        return Ok(vec![]);
    }
    let sent = usecases::send_flood_alerts(
        repo,
        session,
        notification_gateway,
        formatter,
        predictions,
    )
    .map_err(|err| {
        warn!("Failed to send flood alerts: {}", err);
        err
    })?;
    if !sent.is_empty() {
        info!("Scheduled {} flood alerts", sent.len());
    }
    Ok(sent)
}

pub fn notifications<R>(repo: &R, session: &Session) -> Result<Vec<NotificationRecord>>
where
    R: NotificationRepo + ?Sized,
{
    if !session.is_signed_in() {
        return Ok(vec![]);
    }
    Ok(usecases::load_notifications(repo, session)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::prelude::*;

    fn predictions() -> Vec<FloodPrediction> {
        [("2024-10-26", 2), ("2024-10-27", 3), ("2024-10-28", 0)]
            .into_iter()
            .map(|(date, risk_level)| FloodPrediction {
                date: date.into(),
                risk_level,
            })
            .collect()
    }

    #[test]
    fn send_alerts_once_per_session() {
        let db = memory_store();
        let session = Session::signed_in("alice");
        let notifier = MockNotifier::default();
        let mut guard = AlertGuard::default();
        let prefs = UserPreferences::default();

        let sent = send_flood_alerts(
            &db,
            &session,
            &prefs,
            &notifier,
            &PlainFormatter,
            &mut guard,
            &predictions(),
        )
        .unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(notifier.scheduled.lock().unwrap().len(), 2);

        let sent = send_flood_alerts(
            &db,
            &session,
            &prefs,
            &notifier,
            &PlainFormatter,
            &mut guard,
            &predictions(),
        )
        .unwrap();
        assert!(sent.is_empty());
        assert_eq!(notifications(&db, &session).unwrap().len(), 2);
    }

    #[test]
    fn stored_records_prevent_duplicates_across_sessions() {
        let db = memory_store();
        let session = Session::signed_in("alice");
        let notifier = MockNotifier::default();
        let prefs = UserPreferences::default();
        for _ in 0..2 {
            let mut guard = AlertGuard::default();
            send_flood_alerts(
                &db,
                &session,
                &prefs,
                &notifier,
                &PlainFormatter,
                &mut guard,
                &predictions(),
            )
            .unwrap();
        }
        assert_eq!(notifier.scheduled.lock().unwrap().len(), 2);
        assert_eq!(notifications(&db, &session).unwrap().len(), 2);
    }

    #[test]
    fn disabled_push_notifications_block_alerts() {
        let db = memory_store();
        let session = Session::signed_in("alice");
        let notifier = MockNotifier::default();
        let mut prefs = UserPreferences::default();
        prefs.set(PreferenceKey::PushNotifications, false);
        let sent = send_flood_alerts(
            &db,
            &session,
            &prefs,
            &notifier,
            &PlainFormatter,
            &mut AlertGuard::default(),
            &predictions(),
        )
        .unwrap();
        assert!(sent.is_empty());
        assert!(notifier.scheduled.lock().unwrap().is_empty());
    }

    #[test]
    fn anonymous_users_get_no_alerts() {
        let db = memory_store();
        let notifier = MockNotifier::default();
        let sent = send_flood_alerts(
            &db,
            &Session::anonymous(),
            &UserPreferences::default(),
            &notifier,
            &PlainFormatter,
            &mut AlertGuard::default(),
            &predictions(),
        )
        .unwrap();
        assert!(sent.is_empty());
        assert!(notifier.scheduled.lock().unwrap().is_empty());
    }
}
