use anyhow::Result;
use floodwatch_core::{entities::*, gateways::notify::LocalNotificationGateway};
use serde::Serialize;
use std::{
    mem,
    sync::{Arc, Mutex, PoisonError},
    thread::{self, JoinHandle},
};

pub const DEFAULT_PUSH_API_URL: &str = "https://exp.host/--/api/v2/push/send";

/// Push notifications delivered by the Expo push service.
///
/// Every notification is sent by its own thread after the
/// requested delay. Call [`ExpoPush::wait_for_delivery`]
/// (or `flush`) before the process exits.
#[derive(Debug, Clone)]
pub struct ExpoPush {
    api_url: String,
    /// Token of the device that receives the notifications.
    push_token: String,
    pending: Arc<Mutex<Vec<JoinHandle<bool>>>>,
}

#[derive(Debug, Serialize)]
struct PushMessage {
    to: String,
    title: String,
    body: String,
    sound: &'static str,
}

#[cfg(not(test))]
fn send_raw(url: &str, message: &PushMessage) -> Result<()> {
    let client = reqwest::blocking::Client::new();
    let response = client.post(url).json(message).send()?;
    if response.status().is_success() {
        log::debug!("Push service response: {:#?}", response);
        Ok(())
    } else {
        let status = response.status();
        let body = response.text()?;
        Err(anyhow::anyhow!("Push service responded with {status}: {body}"))
    }
}

/// Don't actually send push notifications while running the tests.
#[cfg(test)]
fn send_raw(_: &str, message: &PushMessage) -> Result<()> {
    log::debug!("Would send push notification: {:?}", message);
    Ok(())
}

impl ExpoPush {
    pub fn new(api_url: String, push_token: String) -> Self {
        Self {
            api_url,
            push_token,
            pending: Default::default(),
        }
    }

    /// Wait for all notifications that have been scheduled so far.
    ///
    /// Returns the number of notifications that were accepted
    /// by the push service.
    pub fn wait_for_delivery(&self) -> usize {
        let handles = mem::take(
            &mut *self
                .pending
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap_or(false))
            .filter(|delivered| *delivered)
            .count()
    }
}

impl LocalNotificationGateway for ExpoPush {
    fn schedule(&self, notification: &LocalNotification) {
        let url = self.api_url.clone();
        let delay = notification.trigger_after;
        let message = PushMessage {
            to: self.push_token.clone(),
            title: notification.title.clone(),
            body: notification.body.clone(),
            sound: "default",
        };
        let handle = thread::spawn(move || {
            thread::sleep(delay);
            match send_raw(&url, &message) {
                Ok(()) => true,
                Err(err) => {
                    log::warn!("Could not send push notification: {err}");
                    false
                }
            }
        });
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(handle);
    }

    fn flush(&self) {
        let delivered = self.wait_for_delivery();
        log::debug!("Delivered {delivered} push notifications");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn notification(body: &str, trigger_after: Duration) -> LocalNotification {
        LocalNotification {
            title: "Flood Alert: Minor Flooding Predicted".into(),
            body: body.into(),
            image: None,
            trigger_after,
        }
    }

    #[test]
    fn wait_until_delayed_notifications_are_sent() {
        let push = ExpoPush::new(DEFAULT_PUSH_API_URL.into(), "ExponentPushToken[x]".into());
        let delay = Duration::from_millis(50);
        let start = Instant::now();
        push.schedule(&notification("Flooding predicted on 2024-10-26.", delay));
        push.clone()
            .schedule(&notification("Flooding predicted on 2024-10-27.", delay));
        assert_eq!(push.wait_for_delivery(), 2);
        assert!(start.elapsed() >= delay);
        assert_eq!(push.wait_for_delivery(), 0);
    }
}
