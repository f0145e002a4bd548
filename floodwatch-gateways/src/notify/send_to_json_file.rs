use floodwatch_core::{entities::*, gateways::notify::LocalNotificationGateway};
use jfs::Store;
use serde::{Deserialize, Serialize};
use std::{io, path::Path};

/// Stores notifications as JSON files instead of showing them.
pub struct SendToJsonFile {
    json_store: Store,
}

impl SendToJsonFile {
    pub fn try_new<P: AsRef<Path>>(directory: P) -> io::Result<Self> {
        let json_store = Store::new(directory)?;
        Ok(Self { json_store })
    }
    pub fn path(&self) -> &Path {
        self.json_store.path()
    }
}

#[derive(Debug, Deserialize, Serialize)]
struct JsonNotification {
    title: String,
    body: String,
    image: Option<String>,
    trigger_after_secs: u64,
}

impl From<&LocalNotification> for JsonNotification {
    fn from(from: &LocalNotification) -> Self {
        Self {
            title: from.title.clone(),
            body: from.body.clone(),
            image: from.image.clone(),
            trigger_after_secs: from.trigger_after.as_secs(),
        }
    }
}

impl LocalNotificationGateway for SendToJsonFile {
    fn schedule(&self, notification: &LocalNotification) {
        let key = format!("{}-{}", Timestamp::now().as_millis(), Id::new());
        let json = JsonNotification::from(notification);
        if let Err(err) = self.json_store.save_with_id(&json, &key) {
            log::warn!("Unable to save notification in JSON file: {err}");
        }
    }
}
