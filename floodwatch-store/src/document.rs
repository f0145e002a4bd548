// JSON layout of the user data.

use floodwatch_core::repositories::UserSnapshot;
use floodwatch_entities::{
    address::{AddressBook, AddressRole, NewAddress, SavedAddress},
    geo::Coordinate,
    notification::NotificationRecord,
    preferences::UserPreferences,
    time::Timestamp,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};

const fn enabled() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesDoc {
    #[serde(default = "enabled")]
    pub location_services: bool,
    #[serde(default = "enabled")]
    pub flood_zone_warnings: bool,
    #[serde(default = "enabled")]
    pub routes: bool,
    #[serde(default = "enabled")]
    pub push_notifications: bool,
}

impl From<PreferencesDoc> for UserPreferences {
    fn from(from: PreferencesDoc) -> Self {
        let PreferencesDoc {
            location_services,
            flood_zone_warnings,
            routes,
            push_notifications,
        } = from;
        Self {
            location_services,
            flood_zone_warnings,
            routes,
            push_notifications,
        }
    }
}

impl From<&UserPreferences> for PreferencesDoc {
    fn from(from: &UserPreferences) -> Self {
        let UserPreferences {
            location_services,
            flood_zone_warnings,
            routes,
            push_notifications,
        } = *from;
        Self {
            location_services,
            flood_zone_warnings,
            routes,
            push_notifications,
        }
    }
}

/// Home or work address.
#[derive(Debug, Serialize, Deserialize)]
pub struct RoleAddressDoc {
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<&NewAddress> for RoleAddressDoc {
    fn from(from: &NewAddress) -> Self {
        Self {
            address: from.formatted_address.clone(),
            latitude: from.coordinate.latitude,
            longitude: from.coordinate.longitude,
        }
    }
}

impl RoleAddressDoc {
    fn into_saved(self, role: AddressRole) -> SavedAddress {
        let Self {
            address,
            latitude,
            longitude,
        } = self;
        SavedAddress {
            id: role.to_string().into(),
            title: role.title().to_owned(),
            coordinate: Coordinate::new(latitude, longitude),
            formatted_address: address,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SavedAddressDoc {
    #[serde(default)]
    pub title: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<&NewAddress> for SavedAddressDoc {
    fn from(from: &NewAddress) -> Self {
        Self {
            title: from.title.clone(),
            address: from.formatted_address.clone(),
            latitude: from.coordinate.latitude,
            longitude: from.coordinate.longitude,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NotificationDoc {
    pub date: String,
    pub severity: String,
    pub message: String,
    /// RFC 3339
    pub timestamp: String,
}

impl From<&NotificationRecord> for NotificationDoc {
    fn from(from: &NotificationRecord) -> Self {
        Self {
            date: from.date.clone(),
            severity: from.severity.to_string(),
            message: from.message.clone(),
            timestamp: from.created_at.to_rfc3339(),
        }
    }
}

impl NotificationDoc {
    fn into_record(self) -> Option<NotificationRecord> {
        let Self {
            date,
            severity,
            message,
            timestamp,
        } = self;
        let severity = severity.parse().ok()?;
        let created_at = Timestamp::parse_rfc3339(&timestamp)?;
        Some(NotificationRecord {
            date,
            severity,
            message,
            created_at,
        })
    }
}

pub fn to_value<T: Serialize>(doc: &T) -> super::Result<Value> {
    Ok(serde_json::to_value(doc).map_err(anyhow::Error::from)?)
}

/// Invalid entries are logged and skipped.
fn parse<T: DeserializeOwned>(what: &str, value: Value) -> Option<T> {
    serde_json::from_value(value)
        .map_err(|err| log::warn!("Skip invalid {what}: {err}"))
        .ok()
}

fn children(value: Option<Value>) -> Map<String, Value> {
    match value {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

pub fn preferences(value: Value) -> Option<UserPreferences> {
    parse::<PreferencesDoc>("preferences", value).map(Into::into)
}

pub fn role_address(role: AddressRole, value: Value) -> Option<SavedAddress> {
    parse::<RoleAddressDoc>("address", value).map(|doc| doc.into_saved(role))
}

pub fn saved_addresses(value: Option<Value>) -> Vec<SavedAddress> {
    children(value)
        .into_iter()
        .filter_map(|(id, value)| {
            parse::<SavedAddressDoc>("saved address", value).map(|doc| SavedAddress {
                id: id.into(),
                title: doc.title,
                coordinate: Coordinate::new(doc.latitude, doc.longitude),
                formatted_address: doc.address,
            })
        })
        .collect()
}

pub fn notification_records(value: Option<Value>) -> Vec<NotificationRecord> {
    children(value)
        .into_iter()
        .filter_map(|(_, value)| parse::<NotificationDoc>("notification", value))
        .filter_map(NotificationDoc::into_record)
        .collect()
}

pub fn address_book(user: &mut Map<String, Value>) -> AddressBook {
    let mut take = |role: AddressRole| {
        user.remove(&role.to_string())
            .and_then(|value| role_address(role, value))
    };
    let home = take(AddressRole::Home);
    let work = take(AddressRole::Work);
    let saved = saved_addresses(user.remove("savedAddresses"));
    AddressBook { home, work, saved }
}

/// Everything the map needs from the subtree of a single user.
pub fn user_snapshot(user: Option<Value>) -> UserSnapshot {
    let mut user = children(user);
    let preferences = user.remove("preferences").and_then(preferences);
    let addresses = address_book(&mut user);
    UserSnapshot {
        preferences,
        addresses,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use floodwatch_entities::prediction::Severity;
    use serde_json::json;

    #[test]
    fn missing_preference_flags_are_enabled() {
        let prefs = preferences(json!({ "routes": false })).unwrap();
        assert!(!prefs.routes);
        assert!(prefs.location_services);
        assert!(prefs.flood_zone_warnings);
        assert!(prefs.push_notifications);
        assert!(preferences(json!("yes")).is_none());
    }

    #[test]
    fn read_user_subtree() {
        let user = json!({
            "createdAt": "2024-10-01T10:00:00.000Z",
            "preferences": {
                "locationServices": true,
                "floodZoneWarnings": false,
                "routes": true,
                "pushNotifications": true
            },
            "home": { "address": "1 Queen St", "latitude": -27.47, "longitude": 153.02 },
            "savedAddresses": {
                "-a1": { "title": "Gym", "address": "2 King St", "latitude": -27.4, "longitude": 153.0 },
                "-a2": { "title": "Broken" }
            }
        });
        let snapshot = user_snapshot(Some(user));
        let prefs = snapshot.preferences.unwrap();
        assert!(!prefs.flood_zone_warnings);
        let home = snapshot.addresses.home.unwrap();
        assert_eq!(home.id.as_str(), "home");
        assert_eq!(home.formatted_address, "1 Queen St");
        assert!(snapshot.addresses.work.is_none());
        assert_eq!(snapshot.addresses.saved.len(), 1);
        assert_eq!(snapshot.addresses.saved[0].id.as_str(), "-a1");
    }

    #[test]
    fn empty_user_subtree() {
        let snapshot = user_snapshot(None);
        assert_eq!(snapshot, UserSnapshot::default());
    }

    #[test]
    fn notification_documents() {
        let record = NotificationRecord {
            date: "2024-10-27".into(),
            severity: Severity::Major,
            message: "Flooding predicted on 2024-10-27. Severity: Major.".into(),
            created_at: Timestamp::from_millis(1_729_930_320_000).unwrap(),
        };
        let value = to_value(&NotificationDoc::from(&record)).unwrap();
        assert_eq!(value["severity"], "Major");
        let records = notification_records(Some(json!({
            "-n1": value,
            "-n2": { "date": "2024-10-28", "severity": "Extreme", "message": "", "timestamp": "" }
        })));
        assert_eq!(records, vec![record]);
    }
}
