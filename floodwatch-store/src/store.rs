use super::{
    backend::JsonBackend,
    document::{self, NotificationDoc, PreferencesDoc, RoleAddressDoc, SavedAddressDoc},
    path, Error, Result,
};
use floodwatch_core::{entities::*, repositories::*};
use serde_json::Value;
use std::sync::Arc;

/// The repositories on top of a JSON tree.
#[derive(Debug, Clone)]
pub struct UserDataStore<B> {
    backend: B,
}

impl<B> UserDataStore<B> {
    pub const fn new(backend: B) -> Self {
        Self { backend }
    }

    pub const fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: JsonBackend> UserDataStore<B> {
    fn user_subtree(&self, user_id: &Id) -> Result<Option<Value>> {
        self.backend.get(&path::user(user_id))
    }
}

impl<B: JsonBackend> PreferencesRepo for UserDataStore<B> {
    fn load_preferences(&self, user_id: &Id) -> Result<Option<UserPreferences>> {
        let value = self.backend.get(&path::preferences(user_id))?;
        Ok(value.and_then(document::preferences))
    }

    fn save_preferences(&self, user_id: &Id, preferences: &UserPreferences) -> Result<()> {
        let doc = PreferencesDoc::from(preferences);
        self.backend
            .set(&path::preferences(user_id), document::to_value(&doc)?)
    }

    fn save_preference(&self, user_id: &Id, key: PreferenceKey, value: bool) -> Result<()> {
        self.backend
            .set(&path::preference(user_id, key), Value::Bool(value))
    }
}

impl<B: JsonBackend> AddressRepo for UserDataStore<B> {
    fn load_address_book(&self, user_id: &Id) -> Result<AddressBook> {
        let snapshot = document::user_snapshot(self.user_subtree(user_id)?);
        Ok(snapshot.addresses)
    }

    fn save_role_address(
        &self,
        user_id: &Id,
        role: AddressRole,
        address: &NewAddress,
    ) -> Result<()> {
        let doc = RoleAddressDoc::from(address);
        self.backend
            .set(&path::role_address(user_id, role), document::to_value(&doc)?)
    }

    fn create_saved_address(&self, user_id: &Id, address: NewAddress) -> Result<SavedAddress> {
        let doc = SavedAddressDoc::from(&address);
        let key = self
            .backend
            .push(&path::saved_addresses(user_id), document::to_value(&doc)?)?;
        Ok(address.into_saved(key.into()))
    }

    fn delete_saved_address(&self, user_id: &Id, id: &str) -> Result<()> {
        if !path::is_valid_key(id) {
            return Err(Error::NotFound);
        }
        let path = path::saved_address(user_id, id);
        if self.backend.get(&path)?.is_none() {
            return Err(Error::NotFound);
        }
        self.backend.remove(&path)
    }
}

impl<B: JsonBackend> NotificationRepo for UserDataStore<B> {
    fn load_notification_records(&self, user_id: &Id) -> Result<Vec<NotificationRecord>> {
        let value = self.backend.get(&path::notifications(user_id))?;
        Ok(document::notification_records(value))
    }

    fn append_notification_record(
        &self,
        user_id: &Id,
        record: &NotificationRecord,
    ) -> Result<Id> {
        let doc = NotificationDoc::from(record);
        let key = self
            .backend
            .push(&path::notifications(user_id), document::to_value(&doc)?)?;
        Ok(key.into())
    }
}

impl<B: JsonBackend> UserDataSubscriptions for UserDataStore<B> {
    fn subscribe(&self, user_id: &Id, listener: UserDataListener) -> Result<SubscriptionId> {
        let watch_id = self.backend.watch(
            &path::user(user_id),
            Arc::new(move |value: Option<&Value>| {
                listener(&document::user_snapshot(value.cloned()));
            }),
        )?;
        log::debug!("Subscribed to the data of user {user_id}");
        Ok(SubscriptionId(watch_id))
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.backend.unwatch(id.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryBackend;
    use std::sync::Mutex;

    fn store() -> UserDataStore<MemoryBackend> {
        UserDataStore::new(MemoryBackend::new())
    }

    fn new_address(title: &str) -> NewAddress {
        NewAddress {
            title: title.into(),
            coordinate: Coordinate::new(-27.47, 153.02),
            formatted_address: format!("{title} Street, Brisbane"),
        }
    }

    #[test]
    fn preferences_are_stored_per_flag() {
        let db = store();
        let uid = Id::from("u1");
        assert_eq!(db.load_preferences(&uid).unwrap(), None);
        db.save_preference(&uid, PreferenceKey::Routes, false)
            .unwrap();
        let prefs = db.load_preferences(&uid).unwrap().unwrap();
        assert!(!prefs.routes);
        assert!(prefs.location_services);
        assert_eq!(
            db.backend()
                .get("users/u1/preferences/routes")
                .unwrap(),
            Some(Value::Bool(false))
        );
    }

    #[test]
    fn role_addresses_are_replaced() {
        let db = store();
        let uid = Id::from("u1");
        db.save_role_address(&uid, AddressRole::Home, &new_address("Queen"))
            .unwrap();
        db.save_role_address(&uid, AddressRole::Home, &new_address("King"))
            .unwrap();
        let book = db.load_address_book(&uid).unwrap();
        let home = book.home.unwrap();
        assert_eq!(home.title, "Home");
        assert_eq!(home.formatted_address, "King Street, Brisbane");
        assert!(book.work.is_none());
    }

    #[test]
    fn create_and_delete_saved_addresses() {
        let db = store();
        let uid = Id::from("u1");
        let gym = db.create_saved_address(&uid, new_address("Gym")).unwrap();
        let park = db.create_saved_address(&uid, new_address("Park")).unwrap();
        assert_ne!(gym.id, park.id);
        let book = db.load_address_book(&uid).unwrap();
        assert_eq!(book.saved, vec![gym.clone(), park.clone()]);

        db.delete_saved_address(&uid, gym.id.as_str()).unwrap();
        assert!(matches!(
            db.delete_saved_address(&uid, gym.id.as_str()),
            Err(Error::NotFound)
        ));
        assert!(matches!(
            db.delete_saved_address(&uid, "../home"),
            Err(Error::NotFound)
        ));
        assert_eq!(db.load_address_book(&uid).unwrap().saved, vec![park]);
    }

    #[test]
    fn users_are_isolated() {
        let db = store();
        db.create_saved_address(&Id::from("u1"), new_address("Gym"))
            .unwrap();
        assert!(db
            .load_address_book(&Id::from("u2"))
            .unwrap()
            .saved
            .is_empty());
    }

    #[test]
    fn notification_records_keep_insertion_order() {
        let db = store();
        let uid = Id::from("u1");
        let records: Vec<_> = ["2024-10-26", "2024-10-27"]
            .into_iter()
            .map(|date| NotificationRecord {
                date: date.into(),
                severity: Severity::Minor,
                message: format!("Flooding predicted on {date}. Severity: Minor."),
                created_at: Timestamp::from_millis(1_729_930_320_000).unwrap(),
            })
            .collect();
        for r in &records {
            db.append_notification_record(&uid, r).unwrap();
        }
        assert_eq!(db.load_notification_records(&uid).unwrap(), records);
    }

    #[test]
    fn subscribers_receive_snapshots() {
        let db = store();
        let uid = Id::from("u1");
        let snapshots = Arc::new(Mutex::new(Vec::<UserSnapshot>::new()));
        let received = snapshots.clone();
        let id = db
            .subscribe(
                &uid,
                Box::new(move |s| received.lock().unwrap().push(s.clone())),
            )
            .unwrap();
        db.save_preference(&uid, PreferenceKey::PushNotifications, false)
            .unwrap();
        db.save_role_address(&uid, AddressRole::Work, &new_address("Ann"))
            .unwrap();
        db.save_preference(&Id::from("u2"), PreferenceKey::Routes, false)
            .unwrap();
        db.unsubscribe(id);
        db.save_preference(&uid, PreferenceKey::Routes, false)
            .unwrap();

        let snapshots = snapshots.lock().unwrap();
        assert_eq!(snapshots.len(), 3);
        assert_eq!(snapshots[0], UserSnapshot::default());
        assert!(!snapshots[1].preferences.unwrap().push_notifications);
        assert_eq!(
            snapshots[2].addresses.work.as_ref().map(|a| a.title.as_str()),
            Some("Work")
        );
    }
}
