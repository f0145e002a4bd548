// Access traits for the user data.
// The data of every user lives in its own subtree and is
// only ever accessed on behalf of that single user.

use crate::entities::*;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("The requested object could not be found")]
    NotFound,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

type Result<T> = std::result::Result<T, Error>;

pub trait PreferencesRepo {
    /// `None` if the user has never stored any preferences.
    fn load_preferences(&self, user_id: &Id) -> Result<Option<UserPreferences>>;
    fn save_preferences(&self, user_id: &Id, preferences: &UserPreferences) -> Result<()>;
    fn save_preference(&self, user_id: &Id, key: PreferenceKey, value: bool) -> Result<()>;
}

pub trait AddressRepo {
    fn load_address_book(&self, user_id: &Id) -> Result<AddressBook>;
    /// Replace the address with the given role.
    fn save_role_address(&self, user_id: &Id, role: AddressRole, address: &NewAddress)
        -> Result<()>;
    /// Store a new address under a generated id.
    fn create_saved_address(&self, user_id: &Id, address: NewAddress) -> Result<SavedAddress>;
    fn delete_saved_address(&self, user_id: &Id, id: &str) -> Result<()>;
}

pub trait NotificationRepo {
    fn load_notification_records(&self, user_id: &Id) -> Result<Vec<NotificationRecord>>;
    fn append_notification_record(&self, user_id: &Id, record: &NotificationRecord)
        -> Result<Id>;
}

/// Everything the map needs to know about a user.
///
/// Fields are `None` or empty until the first delivery.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserSnapshot {
    pub preferences: Option<UserPreferences>,
    pub addresses: AddressBook,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

pub type UserDataListener = Box<dyn Fn(&UserSnapshot) + Send + Sync + 'static>;

pub trait UserDataSubscriptions {
    /// Register a listener that is invoked with the current data
    /// and on every subsequent change. Listeners must tolerate
    /// repeated delivery of unchanged data.
    fn subscribe(&self, user_id: &Id, listener: UserDataListener) -> Result<SubscriptionId>;
    fn unsubscribe(&self, id: SubscriptionId);
}
