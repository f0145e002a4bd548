use floodwatch_entities::{address::AddressRole, id::Id, preferences::PreferenceKey};

pub use floodwatch_entities::id::is_valid_key;

pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Check if `path` is `ancestor` or lies within its subtree.
pub fn is_within(path: &str, ancestor: &str) -> bool {
    let mut path = segments(path);
    segments(ancestor).all(|a| path.next() == Some(a))
}

pub fn user(user_id: &Id) -> String {
    format!("users/{user_id}")
}

pub fn preferences(user_id: &Id) -> String {
    format!("users/{user_id}/preferences")
}

pub fn preference(user_id: &Id, key: PreferenceKey) -> String {
    format!("users/{user_id}/preferences/{key}")
}

pub fn role_address(user_id: &Id, role: AddressRole) -> String {
    format!("users/{user_id}/{role}")
}

pub fn saved_addresses(user_id: &Id) -> String {
    format!("users/{user_id}/savedAddresses")
}

pub fn saved_address(user_id: &Id, id: &str) -> String {
    format!("users/{user_id}/savedAddresses/{id}")
}

pub fn notifications(user_id: &Id) -> String {
    format!("users/{user_id}/notifications")
}
