use std::{borrow::Borrow, fmt};

use uuid::Uuid;

/// Characters with a special meaning in user data paths.
pub const RESERVED_KEY_CHARS: &[char] = &['/', '.', '#', '$', '[', ']'];

/// Key of a user or of a stored record.
///
/// Keys generated by the store are taken over as they are.
/// An id is only usable as a key if it fits into a single
/// path segment, see [`Id::is_valid`].
#[derive(Default, Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Id(String);

impl Id {
    /// A random id that is unique without asking the store.
    pub fn new() -> Self {
        Self(Uuid::new_v4().as_simple().to_string())
    }

    pub fn is_valid(&self) -> bool {
        is_valid_key(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty() && !key.contains(RESERVED_KEY_CHARS)
}

impl From<String> for Id {
    fn from(from: String) -> Self {
        Self(from)
    }
}

impl From<&str> for Id {
    fn from(from: &str) -> Self {
        Self(from.to_owned())
    }
}

impl From<Id> for String {
    fn from(from: Id) -> Self {
        from.0
    }
}

impl AsRef<str> for Id {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Id {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
