use strum::{Display, EnumString};

use crate::{geo::Coordinate, id::Id};

/// The role of a distinguished address.
///
/// There is at most one address per role and user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum AddressRole {
    Home,
    Work,
}

impl AddressRole {
    pub const fn title(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Work => "Work",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SavedAddress {
    pub id: Id,
    pub title: String,
    pub coordinate: Coordinate,
    pub formatted_address: String,
}

/// An address that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAddress {
    pub title: String,
    pub coordinate: Coordinate,
    pub formatted_address: String,
}

impl NewAddress {
    pub fn into_saved(self, id: Id) -> SavedAddress {
        let Self {
            title,
            coordinate,
            formatted_address,
        } = self;
        SavedAddress {
            id,
            title,
            coordinate,
            formatted_address,
        }
    }
}

/// All addresses of a single user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddressBook {
    pub home: Option<SavedAddress>,
    pub work: Option<SavedAddress>,
    pub saved: Vec<SavedAddress>,
}

impl AddressBook {
    pub fn by_role(&self, role: AddressRole) -> Option<&SavedAddress> {
        match role {
            AddressRole::Home => self.home.as_ref(),
            AddressRole::Work => self.work.as_ref(),
        }
    }

    pub fn find(&self, id: &str) -> Option<&SavedAddress> {
        self.saved.iter().find(|a| a.id.as_str() == id)
    }
}
