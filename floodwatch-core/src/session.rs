use crate::{entities::Id, usecases::Error};

/// The context of the current user.
///
/// Passed explicitly to every use case that acts on behalf of a user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    user_id: Option<Id>,
}

impl Session {
    pub const fn anonymous() -> Self {
        Self { user_id: None }
    }

    pub fn signed_in(user_id: impl Into<Id>) -> Self {
        Self {
            user_id: Some(user_id.into()),
        }
    }

    pub fn user_id(&self) -> Option<&Id> {
        self.user_id.as_ref()
    }

    /// `false` for anonymous users and for users with an unusable id.
    pub fn is_signed_in(&self) -> bool {
        self.require_user().is_ok()
    }

    pub fn require_user(&self) -> Result<&Id, Error> {
        self.user_id
            .as_ref()
            .filter(|id| id.is_valid())
            .ok_or(Error::Unauthorized)
    }

    pub fn sign_out(&mut self) {
        self.user_id = None;
    }
}
