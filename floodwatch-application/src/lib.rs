#[macro_use]
extern crate log;

mod addresses;
mod map_session;
mod notifications;
mod preferences;
mod search;

pub mod prelude {
    pub use super::{
        addresses::*, map_session::*, notifications::*, preferences::*, search::*,
    };
}

pub mod error;

pub type Result<T> = std::result::Result<T, error::AppError>;

pub(crate) use floodwatch_core::{entities::*, repositories::*, session::Session, usecases};

#[cfg(test)]
pub(crate) mod tests;

/// Writes on behalf of an anonymous user are skipped without an error.
pub(crate) fn is_signed_in(session: &Session, action: &str) -> bool {
    if session.require_user().is_ok() {
        return true;
    }
    debug!("No user signed in: skip {action}");
    false
}
