mod addresses;
mod error;
mod notifications;
mod prediction;
mod preferences;
mod search;
mod shelters;


pub use self::{
    addresses::*, error::Error, notifications::*, prediction::*, preferences::*, search::*,
    shelters::*,
};

mod prelude {
    pub use super::error::Error;
    pub type Result<T> = std::result::Result<T, Error>;
    pub use crate::{entities::*, repositories::*, session::Session};
}
