//! # floodwatch-store
//!
//! User data kept in a hierarchical JSON tree, addressed by
//! slash separated paths like `users/{uid}/preferences`.
//!
//! The [`UserDataStore`] maps the tree onto the repositories of
//! `floodwatch-core` and works on top of any [`JsonBackend`], e.g. the
//! local [`MemoryBackend`] or a remote realtime database.

mod backend;
mod document;
mod memory;
pub mod path;
mod store;

pub use self::{
    backend::{JsonBackend, WatchCallback, WatchId},
    memory::MemoryBackend,
    store::UserDataStore,
};

pub use floodwatch_core::repositories::Error;

pub type Result<T> = std::result::Result<T, Error>;
