#![deny(missing_debug_implementations)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # floodwatch-entities
//!
//! Reusable, agnostic domain entities for floodwatch.
//!
//! The entities only contain generic functionality that does not reveal any application-specific business logic.

pub mod address;
pub mod flood;
pub mod geo;
pub mod id;
pub mod marker;
pub mod notification;
pub mod place;
pub mod prediction;
pub mod preferences;
pub mod route;
pub mod shelter;
pub mod time;
pub mod weather;

#[cfg(any(test, feature = "builders"))]
pub mod builders;
