//! # floodwatch-core
//!
//! Business rules of floodwatch without any I/O:
//! ports to the outside world (repositories and gateways),
//! use cases and the map view state machine.

pub mod entities {
    pub use floodwatch_entities::{
        address::*, flood::*, geo::*, id::*, marker::*, notification::*, place::*, prediction::*,
        preferences::*, route::*, shelter::*, time::*, weather::*,
    };
}

pub mod gateways;
pub mod map;
pub mod repositories;
pub mod session;
pub mod usecases;
