//! Facade over the blueprint lifecycle crates.
//!
//! Downstream consumers depend on this crate and reach the layers through
//! `blueprint_architect::domain`, `::infrastructure` and `::application`.

pub use application;
pub use domain;
pub use infrastructure;
