//! Identifier types shared by the event log and the domain crates.

mod types;

pub use types::EntityId;
