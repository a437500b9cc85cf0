//! Append-only event log.
//!
//! The log maps each entity id to the ordered sequence of events recorded
//! for it. Entries are only ever appended; nothing here interprets the
//! events, that is the domain layer's job.

pub mod error;
pub mod event;
pub mod memory;
pub mod store;

pub use common::EntityId;
pub use error::{LogStoreError, Result};
pub use event::{EventId, StoredEvent, StoredEventBuilder, Version};
pub use memory::InMemoryLogStore;
pub use store::{AppendOptions, EntryStream, LogEntry, LogStore, LogStoreExt};
