use std::pin::Pin;

use async_trait::async_trait;
use futures_core::Stream;

use crate::{EntityId, LogStoreError, Result, StoredEvent, Version};

/// Options for appending a batch to an entity's log.
#[derive(Debug, Clone, Default)]
pub struct AppendOptions {
    /// Version the caller observed when it read the log.
    /// If None, the batch is appended after whatever is there.
    pub expected_version: Option<Version>,
}

impl AppendOptions {
    /// Appends without checking the entity's current version.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends only if the entity is still at `version`.
    pub fn expect_version(version: Version) -> Self {
        Self {
            expected_version: Some(version),
        }
    }

    /// Appends only if the entity has no events yet.
    pub fn expect_new() -> Self {
        Self::expect_version(Version::initial())
    }
}

/// One entity's complete log, as handed out for inspection.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub entity_id: EntityId,
    pub events: Vec<StoredEvent>,
}

/// A stream of log entries.
pub type EntryStream = Pin<Box<dyn Stream<Item = Result<LogEntry>> + Send>>;

/// Storage behind the executor.
///
/// Implementations own the per-entity sequences. They must never drop or
/// reorder events that were already appended, and an append either records
/// the whole batch in order or nothing at all.
#[async_trait]
pub trait LogStore: Send + Sync {
    /// Returns every event recorded for `entity_id`, oldest first.
    ///
    /// An unknown entity yields an empty vector.
    async fn read_events(&self, entity_id: EntityId) -> Result<Vec<StoredEvent>>;

    /// Appends `events` to the log of `entity_id`.
    ///
    /// Fails with `Conflict` if `options.expected_version` is set and no
    /// longer matches. Returns the entity's version after the append.
    async fn append_events(
        &self,
        entity_id: EntityId,
        events: Vec<StoredEvent>,
        options: AppendOptions,
    ) -> Result<Version>;

    /// Returns the current version of an entity, or None if it has no events.
    async fn entity_version(&self, entity_id: EntityId) -> Result<Option<Version>>;

    /// Streams every entity's log in the order the entities first appeared.
    ///
    /// The stream works on a copy; nothing in the store is mutated.
    async fn stream_entries(&self) -> Result<EntryStream>;
}

/// Convenience methods available on every log store.
#[async_trait]
pub trait LogStoreExt: LogStore {
    /// Checks whether an entity has any events.
    async fn entity_exists(&self, entity_id: EntityId) -> Result<bool> {
        Ok(self.entity_version(entity_id).await?.is_some())
    }

    /// Appends a single event.
    async fn append_event(
        &self,
        entity_id: EntityId,
        event: StoredEvent,
        options: AppendOptions,
    ) -> Result<Version> {
        self.append_events(entity_id, vec![event], options).await
    }
}

impl<T: LogStore + ?Sized> LogStoreExt for T {}

/// Checks that a batch belongs to `entity_id` and continues its log
/// contiguously from `current`.
pub fn validate_batch(
    entity_id: EntityId,
    current: Version,
    events: &[StoredEvent],
) -> Result<()> {
    if events.is_empty() {
        return Err(LogStoreError::InvalidBatch(
            "cannot append an empty batch".to_string(),
        ));
    }

    let mut expected = current;
    for event in events {
        if event.entity_id != entity_id {
            return Err(LogStoreError::InvalidBatch(format!(
                "event {} belongs to entity {}, not {}",
                event.event_id, event.entity_id, entity_id
            )));
        }
        expected = expected.next();
        if event.version != expected {
            return Err(LogStoreError::InvalidBatch(format!(
                "versions must continue the log: expected {}, got {}",
                expected, event.version
            )));
        }
    }

    Ok(())
}
