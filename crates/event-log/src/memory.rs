use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    EntityId, LogStoreError, Result, StoredEvent, Version,
    store::{AppendOptions, EntryStream, LogEntry, LogStore, validate_batch},
};

#[derive(Default)]
struct Logs {
    /// Entities in the order their first event was appended.
    order: Vec<EntityId>,
    by_entity: HashMap<EntityId, Vec<StoredEvent>>,
}

/// In-memory log store.
///
/// Cloning the store hands out another handle to the same logs.
#[derive(Clone, Default)]
pub struct InMemoryLogStore {
    logs: Arc<RwLock<Logs>>,
}

impl InMemoryLogStore {
    /// Creates a new empty in-memory log store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of events stored across all entities.
    pub async fn event_count(&self) -> usize {
        self.logs
            .read()
            .await
            .by_entity
            .values()
            .map(Vec::len)
            .sum()
    }

    /// Returns the number of entities with at least one event.
    pub async fn entity_count(&self) -> usize {
        self.logs.read().await.order.len()
    }
}

#[async_trait]
impl LogStore for InMemoryLogStore {
    async fn read_events(&self, entity_id: EntityId) -> Result<Vec<StoredEvent>> {
        let logs = self.logs.read().await;
        Ok(logs.by_entity.get(&entity_id).cloned().unwrap_or_default())
    }

    async fn append_events(
        &self,
        entity_id: EntityId,
        events: Vec<StoredEvent>,
        options: AppendOptions,
    ) -> Result<Version> {
        let mut logs = self.logs.write().await;

        let current = logs
            .by_entity
            .get(&entity_id)
            .map_or(Version::initial(), |log| Version::from_len(log.len()));

        if let Some(expected) = options.expected_version
            && current != expected
        {
            return Err(LogStoreError::Conflict {
                entity_id,
                expected,
                actual: current,
            });
        }

        // A batch numbered from an older version raced with another writer.
        if let Some(first) = events.first()
            && first.version <= current
        {
            return Err(LogStoreError::Conflict {
                entity_id,
                expected: options.expected_version.unwrap_or(current),
                actual: current,
            });
        }

        validate_batch(entity_id, current, &events)?;

        let appended = events.len();
        let new_version = Version::from_len(current.as_u64() as usize + appended);

        if !logs.by_entity.contains_key(&entity_id) {
            logs.order.push(entity_id);
        }
        logs.by_entity.entry(entity_id).or_default().extend(events);

        tracing::debug!(%entity_id, appended, %new_version, "appended events");
        Ok(new_version)
    }

    async fn entity_version(&self, entity_id: EntityId) -> Result<Option<Version>> {
        let logs = self.logs.read().await;
        Ok(logs
            .by_entity
            .get(&entity_id)
            .map(|log| Version::from_len(log.len())))
    }

    async fn stream_entries(&self) -> Result<EntryStream> {
        use futures_util::stream;

        let logs = self.logs.read().await;
        let entries: Vec<LogEntry> = logs
            .order
            .iter()
            .map(|entity_id| LogEntry {
                entity_id: *entity_id,
                events: logs.by_entity.get(entity_id).cloned().unwrap_or_default(),
            })
            .collect();

        Ok(Box::pin(stream::iter(entries.into_iter().map(Ok))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LogStoreExt;

    fn test_event(entity_id: EntityId, version: u64, event_type: &str) -> StoredEvent {
        StoredEvent::builder()
            .entity_id(entity_id)
            .event_type(event_type)
            .version(Version::new(version))
            .payload_raw(serde_json::json!({"n": version}))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn unknown_entity_reads_empty() {
        let store = InMemoryLogStore::new();
        let events = store.read_events(EntityId::new()).await.unwrap();
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn append_then_read_in_order() {
        let store = InMemoryLogStore::new();
        let id = EntityId::new();

        let version = store
            .append_events(
                id,
                vec![test_event(id, 1, "A"), test_event(id, 2, "B")],
                AppendOptions::expect_new(),
            )
            .await
            .unwrap();
        assert_eq!(version, Version::new(2));

        store
            .append_event(id, test_event(id, 3, "C"), AppendOptions::expect_version(version))
            .await
            .unwrap();

        let types: Vec<_> = store
            .read_events(id)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.event_type)
            .collect();
        assert_eq!(types, vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn stale_expected_version_conflicts() {
        let store = InMemoryLogStore::new();
        let id = EntityId::new();
        store
            .append_events(id, vec![test_event(id, 1, "A")], AppendOptions::expect_new())
            .await
            .unwrap();

        let result = store
            .append_events(id, vec![test_event(id, 2, "B")], AppendOptions::expect_new())
            .await;

        assert!(matches!(
            result,
            Err(LogStoreError::Conflict { expected, actual, .. })
                if expected == Version::initial() && actual == Version::first()
        ));
        assert_eq!(store.read_events(id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn stale_batch_without_expectation_conflicts() {
        let store = InMemoryLogStore::new();
        let id = EntityId::new();
        store
            .append_events(id, vec![test_event(id, 1, "A")], AppendOptions::new())
            .await
            .unwrap();

        let result = store
            .append_events(id, vec![test_event(id, 1, "B")], AppendOptions::new())
            .await;
        assert!(matches!(result, Err(LogStoreError::Conflict { .. })));
    }

    #[tokio::test]
    async fn invalid_batch_appends_nothing() {
        let store = InMemoryLogStore::new();
        let id = EntityId::new();

        let result = store
            .append_events(
                id,
                vec![test_event(id, 1, "A"), test_event(id, 3, "C")],
                AppendOptions::expect_new(),
            )
            .await;

        assert!(matches!(result, Err(LogStoreError::InvalidBatch(_))));
        assert_eq!(store.event_count().await, 0);
        assert!(!store.entity_exists(id).await.unwrap());
    }

    #[tokio::test]
    async fn entity_version_tracks_length() {
        let store = InMemoryLogStore::new();
        let id = EntityId::new();
        assert_eq!(store.entity_version(id).await.unwrap(), None);

        store
            .append_events(
                id,
                vec![test_event(id, 1, "A"), test_event(id, 2, "B")],
                AppendOptions::new(),
            )
            .await
            .unwrap();
        assert_eq!(store.entity_version(id).await.unwrap(), Some(Version::new(2)));
    }

    #[tokio::test]
    async fn entries_stream_in_first_append_order() {
        use futures_util::StreamExt;

        let store = InMemoryLogStore::new();
        let first = EntityId::new();
        let second = EntityId::new();

        store
            .append_event(first, test_event(first, 1, "A"), AppendOptions::new())
            .await
            .unwrap();
        store
            .append_event(second, test_event(second, 1, "A"), AppendOptions::new())
            .await
            .unwrap();
        store
            .append_event(first, test_event(first, 2, "B"), AppendOptions::new())
            .await
            .unwrap();

        let entries: Vec<LogEntry> = store
            .stream_entries()
            .await
            .unwrap()
            .map(|entry| entry.unwrap())
            .collect()
            .await;

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].entity_id, first);
        assert_eq!(entries[0].events.len(), 2);
        assert_eq!(entries[1].entity_id, second);
        assert_eq!(store.entity_count().await, 2);
    }
}
