use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EntityId, LogStoreError, Result};

/// Unique identifier for a stored event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
    /// Creates a new random event ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position of an event within its entity's log.
///
/// An entity with no events is at version 0; the first event recorded for
/// it carries version 1 and every later event increments by one. The
/// version of an entity is therefore also the length of its log.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Version(u64);

impl Version {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Version of an entity that has no events yet.
    pub fn initial() -> Self {
        Self(0)
    }

    /// Version carried by an entity's first event.
    pub fn first() -> Self {
        Self(1)
    }

    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Version reached after `len` events have been recorded.
    pub fn from_len(len: usize) -> Self {
        Self(len as u64)
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Version {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// An event as it sits in the log: the domain payload plus the metadata
/// needed to order and identify it.
///
/// Once appended a stored event is never modified; readers receive clones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredEvent {
    pub event_id: EventId,

    /// Name of the event variant (e.g. "BasketCreated", "ItemAdded").
    pub event_type: String,

    pub entity_id: EntityId,

    /// Version of the entity after this event.
    pub version: Version,

    /// When the event was recorded.
    pub recorded_at: DateTime<Utc>,

    /// The event payload as JSON.
    pub payload: serde_json::Value,
}

impl StoredEvent {
    pub fn builder() -> StoredEventBuilder {
        StoredEventBuilder::default()
    }
}

/// Builder for [`StoredEvent`].
#[derive(Debug, Default)]
pub struct StoredEventBuilder {
    event_id: Option<EventId>,
    event_type: Option<String>,
    entity_id: Option<EntityId>,
    version: Option<Version>,
    recorded_at: Option<DateTime<Utc>>,
    payload: Option<serde_json::Value>,
}

impl StoredEventBuilder {
    /// Sets the event ID. If not set, a new ID will be generated.
    pub fn event_id(mut self, id: EventId) -> Self {
        self.event_id = Some(id);
        self
    }

    pub fn event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = Some(event_type.into());
        self
    }

    pub fn entity_id(mut self, id: EntityId) -> Self {
        self.entity_id = Some(id);
        self
    }

    pub fn version(mut self, version: Version) -> Self {
        self.version = Some(version);
        self
    }

    /// Sets the record time. If not set, the current time will be used.
    pub fn recorded_at(mut self, recorded_at: DateTime<Utc>) -> Self {
        self.recorded_at = Some(recorded_at);
        self
    }

    /// Sets the payload from a serializable value.
    pub fn payload<T: Serialize>(mut self, payload: &T) -> Result<Self> {
        self.payload = Some(serde_json::to_value(payload)?);
        Ok(self)
    }

    /// Sets the payload from a raw JSON value.
    pub fn payload_raw(mut self, payload: serde_json::Value) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Builds the stored event, failing if a required field is missing.
    pub fn build(self) -> Result<StoredEvent> {
        Ok(StoredEvent {
            event_id: self.event_id.unwrap_or_default(),
            event_type: self.event_type.ok_or(LogStoreError::IncompleteRecord {
                field: "event_type",
            })?,
            entity_id: self
                .entity_id
                .ok_or(LogStoreError::IncompleteRecord { field: "entity_id" })?,
            version: self
                .version
                .ok_or(LogStoreError::IncompleteRecord { field: "version" })?,
            recorded_at: self.recorded_at.unwrap_or_else(Utc::now),
            payload: self
                .payload
                .ok_or(LogStoreError::IncompleteRecord { field: "payload" })?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_counts_from_zero() {
        assert_eq!(Version::initial().as_u64(), 0);
        assert_eq!(Version::initial().next(), Version::first());
        assert_eq!(Version::from_len(3), Version::new(3));
        assert!(Version::new(2) < Version::new(3));
    }

    #[test]
    fn builder_fills_defaults() {
        let entity_id = EntityId::new();
        let event = StoredEvent::builder()
            .event_type("ItemAdded")
            .entity_id(entity_id)
            .version(Version::first())
            .payload_raw(serde_json::json!({"name": "TV"}))
            .build()
            .unwrap();

        assert_eq!(event.event_type, "ItemAdded");
        assert_eq!(event.entity_id, entity_id);
        assert_eq!(event.version, Version::first());
        assert_eq!(event.payload["name"], "TV");
    }

    #[test]
    fn builder_reports_first_missing_field() {
        let err = StoredEvent::builder()
            .event_type("ItemAdded")
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            LogStoreError::IncompleteRecord { field: "entity_id" }
        ));
    }
}
