//! Core aggregate, command and domain event traits.

use common::EntityId;
use serde::{Serialize, de::DeserializeOwned};

use crate::error::{ContractViolation, DomainError};

/// Trait for domain events.
///
/// Domain events are facts that have happened. They are immutable and named
/// in past tense.
pub trait DomainEvent: Serialize + DeserializeOwned + Send + Sync + Clone {
    /// Returns the event type name stored alongside the payload.
    fn event_type(&self) -> &'static str;

    /// Every event type name this event enum can decode.
    fn event_types() -> &'static [&'static str];

    /// Decodes a stored payload.
    ///
    /// Fails with `UnhandledEventKind` when `event_type` is not one of
    /// [`event_types`](DomainEvent::event_types), and with `EventTypeMismatch`
    /// when the payload decodes to a different event.
    fn decode(event_type: &str, payload: serde_json::Value) -> Result<Self, DomainError> {
        if !Self::event_types().contains(&event_type) {
            return Err(ContractViolation::UnhandledEventKind(event_type.to_string()).into());
        }
        let event: Self = serde_json::from_value(payload)?;
        if event.event_type() != event_type {
            return Err(ContractViolation::EventTypeMismatch {
                recorded: event_type.to_string(),
                decoded: event.event_type(),
            }
            .into());
        }
        Ok(event)
    }
}

/// Trait for commands.
///
/// Commands are requests to change an entity. Each one names the entity it
/// targets and is consumed once by the decide function.
pub trait EntityCommand: Send + Sync {
    /// Returns the ID of the entity this command targets.
    fn entity_id(&self) -> EntityId;

    /// Returns the command type name, used for logging and metrics.
    fn command_type(&self) -> &'static str;
}

/// Trait for event-sourced aggregates.
///
/// The implementing type is the aggregate's state. It is never stored; it
/// only exists as the result of folding the entity's events through
/// [`evolve`](Aggregate::evolve), starting from no state at all.
///
/// Both functions must be pure and deterministic:
/// - `decide` looks at a command and the current state and returns the
///   events that describe its effect, or rejects it
/// - `evolve` derives the next state from a state and one event
pub trait Aggregate: Clone + Send + Sync + Sized + 'static {
    type Command: EntityCommand;

    type Event: DomainEvent;

    /// Business rejections returned by `decide`.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns the aggregate type name.
    fn aggregate_type() -> &'static str;

    /// Validates `command` against `state` and returns the resulting events,
    /// in the order they must be applied.
    ///
    /// `state` is None when the entity has no history.
    fn decide(
        command: &Self::Command,
        state: Option<&Self>,
    ) -> Result<Vec<Self::Event>, Self::Error>;

    /// Applies one event, producing the next state.
    ///
    /// `state` is None only for the first event of an entity's life.
    fn evolve(state: Option<Self>, event: &Self::Event) -> Result<Self, ContractViolation>;

    /// Folds `events` left to right onto `state`.
    fn fold<'a>(
        state: Option<Self>,
        events: impl IntoIterator<Item = &'a Self::Event>,
    ) -> Result<Option<Self>, ContractViolation>
    where
        Self::Event: 'a,
    {
        events
            .into_iter()
            .try_fold(state, |state, event| Self::evolve(state, event).map(Some))
    }
}
