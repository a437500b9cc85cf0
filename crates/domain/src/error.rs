//! Domain error types.

use common::EntityId;
use event_log::LogStoreError;
use thiserror::Error;

use crate::basket::BasketError;

/// Errors that can occur while executing a command.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The log store failed; nothing was appended.
    #[error("Log store error: {0}")]
    LogStore(#[from] LogStoreError),

    /// The basket rejected the command.
    #[error("Basket error: {0}")]
    Basket(#[from] BasketError),

    /// Decide and evolve disagree about what can happen.
    #[error("Contract violation: {0}")]
    Contract(#[from] ContractViolation),

    /// A stored payload could not be decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Broken invariants between the decide and evolve functions.
///
/// None of these occur in a correct program. They abort the command and are
/// never recovered from.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContractViolation {
    /// A command kind no decide function knows about.
    #[error("Unhandled command kind: {0}")]
    UnhandledCommandKind(String),

    /// A stored event kind no evolve function knows about.
    #[error("Unhandled event kind: {0}")]
    UnhandledEventKind(String),

    /// A stored record's event type names a different event than its payload.
    #[error("Record labelled {recorded} holds a {decoded} payload")]
    EventTypeMismatch {
        recorded: String,
        decoded: &'static str,
    },

    /// A mutation event was applied before the entity was created.
    #[error("{event_type} applied to an entity that does not exist")]
    MutationOnAbsentState { event_type: &'static str },

    /// A command completed without the entity having any state.
    #[error("No state produced for entity {entity_id}")]
    NoStateProduced { entity_id: EntityId },
}
