//! Basket aggregate implementation.

use common::EntityId;
use serde::{Deserialize, Serialize};

use crate::aggregate::{Aggregate, DomainEvent};
use crate::error::ContractViolation;

use super::{BasketCommand, BasketError, BasketEvent};

/// A shopping basket: its id and the names of the items added to it, in
/// the order they were added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Basket {
    id: EntityId,
    items: Vec<String>,
}

impl Aggregate for Basket {
    type Command = BasketCommand;
    type Event = BasketEvent;
    type Error = BasketError;

    fn aggregate_type() -> &'static str {
        "Basket"
    }

    fn decide(
        command: &BasketCommand,
        state: Option<&Self>,
    ) -> Result<Vec<BasketEvent>, BasketError> {
        match command {
            BasketCommand::Create(cmd) => {
                if state.is_some() {
                    return Err(BasketError::AlreadyExists {
                        basket_id: cmd.basket_id,
                    });
                }
                Ok(vec![BasketEvent::basket_created(cmd.basket_id)])
            }
            BasketCommand::AddItem(cmd) => {
                if state.is_none() {
                    return Err(BasketError::EntityNotFound {
                        basket_id: cmd.basket_id,
                    });
                }
                Ok(vec![BasketEvent::item_added(cmd.basket_id, cmd.name.clone())])
            }
        }
    }

    fn evolve(state: Option<Self>, event: &BasketEvent) -> Result<Self, ContractViolation> {
        match event {
            BasketEvent::BasketCreated(data) => Ok(Basket::empty(data.basket_id)),
            BasketEvent::ItemAdded(data) => {
                let basket = state.ok_or(ContractViolation::MutationOnAbsentState {
                    event_type: event.event_type(),
                })?;
                Ok(basket.with_item(data.name.clone()))
            }
        }
    }
}

impl Basket {
    fn empty(id: EntityId) -> Self {
        Self {
            id,
            items: Vec::new(),
        }
    }

    fn with_item(mut self, name: String) -> Self {
        self.items.push(name);
        self
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Item names in the order they were added.
    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

impl std::fmt::Display for Basket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Basket({}, items: [{}])", self.id, self.items.join(", "))
    }
}
