//! Basket domain events.

use common::EntityId;
use serde::{Deserialize, Serialize};

use crate::aggregate::DomainEvent;

/// Events that can occur on a basket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum BasketEvent {
    /// Basket was created empty.
    BasketCreated(BasketCreatedData),

    /// Item was appended to the basket.
    ItemAdded(ItemAddedData),
}

impl DomainEvent for BasketEvent {
    fn event_type(&self) -> &'static str {
        match self {
            BasketEvent::BasketCreated(_) => "BasketCreated",
            BasketEvent::ItemAdded(_) => "ItemAdded",
        }
    }

    fn event_types() -> &'static [&'static str] {
        &["BasketCreated", "ItemAdded"]
    }
}

/// Data for BasketCreated event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasketCreatedData {
    pub basket_id: EntityId,
}

/// Data for ItemAdded event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAddedData {
    pub basket_id: EntityId,
    pub name: String,
}

impl BasketEvent {
    /// Creates a BasketCreated event.
    pub fn basket_created(basket_id: EntityId) -> Self {
        BasketEvent::BasketCreated(BasketCreatedData { basket_id })
    }

    /// Creates an ItemAdded event.
    pub fn item_added(basket_id: EntityId, name: impl Into<String>) -> Self {
        BasketEvent::ItemAdded(ItemAddedData {
            basket_id,
            name: name.into(),
        })
    }
}

impl std::fmt::Display for BasketEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BasketEvent::BasketCreated(data) => {
                write!(f, "BasketCreated {{ id = {} }}", data.basket_id)
            }
            BasketEvent::ItemAdded(data) => write!(
                f,
                "ItemAdded {{ basketId = {}, name = {} }}",
                data.basket_id, data.name
            ),
        }
    }
}
