//! Basket aggregate and related types.

mod aggregate;
mod commands;
mod events;
mod service;

pub use aggregate::Basket;
pub use commands::{AddItem, BasketCommand, CreateBasket};
pub use events::{BasketCreatedData, BasketEvent, ItemAddedData};
pub use service::BasketService;

use common::EntityId;
use thiserror::Error;

/// Reasons a basket command is rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BasketError {
    /// The command targets a basket with no history.
    #[error("Basket not found: {basket_id}")]
    EntityNotFound { basket_id: EntityId },

    /// A basket with this id has already been created.
    #[error("Basket already exists: {basket_id}")]
    AlreadyExists { basket_id: EntityId },
}
