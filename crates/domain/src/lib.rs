//! Domain layer for the basket event-sourcing engine.
//!
//! This crate provides:
//! - the `Aggregate` trait pairing a pure decide function with a pure evolve function
//! - the `Executor` that replays an entity's log, decides, and appends
//! - the basket aggregate with its commands, events and service

pub mod aggregate;
pub mod basket;
pub mod error;
pub mod executor;

pub use aggregate::{Aggregate, DomainEvent, EntityCommand};
pub use basket::{
    AddItem, Basket, BasketCommand, BasketCreatedData, BasketError, BasketEvent, BasketService,
    CreateBasket, ItemAddedData,
};
pub use error::{ContractViolation, DomainError};
pub use executor::{CommandResult, Executor};
