//! Basket service providing a simplified API for basket operations.

use common::EntityId;
use event_log::LogStore;

use crate::error::DomainError;
use crate::executor::{CommandResult, Executor};

use super::{AddItem, Basket, BasketCommand, CreateBasket};

/// Service for managing baskets.
///
/// Wraps an [`Executor`] over the basket aggregate.
pub struct BasketService<S: LogStore> {
    executor: Executor<S, Basket>,
}

impl<S: LogStore> BasketService<S> {
    /// Creates a new basket service with the given log store.
    pub fn new(store: S) -> Self {
        Self {
            executor: Executor::new(store),
        }
    }

    /// Returns a reference to the underlying executor.
    pub fn executor(&self) -> &Executor<S, Basket> {
        &self.executor
    }

    /// Creates a new, empty basket.
    #[tracing::instrument(skip(self))]
    pub async fn create_basket(
        &self,
        cmd: CreateBasket,
    ) -> Result<CommandResult<Basket>, DomainError> {
        self.executor.execute(cmd.into()).await
    }

    /// Adds an item to an existing basket.
    #[tracing::instrument(skip(self))]
    pub async fn add_item(&self, cmd: AddItem) -> Result<CommandResult<Basket>, DomainError> {
        self.executor.execute(cmd.into()).await
    }

    /// Executes any basket command.
    #[tracing::instrument(skip(self))]
    pub async fn execute(
        &self,
        cmd: BasketCommand,
    ) -> Result<CommandResult<Basket>, DomainError> {
        self.executor.execute(cmd).await
    }

    /// Gets a basket by folding its log, without executing a command.
    #[tracing::instrument(skip(self))]
    pub async fn get_basket(&self, basket_id: EntityId) -> Result<Option<Basket>, DomainError> {
        self.executor.load(basket_id).await
    }
}
