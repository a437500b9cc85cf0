//! Basket commands.

use common::EntityId;

use crate::aggregate::EntityCommand;

/// Command to create a new, empty basket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateBasket {
    pub basket_id: EntityId,
}

impl CreateBasket {
    pub fn new(basket_id: EntityId) -> Self {
        Self { basket_id }
    }

    /// Creates a CreateBasket command with a freshly generated basket ID.
    pub fn with_new_id() -> Self {
        Self::new(EntityId::new())
    }
}

/// Command to add an item to an existing basket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddItem {
    pub basket_id: EntityId,

    /// Name of the item, e.g. "iPhone".
    pub name: String,
}

impl AddItem {
    pub fn new(basket_id: EntityId, name: impl Into<String>) -> Self {
        Self {
            basket_id,
            name: name.into(),
        }
    }
}

/// Every command the basket aggregate decides on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BasketCommand {
    Create(CreateBasket),
    AddItem(AddItem),
}

impl EntityCommand for BasketCommand {
    fn entity_id(&self) -> EntityId {
        match self {
            BasketCommand::Create(cmd) => cmd.basket_id,
            BasketCommand::AddItem(cmd) => cmd.basket_id,
        }
    }

    fn command_type(&self) -> &'static str {
        match self {
            BasketCommand::Create(_) => "CreateBasket",
            BasketCommand::AddItem(_) => "AddItem",
        }
    }
}

impl From<CreateBasket> for BasketCommand {
    fn from(cmd: CreateBasket) -> Self {
        BasketCommand::Create(cmd)
    }
}

impl From<AddItem> for BasketCommand {
    fn from(cmd: AddItem) -> Self {
        BasketCommand::AddItem(cmd)
    }
}
