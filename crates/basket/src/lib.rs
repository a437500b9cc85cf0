//! Command-line runner for the basket engine.
//!
//! Runs a script of basket commands through a [`BasketService`] and, after
//! each command, prints the whole event log and the resulting basket.

pub mod config;
pub mod error;
pub mod script;

use std::fmt::Write;

use common::EntityId;
use domain::{Basket, BasketEvent, BasketService, DomainEvent};
use event_log::LogStore;
use futures_util::StreamExt;

pub use config::Config;
pub use error::AppError;

/// Renders every entity's log, one line per event:
///
/// ```text
/// <entity id>:
///   BasketCreated { id = <entity id> }
///   ItemAdded { basketId = <entity id>, name = iPhone }
/// ```
pub async fn render_store<S: LogStore>(store: &S) -> Result<String, AppError> {
    let mut out = String::new();
    let mut entries = store.stream_entries().await?;

    while let Some(entry) = entries.next().await {
        let entry = entry?;
        writeln!(out, "{}:", entry.entity_id)?;
        for record in entry.events {
            let event = BasketEvent::decode(&record.event_type, record.payload)?;
            writeln!(out, "  {event}")?;
        }
    }

    Ok(out)
}

/// Runs `config.script` against a fresh basket id and returns the final basket.
///
/// Stops at the first failing command.
pub async fn run<S: LogStore>(
    config: &Config,
    service: &BasketService<S>,
) -> Result<Option<Basket>, AppError> {
    let basket_id = EntityId::new();
    let commands = script::parse_script(&config.script, basket_id)?;
    tracing::info!(%basket_id, commands = commands.len(), "running script");

    let mut last = None;
    for command in commands {
        let result = service.execute(command).await?;

        if config.dump_store {
            print!("{}", render_store(service.executor().store()).await?);
        }
        println!("==> Result: {}", result.state);
        last = Some(result.state);
    }

    Ok(last)
}
