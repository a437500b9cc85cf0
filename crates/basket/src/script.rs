//! Parsing of `;`-separated command scripts.
//!
//! ```text
//! create; add iPhone; add TV
//! ```
//!
//! Every command in a script targets the same basket.

use common::EntityId;
use domain::{AddItem, BasketCommand, ContractViolation, CreateBasket};

use crate::error::AppError;

/// Parses `script` into commands against `basket_id`.
///
/// Blank steps are skipped. An unknown verb is reported as
/// `UnhandledCommandKind`.
pub fn parse_script(script: &str, basket_id: EntityId) -> Result<Vec<BasketCommand>, AppError> {
    script
        .split(';')
        .enumerate()
        .map(|(i, step)| (i + 1, step.trim()))
        .filter(|(_, step)| !step.is_empty())
        .map(|(line, step)| parse_step(line, step, basket_id))
        .collect()
}

fn parse_step(line: usize, step: &str, basket_id: EntityId) -> Result<BasketCommand, AppError> {
    let (verb, rest) = step
        .split_once(char::is_whitespace)
        .map_or((step, ""), |(verb, rest)| (verb, rest.trim()));

    match verb.to_ascii_lowercase().as_str() {
        "create" => Ok(CreateBasket::new(basket_id).into()),
        "add" if rest.is_empty() => Err(AppError::Script {
            line,
            message: "`add` needs an item name".to_string(),
        }),
        "add" => Ok(AddItem::new(basket_id, rest).into()),
        _ => Err(ContractViolation::UnhandledCommandKind(verb.to_string()).into()),
    }
}
