//! Form input parsing
//!
//! Screens collect free text; these helpers turn it into typed values before
//! any request is attempted.

use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

/// Client-side validation failure. Nothing is sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("table number must be numeric: {0:?}")]
    TableNumber(String),

    #[error("invalid price: {0:?}")]
    Price(String),

    #[error("invalid quantity: {0:?}")]
    Quantity(String),

    #[error("unknown {field}: {value:?}")]
    UnknownValue { field: &'static str, value: String },

    #[error("{field} id is not valid: {value:?}")]
    Id { field: &'static str, value: String },
}

/// Non-blank check; returns the trimmed value.
pub fn require<'a>(field: &'static str, value: &'a str) -> Result<&'a str, InputError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(InputError::Missing(field));
    }
    Ok(trimmed)
}

/// Backend id that is safe to place in a URL path: letters, digits and `-._~`.
pub fn require_id<'a>(field: &'static str, value: &'a str) -> Result<&'a str, InputError> {
    let id = require(field, value)?;
    let safe = id
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~'));
    if !safe || id == "." || id == ".." {
        return Err(InputError::Id {
            field,
            value: id.to_string(),
        });
    }
    Ok(id)
}

/// Parse a price typed by staff. Accepts `,` as decimal separator.
pub fn parse_price(text: &str) -> Result<Decimal, InputError> {
    let raw = require("price", text)?;
    let normalized = raw.replace(',', ".");
    let price = Decimal::from_str(&normalized).map_err(|_| InputError::Price(raw.to_string()))?;
    if price <= Decimal::ZERO {
        return Err(InputError::Price(raw.to_string()));
    }
    Ok(price)
}

/// Parse a table number: non-empty, digits only.
pub fn parse_table_number(text: &str) -> Result<u32, InputError> {
    let raw = require("table number", text)?;
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(InputError::TableNumber(raw.to_string()));
    }
    raw.parse()
        .map_err(|_| InputError::TableNumber(raw.to_string()))
}

/// Parse a quantity (at least one unit).
pub fn parse_quantity(text: &str) -> Result<u32, InputError> {
    let raw = require("quantity", text)?;
    match raw.parse::<u32>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(InputError::Quantity(raw.to_string())),
    }
}
