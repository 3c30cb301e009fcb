//! Shared types for Comanda
//!
//! Domain models, backend lookup tables and wire DTOs used by both the
//! client and the mock backend, plus the pure view derivations the screens
//! render (production board, sales report, menu sections, tab overview).

pub mod client;
pub mod input;
pub mod models;
pub mod util;
pub mod views;

// Re-exports
pub use input::InputError;
pub use models::{
    Category, ItemStatus, LineItem, MenuItem, MenuItemForm, NewMenuItem, PrepArea, Tab, TabStatus,
    User,
};
pub use rust_decimal::Decimal;
pub use serde::{Deserialize, Serialize};
