//! Data models
//!
//! Client-side view of server state. Built from the wire types in
//! [`crate::client`]; ids are kept as strings whatever the backend sends.

pub mod menu;
pub mod tab;
pub mod user;

// Re-exports
pub use menu::*;
pub use tab::*;
pub use user::*;
