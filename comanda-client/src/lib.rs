//! Comanda Client - data store and HTTP client for the restaurant backend
//!
//! Authenticates against the backend, mirrors the catalog and open tabs
//! in an [`AppStore`], and forwards every mutation as one REST call
//! followed by a reload.

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod notice;
pub mod store;

pub use api::{RestaurantApi, Rows};
pub use config::{ClientConfig, Platform};
pub use error::{ClientError, ClientResult};
pub use http::{HttpClient, NetworkHttpClient};
pub use notice::{Action, alert_message};
pub use store::{AppStore, Outcome, RefreshReport, Snapshot};

// Re-export shared types for convenience
pub use shared::models::{Category, ItemStatus, MenuItem, MenuItemForm, PrepArea, Tab, User};
