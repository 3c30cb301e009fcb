//! Wire types for the restaurant REST API
//!
//! Request/response bodies exactly as the backend spells them. These types
//! are shared between comanda-mock and comanda-client; the domain models in
//! [`crate::models`] are built from them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::util::{de_id, ser_id};

// =============================================================================
// Auth API DTOs
// =============================================================================

/// `POST /login`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    #[serde(rename = "senha")]
    pub password: String,
}

/// `POST /register`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "senha")]
    pub password: String,
}

/// Response of both login and registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: UserDto,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDto {
    #[serde(deserialize_with = "de_id", serialize_with = "ser_id")]
    pub id: String,
    #[serde(rename = "nome", alias = "name")]
    pub name: String,
    pub email: String,
}

// =============================================================================
// Catalog (cardápio) DTOs
// =============================================================================

/// Catalog entry as listed by `GET /cardapio`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(deserialize_with = "de_id", serialize_with = "ser_id")]
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "descricao", default)]
    pub description: Option<String>,
    #[serde(rename = "preco")]
    pub price: Decimal,
    /// Backend item type, `PRATO` or `BEBIDA`
    #[serde(rename = "tipo")]
    pub kind: String,
}

/// `POST /cardapio`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogCreate {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "preco", with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(rename = "tipo")]
    pub kind: String,
}

// =============================================================================
// Tab (comanda) DTOs
// =============================================================================

/// Row of `GET /comandas/abertas` (and `/comandas/fechadas`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TabSummary {
    #[serde(deserialize_with = "de_id", serialize_with = "ser_id")]
    pub id: String,
    #[serde(rename = "numeroMesa", deserialize_with = "de_id", serialize_with = "ser_id")]
    pub table_number: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// `GET /comandas/{id}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TabDetail {
    #[serde(rename = "itens", default)]
    pub items: Vec<OrderEntry>,
    /// Server-computed total, trusted as-is
    #[serde(rename = "valorTotal", default)]
    pub total: Option<Decimal>,
}

/// Line item (pedido) inside a tab detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderEntry {
    #[serde(deserialize_with = "de_id", serialize_with = "ser_id")]
    pub id: String,
    #[serde(rename = "itemCardapioId", deserialize_with = "de_id", serialize_with = "ser_id")]
    pub menu_item_id: String,
    #[serde(rename = "quantidade")]
    pub quantity: u32,
    pub status: String,
    #[serde(rename = "observacao", default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Explicit area (`COZINHA` / `COPA`) when the backend stores one
    #[serde(rename = "areaPreparo", default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    /// Menu item snapshot taken when the line was added
    #[serde(rename = "itemCardapio", default, skip_serializing_if = "Option::is_none")]
    pub menu_item: Option<CatalogEntry>,
}

/// `POST /comandas`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenTabRequest {
    #[serde(rename = "numeroMesa")]
    pub table_number: u32,
}

/// `POST /comandas/{id}/adicionar`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddItemRequest {
    #[serde(rename = "itemCardapioId", deserialize_with = "de_id", serialize_with = "ser_id")]
    pub menu_item_id: String,
    #[serde(rename = "quantidade")]
    pub quantity: u32,
    #[serde(rename = "observacao", default)]
    pub note: Option<String>,
}

/// `PUT /pedidos/{id}/status`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

// =============================================================================
// Errors
// =============================================================================

/// Error body returned by the backend on non-2xx responses
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorBody {
    /// The human-readable text, preferring `message` over `error`.
    pub fn text(&self) -> Option<&str> {
        self.message
            .as_deref()
            .or(self.error.as_deref())
            .filter(|s| !s.trim().is_empty())
    }
}
