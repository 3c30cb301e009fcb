//! Typed endpoints of the restaurant backend

use serde::de::DeserializeOwned;
use shared::client::{
    AddItemRequest, AuthResponse, CatalogCreate, CatalogEntry, LoginRequest, OpenTabRequest,
    RegisterRequest, StatusUpdateRequest, TabDetail, TabSummary,
};
use shared::input;
use shared::models::ItemStatus;
use tracing::warn;

use crate::ClientResult;
use crate::http::{HttpClient, NetworkHttpClient};

/// A list response decoded one row at a time
#[derive(Debug, Clone, PartialEq)]
pub struct Rows<T> {
    pub rows: Vec<T>,
    /// Rows that did not decode and were left out
    pub rejected: usize,
}

impl<T: DeserializeOwned> Rows<T> {
    /// One malformed row costs that row, not the list.
    pub fn decode(raw: Vec<serde_json::Value>, list: &'static str) -> Self {
        let mut rejected = 0;
        let rows = raw
            .into_iter()
            .filter_map(|value| match serde_json::from_value(value) {
                Ok(row) => Some(row),
                Err(e) => {
                    warn!(list, error = %e, "Skipping malformed row");
                    rejected += 1;
                    None
                }
            })
            .collect();
        Self { rows, rejected }
    }
}

/// One method per backend route. No state besides the HTTP client.
///
/// Ids placed in a path must pass [`input::require_id`]; anything else is
/// refused with [`ClientError::Input`](crate::ClientError::Input) before a
/// request is built.
#[derive(Debug, Clone)]
pub struct RestaurantApi<C: HttpClient = NetworkHttpClient> {
    http: C,
}

impl<C: HttpClient> RestaurantApi<C> {
    pub fn new(http: C) -> Self {
        Self { http }
    }

    pub fn http(&self) -> &C {
        &self.http
    }

    // ========== Auth ==========

    pub async fn login(&self, email: &str, password: &str) -> ClientResult<AuthResponse> {
        let req = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.http.post("/login", &req).await
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> ClientResult<AuthResponse> {
        let req = RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        self.http.post("/register", &req).await
    }

    // ========== Catalog ==========

    pub async fn catalog(&self) -> ClientResult<Vec<CatalogEntry>> {
        self.http.get("/cardapio").await
    }

    pub async fn create_catalog_entry(&self, entry: &CatalogCreate) -> ClientResult<()> {
        self.http.post_unit("/cardapio", entry).await
    }

    pub async fn delete_catalog_entry(&self, id: &str) -> ClientResult<()> {
        let id = input::require_id("menu item", id)?;
        self.http.delete(&format!("/cardapio/{}", id)).await
    }

    // ========== Tabs ==========

    pub async fn open_tabs(&self) -> ClientResult<Rows<TabSummary>> {
        let raw = self.http.get("/comandas/abertas").await?;
        Ok(Rows::decode(raw, "open tabs"))
    }

    /// Not part of the observed contract; only called when enabled in config.
    pub async fn closed_tabs(&self) -> ClientResult<Rows<TabSummary>> {
        let raw = self.http.get("/comandas/fechadas").await?;
        Ok(Rows::decode(raw, "closed tabs"))
    }

    pub async fn tab_detail(&self, tab_id: &str) -> ClientResult<TabDetail> {
        let tab_id = input::require_id("tab", tab_id)?;
        self.http.get(&format!("/comandas/{}", tab_id)).await
    }

    pub async fn open_tab(&self, table_number: u32) -> ClientResult<()> {
        self.http
            .post_unit("/comandas", &OpenTabRequest { table_number })
            .await
    }

    pub async fn add_item(
        &self,
        tab_id: &str,
        menu_item_id: &str,
        quantity: u32,
        note: Option<String>,
    ) -> ClientResult<()> {
        let tab_id = input::require_id("tab", tab_id)?;
        let req = AddItemRequest {
            menu_item_id: menu_item_id.to_string(),
            quantity,
            note,
        };
        self.http
            .post_unit(&format!("/comandas/{}/adicionar", tab_id), &req)
            .await
    }

    pub async fn update_item_status(&self, item_id: &str, status: ItemStatus) -> ClientResult<()> {
        let item_id = input::require_id("item", item_id)?;
        let req = StatusUpdateRequest {
            status: status.backend_status().to_string(),
        };
        self.http
            .put_unit(&format!("/pedidos/{}/status", item_id), &req)
            .await
    }

    pub async fn close_tab(&self, tab_id: &str) -> ClientResult<()> {
        let tab_id = input::require_id("tab", tab_id)?;
        self.http
            .put_empty(&format!("/comandas/{}/fechar", tab_id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bad_row_does_not_sink_the_list() {
        let raw = vec![
            json!({"id": 1, "numeroMesa": 5, "createdAt": "2024-05-10T19:30:00Z"}),
            json!({"id": 2, "numeroMesa": 6, "createdAt": "ontem"}),
            json!({"id": 3, "numeroMesa": "7", "createdAt": "2024-05-10T20:05:00.000Z"}),
        ];

        let decoded = Rows::<TabSummary>::decode(raw, "open tabs");
        assert_eq!(decoded.rejected, 1);
        let ids: Vec<&str> = decoded.rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert_eq!(decoded.rows[1].table_number, "7");
    }
}
