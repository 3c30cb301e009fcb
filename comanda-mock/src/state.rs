//! In-memory backend state
//!
//! One mutex around all restaurant data; handlers hold it only for the
//! duration of a single operation. Failure switches and the request log
//! let tests steer and observe the backend.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shared::client::{
    AuthResponse, CatalogCreate, CatalogEntry, OrderEntry, TabDetail, TabSummary, UserDto,
};
use shared::models::{Category, ItemStatus, TYPE_DISH, TYPE_DRINK};

use crate::error::{MockError, MockResult};

/// Seeded login: `joao@restaurante.com` / `123456`
pub const SEED_EMAIL: &str = "joao@restaurante.com";
pub const SEED_PASSWORD: &str = "123456";

/// A request as seen by the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
}

#[derive(Debug, Clone)]
struct UserRecord {
    id: i64,
    name: String,
    email: String,
    password: String,
}

impl UserRecord {
    fn dto(&self) -> UserDto {
        UserDto {
            id: self.id.to_string(),
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

#[derive(Debug, Clone)]
struct OrderRecord {
    id: i64,
    /// Catalog entry as it was when the line was added
    menu_item: CatalogEntry,
    quantity: u32,
    status: ItemStatus,
    note: Option<String>,
}

impl OrderRecord {
    fn entry(&self) -> OrderEntry {
        let area = Category::from_backend_type(&self.menu_item.kind).prep_area();
        OrderEntry {
            id: self.id.to_string(),
            menu_item_id: self.menu_item.id.clone(),
            quantity: self.quantity,
            status: self.status.backend_status().to_string(),
            note: self.note.clone(),
            area: Some(area.backend_area().to_string()),
            menu_item: Some(self.menu_item.clone()),
        }
    }

    fn value(&self) -> Decimal {
        self.menu_item.price * Decimal::from(self.quantity)
    }
}

#[derive(Debug, Clone)]
struct TabRecord {
    id: i64,
    table: u32,
    created_at: DateTime<Utc>,
    closed: bool,
    items: Vec<OrderRecord>,
}

impl TabRecord {
    fn summary(&self) -> TabSummary {
        TabSummary {
            id: self.id.to_string(),
            table_number: self.table.to_string(),
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Default)]
struct Data {
    next_id: i64,
    users: Vec<UserRecord>,
    tokens: HashMap<String, i64>,
    catalog: Vec<CatalogEntry>,
    tabs: Vec<TabRecord>,
}

impl Data {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn issue_token(&mut self, user_id: i64) -> String {
        let token = uuid::Uuid::new_v4().simple().to_string();
        self.tokens.insert(token.clone(), user_id);
        token
    }

    fn tab_mut(&mut self, id: &str) -> MockResult<&mut TabRecord> {
        self.tabs
            .iter_mut()
            .find(|t| t.id.to_string() == id)
            .ok_or_else(|| MockError::NotFound(format!("Comanda {} não encontrada", id)))
    }
}

/// Shared backend state
#[derive(Debug)]
pub struct AppState {
    data: Mutex<Data>,
    requests: Mutex<Vec<RecordedRequest>>,
    failing_details: Mutex<HashSet<String>>,
    catalog_down: AtomicBool,
    tab_lists_down: AtomicBool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::seeded()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

fn seed_entry(id: i64, name: &str, description: &str, cents: i64, kind: &str) -> CatalogEntry {
    CatalogEntry {
        id: id.to_string(),
        name: name.to_string(),
        description: Some(description.to_string()),
        price: Decimal::new(cents, 2),
        kind: kind.to_string(),
    }
}

impl AppState {
    /// State with the demo user and the four demo menu items
    pub fn seeded() -> Self {
        let catalog = vec![
            seed_entry(1, "Salada Caesar", "Alface, croutons, parmesão e molho caesar", 2890, TYPE_DISH),
            seed_entry(2, "Filé Mignon ao Molho Madeira", "Filé mignon grelhado com molho madeira", 8990, TYPE_DISH),
            seed_entry(3, "Petit Gateau", "Bolo de chocolate com sorvete de creme", 2490, TYPE_DISH),
            seed_entry(4, "Suco Natural de Laranja", "Suco natural de laranja 500ml", 1290, TYPE_DRINK),
        ];
        let users = vec![UserRecord {
            id: 1,
            name: "João Silva".to_string(),
            email: SEED_EMAIL.to_string(),
            password: SEED_PASSWORD.to_string(),
        }];

        Self {
            data: Mutex::new(Data {
                next_id: 10,
                users,
                catalog,
                ..Data::default()
            }),
            requests: Mutex::new(Vec::new()),
            failing_details: Mutex::new(HashSet::new()),
            catalog_down: AtomicBool::new(false),
            tab_lists_down: AtomicBool::new(false),
        }
    }

    // ========== Auth ==========

    pub fn login(&self, email: &str, password: &str) -> MockResult<AuthResponse> {
        let mut data = lock(&self.data);
        let user = data
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email) && u.password == password)
            .cloned()
            .ok_or(MockError::InvalidCredentials)?;
        let token = data.issue_token(user.id);
        Ok(AuthResponse {
            user: user.dto(),
            token,
        })
    }

    pub fn register(&self, name: &str, email: &str, password: &str) -> MockResult<AuthResponse> {
        if name.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
            return Err(MockError::BadRequest(
                "Nome, email e senha são obrigatórios".into(),
            ));
        }
        let mut data = lock(&self.data);
        if data.users.iter().any(|u| u.email.eq_ignore_ascii_case(email)) {
            return Err(MockError::BadRequest("Email já cadastrado".into()));
        }
        let user = UserRecord {
            id: data.next_id(),
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        data.users.push(user.clone());
        let token = data.issue_token(user.id);
        Ok(AuthResponse {
            user: user.dto(),
            token,
        })
    }

    /// User id behind a bearer token
    pub fn authorize(&self, token: &str) -> MockResult<i64> {
        lock(&self.data)
            .tokens
            .get(token)
            .copied()
            .ok_or(MockError::Unauthorized)
    }

    // ========== Catalog ==========

    pub fn catalog(&self) -> MockResult<Vec<CatalogEntry>> {
        if self.catalog_down.load(Ordering::Relaxed) {
            return Err(MockError::Unavailable("Cardápio indisponível".into()));
        }
        Ok(lock(&self.data).catalog.clone())
    }

    pub fn create_catalog_entry(&self, req: CatalogCreate) -> MockResult<CatalogEntry> {
        if req.name.trim().is_empty() {
            return Err(MockError::BadRequest("Nome é obrigatório".into()));
        }
        if req.price <= Decimal::ZERO {
            return Err(MockError::BadRequest("Preço deve ser positivo".into()));
        }
        if req.kind != TYPE_DISH && req.kind != TYPE_DRINK {
            return Err(MockError::BadRequest(format!("Tipo inválido: {}", req.kind)));
        }

        let mut data = lock(&self.data);
        let entry = CatalogEntry {
            id: data.next_id().to_string(),
            name: req.name.trim().to_string(),
            description: Some(req.description).filter(|d| !d.trim().is_empty()),
            price: req.price.round_dp(2),
            kind: req.kind,
        };
        data.catalog.push(entry.clone());
        Ok(entry)
    }

    pub fn delete_catalog_entry(&self, id: &str) -> MockResult<()> {
        let mut data = lock(&self.data);
        let before = data.catalog.len();
        data.catalog.retain(|e| e.id != id);
        if data.catalog.len() == before {
            return Err(MockError::NotFound(format!("Item {} não encontrado", id)));
        }
        Ok(())
    }

    // ========== Tabs ==========

    pub fn tabs(&self, closed: bool) -> MockResult<Vec<TabSummary>> {
        if self.tab_lists_down.load(Ordering::Relaxed) {
            return Err(MockError::Unavailable("Comandas indisponíveis".into()));
        }
        Ok(lock(&self.data)
            .tabs
            .iter()
            .filter(|t| t.closed == closed)
            .map(TabRecord::summary)
            .collect())
    }

    pub fn tab_detail(&self, id: &str) -> MockResult<TabDetail> {
        if lock(&self.failing_details).contains(id) {
            return Err(MockError::Unavailable(format!(
                "Falha ao carregar comanda {}",
                id
            )));
        }
        let mut data = lock(&self.data);
        let tab = data.tab_mut(id)?;
        Ok(TabDetail {
            items: tab.items.iter().map(OrderRecord::entry).collect(),
            total: Some(tab.items.iter().map(OrderRecord::value).sum()),
        })
    }

    pub fn open_tab(&self, table: u32) -> MockResult<TabSummary> {
        let mut data = lock(&self.data);
        if data.tabs.iter().any(|t| !t.closed && t.table == table) {
            return Err(MockError::BadRequest(format!(
                "Mesa {} já possui uma comanda aberta",
                table
            )));
        }
        let tab = TabRecord {
            id: data.next_id(),
            table,
            created_at: Utc::now(),
            closed: false,
            items: Vec::new(),
        };
        let summary = tab.summary();
        data.tabs.push(tab);
        Ok(summary)
    }

    pub fn add_item(
        &self,
        tab_id: &str,
        menu_item_id: &str,
        quantity: u32,
        note: Option<String>,
    ) -> MockResult<OrderEntry> {
        if quantity == 0 {
            return Err(MockError::BadRequest("Quantidade deve ser positiva".into()));
        }
        let mut data = lock(&self.data);
        let menu_item = data
            .catalog
            .iter()
            .find(|e| e.id == menu_item_id)
            .cloned()
            .ok_or_else(|| {
                MockError::NotFound(format!("Item {} não encontrado", menu_item_id))
            })?;
        let id = data.next_id();

        let tab = data.tab_mut(tab_id)?;
        if tab.closed {
            return Err(MockError::BadRequest("Comanda já está fechada".into()));
        }
        let order = OrderRecord {
            id,
            menu_item,
            quantity,
            status: ItemStatus::Pending,
            note: note.filter(|n| !n.trim().is_empty()),
        };
        let entry = order.entry();
        tab.items.push(order);
        Ok(entry)
    }

    /// Status only moves forward: PENDENTE, EM_PREPARO, PRONTO, ENTREGUE.
    pub fn update_status(&self, item_id: &str, status: &str) -> MockResult<()> {
        let next = ItemStatus::ALL
            .into_iter()
            .find(|s| s.backend_status() == status)
            .ok_or_else(|| MockError::BadRequest(format!("Status inválido: {}", status)))?;

        let mut data = lock(&self.data);
        let order = data
            .tabs
            .iter_mut()
            .flat_map(|t| t.items.iter_mut())
            .find(|o| o.id.to_string() == item_id)
            .ok_or_else(|| MockError::NotFound(format!("Pedido {} não encontrado", item_id)))?;

        if next.rank() <= order.status.rank() {
            return Err(MockError::BadRequest(format!(
                "Transição inválida: {} -> {}",
                order.status.backend_status(),
                status
            )));
        }
        order.status = next;
        Ok(())
    }

    pub fn close_tab(&self, id: &str) -> MockResult<()> {
        let mut data = lock(&self.data);
        let tab = data.tab_mut(id)?;
        if tab.closed {
            return Err(MockError::BadRequest("Comanda já está fechada".into()));
        }
        tab.closed = true;
        Ok(())
    }

    // ========== Test hooks ==========

    /// Make `GET /comandas/{id}` fail for this tab
    pub fn fail_tab_detail(&self, tab_id: &str) {
        lock(&self.failing_details).insert(tab_id.to_string());
    }

    pub fn set_catalog_down(&self, down: bool) {
        self.catalog_down.store(down, Ordering::Relaxed);
    }

    /// Make both `GET /comandas/abertas` and `GET /comandas/fechadas` fail
    pub fn set_tab_lists_down(&self, down: bool) {
        self.tab_lists_down.store(down, Ordering::Relaxed);
    }

    pub fn record(&self, method: &str, path: &str) {
        lock(&self.requests).push(RecordedRequest {
            method: method.to_string(),
            path: path.to_string(),
        });
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }

    pub fn clear_requests(&self) {
        lock(&self.requests).clear();
    }

    /// Number of recorded requests matching method and exact path
    pub fn count_requests(&self, method: &str, path: &str) -> usize {
        lock(&self.requests)
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_open_table_is_rejected() {
        let state = AppState::seeded();
        state.open_tab(5).unwrap();

        let err = state.open_tab(5).unwrap_err();
        assert_eq!(err.to_string(), "Mesa 5 já possui uma comanda aberta");
    }

    #[test]
    fn test_closed_table_can_reopen() {
        let state = AppState::seeded();
        let tab = state.open_tab(3).unwrap();
        state.close_tab(&tab.id).unwrap();

        assert!(state.open_tab(3).is_ok());
        assert_eq!(state.tabs(true).unwrap().len(), 1);
        assert_eq!(state.tabs(false).unwrap().len(), 1);
    }

    #[test]
    fn test_tab_lists_outage() {
        let state = AppState::seeded();
        state.open_tab(2).unwrap();

        state.set_tab_lists_down(true);
        assert!(matches!(state.tabs(false), Err(MockError::Unavailable(_))));
        assert!(state.tabs(true).is_err());

        state.set_tab_lists_down(false);
        assert_eq!(state.tabs(false).unwrap().len(), 1);
    }

    #[test]
    fn test_status_only_moves_forward() {
        let state = AppState::seeded();
        let tab = state.open_tab(1).unwrap();
        let line = state.add_item(&tab.id, "4", 2, None).unwrap();
        assert_eq!(line.area.as_deref(), Some("COPA"));

        state.update_status(&line.id, "EM_PREPARO").unwrap();
        assert!(state.update_status(&line.id, "PENDENTE").is_err());
        assert!(state.update_status(&line.id, "EM_PREPARO").is_err());
        state.update_status(&line.id, "ENTREGUE").unwrap();
        assert!(matches!(
            state.update_status(&line.id, "SERVIDO"),
            Err(MockError::BadRequest(_))
        ));
    }

    #[test]
    fn test_detail_total_and_snapshot_survive_catalog_delete() {
        let state = AppState::seeded();
        let tab = state.open_tab(7).unwrap();
        state.add_item(&tab.id, "1", 2, None).unwrap();
        state.delete_catalog_entry("1").unwrap();

        let detail = state.tab_detail(&tab.id).unwrap();
        assert_eq!(detail.total, Some(Decimal::new(5780, 2)));
        let snapshot = detail.items[0].menu_item.as_ref().unwrap();
        assert_eq!(snapshot.name, "Salada Caesar");
    }

    #[test]
    fn test_tokens_are_per_session() {
        let state = AppState::seeded();
        let a = state.login(SEED_EMAIL, SEED_PASSWORD).unwrap();
        let b = state.login(SEED_EMAIL, SEED_PASSWORD).unwrap();
        assert_ne!(a.token, b.token);
        assert_eq!(state.authorize(&a.token).unwrap(), 1);
        assert!(state.authorize("nope").is_err());
        assert!(state.login(SEED_EMAIL, "wrong").is_err());
    }
}
