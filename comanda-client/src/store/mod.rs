//! Application data store
//!
//! Single source of truth for the session user and the restaurant data.
//! Every mutation is one request followed by a full reload: the store never
//! reasons about what a write did, so after any successful write it mirrors
//! the backend again. Snapshots are swapped whole and never patched.
//!
//! Nothing serializes operations. Two overlapping refreshes both publish,
//! and whichever finishes last wins. A refresh that outlives its session
//! (sign-out or a new sign-in meanwhile) publishes nothing.

mod snapshot;

pub use snapshot::Snapshot;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::future::join_all;
use shared::client::{AuthResponse, TabSummary};
use shared::input::{self, InputError};
use shared::models::{ItemStatus, MenuItem, MenuItemForm, Tab, TabStatus, User};
use tokio::sync::{RwLock, watch};
use tracing::{debug, error, info, warn};

use crate::api::RestaurantApi;
use crate::http::{HttpClient, NetworkHttpClient};
use crate::notice::Action;
use crate::{ClientConfig, ClientError, ClientResult};

/// Result of a store mutation that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Request succeeded and the store reloaded afterward
    Applied,
    /// Input was refused client-side; nothing was sent
    Skipped(InputError),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// What a refresh managed to load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshReport {
    pub catalog_loaded: bool,
    pub tab_list_loaded: bool,
    /// Tabs (open and closed) whose detail fetch succeeded
    pub tabs_loaded: usize,
    /// Tabs left out because their list row or detail fetch failed
    pub tabs_dropped: usize,
}

/// Restaurant data store
pub struct AppStore<C: HttpClient = NetworkHttpClient> {
    api: RestaurantApi<C>,
    fetch_closed_tabs: bool,
    user: RwLock<Option<User>>,
    /// Bumped on every sign-in and sign-out
    session: AtomicU64,
    state: watch::Sender<Arc<Snapshot>>,
}

impl AppStore<NetworkHttpClient> {
    /// Build a store talking to the configured backend
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let http = NetworkHttpClient::new(config)?;
        Ok(Self::with_http(http, config))
    }
}

impl<C: HttpClient> AppStore<C> {
    pub fn with_http(http: C, config: &ClientConfig) -> Self {
        let (state, _) = watch::channel(Arc::new(Snapshot::default()));
        Self {
            api: RestaurantApi::new(http),
            fetch_closed_tabs: config.fetch_closed_tabs,
            user: RwLock::new(None),
            session: AtomicU64::new(0),
            state,
        }
    }

    pub fn api(&self) -> &RestaurantApi<C> {
        &self.api
    }

    // ========== Readers ==========

    /// Current snapshot
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.state.borrow().clone()
    }

    /// Receiver notified on every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.state.subscribe()
    }

    pub async fn current_user(&self) -> Option<User> {
        self.user.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.user.read().await.is_some()
    }

    // ========== Session ==========

    pub async fn sign_in(&self, email: &str, password: &str) -> ClientResult<Outcome> {
        let email = match input::require("email", email) {
            Ok(email) => email,
            Err(e) => return Ok(skipped(Action::SignIn, e)),
        };
        if let Err(e) = input::require("password", password) {
            return Ok(skipped(Action::SignIn, e));
        }

        let response = self
            .api
            .login(email, password)
            .await
            .inspect_err(|e| log_failure(Action::SignIn, e))?;
        self.start_session(response).await;
        Ok(Outcome::Applied)
    }

    pub async fn sign_up(&self, name: &str, email: &str, password: &str) -> ClientResult<Outcome> {
        let checked = input::require("name", name).and_then(|name| {
            let email = input::require("email", email)?;
            input::require("password", password)?;
            Ok((name, email))
        });
        let (name, email) = match checked {
            Ok(fields) => fields,
            Err(e) => return Ok(skipped(Action::SignUp, e)),
        };

        let response = self
            .api
            .register(name, email, password)
            .await
            .inspect_err(|e| log_failure(Action::SignUp, e))?;
        self.start_session(response).await;
        Ok(Outcome::Applied)
    }

    /// Teardown: drop the token, the user and every collection. No server call.
    pub async fn sign_out(&self) {
        self.session.fetch_add(1, Ordering::SeqCst);
        self.api.http().clear_token();
        let previous = self.user.write().await.take();
        self.state.send_replace(Arc::new(Snapshot::default()));
        if let Some(user) = previous {
            info!(user_id = %user.id, "Signed out");
        }
    }

    async fn start_session(&self, response: AuthResponse) {
        self.session.fetch_add(1, Ordering::SeqCst);
        self.api.http().set_token(response.token);
        let user = User::from(response.user);
        info!(user_id = %user.id, email = %user.email, "Session started");
        *self.user.write().await = Some(user);
        self.refresh_data().await;
    }

    // ========== Refresh ==========

    /// Reload the catalog and every open tab, then publish one new snapshot.
    ///
    /// Never fails as a whole: a failed catalog or list fetch keeps the
    /// previous collection, a malformed list row or failed tab detail drops
    /// that tab. If the
    /// session changed while loading, the result is discarded.
    pub async fn refresh_data(&self) -> RefreshReport {
        let session = self.session.load(Ordering::SeqCst);
        let previous = self.snapshot();
        let mut report = RefreshReport::default();

        let (catalog, open_list) = tokio::join!(self.api.catalog(), self.api.open_tabs());

        let menu: Vec<MenuItem> = match catalog {
            Ok(entries) => {
                report.catalog_loaded = true;
                entries.into_iter().map(MenuItem::from).collect()
            }
            Err(e) => {
                warn!(error = %e, "Failed to load catalog, keeping previous");
                previous.menu.clone()
            }
        };

        let open_tabs = match open_list {
            Ok(list) => {
                report.tab_list_loaded = true;
                report.tabs_dropped += list.rejected;
                self.load_tabs(list.rows, TabStatus::Open, &menu, &mut report)
                    .await
            }
            Err(e) => {
                warn!(error = %e, "Failed to load open tabs, keeping previous");
                previous.open_tabs.clone()
            }
        };

        let closed_tabs = if self.fetch_closed_tabs {
            match self.api.closed_tabs().await {
                Ok(list) => {
                    report.tabs_dropped += list.rejected;
                    self.load_tabs(list.rows, TabStatus::Closed, &menu, &mut report)
                        .await
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load closed tabs, keeping previous");
                    previous.closed_tabs.clone()
                }
            }
        } else {
            Vec::new()
        };

        if self.session.load(Ordering::SeqCst) != session {
            debug!(?report, "Session changed during refresh, discarding");
            return report;
        }

        self.state.send_replace(Arc::new(Snapshot {
            menu,
            open_tabs,
            closed_tabs,
            refreshed_at: Some(chrono::Utc::now()),
        }));

        debug!(?report, "Refresh finished");
        report
    }

    /// One detail request per tab, issued concurrently.
    async fn load_tabs(
        &self,
        summaries: Vec<TabSummary>,
        status: TabStatus,
        menu: &[MenuItem],
        report: &mut RefreshReport,
    ) -> Vec<Tab> {
        let details = join_all(summaries.iter().map(|s| self.api.tab_detail(&s.id))).await;

        summaries
            .into_iter()
            .zip(details)
            .filter_map(|(summary, detail)| match detail {
                Ok(detail) => {
                    report.tabs_loaded += 1;
                    Some(Tab::assemble(summary, detail, status, menu))
                }
                Err(e) => {
                    warn!(tab_id = %summary.id, error = %e, "Tab detail failed, dropping tab");
                    report.tabs_dropped += 1;
                    None
                }
            })
            .collect()
    }

    // ========== Catalog ==========

    pub async fn add_menu_item(&self, form: &MenuItemForm) -> ClientResult<Outcome> {
        let item = match form.validate() {
            Ok(item) => item,
            Err(e) => return Ok(skipped(Action::AddMenuItem, e)),
        };
        let result = self.api.create_catalog_entry(&item.to_request()).await;
        self.commit(Action::AddMenuItem, result).await
    }

    pub async fn delete_menu_item(&self, id: &str) -> ClientResult<Outcome> {
        let id = match input::require_id("menu item", id) {
            Ok(id) => id,
            Err(e) => return Ok(skipped(Action::DeleteMenuItem, e)),
        };
        let result = self.api.delete_catalog_entry(id).await;
        self.commit(Action::DeleteMenuItem, result).await
    }

    // ========== Tabs ==========

    /// Open a tab; `table_number` is the raw form text and must be numeric.
    pub async fn open_tab(&self, table_number: &str) -> ClientResult<Outcome> {
        let table = match input::parse_table_number(table_number) {
            Ok(table) => table,
            Err(e) => return Ok(skipped(Action::OpenTab, e)),
        };
        let result = self.api.open_tab(table).await;
        self.commit(Action::OpenTab, result).await
    }

    pub async fn add_item_to_tab(
        &self,
        tab_id: &str,
        menu_item_id: &str,
        quantity: u32,
    ) -> ClientResult<Outcome> {
        self.add_item_with_note(tab_id, menu_item_id, quantity, None)
            .await
    }

    /// Same as [`AppStore::add_item_to_tab`] with a kitchen note (observação).
    pub async fn add_item_with_note(
        &self,
        tab_id: &str,
        menu_item_id: &str,
        quantity: u32,
        note: Option<String>,
    ) -> ClientResult<Outcome> {
        let checked = input::require_id("tab", tab_id).and_then(|tab_id| {
            let menu_item_id = input::require("menu item", menu_item_id)?;
            if quantity == 0 {
                return Err(InputError::Quantity(quantity.to_string()));
            }
            Ok((tab_id, menu_item_id))
        });
        let (tab_id, menu_item_id) = match checked {
            Ok(ids) => ids,
            Err(e) => return Ok(skipped(Action::AddItem, e)),
        };

        let note = note.filter(|n| !n.trim().is_empty());
        let result = self.api.add_item(tab_id, menu_item_id, quantity, note).await;
        self.commit(Action::AddItem, result).await
    }

    /// Request a new status for a line item. Ordering is enforced by the
    /// backend, not here.
    pub async fn update_item_status(
        &self,
        tab_id: &str,
        item_id: &str,
        status: ItemStatus,
    ) -> ClientResult<Outcome> {
        let item_id = match input::require_id("item", item_id) {
            Ok(id) => id,
            Err(e) => return Ok(skipped(Action::UpdateStatus, e)),
        };
        debug!(%tab_id, %item_id, status = status.backend_status(), "Updating item status");
        let result = self.api.update_item_status(item_id, status).await;
        self.commit(Action::UpdateStatus, result).await
    }

    pub async fn close_tab(&self, tab_id: &str) -> ClientResult<Outcome> {
        let tab_id = match input::require_id("tab", tab_id) {
            Ok(id) => id,
            Err(e) => return Ok(skipped(Action::CloseTab, e)),
        };
        let result = self.api.close_tab(tab_id).await;
        self.commit(Action::CloseTab, result).await
    }

    /// Reload after a successful write; on failure log and hand the error back.
    async fn commit(&self, action: Action, result: ClientResult<()>) -> ClientResult<Outcome> {
        if let Err(e) = result {
            log_failure(action, &e);
            return Err(e);
        }
        info!(%action, "Applied, reloading");
        self.refresh_data().await;
        Ok(Outcome::Applied)
    }
}

fn skipped(action: Action, reason: InputError) -> Outcome {
    debug!(%action, %reason, "Input rejected, nothing sent");
    Outcome::Skipped(reason)
}

fn log_failure(action: Action, err: &ClientError) {
    error!(%action, error = %err, "Request failed");
}
