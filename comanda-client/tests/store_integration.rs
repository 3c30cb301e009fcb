// comanda-client/tests/store_integration.rs
// Store against the in-memory backend

use chrono::Utc;
use comanda_client::{
    Action, AppStore, Category, ClientConfig, ClientError, HttpClient, ItemStatus, MenuItemForm,
    Outcome, PrepArea, alert_message,
};
use comanda_mock::{MockServer, SEED_EMAIL, SEED_PASSWORD};
use rust_decimal::Decimal;
use shared::InputError;

const JUICE_ID: &str = "4";
const SALAD_ID: &str = "1";

async fn signed_in(config: impl FnOnce(ClientConfig) -> ClientConfig) -> (MockServer, AppStore) {
    let server = comanda_mock::spawn().await.unwrap();
    let store = AppStore::new(&config(ClientConfig::new(server.base_url()))).unwrap();
    let outcome = store.sign_in(SEED_EMAIL, SEED_PASSWORD).await.unwrap();
    assert_eq!(outcome, Outcome::Applied);
    (server, store)
}

async fn setup() -> (MockServer, AppStore) {
    signed_in(|c| c).await
}

/// Open a tab for `table` and return its id
async fn open(store: &AppStore, table: &str) -> String {
    store.open_tab(table).await.unwrap();
    store
        .snapshot()
        .tab_for_table(table)
        .map(|t| t.id.clone())
        .unwrap()
}

#[tokio::test]
async fn test_sign_in_loads_catalog() {
    let (_server, store) = setup().await;

    let user = store.current_user().await.unwrap();
    assert_eq!(user.email, SEED_EMAIL);
    assert!(store.is_authenticated().await);

    let snapshot = store.snapshot();
    assert_eq!(snapshot.menu.len(), 4);
    assert!(snapshot.open_tabs.is_empty());
    assert!(snapshot.refreshed_at.is_some());

    let juice = snapshot.menu_item(JUICE_ID).unwrap();
    assert_eq!(juice.category, Category::Drink);
    assert_eq!(juice.area, PrepArea::Bar);
    assert_eq!(juice.price, Decimal::new(1290, 2));
}

#[tokio::test]
async fn test_wrong_password_is_unauthorized() {
    let server = comanda_mock::spawn().await.unwrap();
    let store = AppStore::new(&ClientConfig::new(server.base_url())).unwrap();

    let err = store.sign_in(SEED_EMAIL, "errada").await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized(_)));
    assert!(!store.is_authenticated().await);
    assert!(store.snapshot().menu.is_empty());
}

#[tokio::test]
async fn test_blank_credentials_send_nothing() {
    let server = comanda_mock::spawn().await.unwrap();
    let store = AppStore::new(&ClientConfig::new(server.base_url())).unwrap();

    let outcome = store.sign_in("  ", SEED_PASSWORD).await.unwrap();
    assert_eq!(outcome, Outcome::Skipped(InputError::Missing("email")));
    let outcome = store.sign_up("Ana", "ana@restaurante.com", "").await.unwrap();
    assert_eq!(outcome, Outcome::Skipped(InputError::Missing("password")));
    assert!(server.state().requests().is_empty());
}

#[tokio::test]
async fn test_sign_up_starts_session() {
    let server = comanda_mock::spawn().await.unwrap();
    let store = AppStore::new(&ClientConfig::new(server.base_url())).unwrap();

    let outcome = store
        .sign_up("Ana Souza", "ana@restaurante.com", "segredo")
        .await
        .unwrap();
    assert!(outcome.is_applied());
    assert_eq!(store.current_user().await.unwrap().name, "Ana Souza");
    assert_eq!(store.snapshot().menu.len(), 4);

    // Same email again is refused by the backend
    let err = store
        .sign_up("Ana", "ana@restaurante.com", "outra")
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
}

#[tokio::test]
async fn test_sign_out_clears_session() {
    let (_server, store) = setup().await;
    open(&store, "2").await;

    store.sign_out().await;

    assert!(!store.is_authenticated().await);
    assert!(store.api().http().token().is_none());
    let snapshot = store.snapshot();
    assert!(snapshot.menu.is_empty());
    assert!(snapshot.open_tabs.is_empty());

    // No bearer header any more
    let err = store.api().catalog().await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized(_)));
}

#[tokio::test]
async fn test_sign_out_discards_refresh_in_flight() {
    let (_server, store) = setup().await;
    open(&store, "2").await;

    let (_report, ()) = tokio::join!(store.refresh_data(), store.sign_out());

    assert!(!store.is_authenticated().await);
    let snapshot = store.snapshot();
    assert!(snapshot.menu.is_empty());
    assert!(snapshot.open_tabs.is_empty());
    assert!(snapshot.refreshed_at.is_none());
}

#[tokio::test]
async fn test_add_menu_item_category_mapping() {
    let (_server, store) = setup().await;

    let drink = MenuItemForm {
        name: "Água com Gás".into(),
        description: "Garrafa 500ml".into(),
        price: "6,50".into(),
        category: Some(Category::Drink),
    };
    assert!(store.add_menu_item(&drink).await.unwrap().is_applied());

    let dessert = MenuItemForm {
        name: "Pudim".into(),
        price: "14.00".into(),
        category: Some(Category::Dessert),
        ..Default::default()
    };
    assert!(store.add_menu_item(&dessert).await.unwrap().is_applied());

    let snapshot = store.snapshot();
    assert_eq!(snapshot.menu.len(), 6);

    let water = snapshot.menu.iter().find(|m| m.name == "Água com Gás").unwrap();
    assert_eq!(water.category, Category::Drink);
    assert_eq!(water.area, PrepArea::Bar);
    assert_eq!(water.price, Decimal::new(650, 2));

    // The backend type is two-valued; desserts come back as mains
    let pudding = snapshot.menu.iter().find(|m| m.name == "Pudim").unwrap();
    assert_eq!(pudding.category, Category::Main);
    assert_eq!(pudding.area, PrepArea::Kitchen);
}

#[tokio::test]
async fn test_invalid_menu_form_sends_nothing() {
    let (server, store) = setup().await;
    server.state().clear_requests();

    let form = MenuItemForm {
        name: "Pudim".into(),
        price: "0".into(),
        ..Default::default()
    };
    let outcome = store.add_menu_item(&form).await.unwrap();
    assert_eq!(outcome, Outcome::Skipped(InputError::Price("0".into())));
    assert!(server.state().requests().is_empty());
}

#[tokio::test]
async fn test_unsafe_ids_send_nothing() {
    let (server, store) = setup().await;
    server.state().clear_requests();

    let outcome = store.close_tab("1/../2").await.unwrap();
    assert!(matches!(outcome, Outcome::Skipped(InputError::Id { field: "tab", .. })));
    let outcome = store.delete_menu_item("4?force=1").await.unwrap();
    assert!(matches!(outcome, Outcome::Skipped(InputError::Id { .. })));

    let err = store.api().tab_detail("1#x").await.unwrap_err();
    assert!(matches!(err, ClientError::Input(_)));
    assert!(server.state().requests().is_empty());
}

#[tokio::test]
async fn test_delete_menu_item() {
    let (_server, store) = setup().await;

    assert!(store.delete_menu_item(SALAD_ID).await.unwrap().is_applied());
    assert!(store.snapshot().menu_item(SALAD_ID).is_none());

    let err = store.delete_menu_item(SALAD_ID).await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound(_)));
}

#[tokio::test]
async fn test_order_juice_goes_to_bar() {
    let (_server, store) = setup().await;

    let tab_id = open(&store, "5").await;
    let outcome = store.add_item_to_tab(&tab_id, JUICE_ID, 2).await.unwrap();
    assert!(outcome.is_applied());

    let snapshot = store.snapshot();
    let tab = snapshot.open_tab(&tab_id).unwrap();
    assert_eq!(tab.table_number, "5");
    assert_eq!(tab.items.len(), 1);

    let line = &tab.items[0];
    assert_eq!(line.menu_item_id, JUICE_ID);
    assert_eq!(line.quantity, 2);
    assert_eq!(line.status, ItemStatus::Pending);
    assert_eq!(line.area, PrepArea::Bar);
    assert_eq!(tab.total, Some(Decimal::new(2580, 2)));

    let board = snapshot.production_board();
    assert!(board.kitchen.is_empty());
    assert_eq!(board.bar.in_progress.len(), 1);
    assert_eq!(board.bar.in_progress[0].title, "2x Suco Natural de Laranja");
}

#[tokio::test]
async fn test_ordered_item_stays_on_board_after_menu_delete() {
    let (_server, store) = setup().await;
    let tab_id = open(&store, "5").await;
    store.add_item_to_tab(&tab_id, JUICE_ID, 2).await.unwrap();

    assert!(store.delete_menu_item(JUICE_ID).await.unwrap().is_applied());

    let snapshot = store.snapshot();
    assert!(snapshot.menu_item(JUICE_ID).is_none());
    let board = snapshot.production_board();
    assert_eq!(board.bar.in_progress.len(), 1);
    assert_eq!(board.bar.in_progress[0].title, "2x Suco Natural de Laranja");

    let overview = snapshot.tab_overview();
    assert_eq!(overview[0].lines[0].name.as_deref(), Some("Suco Natural de Laranja"));
}

#[tokio::test]
async fn test_zero_quantity_sends_nothing() {
    let (server, store) = setup().await;
    let tab_id = open(&store, "8").await;
    server.state().clear_requests();

    let outcome = store.add_item_to_tab(&tab_id, JUICE_ID, 0).await.unwrap();
    assert!(matches!(outcome, Outcome::Skipped(InputError::Quantity(_))));
    assert!(server.state().requests().is_empty());
}

#[tokio::test]
async fn test_item_note_is_kept() {
    let (_server, store) = setup().await;
    let tab_id = open(&store, "9").await;

    store
        .add_item_with_note(&tab_id, SALAD_ID, 1, Some("sem croutons".into()))
        .await
        .unwrap();

    let snapshot = store.snapshot();
    let line = &snapshot.open_tab(&tab_id).unwrap().items[0];
    assert_eq!(line.note.as_deref(), Some("sem croutons"));
    assert_eq!(line.area, PrepArea::Kitchen);
}

#[tokio::test]
async fn test_status_advances_one_call_per_step() {
    let (server, store) = setup().await;
    let tab_id = open(&store, "5").await;
    store.add_item_to_tab(&tab_id, JUICE_ID, 2).await.unwrap();
    let item_id = store.snapshot().open_tab(&tab_id).unwrap().items[0].id.clone();

    server.state().clear_requests();
    let path = format!("/pedidos/{}/status", item_id);

    store
        .update_item_status(&tab_id, &item_id, ItemStatus::InPreparation)
        .await
        .unwrap();
    assert_eq!(server.state().count_requests("PUT", &path), 1);
    let status = store.snapshot().open_tab(&tab_id).unwrap().items[0].status;
    assert_eq!(status, ItemStatus::InPreparation);

    store
        .update_item_status(&tab_id, &item_id, ItemStatus::Ready)
        .await
        .unwrap();
    assert_eq!(server.state().count_requests("PUT", &path), 2);

    let snapshot = store.snapshot();
    assert_eq!(snapshot.open_tab(&tab_id).unwrap().items[0].status, ItemStatus::Ready);
    let board = snapshot.production_board();
    assert!(board.bar.in_progress.is_empty());
    assert_eq!(board.bar.ready.len(), 1);
    assert_eq!(board.bar.ready[0].next, Some(ItemStatus::Delivered));
}

#[tokio::test]
async fn test_backward_status_is_rejected() {
    let (_server, store) = setup().await;
    let tab_id = open(&store, "6").await;
    store.add_item_to_tab(&tab_id, SALAD_ID, 1).await.unwrap();
    let item_id = store.snapshot().open_tab(&tab_id).unwrap().items[0].id.clone();

    store
        .update_item_status(&tab_id, &item_id, ItemStatus::Ready)
        .await
        .unwrap();
    let before = store.snapshot();

    let err = store
        .update_item_status(&tab_id, &item_id, ItemStatus::Pending)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
    assert_eq!(
        alert_message(Action::UpdateStatus, &err),
        "Could not update the item status."
    );

    // Failed writes do not reload
    assert_eq!(store.snapshot().refreshed_at, before.refreshed_at);
}

#[tokio::test]
async fn test_close_tab_removes_it() {
    let (_server, store) = setup().await;
    let keep = open(&store, "1").await;
    let closing = open(&store, "2").await;

    assert!(store.close_tab(&closing).await.unwrap().is_applied());

    let snapshot = store.snapshot();
    assert!(snapshot.open_tab(&closing).is_none());
    assert!(snapshot.open_tab(&keep).is_some());
    assert!(snapshot.closed_tabs.is_empty());
}

#[tokio::test]
async fn test_empty_table_number_sends_nothing() {
    let (server, store) = setup().await;
    server.state().clear_requests();

    let outcome = store.open_tab("").await.unwrap();
    assert_eq!(outcome, Outcome::Skipped(InputError::Missing("table number")));
    let outcome = store.open_tab("5a").await.unwrap();
    assert_eq!(outcome, Outcome::Skipped(InputError::TableNumber("5a".into())));

    assert!(server.state().requests().is_empty());
    assert!(store.snapshot().open_tabs.is_empty());
}

#[tokio::test]
async fn test_duplicate_table_shows_server_message() {
    let (_server, store) = setup().await;
    open(&store, "5").await;

    let err = store.open_tab("5").await.unwrap_err();
    assert_eq!(
        alert_message(Action::OpenTab, &err),
        "Mesa 5 já possui uma comanda aberta"
    );
    assert_eq!(store.snapshot().open_tabs.len(), 1);
}

#[tokio::test]
async fn test_failing_detail_drops_only_that_tab() {
    let (server, store) = setup().await;
    let first = open(&store, "1").await;
    let broken = open(&store, "2").await;
    let third = open(&store, "3").await;

    server.state().fail_tab_detail(&broken);
    let report = store.refresh_data().await;

    assert!(report.catalog_loaded);
    assert!(report.tab_list_loaded);
    assert_eq!(report.tabs_loaded, 2);
    assert_eq!(report.tabs_dropped, 1);

    let snapshot = store.snapshot();
    assert_eq!(snapshot.open_tabs.len(), 2);
    assert!(snapshot.open_tab(&first).is_some());
    assert!(snapshot.open_tab(&third).is_some());
    assert!(snapshot.open_tab(&broken).is_none());
}

#[tokio::test]
async fn test_catalog_failure_keeps_previous_menu() {
    let (server, store) = setup().await;
    open(&store, "4").await;

    server.state().set_catalog_down(true);
    let report = store.refresh_data().await;

    assert!(!report.catalog_loaded);
    assert!(report.tab_list_loaded);
    let snapshot = store.snapshot();
    assert_eq!(snapshot.menu.len(), 4);
    assert_eq!(snapshot.open_tabs.len(), 1);
}

#[tokio::test]
async fn test_tab_list_failure_keeps_previous_tabs() {
    let (server, store) = setup().await;
    let tab_id = open(&store, "4").await;

    server.state().set_tab_lists_down(true);
    let report = store.refresh_data().await;

    assert!(report.catalog_loaded);
    assert!(!report.tab_list_loaded);
    let snapshot = store.snapshot();
    assert_eq!(snapshot.open_tabs.len(), 1);
    assert!(snapshot.open_tab(&tab_id).is_some());

    server.state().set_tab_lists_down(false);
    assert!(store.refresh_data().await.tab_list_loaded);
}

#[tokio::test]
async fn test_closed_list_failure_keeps_previous_closed_tabs() {
    let (server, store) = signed_in(|c| c.with_closed_tabs(true)).await;
    let tab_id = open(&store, "3").await;
    store.add_item_to_tab(&tab_id, SALAD_ID, 1).await.unwrap();
    store.close_tab(&tab_id).await.unwrap();
    assert_eq!(store.snapshot().closed_tabs.len(), 1);

    server.state().set_tab_lists_down(true);
    store.refresh_data().await;

    let snapshot = store.snapshot();
    assert_eq!(snapshot.closed_tabs.len(), 1);
    assert_eq!(snapshot.closed_tabs[0].id, tab_id);
    assert!(snapshot.open_tabs.is_empty());
}

#[tokio::test]
async fn test_subscribers_see_each_refresh() {
    let (_server, store) = setup().await;
    let mut rx = store.subscribe();
    assert!(!rx.has_changed().unwrap());

    store.open_tab("12").await.unwrap();

    assert!(rx.has_changed().unwrap());
    let snapshot = rx.borrow_and_update().clone();
    assert!(snapshot.tab_for_table("12").is_some());
}

#[tokio::test]
async fn test_sales_report_over_closed_tabs() {
    let (_server, store) = signed_in(|c| c.with_closed_tabs(true)).await;

    let tab_id = open(&store, "3").await;
    store.add_item_to_tab(&tab_id, SALAD_ID, 2).await.unwrap();
    store.add_item_to_tab(&tab_id, JUICE_ID, 1).await.unwrap();
    store.close_tab(&tab_id).await.unwrap();

    let snapshot = store.snapshot();
    assert!(snapshot.open_tabs.is_empty());
    assert_eq!(snapshot.closed_tabs.len(), 1);

    let report = snapshot.sales_report(&Utc);
    assert_eq!(report.orders, 1);
    assert_eq!(report.items_sold, 3);
    assert_eq!(report.total_sales, Decimal::new(7070, 2));
    assert_eq!(report.average_ticket, Decimal::new(7070, 2));
    assert_eq!(report.top_items[0].name, "Salada Caesar");
}
