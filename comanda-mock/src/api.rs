//! Routes of the restaurant REST API

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Request, State},
    http::{StatusCode, header},
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, post, put},
};
use shared::client::{
    AddItemRequest, AuthResponse, CatalogCreate, CatalogEntry, LoginRequest, OpenTabRequest,
    OrderEntry, RegisterRequest, StatusUpdateRequest, TabDetail, TabSummary,
};
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::{MockError, MockResult};
use crate::state::AppState;

type SharedState = State<Arc<AppState>>;

// ========== Auth ==========

async fn login(
    State(state): SharedState,
    Json(req): Json<LoginRequest>,
) -> MockResult<Json<AuthResponse>> {
    let response = state.login(&req.email, &req.password)?;
    tracing::info!(user_id = %response.user.id, "Login");
    Ok(Json(response))
}

async fn register(
    State(state): SharedState,
    Json(req): Json<RegisterRequest>,
) -> MockResult<(StatusCode, Json<AuthResponse>)> {
    let response = state.register(&req.name, &req.email, &req.password)?;
    tracing::info!(user_id = %response.user.id, email = %response.user.email, "Registered");
    Ok((StatusCode::CREATED, Json(response)))
}

/// Bearer check for every route except login and registration
async fn require_auth(
    State(state): SharedState,
    req: Request,
    next: Next,
) -> Result<Response, MockError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or(MockError::Unauthorized)?;
    state.authorize(token)?;
    Ok(next.run(req).await)
}

async fn record_request(State(state): SharedState, req: Request, next: Next) -> Response {
    state.record(req.method().as_str(), req.uri().path());
    next.run(req).await
}

// ========== Catalog ==========

async fn list_catalog(State(state): SharedState) -> MockResult<Json<Vec<CatalogEntry>>> {
    Ok(Json(state.catalog()?))
}

async fn create_catalog_entry(
    State(state): SharedState,
    Json(req): Json<CatalogCreate>,
) -> MockResult<(StatusCode, Json<CatalogEntry>)> {
    let entry = state.create_catalog_entry(req)?;
    tracing::info!(id = %entry.id, name = %entry.name, "Catalog entry created");
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn delete_catalog_entry(
    State(state): SharedState,
    Path(id): Path<String>,
) -> MockResult<StatusCode> {
    state.delete_catalog_entry(&id)?;
    tracing::info!(%id, "Catalog entry deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ========== Tabs ==========

async fn open_tabs(State(state): SharedState) -> MockResult<Json<Vec<TabSummary>>> {
    Ok(Json(state.tabs(false)?))
}

async fn closed_tabs(State(state): SharedState) -> MockResult<Json<Vec<TabSummary>>> {
    Ok(Json(state.tabs(true)?))
}

async fn tab_detail(
    State(state): SharedState,
    Path(id): Path<String>,
) -> MockResult<Json<TabDetail>> {
    Ok(Json(state.tab_detail(&id)?))
}

async fn open_tab(
    State(state): SharedState,
    Json(req): Json<OpenTabRequest>,
) -> MockResult<(StatusCode, Json<TabSummary>)> {
    let tab = state.open_tab(req.table_number)?;
    tracing::info!(id = %tab.id, table = %tab.table_number, "Tab opened");
    Ok((StatusCode::CREATED, Json(tab)))
}

async fn add_item(
    State(state): SharedState,
    Path(tab_id): Path<String>,
    Json(req): Json<AddItemRequest>,
) -> MockResult<(StatusCode, Json<OrderEntry>)> {
    let entry = state.add_item(&tab_id, &req.menu_item_id, req.quantity, req.note)?;
    tracing::info!(%tab_id, item_id = %entry.id, quantity = entry.quantity, "Item added");
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn close_tab(State(state): SharedState, Path(id): Path<String>) -> MockResult<StatusCode> {
    state.close_tab(&id)?;
    tracing::info!(%id, "Tab closed");
    Ok(StatusCode::NO_CONTENT)
}

async fn update_status(
    State(state): SharedState,
    Path(item_id): Path<String>,
    Json(req): Json<StatusUpdateRequest>,
) -> MockResult<StatusCode> {
    state.update_status(&item_id, &req.status)?;
    tracing::info!(%item_id, status = %req.status, "Item status updated");
    Ok(StatusCode::NO_CONTENT)
}

pub fn router(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .route("/cardapio", get(list_catalog).post(create_catalog_entry))
        .route("/cardapio/{id}", delete(delete_catalog_entry))
        .route("/comandas", post(open_tab))
        .route("/comandas/abertas", get(open_tabs))
        .route("/comandas/fechadas", get(closed_tabs))
        .route("/comandas/{id}", get(tab_detail))
        .route("/comandas/{id}/adicionar", post(add_item))
        .route("/comandas/{id}/fechar", put(close_tab))
        .route("/pedidos/{id}/status", put(update_status))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
        .merge(protected)
        .layer(middleware::from_fn_with_state(state.clone(), record_request))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(ConcurrencyLimitLayer::new(64))
        .with_state(state)
}
