// Bank Service - REST API with Axum
//
// Explicit router construction: each (method, path) pair maps to a handler
// function, and the store is passed in as axum state rather than looked up
// through any global.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use tower_http::cors::CorsLayer;
use tracing::{debug, error};

use crate::bank::Bank;
use crate::store::{BankStore, StoreError};

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// GET /api/banks - All banks, ordered by account number
async fn list_banks(State(store): State<BankStore>) -> impl IntoResponse {
    match store.all() {
        Ok(banks) => (StatusCode::OK, Json(banks)).into_response(),
        Err(e) => {
            error!("failed to list banks: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// GET /api/banks/:account_number - Single bank lookup
async fn get_bank(
    State(store): State<BankStore>,
    Path(account_number): Path<String>,
) -> impl IntoResponse {
    match store.get(&account_number) {
        Ok(bank) => (StatusCode::OK, Json(bank)).into_response(),
        Err(StoreError::NotFound(_)) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            error!("failed to get bank {account_number}: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// POST /api/banks - Create a bank; 400 if the account number is taken
async fn create_bank(
    State(store): State<BankStore>,
    Json(bank): Json<Bank>,
) -> impl IntoResponse {
    match store.insert(&bank) {
        Ok(()) => {
            debug!("created bank {}", bank.account_number);
            (StatusCode::CREATED, Json(bank)).into_response()
        }
        Err(e @ StoreError::DuplicateAccount(_)) => {
            debug!("rejected create: {e}");
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
        Err(e) => {
            error!("failed to create bank {}: {e}", bank.account_number);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

// ============================================================================
// Router
// ============================================================================

/// Build the application router over the given store.
pub fn app(store: BankStore) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/banks", get(list_banks).post(create_bank))
        .route("/banks/:account_number", get(get_bank))
        .with_state(store);

    Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
}
