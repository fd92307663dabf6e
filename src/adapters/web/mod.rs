//! HTTP API adapter.
//!
//! JSON endpoints for bar upload, signal evaluation and the daily review.
//! Uploaded levels live in per-code sessions held in memory; review records
//! go through the configured [`ReviewStore`].

mod error;
mod handlers;

pub use error::WebError;
pub use handlers::*;

use axum::{
    Router,
    routing::{get, post},
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tower_http::cors::CorsLayer;

use crate::domain::session::TradingSession;
use crate::domain::watchlist::Watchlist;
use crate::ports::review_port::ReviewStore;

pub struct AppState {
    pub review_store: Arc<dyn ReviewStore + Send + Sync>,
    pub watchlist: Watchlist,
    pub max_trades: u32,
    pub hold_bias: bool,
    pub sessions: Mutex<HashMap<String, TradingSession>>,
}

impl AppState {
    pub fn new(
        review_store: Arc<dyn ReviewStore + Send + Sync>,
        watchlist: Watchlist,
        max_trades: u32,
        hold_bias: bool,
    ) -> Self {
        Self {
            review_store,
            watchlist,
            max_trades,
            hold_bias,
            sessions: Mutex::new(HashMap::new()),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/watchlist", get(handlers::watchlist))
        .route("/api/upload/{code}", post(handlers::upload))
        .route("/api/signal/{code}", post(handlers::signal))
        .route(
            "/api/review/{code}",
            get(handlers::review).put(handlers::patch_review),
        )
        .route("/api/review/{code}/trade", post(handlers::record_trade))
        .route("/api/review/{code}/undo", post(handlers::undo_trade))
        .fallback(handlers::not_found)
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}
