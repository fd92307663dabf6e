//! HTTP request handlers for the web adapter.

use axum::{
    Json,
    extract::{Multipart, Path, State},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use crate::adapters::csv_adapter::parse_latest_bar;
use crate::domain::discipline::{ScoreLabel, score};
use crate::domain::levels::PriceLevels;
use crate::domain::review::{
    ReviewAction, ReviewKey, ReviewPatch, ReviewRecord, apply, load_or_default,
};
use crate::domain::session::{Analysis, TradingSession};
use crate::domain::watchlist::WatchlistEntry;

use super::{AppState, WebError};

pub async fn health() -> impl IntoResponse {
    Json(json!({ "ok": true, "ts": chrono::Utc::now().timestamp_millis() }))
}

pub async fn watchlist(State(state): State<Arc<AppState>>) -> Json<Vec<WatchlistEntry>> {
    Json(state.watchlist.entries.clone())
}

pub async fn not_found() -> WebError {
    WebError::not_found("not found")
}

#[derive(Debug, Serialize)]
pub struct LevelsBody {
    pub close: f64,
    pub pivot: f64,
    pub range: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub ok: bool,
    pub code: String,
    pub last_date: String,
    pub levels: LevelsBody,
}

pub async fn upload(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, WebError> {
    let mut content = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| WebError::bad_request(e.to_string()))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| WebError::bad_request(e.to_string()))?;
            content = Some(String::from_utf8_lossy(&bytes).into_owned());
            break;
        }
    }
    let content = content.ok_or_else(|| WebError::bad_request("no file"))?;

    let bar = parse_latest_bar(&content)?;
    let levels = PriceLevels::from_bar(&bar)?;
    let code = code.trim().to_uppercase();

    tracing::info!(
        code = %code,
        date = %levels.last_date,
        pivot = levels.pivot,
        range = levels.range,
        "levels computed from upload"
    );

    let session = TradingSession::new(&code, levels.clone(), state.max_trades)
        .with_hold_bias(state.hold_bias);
    state
        .sessions
        .lock()
        .map_err(|_| WebError::internal("session lock poisoned"))?
        .insert(code.clone(), session);

    Ok(Json(UploadResponse {
        ok: true,
        code,
        last_date: levels.last_date.format("%Y-%m-%d").to_string(),
        levels: LevelsBody {
            close: levels.close,
            pivot: levels.pivot,
            range: levels.range,
        },
    }))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignalRequest {
    pub price: Option<f64>,
    pub max_trades: Option<u32>,
}

pub async fn signal(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
    Json(req): Json<SignalRequest>,
) -> Result<Json<Analysis>, WebError> {
    let key = ReviewKey::today(&code);
    let record = load_or_default(&*state.review_store, &key)?;

    let mut sessions = state
        .sessions
        .lock()
        .map_err(|_| WebError::internal("session lock poisoned"))?;
    let session = sessions
        .get_mut(&key.code)
        .ok_or_else(|| WebError::not_found(format!("no levels uploaded for {}", key.code)))?;

    match req.price {
        Some(price) => session.set_current_price(Some(price)),
        None => session.clear_price(),
    }
    if let Some(max_trades) = req.max_trades {
        session.set_max_trades(max_trades);
    }
    session.set_trade_count(record.t_count);

    Ok(Json(session.analysis()))
}

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub record: ReviewRecord,
    pub score: u8,
    pub label: String,
}

fn review_response(
    state: &AppState,
    code: &str,
    record: ReviewRecord,
) -> Result<Json<ReviewResponse>, WebError> {
    let max_trades = state
        .sessions
        .lock()
        .map_err(|_| WebError::internal("session lock poisoned"))?
        .get(code)
        .map(|session| session.max_trades())
        .unwrap_or(state.max_trades);
    let score = score(&record, max_trades);
    Ok(Json(ReviewResponse {
        record,
        score,
        label: ScoreLabel::for_score(score).to_string(),
    }))
}

pub async fn review(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<ReviewResponse>, WebError> {
    let key = ReviewKey::today(&code);
    let record = load_or_default(&*state.review_store, &key)?;
    review_response(&state, &key.code, record)
}

async fn apply_action(
    state: Arc<AppState>,
    code: String,
    action: ReviewAction,
) -> Result<Json<ReviewResponse>, WebError> {
    let key = ReviewKey::today(&code);
    let record = apply(&*state.review_store, &key, action)?;
    tracing::info!(key = %key, t_count = record.t_count, "review updated");
    review_response(&state, &key.code, record)
}

pub async fn patch_review(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
    Json(patch): Json<ReviewPatch>,
) -> Result<Json<ReviewResponse>, WebError> {
    apply_action(state, code, ReviewAction::Patch(patch)).await
}

pub async fn record_trade(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<ReviewResponse>, WebError> {
    apply_action(state, code, ReviewAction::RecordTrade).await
}

pub async fn undo_trade(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<ReviewResponse>, WebError> {
    apply_action(state, code, ReviewAction::UndoTrade).await
}
