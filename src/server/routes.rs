use crate::engine::{self, EvalParams};
use crate::errors::EngineError;
use crate::report;
use crate::selection::Selection;
use crate::session::{AppState, WsMessage};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use portable_atomic::Ordering::Relaxed;
use std::sync::Arc;
use uuid::Uuid;

/// Body for POST /api/sessions/{user}/selections: either the one-line
/// submission format or structured fields.
#[derive(serde::Deserialize)]
#[serde(untagged)]
pub enum AddSelectionRequest {
    Line { line: String },
    Fields {
        name: String,
        price_market: f64,
        price_reference: f64,
    },
}

/// Body for POST /api/sessions/{user}/evaluate. Every field is optional;
/// omitted fields fall back to the configured defaults.
#[derive(Default, serde::Deserialize)]
#[serde(default)]
pub struct EvaluateRequest {
    pub min_legs: Option<usize>,
    pub max_legs: Option<usize>,
    pub ev_min: Option<f64>,
    pub stake_base: Option<f64>,
    pub top_n: Option<usize>,
    pub bankroll: Option<f64>,
}

type ApiResult = Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)>;

fn unprocessable(e: &EngineError) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(serde_json::json!({ "error": e.to_string() })),
    )
}

/// POST /api/sessions/{user}/selections -- add one selection to the pool
pub async fn add_selection(
    State(state): State<Arc<AppState>>,
    Path(user): Path<String>,
    Json(req): Json<AddSelectionRequest>,
) -> ApiResult {
    let parsed = match req {
        AddSelectionRequest::Line { line } => Selection::parse_line(&line),
        AddSelectionRequest::Fields {
            name,
            price_market,
            price_reference,
        } => Selection::new(name, price_market, price_reference),
    };

    let selection = parsed.map_err(|e| {
        state.counters.selections_rejected.fetch_add(1, Relaxed);
        tracing::warn!(user = %user, error = %e, "selection rejected");
        unprocessable(&e)
    })?;

    let stored = state.store.add(&user, selection);
    let pool_size = state.store.len(&user);
    state.counters.selections_added.fetch_add(1, Relaxed);

    tracing::info!(
        user = %user,
        name = %stored.selection.name,
        market = stored.selection.price_market,
        reference = stored.selection.price_reference,
        pool_size,
        "selection added"
    );

    state.broadcast(WsMessage::SelectionAdded {
        user: user.clone(),
        id: stored.id,
        name: stored.selection.name.clone(),
        price_market: stored.selection.price_market,
        price_reference: stored.selection.price_reference,
        pool_size,
    });

    Ok(Json(serde_json::json!({
        "selection": stored,
        "pool_size": pool_size,
    })))
}

/// GET /api/sessions/{user}/selections -- list the pool with derived info
pub async fn list_selections(
    State(state): State<Arc<AppState>>,
    Path(user): Path<String>,
) -> Json<serde_json::Value> {
    let stored = state.store.stored(&user);
    let selections: Vec<serde_json::Value> = stored
        .iter()
        .map(|s| {
            serde_json::json!({
                "id": s.id,
                "added_at": s.added_at,
                "name": s.selection.name,
                "price_market": s.selection.price_market,
                "price_reference": s.selection.price_reference,
                "fair_probability": s.selection.fair_probability(),
                "single_ev_percent": s.selection.single_ev_percent(),
            })
        })
        .collect();

    Json(serde_json::json!({
        "user": user,
        "pool_size": selections.len(),
        "selections": selections,
    }))
}

/// DELETE /api/sessions/{user}/selections/{id} -- remove one by id
pub async fn remove_selection(
    State(state): State<Arc<AppState>>,
    Path((user, id)): Path<(String, Uuid)>,
) -> ApiResult {
    match state.store.remove(&user, id) {
        Some(removed) => {
            let pool_size = state.store.len(&user);
            state.broadcast(WsMessage::SelectionRemoved {
                user: user.clone(),
                id: removed.id,
                pool_size,
            });
            Ok(Json(serde_json::json!({
                "removed": removed,
                "pool_size": pool_size,
            })))
        }
        None => Err((
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": format!("no selection {id} for {user}") })),
        )),
    }
}

/// DELETE /api/sessions/{user}/selections -- reset the session pool
pub async fn reset_session(
    State(state): State<Arc<AppState>>,
    Path(user): Path<String>,
) -> Json<serde_json::Value> {
    let dropped = state.store.clear(&user);
    tracing::info!(user = %user, dropped, "session reset");
    state.broadcast(WsMessage::SessionReset {
        user: user.clone(),
        dropped,
    });
    Json(serde_json::json!({ "user": user, "dropped": dropped }))
}

/// POST /api/sessions/{user}/evaluate -- run the pipeline over the pool
pub async fn evaluate(
    State(state): State<Arc<AppState>>,
    Path(user): Path<String>,
    body: Option<Json<EvaluateRequest>>,
) -> ApiResult {
    let Json(req) = body.unwrap_or_default();
    let cfg = &state.config;

    let selections = state.store.selections(&user);
    if selections.len() < 2 {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(serde_json::json!({
                "error": "need at least 2 selections before evaluating",
                "pool_size": selections.len(),
            })),
        ));
    }

    let params = EvalParams {
        min_legs: req.min_legs.unwrap_or(cfg.default_min_legs),
        max_legs: req
            .max_legs
            .unwrap_or_else(|| cfg.default_max_legs.min(selections.len())),
        ev_min: req.ev_min.unwrap_or(cfg.default_ev_min),
        stake_base: req.stake_base.unwrap_or(cfg.default_stake_base),
        top_n: req.top_n.unwrap_or(cfg.default_top_n),
        bankroll: req.bankroll.unwrap_or(cfg.default_bankroll),
    };

    let ranked = engine::evaluate_pool(&selections, &params);
    let rendered = report::render(&ranked, params.stake_base, params.bankroll);

    state.counters.evaluations_run.fetch_add(1, Relaxed);
    state
        .counters
        .combinations_ranked
        .fetch_add(ranked.len() as u64, Relaxed);

    tracing::info!(
        user = %user,
        pool_size = selections.len(),
        min_legs = params.min_legs,
        max_legs = params.max_legs,
        qualifying = ranked.len(),
        "evaluation complete"
    );

    state.broadcast(WsMessage::EvaluationComplete {
        user: user.clone(),
        pool_size: selections.len(),
        qualifying: ranked.len(),
        top_ev_percent: ranked.first().map(|v| v.expected_value_percent),
    });

    Ok(Json(serde_json::json!({
        "user": user,
        "pool_size": selections.len(),
        "params": {
            "min_legs": params.min_legs,
            "max_legs": params.max_legs,
            "ev_min": params.ev_min,
            "stake_base": params.stake_base,
            "top_n": params.top_n,
            "bankroll": params.bankroll,
        },
        "results": ranked,
        "report": rendered,
    })))
}

/// GET /api/counters -- performance counters (lock-free reads)
pub async fn get_counters(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "selections_added": state.counters.selections_added.load(Relaxed),
        "selections_rejected": state.counters.selections_rejected.load(Relaxed),
        "evaluations_run": state.counters.evaluations_run.load(Relaxed),
        "combinations_ranked": state.counters.combinations_ranked.load(Relaxed),
        "ws_messages_sent": state.counters.ws_messages_sent.load(Relaxed),
    }))
}
