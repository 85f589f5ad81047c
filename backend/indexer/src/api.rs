//! Axum REST API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::db;
use crate::errors::IndexerError;
use crate::events::{CampaignRecord, CampaignSummary, EventRecord};

#[derive(Clone)]
pub struct ApiState {
    pub pool: SqlitePool,
}

/// Build the REST router over `state`.
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/events", get(get_all_events))
        .route("/campaigns", get(list_campaigns))
        .route("/campaigns/:id", get(get_campaign))
        .route("/campaigns/:id/events", get(get_campaign_events))
        .route("/campaigns/:id/summary", get(get_campaign_summary))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ─────────────────────────────────────────────────────────
// Response shapes
// ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct EventsResponse {
    pub campaign_id: String,
    pub count: usize,
    pub events: Vec<EventRecord>,
}

#[derive(Serialize)]
pub struct AllEventsResponse {
    pub count: usize,
    pub events: Vec<EventRecord>,
}

#[derive(Serialize)]
pub struct CampaignsResponse {
    pub count: usize,
    pub campaigns: Vec<CampaignRecord>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, error: String) -> Response {
    (status, Json(ErrorResponse { error })).into_response()
}

fn internal_error(e: IndexerError) -> Response {
    tracing::error!("API query failed: {e}");
    error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

// ─────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /events`
///
/// Returns all indexed events across the factory and every campaign.
pub async fn get_all_events(State(state): State<Arc<ApiState>>) -> Response {
    match db::get_all_events(&state.pool).await {
        Ok(events) => {
            let count = events.len();
            (StatusCode::OK, Json(AllEventsResponse { count, events })).into_response()
        }
        Err(e) => internal_error(e),
    }
}

/// `GET /campaigns`
pub async fn list_campaigns(State(state): State<Arc<ApiState>>) -> Response {
    match db::list_campaigns(&state.pool).await {
        Ok(campaigns) => {
            let count = campaigns.len();
            (StatusCode::OK, Json(CampaignsResponse { count, campaigns })).into_response()
        }
        Err(e) => internal_error(e),
    }
}

/// `GET /campaigns/:id`
///
/// `404` when the factory never announced a campaign with this id.
pub async fn get_campaign(
    State(state): State<Arc<ApiState>>,
    Path(campaign_id): Path<String>,
) -> Response {
    let Ok(id) = campaign_id.parse::<i64>() else {
        return error_response(
            StatusCode::BAD_REQUEST,
            format!("invalid campaign id: {campaign_id}"),
        );
    };
    match db::get_campaign(&state.pool, id).await {
        Ok(Some(campaign)) => (StatusCode::OK, Json(campaign)).into_response(),
        Ok(None) => error_response(
            StatusCode::NOT_FOUND,
            format!("campaign {campaign_id} not found"),
        ),
        Err(e) => internal_error(e),
    }
}

/// `GET /campaigns/:id/events`
///
/// Returns all indexed events for the given campaign id.
pub async fn get_campaign_events(
    State(state): State<Arc<ApiState>>,
    Path(campaign_id): Path<String>,
) -> Response {
    match db::get_events_for_campaign(&state.pool, &campaign_id).await {
        Ok(events) => {
            let count = events.len();
            (
                StatusCode::OK,
                Json(EventsResponse {
                    campaign_id,
                    count,
                    events,
                }),
            )
                .into_response()
        }
        Err(e) => internal_error(e),
    }
}

/// `GET /campaigns/:id/summary`
///
/// Totals, donor count and closure status folded from the event history.
pub async fn get_campaign_summary(
    State(state): State<Arc<ApiState>>,
    Path(campaign_id): Path<String>,
) -> Response {
    match db::get_events_for_campaign(&state.pool, &campaign_id).await {
        Ok(events) => (
            StatusCode::OK,
            Json(CampaignSummary::from_events(&campaign_id, &events)),
        )
            .into_response(),
        Err(e) => internal_error(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::SosrsEvent;
    use serde_json::Value;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn state() -> Arc<ApiState> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        Arc::new(ApiState { pool })
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn event(event_type: &str, actor: &str, amount: Option<&str>, ledger: i64) -> SosrsEvent {
        SosrsEvent {
            event_id: format!("{ledger}-1"),
            event_type: event_type.to_string(),
            campaign_id: Some("1".to_string()),
            actor: Some(actor.to_string()),
            counterparty: None,
            amount: amount.map(String::from),
            ledger,
            timestamp: 1_716_000_000,
            contract_id: "CCAMPAIGN1".to_string(),
            tx_hash: Some(format!("TX{ledger}")),
        }
    }

    #[tokio::test]
    async fn unknown_campaign_is_404() {
        let state = state().await;
        let response = get_campaign(State(state), Path("7".to_string())).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn malformed_campaign_id_is_400() {
        let state = state().await;
        let response = get_campaign(State(state), Path("abc".to_string())).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn campaign_events_and_summary() {
        let state = state().await;
        db::insert_events(
            &state.pool,
            &[
                event("donation_received", "GA", Some("100"), 10),
                event("donation_received", "GB", Some("50"), 11),
                event("campaign_closed", "GOWNER", None, 12),
            ],
        )
        .await
        .unwrap();

        let response = get_campaign_events(State(state.clone()), Path("1".to_string())).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["campaign_id"], "1");
        assert_eq!(body["count"], 3);

        let response = get_campaign_summary(State(state), Path("1".to_string())).await;
        let body = body_json(response).await;
        assert_eq!(body["donation_count"], 2);
        assert_eq!(body["total_donated"], "150");
        assert_eq!(body["is_closed"], true);
    }

    #[tokio::test]
    async fn list_campaigns_reports_count() {
        let state = state().await;
        db::upsert_campaign(
            &state.pool,
            &CampaignRecord {
                campaign_id: 1,
                contract_address: "CCAMPAIGN1".to_string(),
                owner: "GOWNER".to_string(),
                created_ledger: 10,
                created_at: 1_716_000_000,
            },
        )
        .await
        .unwrap();

        let body = body_json(list_campaigns(State(state)).await).await;
        assert_eq!(body["count"], 1);
        assert_eq!(body["campaigns"][0]["contract_address"], "CCAMPAIGN1");
    }
}
