use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use tower_http::cors::CorsLayer;

use crate::aggregator::Aggregator;
use crate::error::QueryError;
use crate::export;
use crate::pricing::{
    profit_breakdown, ListingCosts, MarketSummary, MarketplaceRecord, ProfitBreakdown,
};

#[derive(Clone)]
pub struct AppState {
    aggregator: Arc<Aggregator>,
}

impl AppState {
    pub fn new(aggregator: Aggregator) -> Self {
        Self {
            aggregator: Arc::new(aggregator),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/prices", post(prices))
        .route("/export", post(export_csv))
        .route("/profit", post(profit))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(serde::Deserialize)]
struct PriceReq {
    product: String,
    /// Accepted from the form but never fetched.
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    base_price: Option<Decimal>,
    #[serde(default)]
    profit_margin: Option<Decimal>,
}

#[derive(serde::Serialize)]
struct PriceResp {
    records: Vec<MarketplaceRecord>,
    summary: Option<MarketSummary>,
    generated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(serde::Serialize)]
struct ErrorResp {
    error: String,
}

impl IntoResponse for QueryError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResp {
            error: self.to_string(),
        });
        (StatusCode::BAD_REQUEST, body).into_response()
    }
}

async fn collect(state: &AppState, req: PriceReq) -> Result<Vec<MarketplaceRecord>, QueryError> {
    if let Some(url) = req.url.as_deref().filter(|u| !u.trim().is_empty()) {
        tracing::debug!(product_url = url, "product url supplied");
    }
    state
        .aggregator
        .fetch_all_marketplace_data(
            &req.product,
            req.base_price.unwrap_or_default(),
            req.profit_margin.unwrap_or_default(),
        )
        .await
}

async fn prices(
    State(state): State<AppState>,
    Json(req): Json<PriceReq>,
) -> Result<Json<PriceResp>, QueryError> {
    let records = collect(&state, req).await?;
    let summary = MarketSummary::from_records(&records);
    Ok(Json(PriceResp {
        records,
        summary,
        generated_at: chrono::Utc::now(),
    }))
}

async fn export_csv(State(state): State<AppState>, Json(req): Json<PriceReq>) -> Response {
    let records = match collect(&state, req).await {
        Ok(r) => r,
        Err(e) => return e.into_response(),
    };
    match export::to_csv(&records) {
        Ok(body) => (
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
                (header::CONTENT_DISPOSITION, "attachment; filename=\"output.csv\""),
            ],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = ?e, "csv export failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResp {
                    error: "export failed".to_string(),
                }),
            )
                .into_response()
        }
    }
}

async fn profit(Json(costs): Json<ListingCosts>) -> Json<ProfitBreakdown> {
    Json(profit_breakdown(&costs))
}
