//! HTTP server exposing the scoring core as JSON

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::engine::{AiSummary, CategoryRanking, Comparison, ProductReport, SharedScoringEngine};
use crate::semantic_adapter::UnifiedScore;
use crate::sic::SicResult;
use crate::tco::{calculate_tco, TcoBreakdown, TcoRequest};
use crate::types::{HmumResult, ProductRecord};

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: Option<String>,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub categories: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct CompareParams {
    /// Comma-separated product ids
    pub ids: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);
type ApiResult<T> = Result<Json<T>, ApiError>;

fn api_error(status: StatusCode, error: &str, details: Option<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
            details,
        }),
    )
}

fn internal(e: anyhow::Error) -> ApiError {
    error!("Request failed: {:?}", e);
    api_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal error", Some(e.to_string()))
}

fn unsupported(feature: &str, product: &ProductRecord) -> ApiError {
    api_error(
        StatusCode::NOT_FOUND,
        &format!("{} unavailable", feature),
        Some(format!("product '{}' (category '{}')", product.id, product.category_id)),
    )
}

async fn load_product(engine: &SharedScoringEngine, id: &str) -> Result<ProductRecord, ApiError> {
    match engine.product(id).await {
        Ok(Some(product)) => Ok(product),
        Ok(None) => Err(api_error(StatusCode::NOT_FOUND, "Product not found", Some(id.to_string()))),
        Err(e) => Err(internal(e)),
    }
}

async fn health_handler(State(engine): State<SharedScoringEngine>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "comparatop-scoring".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        categories: engine.categories().ids().into_iter().map(String::from).collect(),
    })
}

async fn score_handler(
    State(engine): State<SharedScoringEngine>,
    Path(id): Path<String>,
) -> ApiResult<HmumResult> {
    let product = load_product(&engine, &id).await?;
    engine
        .score_product(&product)
        .map(Json)
        .ok_or_else(|| unsupported("Score", &product))
}

async fn unified_handler(
    State(engine): State<SharedScoringEngine>,
    Path(id): Path<String>,
) -> ApiResult<UnifiedScore> {
    let product = load_product(&engine, &id).await?;
    engine
        .unified_product(&product)
        .map(Json)
        .ok_or_else(|| unsupported("Unified score", &product))
}

async fn sic_handler(
    State(engine): State<SharedScoringEngine>,
    Path(id): Path<String>,
) -> ApiResult<SicResult> {
    let product = load_product(&engine, &id).await?;
    engine
        .sic_product(&product)
        .map(Json)
        .ok_or_else(|| unsupported("Component analysis", &product))
}

async fn product_tco_handler(
    State(engine): State<SharedScoringEngine>,
    Path(id): Path<String>,
) -> ApiResult<TcoBreakdown> {
    let product = load_product(&engine, &id).await?;
    let sic = engine.sic_product(&product);
    match engine.tco_product(&product, sic.as_ref()) {
        Ok(Some(tco)) => Ok(Json(tco)),
        Ok(None) => Err(unsupported("TCO", &product)),
        Err(e) => Err(api_error(StatusCode::UNPROCESSABLE_ENTITY, "Invalid product data", Some(e.to_string()))),
    }
}

async fn report_handler(
    State(engine): State<SharedScoringEngine>,
    Path(id): Path<String>,
) -> ApiResult<ProductReport> {
    let product = load_product(&engine, &id).await?;
    Ok(Json(engine.report_product(&product)))
}

async fn ranking_handler(
    State(engine): State<SharedScoringEngine>,
    Path(category_id): Path<String>,
) -> ApiResult<CategoryRanking> {
    match engine.rank_category(&category_id).await {
        Ok(Some(ranking)) => Ok(Json(ranking)),
        Ok(None) => Err(api_error(StatusCode::NOT_FOUND, "Category not found", Some(category_id))),
        Err(e) => Err(internal(e)),
    }
}

async fn compare_handler(
    State(engine): State<SharedScoringEngine>,
    Query(params): Query<CompareParams>,
) -> ApiResult<Comparison> {
    let ids: Vec<String> = params
        .ids
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();
    if ids.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "No product ids given", None));
    }
    engine.compare(&ids).await.map(Json).map_err(internal)
}

async fn ai_summary_handler(
    State(engine): State<SharedScoringEngine>,
    Path(id): Path<String>,
) -> ApiResult<AiSummary> {
    match engine.ai_summary(&id).await {
        Ok(Some(summary)) => Ok(Json(summary)),
        Ok(None) => Err(api_error(StatusCode::NOT_FOUND, "Product not found", Some(id))),
        Err(e) => Err(internal(e)),
    }
}

async fn tco_handler(
    State(engine): State<SharedScoringEngine>,
    Json(req): Json<TcoRequest>,
) -> ApiResult<TcoBreakdown> {
    info!("TCO request: price={}, category={:?}", req.price, req.category_id);
    req.resolve(engine.energy_rate())
        .and_then(|input| calculate_tco(&input))
        .map(Json)
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, "Invalid TCO input", Some(e.to_string())))
}

/// Create and configure the HTTP server
pub fn create_router(engine: SharedScoringEngine) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/products/:id/score", get(score_handler))
        .route("/api/products/:id/unified", get(unified_handler))
        .route("/api/products/:id/sic", get(sic_handler))
        .route("/api/products/:id/tco", get(product_tco_handler))
        .route("/api/products/:id/report", get(report_handler))
        .route("/api/categories/:id/ranking", get(ranking_handler))
        .route("/api/compare", get(compare_handler))
        .route("/api/ai/products/:id", get(ai_summary_handler))
        .route("/api/tco", post(tco_handler))
        .with_state(engine)
}

/// Serve on an already-bound listener
pub async fn serve(engine: SharedScoringEngine, listener: tokio::net::TcpListener) -> anyhow::Result<()> {
    let app = create_router(engine);
    info!("Server listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

/// Run the HTTP server
pub async fn run_server(engine: SharedScoringEngine, port: u16) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{}", port);
    info!("Starting ComparaTop scoring server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    serve(engine, listener).await
}
