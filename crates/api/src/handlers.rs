//! Request handlers.

use crate::error::ApiError;
use crate::models::{
    EstimateRequest, HealthResponse, PositionRequest, ScenariosQuery, ScenariosResponse,
};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Query, State},
};
use lp_il_analysis::PoolAnalyzer;
use lp_il_analysis::report::{EstimateReport, PositionReport};
use lp_il_domain::Chain;
use lp_il_domain::metrics::impermanent_loss::il_scenarios;
use std::sync::Arc;
use tracing::info;

pub const SERVICE_NAME: &str = "LP Impermanent Loss Estimator";

fn analyzer_for(state: &AppState, chain_id: u64) -> Result<Arc<PoolAnalyzer>, ApiError> {
    Chain::from_id(chain_id)
        .and_then(|chain| state.analyzer(chain))
        .ok_or(ApiError::UnsupportedChain(chain_id))
}

/// Service status and supported chains.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        supported_chains: state.supported_chains(),
    })
}

/// IL and fee APR of a pool.
pub async fn estimate(
    State(state): State<AppState>,
    Json(request): Json<EstimateRequest>,
) -> Result<Json<EstimateReport>, ApiError> {
    info!(
        pool = %request.pool_address,
        chain = request.chain,
        window_hours = request.window_hours,
        "estimate request"
    );
    let analyzer = analyzer_for(&state, request.chain)?;
    let report = analyzer
        .estimate(&request.pool_address, request.window_hours, &request.options())
        .await?;
    Ok(Json(report))
}

/// Fee earnings of a position in a pool.
pub async fn position(
    State(state): State<AppState>,
    Json(request): Json<PositionRequest>,
) -> Result<Json<PositionReport>, ApiError> {
    let PositionRequest {
        pool,
        position_size_usd,
    } = request;
    if !(position_size_usd.is_finite() && position_size_usd >= 0.0) {
        return Err(ApiError::BadRequest(format!(
            "position_size_usd must be a non-negative number, got {position_size_usd}"
        )));
    }
    info!(
        pool = %pool.pool_address,
        chain = pool.chain,
        position_size_usd,
        "position request"
    );
    let analyzer = analyzer_for(&state, pool.chain)?;
    let report = analyzer
        .position(
            &pool.pool_address,
            pool.window_hours,
            position_size_usd,
            &pool.options(),
        )
        .await?;
    Ok(Json(report))
}

/// IL for standard price moves at the given weights.
pub async fn scenarios(
    Query(query): Query<ScenariosQuery>,
) -> Result<Json<ScenariosResponse>, ApiError> {
    let weights = query.weights().map_err(ApiError::BadRequest)?;
    let scenarios = il_scenarios(&weights).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    Ok(Json(ScenariosResponse { weights, scenarios }))
}
