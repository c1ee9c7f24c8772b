//! FILENAME: server/src/http.rs
//! Router, handlers and pagination.
//!
//! Handlers stay thin: they convert transport rejections into the
//! API error shape and delegate to the synchronous `run_analyse` /
//! `run_chart` functions, which the integration tests call directly.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::{
    filter_set_from_json, AnalyseRequest, AnalyseResponse, ChartRequest, ChartResponse,
    DimensionsEcho, ResponseMetadata,
};
use crate::error::ApiError;
use crate::source::FallbackSource;

const DEFAULT_PAGE_SIZE: u32 = 100;
const MAX_PAGE_SIZE: u32 = 100;

/// Shared, read-only per-process state.
pub struct AppState {
    pub source: FallbackSource,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/analyse", get(analyse_get).post(analyse_post))
        .route("/api/analyse/chart", post(chart_post))
        .with_state(state)
}

async fn analyse_post(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AnalyseRequest>, JsonRejection>,
) -> Result<Json<AnalyseResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::Malformed(e.body_text()))?;
    run_analyse(&state, request).map(Json)
}

async fn analyse_get(
    State(state): State<Arc<AppState>>,
    params: Result<Query<AnalyseRequest>, QueryRejection>,
) -> Result<Json<AnalyseResponse>, ApiError> {
    let Query(request) = params.map_err(|e| ApiError::Malformed(e.body_text()))?;
    run_analyse(&state, request).map(Json)
}

async fn chart_post(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChartRequest>, JsonRejection>,
) -> Result<Json<ChartResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::Malformed(e.body_text()))?;
    run_chart(&state, request).map(Json)
}

/// Executes a cube query and assembles the paginated response.
pub fn run_analyse(state: &AppState, request: AnalyseRequest) -> Result<AnalyseResponse, ApiError> {
    let filters = filter_set_from_json(&request.filters)?;
    let selection = request.selection();
    let (output, source) = state.source.query(&selection, &filters)?;

    let page = request.page.unwrap_or(1).max(1);
    let page_size = request
        .page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);

    let total_rows = output.rows.len();
    let start = (page as usize - 1) * page_size as usize;
    let end = (start + page_size as usize).min(total_rows);
    let data = if start < total_rows {
        output.rows[start..end].to_vec()
    } else {
        Vec::new()
    };

    log::debug!(
        "analyse temp={} clie={} emp={} prod={}: {} rows from '{}'",
        selection.temp,
        selection.clie,
        selection.emp,
        selection.prod,
        total_rows,
        source
    );

    Ok(AnalyseResponse {
        success: true,
        data,
        dimensions: DimensionsEcho {
            temp: request.temp,
            clie: request.clie,
            emp: request.emp,
            prod: request.prod,
            filters: request.filters,
        },
        metadata: ResponseMetadata {
            dimension_count: output.dimension_count,
            record_count: total_rows,
            dimension_columns: output.dimension_columns,
            source,
        },
        page,
        page_size,
        total_rows,
        is_last_page: start + (page_size as usize) >= total_rows,
    })
}

/// Executes a flat single-field query for charting clients.
pub fn run_chart(state: &AppState, request: ChartRequest) -> Result<ChartResponse, ApiError> {
    let filters = filter_set_from_json(&request.filters)?;
    let (output, source) = state.source.flat_query(&request.field, &filters)?;
    let record_count = output.rows.len();

    Ok(ChartResponse {
        success: true,
        data: output.rows,
        field: output.dimension_columns[0].clone(),
        metadata: ResponseMetadata {
            dimension_count: output.dimension_count,
            record_count,
            dimension_columns: output.dimension_columns,
            source,
        },
    })
}
