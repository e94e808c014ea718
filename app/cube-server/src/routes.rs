//! FILENAME: app/cube-server/src/routes.rs
//! HTTP route handlers and router configuration.
//!
//! Handlers decode query strings into engine parameters, call the engine and
//! wrap its `PivotResult` in a JSON response. No aggregation happens here.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use cube_engine::{
    cell as cell_lookup, cube as cube_pivot, dice as dice_filter, face as face_pivot, options as cube_options,
    preset_views, CellKey, CubeOptions, DiceMode, FilterSpec, FilterValues, NumericOrText, PivotRecord,
    PivotResult,
};
use crate::error::{Result, ServerError};
use crate::state::AppState;

const DEFAULT_METRIC: &str = "sales";

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/options", get(options))
        .route("/api/face", get(face))
        .route("/api/cube", get(cube))
        .route("/api/cube/views", get(cube_views))
        .route("/api/dice", get(dice))
        .route("/api/cell", get(cell))
        .with_state(state)
}

/// Splits a comma list, trimming entries and dropping empty ones.
fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn or_default(value: Option<String>, default: &str) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

// ============================================================================
// OPTIONS
// ============================================================================

/// GET /api/options
pub async fn options(State(state): State<AppState>) -> Json<CubeOptions> {
    log_debug!("HTTP", "GET /api/options");
    Json(cube_options(&state.table))
}

// ============================================================================
// FACE
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct FaceQuery {
    pub dim_x: Option<String>,
    pub dim_y: Option<String>,
    pub metric: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FaceResponse {
    pub dim_x: String,
    pub dim_y: String,
    pub metric: String,
    #[serde(flatten)]
    pub result: PivotResult,
}

/// GET /api/face
///
/// Rows are the values of `dim_y`, columns the values of `dim_x`.
pub async fn face(State(state): State<AppState>, Query(query): Query<FaceQuery>) -> Result<Json<FaceResponse>> {
    let dim_x = or_default(query.dim_x, "year");
    let dim_y = or_default(query.dim_y, "region");
    let metric = or_default(query.metric, DEFAULT_METRIC);
    log_info!("HTTP", "GET /api/face dim_x={} dim_y={} metric={}", dim_x, dim_y, metric);

    let result = face_pivot(&state.table, &dim_y, &dim_x, &metric)?;
    Ok(Json(FaceResponse {
        dim_x,
        dim_y,
        metric,
        result,
    }))
}

// ============================================================================
// CUBE
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct CubeQuery {
    pub index: Option<String>,
    pub columns: Option<String>,
    pub metric: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CubeResponse {
    pub index: Vec<String>,
    pub columns: Vec<String>,
    pub metric: String,
    /// Output column labels, Total included.
    pub cols: Vec<String>,
    pub data: Vec<PivotRecord>,
}

/// GET /api/cube
pub async fn cube(State(state): State<AppState>, Query(query): Query<CubeQuery>) -> Result<Json<CubeResponse>> {
    let index = split_list(Some(query.index.as_deref().unwrap_or("product,region")));
    let columns = split_list(Some(query.columns.as_deref().unwrap_or("year,quarter")));
    let metric = or_default(query.metric, DEFAULT_METRIC);
    log_info!("HTTP", "GET /api/cube index={:?} columns={:?} metric={}", index, columns, metric);

    let result = cube_pivot(&state.table, &index, &columns, &metric)?;
    Ok(Json(CubeResponse {
        index,
        columns,
        metric,
        cols: result.columns,
        data: result.data,
    }))
}

/// GET /api/cube/views
///
/// The fixed overview faces, keyed by view name.
pub async fn cube_views(State(state): State<AppState>) -> Result<Json<serde_json::Value>> {
    log_debug!("HTTP", "GET /api/cube/views");
    let mut views = serde_json::Map::new();
    for (name, result) in preset_views(&state.table)? {
        views.insert(name.to_string(), serde_json::to_value(&result.data)?);
    }
    Ok(Json(serde_json::Value::Object(views)))
}

// ============================================================================
// DICE
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct DiceQuery {
    pub years: Option<String>,
    pub regions: Option<String>,
    pub products: Option<String>,
    pub channels: Option<String>,
    pub metric: Option<String>,
    pub mode: Option<String>,
    pub group_by: Option<String>,
}

impl DiceQuery {
    /// Year values are parsed as integers; the other lists stay text.
    pub fn filters(&self) -> FilterSpec {
        let mut filters = FilterSpec::new();
        let lists = [
            ("year", &self.years, true),
            ("region", &self.regions, false),
            ("product", &self.products, false),
            ("channel", &self.channels, false),
        ];
        for (dimension, raw, numeric) in lists {
            let values = split_list(raw.as_deref());
            if values.is_empty() {
                continue;
            }
            let values: FilterValues = values
                .iter()
                .map(|v| if numeric { NumericOrText::parse(v) } else { NumericOrText::text(v.as_str()) })
                .collect();
            filters.restrict(dimension, values);
        }
        filters
    }

    pub fn mode(&self) -> Result<DiceMode> {
        let mode: DiceMode = match self.mode.as_deref().map(str::trim).filter(|m| !m.is_empty()) {
            Some(raw) => raw.parse().map_err(ServerError::BadRequest)?,
            None => DiceMode::Detail,
        };

        match (&mode, self.group_by.as_deref()) {
            (DiceMode::Summary(_), Some(raw)) => match split_list(Some(raw)).as_slice() {
                [] => Ok(mode),
                [first, second] => Ok(DiceMode::summary_by(first.as_str(), second.as_str())),
                _ => Err(ServerError::BadRequest(format!(
                    "group_by needs exactly two dimensions, got '{}'",
                    raw
                ))),
            },
            _ => Ok(mode),
        }
    }
}

/// GET /api/dice
pub async fn dice(State(state): State<AppState>, Query(query): Query<DiceQuery>) -> Result<Json<PivotResult>> {
    let filters = query.filters();
    let mode = query.mode()?;
    let metric = or_default(query.metric.clone(), DEFAULT_METRIC);
    log_info!("HTTP", "GET /api/dice filters={:?} metric={} mode={:?}", filters, metric, mode);

    Ok(Json(dice_filter(&state.table, &filters, &metric, &mode)?))
}

// ============================================================================
// CELL
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct CellQuery {
    pub dim_x: Option<String>,
    pub value_x: Option<String>,
    pub dim_y: Option<String>,
    pub value_y: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CellResponse {
    pub dim_x: String,
    pub value_x: String,
    pub dim_y: String,
    pub value_y: String,
    #[serde(flatten)]
    pub result: PivotResult,
}

/// GET /api/cell
pub async fn cell(State(state): State<AppState>, Query(query): Query<CellQuery>) -> Result<Json<CellResponse>> {
    let dim_x = or_default(query.dim_x, "year");
    let value_x = or_default(query.value_x, "2024");
    let dim_y = or_default(query.dim_y, "region");
    let value_y = or_default(query.value_y, "Norte");
    log_info!("HTTP", "GET /api/cell {}={} {}={}", dim_x, value_x, dim_y, value_y);

    let key = CellKey::parse(&dim_x, &value_x, &dim_y, &value_y);
    let result = cell_lookup(&state.table, &key)?;
    Ok(Json(CellResponse {
        dim_x,
        value_x,
        dim_y,
        value_y,
        result,
    }))
}
