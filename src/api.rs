//! The HTTP surface: a thin adapter from request parameters to the store
//! and query engine. Parsing and status-code mapping happen here and
//! nowhere else.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDateTime;
use serde::Deserialize;
use serde_json::json;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::application::services::trade_store::TradeStore;
use crate::config::ServerConfig;
use crate::domain::entities::trade::{Side, Trade, TradeDraft};
use crate::domain::errors::{QueryError, StoreError, ValidationErrors};
use crate::domain::services::query::{self, FilterCriteria};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<TradeStore>,
    pub config: ServerConfig,
}

pub fn router(store: Arc<TradeStore>, config: ServerConfig) -> Router {
    let max_body_bytes = config.max_body_bytes;
    let state = AppState { store, config };

    Router::new()
        .route("/", get(root))
        .route("/pagination", get(get_paginated_trades))
        .route("/trades", get(filter_trades).post(create_trade))
        .route(
            "/trades/:trade_id",
            get(get_trade_by_id)
                .put(update_trade)
                .delete(delete_trade),
        )
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Client-visible failures. Domain errors convert into this at the handler
/// boundary and nowhere else.
#[derive(Debug)]
pub enum ApiError {
    Validation(ValidationErrors),
    Query(QueryError),
    NotFound,
    BadParameter { name: &'static str, message: String },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "Validation failed",
                    "violations": errors.violations,
                })),
            )
                .into_response(),
            ApiError::Query(e) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response(),
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Trade not found" })),
            )
                .into_response(),
            ApiError::BadParameter { name, message } => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": format!("Invalid {}: {}", name, message) })),
            )
                .into_response(),
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl From<QueryError> for ApiError {
    fn from(e: QueryError) -> Self {
        ApiError::Query(e)
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { .. } => ApiError::NotFound,
        }
    }
}

/// Static welcome payload, no store interaction.
async fn root() -> Json<serde_json::Value> {
    Json(json!({ "message": "Welcome to the Trade API" }))
}

#[derive(Debug, Deserialize)]
struct PaginationParams {
    page_num: Option<u64>,
    page_size: Option<u64>,
    sort_by: Option<String>,
}

/// One page of trades, optionally sorted by a record field.
async fn get_paginated_trades(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Vec<Trade>>, ApiError> {
    let records = state.store.list().await;

    let records = match none_if_empty(params.sort_by).as_deref() {
        Some(field) => query::sort_by_field(&records, field)?,
        None => records,
    };

    let page_num = params.page_num.unwrap_or(1);
    let page_size = params.page_size.unwrap_or(state.config.default_page_size);
    let page = query::paginate(&records, page_num, page_size)?;
    Ok(Json(page))
}

#[derive(Debug, Deserialize)]
struct FilterParams {
    search_by_keyword: Option<String>,
    asset_class: Option<String>,
    min_price: Option<f64>,
    max_price: Option<f64>,
    starting_date: Option<String>,
    ending_date: Option<String>,
    #[serde(rename = "trade_type_BUY_OR_SELL")]
    trade_type: Option<String>,
}

/// All trades matching the supplied filter criteria.
async fn filter_trades(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> Result<Json<Vec<Trade>>, ApiError> {
    let criteria = FilterCriteria {
        keyword: none_if_empty(params.search_by_keyword),
        asset_class: none_if_empty(params.asset_class),
        starting_date: parse_datetime_param("starting_date", params.starting_date)?,
        ending_date: parse_datetime_param("ending_date", params.ending_date)?,
        min_price: params.min_price,
        max_price: params.max_price,
        buy_sell_indicator: parse_side_param(
            "trade_type_BUY_OR_SELL",
            none_if_empty(params.trade_type),
        )?,
    };

    let records = state.store.list().await;
    Ok(Json(query::filter(&records, &criteria)))
}

async fn get_trade_by_id(
    State(state): State<AppState>,
    Path(trade_id): Path<String>,
) -> Result<Json<Trade>, ApiError> {
    let id = parse_trade_id(&trade_id)?;
    let trade = state.store.get_by_id(id).await?;
    Ok(Json(trade))
}

/// Create a trade. The server mints the external trade id; any
/// client-supplied value is discarded.
async fn create_trade(
    State(state): State<AppState>,
    Json(draft): Json<TradeDraft>,
) -> Result<Json<Trade>, ApiError> {
    let mut body = draft.validate()?;
    body.trade_id = None;
    let trade = state.store.create(body).await;
    Ok(Json(trade))
}

/// Replace the trade at the given id wholesale with the request body.
async fn update_trade(
    State(state): State<AppState>,
    Path(trade_id): Path<String>,
    Json(draft): Json<TradeDraft>,
) -> Result<Json<Trade>, ApiError> {
    let id = parse_trade_id(&trade_id)?;
    let body = draft.validate()?;
    let trade = state.store.update(id, body).await?;
    Ok(Json(trade))
}

async fn delete_trade(
    State(state): State<AppState>,
    Path(trade_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_trade_id(&trade_id)?;
    state.store.delete(id).await?;
    Ok(Json(json!({ "message": "Trade deleted successfully" })))
}

/// An empty query-string value ("?asset_class=") means the criterion was
/// not supplied.
fn none_if_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// The id path parameter arrives as a string; a non-numeric value is a
/// client error, distinct from a lookup miss.
fn parse_trade_id(raw: &str) -> Result<u64, ApiError> {
    raw.parse::<u64>().map_err(|_| ApiError::BadParameter {
        name: "trade_id",
        message: format!("'{}' is not a numeric id", raw),
    })
}

fn parse_datetime_param(
    name: &'static str,
    value: Option<String>,
) -> Result<Option<NaiveDateTime>, ApiError> {
    match value {
        Some(raw) => raw
            .parse::<NaiveDateTime>()
            .map(Some)
            .map_err(|_| ApiError::BadParameter {
                name,
                message: format!("'{}' is not a valid date-time", raw),
            }),
        None => Ok(None),
    }
}

fn parse_side_param(
    name: &'static str,
    value: Option<String>,
) -> Result<Option<Side>, ApiError> {
    match value {
        Some(raw) => Side::parse(&raw)
            .map(Some)
            .map_err(|message| ApiError::BadParameter { name, message }),
        None => Ok(None),
    }
}
