use super::response::{ApiError, InitializeError};
use super::AppState;
use crate::commands;
use crate::model::{
    CategoryCount, Combined, MonthFilter, Page, PriceRangeCount, Statistics, Transaction,
};
use crate::Error;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

/// A query string that axum could not deserialize, e.g. a repeated parameter, is reported as a
/// `Request` error so it gets the same JSON body as our own validation errors.
type Params<T> = Result<Query<T>, QueryRejection>;

fn params<T>(extracted: Params<T>) -> crate::Result<T> {
    extracted
        .map(|Query(query)| query)
        .map_err(|rejection| Error::request(rejection.body_text()))
}

/// Query parameters are kept as raw strings so that validation errors are ours, not axum's.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct MonthQuery {
    month: Option<String>,
}

impl MonthQuery {
    fn filter(extracted: Params<Self>) -> crate::Result<MonthFilter> {
        let query = params(extracted)?;
        MonthFilter::required(query.month.as_deref())
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListQuery {
    month: Option<String>,
    search: Option<String>,
    page: Option<String>,
    #[serde(rename = "perPage")]
    per_page: Option<String>,
}

pub(crate) async fn initialize(State(state): State<AppState>) -> Result<String, InitializeError> {
    let out = commands::initialize(state.db(), state.source())
        .await
        .map_err(InitializeError)?;
    Ok(out.message().to_string())
}

pub(crate) async fn transactions(
    State(state): State<AppState>,
    query: Params<ListQuery>,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    let failed = ApiError::with("Failed to fetch transactions");
    let query = params(query).map_err(&failed)?;
    let filter = MonthFilter::required(query.month.as_deref()).map_err(&failed)?;
    let page = Page::parse(query.page.as_deref(), query.per_page.as_deref()).map_err(&failed)?;
    let search = query.search.as_deref().unwrap_or_default();
    let rows = commands::list_transactions(state.db(), &filter, search, page)
        .await
        .map_err(&failed)?;
    Ok(Json(rows))
}

pub(crate) async fn statistics(
    State(state): State<AppState>,
    query: Params<MonthQuery>,
) -> Result<Json<Statistics>, ApiError> {
    let failed = ApiError::with("Failed to fetch statistics");
    let filter = MonthQuery::filter(query).map_err(&failed)?;
    let stats = commands::statistics(state.db(), &filter)
        .await
        .map_err(&failed)?;
    Ok(Json(stats))
}

pub(crate) async fn price_range(
    State(state): State<AppState>,
    query: Params<MonthQuery>,
) -> Result<Json<Vec<PriceRangeCount>>, ApiError> {
    let failed = ApiError::with("Failed to fetch price range data");
    let filter = MonthQuery::filter(query).map_err(&failed)?;
    let buckets = commands::price_range(state.db(), &filter)
        .await
        .map_err(&failed)?;
    Ok(Json(buckets))
}

pub(crate) async fn category_breakdown(
    State(state): State<AppState>,
    query: Params<MonthQuery>,
) -> Result<Json<Vec<CategoryCount>>, ApiError> {
    let failed = ApiError::with("Failed to fetch category breakdown");
    let filter = MonthQuery::filter(query).map_err(&failed)?;
    let rows = commands::category_breakdown(state.db(), &filter)
        .await
        .map_err(&failed)?;
    Ok(Json(rows))
}

pub(crate) async fn combined(
    State(state): State<AppState>,
    query: Params<MonthQuery>,
) -> Result<Json<Combined>, ApiError> {
    let failed = ApiError::with("Failed to combine data");
    let filter = MonthQuery::filter(query).map_err(&failed)?;
    let all = commands::combined(state.db(), &filter)
        .await
        .map_err(&failed)?;
    Ok(Json(all))
}

pub(crate) async fn health() -> &'static str {
    "ok"
}
