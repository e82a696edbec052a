use crate::{AppState, error::AppError};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use analytics::{RuleFollowed, TradeFilter};
use chrono::NaiveDate;
use core_types::{Mistake, TradeSide};
use reporter::{UserReport, UserTrades};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    /// Overrides how many mistakes the frequency ranking lists.
    pub top: Option<usize>,
}

/// Query parameters of the trade list. Blank values mean "no filter".
#[derive(Debug, Default, Deserialize)]
pub struct TradesQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub symbol: Option<String>,
    pub strategy: Option<String>,
    pub rule_followed: Option<String>,
}

impl TradesQuery {
    pub fn into_filter(self) -> Result<TradeFilter, AppError> {
        Ok(TradeFilter {
            start_date: parse_param(self.start_date, "start_date", |v| {
                NaiveDate::parse_from_str(v, "%Y-%m-%d").map_err(|e| e.to_string())
            })?,
            end_date: parse_param(self.end_date, "end_date", |v| {
                NaiveDate::parse_from_str(v, "%Y-%m-%d").map_err(|e| e.to_string())
            })?,
            symbol: parse_param(self.symbol, "symbol", |v| Ok(v.to_string()))?,
            strategy: parse_param(self.strategy, "strategy", |v| {
                v.parse::<TradeSide>().map_err(|e| e.to_string())
            })?,
            rule_followed: parse_param(self.rule_followed, "rule_followed", |v| {
                v.parse::<RuleFollowed>().map_err(|e| e.to_string())
            })?,
        })
    }
}

fn parse_param<T>(
    value: Option<String>,
    name: &str,
    parse: impl FnOnce(&str) -> Result<T, String>,
) -> Result<Option<T>, AppError> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => parse(raw)
            .map(Some)
            .map_err(|reason| AppError::BadRequest(format!("invalid {name} '{raw}': {reason}"))),
    }
}

fn top_n(query: &ReportQuery, default: usize) -> Result<usize, AppError> {
    match query.top {
        Some(0) => Err(AppError::BadRequest("top must be at least 1".to_string())),
        Some(n) => Ok(n),
        None => Ok(default),
    }
}

/// # GET /api/mistakes
/// The full mistake catalog, in canonical order.
pub async fn get_mistakes(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Mistake>>, AppError> {
    let mistakes = state.store.mistakes().await?;
    Ok(Json(mistakes))
}

/// # GET /api/users/:username/analytics
pub async fn get_user_analytics(
    Path(username): Path<String>,
    Query(query): Query<ReportQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<UserReport>, AppError> {
    let top_n = top_n(&query, state.settings.adhoc_top_n)?;
    let report = state
        .reporter
        .run_for_user(state.store.as_ref(), &username, top_n)
        .await?;
    Ok(Json(report))
}

/// # GET /api/users/:username/trades
/// The user's trades narrowed by date range, symbol, side and closed/open status.
pub async fn get_user_trades(
    Path(username): Path<String>,
    Query(query): Query<TradesQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<UserTrades>, AppError> {
    let filter = query.into_filter()?;
    let trades = state
        .reporter
        .trades_for_user(state.store.as_ref(), &username, &filter)
        .await?;
    Ok(Json(trades))
}

/// # GET /api/analytics
/// Reports for every user with at least one trade.
pub async fn get_all_analytics(
    Query(query): Query<ReportQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserReport>>, AppError> {
    let top_n = top_n(&query, state.settings.scheduled_top_n)?;
    let reports = state.reporter.run_all(state.store.as_ref(), top_n).await?;
    Ok(Json(reports))
}
