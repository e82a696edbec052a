use crate::error::ReporterError;
use analytics::{AnalyticsEngine, JournalReport, LedgerSummary, TradeFilter};
use configuration::ReportSettings;
use core_types::{Mistake, User};
use database::JournalStore;
use serde::Serialize;

pub mod error;

/// A user's journal report, tagged with who it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserReport {
    pub username: String,
    pub report: JournalReport,
}

/// A user's filtered trade list, tagged with who it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserTrades {
    pub username: String,
    pub summary: LedgerSummary,
}

/// Fetches a user's ledger from a `JournalStore` and runs the analytics over it.
pub struct Reporter {
    engine: AnalyticsEngine,
}

impl Reporter {
    pub fn new(settings: &ReportSettings) -> Self {
        Self {
            engine: AnalyticsEngine::new()
                .with_emotional_mistakes(settings.emotional_mistakes.iter().cloned()),
        }
    }

    /// Builds the report for one named user.
    ///
    /// The only hard failure besides storage errors is an unknown username.
    pub async fn run_for_user(
        &self,
        store: &dyn JournalStore,
        username: &str,
        top_n: usize,
    ) -> Result<UserReport, ReporterError> {
        let user = store
            .find_user(username)
            .await?
            .ok_or_else(|| ReporterError::UserNotFound(username.to_string()))?;
        let catalog = store.mistakes().await?;
        self.report_for(store, &user, &catalog, top_n).await
    }

    /// Builds a report for every user who has at least one trade, in user id order.
    pub async fn run_all(
        &self,
        store: &dyn JournalStore,
        top_n: usize,
    ) -> Result<Vec<UserReport>, ReporterError> {
        let users = store.users_with_trades().await?;
        let catalog = store.mistakes().await?;
        tracing::info!(users = users.len(), "Running journal reports for all users.");

        let mut reports = Vec::with_capacity(users.len());
        for user in &users {
            reports.push(self.report_for(store, user, &catalog, top_n).await?);
        }
        Ok(reports)
    }

    /// Lists one named user's trades narrowed by `filter`.
    pub async fn trades_for_user(
        &self,
        store: &dyn JournalStore,
        username: &str,
        filter: &TradeFilter,
    ) -> Result<UserTrades, ReporterError> {
        let user = store
            .find_user(username)
            .await?
            .ok_or_else(|| ReporterError::UserNotFound(username.to_string()))?;
        let trades = store.trades_for_user(user.id).await?;
        let summary = self.engine.ledger_summary(&trades, filter)?;
        tracing::debug!(
            user = %user.username,
            matching = summary.total_trades,
            of = trades.len(),
            "Trade list filtered."
        );
        Ok(UserTrades {
            username: user.username,
            summary,
        })
    }

    async fn report_for(
        &self,
        store: &dyn JournalStore,
        user: &User,
        catalog: &[Mistake],
        top_n: usize,
    ) -> Result<UserReport, ReporterError> {
        let trades = store.trades_for_user(user.id).await?;
        let report = self.engine.run(&trades, catalog, top_n)?;
        tracing::info!(
            user = %user.username,
            trades = report.total_trades,
            tagged_mistakes = report.mistake_frequency.tagged_mistakes,
            "Journal report computed."
        );
        Ok(UserReport {
            username: user.username.clone(),
            report,
        })
    }
}
