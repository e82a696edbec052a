//! # Trade Journal Analytics Engine
//!
//! This crate derives behavioral statistics from a trader's journal: how much of
//! the P&L comes from closed versus open trades, whether emotional mistakes hurt
//! the win rate, and which mistakes come up most often.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of where the
//!   ledger is stored. It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** The `AnalyticsEngine` takes a user's trades and the
//!   mistake catalog and produces report structs. Nothing is mutated.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: The rule-compliance, emotion-vs-win-rate and mistake-frequency reports.
//! - `JournalReport` and its parts: The structured output, serializable for UIs.
//! - `TradeFilter` and `AnalyticsEngine::ledger_summary`: The filtered trade list.
//! - `summary::render`: The plain-text batch report.
//! - `AnalyticsError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod filter;
pub mod report;
pub mod summary;

// Re-export the key components to create a clean, public-facing API.
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use filter::{RuleFollowed, TradeFilter};
pub use report::{
    CategoryStat, EmotionWinRateReport, JournalReport, LedgerSummary, MistakeFrequencyReport,
    MistakeStat, RuleComplianceReport, WinRateStats,
};
