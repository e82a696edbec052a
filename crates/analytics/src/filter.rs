use crate::error::AnalyticsError;
use chrono::NaiveDate;
use core_types::{Trade, TradeSide};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Narrows a trade list to closed ("rule followed") or open ("rule broken") trades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleFollowed {
    Yes,
    No,
}

impl fmt::Display for RuleFollowed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleFollowed::Yes => write!(f, "yes"),
            RuleFollowed::No => write!(f, "no"),
        }
    }
}

impl FromStr for RuleFollowed {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "yes" => Ok(RuleFollowed::Yes),
            "no" => Ok(RuleFollowed::No),
            other => Err(AnalyticsError::InvalidParameter(format!(
                "rule_followed must be 'yes' or 'no', got '{other}'"
            ))),
        }
    }
}

/// Criteria for listing a user's trades. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeFilter {
    /// Earliest entry date, inclusive.
    pub start_date: Option<NaiveDate>,
    /// Latest entry date, inclusive.
    pub end_date: Option<NaiveDate>,
    /// Ticker, compared case-insensitively.
    pub symbol: Option<String>,
    /// Trade side; the journal calls this the strategy.
    pub strategy: Option<TradeSide>,
    pub rule_followed: Option<RuleFollowed>,
}

impl TradeFilter {
    pub fn matches(&self, trade: &Trade) -> bool {
        let entry_day = trade.entry_date.date_naive();
        if self.start_date.is_some_and(|start| entry_day < start) {
            return false;
        }
        if self.end_date.is_some_and(|end| entry_day > end) {
            return false;
        }
        if let Some(symbol) = &self.symbol {
            if trade.symbol.symbol.to_uppercase() != symbol.trim().to_uppercase() {
                return false;
            }
        }
        if self.strategy.is_some_and(|side| trade.side != side) {
            return false;
        }
        match self.rule_followed {
            Some(RuleFollowed::Yes) => trade.is_closed(),
            Some(RuleFollowed::No) => !trade.is_closed(),
            None => true,
        }
    }
}
