use core_types::{MistakeCategory, Trade};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Closed trades versus open trades for one user.
///
/// Closed trades stand in for "rule followed" and open trades for "rule broken".
/// That is a simplification of trading discipline carried over from the journal's
/// conventions, not a judgement the engine makes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RuleComplianceReport {
    pub closed_count: usize,
    pub closed_pnl: Decimal,
    pub open_count: usize,
    /// Always zero: open trades have no realized P&L.
    pub open_pnl: Decimal,
    /// Zero when there are no closed trades.
    pub average_closed_pnl: Decimal,
    /// closed / (closed + open) * 100, zero for an empty ledger.
    pub compliance_rate_pct: Decimal,
}

impl RuleComplianceReport {
    pub fn total_count(&self) -> usize {
        self.closed_count + self.open_count
    }
}

/// Win statistics for one side of the emotional / non-emotional split.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WinRateStats {
    /// All trades in the partition, open or closed.
    pub total_count: usize,
    pub closed_count: usize,
    pub wins: usize,
    /// wins / closed * 100, zero when nothing in the partition is closed.
    pub win_rate_pct: Decimal,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EmotionWinRateReport {
    /// Trades tagged with at least one emotional mistake.
    pub emotional: WinRateStats,
    /// Every other trade, including untagged ones.
    pub non_emotional: WinRateStats,
    /// emotional - non-emotional, present only when both sides have a closed trade.
    pub win_rate_delta_pct: Option<Decimal>,
}

/// Occurrence and P&L figures for a single mistake tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MistakeStat {
    pub mistake_id: i64,
    pub name: String,
    pub category: MistakeCategory,
    /// Number of trades carrying the tag, open or closed.
    pub frequency: usize,
    /// Number of those trades that are closed.
    pub closed_count: usize,
    /// Sum of P&L over the closed tagged trades.
    pub total_pnl: Decimal,
    /// total_pnl / closed_count, zero when none are closed.
    pub average_pnl: Decimal,
}

/// Mistake occurrences rolled up by category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStat {
    pub category: MistakeCategory,
    pub occurrences: usize,
    pub total_pnl: Decimal,
    /// total_pnl / occurrences.
    pub average_pnl: Decimal,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MistakeFrequencyReport {
    /// How many entries `top_mistakes` was limited to.
    pub top_n: usize,
    /// Number of distinct mistakes tagged at least once.
    pub tagged_mistakes: usize,
    /// The most frequent mistakes, descending by frequency.
    pub top_mistakes: Vec<MistakeStat>,
    /// Roll-up over every tagged mistake, not only the top entries.
    pub categories: Vec<CategoryStat>,
}

impl MistakeFrequencyReport {
    pub fn is_empty(&self) -> bool {
        self.tagged_mistakes == 0
    }
}

/// All three journal reports for one user.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct JournalReport {
    pub total_trades: usize,
    pub rule_compliance: RuleComplianceReport,
    pub emotion_win_rate: EmotionWinRateReport,
    pub mistake_frequency: MistakeFrequencyReport,
}

/// A filtered view of one user's trades with closed/open counts.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LedgerSummary {
    /// Matching trades, most recent entry first.
    pub trades: Vec<Trade>,
    pub total_trades: usize,
    pub closed_trades: usize,
    pub open_trades: usize,
    /// Sum of P&L over the matching closed trades.
    pub total_pnl: Decimal,
    /// Distinct tickers across all of the user's trades, ignoring the filter.
    pub symbols: Vec<String>,
}
