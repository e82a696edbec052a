use crate::error::AnalyticsError;
use crate::filter::TradeFilter;
use crate::report::{
    CategoryStat, EmotionWinRateReport, JournalReport, LedgerSummary, MistakeFrequencyReport,
    MistakeStat, RuleComplianceReport, WinRateStats,
};
use core_types::{EMOTIONAL_MISTAKES, Mistake, MistakeCategory, Trade};
use rust_decimal::Decimal;
use std::collections::{BTreeSet, HashSet};

/// A stateless calculator for deriving journal statistics from a user's trades.
///
/// Every report is a pure pass over borrowed slices; the engine never mutates
/// the ledger and the reports can be computed in any order.
#[derive(Debug, Clone)]
pub struct AnalyticsEngine {
    emotional_mistakes: Vec<String>,
}

impl Default for AnalyticsEngine {
    fn default() -> Self {
        Self {
            emotional_mistakes: EMOTIONAL_MISTAKES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the set of mistake names treated as emotional.
    pub fn with_emotional_mistakes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.emotional_mistakes = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn emotional_mistakes(&self) -> &[String] {
        &self.emotional_mistakes
    }

    /// Runs all three reports over one user's trades.
    ///
    /// # Arguments
    ///
    /// * `trades` - Every trade belonging to the user.
    /// * `catalog` - The full mistake catalog, in canonical order.
    /// * `top_n` - How many mistakes to keep in the frequency ranking.
    pub fn run(
        &self,
        trades: &[Trade],
        catalog: &[Mistake],
        top_n: usize,
    ) -> Result<JournalReport, AnalyticsError> {
        if top_n == 0 {
            return Err(AnalyticsError::InvalidParameter(
                "top_n must be at least 1".to_string(),
            ));
        }
        let mut seen = HashSet::with_capacity(catalog.len());
        for mistake in catalog {
            if !seen.insert(mistake.id) {
                return Err(AnalyticsError::DuplicateMistake(mistake.id));
            }
        }

        for trade in trades {
            trade
                .check_amounts()
                .map_err(|source| AnalyticsError::InvalidTrade { id: trade.id, source })?;
        }

        tracing::debug!(
            trades = trades.len(),
            mistakes = catalog.len(),
            top_n,
            "Computing journal report."
        );

        Ok(JournalReport {
            total_trades: trades.len(),
            rule_compliance: self.rule_compliance(trades)?,
            emotion_win_rate: self.emotion_win_rate(trades, catalog),
            mistake_frequency: self.mistake_frequency(trades, catalog, top_n)?,
        })
    }

    /// Compares closed ("rule followed") against open ("rule broken") trades.
    pub fn rule_compliance(&self, trades: &[Trade]) -> Result<RuleComplianceReport, AnalyticsError> {
        let mut report = RuleComplianceReport::default();

        for trade in trades {
            match trade.pnl()? {
                Some(pnl) => {
                    report.closed_count += 1;
                    report.closed_pnl = add(report.closed_pnl, pnl)?;
                }
                None => report.open_count += 1,
            }
        }

        report.average_closed_pnl = average(report.closed_pnl, report.closed_count);
        report.compliance_rate_pct = percentage(report.closed_count, report.total_count());
        Ok(report)
    }

    /// Win rate of trades tagged with an emotional mistake versus all the others.
    pub fn emotion_win_rate(&self, trades: &[Trade], catalog: &[Mistake]) -> EmotionWinRateReport {
        let emotional_ids: HashSet<i64> = catalog
            .iter()
            .filter(|m| self.emotional_mistakes.iter().any(|name| *name == m.name))
            .map(|m| m.id)
            .collect();

        let (emotional, non_emotional): (Vec<&Trade>, Vec<&Trade>) = trades
            .iter()
            .partition(|t| t.mistakes.iter().any(|id| emotional_ids.contains(id)));

        let emotional = win_rate(&emotional);
        let non_emotional = win_rate(&non_emotional);

        let win_rate_delta_pct = (emotional.closed_count > 0 && non_emotional.closed_count > 0)
            .then(|| emotional.win_rate_pct - non_emotional.win_rate_pct);

        EmotionWinRateReport {
            emotional,
            non_emotional,
            win_rate_delta_pct,
        }
    }

    /// Ranks mistakes by how many trades carry them and rolls them up by category.
    pub fn mistake_frequency(
        &self,
        trades: &[Trade],
        catalog: &[Mistake],
        top_n: usize,
    ) -> Result<MistakeFrequencyReport, AnalyticsError> {
        let mut ranked = Vec::new();
        for mistake in catalog {
            if let Some(stat) = mistake_stat(mistake, trades)? {
                ranked.push(stat);
            }
        }

        // `sort_by` is stable, so equal frequencies keep catalog order.
        ranked.sort_by(|a, b| b.frequency.cmp(&a.frequency));

        let categories = roll_up_categories(&ranked)?;
        let tagged_mistakes = ranked.len();
        ranked.truncate(top_n);

        Ok(MistakeFrequencyReport {
            top_n,
            tagged_mistakes,
            top_mistakes: ranked,
            categories,
        })
    }

    /// Lists the trades matching `filter` with their closed/open counts and realized P&L.
    pub fn ledger_summary(
        &self,
        trades: &[Trade],
        filter: &TradeFilter,
    ) -> Result<LedgerSummary, AnalyticsError> {
        let mut matching: Vec<Trade> = trades.iter().filter(|t| filter.matches(t)).cloned().collect();
        matching.sort_by(|a, b| b.entry_date.cmp(&a.entry_date));

        let mut closed_trades = 0;
        let mut total_pnl = Decimal::ZERO;
        for trade in &matching {
            if let Some(pnl) = trade.pnl()? {
                closed_trades += 1;
                total_pnl = add(total_pnl, pnl)?;
            }
        }

        let symbols: BTreeSet<&str> = trades.iter().map(|t| t.symbol.symbol.as_str()).collect();

        Ok(LedgerSummary {
            total_trades: matching.len(),
            closed_trades,
            open_trades: matching.len() - closed_trades,
            total_pnl,
            symbols: symbols.into_iter().map(str::to_string).collect(),
            trades: matching,
        })
    }
}

fn win_rate(trades: &[&Trade]) -> WinRateStats {
    let closed: Vec<&&Trade> = trades.iter().filter(|t| t.is_closed()).collect();
    let wins = closed.iter().filter(|t| t.is_win()).count();

    WinRateStats {
        total_count: trades.len(),
        closed_count: closed.len(),
        wins,
        win_rate_pct: percentage(wins, closed.len()),
    }
}

fn mistake_stat(mistake: &Mistake, trades: &[Trade]) -> Result<Option<MistakeStat>, AnalyticsError> {
    let tagged: Vec<&Trade> = trades.iter().filter(|t| t.has_mistake(mistake.id)).collect();
    if tagged.is_empty() {
        return Ok(None);
    }

    let mut closed_count = 0;
    let mut total_pnl = Decimal::ZERO;
    for trade in &tagged {
        if let Some(pnl) = trade.pnl()? {
            closed_count += 1;
            total_pnl = add(total_pnl, pnl)?;
        }
    }

    Ok(Some(MistakeStat {
        mistake_id: mistake.id,
        name: mistake.name.clone(),
        category: mistake.category,
        frequency: tagged.len(),
        closed_count,
        total_pnl,
        average_pnl: average(total_pnl, closed_count),
    }))
}

fn roll_up_categories(ranked: &[MistakeStat]) -> Result<Vec<CategoryStat>, AnalyticsError> {
    let mut totals: Vec<(MistakeCategory, usize, Decimal)> = Vec::new();
    for stat in ranked {
        match totals.iter_mut().find(|(category, _, _)| *category == stat.category) {
            Some((_, count, pnl)) => {
                *count += stat.frequency;
                *pnl = add(*pnl, stat.total_pnl)?;
            }
            None => totals.push((stat.category, stat.frequency, stat.total_pnl)),
        }
    }
    totals.sort_by(|a, b| b.1.cmp(&a.1));

    Ok(totals
        .into_iter()
        .map(|(category, occurrences, total_pnl)| CategoryStat {
            category,
            occurrences,
            total_pnl,
            average_pnl: average(total_pnl, occurrences),
        })
        .collect())
}

fn add(total: Decimal, pnl: Decimal) -> Result<Decimal, AnalyticsError> {
    total
        .checked_add(pnl)
        .ok_or_else(|| AnalyticsError::Overflow("P&L total".to_string()))
}

fn average(total: Decimal, count: usize) -> Decimal {
    if count == 0 {
        return Decimal::ZERO;
    }
    total / Decimal::from(count)
}

fn percentage(part: usize, whole: usize) -> Decimal {
    if whole == 0 {
        return Decimal::ZERO;
    }
    Decimal::from(part) / Decimal::from(whole) * Decimal::ONE_HUNDRED
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use core_types::{CoreError, Symbol, TradeSide, default_mistakes, sort_catalog};
    use rust_decimal_macros::dec;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, day, 14, 30, 0).unwrap()
    }

    fn trade(id: i64, side: TradeSide, qty: Decimal, entry: Decimal, exit: Option<Decimal>) -> Trade {
        let trade = Trade::open(id, 1, Symbol::new("AAPL"), side, qty, entry, at(1));
        match exit {
            Some(price) => trade.closed_at(price, at(2)),
            None => trade,
        }
    }

    fn catalog() -> Vec<Mistake> {
        let mut mistakes = default_mistakes();
        sort_catalog(&mut mistakes);
        for (i, m) in mistakes.iter_mut().enumerate() {
            m.id = i as i64 + 1;
        }
        mistakes
    }

    fn id_of(catalog: &[Mistake], name: &str) -> i64 {
        catalog.iter().find(|m| m.name == name).unwrap().id
    }

    #[test]
    fn rule_compliance_matches_worked_example() {
        let trades = vec![
            trade(1, TradeSide::Buy, dec!(100), dec!(10), Some(dec!(12))),
            trade(2, TradeSide::Sell, dec!(50), dec!(20), Some(dec!(18))),
            trade(3, TradeSide::Buy, dec!(10), dec!(5), None),
        ];

        let report = AnalyticsEngine::new().rule_compliance(&trades).unwrap();

        assert_eq!(report.closed_count, 2);
        assert_eq!(report.closed_pnl, dec!(300));
        assert_eq!(report.open_count, 1);
        assert_eq!(report.open_pnl, Decimal::ZERO);
        assert_eq!(report.average_closed_pnl, dec!(150));
        assert_eq!(report.total_count(), trades.len());
        assert_eq!(report.compliance_rate_pct.round_dp(1), dec!(66.7));
    }

    #[test]
    fn rule_compliance_on_empty_ledger_is_all_zero() {
        let report = AnalyticsEngine::new().rule_compliance(&[]).unwrap();
        assert_eq!(report, RuleComplianceReport::default());
        assert_eq!(report.compliance_rate_pct, Decimal::ZERO);
    }

    #[test]
    fn half_exited_trades_are_open() {
        let mut odd = trade(1, TradeSide::Buy, dec!(1), dec!(10), None);
        odd.exit_price = Some(dec!(15));
        let report = AnalyticsEngine::new().rule_compliance(&[odd]).unwrap();
        assert_eq!(report.open_count, 1);
        assert_eq!(report.open_pnl, Decimal::ZERO);
        assert_eq!(report.average_closed_pnl, Decimal::ZERO);
    }

    #[test]
    fn emotional_split_uses_any_emotional_tag() {
        let catalog = catalog();
        let fomo = id_of(&catalog, "FOMO trading");
        let slippage = id_of(&catalog, "Slippage");

        let trades = vec![
            // emotional: one win, one breakeven loss, one open
            trade(1, TradeSide::Buy, dec!(1), dec!(10), Some(dec!(11))).tagged([fomo]),
            trade(2, TradeSide::Sell, dec!(1), dec!(10), Some(dec!(10))).tagged([fomo, slippage]),
            trade(3, TradeSide::Buy, dec!(1), dec!(10), None).tagged([fomo]),
            // non-emotional: non-emotional tag and untagged
            trade(4, TradeSide::Sell, dec!(1), dec!(10), Some(dec!(9))).tagged([slippage]),
            trade(5, TradeSide::Buy, dec!(1), dec!(10), Some(dec!(9))),
        ];

        let report = AnalyticsEngine::new().emotion_win_rate(&trades, &catalog);

        assert_eq!(report.emotional.total_count, 3);
        assert_eq!(report.emotional.closed_count, 2);
        assert_eq!(report.emotional.wins, 1);
        assert_eq!(report.emotional.win_rate_pct, dec!(50));
        assert_eq!(report.non_emotional.total_count, 2);
        assert_eq!(report.non_emotional.closed_count, 2);
        assert_eq!(report.non_emotional.wins, 1);
        assert_eq!(report.win_rate_delta_pct, Some(Decimal::ZERO));
    }

    #[test]
    fn delta_is_absent_without_closed_trades_on_both_sides() {
        let catalog = catalog();
        let trades = vec![trade(1, TradeSide::Buy, dec!(1), dec!(10), Some(dec!(12)))];

        let report = AnalyticsEngine::new().emotion_win_rate(&trades, &catalog);

        assert_eq!(report.emotional, WinRateStats::default());
        assert_eq!(report.non_emotional.win_rate_pct, dec!(100));
        assert_eq!(report.win_rate_delta_pct, None);
    }

    #[test]
    fn emotional_names_missing_from_catalog_match_nothing() {
        let catalog = catalog();
        let fomo = id_of(&catalog, "FOMO trading");
        let trades = vec![trade(1, TradeSide::Buy, dec!(1), dec!(10), Some(dec!(12))).tagged([fomo])];

        let engine = AnalyticsEngine::new().with_emotional_mistakes(["Tilt"]);
        let report = engine.emotion_win_rate(&trades, &catalog);

        assert_eq!(report.emotional.total_count, 0);
        assert_eq!(report.non_emotional.total_count, 1);
    }

    #[test]
    fn mistake_frequency_matches_worked_example() {
        let catalog = catalog();
        let fomo = id_of(&catalog, "FOMO trading");
        let trades = vec![
            trade(1, TradeSide::Buy, dec!(10), dec!(10), Some(dec!(15))).tagged([fomo]),
            trade(2, TradeSide::Buy, dec!(10), dec!(10), Some(dec!(7))).tagged([fomo]),
        ];

        let report = AnalyticsEngine::new().mistake_frequency(&trades, &catalog, 10).unwrap();

        assert_eq!(report.tagged_mistakes, 1);
        let stat = &report.top_mistakes[0];
        assert_eq!(stat.name, "FOMO trading");
        assert_eq!(stat.frequency, 2);
        assert_eq!(stat.total_pnl, dec!(20));
        assert_eq!(stat.average_pnl, dec!(10));
    }

    #[test]
    fn open_only_tags_are_counted_with_zero_average() {
        let catalog = catalog();
        let hesitation = id_of(&catalog, "Hesitation");
        let trades = vec![trade(1, TradeSide::Buy, dec!(1), dec!(10), None).tagged([hesitation])];

        let report = AnalyticsEngine::new().mistake_frequency(&trades, &catalog, 5).unwrap();

        let stat = &report.top_mistakes[0];
        assert_eq!(stat.frequency, 1);
        assert_eq!(stat.closed_count, 0);
        assert_eq!(stat.total_pnl, Decimal::ZERO);
        assert_eq!(stat.average_pnl, Decimal::ZERO);
    }

    #[test]
    fn ranking_is_descending_with_catalog_order_for_ties() {
        let catalog = catalog();
        let slippage = id_of(&catalog, "Slippage");
        let recency = id_of(&catalog, "Recency bias");
        let fomo = id_of(&catalog, "FOMO trading");

        let trades = vec![
            trade(1, TradeSide::Buy, dec!(1), dec!(10), Some(dec!(11))).tagged([slippage, fomo]),
            trade(2, TradeSide::Buy, dec!(1), dec!(10), Some(dec!(11))).tagged([fomo, recency]),
            trade(3, TradeSide::Buy, dec!(1), dec!(10), Some(dec!(11))).tagged([fomo]),
        ];

        let report = AnalyticsEngine::new().mistake_frequency(&trades, &catalog, 10).unwrap();
        let names: Vec<&str> = report.top_mistakes.iter().map(|s| s.name.as_str()).collect();

        // analysis sorts before execution in the catalog
        assert_eq!(names, vec!["FOMO trading", "Recency bias", "Slippage"]);
        assert!(report.top_mistakes.iter().all(|s| s.frequency > 0));
    }

    #[test]
    fn top_n_truncates_ranking_but_not_roll_up() {
        let catalog = catalog();
        let tags: Vec<i64> = catalog.iter().take(7).map(|m| m.id).collect();
        let trades = vec![trade(1, TradeSide::Buy, dec!(2), dec!(10), Some(dec!(13))).tagged(tags)];

        let report = AnalyticsEngine::new().mistake_frequency(&trades, &catalog, 5).unwrap();

        assert_eq!(report.tagged_mistakes, 7);
        assert_eq!(report.top_mistakes.len(), 5);
        let rolled_up: usize = report.categories.iter().map(|c| c.occurrences).sum();
        assert_eq!(rolled_up, 7);
    }

    #[test]
    fn category_roll_up_sums_constituents() {
        let catalog = catalog();
        let fomo = id_of(&catalog, "FOMO trading");
        let revenge = id_of(&catalog, "Revenge trading");
        let slippage = id_of(&catalog, "Slippage");

        let trades = vec![
            trade(1, TradeSide::Buy, dec!(10), dec!(10), Some(dec!(15))).tagged([fomo, revenge]),
            trade(2, TradeSide::Sell, dec!(10), dec!(10), Some(dec!(13))).tagged([revenge]),
            trade(3, TradeSide::Buy, dec!(1), dec!(10), None).tagged([slippage]),
        ];

        let report = AnalyticsEngine::new().mistake_frequency(&trades, &catalog, 10).unwrap();

        let psychology = &report.categories[0];
        assert_eq!(psychology.category, MistakeCategory::Psychology);
        let members: Vec<&MistakeStat> = report
            .top_mistakes
            .iter()
            .filter(|s| s.category == MistakeCategory::Psychology)
            .collect();
        assert_eq!(psychology.occurrences, members.iter().map(|s| s.frequency).sum::<usize>());
        assert_eq!(psychology.total_pnl, members.iter().map(|s| s.total_pnl).sum::<Decimal>());
        // fomo +50, revenge +50 and -30
        assert_eq!(psychology.occurrences, 3);
        assert_eq!(psychology.total_pnl, dec!(70));
        assert_eq!(psychology.average_pnl, dec!(70) / dec!(3));

        let execution = &report.categories[1];
        assert_eq!(execution.category, MistakeCategory::Execution);
        assert_eq!(execution.occurrences, 1);
        assert_eq!(execution.average_pnl, Decimal::ZERO);
    }

    #[test]
    fn run_rejects_zero_top_n_and_duplicate_ids() {
        let engine = AnalyticsEngine::new();
        assert!(matches!(
            engine.run(&[], &catalog(), 0),
            Err(AnalyticsError::InvalidParameter(_))
        ));

        let mut duplicated = catalog();
        duplicated[1].id = duplicated[0].id;
        assert!(matches!(
            engine.run(&[], &duplicated, 5),
            Err(AnalyticsError::DuplicateMistake(_))
        ));
    }

    #[test]
    fn oversized_amounts_fail_instead_of_panicking() {
        let catalog = catalog();
        let quantity = Decimal::from_i128_with_scale(10_i128.pow(20), 0);
        let trades = vec![trade(1, TradeSide::Buy, quantity, dec!(1), Some(dec!(10000000000)))];

        assert!(matches!(
            AnalyticsEngine::new().run(&trades, &catalog, 5),
            Err(AnalyticsError::InvalidTrade { id: 1, .. })
        ));
        assert!(matches!(
            AnalyticsEngine::new().rule_compliance(&trades),
            Err(AnalyticsError::Record(CoreError::Overflow(_)))
        ));
    }

    #[test]
    fn ledger_summary_counts_only_matching_trades() {
        let mut trades = vec![
            trade(1, TradeSide::Buy, dec!(100), dec!(10), Some(dec!(12))),
            trade(2, TradeSide::Sell, dec!(50), dec!(20), Some(dec!(18))),
            trade(3, TradeSide::Buy, dec!(10), dec!(5), None),
        ];
        trades[1].symbol = Symbol::new("tsla");
        trades[2].entry_date = at(3);

        let engine = AnalyticsEngine::new();
        let all = engine.ledger_summary(&trades, &TradeFilter::default()).unwrap();
        assert_eq!(all.total_trades, 3);
        assert_eq!(all.closed_trades, 2);
        assert_eq!(all.open_trades, 1);
        assert_eq!(all.total_pnl, dec!(300));
        assert_eq!(all.trades[0].id, 3);
        assert_eq!(all.symbols, vec!["AAPL".to_string(), "TSLA".to_string()]);

        let buys = TradeFilter {
            strategy: Some(TradeSide::Buy),
            ..Default::default()
        };
        let summary = engine.ledger_summary(&trades, &buys).unwrap();
        assert_eq!(summary.total_trades, 2);
        assert_eq!(summary.closed_trades, 1);
        assert_eq!(summary.open_trades, 1);
        assert_eq!(summary.total_pnl, dec!(200));
        assert_eq!(summary.symbols.len(), 2);

        let nothing = TradeFilter {
            symbol: Some("MSFT".to_string()),
            ..Default::default()
        };
        let summary = engine.ledger_summary(&trades, &nothing).unwrap();
        assert_eq!(summary.total_trades, 0);
        assert_eq!(summary.total_pnl, Decimal::ZERO);
    }

    #[test]
    fn run_bundles_all_reports() {
        let catalog = catalog();
        let trades = vec![trade(1, TradeSide::Buy, dec!(1), dec!(10), Some(dec!(12)))];

        let report = AnalyticsEngine::new().run(&trades, &catalog, 5).unwrap();

        assert_eq!(report.total_trades, 1);
        assert_eq!(report.rule_compliance.closed_count, 1);
        assert_eq!(report.mistake_frequency.top_n, 5);
        assert!(report.mistake_frequency.is_empty());
    }
}
