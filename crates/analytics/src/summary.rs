//! Plain-text rendering of a [`JournalReport`], one section per report.
//!
//! Percentages are shown with one decimal and currency with two, rounded half
//! away from zero.

use crate::report::{EmotionWinRateReport, JournalReport, MistakeFrequencyReport, RuleComplianceReport};
use rust_decimal::{Decimal, RoundingStrategy};

/// Renders every section of the report as printable lines joined by newlines.
pub fn render(report: &JournalReport) -> String {
    let mut lines = vec![format!("Total trades: {}", report.total_trades)];

    lines.push(String::new());
    lines.push("1. RULE-FOLLOWED VS RULE-BROKEN P&L ANALYSIS".to_string());
    rule_compliance_lines(&report.rule_compliance, &mut lines);

    lines.push(String::new());
    lines.push("2. EMOTION VS WIN RATE ANALYSIS".to_string());
    emotion_lines(&report.emotion_win_rate, &mut lines);

    lines.push(String::new());
    lines.push("3. MISTAKE FREQUENCY ANALYSIS".to_string());
    mistake_lines(&report.mistake_frequency, &mut lines);

    lines.join("\n")
}

fn rule_compliance_lines(report: &RuleComplianceReport, lines: &mut Vec<String>) {
    if report.total_count() == 0 {
        lines.push("  No trades recorded yet.".to_string());
        return;
    }
    lines.push(format!(
        "  Closed trades (Rule-followed): {} trades, P&L: {}",
        report.closed_count,
        money(report.closed_pnl)
    ));
    lines.push(format!(
        "  Open trades (Rule-broken): {} trades, Unrealized P&L: {}",
        report.open_count,
        money(report.open_pnl)
    ));
    lines.push(format!(
        "  Average P&L per closed trade: {}",
        money(report.average_closed_pnl)
    ));
    lines.push(format!(
        "  Rule compliance rate: {}",
        percent(report.compliance_rate_pct)
    ));
}

fn emotion_lines(report: &EmotionWinRateReport, lines: &mut Vec<String>) {
    for (label, stats) in [
        ("Emotional", &report.emotional),
        ("Non-emotional", &report.non_emotional),
    ] {
        lines.push(format!(
            "  {} trades: {} total, {} closed, {} wins ({} win rate)",
            label,
            stats.total_count,
            stats.closed_count,
            stats.wins,
            percent(stats.win_rate_pct)
        ));
    }

    match report.win_rate_delta_pct {
        Some(delta) => lines.push(format!(
            "  Win rate difference: {}% (emotional vs non-emotional)",
            signed(delta, 1)
        )),
        None => lines.push(
            "  Win rate difference: n/a (needs closed trades in both groups)".to_string(),
        ),
    }
}

fn mistake_lines(report: &MistakeFrequencyReport, lines: &mut Vec<String>) {
    lines.push(format!("  Top {} most frequent mistakes:", report.top_n));
    if report.is_empty() {
        lines.push("    No mistakes tagged in trades yet.".to_string());
        return;
    }

    for (rank, stat) in report.top_mistakes.iter().enumerate() {
        lines.push(format!("    {}. {} ({})", rank + 1, stat.name, stat.category.label()));
        lines.push(format!(
            "       Frequency: {} trades, Avg P&L: {}, Total P&L: {}",
            stat.frequency,
            money(stat.average_pnl),
            money(stat.total_pnl)
        ));
    }

    lines.push(String::new());
    lines.push("  Mistakes by category:".to_string());
    for category in &report.categories {
        lines.push(format!(
            "    {}: {} occurrences, Avg P&L: {}",
            category.category.label(),
            category.occurrences,
            money(category.average_pnl)
        ));
    }
}

/// Formats an amount as dollars with two decimals, e.g. `$-30.00`.
pub fn money(value: Decimal) -> String {
    format!("${:.2}", rounded(value, 2))
}

/// Formats a percentage with one decimal, e.g. `66.7%`.
pub fn percent(value: Decimal) -> String {
    format!("{:.1}%", rounded(value, 1))
}

fn signed(value: Decimal, dp: u32) -> String {
    let value = rounded(value, dp);
    let prec = dp as usize;
    if value.is_sign_negative() {
        format!("{:.*}", prec, value)
    } else {
        format!("+{:.*}", prec, value)
    }
}

/// Rounds half away from zero and drops the sign of a zero result.
fn rounded(value: Decimal, dp: u32) -> Decimal {
    let value = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    if value.is_zero() { value.abs() } else { value }
}
