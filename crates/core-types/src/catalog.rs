//! The predefined catalog of trading mistakes that traders pick tags from.

use crate::enums::MistakeCategory;
use crate::structs::Mistake;

/// Names of the psychology-category mistakes treated as "emotional".
pub const EMOTIONAL_MISTAKES: [&str; 5] = [
    "FOMO trading",
    "Revenge trading",
    "Overconfidence",
    "Hesitation",
    "Confirmation bias",
];

const DEFAULT_MISTAKES: &[(&str, &str, MistakeCategory)] = &[
    ("Entered too early", "Entered position before confirmation signals", MistakeCategory::EntryTiming),
    ("Entered too late", "Missed optimal entry point, entered after move began", MistakeCategory::EntryTiming),
    ("Chased the price", "Bought/sold at worse price trying to catch momentum", MistakeCategory::EntryTiming),
    ("Counter-trend entry", "Entered against prevailing trend", MistakeCategory::EntryTiming),
    ("Exited too early", "Closed profitable trade before target was reached", MistakeCategory::ExitTiming),
    ("Exited too late", "Held losing position hoping for recovery", MistakeCategory::ExitTiming),
    ("Pyramid selling", "Sold winners too quickly, held losers too long", MistakeCategory::ExitTiming),
    ("No stop loss", "Entered without predefined exit plan", MistakeCategory::ExitTiming),
    ("Position too large", "Risked too much capital on single trade", MistakeCategory::PositionSizing),
    ("Position too small", "Risked too little, missed opportunity", MistakeCategory::PositionSizing),
    ("Added to loser", "Increased position size after loss (revenge trading)", MistakeCategory::PositionSizing),
    ("Over-leveraged", "Used excessive leverage relative to account size", MistakeCategory::PositionSizing),
    ("No risk-reward ratio", "Did not consider potential profit vs loss", MistakeCategory::RiskManagement),
    ("Risked >1% per trade", "Violated position sizing rules", MistakeCategory::RiskManagement),
    ("No diversification", "Too concentrated in one asset/strategy", MistakeCategory::RiskManagement),
    ("Ignored correlation", "Did not account for related asset movements", MistakeCategory::RiskManagement),
    ("FOMO trading", "Entered due to fear of missing out", MistakeCategory::Psychology),
    ("Revenge trading", "Traded to recover losses after bad trade", MistakeCategory::Psychology),
    ("Overconfidence", "Traded too aggressively after wins", MistakeCategory::Psychology),
    ("Hesitation", "Failed to act on valid signals due to fear", MistakeCategory::Psychology),
    ("Confirmation bias", "Only saw evidence supporting desired outcome", MistakeCategory::Psychology),
    ("Insufficient research", "Did not properly analyze fundamentals/technicals", MistakeCategory::Analysis),
    ("Ignored news/events", "Failed to account for scheduled news or events", MistakeCategory::Analysis),
    ("Over-relied on indicators", "Used too many conflicting signals", MistakeCategory::Analysis),
    ("Recency bias", "Based decisions on recent events only", MistakeCategory::Analysis),
    ("Slippage", "Got worse price than expected due to market movement", MistakeCategory::Execution),
    ("Poor order type", "Used market order when limit would have been better", MistakeCategory::Execution),
    ("Partial fill issues", "Did not account for partial order fills", MistakeCategory::Execution),
    ("Platform errors", "Mistakes due to trading platform issues", MistakeCategory::Execution),
    ("Journal not updated", "Failed to record trade details properly", MistakeCategory::Other),
    ("No trading plan", "Traded without predefined strategy", MistakeCategory::Other),
    ("Market hours mistake", "Traded during unfavorable market hours", MistakeCategory::Other),
    ("Cost ignorance", "Did not account for fees, spreads, commissions", MistakeCategory::Other),
];

/// Returns the standard mistake catalog. Ids are placeholders (`0`); stores assign real ones.
pub fn default_mistakes() -> Vec<Mistake> {
    DEFAULT_MISTAKES
        .iter()
        .map(|&(name, description, category)| Mistake {
            id: 0,
            name: name.to_string(),
            description: description.to_string(),
            category,
        })
        .collect()
}

/// Sorts a catalog into its canonical order: by category code, then by name.
pub fn sort_catalog(mistakes: &mut [Mistake]) {
    mistakes.sort_by(|a, b| {
        a.category
            .code()
            .cmp(b.category.code())
            .then_with(|| a.name.cmp(&b.name))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalog_names_are_unique_and_valid() {
        let catalog = default_mistakes();
        assert_eq!(catalog.len(), 33);
        let names: HashSet<_> = catalog.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names.len(), catalog.len());
        assert!(catalog.iter().all(|m| m.validate().is_ok()));
    }

    #[test]
    fn emotional_mistakes_are_psychology_entries() {
        let catalog = default_mistakes();
        for name in EMOTIONAL_MISTAKES {
            let mistake = catalog.iter().find(|m| m.name == name).unwrap();
            assert_eq!(mistake.category, MistakeCategory::Psychology);
        }
    }

    #[test]
    fn canonical_order_groups_by_category_code() {
        let mut catalog = default_mistakes();
        sort_catalog(&mut catalog);
        assert_eq!(catalog[0].category, MistakeCategory::Analysis);
        assert_eq!(catalog[0].name, "Ignored news/events");
        assert_eq!(catalog.last().unwrap().category, MistakeCategory::RiskManagement);
    }

    #[test]
    fn names_sort_byte_wise_within_a_category() {
        let mistake = |name: &str| Mistake {
            id: 0,
            name: name.to_string(),
            description: String::new(),
            category: MistakeCategory::Psychology,
        };
        let mut catalog = vec![mistake("apathy"), mistake("Fear"), mistake("FOMO trading"), mistake("Zeal")];

        sort_catalog(&mut catalog);

        let names: Vec<&str> = catalog.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["FOMO trading", "Fear", "Zeal", "apathy"]);
    }
}
