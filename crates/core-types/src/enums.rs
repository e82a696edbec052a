use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The direction of a journaled trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    /// A long position.
    Buy,
    /// A short position.
    Sell,
}

impl TradeSide {
    /// Returns the storage code used by the journal tables.
    pub fn code(&self) -> &'static str {
        match self {
            TradeSide::Buy => "buy",
            TradeSide::Sell => "sell",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TradeSide::Buy => "Buy/Long",
            TradeSide::Sell => "Sell/Short",
        }
    }
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for TradeSide {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buy" => Ok(TradeSide::Buy),
            "sell" => Ok(TradeSide::Sell),
            other => Err(CoreError::UnknownCode("trade side", other.to_string())),
        }
    }
}

/// The behavioral category a mistake belongs to.
///
/// Serialized with the short storage codes (`"entry"`, `"psychology"`, ...)
/// and displayed with the labels from [`MistakeCategory::label`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MistakeCategory {
    #[serde(rename = "entry")]
    EntryTiming,
    #[serde(rename = "exit")]
    ExitTiming,
    #[serde(rename = "position")]
    PositionSizing,
    #[serde(rename = "risk")]
    RiskManagement,
    #[serde(rename = "psychology")]
    Psychology,
    #[serde(rename = "analysis")]
    Analysis,
    #[serde(rename = "execution")]
    Execution,
    #[default]
    #[serde(rename = "other")]
    Other,
}

impl MistakeCategory {
    pub const ALL: [MistakeCategory; 8] = [
        MistakeCategory::EntryTiming,
        MistakeCategory::ExitTiming,
        MistakeCategory::PositionSizing,
        MistakeCategory::RiskManagement,
        MistakeCategory::Psychology,
        MistakeCategory::Analysis,
        MistakeCategory::Execution,
        MistakeCategory::Other,
    ];

    /// Returns the storage code used by the journal tables.
    pub fn code(&self) -> &'static str {
        match self {
            MistakeCategory::EntryTiming => "entry",
            MistakeCategory::ExitTiming => "exit",
            MistakeCategory::PositionSizing => "position",
            MistakeCategory::RiskManagement => "risk",
            MistakeCategory::Psychology => "psychology",
            MistakeCategory::Analysis => "analysis",
            MistakeCategory::Execution => "execution",
            MistakeCategory::Other => "other",
        }
    }

    /// Returns the human-readable label shown in reports.
    pub fn label(&self) -> &'static str {
        match self {
            MistakeCategory::EntryTiming => "Entry Timing",
            MistakeCategory::ExitTiming => "Exit Timing",
            MistakeCategory::PositionSizing => "Position Sizing",
            MistakeCategory::RiskManagement => "Risk Management",
            MistakeCategory::Psychology => "Psychology/Emotion",
            MistakeCategory::Analysis => "Analysis/Research",
            MistakeCategory::Execution => "Trade Execution",
            MistakeCategory::Other => "Other",
        }
    }
}

impl fmt::Display for MistakeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MistakeCategory {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        MistakeCategory::ALL
            .into_iter()
            .find(|c| c.code() == code)
            .ok_or_else(|| CoreError::UnknownCode("mistake category", code.to_string()))
    }
}

/// The kind of instrument a symbol refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    #[default]
    Stock,
    Crypto,
    Forex,
    Commodity,
    Option,
    Future,
    Other,
}

impl AssetType {
    pub fn code(&self) -> &'static str {
        match self {
            AssetType::Stock => "stock",
            AssetType::Crypto => "crypto",
            AssetType::Forex => "forex",
            AssetType::Commodity => "commodity",
            AssetType::Option => "option",
            AssetType::Future => "future",
            AssetType::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AssetType::Crypto => "Cryptocurrency",
            AssetType::Stock => "Stock",
            AssetType::Forex => "Forex",
            AssetType::Commodity => "Commodity",
            AssetType::Option => "Option",
            AssetType::Future => "Future",
            AssetType::Other => "Other",
        }
    }
}

impl FromStr for AssetType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "stock" => Ok(AssetType::Stock),
            "crypto" => Ok(AssetType::Crypto),
            "forex" => Ok(AssetType::Forex),
            "commodity" => Ok(AssetType::Commodity),
            "option" => Ok(AssetType::Option),
            "future" => Ok(AssetType::Future),
            "other" => Ok(AssetType::Other),
            other => Err(CoreError::UnknownCode("asset type", other.to_string())),
        }
    }
}
