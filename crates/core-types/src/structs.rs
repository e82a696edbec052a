use crate::enums::{AssetType, MistakeCategory, TradeSide};
use crate::error::CoreError;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Grace period, in minutes, applied when checking that journal timestamps are not in the future.
pub const FUTURE_GRACE_MINUTES: i64 = 1;

/// Longest accepted mistake name.
pub const MAX_MISTAKE_NAME_LEN: usize = 100;

/// Longest accepted ticker.
pub const MAX_TICKER_LEN: usize = 20;

/// Most digits allowed before the decimal point in a quantity or price.
pub const MAX_INTEGER_DIGITS: u32 = 12;

/// Most digits allowed after the decimal point in a quantity or price.
pub const MAX_DECIMAL_PLACES: u32 = 8;

/// The owner of a trade history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
}

/// A tradable instrument (e.g. AAPL, BTC-USD, EUR/USD).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    /// The unique ticker.
    pub symbol: String,
    /// Full name of the asset, may be empty.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub asset_type: AssetType,
}

impl Symbol {
    pub fn new(ticker: &str) -> Self {
        Self {
            symbol: ticker.trim().to_uppercase(),
            name: String::new(),
            asset_type: AssetType::default(),
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        let ticker = self.symbol.trim();
        if ticker.is_empty() {
            return Err(invalid("symbol", "ticker cannot be empty"));
        }
        if ticker.chars().count() > MAX_TICKER_LEN {
            return Err(invalid("symbol", "ticker is too long"));
        }
        Ok(())
    }
}

/// A predefined behavioral mistake that traders tag onto trades.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mistake {
    pub id: i64,
    /// Unique across the catalog.
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: MistakeCategory,
}

impl Mistake {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(invalid("mistake", "name cannot be empty"));
        }
        if self.name.chars().count() > MAX_MISTAKE_NAME_LEN {
            return Err(invalid("mistake", "name is too long"));
        }
        Ok(())
    }
}

/// A single journaled trade.
///
/// A trade is either fully open (no exit price, no exit date) or fully closed.
/// Records coming from outside the journal may still violate that, which is why
/// both exit fields are kept separately and [`Trade::validate`] checks the pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: i64,
    pub user_id: i64,
    pub symbol: Symbol,
    pub side: TradeSide,
    pub quantity: Decimal,
    pub entry_price: Decimal,
    pub entry_date: DateTime<Utc>,
    #[serde(default)]
    pub exit_price: Option<Decimal>,
    #[serde(default)]
    pub exit_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: String,
    /// Ids of the mistakes tagged on this trade.
    #[serde(default)]
    pub mistakes: BTreeSet<i64>,
}

impl Trade {
    /// Creates an open trade with no notes and no tags.
    pub fn open(
        id: i64,
        user_id: i64,
        symbol: Symbol,
        side: TradeSide,
        quantity: Decimal,
        entry_price: Decimal,
        entry_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            symbol,
            side,
            quantity,
            entry_price,
            entry_date,
            exit_price: None,
            exit_date: None,
            notes: String::new(),
            mistakes: BTreeSet::new(),
        }
    }

    /// Returns the trade closed at `price` on `date`.
    pub fn closed_at(mut self, price: Decimal, date: DateTime<Utc>) -> Self {
        self.exit_price = Some(price);
        self.exit_date = Some(date);
        self
    }

    /// Returns the trade with the given mistake ids added to its tags.
    pub fn tagged(mut self, mistake_ids: impl IntoIterator<Item = i64>) -> Self {
        self.mistakes.extend(mistake_ids);
        self
    }

    /// True iff both the exit price and the exit date are recorded.
    pub fn is_closed(&self) -> bool {
        self.exit_price.is_some() && self.exit_date.is_some()
    }

    /// Realized profit and loss, directional by side. `Ok(None)` while the trade is open.
    ///
    /// Fails instead of panicking when the amounts are too large to multiply.
    pub fn pnl(&self) -> Result<Option<Decimal>, CoreError> {
        let exit = match (self.exit_price, self.exit_date) {
            (Some(exit), Some(_)) => exit,
            _ => return Ok(None),
        };
        let move_per_unit = match self.side {
            TradeSide::Buy => exit.checked_sub(self.entry_price),
            TradeSide::Sell => self.entry_price.checked_sub(exit),
        };
        move_per_unit
            .and_then(|diff| diff.checked_mul(self.quantity))
            .map(Some)
            .ok_or_else(|| CoreError::Overflow(format!("P&L of trade {}", self.id)))
    }

    /// A closed trade whose exit moved favorably for its side. Breakeven is not a win.
    pub fn is_win(&self) -> bool {
        match (self.is_closed(), self.exit_price) {
            (true, Some(exit)) => match self.side {
                TradeSide::Buy => exit > self.entry_price,
                TradeSide::Sell => exit < self.entry_price,
            },
            _ => false,
        }
    }

    pub fn has_mistake(&self, mistake_id: i64) -> bool {
        self.mistakes.contains(&mistake_id)
    }

    /// Checks the record rules a journal entry must satisfy.
    ///
    /// `now` is the reference time for the "not in the future" checks.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<(), CoreError> {
        self.symbol.validate()?;

        let latest = now + Duration::minutes(FUTURE_GRACE_MINUTES);
        if self.entry_date > latest {
            return Err(invalid("trade", "entry date cannot be in the future"));
        }
        if let Some(exit_date) = self.exit_date {
            if exit_date > latest {
                return Err(invalid("trade", "exit date cannot be in the future"));
            }
            if exit_date < self.entry_date {
                return Err(invalid("trade", "exit date cannot be before entry date"));
            }
        }
        if self.quantity <= Decimal::ZERO {
            return Err(invalid("trade", "quantity must be greater than zero"));
        }
        if self.entry_price <= Decimal::ZERO {
            return Err(invalid("trade", "entry price must be greater than zero"));
        }
        if let Some(exit_price) = self.exit_price {
            if exit_price <= Decimal::ZERO {
                return Err(invalid("trade", "exit price must be greater than zero"));
            }
        }
        self.check_amounts()?;
        if self.exit_price.is_some() != self.exit_date.is_some() {
            return Err(invalid(
                "trade",
                "both exit price and exit date must be provided together, or both left empty",
            ));
        }
        Ok(())
    }

    /// Checks that quantity and prices fit the journal's decimal columns
    /// (12 integer digits, 8 decimal places).
    pub fn check_amounts(&self) -> Result<(), CoreError> {
        check_amount("quantity", self.quantity)?;
        check_amount("entry price", self.entry_price)?;
        if let Some(exit_price) = self.exit_price {
            check_amount("exit price", exit_price)?;
        }
        Ok(())
    }
}

fn check_amount(field: &str, value: Decimal) -> Result<(), CoreError> {
    let limit = Decimal::from(10_i64.pow(MAX_INTEGER_DIGITS));
    if value.abs().trunc() >= limit {
        return Err(invalid(
            "trade",
            &format!("{field} has more than {MAX_INTEGER_DIGITS} integer digits"),
        ));
    }
    if value.normalize().scale() > MAX_DECIMAL_PLACES {
        return Err(invalid(
            "trade",
            &format!("{field} has more than {MAX_DECIMAL_PLACES} decimal places"),
        ));
    }
    Ok(())
}

fn invalid(what: &str, reason: &str) -> CoreError {
    CoreError::InvalidInput(what.to_string(), reason.to_string())
}
