use crate::error::DbError;
use crate::store::JournalStore;
use chrono::{DateTime, Utc};
use core_types::{Mistake, Trade, User, sort_catalog};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tokio::sync::RwLock;

/// The on-disk shape of a JSON ledger file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub mistakes: Vec<Mistake>,
    #[serde(default)]
    pub trades: Vec<Trade>,
}

impl Ledger {
    /// Checks that the ledger is internally consistent and that every record is valid.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<(), DbError> {
        let mut user_ids = HashSet::new();
        let mut usernames = HashSet::new();
        for user in &self.users {
            if !user_ids.insert(user.id) || !usernames.insert(user.username.as_str()) {
                return Err(DbError::InvalidLedger(format!(
                    "duplicate user '{}' (id {})",
                    user.username, user.id
                )));
            }
        }

        let mut mistake_ids = HashSet::new();
        let mut mistake_names = HashSet::new();
        for mistake in &self.mistakes {
            mistake.validate()?;
            if !mistake_ids.insert(mistake.id) || !mistake_names.insert(mistake.name.as_str()) {
                return Err(DbError::InvalidLedger(format!(
                    "duplicate mistake '{}' (id {})",
                    mistake.name, mistake.id
                )));
            }
        }

        let mut trade_ids = HashSet::new();
        for trade in &self.trades {
            if !trade_ids.insert(trade.id) {
                return Err(DbError::InvalidLedger(format!("duplicate trade id {}", trade.id)));
            }
            if !user_ids.contains(&trade.user_id) {
                return Err(DbError::InvalidLedger(format!(
                    "trade {} belongs to unknown user id {}",
                    trade.id, trade.user_id
                )));
            }
            if let Some(unknown) = trade.mistakes.iter().find(|id| !mistake_ids.contains(*id)) {
                return Err(DbError::InvalidLedger(format!(
                    "trade {} is tagged with unknown mistake id {}",
                    trade.id, unknown
                )));
            }
            trade.validate(now)?;
        }

        Ok(())
    }
}

/// A `JournalStore` over a ledger held in memory.
///
/// Used for JSON ledger files and in tests. Only the mistake catalog can change
/// after construction.
#[derive(Debug, Default)]
pub struct MemoryStore {
    ledger: RwLock<Ledger>,
}

impl MemoryStore {
    /// Wraps a ledger after validating it against the current time.
    pub fn new(ledger: Ledger) -> Result<Self, DbError> {
        ledger.validate(Utc::now())?;
        Ok(Self {
            ledger: RwLock::new(ledger),
        })
    }

    /// Reads and validates a JSON ledger file.
    pub async fn from_json_file(path: &Path) -> Result<Self, DbError> {
        let contents = tokio::fs::read_to_string(path).await?;
        let ledger: Ledger = serde_json::from_str(&contents)?;
        tracing::info!(
            path = %path.display(),
            users = ledger.users.len(),
            trades = ledger.trades.len(),
            mistakes = ledger.mistakes.len(),
            "Loaded ledger file."
        );
        Self::new(ledger)
    }

    /// Writes the current ledger back out as pretty-printed JSON.
    pub async fn write_json_file(&self, path: &Path) -> Result<(), DbError> {
        let contents = {
            let ledger = self.ledger.read().await;
            serde_json::to_string_pretty(&*ledger)?
        };
        tokio::fs::write(path, contents).await?;
        Ok(())
    }

    /// Returns a copy of the ledger as it currently stands.
    pub async fn snapshot(&self) -> Ledger {
        self.ledger.read().await.clone()
    }
}

#[async_trait::async_trait]
impl JournalStore for MemoryStore {
    async fn find_user(&self, username: &str) -> Result<Option<User>, DbError> {
        let ledger = self.ledger.read().await;
        Ok(ledger.users.iter().find(|u| u.username == username).cloned())
    }

    async fn users_with_trades(&self) -> Result<Vec<User>, DbError> {
        let ledger = self.ledger.read().await;
        let mut users: Vec<User> = ledger
            .users
            .iter()
            .filter(|u| ledger.trades.iter().any(|t| t.user_id == u.id))
            .cloned()
            .collect();
        users.sort_by_key(|u| u.id);
        Ok(users)
    }

    async fn trades_for_user(&self, user_id: i64) -> Result<Vec<Trade>, DbError> {
        let ledger = self.ledger.read().await;
        let mut trades: Vec<Trade> = ledger
            .trades
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        trades.sort_by(|a, b| b.entry_date.cmp(&a.entry_date));
        Ok(trades)
    }

    async fn mistakes(&self) -> Result<Vec<Mistake>, DbError> {
        let mut mistakes = self.ledger.read().await.mistakes.clone();
        sort_catalog(&mut mistakes);
        Ok(mistakes)
    }

    async fn ensure_mistakes(&self, mistakes: &[Mistake]) -> Result<usize, DbError> {
        let mut ledger = self.ledger.write().await;
        let mut next_id = ledger.mistakes.iter().map(|m| m.id).max().unwrap_or(0) + 1;
        let mut created = 0;

        for mistake in mistakes {
            mistake.validate()?;
            if ledger.mistakes.iter().any(|m| m.name == mistake.name) {
                continue;
            }
            ledger.mistakes.push(Mistake {
                id: next_id,
                ..mistake.clone()
            });
            next_id += 1;
            created += 1;
        }

        tracing::info!(created, "Ensured mistake catalog.");
        Ok(created)
    }
}
