use crate::error::DbError;
use core_types::{Mistake, Trade, User};

/// Read access to a journal ledger, plus seeding of the mistake catalog.
///
/// This is the boundary the reports are computed behind: it hands out one
/// user's trades and the full mistake catalog, and never exposes writes to
/// trades.
#[async_trait::async_trait]
pub trait JournalStore: Send + Sync {
    /// Looks up a user by username. `Ok(None)` if nobody has that name.
    async fn find_user(&self, username: &str) -> Result<Option<User>, DbError>;

    /// Every user with at least one trade, ordered by id.
    async fn users_with_trades(&self) -> Result<Vec<User>, DbError>;

    /// All trades of one user, most recent entry first, with their mistake tags.
    async fn trades_for_user(&self, user_id: i64) -> Result<Vec<Trade>, DbError>;

    /// The full mistake catalog, ordered by category code and then name.
    async fn mistakes(&self) -> Result<Vec<Mistake>, DbError>;

    /// Adds every mistake whose name is not in the catalog yet.
    ///
    /// Returns how many were created; existing names are left untouched.
    async fn ensure_mistakes(&self, mistakes: &[Mistake]) -> Result<usize, DbError>;
}
