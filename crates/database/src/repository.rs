use crate::DbError;
use crate::store::JournalStore;
use chrono::{DateTime, Utc};
use core_types::{Mistake, Symbol, Trade, User, sort_catalog};
use rust_decimal::Decimal;
use sqlx::Row;
use sqlx::postgres::{PgPool, PgRow};
use std::collections::{BTreeSet, HashMap};

/// The `DbRepository` reads the journal's existing PostgreSQL tables
/// (`auth_user`, `journal_symbol`, `journal_trade`, `journal_mistake` and the
/// `journal_trade_mistakes` link table). It never creates or migrates them.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: PgPool,
}

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetches the mistake ids tagged on each of a user's trades.
    async fn tags_for_user(&self, user_id: i64) -> Result<HashMap<i64, BTreeSet<i64>>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT tm.trade_id::BIGINT AS trade_id, tm.mistake_id::BIGINT AS mistake_id
            FROM journal_trade_mistakes AS tm
            JOIN journal_trade AS t ON t.id = tm.trade_id
            WHERE t.user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let mut tags: HashMap<i64, BTreeSet<i64>> = HashMap::new();
        for row in rows {
            let trade_id: i64 = row.try_get("trade_id")?;
            let mistake_id: i64 = row.try_get("mistake_id")?;
            tags.entry(trade_id).or_default().insert(mistake_id);
        }
        Ok(tags)
    }
}

fn user_from_row(row: &PgRow) -> Result<User, DbError> {
    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
    })
}

fn trade_from_row(row: &PgRow) -> Result<Trade, DbError> {
    let side: String = row.try_get("side")?;
    let asset_type: String = row.try_get("asset_type")?;
    let exit_price: Option<Decimal> = row.try_get("exit_price")?;
    let exit_date: Option<DateTime<Utc>> = row.try_get("exit_date")?;

    Ok(Trade {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        symbol: Symbol {
            symbol: row.try_get("symbol")?,
            name: row.try_get("symbol_name")?,
            asset_type: asset_type.parse()?,
        },
        side: side.parse()?,
        quantity: row.try_get("quantity")?,
        entry_price: row.try_get("entry_price")?,
        entry_date: row.try_get("entry_date")?,
        exit_price,
        exit_date,
        notes: row.try_get("notes")?,
        mistakes: BTreeSet::new(),
    })
}

fn mistake_from_row(row: &PgRow) -> Result<Mistake, DbError> {
    let category: String = row.try_get("category")?;
    Ok(Mistake {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        category: category.parse()?,
    })
}

#[async_trait::async_trait]
impl JournalStore for DbRepository {
    async fn find_user(&self, username: &str) -> Result<Option<User>, DbError> {
        let row = sqlx::query("SELECT id::BIGINT AS id, username FROM auth_user WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn users_with_trades(&self) -> Result<Vec<User>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT u.id::BIGINT AS id, u.username
            FROM auth_user AS u
            WHERE EXISTS (SELECT 1 FROM journal_trade AS t WHERE t.user_id = u.id)
            ORDER BY u.id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(user_from_row).collect()
    }

    async fn trades_for_user(&self, user_id: i64) -> Result<Vec<Trade>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT
                t.id::BIGINT AS id, t.user_id::BIGINT AS user_id,
                s.symbol, s.name AS symbol_name, s.asset_type,
                t.side, t.quantity, t.entry_price, t.entry_date,
                t.exit_price, t.exit_date, t.notes
            FROM journal_trade AS t
            JOIN journal_symbol AS s ON s.id = t.symbol_id
            WHERE t.user_id = $1
            ORDER BY t.entry_date DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let mut tags = self.tags_for_user(user_id).await?;
        let mut trades = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut trade = trade_from_row(row)?;
            if let Some(mistakes) = tags.remove(&trade.id) {
                trade.mistakes = mistakes;
            }
            trades.push(trade);
        }

        tracing::debug!(user_id, trades = trades.len(), "Loaded trades from the database.");
        Ok(trades)
    }

    async fn mistakes(&self) -> Result<Vec<Mistake>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT id::BIGINT AS id, name, description, category
            FROM journal_mistake
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        // Sorted here so the order does not depend on the server collation.
        let mut mistakes = rows.iter().map(mistake_from_row).collect::<Result<Vec<_>, _>>()?;
        sort_catalog(&mut mistakes);
        Ok(mistakes)
    }

    async fn ensure_mistakes(&self, mistakes: &[Mistake]) -> Result<usize, DbError> {
        let mut tx = self.pool.begin().await?;
        let mut created = 0;

        for mistake in mistakes {
            mistake.validate()?;
            let result = sqlx::query(
                r#"
                INSERT INTO journal_mistake (name, description, category)
                VALUES ($1, $2, $3)
                ON CONFLICT (name) DO NOTHING
                "#,
            )
            .bind(&mistake.name)
            .bind(&mistake.description)
            .bind(mistake.category.code())
            .execute(&mut *tx)
            .await?;
            created += result.rows_affected() as usize;
        }

        tx.commit().await?;
        tracing::info!(created, "Ensured mistake catalog.");
        Ok(created)
    }
}
