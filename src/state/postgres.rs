// region:    --- Imports
use super::{KeyValue, Ledger, LedgerTransaction, StateRangeIterator, StateStore};
use crate::error::StateResult;
use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Postgres, Transaction};
use std::sync::Arc;
use tracing::{debug, info};

// endregion: --- Imports

// region:    --- Queries
/// Held until the transaction ends, so operations on the same key run one
/// after another. Taken before every keyed read or write.
const LOCK_KEY: &str = "SELECT pg_advisory_xact_lock(hashtext($1))";

const GET_STATE: &str = "SELECT value FROM world_state WHERE key = $1";

const PUT_STATE: &str = r#"
    INSERT INTO world_state (key, value) VALUES ($1, $2)
    ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value
"#;

const DEL_STATE: &str = "DELETE FROM world_state WHERE key = $1";

const GET_STATE_BY_RANGE: &str = r#"
    SELECT key, value
    FROM world_state
    WHERE ($1 = '' OR key >= $1) AND ($2 = '' OR key < $2)
    ORDER BY key
"#;
// endregion: --- Queries

// region:    --- Postgres Ledger
/// World state kept in a single PostgreSQL table.
pub struct PostgresLedger {
    pool: Arc<PgPool>,
}

impl PostgresLedger {
    /// Opens a connection pool to `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> StateResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Shared connection pool.
    pub fn get_pool(&self) -> Arc<PgPool> {
        Arc::clone(&self.pool)
    }

    /// Creates the world state table if it is missing.
    pub async fn initialize_schema(&self) -> StateResult<()> {
        let create_schema_sql = include_str!("../sql/01-create-schema.sql");
        self.execute_multi_query(create_schema_sql).await?;
        info!("{:<12} --> world state schema ready", "Postgres");
        Ok(())
    }

    async fn execute_multi_query(&self, sql: &str) -> StateResult<()> {
        for query in sql.split(';') {
            let query = query.trim();
            if !query.is_empty() {
                sqlx::query(query).execute(&*self.pool).await?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Ledger for PostgresLedger {
    type Transaction = PostgresTransaction;

    /// Starts a READ COMMITTED transaction. Per-key advisory locks make the
    /// read-modify-write of each operation atomic.
    async fn begin(&self) -> StateResult<PostgresTransaction> {
        let tx = self.pool.begin().await?;
        Ok(PostgresTransaction { tx })
    }
}
// endregion: --- Postgres Ledger

// region:    --- Postgres Transaction
pub struct PostgresTransaction {
    tx: Transaction<'static, Postgres>,
}

impl PostgresTransaction {
    /// Blocks until no other transaction holds `key`.
    async fn lock_key(&mut self, key: &str) -> StateResult<()> {
        sqlx::query(LOCK_KEY)
            .bind(key)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl StateStore for PostgresTransaction {
    async fn get_state(&mut self, key: &str) -> StateResult<Option<Vec<u8>>> {
        self.lock_key(key).await?;
        let value = sqlx::query_scalar::<_, Vec<u8>>(GET_STATE)
            .bind(key)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(value)
    }

    async fn put_state(&mut self, key: &str, value: Vec<u8>) -> StateResult<()> {
        self.lock_key(key).await?;
        sqlx::query(PUT_STATE)
            .bind(key)
            .bind(value)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn del_state(&mut self, key: &str) -> StateResult<()> {
        self.lock_key(key).await?;
        sqlx::query(DEL_STATE)
            .bind(key)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn get_state_by_range(
        &mut self,
        start: &str,
        end: &str,
    ) -> StateResult<StateRangeIterator> {
        let rows = sqlx::query_as::<_, (String, Vec<u8>)>(GET_STATE_BY_RANGE)
            .bind(start)
            .bind(end)
            .fetch_all(&mut *self.tx)
            .await?;
        debug!(
            "{:<12} --> range [{:?}, {:?}): {} rows",
            "Postgres",
            start,
            end,
            rows.len()
        );
        let entries = rows
            .into_iter()
            .map(|(key, value)| KeyValue { key, value })
            .collect();
        Ok(StateRangeIterator::new(entries))
    }
}

#[async_trait]
impl LedgerTransaction for PostgresTransaction {
    async fn commit(self) -> StateResult<()> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> StateResult<()> {
        self.tx.rollback().await?;
        Ok(())
    }
}
// endregion: --- Postgres Transaction
