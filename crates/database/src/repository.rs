use crate::DbError;
use analytics::{AmountSource, SourceError};
use async_trait::async_trait;
use core_types::{validate_amount, Transaction, UserId};
use sqlx::postgres::PgPool;

/// Name of the optional index on `sales(user_id)`.
pub const USER_INDEX_NAME: &str = "idx_sales_user_id";

const CREATE_USER_INDEX: &str = "CREATE INDEX IF NOT EXISTS idx_sales_user_id ON sales (user_id)";
const DROP_USER_INDEX: &str = "DROP INDEX IF EXISTS idx_sales_user_id";

/// The `DbRepository` provides a high-level, application-specific interface
/// to the database. It encapsulates all SQL queries and data access logic.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: PgPool,
}

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Fetches a user's amounts in ascending record-id order.
    /// An unknown user yields an empty vector.
    pub async fn get_amounts_for_user(&self, user_id: UserId) -> Result<Vec<f64>, DbError> {
        let amounts = sqlx::query_scalar::<_, f64>(
            "SELECT amount FROM sales WHERE user_id = $1 ORDER BY id ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(amounts)
    }

    /// Fetches the full rows behind `get_amounts_for_user`, in the same order.
    pub async fn get_transactions_for_user(&self, user_id: UserId) -> Result<Vec<Transaction>, DbError> {
        let transactions = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, user_id, amount, recorded_at
            FROM sales
            WHERE user_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(transactions)
    }

    /// Records a single amount and returns the stored row.
    pub async fn save_amount(&self, user_id: UserId, amount: f64) -> Result<Transaction, DbError> {
        let amount = validate_amount(amount)?;

        let transaction = sqlx::query_as::<_, Transaction>(
            r#"
            INSERT INTO sales (user_id, amount)
            VALUES ($1, $2)
            RETURNING id, user_id, amount, recorded_at
            "#,
        )
        .bind(user_id)
        .bind(amount)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(id = transaction.id, %user_id, amount, "Recorded amount.");
        Ok(transaction)
    }

    /// Creates the `user_id` index if it is missing. Idempotent.
    pub async fn ensure_user_index(&self) -> Result<(), DbError> {
        sqlx::query(CREATE_USER_INDEX).execute(&self.pool).await?;
        Ok(())
    }

    /// Drops the `user_id` index if it exists. Idempotent.
    pub async fn drop_user_index(&self) -> Result<(), DbError> {
        sqlx::query(DROP_USER_INDEX).execute(&self.pool).await?;
        Ok(())
    }

    pub async fn has_user_index(&self) -> Result<bool, DbError> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM pg_indexes
                WHERE schemaname = current_schema()
                  AND tablename = 'sales'
                  AND indexname = $1
            )
            "#,
        )
        .bind(USER_INDEX_NAME)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    /// Brings the index in line with the configured `database.user_index` flag.
    /// Only lookup latency changes; query results are identical either way.
    pub async fn apply_user_index_setting(&self, enabled: bool) -> Result<(), DbError> {
        if enabled {
            self.ensure_user_index().await?;
        } else {
            self.drop_user_index().await?;
        }
        tracing::info!(index = USER_INDEX_NAME, enabled, "Applied user index setting.");
        Ok(())
    }
}

#[async_trait]
impl AmountSource for DbRepository {
    async fn fetch_amounts(&self, user_id: UserId) -> Result<Vec<f64>, SourceError> {
        Ok(self.get_amounts_for_user(user_id).await?)
    }
}
