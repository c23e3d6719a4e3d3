//! PostgreSQL implementation of the vote repository.
//!
//! Provides a PostgreSQL backend for the `VoteRepository` trait with connection
//! pooling and one transaction per vote commit.
//!
//! ## Key Features
//!
//! - Connection pooling with `sqlx::PgPool`
//! - Row lock on the vote record (`SELECT ... FOR UPDATE`) before any write
//! - Conditional insert/update/delete guarded by the expected direction
//! - Counter increments executed by the database (`vote_count = vote_count + $1`)
//! - Schema shipped as embedded `sqlx` migrations
//!
//! ## Database Tables
//!
//! - `votes`: one row per `(user_id, target_id)` with the current direction
//! - `questions`: question aggregates and their `vote_count`
//! - `answers`: answer aggregates and their `vote_count`
use async_trait::async_trait;
use time::OffsetDateTime;
use tracing::debug;
use vote_ledger_shared::types::{
    Direction, TargetAggregate, TargetId, TargetType, UserId, VoteChange, VoteRecord,
};

use crate::{VoteRepository, VoteRepositoryError};

const VOTE_COLUMNS: &str = "user_id, target_id, target_type, direction, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct VoteRow {
    user_id: String,
    target_id: String,
    target_type: String,
    direction: i16,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl TryFrom<VoteRow> for VoteRecord {
    type Error = VoteRepositoryError;

    fn try_from(row: VoteRow) -> Result<Self, Self::Error> {
        Ok(VoteRecord {
            user_id: UserId::new(row.user_id)?,
            target_id: TargetId::new(row.target_id)?,
            target_type: decode_target_type(&row.target_type)?,
            direction: decode_direction(row.direction)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct TargetRow {
    id: String,
    vote_count: i64,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl TargetRow {
    fn into_aggregate(self, target_type: TargetType) -> Result<TargetAggregate, VoteRepositoryError> {
        Ok(TargetAggregate {
            target_type,
            target_id: TargetId::new(self.id)?,
            vote_count: self.vote_count,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn encode_direction(direction: Direction) -> i16 {
    i16::from(i8::from(direction))
}

fn decode_direction(value: i16) -> Result<Direction, VoteRepositoryError> {
    Direction::try_from(i64::from(value)).map_err(|_| VoteRepositoryError::InvalidDirection(value))
}

fn decode_target_type(value: &str) -> Result<TargetType, VoteRepositoryError> {
    value
        .parse()
        .map_err(|_| VoteRepositoryError::InvalidTargetType(value.to_string()))
}

/// Table owning the counter for a target type. Only ever yields a fixed name.
fn aggregate_table(target_type: TargetType) -> &'static str {
    match target_type {
        TargetType::Question => "questions",
        TargetType::Answer => "answers",
    }
}

fn conflict(change: &VoteChange) -> VoteRepositoryError {
    VoteRepositoryError::Conflict {
        user_id: change.user_id.clone(),
        target_id: change.target_id.clone(),
    }
}

/// PostgreSQL implementation of the vote repository.
///
/// Provides database operations for vote records and target counters using
/// PostgreSQL with connection pooling and transaction support.
pub struct PostgresVoteRepository {
    pool: sqlx::PgPool,
}

impl PostgresVoteRepository {
    /// Creates a new PostgreSQL repository instance.
    ///
    /// # Arguments
    ///
    /// * `pool` - Configured PostgreSQL connection pool
    ///
    /// # Returns
    ///
    /// * `Ok(PostgresVoteRepository)` - Ready-to-use repository instance
    /// * `Err(VoteRepositoryError)` - Future validation errors (currently always succeeds)
    pub async fn new(pool: sqlx::PgPool) -> Result<Self, VoteRepositoryError> {
        Ok(Self { pool })
    }

    /// Applies the embedded schema migrations.
    pub async fn run_migrations(&self) -> Result<(), VoteRepositoryError> {
        sqlx::migrate!("src/postgres/migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Writes the vote record side of a change within an active transaction.
    ///
    /// Every statement is guarded by the expected state, so a zero affected-row
    /// count means another writer got there first.
    ///
    /// # Arguments
    ///
    /// * `change` - The change being committed
    /// * `tx` - Active transaction context
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The record now holds `change.next`
    /// * `Err(VoteRepositoryError::Conflict)` - The guarded statement matched no row
    async fn write_vote_tx(
        &self,
        change: &VoteChange,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<(), VoteRepositoryError> {
        let result = match (change.expected, change.next) {
            (None, Some(next)) => {
                sqlx::query(
                    r#"
                    INSERT INTO votes (user_id, target_id, target_type, direction)
                    VALUES ($1, $2, $3, $4)
                    ON CONFLICT (user_id, target_id) DO NOTHING
                    "#,
                )
                .bind(change.user_id.as_str())
                .bind(change.target_id.as_str())
                .bind(change.target_type.as_str())
                .bind(encode_direction(next))
                .execute(&mut **tx)
                .await?
            }
            (Some(expected), Some(next)) => {
                sqlx::query(
                    r#"
                    UPDATE votes
                    SET direction = $3, updated_at = now()
                    WHERE user_id = $1 AND target_id = $2 AND direction = $4
                    "#,
                )
                .bind(change.user_id.as_str())
                .bind(change.target_id.as_str())
                .bind(encode_direction(next))
                .bind(encode_direction(expected))
                .execute(&mut **tx)
                .await?
            }
            (Some(expected), None) => {
                sqlx::query(
                    "DELETE FROM votes WHERE user_id = $1 AND target_id = $2 AND direction = $3",
                )
                .bind(change.user_id.as_str())
                .bind(change.target_id.as_str())
                .bind(encode_direction(expected))
                .execute(&mut **tx)
                .await?
            }
            (None, None) => return Ok(()),
        };

        if result.rows_affected() != 1 {
            return Err(conflict(change));
        }
        Ok(())
    }

    /// Increments the owning aggregate's counter within an active transaction.
    ///
    /// # Returns
    ///
    /// * `Ok(i64)` - The counter after the increment
    /// * `Err(VoteRepositoryError::TargetNotFound)` - No aggregate row matched
    async fn apply_delta_tx(
        &self,
        change: &VoteChange,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<i64, VoteRepositoryError> {
        let query = format!(
            "UPDATE {} SET vote_count = vote_count + $1, updated_at = now() WHERE id = $2 RETURNING vote_count",
            aggregate_table(change.target_type)
        );

        let vote_count: Option<i64> = sqlx::query_scalar(&query)
            .bind(change.delta)
            .bind(change.target_id.as_str())
            .fetch_optional(&mut **tx)
            .await?;

        vote_count.ok_or_else(|| VoteRepositoryError::TargetNotFound {
            target_type: change.target_type,
            target_id: change.target_id.clone(),
        })
    }
}

#[async_trait]
impl VoteRepository for PostgresVoteRepository {
    async fn get_user_vote(
        &self,
        user_id: &UserId,
        target_id: &TargetId,
    ) -> Result<Option<VoteRecord>, VoteRepositoryError> {
        let query = format!("SELECT {VOTE_COLUMNS} FROM votes WHERE user_id = $1 AND target_id = $2");
        let row: Option<VoteRow> = sqlx::query_as(&query)
            .bind(user_id.as_str())
            .bind(target_id.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.map(VoteRecord::try_from).transpose()
    }

    /// Retrieves a user's votes for several targets using `= ANY($2)`.
    async fn get_user_votes(
        &self,
        user_id: &UserId,
        target_ids: &[TargetId],
    ) -> Result<Vec<VoteRecord>, VoteRepositoryError> {
        if target_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = target_ids.iter().map(|id| id.to_string()).collect();
        let query = format!(
            "SELECT {VOTE_COLUMNS} FROM votes WHERE user_id = $1 AND target_id = ANY($2) ORDER BY target_id"
        );
        let rows: Vec<VoteRow> = sqlx::query_as(&query)
            .bind(user_id.as_str())
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(VoteRecord::try_from).collect()
    }

    async fn get_votes_for_targets(
        &self,
        target_ids: &[TargetId],
    ) -> Result<Vec<VoteRecord>, VoteRepositoryError> {
        if target_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = target_ids.iter().map(|id| id.to_string()).collect();
        let query = format!(
            "SELECT {VOTE_COLUMNS} FROM votes WHERE target_id = ANY($1) ORDER BY target_id, created_at"
        );
        let rows: Vec<VoteRow> = sqlx::query_as(&query)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(VoteRecord::try_from).collect()
    }

    async fn get_target(
        &self,
        target_type: TargetType,
        target_id: &TargetId,
    ) -> Result<Option<TargetAggregate>, VoteRepositoryError> {
        let query = format!(
            "SELECT id, vote_count, created_at, updated_at FROM {} WHERE id = $1",
            aggregate_table(target_type)
        );
        let row: Option<TargetRow> = sqlx::query_as(&query)
            .bind(target_id.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| row.into_aggregate(target_type)).transpose()
    }

    async fn create_target(
        &self,
        target_type: TargetType,
        target_id: &TargetId,
    ) -> Result<TargetAggregate, VoteRepositoryError> {
        let table = aggregate_table(target_type);
        let mut tx = self.pool.begin().await?;

        let insert = format!("INSERT INTO {table} (id) VALUES ($1) ON CONFLICT (id) DO NOTHING");
        sqlx::query(&insert)
            .bind(target_id.as_str())
            .execute(&mut *tx)
            .await?;

        let select =
            format!("SELECT id, vote_count, created_at, updated_at FROM {table} WHERE id = $1");
        let row: TargetRow = sqlx::query_as(&select)
            .bind(target_id.as_str())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        row.into_aggregate(target_type)
    }

    /// Atomically commits a vote change in a single transaction.
    ///
    /// Locks the pair's vote row, verifies it is filed under the requested
    /// target type with the expected direction, writes the record and
    /// increments the counter. Any error drops the transaction, which
    /// rolls back whichever write already happened.
    async fn commit_vote(&self, change: &VoteChange) -> Result<i64, VoteRepositoryError> {
        let mut tx = self.pool.begin().await?;

        let locked: Option<(i16, String)> = sqlx::query_as(
            "SELECT direction, target_type FROM votes WHERE user_id = $1 AND target_id = $2 FOR UPDATE",
        )
        .bind(change.user_id.as_str())
        .bind(change.target_id.as_str())
        .fetch_optional(&mut *tx)
        .await?;

        let stored = match locked {
            Some((direction, target_type)) => {
                let target_type = decode_target_type(&target_type)?;
                if target_type != change.target_type {
                    return Err(VoteRepositoryError::TargetTypeMismatch {
                        target_id: change.target_id.clone(),
                        stored: target_type,
                        requested: change.target_type,
                    });
                }
                Some(decode_direction(direction)?)
            }
            None => None,
        };
        if stored != change.expected {
            debug!(
                user_id = %change.user_id,
                target_id = %change.target_id,
                stored = ?stored,
                expected = ?change.expected,
                "Vote precondition no longer holds"
            );
            return Err(conflict(change));
        }

        self.write_vote_tx(change, &mut tx).await?;
        let vote_count = self.apply_delta_tx(change, &mut tx).await?;
        tx.commit().await?;

        Ok(vote_count)
    }

    /// Checks if the tables are created in the database.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If every table exists
    async fn check_tables_created(&self) -> Result<bool, VoteRepositoryError> {
        for table in ["votes", "questions", "answers"] {
            let table_exists: bool = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM information_schema.tables WHERE table_name = $1)",
            )
            .bind(table)
            .fetch_one(&self.pool)
            .await?;
            if !table_exists {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
