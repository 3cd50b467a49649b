//! Idempotent command log
//!
//! Every mutating command carries a caller-supplied idempotency key. The
//! log records one audit row per executed command, keyed uniquely by
//! (tenant, key); a replay returns the recorded result without invoking
//! the executor again.
//!
//! The audit row and the command's own writes commit in one transaction:
//! the executor receives the open transaction and performs all business
//! writes through it, so a crash can never leave the operation performed
//! but unrecorded.

use chrono::Utc;
use sqlx::{PgPool, Postgres, Row, Transaction};
use std::future::Future;
use std::pin::Pin;
use tracing::{info, warn};
use uuid::Uuid;

use core_kernel::{ActorId, TenantId};

use crate::error::{is_unique_violation, DatabaseError};

/// Future returned by a command executor, tied to the open transaction
pub type TxFuture<'t, T> =
    Pin<Box<dyn Future<Output = Result<T, DatabaseError>> + Send + 't>>;

/// The outcome of routing a command through the log
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// The executor ran; its result was recorded
    Executed(serde_json::Value),
    /// A prior execution with the same key was found; its recorded
    /// result is returned and the executor was not invoked
    Duplicate(serde_json::Value),
}

impl CommandOutcome {
    /// The result payload, whichever way it was obtained
    pub fn result(&self) -> &serde_json::Value {
        match self {
            CommandOutcome::Executed(v) | CommandOutcome::Duplicate(v) => v,
        }
    }

    pub fn was_duplicate(&self) -> bool {
        matches!(self, CommandOutcome::Duplicate(_))
    }
}

/// The command audit store
#[derive(Debug, Clone)]
pub struct CommandLog {
    pool: PgPool,
}

impl CommandLog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Executes a command at most once per (tenant, idempotency key)
    ///
    /// The executor performs every business write through the supplied
    /// transaction; the audit row is inserted into the same transaction
    /// before commit. Two racing callers with the same key both reach
    /// the insert, the unique key rejects one, and the loser's business
    /// writes roll back with its transaction - the winner's recorded
    /// result is returned to both.
    ///
    /// # Errors
    ///
    /// Executor errors roll back the transaction and propagate
    /// unchanged; storage errors surface as `DatabaseError`.
    pub async fn try_execute<F>(
        &self,
        tenant_id: TenantId,
        idempotency_key: &str,
        actor_id: ActorId,
        command_name: &str,
        params: serde_json::Value,
        executor: F,
    ) -> Result<CommandOutcome, DatabaseError>
    where
        F: for<'t> FnOnce(&'t mut Transaction<'static, Postgres>) -> TxFuture<'t, serde_json::Value>,
    {
        if let Some(prior) = self.recorded_result(tenant_id, idempotency_key).await? {
            warn!(
                %tenant_id,
                idempotency_key,
                command_name,
                "duplicate command replay, returning recorded result"
            );
            return Ok(CommandOutcome::Duplicate(prior));
        }

        let mut tx = self.pool.begin().await?;
        let result = match executor(&mut tx).await {
            Ok(result) => result,
            Err(error) => {
                tx.rollback().await?;
                return Err(error);
            }
        };

        let insert = sqlx::query(
            r#"
            INSERT INTO command_audit (
                id, tenant_id, idempotency_key, actor_id, command_name,
                params, result, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(*tenant_id.as_uuid())
        .bind(idempotency_key)
        .bind(*actor_id.as_uuid())
        .bind(command_name)
        .bind(&params)
        .bind(&result)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await;

        match insert {
            Ok(_) => {
                tx.commit().await?;
                info!(%tenant_id, idempotency_key, command_name, "command executed and recorded");
                Ok(CommandOutcome::Executed(result))
            }
            Err(error) if is_unique_violation(&error) => {
                // A concurrent caller with the same key won the race;
                // drop this execution's writes and return theirs.
                tx.rollback().await?;
                let prior = self
                    .recorded_result(tenant_id, idempotency_key)
                    .await?
                    .ok_or_else(|| {
                        DatabaseError::TransactionFailed(format!(
                            "audit row for key '{}' vanished after conflict",
                            idempotency_key
                        ))
                    })?;
                warn!(
                    %tenant_id,
                    idempotency_key,
                    command_name,
                    "lost idempotency race, returning winner's result"
                );
                Ok(CommandOutcome::Duplicate(prior))
            }
            Err(error) => {
                tx.rollback().await?;
                Err(error.into())
            }
        }
    }

    /// The recorded result for a key, if the command already ran
    pub async fn recorded_result(
        &self,
        tenant_id: TenantId,
        idempotency_key: &str,
    ) -> Result<Option<serde_json::Value>, DatabaseError> {
        let row = sqlx::query(
            r#"
            SELECT result FROM command_audit
            WHERE tenant_id = $1 AND idempotency_key = $2
            "#,
        )
        .bind(*tenant_id.as_uuid())
        .bind(idempotency_key)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| row.try_get("result").map_err(DatabaseError::from))
            .transpose()
    }
}
