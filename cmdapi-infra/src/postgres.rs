//! 基于 Postgres（sqlx）的命令条目仓储
//!
//! 标识在登记新建时通过序列预取，变更在 `save_changes` 中于同一事务内提交；
//! 批次在开启事务前即从队列取出，提交失败时整批丢弃并回滚，不会混入之后的提交。
//!
use async_trait::async_trait;
use cmdapi_domain::entity::Entity;
use cmdapi_domain::error::{DomainError, DomainResult};
use cmdapi_domain::{Command, CommandApiRepo, CommandId};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use tokio::sync::Mutex;

use crate::unit_of_work::PendingChange;

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS command_items (
    id BIGSERIAL PRIMARY KEY,
    how_to VARCHAR(250) NOT NULL,
    platform TEXT NOT NULL,
    command_line TEXT NOT NULL
)";

pub struct PgCommandRepo {
    pool: PgPool,
    pending: Mutex<Vec<PendingChange>>,
}

impl PgCommandRepo {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            pending: Mutex::new(Vec::new()),
        }
    }

    /// 建立连接池并确保表结构存在
    pub async fn connect(database_url: &str, max_connections: u32) -> DomainResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        let repo = Self::new(pool);
        repo.ensure_schema().await?;
        Ok(repo)
    }

    pub async fn ensure_schema(&self) -> DomainResult<()> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        Ok(())
    }
}

impl PgCommandRepo {
    /// 尚未提交的变更数量
    pub async fn pending_len(&self) -> usize {
        self.pending.lock().await.len()
    }

    async fn commit_batch(&self, batch: &[PendingChange]) -> DomainResult<()> {
        let mut tx = self.pool.begin().await?;
        for change in batch {
            match change {
                PendingChange::Insert(c) => {
                    sqlx::query(
                        "INSERT INTO command_items (id, how_to, platform, command_line) VALUES ($1, $2, $3, $4)",
                    )
                    .bind(c.id().value())
                    .bind(c.how_to())
                    .bind(c.platform())
                    .bind(c.command_line())
                    .execute(&mut *tx)
                    .await?;
                }
                PendingChange::Update(c) => {
                    sqlx::query(
                        "UPDATE command_items SET how_to = $2, platform = $3, command_line = $4 WHERE id = $1",
                    )
                    .bind(c.id().value())
                    .bind(c.how_to())
                    .bind(c.platform())
                    .bind(c.command_line())
                    .execute(&mut *tx)
                    .await?;
                }
                PendingChange::Delete(_) => {
                    sqlx::query("DELETE FROM command_items WHERE id = $1")
                        .bind(change.id().value())
                        .execute(&mut *tx)
                        .await?;
                }
            }
        }
        tx.commit().await?;
        Ok(())
    }
}

fn command_from_row(row: &PgRow) -> DomainResult<Command> {
    Ok(Command::builder()
        .id(CommandId::new(row.try_get::<i64, _>("id")?))
        .how_to(row.try_get::<String, _>("how_to")?)
        .platform(row.try_get::<String, _>("platform")?)
        .command_line(row.try_get::<String, _>("command_line")?)
        .build())
}

#[async_trait]
impl CommandApiRepo for PgCommandRepo {
    async fn save_changes(&self) -> DomainResult<bool> {
        let batch = std::mem::take(&mut *self.pending.lock().await);
        if batch.is_empty() {
            return Ok(true);
        }

        let applied = batch.len();
        if let Err(err) = self.commit_batch(&batch).await {
            tracing::warn!(discarded = applied, error = %err, "postgres batch discarded");
            return Err(err);
        }

        tracing::debug!(applied, "postgres changes committed");
        Ok(true)
    }

    async fn get_all_commands(&self) -> DomainResult<Vec<Command>> {
        let rows = sqlx::query("SELECT id, how_to, platform, command_line FROM command_items ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(command_from_row).collect()
    }

    async fn get_command_by_id(&self, id: CommandId) -> DomainResult<Option<Command>> {
        let row = sqlx::query(
            "SELECT id, how_to, platform, command_line FROM command_items WHERE id = $1",
        )
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(command_from_row).transpose()
    }

    async fn create_command(&self, command: &mut Command) -> DomainResult<()> {
        if !command.is_transient() {
            return Err(DomainError::InvalidState {
                reason: format!("command already has id {}", command.id()),
            });
        }
        let next: i64 = sqlx::query_scalar(
            "SELECT nextval(pg_get_serial_sequence('command_items', 'id'))",
        )
        .fetch_one(&self.pool)
        .await?;
        command.assign_id(CommandId::new(next))?;
        self.pending
            .lock()
            .await
            .push(PendingChange::Insert(command.clone()));
        Ok(())
    }

    async fn update_command(&self, command: &Command) -> DomainResult<()> {
        if command.is_transient() {
            return Err(DomainError::InvalidValue {
                reason: "cannot update a command without an id".to_string(),
            });
        }
        self.pending
            .lock()
            .await
            .push(PendingChange::Update(command.clone()));
        Ok(())
    }

    async fn delete_command(&self, command: &Command) -> DomainResult<()> {
        self.pending
            .lock()
            .await
            .push(PendingChange::Delete(command.id()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    /// 指向不可达地址的惰性连接池，任何数据库访问都会失败
    fn unreachable_repo() -> PgCommandRepo {
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(500))
            .connect_lazy("postgres://cmdapi@127.0.0.1:1/cmdapi")
            .unwrap();
        PgCommandRepo::new(pool)
    }

    fn persisted(id: i64) -> Command {
        Command::builder()
            .id(CommandId::new(id))
            .how_to("List files")
            .platform("Linux")
            .command_line("ls")
            .build()
    }

    #[tokio::test]
    async fn failed_commit_discards_the_batch() {
        let repo = unreachable_repo();
        repo.update_command(&persisted(1)).await.unwrap();
        repo.delete_command(&persisted(2)).await.unwrap();
        assert_eq!(repo.pending_len().await, 2);

        assert!(repo.save_changes().await.is_err());
        assert_eq!(repo.pending_len().await, 0);
    }

    #[tokio::test]
    async fn later_save_does_not_replay_a_failed_batch() {
        let repo = unreachable_repo();
        repo.update_command(&persisted(1)).await.unwrap();
        assert!(repo.save_changes().await.is_err());

        // 队列已清空：空提交不触达数据库
        assert!(repo.save_changes().await.unwrap());
    }

    #[tokio::test]
    async fn transient_commands_cannot_be_updated() {
        let repo = unreachable_repo();
        let transient = Command::builder()
            .how_to("x")
            .platform("y")
            .command_line("z")
            .build();
        let err = repo.update_command(&transient).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidValue { .. }));
        assert_eq!(repo.pending_len().await, 0);
    }
}
