//! 基于内存的命令条目仓储
//!
//! 已提交状态保存在有序映射中，写操作先登记为 `PendingChange`，
//! 由 `save_changes` 按登记顺序统一应用。
//!
use async_trait::async_trait;
use cmdapi_domain::entity::Entity;
use cmdapi_domain::error::{DomainError, DomainResult};
use cmdapi_domain::{Command, CommandApiRepo, CommandId};
use std::collections::BTreeMap;
use tokio::sync::Mutex;

use crate::unit_of_work::PendingChange;

struct State {
    committed: BTreeMap<CommandId, Command>,
    pending: Vec<PendingChange>,
    next_id: i64,
}

fn successor(id: i64) -> DomainResult<i64> {
    id.checked_add(1).ok_or_else(|| DomainError::InvalidState {
        reason: "command id space exhausted".to_string(),
    })
}

pub struct InMemoryCommandRepo {
    state: Mutex<State>,
}

impl Default for InMemoryCommandRepo {
    fn default() -> Self {
        Self {
            state: Mutex::new(State {
                committed: BTreeMap::new(),
                pending: Vec::new(),
                next_id: 1,
            }),
        }
    }
}

impl InMemoryCommandRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以已提交状态预置数据；瞬态实体按顺序分配标识
    pub fn seeded(commands: impl IntoIterator<Item = Command>) -> DomainResult<Self> {
        let mut committed = BTreeMap::new();
        let mut next_id = 1;

        let mut transient = Vec::new();
        for command in commands {
            if command.is_transient() {
                transient.push(command);
                continue;
            }
            let id = command.id();
            next_id = next_id.max(successor(id.value())?);
            if committed.insert(id, command).is_some() {
                return Err(DomainError::InvalidValue {
                    reason: format!("duplicate seeded command id {id}"),
                });
            }
        }
        for mut command in transient {
            command.assign_id(CommandId::new(next_id))?;
            next_id = successor(next_id)?;
            committed.insert(command.id(), command);
        }

        Ok(Self {
            state: Mutex::new(State {
                committed,
                pending: Vec::new(),
                next_id,
            }),
        })
    }

    /// 尚未提交的变更数量
    pub async fn pending_len(&self) -> usize {
        self.state.lock().await.pending.len()
    }
}

#[async_trait]
impl CommandApiRepo for InMemoryCommandRepo {
    async fn save_changes(&self) -> DomainResult<bool> {
        let mut state = self.state.lock().await;
        let changes = std::mem::take(&mut state.pending);
        let applied = changes.len();
        for change in changes {
            change.apply_to(&mut state.committed);
        }
        tracing::debug!(applied, total = state.committed.len(), "in-memory changes saved");
        Ok(true)
    }

    async fn get_all_commands(&self) -> DomainResult<Vec<Command>> {
        Ok(self.state.lock().await.committed.values().cloned().collect())
    }

    async fn get_command_by_id(&self, id: CommandId) -> DomainResult<Option<Command>> {
        Ok(self.state.lock().await.committed.get(&id).cloned())
    }

    async fn create_command(&self, command: &mut Command) -> DomainResult<()> {
        let mut state = self.state.lock().await;
        command.assign_id(CommandId::new(state.next_id))?;
        state.next_id = successor(state.next_id)?;
        state.pending.push(PendingChange::Insert(command.clone()));
        Ok(())
    }

    async fn update_command(&self, command: &Command) -> DomainResult<()> {
        if command.is_transient() {
            return Err(DomainError::InvalidValue {
                reason: "cannot update a command without an id".to_string(),
            });
        }
        self.state
            .lock()
            .await
            .pending
            .push(PendingChange::Update(command.clone()));
        Ok(())
    }

    async fn delete_command(&self, command: &Command) -> DomainResult<()> {
        self.state
            .lock()
            .await
            .pending
            .push(PendingChange::Delete(command.id()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(how_to: &str) -> Command {
        Command::builder()
            .how_to(how_to)
            .platform("Linux")
            .command_line("true")
            .build()
    }

    #[tokio::test]
    async fn empty_repo_lists_nothing() {
        let repo = InMemoryCommandRepo::new();
        assert!(repo.get_all_commands().await.unwrap().is_empty());
        assert!(repo.get_command_by_id(CommandId::new(1)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn create_is_invisible_until_saved() {
        let repo = InMemoryCommandRepo::new();
        let mut cmd = command("first");
        repo.create_command(&mut cmd).await.unwrap();

        assert_eq!(cmd.id(), CommandId::new(1));
        assert!(repo.get_command_by_id(cmd.id()).await.unwrap().is_none());
        assert_eq!(repo.pending_len().await, 1);

        assert!(repo.save_changes().await.unwrap());
        assert_eq!(repo.get_command_by_id(cmd.id()).await.unwrap(), Some(cmd));
        assert_eq!(repo.pending_len().await, 0);
    }

    #[tokio::test]
    async fn ids_are_assigned_in_sequence() {
        let repo = InMemoryCommandRepo::new();
        let mut a = command("a");
        let mut b = command("b");
        repo.create_command(&mut a).await.unwrap();
        repo.create_command(&mut b).await.unwrap();
        repo.save_changes().await.unwrap();

        let ids: Vec<i64> = repo
            .get_all_commands()
            .await
            .unwrap()
            .iter()
            .map(|c| c.id().value())
            .collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn creating_a_persisted_command_is_rejected() {
        let repo = InMemoryCommandRepo::seeded([command("seed")]).unwrap();
        let mut existing = repo
            .get_command_by_id(CommandId::new(1))
            .await
            .unwrap()
            .unwrap();
        let err = repo.create_command(&mut existing).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidState { .. }));
    }

    #[tokio::test]
    async fn update_overwrites_and_missing_id_is_noop() {
        let repo = InMemoryCommandRepo::seeded([command("seed")]).unwrap();
        let mut cmd = repo
            .get_command_by_id(CommandId::new(1))
            .await
            .unwrap()
            .unwrap();
        cmd.set_how_to("changed");
        repo.update_command(&cmd).await.unwrap();

        let mut ghost = command("ghost");
        ghost.assign_id(CommandId::new(99)).unwrap();
        repo.update_command(&ghost).await.unwrap();

        repo.save_changes().await.unwrap();

        let all = repo.get_all_commands().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].how_to(), "changed");
    }

    #[tokio::test]
    async fn delete_removes_after_save() {
        let repo = InMemoryCommandRepo::seeded([command("a"), command("b")]).unwrap();
        let first = repo
            .get_command_by_id(CommandId::new(1))
            .await
            .unwrap()
            .unwrap();
        repo.delete_command(&first).await.unwrap();
        assert_eq!(repo.get_all_commands().await.unwrap().len(), 2);

        repo.save_changes().await.unwrap();
        let remaining = repo.get_all_commands().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].how_to(), "b");
    }

    #[tokio::test]
    async fn seeding_keeps_existing_ids_and_continues_after_them() {
        let mut fixed = command("fixed");
        fixed.assign_id(CommandId::new(10)).unwrap();
        let repo = InMemoryCommandRepo::seeded([command("loose"), fixed]).unwrap();

        let mut next = command("next");
        repo.create_command(&mut next).await.unwrap();
        assert_eq!(next.id(), CommandId::new(12));

        let loose = repo
            .get_command_by_id(CommandId::new(11))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loose.how_to(), "loose");
    }

    #[test]
    fn seeding_duplicate_ids_is_rejected() {
        let mut a = command("a");
        a.assign_id(CommandId::new(3)).unwrap();
        let mut b = command("b");
        b.assign_id(CommandId::new(3)).unwrap();

        let err = InMemoryCommandRepo::seeded([a, b]).err().unwrap();
        assert!(matches!(err, DomainError::InvalidValue { .. }));
    }

    #[test]
    fn seeding_the_largest_id_does_not_overflow() {
        let mut last = command("last");
        last.assign_id(CommandId::new(i64::MAX)).unwrap();

        let err = InMemoryCommandRepo::seeded([last]).err().unwrap();
        assert!(matches!(err, DomainError::InvalidState { .. }));
    }

    #[tokio::test]
    async fn save_with_nothing_pending_succeeds() {
        let repo = InMemoryCommandRepo::new();
        assert!(repo.save_changes().await.unwrap());
    }
}
