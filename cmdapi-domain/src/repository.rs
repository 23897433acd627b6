//! 命令条目仓储（Repository）
//!
//! 以工作单元（unit of work）方式组织写操作：
//! `create_command`/`update_command`/`delete_command` 仅登记变更，
//! 直到 `save_changes` 才统一提交；读操作只观察已提交的状态。
//!
//! 具体存储后端（内存、Postgres 等）由基础设施层实现并注入。
//!
use crate::command::{Command, CommandId};
use crate::error::DomainResult;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait CommandApiRepo: Send + Sync {
    /// 提交所有已登记的变更，返回提交是否成功
    async fn save_changes(&self) -> DomainResult<bool>;

    /// 获取全部命令条目；为空时返回空集合
    async fn get_all_commands(&self) -> DomainResult<Vec<Command>>;

    /// 按标识查找；不存在时返回 `None`
    async fn get_command_by_id(&self, id: CommandId) -> DomainResult<Option<Command>>;

    /// 登记新建，并为 `command` 分配标识
    async fn create_command(&self, command: &mut Command) -> DomainResult<()>;

    /// 登记覆盖写；提交时标识不存在则为空操作，调用方需先确认存在
    async fn update_command(&self, command: &Command) -> DomainResult<()>;

    /// 登记删除
    async fn delete_command(&self, command: &Command) -> DomainResult<()>;
}

#[async_trait]
impl<T> CommandApiRepo for Arc<T>
where
    T: CommandApiRepo + ?Sized,
{
    async fn save_changes(&self) -> DomainResult<bool> {
        (**self).save_changes().await
    }

    async fn get_all_commands(&self) -> DomainResult<Vec<Command>> {
        (**self).get_all_commands().await
    }

    async fn get_command_by_id(&self, id: CommandId) -> DomainResult<Option<Command>> {
        (**self).get_command_by_id(id).await
    }

    async fn create_command(&self, command: &mut Command) -> DomainResult<()> {
        (**self).create_command(command).await
    }

    async fn update_command(&self, command: &Command) -> DomainResult<()> {
        (**self).update_command(command).await
    }

    async fn delete_command(&self, command: &Command) -> DomainResult<()> {
        (**self).delete_command(command).await
    }
}
