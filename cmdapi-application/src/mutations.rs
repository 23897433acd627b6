//! 命令条目的写用例
//!
//! 每个写用例遵循同一流程：先确认目标存在（新建除外），
//! 再通过仓储登记变更并 `save_changes` 提交。
//!
use async_trait::async_trait;
use cmdapi_domain::{Command, CommandApiRepo, CommandId};
use std::sync::Arc;

use crate::{
    context::AppContext,
    dto::{CommandCreateDto, CommandPatchDto, CommandReadDto, CommandUpdateDto, Validate},
    error::AppError,
    inmemory_mutation_bus::InMemoryMutationBus,
    mutation::Mutation,
    mutation_handler::MutationHandler,
    profile::map_update_onto,
};

#[derive(Debug, Clone)]
pub struct CreateCommand {
    pub dto: CommandCreateDto,
}

impl Mutation for CreateCommand {
    const NAME: &'static str = "commands.create";
    type Output = CommandReadDto;
}

#[derive(Debug, Clone)]
pub struct UpdateCommand {
    pub id: CommandId,
    pub dto: CommandUpdateDto,
}

impl Mutation for UpdateCommand {
    const NAME: &'static str = "commands.update";
    type Output = ();
}

#[derive(Debug, Clone)]
pub struct PatchCommand {
    pub id: CommandId,
    pub patch: CommandPatchDto,
}

impl Mutation for PatchCommand {
    const NAME: &'static str = "commands.patch";
    type Output = ();
}

#[derive(Debug, Clone, Copy)]
pub struct DeleteCommand {
    pub id: CommandId,
}

impl Mutation for DeleteCommand {
    const NAME: &'static str = "commands.delete";
    type Output = ();
}

pub struct CommandMutationHandler {
    repo: Arc<dyn CommandApiRepo>,
}

impl CommandMutationHandler {
    pub fn new(repo: Arc<dyn CommandApiRepo>) -> Self {
        Self { repo }
    }

    /// 将全部写用例注册到变更总线
    pub fn register_into(self: Arc<Self>, bus: &InMemoryMutationBus) -> Result<(), AppError> {
        bus.register::<CreateCommand, _>(self.clone())?;
        bus.register::<UpdateCommand, _>(self.clone())?;
        bus.register::<PatchCommand, _>(self.clone())?;
        bus.register::<DeleteCommand, _>(self)
    }

    async fn existing(&self, id: CommandId) -> Result<Command, AppError> {
        self.repo
            .get_command_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("command {id}")))
    }

    async fn commit(&self) -> Result<(), AppError> {
        if self.repo.save_changes().await? {
            Ok(())
        } else {
            Err(AppError::Infra("changes were not persisted".to_string()))
        }
    }
}

#[async_trait]
impl MutationHandler<CreateCommand> for CommandMutationHandler {
    async fn handle(&self, ctx: &AppContext, m: CreateCommand) -> Result<CommandReadDto, AppError> {
        let mut command = Command::from(m.dto);
        self.repo.create_command(&mut command).await?;
        self.commit().await?;

        tracing::info!(request_id = ctx.request_id(), id = %command.id(), "command created");
        Ok(CommandReadDto::from(&command))
    }
}

#[async_trait]
impl MutationHandler<UpdateCommand> for CommandMutationHandler {
    async fn handle(&self, ctx: &AppContext, m: UpdateCommand) -> Result<(), AppError> {
        let mut command = self.existing(m.id).await?;
        map_update_onto(m.dto, &mut command);
        self.repo.update_command(&command).await?;
        self.commit().await?;

        tracing::info!(request_id = ctx.request_id(), id = %m.id, "command updated");
        Ok(())
    }
}

#[async_trait]
impl MutationHandler<PatchCommand> for CommandMutationHandler {
    async fn handle(&self, ctx: &AppContext, m: PatchCommand) -> Result<(), AppError> {
        let mut command = self.existing(m.id).await?;

        let mut view = CommandUpdateDto::from(&command);
        m.patch.apply_to(&mut view);
        view.validate()?;

        map_update_onto(view, &mut command);
        self.repo.update_command(&command).await?;
        self.commit().await?;

        tracing::info!(request_id = ctx.request_id(), id = %m.id, "command patched");
        Ok(())
    }
}

#[async_trait]
impl MutationHandler<DeleteCommand> for CommandMutationHandler {
    async fn handle(&self, ctx: &AppContext, m: DeleteCommand) -> Result<(), AppError> {
        let command = self.existing(m.id).await?;
        self.repo.delete_command(&command).await?;
        self.commit().await?;

        tracing::info!(request_id = ctx.request_id(), id = %m.id, "command deleted");
        Ok(())
    }
}
