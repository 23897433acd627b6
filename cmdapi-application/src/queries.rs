//! 命令条目的只读用例
use async_trait::async_trait;
use cmdapi_domain::{CommandApiRepo, CommandId};
use std::sync::Arc;

use crate::{
    context::AppContext, dto::CommandReadDto, error::AppError, inmemory_query_bus::InMemoryQueryBus,
    query::Query, query_handler::QueryHandler,
};

/// 列出全部命令条目
#[derive(Debug, Clone, Copy)]
pub struct GetAllCommands;

impl Query for GetAllCommands {
    const NAME: &'static str = "commands.get_all";
    type Dto = Vec<CommandReadDto>;
}

/// 按标识读取命令条目；不存在时结果为 `None`
#[derive(Debug, Clone, Copy)]
pub struct GetCommandById {
    pub id: CommandId,
}

impl Query for GetCommandById {
    const NAME: &'static str = "commands.get_by_id";
    type Dto = Option<CommandReadDto>;
}

pub struct CommandQueryHandler {
    repo: Arc<dyn CommandApiRepo>,
}

impl CommandQueryHandler {
    pub fn new(repo: Arc<dyn CommandApiRepo>) -> Self {
        Self { repo }
    }

    /// 将全部只读用例注册到查询总线
    pub fn register_into(self: Arc<Self>, bus: &InMemoryQueryBus) -> Result<(), AppError> {
        bus.register::<GetAllCommands, _>(self.clone())?;
        bus.register::<GetCommandById, _>(self)
    }
}

#[async_trait]
impl QueryHandler<GetAllCommands> for CommandQueryHandler {
    async fn handle(
        &self,
        ctx: &AppContext,
        _q: GetAllCommands,
    ) -> Result<Vec<CommandReadDto>, AppError> {
        let commands = self.repo.get_all_commands().await?;
        tracing::debug!(
            request_id = ctx.request_id(),
            count = commands.len(),
            "listed commands"
        );
        Ok(commands.iter().map(CommandReadDto::from).collect())
    }
}

#[async_trait]
impl QueryHandler<GetCommandById> for CommandQueryHandler {
    async fn handle(
        &self,
        ctx: &AppContext,
        q: GetCommandById,
    ) -> Result<Option<CommandReadDto>, AppError> {
        let found = self.repo.get_command_by_id(q.id).await?;
        tracing::debug!(
            request_id = ctx.request_id(),
            id = %q.id,
            found = found.is_some(),
            "looked up command"
        );
        Ok(found.as_ref().map(CommandReadDto::from))
    }
}
