//! 命令条目控制器
//!
//! 将每个接口操作转换为应用层查询/变更，并把结果翻译成 HTTP 语义的
//! [`ActionResult`]：找到/未找到/已创建/无内容。与具体 Web 框架无关。
//!
use cmdapi_application::context::AppContext;
use cmdapi_application::dto::{CommandCreateDto, CommandPatchDto, CommandReadDto, CommandUpdateDto};
use cmdapi_application::error::AppError;
use cmdapi_application::mutation_bus::MutationBus;
use cmdapi_application::mutations::{
    CommandMutationHandler, CreateCommand, DeleteCommand, PatchCommand, UpdateCommand,
};
use cmdapi_application::queries::{CommandQueryHandler, GetAllCommands, GetCommandById};
use cmdapi_application::query_bus::QueryBus;
use cmdapi_application::{InMemoryMutationBus, InMemoryQueryBus};
use cmdapi_domain::{CommandApiRepo, CommandId};
use std::sync::Arc;

/// 控制器操作的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionResult<T> {
    /// 200
    Ok(T),
    /// 201，`location` 指向新资源
    Created { location: String, value: T },
    /// 204
    NoContent,
    /// 404
    NotFound,
}

pub struct CommandsController {
    queries: InMemoryQueryBus,
    mutations: InMemoryMutationBus,
}

impl CommandsController {
    pub const ROUTE: &'static str = "/api/commands";

    pub fn new(repo: Arc<dyn CommandApiRepo>) -> Result<Self, AppError> {
        let queries = InMemoryQueryBus::new();
        Arc::new(CommandQueryHandler::new(repo.clone())).register_into(&queries)?;

        let mutations = InMemoryMutationBus::new();
        Arc::new(CommandMutationHandler::new(repo)).register_into(&mutations)?;

        Ok(Self { queries, mutations })
    }

    pub fn location_of(id: i64) -> String {
        format!("{}/{id}", Self::ROUTE)
    }

    pub async fn get_all_commands(
        &self,
        ctx: &AppContext,
    ) -> Result<ActionResult<Vec<CommandReadDto>>, AppError> {
        let items = self.queries.dispatch(ctx, GetAllCommands).await?;
        Ok(ActionResult::Ok(items))
    }

    pub async fn get_command_by_id(
        &self,
        ctx: &AppContext,
        id: CommandId,
    ) -> Result<ActionResult<CommandReadDto>, AppError> {
        match self.queries.dispatch(ctx, GetCommandById { id }).await? {
            Some(dto) => Ok(ActionResult::Ok(dto)),
            None => Ok(ActionResult::NotFound),
        }
    }

    pub async fn create_command(
        &self,
        ctx: &AppContext,
        dto: CommandCreateDto,
    ) -> Result<ActionResult<CommandReadDto>, AppError> {
        let created = self.mutations.dispatch(ctx, CreateCommand { dto }).await?;
        Ok(ActionResult::Created {
            location: Self::location_of(created.id),
            value: created,
        })
    }

    pub async fn update_command(
        &self,
        ctx: &AppContext,
        id: CommandId,
        dto: CommandUpdateDto,
    ) -> Result<ActionResult<()>, AppError> {
        no_content(self.mutations.dispatch(ctx, UpdateCommand { id, dto }).await)
    }

    pub async fn patch_command(
        &self,
        ctx: &AppContext,
        id: CommandId,
        patch: CommandPatchDto,
    ) -> Result<ActionResult<()>, AppError> {
        no_content(self.mutations.dispatch(ctx, PatchCommand { id, patch }).await)
    }

    pub async fn delete_command(
        &self,
        ctx: &AppContext,
        id: CommandId,
    ) -> Result<ActionResult<()>, AppError> {
        no_content(self.mutations.dispatch(ctx, DeleteCommand { id }).await)
    }
}

fn no_content(res: Result<(), AppError>) -> Result<ActionResult<()>, AppError> {
    match res {
        Ok(()) => Ok(ActionResult::NoContent),
        Err(e) if e.is_not_found() => Ok(ActionResult::NotFound),
        Err(e) => Err(e),
    }
}
