//! HTTP 接口层（axum）
//!
//! 负责路由、请求体/路径解析与输入校验，再委托给 [`CommandsController`]；
//! 控制器结果与应用层错误在此转换为 HTTP 响应。
//!
use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, FromRequest, Path, Request, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router, middleware};
use cmdapi_application::context::AppContext;
use cmdapi_application::dto::{CommandCreateDto, CommandPatchDto, CommandUpdateDto, Validate};
use cmdapi_application::error::AppError;
use cmdapi_domain::error::DomainError;
use cmdapi_domain::{CommandApiRepo, CommandId};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

use crate::controller::{ActionResult, CommandsController};
use crate::middleware::{RequestId, request_tracing_middleware};

#[derive(Clone)]
pub struct AppState {
    controller: Arc<CommandsController>,
}

impl AppState {
    pub fn new(repo: Arc<dyn CommandApiRepo>) -> Result<Self, AppError> {
        Ok(Self {
            controller: Arc::new(CommandsController::new(repo)?),
        })
    }
}

pub fn build_router(state: AppState) -> Router {
    let item_route = format!("{}/{{id}}", CommandsController::ROUTE);
    Router::new()
        .route(
            CommandsController::ROUTE,
            get(list_commands).post(create_command),
        )
        .route(
            &item_route,
            get(get_command)
                .put(update_command)
                .patch(patch_command)
                .delete(delete_command),
        )
        .layer(middleware::from_fn(request_tracing_middleware))
        .with_state(state)
}

impl<T: Serialize> IntoResponse for ActionResult<T> {
    fn into_response(self) -> Response {
        match self {
            ActionResult::Ok(value) => (StatusCode::OK, Json(value)).into_response(),
            ActionResult::Created { location, value } => (
                StatusCode::CREATED,
                [(header::LOCATION, location)],
                Json(value),
            )
                .into_response(),
            ActionResult::NoContent => StatusCode::NO_CONTENT.into_response(),
            ActionResult::NotFound => StatusCode::NOT_FOUND.into_response(),
        }
    }
}

/// 请求处理失败的 HTTP 表示
#[derive(Debug)]
pub enum ApiError {
    /// 应用层错误
    App(AppError),
    /// 请求体不是合法 JSON 或与目标 DTO 不匹配
    Body(JsonRejection),
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self::App(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Body(rejection)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Body(_)
            | ApiError::App(AppError::Validation(_))
            | ApiError::App(AppError::Domain(DomainError::InvalidValue { .. }))
            | ApiError::App(AppError::Domain(DomainError::Parse { .. })) => StatusCode::BAD_REQUEST,
            ApiError::App(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            ApiError::App(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::Body(_) => "invalid_body",
            ApiError::App(AppError::Validation(_)) => "validation_failed",
            ApiError::App(AppError::Domain(DomainError::InvalidValue { .. })) => "invalid_value",
            ApiError::App(AppError::Domain(DomainError::Parse { .. })) => "invalid_identifier",
            ApiError::App(e) if e.is_not_found() => "not_found",
            ApiError::App(_) => "internal",
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::App(e) => e.to_string(),
            ApiError::Body(rejection) => rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();
        if status.is_server_error() {
            tracing::error!(error = %message, "request failed");
        } else {
            tracing::debug!(error = %message, status = status.as_u16(), "request rejected");
        }
        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": message,
            }
        }));
        (status, body).into_response()
    }
}

/// JSON 请求体提取器；解析失败以统一错误结构返回 400
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

fn app_context(request_id: &RequestId) -> AppContext {
    AppContext::builder()
        .request_id(request_id.0.clone())
        .build()
}

fn parse_id(raw: &str) -> Result<CommandId, ApiError> {
    raw.parse::<CommandId>()
        .map_err(|e| ApiError::App(AppError::Domain(e)))
}

async fn list_commands(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> Result<Response, ApiError> {
    let ctx = app_context(&request_id);
    Ok(state.controller.get_all_commands(&ctx).await?.into_response())
}

async fn get_command(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(raw_id): Path<String>,
) -> Result<Response, ApiError> {
    let ctx = app_context(&request_id);
    let id = parse_id(&raw_id)?;
    Ok(state
        .controller
        .get_command_by_id(&ctx, id)
        .await?
        .into_response())
}

async fn create_command(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    ApiJson(dto): ApiJson<CommandCreateDto>,
) -> Result<Response, ApiError> {
    let ctx = app_context(&request_id);
    dto.validate()?;
    Ok(state
        .controller
        .create_command(&ctx, dto)
        .await?
        .into_response())
}

async fn update_command(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(raw_id): Path<String>,
    ApiJson(dto): ApiJson<CommandUpdateDto>,
) -> Result<Response, ApiError> {
    let ctx = app_context(&request_id);
    let id = parse_id(&raw_id)?;
    dto.validate()?;
    Ok(state
        .controller
        .update_command(&ctx, id, dto)
        .await?
        .into_response())
}

async fn patch_command(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(raw_id): Path<String>,
    ApiJson(patch): ApiJson<CommandPatchDto>,
) -> Result<Response, ApiError> {
    let ctx = app_context(&request_id);
    let id = parse_id(&raw_id)?;
    Ok(state
        .controller
        .patch_command(&ctx, id, patch)
        .await?
        .into_response())
}

async fn delete_command(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(raw_id): Path<String>,
) -> Result<Response, ApiError> {
    let ctx = app_context(&request_id);
    let id = parse_id(&raw_id)?;
    Ok(state
        .controller
        .delete_command(&ctx, id)
        .await?
        .into_response())
}
