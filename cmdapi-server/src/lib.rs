#![forbid(unsafe_code)]
//! 命令目录 HTTP 服务（cmdapi-server）
//!
//! - `controller`：与框架无关的控制器，产出 `ActionResult`；
//! - `http`：axum 路由、请求解析与错误响应；
//! - `middleware`：请求追踪（`x-request-id` 与 `http.request` span）；
//! - `config` / `telemetry`：环境变量配置与日志初始化。
//!
pub mod config;
pub mod controller;
pub mod http;
pub mod middleware;
pub mod telemetry;

pub use config::{ConfigError, ServerConfig};
pub use controller::{ActionResult, CommandsController};
pub use http::{ApiError, AppState, build_router};
