//! 命令目录领域层（cmdapi-domain）
//!
//! 定义命令条目实体（`command`）、实体抽象（`entity`）、
//! 仓储接口（`repository`）与最小必要的错误类型（`error`）。
//!
//! 本 crate 与存储与传输实现解耦，仓储的具体实现由基础设施层
//! （内存、Postgres 等）提供并注入。
//!
pub mod command;
pub mod entity;
pub mod error;
pub mod repository;

pub use command::{Command, CommandId};
pub use repository::CommandApiRepo;
