//! 命令目录基础设施层（cmdapi-infra）
//!
//! 提供 `CommandApiRepo` 的具体实现：
//! - `InMemoryCommandRepo`：进程内实现，用于测试与无数据库运行；
//! - `PgCommandRepo`：基于 sqlx 的 Postgres 实现（`postgres` 特性）。
//!
pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod unit_of_work;

pub use memory::InMemoryCommandRepo;
#[cfg(feature = "postgres")]
pub use postgres::PgCommandRepo;
