//! 命令目录应用层（cmdapi-application）
//!
//! 以查询（`Query`）与变更（`Mutation`）表达用例，经由进程内总线分发到处理器；
//! 处理器依赖领域层的 `CommandApiRepo`，并通过 `profile` 在实体与 DTO 之间映射。
//!
pub mod context;
pub mod dto;
pub mod error;
pub mod inmemory_mutation_bus;
pub mod inmemory_query_bus;
pub mod mutation;
pub mod mutation_bus;
pub mod mutation_handler;
pub mod mutations;
pub mod profile;
pub mod queries;
pub mod query;
pub mod query_bus;
pub mod query_handler;

pub use inmemory_mutation_bus::InMemoryMutationBus;
pub use inmemory_query_bus::InMemoryQueryBus;
