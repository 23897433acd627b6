use crate::{context::AppContext, error::AppError, mutation::Mutation};
use async_trait::async_trait;

/// 变更总线（Mutation Bus）
///
/// - 负责根据变更的具体类型路由到对应的处理器；
/// - 框架可提供不同实现（如进程内、消息队列等）；
/// - 该 trait 带有泛型方法，通常以具体实现类型注入使用。
#[async_trait]
pub trait MutationBus: Send + Sync {
    /// 分发变更到对应处理器
    ///
    /// - `ctx`：应用上下文（链路追踪、幂等键等）
    /// - `m`：具体变更实例
    async fn dispatch<M>(&self, ctx: &AppContext, m: M) -> Result<M::Output, AppError>
    where
        M: Mutation;
}
