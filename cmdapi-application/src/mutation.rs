/// 应用层变更（Mutation）
///
/// 表达“意图”的写操作请求，会修改领域状态。
/// - 输出仅承载执行结果（如新建后的读取视图），不应作为通用查询通道；
/// - 与 [`Query`](crate::query::Query) 相对，`Mutation` 应避免读写混用；
/// - 建议保持语义化的“动宾结构”命名，如 `CreateCommand`、`DeleteCommand`。
///
/// 关联常量：
/// - `NAME`：变更的稳定名称，用于日志、追踪与路由。避免依赖 `type_name::<T>()`。
pub trait Mutation: Send + Sync + 'static {
    /// 变更的稳定名称（建议常量字符串，不随重构变化）
    const NAME: &'static str;

    /// 执行结果
    type Output: Send + 'static;
}
