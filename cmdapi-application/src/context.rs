use bon::Builder;

/// 应用层上下文（Application Context）
///
/// 承载一次应用层调用（查询/变更）所需的横切信息，例如：
/// - 请求标识（`request_id`）：由接口层生成或透传，用于日志关联；
/// - 幂等键（`idempotency_key`）：用于在基础设施层实现请求幂等（如 API 层重复提交保护）。
///
/// 典型用法：
/// ```rust
/// use cmdapi_application::context::AppContext;
///
/// let ctx = AppContext::builder()
///     .request_id("req-123".to_string())
///     .maybe_idempotency_key(None)
///     .build();
/// assert_eq!(ctx.request_id(), "req-123");
/// ```
#[derive(Builder, Clone, Debug, Default)]
pub struct AppContext {
    /// 请求标识（链路追踪）
    pub request_id: Option<String>,
    /// 幂等键（可选）：为空则由上层或基础设施决定是否参与幂等
    pub idempotency_key: Option<String>,
}

impl AppContext {
    /// 用于日志字段的请求标识，缺省为空串
    pub fn request_id(&self) -> &str {
        self.request_id.as_deref().unwrap_or("")
    }
}
