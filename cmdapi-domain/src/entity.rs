//! 实体（Entity）基础抽象
//!
//! 为持久化实体提供统一的标识（Id）能力，标识由存储侧分配。
//!
use std::{fmt::Display, str::FromStr};

/// 具备唯一标识的实体抽象
pub trait Entity: Send + Sync {
    /// 实体标识类型，要求可解析、可显示与可复制
    type Id: FromStr + Copy + Display + Eq;

    /// 获取实体标识
    fn id(&self) -> Self::Id;

    /// 是否尚未由存储分配标识（瞬态实体）
    fn is_transient(&self) -> bool;
}
