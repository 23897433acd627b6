//! 命令条目（Command）实体
//!
//! 一条命令由 how-to 描述、适用平台与命令行三段自由文本组成，
//! 标识由存储在创建时分配，分配后不可再变更。
//!
use bon::Builder;
use std::fmt;
use std::str::FromStr;

use crate::entity::Entity;
use crate::error::{DomainError, DomainResult};

/// 命令条目标识
///
/// 值 `0` 表示尚未持久化的瞬态实体。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CommandId(i64);

impl CommandId {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn value(&self) -> i64 {
        self.0
    }

    pub const fn is_assigned(&self) -> bool {
        self.0 != 0
    }
}

impl From<i64> for CommandId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CommandId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse::<i64>()?))
    }
}

/// 命令条目
///
/// ```
/// use cmdapi_domain::command::Command;
///
/// let mut cmd = Command::builder()
///     .how_to("Run unit tests")
///     .platform("Rust")
///     .command_line("cargo test")
///     .build();
/// assert!(!cmd.id().is_assigned());
///
/// cmd.set_platform("Cargo");
/// assert_eq!(cmd.platform(), "Cargo");
/// ```
#[derive(Builder, Debug, Clone, PartialEq, Eq)]
pub struct Command {
    #[builder(default)]
    id: CommandId,
    #[builder(into)]
    how_to: String,
    #[builder(into)]
    platform: String,
    #[builder(into)]
    command_line: String,
}

impl Command {
    pub fn id(&self) -> CommandId {
        self.id
    }

    pub fn how_to(&self) -> &str {
        &self.how_to
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }

    pub fn command_line(&self) -> &str {
        &self.command_line
    }

    pub fn set_how_to(&mut self, how_to: impl Into<String>) {
        self.how_to = how_to.into();
    }

    pub fn set_platform(&mut self, platform: impl Into<String>) {
        self.platform = platform.into();
    }

    pub fn set_command_line(&mut self, command_line: impl Into<String>) {
        self.command_line = command_line.into();
    }

    /// 由存储分配标识；已分配过标识的实体不可再次分配
    pub fn assign_id(&mut self, id: CommandId) -> DomainResult<()> {
        if self.id.is_assigned() {
            return Err(DomainError::InvalidState {
                reason: format!("command already has id {}", self.id),
            });
        }
        if !id.is_assigned() {
            return Err(DomainError::InvalidValue {
                reason: "assigned id must be non-zero".to_string(),
            });
        }
        self.id = id;
        Ok(())
    }
}

impl Entity for Command {
    type Id = CommandId;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn is_transient(&self) -> bool {
        !self.id.is_assigned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Command {
        Command::builder()
            .how_to("Do something")
            .platform("Some platform")
            .command_line("Some commandline")
            .build()
    }

    #[test]
    fn can_change_how_to() {
        let mut cmd = Command::builder()
            .how_to("Do something awesome")
            .platform("xUnit")
            .command_line("dotnet test")
            .build();
        cmd.set_how_to("Execute Unit Tests");
        assert_eq!(cmd.how_to(), "Execute Unit Tests");
    }

    #[test]
    fn can_change_platform() {
        let mut cmd = sample();
        cmd.set_platform("xUnit");
        assert_eq!(cmd.platform(), "xUnit");
    }

    #[test]
    fn can_change_command_line() {
        let mut cmd = sample();
        cmd.set_command_line("dotnet test");
        assert_eq!(cmd.command_line(), "dotnet test");
    }

    #[test]
    fn id_is_assigned_once() {
        let mut cmd = sample();
        assert!(cmd.is_transient());

        cmd.assign_id(CommandId::new(7)).unwrap();
        assert_eq!(cmd.id().value(), 7);
        assert!(!cmd.is_transient());

        let err = cmd.assign_id(CommandId::new(8)).unwrap_err();
        assert!(matches!(err, DomainError::InvalidState { .. }));
        assert_eq!(cmd.id().value(), 7);
    }

    #[test]
    fn zero_is_not_a_valid_assigned_id() {
        let mut cmd = sample();
        let err = cmd.assign_id(CommandId::default()).unwrap_err();
        assert!(matches!(err, DomainError::InvalidValue { .. }));
    }

    #[test]
    fn id_parses_from_path_segment() {
        assert_eq!("42".parse::<CommandId>().unwrap(), CommandId::new(42));
        match "forty-two".parse::<CommandId>() {
            Err(DomainError::Parse { .. }) => {}
            other => panic!("unexpected {other:?}"),
        }
    }
}
