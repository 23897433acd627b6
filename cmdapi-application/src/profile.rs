//! 命令条目与 DTO 之间的映射规则
//!
//! 仅做字段拷贝：
//! - `Command` → `CommandReadDto`（全部字段）
//! - `CommandCreateDto` → `Command`（新实体，标识未分配）
//! - `CommandUpdateDto` → 已有 `Command`（覆盖可变字段，标识不变）
//! - `Command` → `CommandUpdateDto`（局部更新前的完整视图）
//!
use cmdapi_domain::Command;

use crate::dto::{CommandCreateDto, CommandReadDto, CommandUpdateDto};

impl From<&Command> for CommandReadDto {
    fn from(command: &Command) -> Self {
        Self {
            id: command.id().value(),
            how_to: command.how_to().to_string(),
            platform: command.platform().to_string(),
            command_line: command.command_line().to_string(),
        }
    }
}

impl From<CommandCreateDto> for Command {
    fn from(dto: CommandCreateDto) -> Self {
        Command::builder()
            .how_to(dto.how_to)
            .platform(dto.platform)
            .command_line(dto.command_line)
            .build()
    }
}

impl From<&Command> for CommandUpdateDto {
    fn from(command: &Command) -> Self {
        Self {
            how_to: command.how_to().to_string(),
            platform: command.platform().to_string(),
            command_line: command.command_line().to_string(),
        }
    }
}

/// 将更新视图覆盖到已有实体上
pub fn map_update_onto(dto: CommandUpdateDto, command: &mut Command) {
    command.set_how_to(dto.how_to);
    command.set_platform(dto.platform);
    command.set_command_line(dto.command_line);
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmdapi_domain::CommandId;

    fn persisted() -> Command {
        let mut cmd = Command::builder()
            .how_to("MockTest")
            .platform("Mock Platform")
            .command_line("Mock line")
            .build();
        cmd.assign_id(CommandId::new(1)).unwrap();
        cmd
    }

    #[test]
    fn read_dto_copies_every_field() {
        let dto = CommandReadDto::from(&persisted());
        assert_eq!(
            dto,
            CommandReadDto {
                id: 1,
                how_to: "MockTest".into(),
                platform: "Mock Platform".into(),
                command_line: "Mock line".into(),
            }
        );
    }

    #[test]
    fn create_dto_yields_transient_entity() {
        let cmd = Command::from(CommandCreateDto {
            how_to: "Build".into(),
            platform: "Cargo".into(),
            command_line: "cargo build".into(),
        });
        assert!(!cmd.id().is_assigned());
        assert_eq!(cmd.command_line(), "cargo build");
    }

    #[test]
    fn update_keeps_identity() {
        let mut cmd = persisted();
        map_update_onto(
            CommandUpdateDto {
                how_to: "Updated".into(),
                platform: "Other".into(),
                command_line: "other line".into(),
            },
            &mut cmd,
        );
        assert_eq!(cmd.id().value(), 1);
        assert_eq!(cmd.how_to(), "Updated");
        assert_eq!(cmd.platform(), "Other");
        assert_eq!(cmd.command_line(), "other line");
    }

    #[test]
    fn update_view_mirrors_entity() {
        let view = CommandUpdateDto::from(&persisted());
        assert_eq!(view.how_to, "MockTest");
        assert_eq!(view.command_line, "Mock line");
    }
}
