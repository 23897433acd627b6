use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// 数据传输对象（DTO）
///
/// - 作为应用层的输出载体，面向接口/外部系统序列化友好；
/// - 与领域模型解耦，避免将领域对象直接暴露到接口层；
/// - 应保持只读特性与简洁结构，适配不同用例的返回需求。
pub trait Dto: Serialize + Send + Sync + 'static {}

impl<T: Dto> Dto for Vec<T> {}
impl<T: Dto> Dto for Option<T> {}

/// 输入 DTO 的字段校验
pub trait Validate {
    fn validate(&self) -> Result<(), AppError>;
}

/// how-to 描述的最大字符数
pub const HOW_TO_MAX_LEN: usize = 250;

/// 读取视图
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandReadDto {
    pub id: i64,
    pub how_to: String,
    pub platform: String,
    pub command_line: String,
}

impl Dto for CommandReadDto {}

/// 新建请求体；标识由存储分配
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommandCreateDto {
    pub how_to: String,
    pub platform: String,
    pub command_line: String,
}

/// 整体覆盖请求体；标识来自路径
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommandUpdateDto {
    pub how_to: String,
    pub platform: String,
    pub command_line: String,
}

/// 局部更新请求体，缺省字段保持原值
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CommandPatchDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub how_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_line: Option<String>,
}

impl CommandPatchDto {
    /// 将补丁合并到完整的更新视图上
    pub fn apply_to(self, target: &mut CommandUpdateDto) {
        if let Some(how_to) = self.how_to {
            target.how_to = how_to;
        }
        if let Some(platform) = self.platform {
            target.platform = platform;
        }
        if let Some(command_line) = self.command_line {
            target.command_line = command_line;
        }
    }
}

fn validate_fields(how_to: &str, platform: &str, command_line: &str) -> Result<(), AppError> {
    let mut problems = Vec::new();

    if how_to.trim().is_empty() {
        problems.push("howTo: required".to_string());
    } else if how_to.chars().count() > HOW_TO_MAX_LEN {
        problems.push(format!("howTo: must be at most {HOW_TO_MAX_LEN} characters"));
    }
    if platform.trim().is_empty() {
        problems.push("platform: required".to_string());
    }
    if command_line.trim().is_empty() {
        problems.push("commandLine: required".to_string());
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(problems.join("; ")))
    }
}

impl Validate for CommandCreateDto {
    fn validate(&self) -> Result<(), AppError> {
        validate_fields(&self.how_to, &self.platform, &self.command_line)
    }
}

impl Validate for CommandUpdateDto {
    fn validate(&self) -> Result<(), AppError> {
        validate_fields(&self.how_to, &self.platform, &self.command_line)
    }
}
