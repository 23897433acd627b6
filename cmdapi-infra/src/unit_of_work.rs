use cmdapi_domain::{Command, CommandId};
use std::collections::BTreeMap;

/// 已登记、尚未提交的变更
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingChange {
    Insert(Command),
    Update(Command),
    Delete(CommandId),
}

impl PendingChange {
    pub fn id(&self) -> CommandId {
        match self {
            PendingChange::Insert(c) | PendingChange::Update(c) => c.id(),
            PendingChange::Delete(id) => *id,
        }
    }

    /// 将变更应用到以标识为键的集合；更新/删除不存在的标识为空操作
    pub fn apply_to(self, rows: &mut BTreeMap<CommandId, Command>) {
        match self {
            PendingChange::Insert(c) => {
                rows.insert(c.id(), c);
            }
            PendingChange::Update(c) => {
                if let Some(slot) = rows.get_mut(&c.id()) {
                    *slot = c;
                }
            }
            PendingChange::Delete(id) => {
                rows.remove(&id);
            }
        }
    }
}
