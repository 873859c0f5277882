//! Messages the host pushes to windows, and where each one goes.

use polkalive_common::{ChannelRole, IpcError, TabId};
use polkalive_ipc::{tasks, ChannelPost, Subsystem};
use polkalive_state::SyncUpdate;
use serde_json::{json, Value};

/// Side effect of a dispatched task that other windows must hear about.
#[derive(Debug, Clone, PartialEq)]
pub enum Push {
    /// A window relayed a flag; every other window applies it.
    Sync(SyncUpdate),
    /// Every window resets its replica.
    Reset,
    /// The tabs window shows a new tab.
    TabAdded { id: TabId, data: Option<Value> },
    /// The action window starts a task.
    ActionInit(Value),
}

/// Which bound windows receive a push.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    /// Every bound window except the one the change came from.
    AllExcept(Option<ChannelRole>),
    All,
    Only(ChannelRole),
}

impl Push {
    pub fn audience(&self, origin: Option<ChannelRole>) -> Audience {
        match self {
            Push::Sync(_) => Audience::AllExcept(origin),
            Push::Reset => Audience::All,
            Push::TabAdded { .. } => Audience::Only(ChannelRole::MainFromTabs),
            Push::ActionInit(_) => Audience::Only(ChannelRole::MainFromAction),
        }
    }

    pub fn to_post(&self) -> Result<ChannelPost, IpcError> {
        let post = match self {
            Push::Sync(update) => ChannelPost::new(
                Subsystem::SharedState,
                tasks::SYNC,
                serde_json::to_value(update).map_err(|e| IpcError::Encode(e.to_string()))?,
            ),
            Push::Reset => ChannelPost::new(Subsystem::SharedState, tasks::RESET, Value::Null),
            Push::TabAdded { id, data } => ChannelPost::new(
                Subsystem::Tabs,
                tasks::ADD,
                json!({ "id": id, "data": data }),
            ),
            Push::ActionInit(meta) => ChannelPost::new(Subsystem::Action, tasks::INIT, meta.clone()),
        };
        Ok(post)
    }
}

impl Audience {
    pub fn includes(&self, role: ChannelRole) -> bool {
        match self {
            Audience::AllExcept(origin) => *origin != Some(role),
            Audience::All => true,
            Audience::Only(only) => *only == role,
        }
    }
}
