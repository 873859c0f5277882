//! Adapter operations as (subsystem, task, payload) triples.
//!
//! Both transports build their envelopes from the same [`Call`], so a given
//! operation carries an identical payload whichever variant sends it.

use polkalive_common::{IpcError, TabId};
use polkalive_ipc::{tasks, ChannelPost, RuntimeMessage, Subsystem};
use polkalive_state::{SharedState, SyncUpdate};
use serde_json::{json, Value};

use super::types::{AccountRecord, ActionMeta, AnalyticsEvent};

pub(crate) enum Call<'a> {
    Relay(SyncUpdate),
    Reset,
    GetAll,
    OpenTab {
        id: &'a TabId,
        data: Option<Value>,
        analytics: Option<AnalyticsEvent>,
    },
    IsTabOpen(&'a TabId),
    Copy(&'a str),
    InitAction(&'a ActionMeta),
    PersistAccount(&'a AccountRecord),
    UpdateAccount(&'a AccountRecord),
    RemoveAccount(&'a str),
    FetchReferenda(&'a str),
}

impl Call<'_> {
    pub(crate) fn route(&self) -> (Subsystem, &'static str) {
        match self {
            Call::Relay(_) => (Subsystem::SharedState, tasks::RELAY),
            Call::Reset => (Subsystem::SharedState, tasks::RESET),
            Call::GetAll => (Subsystem::SharedState, tasks::GET_ALL),
            Call::OpenTab { .. } => (Subsystem::Tabs, tasks::OPEN),
            Call::IsTabOpen(_) => (Subsystem::Tabs, tasks::IS_OPEN),
            Call::Copy(_) => (Subsystem::Clipboard, tasks::COPY),
            Call::InitAction(_) => (Subsystem::Action, tasks::INIT),
            Call::PersistAccount(_) => (Subsystem::RawAccount, tasks::PERSIST),
            Call::UpdateAccount(_) => (Subsystem::RawAccount, tasks::UPDATE),
            Call::RemoveAccount(_) => (Subsystem::RawAccount, tasks::REMOVE),
            Call::FetchReferenda(_) => (Subsystem::OpenGov, tasks::FETCH_REFERENDA),
        }
    }

    pub(crate) fn payload(&self) -> Result<Value, IpcError> {
        let value = match self {
            Call::Relay(update) => to_value(update)?,
            Call::Reset | Call::GetAll => Value::Null,
            Call::OpenTab {
                id,
                data,
                analytics,
            } => {
                let mut payload = json!({ "id": id });
                if let Some(data) = data {
                    payload["data"] = data.clone();
                }
                if let Some(analytics) = analytics {
                    payload["analytics"] = to_value(analytics)?;
                }
                payload
            }
            Call::IsTabOpen(id) => json!({ "id": id }),
            Call::Copy(text) => json!({ "text": text }),
            Call::InitAction(meta) => to_value(meta)?,
            Call::PersistAccount(record) | Call::UpdateAccount(record) => to_value(record)?,
            Call::RemoveAccount(address) => json!({ "address": address }),
            Call::FetchReferenda(chain) => json!({ "chain": chain }),
        };
        Ok(value)
    }

    pub(crate) fn to_post(&self) -> Result<ChannelPost, IpcError> {
        let (subsystem, task) = self.route();
        Ok(ChannelPost::new(subsystem, task, self.payload()?))
    }

    pub(crate) fn to_message(&self) -> Result<RuntimeMessage, IpcError> {
        let (subsystem, task) = self.route();
        Ok(RuntimeMessage::new(subsystem, task, self.payload()?))
    }
}

fn to_value<T: serde::Serialize>(value: &T) -> Result<Value, IpcError> {
    serde_json::to_value(value).map_err(|e| IpcError::Encode(e.to_string()))
}

pub(crate) fn reply_bool(reply: Value) -> Result<bool, IpcError> {
    reply
        .as_bool()
        .ok_or_else(|| IpcError::Decode(format!("expected bool reply, got {reply}")))
}

pub(crate) fn reply_snapshot(reply: Value) -> Result<SharedState, IpcError> {
    serde_json::from_value(reply).map_err(|e| IpcError::Decode(e.to_string()))
}
