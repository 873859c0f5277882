//! Envelopes carried between windows.
//!
//! Two logical shapes share one vocabulary of subsystems and tasks:
//! - **Extension runtime**: `{ type, task, payload }`, one round trip per call.
//! - **Direct channel**: `{ task, data }` where `task` is `"<subsystem>:<task>"`.
//!
//! Direct-channel posts cross a process boundary as [`Frame`]s whose data is
//! stringified JSON, parsed again on receipt.

use polkalive_common::{IpcError, RequestId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Subsystem an envelope is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Subsystem {
    SharedState,
    Tabs,
    Clipboard,
    Action,
    RawAccount,
    OpenGov,
}

impl Subsystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            Subsystem::SharedState => "sharedState",
            Subsystem::Tabs => "tabs",
            Subsystem::Clipboard => "clipboard",
            Subsystem::Action => "action",
            Subsystem::RawAccount => "rawAccount",
            Subsystem::OpenGov => "openGov",
        }
    }
}

impl fmt::Display for Subsystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Subsystem {
    type Err = IpcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sharedState" => Ok(Subsystem::SharedState),
            "tabs" => Ok(Subsystem::Tabs),
            "clipboard" => Ok(Subsystem::Clipboard),
            "action" => Ok(Subsystem::Action),
            "rawAccount" => Ok(Subsystem::RawAccount),
            "openGov" => Ok(Subsystem::OpenGov),
            other => Err(IpcError::UnknownTask(other.to_string())),
        }
    }
}

/// Task names shared by both transports.
pub mod tasks {
    pub const RELAY: &str = "relay";
    pub const GET_ALL: &str = "getAll";
    pub const RESET: &str = "reset";
    pub const SYNC: &str = "sync";
    pub const OPEN: &str = "open";
    pub const IS_OPEN: &str = "isOpen";
    pub const CLOSE: &str = "close";
    pub const ADD: &str = "add";
    pub const COPY: &str = "copy";
    pub const INIT: &str = "init";
    pub const PERSIST: &str = "persist";
    pub const UPDATE: &str = "update";
    pub const REMOVE: &str = "remove";
    pub const FETCH_REFERENDA: &str = "fetchReferenda";
}

/// Extension-runtime envelope: `{ type, task, payload }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeMessage {
    #[serde(rename = "type")]
    pub subsystem: Subsystem,
    pub task: String,
    #[serde(default)]
    pub payload: Value,
}

impl RuntimeMessage {
    pub fn new(subsystem: Subsystem, task: impl Into<String>, payload: Value) -> Self {
        Self {
            subsystem,
            task: task.into(),
            payload,
        }
    }
}

/// Direct-channel envelope: `{ task, data }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelPost {
    pub task: String,
    #[serde(default)]
    pub data: Value,
}

impl ChannelPost {
    pub fn new(subsystem: Subsystem, task: &str, data: Value) -> Self {
        Self {
            task: format!("{subsystem}:{task}"),
            data,
        }
    }

    /// Split `"<subsystem>:<task>"` into its parts.
    pub fn route(&self) -> Result<(Subsystem, &str), IpcError> {
        let (sub, task) = self
            .task
            .split_once(':')
            .ok_or_else(|| IpcError::UnknownTask(self.task.clone()))?;
        Ok((sub.parse()?, task))
    }
}

impl From<RuntimeMessage> for ChannelPost {
    fn from(msg: RuntimeMessage) -> Self {
        ChannelPost::new(msg.subsystem, &msg.task, msg.payload)
    }
}

/// Unit written to a [`ChannelEndpoint`](crate::ChannelEndpoint).
///
/// `data` is the JSON-stringified payload; it is parsed only by the receiver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "frame", rename_all = "snake_case")]
pub enum Frame {
    /// Fire-and-forget post.
    Post { task: String, data: String },
    /// Post that expects a [`Frame::Reply`] with the same id.
    Request {
        id: RequestId,
        task: String,
        data: String,
    },
    /// Answer to a request. When `ok` is false, `data` is the error message.
    Reply {
        id: RequestId,
        ok: bool,
        data: String,
    },
}

impl Frame {
    pub fn post(post: &ChannelPost) -> Result<Self, IpcError> {
        Ok(Frame::Post {
            task: post.task.clone(),
            data: encode(&post.data)?,
        })
    }

    pub fn request(id: RequestId, post: &ChannelPost) -> Result<Self, IpcError> {
        Ok(Frame::Request {
            id,
            task: post.task.clone(),
            data: encode(&post.data)?,
        })
    }

    /// Build a reply frame. Encoding failures are reported to the requester
    /// instead of being dropped.
    pub fn reply(id: RequestId, result: Result<Value, IpcError>) -> Self {
        match result.and_then(|value| encode(&value)) {
            Ok(data) => Frame::Reply { id, ok: true, data },
            Err(e) => Frame::Reply {
                id,
                ok: false,
                data: e.remote_message(),
            },
        }
    }

    pub fn task(&self) -> Option<&str> {
        match self {
            Frame::Post { task, .. } | Frame::Request { task, .. } => Some(task),
            Frame::Reply { .. } => None,
        }
    }
}

pub fn encode(value: &Value) -> Result<String, IpcError> {
    serde_json::to_string(value).map_err(|e| IpcError::Encode(e.to_string()))
}

pub fn decode(raw: &str) -> Result<Value, IpcError> {
    serde_json::from_str(raw).map_err(|e| IpcError::Decode(e.to_string()))
}
