//! Host state: the authoritative side of every cross-window task.
//!
//! Both transports feed the same [`HostState::dispatch`], which is what makes
//! the two adapter variants observably equivalent.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, PoisonError, RwLock};

use polkalive_common::{Event, EventBus, IpcError, TabId, WindowId};
use polkalive_ipc::{tasks, Subsystem};
use polkalive_platform::{AccountRecord, AnalyticsEvent, ClipboardSink};
use polkalive_state::{SharedState, SharedStateStore, SyncUpdate};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::push::Push;

/// Reply value plus the pushes the task caused.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub reply: Value,
    pub pushes: Vec<Push>,
}

impl Outcome {
    fn reply(reply: Value) -> Self {
        Self {
            reply,
            pushes: Vec::new(),
        }
    }

    fn done() -> Self {
        Self::reply(Value::Null)
    }

    fn push(push: Push) -> Self {
        Self {
            reply: Value::Null,
            pushes: vec![push],
        }
    }
}

#[derive(Deserialize)]
struct TabRequest {
    id: TabId,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    analytics: Option<AnalyticsEvent>,
}

#[derive(Deserialize)]
struct CopyRequest {
    text: String,
}

#[derive(Deserialize)]
struct AddressRequest {
    address: String,
}

#[derive(Deserialize)]
struct ChainRequest {
    chain: String,
}

pub struct HostState {
    replica: SharedStateStore,
    tabs: RwLock<BTreeSet<TabId>>,
    pending_action: RwLock<Option<Value>>,
    accounts: RwLock<BTreeMap<String, AccountRecord>>,
    referenda: RwLock<HashMap<String, Value>>,
    clipboard: Arc<dyn ClipboardSink>,
    events: EventBus,
}

impl HostState {
    pub fn new(clipboard: Arc<dyn ClipboardSink>, event_capacity: usize) -> Self {
        Self {
            replica: SharedStateStore::new(event_capacity),
            tabs: RwLock::new(BTreeSet::new()),
            pending_action: RwLock::new(None),
            accounts: RwLock::new(BTreeMap::new()),
            referenda: RwLock::new(HashMap::new()),
            clipboard,
            events: EventBus::new(event_capacity.max(1)),
        }
    }

    /// Run one task and report its reply and pushes.
    pub fn dispatch(
        &self,
        subsystem: Subsystem,
        task: &str,
        payload: Value,
    ) -> Result<Outcome, IpcError> {
        debug!(%subsystem, %task, "dispatch");
        match (subsystem, task) {
            (Subsystem::SharedState, tasks::RELAY) => {
                let update: SyncUpdate = parse(payload)?;
                self.replica.apply_remote(update);
                Ok(Outcome::push(Push::Sync(update)))
            }
            (Subsystem::SharedState, tasks::GET_ALL) => {
                Ok(Outcome::reply(encode(&self.replica.snapshot())?))
            }
            (Subsystem::SharedState, tasks::RESET) => {
                self.replica.reset();
                info!("shared state reset");
                Ok(Outcome::push(Push::Reset))
            }

            (Subsystem::Tabs, tasks::OPEN) => {
                let req: TabRequest = parse(payload)?;
                if let Some(analytics) = &req.analytics {
                    debug!(event = %analytics.event, "analytics");
                }
                self.add_tab(req.id.clone());
                Ok(Outcome::push(Push::TabAdded {
                    id: req.id,
                    data: req.data,
                }))
            }
            (Subsystem::Tabs, tasks::IS_OPEN) => {
                let req: TabRequest = parse(payload)?;
                Ok(Outcome::reply(Value::Bool(self.is_tab_open(&req.id))))
            }
            (Subsystem::Tabs, tasks::CLOSE) => {
                let req: TabRequest = parse(payload)?;
                let removed = write(&self.tabs).remove(&req.id);
                if removed {
                    self.events.publish(Event::TabClosed(req.id));
                }
                Ok(Outcome::done())
            }

            (Subsystem::Clipboard, tasks::COPY) => {
                let req: CopyRequest = parse(payload)?;
                self.clipboard
                    .set_text(&req.text)
                    .map_err(|e| IpcError::Remote(e.to_string()))?;
                Ok(Outcome::done())
            }

            (Subsystem::Action, tasks::INIT) => {
                *write(&self.pending_action) = Some(payload.clone());
                let id = TabId::from(WindowId::Action);
                self.add_tab(id.clone());
                Ok(Outcome {
                    reply: Value::Null,
                    pushes: vec![
                        Push::TabAdded { id, data: None },
                        Push::ActionInit(payload),
                    ],
                })
            }

            (Subsystem::RawAccount, tasks::PERSIST) => {
                let record: AccountRecord = parse(payload)?;
                let existed = write(&self.accounts)
                    .insert(record.address.clone(), record)
                    .is_some();
                debug!(existed, "account persisted");
                Ok(Outcome::done())
            }
            (Subsystem::RawAccount, tasks::UPDATE) => {
                let record: AccountRecord = parse(payload)?;
                let mut accounts = write(&self.accounts);
                match accounts.get_mut(&record.address) {
                    Some(slot) => {
                        *slot = record;
                        Ok(Outcome::done())
                    }
                    None => Err(IpcError::Remote(format!(
                        "unknown account {}",
                        record.address
                    ))),
                }
            }
            (Subsystem::RawAccount, tasks::REMOVE) => {
                let req: AddressRequest = parse(payload)?;
                if write(&self.accounts).remove(&req.address).is_none() {
                    debug!(address = %req.address, "remove of unknown account");
                }
                Ok(Outcome::done())
            }

            (Subsystem::OpenGov, tasks::FETCH_REFERENDA) => {
                let req: ChainRequest = parse(payload)?;
                let cached = read(&self.referenda).get(&req.chain).cloned();
                Ok(Outcome::reply(
                    cached.unwrap_or_else(|| Value::Array(Vec::new())),
                ))
            }

            (subsystem, task) => Err(IpcError::UnknownTask(format!("{subsystem}:{task}"))),
        }
    }

    /// Store referenda fetched by the governance feature for `chain`.
    pub fn cache_referenda(&self, chain: impl Into<String>, referenda: Value) {
        write(&self.referenda).insert(chain.into(), referenda);
    }

    pub fn replica(&self) -> &SharedStateStore {
        &self.replica
    }

    pub fn snapshot(&self) -> SharedState {
        self.replica.snapshot()
    }

    pub fn is_tab_open(&self, id: &TabId) -> bool {
        read(&self.tabs).contains(id)
    }

    pub fn open_tabs(&self) -> Vec<TabId> {
        read(&self.tabs).iter().cloned().collect()
    }

    pub fn pending_action(&self) -> Option<Value> {
        read(&self.pending_action).clone()
    }

    pub fn accounts(&self) -> Vec<AccountRecord> {
        read(&self.accounts).values().cloned().collect()
    }

    /// Observe [`Event::TabOpened`] and [`Event::TabClosed`].
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    fn add_tab(&self, id: TabId) {
        if write(&self.tabs).insert(id.clone()) {
            self.events.publish(Event::TabOpened(id));
        }
    }
}

fn parse<T: DeserializeOwned>(payload: Value) -> Result<T, IpcError> {
    serde_json::from_value(payload).map_err(|e| IpcError::Decode(e.to_string()))
}

fn encode<T: serde::Serialize>(value: &T) -> Result<Value, IpcError> {
    serde_json::to_value(value).map_err(|e| IpcError::Encode(e.to_string()))
}

fn read<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
