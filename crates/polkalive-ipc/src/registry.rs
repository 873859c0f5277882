use std::collections::HashMap;
use std::sync::RwLock;

use polkalive_common::{ChannelRole, Event, EventBus, IpcError, WindowId};
use tokio::sync::broadcast;
use tracing::{error, info};

use crate::endpoint::ChannelEndpoint;

/// Holds the one endpoint bound per channel role in this process.
///
/// Created by bootstrap and handed to every consumer. Binding happens
/// before any consumer runs; a later `bind` for the same role replaces the
/// old endpoint (window reload) and announces it on the event bus.
pub struct ChannelRegistry {
    owner: WindowId,
    endpoints: RwLock<HashMap<ChannelRole, ChannelEndpoint>>,
    events: EventBus,
}

impl ChannelRegistry {
    pub fn new(owner: WindowId) -> Self {
        Self {
            owner,
            endpoints: RwLock::new(HashMap::new()),
            events: EventBus::new(16),
        }
    }

    /// The window this registry belongs to.
    pub fn owner(&self) -> WindowId {
        self.owner
    }

    /// Bind `endpoint` under `role`, replacing any previous binding.
    pub fn bind(&self, role: ChannelRole, endpoint: ChannelEndpoint) {
        let replaced = match self.endpoints.write() {
            Ok(mut map) => map.insert(role, endpoint).is_some(),
            Err(poisoned) => poisoned.into_inner().insert(role, endpoint).is_some(),
        };
        info!(window = %self.owner, %role, replaced, "channel bound");
        self.events.publish(Event::ChannelBound(role));
    }

    /// The endpoint bound under `role`.
    ///
    /// Fails with [`IpcError::UnboundChannel`] when bootstrap has not bound it.
    pub fn get(&self, role: ChannelRole) -> Result<ChannelEndpoint, IpcError> {
        self.get_quiet(role).ok_or_else(|| {
            error!(window = %self.owner, %role, "channel accessed before it was bound");
            IpcError::UnboundChannel(role)
        })
    }

    pub fn is_bound(&self, role: ChannelRole) -> bool {
        self.get_quiet(role).is_some()
    }

    /// All roles with a bound endpoint, in role order.
    pub fn bound_roles(&self) -> Vec<ChannelRole> {
        ChannelRole::ALL
            .into_iter()
            .filter(|r| self.is_bound(*r))
            .collect()
    }

    /// Receive [`Event::ChannelBound`] for every later `bind`.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    fn get_quiet(&self, role: ChannelRole) -> Option<ChannelEndpoint> {
        match self.endpoints.read() {
            Ok(map) => map.get(&role).cloned(),
            Err(poisoned) => poisoned.into_inner().get(&role).cloned(),
        }
    }
}
