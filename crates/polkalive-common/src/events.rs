use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::types::{ChannelRole, SyncId, TabId};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Event {
    SharedStateChanged { key: SyncId, value: bool },
    SharedStateReset,
    TabOpened(TabId),
    TabClosed(TabId),
    ChannelBound(ChannelRole),
    Shutdown,
    #[serde(other)]
    Unknown,
}

pub struct EventBus {
    sender: broadcast::Sender<Event>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: Event) -> usize {
        self.sender.send(event).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_and_receive() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(Event::SharedStateReset);

        let event = rx.recv().await.unwrap();
        assert!(matches!(event, Event::SharedStateReset));
    }

    #[tokio::test]
    async fn multiple_subscribers() {
        let bus = EventBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(Event::Shutdown);

        let e1 = rx1.recv().await.unwrap();
        let e2 = rx2.recv().await.unwrap();
        assert!(matches!(e1, Event::Shutdown));
        assert!(matches!(e2, Event::Shutdown));
    }

    #[tokio::test]
    async fn state_events_keep_order() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(Event::SharedStateChanged {
            key: SyncId::ModeOnline,
            value: true,
        });
        bus.publish(Event::SharedStateChanged {
            key: SyncId::ModeOnline,
            value: false,
        });

        let e1 = rx.recv().await.unwrap();
        assert!(matches!(e1, Event::SharedStateChanged { value: true, .. }));
        let e2 = rx.recv().await.unwrap();
        assert!(matches!(e2, Event::SharedStateChanged { value: false, .. }));
    }

    #[tokio::test]
    async fn tab_events() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(Event::TabOpened(TabId::from("settings")));
        bus.publish(Event::TabClosed(TabId::from("settings")));

        let e1 = rx.recv().await.unwrap();
        assert!(matches!(e1, Event::TabOpened(ref id) if id.as_str() == "settings"));
        let e2 = rx.recv().await.unwrap();
        assert!(matches!(e2, Event::TabClosed(ref id) if id.as_str() == "settings"));
    }

    #[test]
    fn publish_returns_zero_with_no_subscribers() {
        let bus = EventBus::new(16);
        let count = bus.publish(Event::Shutdown);
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn publish_returns_subscriber_count() {
        let bus = EventBus::new(16);
        let _rx1 = bus.subscribe();
        let _rx2 = bus.subscribe();
        let _rx3 = bus.subscribe();

        let count = bus.publish(Event::SharedStateReset);
        assert_eq!(count, 3);
    }

    #[test]
    fn unknown_event_deserializes() {
        let json = r#"{"type":"SomeNewEventWeNeverHeardOf","data":null}"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert!(matches!(event, Event::Unknown));
    }

    #[test]
    fn state_event_serializes_wire_key() {
        let json = serde_json::to_string(&Event::SharedStateChanged {
            key: SyncId::WcConnecting,
            value: true,
        })
        .unwrap();
        assert!(json.contains("\"wc:connecting\""));
    }
}
