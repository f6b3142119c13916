use tokio::sync::broadcast;

use crate::event::SearchEvent;

#[derive(Debug, Clone)]
pub struct Bus {
    sender: broadcast::Sender<SearchEvent>,
}

impl Bus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SearchEvent> {
        self.sender.subscribe()
    }

    pub fn publish(
        &self,
        event: SearchEvent,
    ) -> Result<usize, broadcast::error::SendError<SearchEvent>> {
        self.sender.send(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{timeout, Duration};

    fn test_event() -> SearchEvent {
        SearchEvent::LookupDispatched {
            generation: 1,
            query: "Alien".to_string(),
        }
    }

    #[tokio::test]
    async fn publish_and_receive_event() {
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();

        let _ = bus.publish(test_event());

        let received = timeout(Duration::from_millis(100), rx.recv())
            .await
            .expect("timeout")
            .expect("recv");
        assert!(matches!(
            received,
            SearchEvent::LookupDispatched { ref query, .. } if query == "Alien"
        ));
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_event() {
        let bus = Bus::new(8);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        let _ = bus.publish(test_event());

        assert_eq!(rx1.recv().await.expect("recv1"), test_event());
        assert_eq!(rx2.recv().await.expect("recv2"), test_event());
    }

    #[test]
    fn publish_without_subscribers_is_not_fatal() {
        let bus = Bus::new(8);
        assert!(bus.publish(test_event()).is_err());
    }
}
