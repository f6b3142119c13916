use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::bus::Bus;
use crate::config::SearchSettings;
use crate::error::{BechdelError, BechdelResult};
use crate::event::SearchEvent;
use crate::movie::Candidate;
use crate::provider::TitleSearch;
use crate::search::actor::{ControllerChannels, SearchActor};
use crate::search::protocol::ControllerEvent;
use crate::search::types::{ConfirmedCallback, SearchSnapshot};

const EVENT_BUS_CAPACITY: usize = 64;

/// Inbound side of the search controller.
///
/// Clones share one controller. Dropping the last clone tears it down the
/// same way [`SearchHandle::shutdown`] does.
#[derive(Clone)]
pub struct SearchHandle {
    event_tx: mpsc::UnboundedSender<ControllerEvent>,
    snapshot_rx: watch::Receiver<SearchSnapshot>,
    bus: Bus,
    shutdown: CancellationToken,
    _teardown: Arc<DropGuard>,
}

impl std::fmt::Debug for SearchHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchHandle")
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl SearchHandle {
    /// Records a new input value. Resolves once the controller has reacted.
    pub async fn text_changed(&self, text: impl Into<String>) -> BechdelResult<()> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(ControllerEvent::TextChanged {
            text: text.into(),
            reply: reply_tx,
        })?;
        reply_rx
            .await
            .map_err(|_| BechdelError::ControllerStopped)
    }

    /// Accepts a candidate and confirms its title to the host.
    pub async fn select(&self, candidate: Candidate) -> BechdelResult<()> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(ControllerEvent::Select {
            candidate,
            reply: reply_tx,
        })?;
        reply_rx
            .await
            .map_err(|_| BechdelError::ControllerStopped)
    }

    /// Accepts the candidate at `index` in the current list.
    pub async fn select_index(&self, index: usize) -> BechdelResult<Candidate> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(ControllerEvent::SelectIndex {
            index,
            reply: reply_tx,
        })?;
        reply_rx
            .await
            .map_err(|_| BechdelError::ControllerStopped)?
    }

    pub fn snapshot(&self) -> SearchSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    pub fn watch(&self) -> watch::Receiver<SearchSnapshot> {
        self.snapshot_rx.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SearchEvent> {
        self.bus.subscribe()
    }

    /// Stops the controller and cancels any pending debounce timer.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.shutdown.is_cancelled() || self.event_tx.is_closed()
    }

    fn send(&self, event: ControllerEvent) -> BechdelResult<()> {
        if self.shutdown.is_cancelled() {
            return Err(BechdelError::ControllerStopped);
        }
        self.event_tx
            .send(event)
            .map_err(|_| BechdelError::ControllerStopped)
    }
}

/// Starts a controller task on the current tokio runtime.
pub fn spawn_search_controller(
    settings: SearchSettings,
    provider: Arc<dyn TitleSearch>,
    on_confirmed: ConfirmedCallback,
) -> SearchHandle {
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let (snapshot_tx, snapshot_rx) = watch::channel(SearchSnapshot::default());
    let bus = Bus::new(EVENT_BUS_CAPACITY);
    let shutdown = CancellationToken::new();

    let actor = SearchActor::new(
        settings,
        provider,
        on_confirmed,
        bus.clone(),
        ControllerChannels {
            event_tx: event_tx.clone(),
            event_rx,
            snapshot_tx,
            shutdown: shutdown.clone(),
        },
    );

    tokio::spawn(async move {
        actor.run().await;
    });

    SearchHandle {
        event_tx,
        snapshot_rx,
        bus,
        shutdown: shutdown.clone(),
        _teardown: Arc::new(shutdown.drop_guard()),
    }
}
