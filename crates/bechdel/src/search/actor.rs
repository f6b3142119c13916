use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::bus::Bus;
use crate::config::{FailurePolicy, SearchSettings};
use crate::entities::decode_entities;
use crate::error::{BechdelError, BechdelResult, LookupError};
use crate::event::SearchEvent;
use crate::movie::{Candidate, MovieRecord};
use crate::provider::TitleSearch;
use crate::search::machine::{ExpiryAction, QueryReaction, SearchPhase};
use crate::search::protocol::ControllerEvent;
use crate::search::types::{ConfirmedCallback, SearchSnapshot};

/// Channel ends the actor owns. `event_tx` feeds timer and lookup tasks back
/// into the same queue the handle writes to.
pub(crate) struct ControllerChannels {
    pub(crate) event_tx: mpsc::UnboundedSender<ControllerEvent>,
    pub(crate) event_rx: mpsc::UnboundedReceiver<ControllerEvent>,
    pub(crate) snapshot_tx: watch::Sender<SearchSnapshot>,
    pub(crate) shutdown: CancellationToken,
}

pub(crate) struct SearchActor {
    settings: SearchSettings,
    provider: Arc<dyn TitleSearch>,
    on_confirmed: ConfirmedCallback,
    bus: Bus,
    event_tx: mpsc::UnboundedSender<ControllerEvent>,
    event_rx: mpsc::UnboundedReceiver<ControllerEvent>,
    snapshot_tx: watch::Sender<SearchSnapshot>,
    shutdown: CancellationToken,
    query: String,
    candidates: Vec<Candidate>,
    phase: SearchPhase,
    generation: u64,
    pending_timer: Option<JoinHandle<()>>,
    last_error: Option<String>,
}

impl SearchActor {
    pub(crate) fn new(
        settings: SearchSettings,
        provider: Arc<dyn TitleSearch>,
        on_confirmed: ConfirmedCallback,
        bus: Bus,
        channels: ControllerChannels,
    ) -> Self {
        let ControllerChannels {
            event_tx,
            event_rx,
            snapshot_tx,
            shutdown,
        } = channels;
        Self {
            settings,
            provider,
            on_confirmed,
            bus,
            event_tx,
            event_rx,
            snapshot_tx,
            shutdown,
            query: String::new(),
            candidates: Vec::new(),
            phase: SearchPhase::Idle,
            generation: 0,
            pending_timer: None,
            last_error: None,
        }
    }

    pub(crate) async fn run(mut self) {
        loop {
            let event = tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => break,
                event = self.event_rx.recv() => match event {
                    Some(event) => event,
                    None => break,
                },
            };

            match event {
                ControllerEvent::TextChanged { text, reply } => {
                    self.handle_text_changed(text);
                    let _ = reply.send(());
                }
                ControllerEvent::Select { candidate, reply } => {
                    self.handle_select(candidate);
                    let _ = reply.send(());
                }
                ControllerEvent::SelectIndex { index, reply } => {
                    let _ = reply.send(self.handle_select_index(index));
                }
                ControllerEvent::TimerExpired { generation } => {
                    self.handle_timer_expired(generation);
                }
                ControllerEvent::LookupResolved {
                    generation,
                    query,
                    result,
                } => self.handle_lookup_resolved(generation, query, result),
            }
        }

        self.cancel_timer();
        tracing::debug!("search controller stopped at generation {}", self.generation);
    }

    fn handle_text_changed(&mut self, text: String) {
        self.query = text;
        self.last_error = None;
        self.react_to_query_change();
        self.publish();
    }

    /// Applies the state machine to the current query. Every reaction opens a
    /// new generation, which makes any earlier timer or lookup unobservable.
    fn react_to_query_change(&mut self) {
        self.generation += 1;
        self.cancel_timer();

        let (phase, reaction) = self.phase.on_query_changed(&self.query);
        self.phase = phase;
        match reaction {
            QueryReaction::Clear => self.candidates.clear(),
            QueryReaction::Schedule => self.schedule_timer(),
            QueryReaction::Swallow => {
                self.candidates.clear();
                tracing::debug!(
                    "selection suppression consumed at generation {}",
                    self.generation
                );
                let _ = self.bus.publish(SearchEvent::SuppressionConsumed {
                    generation: self.generation,
                });
            }
        }
    }

    fn schedule_timer(&mut self) {
        let generation = self.generation;
        let delay = self.settings.debounce;
        let event_tx = self.event_tx.clone();

        self.pending_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = event_tx.send(ControllerEvent::TimerExpired { generation });
        }));
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.pending_timer.take() {
            timer.abort();
        }
    }

    fn handle_timer_expired(&mut self, generation: u64) {
        if generation != self.generation {
            tracing::debug!(
                "ignoring debounce timer for generation {} (current {})",
                generation,
                self.generation
            );
            return;
        }
        self.pending_timer = None;

        match self.phase.on_timer_expired() {
            Some((phase, ExpiryAction::Dispatch)) => {
                self.phase = phase;
                self.dispatch_lookup();
            }
            Some((phase, ExpiryAction::Suppressed)) => {
                self.phase = phase;
                let _ = self
                    .bus
                    .publish(SearchEvent::SuppressionConsumed { generation });
            }
            None => return,
        }
        self.publish();
    }

    fn dispatch_lookup(&mut self) {
        let generation = self.generation;
        let query = self.query.clone();
        tracing::info!("dispatching title lookup generation={} query={:?}", generation, query);
        let _ = self.bus.publish(SearchEvent::LookupDispatched {
            generation,
            query: query.clone(),
        });

        let provider = self.provider.clone();
        let event_tx = self.event_tx.clone();
        let timeout = self.settings.lookup_timeout;

        tokio::spawn(async move {
            let result = match tokio::time::timeout(timeout, provider.search_by_title(&query)).await
            {
                Ok(result) => result,
                Err(_) => Err(LookupError::Timeout(timeout)),
            };
            let _ = event_tx.send(ControllerEvent::LookupResolved {
                generation,
                query,
                result,
            });
        });
    }

    fn handle_lookup_resolved(
        &mut self,
        generation: u64,
        query: String,
        result: Result<Vec<MovieRecord>, LookupError>,
    ) {
        if generation != self.generation || query != self.query {
            tracing::debug!(
                "discarding stale lookup result generation={} query={:?} (current {})",
                generation,
                query,
                self.generation
            );
            let _ = self
                .bus
                .publish(SearchEvent::StaleResultDiscarded { generation, query });
            return;
        }

        match result {
            Ok(movies) => {
                self.candidates = movies.iter().map(Candidate::from).collect();
                self.phase = self.phase.on_lookup_resolved(!self.candidates.is_empty());
                let _ = self.bus.publish(SearchEvent::CandidatesLoaded {
                    generation,
                    query,
                    count: self.candidates.len(),
                });
            }
            Err(error) => {
                tracing::warn!("title lookup failed for {:?}: {}", query, error);
                self.candidates.clear();
                self.phase = self.phase.on_lookup_resolved(false);
                if self.settings.failure_policy == FailurePolicy::Surface {
                    self.last_error = Some(error.to_string());
                }
                let _ = self.bus.publish(SearchEvent::LookupFailed {
                    generation,
                    query,
                    error: error.to_string(),
                });
            }
        }
        self.publish();
    }

    fn handle_select(&mut self, candidate: Candidate) {
        self.generation += 1;
        self.cancel_timer();
        self.phase = self.phase.on_selected();
        self.last_error = None;

        // The input shows the chosen title for one frame before it is cleared.
        self.query = decode_entities(&candidate.title).into_owned();
        self.publish();

        tracing::info!("title confirmed: {:?} ({})", candidate.title, candidate.year);
        (self.on_confirmed)(&candidate.title);
        let _ = self.bus.publish(SearchEvent::SelectionConfirmed {
            title: candidate.title,
        });

        self.query.clear();
        self.react_to_query_change();
        self.publish();
    }

    fn handle_select_index(&mut self, index: usize) -> BechdelResult<Candidate> {
        let candidate = self.candidates.get(index).cloned().ok_or_else(|| {
            BechdelError::InvalidInput(format!(
                "no candidate at position {} ({} available)",
                index + 1,
                self.candidates.len()
            ))
        })?;
        self.handle_select(candidate.clone());
        Ok(candidate)
    }

    fn snapshot(&self) -> SearchSnapshot {
        SearchSnapshot {
            query: self.query.clone(),
            candidates: self.candidates.clone(),
            phase: self.phase,
            loading: self.phase.is_loading(),
            generation: self.generation,
            error: self.last_error.clone(),
        }
    }

    fn publish(&self) {
        self.snapshot_tx.send_replace(self.snapshot());
    }
}

impl Drop for SearchActor {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}
