use serde::Serialize;

/// Notable controller transitions, published on the [`Bus`](crate::bus::Bus).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SearchEvent {
    LookupDispatched {
        generation: u64,
        query: String,
    },
    CandidatesLoaded {
        generation: u64,
        query: String,
        count: usize,
    },
    LookupFailed {
        generation: u64,
        query: String,
        error: String,
    },
    /// A lookup resolved after its query had been superseded.
    StaleResultDiscarded {
        generation: u64,
        query: String,
    },
    SuppressionConsumed {
        generation: u64,
    },
    SelectionConfirmed {
        title: String,
    },
}
