use std::sync::Arc;

use serde::Serialize;

use crate::movie::Candidate;
use crate::search::machine::SearchPhase;

/// Receives the raw title of every accepted selection, exactly once each.
pub type ConfirmedCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// What the presentation layer renders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchSnapshot {
    pub query: String,
    pub candidates: Vec<Candidate>,
    pub phase: SearchPhase,
    pub loading: bool,
    pub generation: u64,
    /// Only set under [`FailurePolicy::Surface`](crate::config::FailurePolicy::Surface).
    pub error: Option<String>,
}
