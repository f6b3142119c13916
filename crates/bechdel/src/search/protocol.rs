use tokio::sync::oneshot;

use crate::error::{BechdelResult, LookupError};
use crate::movie::{Candidate, MovieRecord};

pub(crate) enum ControllerEvent {
    TextChanged {
        text: String,
        reply: oneshot::Sender<()>,
    },
    Select {
        candidate: Candidate,
        reply: oneshot::Sender<()>,
    },
    SelectIndex {
        index: usize,
        reply: oneshot::Sender<BechdelResult<Candidate>>,
    },
    TimerExpired {
        generation: u64,
    },
    LookupResolved {
        generation: u64,
        query: String,
        result: Result<Vec<MovieRecord>, LookupError>,
    },
}
