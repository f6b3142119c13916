//! Incremental title search: debounced lookups and the selection guard.

mod actor;
mod handle;
mod machine;
mod protocol;
mod types;

pub use handle::{spawn_search_controller, SearchHandle};
pub use machine::SearchPhase;
pub use types::{ConfirmedCallback, SearchSnapshot};
