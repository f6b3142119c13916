pub mod bus;
pub mod config;
pub mod entities;
pub mod error;
pub mod event;
pub mod movie;
pub mod provider;
pub mod results;
pub mod search;
pub mod verdict;

pub use crate::config::{FailurePolicy, SearchSettings};
pub use crate::error::{BechdelError, BechdelResult, LookupError};
pub use crate::movie::{Candidate, MovieRecord};
pub use crate::provider::{CachedTitleSearch, HttpTitleSearch, TitleSearch};
pub use crate::results::{ResultRow, ResultsPage};
pub use crate::search::{spawn_search_controller, SearchHandle, SearchPhase, SearchSnapshot};
