mod cache;
mod http;

use async_trait::async_trait;

use crate::error::LookupError;
use crate::movie::MovieRecord;

pub use cache::CachedTitleSearch;
pub use http::HttpTitleSearch;

/// External title-search service.
///
/// Implementations may fail with any [`LookupError`]; callers decide how a
/// failure is presented.
#[async_trait]
pub trait TitleSearch: Send + Sync {
    async fn search_by_title(&self, query: &str) -> Result<Vec<MovieRecord>, LookupError>;
}

#[async_trait]
impl<T: TitleSearch + ?Sized> TitleSearch for std::sync::Arc<T> {
    async fn search_by_title(&self, query: &str) -> Result<Vec<MovieRecord>, LookupError> {
        (**self).search_by_title(query).await
    }
}
