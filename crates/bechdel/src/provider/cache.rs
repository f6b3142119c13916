use std::sync::Arc;

use async_trait::async_trait;
use moka::sync::Cache;

use crate::config::SearchSettings;
use crate::error::LookupError;
use crate::movie::MovieRecord;

use super::TitleSearch;

/// Caches successful lookups by exact query string.
///
/// Failures are never cached, so the next attempt reaches the provider again.
#[derive(Clone)]
pub struct CachedTitleSearch<P> {
    inner: P,
    cache: Cache<String, Arc<Vec<MovieRecord>>>,
}

impl<P> std::fmt::Debug for CachedTitleSearch<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedTitleSearch")
            .field("entries", &self.cache.entry_count())
            .finish()
    }
}

impl<P: TitleSearch> CachedTitleSearch<P> {
    pub fn new(inner: P, settings: &SearchSettings) -> Self {
        let cache = Cache::builder()
            .max_capacity(settings.cache_capacity.max(1))
            .time_to_live(settings.cache_ttl)
            .build();
        Self { inner, cache }
    }
}

#[async_trait]
impl<P: TitleSearch> TitleSearch for CachedTitleSearch<P> {
    async fn search_by_title(&self, query: &str) -> Result<Vec<MovieRecord>, LookupError> {
        if let Some(hit) = self.cache.get(query) {
            tracing::debug!("title cache hit for {:?}", query);
            return Ok(hit.as_ref().clone());
        }

        let movies = self.inner.search_by_title(query).await?;
        self.cache
            .insert(query.to_string(), Arc::new(movies.clone()));
        Ok(movies)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;

    #[derive(Default)]
    struct CountingSearch {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl TitleSearch for CountingSearch {
        async fn search_by_title(&self, query: &str) -> Result<Vec<MovieRecord>, LookupError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(LookupError::Transport("offline".to_string()));
            }
            Ok(vec![MovieRecord::new(query, 2000)])
        }
    }

    fn settings() -> SearchSettings {
        SearchSettings {
            cache_ttl: Duration::from_secs(60),
            cache_capacity: 8,
            ..SearchSettings::default()
        }
    }

    #[tokio::test]
    async fn repeated_query_hits_cache() {
        let cached = CachedTitleSearch::new(CountingSearch::default(), &settings());

        let first = cached.search_by_title("Alien").await.expect("first");
        let second = cached.search_by_title("Alien").await.expect("second");

        assert_eq!(first, second);
        assert_eq!(cached.inner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn distinct_queries_are_separate_entries() {
        let cached = CachedTitleSearch::new(CountingSearch::default(), &settings());

        cached.search_by_title("Alien").await.expect("alien");
        cached.search_by_title("Aliens").await.expect("aliens");

        assert_eq!(cached.inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let failing = CountingSearch {
            fail: true,
            ..CountingSearch::default()
        };
        let cached = CachedTitleSearch::new(failing, &settings());

        assert!(cached.search_by_title("Alien").await.is_err());
        assert!(cached.search_by_title("Alien").await.is_err());

        assert_eq!(cached.inner.calls.load(Ordering::SeqCst), 2);
    }
}
