//! Host side of a confirmed selection.
//!
//! The search controller only hands over a title. The page looks that title
//! up again, keeps the rows, and narrows them to the year the user picked.

use std::sync::Arc;

use serde::Serialize;

use crate::error::BechdelResult;
use crate::movie::MovieRecord;
use crate::provider::TitleSearch;
use crate::verdict::Verdict;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRow {
    pub display_title: String,
    pub year: u16,
    /// `None` when the provider has no usable rating for the film.
    pub verdict: Option<Verdict>,
    pub imdb_url: Option<String>,
}

impl From<&MovieRecord> for ResultRow {
    fn from(record: &MovieRecord) -> Self {
        Self {
            display_title: record.display_title(),
            year: record.year,
            verdict: record
                .rating
                .and_then(|score| Verdict::new(score, record.dubious)),
            imdb_url: record
                .imdb_id
                .as_deref()
                .filter(|id| !id.is_empty())
                .map(|id| format!("https://www.imdb.com/title/tt{id}/")),
        }
    }
}

pub struct ResultsPage {
    provider: Arc<dyn TitleSearch>,
    records: Vec<MovieRecord>,
    selected_year: Option<u16>,
}

impl std::fmt::Debug for ResultsPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultsPage")
            .field("records", &self.records.len())
            .field("selected_year", &self.selected_year)
            .finish()
    }
}

impl ResultsPage {
    pub fn new(provider: Arc<dyn TitleSearch>) -> Self {
        Self {
            provider,
            records: Vec::new(),
            selected_year: None,
        }
    }

    pub fn set_selected_year(&mut self, year: Option<u16>) {
        self.selected_year = year;
    }

    pub fn selected_year(&self) -> Option<u16> {
        self.selected_year
    }

    /// Authoritative lookup for a confirmed title.
    ///
    /// On failure the previous rows stay on screen and the error is returned
    /// for the caller to log.
    pub async fn confirm(&mut self, title: &str) -> BechdelResult<usize> {
        let records = self.provider.search_by_title(title).await.map_err(|error| {
            tracing::warn!("authoritative lookup failed for {:?}: {}", title, error);
            error
        })?;
        tracing::info!("loaded {} result(s) for {:?}", records.len(), title);
        self.records = records;
        Ok(self.records.len())
    }

    pub fn records(&self) -> &[MovieRecord] {
        &self.records
    }

    /// Rows for display, narrowed to the selected year when one is set.
    pub fn rows(&self) -> Vec<ResultRow> {
        self.records
            .iter()
            .filter(|record| self.selected_year.map_or(true, |year| record.year == year))
            .map(ResultRow::from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::error::{BechdelError, LookupError};
    use crate::verdict::BechdelRating;

    struct FixedSearch {
        movies: Vec<MovieRecord>,
        fail: Mutex<bool>,
    }

    #[async_trait]
    impl TitleSearch for FixedSearch {
        async fn search_by_title(&self, _query: &str) -> Result<Vec<MovieRecord>, LookupError> {
            if *self.fail.lock().expect("fail lock") {
                return Err(LookupError::Status(500));
            }
            Ok(self.movies.clone())
        }
    }

    fn little_women() -> Arc<FixedSearch> {
        let mut remake = MovieRecord::new("Little Women", 2019).with_rating(3);
        remake.imdb_id = Some("3281548".to_string());
        Arc::new(FixedSearch {
            movies: vec![
                MovieRecord::new("Little Women", 1994).with_rating(3),
                remake,
                MovieRecord::new("Little Women", 1933),
            ],
            fail: Mutex::new(false),
        })
    }

    #[tokio::test]
    async fn rows_follow_selected_year() {
        let mut page = ResultsPage::new(little_women());
        page.set_selected_year(Some(2019));
        assert_eq!(page.selected_year(), Some(2019));

        assert_eq!(page.confirm("Little Women").await.expect("confirm"), 3);

        let rows = page.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].year, 2019);
        assert_eq!(
            rows[0].verdict.map(|verdict| verdict.rating),
            Some(BechdelRating::Passes)
        );
        assert_eq!(
            rows[0].imdb_url.as_deref(),
            Some("https://www.imdb.com/title/tt3281548/")
        );
    }

    #[tokio::test]
    async fn all_rows_without_selected_year() {
        let mut page = ResultsPage::new(little_women());
        assert_eq!(page.selected_year(), None);
        page.confirm("Little Women").await.expect("confirm");

        let rows = page.rows();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2].verdict, None);
    }

    #[tokio::test]
    async fn failed_lookup_keeps_previous_rows() {
        let provider = little_women();
        let mut page = ResultsPage::new(provider.clone());
        page.confirm("Little Women").await.expect("confirm");

        *provider.fail.lock().expect("fail lock") = true;
        let result = page.confirm("Heat").await;

        assert!(matches!(
            result,
            Err(BechdelError::Lookup(LookupError::Status(500)))
        ));
        assert_eq!(page.records().len(), 3);
    }

    #[test]
    fn row_decodes_title() {
        let row = ResultRow::from(&MovieRecord::new("Ghostbusters &amp; Friends", 2016));
        assert_eq!(row.display_title, "Ghostbusters & Friends");
    }
}
