use std::time::Duration;

use async_trait::async_trait;

use crate::config::SearchSettings;
use crate::error::{BechdelError, BechdelResult, LookupError};
use crate::movie::MovieRecord;

use super::TitleSearch;

const MAX_RESPONSE_BYTES: usize = 2 * 1024 * 1024; // 2 MB

/// `getMoviesByTitle` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTitleSearch {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTitleSearch {
    pub fn new(settings: &SearchSettings) -> BechdelResult<Self> {
        if !settings.api_base_url.starts_with("http://")
            && !settings.api_base_url.starts_with("https://")
        {
            return Err(BechdelError::Config(format!(
                "api base url must start with http:// or https://: {}",
                settings.api_base_url
            )));
        }

        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.as_str())
            .timeout(settings.lookup_timeout + Duration::from_secs(1))
            .build()
            .map_err(|e| BechdelError::Config(format!("failed to build http client: {e}")))?;

        Ok(Self {
            client,
            base_url: settings.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url_for(&self, query: &str) -> String {
        format!(
            "{}/getMoviesByTitle?title={}",
            self.base_url,
            urlencoding::encode(query)
        )
    }
}

#[async_trait]
impl TitleSearch for HttpTitleSearch {
    async fn search_by_title(&self, query: &str) -> Result<Vec<MovieRecord>, LookupError> {
        let response = self.client.get(self.url_for(query)).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }

        let bytes = response.bytes().await?;
        if bytes.len() > MAX_RESPONSE_BYTES {
            return Err(LookupError::Provider(format!(
                "response too large: {} bytes (max {})",
                bytes.len(),
                MAX_RESPONSE_BYTES
            )));
        }

        decode_body(&String::from_utf8_lossy(&bytes))
    }
}

fn decode_body(body: &str) -> Result<Vec<MovieRecord>, LookupError> {
    match serde_json::from_str::<serde_json::Value>(body)? {
        rows @ serde_json::Value::Array(_) => Ok(serde_json::from_value(rows)?),
        // Error responses come back as a JSON object rather than an array.
        serde_json::Value::Object(object) => Err(LookupError::Provider(
            object
                .get("description")
                .or_else(|| object.get("status"))
                .and_then(|value| value.as_str())
                .unwrap_or("unexpected object response")
                .to_string(),
        )),
        other => Err(LookupError::Decode(format!(
            "expected an array of movies, got {other}"
        ))),
    }
}
