use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

use crate::config::RadarrInstance;
use crate::domain::models::MovieRecord;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum RadarrError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),
}

/// What to ask Radarr for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupQuery {
    /// A movie already in the library, by TMDb id.
    TmdbId(u64),
    /// Free-text lookup, usually a file or folder name.
    Term(String),
}

impl LookupQuery {
    pub fn term(&self) -> Option<&str> {
        match self {
            LookupQuery::Term(term) => Some(term),
            LookupQuery::TmdbId(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RadarrClient {
    base_url: String,
    api_key: String,
    http: reqwest::blocking::Client,
}

impl RadarrClient {
    pub fn new(instance: &RadarrInstance) -> Result<Self, RadarrError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            base_url: instance.url.trim().trim_end_matches('/').to_string(),
            api_key: instance.api_key.trim().to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn fetch_movies(&self, query: &LookupQuery) -> Result<Vec<MovieRecord>, RadarrError> {
        let (url, params) = request_parts(&self.base_url, query);
        log::debug!("Radarr URL: {url} {params:?}");

        let response = self
            .http
            .get(&url)
            .header("X-Api-Key", &self.api_key)
            .header("Content-Type", "application/json")
            .query(&params)
            .send()?;

        let status = response.status();
        let body = response.text()?;
        log::debug!("Radarr response status: {status}");

        if !status.is_success() {
            return Err(RadarrError::Http {
                status: status.as_u16(),
                body,
            });
        }

        parse_movie_list(&body)
    }
}

fn request_parts(base_url: &str, query: &LookupQuery) -> (String, Vec<(&'static str, String)>) {
    match query {
        LookupQuery::TmdbId(id) => (
            format!("{base_url}/api/v3/movie"),
            vec![
                ("tmdbId", id.to_string()),
                ("excludeLocalCovers", "true".to_string()),
            ],
        ),
        LookupQuery::Term(term) => (
            format!("{base_url}/api/v3/movie/lookup"),
            vec![("term", term.clone())],
        ),
    }
}

/// Decodes a movie list body. Anything other than a JSON array is treated
/// as an empty result; undecodable elements keep their slot as empty records.
pub fn parse_movie_list(body: &str) -> Result<Vec<MovieRecord>, RadarrError> {
    let value: Value = serde_json::from_str(body)?;
    let Value::Array(items) = value else {
        return Ok(Vec::new());
    };

    Ok(items
        .into_iter()
        .map(|item| serde_json::from_value::<MovieRecord>(item).unwrap_or_default())
        .collect())
}
