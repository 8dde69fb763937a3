use crate::config::MAX_RADARR_INSTANCES;
use crate::domain::models::{MovieData, MovieRecord};
use crate::infra::radarr::{LookupQuery, RadarrClient, RadarrError};

/// One place movie records can be fetched from.
pub trait MovieSource {
    fn label(&self) -> String;

    fn fetch_movies(&self, query: &LookupQuery) -> Result<Vec<MovieRecord>, RadarrError>;
}

impl MovieSource for RadarrClient {
    fn label(&self) -> String {
        self.base_url().to_string()
    }

    fn fetch_movies(&self, query: &LookupQuery) -> Result<Vec<MovieRecord>, RadarrError> {
        RadarrClient::fetch_movies(self, query)
    }
}

/// Asks each source in turn and returns the first result carrying an IMDb
/// or TMDb id. Failing sources are logged and skipped.
pub fn find_movie_data<S: MovieSource>(
    sources: &[S],
    query: &LookupQuery,
    hint: Option<&str>,
) -> Option<MovieData> {
    if sources.is_empty() {
        log::error!("No Radarr instances are configured.");
        return None;
    }

    let hint = hint.or_else(|| query.term());

    for source in sources.iter().take(MAX_RADARR_INSTANCES) {
        let label = source.label();
        log::debug!("Trying Radarr instance {label}");

        match source.fetch_movies(query) {
            Ok(records) => {
                let movie_data = super::matcher::extract_movie_data(&records, hint);
                if movie_data.has_external_id() {
                    log::info!("Found valid movie data from Radarr instance {label}");
                    log::debug!("Chosen record: {:?}", movie_data.movie);
                    return Some(movie_data);
                }
                log::debug!(
                    "Radarr instance {label} returned {} record(s) without ids",
                    records.len()
                );
            }
            Err(RadarrError::Http { status, body }) => {
                log::warn!("Failed to fetch from Radarr instance {label}: {status} - {body}");
            }
            Err(e) => {
                log::error!("Error fetching from Radarr instance {label}: {e}");
            }
        }
    }

    log::warn!("No Radarr instance returned valid movie data.");
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct FakeSource {
        name: &'static str,
        response: fn() -> Result<Vec<MovieRecord>, RadarrError>,
        calls: Cell<usize>,
    }

    impl FakeSource {
        fn new(name: &'static str, response: fn() -> Result<Vec<MovieRecord>, RadarrError>) -> Self {
            Self {
                name,
                response,
                calls: Cell::new(0),
            }
        }
    }

    impl MovieSource for FakeSource {
        fn label(&self) -> String {
            self.name.to_string()
        }

        fn fetch_movies(&self, _query: &LookupQuery) -> Result<Vec<MovieRecord>, RadarrError> {
            self.calls.set(self.calls.get() + 1);
            (self.response)()
        }
    }

    fn failing() -> Result<Vec<MovieRecord>, RadarrError> {
        Err(RadarrError::Http {
            status: 401,
            body: "Unauthorized".into(),
        })
    }

    fn empty() -> Result<Vec<MovieRecord>, RadarrError> {
        Ok(Vec::new())
    }

    fn without_ids() -> Result<Vec<MovieRecord>, RadarrError> {
        Ok(vec![MovieRecord {
            title: Some("Unknown".into()),
            ..MovieRecord::default()
        }])
    }

    fn heat() -> Result<Vec<MovieRecord>, RadarrError> {
        Ok(vec![
            MovieRecord {
                tmdb_id: Some(1),
                folder: Some("Heat 2 (2026)".into()),
                ..MovieRecord::default()
            },
            MovieRecord {
                tmdb_id: Some(949),
                imdb_id: Some("tt0113277".into()),
                folder: Some("Heat (1995)".into()),
                ..MovieRecord::default()
            },
        ])
    }

    #[test]
    fn test_skips_failing_and_empty_sources() {
        let sources = vec![
            FakeSource::new("a", failing),
            FakeSource::new("b", empty),
            FakeSource::new("c", without_ids),
            FakeSource::new("d", heat),
        ];

        let data = find_movie_data(&sources, &LookupQuery::Term("Heat (1995)".into()), None);

        let data = data.unwrap();
        assert_eq!(data.tmdb_id, Some(949));
        assert_eq!(data.imdb_id, Some(113277));
        assert!(sources.iter().all(|s| s.calls.get() == 1));
    }

    #[test]
    fn test_stops_at_first_valid_source() {
        let sources = vec![FakeSource::new("a", heat), FakeSource::new("b", heat)];

        let data = find_movie_data(&sources, &LookupQuery::TmdbId(949), Some("Heat (1995)"));

        assert_eq!(data.and_then(|d| d.tmdb_id), Some(949));
        assert_eq!(sources[1].calls.get(), 0);
    }

    #[test]
    fn test_tmdb_query_without_hint_uses_first_record() {
        let sources = vec![FakeSource::new("a", heat)];
        let data = find_movie_data(&sources, &LookupQuery::TmdbId(1), None);
        assert_eq!(data.and_then(|d| d.tmdb_id), Some(1));
    }

    #[test]
    fn test_consults_at_most_four_sources() {
        let sources: Vec<FakeSource> = (0..6).map(|_| FakeSource::new("x", failing)).collect();

        assert_eq!(find_movie_data(&sources, &LookupQuery::TmdbId(1), None), None);
        let calls: Vec<usize> = sources.iter().map(|s| s.calls.get()).collect();
        assert_eq!(calls, vec![1, 1, 1, 1, 0, 0]);
    }

    #[test]
    fn test_no_sources() {
        let sources: Vec<FakeSource> = Vec::new();
        assert_eq!(find_movie_data(&sources, &LookupQuery::TmdbId(1), None), None);
    }
}
