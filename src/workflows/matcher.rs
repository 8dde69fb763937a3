use std::collections::HashSet;
use std::path::Path;

use regex::Regex;

use crate::domain::models::{MovieData, MovieRecord};

/// Comparable tokens for a path or bare name: the full value, its final
/// component, that component's stem and the parent folder's name, all
/// lower-cased. Blank input yields nothing.
pub fn normalize_tokens(value: Option<&str>) -> HashSet<String> {
    let mut tokens = HashSet::new();
    let Some(stripped) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return tokens;
    };

    tokens.insert(stripped.to_lowercase());

    let path = Path::new(stripped);
    let parts = [
        path.file_name(),
        path.file_stem(),
        // Lets a folder hint match a record that only knows a file inside that folder.
        path.parent().and_then(Path::file_name),
    ];
    tokens.extend(
        parts
            .into_iter()
            .flatten()
            .map(|part| part.to_string_lossy().to_lowercase())
            .filter(|part| !part.is_empty()),
    );

    tokens
}

fn candidate_tokens(record: &MovieRecord) -> HashSet<String> {
    let movie_file = record.movie_file.as_ref();
    let values = [
        movie_file.and_then(|f| f.original_file_path.as_deref()),
        movie_file.and_then(|f| f.path.as_deref()),
        movie_file.and_then(|f| f.relative_path.as_deref()),
        record.path.as_deref(),
        record.folder.as_deref(),
        record.folder_name.as_deref(),
    ];

    values
        .into_iter()
        .flat_map(normalize_tokens)
        .collect()
}

/// First record, in list order, sharing a token with `hint`.
pub fn match_movie_from_filename<'a>(
    records: &'a [MovieRecord],
    hint: Option<&str>,
) -> Option<&'a MovieRecord> {
    let target_tokens = normalize_tokens(hint);
    if target_tokens.is_empty() {
        return None;
    }

    records.iter().find(|record| {
        let tokens = candidate_tokens(record);
        !tokens.is_disjoint(&target_tokens)
    })
}

/// Picks the record for `hint` (falling back to the first one) and projects
/// the fields the upload needs. An empty list yields an all-empty result.
pub fn extract_movie_data(records: &[MovieRecord], hint: Option<&str>) -> MovieData {
    let Some(first) = records.first() else {
        return MovieData::default();
    };
    let movie = match_movie_from_filename(records, hint).unwrap_or(first);

    let release_group = movie
        .movie_file
        .as_ref()
        .and_then(|f| f.release_group.clone())
        .filter(|group| !group.is_empty());

    MovieData {
        imdb_id: movie.imdb_id.as_deref().and_then(parse_imdb_id),
        tmdb_id: movie.tmdb_id,
        year: movie.year,
        genres: movie.genres.clone(),
        release_group,
        movie: Some(movie.clone()),
    }
}

/// `"tt0111161"` -> `111161`.
pub fn parse_imdb_id(raw: &str) -> Option<u64> {
    let re = Regex::new(r"^(?:[A-Za-z]{2})?(\d+)$").ok()?;
    let caps = re.captures(raw.trim())?;
    caps.get(1)?.as_str().parse().ok()
}
