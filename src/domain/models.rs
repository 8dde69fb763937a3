use serde::{Deserialize, Deserializer, Serialize};

/// One movie entry as returned by Radarr's `/movie` and `/movie/lookup` endpoints.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct MovieRecord {
    pub tmdb_id: Option<u64>,
    pub imdb_id: Option<String>,
    pub title: Option<String>,
    pub year: Option<u32>,
    #[serde(deserialize_with = "null_as_empty")]
    pub genres: Vec<String>,
    pub path: Option<String>,
    pub folder: Option<String>,
    pub folder_name: Option<String>,
    pub movie_file: Option<MovieFile>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct MovieFile {
    pub original_file_path: Option<String>,
    pub path: Option<String>,
    pub relative_path: Option<String>,
    pub release_group: Option<String>,
    pub scene_name: Option<String>,
}

/// Projection of the record picked for a file. Every field is empty when
/// the provider returned nothing.
#[derive(Debug, Serialize, Clone, Default, PartialEq)]
pub struct MovieData {
    pub imdb_id: Option<u64>,
    pub tmdb_id: Option<u64>,
    pub year: Option<u32>,
    pub genres: Vec<String>,
    pub release_group: Option<String>,
    pub movie: Option<MovieRecord>,
}

/// `null` decodes to an empty list instead of failing the whole record.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl MovieData {
    pub fn has_external_id(&self) -> bool {
        self.imdb_id.is_some() || self.tmdb_id.is_some()
    }
}
