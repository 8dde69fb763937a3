use std::path::PathBuf;

use super::models::MovieRecord;

/// Per-upload state assembled before naming runs.
#[derive(Debug, Clone, Default)]
pub struct UploadMeta {
    pub name: String,
    pub filelist: Vec<PathBuf>,
    /// The upload is a folder; its name never takes a file extension.
    pub keep_folder: bool,
    pub radarr: Option<MovieRecord>,
    pub preferred_scene_name: Option<String>,
    pub torrent_name_override: Option<String>,
}

impl UploadMeta {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}
