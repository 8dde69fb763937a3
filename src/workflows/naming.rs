use std::path::Path;

use crate::config::NamingConfig;
use crate::domain::meta::UploadMeta;
use crate::domain::models::MovieRecord;

/// Applied in order; later rules see the output of earlier ones.
const SCENE_TOKEN_REPLACEMENTS: [(&str, &str); 2] = [("DD+", "DDP"), ("HDR.", "HDR10.")];

/// Extensions that make a source name count as a media file when deciding
/// whether to carry its extension over to the scene name.
const MEDIA_EXTENSIONS: [&str; 21] = [
    "mkv", "mk3d", "mp4", "m4v", "avi", "divx", "xvid", "ts", "m2ts", "mts", "vob", "mov",
    "wmv", "mpg", "mpeg", "m2v", "webm", "flv", "ogm", "3gp", "iso",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamingOutcome {
    Applied(String),
    Skipped(SkipReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// `prefer_radarr_scene_name` is off.
    Disabled,
    /// The chosen record carries no scene name.
    NoSceneName,
    /// Sanitization removed everything.
    EmptyResult,
}

/// Radarr's `movieFile.sceneName`, trimmed.
pub fn scene_name_of(record: &MovieRecord) -> Option<String> {
    record
        .movie_file
        .as_ref()?
        .scene_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

pub fn apply_scene_token_normalization(scene_name: &str) -> String {
    SCENE_TOKEN_REPLACEMENTS
        .iter()
        .fold(scene_name.to_string(), |name, &(old, new)| name.replace(old, new))
}

pub fn sanitize_scene_name(scene_name: &str, replacement: &str, strip_chars: &[String]) -> String {
    let stripped = strip_chars
        .iter()
        .filter(|chars| !chars.is_empty())
        .fold(scene_name.to_string(), |name, chars| name.replace(chars.as_str(), ""));
    stripped.replace(' ', replacement)
}

/// Token table and sanitization, without the master switch or extension handling.
pub fn normalize_scene_name(scene_name: &str, naming: &NamingConfig) -> String {
    let mut name = scene_name.trim().to_string();
    if naming.normalize_scene_tokens {
        name = apply_scene_token_normalization(&name);
    }
    if naming.sanitize_filenames {
        name = sanitize_scene_name(&name, &naming.space_replacement, &naming.strip_chars);
    }
    name
}

/// Extension of `original` when it looks like a media file, case preserved.
///
/// Only extensions in `MEDIA_EXTENSIONS` count. Anything else, including the
/// dotted tail of a release folder such as `Movie.2160p`, is treated as no
/// extension and is never carried over.
pub fn media_extension(original: &Path) -> Option<&str> {
    let extension = original.extension()?.to_str()?;
    MEDIA_EXTENSIONS
        .iter()
        .any(|known| known.eq_ignore_ascii_case(extension))
        .then_some(extension)
}

/// Appends `original`'s extension unless `name` already ends with it.
pub fn with_original_extension(name: &str, original: Option<&Path>) -> String {
    let Some(extension) = original.and_then(media_extension) else {
        return name.to_string();
    };
    let suffix = format!(".{extension}");
    if name.to_lowercase().ends_with(&suffix.to_lowercase()) {
        name.to_string()
    } else {
        format!("{name}{suffix}")
    }
}

/// The file the scene name will end up naming: the first file of the upload,
/// or failing that the record's own file paths.
fn original_media_path<'a>(meta: &'a UploadMeta, record: &'a MovieRecord) -> Option<&'a Path> {
    if meta.keep_folder {
        return None;
    }
    if let Some(first) = meta.filelist.first() {
        return Some(first.as_path());
    }
    let movie_file = record.movie_file.as_ref()?;
    [
        movie_file.original_file_path.as_deref(),
        movie_file.relative_path.as_deref(),
        movie_file.path.as_deref(),
    ]
    .into_iter()
    .flatten()
    .map(Path::new)
    .find(|path| media_extension(path).is_some())
}

/// Stores Radarr's scene name, normalized per `naming`, as the preferred
/// name for the upload. `meta.name` is left alone; `torrent_name_override`
/// is only filled when nothing set it before.
pub fn apply_preferred_scene_name(meta: &mut UploadMeta, naming: &NamingConfig) -> NamingOutcome {
    if !naming.prefer_radarr_scene_name {
        return NamingOutcome::Skipped(SkipReason::Disabled);
    }

    let Some(record) = meta.radarr.as_ref() else {
        return NamingOutcome::Skipped(SkipReason::NoSceneName);
    };
    let Some(scene_name) = scene_name_of(record) else {
        return NamingOutcome::Skipped(SkipReason::NoSceneName);
    };

    let normalized = normalize_scene_name(&scene_name, naming);
    if normalized.is_empty() {
        return NamingOutcome::Skipped(SkipReason::EmptyResult);
    }
    let name = with_original_extension(&normalized, original_media_path(meta, record));

    log::debug!("Preferred scene name: {scene_name} -> {name}");
    meta.preferred_scene_name = Some(name.clone());
    if meta.torrent_name_override.is_none() {
        meta.torrent_name_override = Some(name.clone());
    }
    NamingOutcome::Applied(name)
}
