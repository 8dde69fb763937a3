use anyhow::{Context, Result};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Radarr instances past this index are never consulted.
pub const MAX_RADARR_INSTANCES: usize = 4;

pub const DEFAULT_SPACE_REPLACEMENT: &str = ".";
pub const DEFAULT_STRIP_CHARS: [&str; 6] = ["{", "}", "[", "]", "(", ")"];

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    radarr: Vec<RadarrInstance>,
    #[serde(default)]
    pub naming: NamingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RadarrInstance {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub api_key: String,
}

/// Scene-name rules, resolved once when the config file is read.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NamingConfig {
    #[serde(default)]
    pub prefer_radarr_scene_name: bool,
    #[serde(default)]
    pub normalize_scene_tokens: bool,
    #[serde(default = "default_true")]
    pub sanitize_filenames: bool,
    #[serde(
        default = "default_space_replacement",
        deserialize_with = "deserialize_space_replacement"
    )]
    pub space_replacement: String,
    #[serde(
        default = "default_strip_chars",
        deserialize_with = "deserialize_strip_chars"
    )]
    pub strip_chars: Vec<String>,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            prefer_radarr_scene_name: false,
            normalize_scene_tokens: false,
            sanitize_filenames: true,
            space_replacement: default_space_replacement(),
            strip_chars: default_strip_chars(),
        }
    }
}

impl AppConfig {
    /// Reads the config file (explicit path or the per-user default) and
    /// applies `RADARR_URL` / `RADARR_API_KEY` on top.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = path.map(Path::to_path_buf).unwrap_or_else(get_config_path);

        let mut config = if config_path.exists() {
            let content = fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config file {config_path:?}"))?;
            Self::from_toml_str(&content)
                .with_context(|| format!("Invalid config file {config_path:?}"))?
        } else {
            if path.is_some() {
                anyhow::bail!("Config file not found: {config_path:?}");
            }
            log::debug!("No config file at {config_path:?}, using defaults");
            Self::default()
        };

        config.apply_env_overrides(env::var("RADARR_URL").ok(), env::var("RADARR_API_KEY").ok());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Usable instances in configured order. An entry without an API key
    /// terminates the list.
    pub fn radarr_instances(&self) -> &[RadarrInstance] {
        let usable = self
            .radarr
            .iter()
            .take(MAX_RADARR_INSTANCES)
            .take_while(|instance| !instance.api_key.trim().is_empty())
            .count();
        &self.radarr[..usable]
    }

    fn apply_env_overrides(&mut self, url: Option<String>, api_key: Option<String>) {
        if url.is_none() && api_key.is_none() {
            return;
        }
        if self.radarr.is_empty() {
            self.radarr.push(RadarrInstance::default());
        }
        let first = &mut self.radarr[0];
        if let Some(url) = url {
            first.url = url;
        }
        if let Some(api_key) = api_key {
            first.api_key = api_key;
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_space_replacement() -> String {
    DEFAULT_SPACE_REPLACEMENT.to_string()
}

fn default_strip_chars() -> Vec<String> {
    DEFAULT_STRIP_CHARS.iter().map(|c| c.to_string()).collect()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LenientString {
    Text(String),
    Other(IgnoredAny),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StripCharsSetting {
    List(Vec<LenientString>),
    Text(String),
    Other(IgnoredAny),
}

fn deserialize_space_replacement<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match LenientString::deserialize(deserializer)? {
        LenientString::Text(text) => text,
        LenientString::Other(_) => default_space_replacement(),
    })
}

fn deserialize_strip_chars<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match StripCharsSetting::deserialize(deserializer)? {
        StripCharsSetting::List(items) => items
            .into_iter()
            .filter_map(|item| match item {
                LenientString::Text(text) if !text.is_empty() => Some(text),
                _ => None,
            })
            .collect(),
        StripCharsSetting::Text(text) => parse_strip_chars(&text),
        StripCharsSetting::Other(_) => default_strip_chars(),
    })
}

/// `"{, },[, ]"` splits on commas, `"{}[]"` splits into characters.
pub fn parse_strip_chars(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    let parsed: Vec<String> = if trimmed.contains(',') {
        trimmed
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    } else {
        trimmed
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| c.to_string())
            .collect()
    };

    if parsed.is_empty() {
        default_strip_chars()
    } else {
        parsed
    }
}

fn get_config_dir_path() -> PathBuf {
    xdir::config()
        .map(|path| path.join("scene-namer"))
        // If the standard path could not be found (e.g.`$HOME` is not set),
        // default to the current directory.
        .unwrap_or_default()
}

fn get_config_path() -> PathBuf {
    get_config_dir_path().join("config.toml")
}
