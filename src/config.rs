#![forbid(unsafe_code)]

use std::{
    collections::HashMap,
    env,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::duration::DEFAULT_SHORTS_THRESHOLD_SECS;
use crate::error::{Error, Result};

pub const DEFAULT_ENV_PATH: &str = ".env";
pub const DEFAULT_CHANNELS_FILE: &str = "channels.txt";
pub const DEFAULT_OUTPUT_FILE: &str = "data/videos.json";
pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/youtube/v3";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
/// `playlistItems.list` never returns more than this many items per page.
pub const MAX_VIDEOS_CEILING: usize = 50;

/// Everything one run needs, resolved once at startup and passed down.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub api_key: String,
    pub channels_file: PathBuf,
    pub output_file: PathBuf,
    pub max_videos: usize,
    pub shorts_threshold_secs: u64,
    pub api_base: String,
    pub http_timeout: Duration,
}

#[derive(Debug, Clone, Default)]
pub struct RuntimeOverrides {
    pub channels_file: Option<PathBuf>,
    pub output_file: Option<PathBuf>,
    pub max_videos: Option<usize>,
    pub shorts_threshold_secs: Option<u64>,
    pub api_base: Option<String>,
    pub env_path: Option<PathBuf>,
}

pub fn resolve_runtime_config(overrides: RuntimeOverrides) -> Result<RuntimeConfig> {
    let env_path = overrides
        .env_path
        .as_deref()
        .unwrap_or_else(|| Path::new(DEFAULT_ENV_PATH));
    let file_vars = read_env_file(env_path)?;
    build_runtime_config_with_overrides(&file_vars, env_var_string, overrides)
}

#[cfg(test)]
fn build_runtime_config(
    file_vars: &HashMap<String, String>,
    env_lookup: impl Fn(&str) -> Option<String>,
) -> Result<RuntimeConfig> {
    build_runtime_config_with_overrides(file_vars, env_lookup, RuntimeOverrides::default())
}

fn build_runtime_config_with_overrides(
    file_vars: &HashMap<String, String>,
    env_lookup: impl Fn(&str) -> Option<String>,
    overrides: RuntimeOverrides,
) -> Result<RuntimeConfig> {
    let api_key =
        lookup_value("YOUTUBE_API_KEY", file_vars, &env_lookup).ok_or(Error::ApiKeyMissing)?;
    let channels_file = overrides
        .channels_file
        .or_else(|| lookup_value("CHANNELS_FILE", file_vars, &env_lookup).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CHANNELS_FILE));
    let output_file = overrides
        .output_file
        .or_else(|| lookup_value("OUTPUT_FILE", file_vars, &env_lookup).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_FILE));
    let max_videos = overrides
        .max_videos
        .or_else(|| {
            lookup_value("MAX_VIDEOS", file_vars, &env_lookup)
                .and_then(|value| value.parse::<usize>().ok())
        })
        .unwrap_or(MAX_VIDEOS_CEILING)
        .clamp(1, MAX_VIDEOS_CEILING);
    let shorts_threshold_secs = overrides
        .shorts_threshold_secs
        .or_else(|| {
            lookup_value("SHORTS_THRESHOLD_SECS", file_vars, &env_lookup)
                .and_then(|value| value.parse::<u64>().ok())
        })
        .unwrap_or(DEFAULT_SHORTS_THRESHOLD_SECS);
    let api_base = overrides
        .api_base
        .filter(|value| !value.trim().is_empty())
        .or_else(|| lookup_value("YOUTUBE_API_BASE", file_vars, &env_lookup))
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
        .trim()
        .trim_end_matches('/')
        .to_string();
    let http_timeout_secs = lookup_value("HTTP_TIMEOUT_SECS", file_vars, &env_lookup)
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);

    Ok(RuntimeConfig {
        api_key,
        channels_file,
        output_file,
        max_videos,
        shorts_threshold_secs,
        api_base,
        http_timeout: Duration::from_secs(http_timeout_secs),
    })
}

fn env_var_string(key: &str) -> Option<String> {
    env::var(key).ok()
}

/// Process environment wins over the `.env` file. Blank values count as unset.
fn lookup_value(
    key: &str,
    file_vars: &HashMap<String, String>,
    env_lookup: &impl Fn(&str) -> Option<String>,
) -> Option<String> {
    env_lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .or_else(|| {
            file_vars
                .get(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        })
}

/// Reads a dotenv file into a map without touching the process environment.
/// A missing file yields an empty map.
pub fn read_env_file(path: &Path) -> Result<HashMap<String, String>> {
    let mut vars = HashMap::new();
    if !path.exists() {
        return Ok(vars);
    }
    let iter = dotenvy::from_path_iter(path)
        .map_err(|err| Error::Config(format!("reading {}: {err}", path.display())))?;
    for item in iter {
        let (key, value) =
            item.map_err(|err| Error::Config(format!("parsing {}: {err}", path.display())))?;
        vars.insert(key, value);
    }
    Ok(vars)
}
