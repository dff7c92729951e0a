#![forbid(unsafe_code)]

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("YOUTUBE_API_KEY is not set. Export it or add it to your .env file.")]
    ApiKeyMissing,

    #[error("channel list not found: {}", .0.display())]
    ChannelsFileMissing(PathBuf),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("YouTube API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
