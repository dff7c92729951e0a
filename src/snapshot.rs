#![forbid(unsafe_code)]

//! The `videos.json` document and how it lands on disk.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::channel::ChannelRecord;
use crate::error::Result;
use crate::uploads::VideoRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelResult {
    pub id: String,
    pub name: String,
    pub thumbnail: String,
    /// Newest first, as the uploads playlist returned them.
    pub videos: Vec<VideoRecord>,
}

impl ChannelResult {
    pub fn new(channel: ChannelRecord, videos: Vec<VideoRecord>) -> Self {
        Self {
            id: channel.id,
            name: channel.name,
            thumbnail: channel.thumbnail_url,
            videos,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub last_updated: DateTime<Utc>,
    /// Same order as the configured identifiers, minus any that were skipped.
    pub channels: Vec<ChannelResult>,
}

impl Snapshot {
    pub fn new(channels: Vec<ChannelResult>) -> Self {
        Self {
            last_updated: Utc::now(),
            channels,
        }
    }
}

/// Replaces whatever is at `path` with `snapshot` as pretty-printed JSON,
/// creating the parent directory if needed. The document is written to a
/// sibling temp file first so readers never see a half-written snapshot.
pub fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let mut contents = serde_json::to_string_pretty(snapshot)?;
    contents.push('\n');

    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, contents)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}
