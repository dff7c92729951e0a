#![forbid(unsafe_code)]

//! Pulls the newest entries from a channel's uploads playlist.

use serde::{Deserialize, Serialize};

use crate::api::{PlaylistItem, Thumbnails, YouTubeApi};
use crate::config::MAX_VIDEOS_CEILING;
use crate::error::Result;

const WATCH_URL_PREFIX: &str = "https://www.youtube.com/watch?v=";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub id: String,
    pub title: String,
    #[serde(rename = "thumbnail")]
    pub thumbnail_url: String,
    /// Passed through exactly as the API returned it.
    pub published_at: String,
    pub url: String,
    /// Only set once classification found a known length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u64>,
}

impl VideoRecord {
    pub fn new(id: String, title: String, thumbnail_url: String, published_at: String) -> Self {
        let url = watch_url(&id);
        Self {
            id,
            title,
            thumbnail_url,
            published_at,
            url,
            duration_seconds: None,
        }
    }
}

impl From<PlaylistItem> for VideoRecord {
    fn from(item: PlaylistItem) -> Self {
        let snippet = item.snippet;
        let thumbnail_url = preferred_thumbnail(&snippet.thumbnails);
        VideoRecord::new(
            snippet.resource_id.video_id,
            snippet.title,
            thumbnail_url,
            snippet.published_at,
        )
    }
}

pub fn watch_url(video_id: &str) -> String {
    format!("{WATCH_URL_PREFIX}{video_id}")
}

/// Medium, then high, then default; empty when none is present.
fn preferred_thumbnail(thumbnails: &Thumbnails) -> String {
    thumbnails
        .medium
        .as_ref()
        .or(thumbnails.high.as_ref())
        .or(thumbnails.default.as_ref())
        .map(|thumb| thumb.url.clone())
        .unwrap_or_default()
}

/// First page only, in the order the API returns it (newest first), capped at
/// `max_videos` (itself clamped to the API page size).
pub fn fetch_uploads(
    api: &dyn YouTubeApi,
    playlist_id: &str,
    max_videos: usize,
) -> Result<Vec<VideoRecord>> {
    let max_videos = max_videos.clamp(1, MAX_VIDEOS_CEILING);
    let items = api.list_playlist_items(playlist_id, max_videos)?;
    Ok(items
        .into_iter()
        .take(max_videos)
        .map(VideoRecord::from)
        .collect())
}
