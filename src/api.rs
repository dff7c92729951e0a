#![forbid(unsafe_code)]

//! YouTube Data API v3 boundary.
//!
//! The pipeline only ever talks to [`YouTubeApi`], so tests can swap in a
//! stub while the binary uses the blocking [`YouTubeClient`]. Wire types only
//! mirror the fields we read; anything the pipeline indexes unconditionally is
//! required here, so a response missing it fails to decode as a whole.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::channel::ChannelLookup;
use crate::config::RuntimeConfig;
use crate::error::{Error, Result};

/// `videos.list` accepts at most this many comma-separated ids per call.
pub const MAX_IDS_PER_LOOKUP: usize = 50;

pub trait YouTubeApi {
    /// `channels.list` with `part=id,snippet,contentDetails`.
    fn list_channels(&self, lookup: &ChannelLookup) -> Result<Vec<ChannelItem>>;

    /// First page of `playlistItems.list` with `part=snippet`.
    fn list_playlist_items(
        &self,
        playlist_id: &str,
        max_results: usize,
    ) -> Result<Vec<PlaylistItem>>;

    /// `videos.list` with `part=contentDetails` for at most
    /// [`MAX_IDS_PER_LOOKUP`] ids.
    fn list_videos(&self, video_ids: &[String]) -> Result<Vec<VideoItem>>;
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Thumbnail {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Thumbnails {
    pub default: Option<Thumbnail>,
    pub medium: Option<Thumbnail>,
    pub high: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelItem {
    pub id: String,
    pub snippet: ChannelSnippet,
    pub content_details: ChannelContentDetails,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChannelSnippet {
    pub title: String,
    #[serde(default)]
    pub thumbnails: Thumbnails,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelContentDetails {
    pub related_playlists: RelatedPlaylists,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelatedPlaylists {
    pub uploads: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistItem {
    pub snippet: PlaylistItemSnippet,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemSnippet {
    pub title: String,
    #[serde(default)]
    pub thumbnails: Thumbnails,
    pub published_at: String,
    pub resource_id: ResourceId,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceId {
    pub video_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoItem {
    pub id: String,
    pub content_details: Option<VideoContentDetails>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoContentDetails {
    #[serde(default)]
    pub duration: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Blocking client backed by a shared `ureq` agent.
pub struct YouTubeClient {
    agent: ureq::Agent,
    api_key: String,
    base_url: String,
}

impl YouTubeClient {
    pub fn new(config: &RuntimeConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(config.http_timeout)
            .user_agent(concat!("tubefeed/", env!("CARGO_PKG_VERSION")))
            .build();
        Self {
            agent,
            api_key: config.api_key.clone(),
            base_url: config.api_base.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, resource: &str) -> String {
        format!("{}/{}", self.base_url, resource)
    }

    fn get<T: DeserializeOwned>(&self, resource: &str, params: &[(&str, &str)]) -> Result<T> {
        let mut request = self.agent.get(&self.endpoint(resource));
        for (name, value) in params {
            request = request.query(name, value);
        }
        request = request.query("key", &self.api_key);

        match request.call() {
            Ok(response) => response
                .into_json::<T>()
                .map_err(|err| Error::Malformed(format!("{resource}: {err}"))),
            Err(ureq::Error::Status(status, response)) => {
                let body = response.into_string().unwrap_or_default();
                Err(Error::Api {
                    status,
                    message: api_error_message(&body),
                })
            }
            // The transport's own Display includes the request URL, and with it
            // the API key.
            Err(ureq::Error::Transport(transport)) => Err(Error::Transport(
                match transport.message() {
                    Some(message) => format!("{}: {message}", transport.kind()),
                    None => transport.kind().to_string(),
                },
            )),
        }
    }
}

impl YouTubeApi for YouTubeClient {
    fn list_channels(&self, lookup: &ChannelLookup) -> Result<Vec<ChannelItem>> {
        let (param, value) = lookup.query_param();
        let response: ListResponse<ChannelItem> = self.get(
            "channels",
            &[("part", "id,snippet,contentDetails"), (param, value)],
        )?;
        Ok(response.items)
    }

    fn list_playlist_items(
        &self,
        playlist_id: &str,
        max_results: usize,
    ) -> Result<Vec<PlaylistItem>> {
        let max_results = max_results.to_string();
        let response: ListResponse<PlaylistItem> = self.get(
            "playlistItems",
            &[
                ("part", "snippet"),
                ("playlistId", playlist_id),
                ("maxResults", max_results.as_str()),
            ],
        )?;
        Ok(response.items)
    }

    fn list_videos(&self, video_ids: &[String]) -> Result<Vec<VideoItem>> {
        if video_ids.len() > MAX_IDS_PER_LOOKUP {
            return Err(Error::Config(format!(
                "videos.list accepts at most {MAX_IDS_PER_LOOKUP} ids, got {}",
                video_ids.len()
            )));
        }
        let ids = video_ids.join(",");
        let response: ListResponse<VideoItem> =
            self.get("videos", &[("part", "contentDetails"), ("id", ids.as_str())])?;
        Ok(response.items)
    }
}

/// Pulls `error.message` out of Google's error envelope, falling back to the
/// raw body.
fn api_error_message(body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        return envelope.error.message;
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "empty response body".to_string()
    } else {
        trimmed.to_string()
    }
}
