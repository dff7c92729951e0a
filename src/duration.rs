#![forbid(unsafe_code)]

//! Separates long-form uploads from Shorts by duration.
//!
//! The API reports lengths as ISO-8601 tokens such as `PT4M13S`. Anything we
//! cannot read is [`VideoLength::Unknown`] rather than zero, and unknown videos
//! are kept: dropping a video needs positive evidence that it is a Short.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::{debug, warn};

use crate::api::{MAX_IDS_PER_LOOKUP, YouTubeApi};
use crate::error::Result;
use crate::uploads::VideoRecord;

/// Videos at or under this many seconds count as Shorts.
pub const DEFAULT_SHORTS_THRESHOLD_SECS: u64 = 180;

static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?$").expect("duration pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoLength {
    Known(u64),
    Unknown,
}

impl VideoLength {
    pub fn seconds(self) -> Option<u64> {
        match self {
            VideoLength::Known(seconds) => Some(seconds),
            VideoLength::Unknown => None,
        }
    }
}

/// Parses `PT[<h>H][<m>M][<s>S]`. Day components, fractions, overflow and
/// garbage all come back as `Unknown`; bare `PT` is zero.
pub fn parse_duration(token: &str) -> VideoLength {
    DURATION_RE
        .captures(token.trim())
        .and_then(|caps| total_seconds(&caps))
        .map_or(VideoLength::Unknown, VideoLength::Known)
}

fn total_seconds(caps: &Captures<'_>) -> Option<u64> {
    let component = |index: usize| match caps.get(index) {
        Some(digits) => digits.as_str().parse::<u64>().ok(),
        None => Some(0),
    };
    let hours = component(1)?.checked_mul(3600)?;
    let minutes = component(2)?.checked_mul(60)?;
    hours.checked_add(minutes)?.checked_add(component(3)?)
}

/// Kept iff the length is known to exceed `threshold_secs`, or is unknown.
pub fn is_long_form(length: VideoLength, threshold_secs: u64) -> bool {
    match length {
        VideoLength::Known(seconds) => seconds > threshold_secs,
        VideoLength::Unknown => true,
    }
}

/// Looks up lengths for `video_ids`, one `videos.list` call per consecutive
/// chunk of at most [`MAX_IDS_PER_LOOKUP`] ids. Ids the API does not return
/// are simply absent from the map.
pub fn fetch_durations(
    api: &dyn YouTubeApi,
    video_ids: &[String],
) -> Result<HashMap<String, VideoLength>> {
    let mut lengths = HashMap::with_capacity(video_ids.len());
    for chunk in video_ids.chunks(MAX_IDS_PER_LOOKUP) {
        debug!(count = chunk.len(), "looking up video durations");
        for item in api.list_videos(chunk)? {
            let length = item
                .content_details
                .as_ref()
                .map_or(VideoLength::Unknown, |details| parse_duration(&details.duration));
            if length == VideoLength::Unknown {
                warn!(video_id = %item.id, "unreadable duration, keeping video");
            }
            lengths.insert(item.id, length);
        }
    }
    Ok(lengths)
}

/// Drops known Shorts, keeps everything else in its original order and
/// records the length on videos where it is known.
pub fn filter_long_form(
    api: &dyn YouTubeApi,
    videos: Vec<VideoRecord>,
    threshold_secs: u64,
) -> Result<Vec<VideoRecord>> {
    let ids: Vec<String> = videos.iter().map(|video| video.id.clone()).collect();
    let lengths = fetch_durations(api, &ids)?;

    Ok(videos
        .into_iter()
        .filter_map(|mut video| {
            let length = lengths
                .get(&video.id)
                .copied()
                .unwrap_or(VideoLength::Unknown);
            if !is_long_form(length, threshold_secs) {
                return None;
            }
            video.duration_seconds = length.seconds();
            Some(video)
        })
        .collect())
}
