#![forbid(unsafe_code)]

//! Maps a configured identifier onto canonical channel metadata.

use tracing::debug;

use crate::api::{ChannelItem, YouTubeApi};
use crate::error::Result;

/// Which `channels.list` filter an identifier resolves through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelLookup {
    /// `@handle`
    Handle(String),
    /// Canonical `UC...` id.
    Id(String),
    /// Legacy username.
    Username(String),
}

impl ChannelLookup {
    /// First match wins: `@` is a handle, `UC` a channel id, anything else a
    /// legacy username.
    pub fn classify(identifier: &str) -> Self {
        let identifier = identifier.trim();
        if identifier.starts_with('@') {
            ChannelLookup::Handle(identifier.to_string())
        } else if identifier.starts_with("UC") {
            ChannelLookup::Id(identifier.to_string())
        } else {
            ChannelLookup::Username(identifier.to_string())
        }
    }

    pub fn query_param(&self) -> (&'static str, &str) {
        match self {
            ChannelLookup::Handle(value) => ("forHandle", value.as_str()),
            ChannelLookup::Id(value) => ("id", value.as_str()),
            ChannelLookup::Username(value) => ("forUsername", value.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelRecord {
    pub id: String,
    pub name: String,
    /// Smallest (`default`) thumbnail, or empty.
    pub thumbnail_url: String,
    pub uploads_playlist: String,
}

impl From<ChannelItem> for ChannelRecord {
    fn from(item: ChannelItem) -> Self {
        let thumbnail_url = item
            .snippet
            .thumbnails
            .default
            .map(|thumb| thumb.url)
            .unwrap_or_default();
        Self {
            id: item.id,
            name: item.snippet.title,
            thumbnail_url,
            uploads_playlist: item.content_details.related_playlists.uploads,
        }
    }
}

/// Resolves one identifier with a single API call. `Ok(None)` means the
/// lookup matched nothing, which callers treat as a skip rather than a failure.
pub fn resolve_channel(api: &dyn YouTubeApi, identifier: &str) -> Result<Option<ChannelRecord>> {
    let lookup = ChannelLookup::classify(identifier);
    debug!(?lookup, "resolving channel");
    let items = api.list_channels(&lookup)?;
    Ok(items.into_iter().next().map(ChannelRecord::from))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{PlaylistItem, VideoItem};
    use crate::error::Error;
    use serde_json::json;
    use std::cell::RefCell;

    fn channel_item(id: &str, title: &str, thumbnails: serde_json::Value) -> ChannelItem {
        serde_json::from_value(json!({
            "id": id,
            "snippet": {"title": title, "thumbnails": thumbnails},
            "contentDetails": {"relatedPlaylists": {"uploads": format!("UU-{id}")}}
        }))
        .unwrap()
    }

    /// Answers each lookup kind with a distinguishable channel.
    #[derive(Default)]
    struct SentinelApi {
        lookups: RefCell<Vec<ChannelLookup>>,
    }

    impl YouTubeApi for SentinelApi {
        fn list_channels(&self, lookup: &ChannelLookup) -> Result<Vec<ChannelItem>> {
            self.lookups.borrow_mut().push(lookup.clone());
            let sentinel = match lookup {
                ChannelLookup::Handle(_) => "by-handle",
                ChannelLookup::Id(_) => "by-id",
                ChannelLookup::Username(_) => "by-username",
            };
            Ok(vec![channel_item(sentinel, sentinel, json!({}))])
        }

        fn list_playlist_items(&self, _: &str, _: usize) -> Result<Vec<PlaylistItem>> {
            unreachable!("resolver never lists uploads")
        }

        fn list_videos(&self, _: &[String]) -> Result<Vec<VideoItem>> {
            unreachable!("resolver never looks up videos")
        }
    }

    /// `None` simulates a dropped connection.
    struct FixedApi(Option<Vec<ChannelItem>>);

    impl YouTubeApi for FixedApi {
        fn list_channels(&self, _: &ChannelLookup) -> Result<Vec<ChannelItem>> {
            self.0
                .clone()
                .ok_or_else(|| Error::Transport("connection reset".into()))
        }

        fn list_playlist_items(&self, _: &str, _: usize) -> Result<Vec<PlaylistItem>> {
            unreachable!()
        }

        fn list_videos(&self, _: &[String]) -> Result<Vec<VideoItem>> {
            unreachable!()
        }
    }

    #[test]
    fn classify_dispatches_on_prefix() {
        assert_eq!(
            ChannelLookup::classify("@veritasium"),
            ChannelLookup::Handle("@veritasium".into())
        );
        assert_eq!(
            ChannelLookup::classify("UCHnyfMqiRRG1u-2MsSQLbXA"),
            ChannelLookup::Id("UCHnyfMqiRRG1u-2MsSQLbXA".into())
        );
        assert_eq!(
            ChannelLookup::classify("  pewdiepie "),
            ChannelLookup::Username("pewdiepie".into())
        );
        // `@` is checked first, so a handle that happens to contain `UC` stays a handle.
        assert_eq!(
            ChannelLookup::classify("@UCsomething"),
            ChannelLookup::Handle("@UCsomething".into())
        );
        // Prefix match is case-sensitive.
        assert_eq!(
            ChannelLookup::classify("ucsomething"),
            ChannelLookup::Username("ucsomething".into())
        );
    }

    #[test]
    fn query_param_matches_lookup_kind() {
        assert_eq!(
            ChannelLookup::Handle("@a".into()).query_param(),
            ("forHandle", "@a")
        );
        assert_eq!(ChannelLookup::Id("UCa".into()).query_param(), ("id", "UCa"));
        assert_eq!(
            ChannelLookup::Username("a".into()).query_param(),
            ("forUsername", "a")
        );
    }

    #[test]
    fn resolve_uses_strategy_for_each_shape() -> Result<()> {
        let api = SentinelApi::default();
        let handle = resolve_channel(&api, "@mkbhd")?.unwrap();
        let id = resolve_channel(&api, "UCBJycsmduvYEL83R_U4JriQ")?.unwrap();
        let username = resolve_channel(&api, "marquesbrownlee")?.unwrap();

        assert_eq!(handle.id, "by-handle");
        assert_eq!(id.id, "by-id");
        assert_eq!(username.id, "by-username");
        assert_eq!(api.lookups.borrow().len(), 3);
        Ok(())
    }

    #[test]
    fn resolve_returns_none_when_nothing_matches() -> Result<()> {
        let api = FixedApi(Some(Vec::new()));
        assert!(resolve_channel(&api, "@ghost")?.is_none());
        Ok(())
    }

    #[test]
    fn resolve_propagates_transport_errors() {
        let api = FixedApi(None);
        assert!(matches!(
            resolve_channel(&api, "@flaky"),
            Err(Error::Transport(_))
        ));
    }

    #[test]
    fn resolve_takes_first_item_and_default_thumbnail() -> Result<()> {
        let api = FixedApi(Some(vec![
            channel_item(
                "UCfirst",
                "First",
                json!({
                    "default": {"url": "https://yt3.example/s88.jpg"},
                    "medium": {"url": "https://yt3.example/s240.jpg"}
                }),
            ),
            channel_item("UCsecond", "Second", json!({})),
        ]));
        let record = resolve_channel(&api, "UCfirst")?.unwrap();
        assert_eq!(
            record,
            ChannelRecord {
                id: "UCfirst".into(),
                name: "First".into(),
                thumbnail_url: "https://yt3.example/s88.jpg".into(),
                uploads_playlist: "UU-UCfirst".into(),
            }
        );
        Ok(())
    }

    #[test]
    fn missing_default_thumbnail_is_empty() -> Result<()> {
        let api = FixedApi(Some(vec![channel_item(
            "UCx",
            "X",
            json!({"high": {"url": "https://yt3.example/s800.jpg"}}),
        )]));
        let record = resolve_channel(&api, "UCx")?.unwrap();
        assert_eq!(record.thumbnail_url, "");
        Ok(())
    }
}
