#![forbid(unsafe_code)]

//! Drives resolve → fetch → filter over every configured channel and writes
//! the snapshot.
//!
//! Each identifier is processed on its own and reported as a
//! [`ChannelOutcome`]; a failure in one channel discards that channel's
//! partial results and never stops the run.

use std::path::PathBuf;

use tracing::{error, info, warn};

use crate::api::YouTubeApi;
use crate::channel::resolve_channel;
use crate::config::RuntimeConfig;
use crate::duration::filter_long_form;
use crate::error::{Error, Result};
use crate::identifiers::load_identifiers;
use crate::snapshot::{ChannelResult, Snapshot, write_snapshot};
use crate::uploads::fetch_uploads;

/// Per-channel knobs, split out of [`RuntimeConfig`] so the pipeline does not
/// need file paths or credentials.
#[derive(Debug, Clone, Copy)]
pub struct PipelineSettings {
    pub max_videos: usize,
    pub shorts_threshold_secs: u64,
}

impl From<&RuntimeConfig> for PipelineSettings {
    fn from(config: &RuntimeConfig) -> Self {
        Self {
            max_videos: config.max_videos,
            shorts_threshold_secs: config.shorts_threshold_secs,
        }
    }
}

#[derive(Debug)]
pub enum ChannelOutcome {
    Captured(ChannelResult),
    NotFound,
    Failed(Error),
}

/// Runs one identifier through the whole chain.
pub fn process_identifier(
    api: &dyn YouTubeApi,
    settings: PipelineSettings,
    identifier: &str,
) -> ChannelOutcome {
    match capture_channel(api, settings, identifier) {
        Ok(Some(result)) => ChannelOutcome::Captured(result),
        Ok(None) => ChannelOutcome::NotFound,
        Err(err) => ChannelOutcome::Failed(err),
    }
}

fn capture_channel(
    api: &dyn YouTubeApi,
    settings: PipelineSettings,
    identifier: &str,
) -> Result<Option<ChannelResult>> {
    let Some(channel) = resolve_channel(api, identifier)? else {
        return Ok(None);
    };
    let uploads = fetch_uploads(api, &channel.uploads_playlist, settings.max_videos)?;
    let fetched = uploads.len();
    let videos = filter_long_form(api, uploads, settings.shorts_threshold_secs)?;
    info!(
        channel = %channel.name,
        kept = videos.len(),
        shorts = fetched - videos.len(),
        "captured channel"
    );
    Ok(Some(ChannelResult::new(channel, videos)))
}

/// What happened across all identifiers of a run.
#[derive(Debug, Default)]
pub struct RunReport {
    pub channels: Vec<ChannelResult>,
    pub not_found: Vec<String>,
    pub failed: Vec<(String, Error)>,
}

/// Processes identifiers sequentially in configuration order.
pub fn collect_channels(
    api: &dyn YouTubeApi,
    settings: PipelineSettings,
    identifiers: &[String],
) -> RunReport {
    let mut report = RunReport::default();
    let total = identifiers.len();

    for (index, identifier) in identifiers.iter().enumerate() {
        info!("[{}/{}] Processing: {}", index + 1, total, identifier);
        match process_identifier(api, settings, identifier) {
            ChannelOutcome::Captured(result) => report.channels.push(result),
            ChannelOutcome::NotFound => {
                warn!(%identifier, "channel not found, skipping");
                report.not_found.push(identifier.clone());
            }
            ChannelOutcome::Failed(err) => {
                error!(%identifier, error = %err, "failed to process channel, skipping");
                report.failed.push((identifier.clone(), err));
            }
        }
    }

    report
}

#[derive(Debug)]
pub enum RunSummary {
    /// The channel list had no identifiers; nothing was written.
    NothingConfigured,
    Written {
        path: PathBuf,
        channels: usize,
        not_found: usize,
        failed: usize,
    },
}

/// Loads the channel list, captures every channel and overwrites the
/// snapshot. Only configuration and output errors are returned; per-channel
/// problems end up in the summary counts.
pub fn run(api: &dyn YouTubeApi, config: &RuntimeConfig) -> Result<RunSummary> {
    let identifiers = load_identifiers(&config.channels_file)?;
    if identifiers.is_empty() {
        return Ok(RunSummary::NothingConfigured);
    }

    let report = collect_channels(api, PipelineSettings::from(config), &identifiers);
    let snapshot = Snapshot::new(report.channels);
    write_snapshot(&config.output_file, &snapshot)?;

    Ok(RunSummary::Written {
        path: config.output_file.clone(),
        channels: snapshot.channels.len(),
        not_found: report.not_found.len(),
        failed: report.failed.len(),
    })
}
