#![forbid(unsafe_code)]

//! Refreshes `data/videos.json` with the latest long-form uploads of every
//! channel listed in `channels.txt`. Meant to run from a scheduled job.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;
use tubefeed::api::YouTubeClient;
use tubefeed::config::{RuntimeOverrides, resolve_runtime_config};
use tubefeed::pipeline::{self, RunSummary};

#[derive(Debug, Parser)]
#[command(name = "fetch_videos")]
#[command(about = "Snapshot the latest long-form videos of configured YouTube channels")]
#[command(version)]
struct FetchArgs {
    /// dotenv file to read settings from
    #[arg(long, value_name = "PATH")]
    env_file: Option<PathBuf>,

    /// Channel list, one @handle, UC... id or username per line
    #[arg(short, long, value_name = "PATH")]
    channels_file: Option<PathBuf>,

    /// Where to write the snapshot
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Uploads to fetch per channel (1-50)
    #[arg(short = 'n', long)]
    max_videos: Option<usize>,

    /// Videos at or under this many seconds are treated as Shorts
    #[arg(long, value_name = "SECS")]
    shorts_threshold: Option<u64>,

    /// YouTube Data API base URL
    #[arg(long, value_name = "URL")]
    api_base: Option<String>,
}

impl FetchArgs {
    fn into_overrides(self) -> RuntimeOverrides {
        RuntimeOverrides {
            channels_file: self.channels_file,
            output_file: self.output,
            max_videos: self.max_videos,
            shorts_threshold_secs: self.shorts_threshold,
            api_base: self.api_base,
            env_path: self.env_file,
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let args = FetchArgs::parse();

    let config = resolve_runtime_config(args.into_overrides()).context("loading configuration")?;
    let api = YouTubeClient::new(&config);

    match pipeline::run(&api, &config).context("refreshing video snapshot")? {
        RunSummary::NothingConfigured => {
            println!(
                "No channels configured. Add channels to {}.",
                config.channels_file.display()
            );
        }
        RunSummary::Written {
            path,
            channels,
            not_found,
            failed,
        } => {
            if not_found + failed > 0 {
                warn!(not_found, failed, "some channels were skipped");
            }
            println!();
            println!("Done. Saved {} channels to {}", channels, path.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_default_to_no_overrides() {
        let overrides = FetchArgs::try_parse_from(["fetch_videos"])
            .unwrap()
            .into_overrides();
        assert!(overrides.channels_file.is_none());
        assert!(overrides.output_file.is_none());
        assert!(overrides.max_videos.is_none());
        assert!(overrides.shorts_threshold_secs.is_none());
        assert!(overrides.api_base.is_none());
        assert!(overrides.env_path.is_none());
    }

    #[test]
    fn args_map_onto_overrides() {
        let overrides = FetchArgs::try_parse_from([
            "fetch_videos",
            "--env-file",
            "/etc/tubefeed.env",
            "-c",
            "/srv/site/channels.txt",
            "--output",
            "/srv/site/data/videos.json",
            "-n",
            "25",
            "--shorts-threshold",
            "60",
            "--api-base",
            "http://127.0.0.1:8080/youtube/v3",
        ])
        .unwrap()
        .into_overrides();

        assert_eq!(overrides.env_path, Some(PathBuf::from("/etc/tubefeed.env")));
        assert_eq!(
            overrides.channels_file,
            Some(PathBuf::from("/srv/site/channels.txt"))
        );
        assert_eq!(
            overrides.output_file,
            Some(PathBuf::from("/srv/site/data/videos.json"))
        );
        assert_eq!(overrides.max_videos, Some(25));
        assert_eq!(overrides.shorts_threshold_secs, Some(60));
        assert_eq!(
            overrides.api_base.as_deref(),
            Some("http://127.0.0.1:8080/youtube/v3")
        );
    }

    #[test]
    fn args_reject_unknown_flags() {
        assert!(FetchArgs::try_parse_from(["fetch_videos", "--bogus"]).is_err());
    }
}
