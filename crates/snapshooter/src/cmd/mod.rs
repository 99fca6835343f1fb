use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Subcommand};
use snapshooter_stream::StreamConfig;

use crate::exit::{CliError, CliResult, INTERNAL, USAGE};
use crate::output::OutputFormat;

pub mod extract;
pub mod snapshot;
pub mod version;
pub mod watch;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Stream frames from a camera and print one record per frame.
    Watch(WatchArgs),
    /// Save the first frame a camera delivers.
    Snapshot(SnapshotArgs),
    /// Extract frames from a captured multipart body.
    Extract(ExtractArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Watch(args) => watch::run(args, format),
        Command::Snapshot(args) => snapshot::run(args, format),
        Command::Extract(args) => extract::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

/// Reconnect tuning shared by the streaming commands.
#[derive(Args, Debug)]
pub struct StreamArgs {
    /// Delay between reconnect attempts (e.g. 5s, 500ms).
    #[arg(long, default_value = "5s")]
    pub retry_delay: String,
    /// Abandon a connection after this long without data (e.g. 3s).
    #[arg(long, default_value = "3s")]
    pub idle_timeout: String,
}

impl StreamArgs {
    pub fn to_config(&self) -> CliResult<StreamConfig> {
        Ok(StreamConfig {
            retry_delay: parse_duration(&self.retry_delay)?,
            idle_timeout: parse_duration(&self.idle_timeout)?,
            ..StreamConfig::default()
        })
    }
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// MJPEG stream URL (http or https; user:pass@ for basic auth).
    pub url: String,
    /// Exit after N frames.
    #[arg(long)]
    pub count: Option<u64>,
    #[command(flatten)]
    pub stream: StreamArgs,
}

#[derive(Args, Debug)]
pub struct SnapshotArgs {
    /// MJPEG stream URL.
    pub url: String,
    /// File to write the JPEG to.
    #[arg(long, short = 'o')]
    pub output: PathBuf,
    /// Give up if no frame arrives within this time (e.g. 30s).
    #[arg(long, default_value = "30s")]
    pub timeout: String,
    #[command(flatten)]
    pub stream: StreamArgs,
}

#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Captured multipart body, or `-` for stdin.
    pub input: String,
    /// Boundary token, without the leading `--`.
    #[arg(long)]
    pub boundary: String,
    /// Write each frame to DIR/frame-NNNNN.jpg.
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,
    /// Stop after N frames.
    #[arg(long)]
    pub count: Option<u64>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Parse `5s`, `150ms` or a bare number of seconds.
pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        _ => Ok(Duration::from_secs(value)),
    }
}

pub fn runtime() -> CliResult<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| CliError::new(INTERNAL, format!("runtime setup failed: {err}")))
}
