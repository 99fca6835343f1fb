mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "snapshooter", version, about = "MJPEG frame extraction CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr). RUST_LOG overrides it when set.
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_watch_subcommand() {
        let cli = Cli::try_parse_from([
            "snapshooter",
            "watch",
            "http://camera.local/video.mjpg",
            "--count",
            "3",
            "--retry-delay",
            "500ms",
        ])
        .expect("watch args should parse");

        match cli.command {
            Command::Watch(args) => {
                assert_eq!(args.count, Some(3));
                assert_eq!(args.stream.retry_delay, "500ms");
                assert_eq!(args.stream.idle_timeout, "3s");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn snapshot_requires_output() {
        let err = Cli::try_parse_from(["snapshooter", "snapshot", "http://camera.local/"])
            .expect_err("missing --output should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn parses_extract_with_global_format() {
        let cli = Cli::try_parse_from([
            "snapshooter",
            "extract",
            "-",
            "--boundary",
            "frame",
            "--format",
            "mjpeg",
        ])
        .expect("extract args should parse");

        assert!(matches!(cli.format, Some(OutputFormat::Mjpeg)));
        assert!(matches!(cli.command, Command::Extract(_)));
    }
}
