use std::fmt;
use std::io;

use snapshooter_frame::FrameError;
use snapshooter_source::SourceError;

// Exit code constants, sysexits-style.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const SOURCE_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::NotFound | io::ErrorKind::ConnectionRefused => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn source_error(context: &str, err: SourceError) -> CliError {
    match err {
        SourceError::InvalidUrl { .. } => CliError::new(USAGE, format!("{context}: {err}")),
        SourceError::Request(ref inner) if inner.is_timeout() => {
            CliError::new(TIMEOUT, format!("{context}: {err}"))
        }
        SourceError::Io(source) => io_error(context, source),
        other => CliError::new(SOURCE_ERROR, format!("{context}: {other}")),
    }
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    match err {
        FrameError::Io(source) => io_error(context, source),
        FrameError::MissingContentType
        | FrameError::MissingBoundary { .. }
        | FrameError::BufferOverflow { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        FrameError::ConnectionClosed => CliError::new(FAILURE, format!("{context}: {err}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_url_is_a_usage_error() {
        let err = SourceError::InvalidUrl {
            url: "nope".to_string(),
            reason: "relative URL without a base".to_string(),
        };
        assert_eq!(source_error("watch", err).code, USAGE);
    }

    #[test]
    fn bad_status_is_a_source_error() {
        let err = SourceError::Status {
            status: 503,
            url: "http://camera/".to_string(),
        };
        let cli = source_error("snapshot", err);
        assert_eq!(cli.code, SOURCE_ERROR);
        assert!(cli.message.starts_with("snapshot: "));
    }

    #[test]
    fn frame_errors_map_to_codes() {
        assert_eq!(
            frame_error("x", FrameError::BufferOverflow { size: 9, max: 8 }).code,
            DATA_INVALID
        );
        assert_eq!(frame_error("x", FrameError::ConnectionClosed).code, FAILURE);
        assert_eq!(
            frame_error(
                "x",
                FrameError::Io(io::Error::from(io::ErrorKind::PermissionDenied))
            )
            .code,
            PERMISSION_DENIED
        );
    }
}
