use std::io::{IsTerminal, Stdout, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use snapshooter_frame::{Boundary, Frame, MultipartWriter};

use crate::exit::{frame_error, CliResult};

/// Boundary token used when re-emitting frames with `--format mjpeg`.
pub const MJPEG_BOUNDARY: &str = "snapshooter";

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
    Mjpeg,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct FrameOutput<'a> {
    index: u64,
    source: &'a str,
    content_type: Option<&'a str>,
    size: usize,
    path: Option<String>,
    timestamp: String,
}

/// One extracted frame plus where it came from.
pub struct FrameRecord<'a> {
    pub index: u64,
    pub source: &'a str,
    pub frame: &'a Frame,
    pub path: Option<&'a Path>,
}

/// Prints frame records to stdout in the selected format.
///
/// `mjpeg` keeps a multipart writer open across records; call
/// [`FramePrinter::finish`] to close the body.
pub struct FramePrinter {
    format: OutputFormat,
    mjpeg: Option<MultipartWriter<Stdout>>,
}

impl FramePrinter {
    pub fn new(format: OutputFormat) -> CliResult<Self> {
        let mjpeg = match format {
            OutputFormat::Mjpeg => {
                let boundary = Boundary::new(MJPEG_BOUNDARY)
                    .map_err(|err| frame_error("mjpeg output", err))?;
                Some(MultipartWriter::new(std::io::stdout(), boundary))
            }
            _ => None,
        };
        Ok(Self { format, mjpeg })
    }

    pub fn print(&mut self, record: &FrameRecord<'_>) -> CliResult<()> {
        let frame = record.frame;
        match self.format {
            OutputFormat::Json => {
                let out = FrameOutput {
                    index: record.index,
                    source: record.source,
                    content_type: frame.content_type(),
                    size: frame.len(),
                    path: record.path.map(|p| p.display().to_string()),
                    timestamp: now_unix_seconds(),
                };
                println!(
                    "{}",
                    serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
                );
            }
            OutputFormat::Table => {
                let mut table = Table::new();
                table
                    .load_preset(UTF8_FULL)
                    .set_content_arrangement(ContentArrangement::Dynamic)
                    .set_header(vec!["#", "SIZE", "TYPE", "SOURCE", "PATH"])
                    .add_row(vec![
                        record.index.to_string(),
                        frame.len().to_string(),
                        frame.content_type().unwrap_or("-").to_string(),
                        record.source.to_string(),
                        record
                            .path
                            .map(|p| p.display().to_string())
                            .unwrap_or_else(|| "-".to_string()),
                    ]);
                println!("{table}");
            }
            OutputFormat::Pretty => {
                let mut line = format!(
                    "frame={} size={} type={} source={}",
                    record.index,
                    frame.len(),
                    frame.content_type().unwrap_or("-"),
                    record.source
                );
                if let Some(path) = record.path {
                    line.push_str(&format!(" path={}", path.display()));
                }
                println!("{line}");
            }
            OutputFormat::Raw => {
                print_raw(frame.payload.as_ref());
            }
            OutputFormat::Mjpeg => {
                if let Some(writer) = self.mjpeg.as_mut() {
                    writer
                        .write_frame(frame)
                        .map_err(|err| frame_error("mjpeg output", err))?;
                }
            }
        }
        Ok(())
    }

    /// Close a multipart body if one was started.
    pub fn finish(&mut self) -> CliResult<()> {
        if let Some(writer) = self.mjpeg.as_mut() {
            writer
                .finish()
                .map_err(|err| frame_error("mjpeg output", err))?;
        }
        Ok(())
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}
