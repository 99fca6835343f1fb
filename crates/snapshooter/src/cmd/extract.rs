use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use snapshooter_frame::{Boundary, MultipartReader};

use crate::cmd::ExtractArgs;
use crate::exit::{frame_error, io_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{FramePrinter, FrameRecord, OutputFormat};

pub fn run(args: ExtractArgs, format: OutputFormat) -> CliResult<i32> {
    let boundary = Boundary::new(args.boundary.trim_start_matches("--"))
        .map_err(|err| CliError::new(USAGE, format!("invalid boundary: {err}")))?;

    let input: Box<dyn Read> = if args.input == "-" {
        Box::new(io::stdin().lock())
    } else {
        let file = File::open(&args.input)
            .map_err(|err| io_error(&format!("open {}", args.input), err))?;
        Box::new(BufReader::new(file))
    };

    if let Some(dir) = &args.out_dir {
        fs::create_dir_all(dir)
            .map_err(|err| io_error(&format!("create {}", dir.display()), err))?;
    }

    let mut reader = MultipartReader::new(input, boundary);
    let mut printer = FramePrinter::new(format)?;
    let mut extracted = 0u64;

    for frame in reader.frames() {
        let frame = frame.map_err(|err| frame_error("extract failed", err))?;
        extracted = extracted.saturating_add(1);

        let path = match &args.out_dir {
            Some(dir) => Some(write_frame(dir, extracted, &frame.payload)?),
            None => None,
        };

        printer.print(&FrameRecord {
            index: extracted,
            source: &args.input,
            frame: &frame,
            path: path.as_deref(),
        })?;

        if args.count.is_some_and(|count| extracted >= count) {
            break;
        }
    }

    let malformed = reader.decoder().malformed_segments();
    if malformed > 0 {
        tracing::warn!(malformed, "skipped segments without a header separator");
    }
    tracing::info!(frames = extracted, "extract finished");

    printer.finish()?;
    Ok(SUCCESS)
}

fn write_frame(dir: &Path, index: u64, payload: &[u8]) -> CliResult<PathBuf> {
    let path = dir.join(frame_file_name(index));
    fs::write(&path, payload).map_err(|err| io_error(&format!("write {}", path.display()), err))?;
    Ok(path)
}

fn frame_file_name(index: u64) -> String {
    format!("frame-{index:05}.jpg")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_files_sort_in_stream_order() {
        assert_eq!(frame_file_name(1), "frame-00001.jpg");
        assert_eq!(frame_file_name(42), "frame-00042.jpg");
        assert!(frame_file_name(9) < frame_file_name(10));
    }
}
