use snapshooter_source::{Connector, HttpConfig, HttpConnector};
use snapshooter_stream::FrameStream;

use crate::cmd::{parse_duration, runtime, SnapshotArgs};
use crate::exit::{io_error, source_error, CliError, CliResult, FAILURE, SUCCESS, TIMEOUT};
use crate::output::{FramePrinter, FrameRecord, OutputFormat};

pub fn run(args: SnapshotArgs, format: OutputFormat) -> CliResult<i32> {
    let wait = parse_duration(&args.timeout)?;
    let connector = HttpConnector::with_config(&args.url, HttpConfig::default())
        .map_err(|err| source_error("invalid stream url", err))?;
    let source = connector.target();
    let stream = FrameStream::with_config(connector, args.stream.to_config()?);
    let handle = stream.handle();
    // Subscribe before the stream runs so its first frame cannot be missed.
    let first = handle.next_frame();

    let outcome = runtime()?.block_on(async move {
        let task = tokio::spawn(stream.run());
        let waited = tokio::time::timeout(wait, first).await;

        handle.shutdown();
        let _ = task.await;
        waited
    });

    let frame = match outcome {
        Ok(Some(frame)) => frame,
        Ok(None) => {
            return Err(CliError::new(
                FAILURE,
                "stream stopped before a frame arrived",
            ))
        }
        Err(_) => {
            return Err(CliError::new(
                TIMEOUT,
                format!("no frame received within {wait:?}"),
            ))
        }
    };

    std::fs::write(&args.output, &frame.payload)
        .map_err(|err| io_error(&format!("write {}", args.output.display()), err))?;

    let mut printer = FramePrinter::new(format)?;
    printer.print(&FrameRecord {
        index: 1,
        source: &source,
        frame: &frame,
        path: Some(&args.output),
    })?;
    printer.finish()?;

    Ok(SUCCESS)
}
