use snapshooter_source::{Connector, HttpConfig, HttpConnector};
use snapshooter_stream::FrameStream;
use tokio::sync::mpsc;

use crate::cmd::{runtime, WatchArgs};
use crate::exit::{source_error, CliResult, SUCCESS};
use crate::output::{FramePrinter, FrameRecord, OutputFormat};

pub fn run(args: WatchArgs, format: OutputFormat) -> CliResult<i32> {
    let config = args.stream.to_config()?;
    let connector = HttpConnector::with_config(&args.url, HttpConfig::default())
        .map_err(|err| source_error("invalid stream url", err))?;
    let source = connector.target();
    let mut printer = FramePrinter::new(format)?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let stream = FrameStream::with_config(connector, config).on_frame(move |frame| {
        let _ = tx.send(frame.clone());
    });

    runtime()?.block_on(async move {
        let (handle, task) = stream.spawn();
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        let mut printed = 0u64;
        let result = loop {
            tokio::select! {
                _ = &mut ctrl_c => {
                    tracing::info!("interrupted, shutting down");
                    break Ok(SUCCESS);
                }
                frame = rx.recv() => {
                    let Some(frame) = frame else {
                        break Ok(SUCCESS);
                    };
                    printed = printed.saturating_add(1);
                    let record = FrameRecord {
                        index: printed,
                        source: &source,
                        frame: &frame,
                        path: None,
                    };
                    if let Err(err) = printer.print(&record) {
                        break Err(err);
                    }
                    if args.count.is_some_and(|count| printed >= count) {
                        break Ok(SUCCESS);
                    }
                }
            }
        };

        handle.shutdown();
        let _ = task.await;
        let stats = handle.stats();
        tracing::info!(
            frames = stats.frames,
            sessions = stats.sessions,
            disconnects = stats.disconnects,
            malformed = stats.malformed_segments,
            "watch finished"
        );

        printer.finish().and(result)
    })
}
