#![cfg(feature = "cli")]

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener};
use std::path::PathBuf;
use std::process::Command;
use std::thread;

const JPEG_ONE: &[u8] = b"\xff\xd8\xff\xe0first-frame\xff\xd9";
const JPEG_TWO: &[u8] = b"\xff\xd8\xff\xe0second-frame\xff\xd9";

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "snapshooter-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

fn mjpeg_body(frames: &[&[u8]]) -> Vec<u8> {
    let mut body = b"--cam\r\n".to_vec();
    for frame in frames {
        body.extend_from_slice(b"Content-Type: image/jpeg\r\n");
        body.extend_from_slice(format!("Content-Length: {}\r\n\r\n", frame.len()).as_bytes());
        body.extend_from_slice(frame);
        body.extend_from_slice(b"\r\n--cam\r\n");
    }
    body
}

/// Serve the same MJPEG response to every connection, in writes of at most
/// `write_size` bytes.
fn spawn_camera(frames: &'static [&'static [u8]], write_size: usize) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind should succeed");
    let addr = listener.local_addr().expect("listener should have an address");

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut socket) = stream else { continue };
            thread::spawn(move || {
                let mut head = Vec::new();
                let mut byte = [0u8; 1];
                while !head.ends_with(b"\r\n\r\n") {
                    match socket.read(&mut byte) {
                        Ok(1) => head.push(byte[0]),
                        _ => return,
                    }
                }

                let mut response = b"HTTP/1.1 200 OK\r\nContent-Type: multipart/x-mixed-replace; boundary=cam\r\nConnection: close\r\n\r\n".to_vec();
                response.extend_from_slice(&mjpeg_body(frames));
                for piece in response.chunks(write_size) {
                    if socket.write_all(piece).is_err() {
                        return;
                    }
                }
                let _ = socket.flush();
            });
        }
    });

    addr
}

fn snapshooter() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_snapshooter"));
    cmd.arg("--log-level").arg("error");
    cmd
}

#[test]
fn snapshot_writes_first_frame() {
    static FRAMES: &[&[u8]] = &[JPEG_ONE, JPEG_TWO];
    let addr = spawn_camera(FRAMES, 5);
    let dir = unique_temp_dir("snapshot");
    let out = dir.join("latest.jpg");

    let output = snapshooter()
        .arg("--format")
        .arg("json")
        .arg("snapshot")
        .arg(format!("http://{addr}/video.mjpg"))
        .arg("--output")
        .arg(&out)
        .arg("--timeout")
        .arg("10s")
        .output()
        .expect("snapshot should run");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(std::fs::read(&out).expect("jpeg should exist"), JPEG_ONE);

    let stdout = String::from_utf8_lossy(&output.stdout);
    let record: serde_json::Value =
        serde_json::from_str(stdout.trim()).expect("snapshot should emit json");
    assert_eq!(record["size"].as_u64(), Some(JPEG_ONE.len() as u64));
    assert_eq!(record["content_type"].as_str(), Some("image/jpeg"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn snapshot_keeps_first_frame_when_frames_share_a_chunk() {
    static FRAMES: &[&[u8]] = &[JPEG_ONE, JPEG_TWO];
    let addr = spawn_camera(FRAMES, usize::MAX);
    let dir = unique_temp_dir("snapshot-one-chunk");
    let out = dir.join("first.jpg");

    for _ in 0..3 {
        let output = snapshooter()
            .arg("--format")
            .arg("pretty")
            .arg("snapshot")
            .arg(format!("http://{addr}/video.mjpg"))
            .arg("--output")
            .arg(&out)
            .arg("--timeout")
            .arg("10s")
            .output()
            .expect("snapshot should run");

        assert!(output.status.success());
        assert_eq!(std::fs::read(&out).expect("jpeg should exist"), JPEG_ONE);
    }

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn snapshot_times_out_without_camera() {
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind should succeed");
        listener.local_addr().expect("listener should have an address")
    };
    let dir = unique_temp_dir("snapshot-timeout");

    let output = snapshooter()
        .arg("snapshot")
        .arg(format!("http://{addr}/"))
        .arg("--output")
        .arg(dir.join("never.jpg"))
        .arg("--timeout")
        .arg("1s")
        .arg("--retry-delay")
        .arg("100ms")
        .output()
        .expect("snapshot should run");

    assert_eq!(output.status.code(), Some(124));
    assert!(!dir.join("never.jpg").exists());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn watch_stops_after_count() {
    static FRAMES: &[&[u8]] = &[JPEG_ONE, JPEG_TWO];
    let addr = spawn_camera(FRAMES, 5);

    let output = snapshooter()
        .arg("--format")
        .arg("json")
        .arg("watch")
        .arg(format!("http://{addr}/video.mjpg"))
        .arg("--count")
        .arg("3")
        .arg("--retry-delay")
        .arg("100ms")
        .output()
        .expect("watch should run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let sizes: Vec<u64> = stdout
        .lines()
        .map(|line| {
            let record: serde_json::Value =
                serde_json::from_str(line).expect("each line should be json");
            record["size"].as_u64().expect("size should be present")
        })
        .collect();
    assert_eq!(
        sizes,
        vec![
            JPEG_ONE.len() as u64,
            JPEG_TWO.len() as u64,
            JPEG_ONE.len() as u64
        ]
    );
}

#[test]
fn extract_writes_frame_files() {
    let dir = unique_temp_dir("extract");
    let capture = dir.join("capture.mjpg");
    std::fs::write(&capture, mjpeg_body(&[JPEG_ONE, JPEG_TWO])).expect("capture should write");
    let frames_dir = dir.join("frames");

    let output = snapshooter()
        .arg("--format")
        .arg("pretty")
        .arg("extract")
        .arg(&capture)
        .arg("--boundary")
        .arg("cam")
        .arg("--out-dir")
        .arg(&frames_dir)
        .output()
        .expect("extract should run");

    assert!(output.status.success());
    assert_eq!(
        std::fs::read(frames_dir.join("frame-00001.jpg")).expect("first frame"),
        JPEG_ONE
    );
    assert_eq!(
        std::fs::read(frames_dir.join("frame-00002.jpg")).expect("second frame"),
        JPEG_TWO
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 2);
    assert!(stdout.starts_with("frame=1 "));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn extract_reemits_mjpeg() {
    let dir = unique_temp_dir("reemit");
    let capture = dir.join("capture.mjpg");
    std::fs::write(&capture, mjpeg_body(&[JPEG_ONE])).expect("capture should write");

    let output = snapshooter()
        .arg("--format")
        .arg("mjpeg")
        .arg("extract")
        .arg(&capture)
        .arg("--boundary=--cam")
        .output()
        .expect("extract should run");

    assert!(output.status.success());
    let mut expected = b"--snapshooter\r\nContent-Type: image/jpeg\r\n".to_vec();
    expected.extend_from_slice(format!("Content-Length: {}\r\n\r\n", JPEG_ONE.len()).as_bytes());
    expected.extend_from_slice(JPEG_ONE);
    expected.extend_from_slice(b"\r\n--snapshooter--\r\n");
    assert_eq!(output.stdout, expected);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn extract_rejects_empty_boundary() {
    let output = snapshooter()
        .arg("extract")
        .arg("-")
        .arg("--boundary")
        .arg("")
        .output()
        .expect("extract should run");

    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn version_prints_package_version() {
    let output = snapshooter()
        .arg("version")
        .output()
        .expect("version should run");

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        format!("snapshooter {}", env!("CARGO_PKG_VERSION"))
    );
}
