use std::fs;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use chrono::NaiveDate;

use spotstats_terminal::config::DataSource;
use spotstats_terminal::error::LoadError;
use spotstats_terminal::feed::run_refresh;
use spotstats_terminal::http_client::configure_timeout;
use spotstats_terminal::snapshot_fetch::load_dataset;
use spotstats_terminal::state::{AppState, Delta, apply_delta};

const SNAPSHOT_ETAG: &str = "\"fixtures-v1\"";

fn fixtures_dir() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path
}

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 15).expect("valid date")
}

fn short_timeout() {
    configure_timeout(Duration::from_secs(1));
}

fn read_head(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk) {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn respond(stream: &mut TcpStream, status: &str, body: &str) {
    let reply = format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nETag: {SNAPSHOT_ETAG}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let _ = stream.write_all(reply.as_bytes());
}

/// Accepts connections and never answers them.
fn silent_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind local listener");
    let base = format!("http://{}", listener.local_addr().expect("local addr"));
    thread::spawn(move || {
        let mut held = Vec::new();
        for stream in listener.incoming().flatten() {
            held.push(stream);
        }
    });
    base
}

/// Serves the fixture snapshots under `/snapshots/`, answering 304 to
/// revalidations. Returns the address and a counter of 304 replies.
fn snapshot_server() -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind local listener");
    let base = format!("http://{}", listener.local_addr().expect("local addr"));
    let not_modified = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&not_modified);
    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else {
                continue;
            };
            let counter = Arc::clone(&counter);
            thread::spawn(move || {
                let head = read_head(&mut stream);
                let target = head
                    .lines()
                    .next()
                    .and_then(|line| line.split_whitespace().nth(1))
                    .unwrap_or_default()
                    .to_string();
                let Some(file) = target.strip_prefix("/snapshots/") else {
                    respond(&mut stream, "404 Not Found", "");
                    return;
                };
                if head.to_ascii_lowercase().contains("if-none-match") {
                    counter.fetch_add(1, Ordering::SeqCst);
                    respond(&mut stream, "304 Not Modified", "");
                    return;
                }
                match fs::read_to_string(fixtures_dir().join(file)) {
                    Ok(body) => respond(&mut stream, "200 OK", &body),
                    Err(_) => respond(&mut stream, "404 Not Found", ""),
                }
            });
        }
    });
    (base, not_modified)
}

#[test]
fn unanswered_fetch_times_out() {
    short_timeout();
    let source = DataSource::Remote(silent_server());
    let err = load_dataset(&source, 1).expect_err("silent server should time out");
    assert!(err.is_timeout(), "unexpected error {err}");
    assert!(matches!(err, LoadError::Timeout { ref url } if url.ends_with("rosters.json")));
}

#[test]
fn timed_out_refresh_keeps_previous_dataset() {
    short_timeout();
    let mut state = AppState::new(day());
    let first = state.begin_refresh();
    let dataset = load_dataset(&DataSource::Directory(fixtures_dir()), first)
        .expect("fixtures should load");
    apply_delta(&mut state, Delta::DatasetLoaded(Box::new(dataset)));

    let second = state.begin_refresh();
    let (tx, rx) = mpsc::channel();
    run_refresh(&DataSource::Remote(silent_server()), second, &tx);
    drop(tx);
    for delta in rx {
        apply_delta(&mut state, delta);
    }

    assert!(!state.is_loading());
    assert_eq!(state.applied_generation, first);
    assert_eq!(state.dataset.as_ref().map(|d| d.generation), Some(first));
    assert!(
        state
            .last_error
            .as_deref()
            .is_some_and(|err| err.contains("timed out"))
    );
}

#[test]
fn remote_snapshots_load_and_revalidate() {
    short_timeout();
    let (base, not_modified) = snapshot_server();
    let source = DataSource::Remote(format!("{base}/snapshots"));

    let dataset = load_dataset(&source, 3).expect("remote fixtures should load");
    assert_eq!(dataset.generation, 3);
    assert_eq!(dataset.players.len(), 5);
    assert_eq!(dataset.games_on(day()).len(), 2);
    assert_eq!(
        dataset.players["Broken Numbers"].team.as_deref(),
        Some("LAL")
    );
    assert_eq!(not_modified.load(Ordering::SeqCst), 0);

    let again = load_dataset(&source, 4).expect("revalidated fixtures should load");
    assert_eq!(not_modified.load(Ordering::SeqCst), 3);
    assert_eq!(again.players.len(), dataset.players.len());
    assert_eq!(again.rosters, dataset.rosters);
}

#[test]
fn missing_remote_snapshot_is_a_status_error() {
    short_timeout();
    let (base, _) = snapshot_server();
    let source = DataSource::Remote(format!("{base}/elsewhere"));
    let err = load_dataset(&source, 1).expect_err("unknown path should fail");
    assert!(
        matches!(err, LoadError::Status { status: 404, .. }),
        "unexpected error {err}"
    );
}
