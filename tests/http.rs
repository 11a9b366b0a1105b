use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::net::TcpListener;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize, PartialEq)]
struct Record {
    date: String,
    score: u8,
}

#[derive(Debug, Deserialize)]
struct StatusLine {
    kind: String,
    message: String,
}

#[derive(Debug, Deserialize)]
struct ScoresResponse {
    date: String,
    records: Vec<Record>,
    status: Option<StatusLine>,
}

#[derive(Debug, Deserialize)]
struct SaveResponse {
    outcome: String,
    status: StatusLine,
    record: Record,
    records: Vec<Record>,
}

struct TestServer {
    base_url: String,
    data_path: PathBuf,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
        let _ = std::fs::remove_file(&self.data_path);
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    /// The shared server lives in a static and is never dropped.
    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_data_path() -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("daily_performance_http_{}_{}.json", std::process::id(), nanos));
    path
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/scores")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server_with(seed: Option<&[u8]>) -> TestServer {
    let port = pick_free_port();
    let data_path = unique_data_path();
    if let Some(bytes) = seed {
        std::fs::write(&data_path, bytes).expect("seed data file");
    }

    let child = Command::new(env!("CARGO_BIN_EXE_daily_performance"))
        .env("PORT", port.to_string())
        .env("APP_DATA_PATH", &data_path)
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer {
        base_url,
        data_path,
        child,
    }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = spawn_server_with(None).await;
    #[cfg(unix)]
    cleanup::register(server.child.id());

    let server = Arc::new(server);
    *guard = Some(Arc::clone(&server));
    server
}

async fn get_scores(client: &Client, base_url: &str) -> ScoresResponse {
    client
        .get(format!("{base_url}/api/scores"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

async fn post_score(client: &Client, base_url: &str, score: i64) -> reqwest::Response {
    client
        .post(format!("{base_url}/api/scores"))
        .json(&serde_json::json!({ "score": score }))
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn http_save_twice_updates_todays_record() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let first: SaveResponse = post_score(&client, &server.base_url, 40).await.json().await.unwrap();
    let second: SaveResponse = post_score(&client, &server.base_url, 85).await.json().await.unwrap();

    assert!(first.outcome == "inserted" || first.outcome == "updated");
    assert_eq!(second.outcome, "updated");
    assert_eq!(second.status.kind, "ok");
    assert_eq!(second.status.message, "Updated today's score");
    assert_eq!(second.record.score, 85);
    assert_eq!(second.records.len(), first.records.len());

    let scores = get_scores(&client, &server.base_url).await;
    let today: Vec<_> = scores.records.iter().filter(|r| r.date == scores.date).collect();
    assert_eq!(today.len(), 1);
    assert_eq!(today[0].score, 85);

    let stored = std::fs::read(&server.data_path).expect("data file written");
    let stored: Vec<Record> = serde_json::from_slice(&stored).unwrap();
    assert_eq!(stored, scores.records);
}

#[tokio::test]
async fn http_out_of_range_score_is_rejected() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before = get_scores(&client, &server.base_url).await;
    for score in [101, -1] {
        let response = post_score(&client, &server.base_url, score).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
    let after = get_scores(&client, &server.base_url).await;
    assert_eq!(after.records, before.records);
}

#[tokio::test]
async fn http_form_save_redirects_and_records_score() {
    let server = spawn_server_with(None).await;
    let client = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    let response = client
        .post(format!("{}/score", server.base_url))
        .form(&[("score", "33")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()["location"], "/?saved=inserted");

    let scores = get_scores(&client, &server.base_url).await;
    assert_eq!(
        scores.records,
        vec![Record { date: scores.date.clone(), score: 33 }]
    );

    let rejected = client
        .post(format!("{}/score", server.base_url))
        .form(&[("score", "150")])
        .send()
        .await
        .unwrap();
    assert_eq!(rejected.status(), StatusCode::BAD_REQUEST);
    assert_eq!(get_scores(&client, &server.base_url).await.records, scores.records);

    let page = client
        .get(format!("{}/?saved=inserted", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("Saved today's score"));
}

#[tokio::test]
async fn http_save_after_corrupt_load_clears_error() {
    let seed: &[u8] = b"garbage";
    let server = spawn_server_with(Some(seed)).await;
    let client = Client::new();

    assert!(get_scores(&client, &server.base_url).await.status.is_some());
    let saved = post_score(&client, &server.base_url, 60).await;
    assert!(saved.status().is_success());

    let scores = get_scores(&client, &server.base_url).await;
    assert!(scores.status.is_none());
    assert_eq!(scores.records.len(), 1);
    assert_ne!(std::fs::read(&server.data_path).unwrap(), seed);
}

#[tokio::test]
async fn http_index_renders_page() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;

    let body = Client::new()
        .get(&server.base_url)
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("Daily Performance"));
    assert!(body.contains(r#"id="score""#));
}

#[tokio::test]
async fn http_export_declines_then_downloads() {
    let server = spawn_server_with(None).await;
    let client = Client::new();

    let empty = client
        .get(format!("{}/api/export", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(empty.status(), StatusCode::NOT_FOUND);
    assert_eq!(empty.text().await.unwrap(), "No data to export");
    assert!(!server.data_path.exists());

    let saved = post_score(&client, &server.base_url, 70).await;
    assert!(saved.status().is_success());

    let export = client
        .get(format!("{}/api/export", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(export.status(), StatusCode::OK);
    assert_eq!(
        export.headers()["content-disposition"],
        r#"attachment; filename="daily_performance.json""#
    );
    assert_eq!(export.headers()["content-type"], "application/json");
    let body = export.text().await.unwrap();
    assert!(body.contains("\n  {"));
    let records: Vec<Record> = serde_json::from_str(&body).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].score, 70);
}

#[tokio::test]
async fn http_corrupt_data_starts_empty_and_keeps_file() {
    let seed: &[u8] = b"[{\"date\": \"2024-01-01\", \"score\": \"high\"}]";
    let server = spawn_server_with(Some(seed)).await;
    let client = Client::new();

    let scores = get_scores(&client, &server.base_url).await;
    assert!(scores.records.is_empty());
    let status = scores.status.expect("missing load status");
    assert_eq!(status.kind, "error");
    assert_eq!(status.message, "Failed to load saved data");
    assert_eq!(std::fs::read(&server.data_path).unwrap(), seed);
}

#[tokio::test]
async fn http_existing_history_is_loaded_in_order() {
    let seed: &[u8] = br#"[
        {"date": "2024-01-02", "score": 70},
        {"date": "2024-01-01", "score": 50}
    ]"#;
    let server = spawn_server_with(Some(seed)).await;

    let scores = get_scores(&Client::new(), &server.base_url).await;
    assert!(scores.status.is_none());
    assert_eq!(
        scores.records,
        vec![
            Record { date: "2024-01-01".into(), score: 50 },
            Record { date: "2024-01-02".into(), score: 70 },
        ]
    );
}
