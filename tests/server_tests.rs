//! The HTTP surface: inbound submissions and the admin read API.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use serde_json::{json, Value};
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use form_relay::admin::handlers::SubmissionRow;
use form_relay::http::{HttpServer, SubmissionAccepted, SubmissionFailed};
use form_relay::lifecycle::Shutdown;
use form_relay::{RelayConfig, SubmissionLogStore};

mod common;

struct RunningRelay {
    addr: SocketAddr,
    shutdown: Shutdown,
    config_tx: mpsc::UnboundedSender<RelayConfig>,
    log_path: PathBuf,
    _dir: TempDir,
}

impl RunningRelay {
    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Poll the submission log until it holds `count` entries.
    async fn wait_for_log_entries(&self, count: usize) -> usize {
        let store = SubmissionLogStore::open(&self.log_path).await.unwrap();
        let mut seen = 0;
        for _ in 0..50 {
            seen = store.read_all().await.unwrap().len();
            if seen >= count {
                break;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        seen
    }
}

impl Drop for RunningRelay {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

async fn start_relay(endpoint: &str) -> RunningRelay {
    start_relay_with(endpoint, |_| {}).await
}

async fn start_relay_with(endpoint: &str, customize: impl FnOnce(&mut RelayConfig)) -> RunningRelay {
    let dir = TempDir::new().unwrap();
    let log_path = dir.path().join("submissions.json");
    let mut config = common::relay_config(endpoint, &log_path);
    customize(&mut config);

    let server = HttpServer::from_config(config).await.unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let (config_tx, config_updates) = mpsc::unbounded_channel();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, config_updates, server_shutdown).await;
    });

    RunningRelay {
        addr,
        shutdown,
        config_tx,
        log_path,
        _dir: dir,
    }
}

fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

fn event(name: &str) -> Value {
    json!({"entry": common::signup_entry(name), "form": common::signup_form()})
}

#[tokio::test]
async fn test_submission_is_accepted_and_forwarded() {
    let api = common::start_mock_api(200, "{}").await;
    let relay = start_relay(&api.url()).await;

    let res = client()
        .post(relay.url("/submissions"))
        .json(&event("Alice"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 202);
    let header_id = res
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .expect("request id echoed");

    let body: SubmissionAccepted = res.json().await.unwrap();
    assert!(body.success);
    assert_eq!(body.request_id, header_id);
    assert_eq!(api.requests().len(), 1);
}

#[tokio::test]
async fn test_failed_delivery_is_still_accepted() {
    let api = common::start_mock_api(500, "server error").await;
    let relay = start_relay(&api.url()).await;

    let res = client()
        .post(relay.url("/submissions"))
        .header("x-request-id", "req-42")
        .json(&event("Alice"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 202);
    let body: SubmissionAccepted = res.json().await.unwrap();
    assert!(!body.success);
    assert_eq!(body.message, "API returned error: 500");
    assert_eq!(body.request_id, "req-42");
}

#[tokio::test]
async fn test_submission_logged_after_client_gives_up() {
    let api = common::start_programmable_api(|| async {
        tokio::time::sleep(Duration::from_millis(1500)).await;
        (200, "{}".to_string())
    })
    .await;
    let relay = start_relay(&api.url()).await;

    let impatient = reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_millis(300))
        .build()
        .unwrap();
    let res = impatient
        .post(relay.url("/submissions"))
        .json(&event("Erin"))
        .send()
        .await;
    assert!(res.is_err());

    assert_eq!(relay.wait_for_log_entries(1).await, 1);
    assert_eq!(api.requests().len(), 1);
}

#[tokio::test]
async fn test_submission_logged_after_request_timeout() {
    let api = common::start_programmable_api(|| async {
        tokio::time::sleep(Duration::from_millis(1500)).await;
        (200, "{}".to_string())
    })
    .await;
    let relay = start_relay_with(&api.url(), |config| {
        config.timeouts.request_secs = 1;
    })
    .await;

    let res = client()
        .post(relay.url("/submissions"))
        .json(&event("Finn"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 408);

    assert_eq!(relay.wait_for_log_entries(1).await, 1);
    assert_eq!(api.requests().len(), 1);
}

#[tokio::test]
async fn test_entry_without_ip_is_unprocessable() {
    let api = common::start_mock_api(200, "{}").await;
    let relay = start_relay(&api.url()).await;

    let res = client()
        .post(relay.url("/submissions"))
        .json(&json!({
            "entry": {"1": "x", "date_created": "2024-03-01 10:00:00"},
            "form": common::signup_form()
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 422);
    let body: SubmissionFailed = res.json().await.unwrap();
    assert!(body.error.contains("'ip'"), "unexpected error: {}", body.error);
    assert!(api.requests().is_empty());
}

#[tokio::test]
async fn test_admin_routes_require_bearer_key() {
    let api = common::start_mock_api(200, "{}").await;
    let relay = start_relay(&api.url()).await;

    let res = client()
        .get(relay.url("/admin/submissions"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 401);

    let res = client()
        .get(relay.url("/admin/status"))
        .bearer_auth("wrong")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 401);

    let res = client()
        .get(relay.url("/admin/status"))
        .bearer_auth("test-admin-key")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let status: Value = res.json().await.unwrap();
    assert_eq!(status["endpoint"], json!(api.url()));
}

#[tokio::test]
async fn test_admin_lists_recent_submissions_newest_first() {
    let api = common::start_mock_api(200, "{}").await;
    let relay = start_relay(&api.url()).await;

    for name in ["one", "two", "three"] {
        let res = client()
            .post(relay.url("/submissions"))
            .json(&event(name))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 202);
    }

    let rows: Vec<SubmissionRow> = client()
        .get(relay.url("/admin/submissions?limit=2"))
        .bearer_auth("test-admin-key")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].details.form_data.fields[0].value, "three");
    assert_eq!(rows[1].details.form_data.fields[0].value, "two");
    assert_eq!(rows[0].form, "Signup (ID: 1)");
    assert_eq!(rows[0].status, "Success");
}

#[tokio::test]
async fn test_reloaded_endpoint_used_for_next_submission() {
    let old_api = common::start_mock_api(200, "{}").await;
    let new_api = common::start_mock_api(200, "{}").await;
    let relay = start_relay(&old_api.url()).await;

    let dir = TempDir::new().unwrap();
    let updated = common::relay_config(&new_api.url(), &dir.path().join("unused.json"));
    relay.config_tx.send(updated).unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    let res = client()
        .post(relay.url("/submissions"))
        .json(&event("Dana"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 202);

    assert!(old_api.requests().is_empty());
    assert_eq!(new_api.requests().len(), 1);
}

#[tokio::test]
async fn test_health() {
    let api = common::start_mock_api(200, "{}").await;
    let relay = start_relay(&api.url()).await;

    let res = client().get(relay.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "ok");
}
