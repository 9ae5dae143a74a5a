// Integration tests for `GmpClient` using wiremock.

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use scanctl_api::client::GetOptions;
use scanctl_api::{Error, GmpClient};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, GmpClient) {
    let server = MockServer::start().await;
    let base = server.uri().parse().expect("mock server URI");
    let client = GmpClient::with_client(reqwest::Client::new(), base);
    (server, client)
}

fn envelope(data: serde_json::Value) -> serde_json::Value {
    json!({ "status": "200", "status_text": "OK", "data": data })
}

// ── Happy-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn get_task_unwraps_envelope() {
    let (server, client) = setup().await;

    let body = envelope(json!({
        "_id": "task-1",
        "name": "Weekly scan",
        "status": "Done",
        "usage_type": "scan",
        "alterable": "0",
    }));

    Mock::given(method("GET"))
        .and(path("/gmp/tasks/task-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let task = client
        .get_task("task-1", &GetOptions::default())
        .await
        .expect("task fetch");

    assert_eq!(task.base.id.as_deref(), Some("task-1"));
    assert_eq!(task.base.name.as_deref(), Some("Weekly scan"));
    assert_eq!(task.status.as_deref(), Some("Done"));
    assert_eq!(task.alterable.as_deref(), Some("0"));
}

#[tokio::test]
async fn get_task_sends_filter_and_details() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/gmp/tasks/task-1"))
        .and(query_param("filter", "min_qod=70 rows=10"))
        .and(query_param("details", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({ "_id": "task-1" }))))
        .expect(1)
        .mount(&server)
        .await;

    let options = GetOptions {
        filter: Some("min_qod=70 rows=10".into()),
        details: Some(true),
    };
    client.get_task("task-1", &options).await.expect("task fetch");
}

#[tokio::test]
async fn list_tasks_returns_collection() {
    let (server, client) = setup().await;

    let body = envelope(json!([
        { "_id": "t1", "name": "one" },
        { "_id": "t2", "name": "two" },
    ]));

    Mock::given(method("GET"))
        .and(path("/gmp/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let tasks = client.list_tasks(None).await.expect("task list");
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[1].base.id.as_deref(), Some("t2"));
}

#[tokio::test]
async fn get_report_delta_hits_pair_path() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/gmp/reports/r1/delta/r2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "_id": "r1",
            "report": { "scan_run_status": "Done" },
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let report = client
        .get_report_delta("r1", "r2", &GetOptions::default())
        .await
        .expect("delta fetch");
    assert_eq!(report.base.id.as_deref(), Some("r1"));
}

// ── Error-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn protocol_status_error_surfaces_status_text() {
    let (server, client) = setup().await;

    let body = json!({
        "status": "400",
        "status_text": "Bogus command name",
        "data": null,
    });

    Mock::given(method("GET"))
        .and(path("/gmp/tasks/bad"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let err = client
        .get_task("bad", &GetOptions::default())
        .await
        .expect_err("protocol error");

    match err {
        Error::Gmp { status, message } => {
            assert_eq!(status, "400");
            assert_eq!(message, "Bogus command name");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn http_unauthorized_maps_to_session_expired() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/gmp/tasks/t1"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client
        .get_task("t1", &GetOptions::default())
        .await
        .expect_err("auth error");
    assert!(err.is_auth_expired());
}

#[tokio::test]
async fn login_failure_maps_to_authentication() {
    let (server, client) = setup().await;

    let body = json!({
        "status": "401",
        "status_text": "Login failed",
        "data": null,
    });

    Mock::given(method("POST"))
        .and(path("/gmp/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let err = client.login("admin", "wrong").await.expect_err("login error");
    match err {
        Error::Authentication { message } => assert_eq!(message, "Login failed"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/gmp/tasks/t1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let err = client
        .get_task("t1", &GetOptions::default())
        .await
        .expect_err("parse error");
    match err {
        Error::Deserialization { body, .. } => assert!(body.contains("not json")),
        other => panic!("unexpected error: {other:?}"),
    }
}
