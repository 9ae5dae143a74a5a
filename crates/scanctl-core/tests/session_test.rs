// Loader behavior tests against a mock gateway.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use scanctl_core::model::Filter;
use scanctl_core::{AuthCredentials, CoreError, LoadOptions, Session, SessionConfig, TlsVerification};

// ── Helpers ─────────────────────────────────────────────────────────

fn envelope(data: serde_json::Value) -> serde_json::Value {
    json!({ "status": "200", "status_text": "OK", "data": data })
}

fn config(server: &MockServer, threshold: u64) -> SessionConfig {
    SessionConfig {
        url: server.uri().parse().expect("mock server URI"),
        auth: AuthCredentials {
            username: "admin".into(),
            password: "secret".to_owned().into(),
        },
        tls: TlsVerification::SystemDefaults,
        timeout: Duration::from_secs(5),
        report_results_threshold: threshold,
    }
}

async fn connected_session(server: &MockServer, threshold: u64) -> Session {
    Mock::given(method("POST"))
        .and(path("/gmp/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({}))))
        .mount(server)
        .await;

    let session = Session::new(config(server, threshold));
    session.connect().await.expect("connect");
    session
}

// ── In-flight guard ─────────────────────────────────────────────────

#[tokio::test]
async fn concurrent_loads_for_one_key_hit_the_gateway_once() {
    let server = MockServer::start().await;
    let session = connected_session(&server, 1000).await;

    Mock::given(method("GET"))
        .and(path("/gmp/tasks/t1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope(json!({ "_id": "t1", "status": "Done" })))
                .set_delay(Duration::from_millis(50)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (first, second) = tokio::join!(
        session.load_task("t1", LoadOptions::default()),
        session.load_task("t1", LoadOptions::default()),
    );

    // Exactly one call reached the gateway; the other resolved as a
    // no-op without dispatching.
    let loaded = first.expect("first load");
    let skipped = second.expect("second load");
    assert!(loaded.is_some() != skipped.is_some());

    let state = session.stores().tasks.state();
    assert_eq!(state.is_loading("t1", None), Some(false));
    assert!(state.entity("t1", None).is_some());
}

#[tokio::test]
async fn force_bypasses_the_guard() {
    let server = MockServer::start().await;
    let session = connected_session(&server, 1000).await;

    Mock::given(method("GET"))
        .and(path("/gmp/tasks/t1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope(json!({ "_id": "t1" })))
                .set_delay(Duration::from_millis(50)),
        )
        .expect(2)
        .mount(&server)
        .await;

    let forced = LoadOptions {
        force: true,
        ..LoadOptions::default()
    };
    let (first, second) = tokio::join!(
        session.load_task("t1", LoadOptions::default()),
        session.load_task("t1", forced),
    );
    assert!(first.expect("first load").is_some());
    assert!(second.expect("forced load").is_some());
}

#[tokio::test]
async fn distinct_keys_load_concurrently() {
    let server = MockServer::start().await;
    let session = connected_session(&server, 1000).await;

    for id in ["t1", "t2"] {
        Mock::given(method("GET"))
            .and(path(format!("/gmp/tasks/{id}")))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(envelope(json!({ "_id": id }))),
            )
            .expect(1)
            .mount(&server)
            .await;
    }

    let (first, second) = tokio::join!(
        session.load_task("t1", LoadOptions::default()),
        session.load_task("t2", LoadOptions::default()),
    );
    assert!(first.expect("t1").is_some());
    assert!(second.expect("t2").is_some());
}

// ── Threshold variant ───────────────────────────────────────────────

#[tokio::test]
async fn large_report_stays_a_summary() {
    let server = MockServer::start().await;
    // 10000 filtered results >= threshold 1000: no upgrade.
    let session = connected_session(&server, 1000).await;

    Mock::given(method("GET"))
        .and(path("/gmp/reports/r1"))
        .and(query_param("details", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "_id": "r1",
            "report": {
                "scan_run_status": "Done",
                "result_count": { "full": "20000", "filtered": "10000" },
            },
        }))))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/gmp/reports/r1"))
        .and(query_param("details", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({ "_id": "r1" }))))
        .expect(0)
        .mount(&server)
        .await;

    let report = session
        .load_report_with_threshold("r1", LoadOptions::default())
        .await
        .expect("threshold load")
        .expect("summary payload");
    assert_eq!(report.filtered_result_count(), 10_000);
}

#[tokio::test]
async fn small_report_upgrades_to_details() {
    let server = MockServer::start().await;
    // 10000 filtered results < threshold 100001: upgrade follows.
    let session = connected_session(&server, 100_001).await;

    Mock::given(method("GET"))
        .and(path("/gmp/reports/r1"))
        .and(query_param("details", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "_id": "r1",
            "report": {
                "result_count": { "full": "20000", "filtered": "10000" },
            },
        }))))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/gmp/reports/r1"))
        .and(query_param("details", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "_id": "r1",
            "report": {
                "scan_run_status": "Done",
                "result_count": { "full": "20000", "filtered": "10000" },
                "severity": { "filtered": "9.8" },
            },
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let report = session
        .load_report_with_threshold("r1", LoadOptions::default())
        .await
        .expect("threshold load")
        .expect("detailed payload");

    // The stored payload is the detailed phase-2 fetch.
    assert_eq!(report.severity, Some(9.8));
    let state = session.stores().reports.state();
    assert_eq!(
        state.entity("r1", None).expect("cached report").severity,
        Some(9.8)
    );
}

// ── Error handling ──────────────────────────────────────────────────

#[tokio::test]
async fn protocol_error_is_persisted_and_returned() {
    let server = MockServer::start().await;
    let session = connected_session(&server, 1000).await;

    Mock::given(method("GET"))
        .and(path("/gmp/tasks/t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "400",
            "status_text": "Bogus command name",
            "data": null,
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    let err = session
        .load_task("t1", LoadOptions::default())
        .await
        .expect_err("load should fail");
    assert!(matches!(err, CoreError::Protocol { .. }));

    let state = session.stores().tasks.state();
    assert_eq!(state.is_loading("t1", None), Some(false));
    assert!(state.error("t1", None).is_some());
    assert!(state.entity("t1", None).is_none());

    // A subsequent success clears the persisted error.
    Mock::given(method("GET"))
        .and(path("/gmp/tasks/t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({ "_id": "t1" }))))
        .mount(&server)
        .await;

    session
        .load_task("t1", LoadOptions::default())
        .await
        .expect("retry")
        .expect("payload");
    let state = session.stores().tasks.state();
    assert!(state.error("t1", None).is_none());
    assert!(state.entity("t1", None).is_some());
}

#[tokio::test]
async fn load_without_connect_is_an_error_and_no_dispatch() {
    let server = MockServer::start().await;
    let session = Session::new(config(&server, 1000));

    let err = session
        .load_task("t1", LoadOptions::default())
        .await
        .expect_err("not connected");
    assert!(matches!(err, CoreError::NotConnected));

    // The key was never touched.
    let state = session.stores().tasks.state();
    assert_eq!(state.is_loading("t1", None), None);
}

// ── Cache reuse ─────────────────────────────────────────────────────

#[tokio::test]
async fn if_needed_resolves_from_cache_without_a_second_call() {
    let server = MockServer::start().await;
    let session = connected_session(&server, 1000).await;

    Mock::given(method("GET"))
        .and(path("/gmp/tasks/t1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope(json!({ "_id": "t1", "name": "cached" }))),
        )
        .expect(1)
        .mount(&server)
        .await;

    session
        .load_task("t1", LoadOptions::default())
        .await
        .expect("initial load");

    let cached = session
        .load_task_if_needed("t1", LoadOptions::default())
        .await
        .expect("cached load")
        .expect("payload");
    assert_eq!(cached.info.name.as_deref(), Some("cached"));
}

#[tokio::test]
async fn equivalent_filters_share_the_stored_payload() {
    let server = MockServer::start().await;
    let session = connected_session(&server, 1000).await;

    Mock::given(method("GET"))
        .and(path("/gmp/tasks/t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({ "_id": "t1" }))))
        .expect(1)
        .mount(&server)
        .await;

    let write_filter: Filter = "foo=bar rows=10".parse().expect("filter");
    session
        .load_task(
            "t1",
            LoadOptions {
                filter: Some(write_filter),
                ..LoadOptions::default()
            },
        )
        .await
        .expect("load");

    // Same semantic filter, different pagination: cache hit.
    let read_filter: Filter = "foo=bar first=10".parse().expect("filter");
    let state = session.stores().tasks.state();
    assert!(state.entity("t1", Some(&read_filter)).is_some());

    // if-needed through the equivalent filter skips the network.
    let cached = session
        .load_task_if_needed(
            "t1",
            LoadOptions {
                filter: Some("foo=bar first=10".parse().expect("filter")),
                ..LoadOptions::default()
            },
        )
        .await
        .expect("cached load");
    assert!(cached.is_some());
}

// ── Delta pairs ─────────────────────────────────────────────────────

#[tokio::test]
async fn delta_loads_cache_under_the_pair_identifier() {
    let server = MockServer::start().await;
    let session = connected_session(&server, 1000).await;

    Mock::given(method("GET"))
        .and(path("/gmp/reports/r1/delta/r2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "_id": "r1",
            "report": { "scan_run_status": "Done" },
        }))))
        .expect(1)
        .mount(&server)
        .await;

    session
        .load_report_delta("r1", "r2", LoadOptions::default())
        .await
        .expect("delta load")
        .expect("payload");

    let deltas = session.stores().delta_reports.state();
    assert!(deltas.delta("r1", "r2").is_some());
    assert!(deltas.delta("r2", "r1").is_none());
    // The single-report cache is untouched.
    assert!(session.stores().reports.state().entity("r1", None).is_none());
}

// ── Collections ─────────────────────────────────────────────────────

#[tokio::test]
async fn collection_load_stores_under_the_filter_key() {
    let server = MockServer::start().await;
    let session = connected_session(&server, 1000).await;

    Mock::given(method("GET"))
        .and(path("/gmp/tasks"))
        .and(query_param("filter", "name~web rows=5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            { "_id": "t1", "name": "web scan" },
            { "_id": "t2", "name": "web audit" },
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    let filter: Filter = "name~web rows=5".parse().expect("filter");
    let tasks = session
        .load_tasks(Some(filter.clone()), false)
        .await
        .expect("list load")
        .expect("payload");
    assert_eq!(tasks.len(), 2);

    let state = session.stores().task_lists.state();
    assert!(state.collection(Some(&filter)).is_some());
    // Simplified sharing applies to collections too.
    let equivalent: Filter = "name~web".parse().expect("filter");
    assert!(state.collection(Some(&equivalent)).is_some());
    assert!(state.collection(None).is_none());
}
