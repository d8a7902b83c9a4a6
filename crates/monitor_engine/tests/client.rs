use std::time::Duration;

use monitor_engine::{ClientSettings, FailureKind, JobApi, ReqwestJobClient, StartOutcome};
use pretty_assertions::assert_eq;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ReqwestJobClient {
    ReqwestJobClient::new(ClientSettings {
        base_url: server.uri(),
        ..ClientSettings::default()
    })
    .expect("client")
}

#[tokio::test]
async fn start_without_error_is_accepted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/start_scraping"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "message": "Scraping started"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = client_for(&server).start_job().await.expect("start ok");
    assert_eq!(outcome, StartOutcome::Accepted);
}

#[tokio::test]
async fn start_error_field_rejects_regardless_of_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/start_scraping"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": "Scraping is already running"
        })))
        .mount(&server)
        .await;

    let outcome = client_for(&server).start_job().await.expect("decoded");
    assert_eq!(
        outcome,
        StartOutcome::Rejected {
            reason: "Scraping is already running".to_string()
        }
    );
}

#[tokio::test]
async fn start_with_non_json_reply_is_a_decode_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/start_scraping"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).start_job().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Decode);
    assert!(err.message.contains("HTTP 500"), "{}", err.message);
}

#[tokio::test]
async fn status_is_decoded_into_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "running": false,
            "completed": true,
            "error": null,
            "progress": 100,
            "message": "done",
            "total_pins": 12,
            "current_pin": 12,
            "csv_file": "out.csv"
        })))
        .mount(&server)
        .await;

    let payload = client_for(&server).fetch_status().await.expect("status ok");
    assert!(payload.completed);
    assert!(!payload.running);
    assert_eq!(payload.error, None);
    assert_eq!(payload.progress, 100.0);
    assert_eq!(payload.message.as_deref(), Some("done"));
    assert_eq!(payload.total_pins, 12);
    assert_eq!(payload.csv_file.as_deref(), Some("out.csv"));
}

#[tokio::test]
async fn status_times_out_when_configured() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(serde_json::json!({ "running": true })),
        )
        .mount(&server)
        .await;

    let client = ReqwestJobClient::new(ClientSettings {
        base_url: server.uri(),
        request_timeout: Some(Duration::from_millis(50)),
        ..ClientSettings::default()
    })
    .expect("client");

    let err = client.fetch_status().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn unreachable_server_is_a_network_failure() {
    let client = ReqwestJobClient::new(ClientSettings {
        base_url: "http://127.0.0.1:1".to_string(),
        ..ClientSettings::default()
    })
    .expect("client");

    let err = client.fetch_status().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Network);
}
