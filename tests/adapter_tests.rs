use serde_json::json;
use std::time::Duration;
use warehouse_fleet::adapters::outbound::HttpBackend;
use warehouse_fleet::common::{AuthError, ServerRejection, SubmitError, TransportError};
use warehouse_fleet::domains::scanner_agent::{
    AgentIdentity, CredentialSession, ScanReport, WarehouseBackend, DEFAULT_PASSWORD,
};
use warehouse_fleet::domains::warehouse::{Observation, Position, PRODUCT_CATALOG};
use warehouse_fleet::Config;
use wiremock::matchers::{body_json, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend(server: &MockServer) -> HttpBackend {
    HttpBackend::new(&server.uri(), Duration::from_secs(5)).unwrap()
}

fn sample_report() -> ScanReport {
    ScanReport {
        robot_id: "RB-001".to_string(),
        timestamp: "2024-03-05T14:07:09.000000Z".to_string(),
        location: Position { zone: 'A', row: 3, shelf: 7 },
        scan_results: vec![Observation::new(&PRODUCT_CATALOG[2], 64)],
        battery_level: 99.6,
        next_checkpoint: "A-4-7".to_string(),
    }
}

async fn mount_login(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(response)
        .mount(server)
        .await;
}

async fn mount_report(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/api/robots/data"))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_login_posts_derived_credentials_and_returns_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "email": "rb-001@robots.local", "password": "robotpassword123" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "t1" })))
        .expect(1)
        .mount(&server)
        .await;

    let identity = AgentIdentity::numbered(1, DEFAULT_PASSWORD);
    let token = backend(&server).login(identity.credentials()).await.unwrap();
    assert_eq!(token, "t1");
}

#[tokio::test]
async fn test_login_accepts_any_token_key_casing() {
    let server = MockServer::start().await;
    mount_login(&server, ResponseTemplate::new(200).set_body_json(json!({ "Token": "T", "role": "robot" }))).await;

    let identity = AgentIdentity::numbered(2, DEFAULT_PASSWORD);
    let token = backend(&server).login(identity.credentials()).await.unwrap();
    assert_eq!(token, "T");
}

#[tokio::test]
async fn test_login_non_200_is_rejected_with_status_and_body() {
    let server = MockServer::start().await;
    mount_login(&server, ResponseTemplate::new(401).set_body_string("nope")).await;

    let identity = AgentIdentity::numbered(1, DEFAULT_PASSWORD);
    let err = backend(&server).login(identity.credentials()).await.unwrap_err();
    assert_eq!(err, AuthError::Rejected { status: 401, body: "nope".to_string() });
}

#[tokio::test]
async fn test_login_without_token_field_is_missing_token() {
    let server = MockServer::start().await;
    mount_login(&server, ResponseTemplate::new(200).set_body_json(json!({ "user": "rb-001" }))).await;

    let identity = AgentIdentity::numbered(1, DEFAULT_PASSWORD);
    let err = backend(&server).login(identity.credentials()).await.unwrap_err();
    assert!(matches!(err, AuthError::MissingToken { .. }));
}

#[tokio::test]
async fn test_login_with_non_json_body_is_a_decode_error() {
    let server = MockServer::start().await;
    mount_login(&server, ResponseTemplate::new(200).set_body_string("<html>")).await;

    let identity = AgentIdentity::numbered(1, DEFAULT_PASSWORD);
    let err = backend(&server).login(identity.credentials()).await.unwrap_err();
    assert!(matches!(err, AuthError::Transport(TransportError::Decode(_))));
}

#[tokio::test]
async fn test_login_against_closed_port_is_a_connection_error() {
    let backend = HttpBackend::new("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();
    let identity = AgentIdentity::numbered(1, DEFAULT_PASSWORD);
    let err = backend.login(identity.credentials()).await.unwrap_err();
    assert!(matches!(err, AuthError::Transport(TransportError::Connection(_))));
}

#[tokio::test]
async fn test_login_timeout_keeps_the_previous_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "early" })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_login(
        &server,
        ResponseTemplate::new(200)
            .set_body_json(json!({ "token": "late" }))
            .set_delay(Duration::from_millis(500)),
    )
    .await;

    let backend = HttpBackend::new(&server.uri(), Duration::from_millis(100)).unwrap();
    let identity = AgentIdentity::numbered(1, DEFAULT_PASSWORD);
    let mut session = CredentialSession::default();

    session.login(&backend, identity.credentials()).await.unwrap();
    assert_eq!(session.token(), Some("early"));

    let err = session.login(&backend, identity.credentials()).await.unwrap_err();
    assert!(matches!(err, AuthError::Transport(TransportError::Timeout(_))), "{:?}", err);
    assert_eq!(session.token(), Some("early"));
    assert!(session.is_valid());
}

#[tokio::test]
async fn test_report_carries_bearer_token_and_wire_format() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/robots/data"))
        .and(header("authorization", "Bearer tok"))
        .and(body_partial_json(json!({
            "RobotId": "RB-001",
            "location": { "zone": "A", "row": 3, "shelf": 7 },
            "scan_results": [{ "product_id": "TEL-2345", "quantity": 64, "status": "OK" }],
            "battery_level": 99.6,
            "next_checkpoint": "A-4-7"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    backend(&server).submit_report("tok", &sample_report()).await.unwrap();
}

#[tokio::test]
async fn test_report_401_maps_to_unauthorized() {
    let server = MockServer::start().await;
    mount_report(&server, ResponseTemplate::new(401)).await;

    let err = backend(&server).submit_report("expired", &sample_report()).await.unwrap_err();
    assert_eq!(err, SubmitError::Unauthorized);
}

#[tokio::test]
async fn test_report_other_status_maps_to_server_rejection() {
    let server = MockServer::start().await;
    mount_report(&server, ResponseTemplate::new(503).set_body_string("maintenance")).await;

    let err = backend(&server).submit_report("tok", &sample_report()).await.unwrap_err();
    assert_eq!(
        err,
        SubmitError::Rejected(ServerRejection { status: 503, body: "maintenance".to_string() })
    );
}

#[tokio::test]
async fn test_slow_backend_times_out() {
    let server = MockServer::start().await;
    mount_report(&server, ResponseTemplate::new(200).set_delay(Duration::from_millis(500))).await;

    let backend = HttpBackend::new(&server.uri(), Duration::from_millis(100)).unwrap();
    let err = backend.submit_report("tok", &sample_report()).await.unwrap_err();
    assert!(matches!(err, SubmitError::Transport(TransportError::Timeout(_))));
}

#[tokio::test]
async fn test_config_file_round_trips_through_the_loader() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("fleet.toml");
    tokio::fs::write(
        &file,
        r#"
        [backend]
        base_url = "http://warehouse:9000"
        request_timeout_secs = 3

        [fleet]
        agent_count = 2
        interval_secs = 1
        max_ticks = 4

        [logging]
        file = "fleet.log"
        "#,
    )
    .await
    .unwrap();

    let config = Config::from_file(&file).await.unwrap();
    assert_eq!(config.backend.base_url, "http://warehouse:9000");
    assert_eq!(config.request_timeout(), Duration::from_secs(3));
    assert_eq!(config.fleet.agent_count, 2);
    assert_eq!(config.agent_settings().max_ticks, Some(4));
    assert_eq!(config.logging.file.as_deref(), Some("fleet.log"));
}
