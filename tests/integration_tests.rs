//! Integration tests for http-audit

use http_audit::*;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::AsyncReadExt;

fn logger(level: AuditLevel, sink: MemorySink) -> AuditLogger {
    AuditLogger::builder().level(level).sink(sink).build()
}

async fn only_record(sink: &MemorySink) -> Value {
    let lines = sink.lines().await;
    assert_eq!(lines.len(), 1);
    serde_json::from_str(&lines[0]).unwrap()
}

#[tokio::test]
async fn test_password_field_is_redacted_in_request_body() {
    let sink = MemorySink::new();
    let audit = logger(AuditLevel::RequestResponse, sink.clone());

    let mut request = AuditRequest::new("POST", "/v3/users")
        .with_header("Content-Type", "application/json")
        .with_body(r#"{"password":"secret123","name":"alice"}"#);

    let session = audit.begin(&mut request).await.unwrap();
    session
        .finish(None, &AuditResponse::new(201))
        .await
        .unwrap();

    let record = only_record(&sink).await;
    assert_eq!(
        record["requestBody"],
        json!({"password": "[redacted]", "name": "alice"})
    );
}

#[tokio::test]
async fn test_request_deny_list_strips_credentials() {
    let sink = MemorySink::new();
    let audit = logger(AuditLevel::Metadata, sink.clone());

    let mut request = AuditRequest::new("GET", "/v3/clusters")
        .with_header("Authorization", "Bearer xyz")
        .with_header("Cookie", "R_SESS=abc")
        .with_header("X-Trace", "1");

    let session = audit.begin(&mut request).await.unwrap();
    session
        .finish(None, &AuditResponse::new(200))
        .await
        .unwrap();

    let record = only_record(&sink).await;
    assert_eq!(record["requestHeader"], json!({"X-Trace": ["1"]}));
}

#[tokio::test]
async fn test_response_deny_list_strips_set_cookie() {
    let sink = MemorySink::new();
    let audit = logger(AuditLevel::Metadata, sink.clone());

    let mut request = AuditRequest::new("POST", "/v3/tokens");
    let session = audit.begin(&mut request).await.unwrap();

    let response = AuditResponse::new(201)
        .with_header("Set-Cookie", "R_SESS=token")
        .with_header("Content-Type", "application/json");
    session.finish(None, &response).await.unwrap();

    let record = only_record(&sink).await;
    assert!(record["responseHeader"].get("Set-Cookie").is_none());
    assert_eq!(
        record["responseHeader"]["Content-Type"][0],
        "application/json"
    );
}

#[tokio::test]
async fn test_metadata_level_never_includes_bodies() {
    let sink = MemorySink::new();
    let audit = logger(AuditLevel::Metadata, sink.clone());

    let mut request = AuditRequest::new("POST", "/v3/users")
        .with_header("Content-Type", "application/json")
        .with_body(r#"{"password":"secret123"}"#);

    let session = audit.begin(&mut request).await.unwrap();
    let response = AuditResponse::new(200)
        .with_header("Content-Type", "application/json")
        .with_body(r#"{"ok":true}"#);
    session.finish(None, &response).await.unwrap();

    let record = only_record(&sink).await;
    assert!(record.get("requestBody").is_none());
    assert!(record.get("responseBody").is_none());
}

#[tokio::test]
async fn test_secret_resource_payload_redacted_wholesale() {
    let sink = MemorySink::new();
    let audit = logger(AuditLevel::Request, sink.clone());

    let mut request = AuditRequest::new("PUT", "/api/v1/namespaces/cattle-system/secrets/tls")
        .with_header("Content-Type", "application/json")
        .with_body(r#"{"kind":"Secret","data":{"tls.crt":"Y2VydA==","tls.key":"a2V5"}}"#);

    let session = audit.begin(&mut request).await.unwrap();
    session
        .finish(None, &AuditResponse::new(200))
        .await
        .unwrap();

    let record = only_record(&sink).await;
    assert_eq!(record["requestBody"]["data"]["tls.crt"], "[redacted]");
    assert_eq!(record["requestBody"]["data"]["tls.key"], "[redacted]");
    assert_eq!(record["requestBody"]["kind"], "Secret");
}

#[tokio::test]
async fn test_non_json_request_body_is_not_captured() {
    let sink = MemorySink::new();
    let audit = logger(AuditLevel::RequestResponse, sink.clone());

    let payload = "col1,col2\na,b\n";
    let mut request = AuditRequest::new("POST", "/v3/import")
        .with_header("Content-Type", "text/csv")
        .with_body(payload);

    let session = audit.begin(&mut request).await.unwrap();
    session
        .finish(None, &AuditResponse::new(202))
        .await
        .unwrap();

    let record = only_record(&sink).await;
    assert!(record.get("requestBody").is_none());

    // The untouched stream still serves the full payload downstream.
    let mut stream = request.body.take().unwrap();
    let mut seen = Vec::new();
    stream.read_to_end(&mut seen).await.unwrap();
    assert_eq!(seen, payload.as_bytes());
}

#[tokio::test]
async fn test_downstream_handler_reads_captured_body() {
    let sink = MemorySink::new();
    let audit = logger(AuditLevel::Request, sink.clone());

    let payload = r#"{"name":"demo","token":"abc"}"#;
    let mut request = AuditRequest::new("POST", "/v3/clusters")
        .with_header("Content-Type", "application/json")
        .with_body(payload);

    let session = audit.begin(&mut request).await.unwrap();

    let mut stream = request.body.take().unwrap();
    let mut seen = Vec::new();
    stream.read_to_end(&mut seen).await.unwrap();
    assert_eq!(seen, payload.as_bytes());

    session
        .finish(None, &AuditResponse::new(201))
        .await
        .unwrap();

    // The record holds the redacted form even though the handler got the
    // original bytes.
    let record = only_record(&sink).await;
    assert_eq!(record["requestBody"]["token"], "[redacted]");
    assert_eq!(record["requestBody"]["name"], "demo");
}

#[tokio::test]
async fn test_user_identity_and_impersonation() {
    let sink = MemorySink::new();
    let audit = logger(AuditLevel::Metadata, sink.clone());

    let mut request = AuditRequest::new("DELETE", "/v3/clusters/c-1");
    let session = audit.begin(&mut request).await.unwrap();

    let user = AuditUser::new("admin")
        .with_groups(["system:masters"])
        .with_request_user("bob")
        .with_request_groups(["dev", "qa"]);
    session
        .finish(Some(user), &AuditResponse::new(204))
        .await
        .unwrap();

    let record = only_record(&sink).await;
    assert_eq!(record["user"]["name"], "admin");
    assert_eq!(record["user"]["requestUser"], "bob");
    assert_eq!(record["user"]["requestGroups"], json!(["dev", "qa"]));
}

#[tokio::test]
async fn test_unparseable_body_fails_finish_and_sink_stays_clean() {
    let sink = MemorySink::new();
    let audit = logger(AuditLevel::Request, sink.clone());

    let mut request = AuditRequest::new("POST", "/v3/import")
        .with_header("Content-Type", "application/json")
        .with_body("{{ definitely not json");

    let session = audit.begin(&mut request).await.unwrap();
    let err = session
        .finish(None, &AuditResponse::new(400))
        .await
        .unwrap_err();

    assert!(matches!(err, AuditError::InvalidRecord(_)));
    assert!(sink.lines().await.is_empty());
}

#[tokio::test]
async fn test_concurrent_sessions_against_one_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.log");

    let audit = Arc::new(
        AuditLogger::builder()
            .level(AuditLevel::Request)
            .sink(FileSink::new(&path))
            .build(),
    );

    let mut tasks = Vec::new();
    for i in 0..24 {
        let audit = Arc::clone(&audit);
        tasks.push(tokio::spawn(async move {
            let mut request = AuditRequest::new("POST", format!("/v3/projects/{i}"))
                .with_header("Content-Type", "application/json")
                .with_body(format!(r#"{{"index":{i},"secretToken":"t-{i}"}}"#));
            let session = audit.begin(&mut request).await.unwrap();
            session
                .finish(None, &AuditResponse::new(201))
                .await
                .unwrap();
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    let contents = tokio::fs::read_to_string(&path).await.unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 24);
    for line in lines {
        let record: Value = serde_json::from_str(line).unwrap();
        assert_eq!(record["requestBody"]["secretToken"], "[redacted]");
        assert!(record["requestBody"]["index"].is_u64());
    }
}

#[tokio::test]
async fn test_audit_ids_are_unique() {
    let sink = MemorySink::new();
    let audit = logger(AuditLevel::Metadata, sink.clone());

    for _ in 0..3 {
        let mut request = AuditRequest::new("GET", "/v3/settings");
        let session = audit.begin(&mut request).await.unwrap();
        session
            .finish(None, &AuditResponse::new(200))
            .await
            .unwrap();
    }

    let lines = sink.lines().await;
    let ids: Vec<String> = lines
        .iter()
        .map(|line| {
            let record: Value = serde_json::from_str(line).unwrap();
            record["auditID"].as_str().unwrap().to_string()
        })
        .collect();
    assert_eq!(ids.len(), 3);
    assert_ne!(ids[0], ids[1]);
    assert_ne!(ids[1], ids[2]);
    assert_ne!(ids[0], ids[2]);
}

#[tokio::test]
async fn test_custom_policy_flows_through_logger() {
    let sink = MemorySink::new();
    let audit = AuditLogger::builder()
        .level(AuditLevel::Request)
        .policy(RedactionPolicy::from_pattern("(?i)ssn").unwrap())
        .sink(sink.clone())
        .build();

    let mut request = AuditRequest::new("POST", "/v3/users")
        .with_header("Content-Type", "application/json")
        .with_body(r#"{"ssn":"123-45-6789","password":"left-alone"}"#);

    let session = audit.begin(&mut request).await.unwrap();
    session
        .finish(None, &AuditResponse::new(201))
        .await
        .unwrap();

    let record = only_record(&sink).await;
    assert_eq!(record["requestBody"]["ssn"], "[redacted]");
    assert_eq!(record["requestBody"]["password"], "left-alone");
}

#[test]
fn test_level_parses_and_displays() {
    assert_eq!("request".parse::<AuditLevel>().unwrap(), AuditLevel::Request);
    assert_eq!(
        "request-response".parse::<AuditLevel>().unwrap(),
        AuditLevel::RequestResponse
    );
    assert_eq!(AuditLevel::RequestResponse.to_string(), "requestresponse");
    assert!("verbose".parse::<AuditLevel>().is_err());
}

#[test]
fn test_level_ordering() {
    assert!(AuditLevel::None < AuditLevel::Metadata);
    assert!(AuditLevel::Metadata < AuditLevel::Request);
    assert!(AuditLevel::Request < AuditLevel::RequestResponse);
}
