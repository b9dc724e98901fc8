//! Router-level tests for the registration endpoints

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use calamine::{open_workbook, Reader, Xlsx};
use event_registration::{
    build_app, storage::log::read_snapshot, AppConfig, AppState, FormVariant,
};
use regex::Regex;
use serde_json::Value;
use tower::ServiceExt; // for `oneshot`

const BOUNDARY: &str = "----registration-test-boundary";

struct TestApp {
    app: Router,
    config: AppConfig,
    _dir: tempfile::TempDir,
}

fn create_test_app(variant: FormVariant) -> TestApp {
    create_test_app_with(variant, |_| {})
}

fn create_test_app_with(variant: FormVariant, tweak: impl FnOnce(&mut AppConfig)) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let mut config = AppConfig::for_content_root(dir.path().join("data"), variant);
    tweak(&mut config);
    let state = AppState::init(config.clone()).unwrap();
    TestApp {
        app: build_app(state),
        config,
        _dir: dir,
    }
}

impl TestApp {
    fn row_count(&self) -> usize {
        read_snapshot(&self.config.storage.log_path())
            .unwrap()
            .map(|s| s.rows.len())
            .unwrap_or(0)
    }

    fn spreadsheet(&self) -> Vec<Vec<String>> {
        let mut workbook: Xlsx<_> = open_workbook(self.config.storage.export_path()).unwrap();
        workbook
            .worksheet_range("Sheet1")
            .unwrap()
            .rows()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect()
    }
}

fn multipart_body(texts: &[(&str, &str)], files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in texts {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    for (name, bytes) in files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{name}.jpg\"\r\nContent-Type: image/jpeg\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn register_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .uri("/register")
        .method("POST")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn dual_texts(name: &'static str) -> Vec<(&'static str, &'static str)> {
    vec![
        ("Name", name),
        ("University", "PIEAS"),
        ("Email", "ada@x.com"),
        ("CNIC", "12345-6789012-3"),
        ("ContactNumber", "0300-0000000"),
    ]
}

const DUAL_FILES: &[(&str, &[u8])] = &[
    ("CNIC_Front_Image", b"front-bytes"),
    ("CNIC_Back_Image", b"back-bytes"),
];

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

async fn list(app: &Router) -> (StatusCode, Value) {
    send(
        app,
        Request::builder()
            .uri("/view-registrations")
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

#[tokio::test]
async fn test_home_banner() {
    let t = create_test_app(FormVariant::Dual);

    let response = t
        .app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"TEDx PIEAS Registration Backend is Running!");
}

#[tokio::test]
async fn test_register_single_image_scenario() {
    let t = create_test_app(FormVariant::Single);
    let export_before = std::fs::read(t.config.storage.export_path()).unwrap();

    let body = multipart_body(
        &[
            ("name", "Ada Lovelace"),
            ("university", "PIEAS"),
            ("email", "ada@x.com"),
            ("cnic", "12345-6789012-3"),
            ("contact", "0300-0000000"),
        ],
        &[("cnic_image", b"\xff\xd8\xff\xe0 jpeg-ish")],
    );
    let (status, json) = send(&t.app, register_request(body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Registration successful!");

    let snapshot = read_snapshot(&t.config.storage.log_path()).unwrap().unwrap();
    assert_eq!(snapshot.rows.len(), 1);
    let row = &snapshot.rows[0];
    assert_eq!(
        &row[..5],
        ["Ada Lovelace", "PIEAS", "ada@x.com", "12345-6789012-3", "0300-0000000"]
    );
    let saved = std::path::Path::new(&row[5]);
    assert!(saved.is_file());
    assert!(saved
        .file_name()
        .unwrap()
        .to_string_lossy()
        .starts_with("Ada_Lovelace_"));
    assert_eq!(std::fs::read(saved).unwrap(), b"\xff\xd8\xff\xe0 jpeg-ish");

    let ts = Regex::new(r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}$").unwrap();
    assert!(ts.is_match(&row[6]), "unexpected timestamp {}", row[6]);

    let export_after = std::fs::read(t.config.storage.export_path()).unwrap();
    assert_ne!(export_before, export_after);

    let sheet = t.spreadsheet();
    assert_eq!(sheet.len(), 2);
    assert_eq!(sheet[0], snapshot.header);
    assert_eq!(sheet[1], snapshot.rows[0]);
}

#[tokio::test]
async fn test_register_dual_saves_front_and_back() {
    let t = create_test_app(FormVariant::Dual);

    let (status, _) = send(
        &t.app,
        register_request(multipart_body(&dual_texts("Ada Lovelace"), DUAL_FILES)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, json) = list(&t.app).await;
    let record = &json[0];
    let front = record["CNIC_Front_Image"].as_str().unwrap();
    let back = record["CNIC_Back_Image"].as_str().unwrap();
    assert!(front.contains("Ada_Lovelace_front_"));
    assert!(back.contains("Ada_Lovelace_back_"));
    assert_eq!(std::fs::read(front).unwrap(), b"front-bytes");
    assert_eq!(std::fs::read(back).unwrap(), b"back-bytes");
}

#[tokio::test]
async fn test_register_without_image_is_rejected() {
    let t = create_test_app(FormVariant::Dual);

    let body = multipart_body(&dual_texts("Ada"), &DUAL_FILES[..1]);
    let (status, json) = send(&t.app, register_request(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json,
        serde_json::json!({ "error": "All fields and both images are required" })
    );
    assert_eq!(t.row_count(), 0);
}

#[tokio::test]
async fn test_register_missing_any_field_is_rejected() {
    let t = create_test_app(FormVariant::Dual);

    for skip in 0..5 {
        let texts: Vec<_> = dual_texts("Ada")
            .into_iter()
            .enumerate()
            .filter(|(i, _)| *i != skip)
            .map(|(_, kv)| kv)
            .collect();
        let (status, json) = send(&t.app, register_request(multipart_body(&texts, DUAL_FILES))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            json,
            serde_json::json!({ "error": "All fields and both images are required" })
        );
    }
    assert_eq!(t.row_count(), 0);
}

#[tokio::test]
async fn test_register_over_body_limit_is_payload_too_large() {
    let t = create_test_app_with(FormVariant::Dual, |c| c.max_upload_bytes = 64);

    let long_name = "A".repeat(1000);
    let body = multipart_body(&[("Name", long_name.as_str())], &[]);
    let (status, json) = send(&t.app, register_request(body)).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    let error = json["error"].as_str().unwrap();
    assert!(error.contains("multipart/form-data"), "unexpected error {error}");
    assert!(error.contains("failed to read stream"), "unexpected error {error}");
    assert!(error.contains("length limit exceeded"), "unexpected error {error}");
    assert_eq!(t.row_count(), 0);
}

#[tokio::test]
async fn test_register_non_multipart_is_rejected() {
    let t = create_test_app(FormVariant::Dual);

    let (status, json) = send(
        &t.app,
        Request::builder()
            .uri("/register")
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from("{}"))
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "All fields and both images are required");
    assert_eq!(t.row_count(), 0);
}

#[tokio::test]
async fn test_register_reports_storage_failure() {
    let t = create_test_app(FormVariant::Dual);
    std::fs::remove_dir_all(t.config.storage.uploads_dir()).unwrap();

    let (status, json) = send(
        &t.app,
        register_request(multipart_body(&dual_texts("Ada"), DUAL_FILES)),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json["error"].as_str().unwrap().contains("write attachment"));
    assert_eq!(t.row_count(), 0);
}

#[tokio::test]
async fn test_view_lists_in_submission_order_and_is_idempotent() {
    let t = create_test_app(FormVariant::Dual);

    let (status, json) = list(&t.app).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, serde_json::json!([]));

    let names = ["Ada Lovelace", "Grace Hopper", "Katherine Johnson"];
    for name in names {
        let (status, _) = send(
            &t.app,
            register_request(multipart_body(&dual_texts(name), DUAL_FILES)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, first) = list(&t.app).await;
    assert_eq!(status, StatusCode::OK);
    let records = first.as_array().unwrap();
    assert_eq!(records.len(), names.len());
    for (record, name) in records.iter().zip(names) {
        assert_eq!(record["Name"], name);
        let keys: Vec<&String> = record.as_object().unwrap().keys().collect();
        assert_eq!(
            keys,
            [
                "Name",
                "University",
                "Email",
                "CNIC",
                "ContactNumber",
                "CNIC_Front_Image",
                "CNIC_Back_Image",
                "Timestamp"
            ]
        );
    }
    let stamps: Vec<&str> = records
        .iter()
        .map(|r| r["Timestamp"].as_str().unwrap())
        .collect();
    assert!(stamps.windows(2).all(|w| w[0] <= w[1]));

    let (_, second) = list(&t.app).await;
    assert_eq!(first, second);

    let snapshot = read_snapshot(&t.config.storage.log_path()).unwrap().unwrap();
    let sheet = t.spreadsheet();
    assert_eq!(sheet.len(), 1 + names.len());
    assert_eq!(sheet[0], snapshot.header);
    assert_eq!(&sheet[1..], &snapshot.rows[..]);
}

#[tokio::test]
async fn test_view_without_log_is_not_found() {
    let t = create_test_app(FormVariant::Dual);
    std::fs::remove_file(t.config.storage.log_path()).unwrap();

    let (status, json) = list(&t.app).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json, serde_json::json!({ "error": "No registrations found yet." }));
}
