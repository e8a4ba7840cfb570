use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use regform::{
    repositories::SqliteRegistrationRepository, routes, test_utils::test_helpers, AppState,
};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower::ServiceExt;

async fn setup_app() -> (Router, SqlitePool) {
    let pool = test_helpers::create_test_db().await.unwrap();
    let repository = Arc::new(SqliteRegistrationRepository::new(pool.clone()));
    let app = routes::router(AppState::new(repository), "static");
    (app, pool)
}

fn valid_payload() -> Value {
    json!({
        "firstName": "Ann",
        "lastName": "Lee",
        "gender": "F",
        "email": "a@b.com",
        "contactNumber": "555-1234",
        "consent": true
    })
}

fn with(mut payload: Value, key: &str, value: Value) -> Value {
    payload[key] = value;
    payload
}

async fn post_json(app: &Router, body: String) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/submit")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to execute request");

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    let json: Value = serde_json::from_slice(&body_bytes).expect("Failed to parse JSON");
    (status, json)
}

async fn post_form(app: &Router, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/submit")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body_bytes).unwrap())
}

async fn submit(app: &Router, payload: &Value) -> (StatusCode, Value) {
    post_json(app, payload.to_string()).await
}

#[tokio::test]
async fn test_valid_submission_is_stored() {
    let (app, pool) = setup_app().await;

    let payload = json!({
        "firstName": "  Ann ",
        "lastName": "Lee ",
        "username": " annlee",
        "gender": "F",
        "email": " a@b.com",
        "contactNumber": "555-1234 ",
        "consent": true,
        "termsAgree": true
    });
    let (status, body) = submit(&app, &payload).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Form submitted successfully!");
    let id = body["id"].as_i64().expect("id should be an integer");
    assert!(id > 0);

    assert_eq!(test_helpers::count_rows(&pool).await.unwrap(), 1);

    let row: (String, String, Option<String>, String, String, Option<String>, bool) =
        sqlx::query_as(
            "SELECT firstname, lastname, username, email, contactnumber, description, consent \
             FROM registrations WHERE id = ?",
        )
        .bind(id)
        .fetch_one(&pool)
        .await
        .unwrap();

    assert_eq!(row.0, "Ann");
    assert_eq!(row.1, "Lee");
    assert_eq!(row.2.as_deref(), Some("annlee"));
    assert_eq!(row.3, "a@b.com");
    assert_eq!(row.4, "555-1234");
    assert_eq!(row.5.as_deref(), Some(""));
    assert!(row.6);
}

#[tokio::test]
async fn test_consent_false_is_rejected() {
    let (app, pool) = setup_app().await;

    let payload = with(valid_payload(), "consent", json!(false));
    let (status, body) = submit(&app, &payload).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Consent not given.");
    assert!(body.get("id").is_none());
    assert_eq!(test_helpers::count_rows(&pool).await.unwrap(), 0);
}

#[tokio::test]
async fn test_every_consent_form_outside_true_is_rejected() {
    let (app, pool) = setup_app().await;

    for consent in [
        json!(false),
        json!("false"),
        json!(0),
        json!("0"),
        json!(null),
        json!("yes"),
        json!("on"),
        json!(2),
        json!([]),
    ] {
        let payload = with(valid_payload(), "consent", consent.clone());
        let (status, body) = submit(&app, &payload).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "consent {}", consent);
        assert_eq!(body["success"], false);
    }

    let mut payload = valid_payload();
    payload.as_object_mut().unwrap().remove("consent");
    let (status, _) = submit(&app, &payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(test_helpers::count_rows(&pool).await.unwrap(), 0);
}

#[tokio::test]
async fn test_every_accepted_consent_form_is_stored() {
    let (app, pool) = setup_app().await;

    for consent in [json!(true), json!("true"), json!(1), json!("1")] {
        let payload = with(valid_payload(), "consent", consent.clone());
        let (status, body) = submit(&app, &payload).await;

        assert_eq!(status, StatusCode::OK, "consent {}", consent);
        assert_eq!(body["success"], true);
    }

    assert_eq!(test_helpers::count_rows(&pool).await.unwrap(), 4);
}

#[tokio::test]
async fn test_blank_first_name_is_rejected() {
    let (app, pool) = setup_app().await;

    let payload = with(valid_payload(), "firstName", json!(""));
    let (status, body) = submit(&app, &payload).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("Missing required fields"));
    assert!(message.contains("firstName"));
    assert_eq!(test_helpers::count_rows(&pool).await.unwrap(), 0);
}

#[tokio::test]
async fn test_each_required_field_blank_after_trim_is_rejected() {
    let (app, pool) = setup_app().await;

    for field in ["firstName", "lastName", "gender", "email", "contactNumber"] {
        let blank = with(valid_payload(), field, json!("   "));
        let (status, body) = submit(&app, &blank).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "blank {}", field);
        assert!(body["message"].as_str().unwrap().contains(field));

        let mut absent = valid_payload();
        absent.as_object_mut().unwrap().remove(field);
        let (status, _) = submit(&app, &absent).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "absent {}", field);
    }

    assert_eq!(test_helpers::count_rows(&pool).await.unwrap(), 0);
}

#[tokio::test]
async fn test_malformed_email_passes_server_validation() {
    let (app, pool) = setup_app().await;

    let payload = with(valid_payload(), "email", json!("not-an-email"));
    let (status, body) = submit(&app, &payload).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(test_helpers::count_rows(&pool).await.unwrap(), 1);
}

#[tokio::test]
async fn test_sequential_submissions_get_increasing_ids() {
    let (app, _pool) = setup_app().await;

    let (first_status, first) = submit(&app, &valid_payload()).await;
    let second_payload = with(valid_payload(), "firstName", json!("Bob"));
    let (second_status, second) = submit(&app, &second_payload).await;

    assert_eq!(first_status, StatusCode::OK);
    assert_eq!(second_status, StatusCode::OK);
    assert!(second["id"].as_i64().unwrap() > first["id"].as_i64().unwrap());
}

#[tokio::test]
async fn test_concurrent_submissions_get_distinct_ids() {
    let (pool, _temp_file) = test_helpers::create_test_db_file().await.unwrap();
    let repository = Arc::new(SqliteRegistrationRepository::new(pool.clone()));
    let app = routes::router(AppState::new(repository), "static");

    let ann = valid_payload();
    let bob = with(valid_payload(), "firstName", json!("Bob"));
    let ((status_a, a), (status_b, b)) = tokio::join!(submit(&app, &ann), submit(&app, &bob));

    assert_eq!(status_a, StatusCode::OK);
    assert_eq!(status_b, StatusCode::OK);
    assert_ne!(a["id"], b["id"]);
    assert_eq!(test_helpers::count_rows(&pool).await.unwrap(), 2);
}

#[tokio::test]
async fn test_invalid_json_is_a_bad_request() {
    let (app, pool) = setup_app().await;

    let (status, body) = post_json(&app, "{not json".to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid request body.");
    assert_eq!(test_helpers::count_rows(&pool).await.unwrap(), 0);
}

#[tokio::test]
async fn test_array_body_is_a_bad_request() {
    let (app, pool) = setup_app().await;

    let body = json!(["Ann", "Lee", "u", "F", "a@b.com", "555", "d", true]);
    let (status, body) = submit(&app, &body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid request body.");
    assert_eq!(test_helpers::count_rows(&pool).await.unwrap(), 0);
}

#[tokio::test]
async fn test_form_encoded_submission_is_stored() {
    let (app, pool) = setup_app().await;

    let (status, body) = post_form(
        &app,
        "firstName=Ann&lastName=Lee&gender=F&email=a%40b.com&contactNumber=555+1234&consent=true",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["id"].as_i64().is_some());

    let (email, contact): (String, String) =
        sqlx::query_as("SELECT email, contactnumber FROM registrations")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(email, "a@b.com");
    assert_eq!(contact, "555 1234");
}

#[tokio::test]
async fn test_form_encoded_without_consent_is_rejected() {
    let (app, pool) = setup_app().await;

    for form in [
        "firstName=Ann&lastName=Lee&gender=F&email=a%40b.com&contactNumber=555&consent=false",
        "firstName=Ann&lastName=Lee&gender=F&email=a%40b.com&contactNumber=555",
    ] {
        let (status, body) = post_form(&app, form).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "form {}", form);
        assert_eq!(body["message"], "Consent not given.");
    }
    assert_eq!(test_helpers::count_rows(&pool).await.unwrap(), 0);
}

#[tokio::test]
async fn test_wrong_content_type_is_a_bad_request() {
    let (app, _pool) = setup_app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/submit")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from(valid_payload().to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_storage_failure_returns_generic_error() {
    let (app, pool) = setup_app().await;

    sqlx::query("DROP TABLE registrations")
        .execute(&pool)
        .await
        .unwrap();

    let (status, body) = submit(&app, &valid_payload()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Internal server error");
    assert!(!body.to_string().contains("registrations"));
}

#[tokio::test]
async fn test_db_diagnostics_reports_backend() {
    let (app, _pool) = setup_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/test-db")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&body_bytes).unwrap();
    assert_eq!(body["db"], "sqlite");
    assert!(body["time"].as_str().is_some_and(|t| !t.is_empty()));
}

#[tokio::test]
async fn test_landing_page_is_served() {
    let (app, _pool) = setup_app().await;

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("X-Frame-Options").unwrap(),
        "DENY",
        "security headers should be applied to static files"
    );

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8(body_bytes.to_vec()).unwrap();
    assert!(html.contains("id=\"registrationForm\""));
}
