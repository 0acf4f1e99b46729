// ABOUTME: End-to-end tests for the admission workflow over the HTTP surface
// ABOUTME: Exercises submission, approval, rejection, and the access gate

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;

use schoolgate_api::{create_router, AppState};
use schoolgate_auth::{sign, Claims, Role};
use schoolgate_core::EnrollmentDefaults;

const SECRET: &str = "test-secret";

async fn test_app() -> Router {
    let pool = schoolgate_storage::db::connect_in_memory()
        .await
        .expect("in-memory database");
    let state = AppState::new(pool, EnrollmentDefaults::default(), SECRET);
    create_router(state)
}

fn token(role: Role) -> String {
    let claims = Claims::new("user-1", "testuser", "test@school.example", role, 3600);
    sign(&claims, SECRET).expect("sign token")
}

fn post_json(path: &str, body: Value, bearer: Option<&str>) -> Request<Body> {
    json_request(Method::POST, path, body, bearer)
}

fn put_json(path: &str, body: Value, bearer: Option<&str>) -> Request<Body> {
    json_request(Method::PUT, path, body, bearer)
}

fn json_request(method: Method, path: &str, body: Value, bearer: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(path: &str, bearer: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(path);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn sample_application() -> Value {
    json!({
        "studentName": "Meera Pillai",
        "dateOfBirth": "2019-04-12",
        "class": "3",
        "parentName": "Ravi Pillai",
        "phone": "9876543210",
        "email": "ravi@example.com"
    })
}

async fn submit_application(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(post_json("/api/admissions", sample_application(), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    body["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_is_public() {
    let app = test_app().await;
    let response = app.oneshot(get("/api/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn submission_is_public_and_returns_pending_application() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(post_json("/api/admissions", sample_application(), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["success"], json!(true));
    let data = &body["data"];
    assert_eq!(data["status"], json!("pending"));
    assert_eq!(data["studentName"], json!("Meera Pillai"));
    assert!(data["applicationNumber"]
        .as_str()
        .unwrap()
        .starts_with("ADM-"));
    // Placeholder documents are seeded when none are supplied.
    assert_eq!(data["documents"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn submission_with_missing_fields_returns_field_errors() {
    let app = test_app().await;

    let response = app
        .oneshot(post_json(
            "/api/admissions",
            json!({ "studentName": "Meera Pillai" }),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"]["code"], json!("VALIDATION_ERROR"));
    let fields: Vec<&str> = body["error"]["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"dateOfBirth"));
    assert!(fields.contains(&"class"));
    assert!(fields.contains(&"parentName"));
    assert!(fields.contains(&"phone"));
}

#[tokio::test]
async fn listing_requires_a_token() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(get("/api/admissions", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(get("/api/admissions", Some(&token(Role::Admin))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn approval_enrolls_a_student() {
    let app = test_app().await;
    let id = submit_application(&app).await;
    let admin = token(Role::Admin);

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/admissions/{id}/approve"),
            json!({}),
            Some(&admin),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let data = &body["data"];
    assert!(data["rollNumber"].as_str().unwrap().ends_with("001"));
    assert_eq!(data["student"]["division"], json!("3-A"));
    assert_eq!(data["admission"]["status"], json!("approved"));
    assert_eq!(
        data["admission"]["studentId"].as_str().unwrap(),
        data["student"]["id"].as_str().unwrap()
    );

    // The student is visible on the read-only students surface.
    let response = app
        .oneshot(get("/api/students", Some(&admin)))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn approving_twice_conflicts() {
    let app = test_app().await;
    let id = submit_application(&app).await;
    let admin = token(Role::Admin);
    let path = format!("/api/admissions/{id}/approve");

    let first = app
        .clone()
        .oneshot(post_json(&path, json!({}), Some(&admin)))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = app
        .clone()
        .oneshot(post_json(&path, json!({}), Some(&admin)))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);

    // Still exactly one enrolled student.
    let response = app
        .oneshot(get("/api/students", Some(&admin)))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn approving_unknown_application_is_not_found() {
    let app = test_app().await;
    let admin = token(Role::Admin);

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/admissions/app-missing/approve",
            json!({}),
            Some(&admin),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(get("/api/students", Some(&admin)))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn teacher_role_cannot_touch_admissions() {
    let app = test_app().await;
    let id = submit_application(&app).await;
    let teacher = token(Role::Teacher);

    let response = app
        .clone()
        .oneshot(get("/api/admissions", Some(&teacher)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .oneshot(post_json(
            &format!("/api/admissions/{id}/approve"),
            json!({}),
            Some(&teacher),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn staff_can_read_admissions_and_students() {
    let app = test_app().await;
    submit_application(&app).await;
    let staff = token(Role::Staff);

    let response = app
        .clone()
        .oneshot(get("/api/admissions", Some(&staff)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get("/api/students", Some(&staff)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn tampered_token_is_rejected() {
    let app = test_app().await;
    let mut forged = token(Role::Admin);
    forged.push('x');

    let response = app
        .oneshot(get("/api/admissions", Some(&forged)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn rejection_stores_remarks_and_blocks_later_approval() {
    let app = test_app().await;
    let id = submit_application(&app).await;
    let admin = token(Role::Admin);

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/admissions/{id}/reject"),
            json!({ "remarks": "Incomplete documents" }),
            Some(&admin),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["data"]["status"], json!("rejected"));
    assert_eq!(body["data"]["remarks"], json!("Incomplete documents"));

    let response = app
        .oneshot(post_json(
            &format!("/api/admissions/{id}/approve"),
            json!({}),
            Some(&admin),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn status_route_schedules_interviews_but_never_decides() {
    let app = test_app().await;
    let id = submit_application(&app).await;
    let admin = token(Role::Admin);
    let path = format!("/api/admissions/{id}/status");

    let response = app
        .clone()
        .oneshot(put_json(
            &path,
            json!({
                "status": "interview_scheduled",
                "interviewDate": "2026-09-15T09:00:00Z"
            }),
            Some(&admin),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["data"]["status"], json!("interview_scheduled"));
    assert!(body["data"]["interviewDate"].is_string());

    // Final states go through approve/reject, not this route.
    let response = app
        .clone()
        .oneshot(put_json(&path, json!({ "status": "approved" }), Some(&admin)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // And the route is write-gated like the other decisions.
    let response = app
        .oneshot(put_json(
            &path,
            json!({ "status": "document_review" }),
            Some(&token(Role::Teacher)),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn list_filters_by_status_and_search() {
    let app = test_app().await;
    let id = submit_application(&app).await;
    let admin = token(Role::Admin);

    // Second application with a different name.
    let mut other = sample_application();
    other["studentName"] = json!("Arjun Nair");
    let response = app
        .clone()
        .oneshot(post_json("/api/admissions", other, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    app.clone()
        .oneshot(post_json(
            &format!("/api/admissions/{id}/approve"),
            json!({}),
            Some(&admin),
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(get("/api/admissions?status=approved", Some(&admin)))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let response = app
        .oneshot(get("/api/admissions?search=arjun", Some(&admin)))
        .await
        .unwrap();
    let body = body_json(response).await;
    let results = body["data"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["studentName"], json!("Arjun Nair"));
}
