//! Parcel API integration tests
//!
//! Drives the full router (auth middleware included) via `tower::oneshot`
//! against a throwaway on-disk database.

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use parcel_server::{Config, ServerState, build_router};

struct TestApp {
    router: Router,
    token: String,
    // keeps the database directory alive for the duration of the test
    _dir: TempDir,
}

async fn spawn_app() -> TestApp {
    let dir = TempDir::new().expect("create temp dir");
    let db_path = dir.path().join("parcels.db");
    let config = Config::with_overrides(db_path.to_str().unwrap(), 0);

    let state = ServerState::initialize(&config)
        .await
        .expect("initialize state");
    let token = state
        .jwt_service
        .generate_token("U1", "admin")
        .expect("issue token");

    TestApp {
        router: build_router(state),
        token,
        _dir: dir,
    }
}

impl TestApp {
    async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
        authed: bool,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if authed {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", self.token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn create_parcel(&self) -> Value {
        let payload = json!({
            "senderId": "S1",
            "receiverId": "R1",
            "origin": "Lagos",
            "destination": "Abuja",
        });
        let (status, body) = self
            .request("POST", "/api/parcels", Some(payload), true)
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["data"].clone()
    }
}

#[tokio::test]
async fn create_returns_success_envelope_with_initial_log() {
    let app = spawn_app().await;
    let payload = json!({
        "senderId": "S1",
        "receiverId": "R1",
        "origin": "Lagos",
        "destination": "Abuja",
        "weight": 1.25,
        "note": "Birthday gift",
    });

    let (status, body) = app
        .request("POST", "/api/parcels", Some(payload), true)
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "success");
    let parcel = &body["data"];
    assert_eq!(parcel["status"], "Created");
    assert_eq!(parcel["weight"], 1.25);
    assert!(parcel["trackingId"].as_str().unwrap().starts_with("TRK-"));
    let logs = parcel["statusLogs"].as_array().unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0]["status"], "Created");
    assert_eq!(logs[0]["note"], "Birthday gift");
    assert_eq!(logs[0]["updatedBy"], "S1");
}

#[tokio::test]
async fn mutating_routes_require_a_token() {
    let app = spawn_app().await;
    let payload = json!({
        "senderId": "S1",
        "receiverId": "R1",
        "origin": "Lagos",
        "destination": "Abuja",
    });

    let (status, body) = app
        .request("POST", "/api/parcels", Some(payload), false)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], "fail");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn tracking_lookup_is_public() {
    let app = spawn_app().await;
    let parcel = app.create_parcel().await;
    let tracking_id = parcel["trackingId"].as_str().unwrap();

    let (status, body) = app
        .request("GET", &format!("/api/parcels/track/{tracking_id}"), None, false)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["origin"], "Lagos");
    assert_eq!(body["data"]["destination"], "Abuja");

    let (status, body) = app
        .request("GET", "/api/parcels/track/TRK-DOESNOTEXIST", None, false)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "fail");
}

#[tokio::test]
async fn unknown_or_malformed_ids_are_both_404() {
    let app = spawn_app().await;

    let (status, _) = app.request("GET", "/api/parcels/999999", None, true).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .request("GET", "/api/parcels/not-a-real-id", None, true)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn dispatch_then_cancel_scenario() {
    let app = spawn_app().await;
    let parcel = app.create_parcel().await;
    let id = parcel["id"].as_i64().unwrap();

    // Dispatch
    let (status, body) = app
        .request(
            "PATCH",
            &format!("/api/parcels/{id}/status"),
            Some(json!({"status": "Dispatched"})),
            true,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "Dispatched");
    assert_eq!(body["data"]["statusLogs"].as_array().unwrap().len(), 2);
    // actor comes from the token, not the payload
    assert_eq!(body["data"]["statusLogs"][1]["updatedBy"], "U1");

    // Cancel after dispatch is an illegal transition
    let (status, body) = app
        .request("PATCH", &format!("/api/parcels/{id}/cancel"), None, true)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "fail");
    assert!(body["message"].as_str().unwrap().contains("cancel"));

    // Status unchanged
    let (_, body) = app
        .request("GET", &format!("/api/parcels/{id}"), None, true)
        .await;
    assert_eq!(body["data"]["status"], "Dispatched");
    assert_eq!(body["data"]["statusLogs"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn immediate_cancel_scenario() {
    let app = spawn_app().await;
    let parcel = app.create_parcel().await;
    let id = parcel["id"].as_i64().unwrap();

    let (status, body) = app
        .request("PATCH", &format!("/api/parcels/{id}/cancel"), None, true)
        .await;

    assert_eq!(status, StatusCode::OK);
    let parcel = &body["data"];
    assert_eq!(parcel["status"], "Cancelled");
    let logs = parcel["statusLogs"].as_array().unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[1]["note"], "Cancelled by user");
}

#[tokio::test]
async fn list_filters_by_status_and_reports_page_count() {
    let app = spawn_app().await;

    // three parcels: Created, Dispatched, Delivered
    let first = app.create_parcel().await;
    let second = app.create_parcel().await;
    app.create_parcel().await;

    for (parcel, status) in [(&first, "Dispatched"), (&second, "Delivered")] {
        let id = parcel["id"].as_i64().unwrap();
        let (status_code, _) = app
            .request(
                "PATCH",
                &format!("/api/parcels/{id}/status"),
                Some(json!({"status": status})),
                true,
            )
            .await;
        assert_eq!(status_code, StatusCode::OK);
    }

    let (status, body) = app
        .request("GET", "/api/parcels?status=Dispatched", None, true)
        .await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["total"], 1);
    assert_eq!(data["items"].as_array().unwrap().len(), 1);
    assert_eq!(data["items"][0]["status"], "Dispatched");

    let (_, body) = app
        .request("GET", "/api/parcels?page=1&limit=2", None, true)
        .await;
    let data = &body["data"];
    assert_eq!(data["total"], 3);
    assert_eq!(data["page"], 1);
    assert_eq!(data["limit"], 2);
    assert_eq!(data["pageCount"], 2);
    assert_eq!(data["items"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn create_validates_required_fields() {
    let app = spawn_app().await;
    let payload = json!({
        "senderId": "S1",
        "receiverId": "R1",
        "origin": "",
        "destination": "Abuja",
    });

    let (status, body) = app
        .request("POST", "/api/parcels", Some(payload), true)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "fail");
    assert!(body["message"].as_str().unwrap().contains("origin"));
}

#[tokio::test]
async fn malformed_bodies_use_the_fail_envelope() {
    let app = spawn_app().await;

    // syntactically broken JSON
    let request = Request::builder()
        .method("POST")
        .uri("/api/parcels")
        .header(header::AUTHORIZATION, format!("Bearer {}", app.token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "fail");
    assert!(body["message"].is_string());

    // well-formed JSON with a status outside the lifecycle enum
    let parcel = app.create_parcel().await;
    let id = parcel["id"].as_i64().unwrap();
    let (status, body) = app
        .request(
            "PATCH",
            &format!("/api/parcels/{id}/status"),
            Some(json!({"status": "Shipped"})),
            true,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "fail");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn absurd_page_numbers_return_an_empty_page() {
    let app = spawn_app().await;
    app.create_parcel().await;

    let (status, body) = app
        .request("GET", "/api/parcels?page=4294967295&limit=100", None, true)
        .await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["total"], 1);
    assert_eq!(data["items"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn health_check_is_public() {
    let app = spawn_app().await;
    let (status, body) = app.request("GET", "/api/health", None, false).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["healthy"], true);
}
