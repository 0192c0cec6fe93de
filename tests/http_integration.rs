//! Integration tests for the club-facing pages.
//!
//! Each test runs the router over JSON documents in a fresh temporary directory.

use std::{path::PathBuf, sync::Arc};

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, Local};
use competition_booking_service::{
    adapters::{http::create_app, storage::json_file::JsonFileStorage},
    commands::DomainLogic,
    domain::{BookingPolicy, DATE_FORMAT},
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

struct TestApp {
    dir: TempDir,
    app: Router,
}

impl TestApp {
    async fn new() -> Self {
        let future = (Local::now() + Duration::days(30))
            .format(DATE_FORMAT)
            .to_string();
        let past = (Local::now() - Duration::days(30))
            .format(DATE_FORMAT)
            .to_string();

        Self::with_documents(
            Some(json!({
                "clubs": [
                    {"name": "Simply Lift", "email": "john@simplylift.co", "points": "13"},
                    {"name": "Iron Temple", "email": "admin@irontemple.com", "points": "4"},
                    {"name": "She Lifts", "email": "kate@shelifts.co.uk", "points": "12"}
                ]
            })),
            Some(json!({
                "competitions": [
                    {"name": "Spring Festival", "date": &future, "numberOfPlaces": "25"},
                    {"name": "Fall Classic", "date": &past, "numberOfPlaces": "13"},
                    {"name": "Small Meet", "date": &future, "numberOfPlaces": "3"}
                ]
            })),
        )
        .await
    }

    async fn with_documents(clubs: Option<Value>, competitions: Option<Value>) -> Self {
        let dir = tempfile::tempdir().unwrap();
        if let Some(clubs) = clubs {
            std::fs::write(dir.path().join("clubs.json"), clubs.to_string()).unwrap();
        }
        if let Some(competitions) = competitions {
            std::fs::write(
                dir.path().join("competitions.json"),
                competitions.to_string(),
            )
            .unwrap();
        }

        let storage = JsonFileStorage::new(
            dir.path().join("clubs.json"),
            dir.path().join("competitions.json"),
        );
        let logic = DomainLogic::load(Arc::new(storage), BookingPolicy::default()).await;

        Self {
            dir,
            app: create_app(logic),
        }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn document(&self, name: &str) -> Value {
        let text = std::fs::read_to_string(self.path(name)).unwrap();
        serde_json::from_str(&text).unwrap()
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    async fn post_form(&self, uri: &str, form: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        if status == StatusCode::SEE_OTHER {
            assert_eq!(response.headers()[header::LOCATION], "/");
        }
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
    }
}

fn messages(body: &Value) -> Vec<String> {
    body["messages"]
        .as_array()
        .map(|messages| {
            messages
                .iter()
                .filter_map(|m| m.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

// ============================================================================
// Home, login and logout
// ============================================================================

#[tokio::test]
async fn test_home() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["view"], "home");
    assert!(body["title"].as_str().unwrap().starts_with("Welcome to the"));
}

#[tokio::test]
async fn test_login_valid_email() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post_form("/showSummary", "email=john%40simplylift.co")
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["view"], "welcome");
    assert_eq!(body["club"]["email"], "john@simplylift.co");
    assert_eq!(body["club"]["points"], 13);
    assert_eq!(body["competitions"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_login_missing_email() {
    let app = TestApp::new().await;

    let (status, body) = app.post_form("/showSummary", "").await;

    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(messages(&body), vec!["Email is required."]);
}

#[tokio::test]
async fn test_login_unknown_email() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post_form("/showSummary", "email=invalid%40example.com")
        .await;

    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(messages(&body), vec!["Club not found."]);
}

#[tokio::test]
async fn test_summary_by_club() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/showSummary?club=She%20Lifts").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["club"]["name"], "She Lifts");

    let (status, body) = app.get("/showSummary").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(messages(&body), vec!["Club information is missing."]);

    let (status, body) = app.get("/showSummary?club=Invalid%20Club").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(messages(&body), vec!["Club not found."]);
}

#[tokio::test]
async fn test_logout() {
    let app = TestApp::new().await;

    let (status, _) = app.get("/logout").await;

    assert_eq!(status, StatusCode::SEE_OTHER);
}

// ============================================================================
// Booking page
// ============================================================================

#[tokio::test]
async fn test_booking_page() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/book/Spring%20Festival/Simply%20Lift").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["view"], "booking");
    assert_eq!(body["competition"]["name"], "Spring Festival");
    assert_eq!(body["club"]["name"], "Simply Lift");
    assert_eq!(body["clubs"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_booking_page_past_competition() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/book/Fall%20Classic/Simply%20Lift").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["view"], "welcome");
    assert_eq!(
        messages(&body),
        vec!["trying to book places for a past competition is not allowed"]
    );
}

#[tokio::test]
async fn test_booking_page_unknown_references() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/book/Nope/Simply%20Lift").await;

    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(messages(&body), vec!["Invalid club or competition."]);
}

// ============================================================================
// Purchase
// ============================================================================

#[tokio::test]
async fn test_purchase_places_valid() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post_form(
            "/purchasePlaces",
            "competition=Spring+Festival&club=Simply+Lift&places=2",
        )
        .await;

    // The summary shows the new totals
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["view"], "welcome");
    assert_eq!(messages(&body), vec!["Great, booking complete!"]);
    assert_eq!(body["club"]["points"], 11);
    assert_eq!(body["competitions"][0]["numberOfPlaces"], 23);

    // Both documents were rewritten
    let clubs = app.document("clubs.json");
    let competitions = app.document("competitions.json");
    assert_eq!(clubs["clubs"][0]["points"], 11);
    assert_eq!(clubs["clubs"][1]["points"], 4);
    assert_eq!(competitions["competitions"][0]["numberOfPlaces"], 23);
    assert_eq!(competitions["competitions"][1]["numberOfPlaces"], 13);
}

#[tokio::test]
async fn test_purchase_places_redirecting_errors() {
    let app = TestApp::new().await;

    let cases = [
        ("", "Missing data for booking."),
        (
            "competition=Spring+Festival&club=Simply+Lift&places=blabla",
            "Invalid number of places.",
        ),
        (
            "competition=Competition+Strength&club=Club+XForce&places=6",
            "Invalid club or competition.",
        ),
    ];

    for (form, expected) in cases {
        let (status, body) = app.post_form("/purchasePlaces", form).await;

        assert_eq!(status, StatusCode::SEE_OTHER, "form: {form}");
        assert_eq!(messages(&body), vec![expected], "form: {form}");
    }
}

#[tokio::test]
async fn test_purchase_places_rejections_keep_state() {
    let app = TestApp::new().await;
    let clubs_before = app.document("clubs.json");
    let competitions_before = app.document("competitions.json");

    let cases = [
        (
            "competition=Spring+Festival&club=Simply+Lift&places=-6",
            "booking 0 or less places is quite surprising, please book a significant number of places",
        ),
        (
            "competition=Spring+Festival&club=Simply+Lift&places=15",
            "booking more than 12 places is not allowed",
        ),
        (
            "competition=Small+Meet&club=Simply+Lift&places=6",
            "Not enough places available. Try to respect the number of places available.",
        ),
        (
            "competition=Spring+Festival&club=Iron+Temple&places=6",
            "Not enough club points available. Try to respect the limits of your available points for booking.",
        ),
        (
            "competition=Fall+Classic&club=Simply+Lift&places=1",
            "trying to book places for a past competition is not allowed",
        ),
    ];

    for (form, expected) in cases {
        let (status, body) = app.post_form("/purchasePlaces", form).await;

        assert_eq!(status, StatusCode::OK, "form: {form}");
        assert_eq!(body["view"], "welcome", "form: {form}");
        assert_eq!(messages(&body), vec![expected], "form: {form}");
    }

    assert_eq!(app.document("clubs.json"), clubs_before);
    assert_eq!(app.document("competitions.json"), competitions_before);
}

#[tokio::test]
async fn test_purchase_places_save_failure() {
    let app = TestApp::new().await;
    // Replace the clubs document with a directory so the write fails
    std::fs::remove_file(app.path("clubs.json")).unwrap();
    std::fs::create_dir(app.path("clubs.json")).unwrap();

    let (status, body) = app
        .post_form(
            "/purchasePlaces",
            "competition=Spring+Festival&club=She+Lifts&places=2",
        )
        .await;

    // The booking still shows in memory
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        messages(&body),
        vec!["An error occurred while saving data. Please try again."]
    );
    assert_eq!(body["club"]["points"], 10);
    let (_, body) = app.get("/showSummary?club=She%20Lifts").await;
    assert_eq!(body["club"]["points"], 10);
    assert_eq!(body["competitions"][0]["numberOfPlaces"], 23);
}

// ============================================================================
// Points table
// ============================================================================

#[tokio::test]
async fn test_points_table_after_booking() {
    let app = TestApp::new().await;

    app.post_form(
        "/purchasePlaces",
        "competition=Spring+Festival&club=She+Lifts&places=5",
    )
    .await;
    let (status, body) = app.get("/points").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["view"], "points");
    assert_eq!(
        body["clubs"],
        json!([
            {"name": "Simply Lift", "points": 13},
            {"name": "Iron Temple", "points": 4},
            {"name": "She Lifts", "points": 7}
        ])
    );
}

#[tokio::test]
async fn test_points_table_missing_document() {
    let app = TestApp::with_documents(None, None).await;

    let (status, body) = app.get("/points").await;

    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(
        messages(&body),
        vec![
            "Error: clubs.json file not found.",
            "No club data available to display points."
        ]
    );
}

#[tokio::test]
async fn test_points_table_malformed_document() {
    let app = TestApp::with_documents(Some(json!({"clubs": "oops"})), None).await;

    let (status, body) = app.get("/points").await;

    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(
        messages(&body),
        vec![
            "Error: Failed to decode clubs.json.",
            "No club data available to display points."
        ]
    );
}

#[tokio::test]
async fn test_points_table_empty_clubs_list() {
    let app = TestApp::with_documents(Some(json!({"clubs": []})), None).await;

    let (status, body) = app.get("/points").await;

    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(
        messages(&body),
        vec!["No club data available to display points."]
    );
}

// ============================================================================
// Full flow
// ============================================================================

#[tokio::test]
async fn test_full_booking_flow() {
    let app = TestApp::new().await;

    let (status, _) = app.get("/").await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app
        .post_form("/showSummary", "email=kate%40shelifts.co.uk")
        .await;
    assert_eq!(body["club"]["points"], 12);

    let (_, body) = app.get("/book/Spring%20Festival/She%20Lifts").await;
    assert_eq!(body["view"], "booking");

    let (_, body) = app
        .post_form(
            "/purchasePlaces",
            "competition=Spring+Festival&club=She+Lifts&places=3",
        )
        .await;
    assert_eq!(messages(&body), vec!["Great, booking complete!"]);
    assert_eq!(body["club"]["points"], 9);

    let (_, body) = app.get("/points").await;
    assert_eq!(body["clubs"][2]["points"], 9);

    let (status, _) = app.get("/logout").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
}
