use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use cafeswipe_places::PlacesClient;
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::places::NearbyParams;
use super::*;

fn app_for(upstream_uri: &str, static_dir: &Path) -> Router {
    let places = PlacesClient::with_base_url("test-key", 5, "cafeswipe-test/0.1", upstream_uri)
        .expect("places client");
    build_app(
        AppState {
            places: Arc::new(places),
        },
        static_dir,
    )
}

async fn get(app: Router, uri: &str) -> axum::response::Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
        .await
        .expect("response")
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&body).expect("json parse")
}

async fn body_text(response: axum::response::Response) -> String {
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    String::from_utf8(body.to_vec()).expect("utf8 body")
}

fn params(pairs: &[(&str, &str)]) -> NearbyParams {
    let query: String = pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    parse_query(&query)
}

fn parse_query(query: &str) -> NearbyParams {
    let uri: axum::http::Uri = format!("/x?{query}").parse().expect("uri");
    axum::extract::Query::<NearbyParams>::try_from_uri(&uri)
        .expect("query")
        .0
}

// -------------------------------------------------------------------------
// Query validation (no network)
// -------------------------------------------------------------------------

#[test]
fn nearby_params_apply_defaults() {
    let search = params(&[("lat", "40.7"), ("lng", "-74.0")])
        .to_search()
        .expect("valid");
    assert!((search.radius_m - 1500.0).abs() < f64::EPSILON);
    assert_eq!(search.place_type, "cafe");
    assert_eq!(search.max_results, 20);
}

#[test]
fn nearby_params_accept_overrides() {
    let search = params(&[
        ("lat", "40.7"),
        ("lng", "-74.0"),
        ("radius", "4500"),
        ("type", "bakery"),
        ("maxResults", "5"),
    ])
    .to_search()
    .expect("valid");
    assert!((search.radius_m - 4500.0).abs() < f64::EPSILON);
    assert_eq!(search.place_type, "bakery");
    assert_eq!(search.max_results, 5);
}

#[test]
fn nearby_params_require_lat_and_lng() {
    let (code, _) = params(&[("lat", "40.7")]).to_search().unwrap_err();
    assert_eq!(code, "bad_request");
    let (code, _) = params(&[("lat", ""), ("lng", "1")]).to_search().unwrap_err();
    assert_eq!(code, "bad_request");
}

#[test]
fn nearby_params_reject_bad_numbers() {
    for pairs in [
        vec![("lat", "north"), ("lng", "1")],
        vec![("lat", "95"), ("lng", "1")],
        vec![("lat", "1"), ("lng", "1"), ("radius", "0")],
        vec![("lat", "1"), ("lng", "1"), ("radius", "60000")],
        vec![("lat", "1"), ("lng", "1"), ("maxResults", "21")],
    ] {
        let (code, _) = params(&pairs).to_search().unwrap_err();
        assert_eq!(code, "validation_error", "pairs: {pairs:?}");
    }
}

#[test]
fn api_error_invalid_photo_reference_maps_to_bad_request() {
    let response =
        ApiError::new("req-1", "invalid_photo_reference", "bad name").into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// -------------------------------------------------------------------------
// Routes (wiremock upstream)
// -------------------------------------------------------------------------

#[tokio::test]
async fn health_returns_ok() {
    let dir = tempfile::tempdir().expect("tempdir");
    let response = get(app_for("http://127.0.0.1:9", dir.path()), "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(body_json(response).await["status"], "ok");
}

#[tokio::test]
async fn nearby_without_coordinates_is_400() {
    let dir = tempfile::tempdir().expect("tempdir");
    let response = get(app_for("http://127.0.0.1:9", dir.path()), "/places/nearby?lat=1").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "bad_request");
    assert_eq!(json["error"]["message"], "lat & lng required");
}

#[tokio::test]
async fn nearby_returns_normalized_results() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/places:searchNearby"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "places": [
                { "id": "A", "displayName": { "text": "Cafe A" }, "rating": 4.5 },
                { "displayName": { "text": "No Id" } },
                { "id": "B", "formattedAddress": "2 Main St" }
            ]
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let response = get(
        app_for(&server.uri(), dir.path()),
        "/places/nearby?lat=40.7&lng=-74.0",
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "OK");
    let results = json["results"].as_array().expect("results array");
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["place_id"], "A");
    assert_eq!(results[0]["display_name"], "Cafe A");
    assert_eq!(results[1]["place_id"], "B");
    assert!(results[1]["rating"].is_null());
}

#[tokio::test]
async fn nearby_relays_upstream_403_with_body() {
    let server = MockServer::start().await;
    let upstream_error = serde_json::json!({
        "error": { "code": 403, "message": "API key not valid.", "status": "PERMISSION_DENIED" }
    });
    Mock::given(method("POST"))
        .and(path("/places:searchNearby"))
        .respond_with(ResponseTemplate::new(403).set_body_json(&upstream_error))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let response = get(
        app_for(&server.uri(), dir.path()),
        "/places/nearby?lat=40.7&lng=-74.0",
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await, upstream_error);
}

#[tokio::test]
async fn nearby_non_json_upstream_is_502_with_raw_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/places:searchNearby"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let response = get(
        app_for(&server.uri(), dir.path()),
        "/places/nearby?lat=40.7&lng=-74.0",
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_text(response).await, "upstream exploded");
}

#[tokio::test]
async fn nearby_unreachable_upstream_is_500() {
    let dir = tempfile::tempdir().expect("tempdir");
    let response = get(
        app_for("http://127.0.0.1:9", dir.path()),
        "/places/nearby?lat=40.7&lng=-74.0",
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["error"]["message"], "Server error");
}

#[tokio::test]
async fn photo_without_name_is_400() {
    let dir = tempfile::tempdir().expect("tempdir");
    let response = get(app_for("http://127.0.0.1:9", dir.path()), "/places/photo").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"]["message"], "Missing photo name");
}

#[tokio::test]
async fn photo_with_malformed_name_is_distinct_400() {
    let dir = tempfile::tempdir().expect("tempdir");
    let response = get(
        app_for("http://127.0.0.1:9", dir.path()),
        "/places/photo?name=not-a-photo",
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"]["code"],
        "invalid_photo_reference"
    );
}

#[tokio::test]
async fn photo_streams_upstream_bytes_and_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/places/A/photos/p1/media"))
        .and(query_param("maxWidthPx", "400"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/webp")
                .set_body_bytes(b"RIFFdata".to_vec()),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let response = get(
        app_for(&server.uri(), dir.path()),
        "/places/photo?name=places%2FA%2Fphotos%2Fp1",
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE].to_str().unwrap(),
        "image/webp"
    );
    assert_eq!(body_text(response).await, "RIFFdata");
}

#[tokio::test]
async fn photo_relays_upstream_failure_status_and_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/places/A/photos/gone/media"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such photo"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let response = get(
        app_for(&server.uri(), dir.path()),
        "/places/photo?name=places/A/photos/gone",
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(response).await, "no such photo");
}

#[tokio::test]
async fn unknown_paths_fall_back_to_static_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("index.html"), "<h1>CafeSwipe</h1>").expect("write index");

    let response = get(app_for("http://127.0.0.1:9", dir.path()), "/index.html").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "<h1>CafeSwipe</h1>");
}

#[tokio::test]
async fn request_id_header_is_propagated() {
    let dir = tempfile::tempdir().expect("tempdir");
    let response = app_for("http://127.0.0.1:9", dir.path())
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "abc-123")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.headers()["x-request-id"], "abc-123");
}
