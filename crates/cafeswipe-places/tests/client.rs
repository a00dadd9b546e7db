//! Integration tests for `PlacesClient` using wiremock HTTP mocks.

use cafeswipe_core::Coordinates;
use cafeswipe_places::{NearbySearch, PlacesClient, PlacesError, FIELD_MASK};
use futures::TryStreamExt;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> PlacesClient {
    PlacesClient::with_base_url("test-key", 5, "cafeswipe-test/0.1", base_url)
        .expect("client construction should not fail")
}

fn brooklyn_search() -> NearbySearch {
    NearbySearch {
        center: Coordinates::new(40.6782, -73.9442).unwrap(),
        radius_m: 1500.0,
        place_type: "cafe".to_string(),
        max_results: 20,
    }
}

#[tokio::test]
async fn search_nearby_sends_key_field_mask_and_body() {
    let server = MockServer::start().await;

    let expected_body = serde_json::json!({
        "locationRestriction": {
            "circle": {
                "center": { "latitude": 40.6782, "longitude": -73.9442 },
                "radius": 1500.0
            }
        },
        "includedTypes": ["cafe"],
        "maxResultCount": 20
    });

    Mock::given(method("POST"))
        .and(path("/places:searchNearby"))
        .and(header("X-Goog-Api-Key", "test-key"))
        .and(header("X-Goog-FieldMask", FIELD_MASK))
        .and(body_json(&expected_body))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "places": [
                {
                    "id": "A",
                    "displayName": { "text": "Cafe A" },
                    "formattedAddress": "1 Main St",
                    "rating": 4.2,
                    "photos": [{ "name": "places/A/photos/p1" }]
                },
                { "id": "B", "formattedAddress": "2 Main St" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let candidates = client
        .search_nearby(&brooklyn_search())
        .await
        .expect("should parse places");

    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0].place_id, "A");
    assert_eq!(candidates[0].display_name.as_deref(), Some("Cafe A"));
    assert_eq!(candidates[0].photos[0].name, "places/A/photos/p1");
    assert_eq!(candidates[1].place_id, "B");
    assert!(candidates[1].rating.is_none());
}

#[tokio::test]
async fn search_nearby_empty_object_is_empty_result() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/places:searchNearby"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;

    let candidates = test_client(&server.uri())
        .search_nearby(&brooklyn_search())
        .await
        .expect("empty object is a valid response");
    assert!(candidates.is_empty());
}

#[tokio::test]
async fn search_nearby_surfaces_upstream_json_error() {
    let server = MockServer::start().await;

    let error_body = serde_json::json!({
        "error": {
            "code": 403,
            "message": "API key not valid.",
            "status": "PERMISSION_DENIED"
        }
    });

    Mock::given(method("POST"))
        .and(path("/places:searchNearby"))
        .respond_with(ResponseTemplate::new(403).set_body_json(&error_body))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .search_nearby(&brooklyn_search())
        .await
        .unwrap_err();

    match err {
        PlacesError::Upstream { status, body } => {
            assert_eq!(status, 403);
            assert_eq!(body, error_body);
        }
        other => panic!("expected Upstream, got {other:?}"),
    }
}

#[tokio::test]
async fn search_nearby_non_json_body_is_reported_raw() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/places:searchNearby"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .search_nearby(&brooklyn_search())
        .await
        .unwrap_err();

    assert!(
        matches!(err, PlacesError::NonJson { status: 200, ref body } if body == "<html>gateway</html>"),
        "got {err:?}"
    );
}

#[tokio::test]
async fn search_nearby_wrong_shape_is_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/places:searchNearby"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "places": "nope" })),
        )
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .search_nearby(&brooklyn_search())
        .await
        .unwrap_err();
    assert!(matches!(err, PlacesError::Deserialize { .. }), "got {err:?}");
}

#[tokio::test]
async fn fetch_photo_returns_content_type_and_bytes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/places/A/photos/p1/media"))
        .and(query_param("maxWidthPx", "400"))
        .and(query_param("key", "test-key"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/png")
                .set_body_bytes(vec![0x89, b'P', b'N', b'G']),
        )
        .mount(&server)
        .await;

    let media = test_client(&server.uri())
        .fetch_photo("places/A/photos/p1")
        .await
        .expect("photo should be fetched");

    assert_eq!(media.content_type, "image/png");
    let chunks: Vec<_> = media
        .response
        .bytes_stream()
        .try_collect()
        .await
        .expect("stream body");
    let bytes: Vec<u8> = chunks.iter().flat_map(|c| c.iter().copied()).collect();
    assert_eq!(bytes, vec![0x89, b'P', b'N', b'G']);
}

#[tokio::test]
async fn fetch_photo_surfaces_upstream_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/places/A/photos/gone/media"))
        .respond_with(ResponseTemplate::new(404).set_body_string("photo not found"))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .fetch_photo("places/A/photos/gone")
        .await
        .unwrap_err();

    assert!(
        matches!(err, PlacesError::PhotoUpstream { status: 404, ref body } if body == "photo not found"),
        "got {err:?}"
    );
}

#[tokio::test]
async fn fetch_photo_rejects_invalid_name_without_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .fetch_photo("../../secrets")
        .await
        .unwrap_err();
    assert!(matches!(err, PlacesError::InvalidPhotoName(_)));
}
