//! Backend API client tests
//!
//! Tests the session token handling, response envelope decoding, and the
//! search/detail endpoints against a mocked backend.

use mockito::{Matcher, Server};

use grabtui::api::{ApiClient, ApiError};

fn client(server: &Server) -> ApiClient {
    ApiClient::with_base_url(server.url(), Some("tok-123".to_string()))
}

// =============================================================================
// Session / Envelope Tests
// =============================================================================

#[tokio::test]
async fn test_sends_raw_token_in_authorization_header() {
    let mut server = Server::new_async().await;

    // The backend expects the bare token, not a Bearer scheme
    let mock = server
        .mock("POST", "/search/keyword")
        .match_header("Authorization", "tok-123")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"code": 0, "success": true, "message": "", "data": {"Items": []}}"#)
        .create_async()
        .await;

    let results = client(&server).search("dune").await.unwrap();

    mock.assert_async().await;
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_no_authorization_header_without_token() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/user/login")
        .match_header("Authorization", Matcher::Missing)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"code": 0, "success": true, "message": "", "data": {"token": "fresh"}}"#)
        .create_async()
        .await;

    let client = ApiClient::with_base_url(server.url(), None);
    let token = client.login("me", "pw").await.unwrap();

    mock.assert_async().await;
    assert_eq!(token, "fresh");
}

#[tokio::test]
async fn test_http_403_maps_to_auth_expired() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/search/keyword")
        .with_status(403)
        .create_async()
        .await;

    let result = client(&server).search("dune").await;

    mock.assert_async().await;
    assert!(matches!(result, Err(ApiError::AuthExpired)));
}

#[tokio::test]
async fn test_envelope_code_403_maps_to_auth_expired() {
    let mut server = Server::new_async().await;

    // Some backends answer 200 with a failed envelope carrying code 403
    let mock = server
        .mock("POST", "/search/keyword")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"code": 403, "success": false, "message": "login first", "data": null}"#)
        .create_async()
        .await;

    let result = client(&server).search("dune").await;

    mock.assert_async().await;
    assert!(matches!(result, Err(ApiError::AuthExpired)));
}

#[tokio::test]
async fn test_failed_envelope_carries_backend_message() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/search/keyword")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"code": 42, "success": false, "message": "bad keyword", "data": null}"#)
        .create_async()
        .await;

    let result = client(&server).search("dune").await;

    mock.assert_async().await;
    match result {
        Err(ApiError::Backend { code, message }) => {
            assert_eq!(code, 42);
            assert_eq!(message, "bad keyword");
        }
        other => panic!("Expected Backend error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_handles_server_error() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/search/keyword")
        .with_status(502)
        .with_body("Bad Gateway")
        .create_async()
        .await;

    let result = client(&server).search("dune").await;

    mock.assert_async().await;
    assert!(matches!(result, Err(ApiError::ServerError(502))));
}

#[tokio::test]
async fn test_handles_invalid_json() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/search/keyword")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("not valid json {{{")
        .create_async()
        .await;

    let result = client(&server).search("dune").await;

    mock.assert_async().await;
    assert!(matches!(result, Err(ApiError::InvalidResponse(_))));
}

// =============================================================================
// Login Tests
// =============================================================================

#[tokio::test]
async fn test_login_posts_credentials_as_form() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/user/login")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("username".into(), "me".into()),
            Matcher::UrlEncoded("password".into(), "p@ss word".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"code": 0, "success": true, "message": "", "data": {"token": "tok-1"}}"#)
        .create_async()
        .await;

    let client = ApiClient::with_base_url(server.url(), None);
    let token = client.login("me", "p@ss word").await.unwrap();

    mock.assert_async().await;
    assert_eq!(token, "tok-1");
}

#[tokio::test]
async fn test_login_rejects_empty_token() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/user/login")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"code": 0, "success": true, "message": "", "data": {"token": ""}}"#)
        .create_async()
        .await;

    let client = ApiClient::with_base_url(server.url(), None);
    let result = client.login("me", "pw").await;

    mock.assert_async().await;
    assert!(matches!(result, Err(ApiError::InvalidResponse(_))));
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/user/login")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"code": 1, "success": false, "message": "wrong password", "data": null}"#)
        .create_async()
        .await;

    let client = ApiClient::with_base_url(server.url(), None);
    let result = client.login("me", "nope").await;

    mock.assert_async().await;
    assert!(matches!(result, Err(ApiError::Backend { .. })));
}

// =============================================================================
// Search Tests
// =============================================================================

#[tokio::test]
async fn test_search_parses_items() {
    let mut server = Server::new_async().await;

    let mock_response = r#"{
        "code": 0,
        "success": true,
        "message": "",
        "data": {
            "Items": [
                {
                    "id": 438631,
                    "title": "Dune",
                    "year": "2021",
                    "type": "Movie",
                    "media_type": "MOV",
                    "vote": 7.8,
                    "image": "https://image.tmdb.org/dune.jpg",
                    "overview": "Paul Atreides"
                },
                {
                    "id": 1396,
                    "title": "Breaking Bad",
                    "year": "2008",
                    "type": "TV",
                    "media_type": "TV",
                    "vote": 9.5
                }
            ]
        }
    }"#;

    let mock = server
        .mock("POST", "/search/keyword")
        .match_body(Matcher::UrlEncoded("keyword".into(), "dune".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(mock_response)
        .create_async()
        .await;

    let results = client(&server).search("dune").await.unwrap();

    mock.assert_async().await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].id, 438631);
    assert_eq!(results[0].title, "Dune");
    assert!(!results[0].is_tv());
    assert!(results[1].is_tv());
}

#[tokio::test]
async fn test_search_tolerates_missing_items() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/search/keyword")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"code": 0, "success": true, "message": "", "data": {}}"#)
        .create_async()
        .await;

    let results = client(&server).search("nothing").await.unwrap();

    mock.assert_async().await;
    assert!(results.is_empty());
}

// =============================================================================
// Media Detail Tests
// =============================================================================

#[tokio::test]
async fn test_media_detail_unwraps_nested_data() {
    let mut server = Server::new_async().await;

    // Detail payload is nested one level deeper: data.data
    let mock_response = r#"{
        "code": 0,
        "success": true,
        "message": "",
        "data": {
            "data": {
                "tmdbid": 438631,
                "title": "Dune",
                "year": "2021",
                "vote": 7.8,
                "genres": "Science Fiction, Adventure",
                "overview": "Paul Atreides, a brilliant and gifted young man",
                "runtime": "2h 35m"
            }
        }
    }"#;

    let mock = server
        .mock("POST", "/media/detail")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("type".into(), "MOV".into()),
            Matcher::UrlEncoded("tmdbid".into(), "438631".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(mock_response)
        .create_async()
        .await;

    let detail = client(&server).media_detail(438631, "MOV").await.unwrap();

    mock.assert_async().await;

    assert_eq!(detail.tmdbid, 438631);
    assert_eq!(detail.title, "Dune");
    assert_eq!(detail.year, "2021");
    assert_eq!(detail.genres, "Science Fiction, Adventure");
    assert!((detail.vote - 7.8).abs() < 0.01);
}

#[tokio::test]
async fn test_media_detail_tv_type() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/media/detail")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("type".into(), "TV".into()),
            Matcher::UrlEncoded("tmdbid".into(), "1396".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"code": 0, "success": true, "message": "",
                "data": {"data": {"tmdbid": 1396, "title": "Breaking Bad", "year": "2008"}}}"#,
        )
        .create_async()
        .await;

    let detail = client(&server).media_detail(1396, "TV").await.unwrap();

    mock.assert_async().await;
    assert_eq!(detail.title, "Breaking Bad");
}
