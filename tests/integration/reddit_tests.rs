//! Tests for the Reddit client against a mock API

use crate::{field, form_bodies, listing, mount_auth, submit_ok, submit_rate_limited};
use chapter_mirror::site::{MirrorSite, RedditClient};
use chapter_mirror::SiteError;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client_for(server: &MockServer) -> RedditClient {
    let config = crate::create_test_config(&server.uri(), &["TGWP"]);
    RedditClient::new(&config.reddit).expect("Failed to build client")
}

#[tokio::test]
async fn test_authenticate_refreshes_token_and_reports_account() {
    let server = MockServer::start().await;
    mount_auth(&server, "TGWP_Updater").await;

    let mut client = client_for(&server).await;
    let name = client.authenticate().await.expect("authentication failed");
    assert_eq!(name, "TGWP_Updater");

    let forms = form_bodies(&server, "/api/v1/access_token").await;
    assert_eq!(forms.len(), 1);
    assert_eq!(field(&forms[0], "grant_type"), Some("refresh_token"));
    assert_eq!(field(&forms[0], "refresh_token"), Some("refresh"));
}

#[tokio::test]
async fn test_authenticate_rejected_grant() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "error": "invalid_grant" })))
        .mount(&server)
        .await;

    let mut client = client_for(&server).await;
    let result = client.authenticate().await;
    assert!(matches!(result, Err(SiteError::Auth(msg)) if msg == "invalid_grant"));
}

#[tokio::test]
async fn test_authenticate_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let mut client = client_for(&server).await;
    assert!(matches!(client.authenticate().await, Err(SiteError::Auth(_))));
}

#[tokio::test]
async fn test_latest_post_skips_other_authors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/r/TGWP/new"))
        .and(query_param("limit", "100"))
        .and(header("authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(&[
            ("Fan art!", "https://img.example.com/1.png", "someone"),
            ("7 - Rise", "https://forum.example.com/posts/7/", "tgwp_updater"),
            ("6 - Fall", "https://forum.example.com/posts/6/", "masasin"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let uploaders = vec!["masasin".to_string(), "TGWP_Updater".to_string()];
    let post = client
        .latest_post("TGWP", &uploaders)
        .await
        .unwrap()
        .expect("a mirrored post");

    assert_eq!(post.title, "7 - Rise");
    assert_eq!(post.url, "https://forum.example.com/posts/7/");
    assert!(post.created.is_some());
}

#[tokio::test]
async fn test_latest_post_none_after_scanning_all() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/r/TGWP/new"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(&[
            ("Fan art!", "https://img.example.com/1.png", "someone"),
            ("Question", "https://www.reddit.com/r/TGWP/comments/q/", "reader"),
        ])))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let uploaders = vec!["masasin".to_string()];
    assert!(client.latest_post("TGWP", &uploaders).await.unwrap().is_none());
}

#[tokio::test]
async fn test_submit_link_sends_resubmit_form() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/submit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(submit_ok("abc123")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let post = client
        .submit_link("TGWP", "2 - Rise", "https://forum.example.com/posts/2/")
        .await
        .unwrap();

    assert_eq!(post.id, "abc123");
    assert_eq!(post.permalink, "https://www.reddit.com/r/TGWP/comments/abc123/");
    assert_eq!(post.short_link(), "https://redd.it/abc123");

    let forms = form_bodies(&server, "/api/submit").await;
    let form = &forms[0];
    assert_eq!(field(form, "api_type"), Some("json"));
    assert_eq!(field(form, "kind"), Some("link"));
    assert_eq!(field(form, "sr"), Some("TGWP"));
    assert_eq!(field(form, "title"), Some("2 - Rise"));
    assert_eq!(field(form, "url"), Some("https://forum.example.com/posts/2/"));
    assert_eq!(field(form, "resubmit"), Some("true"));
}

#[tokio::test]
async fn test_submit_link_rate_limit_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/submit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(submit_rate_limited()))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let result = client.submit_link("TGWP", "2 - Rise", "https://x/2").await;
    assert!(matches!(result, Err(SiteError::RateLimited(_))));
}

#[tokio::test]
async fn test_submit_link_http_429() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/submit"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let result = client.submit_link("TGWP", "2 - Rise", "https://x/2").await;
    assert!(matches!(result, Err(SiteError::RateLimited(_))));
}

#[tokio::test]
async fn test_submit_link_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/submit"))
        .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let result = client.submit_link("TGWP", "2 - Rise", "https://x/2").await;
    assert!(matches!(result, Err(SiteError::Status { status: 500, .. })));
}

#[tokio::test]
async fn test_send_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/compose"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "json": { "errors": [] } })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    client
        .send_message("masasin", "Chapter mirror updated", "New post available!")
        .await
        .unwrap();

    let forms = form_bodies(&server, "/api/compose").await;
    assert_eq!(field(&forms[0], "to"), Some("masasin"));
    assert_eq!(field(&forms[0], "subject"), Some("Chapter mirror updated"));
    assert_eq!(field(&forms[0], "text"), Some("New post available!"));
}

#[tokio::test]
async fn test_malformed_listing_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/r/TGWP/new"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let uploaders = vec!["masasin".to_string()];
    let result = client.latest_post("TGWP", &uploaders).await;
    assert!(matches!(result, Err(SiteError::Decode(_))));
}
