//! Integration tests for Chapter-Mirror
//!
//! These tests use wiremock to stand in for both the forum and the posting
//! platform, and drive the real client, extractor and updater end-to-end.

mod reddit_tests;

use chapter_mirror::config::{
    Config, ForumConfig, LoggingConfig, MirrorConfig, RedditConfig, SyncConfig,
};
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const SENTINEL: &str =
    "On those who live to see old age in a profession where most die young.";

pub const THREAD_PATH: &str = "/threads/story.341621/";

/// Creates a test configuration pointing every endpoint at the mock server
pub fn create_test_config(base_url: &str, destinations: &[&str]) -> Config {
    Config {
        forum: ForumConfig {
            thread_url: format!("{}{}", base_url, THREAD_PATH),
            sentinel: SENTINEL.to_string(),
        },
        reddit: RedditConfig {
            user_agent: "chapter-mirror-tests/1.0".to_string(),
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
            redirect_uri: "http://127.0.0.1:65010/authorize_callback".to_string(),
            access_token: "stale".to_string(),
            refresh_token: "refresh".to_string(),
            scopes: vec![
                "identity".to_string(),
                "read".to_string(),
                "submit".to_string(),
                "privatemessages".to_string(),
            ],
            auth_url: base_url.to_string(),
            api_url: base_url.to_string(),
        },
        mirror: MirrorConfig {
            destinations: destinations.iter().map(|d| d.to_string()).collect(),
            admin: "masasin".to_string(),
            uploaders: vec!["masasin".to_string(), "TGWP_Updater".to_string()],
            title_template: "{i} - {title}".to_string(),
            number_separator: " - ".to_string(),
        },
        sync: SyncConfig {
            interval_minutes: 0,
            rate_limit_backoff_secs: 0,
        },
        logging: LoggingConfig::default(),
    }
}

/// Index post with the given (title, href) anchors followed by the sentinel
pub fn thread_page(anchors: &[(&str, &str)]) -> String {
    let links: String = anchors
        .iter()
        .map(|(title, href)| format!("<a href=\"{}\">{}</a><br/>\n", href, title))
        .collect();

    format!(
        r#"<html><head><title>Story</title></head><body>
<article>
<div class="messageContent">
Disk Five
</div>
<blockquote class="messageText">
{}<a href="/posts/999/">{}</a>
</blockquote>
</article>
</body></html>"#,
        links, SENTINEL
    )
}

/// A `new` listing with posts given newest first as (title, url, author)
pub fn listing(posts: &[(&str, &str, &str)]) -> Value {
    let children: Vec<Value> = posts
        .iter()
        .map(|(title, url, author)| {
            json!({
                "kind": "t3",
                "data": {
                    "title": title,
                    "url": url,
                    "author": author,
                    "created_utc": 1_450_000_000.0
                }
            })
        })
        .collect();

    json!({ "kind": "Listing", "data": { "children": children } })
}

pub fn submit_ok(id: &str) -> Value {
    json!({
        "json": {
            "errors": [],
            "data": {
                "url": format!("https://www.reddit.com/r/TGWP/comments/{}/", id),
                "id": id,
                "name": format!("t3_{}", id)
            }
        }
    })
}

pub fn submit_rate_limited() -> Value {
    json!({
        "json": {
            "errors": [["RATELIMIT", "you are doing that too much. try again in 9 minutes.", "ratelimit"]]
        }
    })
}

/// Mounts the token and identity endpoints
pub async fn mount_auth(server: &MockServer, account: &str) {
    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .and(header("authorization", "Basic aWQ6c2VjcmV0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "fresh",
            "token_type": "bearer",
            "expires_in": 3600,
            "scope": "identity read submit privatemessages"
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/me"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": account })))
        .mount(server)
        .await;
}

/// Mounts the forum thread page
pub async fn mount_thread(server: &MockServer, status: u16, body: String) {
    Mock::given(method("GET"))
        .and(path(THREAD_PATH))
        .respond_with(
            ResponseTemplate::new(status)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

/// Decoded form fields of every request received on `request_path`
pub async fn form_bodies(server: &MockServer, request_path: &str) -> Vec<Vec<(String, String)>> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|request| request.url.path() == request_path)
        .map(|request| {
            url::form_urlencoded::parse(&request.body)
                .into_owned()
                .collect()
        })
        .collect()
}

pub fn field<'a>(form: &'a [(String, String)], name: &str) -> Option<&'a str> {
    form.iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}
