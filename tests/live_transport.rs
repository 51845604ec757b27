//! End-to-end tests for the emulated transport against a local mock server.

use plumage::{Error, RequestOptions, Session, SessionConfig, Url};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_get_merges_query_params() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "rust"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
        .mount(&server)
        .await;

    let session = Session::new(SessionConfig::default()).unwrap();
    let response = session
        .get(RequestOptions::new(format!("{}/search?page=2", server.uri())).param("q", "rust"))
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.text().unwrap(), "hello");
}

#[tokio::test]
async fn test_reserved_header_defaults_are_transmitted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ua"))
        .and(header("user-agent", "plumage-test/1.0"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let config = SessionConfig::builder().user_agent("plumage-test/1.0").build();
    let session = Session::new(config).unwrap();
    let response = session
        .get(
            RequestOptions::new(format!("{}/ua", server.uri()))
                .header("User-Agent", "default"),
        )
        .await
        .unwrap();

    assert!(response.is_success());
}

#[tokio::test]
async fn test_post_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/orders"))
        .and(body_json(serde_json::json!({"item": "widget", "quantity": 5})))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;

    let session = Session::new(SessionConfig::default()).unwrap();
    let response = session
        .post(
            RequestOptions::new(format!("{}/orders", server.uri()))
                .body(serde_json::json!({"item": "widget", "quantity": 5})),
        )
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 201);
}

#[tokio::test]
async fn test_response_cookies_are_ingested_and_resent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(200).insert_header("set-cookie", "token=xyz; Path=/; HttpOnly"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/private"))
        .and(header("cookie", "token=xyz"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let session = Session::new(SessionConfig::default()).unwrap();
    let base = Url::parse(&server.uri()).unwrap();

    let login = session
        .get(RequestOptions::new(format!("{}/login", server.uri())))
        .await
        .unwrap();
    assert_eq!(login.cookie("token").unwrap().value, "xyz");
    assert!(login.cookie("token").unwrap().http_only);

    // The jar now holds the cookie and sends it on the next request.
    assert_eq!(
        session.get_cookie("token", &base).unwrap().unwrap().value,
        "xyz"
    );
    let private = session
        .get(RequestOptions::new(format!("{}/private", server.uri())))
        .await
        .unwrap();
    assert!(private.is_success());

    // Clearing removes it again.
    session.clear_cookies().unwrap();
    assert!(session.get_cookies(&base).unwrap().is_empty());
}

#[tokio::test]
async fn test_manually_set_cookie_is_transmitted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/private"))
        .and(header("cookie", "sid=abc"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let session = Session::new(SessionConfig::default()).unwrap();
    let base = Url::parse(&server.uri()).unwrap();
    session.set_cookie("sid", "abc", &base).unwrap();

    let response = session
        .get(RequestOptions::new(format!("{}/private", server.uri())))
        .await
        .unwrap();
    assert!(response.is_success());
}

#[tokio::test]
async fn test_unreachable_host_exhausts_retries() {
    // Nothing listens on port 1; every attempt fails at connect.
    let config = SessionConfig::builder().max_retries(2).build();
    let session = Session::new(config).unwrap();

    let err = session
        .get(RequestOptions::new("http://127.0.0.1:1/"))
        .await
        .unwrap_err();

    match err {
        Error::RetriesExhausted { attempts, message } => {
            assert_eq!(attempts, 2);
            assert!(!message.is_empty());
        }
        other => panic!("expected RetriesExhausted, got {other:?}"),
    }
}
