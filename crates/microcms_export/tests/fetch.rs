use std::time::Duration;

use microcms_export::{ContentFetcher, FailureKind, FetchSettings, MicrocmsFetcher};
use pretty_assertions::assert_eq;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PAGE_JSON: &str = r#"{
  "contents": [
    {
      "id": "first-post",
      "createdAt": "2024-01-01T00:00:00.000Z",
      "updatedAt": "2024-01-02T00:00:00.000Z",
      "publishedAt": "2024-01-01T00:00:00.000Z",
      "revisedAt": "2024-01-02T00:00:00.000Z",
      "title": "First",
      "body": "<p>Hello</p>",
      "tags": [{"tagName": "rust"}, {"tagName": "hugo"}],
      "image": {"url": "https://images.example/first.png", "height": 630, "width": 1200}
    },
    {
      "id": "second-post",
      "createdAt": "2024-02-01T00:00:00.000Z",
      "title": "Second",
      "body": "<p>World</p>",
      "tags": null,
      "image": null
    }
  ],
  "totalCount": 2,
  "offset": 0,
  "limit": 10
}"#;

fn fetcher_for(server: &MockServer, settings: FetchSettings) -> MicrocmsFetcher {
    MicrocmsFetcher::new(format!("{}/api/v1/blogs", server.uri()), "secret", settings)
        .expect("client builds")
}

#[tokio::test]
async fn fetch_sends_paging_query_and_api_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/blogs"))
        .and(query_param("offset", "20"))
        .and(query_param("limit", "10"))
        .and(header("X-MICROCMS-API-KEY", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(PAGE_JSON, "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = fetcher_for(&server, FetchSettings::default());
    let page = fetcher.fetch(20, 10).await.expect("fetch ok");

    assert_eq!(page.len(), 2);
    let first = &page[0];
    assert_eq!(first.id, "first-post");
    assert_eq!(first.created_at, "2024-01-01T00:00:00.000Z");
    assert_eq!(first.revised_at, "2024-01-02T00:00:00.000Z");
    assert_eq!(first.title, "First");
    assert_eq!(first.body, "<p>Hello</p>");
    let tags: Vec<_> = first.tags.iter().map(|t| t.tag_name.as_str()).collect();
    assert_eq!(tags, vec!["rust", "hugo"]);
    assert_eq!(first.image.url, "https://images.example/first.png");
    assert_eq!(first.image.width, 1200);
    assert_eq!(first.image.height, 630);

    let second = &page[1];
    assert_eq!(second.updated_at, "");
    assert!(second.tags.is_empty());
    assert_eq!(second.image.url, "");
}

#[tokio::test]
async fn empty_contents_is_an_empty_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/blogs"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"contents": []}"#))
        .mount(&server)
        .await;

    let fetcher = fetcher_for(&server, FetchSettings::default());
    let page = fetcher.fetch(0, 10).await.expect("fetch ok");
    assert!(page.is_empty());
}

#[tokio::test]
async fn base_url_query_is_preserved() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/blogs"))
        .and(query_param("orders", "-publishedAt"))
        .and(query_param("offset", "0"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"contents": []}"#))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = MicrocmsFetcher::new(
        format!("{}/api/v1/blogs?orders=-publishedAt", server.uri()),
        "secret",
        FetchSettings::default(),
    )
    .expect("client builds");
    fetcher.fetch(0, 5).await.expect("fetch ok");
}

#[tokio::test]
async fn non_200_status_is_an_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/blogs"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let fetcher = fetcher_for(&server, FetchSettings::default());
    let err = fetcher.fetch(0, 10).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(401));
}

#[tokio::test]
async fn other_success_codes_are_rejected_too() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/blogs"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let fetcher = fetcher_for(&server, FetchSettings::default());
    let err = fetcher.fetch(0, 10).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(204));
}

#[tokio::test]
async fn malformed_json_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/blogs"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let fetcher = fetcher_for(&server, FetchSettings::default());
    let err = fetcher.fetch(0, 10).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Decode);
}

#[tokio::test]
async fn fetch_times_out_on_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/blogs"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_string(r#"{"contents": []}"#),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        request_timeout: Duration::from_millis(50),
        ..FetchSettings::default()
    };
    let fetcher = fetcher_for(&server, settings);
    let err = fetcher.fetch(0, 10).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn fetch_rejects_too_large_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/blogs"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"contents": []}"#))
        .mount(&server)
        .await;

    let settings = FetchSettings {
        max_bytes: 10,
        ..FetchSettings::default()
    };
    let fetcher = fetcher_for(&server, settings);
    let err = fetcher.fetch(0, 10).await.unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::TooLarge {
            max_bytes: 10,
            actual: Some(16)
        }
    );
}

#[tokio::test]
async fn invalid_base_url_fails_before_sending() {
    let fetcher =
        MicrocmsFetcher::new("not a url", "secret", FetchSettings::default()).expect("client");
    let err = fetcher.fetch(0, 10).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}

