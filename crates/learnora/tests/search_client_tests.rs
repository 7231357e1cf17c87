use anyhow::Result;
use learnora::search::{ClientConfig, HttpSearchClient, SearchBackend};
use learnora::{FailureCategory, LearnoraError};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod roadmap_mock_data {
  use serde_json::{json, Value};

  pub fn article() -> Value {
    json!({
      "id": 1,
      "title": "SQL Joins Explained",
      "source": "Medium",
      "link": "https://medium.com/@db/sql-joins-explained",
      "labels": ["sql", "databases", "joins", "beginner"],
      "similarity_score": 0.87,
      "credibility_score": 0.7
    })
  }

  pub fn video() -> Value {
    json!({
      "id": "v-1",
      "title": "SQL Joins in 10 Minutes",
      "source": "YouTube",
      "link": "https://youtu.be/9yeOJ0ZMUYw",
      "labels": ["sql"],
      "similarity_score": 0.8
    })
  }

  pub fn roadmap(query: &str) -> Value {
    json!({
      "query": query,
      "total_articles": 1,
      "total_videos": 1,
      "articles": [article()],
      "videos": [video()]
    })
  }
}

async fn client_for(server: &MockServer) -> HttpSearchClient {
  HttpSearchClient::new(server.uri()).unwrap()
}

#[tokio::test]
async fn test_fetch_roadmap_sends_query_and_count() -> Result<()> {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/api/fishbone"))
    .and(query_param("q", "sql joins"))
    .and(query_param("k", "25"))
    .respond_with(ResponseTemplate::new(200).set_body_json(roadmap_mock_data::roadmap("sql joins")))
    .expect(1)
    .mount(&server)
    .await;

  let client = client_for(&server).await;
  let payload = client.fetch_roadmap("sql joins", 25).await?;

  assert_eq!(payload.query, "sql joins");
  assert_eq!(payload.total_articles, 1);
  assert_eq!(payload.articles[0].title, "SQL Joins Explained");
  assert_eq!(payload.articles[0].visible_labels().len(), 3);
  assert_eq!(payload.articles[0].score_percent(), Some(87));
  assert_eq!(payload.videos[0].id.to_string(), "v-1");
  assert_eq!(
    payload.videos[0].youtube_thumbnail().as_deref(),
    Some("https://img.youtube.com/vi/9yeOJ0ZMUYw/maxresdefault.jpg")
  );
  Ok(())
}

#[tokio::test]
async fn test_missing_fields_default() -> Result<()> {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/api/fishbone"))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({"query": "rust"})))
    .mount(&server)
    .await;

  let payload = client_for(&server).await.fetch_roadmap("rust", 25).await?;
  assert!(payload.is_empty());
  assert_eq!(payload.total_articles, 0);
  Ok(())
}

#[tokio::test]
async fn test_null_fields_do_not_sink_the_response() -> Result<()> {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/api/fishbone"))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({
      "query": "sql joins",
      "total_articles": 2,
      "total_videos": null,
      "articles": [
        roadmap_mock_data::article(),
        {"id": 2, "title": null, "source": null, "link": null, "labels": null, "similarity_score": null}
      ],
      "videos": null
    })))
    .mount(&server)
    .await;

  let payload = client_for(&server).await.fetch_roadmap("sql joins", 25).await?;

  assert_eq!(payload.articles.len(), 2);
  assert_eq!(payload.articles[0].title, "SQL Joins Explained");
  let sparse = &payload.articles[1];
  assert_eq!(sparse.title, "");
  assert_eq!(sparse.source, "");
  assert!(sparse.labels.is_empty());
  assert!(sparse.link().is_none());
  assert_eq!(sparse.score_percent(), None);
  assert_eq!(payload.total_videos, 0);
  assert!(payload.videos.is_empty());
  Ok(())
}

#[tokio::test]
async fn test_http_404_is_not_found() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/api/fishbone"))
    .respond_with(ResponseTemplate::new(404).set_body_string("no such route"))
    .mount(&server)
    .await;

  let err = client_for(&server).await.fetch_roadmap("rust", 25).await.unwrap_err();

  match &err {
    LearnoraError::HttpError { status, reason, body } => {
      assert_eq!(*status, 404);
      assert_eq!(reason, "Not Found");
      assert_eq!(body, "no such route");
    }
    other => panic!("expected HttpError, got {other:?}"),
  }
  assert_eq!(err.category(), FailureCategory::NotFound);
}

#[tokio::test]
async fn test_http_500_is_server_error_with_truncated_body() {
  let server = MockServer::start().await;
  let long_body = "x".repeat(500);
  Mock::given(method("GET"))
    .and(path("/api/fishbone"))
    .respond_with(ResponseTemplate::new(500).set_body_string(long_body))
    .mount(&server)
    .await;

  let err = client_for(&server).await.fetch_roadmap("rust", 25).await.unwrap_err();

  assert_eq!(err.category(), FailureCategory::ServerError);
  match err {
    LearnoraError::HttpError { status, body, .. } => {
      assert_eq!(status, 500);
      assert_eq!(body.chars().count(), 100);
    }
    other => panic!("expected HttpError, got {other:?}"),
  }
}

#[tokio::test]
async fn test_html_body_is_malformed() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/api/fishbone"))
    .respond_with(ResponseTemplate::new(200).set_body_string("<!DOCTYPE html><html><body>proxy</body></html>"))
    .mount(&server)
    .await;

  let err = client_for(&server).await.fetch_roadmap("rust", 25).await.unwrap_err();

  assert!(matches!(err, LearnoraError::MalformedResponseBody(ref b) if b.starts_with("<!DOCTYPE")));
  assert_eq!(err.category(), FailureCategory::Unknown);
}

#[tokio::test]
async fn test_error_field_is_backend_reported() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/api/fishbone"))
    .respond_with(
      ResponseTemplate::new(200)
        .set_body_json(json!({"error": "Vector index is not loaded", "type": "RuntimeError"})),
    )
    .mount(&server)
    .await;

  let err = client_for(&server).await.fetch_roadmap("rust", 25).await.unwrap_err();
  assert!(matches!(err, LearnoraError::BackendReportedError(ref m) if m == "Vector index is not loaded"));
}

#[tokio::test]
async fn test_unreachable_backend() {
  // Grab a free port, then release it so nothing is listening
  let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
  let port = listener.local_addr().unwrap().port();
  drop(listener);

  let client = HttpSearchClient::with_config(ClientConfig {
    base_url: format!("http://127.0.0.1:{port}"),
    timeout: Duration::from_secs(5),
  })
  .unwrap();

  let err = client.fetch_roadmap("rust", 25).await.unwrap_err();
  assert!(matches!(err, LearnoraError::NetworkUnreachable(_)));
  assert_eq!(err.category(), FailureCategory::Unreachable);
  assert!(err.to_string().starts_with("Failed to fetch"));
}

#[tokio::test]
async fn test_health_reports_status() -> Result<()> {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/api/health"))
    .respond_with(
      ResponseTemplate::new(200).set_body_json(json!({"status": "ok", "server": "learnora-search"})),
    )
    .mount(&server)
    .await;

  let health = client_for(&server).await.health().await?;
  assert!(health.is_ok());
  assert_eq!(health.server.as_deref(), Some("learnora-search"));
  Ok(())
}

#[tokio::test]
async fn test_base_url_is_reported_as_configured() {
  let server = MockServer::start().await;
  let client = client_for(&server).await;
  assert_eq!(client.base_url(), server.uri());
}
