mod common;

use axum::http::{HeaderValue, header};
use axum_test::TestServer;
use shorturl::domain::entities::NewUrlRecord;
use shorturl::domain::repositories::UrlRepository;

#[tokio::test]
async fn test_dashboard_lists_links_with_clicks() {
    let (state, _rx, repo) = common::create_test_state();
    let record = repo
        .create(NewUrlRecord::new("dash01", "https://example.com/dashboard"))
        .await
        .unwrap();
    repo.increment_clicks(record.id).await.unwrap();
    repo.increment_clicks(record.id).await.unwrap();

    let server = TestServer::new(common::test_app(state)).unwrap();

    let response = server
        .get("/shorturl/private")
        .add_header(
            header::AUTHORIZATION,
            HeaderValue::from_static(common::ADMIN_AUTH_HEADER),
        )
        .await;

    response.assert_status_ok();

    let body = response.text();
    assert!(body.contains("http://localhost:8000/dash01"));
    assert!(body.contains("https://example.com/dashboard"));
    assert!(body.contains("<td class=\"num\">2</td>"));
}

#[tokio::test]
async fn test_dashboard_paginates() {
    let (state, _rx, repo) = common::create_test_state();
    for i in 0..3 {
        repo.create(NewUrlRecord::new(
            format!("page{i:02}"),
            format!("https://example.com/{i}"),
        ))
        .await
        .unwrap();
    }

    let server = TestServer::new(common::test_app(state)).unwrap();

    let response = server
        .get("/shorturl/private")
        .add_query_param("page", 2)
        .add_query_param("page_size", 2)
        .add_header(
            header::AUTHORIZATION,
            HeaderValue::from_static(common::ADMIN_AUTH_HEADER),
        )
        .await;

    response.assert_status_ok();

    // Newest first: page 2 holds only the oldest record.
    let body = response.text();
    assert!(body.contains("page00"));
    assert!(!body.contains("page02"));
    assert!(body.contains("Page 2 of 2"));
}

#[tokio::test]
async fn test_dashboard_wrong_password() {
    let (state, _rx, _repo) = common::create_test_state();
    let server = TestServer::new(common::test_app(state)).unwrap();

    // admin:wrong
    let response = server
        .get("/shorturl/private")
        .add_header(
            header::AUTHORIZATION,
            HeaderValue::from_static("Basic YWRtaW46d3Jvbmc="),
        )
        .await;

    response.assert_status_unauthorized();
    assert!(
        response
            .header(header::WWW_AUTHENTICATE)
            .to_str()
            .unwrap()
            .starts_with("Basic")
    );
}

#[tokio::test]
async fn test_dashboard_missing_credentials() {
    let (state, _rx, _repo) = common::create_test_state();
    let server = TestServer::new(common::test_app(state)).unwrap();

    let response = server.get("/shorturl/private").await;

    response.assert_status_unauthorized();
    assert!(response.maybe_header(header::WWW_AUTHENTICATE).is_some());
}

#[tokio::test]
async fn test_dashboard_page_past_end_shows_last_page() {
    let (state, _rx, repo) = common::create_test_state();
    for i in 0..3 {
        repo.create(NewUrlRecord::new(
            format!("last{i:02}"),
            format!("https://example.com/{i}"),
        ))
        .await
        .unwrap();
    }

    let server = TestServer::new(common::test_app(state)).unwrap();

    let response = server
        .get("/shorturl/private")
        .add_query_param("page", i64::MAX)
        .add_query_param("page_size", 2)
        .add_header(
            header::AUTHORIZATION,
            HeaderValue::from_static(common::ADMIN_AUTH_HEADER),
        )
        .await;

    response.assert_status_ok();

    let body = response.text();
    assert!(body.contains("last00"));
    assert!(body.contains("Page 2 of 2"));
}
