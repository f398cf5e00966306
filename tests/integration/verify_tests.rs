//! Link verification: HEAD fallback, retries, ordering and concurrency

use crate::common::{find, html, links_page, request_count, run, test_config, url_of};
use std::time::Duration;
use sumi_linkcheck::{CrawlConfig, LinkType, Severity, StatusOutcome};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mounts a base page linking to the given paths on `external`
async fn base_linking_to(site: &MockServer, external: &MockServer, paths: &[&str]) {
    let links: Vec<String> = paths.iter().map(|p| url_of(external, p)).collect();
    let hrefs: Vec<&str> = links.iter().map(String::as_str).collect();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(links_page(&hrefs))
        .mount(site)
        .await;
}

fn outcome_of(report: &sumi_linkcheck::crawler::CheckReport, site: &MockServer, link: &str) -> StatusOutcome {
    find(report, &url_of(site, "/"), link)
        .unwrap_or_else(|| panic!("no record for {}", link))
        .outcome
        .clone()
}

#[tokio::test]
async fn test_head_rejected_falls_back_to_get() {
    let site = MockServer::start().await;
    let external = MockServer::start().await;
    base_linking_to(&site, &external, &["/no-head"]).await;

    Mock::given(method("HEAD"))
        .and(path("/no-head"))
        .respond_with(ResponseTemplate::new(405))
        .expect(1)
        .mount(&external)
        .await;

    Mock::given(method("GET"))
        .and(path("/no-head"))
        .respond_with(html("<p>fine</p>"))
        .expect(1)
        .mount(&external)
        .await;

    let report = run(test_config(&site.uri())).await;

    assert_eq!(
        outcome_of(&report, &site, &url_of(&external, "/no-head")),
        StatusOutcome::Ok(200)
    );
    assert!(report.broken().is_empty());
}

#[tokio::test]
async fn test_get_fallback_reports_get_outcome() {
    let site = MockServer::start().await;
    let external = MockServer::start().await;
    base_linking_to(&site, &external, &["/gone"]).await;

    Mock::given(method("HEAD"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(501))
        .mount(&external)
        .await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&external)
        .await;

    let report = run(test_config(&site.uri())).await;

    assert_eq!(
        outcome_of(&report, &site, &url_of(&external, "/gone")),
        StatusOutcome::ClientError(404)
    );
}

#[tokio::test]
async fn test_head_disabled_uses_get_only() {
    let site = MockServer::start().await;
    let external = MockServer::start().await;
    base_linking_to(&site, &external, &["/page"]).await;

    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&external)
        .await;

    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(html("<p>page</p>"))
        .expect(1)
        .mount(&external)
        .await;

    let mut config = test_config(&site.uri());
    config.use_head = false;
    let report = run(config).await;

    assert_eq!(
        outcome_of(&report, &site, &url_of(&external, "/page")),
        StatusOutcome::Ok(200)
    );
}

#[tokio::test]
async fn test_timeout_then_success_with_one_retry() {
    let site = MockServer::start().await;
    let external = MockServer::start().await;
    base_linking_to(&site, &external, &["/slow"]).await;

    // First attempt outlives the timeout, the second answers at once
    Mock::given(method("HEAD"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .up_to_n_times(1)
        .mount(&external)
        .await;

    Mock::given(method("HEAD"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&external)
        .await;

    let mut config = test_config(&site.uri());
    config.timeout_ms = 500;
    config.retries = 1;
    let report = run(config).await;

    assert_eq!(
        outcome_of(&report, &site, &url_of(&external, "/slow")),
        StatusOutcome::Ok(200)
    );
    assert_eq!(request_count(&external, "HEAD", "/slow").await, 2);
}

#[tokio::test]
async fn test_timeout_without_retries_is_broken() {
    let site = MockServer::start().await;
    let external = MockServer::start().await;
    base_linking_to(&site, &external, &["/slow"]).await;

    Mock::given(method("HEAD"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&external)
        .await;

    let mut config = test_config(&site.uri());
    config.timeout_ms = 500;
    let report = run(config).await;

    assert_eq!(
        outcome_of(&report, &site, &url_of(&external, "/slow")),
        StatusOutcome::Timeout
    );
    assert_eq!(report.broken().len(), 1);
}

#[tokio::test]
async fn test_client_error_not_retried() {
    let site = MockServer::start().await;
    let external = MockServer::start().await;
    base_linking_to(&site, &external, &["/missing"]).await;

    Mock::given(method("HEAD"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&external)
        .await;

    let mut config = test_config(&site.uri());
    config.retries = 3;
    let report = run(config).await;

    assert_eq!(
        outcome_of(&report, &site, &url_of(&external, "/missing")),
        StatusOutcome::ClientError(404)
    );
}

#[tokio::test]
async fn test_server_error_retried() {
    let site = MockServer::start().await;
    let external = MockServer::start().await;
    base_linking_to(&site, &external, &["/flaky"]).await;

    Mock::given(method("HEAD"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&external)
        .await;

    Mock::given(method("HEAD"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&external)
        .await;

    let mut config = test_config(&site.uri());
    config.retries = 1;
    let report = run(config).await;

    assert_eq!(
        outcome_of(&report, &site, &url_of(&external, "/flaky")),
        StatusOutcome::Ok(200)
    );
}

#[tokio::test]
async fn test_connection_error_reported() {
    // Reserve a free port, then release it so nothing is listening
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let dead_link = format!("http://127.0.0.1:{}/", port);

    let site = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(links_page(&[&dead_link]))
        .mount(&site)
        .await;

    let report = run(test_config(&site.uri())).await;

    let outcome = outcome_of(&report, &site, &dead_link);
    assert_eq!(outcome, StatusOutcome::ConnectionError);
    assert_eq!(outcome.severity(), Severity::Network);
}

#[tokio::test]
async fn test_broken_links_ordered_by_severity() {
    let site = MockServer::start().await;
    let external = MockServer::start().await;
    base_linking_to(&site, &external, &["/a-missing", "/b-slow", "/c-down", "/d-ok"]).await;

    Mock::given(method("HEAD"))
        .and(path("/a-missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&external)
        .await;

    Mock::given(method("HEAD"))
        .and(path("/b-slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&external)
        .await;

    Mock::given(method("HEAD"))
        .and(path("/c-down"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&external)
        .await;

    Mock::given(method("HEAD"))
        .and(path("/d-ok"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&external)
        .await;

    let mut config = test_config(&site.uri());
    config.timeout_ms = 500;
    let report = run(config).await;

    let outcomes: Vec<_> = report.broken().iter().map(|r| r.outcome.clone()).collect();
    assert_eq!(
        outcomes,
        vec![
            StatusOutcome::Timeout,
            StatusOutcome::ServerError(503),
            StatusOutcome::ClientError(404),
        ]
    );
    assert!(report.broken().iter().all(|r| r.link_type == LinkType::External));
}

async fn mount_mixed_site(site: &MockServer, external: &MockServer) {
    let paths: Vec<String> = (0..12).map(|i| format!("/link{}", i)).collect();
    let path_refs: Vec<&str> = paths.iter().map(String::as_str).collect();
    base_linking_to(site, external, &path_refs).await;

    for (i, link_path) in paths.iter().enumerate() {
        let status = match i % 4 {
            0 => 200,
            1 => 404,
            2 => 500,
            _ => 301,
        };
        Mock::given(method("HEAD"))
            .and(path(link_path.as_str()))
            .respond_with(ResponseTemplate::new(status).insert_header("location", "/"))
            .mount(external)
            .await;
    }

    Mock::given(method("HEAD"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(external)
        .await;
}

fn concurrent_config(base_url: &str, limit: usize) -> CrawlConfig {
    let mut config = test_config(base_url);
    config.concurrency_limit = limit;
    config
}

#[tokio::test]
async fn test_concurrent_matches_sequential() {
    let site = MockServer::start().await;
    let external = MockServer::start().await;
    mount_mixed_site(&site, &external).await;

    let sequential = run(concurrent_config(&site.uri(), 1)).await;
    let concurrent = run(concurrent_config(&site.uri(), 8)).await;

    assert_eq!(sequential.records.len(), 12);
    assert_eq!(sequential.records, concurrent.records);
    assert_eq!(sequential.broken().len(), 6);
}

#[tokio::test]
async fn test_rechecking_unchanged_site_is_stable() {
    let site = MockServer::start().await;
    let external = MockServer::start().await;
    mount_mixed_site(&site, &external).await;

    let first = run(test_config(&site.uri())).await;
    let second = run(test_config(&site.uri())).await;

    assert_eq!(first.records, second.records);
}
