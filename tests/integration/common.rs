//! Shared helpers for the integration tests

use sumi_linkcheck::config::UserAgentConfig;
use sumi_linkcheck::crawler::{CancellationToken, CheckReport, LinkChecker};
use sumi_linkcheck::{CrawlConfig, LinkRecord};
use wiremock::{MockServer, ResponseTemplate};

/// Creates a test configuration with short timeouts and no retries
pub fn test_config(base_url: &str) -> CrawlConfig {
    let mut config = CrawlConfig::new(base_url);
    config.max_depth = 2;
    config.max_pages = 50;
    config.timeout_ms = 2_000;
    config.retries = 0;
    config.backoff_ms = 0;
    config
}

/// Builds a checker that identifies itself as a test bot
pub fn checker(config: CrawlConfig) -> LinkChecker {
    let user_agent = UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0.0".to_string(),
    };
    LinkChecker::new(config, &user_agent).expect("Failed to create checker")
}

/// Runs a check to completion
pub async fn run(config: CrawlConfig) -> CheckReport {
    checker(config)
        .run(&CancellationToken::new())
        .await
        .expect("Check failed")
}

/// An HTML page response
pub fn html(body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.into(), "text/html")
}

/// An HTML page containing one anchor per href
pub fn links_page(hrefs: &[&str]) -> ResponseTemplate {
    let anchors: String = hrefs
        .iter()
        .map(|href| format!("<a href=\"{}\">{}</a>\n", href, href))
        .collect();
    html(format!(
        "<html><head><title>Test</title></head><body>\n{}</body></html>",
        anchors
    ))
}

/// Canonical URL of a path on a mock server
pub fn url_of(server: &MockServer, path: &str) -> String {
    format!("{}{}", server.uri(), path)
}

/// Number of requests with the given method and path the server received
pub async fn request_count(server: &MockServer, http_method: &str, request_path: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.method.to_string() == http_method && r.url.path() == request_path)
        .count()
}

/// Finds the record for a (source, link) pair
pub fn find<'a>(report: &'a CheckReport, source_page: &str, link_url: &str) -> Option<&'a LinkRecord> {
    report
        .records
        .iter()
        .find(|r| r.source_page == source_page && r.link_url == link_url)
}
