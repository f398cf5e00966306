//! Traversal behavior: budgets, deduplication, leaf pages and failures

use crate::common::{checker, find, html, links_page, request_count, run, test_config, url_of};
use std::sync::Arc;
use sumi_linkcheck::checker::CheckObserver;
use sumi_linkcheck::crawler::{BasePageStatus, CancellationToken, RunState};
use sumi_linkcheck::{LinkRecord, LinkType, StatusOutcome};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_broken_link_scenario() {
    let site = MockServer::start().await;
    let external = MockServer::start().await;
    let external_link = url_of(&external, "/");

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(links_page(&["/about", "/missing", &external_link]))
        .mount(&site)
        .await;

    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(html("<html><body>About us</body></html>"))
        .mount(&site)
        .await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&site)
        .await;

    Mock::given(method("HEAD"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&external)
        .await;

    let mut config = test_config(&site.uri());
    config.max_depth = 1;
    let report = run(config).await;

    assert_eq!(report.base_status, BasePageStatus::Reachable(StatusOutcome::Ok(200)));
    assert_eq!(report.state, RunState::Completed);

    let base = url_of(&site, "/");
    let broken: Vec<LinkRecord> = report.broken().into_iter().cloned().collect();
    assert_eq!(
        broken,
        vec![LinkRecord::new(
            base.as_str(),
            url_of(&site, "/missing"),
            LinkType::Internal,
            StatusOutcome::ClientError(404)
        )]
    );

    let external_record = find(&report, &base, &external_link).expect("external link recorded");
    assert_eq!(external_record.link_type, LinkType::External);
    assert_eq!(external_record.outcome, StatusOutcome::Ok(200));
}

#[tokio::test]
async fn test_page_budget_respected() {
    let site = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(links_page(&["/p1", "/p2", "/p3", "/p4", "/p5"]))
        .mount(&site)
        .await;

    for page in ["/p1", "/p2", "/p3", "/p4", "/p5"] {
        Mock::given(method("GET"))
            .and(path(page))
            .respond_with(html("<p>leaf</p>"))
            .mount(&site)
            .await;
    }

    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&site)
        .await;

    let mut config = test_config(&site.uri());
    config.max_pages = 3;
    let report = run(config).await;

    assert_eq!(report.pages_fetched, 3);

    let gets = site
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.method.to_string() == "GET")
        .count();
    assert_eq!(gets, 3);

    // Pages beyond the budget are still checked
    assert!(report.broken().is_empty());
    assert_eq!(report.links_checked(), 5);
}

#[tokio::test]
async fn test_depth_limit_checks_without_crawling() {
    let site = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(links_page(&["/level1"]))
        .mount(&site)
        .await;

    Mock::given(method("GET"))
        .and(path("/level1"))
        .respond_with(links_page(&["/level2"]))
        .mount(&site)
        .await;

    Mock::given(method("GET"))
        .and(path("/level2"))
        .respond_with(links_page(&["/level3"]))
        .expect(0) // Beyond max_depth=1
        .mount(&site)
        .await;

    Mock::given(method("HEAD"))
        .and(path("/level2"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&site)
        .await;

    let mut config = test_config(&site.uri());
    config.max_depth = 1;
    let report = run(config).await;

    assert_eq!(report.pages_fetched, 2);
    let record = find(&report, &url_of(&site, "/level1"), &url_of(&site, "/level2"))
        .expect("deep link recorded");
    assert_eq!(record.outcome, StatusOutcome::Ok(200));
    assert!(report.records.iter().all(|r| !r.link_url.ends_with("/level3")));
}

#[tokio::test]
async fn test_no_page_fetched_twice() {
    let site = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(links_page(&["/a", "/b", "/a#section", "/A/../a"]))
        .expect(1)
        .mount(&site)
        .await;

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(links_page(&["/b", "/", "/a"]))
        .expect(1)
        .mount(&site)
        .await;

    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(links_page(&["/a", "/"]))
        .expect(1)
        .mount(&site)
        .await;

    let mut config = test_config(&site.uri());
    config.max_depth = 5;
    let report = run(config).await;

    assert_eq!(report.pages_fetched, 3);
    assert_eq!(request_count(&site, "HEAD", "/a").await, 0);

    // Fragment variants collapse into one record per page
    let base = url_of(&site, "/");
    let to_a = report
        .records
        .iter()
        .filter(|r| r.source_page == base && r.link_url == url_of(&site, "/a"))
        .count();
    assert_eq!(to_a, 1);
}

#[tokio::test]
async fn test_non_html_page_is_leaf() {
    let site = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(links_page(&["/manual.pdf"]))
        .mount(&site)
        .await;

    Mock::given(method("GET"))
        .and(path("/manual.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"<a href="/hidden">hidden</a>"#, "application/pdf"),
        )
        .expect(1)
        .mount(&site)
        .await;

    Mock::given(method("GET"))
        .and(path("/hidden"))
        .respond_with(html("<p>hidden</p>"))
        .expect(0)
        .mount(&site)
        .await;

    let report = run(test_config(&site.uri())).await;

    assert_eq!(report.pages_fetched, 2);
    let record = find(&report, &url_of(&site, "/"), &url_of(&site, "/manual.pdf"))
        .expect("pdf link recorded");
    assert_eq!(record.outcome, StatusOutcome::Ok(200));
    assert_eq!(request_count(&site, "HEAD", "/hidden").await, 0);
}

#[tokio::test]
async fn test_failed_page_recorded_against_referrer() {
    let site = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(links_page(&["/a", "/c"]))
        .mount(&site)
        .await;

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(links_page(&["/gone"]))
        .mount(&site)
        .await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(410))
        .expect(1)
        .mount(&site)
        .await;

    // Crawl continues past the failure
    Mock::given(method("GET"))
        .and(path("/c"))
        .respond_with(html("<p>still crawled</p>"))
        .expect(1)
        .mount(&site)
        .await;

    let report = run(test_config(&site.uri())).await;

    let broken = report.broken();
    assert_eq!(broken.len(), 1);
    assert_eq!(broken[0].source_page, url_of(&site, "/a"));
    assert_eq!(broken[0].link_url, url_of(&site, "/gone"));
    assert_eq!(broken[0].outcome, StatusOutcome::ClientError(410));
    assert_eq!(report.pages_fetched, 4);
}

#[tokio::test]
async fn test_base_page_unreachable() {
    let site = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&site)
        .await;

    let report = run(test_config(&site.uri())).await;

    assert_eq!(
        report.base_status,
        BasePageStatus::Unreachable(StatusOutcome::ClientError(404))
    );
    assert!(report.records.is_empty());
    assert_eq!(report.pages_fetched, 1);
}

#[tokio::test]
async fn test_anchors_and_special_schemes_not_requested() {
    let site = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(links_page(&[
            "#top",
            "mailto:team@example.com",
            "javascript:void(0)",
            "tel:+15555550100",
        ]))
        .expect(1)
        .mount(&site)
        .await;

    let report = run(test_config(&site.uri())).await;

    assert_eq!(report.records.len(), 4);
    assert!(report.records.iter().all(|r| r.link_type == LinkType::Anchor));
    assert!(report.broken().is_empty());
    assert_eq!(report.links_checked(), 0);
}

#[tokio::test]
async fn test_redirected_page_links_resolve_against_final_url() {
    let site = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(links_page(&["/old"]))
        .mount(&site)
        .await;

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/docs/index.html"))
        .mount(&site)
        .await;

    Mock::given(method("GET"))
        .and(path("/docs/index.html"))
        .respond_with(links_page(&["page"]))
        .mount(&site)
        .await;

    Mock::given(method("GET"))
        .and(path("/docs/page"))
        .respond_with(html("<p>page</p>"))
        .mount(&site)
        .await;

    let report = run(test_config(&site.uri())).await;

    let record = find(&report, &url_of(&site, "/old"), &url_of(&site, "/docs/page"))
        .expect("link on redirected page recorded");
    assert_eq!(record.outcome, StatusOutcome::Ok(200));
}

#[tokio::test]
async fn test_off_site_redirect_target_not_crawled() {
    let site = MockServer::start().await;
    let external = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(links_page(&["/go"]))
        .mount(&site)
        .await;

    Mock::given(method("GET"))
        .and(path("/go"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("location", url_of(&external, "/landing").as_str()),
        )
        .mount(&site)
        .await;

    Mock::given(method("GET"))
        .and(path("/landing"))
        .respond_with(links_page(&["/ext-a", "/ext-b"]))
        .expect(1)
        .mount(&external)
        .await;

    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(404))
        .expect(0)
        .mount(&external)
        .await;

    let report = run(test_config(&site.uri())).await;

    let record = find(&report, &url_of(&site, "/"), &url_of(&site, "/go"))
        .expect("redirecting link recorded");
    assert_eq!(record.outcome, StatusOutcome::Ok(200));
    assert!(report.records.iter().all(|r| r.source_page != url_of(&site, "/go")));
    assert!(report.broken().is_empty());
}

#[tokio::test]
async fn test_latin1_page_links_extracted() {
    let site = MockServer::start().await;

    // "Café" in ISO-8859-1 is not valid UTF-8
    let mut body = b"<html><body><p>Caf\xe9</p>".to_vec();
    body.extend_from_slice(br#"<a href="/missing">missing</a></body></html>"#);

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=iso-8859-1"))
        .mount(&site)
        .await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&site)
        .await;

    let report = run(test_config(&site.uri())).await;

    let broken = report.broken();
    assert_eq!(broken.len(), 1);
    assert_eq!(broken[0].link_url, url_of(&site, "/missing"));
    assert_eq!(broken[0].outcome, StatusOutcome::ClientError(404));
}

/// Cancels the run as soon as the first page has been fetched
struct CancelAfterFirstPage {
    token: CancellationToken,
}

impl CheckObserver for CancelAfterFirstPage {
    fn on_page_fetched(&self, _url: &Url, _depth: u32, _outcome: &StatusOutcome) {
        self.token.cancel();
    }
}

#[tokio::test]
async fn test_cancellation_keeps_only_resolved_records() {
    let site = MockServer::start().await;
    let external = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(links_page(&["/next", &url_of(&external, "/x"), "#top"]))
        .mount(&site)
        .await;

    Mock::given(method("GET"))
        .and(path("/next"))
        .respond_with(html("<p>next</p>"))
        .expect(0)
        .mount(&site)
        .await;

    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&external)
        .await;

    let token = CancellationToken::new();
    let report = checker(test_config(&site.uri()))
        .with_observer(Arc::new(CancelAfterFirstPage {
            token: token.clone(),
        }))
        .run(&token)
        .await
        .expect("Check failed");

    assert_eq!(report.state, RunState::Cancelled);
    assert!(report.base_status.is_reachable());
    assert_eq!(report.pages_fetched, 1);

    // Only the anchor was resolved before cancellation
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].link_type, LinkType::Anchor);
}

#[tokio::test]
async fn test_cancelled_before_start() {
    let site = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(html("<p>never</p>"))
        .expect(0)
        .mount(&site)
        .await;

    let token = CancellationToken::new();
    token.cancel();
    let report = checker(test_config(&site.uri()))
        .run(&token)
        .await
        .expect("Check failed");

    assert_eq!(report.state, RunState::Cancelled);
    assert_eq!(report.base_status, BasePageStatus::NotChecked);
    assert!(report.records.is_empty());
}
