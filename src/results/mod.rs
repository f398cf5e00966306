//! Result aggregation for check runs
//!
//! Records from the crawl and the verification pass are collected here,
//! deduplicated by `(source_page, link_url)`, and handed out in report order.

mod aggregator;

pub use aggregator::ResultAggregator;
