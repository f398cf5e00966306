//! Crawler module for page fetching and run coordination
//!
//! This module contains the core crawling logic, including:
//! - The HTTP capability and its reqwest implementation
//! - Page fetching with retry logic
//! - HTML link extraction
//! - The breadth-first frontier
//! - Overall run coordination and cancellation

pub mod cancel;
pub mod client;
mod coordinator;
mod fetcher;
mod frontier;
mod parser;
pub(crate) mod retry;

pub use cancel::{spawn_interrupt_listener, CancellationToken};
pub use client::{build_http_client, HttpClient, HttpResponse, ProbeMethod, ReqwestClient, TransportError};
pub use coordinator::{BasePageStatus, CheckReport, LinkChecker, RunState};
pub use fetcher::{fetch_page, FetchError, PageResult};
pub use frontier::{CrawlTask, Frontier};
pub use parser::{extract_links, is_html};
pub use retry::RetryPolicy;
