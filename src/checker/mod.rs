//! Link verification
//!
//! This module decides whether individual link targets are alive:
//! - HEAD probes with a GET fallback for servers that reject HEAD
//! - Bounded retries for transient failures
//! - Sequential or pooled execution of a batch of checks
//! - Progress callbacks for front ends

mod executor;
mod observer;
mod verifier;

pub use executor::ExecutionStrategy;
pub use observer::{CheckObserver, NoopObserver};
pub use verifier::LinkVerifier;
