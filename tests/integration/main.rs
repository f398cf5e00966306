//! Integration tests for Sumi-Linkcheck
//!
//! These tests use wiremock to create mock HTTP servers and drive full check
//! runs through the real reqwest client.

mod common;
mod crawl_tests;
mod verify_tests;
