//! Link state tracking for Sumi-Linkcheck
//!
//! This module defines the value types that flow out of a check run:
//! outcomes, severities, link types and the records that tie them together.

mod outcome;
mod record;

pub use outcome::{Severity, StatusOutcome};
pub use record::{LinkRecord, LinkType};
