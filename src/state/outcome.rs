//! Status outcome definitions for verified links
//!
//! This module defines every terminal outcome a link check can end in, and
//! the severity ranking used to order the final report.

use serde::Serialize;
use std::fmt;

/// The terminal result of checking a single link or fetching a single page
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum StatusOutcome {
    // ===== Success =====
    /// Server answered with a 1xx, 2xx or 3xx status
    Ok(u16),

    // ===== HTTP Errors =====
    /// Server answered with a 4xx status (deterministic, never retried)
    ClientError(u16),

    /// Server answered with a 5xx status (transient, retried)
    ServerError(u16),

    // ===== Transport Errors =====
    /// The attempt did not complete within the configured timeout
    Timeout,

    /// DNS failure, refused connection, TLS failure or a dropped stream
    ConnectionError,

    // ===== Not Checked =====
    /// The href could not be resolved into a valid URL
    Malformed,

    /// The link is not an HTTP(S) resource and was never checked
    Unverifiable(String),
}

impl StatusOutcome {
    /// Maps an HTTP status code to an outcome
    pub fn from_status(code: u16) -> Self {
        match code {
            400..=499 => Self::ClientError(code),
            500.. => Self::ServerError(code),
            _ => Self::Ok(code),
        }
    }

    /// Returns true if the link answered successfully
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    /// Returns true if this outcome belongs in the broken-link report
    pub fn is_broken(&self) -> bool {
        !matches!(self, Self::Ok(_) | Self::Unverifiable(_))
    }

    /// Returns true if another attempt might produce a different outcome
    ///
    /// Timeouts, connection failures and 5xx responses are transient.
    /// 4xx responses are a deliberate server decision and never retried.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout | Self::ConnectionError | Self::ServerError(_)
        )
    }

    /// Returns the HTTP status code, if the server answered at all
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Ok(code) | Self::ClientError(code) | Self::ServerError(code) => Some(*code),
            _ => None,
        }
    }

    /// Returns the severity rank of this outcome
    pub fn severity(&self) -> Severity {
        match self {
            Self::Timeout | Self::ConnectionError => Severity::Network,
            Self::ServerError(_) => Severity::ServerError,
            Self::ClientError(_) => Severity::ClientError,
            _ => Severity::Other,
        }
    }

    /// Short label used in CSV and Markdown reports
    ///
    /// HTTP outcomes render as their status code, everything else as a
    /// snake_case keyword.
    pub fn label(&self) -> String {
        match self {
            Self::Ok(code) | Self::ClientError(code) | Self::ServerError(code) => code.to_string(),
            Self::Timeout => "timeout".to_string(),
            Self::ConnectionError => "connection_error".to_string(),
            Self::Malformed => "malformed".to_string(),
            Self::Unverifiable(_) => "unverifiable".to_string(),
        }
    }
}

impl fmt::Display for StatusOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok(code) => write!(f, "OK ({})", code),
            Self::ClientError(code) => write!(f, "client error ({})", code),
            Self::ServerError(code) => write!(f, "server error ({})", code),
            Self::Timeout => write!(f, "timeout"),
            Self::ConnectionError => write!(f, "connection error"),
            Self::Malformed => write!(f, "malformed URL"),
            Self::Unverifiable(reason) => write!(f, "unverifiable ({})", reason),
        }
    }
}

/// Severity ranking used only for ordering the final report
///
/// Variants are declared from least to most severe so the derived `Ord`
/// matches the ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Anything that is not an HTTP or transport failure
    Other,

    /// 4xx responses
    ClientError,

    /// 5xx responses
    ServerError,

    /// Timeouts and connection failures
    Network,
}
