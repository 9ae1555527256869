//! Error type for name resolution and request validation.

use crate::kind::LqmKind;
use thiserror::Error;

/// Result alias for lqm-core operations.
pub type Result<T> = std::result::Result<T, LqmError>;

/// Errors raised while validating a request or resolving its names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LqmError {
    /// The LQM type string is not one of the supported kinds.
    #[error("Invalid LQM type {0:?}. Please choose from: media, all_apps, app")]
    InvalidKind(String),

    /// At least one threshold value is negative.
    #[error("Invalid LQM Threshold values: {latency} {jitter} {packet_loss}")]
    InvalidThresholds {
        latency: i64,
        jitter: i64,
        packet_loss: i64,
    },

    /// A threshold cell could not be read as an integer.
    #[error("Invalid value {value:?} for {field}")]
    InvalidValue { field: &'static str, value: String },

    /// The request lacks a name its kind requires.
    #[error("Missing {field} for LQM type {kind}")]
    MissingField { kind: LqmKind, field: &'static str },

    /// Site name not present in the catalog.
    #[error("Site {0} does not exist")]
    UnknownSite(String),

    /// Element name not present in the catalog.
    #[error("Element {0} does not exist")]
    UnknownElement(String),

    /// Application name not present in the catalog.
    #[error("App {0} does not exist")]
    UnknownApp(String),

    /// The element exists but is attached to a different site.
    #[error("Element {element} is not assigned to site {site}")]
    ElementNotInSite { element: String, site: String },

    /// Topology for the site could not be read, so its VPN paths are unknown.
    #[error("Topology for site {0} is unavailable")]
    TopologyUnavailable(String),

    /// CSV header does not match the columns the kind expects.
    #[error("CSV header not in expected format. Please make sure the headers are {expected:?}")]
    CsvHeader {
        expected: Vec<&'static str>,
        found: Vec<String>,
    },
}

impl LqmError {
    /// Whether this error stops the whole run rather than a single row.
    ///
    /// Unknown names abort, matching the controller-facing contract that a
    /// batch never runs against a site it cannot resolve.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::UnknownSite(_)
                | Self::UnknownElement(_)
                | Self::UnknownApp(_)
                | Self::ElementNotInSite { .. }
                | Self::CsvHeader { .. }
                | Self::InvalidKind(_)
        )
    }
}
