//! The three kinds of LQM threshold extension.

use crate::error::LqmError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of LQM threshold being configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LqmKind {
    /// Media thresholds on every VPN path of a site.
    Media,
    /// Thresholds for one application on one element.
    App,
    /// Thresholds for all applications on one element.
    AllApps,
}

impl LqmKind {
    /// All kinds, in the order they are offered to users.
    pub const ALL: [LqmKind; 3] = [LqmKind::Media, LqmKind::AllApps, LqmKind::App];

    /// Name used on the command line and in messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Media => "media",
            Self::App => "app",
            Self::AllApps => "all_apps",
        }
    }

    /// Extension namespace the controller files these thresholds under.
    pub fn namespace(self) -> &'static str {
        match self {
            Self::Media => "thresholds/lqm/media",
            Self::App => "thresholds/lqm/app",
            Self::AllApps => "thresholds/lqm/app/all",
        }
    }

    /// Columns a CSV batch file for this kind must carry.
    pub fn csv_header(self) -> &'static [&'static str] {
        match self {
            Self::Media => &["site", "latency", "jitter", "packetloss"],
            Self::App => &["site", "element", "app", "latency", "jitter", "packetloss"],
            Self::AllApps => &["site", "element", "latency", "jitter", "packetloss"],
        }
    }

    /// Media thresholds attach to VPN paths, which only topology reveals.
    pub fn needs_topology(self) -> bool {
        matches!(self, Self::Media)
    }

    /// Check a CSV header against [`Self::csv_header`].
    ///
    /// Column order is irrelevant and surrounding whitespace is ignored,
    /// but every expected name must appear exactly once.
    pub fn check_header<S: AsRef<str>>(self, found: &[S]) -> Result<(), LqmError> {
        let expected = self.csv_header();
        let mut have: Vec<&str> = found.iter().map(|c| c.as_ref().trim()).collect();
        have.sort_unstable();
        let mut want: Vec<&str> = expected.to_vec();
        want.sort_unstable();

        if have == want {
            Ok(())
        } else {
            Err(LqmError::CsvHeader {
                expected: expected.to_vec(),
                found: found.iter().map(|c| c.as_ref().to_string()).collect(),
            })
        }
    }
}

impl fmt::Display for LqmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LqmKind {
    type Err = LqmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "media" => Ok(Self::Media),
            "app" => Ok(Self::App),
            "all_apps" => Ok(Self::AllApps),
            other => Err(LqmError::InvalidKind(other.to_string())),
        }
    }
}
