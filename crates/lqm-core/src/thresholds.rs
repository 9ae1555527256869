//! Threshold values for latency, jitter, and packet loss.

use crate::error::{LqmError, Result};
use serde::{Deserialize, Serialize};

/// Maximum latency, jitter, and packet loss before a link is flagged.
///
/// A `None` value was not provided (an empty CSV cell) and is sent to the
/// controller as `null`. Values from the command line are always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds {
    pub latency: Option<u32>,
    pub jitter: Option<u32>,
    pub packet_loss: Option<u32>,
}

impl Thresholds {
    /// Build thresholds from present values.
    pub fn new(latency: u32, jitter: u32, packet_loss: u32) -> Self {
        Self {
            latency: Some(latency),
            jitter: Some(jitter),
            packet_loss: Some(packet_loss),
        }
    }

    /// Build thresholds from signed input, rejecting negatives.
    pub fn from_signed(latency: i64, jitter: i64, packet_loss: i64) -> Result<Self> {
        Self::from_optional(Some(latency), Some(jitter), Some(packet_loss))
    }

    /// Build thresholds from raw CSV cells.
    ///
    /// Cells are trimmed. An empty cell is an absent value. Integral decimals
    /// such as `25.0` are accepted since spreadsheet exports produce them.
    pub fn from_cells(latency: &str, jitter: &str, packet_loss: &str) -> Result<Self> {
        Self::from_optional(
            parse_cell("latency", latency)?,
            parse_cell("jitter", jitter)?,
            parse_cell("packetloss", packet_loss)?,
        )
    }

    fn from_optional(latency: Option<i64>, jitter: Option<i64>, packet_loss: Option<i64>) -> Result<Self> {
        let invalid = || LqmError::InvalidThresholds {
            latency: latency.unwrap_or(0),
            jitter: jitter.unwrap_or(0),
            packet_loss: packet_loss.unwrap_or(0),
        };
        let convert = |v: Option<i64>| -> Result<Option<u32>> {
            match v {
                None => Ok(None),
                Some(n) => u32::try_from(n).map(Some).map_err(|_| invalid()),
            }
        };

        Ok(Self {
            latency: convert(latency)?,
            jitter: convert(jitter)?,
            packet_loss: convert(packet_loss)?,
        })
    }

    pub fn latency_enabled(&self) -> bool {
        enabled(self.latency)
    }

    pub fn jitter_enabled(&self) -> bool {
        enabled(self.jitter)
    }

    pub fn packet_loss_enabled(&self) -> bool {
        enabled(self.packet_loss)
    }
}

/// A metric is enforced only when it has a non-zero limit.
fn enabled(value: Option<u32>) -> bool {
    matches!(value, Some(v) if v > 0)
}

fn parse_cell(field: &'static str, raw: &str) -> Result<Option<i64>> {
    let cell = raw.trim();
    if cell.is_empty() {
        return Ok(None);
    }

    let integral = match cell.split_once('.') {
        Some((whole, frac)) if frac.bytes().all(|b| b == b'0') => whole,
        Some(_) => cell,
        None => cell,
    };

    integral
        .parse::<i64>()
        .map(Some)
        .map_err(|_| LqmError::InvalidValue {
            field,
            value: cell.to_string(),
        })
}
