//! Price value types for the feed model.

use serde::{Deserialize, Serialize};

/// A fixed-point price with its confidence interval.
///
/// Represents `price * 10^expo` with an uncertainty band of
/// `conf * 10^expo`. The raw components stay as strings to avoid precision
/// loss; use the explicitly lossy helpers when an `f64` is acceptable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Raw price component (decimal integer as a string).
    pub price: String,

    /// Raw confidence component (decimal integer as a string).
    pub conf: String,

    /// Power-of-ten scale shared by `price` and `conf` (e.g. -8).
    pub expo: i32,
}

impl Price {
    /// Lossy conversion of the price to a float: `price * 10^expo`.
    ///
    /// Unchecked in the sense that `f64` cannot represent every fixed-point
    /// value exactly. Returns `None` if the raw string is not an integer.
    pub fn to_unchecked_f64(&self) -> Option<f64> {
        let raw: i64 = self.price.parse().ok()?;
        Some(raw as f64 * 10f64.powi(self.expo))
    }

    /// Lossy conversion of the confidence to a float: `conf * 10^expo`.
    pub fn conf_to_unchecked_f64(&self) -> Option<f64> {
        let raw: i64 = self.conf.parse().ok()?;
        Some(raw as f64 * 10f64.powi(self.expo))
    }
}

/// Trading status of a price feed, as reported by the upstream oracle.
///
/// Set once at construction and never mutated here; `Trading` is the only
/// status under which the current price is authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriceStatus {
    Auction,
    Halted,
    Trading,
    Unknown,
}

impl PriceStatus {
    /// Returns the wire string for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceStatus::Auction => "Auction",
            PriceStatus::Halted => "Halted",
            PriceStatus::Trading => "Trading",
            PriceStatus::Unknown => "Unknown",
        }
    }

    /// Returns all statuses.
    pub fn all() -> &'static [PriceStatus] {
        &[
            PriceStatus::Auction,
            PriceStatus::Halted,
            PriceStatus::Trading,
            PriceStatus::Unknown,
        ]
    }
}

impl std::fmt::Display for PriceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Attestation metadata carried by some feed payloads.
///
/// Present only when the source JSON supplies it; an absent metadata object
/// stays absent through a round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceFeedMetadata {
    /// Unix timestamp (seconds) of the attestation.
    pub attestation_time: i64,

    /// Wormhole chain ID of the emitter.
    pub emitter_chain: i64,

    /// Sequence number of the attestation.
    pub sequence_number: i64,
}
