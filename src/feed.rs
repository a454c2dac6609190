//! The `PriceFeed` aggregate: validated feed state plus accessors.
//!
//! A feed is constructed once from a raw JSON payload (validated by the
//! schema transformer) and is read-only afterwards. Accessors return fresh
//! value copies; "price not currently available" is `None`, never an error.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::MalformedInput;
use crate::schema::{Direction, Field, ObjectSchema, Schema, SchemaSet};
use crate::types::{Price, PriceFeedMetadata, PriceStatus};

/// A validated Pyth price feed.
///
/// All six price/conf fields share the same power-of-ten scale `expo`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceFeed {
    /// Confidence interval of the current aggregate price.
    pub conf: String,

    /// Confidence interval of the exponential moving average price.
    pub ema_conf: String,

    /// Exponential moving average price.
    pub ema_price: String,

    /// Power-of-ten scale shared by all price and confidence fields.
    pub expo: i32,

    /// Feed ID (hex string).
    pub id: String,

    /// Maximum number of publishers permitted on this feed.
    pub max_num_publishers: u32,

    /// Attestation metadata, when the payload carried it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<PriceFeedMetadata>,

    /// Number of publishers that contributed to the aggregate.
    pub num_publishers: u32,

    /// Confidence interval of the previous Trading-status price.
    pub prev_conf: String,

    /// Previous price recorded while the feed was last Trading.
    pub prev_price: String,

    /// Unix timestamp (seconds) of the previous Trading-status price.
    pub prev_publish_time: i64,

    /// Current aggregate price.
    pub price: String,

    /// Product ID (hex string).
    pub product_id: String,

    /// Unix timestamp (seconds) of the current aggregate price.
    pub publish_time: i64,

    /// Trading status reported by the upstream oracle.
    pub status: PriceStatus,

    /// Unknown top-level properties, preserved so round-trips keep them.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Schema for the price feed wire format (snake_case keys) and its typed
/// mirror (camelCase keys). Built once and reused.
fn feed_schema() -> &'static SchemaSet {
    static SCHEMA: OnceLock<SchemaSet> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        SchemaSet::new(
            "price_feed",
            vec![
                (
                    "price_feed",
                    Schema::Object(ObjectSchema::new(vec![
                        Field::new("conf", "conf", Schema::String),
                        Field::new("ema_conf", "emaConf", Schema::String),
                        Field::new("ema_price", "emaPrice", Schema::String),
                        Field::new("expo", "expo", Schema::Number),
                        Field::new("id", "id", Schema::String),
                        Field::new("max_num_publishers", "maxNumPublishers", Schema::Number),
                        Field::new(
                            "metadata",
                            "metadata",
                            Schema::Union(vec![Schema::Ref("metadata"), Schema::Absent]),
                        ),
                        Field::new("num_publishers", "numPublishers", Schema::Number),
                        Field::new("prev_conf", "prevConf", Schema::String),
                        Field::new("prev_price", "prevPrice", Schema::String),
                        Field::new("prev_publish_time", "prevPublishTime", Schema::Number),
                        Field::new("price", "price", Schema::String),
                        Field::new("product_id", "productId", Schema::String),
                        Field::new("publish_time", "publishTime", Schema::Number),
                        Field::new(
                            "status",
                            "status",
                            Schema::Enum(vec!["Auction", "Halted", "Trading", "Unknown"]),
                        ),
                    ])),
                ),
                (
                    "metadata",
                    Schema::Object(ObjectSchema::new(vec![
                        Field::new("attestation_time", "attestationTime", Schema::Number),
                        Field::new("emitter_chain", "emitterChain", Schema::Number),
                        Field::new("sequence_number", "sequenceNumber", Schema::Number),
                    ])),
                ),
            ],
        )
    })
}

impl PriceFeed {
    /// Parse and validate a raw price feed JSON payload.
    ///
    /// Fails with [`MalformedInput`] naming the offending key if the payload
    /// does not satisfy the feed schema. Unknown top-level properties are
    /// kept for round-trips.
    pub fn from_json(value: &Value) -> Result<Self, MalformedInput> {
        let typed = feed_schema().transform(value, Direction::IntoTyped)?;
        let feed: PriceFeed = serde_json::from_value(typed)
            .map_err(|e| MalformedInput::new("$", "price feed object", e.to_string()))?;
        debug!("parsed price feed {} (status: {})", feed.id, feed.status);
        Ok(feed)
    }

    /// Serialize back to the wire format (snake_case keys).
    ///
    /// Unset metadata is omitted entirely rather than emitted as null.
    pub fn to_json(&self) -> Result<Value, MalformedInput> {
        let typed = serde_json::to_value(self)
            .map_err(|e| MalformedInput::new("$", "price feed object", e.to_string()))?;
        feed_schema().transform(&typed, Direction::IntoJson)
    }

    /// The current aggregate price, only while the feed is Trading.
    ///
    /// `None` for any other status: the feed simply has no valid current
    /// price, which is an expected condition rather than an error.
    pub fn get_current_price(&self) -> Option<Price> {
        match self.status {
            PriceStatus::Trading => Some(Price {
                price: self.price.clone(),
                conf: self.conf.clone(),
                expo: self.expo,
            }),
            _ => None,
        }
    }

    /// The exponential moving average price, defined regardless of status.
    ///
    /// The EMA confidence component is computed upstream by a heuristic and
    /// should not be trusted for high-value decisions; this crate only
    /// relays it.
    pub fn get_ema_price(&self) -> Price {
        Price {
            price: self.ema_price.clone(),
            conf: self.ema_conf.clone(),
            expo: self.expo,
        }
    }

    /// The most recent Trading-status price and its publish timestamp.
    ///
    /// While Trading this is the current price at `publish_time`; otherwise
    /// it is the previous Trading snapshot at `prev_publish_time`. No
    /// recency guarantee: the caller must check the timestamp.
    pub fn get_latest_available_price_unchecked(&self) -> (Price, i64) {
        match self.status {
            PriceStatus::Trading => (
                Price {
                    price: self.price.clone(),
                    conf: self.conf.clone(),
                    expo: self.expo,
                },
                self.publish_time,
            ),
            _ => (
                Price {
                    price: self.prev_price.clone(),
                    conf: self.prev_conf.clone(),
                    expo: self.expo,
                },
                self.prev_publish_time,
            ),
        }
    }

    /// The latest available price, but only if its timestamp is within
    /// `max_age_secs` of the wall clock.
    ///
    /// The check uses the absolute difference: a future-dated timestamp
    /// beyond the window is as suspicious as a stale one.
    pub fn get_latest_available_price_within_duration(&self, max_age_secs: u64) -> Option<Price> {
        self.latest_available_price_within_duration_at(chrono::Utc::now().timestamp(), max_age_secs)
    }

    fn latest_available_price_within_duration_at(
        &self,
        now: i64,
        max_age_secs: u64,
    ) -> Option<Price> {
        let (price, publish_time) = self.get_latest_available_price_unchecked();
        let age = now.abs_diff(publish_time);
        if age > max_age_secs {
            debug!(
                "feed {} rejected: price timestamp {} is {}s from now (max {}s)",
                self.id, publish_time, age, max_age_secs
            );
            return None;
        }
        Some(price)
    }

    /// A copy of the attestation metadata, if the payload carried any.
    pub fn get_metadata(&self) -> Option<PriceFeedMetadata> {
        self.metadata.clone()
    }
}
