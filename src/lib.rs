//! Typed data model for Pyth Network price feed JSON payloads.
//!
//! This crate parses raw Pyth price feed JSON into validated, typed objects
//! and exposes convenience accessors over them. Fetching the JSON (HTTP,
//! SSE, websockets) is an external concern; nothing here does I/O.
//!
//! # Features
//!
//! - **Schema-driven validation** with fail-fast errors naming the
//!   offending key path
//! - **Round-trip safe**: unknown top-level properties are preserved and
//!   absent metadata stays absent
//! - **Safe accessors**: current price only while Trading, EMA always,
//!   latest-available price with a staleness bound
//!
//! # Example
//!
//! ```
//! use pyth_price_feed::{PriceFeed, PriceStatus};
//! use serde_json::json;
//!
//! let raw = json!({
//!     "conf": "52010000", "ema_conf": "51360000", "ema_price": "5010600000",
//!     "expo": -8, "id": "abcdef0123456789", "max_num_publishers": 12,
//!     "num_publishers": 10, "prev_conf": "51870000", "prev_price": "5012420000",
//!     "prev_publish_time": 1647273123, "price": "5012540000",
//!     "product_id": "0123456789abcdef", "publish_time": 1647273124,
//!     "status": "Trading",
//! });
//!
//! let feed = PriceFeed::from_json(&raw).expect("valid feed");
//! assert_eq!(feed.status, PriceStatus::Trading);
//!
//! let price = feed.get_current_price().expect("trading");
//! println!("{} ± {} x 10^{}", price.price, price.conf, price.expo);
//! ```

pub mod error;
pub mod feed;
pub mod schema;
pub mod types;

pub use error::MalformedInput;
pub use feed::PriceFeed;
pub use schema::{Direction, Field, ObjectSchema, Schema, SchemaSet};
pub use types::{Price, PriceFeedMetadata, PriceStatus};
