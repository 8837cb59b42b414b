//! Cached access to the Foxhole War API.
//!
//! [`WarApi`] routes each request to its shard's host, serves repeated
//! requests from an in-memory cache with per-resource expiry, and collapses
//! concurrent requests for the same resource into a single fetch.

pub mod api;
pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod fetch;
pub mod shard;
pub mod transport;

pub use api::WarApi;
pub use cache::{CacheKey, CacheStats, ResourceKind};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{CacheConfig, CacheConfigOverrides};
pub use error::{FetchError, FetchResult};
pub use shard::ShardRouter;
pub use transport::{ReqwestTransport, Transport};
