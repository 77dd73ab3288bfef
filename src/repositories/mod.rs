//! # Repositories
//!
//! Data held by the process between queries. The only repository is the
//! in-memory [`ResponseCache`]; nothing is persisted to disk.
//!
//! ## Usage Example
//!
//! ```no_run
//! use drug_info_hub::repositories::ResponseCache;
//! use drug_info_hub::client::sources::{SourceId, SourcePayload, SourceResult};
//!
//! # async fn example() {
//! let cache = ResponseCache::new();
//!
//! let result = cache
//!     .get_or_compute(SourceId::Wikipedia, "ibuprofen", || async {
//!         SourceResult::Success(SourcePayload::Summary("Ibuprofen is an NSAID.".to_string()))
//!     })
//!     .await;
//! assert!(result.is_success());
//! # }
//! ```

pub mod cache;

pub use cache::{CacheEntry, CacheStats, ResponseCache, CACHE_TTL, FAILURE_TTL};
