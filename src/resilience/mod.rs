//! # Resilience Module
//!
//! Components that protect downstream dependencies: a TTL cache shielding
//! the lookup store from repeated reference-data reads, and sliding-window
//! rate limiters guarding the externally-facing entry points.
//!
//! Both are explicitly constructed and owned by the composition root
//! rather than living as module-level singletons, so tests never share
//! hidden state. Internal
//! maps use per-key atomic read-modify-write; no external locking is needed.

pub mod cache;
pub mod rate_limiter;

pub use cache::TtlCache;
pub use rate_limiter::{RateLimitConfig, RateLimiter};
