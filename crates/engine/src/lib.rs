//! Splunk search job orchestration engine.
//!
//! This crate provides an async engine for executing searches against the
//! Splunk Enterprise REST API v9+: credential resolution (explicit token,
//! OAuth client credentials, mTLS), search job submission and polling with
//! capped exponential backoff and bounded failure tolerance, result-shape
//! normalization, and time-to-use caching of index schema, saved searches,
//! and access tokens.

mod auth;
mod cache;
mod endpoints;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod models;
mod normalize;
pub(crate) mod redact;
mod serde_helpers;

pub use auth::{AccessTokenResponse, TokenProvider};
pub use cache::TtuCache;
pub use engine::builder::SplunkEngineBuilder;
pub use engine::{SearchRequest, SplunkEngine, StructureManager, normalized_query};
pub use error::{AccessTokenError, EngineError, Result};
pub use metrics::MetricsCollector;
pub use models::{
    DatasetStructure, FieldDescriptor, JobStatus, SavedSearch, SearchJob, SearchStatus,
};
pub use normalize::{Record, records_from_results};
