//! # flowscope-client - Backend Retrieval Client
//!
//! HTTP client for the Flowscope retrieval backend plus tolerant parsing of
//! its JSON responses into `flowscope-core` types.
//!
//! The backend is a black box behind four read-only operations:
//! - flow list (filtered, cursor-paginated, fixed page size)
//! - flow detail by id
//! - raw payload chunks by flow id (text-encoded on the wire)
//! - extracted file bytes by content-addressed storage path

pub mod api;
pub mod parse;
pub mod query;

pub use api::{ApiClient, PAGE_SIZE};
pub use parse::FlowListResponse;
pub use query::FlowQuery;
