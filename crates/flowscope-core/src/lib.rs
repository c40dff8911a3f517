//! # flowscope-core - Core Domain Types
//!
//! Foundation crate for Flowscope. Provides the flow domain types, error
//! handling, and the pure rendering primitives shared by the application and
//! TUI layers.
//!
//! This crate has **zero internal dependencies** -- it only depends on
//! external crates (serde, chrono, thiserror, tracing).
//!
//! ## Public API
//!
//! ### Domain Types (`flow`, `protocol`)
//! - [`Flow`] - One captured network connection/session
//! - [`FlowDetail`] - A flow plus transactions, alerts, files, and matches
//! - [`ProtoTransactions`] - Tagged per-protocol transaction union
//! - [`Fileinfo`] - One extracted file, addressed by content hash
//! - [`RawChunk`] / [`Direction`] - Direction-tagged raw payload slices
//!
//! ### Pure Primitives
//! - [`hexdump`] - Canonical 16-bytes-per-line hex dump rendering
//! - [`highlight`] - Escape-then-wrap payload highlighting
//! - [`magic`] - Type-sniff → extension → render-strategy selection
//! - [`tick`] - Fixed-length time-bucket computation
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with `fatal` vs `recoverable` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use flowscope_core::prelude::*;
//! ```

pub mod error;
pub mod flow;
pub mod hexdump;
pub mod highlight;
pub mod logging;
pub mod magic;
pub mod protocol;
pub mod tick;

/// Prelude for common imports used throughout all Flowscope crates
pub mod prelude {
    pub use super::error::{Error, Result, ResultExt};
    pub use tracing::{debug, error, info, instrument, trace, warn};
}

// Re-export commonly used types at crate root for convenience
pub use error::{Error, Result, ResultExt};
pub use flow::{
    format_datetime_ms, format_delay, format_time_ms, Alert, Anomaly, Direction, Fileinfo, Flow,
    FlowDetail, FlowVar, RawChunk, Tag,
};
pub use hexdump::{hex_dump, hex_dump_chunk};
pub use highlight::{escape_payload, highlight_payload, MARK_CLOSE, MARK_OPEN};
pub use magic::{ext_from_magic, render_kind, FileRenderKind};
pub use protocol::{
    HttpHeader, HttpHeaderSummary, HttpTransaction, ProtoTransactions, SshEndpoint,
    SshTransaction, TlsTransaction,
};
pub use tick::TickConfig;
