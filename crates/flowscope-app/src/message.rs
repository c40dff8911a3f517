//! Message types for the application (TEA pattern)

use flowscope_client::FlowListResponse;
use flowscope_core::{FlowDetail, RawChunk};

use crate::input_key::InputKey;

/// All possible messages/actions in the application
#[derive(Debug)]
pub enum Message {
    /// Keyboard event from terminal
    Key(InputKey),

    /// Tick event for periodic updates (spinner animation)
    Tick,

    /// Quit the application
    Quit,

    // ─────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────
    /// The navigation parameters changed (selection, filters, or history
    /// movement). Emitted exactly once per user gesture; both controllers
    /// re-derive their state from it.
    NavChanged,

    /// The list cursor reached the trailing sentinel region; load the next
    /// page of older flows.
    LoadOlder,

    // ─────────────────────────────────────────────────────────
    // Flow list retrieval completions
    // ─────────────────────────────────────────────────────────
    /// A flow list page arrived.
    FlowsLoaded {
        /// Whether this page replaces the list (filter change) or appends
        /// (pagination).
        replace: bool,
        response: FlowListResponse,
    },
    /// A flow list fetch failed.
    FlowsLoadFailed { error: String },

    // ─────────────────────────────────────────────────────────
    // Flow detail retrieval completions
    // ─────────────────────────────────────────────────────────
    /// A flow detail record arrived.
    DetailLoaded {
        flow_id: i64,
        detail: Box<FlowDetail>,
    },
    /// The backend does not know the requested flow.
    DetailNotFound { flow_id: i64 },
    /// A flow detail fetch failed.
    DetailLoadFailed { flow_id: i64, error: String },

    /// The raw payload chunks of a flow arrived.
    RawLoaded { flow_id: i64, chunks: Vec<RawChunk> },
    /// A raw payload fetch failed.
    RawLoadFailed { flow_id: i64, error: String },

    /// The bytes of an extracted file arrived.
    FileLoaded {
        flow_id: i64,
        file_index: usize,
        bytes: Vec<u8>,
    },
    /// An extracted-file fetch failed.
    FileLoadFailed {
        flow_id: i64,
        file_index: usize,
        error: String,
    },
}
