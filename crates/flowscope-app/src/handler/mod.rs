//! Handler module - TEA update function and event handlers
//!
//! Organized into submodules:
//! - `update`: Main update() function and message dispatch
//! - `keys`: Key event handlers for the input modes
//! - `list`: Flow list controller reactions (queries, pages, failures)
//! - `detail`: Flow detail controller reactions (detail, raw, files)

pub(crate) mod detail;
pub(crate) mod keys;
pub(crate) mod list;
pub(crate) mod update;

use flowscope_client::FlowQuery;

use crate::message::Message;

// Re-export main entry point
pub use update::update;

/// Actions that the event loop should perform after update
#[derive(Debug, Clone)]
pub enum UpdateAction {
    /// Fetch a flow list page. `replace` swaps the rendered list on
    /// completion; otherwise the page appends.
    FetchFlows { query: FlowQuery, replace: bool },

    /// Fetch one flow's detail record.
    FetchDetail { flow_id: i64 },

    /// Fetch one flow's raw payload chunks.
    FetchRaw { flow_id: i64 },

    /// Fetch the bytes of one extracted file.
    FetchFile {
        flow_id: i64,
        file_index: usize,
        storage_path: String,
    },
}

/// Result of processing one message: an optional follow-up message and any
/// retrieval actions for the event loop.
#[derive(Debug, Default)]
pub struct UpdateResult {
    /// Optional follow-up message to process
    pub message: Option<Message>,
    /// Actions for the event loop to perform
    pub actions: Vec<UpdateAction>,
}

impl UpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn message(msg: Message) -> Self {
        Self {
            message: Some(msg),
            actions: Vec::new(),
        }
    }

    pub fn action(action: UpdateAction) -> Self {
        Self {
            message: None,
            actions: vec![action],
        }
    }

    pub fn actions(actions: Vec<UpdateAction>) -> Self {
        Self {
            message: None,
            actions,
        }
    }
}
