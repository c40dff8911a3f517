//! Flow detail controller reactions
//!
//! Re-derives the selected flow from navigation state and applies detail,
//! raw-payload, and file-byte completions.
//!
//! Completions are applied in arrival order with no sequence numbering or
//! cancellation: a slow fetch completing after a newer selection has
//! rendered overwrites the newer view. Known limitation, see DESIGN.md.

use flowscope_core::prelude::*;
use flowscope_core::{FlowDetail, RawChunk};

use crate::state::AppState;

use super::{UpdateAction, UpdateResult};

/// React to a navigation change: when the selected flow id differs from
/// what the pane shows, reset and fetch the new selection (or fall back to
/// the placeholder when there is none).
pub(crate) fn handle_nav_changed(state: &mut AppState) -> Vec<UpdateAction> {
    let selected = state.nav.current().flow;
    if selected == state.detail.selected {
        return Vec::new();
    }
    match selected {
        None => {
            state.detail.reset();
            Vec::new()
        }
        Some(flow_id) => {
            state.detail.begin_load(flow_id);
            vec![UpdateAction::FetchDetail { flow_id }]
        }
    }
}

/// Apply a loaded detail record and fan out the follow-up fetches: raw
/// payload chunks for transport protocols that capture them, and the bytes
/// of every extracted file.
pub(crate) fn handle_detail_loaded(
    state: &mut AppState,
    flow_id: i64,
    detail: FlowDetail,
) -> UpdateResult {
    let mut actions = Vec::new();
    if detail.flow.supports_raw() {
        state.detail.raw_loading = true;
        actions.push(UpdateAction::FetchRaw { flow_id });
    }
    for (file_index, info) in detail.fileinfos.iter().enumerate() {
        actions.push(UpdateAction::FetchFile {
            flow_id,
            file_index,
            storage_path: info.storage_path(),
        });
    }
    state.detail.apply_detail(detail);
    UpdateResult::actions(actions)
}

/// The backend does not know the flow: show the placeholder.
pub(crate) fn handle_detail_not_found(state: &mut AppState, flow_id: i64) -> UpdateResult {
    warn!("flow {flow_id} not found");
    state.detail.detail = None;
    state.detail.loading = false;
    state.detail.not_found = true;
    UpdateResult::none()
}

/// A detail fetch failed: last-good state stays, the loading indicator
/// stays visible, nothing is retried.
pub(crate) fn handle_detail_load_failed(
    state: &mut AppState,
    flow_id: i64,
    error: &str,
) -> UpdateResult {
    warn!("detail fetch for flow {flow_id} failed: {error}");
    UpdateResult::none()
}

/// Apply loaded raw payload chunks.
pub(crate) fn handle_raw_loaded(
    state: &mut AppState,
    flow_id: i64,
    chunks: Vec<RawChunk>,
) -> UpdateResult {
    debug!("raw payload for flow {flow_id}: {} chunks", chunks.len());
    state.detail.raw_chunks = chunks;
    state.detail.raw_loaded = true;
    state.detail.raw_loading = false;
    UpdateResult::none()
}

/// A raw payload fetch failed: the loading indicator stays visible.
pub(crate) fn handle_raw_load_failed(
    state: &mut AppState,
    flow_id: i64,
    error: &str,
) -> UpdateResult {
    warn!("raw payload fetch for flow {flow_id} failed: {error}");
    UpdateResult::none()
}

/// Apply loaded file bytes to the matching file view.
pub(crate) fn handle_file_loaded(
    state: &mut AppState,
    flow_id: i64,
    file_index: usize,
    bytes: Vec<u8>,
) -> UpdateResult {
    if let Some(file) = state.detail.files.get_mut(file_index) {
        file.bytes = Some(bytes);
        file.failed = false;
    } else {
        debug!("file {file_index} of flow {flow_id} arrived after the view changed");
    }
    UpdateResult::none()
}

/// A file byte fetch failed: mark the card so it renders a placeholder.
pub(crate) fn handle_file_load_failed(
    state: &mut AppState,
    flow_id: i64,
    file_index: usize,
    error: &str,
) -> UpdateResult {
    warn!("file {file_index} fetch for flow {flow_id} failed: {error}");
    if let Some(file) = state.detail.files.get_mut(file_index) {
        file.failed = true;
    }
    UpdateResult::none()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
