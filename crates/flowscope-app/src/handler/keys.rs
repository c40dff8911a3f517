//! Key event handling per input mode
//!
//! Keyboard surface:
//! - Left/Right: previous/next flow in the current list
//! - Up/Down, PageUp/PageDown, Home/End: scroll the focused pane
//! - Enter: select the flow under the list cursor
//! - Tab: switch pane focus
//! - `v`: toggle the last-active raw-payload view between text and hex
//! - `f`: cycle which dual view the toggle acts on
//! - `/`: edit the free-text search filter
//! - `s`: seed the search filter from the flow's first named pattern match
//! - `p`: cycle the detected-protocol filter
//! - `t`: tag filter mode (Space = tri-state toggle, `x` = required/denied
//!   jump, Esc leaves)
//! - `[` / `]`: navigation history back/forward
//! - `r`: clear and re-fetch the list
//! - `q`, Ctrl+C: quit

use crate::input_key::InputKey;
use crate::message::Message;
use crate::state::{AppState, Focus, InputMode};

use super::{list, UpdateResult};

/// Page step for PageUp/PageDown.
const PAGE_STEP: usize = 10;

/// Handle a key press in the current input mode.
pub(crate) fn handle_key(state: &mut AppState, key: InputKey) -> UpdateResult {
    match state.input_mode.clone() {
        InputMode::Normal => handle_normal_key(state, key),
        InputMode::Search { buffer } => handle_search_key(state, key, buffer),
        InputMode::TagSelect { index } => handle_tag_select_key(state, key, index),
    }
}

fn handle_normal_key(state: &mut AppState, key: InputKey) -> UpdateResult {
    match key {
        InputKey::Char('q') | InputKey::CharCtrl('c') => UpdateResult::message(Message::Quit),

        InputKey::Tab | InputKey::BackTab => {
            state.focus = match state.focus {
                Focus::List => Focus::Detail,
                Focus::Detail => Focus::List,
            };
            UpdateResult::none()
        }

        // Previous/next flow, regardless of pane focus.
        InputKey::Left => select_neighbour(state, false),
        InputKey::Right => select_neighbour(state, true),

        InputKey::Up => scroll_focused(state, false, 1),
        InputKey::Down => scroll_focused(state, true, 1),
        InputKey::PageUp => scroll_focused(state, false, PAGE_STEP),
        InputKey::PageDown => scroll_focused(state, true, PAGE_STEP),

        InputKey::Home if state.focus == Focus::List => {
            // Row 0 is a tick marker whenever the list is non-empty; land on
            // the first flow row after it.
            state.list.cursor = 0;
            if matches!(
                state.list.rows.first(),
                Some(crate::state::ListRow::Tick(_))
            ) {
                state.list.step_cursor(true);
            }
            UpdateResult::none()
        }
        InputKey::End if state.focus == Focus::List => {
            state.list.cursor = state.list.rows.len().saturating_sub(1);
            maybe_load_older(state)
        }

        InputKey::Enter if state.focus == Focus::List => {
            let selected = state.list.flow_at_cursor().map(|f| f.id);
            if let Some(flow_id) = selected {
                if state.nav.select_flow(Some(flow_id)) {
                    return UpdateResult::message(Message::NavChanged);
                }
            }
            UpdateResult::none()
        }

        InputKey::Char('v') => {
            state.detail.toggle_raw_view();
            UpdateResult::none()
        }
        InputKey::Char('f') => {
            state.detail.cycle_raw_focus();
            UpdateResult::none()
        }

        InputKey::Char('/') => {
            let buffer = state.nav.current().search.clone().unwrap_or_default();
            state.input_mode = InputMode::Search { buffer };
            UpdateResult::none()
        }

        InputKey::Char('s') => {
            let seed = state
                .detail
                .detail
                .as_ref()
                .and_then(|d| d.keywords().first().map(|k| k.to_string()));
            if let Some(seed) = seed {
                if state.nav.set_search(&seed) {
                    return UpdateResult::message(Message::NavChanged);
                }
            }
            UpdateResult::none()
        }

        InputKey::Char('p') => cycle_app_proto(state),

        InputKey::Char('t') => {
            if !state.list.tag_catalogue.is_empty() {
                state.input_mode = InputMode::TagSelect { index: 0 };
            }
            UpdateResult::none()
        }

        InputKey::Char('[') => {
            if state.nav.back() {
                UpdateResult::message(Message::NavChanged)
            } else {
                UpdateResult::none()
            }
        }
        InputKey::Char(']') => {
            if state.nav.forward() {
                UpdateResult::message(Message::NavChanged)
            } else {
                UpdateResult::none()
            }
        }

        InputKey::Char('r') => UpdateResult::actions(list::refresh(state)),

        _ => UpdateResult::none(),
    }
}

/// Move the selection to the neighbouring flow (skipping tick markers).
/// With no selection yet, the first flow is selected. Walking close to the
/// trailing end also trips the load-older sentinel.
fn select_neighbour(state: &mut AppState, next: bool) -> UpdateResult {
    let current = state.nav.current().flow;
    if let Some(flow_id) = state.list.neighbour_flow_id(current, next) {
        if let Some(row) = state.list.row_of_flow(flow_id) {
            state.list.cursor = row;
        }
        if state.nav.select_flow(Some(flow_id)) {
            return UpdateResult {
                message: Some(Message::NavChanged),
                actions: list::handle_load_older(state),
            };
        }
    }
    UpdateResult::none()
}

/// Scroll the focused pane; list movement may trip the load-older sentinel.
fn scroll_focused(state: &mut AppState, down: bool, steps: usize) -> UpdateResult {
    match state.focus {
        Focus::List => {
            for _ in 0..steps {
                state.list.step_cursor(down);
            }
            maybe_load_older(state)
        }
        Focus::Detail => {
            let delta = steps as u16;
            state.detail.scroll = if down {
                state.detail.scroll.saturating_add(delta)
            } else {
                state.detail.scroll.saturating_sub(delta)
            };
            UpdateResult::none()
        }
    }
}

fn maybe_load_older(state: &mut AppState) -> UpdateResult {
    if state.list.should_load_older() {
        UpdateResult::message(Message::LoadOlder)
    } else {
        UpdateResult::none()
    }
}

/// Cycle the protocol filter through "all" and every available protocol.
fn cycle_app_proto(state: &mut AppState) -> UpdateResult {
    let protos = state.list.app_protos.clone();
    if protos.is_empty() {
        return UpdateResult::none();
    }
    let next = match state.nav.current().app_proto.as_deref() {
        None => Some(protos[0].clone()),
        Some(current) => {
            let pos = protos.iter().position(|p| p == current);
            match pos {
                Some(i) if i + 1 < protos.len() => Some(protos[i + 1].clone()),
                _ => None,
            }
        }
    };
    if state.nav.set_app_proto(next) {
        UpdateResult::message(Message::NavChanged)
    } else {
        UpdateResult::none()
    }
}

// ── Search input mode ─────────────────────────────────────────────────────────

fn handle_search_key(state: &mut AppState, key: InputKey, mut buffer: String) -> UpdateResult {
    match key {
        InputKey::Esc => {
            state.input_mode = InputMode::Normal;
            UpdateResult::none()
        }
        InputKey::Enter => {
            state.input_mode = InputMode::Normal;
            if state.nav.set_search(&buffer) {
                UpdateResult::message(Message::NavChanged)
            } else {
                UpdateResult::none()
            }
        }
        InputKey::Backspace => {
            buffer.pop();
            state.input_mode = InputMode::Search { buffer };
            UpdateResult::none()
        }
        InputKey::Char(c) => {
            buffer.push(c);
            state.input_mode = InputMode::Search { buffer };
            UpdateResult::none()
        }
        _ => {
            state.input_mode = InputMode::Search { buffer };
            UpdateResult::none()
        }
    }
}

// ── Tag filter mode ───────────────────────────────────────────────────────────

fn handle_tag_select_key(state: &mut AppState, key: InputKey, index: usize) -> UpdateResult {
    let count = state.list.tag_catalogue.len();
    if count == 0 {
        state.input_mode = InputMode::Normal;
        return UpdateResult::none();
    }
    match key {
        InputKey::Esc | InputKey::Char('t') => {
            state.input_mode = InputMode::Normal;
            UpdateResult::none()
        }
        InputKey::Left => {
            state.input_mode = InputMode::TagSelect {
                index: index.checked_sub(1).unwrap_or(count - 1),
            };
            UpdateResult::none()
        }
        InputKey::Right => {
            state.input_mode = InputMode::TagSelect {
                index: (index + 1) % count,
            };
            UpdateResult::none()
        }
        InputKey::Char(' ') | InputKey::Enter => toggle_tag_at(state, index, false),
        InputKey::Char('x') => toggle_tag_at(state, index, true),
        _ => UpdateResult::none(),
    }
}

fn toggle_tag_at(state: &mut AppState, index: usize, alternate: bool) -> UpdateResult {
    let Some(tag) = state.list.tag_catalogue.get(index).map(|t| t.tag.clone()) else {
        return UpdateResult::none();
    };
    if state.nav.toggle_tag(&tag, alternate) {
        UpdateResult::message(Message::NavChanged)
    } else {
        UpdateResult::none()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
