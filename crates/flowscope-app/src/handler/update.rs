//! Main update function - handles state transitions (TEA pattern)
//!
//! Every message funnels through [`update`]; the list and detail
//! controllers both react to `NavChanged`, which keeps them decoupled from
//! each other while sharing one navigation state.

use crate::message::Message;
use crate::state::AppState;

use super::{detail, keys, list, UpdateResult};

/// Process a message and update state
/// Returns optional follow-up message and/or retrieval actions
pub fn update(state: &mut AppState, message: Message) -> UpdateResult {
    match message {
        Message::Quit => {
            state.request_quit();
            UpdateResult::none()
        }

        Message::Key(key) => keys::handle_key(state, key),

        Message::Tick => {
            if state.list.loading || state.detail.loading || state.detail.raw_loading {
                state.list.animation_frame = state.list.animation_frame.wrapping_add(1);
            }
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Navigation
        // ─────────────────────────────────────────────────────────
        Message::NavChanged => {
            let mut actions = list::handle_nav_changed(state);
            actions.extend(detail::handle_nav_changed(state));
            UpdateResult::actions(actions)
        }

        Message::LoadOlder => UpdateResult::actions(list::handle_load_older(state)),

        // ─────────────────────────────────────────────────────────
        // Flow list completions
        // ─────────────────────────────────────────────────────────
        Message::FlowsLoaded { replace, response } => {
            list::handle_flows_loaded(state, replace, response)
        }
        Message::FlowsLoadFailed { error } => list::handle_flows_load_failed(state, &error),

        // ─────────────────────────────────────────────────────────
        // Flow detail completions
        // ─────────────────────────────────────────────────────────
        Message::DetailLoaded { flow_id, detail: d } => {
            detail::handle_detail_loaded(state, flow_id, *d)
        }
        Message::DetailNotFound { flow_id } => detail::handle_detail_not_found(state, flow_id),
        Message::DetailLoadFailed { flow_id, error } => {
            detail::handle_detail_load_failed(state, flow_id, &error)
        }

        Message::RawLoaded { flow_id, chunks } => detail::handle_raw_loaded(state, flow_id, chunks),
        Message::RawLoadFailed { flow_id, error } => {
            detail::handle_raw_load_failed(state, flow_id, &error)
        }

        Message::FileLoaded {
            flow_id,
            file_index,
            bytes,
        } => detail::handle_file_loaded(state, flow_id, file_index, bytes),
        Message::FileLoadFailed {
            flow_id,
            file_index,
            error,
        } => detail::handle_file_load_failed(state, flow_id, file_index, &error),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::UpdateAction;
    use crate::input_key::InputKey;
    use crate::nav::NavParams;
    use flowscope_client::FlowListResponse;
    use flowscope_core::protocol::{HttpTransaction, ProtoTransactions};
    use flowscope_core::{Fileinfo, Flow, FlowDetail, TickConfig};

    fn make_state() -> AppState {
        AppState::new(TickConfig::new(1_700_000_000, 60), NavParams::default())
    }

    #[test]
    fn test_quit_message_sets_phase() {
        let mut state = make_state();
        update(&mut state, Message::Quit);
        assert!(state.should_quit());
    }

    #[test]
    fn test_nav_changed_drives_both_controllers() {
        let mut state = make_state();
        state.nav.select_flow(Some(42));
        let result = update(&mut state, Message::NavChanged);
        // Initial load: list fetch plus detail fetch for the selection.
        assert!(result
            .actions
            .iter()
            .any(|a| matches!(a, UpdateAction::FetchFlows { replace: true, .. })));
        assert!(result
            .actions
            .iter()
            .any(|a| matches!(a, UpdateAction::FetchDetail { flow_id: 42 })));
    }

    #[test]
    fn test_selection_gesture_end_to_end() {
        // Select flow 42 with two HTTP transactions and one file on tx 1:
        // the state ends up with exactly two transaction summaries and one
        // file attached under transaction index 1.
        let mut state = make_state();
        update(
            &mut state,
            Message::FlowsLoaded {
                replace: true,
                response: FlowListResponse {
                    flows: vec![Flow {
                        id: 42,
                        proto: "TCP".to_string(),
                        app_proto: Some("http".to_string()),
                        ts_start: 1_700_000_125_000,
                        ..Default::default()
                    }],
                    ..Default::default()
                },
            },
        );
        update(&mut state, Message::Key(InputKey::Right));
        let result = update(&mut state, Message::NavChanged);
        assert!(result
            .actions
            .iter()
            .any(|a| matches!(a, UpdateAction::FetchDetail { flow_id: 42 })));

        let detail = FlowDetail {
            flow: Flow {
                id: 42,
                proto: "TCP".to_string(),
                app_proto: Some("http".to_string()),
                dest_port: Some(80),
                ..Default::default()
            },
            transactions: ProtoTransactions::Http(vec![
                HttpTransaction {
                    http_method: Some("GET".to_string()),
                    ..Default::default()
                },
                HttpTransaction {
                    http_method: Some("POST".to_string()),
                    ..Default::default()
                },
            ]),
            fileinfos: vec![Fileinfo {
                tx_id: 1,
                sha256: "ab12".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        update(
            &mut state,
            Message::DetailLoaded {
                flow_id: 42,
                detail: Box::new(detail),
            },
        );

        let loaded = state.detail.detail.as_ref().unwrap();
        assert_eq!(loaded.transactions.len(), 2);
        assert_eq!(loaded.files_for_tx(1).count(), 1);
        assert_eq!(loaded.files_for_tx(0).count(), 0);
        assert_eq!(state.detail.files.len(), 1);
    }

    #[test]
    fn test_load_older_appends_without_duplicates() {
        let mut state = make_state();
        update(&mut state, Message::NavChanged);
        let first: Vec<Flow> = (0..100)
            .map(|i| Flow {
                id: i,
                ts_start: 1_700_000_200_000 - i * 1000,
                ..Default::default()
            })
            .collect();
        update(
            &mut state,
            Message::FlowsLoaded {
                replace: true,
                response: FlowListResponse {
                    flows: first,
                    ..Default::default()
                },
            },
        );
        state.list.cursor = state.list.rows.len() - 1;
        let result = update(&mut state, Message::LoadOlder);
        assert_eq!(result.actions.len(), 1);

        // Overlapping next page: boundary flow 99 appears again.
        let second: Vec<Flow> = (99..150)
            .map(|i| Flow {
                id: i,
                ts_start: 1_700_000_200_000 - i * 1000,
                ..Default::default()
            })
            .collect();
        update(
            &mut state,
            Message::FlowsLoaded {
                replace: false,
                response: FlowListResponse {
                    flows: second,
                    ..Default::default()
                },
            },
        );
        assert_eq!(state.list.flows.len(), 150);
        assert!(!state.list.load_older_armed, "51-flow page disarms");
    }

    #[test]
    fn test_tick_advances_spinner_only_while_loading() {
        let mut state = make_state();
        update(&mut state, Message::Tick);
        assert_eq!(state.list.animation_frame, 0);
        state.list.loading = true;
        update(&mut state, Message::Tick);
        assert_eq!(state.list.animation_frame, 1);
    }
}
