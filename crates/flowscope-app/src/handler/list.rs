//! Flow list controller reactions
//!
//! Derives the retrieval query from navigation state, decides between
//! clear-and-refetch (filter change) and append (pagination), and applies
//! page completions and failures.

use flowscope_client::FlowQuery;
use flowscope_client::FlowListResponse;
use flowscope_core::prelude::*;

use crate::nav::NavParams;
use crate::state::AppState;

use super::{UpdateAction, UpdateResult};

/// Map the navigation parameters onto the retrieval query, 1:1 per field.
/// The flow selection is not a list filter.
pub(crate) fn query_from_nav(params: &NavParams) -> FlowQuery {
    FlowQuery {
        time_from: params.from,
        time_to: params.to,
        services: params.services.clone(),
        app_proto: params.app_proto.clone(),
        search: params.search.clone(),
        tags_require: params.tags_require.clone(),
        tags_deny: params.tags_deny.clone(),
    }
}

/// React to a navigation change: when any filter field differs from the
/// query the current rows were fetched with, clear the list and re-fetch
/// from scratch. A pure selection change is a no-op here.
pub(crate) fn handle_nav_changed(state: &mut AppState) -> Vec<UpdateAction> {
    let query = query_from_nav(state.nav.current());
    if state.list.last_query.as_ref() == Some(&query) {
        return Vec::new();
    }
    refresh_with(state, query)
}

/// Clear the list and fetch the first page of the current filter query.
pub(crate) fn refresh(state: &mut AppState) -> Vec<UpdateAction> {
    let query = query_from_nav(state.nav.current());
    refresh_with(state, query)
}

fn refresh_with(state: &mut AppState, query: FlowQuery) -> Vec<UpdateAction> {
    state.list.clear();
    state.list.begin_fetch();
    state.list.last_query = Some(query.clone());
    vec![UpdateAction::FetchFlows {
        query,
        replace: true,
    }]
}

/// React to the trailing-sentinel proximity signal: fetch the next page of
/// older flows with the oldest rendered start time as the new upper bound.
pub(crate) fn handle_load_older(state: &mut AppState) -> Vec<UpdateAction> {
    if !state.list.should_load_older() {
        return Vec::new();
    }
    let Some(cursor_ts) = state.list.oldest_ts() else {
        return Vec::new();
    };
    let mut query = state
        .list
        .last_query
        .clone()
        .unwrap_or_else(|| query_from_nav(state.nav.current()));
    query.time_to = Some(cursor_ts);
    state.list.begin_fetch();
    vec![UpdateAction::FetchFlows {
        query,
        replace: false,
    }]
}

/// Apply a fetched page and refresh the filter vocabularies that ride
/// along with it.
pub(crate) fn handle_flows_loaded(
    state: &mut AppState,
    replace: bool,
    response: FlowListResponse,
) -> UpdateResult {
    let FlowListResponse {
        flows,
        app_protos,
        tags,
    } = response;
    state.list.apply_page(flows, replace, &state.tick_config);
    state.list.app_protos = app_protos;
    state.list.tag_catalogue = tags;

    // Keep the cursor on the selected flow when the list was rebuilt.
    if replace {
        if let Some(flow_id) = state.nav.current().flow {
            if let Some(row) = state.list.row_of_flow(flow_id) {
                state.list.cursor = row;
            }
        }
    }
    UpdateResult::none()
}

/// A list fetch failed: rendered flows stay, the loading indicator stays
/// visible, nothing is retried.
pub(crate) fn handle_flows_load_failed(state: &mut AppState, error: &str) -> UpdateResult {
    warn!("flow list fetch failed: {error}");
    state.list.fail_fetch();
    UpdateResult::none()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use flowscope_core::{Flow, Tag, TickConfig};

    fn make_state() -> AppState {
        AppState::new(TickConfig::new(1_700_000_000, 60), NavParams::default())
    }

    fn page(ids: std::ops::Range<i64>) -> FlowListResponse {
        FlowListResponse {
            flows: ids
                .map(|i| Flow {
                    id: i,
                    ts_start: 1_700_000_200_000 - i * 1000,
                    ts_end: 1_700_000_200_000 - i * 1000 + 50,
                    ..Default::default()
                })
                .collect(),
            app_protos: vec!["http".to_string()],
            tags: vec![Tag {
                tag: "flag-out".to_string(),
                color: Some("danger".to_string()),
            }],
        }
    }

    #[test]
    fn test_nav_change_triggers_initial_fetch() {
        let mut state = make_state();
        let actions = handle_nav_changed(&mut state);
        assert!(matches!(
            actions.as_slice(),
            [UpdateAction::FetchFlows { replace: true, .. }]
        ));
        assert!(state.list.loading);
    }

    #[test]
    fn test_unchanged_filters_do_not_refetch() {
        let mut state = make_state();
        handle_nav_changed(&mut state);
        // Selecting a flow changes navigation but no list filter.
        state.nav.select_flow(Some(42));
        assert!(handle_nav_changed(&mut state).is_empty());
    }

    #[test]
    fn test_filter_change_clears_and_refetches() {
        let mut state = make_state();
        handle_nav_changed(&mut state);
        handle_flows_loaded(&mut state, true, page(0..100));
        assert_eq!(state.list.flows.len(), 100);

        state.nav.set_app_proto(Some("http".to_string()));
        let actions = handle_nav_changed(&mut state);
        assert!(matches!(
            actions.as_slice(),
            [UpdateAction::FetchFlows { replace: true, .. }]
        ));
        assert!(state.list.flows.is_empty(), "filter change clears the list");
    }

    #[test]
    fn test_load_older_uses_oldest_ts_as_cursor() {
        let mut state = make_state();
        handle_nav_changed(&mut state);
        handle_flows_loaded(&mut state, true, page(0..100));
        state.list.cursor = state.list.rows.len() - 1;

        let actions = handle_load_older(&mut state);
        match actions.as_slice() {
            [UpdateAction::FetchFlows { query, replace: false }] => {
                assert_eq!(query.time_to, state.list.oldest_ts());
            }
            other => panic!("expected append fetch, got {other:?}"),
        }
        // The filter query is untouched by pagination.
        assert!(state.list.last_query.as_ref().unwrap().time_to.is_none());
    }

    #[test]
    fn test_load_older_noop_when_disarmed_or_in_flight() {
        let mut state = make_state();
        handle_nav_changed(&mut state);
        handle_flows_loaded(&mut state, true, page(0..42));
        state.list.cursor = state.list.rows.len().saturating_sub(1);
        assert!(handle_load_older(&mut state).is_empty(), "short page disarms");

        handle_flows_loaded(&mut state, true, page(0..100));
        state.list.cursor = state.list.rows.len() - 1;
        state.list.fetch_in_flight = true;
        assert!(handle_load_older(&mut state).is_empty());
    }

    #[test]
    fn test_flows_loaded_updates_filter_vocabularies() {
        let mut state = make_state();
        handle_flows_loaded(&mut state, true, page(0..10));
        assert_eq!(state.list.app_protos, vec!["http"]);
        assert_eq!(state.list.tag_catalogue.len(), 1);
    }

    #[test]
    fn test_flows_loaded_restores_cursor_to_selection() {
        let mut state = make_state();
        state.nav.select_flow(Some(5));
        handle_flows_loaded(&mut state, true, page(0..10));
        let row = state.list.row_of_flow(5).unwrap();
        assert_eq!(state.list.cursor, row);
    }

    #[test]
    fn test_failure_keeps_last_good_state() {
        let mut state = make_state();
        handle_nav_changed(&mut state);
        handle_flows_loaded(&mut state, true, page(0..10));
        state.list.begin_fetch();
        handle_flows_load_failed(&mut state, "connection refused");
        assert_eq!(state.list.flows.len(), 10);
        assert!(state.list.loading, "loading indicator stays visible");
    }
}
