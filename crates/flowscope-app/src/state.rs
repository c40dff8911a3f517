//! Application state (Model in TEA pattern)

use std::collections::HashSet;

use flowscope_client::{FlowQuery, PAGE_SIZE};
use flowscope_core::{
    ext_from_magic, render_kind, FileRenderKind, Flow, FlowDetail, RawChunk, Tag, TickConfig,
};

use crate::nav::{NavParams, NavigationState};

/// Rows within this distance of the end of the list re-trigger loading the
/// next page (the trailing-sentinel proximity threshold).
pub const LOAD_OLDER_PROXIMITY: usize = 5;

/// Current application phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppPhase {
    #[default]
    Running,
    Quitting,
}

/// Which pane owns Up/Down/PageUp/PageDown input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    List,
    Detail,
}

/// Modal input state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Plain key handling.
    #[default]
    Normal,
    /// Capturing text for the free-text search filter.
    Search { buffer: String },
    /// Tag filter selection: Left/Right choose a catalogue tag, toggles
    /// cycle its tri-state.
    TagSelect { index: usize },
}

// ─────────────────────────────────────────────────────────────────────────────
// Flow list state
// ─────────────────────────────────────────────────────────────────────────────

/// One rendered list row: either a tick-boundary marker or a flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListRow {
    /// Tick bucket boundary, carrying the tick index.
    Tick(i64),
    /// Index into [`FlowListState::flows`].
    Flow(usize),
}

/// State of the flow list pane: the fetched flows, the derived row list
/// with tick markers, pagination arming, and cursor/scroll position.
#[derive(Debug, Clone, Default)]
pub struct FlowListState {
    /// Fetched flows in render order (descending start time per page).
    pub flows: Vec<Flow>,
    /// Derived rows: flows interleaved with tick boundary markers.
    pub rows: Vec<ListRow>,
    /// Flow ids already rendered, for append dedup.
    seen_ids: HashSet<i64>,
    /// Whether the loading indicator is visible. Stays set after a failed
    /// fetch (no silent success state).
    pub loading: bool,
    /// Whether reaching the end of the list may load another page. Armed by
    /// a full page, disarmed by a short one.
    pub load_older_armed: bool,
    /// Guards against re-triggering while a fetch is outstanding.
    pub fetch_in_flight: bool,
    /// Selected row index.
    pub cursor: usize,
    /// First visible row index.
    pub scroll_offset: usize,
    /// Application protocols present in the capture (filter vocabulary).
    pub app_protos: Vec<String>,
    /// Global tag catalogue, in catalogue order.
    pub tag_catalogue: Vec<Tag>,
    /// The filter query the current rows were fetched with.
    pub last_query: Option<FlowQuery>,
    /// Spinner animation frame.
    pub animation_frame: u64,
}

impl FlowListState {
    /// Drop all rows and pagination state (filters changed).
    pub fn clear(&mut self) {
        self.flows.clear();
        self.rows.clear();
        self.seen_ids.clear();
        self.load_older_armed = false;
        self.cursor = 0;
        self.scroll_offset = 0;
    }

    /// Mark a fetch as started.
    pub fn begin_fetch(&mut self) {
        self.loading = true;
        self.fetch_in_flight = true;
    }

    /// Apply one fetched page. `replace` swaps the whole list; otherwise
    /// the page is appended with duplicate ids skipped. Arming follows the
    /// raw page length: exactly a full page re-arms, anything shorter
    /// disarms.
    pub fn apply_page(&mut self, page: Vec<Flow>, replace: bool, tick: &TickConfig) {
        self.fetch_in_flight = false;
        self.loading = false;
        self.load_older_armed = page.len() == PAGE_SIZE;
        if replace {
            self.clear();
            // clear() disarms; restore the arming derived from this page.
            self.load_older_armed = page.len() == PAGE_SIZE;
        }
        for flow in page {
            if self.seen_ids.insert(flow.id) {
                self.flows.push(flow);
            }
        }
        self.rebuild_rows(tick);
    }

    /// Record a failed fetch: rendered flows stay, the loading indicator
    /// stays visible, and only the in-flight guard resets.
    pub fn fail_fetch(&mut self) {
        self.fetch_in_flight = false;
    }

    /// Rebuild the row list, inserting a tick marker whenever the tick
    /// index changes between consecutive flows.
    fn rebuild_rows(&mut self, tick: &TickConfig) {
        self.rows.clear();
        let mut last_tick = None;
        for (i, flow) in self.flows.iter().enumerate() {
            let tick_index = tick.tick_index(flow.ts_start);
            if last_tick != Some(tick_index) {
                self.rows.push(ListRow::Tick(tick_index));
                last_tick = Some(tick_index);
            }
            self.rows.push(ListRow::Flow(i));
        }
        if self.cursor >= self.rows.len() {
            self.cursor = self.rows.len().saturating_sub(1);
        }
    }

    /// Flow under the cursor, if the cursor is on a flow row.
    pub fn flow_at_cursor(&self) -> Option<&Flow> {
        match self.rows.get(self.cursor) {
            Some(ListRow::Flow(i)) => self.flows.get(*i),
            _ => None,
        }
    }

    /// Row index of a flow id.
    pub fn row_of_flow(&self, flow_id: i64) -> Option<usize> {
        self.rows.iter().position(
            |row| matches!(row, ListRow::Flow(i) if self.flows[*i].id == flow_id),
        )
    }

    /// Move the cursor by one step in the given direction, skipping tick
    /// marker rows (they are not selectable).
    pub fn step_cursor(&mut self, down: bool) {
        let mut next = self.cursor;
        loop {
            if down {
                if next + 1 >= self.rows.len() {
                    break;
                }
                next += 1;
            } else {
                if next == 0 {
                    break;
                }
                next -= 1;
            }
            if matches!(self.rows.get(next), Some(ListRow::Flow(_))) {
                self.cursor = next;
                break;
            }
        }
    }

    /// Neighbouring flow id relative to the current selection, skipping the
    /// marker rows in between. With no selection, the first flow.
    pub fn neighbour_flow_id(&self, selected: Option<i64>, next: bool) -> Option<i64> {
        let Some(selected) = selected else {
            return self.flows.first().map(|f| f.id);
        };
        let pos = self.flows.iter().position(|f| f.id == selected)?;
        let neighbour = if next {
            pos.checked_add(1)?
        } else {
            pos.checked_sub(1)?
        };
        self.flows.get(neighbour).map(|f| f.id)
    }

    /// Whether cursor proximity to the trailing end should trigger loading
    /// the next page.
    pub fn should_load_older(&self) -> bool {
        self.load_older_armed
            && !self.fetch_in_flight
            && !self.rows.is_empty()
            && self.cursor + LOAD_OLDER_PROXIMITY >= self.rows.len()
    }

    /// Start time of the oldest rendered flow: the next pagination cursor.
    pub fn oldest_ts(&self) -> Option<i64> {
        self.flows.last().map(|f| f.ts_start)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Flow detail state
// ─────────────────────────────────────────────────────────────────────────────

/// Which sub-view of a dual text/hex view is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RawTab {
    #[default]
    Text,
    Hex,
}

impl RawTab {
    pub fn toggled(self) -> Self {
        match self {
            RawTab::Text => RawTab::Hex,
            RawTab::Hex => RawTab::Text,
        }
    }
}

/// The dual view the view-toggle key acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RawFocus {
    /// The raw transport payload view.
    #[default]
    Payload,
    /// An extracted file's dual view, by file index.
    File(usize),
}

/// Per-file presentation state in the detail pane.
#[derive(Debug, Clone)]
pub struct FileView {
    /// Rendering strategy selected from the type sniff.
    pub kind: FileRenderKind,
    /// Download extension derived from the type sniff.
    pub ext: &'static str,
    /// Fetched file bytes. `None` until the fetch completes.
    pub bytes: Option<Vec<u8>>,
    /// Whether the byte fetch failed.
    pub failed: bool,
    /// Visible sub-view for the binary dual view.
    pub tab: RawTab,
}

/// State of the flow detail pane.
#[derive(Debug, Clone, Default)]
pub struct FlowDetailState {
    /// The flow id the pane is showing (or loading).
    pub selected: Option<i64>,
    /// Loaded detail record.
    pub detail: Option<FlowDetail>,
    /// Whether a detail fetch is outstanding. Stays set after a failure.
    pub loading: bool,
    /// The backend did not know the selected flow.
    pub not_found: bool,
    /// Ordered raw payload chunks, once loaded.
    pub raw_chunks: Vec<RawChunk>,
    /// Whether the raw chunks have arrived.
    pub raw_loaded: bool,
    /// Whether a raw fetch is outstanding. Stays set after a failure.
    pub raw_loading: bool,
    /// Visible sub-view of the raw payload dual view.
    pub raw_tab: RawTab,
    /// The dual view the toggle key currently acts on.
    pub last_raw_focus: RawFocus,
    /// Per-file view state, parallel to `detail.fileinfos`.
    pub files: Vec<FileView>,
    /// Vertical scroll of the detail pane.
    pub scroll: u16,
}

impl FlowDetailState {
    /// Reset to the "no selection" placeholder.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Begin loading a newly selected flow.
    pub fn begin_load(&mut self, flow_id: i64) {
        self.reset();
        self.selected = Some(flow_id);
        self.loading = true;
    }

    /// Apply a loaded detail record, deriving per-file view state.
    pub fn apply_detail(&mut self, detail: FlowDetail) {
        self.files = detail
            .fileinfos
            .iter()
            .map(|info| {
                let ext = ext_from_magic(info.magic.as_deref().unwrap_or(""));
                FileView {
                    kind: render_kind(ext),
                    ext,
                    bytes: None,
                    failed: false,
                    tab: RawTab::Text,
                }
            })
            .collect();
        self.detail = Some(detail);
        self.loading = false;
        self.not_found = false;
        self.scroll = 0;
    }

    /// Toggle the last-active dual view between text and hex.
    pub fn toggle_raw_view(&mut self) {
        match self.last_raw_focus {
            RawFocus::Payload => self.raw_tab = self.raw_tab.toggled(),
            RawFocus::File(i) => {
                if let Some(file) = self.files.get_mut(i) {
                    file.tab = file.tab.toggled();
                } else {
                    self.raw_tab = self.raw_tab.toggled();
                }
            }
        }
    }

    /// Cycle the toggle-key target through the payload view and every file
    /// with a dual view.
    pub fn cycle_raw_focus(&mut self) {
        let dual_files: Vec<usize> = self
            .files
            .iter()
            .enumerate()
            .filter(|(_, f)| f.kind == FileRenderKind::Binary)
            .map(|(i, _)| i)
            .collect();
        self.last_raw_focus = match self.last_raw_focus {
            RawFocus::Payload => match dual_files.first() {
                Some(&i) => RawFocus::File(i),
                None => RawFocus::Payload,
            },
            RawFocus::File(current) => {
                match dual_files.iter().find(|&&i| i > current) {
                    Some(&i) => RawFocus::File(i),
                    None => RawFocus::Payload,
                }
            }
        };
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Complete application state
// ─────────────────────────────────────────────────────────────────────────────

/// Complete application state (the Model in TEA)
#[derive(Debug, Clone)]
pub struct AppState {
    /// Navigation parameters and history: the one piece of state that
    /// outlives a render cycle.
    pub nav: NavigationState,
    /// Flow list pane state.
    pub list: FlowListState,
    /// Flow detail pane state.
    pub detail: FlowDetailState,
    /// Capture timing for tick bucketing.
    pub tick_config: TickConfig,
    /// Pane owning scroll input.
    pub focus: Focus,
    /// Modal input state.
    pub input_mode: InputMode,
    /// Current application phase.
    pub phase: AppPhase,
}

impl AppState {
    pub fn new(tick_config: TickConfig, initial: NavParams) -> Self {
        Self {
            nav: NavigationState::new(initial),
            list: FlowListState::default(),
            detail: FlowDetailState::default(),
            tick_config,
            focus: Focus::default(),
            input_mode: InputMode::default(),
            phase: AppPhase::default(),
        }
    }

    /// Check if the app should quit
    pub fn should_quit(&self) -> bool {
        self.phase == AppPhase::Quitting
    }

    /// Request application quit
    pub fn request_quit(&mut self) {
        self.phase = AppPhase::Quitting;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn make_flow(id: i64, ts_start: i64) -> Flow {
        Flow {
            id,
            proto: "TCP".to_string(),
            ts_start,
            ts_end: ts_start + 100,
            ..Default::default()
        }
    }

    fn tick() -> TickConfig {
        TickConfig::new(1_700_000_000, 60)
    }

    fn page_of(ids: std::ops::Range<i64>) -> Vec<Flow> {
        // Descending start times, like the backend returns them.
        ids.map(|i| make_flow(i, 1_700_000_200_000 - i * 1000)).collect()
    }

    #[test]
    fn test_full_page_arms_load_older() {
        let mut list = FlowListState::default();
        list.apply_page(page_of(0..100), true, &tick());
        assert!(list.load_older_armed);
        assert_eq!(list.flows.len(), 100);
    }

    #[test]
    fn test_short_page_disarms_load_older() {
        let mut list = FlowListState::default();
        list.apply_page(page_of(0..100), true, &tick());
        list.apply_page(page_of(100..142), false, &tick());
        assert!(!list.load_older_armed);
        assert_eq!(list.flows.len(), 142);
    }

    #[test]
    fn test_append_skips_duplicate_ids() {
        let mut list = FlowListState::default();
        list.apply_page(page_of(0..100), true, &tick());
        // Overlapping page: ids 98..198, first two already present.
        list.apply_page(page_of(98..198), false, &tick());
        assert_eq!(list.flows.len(), 198);
        let mut ids: Vec<i64> = list.flows.iter().map(|f| f.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 198, "duplicate ids must be skipped");
    }

    #[test]
    fn test_tick_markers_inserted_on_boundary_change() {
        let mut list = FlowListState::default();
        let flows = vec![
            make_flow(1, 1_700_000_125_000), // tick 2
            make_flow(2, 1_700_000_121_000), // tick 2
            make_flow(3, 1_700_000_060_000), // tick 1
        ];
        list.apply_page(flows, true, &tick());
        assert_eq!(
            list.rows,
            vec![
                ListRow::Tick(2),
                ListRow::Flow(0),
                ListRow::Flow(1),
                ListRow::Tick(1),
                ListRow::Flow(2),
            ]
        );
    }

    #[test]
    fn test_fail_fetch_keeps_rows_and_loading() {
        let mut list = FlowListState::default();
        list.apply_page(page_of(0..10), true, &tick());
        list.begin_fetch();
        list.fail_fetch();
        assert_eq!(list.flows.len(), 10, "rendered flows stay intact");
        assert!(list.loading, "loading indicator stays visible");
        assert!(!list.fetch_in_flight);
    }

    #[test]
    fn test_step_cursor_skips_tick_rows() {
        let mut list = FlowListState::default();
        list.apply_page(
            vec![
                make_flow(1, 1_700_000_125_000),
                make_flow(2, 1_700_000_060_000),
            ],
            true,
            &tick(),
        );
        // rows: Tick(2), Flow(0), Tick(1), Flow(1)
        list.cursor = 1;
        list.step_cursor(true);
        assert_eq!(list.cursor, 3, "cursor skips the tick marker");
        list.step_cursor(false);
        assert_eq!(list.cursor, 1);
    }

    #[test]
    fn test_neighbour_flow_id() {
        let mut list = FlowListState::default();
        list.apply_page(
            vec![
                make_flow(10, 1_700_000_125_000),
                make_flow(11, 1_700_000_060_000),
                make_flow(12, 1_700_000_010_000),
            ],
            true,
            &tick(),
        );
        assert_eq!(list.neighbour_flow_id(None, true), Some(10));
        assert_eq!(list.neighbour_flow_id(Some(10), true), Some(11));
        assert_eq!(list.neighbour_flow_id(Some(11), false), Some(10));
        assert_eq!(list.neighbour_flow_id(Some(12), true), None);
        assert_eq!(list.neighbour_flow_id(Some(10), false), None);
    }

    #[test]
    fn test_should_load_older_requires_arming_and_proximity() {
        let mut list = FlowListState::default();
        list.apply_page(page_of(0..100), true, &tick());
        list.cursor = 0;
        assert!(!list.should_load_older(), "far from the end");
        list.cursor = list.rows.len() - 1;
        assert!(list.should_load_older());
        list.fetch_in_flight = true;
        assert!(!list.should_load_older(), "guarded while a fetch is in flight");
        list.fetch_in_flight = false;
        list.load_older_armed = false;
        assert!(!list.should_load_older(), "disarmed after a short page");
    }

    #[test]
    fn test_detail_begin_load_resets_previous_state() {
        let mut detail = FlowDetailState::default();
        detail.raw_chunks.push(RawChunk {
            direction: flowscope_core::Direction::ToServer,
            data: vec![1, 2, 3],
        });
        detail.scroll = 10;
        detail.begin_load(42);
        assert_eq!(detail.selected, Some(42));
        assert!(detail.loading);
        assert!(detail.raw_chunks.is_empty());
        assert_eq!(detail.scroll, 0);
    }

    #[test]
    fn test_apply_detail_derives_file_views() {
        let mut detail = FlowDetailState::default();
        detail.begin_load(1);
        let record = FlowDetail {
            fileinfos: vec![
                flowscope_core::Fileinfo {
                    tx_id: 0,
                    magic: Some("PNG image data".to_string()),
                    sha256: "aa".to_string(),
                    ..Default::default()
                },
                flowscope_core::Fileinfo {
                    tx_id: 1,
                    magic: Some("Zip archive data".to_string()),
                    sha256: "bb".to_string(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        detail.apply_detail(record);
        assert_eq!(detail.files.len(), 2);
        assert_eq!(detail.files[0].kind, FileRenderKind::Image);
        assert_eq!(detail.files[0].ext, "png");
        assert_eq!(detail.files[1].kind, FileRenderKind::Binary);
        assert!(!detail.loading);
    }

    #[test]
    fn test_toggle_raw_view_payload() {
        let mut detail = FlowDetailState::default();
        assert_eq!(detail.raw_tab, RawTab::Text);
        detail.toggle_raw_view();
        assert_eq!(detail.raw_tab, RawTab::Hex);
        detail.toggle_raw_view();
        assert_eq!(detail.raw_tab, RawTab::Text);
    }

    #[test]
    fn test_cycle_raw_focus_visits_binary_files_only() {
        let mut detail = FlowDetailState::default();
        detail.files = vec![
            FileView {
                kind: FileRenderKind::Image,
                ext: "png",
                bytes: None,
                failed: false,
                tab: RawTab::Text,
            },
            FileView {
                kind: FileRenderKind::Binary,
                ext: "bin",
                bytes: None,
                failed: false,
                tab: RawTab::Text,
            },
        ];
        detail.cycle_raw_focus();
        assert_eq!(detail.last_raw_focus, RawFocus::File(1));
        detail.cycle_raw_focus();
        assert_eq!(detail.last_raw_focus, RawFocus::Payload);
    }
}
