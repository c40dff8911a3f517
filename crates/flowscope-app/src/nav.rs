//! Navigation state
//!
//! The single source of truth for "what is currently displayed": the
//! selected flow, the time window, and every filter dimension. The state is
//! an explicit, injectable object with its own navigation history — the
//! terminal analogue of a shareable page address plus back/forward buttons.
//!
//! Mutations are staged on a scratch copy and committed once per user
//! gesture, either as a new history entry (`commit_push`) or in place
//! (`commit_replace`). A commit reports whether anything actually changed,
//! and the handler layer turns that into at most one `NavChanged` message
//! per gesture.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};

/// Characters percent-encoded inside query values.
const QUERY_VALUE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'&')
    .add(b'=')
    .add(b'%')
    .add(b'+')
    .add(b'#');

// ── TagFilter ─────────────────────────────────────────────────────────────────

/// Per-tag filter state: unset, must-have, or must-not-have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagFilter {
    Absent,
    Required,
    Denied,
}

// ── NavParams ─────────────────────────────────────────────────────────────────

/// The complete navigation parameter set. Encodes to and decodes from a
/// shareable query string; a missing or malformed parameter always means
/// "no filter", never an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavParams {
    /// Selected flow id.
    pub flow: Option<i64>,
    /// Time window lower bound (epoch ms).
    pub from: Option<i64>,
    /// Time window upper bound (epoch ms).
    pub to: Option<i64>,
    /// Address filters (`ip:port`).
    pub services: Vec<String>,
    /// Detected-protocol filter.
    pub app_proto: Option<String>,
    /// Free-text search pattern.
    pub search: Option<String>,
    /// Tags a flow must carry.
    pub tags_require: Vec<String>,
    /// Tags a flow must not carry.
    pub tags_deny: Vec<String>,
}

impl NavParams {
    /// Current tri-state filter for one tag.
    pub fn tag_filter(&self, tag: &str) -> TagFilter {
        if self.tags_require.iter().any(|t| t == tag) {
            TagFilter::Required
        } else if self.tags_deny.iter().any(|t| t == tag) {
            TagFilter::Denied
        } else {
            TagFilter::Absent
        }
    }

    /// Cycle one tag's tri-state filter.
    ///
    /// Plain toggle: absent → required → denied → absent. With the alternate
    /// modifier the state jumps directly between required and denied
    /// (absent jumps to denied). A tag is never left in both sets.
    pub fn toggle_tag(&mut self, tag: &str, alternate: bool) {
        let next = match (self.tag_filter(tag), alternate) {
            (TagFilter::Absent, false) => TagFilter::Required,
            (TagFilter::Required, false) => TagFilter::Denied,
            (TagFilter::Denied, false) => TagFilter::Absent,
            (TagFilter::Absent, true) => TagFilter::Denied,
            (TagFilter::Required, true) => TagFilter::Denied,
            (TagFilter::Denied, true) => TagFilter::Required,
        };
        self.tags_require.retain(|t| t != tag);
        self.tags_deny.retain(|t| t != tag);
        match next {
            TagFilter::Required => self.tags_require.push(tag.to_string()),
            TagFilter::Denied => self.tags_deny.push(tag.to_string()),
            TagFilter::Absent => {}
        }
    }

    /// Whether any filter dimension (everything except the flow selection)
    /// is active.
    pub fn has_active_filters(&self) -> bool {
        self.from.is_some()
            || self.to.is_some()
            || !self.services.is_empty()
            || self.app_proto.is_some()
            || self.search.is_some()
            || !self.tags_require.is_empty()
            || !self.tags_deny.is_empty()
    }

    // ── Query-string codec ────────────────────────────────────────────────────

    /// Encode as a shareable query string (`flow=42&tag_require=x&...`).
    pub fn encode(&self) -> String {
        let mut pairs: Vec<String> = Vec::new();
        let mut push = |key: &str, value: &str| {
            pairs.push(format!(
                "{key}={}",
                utf8_percent_encode(value, QUERY_VALUE)
            ));
        };
        if let Some(flow) = self.flow {
            push("flow", &flow.to_string());
        }
        if let Some(from) = self.from {
            push("from", &from.to_string());
        }
        if let Some(to) = self.to {
            push("to", &to.to_string());
        }
        for service in &self.services {
            push("service", service);
        }
        if let Some(proto) = &self.app_proto {
            push("app_proto", proto);
        }
        if let Some(search) = &self.search {
            push("search", search);
        }
        for tag in &self.tags_require {
            push("tag_require", tag);
        }
        for tag in &self.tags_deny {
            push("tag_deny", tag);
        }
        pairs.join("&")
    }

    /// Decode from a query string. Never fails: unknown keys are ignored,
    /// unparseable numbers mean "no filter", and a tag found in both the
    /// require and deny sets keeps only its require entry.
    pub fn decode(query: &str) -> Self {
        let mut params = Self::default();
        for pair in query.trim_start_matches('?').split('&') {
            if pair.is_empty() {
                continue;
            }
            let (key, raw_value) = pair.split_once('=').unwrap_or((pair, ""));
            let value = percent_decode_str(raw_value)
                .decode_utf8_lossy()
                .into_owned();
            if value.is_empty() {
                continue;
            }
            match key {
                "flow" => params.flow = value.parse().ok(),
                "from" => params.from = value.parse().ok(),
                "to" => params.to = value.parse().ok(),
                "service" => params.services.push(value),
                "app_proto" => params.app_proto = Some(value),
                "search" => params.search = Some(value),
                "tag_require" => params.tags_require.push(value),
                "tag_deny" => params.tags_deny.push(value),
                _ => {}
            }
        }
        // Enforce the tri-state invariant: require wins over deny.
        params
            .tags_deny
            .retain(|t| !params.tags_require.contains(t));
        params
    }
}

// ── NavigationState ───────────────────────────────────────────────────────────

/// Navigation parameters plus their history.
///
/// `stage()` hands out a scratch copy for mutation; a subsequent commit
/// makes it current. History navigation moves the cursor without touching
/// entries, exactly like browser back/forward.
#[derive(Debug, Clone)]
pub struct NavigationState {
    history: Vec<NavParams>,
    cursor: usize,
    staged: Option<NavParams>,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self::new(NavParams::default())
    }
}

impl NavigationState {
    pub fn new(initial: NavParams) -> Self {
        Self {
            history: vec![initial],
            cursor: 0,
            staged: None,
        }
    }

    /// The currently displayed parameter set.
    pub fn current(&self) -> &NavParams {
        &self.history[self.cursor]
    }

    /// Scratch copy for the current gesture. Repeated calls within one
    /// gesture keep mutating the same copy until a commit.
    pub fn stage(&mut self) -> &mut NavParams {
        let history = &self.history;
        let cursor = self.cursor;
        self.staged.get_or_insert_with(|| history[cursor].clone())
    }

    /// Commit the staged copy as a new history entry, truncating any
    /// forward entries. Returns whether anything changed.
    pub fn commit_push(&mut self) -> bool {
        let Some(staged) = self.staged.take() else {
            return false;
        };
        if staged == *self.current() {
            return false;
        }
        self.history.truncate(self.cursor + 1);
        self.history.push(staged);
        self.cursor += 1;
        true
    }

    /// Commit the staged copy in place of the current entry (no new
    /// history entry). Returns whether anything changed.
    pub fn commit_replace(&mut self) -> bool {
        let Some(staged) = self.staged.take() else {
            return false;
        };
        if staged == *self.current() {
            return false;
        }
        self.history[self.cursor] = staged;
        true
    }

    /// Move one entry back in history. Returns whether the cursor moved.
    pub fn back(&mut self) -> bool {
        self.staged = None;
        if self.cursor > 0 {
            self.cursor -= 1;
            true
        } else {
            false
        }
    }

    /// Move one entry forward in history. Returns whether the cursor moved.
    pub fn forward(&mut self) -> bool {
        self.staged = None;
        if self.cursor + 1 < self.history.len() {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    // ── Gesture helpers ───────────────────────────────────────────────────────

    /// Select a flow (history push). Returns whether the selection changed.
    pub fn select_flow(&mut self, flow: Option<i64>) -> bool {
        self.stage().flow = flow;
        self.commit_push()
    }

    /// Set the free-text search filter (history push). Empty clears it.
    pub fn set_search(&mut self, search: &str) -> bool {
        self.stage().search = if search.is_empty() {
            None
        } else {
            Some(search.to_string())
        };
        self.commit_push()
    }

    /// Set the detected-protocol filter (history push).
    pub fn set_app_proto(&mut self, proto: Option<String>) -> bool {
        self.stage().app_proto = proto;
        self.commit_push()
    }

    /// Cycle one tag's tri-state filter (history push).
    pub fn toggle_tag(&mut self, tag: &str, alternate: bool) -> bool {
        self.stage().toggle_tag(tag, alternate);
        self.commit_push()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
