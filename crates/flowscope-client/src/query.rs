//! Flow list query parameters
//!
//! Every navigation filter field maps 1:1 onto a retrieval query parameter;
//! the pagination cursor rides in `time_to`.

/// Query for the flow list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlowQuery {
    /// Keep only flows starting at or after this time (epoch ms).
    pub time_from: Option<i64>,
    /// Keep only flows starting at or before this time (epoch ms). Also the
    /// pagination cursor when loading older pages.
    pub time_to: Option<i64>,
    /// Keep only flows touching these `ip:port` services.
    pub services: Vec<String>,
    /// Keep only flows with this detected application protocol.
    pub app_proto: Option<String>,
    /// Free-text pattern searched in flow payloads (server-side).
    pub search: Option<String>,
    /// Keep only flows carrying all of these tags.
    pub tags_require: Vec<String>,
    /// Drop flows carrying any of these tags.
    pub tags_deny: Vec<String>,
}

impl FlowQuery {
    /// Encode as query pairs in the order the backend documents them.
    /// Repeatable parameters repeat; absent filters are omitted entirely.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(from) = self.time_from {
            pairs.push(("from", from.to_string()));
        }
        if let Some(to) = self.time_to {
            pairs.push(("to", to.to_string()));
        }
        for service in &self.services {
            pairs.push(("service", service.clone()));
        }
        if let Some(proto) = &self.app_proto {
            pairs.push(("app_proto", proto.clone()));
        }
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        for tag in &self.tags_require {
            pairs.push(("tag_require", tag.clone()));
        }
        for tag in &self.tags_deny {
            pairs.push(("tag_deny", tag.clone()));
        }
        pairs
    }

    /// Whether `other` is the same query except for the `time_to` pagination
    /// cursor. Pagination appends to the list; any other difference clears
    /// it and re-fetches from scratch.
    pub fn is_pagination_of(&self, other: &FlowQuery) -> bool {
        self.time_from == other.time_from
            && self.services == other.services
            && self.app_proto == other.app_proto
            && self.search == other.search
            && self.tags_require == other.tags_require
            && self.tags_deny == other.tags_deny
    }
}
