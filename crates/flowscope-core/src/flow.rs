//! # Flow Domain Types
//!
//! Data types for captured network flows and their attached detection
//! records, as returned by the retrieval backend.
//!
//! These types are the shared vocabulary between:
//! - `flowscope-client` (parsing backend JSON responses)
//! - `flowscope-app` (list/detail state management)
//! - `flowscope-tui` (rendering the list and detail panes)
//!
//! ## Contract Assumptions
//!
//! - **Timestamps are `i64` epoch milliseconds** (`ts_start`, `ts_end`).
//! - **Every server-provided field is best-effort**: the backend dissection
//!   may omit anything, so models default missing fields and rendering
//!   substitutes `?` instead of failing.
//! - **Records are immutable snapshots**: fetched on demand, held only while
//!   the corresponding view is active, discarded on the next navigation.

use chrono::{DateTime, Utc};
use serde::Deserialize;

// ── Flow ──────────────────────────────────────────────────────────────────────

/// Summary of a single captured network connection/session.
///
/// Returned in pages of at most 100 by the flow list endpoint, ordered by
/// descending start time.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Flow {
    /// Unique flow identifier, stable across requests.
    pub id: i64,
    /// Transport protocol tag ("TCP", "UDP", ...).
    pub proto: String,
    /// Source `ip:port`.
    pub src_ipport: String,
    /// Destination `ip:port`.
    pub dest_ipport: String,
    /// Destination port, when the backend splits it out.
    pub dest_port: Option<u16>,
    /// Flow start time (epoch milliseconds).
    pub ts_start: i64,
    /// Flow end time (epoch milliseconds).
    pub ts_end: i64,
    /// Packets sent client → server.
    pub pkts_toserver: u64,
    /// Packets sent server → client.
    pub pkts_toclient: u64,
    /// Bytes sent client → server.
    pub bytes_toserver: u64,
    /// Bytes sent server → client.
    pub bytes_toclient: u64,
    /// Capture file this flow originated from, if known.
    pub pcap_filename: Option<String>,
    /// Detected application-layer protocol. `None` or `"failed"` when the
    /// dissector could not determine one.
    pub app_proto: Option<String>,
    /// Comma-joined tag names attached to this flow.
    pub tags: Option<String>,
}

impl Flow {
    /// Detected application protocol suitable for display: the dissected
    /// protocol, or `"raw"` when absent or `"failed"`.
    pub fn display_proto(&self) -> &str {
        match self.app_proto.as_deref() {
            Some("failed") | None => "raw",
            Some(proto) => proto,
        }
    }

    /// Tag names attached to this flow, split from the comma-joined form.
    pub fn tag_names(&self) -> Vec<&str> {
        self.tags
            .as_deref()
            .map(|t| t.split(',').filter(|s| !s.is_empty()).collect())
            .unwrap_or_default()
    }

    /// Flow duration in milliseconds.
    pub fn duration_ms(&self) -> i64 {
        self.ts_end - self.ts_start
    }

    /// Whether raw transport payload capture exists for this flow's protocol.
    pub fn supports_raw(&self) -> bool {
        self.proto.eq_ignore_ascii_case("tcp") || self.proto.eq_ignore_ascii_case("udp")
    }
}

// ── Direction ─────────────────────────────────────────────────────────────────

/// Direction of a raw transport payload chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Client → server.
    ToServer,
    /// Server → client.
    ToClient,
}

impl Direction {
    /// Decode the wire flag (`server_to_client`: 0 or 1).
    pub fn from_server_to_client(flag: u8) -> Self {
        if flag == 1 {
            Direction::ToClient
        } else {
            Direction::ToServer
        }
    }
}

/// One direction-tagged slice of raw transport bytes, already decoded from
/// its transport text encoding.
#[derive(Debug, Clone)]
pub struct RawChunk {
    /// Which endpoint sent these bytes.
    pub direction: Direction,
    /// The raw payload bytes.
    pub data: Vec<u8>,
}

// ── Tags / detection records ──────────────────────────────────────────────────

/// An entry of the global tag catalogue: name plus display color.
///
/// Flows reference tags by name only; the catalogue is returned alongside
/// every flow list response and is independent of any single flow.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Tag {
    /// Tag name.
    pub tag: String,
    /// Display color keyword assigned by the backend ruleset.
    pub color: Option<String>,
}

/// A detection alert attached to a flow.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Alert {
    /// Rule signature text.
    pub signature: Option<String>,
    /// Severity color keyword.
    pub color: Option<String>,
}

impl Alert {
    /// Tagging rules emit alert records with the literal signature `"tag"`;
    /// those are markers carrying tag membership, not displayable alerts.
    pub fn is_tag_marker(&self) -> bool {
        self.signature.as_deref() == Some("tag")
    }
}

/// A protocol anomaly record attached to a flow. The shape is dissector
/// dependent, so the record is kept as raw JSON and displayed compactly.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct Anomaly(pub serde_json::Value);

impl Anomaly {
    /// One-line display form.
    pub fn display_line(&self) -> String {
        format!("Anomaly! {}", self.0)
    }
}

// ── Fileinfo ──────────────────────────────────────────────────────────────────

/// Metadata for one file extracted from a flow's payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Fileinfo {
    /// Index of the protocol transaction this file belongs to.
    pub tx_id: usize,
    /// Original filename as seen on the wire.
    pub filename: Option<String>,
    /// Hex digest of the file content; also the storage key.
    pub sha256: String,
    /// Type-sniff string produced by the backend (libmagic output).
    pub magic: Option<String>,
}

impl Fileinfo {
    /// Content-addressed storage path: `<first two hex chars>/<full hash>`.
    ///
    /// Identical bytes always yield the identical location.
    pub fn storage_path(&self) -> String {
        let prefix: String = self.sha256.chars().take(2).collect();
        format!("{}/{}", prefix, self.sha256)
    }

    /// Suggested download name: the original filename with every character
    /// outside `[A-Za-z0-9]` replaced by `_`, plus the sniffed extension.
    pub fn download_name(&self, ext: &str) -> String {
        let base: String = self
            .filename
            .as_deref()
            .unwrap_or("file")
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        format!("{base}.{ext}")
    }

    /// Header line for the file card.
    pub fn display_title(&self) -> String {
        let name = self.filename.as_deref().unwrap_or("?");
        match self.magic.as_deref() {
            Some(magic) => format!("File {name}, {magic}"),
            None => format!("File {name}"),
        }
    }
}

// ── FlowVar ───────────────────────────────────────────────────────────────────

/// A named pattern match recorded against a flow. Match values drive
/// payload highlighting in the detail view.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FlowVar {
    /// Name of the pattern that matched.
    pub key: Option<String>,
    /// The matched payload substring.
    pub value: String,
}

// ── FlowDetail ────────────────────────────────────────────────────────────────

/// Full record for one selected flow: the flow summary plus its protocol
/// transactions, detection records, extracted files, and pattern matches.
#[derive(Debug, Clone, Default)]
pub struct FlowDetail {
    pub flow: Flow,
    /// Per-protocol transaction records, dispatched on the detected protocol.
    pub transactions: crate::protocol::ProtoTransactions,
    pub alerts: Vec<Alert>,
    pub anomalies: Vec<Anomaly>,
    pub fileinfos: Vec<Fileinfo>,
    pub flowvars: Vec<FlowVar>,
}

impl FlowDetail {
    /// Non-empty pattern-match values, used as highlight keywords.
    pub fn keywords(&self) -> Vec<&str> {
        self.flowvars
            .iter()
            .map(|v| v.value.as_str())
            .filter(|v| !v.is_empty())
            .collect()
    }

    /// Displayable alerts (tag markers filtered out).
    pub fn visible_alerts(&self) -> impl Iterator<Item = &Alert> {
        self.alerts.iter().filter(|a| !a.is_tag_marker())
    }

    /// Extracted files attached to the given transaction index.
    pub fn files_for_tx(&self, tx_id: usize) -> impl Iterator<Item = (usize, &Fileinfo)> {
        self.fileinfos
            .iter()
            .enumerate()
            .filter(move |(_, f)| f.tx_id == tx_id)
    }
}

// ── Display helpers ───────────────────────────────────────────────────────────

/// Pretty print a delay in milliseconds: sub-second values stay in ms,
/// longer ones switch to seconds, both at three significant digits.
pub fn format_delay(delay_ms: i64) -> String {
    if delay_ms > 1000 {
        format!("{} s", precision3(delay_ms as f64 / 1000.0))
    } else {
        format!("{} ms", precision3(delay_ms as f64))
    }
}

/// Format with three significant digits.
fn precision3(value: f64) -> String {
    if value == 0.0 {
        return "0.00".to_string();
    }
    let magnitude = value.abs().log10().floor() as i32;
    let decimals = (2 - magnitude).max(0) as usize;
    format!("{value:.decimals$}")
}

/// Short time-of-day display for list rows (`HH:MM:SS.f`).
pub fn format_time_ms(ts_ms: i64) -> String {
    match DateTime::<Utc>::from_timestamp_millis(ts_ms) {
        Some(dt) => dt.format("%H:%M:%S%.1f").to_string(),
        None => "?".to_string(),
    }
}

/// Full timestamp display for the detail header (`Y-m-d H:M:S.mmm`).
pub fn format_datetime_ms(ts_ms: i64) -> String {
    match DateTime::<Utc>::from_timestamp_millis(ts_ms) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S%.3f").to_string(),
        None => "?".to_string(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn make_flow(id: i64, app_proto: Option<&str>, tags: Option<&str>) -> Flow {
        Flow {
            id,
            proto: "TCP".to_string(),
            src_ipport: "10.0.0.2:51234".to_string(),
            dest_ipport: "10.0.0.1:1337".to_string(),
            ts_start: 1_700_000_000_000,
            ts_end: 1_700_000_000_450,
            app_proto: app_proto.map(|s| s.to_string()),
            tags: tags.map(|s| s.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_display_proto_detected() {
        let flow = make_flow(1, Some("http"), None);
        assert_eq!(flow.display_proto(), "http");
    }

    #[test]
    fn test_display_proto_failed_falls_back_to_raw() {
        assert_eq!(make_flow(1, Some("failed"), None).display_proto(), "raw");
        assert_eq!(make_flow(1, None, None).display_proto(), "raw");
    }

    #[test]
    fn test_tag_names_split() {
        let flow = make_flow(1, None, Some("flag-out,suspicious"));
        assert_eq!(flow.tag_names(), vec!["flag-out", "suspicious"]);
    }

    #[test]
    fn test_tag_names_empty() {
        assert!(make_flow(1, None, None).tag_names().is_empty());
        assert!(make_flow(1, None, Some("")).tag_names().is_empty());
    }

    #[test]
    fn test_supports_raw_tcp_udp_only() {
        let mut flow = make_flow(1, None, None);
        assert!(flow.supports_raw());
        flow.proto = "UDP".to_string();
        assert!(flow.supports_raw());
        flow.proto = "ICMP".to_string();
        assert!(!flow.supports_raw());
    }

    #[test]
    fn test_flow_deserialize_tolerates_missing_fields() {
        let flow: Flow = serde_json::from_str(r#"{"id": 7}"#).unwrap();
        assert_eq!(flow.id, 7);
        assert_eq!(flow.ts_start, 0);
        assert!(flow.app_proto.is_none());
    }

    #[test]
    fn test_direction_from_flag() {
        assert_eq!(Direction::from_server_to_client(0), Direction::ToServer);
        assert_eq!(Direction::from_server_to_client(1), Direction::ToClient);
    }

    #[test]
    fn test_alert_tag_marker() {
        let marker = Alert {
            signature: Some("tag".to_string()),
            color: None,
        };
        assert!(marker.is_tag_marker());
        let alert = Alert {
            signature: Some("ET EXPLOIT something".to_string()),
            color: Some("danger".to_string()),
        };
        assert!(!alert.is_tag_marker());
    }

    #[test]
    fn test_fileinfo_storage_path() {
        let info = Fileinfo {
            sha256: "ab34cd".to_string(),
            ..Default::default()
        };
        assert_eq!(info.storage_path(), "ab/ab34cd");
    }

    #[test]
    fn test_fileinfo_download_name_sanitized() {
        let info = Fileinfo {
            filename: Some("../etc/passwd".to_string()),
            ..Default::default()
        };
        assert_eq!(info.download_name("txt"), "___etc_passwd.txt");
    }

    #[test]
    fn test_fileinfo_display_title() {
        let info = Fileinfo {
            filename: Some("logo.png".to_string()),
            magic: Some("PNG image data".to_string()),
            ..Default::default()
        };
        assert_eq!(info.display_title(), "File logo.png, PNG image data");

        let bare = Fileinfo {
            filename: Some("blob".to_string()),
            ..Default::default()
        };
        assert_eq!(bare.display_title(), "File blob");
    }

    #[test]
    fn test_detail_keywords_skip_empty() {
        let detail = FlowDetail {
            flowvars: vec![
                FlowVar {
                    key: Some("flag".to_string()),
                    value: "FLAG{x}".to_string(),
                },
                FlowVar {
                    key: None,
                    value: String::new(),
                },
            ],
            ..Default::default()
        };
        assert_eq!(detail.keywords(), vec!["FLAG{x}"]);
    }

    #[test]
    fn test_detail_visible_alerts_filters_markers() {
        let detail = FlowDetail {
            alerts: vec![
                Alert {
                    signature: Some("tag".to_string()),
                    color: None,
                },
                Alert {
                    signature: Some("real alert".to_string()),
                    color: Some("warning".to_string()),
                },
            ],
            ..Default::default()
        };
        let visible: Vec<_> = detail.visible_alerts().collect();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].signature.as_deref(), Some("real alert"));
    }

    #[test]
    fn test_files_for_tx() {
        let detail = FlowDetail {
            fileinfos: vec![
                Fileinfo {
                    tx_id: 0,
                    sha256: "aa".to_string(),
                    ..Default::default()
                },
                Fileinfo {
                    tx_id: 1,
                    sha256: "bb".to_string(),
                    ..Default::default()
                },
                Fileinfo {
                    tx_id: 1,
                    sha256: "cc".to_string(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let for_tx1: Vec<_> = detail.files_for_tx(1).collect();
        assert_eq!(for_tx1.len(), 2);
        assert_eq!(for_tx1[0].1.sha256, "bb");
        assert!(detail.files_for_tx(2).next().is_none());
    }

    #[test]
    fn test_format_delay_units() {
        assert_eq!(format_delay(450), "450 ms");
        assert_eq!(format_delay(1500), "1.50 s");
        assert_eq!(format_delay(12), "12.0 ms");
        assert_eq!(format_delay(0), "0.00 ms");
    }

    #[test]
    fn test_format_time_known_value() {
        // 1970-01-01 00:00:01.5
        assert_eq!(format_time_ms(1500), "00:00:01.5");
    }

    #[test]
    fn test_format_datetime_known_value() {
        assert_eq!(format_datetime_ms(0), "1970-01-01 00:00:00.000");
    }
}
