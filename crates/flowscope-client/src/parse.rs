//! Tolerant parsing of backend JSON responses
//!
//! The backend dissection is best-effort, so parsing never fails on a
//! malformed entry: individual records that cannot be decoded are skipped,
//! missing arrays become empty, and only a response without its core object
//! is an error.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::Value;

use flowscope_core::prelude::*;
use flowscope_core::protocol::{HttpTransaction, ProtoTransactions, SshTransaction, TlsTransaction};
use flowscope_core::{Alert, Anomaly, Direction, Fileinfo, Flow, FlowDetail, FlowVar, RawChunk, Tag};

/// Parsed flow list response: one page of flows plus the filter vocabularies
/// that ride along with every page.
#[derive(Debug, Clone, Default)]
pub struct FlowListResponse {
    /// At most one page (100) of flows, descending start time.
    pub flows: Vec<Flow>,
    /// All application protocols present in the capture.
    pub app_protos: Vec<String>,
    /// Global tag catalogue, in catalogue order.
    pub tags: Vec<Tag>,
}

/// Parse a flow list response. Missing sections become empty; entries that
/// fail to decode are skipped individually.
pub fn parse_flow_list(value: &Value) -> FlowListResponse {
    let flows = collect_array(value.get("flows"));
    let app_protos = value
        .get("appProto")
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    let tags = collect_array(value.get("tags"));
    FlowListResponse {
        flows,
        app_protos,
        tags,
    }
}

/// Parse a flow detail response.
///
/// # Errors
///
/// Returns [`Error::Decode`] when the response has no `flow` object;
/// everything else degrades gracefully.
pub fn parse_flow_detail(value: &Value) -> Result<FlowDetail> {
    let flow_value = value
        .get("flow")
        .ok_or_else(|| Error::decode("flow detail response missing 'flow' object"))?;
    let flow: Flow = serde_json::from_value(flow_value.clone())?;

    let alerts: Vec<Alert> = collect_array(value.get("alert"));
    let anomalies: Vec<Anomaly> = collect_array(value.get("anomaly"));
    let fileinfos: Vec<Fileinfo> = collect_array(value.get("fileinfo"));
    let flowvars: Vec<FlowVar> = collect_array(value.get("flowvars"));

    let transactions = parse_transactions(&flow, value);

    Ok(FlowDetail {
        flow,
        transactions,
        alerts,
        anomalies,
        fileinfos,
        flowvars,
    })
}

/// Dispatch the per-protocol transaction array (keyed by the detected
/// protocol) into the tagged union. HTTP2 records share the HTTP shape.
fn parse_transactions(flow: &Flow, value: &Value) -> ProtoTransactions {
    let proto = match flow.app_proto.as_deref() {
        Some("failed") | None => return ProtoTransactions::None,
        Some(proto) => proto,
    };
    let Some(records) = value.get(proto).and_then(Value::as_array) else {
        return ProtoTransactions::None;
    };

    match proto {
        "http" | "http2" => {
            let txs: Vec<HttpTransaction> = records
                .iter()
                .filter_map(|r| from_value_logged(r, "http transaction"))
                .collect();
            ProtoTransactions::Http(txs)
        }
        "ssh" => {
            let txs: Vec<SshTransaction> = records
                .iter()
                .filter_map(|r| from_value_logged(r, "ssh transaction"))
                .collect();
            ProtoTransactions::Ssh(txs)
        }
        "tls" => {
            let txs: Vec<TlsTransaction> = records
                .iter()
                .filter_map(|r| from_value_logged(r, "tls transaction"))
                .collect();
            ProtoTransactions::Tls(txs)
        }
        _ => ProtoTransactions::Generic {
            proto: proto.to_string(),
            records: records.to_vec(),
        },
    }
}

/// Parse a raw payload response: an ordered array of direction-tagged,
/// base64-encoded chunks. Chunks that fail to decode are skipped.
pub fn parse_raw_chunks(value: &Value) -> Vec<RawChunk> {
    let Some(entries) = value.as_array() else {
        return Vec::new();
    };
    entries
        .iter()
        .filter_map(|entry| {
            let flag = entry
                .get("server_to_client")
                .and_then(Value::as_u64)
                .unwrap_or(0) as u8;
            let encoded = entry.get("data").and_then(Value::as_str)?;
            match BASE64.decode(encoded) {
                Ok(data) => Some(RawChunk {
                    direction: Direction::from_server_to_client(flag),
                    data,
                }),
                Err(err) => {
                    warn!("skipping raw chunk with invalid encoding: {err}");
                    None
                }
            }
        })
        .collect()
}

/// Deserialize each array entry, skipping entries that fail to decode.
fn collect_array<T: serde::de::DeserializeOwned>(value: Option<&Value>) -> Vec<T> {
    value
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(|v| serde_json::from_value(v.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}

fn from_value_logged<T: serde::de::DeserializeOwned>(value: &Value, what: &str) -> Option<T> {
    match serde_json::from_value(value.clone()) {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            warn!("skipping malformed {what}: {err}");
            None
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_flow_list_complete() {
        let value = json!({
            "flows": [
                {"id": 1, "proto": "TCP", "ts_start": 1000, "ts_end": 2000},
                {"id": 2, "proto": "UDP", "ts_start": 500, "ts_end": 600},
            ],
            "appProto": ["http", "dns"],
            "tags": [
                {"tag": "flag-out", "color": "danger"},
                {"tag": "noise", "color": "secondary"},
            ],
        });
        let parsed = parse_flow_list(&value);
        assert_eq!(parsed.flows.len(), 2);
        assert_eq!(parsed.flows[0].id, 1);
        assert_eq!(parsed.app_protos, vec!["http", "dns"]);
        assert_eq!(parsed.tags.len(), 2);
        assert_eq!(parsed.tags[0].tag, "flag-out");
    }

    #[test]
    fn test_parse_flow_list_missing_sections() {
        let parsed = parse_flow_list(&json!({}));
        assert!(parsed.flows.is_empty());
        assert!(parsed.app_protos.is_empty());
        assert!(parsed.tags.is_empty());
    }

    #[test]
    fn test_parse_detail_http() {
        let value = json!({
            "flow": {"id": 42, "proto": "TCP", "app_proto": "http", "dest_port": 80},
            "http": [
                {"http_method": "GET", "hostname": "target.ctf", "url": "/", "status": 200},
                {"http_method": "POST", "hostname": "target.ctf", "url": "/login"},
            ],
            "fileinfo": [
                {"tx_id": 1, "filename": "creds.txt", "sha256": "ab12", "magic": "ASCII text"},
            ],
            "alert": [{"signature": "tag"}, {"signature": "real", "color": "danger"}],
        });
        let detail = parse_flow_detail(&value).unwrap();
        assert_eq!(detail.flow.id, 42);
        match &detail.transactions {
            ProtoTransactions::Http(txs) => {
                assert_eq!(txs.len(), 2);
                assert_eq!(txs[0].http_method.as_deref(), Some("GET"));
            }
            other => panic!("expected Http transactions, got {other:?}"),
        }
        assert_eq!(detail.fileinfos.len(), 1);
        assert_eq!(detail.alerts.len(), 2);
        assert_eq!(detail.visible_alerts().count(), 1);
    }

    #[test]
    fn test_parse_detail_http2_uses_http_shape() {
        let value = json!({
            "flow": {"id": 1, "app_proto": "http2"},
            "http2": [{"http_method": "GET", "hostname": "h2.ctf"}],
        });
        let detail = parse_flow_detail(&value).unwrap();
        assert!(matches!(
            detail.transactions,
            ProtoTransactions::Http(ref txs) if txs.len() == 1
        ));
    }

    #[test]
    fn test_parse_detail_failed_proto_has_no_transactions() {
        let value = json!({"flow": {"id": 1, "app_proto": "failed"}});
        let detail = parse_flow_detail(&value).unwrap();
        assert!(matches!(detail.transactions, ProtoTransactions::None));
    }

    #[test]
    fn test_parse_detail_unknown_proto_falls_back_to_generic() {
        let value = json!({
            "flow": {"id": 1, "app_proto": "dns"},
            "dns": [{"query": "target.ctf", "type": "A"}],
        });
        let detail = parse_flow_detail(&value).unwrap();
        match detail.transactions {
            ProtoTransactions::Generic { proto, records } => {
                assert_eq!(proto, "dns");
                assert_eq!(records.len(), 1);
            }
            other => panic!("expected Generic, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_detail_missing_flow_is_error() {
        assert!(parse_flow_detail(&json!({"alert": []})).is_err());
    }

    #[test]
    fn test_parse_raw_chunks_decodes_base64() {
        let value = json!([
            {"server_to_client": 0, "data": "aGVsbG8="},
            {"server_to_client": 1, "data": "d29ybGQ="},
        ]);
        let chunks = parse_raw_chunks(&value);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].direction, Direction::ToServer);
        assert_eq!(chunks[0].data, b"hello");
        assert_eq!(chunks[1].direction, Direction::ToClient);
        assert_eq!(chunks[1].data, b"world");
    }

    #[test]
    fn test_parse_raw_chunks_skips_invalid_entries() {
        let value = json!([
            {"server_to_client": 0, "data": "!!! not base64 !!!"},
            {"server_to_client": 1},
            {"server_to_client": 1, "data": "b2s="},
        ]);
        let chunks = parse_raw_chunks(&value);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].data, b"ok");
    }

    #[test]
    fn test_parse_raw_chunks_non_array_is_empty() {
        assert!(parse_raw_chunks(&json!({"oops": 1})).is_empty());
    }
}
