//! # Per-Protocol Transaction Records
//!
//! The backend attaches an ordered sequence of dissected transaction records
//! to each flow, shaped by the detected application protocol. This module
//! models that sequence as a tagged union with an explicit fallback variant,
//! so rendering dispatches on the variant instead of probing record fields
//! at runtime.
//!
//! HTTP and HTTP2 share one record shape and one rendering strategy; SSH and
//! TLS carry their own key/value dissections; every other protocol falls
//! back to the raw JSON records, pretty-printed.

use serde::Deserialize;

// ── ProtoTransactions ─────────────────────────────────────────────────────────

/// Ordered per-protocol transaction records of one flow.
#[derive(Debug, Clone, Default)]
pub enum ProtoTransactions {
    /// HTTP or HTTP2 transactions (shared shape).
    Http(Vec<HttpTransaction>),
    /// SSH handshake records.
    Ssh(Vec<SshTransaction>),
    /// TLS handshake records.
    Tls(Vec<TlsTransaction>),
    /// Any other detected protocol: raw dissection records.
    Generic {
        proto: String,
        records: Vec<serde_json::Value>,
    },
    /// No application protocol detected (or detection failed).
    #[default]
    None,
}

impl ProtoTransactions {
    /// Number of transaction records.
    pub fn len(&self) -> usize {
        match self {
            ProtoTransactions::Http(txs) => txs.len(),
            ProtoTransactions::Ssh(txs) => txs.len(),
            ProtoTransactions::Tls(txs) => txs.len(),
            ProtoTransactions::Generic { records, .. } => records.len(),
            ProtoTransactions::None => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Uppercase protocol label for the card header, `None` when there is
    /// nothing to display.
    pub fn label(&self) -> Option<String> {
        match self {
            ProtoTransactions::Http(_) => Some("HTTP".to_string()),
            ProtoTransactions::Ssh(_) => Some("SSH".to_string()),
            ProtoTransactions::Tls(_) => Some("TLS".to_string()),
            ProtoTransactions::Generic { proto, .. } => Some(proto.to_uppercase()),
            ProtoTransactions::None => None,
        }
    }
}

// ── HTTP ──────────────────────────────────────────────────────────────────────

/// One HTTP request/response header pair.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HttpHeader {
    pub name: String,
    pub value: String,
}

/// One dissected HTTP (or HTTP2) transaction.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HttpTransaction {
    pub http_method: Option<String>,
    pub hostname: Option<String>,
    pub http_port: Option<u16>,
    pub url: Option<String>,
    /// Wire protocol version string (e.g. `HTTP/1.1`).
    pub protocol: Option<String>,
    /// Response status code.
    pub status: Option<i64>,
    pub request_headers: Vec<HttpHeader>,
    pub response_headers: Vec<HttpHeader>,
}

impl HttpTransaction {
    /// One-line request/response summary. Absent fields render as `?`;
    /// the port falls back to the flow's destination port when the
    /// dissector did not record one.
    pub fn summary_line(&self, fallback_port: Option<u16>) -> String {
        let method = self.http_method.as_deref().unwrap_or("?");
        let host = self.hostname.as_deref().unwrap_or("?");
        let port = self
            .http_port
            .or(fallback_port)
            .map(|p| p.to_string())
            .unwrap_or_else(|| "?".to_string());
        let path = self.url.as_deref().unwrap_or("");
        let protocol = self.protocol.as_deref().unwrap_or("?");
        let status = self
            .status
            .map(|s| s.to_string())
            .unwrap_or_else(|| "?".to_string());
        format!("{method} http://{host}:{port}{path} {protocol}  ◄ {status}")
    }

    fn request_header_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.request_headers
            .iter()
            .filter(move |h| h.name == name)
            .map(|h| h.value.as_str())
    }

    fn response_header_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.response_headers
            .iter()
            .filter(move |h| h.name == name)
            .map(|h| h.value.as_str())
    }
}

// ── HttpHeaderSummary ─────────────────────────────────────────────────────────

/// Deduplicated header values aggregated across all HTTP transactions of a
/// flow, shown as a compact summary block above the transaction list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpHeaderSummary {
    /// Distinct request `User-Agent` values, first-seen order.
    pub user_agents: Vec<String>,
    /// Distinct response `Server` values, first-seen order.
    pub servers: Vec<String>,
    /// Distinct cookies: request `Cookie` values and the first `;` segment
    /// of response `Set-Cookie` values, first-seen order.
    pub cookies: Vec<String>,
}

impl HttpHeaderSummary {
    /// Aggregate across the transaction sequence.
    pub fn collect(transactions: &[HttpTransaction]) -> Self {
        let mut summary = Self::default();
        for tx in transactions {
            for value in tx.request_header_values("User-Agent") {
                push_unique(&mut summary.user_agents, value);
            }
            for value in tx.response_header_values("Server") {
                push_unique(&mut summary.servers, value);
            }
            for value in tx.request_header_values("Cookie") {
                push_unique(&mut summary.cookies, value);
            }
            for value in tx.response_header_values("Set-Cookie") {
                // Keep only the name=value part, not the cookie attributes.
                let cookie = value.split(';').next().unwrap_or(value);
                push_unique(&mut summary.cookies, cookie);
            }
        }
        summary
    }

    /// Non-empty summary lines in display order.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if !self.user_agents.is_empty() {
            lines.push(format!("User-Agent: {}", self.user_agents.join(", ")));
        }
        if !self.servers.is_empty() {
            lines.push(format!("Server: {}", self.servers.join(", ")));
        }
        if !self.cookies.is_empty() {
            lines.push(format!("Cookie: {}", self.cookies.join(", ")));
        }
        lines
    }
}

fn push_unique(values: &mut Vec<String>, value: &str) {
    if !values.iter().any(|v| v == value) {
        values.push(value.to_string());
    }
}

// ── SSH ───────────────────────────────────────────────────────────────────────

/// One endpoint's SSH identification.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SshEndpoint {
    pub software_version: Option<String>,
    pub proto_version: Option<String>,
}

/// One dissected SSH session record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SshTransaction {
    pub client: SshEndpoint,
    pub server: SshEndpoint,
}

impl SshTransaction {
    /// One-line client/server software summary.
    pub fn summary_line(&self) -> String {
        let fmt = |e: &SshEndpoint| {
            format!(
                "{} (SSH {})",
                e.software_version.as_deref().unwrap_or("?"),
                e.proto_version.as_deref().unwrap_or("?")
            )
        };
        format!("{} ➔ {}", fmt(&self.client), fmt(&self.server))
    }
}

// ── TLS ───────────────────────────────────────────────────────────────────────

/// One dissected TLS session record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TlsTransaction {
    pub sni: Option<String>,
    pub subject: Option<String>,
    pub issuerdn: Option<String>,
    pub fingerprint: Option<String>,
    pub serial: Option<String>,
    pub notbefore: Option<String>,
    pub notafter: Option<String>,
    pub session_resumed: Option<bool>,
}

impl TlsTransaction {
    /// Key/value summary lines, skipping absent fields.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![format!("SNI:         {}", self.sni.as_deref().unwrap_or("?"))];
        if self.session_resumed == Some(true) {
            lines.push("Session resumed".to_string());
        }
        if let Some(subject) = &self.subject {
            lines.push(format!("Subject:     {subject}"));
        }
        if let Some(issuer) = &self.issuerdn {
            lines.push(format!("IssuerDn:    {issuer}"));
        }
        if let Some(fingerprint) = &self.fingerprint {
            lines.push(format!("Fingerprint: {fingerprint}"));
        }
        if let Some(serial) = &self.serial {
            lines.push(format!("Serial:      {serial}"));
        }
        if let Some(notbefore) = &self.notbefore {
            lines.push(format!(
                "Validity from {notbefore} to {}",
                self.notafter.as_deref().unwrap_or("?")
            ));
        }
        lines
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
