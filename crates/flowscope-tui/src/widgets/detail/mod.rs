//! # Flow Detail Pane
//!
//! Renders one selected flow's full record: the flow summary card, alert
//! and anomaly cards, the per-protocol transaction card with extracted
//! files attached under their transactions, and the raw payload dual view.
//! With no valid selection the pane shows a placeholder.
//!
//! The pane is one scrollable column of lines rebuilt from state on every
//! frame.

pub mod fileinfo;
pub mod raw_view;

use std::collections::HashSet;

use flowscope_app::{AppState, Focus, RawFocus};
use flowscope_core::protocol::ProtoTransactions;
use flowscope_core::{format_datetime_ms, FlowDetail, HttpHeaderSummary};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Paragraph, Widget};

use crate::theme;

/// Render the detail pane.
pub fn render(buf: &mut Buffer, area: Rect, state: &mut AppState) {
    if area.width < 4 || area.height == 0 {
        return;
    }
    let lines = detail_lines(state);
    let max_scroll = (lines.len() as u16).saturating_sub(1);
    if state.detail.scroll > max_scroll {
        state.detail.scroll = max_scroll;
    }
    let title_style = if state.focus == Focus::Detail {
        theme::header_style()
    } else {
        theme::dim_style()
    };
    Paragraph::new(Text::from(lines))
        .style(Style::default())
        .scroll((state.detail.scroll, 0))
        .render(area, buf);
    // Focus marker in the pane corner.
    if state.focus == Focus::Detail {
        buf.set_string(area.right().saturating_sub(2), area.y, "▐", title_style);
    }
}

/// Build the full line column for the current detail state.
pub fn detail_lines(state: &AppState) -> Vec<Line<'static>> {
    let detail_state = &state.detail;
    let Some(detail) = &detail_state.detail else {
        return placeholder_lines(state);
    };

    let keywords = detail.keywords();
    let search = state.nav.current().search.clone();
    let search = search.as_deref();

    let mut lines = Vec::new();
    flow_card(&mut lines, state, detail);
    alert_cards(&mut lines, detail);
    let rendered_files = transaction_card(&mut lines, state, detail, &keywords, search);
    orphan_file_cards(&mut lines, state, detail, &keywords, search, &rendered_files);

    if detail.flow.supports_raw() {
        lines.push(Line::default());
        lines.extend(raw_view::raw_section_lines(detail_state, &keywords, search));
    }
    lines
}

/// Placeholder shown with no selection, while the first fetch is pending,
/// or when the backend does not know the flow.
fn placeholder_lines(state: &AppState) -> Vec<Line<'static>> {
    // A not-found selection falls back to the same placeholder as no
    // selection at all.
    let message = if state.detail.loading {
        "Loading…"
    } else {
        "No flow selected"
    };
    vec![
        Line::default(),
        Line::from(Span::styled(
            format!("  {message}"),
            theme::dim_style(),
        )),
        Line::default(),
        Line::from(Span::styled(
            "  Pick a flow with ←/→ or ⏎, filter with /, p and t.".to_string(),
            theme::dim_style(),
        )),
    ]
}

/// Flow summary card: endpoints, tick, timestamps, per-direction counters.
fn flow_card(lines: &mut Vec<Line<'static>>, state: &AppState, detail: &FlowDetail) {
    let flow = &detail.flow;
    lines.push(Line::from(Span::styled(
        format!(
            "{} flow, {} ➔ {}",
            or_placeholder(&flow.proto),
            or_placeholder(&flow.src_ipport),
            or_placeholder(&flow.dest_ipport)
        ),
        theme::header_style(),
    )));
    let tick = state.tick_config.tick_index(flow.ts_start);
    lines.push(Line::from(format!(
        "Tick {tick}, from {} to {}",
        format_datetime_ms(flow.ts_start),
        format_datetime_ms(flow.ts_end)
    )));
    lines.push(Line::from(format!(
        "Client sent {} packets ({} bytes), server replied with {} packets ({} bytes).",
        flow.pkts_toserver, flow.bytes_toserver, flow.pkts_toclient, flow.bytes_toclient
    )));
    if let Some(pcap) = &flow.pcap_filename {
        lines.push(Line::from(Span::styled(
            format!("Capture file: {pcap}"),
            theme::dim_style(),
        )));
    }
}

/// Alert and anomaly cards. Tag marker records are filtered out.
fn alert_cards(lines: &mut Vec<Line<'static>>, detail: &FlowDetail) {
    for alert in detail.visible_alerts() {
        lines.push(Line::from(Span::styled(
            format!("▌ {}", alert.signature.as_deref().unwrap_or("?")),
            Style::default().fg(theme::color_from_name(alert.color.as_deref())),
        )));
    }
    for anomaly in &detail.anomalies {
        lines.push(Line::from(Span::styled(
            format!("▌ {}", anomaly.display_line()),
            Style::default().fg(Color::Yellow),
        )));
    }
    lines.push(Line::default());
}

/// Application protocol card. Returns the indexes of the file cards that
/// were rendered attached to a transaction.
fn transaction_card(
    lines: &mut Vec<Line<'static>>,
    state: &AppState,
    detail: &FlowDetail,
    keywords: &[&str],
    search: Option<&str>,
) -> HashSet<usize> {
    let mut rendered = HashSet::new();
    let Some(label) = detail.transactions.label() else {
        return rendered;
    };
    lines.push(Line::from(Span::styled(
        format!("── {label} ──"),
        theme::header_style().fg(Color::Cyan),
    )));

    match &detail.transactions {
        ProtoTransactions::Http(txs) => {
            // Aggregated, deduplicated header summary across all
            // transactions of the flow.
            let summary = HttpHeaderSummary::collect(txs);
            for line in summary.lines() {
                lines.push(Line::from(Span::styled(line, theme::dim_style())));
            }
            lines.push(Line::default());
            for (tx_id, tx) in txs.iter().enumerate() {
                lines.push(Line::from(tx.summary_line(detail.flow.dest_port)));
                attach_files(lines, state, detail, tx_id, keywords, search, &mut rendered);
            }
        }
        ProtoTransactions::Ssh(txs) => {
            for tx in txs {
                lines.push(Line::from(tx.summary_line()));
            }
        }
        ProtoTransactions::Tls(txs) => {
            for tx in txs {
                for line in tx.summary_lines() {
                    lines.push(Line::from(line));
                }
            }
        }
        ProtoTransactions::Generic { records, .. } => {
            for (tx_id, record) in records.iter().enumerate() {
                let pretty =
                    serde_json::to_string_pretty(record).unwrap_or_else(|_| "?".to_string());
                for line in pretty.lines() {
                    lines.push(Line::from(line.to_string()));
                }
                attach_files(lines, state, detail, tx_id, keywords, search, &mut rendered);
            }
        }
        ProtoTransactions::None => {}
    }
    rendered
}

/// Render the file cards referencing one transaction index, immediately
/// after that transaction's summary.
#[allow(clippy::too_many_arguments)]
fn attach_files(
    lines: &mut Vec<Line<'static>>,
    state: &AppState,
    detail: &FlowDetail,
    tx_id: usize,
    keywords: &[&str],
    search: Option<&str>,
    rendered: &mut HashSet<usize>,
) {
    for (file_index, info) in detail.files_for_tx(tx_id) {
        if let Some(view) = state.detail.files.get(file_index) {
            let focused = state.detail.last_raw_focus == RawFocus::File(file_index);
            lines.extend(fileinfo::file_card_lines(info, view, keywords, search, focused));
            rendered.insert(file_index);
        }
    }
}

/// File cards whose transaction index points outside the transaction
/// sequence still render, after the protocol card.
fn orphan_file_cards(
    lines: &mut Vec<Line<'static>>,
    state: &AppState,
    detail: &FlowDetail,
    keywords: &[&str],
    search: Option<&str>,
    rendered: &HashSet<usize>,
) {
    for (file_index, info) in detail.fileinfos.iter().enumerate() {
        if rendered.contains(&file_index) {
            continue;
        }
        if let Some(view) = state.detail.files.get(file_index) {
            let focused = state.detail.last_raw_focus == RawFocus::File(file_index);
            lines.extend(fileinfo::file_card_lines(info, view, keywords, search, focused));
        }
    }
}

fn or_placeholder(value: &str) -> &str {
    if value.is_empty() {
        "?"
    } else {
        value
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
