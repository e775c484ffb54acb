//! Window reports and the full-history summary.
//!
//! Pure functions over a ledger snapshot and an injected `now`: no clock
//! or file access, so tests control time directly.

use std::fmt::Write as _;

use chrono::{DateTime, Local};

use crate::models::{CostEvent, CostKind};
use crate::window::CostWindow;

/// Aggregated costs for one window.
#[derive(Debug, Clone, PartialEq)]
pub struct CostReport {
    /// The window the report covers
    pub window: CostWindow,

    /// Sum of all event costs in the window
    pub total_cost_usd: f64,

    /// Sum of all event token counts in the window
    pub total_tokens: u64,

    /// Cost of indexing events only
    pub index_cost_usd: f64,

    /// Cost of query events only
    pub query_cost_usd: f64,

    /// Number of events in the window
    pub event_count: usize,
}

impl CostReport {
    /// All-zero report for a window (empty ledger, or nothing matched).
    pub fn empty(window: CostWindow) -> Self {
        Self {
            window,
            total_cost_usd: 0.0,
            total_tokens: 0,
            index_cost_usd: 0.0,
            query_cost_usd: 0.0,
            event_count: 0,
        }
    }

    /// One-line rendering for the CLI.
    pub fn render(&self) -> String {
        format!(
            "Cost {}: ${:.6} USD ({} events, {} tokens; index ${:.6}, query ${:.6})",
            self.window.label(),
            self.total_cost_usd,
            self.event_count,
            self.total_tokens,
            self.index_cost_usd,
            self.query_cost_usd,
        )
    }
}

/// Aggregate the events falling inside `window` as of `now`.
///
/// Zero matching events produce an all-zero report, never an error.
pub fn window_report(events: &[CostEvent], window: CostWindow, now: DateTime<Local>) -> CostReport {
    let mut report = CostReport::empty(window);

    for event in events {
        if !window.contains(event.timestamp, now) {
            continue;
        }
        report.event_count += 1;
        report.total_cost_usd += event.cost_usd;
        report.total_tokens += event.tokens;
        match event.kind {
            CostKind::Index => report.index_cost_usd += event.cost_usd,
            CostKind::Query => report.query_cost_usd += event.cost_usd,
        }
    }

    report
}

/// Classify a free-text cost question and report on the matched window.
pub fn answer_cost_query(events: &[CostEvent], query: &str, now: DateTime<Local>) -> CostReport {
    window_report(events, CostWindow::classify(query), now)
}

/// Render the full-history summary: totals, per-kind breakdown, and the
/// four standard calendar windows.
pub fn render_summary(events: &[CostEvent], now: DateTime<Local>) -> String {
    let all = window_report(events, CostWindow::AllTime, now);
    let index_count = events.iter().filter(|e| e.kind == CostKind::Index).count();
    let query_count = events.len() - index_count;

    let mut out = String::new();
    let rule = "=".repeat(60);
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "COST SUMMARY");
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "Total Cost: ${:.6} USD", all.total_cost_usd);
    let _ = writeln!(out, "Total Transactions: {}", all.event_count);
    let _ = writeln!(out);
    let _ = writeln!(out, "By Transaction Type:");
    let _ = writeln!(out, "  Index:  {} events, ${:.6} USD", index_count, all.index_cost_usd);
    let _ = writeln!(out, "  Query:  {} events, ${:.6} USD", query_count, all.query_cost_usd);
    let _ = writeln!(out);

    for window in [
        CostWindow::Today,
        CostWindow::Yesterday,
        CostWindow::ThisWeek,
        CostWindow::ThisMonth,
    ] {
        let report = window_report(events, window, now);
        let _ = writeln!(
            out,
            "{}: ${:.6} USD",
            capitalize(window.label()),
            report.total_cost_usd
        );
    }
    let _ = writeln!(out, "{rule}");

    out
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn event_at(days_ago: i64, kind: CostKind, tokens: u64, cost: f64) -> CostEvent {
        let ts = Utc::now() - Duration::days(days_ago);
        match kind {
            CostKind::Index => CostEvent::index(ts, tokens, cost),
            CostKind::Query => CostEvent::query(ts, tokens, cost),
        }
    }

    fn sample_ledger() -> Vec<CostEvent> {
        vec![
            event_at(0, CostKind::Query, 100, 0.01),
            event_at(1, CostKind::Index, 200, 0.02),
            event_at(10, CostKind::Index, 400, 0.04),
        ]
    }

    #[test]
    fn test_today_counts_only_today() {
        let report = window_report(&sample_ledger(), CostWindow::Today, Local::now());
        assert_eq!(report.event_count, 1);
        assert!((report.total_cost_usd - 0.01).abs() < 1e-9);
        assert_eq!(report.total_tokens, 100);
        assert_eq!(report.index_cost_usd, 0.0);
    }

    #[test]
    fn test_all_time_counts_everything() {
        let report = window_report(&sample_ledger(), CostWindow::AllTime, Local::now());
        assert_eq!(report.event_count, 3);
        assert!((report.total_cost_usd - 0.07).abs() < 1e-9);
        assert!((report.index_cost_usd - 0.06).abs() < 1e-9);
        assert!((report.query_cost_usd - 0.01).abs() < 1e-9);
        assert_eq!(report.total_tokens, 700);
    }

    #[test]
    fn test_this_week_excludes_ten_days_ago() {
        // The 10-day-old event is never inside this week. The 1-day-old
        // event is inside only when yesterday shares the week (i.e. today
        // is not Monday), so the total is 0.01 or 0.03 but never 0.07.
        let now = Local::now();
        let report = window_report(&sample_ledger(), CostWindow::ThisWeek, now);
        assert!(report.event_count >= 1 && report.event_count <= 2);
        assert!(report.index_cost_usd < 0.03);
        assert!(report.total_cost_usd < 0.05);
    }

    #[test]
    fn test_empty_ledger_is_all_zeros() {
        for window in [
            CostWindow::Today,
            CostWindow::Yesterday,
            CostWindow::ThisWeek,
            CostWindow::ThisMonth,
            CostWindow::AllTime,
        ] {
            let report = window_report(&[], window, Local::now());
            assert_eq!(report, CostReport::empty(window));
        }
    }

    #[test]
    fn test_answer_cost_query_routes_through_classifier() {
        let events = sample_ledger();
        let report = answer_cost_query(&events, "total cost since project began", Local::now());
        assert_eq!(report.window, CostWindow::AllTime);
        assert_eq!(report.event_count, 3);
    }

    #[test]
    fn test_render_summary_mentions_windows() {
        let out = render_summary(&sample_ledger(), Local::now());
        assert!(out.contains("COST SUMMARY"));
        assert!(out.contains("Today:"));
        assert!(out.contains("Yesterday:"));
        assert!(out.contains("This week:"));
        assert!(out.contains("This month:"));
    }
}
