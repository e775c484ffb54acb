//! Integration tests exercising the ledger and query engine together.

use chrono::{Duration, Local, Utc};
use tempfile::TempDir;
use tuberag_cost::{
    answer_cost_query, render_summary, window_report, CostEvent, CostKind, CostLedger, CostWindow,
    Pricing,
};

#[test]
fn test_ledger_round_trip_and_window_queries() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("costs.json");
    let pricing = Pricing::default();

    {
        let mut ledger = CostLedger::load(&path).unwrap();
        let now = Utc::now();

        // yesterday, today, and 10 days ago
        ledger
            .record(CostEvent::index(
                now - Duration::days(1),
                2_000_000,
                pricing.indexing_cost(2_000_000),
            ))
            .unwrap();
        ledger
            .record(CostEvent::query(
                now,
                1_500,
                pricing.query_cost(1_000, 500),
            ))
            .unwrap();
        ledger
            .record(CostEvent::index(
                now - Duration::days(10),
                4_000_000,
                pricing.indexing_cost(4_000_000),
            ))
            .unwrap();
    }

    // Reload from disk: every mutation was persisted.
    let ledger = CostLedger::load(&path).unwrap();
    assert_eq!(ledger.len(), 3);

    let local_now = Local::now();

    let today = window_report(ledger.events(), CostWindow::Today, local_now);
    assert_eq!(today.event_count, 1);
    assert_eq!(today.index_cost_usd, 0.0);
    assert!(today.query_cost_usd > 0.0);

    let all = window_report(ledger.events(), CostWindow::AllTime, local_now);
    assert_eq!(all.event_count, 3);
    assert!((all.total_cost_usd - ledger.total_cost()).abs() < 1e-9);

    // 10-day-old event never lands in this week.
    let week = window_report(ledger.events(), CostWindow::ThisWeek, local_now);
    assert!(week.index_cost_usd < pricing.indexing_cost(4_000_000));

    // Free-text routing
    let report = answer_cost_query(ledger.events(), "total since the project began", local_now);
    assert_eq!(report.window, CostWindow::AllTime);
    assert_eq!(report.event_count, 3);
}

#[test]
fn test_empty_ledger_summary_is_zeros() {
    let tmp = TempDir::new().unwrap();
    let ledger = CostLedger::load(tmp.path().join("costs.json")).unwrap();

    for query in ["today", "yesterday", "this week", "this month", "total", "??"] {
        let report = answer_cost_query(ledger.events(), query, Local::now());
        assert_eq!(report.event_count, 0);
        assert_eq!(report.total_cost_usd, 0.0);
        assert_eq!(report.total_tokens, 0);
    }

    let summary = render_summary(ledger.events(), Local::now());
    assert!(summary.contains("Total Transactions: 0"));
}

#[test]
fn test_kind_split_matches_recorded_kinds() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("costs.json");

    let mut ledger = CostLedger::load(&path).unwrap();
    ledger.record(CostEvent::index(Utc::now(), 10, 0.4)).unwrap();
    ledger.record(CostEvent::query(Utc::now(), 20, 0.1)).unwrap();
    ledger.record(CostEvent::query(Utc::now(), 30, 0.2)).unwrap();

    let all = window_report(ledger.events(), CostWindow::AllTime, Local::now());
    assert!((all.index_cost_usd - 0.4).abs() < 1e-9);
    assert!((all.query_cost_usd - 0.3).abs() < 1e-9);
    assert_eq!(
        ledger
            .events()
            .iter()
            .filter(|e| e.kind == CostKind::Query)
            .count(),
        2
    );
}
