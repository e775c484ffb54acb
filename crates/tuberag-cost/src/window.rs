//! Calendar-anchored cost windows and the free-text classifier.
//!
//! "How much did yesterday cost?" is answered by matching the query
//! against an ordered phrase table and resolving the matched window to a
//! local-calendar time range. The table is data-driven: a new phrase is a
//! new row, not a new branch.

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};

/// A named, calendar-anchored time range over the cost ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostWindow {
    Today,
    Yesterday,
    ThisWeek,
    ThisMonth,
    AllTime,
}

/// Ordered phrase table: first row whose phrase matches wins.
///
/// Order matters: "yesterday" must be tested before "today" would never
/// match it, and the total/all/began row catches phrasings like "total
/// cost since project began". Matching is case-insensitive substring.
const PHRASE_TABLE: &[(&[&str], CostWindow)] = &[
    (&["yesterday"], CostWindow::Yesterday),
    (&["week"], CostWindow::ThisWeek),
    (&["month"], CostWindow::ThisMonth),
    (&["total", "all", "began", "ever"], CostWindow::AllTime),
    (&["today"], CostWindow::Today),
];

impl CostWindow {
    /// Classify a free-text cost query into a window.
    ///
    /// Unmatched text defaults to [`CostWindow::AllTime`].
    pub fn classify(query: &str) -> Self {
        let query = query.to_lowercase();
        for (phrases, window) in PHRASE_TABLE {
            if phrases.iter().any(|phrase| query.contains(phrase)) {
                return *window;
            }
        }
        CostWindow::AllTime
    }

    /// Human-readable label for reports.
    pub fn label(&self) -> &'static str {
        match self {
            CostWindow::Today => "today",
            CostWindow::Yesterday => "yesterday",
            CostWindow::ThisWeek => "this week",
            CostWindow::ThisMonth => "this month",
            CostWindow::AllTime => "all time",
        }
    }

    /// Resolve this window to a `[start, end)` range anchored to the
    /// local calendar.
    ///
    /// `None` start means unbounded. Every window ends at `now` except
    /// `yesterday`, which ends at today's midnight so today's events
    /// stay out of it.
    pub fn range(&self, now: DateTime<Local>) -> (Option<DateTime<Local>>, DateTime<Local>) {
        let today = now.date_naive();
        match self {
            CostWindow::Today => (Some(day_start(today, now)), now),
            CostWindow::Yesterday => {
                let today_start = day_start(today, now);
                (Some(day_start(today - Duration::days(1), now)), today_start)
            }
            CostWindow::ThisWeek => {
                let monday = today - Duration::days(today.weekday().num_days_from_monday() as i64);
                (Some(day_start(monday, now)), now)
            }
            CostWindow::ThisMonth => {
                let first = today.with_day(1).unwrap_or(today);
                (Some(day_start(first, now)), now)
            }
            CostWindow::AllTime => (None, now),
        }
    }

    /// Whether a UTC timestamp falls inside this window.
    pub fn contains(&self, timestamp: DateTime<Utc>, now: DateTime<Local>) -> bool {
        let (start, end) = self.range(now);
        let local = timestamp.with_timezone(&Local);
        start.is_none_or(|s| local >= s) && local < end
    }
}

/// Local midnight of `date`; falls back to `now` if the local timezone
/// skips that instant (DST transition).
fn day_start(date: NaiveDate, now: DateTime<Local>) -> DateTime<Local> {
    Local
        .from_local_datetime(&date.and_time(NaiveTime::MIN))
        .earliest()
        .unwrap_or(now)
}
