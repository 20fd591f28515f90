//! Read-only aggregation over completed sessions. Everything here is
//! recomputed per query; with a single user and bounded history there is
//! nothing worth maintaining incrementally.

use chrono::{DateTime, Duration, Local, NaiveDate};
use itertools::Itertools;

use crate::util::mean;
use crate::workout::WorkoutSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum TimeWindow {
    Week,
    Month,
    Quarter,
    Year,
    AllTime,
}

impl TimeWindow {
    /// Earliest start time still inside the window, or None for all-time.
    pub fn cutoff(&self, now: DateTime<Local>) -> Option<DateTime<Local>> {
        let days = match self {
            TimeWindow::Week => 7,
            TimeWindow::Month => 30,
            TimeWindow::Quarter => 90,
            TimeWindow::Year => 365,
            TimeWindow::AllTime => return None,
        };
        Some(now - Duration::days(days))
    }
}

/// All sessions performed on one calendar day, newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct DayGroup {
    pub day: NaiveDate,
    pub sessions: Vec<WorkoutSession>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct HistorySummary {
    pub total_workouts: usize,
    pub total_duration_secs: u64,
    pub total_calories: u64,
    pub avg_duration_secs: f64,
}

/// Keeps completed sessions whose start time falls inside `window`.
pub fn filter_window(
    sessions: &[WorkoutSession],
    window: TimeWindow,
    now: DateTime<Local>,
) -> Vec<WorkoutSession> {
    let cutoff = window.cutoff(now);
    sessions
        .iter()
        .filter(|s| s.completed)
        .filter(|s| cutoff.map_or(true, |c| s.started_at >= c))
        .cloned()
        .collect()
}

/// Groups sessions by calendar day, days descending, sessions within a day
/// newest first.
pub fn group_by_day(sessions: Vec<WorkoutSession>) -> Vec<DayGroup> {
    let newest_first = sessions
        .into_iter()
        .sorted_by(|a, b| b.started_at.cmp(&a.started_at));
    let chunks = newest_first.chunk_by(|s| s.started_at.date_naive());

    let mut groups = Vec::new();
    for (day, group) in &chunks {
        groups.push(DayGroup {
            day,
            sessions: group.collect(),
        });
    }
    groups
}

pub fn summarize(sessions: &[WorkoutSession]) -> HistorySummary {
    let durations: Vec<f64> = sessions.iter().map(|s| s.duration_secs as f64).collect();
    HistorySummary {
        total_workouts: sessions.len(),
        total_duration_secs: sessions.iter().map(|s| s.duration_secs).sum(),
        total_calories: sessions
            .iter()
            .filter_map(|s| s.calories)
            .map(u64::from)
            .sum(),
        avg_duration_secs: mean(&durations).unwrap_or(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workout::{Difficulty, ExerciseCategory, WorkoutTemplate};
    use chrono::TimeZone;

    fn session_at(started_at: DateTime<Local>, duration_secs: u64, completed: bool) -> WorkoutSession {
        let template = WorkoutTemplate {
            id: "full-body".into(),
            name: "Full Body".into(),
            description: String::new(),
            category: ExerciseCategory::Strength,
            difficulty: Difficulty::Beginner,
            estimated_mins: 40,
            exercises: Vec::new(),
        };
        let mut s = WorkoutSession::new(&template, started_at);
        s.duration_secs = duration_secs;
        s.completed = completed;
        s.calories = Some(200);
        s
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn week_filter_keeps_only_in_window_sessions() {
        let now = at(2026, 8, 30, 12);
        let sessions = vec![
            session_at(at(2026, 8, 29, 9), 1800, true),
            session_at(at(2026, 8, 27, 9), 1800, true),
            session_at(at(2026, 8, 25, 9), 1800, true),
            session_at(at(2026, 8, 10, 9), 1800, true),
            session_at(at(2026, 7, 1, 9), 1800, true),
        ];

        let filtered = filter_window(&sessions, TimeWindow::Week, now);
        assert_eq!(filtered.len(), 3);

        let grouped = group_by_day(filtered);
        assert_eq!(grouped.len(), 3);
        let days: Vec<_> = grouped.iter().map(|g| g.day).collect();
        let mut sorted = days.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(days, sorted, "days must be descending");
    }

    #[test]
    fn filter_drops_incomplete_sessions() {
        let now = at(2026, 8, 30, 12);
        let sessions = vec![
            session_at(at(2026, 8, 29, 9), 1800, true),
            session_at(at(2026, 8, 29, 18), 600, false),
        ];

        let filtered = filter_window(&sessions, TimeWindow::Week, now);
        assert_eq!(filtered.len(), 1);
        assert!(filtered[0].completed);
    }

    #[test]
    fn all_time_has_no_cutoff() {
        let now = at(2026, 8, 30, 12);
        assert_eq!(TimeWindow::AllTime.cutoff(now), None);

        let sessions = vec![
            session_at(at(2020, 1, 1, 9), 1800, true),
            session_at(at(2026, 8, 29, 9), 1800, true),
        ];
        assert_eq!(filter_window(&sessions, TimeWindow::AllTime, now).len(), 2);
    }

    #[test]
    fn same_day_sessions_group_together_newest_first() {
        let sessions = vec![
            session_at(at(2026, 8, 28, 7), 1800, true),
            session_at(at(2026, 8, 28, 19), 2400, true),
            session_at(at(2026, 8, 29, 9), 1200, true),
        ];

        let grouped = group_by_day(sessions);

        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].day, NaiveDate::from_ymd_opt(2026, 8, 29).unwrap());
        assert_eq!(grouped[1].sessions.len(), 2);
        assert!(grouped[1].sessions[0].started_at > grouped[1].sessions[1].started_at);
    }

    #[test]
    fn summary_totals_and_average() {
        let sessions = vec![
            session_at(at(2026, 8, 28, 7), 1800, true),
            session_at(at(2026, 8, 29, 7), 2400, true),
            session_at(at(2026, 8, 30, 7), 3000, true),
        ];

        let summary = summarize(&sessions);

        assert_eq!(summary.total_workouts, 3);
        assert_eq!(summary.total_duration_secs, 7200);
        assert_eq!(summary.total_calories, 600);
        assert_eq!(summary.avg_duration_secs, 2400.0);
    }

    #[test]
    fn summary_of_nothing_is_zeroed() {
        let summary = summarize(&[]);
        assert_eq!(summary, HistorySummary::default());
    }
}
