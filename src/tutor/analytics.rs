//! Analytics folding and reporting
//!
//! Pure functions over the cumulative [`Analytics`] record: folding a closed
//! session into the counters, the streak scan, and the derived reports shown
//! on the stats surface.

use crate::store::{date_key, Analytics, StudySession};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::HashMap;

/// Days scanned backward when computing the streak
const STREAK_WINDOW_DAYS: i64 = 30;

/// Folds a closed session into the cumulative analytics record
///
/// Counters are append-only: totals and buckets only ever grow. The streak
/// is recomputed from the updated daily activity.
pub fn fold_session(analytics: &mut Analytics, session: &StudySession, now: DateTime<Utc>) {
    analytics.total_sessions += 1;
    analytics.total_messages += u64::from(session.message_count);
    analytics.last_study_date = Some(now);

    let day = date_key(&now);
    *analytics.daily_activity.entry(day).or_insert(0) += 1;

    for topic in &session.topics {
        *analytics.topic_frequency.entry(topic.clone()).or_insert(0) += 1;
    }

    analytics.streak_days = calculate_streak(&analytics.daily_activity, now);
}

/// Computes the consecutive-day study streak ending at `today`
///
/// Scans backward day by day over the last 30 days, counting active days and
/// stopping at the first gap after day zero. A day with no activity today
/// does not stop the scan, so an active yesterday still counts as a streak
/// of one. That boundary is intentional and pinned by tests.
pub fn calculate_streak(daily_activity: &HashMap<String, u32>, today: DateTime<Utc>) -> u32 {
    let mut streak = 0;

    for i in 0..STREAK_WINDOW_DAYS {
        let day = today - Duration::days(i);
        let active = daily_activity
            .get(&date_key(&day))
            .copied()
            .unwrap_or(0)
            > 0;

        if active {
            streak += 1;
        } else if i > 0 {
            break;
        }
    }

    streak
}

/// A topic and how many sessions touched it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicCount {
    pub topic: String,
    pub count: u32,
}

/// The most-studied topics, highest count first
///
/// Ties break alphabetically so the report is stable across runs.
pub fn top_topics(analytics: &Analytics, limit: usize) -> Vec<TopicCount> {
    let mut topics: Vec<TopicCount> = analytics
        .topic_frequency
        .iter()
        .map(|(topic, count)| TopicCount {
            topic: topic.clone(),
            count: *count,
        })
        .collect();

    topics.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.topic.cmp(&b.topic)));
    topics.truncate(limit);
    topics
}

/// One day in the recent-activity report
#[derive(Debug, Clone, Serialize)]
pub struct DayActivity {
    /// `YYYY-MM-DD` bucket key
    pub date: String,
    /// Human-readable label, e.g. `Aug 26`
    pub label: String,
    pub count: u32,
    pub is_today: bool,
}

/// Per-day session counts for the last `days` days, oldest first
pub fn recent_activity(analytics: &Analytics, days: u32, today: DateTime<Utc>) -> Vec<DayActivity> {
    (0..i64::from(days))
        .rev()
        .map(|i| {
            let day = today - Duration::days(i);
            let key = date_key(&day);
            DayActivity {
                count: analytics.daily_activity.get(&key).copied().unwrap_or(0),
                label: day.format("%b %-d").to_string(),
                date: key,
                is_today: i == 0,
            }
        })
        .collect()
}

/// A single derived insight for the stats surface
#[derive(Debug, Clone, Serialize)]
pub struct Insight {
    pub title: String,
    pub value: String,
}

/// Derived insights: streak, average messages per session, top topic
///
/// Only insights with data behind them are emitted; a fresh install yields
/// an empty list.
pub fn study_insights(analytics: &Analytics) -> Vec<Insight> {
    let mut insights = Vec::new();

    if analytics.streak_days > 0 {
        let plural = if analytics.streak_days > 1 { "s" } else { "" };
        insights.push(Insight {
            title: "Study Streak".to_string(),
            value: format!("{} day{}", analytics.streak_days, plural),
        });
    }

    if analytics.total_sessions > 0 {
        let avg = (analytics.total_messages as f64 / analytics.total_sessions as f64).round();
        insights.push(Insight {
            title: "Avg. Questions per Session".to_string(),
            value: format!("{}", avg as u64),
        });
    }

    if let Some(top) = top_topics(analytics, 1).into_iter().next() {
        insights.push(Insight {
            title: "Most Studied Topic".to_string(),
            value: top.topic,
        });
    }

    insights
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(offset: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 26, 12, 0, 0).unwrap() - Duration::days(-offset)
    }

    fn activity(pairs: &[(i64, u32)]) -> HashMap<String, u32> {
        pairs
            .iter()
            .map(|(offset, count)| (date_key(&day(*offset)), *count))
            .collect()
    }

    #[test]
    fn test_fold_session_updates_counters() {
        let now = day(0);
        let mut analytics = Analytics::default();
        let mut session = StudySession::start();
        session.message_count = 6;
        session.topics = vec!["binary trees".to_string(), "recursion".to_string()];

        fold_session(&mut analytics, &session, now);

        assert_eq!(analytics.total_sessions, 1);
        assert_eq!(analytics.total_messages, 6);
        assert_eq!(analytics.last_study_date, Some(now));
        assert_eq!(analytics.daily_activity.get(&date_key(&now)), Some(&1));
        assert_eq!(analytics.topic_frequency.get("binary trees"), Some(&1));
        assert_eq!(analytics.streak_days, 1);
    }

    #[test]
    fn test_fold_session_counters_only_grow() {
        let now = day(0);
        let mut analytics = Analytics::default();
        let mut session = StudySession::start();
        session.message_count = 2;
        session.topics = vec!["algebra".to_string()];

        fold_session(&mut analytics, &session, now);
        fold_session(&mut analytics, &session, now);

        assert_eq!(analytics.total_sessions, 2);
        assert_eq!(analytics.total_messages, 4);
        assert_eq!(analytics.daily_activity.get(&date_key(&now)), Some(&2));
        assert_eq!(analytics.topic_frequency.get("algebra"), Some(&2));
    }

    #[test]
    fn test_streak_consecutive_days() {
        let daily = activity(&[(0, 1), (-1, 2), (-2, 1)]);
        assert_eq!(calculate_streak(&daily, day(0)), 3);
    }

    #[test]
    fn test_streak_stops_at_gap() {
        let daily = activity(&[(0, 1), (-1, 1), (-3, 1)]);
        assert_eq!(calculate_streak(&daily, day(0)), 2);
    }

    #[test]
    fn test_streak_no_activity_at_all() {
        assert_eq!(calculate_streak(&HashMap::new(), day(0)), 0);
    }

    #[test]
    fn test_streak_inactive_today_counts_yesterday() {
        // Day zero never breaks the scan, so yesterday alone yields 1
        let daily = activity(&[(-1, 1)]);
        assert_eq!(calculate_streak(&daily, day(0)), 1);
    }

    #[test]
    fn test_streak_inactive_today_and_yesterday_is_zero() {
        let daily = activity(&[(-2, 1)]);
        assert_eq!(calculate_streak(&daily, day(0)), 0);
    }

    #[test]
    fn test_streak_capped_by_scan_window() {
        let pairs: Vec<(i64, u32)> = (0..40).map(|i| (-i, 1)).collect();
        let daily = activity(&pairs);
        assert_eq!(calculate_streak(&daily, day(0)), 30);
    }

    #[test]
    fn test_top_topics_orders_and_truncates() {
        let mut analytics = Analytics::default();
        analytics.topic_frequency.insert("algebra".to_string(), 3);
        analytics.topic_frequency.insert("calculus".to_string(), 5);
        analytics.topic_frequency.insert("biology".to_string(), 3);

        let top = top_topics(&analytics, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].topic, "calculus");
        // Tie between algebra and biology breaks alphabetically
        assert_eq!(top[1].topic, "algebra");
    }

    #[test]
    fn test_recent_activity_spans_ending_today() {
        let mut analytics = Analytics::default();
        analytics.daily_activity.insert(date_key(&day(0)), 2);
        analytics.daily_activity.insert(date_key(&day(-2)), 1);

        let report = recent_activity(&analytics, 3, day(0));
        assert_eq!(report.len(), 3);
        assert_eq!(report[0].count, 1);
        assert!(!report[0].is_today);
        assert_eq!(report[1].count, 0);
        assert_eq!(report[2].count, 2);
        assert!(report[2].is_today);
        assert_eq!(report[2].date, "2026-08-26");
    }

    #[test]
    fn test_study_insights_empty_on_fresh_record() {
        assert!(study_insights(&Analytics::default()).is_empty());
    }

    #[test]
    fn test_study_insights_complete() {
        let mut analytics = Analytics::default();
        analytics.streak_days = 3;
        analytics.total_sessions = 4;
        analytics.total_messages = 10;
        analytics.topic_frequency.insert("physics".to_string(), 2);

        let insights = study_insights(&analytics);
        assert_eq!(insights.len(), 3);
        assert_eq!(insights[0].value, "3 days");
        assert_eq!(insights[1].value, "3"); // 10/4 rounds to 3
        assert_eq!(insights[2].value, "physics");
    }
}
