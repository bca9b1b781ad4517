//! Study analytics dashboard

use crate::config::Config;
use crate::error::Result;
use crate::tutor::analytics::{self, DayActivity};
use chrono::Utc;
use colored::Colorize;
use prettytable::{format, row, Table};

/// Handle the `stats` command
///
/// # Arguments
///
/// * `days` - Days of recent activity to chart
/// * `json` - Emit the report as JSON instead of tables
///
/// # Errors
///
/// Returns an error if the store cannot be opened or JSON serialization
/// fails
pub fn run(config: &Config, days: u32, json: bool) -> Result<()> {
    let store = super::open_store(config)?;
    let stats = store.analytics();
    let now = Utc::now();

    let top_topics = analytics::top_topics(&stats, 5);
    let activity = analytics::recent_activity(&stats, days, now);
    let insights = analytics::study_insights(&stats);

    if json {
        let report = serde_json::json!({
            "total_sessions": stats.total_sessions,
            "total_messages": stats.total_messages,
            "streak_days": stats.streak_days,
            "last_study_date": stats.last_study_date,
            "top_topics": top_topics,
            "recent_activity": activity,
            "insights": insights,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", "Study statistics".bold());

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);
    table.add_row(row!["Total sessions", stats.total_sessions]);
    table.add_row(row!["Total messages", stats.total_messages]);
    table.add_row(row!["Streak", format!("{} day(s)", stats.streak_days)]);
    if let Some(last) = stats.last_study_date {
        table.add_row(row!["Last studied", last.format("%Y-%m-%d %H:%M")]);
    }
    table.printstd();

    if !top_topics.is_empty() {
        println!("\n{}", "Top topics".bold());
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_BOX_CHARS);
        table.set_titles(row!["Topic", "Sessions"]);
        for entry in &top_topics {
            table.add_row(row![entry.topic, entry.count]);
        }
        table.printstd();
    }

    println!("\n{}", format!("Last {} days", days).bold());
    for day in &activity {
        println!("{}", format_activity_line(day));
    }

    if !insights.is_empty() {
        println!("\n{}", "Insights".bold());
        for insight in &insights {
            println!("  {}: {}", insight.title, insight.value.clone().cyan());
        }
    }

    Ok(())
}

/// One line of the activity chart, e.g. `Aug 26  ### (3)`
fn format_activity_line(day: &DayActivity) -> String {
    let bar = "#".repeat(day.count as usize);
    let marker = if day.is_today { " (today)" } else { "" };
    format!("{:>8}  {} ({}){}", day.label, bar, day.count, marker)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_activity_line() {
        let day = DayActivity {
            date: "2026-08-26".to_string(),
            label: "Aug 26".to_string(),
            count: 3,
            is_today: true,
        };
        let line = format_activity_line(&day);
        assert!(line.contains("###"));
        assert!(line.contains("(3)"));
        assert!(line.ends_with("(today)"));
    }

    #[test]
    fn test_format_activity_line_empty_day() {
        let day = DayActivity {
            date: "2026-08-25".to_string(),
            label: "Aug 25".to_string(),
            count: 0,
            is_today: false,
        };
        let line = format_activity_line(&day);
        assert!(line.contains("(0)"));
        assert!(!line.contains("today"));
    }
}
