//! Closed-session history listing

use crate::config::Config;
use crate::error::Result;
use crate::store::StudySession;
use prettytable::{format, row, Table};

/// Handle the `sessions` command
///
/// # Errors
///
/// Returns an error if the store cannot be opened
pub fn run(config: &Config) -> Result<()> {
    let store = super::open_store(config)?;
    let sessions = store.sessions();

    if sessions.is_empty() {
        println!("No closed sessions yet.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);
    table.set_titles(row!["Started", "Duration", "Messages", "Topics"]);

    for session in sessions.iter().rev() {
        table.add_row(row![
            session.start_time.format("%Y-%m-%d %H:%M"),
            format_duration(session),
            session.message_count,
            session.topics.join(", "),
        ]);
    }

    table.printstd();
    Ok(())
}

fn format_duration(session: &StudySession) -> String {
    match session.end_time {
        Some(end) => {
            let minutes = (end - session.start_time).num_minutes();
            format!("{} min", minutes.max(0))
        }
        None => "open".to_string(),
    }
}
