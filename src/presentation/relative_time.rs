// src/presentation/relative_time.rs
use chrono::{DateTime, Utc};

/// "Just now", "5 minutes ago", "Yesterday", "May 23"
pub fn format_relative_time(created: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - created).num_seconds();
    if seconds < 60 {
        return "Just now".to_string();
    }

    let minutes = seconds / 60;
    if minutes < 60 {
        return format!("{} minute{} ago", minutes, plural(minutes));
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{} hour{} ago", hours, plural(hours));
    }

    if hours / 24 == 1 {
        return "Yesterday".to_string();
    }

    created.format("%b %-d").to_string()
}

fn plural(count: i64) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}
