//! Plain-text transcript export and relative timestamps.

use chrono::{DateTime, Local, TimeZone, Utc};
use lens_types::{message::ChatMessage, thread::ConversationThread};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render a thread as `SENDER [local timestamp]:\nbody`, blank-line separated.
pub fn render_transcript(thread: &ConversationThread) -> String {
    render_transcript_in(thread, &Local)
}

/// Same as [`render_transcript`] with an explicit timezone.
pub fn render_transcript_in<Tz: TimeZone>(thread: &ConversationThread, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    thread
        .messages
        .iter()
        .map(|msg| render_entry(msg, tz))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_entry<Tz: TimeZone>(msg: &ChatMessage, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let stamp = match DateTime::parse_from_rfc3339(&msg.timestamp) {
        Ok(t) => t.with_timezone(tz).format(TIMESTAMP_FORMAT).to_string(),
        Err(_) => msg.timestamp.clone(),
    };
    format!("{} [{}]:\n{}", msg.sender.transcript_label(), stamp, msg.text)
}

pub fn transcript_file_name(thread: &ConversationThread) -> String {
    format!("future-lens-transcript-{}.txt", thread.id)
}

/// Human "time ago" label for an RFC 3339 timestamp; empty if unparsable.
pub fn format_time_ago(timestamp: &str, now: DateTime<Utc>) -> String {
    let then = match DateTime::parse_from_rfc3339(timestamp) {
        Ok(t) => t.with_timezone(&Utc),
        Err(_) => return String::new(),
    };
    let seconds = (now - then).num_seconds();

    if seconds < 5 {
        return "just now".to_string();
    }
    if seconds < 60 {
        return format!("{} secs ago", seconds);
    }
    let minutes = seconds / 60;
    if minutes < 60 {
        return plural(minutes, "min");
    }
    let hours = minutes / 60;
    if hours < 24 {
        return plural(hours, "hour");
    }
    let days = hours / 24;
    if days < 30 {
        return plural(days, "day");
    }
    let months = days / 30;
    if months < 12 {
        return plural(months, "month");
    }
    plural(days / 365, "year")
}

fn plural(n: i64, unit: &str) -> String {
    if n > 1 {
        format!("{} {}s ago", n, unit)
    } else {
        format!("{} {} ago", n, unit)
    }
}
