//! Human-readable duration formatting

use std::time::Duration;

/// Format a duration into a human-readable string
///
/// ```
/// use std::time::Duration;
///
/// use console_common::time::format_duration;
///
/// assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
/// assert_eq!(format_duration(Duration::from_secs(65)), "1m 5s");
/// assert_eq!(format_duration(Duration::from_secs(3665)), "1h 1m 5s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();

    if total_secs == 0 {
        return format!("{}ms", duration.as_millis());
    }

    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    let components = [(hours, "h"), (minutes, "m"), (seconds, "s")];
    let start_index =
        components.iter().position(|(value, _)| *value > 0).unwrap_or(components.len() - 1);

    components[start_index..]
        .iter()
        .map(|(value, suffix)| format!("{value}{suffix}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Age of a snapshot for display, rounded down to whole seconds.
pub fn format_age(age: Duration) -> String {
    if age < Duration::from_secs(1) {
        "just now".to_string()
    } else {
        format!("{} ago", format_duration(Duration::from_secs(age.as_secs())))
    }
}
