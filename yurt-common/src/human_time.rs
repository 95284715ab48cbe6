//! Human-readable duration formatting

/// Format a duration in seconds as `M:SS`, or `H:MM:SS` from one hour up.
///
/// Negative input is clamped to zero.
///
/// ```
/// use yurt_common::human_time::format_duration;
///
/// assert_eq!(format_duration(65), "1:05");
/// assert_eq!(format_duration(3665), "1:01:05");
/// ```
pub fn format_duration(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}
