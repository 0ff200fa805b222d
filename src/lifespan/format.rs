// Duration rendering for report lines.

use chrono::TimeDelta;

/// Render a duration as `H:MM:SS`, prefixed with `N day(s), ` past one day.
pub fn format_duration(duration: TimeDelta) -> String {
    let total = duration.num_seconds();
    let sign = if total < 0 { "-" } else { "" };
    let secs = total.unsigned_abs();

    let days = secs / 86_400;
    let rem = secs % 86_400;
    let clock = format!("{}:{:02}:{:02}", rem / 3600, rem % 3600 / 60, rem % 60);

    match days {
        0 => format!("{}{}", sign, clock),
        1 => format!("{}1 day, {}", sign, clock),
        n => format!("{}{} days, {}", sign, n, clock),
    }
}
