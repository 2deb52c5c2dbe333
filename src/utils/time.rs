use chrono::{DateTime, Duration as ChronoDuration, Local, NaiveDateTime, Offset, TimeZone};
use std::time::Duration;

/// Seconds past midnight at which the daily job fires, so that a slightly
/// early timer wake-up still lands on the new day.
pub const MIDNIGHT_OFFSET_SECS: u32 = 5;

/// Time left until the next local midnight plus [`MIDNIGHT_OFFSET_SECS`].
pub fn until_next_midnight() -> Duration {
    until_next_midnight_from(Local::now())
}

/// Time from `now` until tomorrow's midnight plus the offset, in `now`'s zone.
pub fn until_next_midnight_from<Tz: TimeZone>(now: DateTime<Tz>) -> Duration {
    let target = next_midnight(now.naive_local());

    // A midnight inside a DST gap is resolved with the current offset
    let resolved = now
        .timezone()
        .from_local_datetime(&target)
        .earliest()
        .map(|t| t.naive_utc())
        .unwrap_or_else(|| {
            target - ChronoDuration::seconds(now.offset().fix().local_minus_utc() as i64)
        });

    (resolved - now.naive_utc()).to_std().unwrap_or(Duration::ZERO)
}

fn next_midnight(now: NaiveDateTime) -> NaiveDateTime {
    let tomorrow = now.date() + ChronoDuration::days(1);
    tomorrow
        .and_hms_opt(0, 0, MIDNIGHT_OFFSET_SECS)
        .unwrap_or_else(|| tomorrow.and_time(chrono::NaiveTime::MIN))
}

/// Format a duration as e.g. `5h 03m 07s`.
pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    let hours = total / 3600;
    let mins = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{}h {:02}m {:02}s", hours, mins, secs)
    } else if mins > 0 {
        format!("{}m {:02}s", mins, secs)
    } else {
        format!("{}s", secs)
    }
}

/// Coarse human description of how long ago `since` was, e.g. `3 days ago`.
pub fn humanize_since(since: DateTime<chrono::Utc>, now: DateTime<chrono::Utc>) -> String {
    let elapsed = now.signed_duration_since(since);

    let (amount, unit) = if elapsed.num_days() > 0 {
        (elapsed.num_days(), "day")
    } else if elapsed.num_hours() > 0 {
        (elapsed.num_hours(), "hour")
    } else if elapsed.num_minutes() > 0 {
        (elapsed.num_minutes(), "minute")
    } else {
        return "just now".to_string();
    };

    if amount == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", amount, unit)
    }
}
