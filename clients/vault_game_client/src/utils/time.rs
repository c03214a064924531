use std::time::{SystemTime, UNIX_EPOCH};

/// Seconds since the unix epoch on the local clock. 0 if the clock is
/// before the epoch.
pub fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

/// Countdown text: `1d 02h 03m`, `2h 03m 04s` or `3m 04s`.
pub fn format_duration(seconds: i64) -> String {
    if seconds < 0 {
        return "\u{2014}".to_string();
    }
    let days = seconds / 86_400;
    let hours = seconds % 86_400 / 3_600;
    let mins = seconds % 3_600 / 60;
    let secs = seconds % 60;

    if days > 0 {
        format!("{days}d {hours:02}h {mins:02}m")
    } else if hours > 0 {
        format!("{hours}h {mins:02}m {secs:02}s")
    } else {
        format!("{mins}m {secs:02}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_the_largest_unit() {
        assert_eq!(format_duration(0), "0m 00s");
        assert_eq!(format_duration(59), "0m 59s");
        assert_eq!(format_duration(3_600 + 5 * 60 + 9), "1h 05m 09s");
        assert_eq!(format_duration(2 * 86_400 + 3 * 3_600 + 4 * 60 + 5), "2d 03h 04m");
    }

    #[test]
    fn negative_is_a_dash() {
        assert_eq!(format_duration(-1), "\u{2014}");
    }

    #[test]
    fn clock_is_past_2020() {
        assert!(unix_now() > 1_577_836_800);
    }
}
