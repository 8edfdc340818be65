//! Second-count helpers for display and form input

/// Split a number of seconds into hours, minutes and seconds
pub fn split_seconds(total: u64) -> (u64, u64, u64) {
    (total / 3600, (total % 3600) / 60, total % 60)
}

/// Combine hours, minutes and seconds into a number of seconds
pub fn join_seconds(hours: u64, minutes: u64, seconds: u64) -> u64 {
    hours * 3600 + minutes * 60 + seconds
}

/// Render seconds as `HH:MM:SS`
pub fn format_time(total: u64) -> String {
    let (hours, minutes, seconds) = split_seconds(total);
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0), "00:00:00");
        assert_eq!(format_time(180), "00:03:00");
        assert_eq!(format_time(3661), "01:01:01");
        assert_eq!(format_time(86399), "23:59:59");
    }

    #[test]
    fn test_split_and_join_agree() {
        assert_eq!(split_seconds(5025), (1, 23, 45));
        assert_eq!(join_seconds(1, 23, 45), 5025);
    }
}
