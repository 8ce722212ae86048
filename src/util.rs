/// Format a second count as MM:SS for the countdown display.
pub fn format_duration(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_zero() {
        assert_eq!(format_duration(0), "00:00");
    }

    #[test]
    fn test_format_under_a_minute() {
        assert_eq!(format_duration(5), "00:05");
        assert_eq!(format_duration(59), "00:59");
    }

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_duration(60), "01:00");
        assert_eq!(format_duration(90), "01:30");
        assert_eq!(format_duration(615), "10:15");
    }

    #[test]
    fn test_format_over_an_hour_keeps_minutes() {
        assert_eq!(format_duration(3725), "62:05");
    }
}
