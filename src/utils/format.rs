//! Clock display formatting

/// Format a seconds count as a zero-padded "MM:SS" string.
pub fn format_clock(total_seconds: u64) -> String {
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}", minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_known_values() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(65), "01:05");
        assert_eq!(format_clock(599), "09:59");
        assert_eq!(format_clock(3600), "60:00");
    }

    #[test]
    fn round_trips_minutes_and_seconds() {
        for total in 0..6000 {
            let formatted = format_clock(total);
            let (minutes, seconds) = formatted.split_once(':').unwrap();
            assert_eq!(minutes.len(), 2);
            assert_eq!(seconds.len(), 2);
            let minutes: u64 = minutes.parse().unwrap();
            let seconds: u64 = seconds.parse().unwrap();
            assert_eq!(minutes * 60 + seconds, total);
        }
    }
}
