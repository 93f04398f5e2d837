//! Caption timestamp formatting

/// Formats seconds as `HH:MM:SS,mmm`
pub struct TimestampFormatter;

impl TimestampFormatter {
    /// Absorbs binary representation error such as 1.001 * 1000 = 1000.9999...
    const EPSILON_MS: f64 = 1e-6;

    /// Format non-negative seconds, flooring to the millisecond.
    ///
    /// Hours are not wrapped; minutes, seconds and milliseconds wrap in
    /// their own unit. Negative and NaN input format as zero.
    pub fn format(seconds: f64) -> String {
        let total_ms = Self::total_millis(seconds);
        let hours = total_ms / 3_600_000;
        let minutes = (total_ms / 60_000) % 60;
        let secs = (total_ms / 1000) % 60;
        let millis = total_ms % 1000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, millis)
    }

    /// Whole milliseconds in `seconds`, floored
    pub fn total_millis(seconds: f64) -> u64 {
        if !seconds.is_finite() || seconds <= 0.0 {
            return 0;
        }
        (seconds * 1000.0 + Self::EPSILON_MS).floor() as u64
    }
}
