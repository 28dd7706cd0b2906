//! Time formatting helpers

/// Format seconds as `m:ss`
///
/// Fractional seconds are floored. NaN, infinite and negative inputs format
/// as `0:00`, which is what a progress label shows before metadata loads.
///
/// ```rust
/// use cadence_core::format_duration;
///
/// assert_eq!(format_duration(0.0), "0:00");
/// assert_eq!(format_duration(61.7), "1:01");
/// assert_eq!(format_duration(f64::NAN), "0:00");
/// ```
pub fn format_duration(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "0:00".to_string();
    }

    let total = seconds.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}
