//! Human-readable formatting for the progress summary.

/// Formats a duration in seconds as `"{hours}h {minutes}m"`.
///
/// Non-positive and non-finite inputs render as `"0h 0m"`. Seconds are
/// floored away, never rounded up, so 59 seconds is still `"0h 0m"`.
pub fn format_duration(secs: f64) -> String {
    if !secs.is_finite() || secs <= 0.0 {
        return "0h 0m".to_string();
    }
    let minutes = (secs / 60.0).floor() as u64;
    format!("{}h {}m", minutes / 60, minutes % 60)
}

/// Formats a distance in meters as kilometers with two decimals.
pub fn format_km(meters: f64) -> String {
    format!("{:.2}", meters / 1000.0)
}
