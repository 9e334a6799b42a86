//! Human-readable distance and duration strings.

/// `"{h}h {m}m"` from one hour upward, `"{m} min"` below. Seconds are truncated.
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes} min")
    }
}

/// Kilometers with one decimal place, exact halves rounded up.
pub fn format_distance(meters: u64) -> String {
    // `x.x5` km is only an exact binary tie when meters % 500 == 250; `{:.1}` would round it to even.
    let meters = if meters % 500 == 250 { meters + 1 } else { meters };
    format!("{:.1} km", meters as f64 / 1000.0)
}
