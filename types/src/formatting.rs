//! Display formatting for times and multipliers.
//!
//! The freeplay device and the simulator status lines both go through
//! these helpers so the clock text stays identical everywhere.

/// Format a starting time as `M:SS`, the way the freeplay device shows it.
///
/// Minutes are the truncated total minutes, so values past an hour keep
/// counting up (`75:00`) instead of rolling into hours. Negative and
/// non-finite values clamp to `0:00`.
///
/// # Examples
/// ```
/// use tweaks_types::formatting::format_clock;
/// assert_eq!(format_clock(300.0), "5:00");
/// assert_eq!(format_clock(180.0), "3:00");
/// assert_eq!(format_clock(90.7), "1:30");
/// assert_eq!(format_clock(4500.0), "75:00");
/// assert_eq!(format_clock(-3.0), "0:00");
/// ```
pub fn format_clock(secs: f32) -> String {
    let secs = if secs.is_finite() { secs.max(0.0) } else { 0.0 };
    let mins = (secs / 60.0).floor() as u32;
    let remaining_secs = (secs % 60.0).floor() as u32;
    format!("{}:{:02}", mins, remaining_secs)
}

/// Format a live entity timer.
///
/// - Values >= 60s: `M:SS`
/// - Values >= 10s: whole seconds
/// - Values < 10s: one decimal place
/// - Values <= 0: returns the provided `zero_label`
///
/// # Examples
/// ```
/// use tweaks_types::formatting::format_countdown;
/// assert_eq!(format_countdown(75.3, "0:00"), "1:15");
/// assert_eq!(format_countdown(15.7, "0:00"), "16");
/// assert_eq!(format_countdown(3.5, "0:00"), "3.5");
/// assert_eq!(format_countdown(0.0, "expired"), "expired");
/// ```
pub fn format_countdown(secs: f32, zero_label: &str) -> String {
    if secs <= 0.0 {
        return zero_label.to_string();
    }
    if secs >= 60.0 {
        format_clock(secs)
    } else if secs >= 10.0 {
        format!("{:.0}", secs)
    } else {
        format!("{:.1}", secs)
    }
}

/// Format a score multiplier as `x9.0`.
///
/// # Examples
/// ```
/// use tweaks_types::formatting::format_multiplier;
/// assert_eq!(format_multiplier(9.0), "x9.0");
/// assert_eq!(format_multiplier(1.26), "x1.3");
/// ```
pub fn format_multiplier(multiplier: f32) -> String {
    format!("x{:.1}", multiplier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0.0), "0:00");
        assert_eq!(format_clock(59.9), "0:59");
        assert_eq!(format_clock(60.0), "1:00");
        assert_eq!(format_clock(125.0), "2:05");
        assert_eq!(format_clock(f32::NAN), "0:00");
        assert_eq!(format_clock(f32::INFINITY), "0:00");
    }

    #[test]
    fn test_format_countdown() {
        assert_eq!(format_countdown(75.3, "0:00"), "1:15");
        assert_eq!(format_countdown(15.7, "0:00"), "16");
        assert_eq!(format_countdown(3.5, "0:00"), "3.5");
        assert_eq!(format_countdown(0.001, "0:00"), "0.0");
        assert_eq!(format_countdown(-1.0, "0:00"), "0:00");
    }
}
