// Compact human-readable durations ("1m 32.4s", "532ms").

use time::Duration;

const MS_PER_SECOND: f64 = 1_000.0;
const MS_PER_MINUTE: u64 = 60_000;
const MS_PER_HOUR: u64 = 3_600_000;
const MS_PER_DAY: u64 = 86_400_000;

// Guards against floating-point residue when flooring seconds (e.g. 2.9999999 for 3.0).
const SECONDS_ROUNDING_EPSILON: f64 = 1e-7;

/// Render a `time::Duration` compactly. Negative durations render as zero.
pub fn humanize(duration: Duration) -> String {
    let ms = duration.whole_microseconds() as f64 / 1_000.0;
    humanize_ms(ms, None)
}

/// Render a millisecond value compactly.
///
/// Below one second the value is shown in milliseconds, with `ms_decimal_digits`
/// fractional digits when given. From one second up the value is split into
/// days, hours, minutes and seconds; seconds keep one floored decimal digit.
pub fn humanize_ms(ms: f64, ms_decimal_digits: Option<usize>) -> String {
    // Step 1: Treat NaN, infinities and negatives as zero.
    let ms = if ms.is_finite() && ms > 0.0 { ms } else { 0.0 };
    if ms == 0.0 {
        return "0ms".to_string();
    }

    // Step 2: Sub-second values stay in milliseconds.
    if ms < MS_PER_SECOND {
        return match ms_decimal_digits {
            Some(digits) => format!("{ms:.digits$}ms"),
            None => {
                let rounded = if ms >= 1.0 { ms.round() } else { ms.ceil() };
                format!("{}ms", rounded as u64)
            }
        };
    }

    // Step 3: Split into whole days, hours and minutes.
    let whole = ms as u64;
    let mut parts = Vec::with_capacity(4);
    let days = whole / MS_PER_DAY;
    let hours = (whole / MS_PER_HOUR) % 24;
    let minutes = (whole / MS_PER_MINUTE) % 60;
    if days > 0 {
        parts.push(format!("{days}d"));
    }
    if hours > 0 {
        parts.push(format!("{hours}h"));
    }
    if minutes > 0 {
        parts.push(format!("{minutes}m"));
    }

    // Step 4: Seconds keep one floored decimal digit, without a trailing ".0".
    let seconds = (ms / MS_PER_SECOND) % 60.0;
    let seconds = (seconds * 10.0 + SECONDS_ROUNDING_EPSILON).floor() / 10.0;
    if seconds > 0.0 {
        let rendered = format!("{seconds:.1}");
        let rendered = rendered.strip_suffix(".0").unwrap_or(&rendered);
        parts.push(format!("{rendered}s"));
    }

    parts.join(" ")
}
