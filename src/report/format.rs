//! Human-readable formatting of sizes, durations and counts.

const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Format a byte count using 1024-based units.
///
/// Whole bytes are printed without decimals; larger units use two
/// decimal places and the largest unit whose value is at least 1.
pub fn format_bytes(bytes: f64) -> String {
    let bytes = if bytes.is_finite() && bytes > 0.0 {
        bytes
    } else {
        0.0
    };

    // Step up while the printed value would reach 1024
    let mut value = bytes;
    let mut unit = 0;
    while unit < UNITS.len() - 1 && displayed(value, unit) >= 1024.0 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{:.0} B", value)
    } else {
        format!("{:.2} {}", value, UNITS[unit])
    }
}

/// `value` rounded the way it is printed in `unit`.
fn displayed(value: f64, unit: usize) -> f64 {
    if unit == 0 {
        value.round()
    } else {
        (value * 100.0).round() / 100.0
    }
}

fn plural(n: u64, unit: &str) -> String {
    if n == 1 {
        format!("{} {}", n, unit)
    } else {
        format!("{} {}s", n, unit)
    }
}

/// Format a duration given in hours.
///
/// Below one hour: minutes. Below a day: hours and minutes. Otherwise
/// days and hours. Zero parts are dropped.
pub fn format_duration(hours: f64) -> String {
    let hours = if hours.is_finite() && hours > 0.0 {
        hours
    } else {
        0.0
    };
    let total_minutes = (hours * 60.0).round() as u64;

    if total_minutes < 60 {
        return plural(total_minutes, "minute");
    }

    if total_minutes < 24 * 60 {
        let h = total_minutes / 60;
        let m = total_minutes % 60;
        return if m == 0 {
            plural(h, "hour")
        } else {
            format!("{}, {}", plural(h, "hour"), plural(m, "minute"))
        };
    }

    let total_hours = hours.round() as u64;
    let d = total_hours / 24;
    let h = total_hours % 24;
    if h == 0 {
        plural(d, "day")
    } else {
        format!("{}, {}", plural(d, "day"), plural(h, "hour"))
    }
}

/// Compact form for chart labels: `1.2M`, `3.4K`, `950`.
pub fn format_large_number(value: f64) -> String {
    if value >= 1e6 {
        format!("{:.1}M", value / 1e6)
    } else if value >= 1e3 {
        format!("{:.1}K", value / 1e3)
    } else {
        format!("{:.0}", value)
    }
}

/// Integer with thousands separators: `12,345`.
pub fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }

    out
}

/// Percentage with a caller-chosen number of decimals: `97.25%`.
pub fn format_percent(value: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, value)
}
