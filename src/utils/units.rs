const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

pub fn bytes_to_gb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_GB
}

/// True when the exact binary value of `value` ends in `5` at the third
/// fraction digit with nothing after it.
fn is_half_cent(value: f64) -> bool {
    // an f64 never has more than 1074 fraction digits, so this is exact
    let exact = format!("{:.1100}", value.abs());
    match exact.split_once('.') {
        Some((_, frac)) => frac[2..].starts_with('5') && frac[3..].bytes().all(|b| b == b'0'),
        None => false,
    }
}

/// Two fraction digits, with exact ties rounded away from zero.
pub fn fixed2(value: f64) -> String {
    if is_half_cent(value) {
        // nudge off the tie; ties have only three fraction digits
        return format!("{:.2}", value + value.signum() * 0.001);
    }
    format!("{:.2}", value)
}

pub fn format_gb(bytes: u64) -> String {
    format!("{} GB", fixed2(bytes_to_gb(bytes)))
}

pub fn format_percent(value: f64) -> String {
    format!("{} %", fixed2(value))
}

pub fn format_mb(megabytes: u64) -> String {
    format!("{} MB", megabytes)
}

/// Missing or zero readings render as `N/A`.
pub fn format_optional_mb(megabytes: Option<u64>) -> String {
    match megabytes {
        Some(mb) if mb > 0 => format_mb(mb),
        _ => "N/A".to_string(),
    }
}

/// Rounds to two fraction digits and prints the shortest form, so `45.50`
/// becomes `45.5` and `12.00` becomes `12`.
pub fn compact_number(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    format!("{}", rounded)
}
