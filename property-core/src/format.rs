//! Display formatting for money and percentage KPIs.
//!
//! Money is shown in US dollars with thousands separators and two decimal
//! places, dropping a `.00` tail. Ratios are shown multiplied by 100 with a
//! trailing `%`. Non-finite values are rendered rather than rejected.

use crate::calculations::KpiLevel;

/// Formats a dollar amount, e.g. `-$2,528.27` or `$110,000`.
///
/// Amounts that round to zero cents print as `$0`, never `-$0`.
///
/// ```
/// use property_core::format::format_money;
///
/// assert_eq!(format_money(110_000.0), "$110,000");
/// assert_eq!(format_money(-2528.2720939718615), "-$2,528.27");
/// assert_eq!(format_money(0.5), "$0.50");
/// ```
pub fn format_money(value: f64) -> String {
    if value.is_nan() {
        return "$NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "$∞" } else { "-$∞" }.to_string();
    }

    let fixed = format!("{:.2}", value.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut out = String::with_capacity(fixed.len() + 6);
    if value < 0.0 && fixed != "0.00" {
        out.push('-');
    }
    out.push('$');
    out.push_str(&group_thousands(whole));
    if cents != "00" {
        out.push('.');
        out.push_str(cents);
    }
    out
}

/// Formats a ratio as a percentage with `decimal_places` digits.
///
/// ```
/// use property_core::format::format_percent;
///
/// assert_eq!(format_percent(0.005, 2), "0.50%");
/// assert_eq!(format_percent(0.0348, 1), "3.5%");
/// assert_eq!(format_percent(f64::INFINITY, 2), "Infinity%");
/// ```
pub fn format_percent(
    value: f64,
    decimal_places: usize,
) -> String {
    if value.is_nan() {
        return "NaN%".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity%" } else { "-Infinity%" }.to_string();
    }

    // `+ 0.0` folds negative zero into zero
    format!("{:.*}%", decimal_places, value * 100.0 + 0.0)
}

/// Lowercase tier label, e.g. `warning`.
pub fn format_level(level: KpiLevel) -> &'static str {
    level.as_str()
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
