//! Display formatting helpers shared with the presentation layer
//!
//! Currency display is fixed to Indonesian Rupiah with `.` as the
//! thousands separator, matching the reference billing screens. No
//! locale handling.

/// Format an integer amount as a Rupiah display string, e.g. `50000` ->
/// `"Rp 50.000"`.
pub fn format_rupiah(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    let offset = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (i + 3 - offset) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    format!("Rp {}", grouped)
}

/// Parse a digits-only manual billing entry. Returns `None` for empty
/// input, non-digit characters, zero, or values that overflow.
pub fn parse_amount(digits: &str) -> Option<u64> {
    let trimmed = digits.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match trimmed.parse::<u64>() {
        Ok(n) if n > 0 => Some(n),
        _ => None,
    }
}

/// Whether a manual billing entry can be accepted
pub fn is_valid_amount(digits: &str) -> bool {
    parse_amount(digits).is_some()
}

/// Format a digits-only entry for display previews; anything that does
/// not parse renders as `"Rp 0"`, matching the billing screen preview.
pub fn format_rupiah_digits(digits: &str) -> String {
    format_rupiah(parse_amount(digits).unwrap_or(0))
}

/// Render elapsed charge time the way the charging screen shows it,
/// e.g. `100` -> `"1m 40s"`.
pub fn format_elapsed(seconds: u64) -> String {
    format!("{}m {}s", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_grouped_amounts() {
        assert_eq!(format_rupiah(0), "Rp 0");
        assert_eq!(format_rupiah(500), "Rp 500");
        assert_eq!(format_rupiah(50_000), "Rp 50.000");
        assert_eq!(format_rupiah(200_000), "Rp 200.000");
        assert_eq!(format_rupiah(1_234_567), "Rp 1.234.567");
    }

    #[test]
    fn parses_manual_amounts() {
        assert_eq!(parse_amount("75000"), Some(75_000));
        assert_eq!(parse_amount(" 75000 "), Some(75_000));
        assert_eq!(parse_amount("0"), None);
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("12a34"), None);
        assert_eq!(parse_amount("-5"), None);
    }

    #[test]
    fn validates_manual_amounts() {
        assert!(is_valid_amount("1"));
        assert!(!is_valid_amount("0"));
        assert!(!is_valid_amount(""));
    }

    #[test]
    fn previews_digit_entries() {
        assert_eq!(format_rupiah_digits("50000"), "Rp 50.000");
        assert_eq!(format_rupiah_digits(""), "Rp 0");
        assert_eq!(format_rupiah_digits("abc"), "Rp 0");
    }

    #[test]
    fn formats_elapsed_time() {
        assert_eq!(format_elapsed(0), "0m 0s");
        assert_eq!(format_elapsed(59), "0m 59s");
        assert_eq!(format_elapsed(100), "1m 40s");
        assert_eq!(format_elapsed(3605), "60m 5s");
    }
}
