/// Rounds to the nearest thousand (e.g. 48_499.0 -> 48_000.0).
pub fn round_to_thousand(value: f64) -> f64 {
    (value / 1000.0).round() * 1000.0
}

/// Formats an integer with comma thousands separators.
pub fn format_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if value < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Formats a money amount with thousands separators and two decimals ("1,234.50").
pub fn format_currency(value: f64) -> String {
    let cents = (value * 100.0).round() as i64;
    let whole = cents / 100;
    let fraction = (cents % 100).abs();
    let sign = if cents < 0 && whole == 0 { "-" } else { "" };
    format!("{}{}.{:02}", sign, format_thousands(whole), fraction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_thousand() {
        assert_eq!(round_to_thousand(48_499.0), 48_000.0);
        assert_eq!(round_to_thousand(48_500.0), 49_000.0);
        assert_eq!(round_to_thousand(312.0), 0.0);
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1000), "1,000");
        assert_eq!(format_thousands(120_000), "120,000");
        assert_eq!(format_thousands(-1_234_567), "-1,234,567");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(1200.0), "1,200.00");
        assert_eq!(format_currency(4999.5), "4,999.50");
        assert_eq!(format_currency(50.05), "50.05");
        assert_eq!(format_currency(-0.5), "-0.50");
    }
}
