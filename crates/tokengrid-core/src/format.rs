//! Pure display formatting for currency and compact numbers.
//!
//! Stateless utilities consumed by the display layer. Zero or
//! non-positive input always yields a defined zero representation
//! rather than failing.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const TRILLION: Decimal = dec!(1000000000000);
const BILLION: Decimal = dec!(1000000000);
const MILLION: Decimal = dec!(1000000);
const THOUSAND: Decimal = dec!(1000);

/// Format a monetary amount as a compact currency string.
///
/// - zero or negative input: `"$0.00"`
/// - below one cent: six decimal places (`"$0.000120"`)
/// - otherwise: compact K/M/B/T notation with two decimals
pub fn format_currency(amount: Decimal) -> String {
    if amount <= Decimal::ZERO {
        return "$0.00".to_string();
    }
    if amount < dec!(0.01) {
        return format!("${:.6}", amount);
    }
    let (scaled, suffix) = compact_parts(amount);
    format!("${:.2}{}", scaled, suffix)
}

/// Format a plain number compactly with at most one decimal place.
pub fn format_compact(value: Decimal) -> String {
    if value <= Decimal::ZERO {
        return "0".to_string();
    }
    let (scaled, suffix) = compact_parts(value);
    format!("{}{}", scaled.round_dp(1).normalize(), suffix)
}

/// Format a signed proportion as a percentage string.
///
/// `0.05` becomes `"+5.00%"`, `-0.02` becomes `"-2.00%"`.
pub fn format_percent(proportion: Decimal) -> String {
    let pct = proportion * Decimal::from(100);
    if pct.is_sign_negative() {
        format!("{:.2}%", pct)
    } else {
        format!("+{:.2}%", pct)
    }
}

fn compact_parts(value: Decimal) -> (Decimal, &'static str) {
    if value >= TRILLION {
        (value / TRILLION, "T")
    } else if value >= BILLION {
        (value / BILLION, "B")
    } else if value >= MILLION {
        (value / MILLION, "M")
    } else if value >= THOUSAND {
        (value / THOUSAND, "K")
    } else {
        (value, "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_zero_representation() {
        assert_eq!(format_currency(Decimal::ZERO), "$0.00");
        assert_eq!(format_currency(dec!(-12.5)), "$0.00");
    }

    #[test]
    fn test_currency_sub_cent() {
        assert_eq!(format_currency(dec!(0.005)), "$0.005000");
        assert_eq!(format_currency(dec!(0.0001)), "$0.000100");
    }

    #[test]
    fn test_currency_plain() {
        assert_eq!(format_currency(dec!(12.1)), "$12.10");
        assert_eq!(format_currency(dec!(0.85)), "$0.85");
        assert_eq!(format_currency(dec!(999.99)), "$999.99");
    }

    #[test]
    fn test_currency_compact() {
        assert_eq!(format_currency(dec!(1234)), "$1.23K");
        assert_eq!(format_currency(dec!(120000000)), "$120.00M");
        assert_eq!(format_currency(dec!(900000000)), "$900.00M");
        assert_eq!(format_currency(dec!(2500000000)), "$2.50B");
        assert_eq!(format_currency(dec!(1200000000000)), "$1.20T");
    }

    #[test]
    fn test_compact_number() {
        assert_eq!(format_compact(dec!(0)), "0");
        assert_eq!(format_compact(dec!(950)), "950");
        assert_eq!(format_compact(dec!(8920)), "8.9K");
        assert_eq!(format_compact(dec!(45230)), "45.2K");
        assert_eq!(format_compact(dec!(12000)), "12K");
        assert_eq!(format_compact(dec!(35000000)), "35M");
    }

    #[test]
    fn test_percent() {
        assert_eq!(format_percent(dec!(0.05)), "+5.00%");
        assert_eq!(format_percent(dec!(-0.02)), "-2.00%");
        assert_eq!(format_percent(Decimal::ZERO), "+0.00%");
        assert_eq!(format_percent(dec!(0.3456)), "+34.56%");
    }
}
