//! Display formatting for money, prices and quantities.
//!
//! Values are never converted between currencies; the configured code only
//! picks the symbol and its placement.

fn currency_affixes(currency: &str) -> (&str, String) {
    match currency {
        "USD" | "CAD" | "AUD" | "HKD" | "SGD" => ("$", String::new()),
        "EUR" => ("", " €".to_string()),
        "GBP" => ("£", String::new()),
        "JPY" => ("¥", String::new()),
        _ => ("", format!(" {currency}")),
    }
}

fn decorate(value: f64, digits: &str, currency: &str) -> String {
    let (prefix, suffix) = currency_affixes(currency);
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{prefix}{digits}{suffix}")
}

fn group_thousands(integer_part: &str) -> String {
    integer_part
        .chars()
        .rev()
        .collect::<Vec<_>>()
        .chunks(3)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(",")
        .chars()
        .rev()
        .collect()
}

/// Format a non-negative magnitude with thousands separators.
pub fn format_with_commas(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    match formatted.split_once('.') {
        Some((integer_part, decimal_part)) => {
            format!("{}.{decimal_part}", group_thousands(integer_part))
        }
        None => group_thousands(&formatted),
    }
}

pub fn format_currency(value: f64, currency: &str) -> String {
    let decimals = if currency == "JPY" { 0 } else { 2 };
    decorate(value, &format_with_commas(value, decimals), currency)
}

/// Prices below one keep up to six decimals, never fewer than two.
pub fn format_price(price: f64, currency: &str) -> String {
    if price.abs() >= 1.0 || price == 0.0 {
        return format_currency(price, currency);
    }
    let mut digits = format!("{:.6}", price.abs());
    while digits.ends_with('0') && digits.len() > "0.00".len() {
        digits.pop();
    }
    decorate(price, &digits, currency)
}

/// Market cap and volume style figures: `1.23B`, `45.60M`.
pub fn format_compact(value: f64, currency: &str) -> String {
    let magnitude = value.abs();
    if magnitude >= 1e9 {
        decorate(value, &format!("{:.2}B", magnitude / 1e9), currency)
    } else if magnitude >= 1e6 {
        decorate(value, &format!("{:.2}M", magnitude / 1e6), currency)
    } else {
        format_price(value, currency)
    }
}

pub fn format_signed_currency(value: f64, currency: &str) -> String {
    if value >= 0.0 {
        format!("+{}", format_price(value, currency))
    } else {
        format_price(value, currency)
    }
}

pub fn format_signed_percent(value: f64) -> String {
    if value >= 0.0 {
        format!("+{value:.2}%")
    } else {
        format!("{value:.2}%")
    }
}

pub fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{amount:.0}")
    } else if amount >= 1.0 {
        format!("{amount:.2}")
    } else if amount >= 0.01 {
        format!("{amount:.4}")
    } else {
        format!("{amount:.8}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(1234.5, "USD"), "$1,234.50");
        assert_eq!(format_currency(1234567.891, "USD"), "$1,234,567.89");
        assert_eq!(format_currency(12.0, "EUR"), "12.00 €");
        assert_eq!(format_currency(999.999, "GBP"), "£1,000.00");
        assert_eq!(format_currency(1234567.0, "JPY"), "¥1,234,567");
        assert_eq!(format_currency(5.0, "CHF"), "5.00 CHF");
    }

    #[test]
    fn test_format_currency_negative() {
        assert_eq!(format_currency(-67.23, "USD"), "-$67.23");
        assert_eq!(format_currency(-123456.0, "USD"), "-$123,456.00");
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(43567.89, "USD"), "$43,567.89");
        assert_eq!(format_price(0.4567, "USD"), "$0.4567");
        assert_eq!(format_price(0.5, "USD"), "$0.50");
        assert_eq!(format_price(0.0234, "USD"), "$0.0234");
        assert_eq!(format_price(0.123456789, "USD"), "$0.123457");
        assert_eq!(format_price(0.0, "USD"), "$0.00");
    }

    #[test]
    fn test_format_compact() {
        assert_eq!(format_compact(853e9, "USD"), "$853.00B");
        assert_eq!(format_compact(578e6, "USD"), "$578.00M");
        assert_eq!(format_compact(1500.0, "USD"), "$1,500.00");
    }

    #[test]
    fn test_signed() {
        assert_eq!(format_signed_currency(1234.56, "USD"), "+$1,234.56");
        assert_eq!(format_signed_currency(-0.345, "USD"), "-$0.345");
        assert_eq!(format_signed_currency(0.0, "USD"), "+$0.00");
        assert_eq!(format_signed_percent(2.924), "+2.92%");
        assert_eq!(format_signed_percent(-4.84), "-4.84%");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(3.0), "3");
        assert_eq!(format_amount(1.5), "1.50");
        assert_eq!(format_amount(0.25), "0.2500");
        assert_eq!(format_amount(0.001), "0.00100000");
    }
}
