//! Money and date rendering for the shell and for reports.

use chrono::NaiveDate;

pub const RUBLE_SIGN: char = '₽';
/// Thousands separator used by ru-RU formatting.
pub const GROUP_SEPARATOR: char = '\u{a0}';
pub const DECIMAL_SEPARATOR: char = ',';

const MAX_FRACTION_DIGITS: usize = 2;

/// `1500.5` becomes `1 500,5 ₽` (no-break spaces).
pub fn format_rubles(amount: f64) -> String {
    format!("{}{}{}", format_number(amount), GROUP_SEPARATOR, RUBLE_SIGN)
}

/// Grouped number with up to two fraction digits and trailing zeros dropped.
pub fn format_number(value: f64) -> String {
    let rounded = format!("{:.*}", MAX_FRACTION_DIGITS, value.abs());
    let (int_part, fraction) = match rounded.split_once('.') {
        Some((int_part, fraction)) => (int_part, fraction.trim_end_matches('0')),
        None => (rounded.as_str(), ""),
    };
    let mut body = group_digits(int_part, GROUP_SEPARATOR);
    if !fraction.is_empty() {
        body.push(DECIMAL_SEPARATOR);
        body.push_str(fraction);
    }
    if value < 0.0 && body.chars().any(|c| c.is_ascii_digit() && c != '0') {
        body.insert(0, '-');
    }
    body
}

/// Plain machine-readable number for CSV cells: `1500`, `412.5`.
pub fn format_plain(value: f64) -> String {
    if value == 0.0 {
        return "0".into();
    }
    format!("{}", value)
}

/// `DD.MM.YYYY`.
pub fn format_date_ru(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::new();
    let mut count = 0;
    for ch in digits.chars().rev() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
        count += 1;
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rubles_use_grouping_and_trim_zeros() {
        assert_eq!(format_rubles(1500.0), "1\u{a0}500\u{a0}₽");
        assert_eq!(format_rubles(412.5), "412,5\u{a0}₽");
        assert_eq!(format_rubles(0.0), "0\u{a0}₽");
        assert_eq!(format_rubles(1_234_567.891), "1\u{a0}234\u{a0}567,89\u{a0}₽");
    }

    #[test]
    fn negative_numbers_keep_sign() {
        assert_eq!(format_number(-2500.25), "-2\u{a0}500,25");
        assert_eq!(format_number(-0.001), "0");
    }

    #[test]
    fn plain_numbers_for_csv() {
        assert_eq!(format_plain(1500.0), "1500");
        assert_eq!(format_plain(412.5), "412.5");
        assert_eq!(format_plain(-0.0), "0");
    }

    #[test]
    fn russian_dates() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 7).unwrap();
        assert_eq!(format_date_ru(date), "07.05.2024");
    }
}
