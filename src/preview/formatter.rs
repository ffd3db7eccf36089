//! Value formatting for preview controls.
//!
//! A monetary value lives in three forms: the canonical `f64`, the raw
//! string the user edits (`"12500"`), and the masked display string
//! (`"KES 12,500"`). This module converts between them. None of the
//! conversions fail: bad input degrades to `0`, an unsupported locale
//! degrades to an unlocalized string.

use tracing::debug;

use crate::config::DisplaySettings;
use crate::persona::ParamField;

/// Default currency code shown in front of monetary values.
pub const DEFAULT_CURRENCY_CODE: &str = "KES";

/// Default locale used for digit grouping.
pub const DEFAULT_LOCALE: &str = "en-KE";

/// Fraction digits kept when rendering a display value.
const MAX_FRACTION_DIGITS: usize = 3;

/// Converts between canonical, raw and display forms of a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueFormatter {
    currency_code: String,
    locale: String,
}

impl Default for ValueFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_CURRENCY_CODE, DEFAULT_LOCALE)
    }
}

impl ValueFormatter {
    pub fn new(currency_code: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            currency_code: currency_code.into(),
            locale: locale.into(),
        }
    }

    pub fn from_settings(settings: &DisplaySettings) -> Self {
        Self::new(settings.currency_code.clone(), settings.locale.clone())
    }

    pub fn currency_code(&self) -> &str {
        &self.currency_code
    }

    /// Strip everything but digits, decimal points and a leading minus sign.
    ///
    /// `None` yields an empty string. Applying it twice gives the same result
    /// as applying it once.
    pub fn to_raw<'a>(input: impl Into<Option<&'a str>>) -> String {
        let Some(input) = input.into() else {
            return String::new();
        };

        let mut raw = String::with_capacity(input.len());
        for c in input.chars() {
            match c {
                '0'..='9' | '.' => raw.push(c),
                '-' if raw.is_empty() => raw.push(c),
                _ => {}
            }
        }
        raw
    }

    /// Raw form of a control's content.
    ///
    /// A leading `"<CODE> "` written by [`to_display`](Self::to_display) is
    /// dropped first, so a code such as `Rs.` never leaks into the number.
    /// Anything else goes through [`to_raw`](Self::to_raw) unchanged.
    pub fn unmask(&self, content: &str) -> String {
        let trimmed = content.trim_start();
        let body = trimmed
            .strip_prefix(self.currency_code.as_str())
            .filter(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
            .unwrap_or(trimmed);
        Self::to_raw(body)
    }

    /// Parse a raw string for `field`, degrading to `0` on any failure.
    pub fn parse_number(raw: &str, field: ParamField) -> f64 {
        Self::try_parse_number(raw, field).unwrap_or(0.0)
    }

    /// Parse a raw string for `field`.
    ///
    /// The growth rate accepts the longest numeric prefix (`"0.05%"` is
    /// `0.05`); every other field must parse as a whole. Empty input is a
    /// deliberate zero; `None` means the content was not a number.
    pub fn try_parse_number(raw: &str, field: ParamField) -> Option<f64> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Some(0.0);
        }

        let parsed = match field {
            ParamField::MonthlyGrowth => parse_float_prefix(trimmed),
            _ => trimmed.parse::<f64>().ok(),
        };

        parsed.filter(|v| v.is_finite())
    }

    /// Plain decimal form of a value, as shown in raw controls and sent on
    /// the wire: `10000`, `0.06`. Negative zero prints as `0`.
    pub fn plain(value: f64) -> String {
        if value == 0.0 {
            "0".to_string()
        } else {
            value.to_string()
        }
    }

    /// Render a monetary value as `"<CODE> <grouped value>"`.
    pub fn to_display(&self, value: f64) -> String {
        match group_digits(value, &self.locale) {
            Some(grouped) => format!("{} {}", self.currency_code, grouped),
            None => {
                debug!(
                    locale = %self.locale,
                    value,
                    "Locale formatting unavailable, using plain value"
                );
                format!("{} {}", self.currency_code, value)
            }
        }
    }
}

/// Longest prefix of `s` that reads as a decimal number.
fn parse_float_prefix(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'-') | Some(b'+')) {
        end = 1;
    }

    let mut seen_dot = false;
    let mut seen_digit = false;
    let mut last_valid = None;
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => {
                seen_digit = true;
                last_valid = Some(end + 1);
            }
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end += 1;
    }

    if !seen_digit {
        return None;
    }
    last_valid.and_then(|end| s[..end].parse::<f64>().ok())
}

/// How the integer digits are split into groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Grouping {
    /// `1,000,000`
    Thousands,
    /// `10,00,000`: three digits, then pairs.
    Indian,
}

/// Grouping and decimal separators for the locales we can render.
///
/// Only `.`-decimal locales are supported; the rest fall back to the plain
/// value.
fn separators(locale: &str) -> Option<(char, char, Grouping)> {
    let tag = locale.trim().replace('_', "-").to_lowercase();
    let mut parts = tag.split('-');
    let language = parts.next().unwrap_or_default();
    let region = parts.next().unwrap_or_default();
    match (language, region) {
        ("en", "in") | ("hi", _) => Some((',', '.', Grouping::Indian)),
        ("en" | "sw" | "ja" | "zh" | "ko" | "he" | "th", _) => {
            Some((',', '.', Grouping::Thousands))
        }
        _ => None,
    }
}

fn is_group_boundary(grouping: Grouping, digits_left: usize) -> bool {
    match grouping {
        Grouping::Thousands => digits_left % 3 == 0,
        Grouping::Indian => digits_left == 3 || (digits_left > 3 && (digits_left - 3) % 2 == 0),
    }
}

/// Format `value` with the locale's digit grouping and at most three fraction
/// digits. `None` when the locale is unsupported or the value isn't finite.
fn group_digits(value: f64, locale: &str) -> Option<String> {
    if !value.is_finite() {
        return None;
    }
    let (group, decimal, grouping) = separators(locale)?;

    let fixed = format!("{:.*}", MAX_FRACTION_DIGITS, value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && is_group_boundary(grouping, int_part.len() - i) {
            grouped.push(group);
        }
        grouped.push(c);
    }

    let is_zero = int_part.chars().all(|c| c == '0') && frac_part.is_empty();
    let mut out = String::new();
    if value.is_sign_negative() && !is_zero {
        out.push('-');
    }
    out.push_str(&grouped);
    if !frac_part.is_empty() {
        out.push(decimal);
        out.push_str(frac_part);
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kes() -> ValueFormatter {
        ValueFormatter::default()
    }

    #[test]
    fn test_to_raw_strips_display_formatting() {
        assert_eq!(ValueFormatter::to_raw("KES 12,500"), "12500");
        assert_eq!(ValueFormatter::to_raw("KES 1,234.5"), "1234.5");
        assert_eq!(ValueFormatter::to_raw(" 0.06 "), "0.06");
        assert_eq!(ValueFormatter::to_raw("abc"), "");
    }

    #[test]
    fn test_to_raw_none_is_empty() {
        assert_eq!(ValueFormatter::to_raw(None::<&str>), "");
    }

    #[test]
    fn test_to_raw_keeps_only_leading_minus() {
        assert_eq!(ValueFormatter::to_raw("-KES 500"), "-500");
        assert_eq!(ValueFormatter::to_raw("KES -500"), "-500");
        assert_eq!(ValueFormatter::to_raw("5-3"), "53");
        assert_eq!(ValueFormatter::to_raw("--5"), "-5");
    }

    #[test]
    fn test_to_raw_idempotent() {
        for input in ["KES 12,500", "-1,2-3.4x", "", "abc", "0.06", "KES -7,000.25"] {
            let once = ValueFormatter::to_raw(input);
            assert_eq!(ValueFormatter::to_raw(once.as_str()), once, "{input}");
        }
    }

    #[test]
    fn test_parse_number_fields() {
        assert_eq!(ValueFormatter::parse_number("12500", ParamField::FixedCosts), 12500.0);
        assert_eq!(ValueFormatter::parse_number("24", ParamField::Months), 24.0);
        assert_eq!(
            ValueFormatter::parse_number("0.06", ParamField::MonthlyGrowth),
            0.06
        );
    }

    #[test]
    fn test_parse_number_degrades_to_zero() {
        assert_eq!(ValueFormatter::parse_number("", ParamField::Price), 0.0);
        assert_eq!(ValueFormatter::parse_number("abc", ParamField::Price), 0.0);
        assert_eq!(ValueFormatter::parse_number("1.2.3", ParamField::Price), 0.0);
        assert_eq!(ValueFormatter::parse_number("-", ParamField::Months), 0.0);
        assert_eq!(ValueFormatter::parse_number("inf", ParamField::Price), 0.0);
        assert_eq!(ValueFormatter::parse_number("-", ParamField::MonthlyGrowth), 0.0);
    }

    #[test]
    fn test_growth_uses_numeric_prefix() {
        assert_eq!(
            ValueFormatter::parse_number("1.2.3", ParamField::MonthlyGrowth),
            1.2
        );
        assert_eq!(
            ValueFormatter::parse_number("0.05%", ParamField::MonthlyGrowth),
            0.05
        );
        assert_eq!(
            ValueFormatter::parse_number(".5", ParamField::MonthlyGrowth),
            0.5
        );
    }

    #[test]
    fn test_try_parse_distinguishes_invalid_from_empty() {
        assert_eq!(ValueFormatter::try_parse_number("", ParamField::Price), Some(0.0));
        assert_eq!(ValueFormatter::try_parse_number("0", ParamField::Price), Some(0.0));
        assert_eq!(ValueFormatter::try_parse_number("abc", ParamField::Price), None);
    }

    #[test]
    fn test_to_display() {
        assert_eq!(kes().to_display(12500.0), "KES 12,500");
        assert_eq!(kes().to_display(7000.0), "KES 7,000");
        assert_eq!(kes().to_display(20.0), "KES 20");
        assert_eq!(kes().to_display(0.0), "KES 0");
        assert_eq!(kes().to_display(1234567.891), "KES 1,234,567.891");
        assert_eq!(kes().to_display(1234.5), "KES 1,234.5");
        assert_eq!(kes().to_display(-2500.0), "KES -2,500");
    }

    #[test]
    fn test_to_display_rounds_to_three_digits() {
        assert_eq!(kes().to_display(0.12345), "KES 0.123");
        assert_eq!(kes().to_display(-0.0001), "KES 0");
    }

    #[test]
    fn test_to_display_unsupported_locale_falls_back() {
        let formatter = ValueFormatter::new("EUR", "de-DE");
        assert_eq!(formatter.to_display(12500.0), "EUR 12500");
    }

    #[test]
    fn test_to_display_non_finite_falls_back() {
        assert_eq!(kes().to_display(f64::NAN), "KES NaN");
    }

    #[test]
    fn test_display_round_trip() {
        for x in [0.0, 5.0, 20.0, 999.0, 1000.0, 12500.0, 1234567.0, 12.5, 99.125] {
            let display = kes().to_display(x);
            let raw = ValueFormatter::to_raw(display.as_str());
            assert_eq!(ValueFormatter::parse_number(&raw, ParamField::Price), x, "{display}");
        }
    }

    #[test]
    fn test_plain() {
        assert_eq!(ValueFormatter::plain(10000.0), "10000");
        assert_eq!(ValueFormatter::plain(0.06), "0.06");
        assert_eq!(ValueFormatter::plain(-0.0), "0");
        assert_eq!(ValueFormatter::plain(12.5), "12.5");
    }

    #[test]
    fn test_unmask_drops_own_prefix() {
        let rupees = ValueFormatter::new("Rs.", "en-IN");
        assert_eq!(rupees.unmask("Rs. 10,000"), "10000");
        assert_eq!(rupees.unmask("Rs. -2,500.5"), "-2500.5");
        assert_eq!(rupees.unmask(".5"), ".5");
        assert_eq!(rupees.unmask(""), "");

        assert_eq!(kes().unmask("KES 12,500"), "12500");
        assert_eq!(kes().unmask("12500"), "12500");
        assert_eq!(kes().unmask("KESTREL 5"), "5");
    }

    #[test]
    fn test_display_round_trip_with_punctuated_code() {
        let rupees = ValueFormatter::new("Rs.", "en-IN");
        for x in [0.0, 20.0, 10000.0, 1234567.0, 12.5] {
            let display = rupees.to_display(x);
            let raw = rupees.unmask(&display);
            assert_eq!(ValueFormatter::parse_number(&raw, ParamField::Price), x, "{display}");
        }
    }

    #[test]
    fn test_indian_grouping() {
        let rupees = ValueFormatter::new("INR", "en-IN");
        assert_eq!(rupees.to_display(100000.0), "INR 1,00,000");
        assert_eq!(rupees.to_display(12345678.5), "INR 1,23,45,678.5");
        assert_eq!(rupees.to_display(999.0), "INR 999");
        assert_eq!(rupees.to_display(1000.0), "INR 1,000");
        assert_eq!(ValueFormatter::new("INR", "hi-IN").to_display(250000.0), "INR 2,50,000");
    }

    #[test]
    fn test_other_supported_locale() {
        let formatter = ValueFormatter::new("USD", "en_US");
        assert_eq!(formatter.to_display(1000000.0), "USD 1,000,000");
    }
}
