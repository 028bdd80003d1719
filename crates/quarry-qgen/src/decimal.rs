//! Exact decimal literals.

use rust_decimal::Decimal;

const MAX_SCALE: i64 = 28;
const MAX_DIGITS: usize = 38;

/// Parse `text` as an exact decimal literal.
///
/// Accepts `[+-]digits[.digits][(e|E)[+-]digits]`, where either side of the
/// point may be empty but not both. Anything else, including digit
/// separators and surrounding whitespace, is `None`. So is a literal that
/// `Decimal` could only hold by rounding.
pub(crate) fn parse_exact(text: &str) -> Option<Decimal> {
    let bytes = text.as_bytes();
    let mut pos = 0;

    let negative = match bytes.first() {
        Some(b'-') => {
            pos += 1;
            true
        }
        Some(b'+') => {
            pos += 1;
            false
        }
        _ => false,
    };

    let mut digits = String::new();
    let int_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        digits.push(bytes[pos] as char);
        pos += 1;
    }
    let int_len = pos - int_start;

    let mut frac_len = 0;
    if pos < bytes.len() && bytes[pos] == b'.' {
        pos += 1;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            digits.push(bytes[pos] as char);
            pos += 1;
            frac_len += 1;
        }
    }
    if int_len + frac_len == 0 {
        return None;
    }

    let mut exponent: i64 = 0;
    if pos < bytes.len() && matches!(bytes[pos], b'e' | b'E') {
        pos += 1;
        let exp_text = &text[pos..];
        let unsigned = exp_text.strip_prefix(['+', '-']).unwrap_or(exp_text);
        if unsigned.is_empty() || !unsigned.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        exponent = exp_text.parse().ok()?;
        pos = bytes.len();
    }
    if pos != bytes.len() {
        return None;
    }

    let mut scale = i64::try_from(frac_len).ok()?.checked_sub(exponent)?;
    let mut digits = digits.trim_start_matches('0');
    // Trailing zeros can go without changing the value.
    while (digits.len() > MAX_DIGITS || scale > MAX_SCALE) && digits.ends_with('0') {
        digits = &digits[..digits.len() - 1];
        scale -= 1;
    }
    if digits.len() > MAX_DIGITS || scale > MAX_SCALE {
        return None;
    }

    let mut mantissa: i128 = if digits.is_empty() {
        0
    } else {
        digits.parse().ok()?
    };
    if scale < 0 {
        let factor = 10i128.checked_pow(u32::try_from(-scale).ok()?)?;
        mantissa = mantissa.checked_mul(factor)?;
        scale = 0;
    }
    if negative {
        mantissa = -mantissa;
    }
    Decimal::try_from_i128_with_scale(mantissa, u32::try_from(scale).ok()?).ok()
}
