//! Fast scanning of decimal digit runs.
//!
//! The parser hands digit-prefixed spans of the source text straight to these
//! functions, which accumulate digits without any intermediate string
//! allocation. Only plain base-10 notation is supported: an optional leading
//! `-`, digits, and at most one decimal point. No exponent notation, no
//! leading `+`, no `NaN` or `Infinity`. This exists instead of the standard
//! library parser purely for throughput on the compile path.

use crate::errors::NumberFormatError;

/// Parses an integer from a base-10 span.
///
/// Accepts an optional leading `-` followed by one or more digits. Used for
/// index-like contexts such as anonymous `$N` variable indices. A value that
/// does not fit in an `i64` fails with [`NumberFormatError::Overflow`].
pub fn parse_int(input: &str) -> Result<i64, NumberFormatError> {
    let bytes = input.as_bytes();
    if bytes.is_empty() {
        return Err(NumberFormatError::Empty);
    }
    let mut digits = bytes;
    let negative = bytes[0] == b'-';
    if negative {
        digits = &bytes[1..];
        if digits.is_empty() {
            return Err(NumberFormatError::Empty);
        }
    }
    let mut output: i64 = 0;
    for &byte in digits {
        if !byte.is_ascii_digit() {
            return Err(NumberFormatError::InvalidDigit(
                byte as char,
                input.to_string(),
            ));
        }
        output = output
            .checked_mul(10)
            .and_then(|v| v.checked_add(i64::from(byte - b'0')))
            .ok_or_else(|| NumberFormatError::Overflow(input.to_string()))?;
    }
    Ok(if negative { -output } else { output })
}

/// Parses a double from a base-10 span.
///
/// Accepts an optional leading `-`, digits, and at most one `.` separating the
/// fractional digits. Fails with a [`NumberFormatError`] on a zero-length
/// span, a second decimal point, or any other character.
pub fn parse_double(input: &str) -> Result<f64, NumberFormatError> {
    let bytes = input.as_bytes();
    if bytes.is_empty() {
        return Err(NumberFormatError::Empty);
    }
    let mut digits = bytes;
    let negative = bytes[0] == b'-';
    if negative {
        digits = &bytes[1..];
        if digits.is_empty() {
            return Err(NumberFormatError::Empty);
        }
    }
    let mut integer = 0.0_f64;
    let mut fraction = 0.0_f64;
    let mut fraction_digits: Option<u32> = None;
    for &byte in digits {
        if byte == b'.' {
            if fraction_digits.is_some() {
                return Err(NumberFormatError::SecondDecimalPoint(input.to_string()));
            }
            fraction_digits = Some(0);
            continue;
        }
        if !byte.is_ascii_digit() {
            return Err(NumberFormatError::InvalidDigit(
                byte as char,
                input.to_string(),
            ));
        }
        let digit = f64::from(byte - b'0');
        match fraction_digits.as_mut() {
            Some(count) => {
                fraction = fraction * 10.0 + digit;
                *count += 1;
            }
            None => integer = integer * 10.0 + digit,
        }
    }
    let fraction = fraction / 10.0_f64.powi(fraction_digits.unwrap_or(0) as i32);
    let value = integer + fraction;
    Ok(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int("0"), Ok(0));
        assert_eq!(parse_int("42"), Ok(42));
        assert_eq!(parse_int("-17"), Ok(-17));
    }

    #[test]
    fn test_parse_int_rejects_malformed_input() {
        assert_eq!(parse_int(""), Err(NumberFormatError::Empty));
        assert_eq!(parse_int("-"), Err(NumberFormatError::Empty));
        assert_eq!(
            parse_int("1.5"),
            Err(NumberFormatError::InvalidDigit('.', "1.5".to_string()))
        );
        assert!(parse_int("1x").is_err());
    }

    #[test]
    fn test_parse_int_rejects_out_of_range_input() {
        assert_eq!(parse_int("9223372036854775807"), Ok(i64::MAX));
        assert_eq!(
            parse_int("9999999999999999999"),
            Err(NumberFormatError::Overflow("9999999999999999999".to_string()))
        );
        assert!(parse_int("92233720368547758080").is_err());
    }

    #[test]
    fn test_parse_double() {
        assert_eq!(parse_double("0"), Ok(0.0));
        assert_eq!(parse_double("42"), Ok(42.0));
        assert_eq!(parse_double("3.25"), Ok(3.25));
        assert_eq!(parse_double("-2.5"), Ok(-2.5));
        assert_eq!(parse_double(".5"), Ok(0.5));
        assert_eq!(parse_double("7."), Ok(7.0));
    }

    #[test]
    fn test_parse_double_rejects_malformed_input() {
        assert_eq!(parse_double(""), Err(NumberFormatError::Empty));
        assert_eq!(parse_double("-"), Err(NumberFormatError::Empty));
        assert_eq!(
            parse_double("1.2.3"),
            Err(NumberFormatError::SecondDecimalPoint("1.2.3".to_string()))
        );
        assert!(parse_double("1e5").is_err());
        assert!(parse_double("+1").is_err());
    }
}
