//! Type inference for untyped text scalars.
//!
//! Text formats such as YAML hand scalars over as strings. [`classify`] decides
//! what each one is, trying these grammars in order:
//!
//! 1. boolean: `true|false|yes|no|on|off`, case-insensitive
//! 2. number: `^-?\d*\.?\d+([eE][-+]?\d+)?$`, then
//!    - unsigned integer `^\d+$`
//!    - signed integer `^-\d+$`
//!    - decimal otherwise
//! 3. string
//!
//! A leading `+` or an exponent without digits is not a number; leading zeros are.

use crate::error::{Result, TreeError};

/// What a text scalar turned out to be.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScalarClass {
    Boolean(bool),
    Unsigned(u64),
    Signed(i64),
    Decimal(f64),
    Text,
}

/// Classify `text`. Fails only for integers that overflow 64 bits.
pub fn classify(text: &str) -> Result<ScalarClass> {
    if let Some(b) = parse_boolean(text) {
        return Ok(ScalarClass::Boolean(b));
    }
    if !is_number(text) {
        return Ok(ScalarClass::Text);
    }
    if is_digits(text) {
        return text
            .parse::<u64>()
            .map(ScalarClass::Unsigned)
            .map_err(|e| TreeError::malformed("yaml", format!("integer '{text}': {e}")));
    }
    if text.strip_prefix('-').is_some_and(is_digits) {
        return text
            .parse::<i64>()
            .map(ScalarClass::Signed)
            .map_err(|e| TreeError::malformed("yaml", format!("integer '{text}': {e}")));
    }
    text.parse::<f64>()
        .map(ScalarClass::Decimal)
        .map_err(|e| TreeError::malformed("yaml", format!("decimal '{text}': {e}")))
}

/// The boolean spelled by `text`, if any.
pub fn parse_boolean(text: &str) -> Option<bool> {
    match text.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" => Some(true),
        "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// True if `text` matches the number grammar.
pub fn is_number(text: &str) -> bool {
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
        Some(pos) => (&unsigned[..pos], Some(&unsigned[pos + 1..])),
        None => (unsigned, None),
    };
    if let Some(exponent) = exponent {
        let digits = exponent.strip_prefix(['+', '-']).unwrap_or(exponent);
        if !is_digits(digits) {
            return false;
        }
    }
    match mantissa.split_once('.') {
        Some((whole, fraction)) => {
            (whole.is_empty() || is_digits(whole)) && is_digits(fraction)
        }
        None => is_digits(mantissa),
    }
}

/// Non-empty and all ASCII digits.
fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
