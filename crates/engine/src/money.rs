//! Amount helpers: clamping, parsing typed input and display formatting.
//!
//! Row amounts are plain `f64` values. Splitting an expense among receivers
//! divides by arbitrary counts, so balances are fractional anyway and the
//! settlement solver absorbs the drift with an epsilon.

use crate::{EngineError, ResultEngine};

/// Lowest accepted row amount.
pub const MIN_AMOUNT: f64 = 0.0;
/// Highest accepted row amount.
pub const MAX_AMOUNT: f64 = 9999.99;

/// Clamps an entered amount into `[MIN_AMOUNT, MAX_AMOUNT]`.
///
/// `None` means "not entered yet" and is kept as is: it is not the same as
/// zero. A `NaN` collapses to zero.
///
/// ```rust
/// use engine::clamp_amount;
///
/// assert_eq!(clamp_amount(Some(-5.0)), Some(0.0));
/// assert_eq!(clamp_amount(Some(20_000.0)), Some(9999.99));
/// assert_eq!(clamp_amount(None), None);
/// ```
#[must_use]
pub fn clamp_amount(value: Option<f64>) -> Option<f64> {
    value.map(|amount| {
        if amount.is_nan() {
            MIN_AMOUNT
        } else {
            amount.clamp(MIN_AMOUNT, MAX_AMOUNT)
        }
    })
}

/// Parses a decimal string typed by a user.
///
/// Accepts `.` or `,` as decimal separator and an optional leading `+`/`-`.
/// An empty string means "no amount" and yields `Ok(None)`. The result is
/// not clamped; pass it through [`clamp_amount`] (the session store does).
///
/// Validation rules:
/// - max 2 fractional digits (rejects `12.345`)
/// - digits only around the separator
///
/// ```rust
/// use engine::parse_amount;
///
/// assert_eq!(parse_amount("10,5").unwrap(), Some(10.5));
/// assert_eq!(parse_amount("  ").unwrap(), None);
/// assert!(parse_amount("12.345").is_err());
/// ```
pub fn parse_amount(s: &str) -> ResultEngine<Option<f64>> {
    let invalid = || EngineError::InvalidAmount("invalid amount".to_string());
    let overflow = || EngineError::InvalidAmount("amount too large".to_string());

    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
        (true, stripped)
    } else if let Some(stripped) = trimmed.strip_prefix('+') {
        (false, stripped)
    } else {
        (false, trimmed)
    };

    let rest = rest.trim().replace(',', ".");
    let mut parts = rest.split('.');
    let units_str = parts.next().ok_or_else(invalid)?;
    let cents_str = parts.next();
    if parts.next().is_some() {
        return Err(invalid());
    }

    if units_str.is_empty() || !units_str.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    let units: i64 = units_str.parse().map_err(|_| overflow())?;

    let cents: i64 = match cents_str {
        None | Some("") => 0,
        Some(frac) => {
            if !frac.chars().all(|c| c.is_ascii_digit()) {
                return Err(invalid());
            }
            match frac.len() {
                1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
                2 => frac.parse::<i64>().map_err(|_| invalid())?,
                _ => return Err(EngineError::InvalidAmount("too many decimals".to_string())),
            }
        }
    };

    let total = units
        .checked_mul(100)
        .and_then(|v| v.checked_add(cents))
        .ok_or_else(overflow)?;
    let signed = if negative { -total } else { total };

    Ok(Some(signed as f64 / 100.0))
}

/// Formats an amount with two decimals; a missing amount renders empty.
#[must_use]
pub fn format_amount(value: Option<f64>) -> String {
    match value {
        Some(amount) => format!("{amount:.2}"),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_bounds_and_keeps_missing() {
        assert_eq!(clamp_amount(Some(-5.0)), Some(0.0));
        assert_eq!(clamp_amount(Some(20_000.0)), Some(9999.99));
        assert_eq!(clamp_amount(Some(12.5)), Some(12.5));
        assert_eq!(clamp_amount(Some(f64::NAN)), Some(0.0));
        assert_eq!(clamp_amount(None), None);
    }

    #[test]
    fn parse_accepts_dot_or_comma() {
        assert_eq!(parse_amount("10").unwrap(), Some(10.0));
        assert_eq!(parse_amount("10.5").unwrap(), Some(10.5));
        assert_eq!(parse_amount("10,50").unwrap(), Some(10.5));
        assert_eq!(parse_amount("-0.01").unwrap(), Some(-0.01));
        assert_eq!(parse_amount("+1.00").unwrap(), Some(1.0));
        assert_eq!(parse_amount("  2.30 ").unwrap(), Some(2.3));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_amount("12.345").is_err());
        assert!(parse_amount("1.2.3").is_err());
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("-").is_err());
    }

    #[test]
    fn format_uses_two_decimals() {
        assert_eq!(format_amount(Some(3.0)), "3.00");
        assert_eq!(format_amount(Some(6.666)), "6.67");
        assert_eq!(format_amount(None), "");
    }
}
