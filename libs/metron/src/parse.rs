use crate::unit::DynamicUnit;
use crate::units::lookup_symbol;
use crate::{Error, Result};

/// Parses a unit expression such as `"kg^3 m-5"` or `"ft min^-1"`.
///
/// Terms are separated by whitespace. Each term is a symbol optionally followed
/// by a signed integer exponent, with or without a `^`. The empty string is
/// the dimensionless unit. Affine units (°C, °F) are only accepted alone and
/// with exponent 1.
pub fn parse_unit(text: &str) -> Result<DynamicUnit> {
    let terms: Vec<&str> = text.split_whitespace().collect();
    let mut unit = DynamicUnit::DIMENSIONLESS;
    for term in &terms {
        let (symbol, exp) = split_term(term)?;
        let base = lookup_symbol(symbol)
            .ok_or_else(|| Error::UnsupportedUnit(format!("unknown symbol {symbol:?}")))?;
        if base.is_affine() {
            if terms.len() != 1 || exp != 1 {
                return Err(Error::UnsupportedUnit(format!(
                    "affine unit {symbol:?} cannot be combined or raised to a power"
                )));
            }
            return Ok(base);
        }
        let overflow = || Error::UnsupportedUnit(format!("{text:?} overflows the unit range"));
        let powered = base.checked_powi(exp).ok_or_else(overflow)?;
        unit = unit.checked_mul(&powered).ok_or_else(overflow)?;
    }
    Ok(unit)
}

/// Splits `"m^-2"`, `"m-2"` or `"m"` into symbol and exponent.
fn split_term(term: &str) -> Result<(&str, i8)> {
    let head = term.trim_end_matches(|c: char| c.is_ascii_digit());
    let digits = &term[head.len()..];
    if digits.is_empty() {
        return Ok((term, 1));
    }
    let (head, negative) = match head.strip_suffix('-') {
        Some(h) => (h, true),
        None => (head.strip_suffix('+').unwrap_or(head), false),
    };
    let symbol = head.strip_suffix('^').unwrap_or(head);
    if symbol.is_empty() {
        return Err(Error::UnsupportedUnit(format!("term {term:?} has no symbol")));
    }
    let exp = digits
        .parse::<i16>()
        .ok()
        .map(|e| if negative { -e } else { e })
        .and_then(|e| i8::try_from(e).ok())
        .ok_or_else(|| Error::UnsupportedUnit(format!("exponent out of range in {term:?}")))?;
    Ok((symbol, exp))
}
