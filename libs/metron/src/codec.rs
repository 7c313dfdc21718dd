//! Text and binary forms of quantities.
use zerocopy::{FromBytes, IntoBytes};

use crate::quantity::{Quantity, Real, display_value};
use crate::unit::{DynamicUnit, Unit};
use crate::{Error, Result, convert, parse_unit};

/// Renders `"<number> <unit>"` in the quantity's own unit.
pub fn to_string<U: Unit, V: Real>(q: &Quantity<U, V>) -> String {
    q.to_string()
}

/// Parses `"<number> <unit>"` into a `U` quantity, converting from whatever
/// compatible unit the text names. A bare number is dimensionless.
///
/// Malformed numbers and unknown units are [`Error::UnparsableValue`]; a valid
/// unit of the wrong dimension stays [`Error::IncompatibleTypes`].
pub fn parse<U: Unit, V: Real>(text: &str) -> Result<Quantity<U, V>> {
    let text = text.trim();
    let (number, unit) = match text.split_once(' ') {
        Some((number, unit)) => (number, unit),
        None => (text, ""),
    };
    let value: V = number
        .parse()
        .map_err(|_| Error::UnparsableValue(format!("invalid number {number:?} in {text:?}")))?;
    let unit = match parse_unit(unit) {
        Ok(unit) => unit,
        Err(Error::UnsupportedUnit(msg)) => {
            return Err(Error::UnparsableValue(format!("{text:?}: {msg}")));
        }
        Err(err) => return Err(err),
    };
    let target: DynamicUnit = U::dynamic_unit();
    let converted = convert(&unit, value.to_f64(), &target)?;
    Ok(Quantity::new(V::from_f64(converted)))
}

/// Parses text into an existing quantity, leaving it untouched on error.
pub fn parse_into<U: Unit, V: Real>(text: &str, q: &mut Quantity<U, V>) -> Result<()> {
    *q = parse(text)?;
    Ok(())
}

/// Little-endian bytes of the base-unit value, `size_of::<V>()` long.
pub fn to_blob<U: Unit, V: Real>(q: &Quantity<U, V>) -> Vec<u8> {
    q.base_value().to_le().as_bytes().to_vec()
}

/// Decodes a blob produced by [`to_blob`].
pub fn parse_blob<U: Unit, V: Real>(blob: &[u8]) -> Result<Quantity<U, V>> {
    let bytes = V::Bytes::read_from_bytes(blob).map_err(|_| {
        Error::UnparsableValue(format!(
            "expected {} bytes, got {}",
            size_of::<V::Bytes>(),
            blob.len()
        ))
    })?;
    Ok(Quantity::from_base(V::from_le(bytes)))
}

/// Number rendering shared with callers that print plain scalars.
pub fn format_number<V: Real>(value: V) -> String {
    display_value(value)
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::*;
    use serde::de::Error as _;

    impl<U: Unit, V: Real> serde::Serialize for Quantity<U, V> {
        fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.collect_str(self)
        }
    }

    impl<'de, U: Unit, V: Real> serde::Deserialize<'de> for Quantity<U, V> {
        fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let text = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
            parse(&text).map_err(D::Error::custom)
        }
    }
}
