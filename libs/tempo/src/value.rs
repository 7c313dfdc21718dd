//! Types that can live in properties and settings.
use metron::{Quantity, Real, Unit};
use zerocopy::little_endian::{F32, F64, I32, I64, U32, U64};
use zerocopy::{FromBytes, IntoBytes};

use crate::Result;

/// A property or setting payload with text and binary forms.
pub trait Value: Clone + std::fmt::Debug + 'static {
    fn to_text(&self) -> String;
    fn from_text(text: &str) -> Result<Self>;
    fn to_blob(&self) -> Vec<u8>;
    fn from_blob(blob: &[u8]) -> Result<Self>;
}

impl<U: Unit, V: Real> Value for Quantity<U, V> {
    fn to_text(&self) -> String {
        metron::to_string(self)
    }

    fn from_text(text: &str) -> Result<Self> {
        Ok(metron::parse(text)?)
    }

    fn to_blob(&self) -> Vec<u8> {
        metron::to_blob(self)
    }

    fn from_blob(blob: &[u8]) -> Result<Self> {
        Ok(metron::parse_blob(blob)?)
    }
}

fn unparsable(what: impl std::fmt::Display) -> crate::Error {
    metron::Error::UnparsableValue(what.to_string()).into()
}

fn read_le<B: FromBytes>(blob: &[u8]) -> Result<B> {
    B::read_from_bytes(blob).map_err(|_| {
        unparsable(format_args!(
            "expected {} bytes, got {}",
            size_of::<B>(),
            blob.len()
        ))
    })
}

macro_rules! impl_number_value {
    ($($t:ty => $le:ty),*) => {$(
        impl Value for $t {
            fn to_text(&self) -> String {
                self.to_string()
            }

            fn from_text(text: &str) -> Result<Self> {
                text.trim()
                    .parse()
                    .map_err(|_| unparsable(format_args!("invalid {} {text:?}", stringify!($t))))
            }

            fn to_blob(&self) -> Vec<u8> {
                <$le>::new(*self).as_bytes().to_vec()
            }

            fn from_blob(blob: &[u8]) -> Result<Self> {
                read_le::<$le>(blob).map(|v| v.get())
            }
        }
    )*};
}

impl_number_value!(f64 => F64, f32 => F32, i32 => I32, i64 => I64, u32 => U32, u64 => U64);

impl Value for bool {
    fn to_text(&self) -> String {
        self.to_string()
    }

    fn from_text(text: &str) -> Result<Self> {
        match text.trim() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            other => Err(unparsable(format_args!("invalid bool {other:?}"))),
        }
    }

    fn to_blob(&self) -> Vec<u8> {
        vec![*self as u8]
    }

    fn from_blob(blob: &[u8]) -> Result<Self> {
        match blob {
            [0] => Ok(false),
            [1] => Ok(true),
            _ => Err(unparsable(format_args!("invalid bool blob {blob:?}"))),
        }
    }
}

impl Value for String {
    fn to_text(&self) -> String {
        self.clone()
    }

    fn from_text(text: &str) -> Result<Self> {
        Ok(text.to_string())
    }

    fn to_blob(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }

    fn from_blob(blob: &[u8]) -> Result<Self> {
        String::from_utf8(blob.to_vec()).map_err(unparsable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use metron::units::{Foot, Meter};

    #[test]
    fn test_scalar_text_and_blob() {
        assert_eq!(i32::from_text(" -12 ").unwrap(), -12);
        assert_eq!(u64::from_blob(&42u64.to_blob()).unwrap(), 42);
        assert_eq!(f32::from_blob(&1.5f32.to_blob()).unwrap(), 1.5);
        assert!(matches!(
            u32::from_blob(&[1, 2, 3]),
            Err(Error::Quantity(metron::Error::UnparsableValue(_)))
        ));
        assert!(bool::from_text("yes").is_err());
        assert!(bool::from_text("1").unwrap());
        assert_eq!(String::from_text("hdg").unwrap(), "hdg");
    }

    #[test]
    fn test_quantity_value() {
        let q = Quantity::<Meter>::from_text("1000 ft").unwrap();
        approx::assert_relative_eq!(q.value(), 304.8, epsilon = 1e-9);
        assert_eq!(Quantity::<Foot>::new(35.0).to_text(), "35 ft");
        assert!(matches!(
            Quantity::<Meter>::from_text("3 s"),
            Err(Error::Quantity(metron::Error::IncompatibleTypes { .. }))
        ));
    }
}
