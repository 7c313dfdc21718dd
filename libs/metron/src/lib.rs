//! Dimension-checked physical quantities.
//!
//! A [`Quantity`] is a number tagged with a static [`Unit`]. Units carry their
//! dimension as a type-level exponent vector plus an exact [`Ratio`] scale and
//! offset, so converting between units of the same dimension is a plain
//! multiply-add and mixing dimensions does not compile:
//!
//! ```
//! use metron::{Quantity, units::{Foot, Meter, Second}};
//!
//! let climb = Quantity::<Foot>::new(1000.0) + Quantity::<Meter>::new(3.048);
//! assert_eq!(climb.value(), 1010.0);
//! let rate = climb / Quantity::<Second>::new(60.0);
//! assert_eq!(rate.to_string(), "16.8333333333 ft s^-1");
//! ```
//!
//! ```compile_fail
//! use metron::{Quantity, units::{Meter, Second}};
//! let _ = Quantity::<Meter>::new(1.0) + Quantity::<Second>::new(1.0);
//! ```
//!
//! Units that are only known at runtime, typically from configuration text, are
//! [`DynamicUnit`]s built by [`parse_unit`]; conversions into them check the
//! dimension vector and fail with [`Error::IncompatibleTypes`].

mod codec;
mod convert;
pub mod dimension;
mod error;
mod parse;
mod quantity;
pub mod ratio;
mod unit;
pub mod units;

pub use codec::*;
pub use convert::*;
pub use dimension::{BaseDimension, Dim, Dimension, DimensionVector};
pub use error::*;
pub use parse::*;
pub use quantity::*;
pub use ratio::Ratio;
pub use unit::*;
