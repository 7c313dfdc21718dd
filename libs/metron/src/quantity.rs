use core::cmp::Ordering;
use core::fmt;
use core::marker::PhantomData;
use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use core::str::FromStr;

use num_traits::Float;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::dimension::{DimDiv, DimMul, DimSqrt, Dimensionless};
use crate::ratio::Ratio;
use crate::unit::{Coherent, DynamicUnit, Product, Quotient, Unit};
use crate::units::{Hertz, RadianPerSecond};
use crate::{Error, Result};

/// Floating point representations a [`Quantity`] can be stored in.
pub trait Real:
    Float
    + fmt::Display
    + fmt::Debug
    + fmt::LowerExp
    + FromStr
    + Default
    + Send
    + Sync
    + 'static
{
    /// Little-endian wire form.
    type Bytes: FromBytes + IntoBytes + Immutable + KnownLayout + Copy;

    /// Digits after the leading one used when rendering text, enough to hide
    /// the rounding noise of a unit conversion round trip.
    const DISPLAY_DIGITS: usize;

    fn from_f64(value: f64) -> Self;
    fn to_f64(self) -> f64;
    fn to_le(self) -> Self::Bytes;
    fn from_le(bytes: Self::Bytes) -> Self;
}

impl Real for f64 {
    type Bytes = zerocopy::little_endian::F64;
    const DISPLAY_DIGITS: usize = 11;

    fn from_f64(value: f64) -> Self {
        value
    }

    fn to_f64(self) -> f64 {
        self
    }

    fn to_le(self) -> Self::Bytes {
        zerocopy::little_endian::F64::new(self)
    }

    fn from_le(bytes: Self::Bytes) -> Self {
        bytes.get()
    }
}

impl Real for f32 {
    type Bytes = zerocopy::little_endian::F32;
    const DISPLAY_DIGITS: usize = 6;

    fn from_f64(value: f64) -> Self {
        value as f32
    }

    fn to_f64(self) -> f64 {
        self as f64
    }

    fn to_le(self) -> Self::Bytes {
        zerocopy::little_endian::F32::new(self)
    }

    fn from_le(bytes: Self::Bytes) -> Self {
        bytes.get()
    }
}

/// Renders `value` rounded to `DISPLAY_DIGITS + 1` significant digits, in the
/// shortest form that parses back to the rounded value.
pub(crate) fn display_value<V: Real>(value: V) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let rounded = format!("{:.*e}", V::DISPLAY_DIGITS, value);
    match rounded.parse::<V>() {
        Ok(v) => v.to_string(),
        Err(_) => value.to_string(),
    }
}

/// A value tagged with a static [`Unit`].
///
/// The unit lives only in the type, so a `Quantity` has the size of its value.
/// Adding a [`Foot`](crate::units::Foot) quantity to a
/// [`Meter`](crate::units::Meter) quantity converts the right hand side;
/// adding a length to a time does not compile.
#[repr(transparent)]
pub struct Quantity<U: Unit, V: Real = f64> {
    value: V,
    unit: PhantomData<U>,
}

struct Conversion<S, T>(PhantomData<(S, T)>);

impl<S: Unit, T: Unit> Conversion<S, T> {
    const FACTOR: Ratio = S::SCALE.div(T::SCALE);
    const SHIFT: Ratio = S::OFFSET.sub(T::OFFSET).div(T::SCALE);

    fn apply<V: Real>(value: V) -> V {
        if Self::FACTOR.is_one() && Self::SHIFT.is_zero() {
            return value;
        }
        V::from_f64(Self::FACTOR.apply(value.to_f64()) + Self::SHIFT.to_f64())
    }
}

impl<U: Unit, V: Real> Quantity<U, V> {
    pub const fn new(value: V) -> Self {
        Quantity {
            value,
            unit: PhantomData,
        }
    }

    /// Numeric value expressed in `U`.
    pub fn value(&self) -> V {
        self.value
    }

    /// Numeric value expressed in the coherent SI unit of the dimension.
    pub fn base_value(&self) -> V {
        Conversion::<U, Coherent<U::Dim>>::apply(self.value)
    }

    pub fn from_base(base: V) -> Self {
        Quantity::new(Conversion::<Coherent<U::Dim>, U>::apply(base))
    }

    /// Re-expresses the quantity in another unit of the same dimension.
    pub fn to<W: Unit<Dim = U::Dim>>(self) -> Quantity<W, V> {
        Quantity::new(Conversion::<U, W>::apply(self.value))
    }

    /// Numeric value in a runtime unit; fails when the dimensions differ.
    pub fn in_unit(&self, unit: &DynamicUnit) -> Result<V> {
        crate::convert(&U::dynamic_unit(), self.value.to_f64(), unit).map(V::from_f64)
    }

    pub fn in_unit_str(&self, unit: &str) -> Result<V> {
        self.in_unit(&crate::parse_unit(unit)?)
    }

    pub fn abs(self) -> Self {
        const { assert!(U::OFFSET.is_zero(), "abs is undefined for affine units") };
        Quantity::new(self.value.abs())
    }

    pub fn is_infinite(&self) -> bool {
        const { assert!(U::OFFSET.is_zero(), "is_infinite is undefined for affine units") };
        self.value.is_infinite()
    }

    pub fn is_nan(&self) -> bool {
        const { assert!(U::OFFSET.is_zero(), "is_nan is undefined for affine units") };
        self.value.is_nan()
    }

    pub fn is_finite(&self) -> bool {
        self.value.is_finite()
    }

    /// Square root, halving every dimension exponent.
    ///
    /// Only quantities whose exponents are all even have a square root:
    ///
    /// ```compile_fail
    /// use metron::{Quantity, units::Meter};
    /// let _ = Quantity::<Meter>::new(4.0).sqrt();
    /// ```
    pub fn sqrt(self) -> Quantity<Coherent<<U::Dim as DimSqrt>::Output>, V>
    where
        U::Dim: DimSqrt,
    {
        const { assert!(U::OFFSET.is_zero(), "sqrt is undefined for affine units") };
        Quantity::new(self.base_value().sqrt())
    }

    pub fn min(self, other: Self) -> Self {
        Quantity::new(self.value.min(other.value))
    }

    pub fn max(self, other: Self) -> Self {
        Quantity::new(self.value.max(other.value))
    }

    pub fn clamp(self, min: Self, max: Self) -> Self {
        self.max(min).min(max)
    }
}

impl<U: Unit<Dim = Dimensionless>, V: Real> Quantity<U, V> {
    /// Plain number of a dimensionless quantity, e.g. `m / ft`.
    pub fn into_scalar(self) -> V {
        self.base_value()
    }
}

/// Converts a rotation frequency into an angular velocity (one turn is 2π rad).
pub fn convert_frequency<V: Real>(f: Quantity<Hertz, V>) -> Quantity<RadianPerSecond, V> {
    Quantity::new(f.value * V::from_f64(core::f64::consts::TAU))
}

impl<U: Unit, V: Real> Clone for Quantity<U, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<U: Unit, V: Real> Copy for Quantity<U, V> {}

impl<U: Unit, V: Real> Default for Quantity<U, V> {
    fn default() -> Self {
        Quantity::new(V::default())
    }
}

impl<U: Unit, V: Real> PartialEq for Quantity<U, V> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<U: Unit, V: Real> PartialOrd for Quantity<U, V> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.value.partial_cmp(&other.value)
    }
}

impl<U: Unit, V: Real> fmt::Debug for Quantity<U, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Quantity({:?} {})", self.value, U::symbol())
    }
}

impl<U: Unit, V: Real> fmt::Display for Quantity<U, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = U::symbol();
        match f.precision() {
            Some(p) => write!(f, "{:.*}", p, self.value)?,
            None => write!(f, "{}", display_value(self.value))?,
        }
        if !symbol.is_empty() {
            write!(f, " {symbol}")?;
        }
        Ok(())
    }
}

impl<U: Unit, V: Real> FromStr for Quantity<U, V> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        crate::parse(s)
    }
}

impl<U: Unit, W: Unit<Dim = U::Dim>, V: Real> Add<Quantity<W, V>> for Quantity<U, V> {
    type Output = Quantity<U, V>;

    fn add(self, rhs: Quantity<W, V>) -> Self::Output {
        Quantity::new(self.value + rhs.to::<U>().value)
    }
}

impl<U: Unit, W: Unit<Dim = U::Dim>, V: Real> Sub<Quantity<W, V>> for Quantity<U, V> {
    type Output = Quantity<U, V>;

    fn sub(self, rhs: Quantity<W, V>) -> Self::Output {
        Quantity::new(self.value - rhs.to::<U>().value)
    }
}

impl<U: Unit, W: Unit<Dim = U::Dim>, V: Real> AddAssign<Quantity<W, V>> for Quantity<U, V> {
    fn add_assign(&mut self, rhs: Quantity<W, V>) {
        *self = *self + rhs;
    }
}

impl<U: Unit, W: Unit<Dim = U::Dim>, V: Real> SubAssign<Quantity<W, V>> for Quantity<U, V> {
    fn sub_assign(&mut self, rhs: Quantity<W, V>) {
        *self = *self - rhs;
    }
}

impl<U: Unit, V: Real> Neg for Quantity<U, V> {
    type Output = Self;

    fn neg(self) -> Self {
        Quantity::new(-self.value)
    }
}

/// Multiplying two quantities yields their [`Product`] unit. Mismatched
/// dimensions only matter once the result is assigned:
///
/// ```compile_fail
/// use metron::{Quantity, units::{Meter, Second}};
/// let area: Quantity<Meter> = Quantity::<Meter>::new(2.0) * Quantity::<Second>::new(3.0);
/// ```
impl<U: Unit, W: Unit, V: Real> Mul<Quantity<W, V>> for Quantity<U, V>
where
    U::Dim: DimMul<W::Dim>,
{
    type Output = Quantity<Product<U, W>, V>;

    fn mul(self, rhs: Quantity<W, V>) -> Self::Output {
        const {
            assert!(
                U::OFFSET.is_zero() && W::OFFSET.is_zero(),
                "affine units do not compose"
            )
        };
        Quantity::new(self.value * rhs.value)
    }
}

impl<U: Unit, W: Unit, V: Real> Div<Quantity<W, V>> for Quantity<U, V>
where
    U::Dim: DimDiv<W::Dim>,
{
    type Output = Quantity<Quotient<U, W>, V>;

    fn div(self, rhs: Quantity<W, V>) -> Self::Output {
        const {
            assert!(
                U::OFFSET.is_zero() && W::OFFSET.is_zero(),
                "affine units do not compose"
            )
        };
        Quantity::new(self.value / rhs.value)
    }
}

macro_rules! impl_scalar_ops {
    ($($v:ty),*) => {$(
        impl<U: Unit> Mul<$v> for Quantity<U, $v> {
            type Output = Self;

            fn mul(self, rhs: $v) -> Self {
                Quantity::new(self.value * rhs)
            }
        }

        impl<U: Unit> Mul<Quantity<U, $v>> for $v {
            type Output = Quantity<U, $v>;

            fn mul(self, rhs: Quantity<U, $v>) -> Quantity<U, $v> {
                Quantity::new(self * rhs.value)
            }
        }

        impl<U: Unit> Div<$v> for Quantity<U, $v> {
            type Output = Self;

            fn div(self, rhs: $v) -> Self {
                Quantity::new(self.value / rhs)
            }
        }

        impl<U: Unit> MulAssign<$v> for Quantity<U, $v> {
            fn mul_assign(&mut self, rhs: $v) {
                self.value *= rhs;
            }
        }

        impl<U: Unit> DivAssign<$v> for Quantity<U, $v> {
            fn div_assign(&mut self, rhs: $v) {
                self.value /= rhs;
            }
        }
    )*};
}

impl_scalar_ops!(f32, f64);
