//! Dimension vectors, at the value level and at the type level.
//!
//! Every unit is tagged with the exponents of eight base dimensions. Static
//! units carry them as `typenum` integers inside [`Dim`], so mixing lengths and
//! times is a type error; [`DimensionVector`] is the runtime view used by
//! [`DynamicUnit`](crate::DynamicUnit) and by the text parser.
use core::fmt;
use core::marker::PhantomData;
use core::ops::{Add, Sub};

use typenum::{Diff, Integer, N1, N2, N3, P1, P2, P3, PartialDiv, PartialQuot, Sum, Z0};

/// The base dimensions, in the order their exponents are stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BaseDimension {
    Length,
    Mass,
    Time,
    Current,
    Temperature,
    Amount,
    LuminousIntensity,
    Angle,
}

impl BaseDimension {
    pub const ALL: [BaseDimension; 8] = [
        BaseDimension::Length,
        BaseDimension::Mass,
        BaseDimension::Time,
        BaseDimension::Current,
        BaseDimension::Temperature,
        BaseDimension::Amount,
        BaseDimension::LuminousIntensity,
        BaseDimension::Angle,
    ];

    /// Symbol of the coherent SI unit for this dimension.
    pub const fn si_symbol(self) -> &'static str {
        match self {
            BaseDimension::Length => "m",
            BaseDimension::Mass => "kg",
            BaseDimension::Time => "s",
            BaseDimension::Current => "A",
            BaseDimension::Temperature => "K",
            BaseDimension::Amount => "mol",
            BaseDimension::LuminousIntensity => "cd",
            BaseDimension::Angle => "rad",
        }
    }
}

/// Exponents over the eight base dimensions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DimensionVector([i8; 8]);

impl DimensionVector {
    pub const DIMENSIONLESS: DimensionVector = DimensionVector([0; 8]);

    pub const fn new(exponents: [i8; 8]) -> Self {
        DimensionVector(exponents)
    }

    pub const fn exponents(&self) -> [i8; 8] {
        self.0
    }

    pub const fn exponent(&self, base: BaseDimension) -> i8 {
        self.0[base as usize]
    }

    pub const fn is_dimensionless(&self) -> bool {
        let mut i = 0;
        while i < 8 {
            if self.0[i] != 0 {
                return false;
            }
            i += 1;
        }
        true
    }

    /// Exponent-wise sum, the dimension of a product.
    pub fn checked_add(&self, other: &DimensionVector) -> Option<DimensionVector> {
        let mut out = [0i8; 8];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = self.0[i].checked_add(other.0[i])?;
        }
        Some(DimensionVector(out))
    }

    /// Every exponent multiplied by `factor`, the dimension of a power.
    pub fn checked_scale(&self, factor: i8) -> Option<DimensionVector> {
        let mut out = [0i8; 8];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = self.0[i].checked_mul(factor)?;
        }
        Some(DimensionVector(out))
    }
}

impl fmt::Display for DimensionVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_dimensionless() {
            return write!(f, "[1]");
        }
        write!(f, "[")?;
        let mut first = true;
        for base in BaseDimension::ALL {
            let exp = self.exponent(base);
            if exp == 0 {
                continue;
            }
            if !first {
                write!(f, " ")?;
            }
            first = false;
            match exp {
                1 => write!(f, "{}", base.si_symbol())?,
                _ => write!(f, "{}^{}", base.si_symbol(), exp)?,
            }
        }
        write!(f, "]")
    }
}

/// Type-level dimension. Each parameter is a `typenum` integer exponent, in
/// [`BaseDimension`] order.
pub struct Dim<L, M, T, I, Th, N, J, A>(PhantomData<(L, M, T, I, Th, N, J, A)>);

/// Implemented by every [`Dim`] whose exponents are `typenum` integers.
pub trait Dimension: 'static {
    const VECTOR: DimensionVector;
}

impl<L, M, T, I, Th, N, J, A> Dimension for Dim<L, M, T, I, Th, N, J, A>
where
    L: Integer,
    M: Integer,
    T: Integer,
    I: Integer,
    Th: Integer,
    N: Integer,
    J: Integer,
    A: Integer,
{
    const VECTOR: DimensionVector = DimensionVector([
        L::I8,
        M::I8,
        T::I8,
        I::I8,
        Th::I8,
        N::I8,
        J::I8,
        A::I8,
    ]);
}

/// Dimension of a product: exponents add.
pub trait DimMul<Rhs> {
    type Output: Dimension;
}

/// Dimension of a quotient: exponents subtract.
pub trait DimDiv<Rhs> {
    type Output: Dimension;
}

/// Dimension of a square root. Only implemented when every exponent is even,
/// so `sqrt` of an odd-exponent quantity does not type-check.
pub trait DimSqrt {
    type Output: Dimension;
}

impl<L1, M1, T1, I1, Th1, N1_, J1, A1, L2, M2, T2, I2, Th2, N2_, J2, A2>
    DimMul<Dim<L2, M2, T2, I2, Th2, N2_, J2, A2>> for Dim<L1, M1, T1, I1, Th1, N1_, J1, A1>
where
    L1: Add<L2>,
    M1: Add<M2>,
    T1: Add<T2>,
    I1: Add<I2>,
    Th1: Add<Th2>,
    N1_: Add<N2_>,
    J1: Add<J2>,
    A1: Add<A2>,
    Sum<L1, L2>: Integer,
    Sum<M1, M2>: Integer,
    Sum<T1, T2>: Integer,
    Sum<I1, I2>: Integer,
    Sum<Th1, Th2>: Integer,
    Sum<N1_, N2_>: Integer,
    Sum<J1, J2>: Integer,
    Sum<A1, A2>: Integer,
{
    type Output = Dim<
        Sum<L1, L2>,
        Sum<M1, M2>,
        Sum<T1, T2>,
        Sum<I1, I2>,
        Sum<Th1, Th2>,
        Sum<N1_, N2_>,
        Sum<J1, J2>,
        Sum<A1, A2>,
    >;
}

impl<L1, M1, T1, I1, Th1, N1_, J1, A1, L2, M2, T2, I2, Th2, N2_, J2, A2>
    DimDiv<Dim<L2, M2, T2, I2, Th2, N2_, J2, A2>> for Dim<L1, M1, T1, I1, Th1, N1_, J1, A1>
where
    L1: Sub<L2>,
    M1: Sub<M2>,
    T1: Sub<T2>,
    I1: Sub<I2>,
    Th1: Sub<Th2>,
    N1_: Sub<N2_>,
    J1: Sub<J2>,
    A1: Sub<A2>,
    Diff<L1, L2>: Integer,
    Diff<M1, M2>: Integer,
    Diff<T1, T2>: Integer,
    Diff<I1, I2>: Integer,
    Diff<Th1, Th2>: Integer,
    Diff<N1_, N2_>: Integer,
    Diff<J1, J2>: Integer,
    Diff<A1, A2>: Integer,
{
    type Output = Dim<
        Diff<L1, L2>,
        Diff<M1, M2>,
        Diff<T1, T2>,
        Diff<I1, I2>,
        Diff<Th1, Th2>,
        Diff<N1_, N2_>,
        Diff<J1, J2>,
        Diff<A1, A2>,
    >;
}

impl<L, M, T, I, Th, N, J, A> DimSqrt for Dim<L, M, T, I, Th, N, J, A>
where
    L: PartialDiv<P2>,
    M: PartialDiv<P2>,
    T: PartialDiv<P2>,
    I: PartialDiv<P2>,
    Th: PartialDiv<P2>,
    N: PartialDiv<P2>,
    J: PartialDiv<P2>,
    A: PartialDiv<P2>,
    PartialQuot<L, P2>: Integer,
    PartialQuot<M, P2>: Integer,
    PartialQuot<T, P2>: Integer,
    PartialQuot<I, P2>: Integer,
    PartialQuot<Th, P2>: Integer,
    PartialQuot<N, P2>: Integer,
    PartialQuot<J, P2>: Integer,
    PartialQuot<A, P2>: Integer,
{
    type Output = Dim<
        PartialQuot<L, P2>,
        PartialQuot<M, P2>,
        PartialQuot<T, P2>,
        PartialQuot<I, P2>,
        PartialQuot<Th, P2>,
        PartialQuot<N, P2>,
        PartialQuot<J, P2>,
        PartialQuot<A, P2>,
    >;
}

pub type Dimensionless = Dim<Z0, Z0, Z0, Z0, Z0, Z0, Z0, Z0>;
pub type Length = Dim<P1, Z0, Z0, Z0, Z0, Z0, Z0, Z0>;
pub type Mass = Dim<Z0, P1, Z0, Z0, Z0, Z0, Z0, Z0>;
pub type Time = Dim<Z0, Z0, P1, Z0, Z0, Z0, Z0, Z0>;
pub type Current = Dim<Z0, Z0, Z0, P1, Z0, Z0, Z0, Z0>;
pub type Temperature = Dim<Z0, Z0, Z0, Z0, P1, Z0, Z0, Z0>;
pub type Amount = Dim<Z0, Z0, Z0, Z0, Z0, P1, Z0, Z0>;
pub type LuminousIntensity = Dim<Z0, Z0, Z0, Z0, Z0, Z0, P1, Z0>;
pub type Angle = Dim<Z0, Z0, Z0, Z0, Z0, Z0, Z0, P1>;

pub type Area = Dim<P2, Z0, Z0, Z0, Z0, Z0, Z0, Z0>;
pub type Volume = Dim<P3, Z0, Z0, Z0, Z0, Z0, Z0, Z0>;
pub type Velocity = Dim<P1, Z0, N1, Z0, Z0, Z0, Z0, Z0>;
pub type Acceleration = Dim<P1, Z0, N2, Z0, Z0, Z0, Z0, Z0>;
pub type Frequency = Dim<Z0, Z0, N1, Z0, Z0, Z0, Z0, Z0>;
pub type AngularVelocity = Dim<Z0, Z0, N1, Z0, Z0, Z0, Z0, P1>;
pub type Force = Dim<P1, P1, N2, Z0, Z0, Z0, Z0, Z0>;
pub type Pressure = Dim<N1, P1, N2, Z0, Z0, Z0, Z0, Z0>;
pub type Energy = Dim<P2, P1, N2, Z0, Z0, Z0, Z0, Z0>;
pub type Power = Dim<P2, P1, N3, Z0, Z0, Z0, Z0, Z0>;
pub type Charge = Dim<Z0, Z0, P1, P1, Z0, Z0, Z0, Z0>;
pub type Voltage = Dim<P2, P1, N3, N1, Z0, Z0, Z0, Z0>;
pub type Density = Dim<N3, P1, Z0, Z0, Z0, Z0, Z0, Z0>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_level_vectors() {
        assert_eq!(Velocity::VECTOR.exponents(), [1, 0, -1, 0, 0, 0, 0, 0]);
        assert_eq!(Pressure::VECTOR.exponent(BaseDimension::Length), -1);
        assert!(Dimensionless::VECTOR.is_dimensionless());
    }

    #[test]
    fn test_type_level_arithmetic() {
        fn vector<D: Dimension>() -> DimensionVector {
            D::VECTOR
        }
        assert_eq!(
            vector::<<Length as DimDiv<Time>>::Output>(),
            Velocity::VECTOR
        );
        assert_eq!(
            vector::<<Mass as DimMul<Acceleration>>::Output>(),
            Force::VECTOR
        );
        assert_eq!(vector::<<Area as DimSqrt>::Output>(), Length::VECTOR);
    }

    #[test]
    fn test_value_level_arithmetic() {
        let v = Length::VECTOR.checked_add(&Time::VECTOR.checked_scale(-1).unwrap());
        assert_eq!(v, Some(Velocity::VECTOR));
        assert_eq!(DimensionVector::new([127, 0, 0, 0, 0, 0, 0, 0]).checked_scale(2), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Velocity::VECTOR.to_string(), "[m s^-1]");
        assert_eq!(Dimensionless::VECTOR.to_string(), "[1]");
    }
}
