//! Static and dynamic units.
use core::fmt;
use core::marker::PhantomData;

use crate::dimension::{BaseDimension, DimDiv, DimMul, Dimension, DimensionVector};
use crate::ratio::Ratio;

/// A unit fixed at compile time.
///
/// A value `v` expressed in this unit corresponds to `v * SCALE + OFFSET` in the
/// coherent SI unit of `Dim`. `OFFSET` is only non-zero for affine scales such
/// as degrees Celsius.
pub trait Unit: 'static {
    type Dim: Dimension;
    const SCALE: Ratio;
    const OFFSET: Ratio = Ratio::ZERO;

    /// Symbol terms with their exponents, e.g. `[("m", 1), ("s", -1)]`.
    fn terms() -> Vec<(&'static str, i8)>;

    /// Text symbol, always accepted by [`parse_unit`](crate::parse_unit).
    fn symbol() -> String {
        render_terms(&Self::terms())
    }

    fn dynamic_unit() -> DynamicUnit {
        DynamicUnit::new(Self::Dim::VECTOR, Self::SCALE, Self::OFFSET)
    }
}

pub(crate) fn render_terms(terms: &[(&str, i8)]) -> String {
    let mut out = String::new();
    for (symbol, exp) in terms {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(symbol);
        if *exp != 1 {
            out.push('^');
            out.push_str(&exp.to_string());
        }
    }
    out
}

fn merge_terms(
    mut lhs: Vec<(&'static str, i8)>,
    rhs: Vec<(&'static str, i8)>,
    sign: i8,
) -> Vec<(&'static str, i8)> {
    for (symbol, exp) in rhs {
        match lhs.iter_mut().find(|(s, _)| *s == symbol) {
            Some((_, e)) => *e += sign * exp,
            None => lhs.push((symbol, sign * exp)),
        }
    }
    lhs.retain(|(_, e)| *e != 0);
    lhs
}

/// Unit of `Quantity<L> * Quantity<R>`.
///
/// Neither side may carry an offset:
///
/// ```compile_fail
/// use metron::{Product, Quantity, units::{Celsius, Second}};
/// let q = Quantity::<Product<Celsius, Second>>::new(1.0);
/// let _ = q.base_value();
/// ```
pub struct Product<L, R>(PhantomData<(L, R)>);

/// Unit of `Quantity<L> / Quantity<R>`.
pub struct Quotient<L, R>(PhantomData<(L, R)>);

/// The coherent SI unit (scale 1, no offset) of a dimension.
pub struct Coherent<D>(PhantomData<D>);

impl<L: Unit, R: Unit> Unit for Product<L, R>
where
    L::Dim: DimMul<R::Dim>,
{
    type Dim = <L::Dim as DimMul<R::Dim>>::Output;
    const SCALE: Ratio = {
        assert!(
            L::OFFSET.is_zero() && R::OFFSET.is_zero(),
            "affine units do not compose"
        );
        L::SCALE.mul(R::SCALE)
    };

    fn terms() -> Vec<(&'static str, i8)> {
        merge_terms(L::terms(), R::terms(), 1)
    }
}

impl<L: Unit, R: Unit> Unit for Quotient<L, R>
where
    L::Dim: DimDiv<R::Dim>,
{
    type Dim = <L::Dim as DimDiv<R::Dim>>::Output;
    const SCALE: Ratio = {
        assert!(
            L::OFFSET.is_zero() && R::OFFSET.is_zero(),
            "affine units do not compose"
        );
        L::SCALE.div(R::SCALE)
    };

    fn terms() -> Vec<(&'static str, i8)> {
        merge_terms(L::terms(), R::terms(), -1)
    }
}

impl<D: Dimension + 'static> Unit for Coherent<D> {
    type Dim = D;
    const SCALE: Ratio = Ratio::ONE;

    fn terms() -> Vec<(&'static str, i8)> {
        BaseDimension::ALL
            .iter()
            .map(|base| (base.si_symbol(), D::VECTOR.exponent(*base)))
            .filter(|(_, exp)| *exp != 0)
            .collect()
    }
}

/// A unit described at runtime, usually parsed from text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DynamicUnit {
    exponents: DimensionVector,
    scale: Ratio,
    offset: Ratio,
}

impl DynamicUnit {
    pub const DIMENSIONLESS: DynamicUnit = DynamicUnit {
        exponents: DimensionVector::DIMENSIONLESS,
        scale: Ratio::ONE,
        offset: Ratio::ZERO,
    };

    pub const fn new(exponents: DimensionVector, scale: Ratio, offset: Ratio) -> Self {
        DynamicUnit {
            exponents,
            scale,
            offset,
        }
    }

    pub const fn exponents(&self) -> DimensionVector {
        self.exponents
    }

    pub const fn scale(&self) -> Ratio {
        self.scale
    }

    pub const fn offset(&self) -> Ratio {
        self.offset
    }

    pub const fn is_affine(&self) -> bool {
        !self.offset.is_zero()
    }

    /// Product of two linear units. Returns `None` on exponent or scale
    /// overflow, or when either side is affine.
    pub fn checked_mul(&self, rhs: &DynamicUnit) -> Option<DynamicUnit> {
        if self.is_affine() || rhs.is_affine() {
            return None;
        }
        Some(DynamicUnit {
            exponents: self.exponents.checked_add(&rhs.exponents)?,
            scale: self.scale.checked_mul(rhs.scale)?,
            offset: Ratio::ZERO,
        })
    }

    /// Integer power of a linear unit.
    pub fn checked_powi(&self, exp: i8) -> Option<DynamicUnit> {
        if exp == 1 {
            return Some(*self);
        }
        if self.is_affine() {
            return None;
        }
        Some(DynamicUnit {
            exponents: self.exponents.checked_scale(exp)?,
            scale: self.scale.checked_powi(exp as i32)?,
            offset: Ratio::ZERO,
        })
    }
}

impl Default for DynamicUnit {
    fn default() -> Self {
        DynamicUnit::DIMENSIONLESS
    }
}

impl fmt::Display for DynamicUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DynamicUnit<")?;
        for exp in self.exponents.exponents() {
            write!(f, "{exp}, ")?;
        }
        write!(f, "{}, {}>", self.scale, self.offset)
    }
}

impl core::str::FromStr for DynamicUnit {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parse_unit(s)
    }
}

/// Declares static units and the symbol table used by the unit parser.
macro_rules! units {
    ($(
        $(#[$meta:meta])*
        $name:ident: $dim:ty = $symbol:literal, $num:literal / $den:literal
            $(, offset $onum:literal / $oden:literal)?;
    )*) => {
        $(
            $(#[$meta])*
            #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
            pub struct $name;

            impl $crate::unit::Unit for $name {
                type Dim = $dim;
                const SCALE: $crate::ratio::Ratio = $crate::ratio::Ratio::new($num, $den);
                $(const OFFSET: $crate::ratio::Ratio = $crate::ratio::Ratio::new($onum, $oden);)?

                fn terms() -> Vec<(&'static str, i8)> {
                    vec![($symbol, 1)]
                }
            }
        )*

        pub(crate) static SYMBOL_TABLE: &[(&str, $crate::unit::DynamicUnit)] = &[
            $((
                $symbol,
                $crate::unit::DynamicUnit::new(
                    <$dim as $crate::dimension::Dimension>::VECTOR,
                    <$name as $crate::unit::Unit>::SCALE,
                    <$name as $crate::unit::Unit>::OFFSET,
                ),
            ),)*
        ];
    };
}

pub(crate) use units;
