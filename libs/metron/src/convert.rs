use crate::quantity::{Quantity, Real};
use crate::unit::{DynamicUnit, Unit};
use crate::{Error, Result};

/// Converts `value` from `source` into `target`.
///
/// The value is first taken to the coherent base unit
/// (`value * source.scale + source.offset`) and then into the target
/// (`(base - target.offset) / target.scale`). The two steps are folded into one
/// exact factor and shift when the ratios fit.
pub fn convert(source: &DynamicUnit, value: f64, target: &DynamicUnit) -> Result<f64> {
    if source.exponents() != target.exponents() {
        return Err(Error::IncompatibleTypes {
            from: *source,
            to: *target,
        });
    }
    if source == target {
        return Ok(value);
    }
    let factor = source.scale().checked_div(target.scale());
    let shift = source
        .offset()
        .checked_sub(target.offset())
        .and_then(|s| s.checked_div(target.scale()));
    match (factor, shift) {
        (Some(factor), Some(shift)) => Ok(factor.apply(value) + shift.to_f64()),
        _ => {
            let base = source.scale().apply(value) + source.offset().to_f64();
            Ok((base - target.offset().to_f64()) / target.scale().to_f64())
        }
    }
}

/// Anything that has a canonical base-unit value: quantities, and plain
/// scalars which are their own base value.
pub trait Measure {
    type Value: Real;

    fn base_quantity(&self) -> Self::Value;
}

impl<U: Unit, V: Real> Measure for Quantity<U, V> {
    type Value = V;

    fn base_quantity(&self) -> V {
        self.base_value()
    }
}

impl Measure for f64 {
    type Value = f64;

    fn base_quantity(&self) -> f64 {
        *self
    }
}

impl Measure for f32 {
    type Value = f32;

    fn base_quantity(&self) -> f32 {
        *self
    }
}

/// Base-unit value of a quantity, or the scalar itself.
pub fn base_quantity<M: Measure>(m: &M) -> M::Value {
    m.base_quantity()
}

/// The numeric value of `q` expressed in `unit`.
pub fn quantity<U: Unit, V: Real>(q: &Quantity<U, V>, unit: &DynamicUnit) -> Result<V> {
    q.in_unit(unit)
}

/// Like [`quantity`], with the unit given as text.
pub fn quantity_str<U: Unit, V: Real>(q: &Quantity<U, V>, unit: &str) -> Result<V> {
    q.in_unit_str(unit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_unit;
    use crate::units::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_convert_linear_and_affine() {
        let kt = Knot::dynamic_unit();
        let ms = MeterPerSecond::dynamic_unit();
        assert_relative_eq!(convert(&kt, 120.0, &ms).unwrap(), 61.733_333_333, epsilon = 1e-8);
        let c = Celsius::dynamic_unit();
        let f = Fahrenheit::dynamic_unit();
        assert_relative_eq!(convert(&c, 100.0, &f).unwrap(), 212.0, epsilon = 1e-9);
        assert_relative_eq!(convert(&f, -40.0, &c).unwrap(), -40.0, epsilon = 1e-9);
        assert_relative_eq!(
            convert(&c, 0.0, &Kelvin::dynamic_unit()).unwrap(),
            273.15,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_convert_rejects_mismatched_dimensions() {
        let err = convert(&Meter::dynamic_unit(), 1.0, &Second::dynamic_unit()).unwrap_err();
        assert_eq!(
            err,
            Error::IncompatibleTypes {
                from: Meter::dynamic_unit(),
                to: Second::dynamic_unit()
            }
        );
    }

    #[test]
    fn test_quantity_in_dynamic_unit() {
        let altitude = Quantity::<Foot>::new(1000.0);
        assert_relative_eq!(quantity_str(&altitude, "m").unwrap(), 304.8, epsilon = 1e-9);
        assert_relative_eq!(
            quantity(&altitude, &parse_unit("km").unwrap()).unwrap(),
            0.3048,
            epsilon = 1e-12
        );
        assert!(matches!(
            quantity_str(&altitude, "s"),
            Err(Error::IncompatibleTypes { .. })
        ));
        assert!(matches!(
            quantity_str(&altitude, "parsec"),
            Err(Error::UnsupportedUnit(_))
        ));
    }

    #[test]
    fn test_base_quantity() {
        assert_relative_eq!(base_quantity(&Quantity::<Hectopascal>::new(1013.25)), 101_325.0);
        assert_eq!(base_quantity(&2.5f64), 2.5);
        assert_eq!(base_quantity(&2.5f32), 2.5f32);
    }
}
