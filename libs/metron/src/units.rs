//! The static unit catalog.
//!
//! Every unit declared here is also registered under its symbol for
//! [`parse_unit`](crate::parse_unit). Symbols never end in an ASCII digit, since
//! a trailing integer is read as an exponent.
use crate::dimension::*;
use crate::unit::{DynamicUnit, units};

units! {
    Meter: Length = "m", 1 / 1;
    Kilometer: Length = "km", 1000 / 1;
    Centimeter: Length = "cm", 1 / 100;
    Millimeter: Length = "mm", 1 / 1000;
    Foot: Length = "ft", 3048 / 10000;
    Inch: Length = "in", 254 / 10000;
    NauticalMile: Length = "nmi", 1852 / 1;
    Mile: Length = "mi", 1609344 / 1000;

    Kilogram: Mass = "kg", 1 / 1;
    Gram: Mass = "g", 1 / 1000;
    Pound: Mass = "lb", 45359237 / 100000000;

    Second: Time = "s", 1 / 1;
    Millisecond: Time = "ms", 1 / 1000;
    Microsecond: Time = "us", 1 / 1000000;
    Minute: Time = "min", 60 / 1;
    Hour: Time = "h", 3600 / 1;

    Ampere: Current = "A", 1 / 1;
    Milliampere: Current = "mA", 1 / 1000;

    Kelvin: Temperature = "K", 1 / 1;
    /// Affine: 0 °C is 273.15 K.
    Celsius: Temperature = "°C", 1 / 1, offset 27315 / 100;
    /// Affine: 0 °F is 459.67 °R.
    Fahrenheit: Temperature = "°F", 5 / 9, offset 45967 / 180;

    Mole: Amount = "mol", 1 / 1;
    Candela: LuminousIntensity = "cd", 1 / 1;

    Radian: Angle = "rad", 1 / 1;
    /// π/180, with π approximated by 245850922/78256779 (error below 1e-16).
    Degree: Angle = "deg", 122925461 / 7043110110;

    MeterPerSecond: Velocity = "m/s", 1 / 1;
    KilometerPerHour: Velocity = "km/h", 1000 / 3600;
    Knot: Velocity = "kt", 1852 / 3600;
    FootPerMinute: Velocity = "fpm", 3048 / 600000;
    MilePerHour: Velocity = "mph", 1609344 / 3600000;
    MeterPerSecondSquared: Acceleration = "m/s²", 1 / 1;

    RadianPerSecond: AngularVelocity = "rad/s", 1 / 1;
    DegreePerSecond: AngularVelocity = "°/s", 122925461 / 7043110110;

    Newton: Force = "N", 1 / 1;
    Pascal: Pressure = "Pa", 1 / 1;
    Hectopascal: Pressure = "hPa", 100 / 1;
    InchOfMercury: Pressure = "inHg", 3386389 / 1000;
    Joule: Energy = "J", 1 / 1;
    Watt: Power = "W", 1 / 1;
    Coulomb: Charge = "C", 1 / 1;
    Volt: Voltage = "V", 1 / 1;

    Hertz: Frequency = "Hz", 1 / 1;
    RevolutionPerMinute: Frequency = "rpm", 1 / 60;
}

/// Alternative spellings accepted by the parser.
static ALIASES: &[(&str, &str)] = &[
    ("°", "deg"),
    ("degC", "°C"),
    ("degF", "°F"),
    ("µs", "us"),
    ("kn", "kt"),
    ("ft/min", "fpm"),
];

/// Looks up a single symbol, without exponent.
pub fn lookup_symbol(symbol: &str) -> Option<DynamicUnit> {
    let symbol = ALIASES
        .iter()
        .find(|(alias, _)| *alias == symbol)
        .map_or(symbol, |(_, canonical)| canonical);
    SYMBOL_TABLE
        .iter()
        .find(|(s, _)| *s == symbol)
        .map(|(_, unit)| *unit)
}

/// All symbols known to the parser, aliases excluded.
pub fn symbols() -> impl Iterator<Item = &'static str> {
    SYMBOL_TABLE.iter().map(|(s, _)| *s)
}
