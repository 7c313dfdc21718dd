use thiserror::Error;

use crate::DynamicUnit;

#[derive(Error, Debug, Clone, PartialEq, miette::Diagnostic)]
pub enum Error {
    #[error("unsupported unit: {0}")]
    #[diagnostic(
        code(metron::unsupported_unit),
        help("units are whitespace separated symbols with optional exponents, e.g. \"kg m^2 s-2\"")
    )]
    UnsupportedUnit(String),

    #[error("incompatible units: {} cannot be converted to {}", .from.exponents(), .to.exponents())]
    #[diagnostic(
        code(metron::incompatible_types),
        help("both units must have the same dimension vector")
    )]
    IncompatibleTypes { from: DynamicUnit, to: DynamicUnit },

    #[error("unparsable value: {0}")]
    #[diagnostic(
        code(metron::unparsable_value),
        help("text values look like \"<number> <unit>\", blobs are little-endian base values")
    )]
    UnparsableValue(String),
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
