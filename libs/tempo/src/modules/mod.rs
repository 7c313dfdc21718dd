//! Reference modules built on the framework.
mod mixer;
mod vertical_speed;

pub use mixer::*;
pub use vertical_speed::*;
