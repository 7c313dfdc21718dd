//! Tick-driven data core for flight computations.
//!
//! Modules publish measurements through [`PropertyOut`]s, read other modules'
//! outputs through connected [`PropertyIn`]s, take configuration through
//! [`Setting`]s and recompute when their inputs change, gated by an
//! [`Observer`]. Everything runs on one thread: a scheduler such as
//! [`ProcessingLoop`] hands the same [`Cycle`] to every module once per tick,
//! in a fixed, externally chosen order.

mod cycle;
mod error;
mod module;
mod module_io;
pub mod modules;
mod observer;
mod processing_loop;
mod property;
mod setting;
mod smoother;
mod time;
mod value;

pub use cycle::*;
pub use error::*;
pub use module::*;
pub use module_io::*;
pub use observer::*;
pub use processing_loop::*;
pub use property::*;
pub use setting::*;
pub use smoother::*;
pub use time::*;
pub use value::*;

pub use metron;
