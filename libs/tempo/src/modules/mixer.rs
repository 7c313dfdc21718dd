use std::ops::{Add, Mul};

use tracing::warn;

use crate::Result;
use crate::cycle::Cycle;
use crate::module::Module;
use crate::module_io::{ModuleIo, ModuleIoBuilder};
use crate::property::{PropChanged, PropertyIn, PropertyOut};
use crate::setting::Setting;
use crate::time::Clock;
use crate::value::Value;

/// Weighted sum of two inputs, optionally clamped.
///
/// A nil input is left out of the sum; the output is nil only when both
/// inputs are. Recomputes only when an input changed.
pub struct Mixer<V: Value> {
    io: ModuleIo,
    input_a_factor: Setting<f64>,
    input_b_factor: Setting<f64>,
    output_minimum: Setting<V>,
    output_maximum: Setting<V>,
    input_a: PropChanged<PropertyIn<V>>,
    input_b: PropChanged<PropertyIn<V>>,
    output: PropertyOut<V>,
}

impl<V> Mixer<V>
where
    V: Value + Copy + Default + PartialOrd + Add<Output = V>,
    f64: Mul<V, Output = V>,
{
    pub fn new(instance: &str, clock: Clock) -> Self {
        let mut io = ModuleIoBuilder::new(instance, clock);
        let input_a_factor = io.setting_with_default("input_a_factor", 1.0);
        let input_b_factor = io.setting_with_default("input_b_factor", 1.0);
        let output_minimum = io.optional_setting("output_minimum");
        let output_maximum = io.optional_setting("output_maximum");
        let input_a = PropChanged::new(io.input("/input.a"));
        let input_b = PropChanged::new(io.input("/input.b"));
        let output = io.output("/value");
        Mixer {
            io: io.build(),
            input_a_factor,
            input_b_factor,
            output_minimum,
            output_maximum,
            input_a,
            input_b,
            output,
        }
    }

    pub fn input_a(&self) -> &PropertyIn<V> {
        self.input_a.property()
    }

    pub fn input_b(&self) -> &PropertyIn<V> {
        self.input_b.property()
    }

    pub fn output(&self) -> &PropertyOut<V> {
        &self.output
    }

    fn mix(&self) -> Option<V> {
        let a = self.input_a().get();
        let b = self.input_b().get();
        if a.is_none() && b.is_none() {
            return None;
        }
        let mut sum = V::default();
        if let Some(a) = a {
            sum = sum + self.input_a_factor.value_or(1.0) * a;
        }
        if let Some(b) = b {
            sum = sum + self.input_b_factor.value_or(1.0) * b;
        }
        if let Some(min) = self.output_minimum.get_optional() {
            if sum < min {
                sum = min;
            }
        }
        if let Some(max) = self.output_maximum.get_optional() {
            if sum > max {
                sum = max;
            }
        }
        Some(sum)
    }
}

impl<V> Module for Mixer<V>
where
    V: Value + Copy + Default + PartialOrd + Add<Output = V>,
    f64: Mul<V, Output = V>,
{
    fn io(&self) -> &ModuleIo {
        &self.io
    }

    fn io_mut(&mut self) -> &mut ModuleIo {
        &mut self.io
    }

    fn initialize(&mut self) -> Result<()> {
        if let (Some(min), Some(max)) = (
            self.output_minimum.get_optional(),
            self.output_maximum.get_optional(),
        ) {
            if min > max {
                warn!(module = %self.io.name(), "output_maximum is less than output_minimum");
            }
        }
        Ok(())
    }

    fn process(&mut self, _cycle: &Cycle) {
        let a_changed = self.input_a.changed();
        let b_changed = self.input_b.changed();
        if a_changed || b_changed {
            let mixed = self.mix();
            self.output.write_option(mixed);
        }
    }
}
