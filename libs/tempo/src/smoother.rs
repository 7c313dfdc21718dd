use std::ops::{Add, Mul, Sub};

use crate::time::Time;

/// Something holding filter state that must be dropped when its input goes
/// stale.
pub trait Invalidate {
    fn invalidate(&mut self);
}

/// First-order exponential smoother with time constant `tau`.
#[derive(Debug, Clone)]
pub struct Smoother<T> {
    time_constant: Time,
    state: Option<T>,
}

impl<T> Smoother<T>
where
    T: Copy + Add<Output = T> + Sub<Output = T> + Mul<f64, Output = T>,
{
    pub fn new(time_constant: Time) -> Self {
        Smoother {
            time_constant,
            state: None,
        }
    }

    pub fn time_constant(&self) -> Time {
        self.time_constant
    }

    pub fn set_time_constant(&mut self, time_constant: Time) {
        self.time_constant = time_constant;
    }

    /// Feeds `value` observed `dt` after the previous sample and returns the
    /// smoothed output. The first sample after creation or invalidation passes
    /// through unchanged.
    pub fn process(&mut self, value: T, dt: Time) -> T {
        let tau = self.time_constant.value();
        let out = match self.state {
            Some(prev) if tau > 0.0 => {
                let alpha = 1.0 - (-dt.value().max(0.0) / tau).exp();
                prev + (value - prev) * alpha
            }
            _ => value,
        };
        self.state = Some(out);
        out
    }

    pub fn value(&self) -> Option<T> {
        self.state
    }
}

impl<T> Invalidate for Smoother<T> {
    fn invalidate(&mut self) {
        self.state = None;
    }
}
