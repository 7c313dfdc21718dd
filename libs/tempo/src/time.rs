//! Time sources that stamp property writes and drive the loop.
use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

use metron::Quantity;
use metron::units::Second;

/// Simulated or wall time since an arbitrary epoch.
pub type Time = Quantity<Second>;

pub trait TimeSource {
    fn now(&self) -> Time;
}

/// Shared handle to the time source of a module graph.
pub type Clock = Rc<dyn TimeSource>;

/// Monotonic wall time since creation.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        SystemClock {
            origin: Instant::now(),
        }
    }

    pub fn shared() -> Clock {
        Rc::new(SystemClock::new())
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemClock {
    fn now(&self) -> Time {
        Time::new(self.origin.elapsed().as_secs_f64())
    }
}

/// Time that only moves when told to. Clones share the same instant.
#[derive(Debug, Clone, Default)]
pub struct ManualClock(Rc<Cell<Time>>);

impl ManualClock {
    pub fn new(start: Time) -> Self {
        ManualClock(Rc::new(Cell::new(start)))
    }

    pub fn set(&self, now: Time) {
        self.0.set(now);
    }

    pub fn advance(&self, dt: Time) {
        self.0.set(self.0.get() + dt);
    }

    pub fn shared(&self) -> Clock {
        Rc::new(self.clone())
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> Time {
        self.0.get()
    }
}
