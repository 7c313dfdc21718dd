//! Change-gated, throttled recomputation.
use std::cell::RefCell;
use std::rc::Rc;

use smallvec::SmallVec;
use tracing::trace;

use crate::property::Observable;
use crate::smoother::Invalidate;
use crate::time::Time;

/// Timing of one observer firing, handed to the callback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Firing {
    pub update_time: Time,
    pub update_dt: Time,
}

struct Watched {
    property: Box<dyn Observable>,
    last_serial: u64,
}

/// Watches a set of properties and fires when any of them changed and at least
/// `minimum_dt` passed since the previous firing.
///
/// The first [`Observer::process`] call always fires, with `update_dt` of zero.
/// A call that finds the interval elapsed but nothing changed invalidates the
/// registered smoothers, so a later firing does not blend across the gap.
///
/// Not every call that does not fire invalidates: a call inside the
/// throttling window (less than `minimum_dt` after the previous firing)
/// returns early and leaves the smoothers untouched, even when an input
/// changed. A smoother that must also survive inputs updating slower than the
/// caller ticks should not be registered here; reset it from the firing code
/// when the sample gap is too long instead.
pub struct Observer {
    observed: SmallVec<[Watched; 4]>,
    minimum_dt: Time,
    last_fire_time: Option<Time>,
    update_time: Time,
    update_dt: Time,
    touched: bool,
    callback: Option<Box<dyn FnMut(&Firing)>>,
    smoothers: Vec<Rc<RefCell<dyn Invalidate>>>,
}

impl Default for Observer {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer {
    pub fn new() -> Self {
        Observer {
            observed: SmallVec::new(),
            minimum_dt: Time::new(0.0),
            last_fire_time: None,
            update_time: Time::new(0.0),
            update_dt: Time::new(0.0),
            touched: false,
            callback: None,
            smoothers: Vec::new(),
        }
    }

    /// Adds a property to the watched set. Order does not matter.
    pub fn observe<P: Observable + Clone + 'static>(&mut self, property: &P) -> &mut Self {
        self.observed.push(Watched {
            property: Box::new(property.clone()),
            last_serial: 0,
        });
        self
    }

    pub fn set_minimum_dt(&mut self, minimum_dt: Time) -> &mut Self {
        self.minimum_dt = minimum_dt;
        self
    }

    pub fn minimum_dt(&self) -> Time {
        self.minimum_dt
    }

    pub fn set_callback(&mut self, callback: impl FnMut(&Firing) + 'static) -> &mut Self {
        self.callback = Some(Box::new(callback));
        self
    }

    pub fn add_depending_smoother<S: Invalidate + 'static>(
        &mut self,
        smoother: Rc<RefCell<S>>,
    ) -> &mut Self {
        self.smoothers.push(smoother);
        self
    }

    /// Forces the next call whose interval has elapsed to fire.
    pub fn touch(&mut self) {
        self.touched = true;
    }

    pub fn observed_paths(&self) -> impl Iterator<Item = &str> {
        self.observed.iter().map(|w| w.property.path())
    }

    /// Runs the observer at `now`; returns true when it fired.
    pub fn process(&mut self, now: Time) -> bool {
        let first = self.last_fire_time.is_none();
        let dt = self.last_fire_time.map_or(Time::new(0.0), |last| now - last);
        if !first && dt < self.minimum_dt {
            return false;
        }
        let changed = self
            .observed
            .iter()
            .any(|w| w.property.serial() != w.last_serial);
        if !(first || changed || self.touched) {
            for smoother in &self.smoothers {
                smoother.borrow_mut().invalidate();
            }
            return false;
        }

        for w in &mut self.observed {
            w.last_serial = w.property.serial();
        }
        self.touched = false;
        self.last_fire_time = Some(now);
        self.update_time = now;
        self.update_dt = dt;
        trace!(time = %now, dt = %dt, "observer fired");
        let firing = Firing {
            update_time: now,
            update_dt: dt,
        };
        if let Some(callback) = &mut self.callback {
            callback(&firing);
        }
        true
    }

    /// Time of the latest firing.
    pub fn update_time(&self) -> Time {
        self.update_time
    }

    /// Time between the latest firing and the one before it.
    pub fn update_dt(&self) -> Time {
        self.update_dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::PropertyOut;
    use crate::smoother::Smoother;
    use crate::time::ManualClock;
    use std::cell::Cell;

    #[test]
    fn test_first_call_fires() {
        let mut observer = Observer::new();
        observer.set_minimum_dt(Time::new(1.0));
        assert!(observer.process(Time::new(5.0)));
        assert_eq!(observer.update_dt(), Time::new(0.0));
        assert_eq!(observer.update_time(), Time::new(5.0));
    }

    #[test]
    fn test_fires_only_on_change() {
        let clock = ManualClock::default();
        let mut out = PropertyOut::<f64>::new("/x", clock.shared());
        let fired = Rc::new(Cell::new(0));
        let counter = fired.clone();
        let mut observer = Observer::new();
        observer
            .observe(&out.reader())
            .set_callback(move |_| counter.set(counter.get() + 1));

        assert!(observer.process(Time::new(0.0)));
        assert!(!observer.process(Time::new(0.1)));
        out.write(1.0);
        assert!(observer.process(Time::new(0.2)));
        assert_eq!(observer.update_dt().value(), 0.2);
        out.set_nil();
        assert!(observer.process(Time::new(0.3)));
        assert_eq!(fired.get(), 3);
    }

    #[test]
    fn test_touch_forces_firing() {
        let mut observer = Observer::new();
        observer.process(Time::new(0.0));
        assert!(!observer.process(Time::new(1.0)));
        observer.touch();
        assert!(observer.process(Time::new(2.0)));
        assert!(!observer.process(Time::new(3.0)));
    }

    #[test]
    fn test_idle_interval_invalidates_smoothers() {
        let clock = ManualClock::default();
        let mut out = PropertyOut::<f64>::new("/x", clock.shared());
        let smoother = Rc::new(RefCell::new(Smoother::<f64>::new(Time::new(1.0))));
        let mut observer = Observer::new();
        observer
            .observe(&out.reader())
            .set_minimum_dt(Time::new(0.5))
            .add_depending_smoother(smoother.clone());

        observer.process(Time::new(0.0));
        smoother.borrow_mut().process(1.0, Time::new(0.0));
        out.write(2.0);
        // throttled: nothing happens
        assert!(!observer.process(Time::new(0.1)));
        assert!(smoother.borrow().value().is_some());
        // fires on the change once the interval elapsed
        assert!(observer.process(Time::new(0.6)));
        assert!(smoother.borrow().value().is_some());
        // interval elapsed, no change
        assert!(!observer.process(Time::new(1.2)));
        assert!(smoother.borrow().value().is_none());
    }
}
