use metron::Quantity;
use metron::units::{Foot, FootPerMinute, Millisecond, Second};

use crate::Result;
use crate::cycle::Cycle;
use crate::module::Module;
use crate::module_io::{ModuleIo, ModuleIoBuilder};
use crate::observer::Observer;
use crate::property::{PropertyIn, PropertyOut};
use crate::setting::Setting;
use crate::smoother::{Invalidate, Smoother};
use crate::time::{Clock, Time};

type Altitude = Quantity<Foot>;
type VerticalRate = Quantity<FootPerMinute>;

/// Differentiates altitude into a smoothed vertical speed.
///
/// The smoother restarts when altitude goes nil or when the gap between two
/// altitude samples exceeds `smoothing_time`.
pub struct VerticalSpeed {
    io: ModuleIo,
    smoothing_time: Setting<Time>,
    minimum_dt: Setting<Quantity<Millisecond>>,
    altitude: PropertyIn<Altitude>,
    vertical_speed: PropertyOut<VerticalRate>,
    computer: Observer,
    smoother: Smoother<VerticalRate>,
    previous_altitude: Option<Altitude>,
}

impl VerticalSpeed {
    pub fn new(instance: &str, clock: Clock) -> Self {
        let mut io = ModuleIoBuilder::new(instance, clock);
        let smoothing_time = io.setting_with_default("smoothing_time", Time::new(0.5));
        let minimum_dt = io.setting_with_default("minimum_dt", Quantity::new(10.0));
        let altitude = io.input("/altitude");
        let vertical_speed = io.output("/vertical-speed");
        let mut computer = Observer::new();
        computer.observe(&altitude);
        VerticalSpeed {
            io: io.build(),
            smoothing_time,
            minimum_dt,
            altitude,
            vertical_speed,
            computer,
            smoother: Smoother::new(Time::new(0.5)),
            previous_altitude: None,
        }
    }

    pub fn altitude(&self) -> &PropertyIn<Altitude> {
        &self.altitude
    }

    pub fn vertical_speed(&self) -> &PropertyOut<VerticalRate> {
        &self.vertical_speed
    }

    fn compute(&mut self) {
        let Some(altitude) = self.altitude.get() else {
            self.previous_altitude = None;
            self.smoother.invalidate();
            self.vertical_speed.set_nil();
            return;
        };
        let dt = self.computer.update_dt();
        match self.previous_altitude {
            Some(previous) if dt > Time::new(0.0) => {
                if dt > self.smoother.time_constant() {
                    self.smoother.invalidate();
                }
                let rate = ((altitude - previous) / dt).to::<FootPerMinute>();
                let smoothed = self.smoother.process(rate, dt);
                self.vertical_speed.write(smoothed);
            }
            _ => self.vertical_speed.set_nil(),
        }
        self.previous_altitude = Some(altitude);
    }
}

impl Module for VerticalSpeed {
    fn io(&self) -> &ModuleIo {
        &self.io
    }

    fn io_mut(&mut self) -> &mut ModuleIo {
        &mut self.io
    }

    fn initialize(&mut self) -> Result<()> {
        self.smoother.set_time_constant(self.smoothing_time.get()?);
        self.computer
            .set_minimum_dt(self.minimum_dt.get()?.to::<Second>());
        Ok(())
    }

    fn process(&mut self, cycle: &Cycle) {
        if self.computer.process(cycle.update_time()) {
            self.compute();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::ManualClock;
    use approx::assert_relative_eq;

    #[test]
    fn test_steady_climb() {
        let clock = ManualClock::default();
        let mut altitude = PropertyOut::<Altitude>::new("/altitude", clock.shared());
        let mut vs = VerticalSpeed::new("vertical-speed", clock.shared());
        vs.io().assign("smoothing_time", "0 s").unwrap();
        vs.altitude().connect(&altitude.reader());
        vs.initialize().unwrap();

        // 10 ft per 100 ms is 6000 ft/min
        for i in 0..5 {
            let now = Time::new(i as f64 * 0.1);
            altitude.write(Quantity::new(1000.0 + 10.0 * i as f64));
            vs.process(&Cycle::new(now, now));
        }
        assert_relative_eq!(vs.vertical_speed().value().value(), 6000.0, epsilon = 1e-6);

        altitude.set_nil();
        vs.process(&Cycle::new(Time::new(0.5), Time::new(0.4)));
        assert!(vs.vertical_speed().is_nil());
    }

    #[test]
    fn test_smoothing_with_fast_ticks() {
        let clock = ManualClock::default();
        let mut altitude = PropertyOut::<Altitude>::new("/altitude", clock.shared());
        let mut vs = VerticalSpeed::new("vertical-speed", clock.shared());
        vs.io().assign("smoothing_time", "1 s").unwrap();
        vs.altitude().connect(&altitude.reader());
        vs.initialize().unwrap();

        // ticks every 10 ms, altitude every 100 ms: level for 0.3 s, then 6000 ft/min
        let mut outputs = Vec::new();
        let mut previous = Time::new(0.0);
        for tick in 0..150usize {
            let now = Time::new(tick as f64 * 0.01);
            if tick % 10 == 0 {
                let step = tick / 10;
                let climb = step.saturating_sub(3) as f64 * 10.0;
                altitude.write(Quantity::new(1000.0 + climb));
            }
            vs.process(&Cycle::new(now, previous));
            if tick % 10 == 0 {
                outputs.push(vs.vertical_speed().get());
            }
            previous = now;
        }

        assert_eq!(outputs[0], None);
        let rates: Vec<f64> = outputs[1..].iter().map(|r| r.unwrap().value()).collect();
        assert_relative_eq!(rates[0], 0.0);
        assert_relative_eq!(rates[2], 0.0);
        let first_climb = 6000.0 * (1.0 - (-0.1f64).exp());
        assert_relative_eq!(rates[3], first_climb, epsilon = 1e-6);
        for pair in rates[3..].windows(2) {
            assert!(pair[1] > pair[0], "{rates:?}");
        }
        assert!(*rates.last().unwrap() < 6000.0, "{rates:?}");
    }
}
