use tempo::metron::Quantity;
use tempo::metron::units::{Foot, Knot};
use tempo::{Clock, Cycle, Module, ModuleIo, ModuleIoBuilder, PropertyOut, Setting};

#[allow(dead_code)]
pub fn trace_init() {
    use tracing_subscriber::filter::LevelFilter;
    let collector = tracing_subscriber::fmt()
        .with_max_level(LevelFilter::TRACE)
        .with_test_writer()
        .without_time()
        .finish();
    let _ = tracing::subscriber::set_global_default(collector);
}

/// Writes a scripted altitude, one sample per tick.
#[allow(dead_code)]
pub struct AltitudeSource {
    io: ModuleIo,
    altitude: PropertyOut<Quantity<Foot>>,
    script: Vec<Option<f64>>,
    step: usize,
}

#[allow(dead_code)]
impl AltitudeSource {
    pub fn new(instance: &str, clock: Clock, script: Vec<Option<f64>>) -> Self {
        let mut io = ModuleIoBuilder::new(instance, clock);
        let altitude = io.output("/altitude");
        AltitudeSource {
            io: io.build(),
            altitude,
            script,
            step: 0,
        }
    }
}

impl Module for AltitudeSource {
    fn io(&self) -> &ModuleIo {
        &self.io
    }

    fn io_mut(&mut self) -> &mut ModuleIo {
        &mut self.io
    }

    fn process(&mut self, _cycle: &Cycle) {
        if let Some(sample) = self.script.get(self.step) {
            self.altitude.write_option(sample.map(Quantity::new));
        }
        self.step += 1;
    }
}

/// A module with required settings and nothing else.
#[allow(dead_code)]
pub struct Autopilot {
    io: ModuleIo,
    pub gain_p: Setting<f64>,
    pub gain_i: Setting<f64>,
    pub v_ref: Setting<Quantity<Knot>>,
    pub initialized: bool,
}

#[allow(dead_code)]
impl Autopilot {
    pub fn new(instance: &str, clock: Clock) -> Self {
        let mut io = ModuleIoBuilder::new(instance, clock);
        let gain_p = io.setting("gain_p");
        let gain_i = io.setting("gain_i");
        let v_ref = io.setting_with_default("v_ref", Quantity::new(100.0));
        Autopilot {
            io: io.build(),
            gain_p,
            gain_i,
            v_ref,
            initialized: false,
        }
    }
}

impl Module for Autopilot {
    fn io(&self) -> &ModuleIo {
        &self.io
    }

    fn io_mut(&mut self) -> &mut ModuleIo {
        &mut self.io
    }

    fn initialize(&mut self) -> tempo::Result<()> {
        self.initialized = true;
        Ok(())
    }

    fn process(&mut self, _cycle: &Cycle) {}
}
