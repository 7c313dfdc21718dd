//! A reference scheduler: runs modules in a fixed order once per tick.
//!
//! The order is the order of [`ProcessingLoop::add_module`] calls. No
//! dependency order is inferred; a consumer added before its producer sees the
//! producer's output one tick late.
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::cycle::Cycle;
use crate::module::Module;
use crate::time::{ManualClock, Time, TimeSource};
use crate::{Error, Result};

/// A configuration value as found in a settings file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl SettingValue {
    pub fn to_text(&self) -> String {
        match self {
            SettingValue::Bool(b) => b.to_string(),
            SettingValue::Integer(i) => i.to_string(),
            SettingValue::Float(f) => f.to_string(),
            SettingValue::Text(t) => t.clone(),
        }
    }
}

/// Setting values keyed by module name, then setting name.
///
/// ```toml
/// [vertical-speed]
/// smoothing_time = "2 s"
///
/// [mixer]
/// input_a_factor = 0.5
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingsTable(pub BTreeMap<String, BTreeMap<String, SettingValue>>);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopState {
    Configuring,
    Running,
}

pub struct ProcessingLoop {
    clock: ManualClock,
    modules: Vec<Box<dyn Module>>,
    previous_time: Option<Time>,
    state: LoopState,
    ticks: u64,
}

impl ProcessingLoop {
    /// A loop that advances `clock` to each tick's time before processing.
    pub fn new(clock: ManualClock) -> Self {
        ProcessingLoop {
            clock,
            modules: Vec::new(),
            previous_time: None,
            state: LoopState::Configuring,
            ticks: 0,
        }
    }

    pub fn clock(&self) -> &ManualClock {
        &self.clock
    }

    /// Appends a module to the processing order.
    pub fn add_module(&mut self, module: impl Module + 'static) -> &mut Self {
        self.modules.push(Box::new(module));
        self
    }

    pub fn modules(&self) -> impl Iterator<Item = &dyn Module> {
        self.modules.iter().map(|m| m.as_ref())
    }

    pub fn module(&self, name: &str) -> Result<&dyn Module> {
        self.modules()
            .find(|m| m.io().name() == name)
            .ok_or_else(|| Error::UnknownModule(name.to_string()))
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Wires `consumer`'s input to `producer`'s output.
    pub fn connect(&self, consumer: &str, input: &str, producer: &str, output: &str) -> Result<()> {
        let source = self.module(producer)?;
        let source = source
            .io()
            .output(output)
            .ok_or_else(|| Error::UnknownProperty {
                module: producer.to_string(),
                path: output.to_string(),
            })?;
        let sink = self.module(consumer)?;
        let sink = sink.io().input(input).ok_or_else(|| Error::UnknownProperty {
            module: consumer.to_string(),
            path: input.to_string(),
        })?;
        sink.connect_dynamic(source)
    }

    pub fn configure(&self, module: &str, setting: &str, text: &str) -> Result<()> {
        self.module(module)?.io().assign(setting, text)
    }

    /// Assigns every value of `table`, stopping at the first failure.
    pub fn apply(&self, table: &SettingsTable) -> Result<()> {
        for (module, settings) in &table.0 {
            for (setting, value) in settings {
                self.configure(module, setting, &value.to_text())?;
            }
        }
        Ok(())
    }

    /// Verifies the settings of every module, then initializes them in order.
    ///
    /// All uninitialized settings across all modules are reported together.
    /// Starting an already started loop does nothing.
    pub fn start(&mut self) -> Result<()> {
        if self.state == LoopState::Running {
            return Ok(());
        }
        let names: Vec<String> = self
            .modules()
            .flat_map(|m| m.io().uninitialized_settings())
            .collect();
        if !names.is_empty() {
            error!(settings = ?names, "refusing to start with uninitialized settings");
            return Err(Error::UninitializedSettings { names });
        }
        for module in &mut self.modules {
            module.io_mut().verify_settings()?;
        }
        for module in &mut self.modules {
            module.initialize()?;
        }
        self.state = LoopState::Running;
        info!(modules = self.modules.len(), "processing loop started");
        Ok(())
    }

    pub fn is_started(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Processes every module once at `now`.
    pub fn tick(&mut self, now: Time) -> Result<Cycle> {
        if self.state != LoopState::Running {
            return Err(Error::NotStarted);
        }
        self.clock.set(now);
        let cycle = Cycle::new(now, self.previous_time.unwrap_or(now));
        for module in &mut self.modules {
            module.process(&cycle);
        }
        self.previous_time = Some(now);
        self.ticks += 1;
        Ok(cycle)
    }

    /// Runs `ticks` ticks of simulated time, `period` apart.
    pub fn run(&mut self, period: Time, ticks: u64) -> Result<()> {
        for _ in 0..ticks {
            let now = match self.previous_time {
                Some(previous) => previous + period,
                None => self.clock.now(),
            };
            self.tick(now)?;
        }
        Ok(())
    }

    /// Ticks at wall-clock pace, sleeping out the rest of each period.
    /// Runs forever when `ticks` is `None`.
    pub fn run_realtime(&mut self, period: Duration, ticks: Option<u64>) -> Result<()> {
        let epoch = self.clock.now();
        let start = Instant::now();
        let mut deadline = start + period;
        let mut count = 0;
        while ticks.is_none_or(|t| count < t) {
            let tick_start = Instant::now();
            self.tick(epoch + Time::new(start.elapsed().as_secs_f64()))?;
            count += 1;
            let now = Instant::now();
            if deadline > now {
                std::thread::sleep(deadline - now);
            } else {
                warn!(elapsed = ?tick_start.elapsed(), ?period, "tick took longer than its period");
            }
            deadline += period;
        }
        Ok(())
    }
}
