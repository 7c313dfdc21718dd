//! Per-module registry of settings, inputs and outputs.
use tracing::{debug, error};

use crate::property::{BasicProperty, BasicPropertyIn, PropertyIn, PropertyOut};
use crate::setting::{BasicSetting, Setting};
use crate::time::Clock;
use crate::value::Value;
use crate::{Error, Result};

/// Collects a module's settings and properties while the module is built.
///
/// Each declaration returns the typed handle the module keeps, and records a
/// type-erased view for [`ModuleIo`].
pub struct ModuleIoBuilder {
    name: String,
    clock: Clock,
    settings: Vec<Box<dyn BasicSetting>>,
    inputs: Vec<Box<dyn BasicPropertyIn>>,
    outputs: Vec<Box<dyn BasicProperty>>,
}

impl ModuleIoBuilder {
    pub fn new(name: impl Into<String>, clock: Clock) -> Self {
        ModuleIoBuilder {
            name: name.into(),
            clock,
            settings: Vec::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    pub fn clock(&self) -> Clock {
        self.clock.clone()
    }

    /// A required setting without default.
    pub fn setting<T: Value>(&mut self, name: &str) -> Setting<T> {
        self.register(Setting::required(name))
    }

    pub fn setting_with_default<T: Value>(&mut self, name: &str, default: T) -> Setting<T> {
        self.register(Setting::with_default(name, default))
    }

    pub fn optional_setting<T: Value>(&mut self, name: &str) -> Setting<T> {
        self.register(Setting::optional(name))
    }

    fn register<T: Value>(&mut self, setting: Setting<T>) -> Setting<T> {
        self.settings.push(Box::new(setting.clone()));
        setting
    }

    pub fn input<T: Value>(&mut self, path: &str) -> PropertyIn<T> {
        let input = PropertyIn::new(path);
        self.inputs.push(Box::new(input.clone()));
        input
    }

    pub fn output<T: Value>(&mut self, path: &str) -> PropertyOut<T> {
        let output = PropertyOut::new(path, self.clock.clone());
        self.outputs.push(Box::new(output.reader()));
        output
    }

    pub fn build(self) -> ModuleIo {
        ModuleIo {
            name: self.name,
            clock: self.clock,
            settings: self.settings,
            inputs: self.inputs,
            outputs: self.outputs,
            verification: Verification::Unverified,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verification {
    Unverified,
    Verified,
}

/// The finished registry of a module.
pub struct ModuleIo {
    name: String,
    clock: Clock,
    settings: Vec<Box<dyn BasicSetting>>,
    inputs: Vec<Box<dyn BasicPropertyIn>>,
    outputs: Vec<Box<dyn BasicProperty>>,
    verification: Verification,
}

impl ModuleIo {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn clock(&self) -> Clock {
        self.clock.clone()
    }

    pub fn settings(&self) -> impl Iterator<Item = &dyn BasicSetting> {
        self.settings.iter().map(|s| s.as_ref())
    }

    pub fn inputs(&self) -> impl Iterator<Item = &dyn BasicPropertyIn> {
        self.inputs.iter().map(|i| i.as_ref())
    }

    pub fn outputs(&self) -> impl Iterator<Item = &dyn BasicProperty> {
        self.outputs.iter().map(|o| o.as_ref())
    }

    pub fn setting(&self, name: &str) -> Option<&dyn BasicSetting> {
        self.settings().find(|s| s.name() == name)
    }

    pub fn input(&self, path: &str) -> Option<&dyn BasicPropertyIn> {
        self.inputs().find(|i| i.path() == path)
    }

    pub fn output(&self, path: &str) -> Option<&dyn BasicProperty> {
        self.outputs().find(|o| o.path() == path)
    }

    /// Assigns a setting from its text form.
    pub fn assign(&self, setting: &str, text: &str) -> Result<()> {
        let target = self.setting(setting).ok_or_else(|| Error::UnknownSetting {
            module: self.name.clone(),
            setting: setting.to_string(),
        })?;
        target.assign_text(text)?;
        debug!(module = %self.name, setting, value = text, "setting assigned");
        Ok(())
    }

    /// Required settings still unset, as `module/setting`.
    pub fn uninitialized_settings(&self) -> Vec<String> {
        self.settings()
            .filter(|s| s.is_required() && !s.is_set())
            .map(|s| format!("{}/{}", self.name, s.name()))
            .collect()
    }

    /// Checks every required setting once, before the first tick.
    ///
    /// Fails with [`Error::UninitializedSettings`] naming all offenders. After
    /// a successful check the module is verified and later calls do nothing.
    pub fn verify_settings(&mut self) -> Result<()> {
        if self.verification == Verification::Verified {
            return Ok(());
        }
        let names = self.uninitialized_settings();
        if !names.is_empty() {
            error!(module = %self.name, settings = ?names, "uninitialized settings");
            return Err(Error::UninitializedSettings { names });
        }
        self.verification = Verification::Verified;
        debug!(module = %self.name, "settings verified");
        Ok(())
    }

    pub fn is_verified(&self) -> bool {
        self.verification == Verification::Verified
    }
}

impl std::fmt::Debug for ModuleIo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleIo")
            .field("name", &self.name)
            .field("settings", &self.settings().map(|s| s.name()).collect::<Vec<_>>())
            .field("inputs", &self.inputs().map(|i| i.path()).collect::<Vec<_>>())
            .field("outputs", &self.outputs().map(|o| o.path()).collect::<Vec<_>>())
            .field("verification", &self.verification)
            .finish()
    }
}
