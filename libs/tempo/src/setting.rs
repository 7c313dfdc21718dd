//! Configuration cells owned by a module.
use std::cell::RefCell;
use std::rc::Rc;

use crate::value::Value;
use crate::{Error, Result};

struct SettingCell<T> {
    name: String,
    value: RefCell<Option<T>>,
    required: bool,
}

/// A module setting. Clones share the same cell, so the module keeps one
/// handle and its [`ModuleIo`](crate::ModuleIo) registry keeps another.
///
/// Once assigned, a setting keeps its value until reassigned; it never goes
/// back to unset.
pub struct Setting<T: Value> {
    cell: Rc<SettingCell<T>>,
}

impl<T: Value> Clone for Setting<T> {
    fn clone(&self) -> Self {
        Setting {
            cell: self.cell.clone(),
        }
    }
}

impl<T: Value> Setting<T> {
    /// Required, with no value until assigned.
    pub fn required(name: impl Into<String>) -> Self {
        Self::with(name, None, true)
    }

    /// Required, pre-filled with `default`.
    pub fn with_default(name: impl Into<String>, default: T) -> Self {
        Self::with(name, Some(default), true)
    }

    /// Never mandatory.
    pub fn optional(name: impl Into<String>) -> Self {
        Self::with(name, None, false)
    }

    fn with(name: impl Into<String>, value: Option<T>, required: bool) -> Self {
        Setting {
            cell: Rc::new(SettingCell {
                name: name.into(),
                value: RefCell::new(value),
                required,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.cell.name
    }

    pub fn set(&self, value: T) {
        *self.cell.value.borrow_mut() = Some(value);
    }

    pub fn is_set(&self) -> bool {
        self.cell.value.borrow().is_some()
    }

    pub fn is_required(&self) -> bool {
        self.cell.required
    }

    /// The assigned value, or [`Error::Uninitialized`].
    pub fn get(&self) -> Result<T> {
        self.cell
            .value
            .borrow()
            .clone()
            .ok_or_else(|| Error::Uninitialized {
                setting: self.cell.name.clone(),
            })
    }

    /// The assigned value, `None` while unset. Meant for optional settings.
    pub fn get_optional(&self) -> Option<T> {
        self.cell.value.borrow().clone()
    }

    pub fn value_or(&self, default: T) -> T {
        self.get_optional().unwrap_or(default)
    }
}

impl<T: Value> std::fmt::Debug for Setting<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Setting")
            .field("name", &self.cell.name)
            .field("value", &*self.cell.value.borrow())
            .field("required", &self.cell.required)
            .finish()
    }
}

/// Type-erased view of a setting, for configuration loading and diagnostics.
pub trait BasicSetting {
    fn name(&self) -> &str;
    fn is_set(&self) -> bool;
    fn is_required(&self) -> bool;
    /// Parses and assigns `text`; leaves the setting untouched on error.
    fn assign_text(&self, text: &str) -> Result<()>;
    fn to_text(&self) -> Option<String>;
}

impl<T: Value> BasicSetting for Setting<T> {
    fn name(&self) -> &str {
        Setting::name(self)
    }

    fn is_set(&self) -> bool {
        Setting::is_set(self)
    }

    fn is_required(&self) -> bool {
        Setting::is_required(self)
    }

    fn assign_text(&self, text: &str) -> Result<()> {
        self.set(T::from_text(text)?);
        Ok(())
    }

    fn to_text(&self) -> Option<String> {
        self.get_optional().map(|v| v.to_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metron::Quantity;
    use metron::units::{Knot, MeterPerSecond};

    #[test]
    fn test_required_lifecycle() {
        let setting = Setting::<f64>::required("gain");
        assert!(!setting.is_set());
        assert_eq!(
            setting.get(),
            Err(Error::Uninitialized {
                setting: "gain".to_string()
            })
        );
        setting.set(2.0);
        assert_eq!(setting.get(), Ok(2.0));
        assert_eq!(setting.get(), Ok(2.0));
        setting.set(3.0);
        assert_eq!(setting.get(), Ok(3.0));
    }

    #[test]
    fn test_shapes() {
        let default = Setting::with_default("factor", 1.0f64);
        assert!(default.is_required() && default.is_set());
        let optional = Setting::<f64>::optional("limit");
        assert!(!optional.is_required() && !optional.is_set());
        assert_eq!(optional.value_or(5.0), 5.0);
    }

    #[test]
    fn test_assign_text() {
        let setting = Setting::<Quantity<MeterPerSecond>>::required("v_ref");
        let erased: &dyn BasicSetting = &setting;
        erased.assign_text("120 kt").unwrap();
        approx::assert_relative_eq!(setting.get().unwrap().value(), 61.733, epsilon = 1e-3);
        assert_eq!(setting.get().unwrap().to::<Knot>().to_string(), "120 kt");
        assert!(erased.assign_text("fast").is_err());
        assert!(setting.is_set());
        assert_eq!(erased.to_text().as_deref(), Some("61.7333333333 m/s"));
    }
}
