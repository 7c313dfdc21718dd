//! Nilable, time-stamped, versioned value cells.
//!
//! A property is written by exactly one module through its [`PropertyOut`] and
//! read by any number of modules through [`Property`] handles or connected
//! [`PropertyIn`] slots. Every write and every [`PropertyOut::set_nil`] bumps
//! the serial, so observers can tell "went stale" from "never touched".
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::ops::Deref;
use std::rc::Rc;

use tracing::warn;

use crate::time::{Clock, Time};
use crate::value::Value;
use crate::{Error, Result};

/// What a property currently holds.
#[derive(Clone, Debug, PartialEq)]
pub enum Sample<T> {
    NoValue,
    Value { value: T, stamp: Time },
}

impl<T> Sample<T> {
    pub fn is_nil(&self) -> bool {
        matches!(self, Sample::NoValue)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Sample::NoValue => None,
            Sample::Value { value, .. } => Some(value),
        }
    }

    pub fn stamp(&self) -> Option<Time> {
        match self {
            Sample::NoValue => None,
            Sample::Value { stamp, .. } => Some(*stamp),
        }
    }
}

struct PropertyCell<T> {
    path: String,
    clock: Clock,
    sample: RefCell<Sample<T>>,
    serial: Cell<u64>,
}

/// Read handle to a property. Cheap to clone.
pub struct Property<T: Value> {
    cell: Rc<PropertyCell<T>>,
}

impl<T: Value> Clone for Property<T> {
    fn clone(&self) -> Self {
        Property {
            cell: self.cell.clone(),
        }
    }
}

impl<T: Value> Property<T> {
    pub fn path(&self) -> &str {
        &self.cell.path
    }

    pub fn is_nil(&self) -> bool {
        self.cell.sample.borrow().is_nil()
    }

    pub fn is_valid(&self) -> bool {
        !self.is_nil()
    }

    pub fn get(&self) -> Option<T> {
        self.cell.sample.borrow().value().cloned()
    }

    /// The current value.
    ///
    /// # Panics
    ///
    /// Panics when the property is nil. Use [`Property::get`] or
    /// [`Property::try_value`] when nil is an expected state.
    pub fn value(&self) -> T {
        match self.get() {
            Some(value) => value,
            None => panic!("read of nil property {}", self.cell.path),
        }
    }

    pub fn try_value(&self) -> Result<T> {
        self.get().ok_or_else(|| Error::NilProperty {
            path: self.cell.path.clone(),
        })
    }

    pub fn value_or(&self, default: T) -> T {
        self.get().unwrap_or(default)
    }

    /// Number of writes and nil transitions so far.
    pub fn serial(&self) -> u64 {
        self.cell.serial.get()
    }

    pub fn stamp(&self) -> Option<Time> {
        self.cell.sample.borrow().stamp()
    }

    pub fn sample(&self) -> Sample<T> {
        self.cell.sample.borrow().clone()
    }

    /// Time since the last write; fails when nil.
    pub fn valid_age(&self) -> Result<Time> {
        let stamp = self.stamp().ok_or_else(|| Error::NilProperty {
            path: self.cell.path.clone(),
        })?;
        Ok(self.cell.clock.now() - stamp)
    }
}

impl<T: Value> std::fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Property")
            .field("path", &self.cell.path)
            .field("sample", &*self.cell.sample.borrow())
            .field("serial", &self.cell.serial.get())
            .finish()
    }
}

/// The owning side of a property. Not `Clone`: a property has one writer.
pub struct PropertyOut<T: Value> {
    property: Property<T>,
}

impl<T: Value> PropertyOut<T> {
    /// A nil property that stamps writes with `clock`.
    pub fn new(path: impl Into<String>, clock: Clock) -> Self {
        PropertyOut {
            property: Property {
                cell: Rc::new(PropertyCell {
                    path: path.into(),
                    clock,
                    sample: RefCell::new(Sample::NoValue),
                    serial: Cell::new(0),
                }),
            },
        }
    }

    pub fn write(&mut self, value: T) {
        let cell = &self.property.cell;
        let stamp = cell.clock.now();
        *cell.sample.borrow_mut() = Sample::Value { value, stamp };
        cell.serial.set(cell.serial.get() + 1);
    }

    /// Writes `Some`, nils on `None`.
    pub fn write_option(&mut self, value: Option<T>) {
        match value {
            Some(value) => self.write(value),
            None => self.set_nil(),
        }
    }

    pub fn set_nil(&mut self) {
        let cell = &self.property.cell;
        *cell.sample.borrow_mut() = Sample::NoValue;
        cell.serial.set(cell.serial.get() + 1);
    }

    /// Parses and writes `text`. On failure the property becomes nil.
    pub fn ingest_text(&mut self, text: &str) -> Result<()> {
        let parsed = T::from_text(text);
        self.ingest(parsed)
    }

    /// Decodes and writes `blob`. On failure the property becomes nil.
    pub fn ingest_blob(&mut self, blob: &[u8]) -> Result<()> {
        let parsed = T::from_blob(blob);
        self.ingest(parsed)
    }

    fn ingest(&mut self, parsed: Result<T>) -> Result<()> {
        match parsed {
            Ok(value) => {
                self.write(value);
                Ok(())
            }
            Err(err) => {
                warn!(path = %self.path(), %err, "discarding unparsable value");
                self.set_nil();
                Err(err)
            }
        }
    }

    pub fn reader(&self) -> Property<T> {
        self.property.clone()
    }
}

impl<T: Value> Deref for PropertyOut<T> {
    type Target = Property<T>;

    fn deref(&self) -> &Property<T> {
        &self.property
    }
}

impl<T: Value> std::fmt::Debug for PropertyOut<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&self.property, f)
    }
}

struct InputSlot<T: Value> {
    path: String,
    source: RefCell<Option<Property<T>>>,
}

/// An input slot connected to another module's output before the first tick.
/// Reads as nil while unconnected. Clones share the connection.
pub struct PropertyIn<T: Value> {
    slot: Rc<InputSlot<T>>,
}

impl<T: Value> Clone for PropertyIn<T> {
    fn clone(&self) -> Self {
        PropertyIn {
            slot: self.slot.clone(),
        }
    }
}

impl<T: Value> PropertyIn<T> {
    pub fn new(path: impl Into<String>) -> Self {
        PropertyIn {
            slot: Rc::new(InputSlot {
                path: path.into(),
                source: RefCell::new(None),
            }),
        }
    }

    pub fn path(&self) -> &str {
        &self.slot.path
    }

    pub fn connect(&self, source: &Property<T>) {
        *self.slot.source.borrow_mut() = Some(source.clone());
    }

    pub fn disconnect(&self) {
        *self.slot.source.borrow_mut() = None;
    }

    pub fn is_connected(&self) -> bool {
        self.slot.source.borrow().is_some()
    }

    pub fn source(&self) -> Option<Property<T>> {
        self.slot.source.borrow().clone()
    }

    pub fn get(&self) -> Option<T> {
        self.slot.source.borrow().as_ref().and_then(Property::get)
    }

    pub fn is_nil(&self) -> bool {
        self.get().is_none()
    }

    pub fn is_valid(&self) -> bool {
        !self.is_nil()
    }

    /// # Panics
    ///
    /// Panics when the input is nil or unconnected.
    pub fn value(&self) -> T {
        match self.get() {
            Some(value) => value,
            None => panic!("read of nil input {}", self.slot.path),
        }
    }

    pub fn try_value(&self) -> Result<T> {
        self.get().ok_or_else(|| Error::NilProperty {
            path: self.slot.path.clone(),
        })
    }

    pub fn value_or(&self, default: T) -> T {
        self.get().unwrap_or(default)
    }

    /// Serial of the connected source, 0 while unconnected.
    pub fn serial(&self) -> u64 {
        self.slot.source.borrow().as_ref().map_or(0, Property::serial)
    }

    pub fn stamp(&self) -> Option<Time> {
        self.slot.source.borrow().as_ref().and_then(Property::stamp)
    }

    pub fn valid_age(&self) -> Result<Time> {
        match &*self.slot.source.borrow() {
            Some(source) => source.valid_age(),
            None => Err(Error::NilProperty {
                path: self.slot.path.clone(),
            }),
        }
    }
}

/// Something whose changes an observer can track.
pub trait Observable {
    fn serial(&self) -> u64;
    fn path(&self) -> &str;
}

impl<T: Value> Observable for Property<T> {
    fn serial(&self) -> u64 {
        Property::serial(self)
    }

    fn path(&self) -> &str {
        Property::path(self)
    }
}

impl<T: Value> Observable for PropertyIn<T> {
    fn serial(&self) -> u64 {
        PropertyIn::serial(self)
    }

    fn path(&self) -> &str {
        PropertyIn::path(self)
    }
}

/// Type-erased view of an output, for registries and diagnostics.
pub trait BasicProperty {
    fn path(&self) -> &str;
    fn is_nil(&self) -> bool;
    fn serial(&self) -> u64;
    /// Text form of the current value, `None` when nil.
    fn to_text(&self) -> Option<String>;
    fn type_name(&self) -> &'static str;
    fn as_any(&self) -> &dyn Any;
}

impl<T: Value> BasicProperty for Property<T> {
    fn path(&self) -> &str {
        Property::path(self)
    }

    fn is_nil(&self) -> bool {
        Property::is_nil(self)
    }

    fn serial(&self) -> u64 {
        Property::serial(self)
    }

    fn to_text(&self) -> Option<String> {
        self.get().map(|v| v.to_text())
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Type-erased view of an input slot.
pub trait BasicPropertyIn {
    fn path(&self) -> &str;
    fn is_connected(&self) -> bool;
    fn type_name(&self) -> &'static str;
    fn to_text(&self) -> Option<String>;

    /// Connects to `output` if it carries the same value type.
    fn connect_dynamic(&self, output: &dyn BasicProperty) -> Result<()>;
}

impl<T: Value> BasicPropertyIn for PropertyIn<T> {
    fn path(&self) -> &str {
        PropertyIn::path(self)
    }

    fn is_connected(&self) -> bool {
        PropertyIn::is_connected(self)
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn to_text(&self) -> Option<String> {
        self.get().map(|v| v.to_text())
    }

    fn connect_dynamic(&self, output: &dyn BasicProperty) -> Result<()> {
        let source = output.as_any().downcast_ref::<Property<T>>().ok_or_else(|| {
            Error::PropertyTypeMismatch {
                input: self.slot.path.clone(),
                output: output.path().to_string(),
                expected: std::any::type_name::<T>(),
                found: output.type_name(),
            }
        })?;
        self.connect(source);
        Ok(())
    }
}

/// Tracks whether an observed property changed since the last check.
pub struct PropChanged<P: Observable> {
    property: P,
    last_serial: u64,
}

impl<P: Observable> PropChanged<P> {
    pub fn new(property: P) -> Self {
        PropChanged {
            property,
            last_serial: 0,
        }
    }

    /// True once per change of the property's serial.
    pub fn changed(&mut self) -> bool {
        let serial = self.property.serial();
        let changed = serial != self.last_serial;
        self.last_serial = serial;
        changed
    }

    pub fn property(&self) -> &P {
        &self.property
    }
}
