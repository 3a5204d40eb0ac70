//! Telemetry sinks.
//!
//! - [`TracingTelemetry`] forwards every entry as a `trace!` event.
//! - [`JsonTelemetry`] writes one JSON object per entry to any writer.
//! - [`MemoryTelemetry`] keeps the last value per key, for tests and the
//!   end-of-run summary.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io::Write;
use std::rc::Rc;

use frc_common::hal::driver::Telemetry;
use serde::Serialize;
use tracing::{trace, warn};

/// Publishes entries through `tracing` at TRACE level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingTelemetry;

impl Telemetry for TracingTelemetry {
    fn put_number(&mut self, key: &str, value: f64) {
        trace!(key, value, "telemetry");
    }

    fn put_number_array(&mut self, key: &str, values: &[f64]) {
        trace!(key, ?values, "telemetry");
    }
}

#[derive(Serialize)]
struct Entry<'a> {
    key: &'a str,
    values: &'a [f64],
}

/// JSON-lines sink: `{"key":"...","values":[...]}`.
///
/// Non-finite values serialise as `null`. Write failures are reported once
/// and further output is dropped.
pub struct JsonTelemetry<W: Write> {
    out: W,
    failed: bool,
}

impl<W: Write> JsonTelemetry<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            failed: false,
        }
    }

    pub fn has_failed(&self) -> bool {
        self.failed
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_entry(&mut self, key: &str, values: &[f64]) {
        if self.failed {
            return;
        }
        let entry = Entry { key, values };
        let result = serde_json::to_writer(&mut self.out, &entry)
            .map_err(std::io::Error::from)
            .and_then(|()| self.out.write_all(b"\n"));
        if let Err(e) = result {
            warn!(error = %e, "telemetry output failed; dropping further entries");
            self.failed = true;
        }
    }
}

impl<W: Write> Telemetry for JsonTelemetry<W> {
    fn put_number(&mut self, key: &str, value: f64) {
        self.write_entry(key, &[value]);
    }

    fn put_number_array(&mut self, key: &str, values: &[f64]) {
        self.write_entry(key, values);
    }
}

/// Last published value per key. Clones share the same table.
#[derive(Debug, Default, Clone)]
pub struct MemoryTelemetry {
    entries: Rc<RefCell<BTreeMap<String, Vec<f64>>>>,
    count: Rc<RefCell<u64>>,
}

impl MemoryTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last values published under `key`.
    pub fn get(&self, key: &str) -> Option<Vec<f64>> {
        self.entries.borrow().get(key).cloned()
    }

    /// First value published under `key`.
    pub fn number(&self, key: &str) -> Option<f64> {
        self.entries
            .borrow()
            .get(key)
            .and_then(|v| v.first().copied())
    }

    /// Total entries published since construction.
    pub fn count(&self) -> u64 {
        *self.count.borrow()
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries.borrow().keys().cloned().collect()
    }

    fn store(&mut self, key: &str, values: &[f64]) {
        let mut entries = self.entries.borrow_mut();
        match entries.get_mut(key) {
            Some(slot) => {
                slot.clear();
                slot.extend_from_slice(values);
            }
            None => {
                entries.insert(key.to_string(), values.to_vec());
            }
        }
        *self.count.borrow_mut() += 1;
    }
}

impl Telemetry for MemoryTelemetry {
    fn put_number(&mut self, key: &str, value: f64) {
        self.store(key, &[value]);
    }

    fn put_number_array(&mut self, key: &str, values: &[f64]) {
        self.store(key, values);
    }
}

/// Publishes every entry to both sinks.
pub struct Tee<A, B> {
    pub first: A,
    pub second: B,
}

impl<A: Telemetry, B: Telemetry> Telemetry for Tee<A, B> {
    fn put_number(&mut self, key: &str, value: f64) {
        self.first.put_number(key, value);
        self.second.put_number(key, value);
    }

    fn put_number_array(&mut self, key: &str, values: &[f64]) {
        self.first.put_number_array(key, values);
        self.second.put_number_array(key, values);
    }
}
