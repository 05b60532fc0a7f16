use std::sync::atomic::{AtomicU8, Ordering};

use js_sys::Date;
use wasm_bindgen::JsValue;

use crate::domain::logging::{LogEntry, LogLevel, Logger, TimeProvider};

/// Writes log entries to the browser console, dropping entries below `min_level`.
pub struct ConsoleLogger {
    min_level: AtomicU8,
}

impl ConsoleLogger {
    pub fn new_development() -> Self {
        Self::with_min_level(LogLevel::Trace)
    }

    pub fn new_production() -> Self {
        Self::with_min_level(LogLevel::Warn)
    }

    pub fn with_min_level(min_level: LogLevel) -> Self {
        Self { min_level: AtomicU8::new(min_level as u8) }
    }

    pub fn min_level(&self) -> LogLevel {
        LogLevel::from_repr(self.min_level.load(Ordering::Relaxed)).unwrap_or(LogLevel::Trace)
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, entry: LogEntry) {
        if entry.level < self.min_level() {
            return;
        }
        let line = entry.render();
        match entry.level {
            LogLevel::Trace | LogLevel::Debug => gloo::console::debug!(line),
            LogLevel::Info => gloo::console::log!(line),
            LogLevel::Warn => gloo::console::warn!(line),
            LogLevel::Error => gloo::console::error!(line),
        }
    }

    fn set_min_level(&self, level: LogLevel) {
        self.min_level.store(level as u8, Ordering::Relaxed);
    }
}

/// Wall-clock milliseconds from `Date.now()`.
pub struct BrowserTimeProvider;

impl BrowserTimeProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BrowserTimeProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeProvider for BrowserTimeProvider {
    fn current_timestamp(&self) -> u64 {
        Date::now() as u64
    }

    /// `HH:MM:SS.mmm` in UTC.
    fn format_timestamp(&self, timestamp: u64) -> String {
        let date = Date::new(&JsValue::from_f64(timestamp as f64));
        format!(
            "{:02}:{:02}:{:02}.{:03}",
            date.get_utc_hours(),
            date.get_utc_minutes(),
            date.get_utc_seconds(),
            date.get_utc_milliseconds()
        )
    }
}
