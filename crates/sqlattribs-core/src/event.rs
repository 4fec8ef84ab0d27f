//! Sink de eventos inyectable.
//!
//! El filtro no llama al logger global directamente: emite eventos a un
//! `EventSink` provisto por el host. `LogSink` es el default y delega en la
//! fachada `log`; `MemorySink` los retiene para tests.

use std::fmt;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventLevel {
    Debug,
    Info,
    Notice,
    Error,
}

impl fmt::Display for EventLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EventLevel::Debug => "debug",
            EventLevel::Info => "info",
            EventLevel::Notice => "notice",
            EventLevel::Error => "error",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub level: EventLevel,
    pub message: String,
}

/// Salida unidireccional de eventos. Nunca se lee de vuelta.
pub trait EventSink: Send + Sync {
    fn emit(&self, level: EventLevel, message: &str);

    fn debug(&self, message: &str) {
        self.emit(EventLevel::Debug, message);
    }

    fn info(&self, message: &str) {
        self.emit(EventLevel::Info, message);
    }

    fn notice(&self, message: &str) {
        self.emit(EventLevel::Notice, message);
    }

    fn error(&self, message: &str) {
        self.emit(EventLevel::Error, message);
    }
}

/// Delegación a `log` (target `sqlattribs`). `log` no tiene nivel notice:
/// se emite como info con prefijo.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&self, level: EventLevel, message: &str) {
        match level {
            EventLevel::Debug => log::debug!(target: "sqlattribs", "{message}"),
            EventLevel::Info => log::info!(target: "sqlattribs", "{message}"),
            EventLevel::Notice => log::info!(target: "sqlattribs", "notice: {message}"),
            EventLevel::Error => log::error!(target: "sqlattribs", "{message}"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _level: EventLevel, _message: &str) {}
}

/// Sink en memoria (tests y diagnósticos).
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<Event>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    pub fn count(&self, level: EventLevel) -> usize {
        self.events.lock()
            .unwrap_or_else(|p| p.into_inner())
            .iter()
            .filter(|e| e.level == level)
            .count()
    }

    pub fn messages(&self, level: EventLevel) -> Vec<String> {
        self.events.lock()
            .unwrap_or_else(|p| p.into_inner())
            .iter()
            .filter(|e| e.level == level)
            .map(|e| e.message.clone())
            .collect()
    }
}

impl EventSink for MemorySink {
    fn emit(&self, level: EventLevel, message: &str) {
        self.events.lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(Event { level,
                          message: message.to_owned() });
    }
}

impl<T: EventSink + ?Sized> EventSink for std::sync::Arc<T> {
    fn emit(&self, level: EventLevel, message: &str) {
        (**self).emit(level, message);
    }
}
