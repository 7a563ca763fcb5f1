//! Rolling Logger
//!
//! A `tracing` layer that formats events into single lines, echoes them to
//! the browser console (stderr off-wasm) and keeps the most recent lines in
//! a bounded circular buffer.

use std::collections::VecDeque;
use std::fmt::{self, Write as _};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

/// Default number of lines retained by [`init`].
pub const DEFAULT_CAPACITY: usize = 500;

/// Shared handle to the circular buffer of recent log lines
#[derive(Clone, Debug)]
pub struct LogBuffer {
    lines: Arc<Mutex<VecDeque<String>>>,
    capacity: usize,
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<String>> {
        // A panic while holding the lock cannot leave the deque half-written.
        self.lines.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Append a line, evicting the oldest once full
    pub fn push(&self, line: String) {
        if self.capacity == 0 {
            return;
        }
        let mut lines = self.lock();
        while lines.len() >= self.capacity {
            lines.pop_front();
        }
        lines.push_back(line);
    }

    /// Snapshot of retained lines, oldest first
    pub fn recent(&self) -> Vec<String> {
        self.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

/// Where formatted lines go besides the buffer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sink {
    /// Browser console on wasm32, stderr elsewhere
    Console,
    /// Buffer only
    Silent,
}

/// Layer that feeds a [`LogBuffer`]
pub struct RollingLayer {
    buffer: LogBuffer,
    max_level: Level,
    sink: Sink,
}

impl RollingLayer {
    pub fn new(buffer: LogBuffer, max_level: Level) -> Self {
        Self { buffer, max_level, sink: Sink::Console }
    }

    pub fn with_sink(mut self, sink: Sink) -> Self {
        self.sink = sink;
        self
    }
}

impl<S: Subscriber> Layer<S> for RollingLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        // More verbose levels compare greater.
        if *meta.level() > self.max_level {
            return;
        }

        let mut visitor = LineVisitor::default();
        event.record(&mut visitor);
        let line = format_line(
            &chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            meta.level(),
            meta.target(),
            &visitor.message,
            &visitor.fields,
        );

        if self.sink == Sink::Console {
            emit(meta.level(), &line);
        }
        self.buffer.push(line);
    }
}

fn format_line(timestamp: &str, level: &Level, target: &str, message: &str, fields: &str) -> String {
    format!("{timestamp} {level:>5} {target}: {message}{fields}")
}

#[derive(Default)]
struct LineVisitor {
    message: String,
    fields: String,
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn emit(level: &Level, line: &str) {
    let value = wasm_bindgen::JsValue::from_str(line);
    match *level {
        Level::ERROR => web_sys::console::error_1(&value),
        Level::WARN => web_sys::console::warn_1(&value),
        Level::INFO => web_sys::console::info_1(&value),
        _ => web_sys::console::debug_1(&value),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn emit(_level: &Level, line: &str) {
    eprintln!("{line}");
}

/// Install the layer as the global subscriber and return its buffer.
///
/// A second call leaves the first subscriber in place; the returned buffer
/// then stays empty.
pub fn init(capacity: usize, max_level: Level) -> LogBuffer {
    let buffer = LogBuffer::new(capacity);
    let subscriber = tracing_subscriber::registry().with(RollingLayer::new(buffer.clone(), max_level));
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        emit(&Level::WARN, "rolling-logger: global subscriber already set");
    }
    buffer
}
