//! Raw traffic observation
//!
//! Transports hand every outgoing command and incoming response body to a
//! [`TrafficSink`]. Nothing depends on the sink for correctness; the default
//! discards everything. Transports must redact credentials before calling
//! [`TrafficSink::observe`].

use std::fmt;
use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};

/// Direction of an observed message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Sent to the provider
    Outgoing,
    /// Received from the provider
    Incoming,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Outgoing => f.write_str(">>"),
            Direction::Incoming => f.write_str("<<"),
        }
    }
}

/// Observer of raw remote traffic
pub trait TrafficSink: Send + Sync {
    /// Observe one message
    fn observe(&self, direction: Direction, payload: &str);
}

/// Sink that drops everything
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardSink;

impl TrafficSink for DiscardSink {
    fn observe(&self, _direction: Direction, _payload: &str) {}
}

/// Sink that forwards traffic to `tracing` at TRACE level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TrafficSink for TracingSink {
    fn observe(&self, direction: Direction, payload: &str) {
        tracing::trace!(target: "zonesync::traffic", "{} {}", direction, payload);
    }
}

/// Sink that writes traffic to any `Write` (stdout, stderr, a buffer)
pub struct WriterSink<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> WriterSink<W> {
    /// Wrap a writer
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Take the writer back
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send> TrafficSink for WriterSink<W> {
    fn observe(&self, direction: Direction, payload: &str) {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        // debug output only; a broken pipe must not fail the operation
        let _ = writeln!(writer, "{direction} {payload}");
        let _ = writer.flush();
    }
}

/// Where to send raw traffic, as named in configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DebugTarget {
    /// Drop traffic
    #[default]
    Off,
    /// Write to standard output
    Stdout,
    /// Write to standard error
    Stderr,
    /// Emit as `tracing` events
    Trace,
}

impl DebugTarget {
    /// Parse a configuration value
    ///
    /// `stdout`, `yes`, `true` and `1` select stdout; `stderr` and `trace`
    /// select themselves; anything else turns the sink off.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "stdout" | "yes" | "true" | "1" => DebugTarget::Stdout,
            "stderr" => DebugTarget::Stderr,
            "trace" => DebugTarget::Trace,
            _ => DebugTarget::Off,
        }
    }

    /// Build the matching sink
    pub fn sink(self) -> Arc<dyn TrafficSink> {
        match self {
            DebugTarget::Off => Arc::new(DiscardSink),
            DebugTarget::Stdout => Arc::new(WriterSink::new(std::io::stdout())),
            DebugTarget::Stderr => Arc::new(WriterSink::new(std::io::stderr())),
            DebugTarget::Trace => Arc::new(TracingSink),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_target_parse() {
        assert_eq!(DebugTarget::parse("stdout"), DebugTarget::Stdout);
        assert_eq!(DebugTarget::parse("YES"), DebugTarget::Stdout);
        assert_eq!(DebugTarget::parse("1"), DebugTarget::Stdout);
        assert_eq!(DebugTarget::parse("stderr"), DebugTarget::Stderr);
        assert_eq!(DebugTarget::parse("trace"), DebugTarget::Trace);
        assert_eq!(DebugTarget::parse(""), DebugTarget::Off);
        assert_eq!(DebugTarget::parse("no"), DebugTarget::Off);
    }

    #[test]
    fn test_writer_sink_records_direction() {
        let sink = WriterSink::new(Vec::new());
        sink.observe(Direction::Outgoing, "COMMAND = StartSession");
        sink.observe(Direction::Incoming, "code = 200");

        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(out, ">> COMMAND = StartSession\n<< code = 200\n");
    }
}
