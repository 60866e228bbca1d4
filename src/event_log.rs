// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Append-only, timestamped event log.
//!
//! The event log is the user-facing record of what the panel did: polls that
//! failed, output changes, commands sent. It is separate from `tracing`
//! diagnostics and is only written when logging is enabled in the settings.
//!
//! # Examples
//!
//! ```
//! use tasmota_panel::event_log::{EventLog, MemoryLog};
//!
//! let buffer = MemoryLog::new();
//! let log = EventLog::to_writer(buffer.clone());
//! log.record("Sending command: On");
//!
//! assert_eq!(buffer.messages(), vec!["Sending command: On"]);
//!
//! // A disabled log accepts records and drops them.
//! EventLog::disabled().record("ignored");
//! ```

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Local};
use parking_lot::Mutex;

/// Timestamp layout of each log line.
const LINE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One entry of the event log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    timestamp: DateTime<Local>,
    message: String,
}

impl LogEvent {
    /// Creates an event stamped with the current local time.
    #[must_use]
    pub fn now(message: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            message: message.into(),
        }
    }

    /// Returns the timestamp.
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    /// Returns the message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for LogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}",
            self.timestamp.format(LINE_TIME_FORMAT),
            self.message
        )
    }
}

type Sink = Arc<Mutex<Box<dyn Write + Send>>>;

/// Handle to the event log.
///
/// Clones share the same sink. Each [`record`](Self::record) writes and
/// flushes one complete line while holding the sink's lock, so records from
/// the poller and the command worker never interleave.
#[derive(Clone)]
pub struct EventLog {
    sink: Option<Sink>,
}

impl EventLog {
    /// Creates a log that discards every record.
    #[must_use]
    pub fn disabled() -> Self {
        Self { sink: None }
    }

    /// Creates a log writing to an arbitrary sink.
    #[must_use]
    pub fn to_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            sink: Some(Arc::new(Mutex::new(Box::new(writer)))),
        }
    }

    /// Creates a new log file `log_YYYYmmdd_HHMMSS.txt` inside `dir`.
    ///
    /// The directory is created if needed, and the first line notes when
    /// logging started.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be created.
    pub fn create_in(dir: impl AsRef<Path>) -> io::Result<(Self, PathBuf)> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let now = Local::now();
        let path = dir.join(format!("log_{}.txt", now.format("%Y%m%d_%H%M%S")));
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        tracing::info!("Writing event log to {}", path.display());

        let log = Self::to_writer(file);
        log.record(format!("Logging started at {}", now.format(LINE_TIME_FORMAT)));
        Ok((log, path))
    }

    /// Returns `true` if records are being written.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    /// Appends a timestamped line. No-op when disabled.
    ///
    /// Write failures are reported through `tracing` and otherwise ignored;
    /// losing a log line never affects the panel.
    pub fn record(&self, message: impl Into<String>) {
        let Some(sink) = &self.sink else {
            return;
        };

        let event = LogEvent::now(message);
        tracing::debug!(target: "tasmota_panel::event_log", "{}", event.message());

        let mut writer = sink.lock();
        if let Err(e) = writeln!(writer, "{event}").and_then(|()| writer.flush()) {
            tracing::warn!("Failed to write event log: {e}");
        }
    }

    /// Records the closing line.
    ///
    /// The underlying sink is released once the last clone is dropped.
    pub fn close(&self) {
        if self.is_enabled() {
            self.record(format!(
                "Logging stopped at {}",
                Local::now().format(LINE_TIME_FORMAT)
            ));
        }
    }
}

impl fmt::Debug for EventLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventLog")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

/// In-memory sink for the event log.
///
/// Useful for embedding the panel where the log should be shown rather than
/// stored, and for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryLog {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl MemoryLog {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every complete line written so far, timestamps included.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.buffer.lock())
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Returns the message part of every line, without timestamps.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.lines()
            .into_iter()
            .map(|line| match line.split_once("] ") {
                Some((_, message)) => message.to_string(),
                None => line,
            })
            .collect()
    }

    /// Returns how many messages equal `message`.
    #[must_use]
    pub fn count(&self, message: &str) -> usize {
        self.messages().iter().filter(|m| *m == message).count()
    }
}

impl Write for MemoryLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use tempfile::TempDir;

    #[test]
    fn line_format() {
        let buffer = MemoryLog::new();
        let log = EventLog::to_writer(buffer.clone());
        log.record("Connection lost");

        let lines = buffer.lines();
        assert_eq!(lines.len(), 1);
        let line = &lines[0];
        // [YYYY-MM-DD HH:MM:SS] message
        assert_eq!(line.len(), 1 + 19 + 2 + "Connection lost".len());
        assert!(line.starts_with('['));
        assert_eq!(&line[20..22], "] ");
        assert!(line.ends_with("Connection lost"));
    }

    #[test]
    fn disabled_log_writes_nothing() {
        let log = EventLog::disabled();
        assert!(!log.is_enabled());
        log.record("dropped");
        log.close();
    }

    #[test]
    fn preserves_arrival_order_without_dedup() {
        let buffer = MemoryLog::new();
        let log = EventLog::to_writer(buffer.clone());
        log.record("a");
        log.record("b");
        log.record("a");
        assert_eq!(buffer.messages(), vec!["a", "b", "a"]);
    }

    #[test]
    fn concurrent_records_do_not_interleave() {
        let buffer = MemoryLog::new();
        let log = EventLog::to_writer(buffer.clone());

        let handles: Vec<_> = (0..4)
            .map(|worker| {
                let log = log.clone();
                thread::spawn(move || {
                    for i in 0..50 {
                        log.record(format!("worker {worker} line {i}"));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let messages = buffer.messages();
        assert_eq!(messages.len(), 200);
        assert!(messages.iter().all(|m| m.starts_with("worker ")));
    }

    #[test]
    fn file_log_has_start_and_stop_lines() {
        let dir = TempDir::new().unwrap();
        let (log, path) = EventLog::create_in(dir.path().join("logs")).unwrap();

        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("log_"));
        assert!(
            std::path::Path::new(&name)
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"))
        );

        log.record("Command On successful");
        log.close();

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("Logging started at "));
        assert!(lines[1].ends_with("Command On successful"));
        assert!(lines[2].contains("Logging stopped at "));
    }
}
