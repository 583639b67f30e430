use std::{
    collections::BTreeMap,
    sync::{Mutex, MutexGuard, Once},
};

use log::{Metadata, Record};
use serde::Deserialize;

/// Only records emitted by this module tree are handled by the loggers below.
const LOGGING_TARGET: &str = "engine_shared::logging";

const PAYLOAD_KEY: &str = "payload=";

static LOGGER_INIT: Once = Once::new();

static TERMINAL_LOGGER: TerminalLogger = TerminalLogger;

lazy_static! {
    pub static ref BUFFERED_LOGGER: BufferedLogger = BufferedLogger::new();
}

/// Installs the stdout logger unless a logger was already installed for this process.
pub fn initialize_terminal_logger() {
    LOGGER_INIT.call_once(|| {
        if log::set_logger(&TERMINAL_LOGGER).is_ok() {
            log::set_max_level(log::LevelFilter::Trace);
        }
    });
}

/// Installs [`BUFFERED_LOGGER`] so emitted messages can be inspected. Must run before the first
/// log call to take effect.
pub fn initialize_buffered_logger() {
    LOGGER_INIT.call_once(|| {
        if log::set_logger(&*BUFFERED_LOGGER).is_ok() {
            log::set_max_level(log::LevelFilter::Trace);
        }
    });
}

fn is_logging_target(metadata: &Metadata) -> bool {
    metadata.target().starts_with(LOGGING_TARGET) && metadata.level() <= log::Level::Trace
}

struct TerminalLogger;

impl log::Log for TerminalLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        is_logging_target(metadata)
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            println!("{}", record.args());
        }
    }

    fn flush(&self) {}
}

/// The machine readable part of a logged line.
#[derive(Clone, Debug, Deserialize)]
pub struct LogLineItem {
    pub message_id: String,
    pub log_level: String,
    pub description: String,
    pub properties: BTreeMap<String, String>,
}

impl LogLineItem {
    fn from_line(line: &str) -> Option<LogLineItem> {
        let start = line.find(PAYLOAD_KEY)? + PAYLOAD_KEY.len();
        serde_json::from_str(&line[start..]).ok()
    }
}

/// Logger keeping every structured line in memory until it is extracted.
pub struct BufferedLogger {
    buffer: Mutex<BTreeMap<String, LogLineItem>>,
}

impl BufferedLogger {
    fn new() -> BufferedLogger {
        BufferedLogger {
            buffer: Mutex::new(BTreeMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<BTreeMap<String, LogLineItem>> {
        match self.buffer.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Removes and returns the line logged under `message_id`.
    pub fn extract(&self, message_id: &str) -> Option<LogLineItem> {
        self.lock().remove(message_id)
    }

    /// Removes and returns every line whose property `key` equals `value`.
    pub fn extract_by_property(&self, key: &str, value: &str) -> Option<Vec<LogLineItem>> {
        let mut buffer = self.lock();
        let matching: Vec<String> = buffer
            .iter()
            .filter(|(_, item)| item.properties.get(key).map(String::as_str) == Some(value))
            .map(|(message_id, _)| message_id.clone())
            .collect();
        if matching.is_empty() {
            return None;
        }
        Some(
            matching
                .iter()
                .filter_map(|message_id| buffer.remove(message_id))
                .collect(),
        )
    }
}

impl log::Log for BufferedLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        is_logging_target(metadata)
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Some(item) = LogLineItem::from_line(&record.args().to_string()) {
            self.lock().insert(item.message_id.clone(), item);
        }
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_payload_of_rendered_line() {
        let line = "2020-01-01T00:00:00+00:00 INFO 5 keys-manager payload=\
                    {\"message_id\":\"1-0\",\"log_level\":\"Info\",\"description\":\"d\",\
                    \"properties\":{\"action\":\"set_all\"}}";
        let item = LogLineItem::from_line(line).expect("should parse payload");
        assert_eq!(item.message_id, "1-0");
        assert_eq!(item.log_level, "Info");
        assert_eq!(item.properties["action"], "set_all");
    }

    #[test]
    fn should_ignore_line_without_payload() {
        assert!(LogLineItem::from_line("plain text").is_none());
    }
}
