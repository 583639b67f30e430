use std::{
    collections::BTreeMap,
    fmt,
    sync::atomic::{AtomicUsize, Ordering},
};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::logging::{
    log_level::{LogLevel, LogPriority},
    log_settings::{LogSettingsProvider, ProcessId, ProcessName},
};

static MESSAGE_SEQUENCE: AtomicUsize = AtomicUsize::new(0);

/// container for log message data
#[derive(Clone, Debug, Serialize)]
pub struct LogMessage {
    pub timestamp: TimestampRfc3999,
    pub process_id: ProcessId,
    pub process_name: ProcessName,
    pub log_level: LogLevel,
    pub priority: LogPriority,
    pub message_id: MessageId,
    pub message_template: String,
    pub description: String,
    pub properties: BTreeMap<String, String>,
}

impl LogMessage {
    pub fn new_msg(
        log_settings_provider: &dyn LogSettingsProvider,
        log_level: LogLevel,
        message: String,
    ) -> LogMessage {
        let mut properties = BTreeMap::new();
        properties.insert("message".to_string(), message);
        LogMessage::new_props(
            log_settings_provider,
            log_level,
            "{message}".to_string(),
            properties,
        )
    }

    pub fn new_props(
        log_settings_provider: &dyn LogSettingsProvider,
        log_level: LogLevel,
        message_template: String,
        properties: BTreeMap<String, String>,
    ) -> LogMessage {
        let description = render_template(&message_template, &properties);
        LogMessage {
            timestamp: TimestampRfc3999::default(),
            process_id: log_settings_provider.get_process_id(),
            process_name: log_settings_provider.get_process_name(),
            log_level,
            priority: log_level.get_priority(),
            message_id: MessageId::next(log_settings_provider.get_process_id()),
            message_template,
            description,
            properties,
        }
    }
}

/// Replaces every `{key}` in `template` which names a property with that property's value.
fn render_template(template: &str, properties: &BTreeMap<String, String>) -> String {
    properties
        .iter()
        .fold(template.to_owned(), |description, (key, value)| {
            description.replace(&format!("{{{}}}", key), value)
        })
}

/// newtype for Rfc3999 formatted timestamp
#[derive(Clone, Debug, Serialize)]
pub struct TimestampRfc3999(String);

impl Default for TimestampRfc3999 {
    fn default() -> Self {
        let now: DateTime<Utc> = Utc::now();
        TimestampRfc3999(now.to_rfc3339())
    }
}

impl fmt::Display for TimestampRfc3999 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier unique to one message within the emitting process.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct MessageId(String);

impl MessageId {
    fn next(process_id: ProcessId) -> MessageId {
        let sequence = MESSAGE_SEQUENCE.fetch_add(1, Ordering::SeqCst);
        MessageId(format!("{}-{}", process_id.value(), sequence))
    }

    pub fn value(&self) -> String {
        self.0.clone()
    }
}
