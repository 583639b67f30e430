use std::sync::RwLock;

use serde::Serialize;

use crate::logging::log_level::LogLevel;

const DEFAULT_PROCESS_NAME: &str = "keys-manager";

lazy_static! {
    static ref DEFAULT_LOG_SETTINGS: LogSettings =
        LogSettings::new(DEFAULT_PROCESS_NAME, LogLevelFilter::new(LogLevel::Info));
    static ref LOG_SETTINGS_PROVIDER: RwLock<&'static dyn LogSettingsProvider> =
        RwLock::new(&*DEFAULT_LOG_SETTINGS as &'static dyn LogSettingsProvider);
}

/// Source of the settings applied to every log message.
pub trait LogSettingsProvider: Send + Sync {
    fn get_process_id(&self) -> ProcessId;

    fn get_process_name(&self) -> ProcessName;

    fn get_log_level_filter(&self) -> LogLevelFilter;

    /// `true` if a message at `log_level` should be dropped.
    fn filter(&self, log_level: LogLevel) -> bool {
        log_level < self.get_log_level_filter().0
    }
}

/// Installs the settings used by all subsequent log calls in this process.
pub fn set_log_settings_provider(log_settings_provider: &'static dyn LogSettingsProvider) {
    let mut guard = match LOG_SETTINGS_PROVIDER.write() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    *guard = log_settings_provider;
}

pub fn get_log_settings_provider() -> &'static dyn LogSettingsProvider {
    match LOG_SETTINGS_PROVIDER.read() {
        Ok(guard) => *guard,
        Err(poisoned) => *poisoned.into_inner(),
    }
}

/// container for log settings of the host process
#[derive(Clone, Debug, PartialEq)]
pub struct LogSettings {
    pub process_id: ProcessId,
    pub process_name: ProcessName,
    pub log_level_filter: LogLevelFilter,
}

impl LogSettings {
    pub fn new(process_name: &str, log_level_filter: LogLevelFilter) -> LogSettings {
        LogSettings {
            process_id: ProcessId::new(std::process::id()),
            process_name: ProcessName::new(process_name.to_owned()),
            log_level_filter,
        }
    }
}

impl LogSettingsProvider for LogSettings {
    fn get_process_id(&self) -> ProcessId {
        self.process_id
    }

    fn get_process_name(&self) -> ProcessName {
        self.process_name.clone()
    }

    fn get_log_level_filter(&self) -> LogLevelFilter {
        self.log_level_filter
    }
}

/// newtype to encapsulate the least severe level which still gets logged
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LogLevelFilter(LogLevel);

impl LogLevelFilter {
    pub fn new(log_level: LogLevel) -> LogLevelFilter {
        LogLevelFilter(log_level)
    }
}

/// newtype to encapsulate process_id / PID
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ProcessId(u32);

impl ProcessId {
    pub fn new(pid: u32) -> ProcessId {
        ProcessId(pid)
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

/// newtype to encapsulate process_name
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProcessName(String);

impl ProcessName {
    pub fn new(process_name: String) -> ProcessName {
        ProcessName(process_name)
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}
