//! Log levels are [ fatal | error | warning | info | debug ].
//!
//! Internally the syslog priorities are kept, with the following mapping:
//! fatal: 0, error: 3, warning: 4, info: 5, debug: 7.
use std::{
    cmp::{Ord, Ordering},
    fmt,
};

use serde::{Deserialize, Serialize};

#[repr(u8)]
#[derive(Copy, Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum LogLevel {
    /// emergency, alert, critical
    Fatal = 0,
    /// error
    Error = 3,
    /// warnings
    Warning = 4,
    /// notice, informational
    Info = 5,
    /// debug, dev oriented messages
    Debug = 7,
}

impl LogLevel {
    pub fn get_priority(self) -> LogPriority {
        LogPriority::new(self)
    }

    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn to_uppercase(self) -> String {
        format!("{:?}", self).to_uppercase()
    }
}

impl Ord for LogLevel {
    /// invert numeric ordering to match semantic ordering
    fn cmp(&self, other: &Self) -> Ordering {
        // semantic ordering is reversed; Fatal is most severe, Debug is least
        other.value().cmp(&self.value())
    }
}

impl PartialOrd for LogLevel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl Into<log::Level> for LogLevel {
    fn into(self) -> log::Level {
        match self {
            LogLevel::Fatal => log::Level::Error,
            LogLevel::Error => log::Level::Error,
            LogLevel::Warning => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
        }
    }
}

/// newtype to encapsulate log level priority
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Serialize)]
pub struct LogPriority(u8);

impl LogPriority {
    pub fn new(log_level: LogLevel) -> LogPriority {
        LogPriority(log_level.value())
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for LogPriority {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
