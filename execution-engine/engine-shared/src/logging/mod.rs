use std::collections::BTreeMap;

use crate::{
    logging::{
        log_level::LogLevel,
        log_message::{LogMessage, MessageId},
        logger::initialize_terminal_logger,
    },
    utils::jsonify,
};

pub mod log_level;
pub mod log_message;
pub mod log_settings;
pub mod logger;


/// # Arguments
///
/// * `log_level` - log level of the message to be logged
/// * `log_message` - the message to be logged
#[inline]
pub fn log(log_level: LogLevel, log_message: &str) -> Option<MessageId> {
    initialize_terminal_logger();
    let log_settings_provider = log_settings::get_log_settings_provider();

    if log_settings_provider.filter(log_level) {
        return None;
    }

    let log_message = LogMessage::new_msg(log_settings_provider, log_level, log_message.to_owned());

    Some(emit(log_message))
}

/// # Arguments
///
/// * `log_level` - log level of the message to be logged
/// * `message_format` - a message template to apply over properties by key
/// * `properties` - a collection of machine readable key / value properties which will be logged
#[inline]
pub fn log_details(
    log_level: LogLevel,
    message_format: String,
    properties: BTreeMap<String, String>,
) -> Option<MessageId> {
    initialize_terminal_logger();
    let log_settings_provider = log_settings::get_log_settings_provider();

    if log_settings_provider.filter(log_level) {
        return None;
    }

    let log_message =
        LogMessage::new_props(log_settings_provider, log_level, message_format, properties);

    Some(emit(log_message))
}

fn emit(log_message: LogMessage) -> MessageId {
    let json = jsonify(&log_message, false);
    let level: log::Level = log_message.log_level.into();

    log::log!(
        level,
        "{timestamp} {loglevel} {priority} {facility} payload={payload}",
        timestamp = log_message.timestamp,
        loglevel = log_message.log_level.to_uppercase(),
        priority = log_message.priority.value(),
        facility = log_message.process_name.value(),
        payload = json
    );

    log_message.message_id
}

/// # Arguments
///
/// * `log_message` - the message to be logged
#[inline]
pub fn log_fatal(log_message: &str) -> Option<MessageId> {
    log(LogLevel::Fatal, log_message)
}

/// # Arguments
///
/// * `log_message` - the message to be logged
#[inline]
pub fn log_error(log_message: &str) -> Option<MessageId> {
    log(LogLevel::Error, log_message)
}

/// # Arguments
///
/// * `log_message` - the message to be logged
#[inline]
pub fn log_warning(log_message: &str) -> Option<MessageId> {
    log(LogLevel::Warning, log_message)
}

/// # Arguments
///
/// * `log_message` - the message to be logged
#[inline]
pub fn log_info(log_message: &str) -> Option<MessageId> {
    log(LogLevel::Info, log_message)
}

/// # Arguments
///
/// * `log_message` - the message to be logged
pub fn log_debug(log_message: &str) -> Option<MessageId> {
    log(LogLevel::Debug, log_message)
}
