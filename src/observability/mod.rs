//! Observability subsystem
//!
//! Structured JSON-line logging of typed lifecycle and request events.
//!
//! ```ignore
//! use filedrop::observability::{log_event, Event, Logger};
//!
//! Logger::info("CUSTOM", &[("key", "value")]);
//! log_event(Event::Serving, &[("addr", "0.0.0.0:5000")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a lifecycle or request event at INFO
pub fn log_event(event: Event, fields: &[(&str, &str)]) {
    Logger::info(event.as_str(), fields);
}

/// Severity of a failed request: server faults at ERROR, client faults at WARN
pub fn failure_severity(status: u16) -> Severity {
    if status >= 500 {
        Severity::Error
    } else {
        Severity::Warn
    }
}

/// Log a failed request with its status
pub fn log_failure(status: u16, fields: &[(&str, &str)]) {
    let status_str = status.to_string();
    let mut all: Vec<(&str, &str)> = fields.to_vec();
    all.push(("status", status_str.as_str()));

    let event = Event::RequestFailed.as_str();
    match failure_severity(status) {
        Severity::Error => Logger::error(event, &all),
        _ => Logger::warn(event, &all),
    }
}
