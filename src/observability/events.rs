//! Observability events
//!
//! Events are explicit and typed.

use std::fmt;

/// Observable events in filedrop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Configuration loaded
    ConfigLoaded,
    /// Server bound and accepting requests
    Serving,
    /// Upload batch written
    FilesStored,
    /// Stored file renamed
    FileRenamed,
    /// Request answered with an error
    RequestFailed,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::Serving => "FILEDROP_SERVING",
            Event::FilesStored => "FILES_STORED",
            Event::FileRenamed => "FILE_RENAMED",
            Event::RequestFailed => "REQUEST_FAILED",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        assert_eq!(Event::Serving.as_str(), "FILEDROP_SERVING");
        assert_eq!(Event::FilesStored.to_string(), "FILES_STORED");
    }
}
