//! Timestamped status messages recorded during a run.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a [`StatusMessage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// Something completed as expected.
    Success,
    /// Worth surfacing, but the run is still successful.
    Warning,
    /// The run is no longer successful.
    Failure,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Success => write!(f, "Success"),
            Status::Warning => write!(f, "Warning"),
            Status::Failure => write!(f, "Failure"),
        }
    }
}

/// One log-worthy event of a run.
///
/// Immutable once created.
///
/// # Examples
///
/// ```
/// use weft_core::{Status, StatusMessage};
///
/// let message = StatusMessage::new(Status::Warning, "segment count mismatch");
/// assert_eq!(message.status(), Status::Warning);
/// assert_eq!(message.message(), "segment count mismatch");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMessage {
    status: Status,
    message: String,
    logged: DateTime<Utc>,
}

impl StatusMessage {
    /// Creates a message stamped with the current time.
    pub fn new(status: Status, message: impl Into<String>) -> Self {
        Self::at(status, message, Utc::now())
    }

    /// Creates a message with an explicit timestamp.
    pub fn at(status: Status, message: impl Into<String>, logged: DateTime<Utc>) -> Self {
        Self {
            status,
            message: message.into(),
            logged,
        }
    }

    /// Returns the severity.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Returns the message text.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns when the message was logged.
    pub fn logged(&self) -> DateTime<Utc> {
        self.logged
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] - {} - {}",
            self.status,
            self.logged.to_rfc3339_opts(SecondsFormat::Millis, true),
            self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_status_display() {
        assert_eq!(Status::Success.to_string(), "Success");
        assert_eq!(Status::Warning.to_string(), "Warning");
        assert_eq!(Status::Failure.to_string(), "Failure");
    }

    #[test]
    fn test_message_display() {
        let logged = Utc
            .with_ymd_and_hms(2024, 3, 1, 12, 30, 0)
            .single()
            .expect("valid timestamp");
        let message = StatusMessage::at(Status::Failure, "Failed to import input", logged);
        assert_eq!(
            message.to_string(),
            "[Failure] - 2024-03-01T12:30:00.000Z - Failed to import input"
        );
    }

    #[test]
    fn test_message_serde() {
        let logged = Utc
            .with_ymd_and_hms(2024, 3, 1, 12, 30, 0)
            .single()
            .expect("valid timestamp");
        let message = StatusMessage::at(Status::Warning, "segment count mismatch", logged);

        let json = serde_json::to_value(&message).expect("serializable");
        assert_eq!(json["status"], "Warning");
        assert_eq!(json["message"], "segment count mismatch");
        assert_eq!(json["logged"], "2024-03-01T12:30:00Z");

        let parsed: StatusMessage = serde_json::from_value(json).expect("valid message");
        assert_eq!(parsed, message);
    }

    #[test]
    fn test_new_stamps_current_time() {
        let before = Utc::now();
        let message = StatusMessage::new(Status::Success, "done");
        assert!(message.logged() >= before);
        assert!(message.logged() <= Utc::now());
    }
}
