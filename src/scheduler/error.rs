//! Error types for the window scheduler

use chrono::NaiveDate;
use thiserror::Error;

/// Result type for scheduler operations
pub type SchedulerResult<T> = Result<T, SchedulerError>;

/// Scheduler-specific errors
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Caller passed a missing or blank user identifier. Rejected before any
    /// storage access.
    #[error("user id must not be empty")]
    InvalidUserId,

    /// The drawn wall-clock time does not exist in the local timezone
    /// (e.g. a DST gap swallowed it).
    #[error("no valid local instant for {date} {hour:02}:{minute:02}")]
    UnresolvableLocalTime {
        date: NaiveDate,
        hour: u32,
        minute: u32,
    },

    /// The window store failed during lookup or insert. Retryable: no partial
    /// window state is visible after this error.
    #[error("window store unavailable: {reason}")]
    Storage { reason: String },
}

impl SchedulerError {
    /// Wrap a storage-layer failure.
    pub fn storage(reason: impl Into<String>) -> Self {
        Self::Storage {
            reason: reason.into(),
        }
    }

    /// Check if the error is recoverable (can be retried)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Storage { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_is_recoverable() {
        let err = SchedulerError::storage("disk on fire");
        assert!(err.is_recoverable());
        assert!(err.to_string().contains("disk on fire"));
    }

    #[test]
    fn test_invalid_user_is_not_recoverable() {
        assert!(!SchedulerError::InvalidUserId.is_recoverable());
    }

    #[test]
    fn test_unresolvable_time_display() {
        let err = SchedulerError::UnresolvableLocalTime {
            date: NaiveDate::from_ymd_opt(2025, 3, 9).unwrap(),
            hour: 10,
            minute: 5,
        };
        assert!(err.to_string().contains("2025-03-09"));
        assert!(err.to_string().contains("10:05"));
        assert!(!err.is_recoverable());
    }
}
