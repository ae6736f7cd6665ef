// Core data structures for the madobe posting-window service

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::timeband::{DayType, Timeband};

/// Length of a posting window once it opens.
pub const WINDOW_DURATION_SECS: i64 = 180;

/// A user's single posting opportunity for one calendar day.
///
/// Exactly one record exists per `(user_id, date)` pair. The record is
/// immutable after creation: `scheduled_time` is drawn once, `expires_at` is
/// always derived from it, and windows are never deleted. They function as
/// permanent history, like audit log entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyWindow {
    pub id: String,
    pub user_id: String,
    /// Calendar date key in the local day boundary (`YYYY-MM-DD`).
    pub date: NaiveDate,
    /// Absolute instant the window opens. Fixed at creation.
    pub scheduled_time: DateTime<Utc>,
    /// Always `scheduled_time + 180s`, never set independently.
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl DailyWindow {
    /// Build a window, deriving `expires_at` from the scheduled instant.
    pub fn new(
        user_id: impl Into<String>,
        date: NaiveDate,
        scheduled_time: DateTime<Utc>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            date,
            scheduled_time,
            expires_at: scheduled_time + Duration::seconds(WINDOW_DURATION_SECS),
            created_at,
        }
    }

    /// Classify an instant relative to this window.
    ///
    /// The record itself never changes; only the phase of "now" does.
    pub fn phase_at(&self, now: DateTime<Utc>) -> WindowPhase {
        if now < self.scheduled_time {
            WindowPhase::Unopened
        } else if now <= self.expires_at {
            WindowPhase::Open
        } else {
            WindowPhase::Expired
        }
    }

    /// True iff `scheduled_time <= now <= expires_at` (both bounds inclusive).
    pub fn is_open_at(&self, now: DateTime<Utc>) -> bool {
        self.phase_at(now) == WindowPhase::Open
    }

    /// True iff `now` is strictly after expiry. An instant before the window
    /// opens is not late; early submission is gated elsewhere, if at all.
    pub fn is_late_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Phase of "now" relative to a window: Unopened -> Open -> Expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowPhase {
    Unopened,
    Open,
    Expired,
}

impl WindowPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unopened => "unopened",
            Self::Open => "open",
            Self::Expired => "expired",
        }
    }
}

impl std::fmt::Display for WindowPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A submitted outfit post.
///
/// `is_late` is evaluated once against the then-current window at creation
/// time and frozen; it is never recomputed later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub user_id: String,
    /// Local calendar date of submission, the feed/day key.
    pub date: NaiveDate,
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    /// Opaque weather payload captured at submission, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<serde_json::Value>,
    pub timeband: Timeband,
    pub day_type: DayType,
    pub is_late: bool,
    pub timestamp: DateTime<Utc>,
}
