//! Display-only time classification for posts
//!
//! Timebands and day types are derived labels shown on post cards. They are
//! orthogonal to window correctness: nothing in the scheduler depends on them.

use chrono::{DateTime, Datelike, Local, NaiveDate, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Band of the day a post was submitted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeband {
    /// 朝 6:00-11:59
    Morning,
    /// 昼 12:00-17:59
    Afternoon,
    /// 夜 18:00-23:59
    Evening,
    /// 深夜 0:00-5:59
    LateNight,
}

impl Timeband {
    /// Classify a local wall-clock hour (0-23).
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            6..=11 => Self::Morning,
            12..=17 => Self::Afternoon,
            18..=23 => Self::Evening,
            _ => Self::LateNight,
        }
    }

    /// Classify a local instant.
    pub fn from_local(instant: DateTime<Local>) -> Self {
        Self::from_hour(instant.hour())
    }

    pub fn id(&self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Afternoon => "afternoon",
            Self::Evening => "evening",
            Self::LateNight => "late_night",
        }
    }

    /// Japanese display label, as rendered on post cards.
    pub fn japanese_label(&self) -> &'static str {
        match self {
            Self::Morning => "朝",
            Self::Afternoon => "昼",
            Self::Evening => "夜",
            Self::LateNight => "深夜",
        }
    }

    /// Parse from string (accepts both IDs and Japanese labels).
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "morning" | "朝" => Some(Self::Morning),
            "afternoon" | "昼" => Some(Self::Afternoon),
            "evening" | "夜" => Some(Self::Evening),
            "late_night" | "深夜" => Some(Self::LateNight),
            _ => None,
        }
    }
}

impl fmt::Display for Timeband {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Weekday/weekend classification of a post's calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayType {
    /// 平日
    Weekday,
    /// 週末
    Weekend,
}

impl DayType {
    pub fn from_date(date: NaiveDate) -> Self {
        match date.weekday() {
            Weekday::Sat | Weekday::Sun => Self::Weekend,
            _ => Self::Weekday,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Self::Weekday => "weekday",
            Self::Weekend => "weekend",
        }
    }

    pub fn japanese_label(&self) -> &'static str {
        match self {
            Self::Weekday => "平日",
            Self::Weekend => "週末",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "weekday" | "平日" => Some(Self::Weekday),
            "weekend" | "週末" => Some(Self::Weekend),
            _ => None,
        }
    }
}

impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Format a date the way the client renders it, e.g. `2025年6月1日`.
pub fn format_japanese_date(date: NaiveDate) -> String {
    format!("{}年{}月{}日", date.year(), date.month(), date.day())
}

/// Format a local instant as `H:MM`.
pub fn format_japanese_time(instant: DateTime<Local>) -> String {
    format!("{}:{:02}", instant.hour(), instant.minute())
}
