//! madobe - Daily posting-window service core
//!
//! The engine behind a daily-prompt outfit app: every user gets one randomly
//! timed, three-minute window per calendar day to post, and posting unlocks
//! the same-day feed. The correctness-critical piece is the window scheduler;
//! everything around it is deliberately thin.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration management and settings
//! - [`models`] - Window and post data structures
//! - [`scheduler`] - Window generation, idempotent retrieval, classification
//! - [`storage`] - Repository traits plus SQLite and in-memory stores
//! - [`posts`] - Post creation with frozen lateness, same-day feed gating
//! - [`timeband`] - Display-only time/day classification
//! - [`error`] - Unified error type
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use chrono::Utc;
//! use madobe::scheduler::WindowScheduler;
//! use madobe::storage::SqliteStore;
//!
//! fn main() -> anyhow::Result<()> {
//!     let store = Arc::new(SqliteStore::new("data/madobe.db")?);
//!     let scheduler = WindowScheduler::new(store);
//!
//!     let window = scheduler.get_or_create_window("u1", Utc::now())?;
//!     println!("today's window opens at {}", window.scheduled_time);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod posts;
pub mod scheduler;
pub mod storage;
pub mod timeband;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{Error, ErrorCategory, Result};
    pub use crate::models::{DailyWindow, Post, WindowPhase};
    pub use crate::posts::{PostDraft, PostError, PostService};
    pub use crate::scheduler::{SchedulerError, WindowScheduler};
    pub use crate::storage::{MemoryStore, PostRepository, SqliteStore, WindowRepository};
    pub use crate::timeband::{DayType, Timeband};
}

// Direct re-exports for convenience
pub use models::{DailyWindow, Post, WindowPhase};
