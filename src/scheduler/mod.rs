//! Daily posting-window scheduling
//!
//! Each user gets exactly one posting window per calendar day, opened at an
//! unpredictable daytime instant and lasting three minutes. This module owns
//! the full lifecycle of that record:
//!
//! - **Generation**: uniform draw over `[10:00, 22:00)` local wall-clock,
//!   minute precision, from an injectable random source.
//! - **Idempotent retrieval**: `get_or_create_window` materializes the window
//!   on first access and returns the identical record on every later call.
//!   Concurrent first-accesses are collapsed by the storage layer's unique
//!   `(user_id, date)` key; a losing writer re-reads instead of erroring.
//! - **Classification**: `is_within_window` / `is_late_post` are pure
//!   functions of wall-clock time against the immutable record. Conceptually
//!   a window moves Unopened -> Open -> Expired, but no stored state ever
//!   changes.
//!
//! Creation is entirely lazy and pull-based; no background scheduler runs.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use chrono::Utc;
//! use madobe::scheduler::WindowScheduler;
//! use madobe::storage::SqliteStore;
//!
//! let store = Arc::new(SqliteStore::in_memory()?);
//! let scheduler = WindowScheduler::new(store);
//!
//! let window = scheduler.get_or_create_window("u1", Utc::now())?;
//! println!("opens {} closes {}", window.scheduled_time, window.expires_at);
//! ```

pub mod error;
pub mod window;

pub use error::{SchedulerError, SchedulerResult};
pub use window::{
    generate_scheduled_time, is_late_post, is_within_window, WindowScheduler, MAX_HOUR, MIN_HOUR,
};
