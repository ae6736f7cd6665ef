//! Durable storage for windows and posts
//!
//! The scheduler and post service never touch a connection directly; they
//! talk to the repository traits defined here. Production uses
//! [`SqliteStore`], tests can use [`MemoryStore`] or any other double.
//!
//! The one contract that matters for correctness lives in
//! [`WindowRepository::insert_if_absent`]: storage must enforce uniqueness
//! of `(user_id, date)` and hand a conflicting writer the already-committed
//! record instead of an error.

pub mod repository;

pub use repository::{MemoryStore, PostRepository, SqliteStore, WindowRepository};
