//! Per-user daily window generation and classification
//!
//! The scheduler assigns each user one unpredictable, time-boxed posting
//! opportunity per calendar day. Windows are materialized lazily on first
//! access and are immutable afterwards; there is no background timer, the
//! 3-minute deadline is plain data evaluated at classification time.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::error::{SchedulerError, SchedulerResult};
use crate::models::DailyWindow;
use crate::storage::WindowRepository;

/// Earliest hour (inclusive, local time) a window may open.
pub const MIN_HOUR: u32 = 10;

/// Latest hour (exclusive, local time) a window may open.
///
/// The daytime bound is product policy, not a technical constraint: the
/// prompt has to land while people are awake and dressed.
pub const MAX_HOUR: u32 = 22;

/// Draw a window opening time within `date`: hour uniform in `[10, 22)`,
/// minute uniform in `[0, 60)`, seconds zero. Local wall-clock.
///
/// The random source is injected so tests can pin exact draws instead of
/// asserting statistically.
pub fn generate_scheduled_time(date: NaiveDate, rng: &mut impl Rng) -> NaiveDateTime {
    let hour = rng.gen_range(MIN_HOUR..MAX_HOUR);
    let minute = rng.gen_range(0..60u32);

    date.and_hms_opt(hour, minute, 0)
        .expect("hour < 24 and minute < 60 always form a valid time")
}

/// True iff `scheduled_time <= now <= expires_at` (both bounds inclusive).
pub fn is_within_window(window: &DailyWindow, now: DateTime<Utc>) -> bool {
    window.is_open_at(now)
}

/// True iff `now` is strictly after the window's expiry.
pub fn is_late_post(window: &DailyWindow, now: DateTime<Utc>) -> bool {
    window.is_late_at(now)
}

/// Anchor a drawn local wall-clock time to an absolute instant.
///
/// An ambiguous local time (clocks rolled back) resolves to the earlier
/// instant; a nonexistent one (clocks rolled forward) is an error.
fn resolve_local(date: NaiveDate, naive: NaiveDateTime) -> SchedulerResult<DateTime<Utc>> {
    match Local.from_local_datetime(&naive) {
        LocalResult::Single(instant) => Ok(instant.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest.with_timezone(&Utc)),
        LocalResult::None => Err(SchedulerError::UnresolvableLocalTime {
            date,
            hour: naive.hour(),
            minute: naive.minute(),
        }),
    }
}

/// Owns per-user-per-day window state: generation, idempotent retrieval,
/// and the storage handshake that keeps concurrent first-accesses from
/// committing two windows for one `(user_id, date)` key.
///
/// The repository handle is injected explicitly; there is no process-wide
/// storage singleton, which keeps test doubles trivial.
pub struct WindowScheduler<R: WindowRepository> {
    repo: Arc<R>,
    rng: Mutex<ChaCha8Rng>,
}

impl<R: WindowRepository> WindowScheduler<R> {
    /// Create a scheduler drawing window times from OS entropy.
    pub fn new(repo: Arc<R>) -> Self {
        Self {
            repo,
            rng: Mutex::new(ChaCha8Rng::from_entropy()),
        }
    }

    /// Create a scheduler with a fixed seed, for reproducible draws in tests.
    pub fn with_seed(repo: Arc<R>, seed: u64) -> Self {
        Self {
            repo,
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
        }
    }

    /// Return the window for the caller's calendar day, materializing it on
    /// first access.
    ///
    /// The calendar date is derived from `reference` using the local day
    /// boundary. Repeated calls for one `(user_id, date)` always observe the
    /// same `scheduled_time`: a lost insert race is resolved by returning the
    /// winner's committed record, never by erroring or duplicating.
    pub fn get_or_create_window(
        &self,
        user_id: &str,
        reference: DateTime<Utc>,
    ) -> SchedulerResult<DailyWindow> {
        if user_id.trim().is_empty() {
            return Err(SchedulerError::InvalidUserId);
        }

        let date = reference.with_timezone(&Local).date_naive();

        if let Some(window) = self
            .repo
            .find(user_id, date)
            .map_err(|e| SchedulerError::storage(e.to_string()))?
        {
            return Ok(window);
        }

        let naive = {
            let mut rng = self.rng.lock().unwrap();
            generate_scheduled_time(date, &mut *rng)
        };
        let scheduled_time = resolve_local(date, naive)?;

        let candidate = DailyWindow::new(user_id, date, scheduled_time, Utc::now());

        // insert_if_absent returns whichever record actually committed, so a
        // racing writer silently adopts the winner.
        let committed = self
            .repo
            .insert_if_absent(&candidate)
            .map_err(|e| SchedulerError::storage(e.to_string()))?;

        if committed.id == candidate.id {
            tracing::info!(
                user_id = %committed.user_id,
                date = %committed.date,
                scheduled_time = %committed.scheduled_time,
                "materialized daily window"
            );
        } else {
            tracing::debug!(
                user_id = %committed.user_id,
                date = %committed.date,
                "lost window creation race, adopted committed record"
            );
        }

        Ok(committed)
    }
}
