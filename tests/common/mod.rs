//! Common test utilities

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use madobe::scheduler::WindowScheduler;
use madobe::storage::MemoryStore;

/// Build an absolute instant from local wall-clock components.
#[allow(dead_code)]
pub fn local_instant(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
    Local
        .with_ymd_and_hms(y, m, d, h, min, s)
        .single()
        .expect("unambiguous local test instant")
        .with_timezone(&Utc)
}

/// In-memory store plus a deterministic scheduler over it.
#[allow(dead_code)]
pub fn seeded_scheduler(seed: u64) -> (Arc<MemoryStore>, WindowScheduler<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let scheduler = WindowScheduler::with_seed(Arc::clone(&store), seed);
    (store, scheduler)
}
