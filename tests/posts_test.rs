//! Integration tests for the post service
//!
//! Covers the frozen lateness flag, the one-post-per-day rule, the
//! post-to-view feed gate, and the display classifications stamped onto
//! posts at creation.

use std::sync::Arc;

use chrono::{Duration, Local, Timelike};
use madobe::posts::{PostDraft, PostError, PostService};
use madobe::scheduler::WindowScheduler;
use madobe::storage::{MemoryStore, SqliteStore};
use madobe::timeband::Timeband;

mod common;
use common::local_instant;

fn service_with_seed(seed: u64) -> PostService<MemoryStore, MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    let scheduler = WindowScheduler::with_seed(Arc::clone(&store), seed);
    PostService::new(scheduler, store)
}

#[test]
fn test_on_time_post_is_not_late() {
    let service = service_with_seed(1);
    let morning = local_instant(2025, 6, 2, 9, 0, 0);

    let window = service
        .scheduler()
        .get_or_create_window("u1", morning)
        .unwrap();

    let at = window.scheduled_time + Duration::seconds(10);
    let post = service
        .create_post("u1", PostDraft::new("https://img.example/fit.jpg"), at)
        .unwrap();

    assert!(!post.is_late);
    assert_eq!(post.user_id, "u1");
    assert_eq!(post.timestamp, at);
}

#[test]
fn test_late_post_is_flagged_and_frozen() {
    let service = service_with_seed(2);
    let morning = local_instant(2025, 6, 2, 9, 0, 0);

    let window = service
        .scheduler()
        .get_or_create_window("u1", morning)
        .unwrap();

    let at = window.scheduled_time + Duration::seconds(200);
    let post = service
        .create_post("u1", PostDraft::new("https://img.example/fit.jpg"), at)
        .unwrap();

    assert!(post.is_late);

    // The flag is stored, not recomputed: the feed sees the same verdict.
    let feed = service.today_feed("u1", at).unwrap();
    assert_eq!(feed.len(), 1);
    assert!(feed[0].is_late);
}

#[test]
fn test_first_touch_via_post_materializes_window() {
    // A user whose first access of the day is the post itself still gets a
    // window, created lazily inside create_post.
    let service = service_with_seed(3);
    let noon = local_instant(2025, 6, 2, 12, 0, 0);

    let post = service
        .create_post("fresh", PostDraft::new("https://img.example/a.jpg"), noon)
        .unwrap();

    let window = service
        .scheduler()
        .get_or_create_window("fresh", noon)
        .unwrap();
    assert_eq!(post.is_late, window.is_late_at(noon));
}

#[test]
fn test_second_post_same_day_rejected() {
    let service = service_with_seed(4);
    let noon = local_instant(2025, 6, 2, 12, 0, 0);

    service
        .create_post("u1", PostDraft::new("https://img.example/a.jpg"), noon)
        .unwrap();

    let err = service
        .create_post(
            "u1",
            PostDraft::new("https://img.example/b.jpg"),
            noon + Duration::hours(1),
        )
        .unwrap_err();
    assert!(matches!(err, PostError::AlreadyPosted));

    // Next day is a fresh slate.
    let tomorrow = local_instant(2025, 6, 3, 12, 0, 0);
    assert!(service
        .create_post("u1", PostDraft::new("https://img.example/c.jpg"), tomorrow)
        .is_ok());
}

#[test]
fn test_feed_locked_until_posted() {
    let service = service_with_seed(5);
    let noon = local_instant(2025, 6, 2, 12, 0, 0);

    service
        .create_post("alice", PostDraft::new("https://img.example/a.jpg"), noon)
        .unwrap();

    let err = service.today_feed("bob", noon).unwrap_err();
    assert!(matches!(err, PostError::NotPostedYet));
    assert!(!service.has_posted_today("bob", noon).unwrap());

    service
        .create_post(
            "bob",
            PostDraft::new("https://img.example/b.jpg"),
            noon + Duration::minutes(5),
        )
        .unwrap();

    let feed = service.today_feed("bob", noon + Duration::minutes(6)).unwrap();
    assert_eq!(feed.len(), 2);
    // Newest first
    assert_eq!(feed[0].user_id, "bob");
    assert_eq!(feed[1].user_id, "alice");
}

#[test]
fn test_missing_image_rejected() {
    let service = service_with_seed(6);
    let noon = local_instant(2025, 6, 2, 12, 0, 0);

    for url in ["", "   "] {
        let err = service
            .create_post("u1", PostDraft::new(url), noon)
            .unwrap_err();
        assert!(matches!(err, PostError::MissingImage));
    }

    // Nothing was persisted, so a real post still goes through.
    assert!(!service.has_posted_today("u1", noon).unwrap());
}

#[test]
fn test_blank_user_rejected() {
    let service = service_with_seed(7);
    let err = service
        .create_post("  ", PostDraft::new("https://img.example/a.jpg"), local_instant(2025, 6, 2, 12, 0, 0))
        .unwrap_err();
    assert!(matches!(err, PostError::Scheduler(_)));
}

#[test]
fn test_post_carries_display_classifications() {
    let service = service_with_seed(8);
    // 2025-06-07 is a Saturday
    let saturday_evening = local_instant(2025, 6, 7, 19, 30, 0);

    let post = service
        .create_post(
            "u1",
            PostDraft::new("https://img.example/a.jpg")
                .with_caption("first warm day")
                .with_weather(serde_json::json!({ "temp": 24, "sky": "clear" })),
            saturday_evening,
        )
        .unwrap();

    let local_hour = saturday_evening.with_timezone(&Local).hour();
    assert_eq!(post.timeband, Timeband::from_hour(local_hour));
    assert_eq!(post.day_type.japanese_label(), "週末");
    assert_eq!(post.caption.as_deref(), Some("first warm day"));
    assert_eq!(post.weather.unwrap()["sky"], "clear");
}

#[test]
fn test_post_service_over_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(SqliteStore::new(dir.path().join("posts.db")).unwrap());
    let scheduler = WindowScheduler::with_seed(Arc::clone(&store), 9);
    let service = PostService::new(scheduler, store);

    let noon = local_instant(2025, 6, 2, 12, 0, 0);
    let post = service
        .create_post("u1", PostDraft::new("https://img.example/a.jpg"), noon)
        .unwrap();

    let feed = service.today_feed("u1", noon + Duration::seconds(1)).unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0], post);
}
