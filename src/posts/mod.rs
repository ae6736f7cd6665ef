//! Post creation and the same-day feed
//!
//! The post service is the scheduler's main consumer. On submission it asks
//! for today's window, freezes the lateness verdict into the post, stamps the
//! display classifications, and enforces the one-post-per-day rule. Reading
//! the feed is gated on having posted: you see today's posts only after you
//! showed your own outfit.

use std::sync::Arc;

use chrono::{DateTime, Local, Utc};
use thiserror::Error;

use crate::models::Post;
use crate::scheduler::{SchedulerError, WindowScheduler};
use crate::storage::{PostRepository, WindowRepository};
use crate::timeband::{DayType, Timeband};

/// Post-service errors
#[derive(Debug, Error)]
pub enum PostError {
    /// One post per user per local day.
    #[error("already posted today")]
    AlreadyPosted,

    /// The feed unlocks only after the caller has posted today.
    #[error("feed is locked until today's post is submitted")]
    NotPostedYet,

    /// A post needs an image.
    #[error("post is missing an image url")]
    MissingImage,

    /// Window scheduling failed (invalid user, storage down).
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),

    /// Post store failed. Retryable.
    #[error("post store unavailable: {reason}")]
    Storage { reason: String },
}

impl PostError {
    fn storage(err: anyhow::Error) -> Self {
        Self::Storage {
            reason: err.to_string(),
        }
    }

    /// Check if the error is recoverable (can be retried)
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Storage { .. } => true,
            Self::Scheduler(e) => e.is_recoverable(),
            _ => false,
        }
    }
}

/// Submission payload: everything the caller provides for a new post.
#[derive(Debug, Clone, Default)]
pub struct PostDraft {
    pub image_url: String,
    pub caption: Option<String>,
    /// Opaque weather payload captured client-side; stored as-is.
    pub weather: Option<serde_json::Value>,
}

impl PostDraft {
    pub fn new(image_url: impl Into<String>) -> Self {
        Self {
            image_url: image_url.into(),
            ..Default::default()
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn with_weather(mut self, weather: serde_json::Value) -> Self {
        self.weather = Some(weather);
        self
    }
}

/// Creates posts and serves the same-day feed.
pub struct PostService<W: WindowRepository, P: PostRepository> {
    scheduler: WindowScheduler<W>,
    posts: Arc<P>,
}

impl<W: WindowRepository, P: PostRepository> PostService<W, P> {
    pub fn new(scheduler: WindowScheduler<W>, posts: Arc<P>) -> Self {
        Self { scheduler, posts }
    }

    /// Submit the user's post for the current local day.
    ///
    /// The lateness flag is evaluated once against the then-current window
    /// and frozen; the window itself is materialized here if this submission
    /// is the user's first touch of the day.
    pub fn create_post(
        &self,
        user_id: &str,
        draft: PostDraft,
        now: DateTime<Utc>,
    ) -> Result<Post, PostError> {
        if user_id.trim().is_empty() {
            return Err(SchedulerError::InvalidUserId.into());
        }
        if draft.image_url.trim().is_empty() {
            return Err(PostError::MissingImage);
        }

        let local = now.with_timezone(&Local);
        let date = local.date_naive();

        if self
            .posts
            .has_posted_on(user_id, date)
            .map_err(PostError::storage)?
        {
            return Err(PostError::AlreadyPosted);
        }

        let window = self.scheduler.get_or_create_window(user_id, now)?;

        let post = Post {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            date,
            image_url: draft.image_url,
            caption: draft.caption,
            weather: draft.weather,
            timeband: Timeband::from_local(local),
            day_type: DayType::from_date(date),
            is_late: window.is_late_at(now),
            timestamp: now,
        };

        self.posts.insert(&post).map_err(PostError::storage)?;

        tracing::info!(
            user_id = %post.user_id,
            date = %post.date,
            is_late = %post.is_late,
            timeband = %post.timeband,
            "post created"
        );

        Ok(post)
    }

    /// Today's posts, newest first. Locked until the caller has posted today.
    pub fn today_feed(&self, user_id: &str, now: DateTime<Utc>) -> Result<Vec<Post>, PostError> {
        if user_id.trim().is_empty() {
            return Err(SchedulerError::InvalidUserId.into());
        }

        let date = now.with_timezone(&Local).date_naive();

        if !self
            .posts
            .has_posted_on(user_id, date)
            .map_err(PostError::storage)?
        {
            return Err(PostError::NotPostedYet);
        }

        self.posts.posts_on(date).map_err(PostError::storage)
    }

    /// Whether the user has already posted on the current local day.
    pub fn has_posted_today(&self, user_id: &str, now: DateTime<Utc>) -> Result<bool, PostError> {
        let date = now.with_timezone(&Local).date_naive();
        self.posts
            .has_posted_on(user_id, date)
            .map_err(PostError::storage)
    }

    /// Read-path access to the underlying scheduler, for callers that only
    /// want to display window state.
    pub fn scheduler(&self) -> &WindowScheduler<W> {
        &self.scheduler
    }
}
