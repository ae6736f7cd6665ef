//! Repository traits and their SQLite / in-memory implementations
//!
//! Trait-based repositories decouple the scheduler and post service from the
//! storage backend, so tests can race an in-memory double and production can
//! sit on SQLite without either knowing the difference.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, RwLock};

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::models::{DailyWindow, Post};
use crate::timeband::{DayType, Timeband};

// ============================================================================
// Repository Traits
// ============================================================================

/// Storage contract consumed by the window scheduler.
pub trait WindowRepository: Send + Sync {
    /// Point lookup by the composite `(user_id, date)` key.
    fn find(&self, user_id: &str, date: NaiveDate) -> Result<Option<DailyWindow>>;

    /// Insert the window unless one already exists for its key, and return
    /// whichever record is durably committed afterwards.
    ///
    /// A key conflict is not an error: the existing record wins and is
    /// returned, so two racing first-accesses converge on one window.
    fn insert_if_absent(&self, window: &DailyWindow) -> Result<DailyWindow>;
}

/// Storage contract consumed by the post service.
pub trait PostRepository: Send + Sync {
    /// Persist a post. Post records are immutable once written.
    fn insert(&self, post: &Post) -> Result<()>;

    /// Whether the user already has a post on the given local date.
    fn has_posted_on(&self, user_id: &str, date: NaiveDate) -> Result<bool>;

    /// All posts on the given local date, newest first.
    fn posts_on(&self, date: NaiveDate) -> Result<Vec<Post>>;
}

// ============================================================================
// SQLite Implementation
// ============================================================================

/// SQLite-backed store implementing both repository traits.
///
/// Uses `Mutex` to ensure thread-safety for the SQLite connection. The
/// `UNIQUE(user_id, date)` constraint on `daily_windows` is what makes
/// `insert_if_absent` atomic: `INSERT OR IGNORE` either commits our row or
/// leaves the winner untouched, and the follow-up read returns the survivor.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the store at the given path.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path).context("Failed to open SQLite database")?;

        // WAL for concurrent readers during writes
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        let store = Self {
            conn: Mutex::new(conn),
        };
        store.create_schema()?;

        tracing::info!(path = %path.display(), "SQLite store initialized");
        Ok(store)
    }

    /// Create in-memory store (for testing)
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to create in-memory SQLite")?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.create_schema()?;
        Ok(store)
    }

    fn create_schema(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(
            r#"
                CREATE TABLE IF NOT EXISTS daily_windows (
                    id TEXT PRIMARY KEY,
                    user_id TEXT NOT NULL,
                    date TEXT NOT NULL,
                    scheduled_time TEXT NOT NULL,
                    expires_at TEXT NOT NULL,
                    created_at TEXT NOT NULL,
                    UNIQUE(user_id, date)
                );

                CREATE TABLE IF NOT EXISTS posts (
                    id TEXT PRIMARY KEY,
                    user_id TEXT NOT NULL,
                    date TEXT NOT NULL,
                    image_url TEXT NOT NULL,
                    caption TEXT,
                    weather TEXT,
                    timeband TEXT NOT NULL,
                    day_type TEXT NOT NULL,
                    is_late INTEGER NOT NULL,
                    timestamp TEXT NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_posts_user_date
                    ON posts(user_id, date);

                CREATE INDEX IF NOT EXISTS idx_posts_date
                    ON posts(date);
                "#,
        )
        .context("Failed to create SQLite schema")?;

        Ok(())
    }

    fn find_window(
        conn: &Connection,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<Option<DailyWindow>> {
        let raw = conn
            .query_row(
                "SELECT id, user_id, date, scheduled_time, expires_at, created_at
                 FROM daily_windows WHERE user_id = ?1 AND date = ?2",
                params![user_id, date_key(date)],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, String>(5)?,
                    ))
                },
            )
            .optional()
            .context("Failed to query daily window")?;

        raw.map(|(id, user_id, date, scheduled_time, expires_at, created_at)| {
            Ok(DailyWindow {
                id,
                user_id,
                date: parse_date(&date)?,
                scheduled_time: parse_instant(&scheduled_time, "scheduled_time")?,
                expires_at: parse_instant(&expires_at, "expires_at")?,
                created_at: parse_instant(&created_at, "created_at")?,
            })
        })
        .transpose()
    }
}

impl WindowRepository for SqliteStore {
    fn find(&self, user_id: &str, date: NaiveDate) -> Result<Option<DailyWindow>> {
        let conn = self.conn.lock().unwrap();
        Self::find_window(&conn, user_id, date)
    }

    fn insert_if_absent(&self, window: &DailyWindow) -> Result<DailyWindow> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            r#"
                INSERT OR IGNORE INTO daily_windows
                    (id, user_id, date, scheduled_time, expires_at, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            params![
                window.id,
                window.user_id,
                date_key(window.date),
                window.scheduled_time.to_rfc3339(),
                window.expires_at.to_rfc3339(),
                window.created_at.to_rfc3339(),
            ],
        )
        .context("Failed to insert daily window")?;

        // The committed row is authoritative whether or not our insert won.
        Self::find_window(&conn, &window.user_id, window.date)?
            .ok_or_else(|| anyhow!("window missing immediately after insert"))
    }
}

impl PostRepository for SqliteStore {
    fn insert(&self, post: &Post) -> Result<()> {
        let conn = self.conn.lock().unwrap();

        let weather = post
            .weather
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .context("Failed to serialize weather payload")?;

        conn.execute(
            r#"
                INSERT INTO posts
                    (id, user_id, date, image_url, caption, weather,
                     timeband, day_type, is_late, timestamp)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                "#,
            params![
                post.id,
                post.user_id,
                date_key(post.date),
                post.image_url,
                post.caption,
                weather,
                post.timeband.id(),
                post.day_type.id(),
                post.is_late,
                post.timestamp.to_rfc3339(),
            ],
        )
        .context("Failed to insert post")?;

        Ok(())
    }

    fn has_posted_on(&self, user_id: &str, date: NaiveDate) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM posts WHERE user_id = ?1 AND date = ?2)",
                params![user_id, date_key(date)],
                |row| row.get(0),
            )
            .context("Failed to check posts for day")?;

        Ok(exists)
    }

    fn posts_on(&self, date: NaiveDate) -> Result<Vec<Post>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(
                "SELECT id, user_id, date, image_url, caption, weather,
                        timeband, day_type, is_late, timestamp
                 FROM posts WHERE date = ?1
                 ORDER BY timestamp DESC",
            )
            .context("Failed to prepare feed query")?;

        let rows = stmt
            .query_map(params![date_key(date)], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, Option<String>>(4)?,
                    row.get::<_, Option<String>>(5)?,
                    row.get::<_, String>(6)?,
                    row.get::<_, String>(7)?,
                    row.get::<_, bool>(8)?,
                    row.get::<_, String>(9)?,
                ))
            })
            .context("Failed to query feed")?;

        let mut posts = Vec::new();
        for row in rows {
            let (id, user_id, date, image_url, caption, weather, timeband, day_type, is_late, ts) =
                row?;
            posts.push(Post {
                id,
                user_id,
                date: parse_date(&date)?,
                image_url,
                caption,
                weather: weather
                    .map(|raw| serde_json::from_str(&raw))
                    .transpose()
                    .context("Failed to parse stored weather payload")?,
                timeband: Timeband::from_id(&timeband)
                    .ok_or_else(|| anyhow!("unknown timeband '{timeband}'"))?,
                day_type: DayType::from_id(&day_type)
                    .ok_or_else(|| anyhow!("unknown day type '{day_type}'"))?,
                is_late,
                timestamp: parse_instant(&ts, "timestamp")?,
            });
        }

        Ok(posts)
    }
}

fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("invalid date key '{value}'"))
}

fn parse_instant(value: &str, field: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("invalid {field} '{value}'"))
}

// ============================================================================
// In-Memory Implementation (for testing)
// ============================================================================

/// In-memory store implementing both repository traits.
///
/// Useful for testing without database dependencies. `insert_if_absent` holds
/// the write lock across check-and-insert, so it is as race-safe as the
/// SQLite constraint.
pub struct MemoryStore {
    windows: RwLock<HashMap<(String, NaiveDate), DailyWindow>>,
    posts: RwLock<Vec<Post>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            windows: RwLock::new(HashMap::new()),
            posts: RwLock::new(Vec::new()),
        }
    }

    /// Number of committed windows.
    pub fn window_count(&self) -> usize {
        self.windows.read().unwrap().len()
    }

    /// Number of committed posts.
    pub fn post_count(&self) -> usize {
        self.posts.read().unwrap().len()
    }

    /// Drop all records.
    pub fn clear(&self) {
        self.windows.write().unwrap().clear();
        self.posts.write().unwrap().clear();
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowRepository for MemoryStore {
    fn find(&self, user_id: &str, date: NaiveDate) -> Result<Option<DailyWindow>> {
        let windows = self.windows.read().unwrap();
        Ok(windows.get(&(user_id.to_string(), date)).cloned())
    }

    fn insert_if_absent(&self, window: &DailyWindow) -> Result<DailyWindow> {
        let mut windows = self.windows.write().unwrap();
        let committed = windows
            .entry((window.user_id.clone(), window.date))
            .or_insert_with(|| window.clone());
        Ok(committed.clone())
    }
}

impl PostRepository for MemoryStore {
    fn insert(&self, post: &Post) -> Result<()> {
        self.posts.write().unwrap().push(post.clone());
        Ok(())
    }

    fn has_posted_on(&self, user_id: &str, date: NaiveDate) -> Result<bool> {
        let posts = self.posts.read().unwrap();
        Ok(posts.iter().any(|p| p.user_id == user_id && p.date == date))
    }

    fn posts_on(&self, date: NaiveDate) -> Result<Vec<Post>> {
        let posts = self.posts.read().unwrap();
        let mut todays: Vec<Post> = posts.iter().filter(|p| p.date == date).cloned().collect();
        todays.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(todays)
    }
}
