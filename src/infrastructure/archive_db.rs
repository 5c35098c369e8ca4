//! `SQLite` reader for the archive database.
//!
//! The archive is populated by the scraper; this reader only ever opens it
//! read-only. Records come back in insertion order (`id` ascending).
//! A column holding a value that cannot be decoded (a malformed timestamp,
//! image list or a negative counter) is reported as `InvalidData`.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OpenFlags, Row};

use crate::domain::{
    AppError, Comment, Friend, FriendSource, GuestbookMessage, GuestbookSource, Result,
    TimelinePost, TimelineSource,
};

/// `LIMIT -1` means no limit in `SQLite`.
const NO_LIMIT: i64 = -1;

/// Read-only access to an archive database.
pub struct ArchiveDb {
    conn: Connection,
}

impl ArchiveDb {
    /// Opens an archive database in read-only mode.
    ///
    /// # Errors
    /// Returns error if the file is missing or cannot be opened.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(AppError::DatabaseNotFound {
                path: path.to_path_buf(),
            });
        }

        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(path, flags).map_err(AppError::database)?;

        conn.execute_batch(
            "PRAGMA query_only = ON;
             PRAGMA temp_store = MEMORY;",
        )
        .map_err(AppError::database)?;

        tracing::debug!(path = %path.display(), "Opened archive database");

        Ok(Self { conn })
    }

    fn fetch_comments(&self, moment_id: i64) -> Result<Vec<Comment>> {
        let mut stmt = self
            .conn
            .prepare_cached(
                r"
            SELECT user_qq, content, timestamp, time_text
            FROM moment_comments
            WHERE moment_id = ?1
            ORDER BY position ASC, id ASC
            ",
            )
            .map_err(AppError::database)?;

        let rows = stmt
            .query_map([moment_id], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, Option<String>>(3)?,
                ))
            })
            .map_err(AppError::database)?;

        let mut comments = Vec::new();
        for row in rows {
            let (user, content, timestamp, time_text) = row.map_err(AppError::database)?;
            comments.push(Comment {
                user,
                content,
                timestamp: parse_timestamp("moment_comments.timestamp", timestamp)?,
                time_text: time_text.unwrap_or_default(),
            });
        }

        Ok(comments)
    }
}

impl TimelineSource for ArchiveDb {
    fn fetch_timeline_posts(
        &self,
        user_id: &str,
        limit: Option<usize>,
        offset: usize,
    ) -> Result<Vec<TimelinePost>> {
        let mut stmt = self
            .conn
            .prepare(
                r"
            SELECT id, sender_qq, content, image_urls, likes, views,
                   is_deleted, is_reconstructed, timestamp, time_text
            FROM moments
            WHERE user_qq = ?1
            ORDER BY id ASC
            LIMIT ?2 OFFSET ?3
            ",
            )
            .map_err(AppError::database)?;

        let rows = stmt
            .query_map(
                params![user_id, sql_limit(limit), sql_offset(offset)],
                |row| Ok((row.get::<_, i64>(0)?, row_to_post(row)?)),
            )
            .map_err(AppError::database)?;

        let mut posts = Vec::new();
        for row in rows {
            let (id, raw) = row.map_err(AppError::database)?;
            let mut post = raw.into_post(id)?;
            post.comments = self.fetch_comments(id)?;
            posts.push(post);
        }

        tracing::debug!(user = user_id, count = posts.len(), "Fetched timeline posts");

        Ok(posts)
    }
}

impl GuestbookSource for ArchiveDb {
    fn fetch_guestbook_messages(
        &self,
        user_id: &str,
        limit: Option<usize>,
        offset: usize,
    ) -> Result<Vec<GuestbookMessage>> {
        let mut stmt = self
            .conn
            .prepare(
                r"
            SELECT sender_qq, content, timestamp, time_text
            FROM board_messages
            WHERE user_qq = ?1
            ORDER BY id ASC
            LIMIT ?2 OFFSET ?3
            ",
            )
            .map_err(AppError::database)?;

        let rows = stmt
            .query_map(
                params![user_id, sql_limit(limit), sql_offset(offset)],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, Option<String>>(2)?,
                        row.get::<_, Option<String>>(3)?,
                    ))
                },
            )
            .map_err(AppError::database)?;

        let mut messages = Vec::new();
        for row in rows {
            let (sender, content, timestamp, time_text) = row.map_err(AppError::database)?;
            messages.push(GuestbookMessage {
                sender,
                content,
                timestamp: parse_timestamp("board_messages.timestamp", timestamp)?,
                time_text: time_text.unwrap_or_default(),
            });
        }

        tracing::debug!(user = user_id, count = messages.len(), "Fetched guestbook messages");

        Ok(messages)
    }
}

impl FriendSource for ArchiveDb {
    fn fetch_friends(&self, user_id: &str) -> Result<Vec<Friend>> {
        let mut stmt = self
            .conn
            .prepare(
                r"
            SELECT friend_qq, name, added_time
            FROM friends
            WHERE user_qq = ?1
            ORDER BY id ASC
            ",
            )
            .map_err(AppError::database)?;

        let rows = stmt
            .query_map([user_id], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, Option<String>>(2)?,
                ))
            })
            .map_err(AppError::database)?;

        let mut friends = Vec::new();
        for row in rows {
            let (friend_id, name, added_time) = row.map_err(AppError::database)?;
            friends.push(Friend {
                friend_id,
                name: name.unwrap_or_default(),
                added_time: parse_timestamp("friends.added_time", added_time)?,
            });
        }

        tracing::debug!(user = user_id, count = friends.len(), "Fetched friends");

        Ok(friends)
    }
}

/// Moment columns before the image list is decoded.
struct RawMoment {
    sender: String,
    content: String,
    image_urls: Option<String>,
    likes: i64,
    views: i64,
    is_deleted: bool,
    is_reconstructed: bool,
    timestamp: Option<String>,
    time_text: String,
}

impl RawMoment {
    fn into_post(self, id: i64) -> Result<TimelinePost> {
        let image_urls = match self.image_urls.as_deref().map(str::trim) {
            None | Some("") => Vec::new(),
            Some(json) => serde_json::from_str(json).map_err(|e| AppError::InvalidData {
                message: format!("moment {id} has malformed image_urls: {e}"),
            })?,
        };

        Ok(TimelinePost {
            sender: self.sender,
            content: self.content,
            image_urls,
            likes: counter(id, "likes", self.likes)?,
            views: counter(id, "views", self.views)?,
            is_deleted: self.is_deleted,
            is_reconstructed: self.is_reconstructed,
            timestamp: parse_timestamp("moments.timestamp", self.timestamp)?,
            time_text: self.time_text,
            comments: Vec::new(),
        })
    }
}

fn row_to_post(row: &Row) -> rusqlite::Result<RawMoment> {
    Ok(RawMoment {
        sender: row.get(1)?,
        content: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        image_urls: row.get(3)?,
        likes: row.get::<_, Option<i64>>(4)?.unwrap_or(0),
        views: row.get::<_, Option<i64>>(5)?.unwrap_or(0),
        is_deleted: row.get::<_, Option<i32>>(6)?.unwrap_or(0) != 0,
        is_reconstructed: row.get::<_, Option<i32>>(7)?.unwrap_or(0) != 0,
        timestamp: row.get(8)?,
        time_text: row.get::<_, Option<String>>(9)?.unwrap_or_default(),
    })
}

/// Parses an RFC 3339 column. NULL and blank values are absent.
fn parse_timestamp(column: &str, value: Option<String>) -> Result<Option<DateTime<Utc>>> {
    let Some(value) = value.filter(|v| !v.trim().is_empty()) else {
        return Ok(None);
    };
    DateTime::parse_from_rfc3339(value.trim())
        .map(|dt| Some(dt.with_timezone(&Utc)))
        .map_err(|e| AppError::InvalidData {
            message: format!("{column} has malformed timestamp {value:?}: {e}"),
        })
}

fn counter(id: i64, column: &str, value: i64) -> Result<u64> {
    u64::try_from(value).map_err(|_| AppError::InvalidData {
        message: format!("moment {id} has negative {column}: {value}"),
    })
}

fn sql_limit(limit: Option<usize>) -> i64 {
    limit.map_or(NO_LIMIT, |n| i64::try_from(n).unwrap_or(i64::MAX))
}

fn sql_offset(offset: usize) -> i64 {
    i64::try_from(offset).unwrap_or(i64::MAX)
}
