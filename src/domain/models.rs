//! Domain models for archived QZone history.
//!
//! Field declaration order is also the JSON field order of the export.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// Display format used for every rendered timestamp.
pub const DISPLAY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Rendered in place of a missing time.
pub const MISSING_TIME: &str = "-";

/// A comment attached to a timeline post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct Comment {
    /// Commenter identifier.
    pub user: String,
    pub content: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    /// Free-form time as scraped, used when no precise timestamp is known.
    #[serde(default)]
    pub time_text: String,
}

/// An archived status update ("moment").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct TimelinePost {
    /// Sender identifier.
    pub sender: String,
    pub content: String,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub is_deleted: bool,
    /// Rebuilt from secondary data rather than captured directly.
    #[serde(default)]
    pub is_reconstructed: bool,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub time_text: String,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

/// A message left on the subject's guestbook (message board).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct GuestbookMessage {
    pub sender: String,
    pub content: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub time_text: String,
}

/// A friend of the subject user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct Friend {
    pub friend_id: String,
    pub name: String,
    /// When the friendship was established, if known.
    #[serde(default)]
    pub added_time: Option<DateTime<Utc>>,
}

/// Formats a timestamp for display, or the placeholder when absent.
#[must_use]
pub fn format_time(timestamp: Option<DateTime<Utc>>, offset: FixedOffset) -> String {
    timestamp.map_or_else(
        || MISSING_TIME.to_string(),
        |ts| ts.with_timezone(&offset).format(DISPLAY_TIME_FORMAT).to_string(),
    )
}

/// Resolves the time to show for a record.
///
/// A non-empty display string always wins over the precise timestamp.
#[must_use]
pub fn resolve_display_time(
    time_text: &str,
    timestamp: Option<DateTime<Utc>>,
    offset: FixedOffset,
) -> String {
    if time_text.trim().is_empty() {
        format_time(timestamp, offset)
    } else {
        time_text.to_string()
    }
}

/// Everything exported for one user.
///
/// Built once per export call and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDocument {
    user_id: String,
    generated_at: DateTime<Utc>,
    moments: Vec<TimelinePost>,
    board_messages: Vec<GuestbookMessage>,
    friends: Vec<Friend>,
}

impl ExportDocument {
    /// Create a new document; sequences keep the order given.
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        generated_at: DateTime<Utc>,
        moments: Vec<TimelinePost>,
        board_messages: Vec<GuestbookMessage>,
        friends: Vec<Friend>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            generated_at,
            moments,
            board_messages,
            friends,
        }
    }

    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    #[must_use]
    pub const fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    #[must_use]
    pub fn moments(&self) -> &[TimelinePost] {
        &self.moments
    }

    #[must_use]
    pub fn board_messages(&self) -> &[GuestbookMessage] {
        &self.board_messages
    }

    #[must_use]
    pub fn friends(&self) -> &[Friend] {
        &self.friends
    }

    /// Record counts per section.
    #[must_use]
    pub fn summary(&self) -> ExportSummary {
        ExportSummary {
            moments: self.moments.len(),
            comments: self.moments.iter().map(|m| m.comments.len()).sum(),
            board_messages: self.board_messages.len(),
            friends: self.friends.len(),
        }
    }
}

/// Record counts for an export document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExportSummary {
    pub moments: usize,
    pub comments: usize,
    pub board_messages: usize,
    pub friends: usize,
}
