//! Read-only record sources queried by user identifier.
//!
//! Each source returns records in its own order; callers must not re-sort.

use super::error::Result;
use super::models::{Friend, GuestbookMessage, TimelinePost};

/// Timeline posts (moments) of a user.
pub trait TimelineSource {
    /// Fetch posts. `limit = None` means no upper bound.
    ///
    /// # Errors
    /// Returns error if the underlying store cannot be read.
    fn fetch_timeline_posts(
        &self,
        user_id: &str,
        limit: Option<usize>,
        offset: usize,
    ) -> Result<Vec<TimelinePost>>;
}

/// Guestbook (message board) entries left for a user.
pub trait GuestbookSource {
    /// Fetch messages. `limit = None` means no upper bound.
    ///
    /// # Errors
    /// Returns error if the underlying store cannot be read.
    fn fetch_guestbook_messages(
        &self,
        user_id: &str,
        limit: Option<usize>,
        offset: usize,
    ) -> Result<Vec<GuestbookMessage>>;
}

/// Friend list of a user.
pub trait FriendSource {
    /// # Errors
    /// Returns error if the underlying store cannot be read.
    fn fetch_friends(&self, user_id: &str) -> Result<Vec<Friend>>;
}
