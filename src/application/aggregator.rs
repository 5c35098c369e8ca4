//! Export aggregation.
//!
//! Pulls every record of a user from the three sources and assembles
//! them into one `ExportDocument`.

use chrono::{DateTime, Utc};

use crate::domain::{
    AppError, ExportDocument, FriendSource, GuestbookSource, Result, SourceErrorPolicy,
    TimelineSource,
};

/// Assembles export documents from the record sources.
pub struct ExportAggregator<'a> {
    timeline: &'a dyn TimelineSource,
    guestbook: &'a dyn GuestbookSource,
    friends: &'a dyn FriendSource,
    policy: SourceErrorPolicy,
}

impl<'a> ExportAggregator<'a> {
    #[must_use]
    pub fn new(
        timeline: &'a dyn TimelineSource,
        guestbook: &'a dyn GuestbookSource,
        friends: &'a dyn FriendSource,
        policy: SourceErrorPolicy,
    ) -> Self {
        Self {
            timeline,
            guestbook,
            friends,
            policy,
        }
    }

    /// Assemble the document for `user_id`, stamped with the current time.
    ///
    /// # Errors
    /// With `SourceErrorPolicy::Abort`, returns the first source failure.
    pub fn assemble(&self, user_id: &str) -> Result<ExportDocument> {
        self.assemble_at(user_id, Utc::now())
    }

    /// Assemble the document for `user_id` with an explicit generation time.
    ///
    /// # Errors
    /// With `SourceErrorPolicy::Abort`, returns the first source failure.
    pub fn assemble_at(
        &self,
        user_id: &str,
        generated_at: DateTime<Utc>,
    ) -> Result<ExportDocument> {
        let moments = self.collect(
            "timeline posts",
            user_id,
            self.timeline.fetch_timeline_posts(user_id, None, 0),
        )?;
        let board_messages = self.collect(
            "guestbook messages",
            user_id,
            self.guestbook.fetch_guestbook_messages(user_id, None, 0),
        )?;
        let friends = self.collect("friends", user_id, self.friends.fetch_friends(user_id))?;

        tracing::info!(
            user = user_id,
            moments = moments.len(),
            board_messages = board_messages.len(),
            friends = friends.len(),
            "Assembled export document"
        );

        Ok(ExportDocument::new(
            user_id,
            generated_at,
            moments,
            board_messages,
            friends,
        ))
    }

    /// Apply the failure policy to one source result.
    fn collect<T>(
        &self,
        source_name: &'static str,
        user_id: &str,
        fetched: Result<Vec<T>>,
    ) -> Result<Vec<T>> {
        match fetched {
            Ok(records) => {
                tracing::debug!(source = source_name, count = records.len(), "Fetched records");
                Ok(records)
            }
            Err(e) => match self.policy {
                SourceErrorPolicy::Abort => Err(AppError::source_fetch(source_name, user_id, e)),
                SourceErrorPolicy::Skip => {
                    tracing::warn!(
                        source = source_name,
                        user = user_id,
                        error = %e,
                        "Source failed, exporting it as empty"
                    );
                    Ok(Vec::new())
                }
            },
        }
    }
}
