//! HTML report rendering.
//!
//! The page layout lives in `templates/export.html` and is compiled into the
//! binary by askama, which escapes every interpolated value.

use askama::Template;
use chrono::FixedOffset;

use crate::domain::{
    format_time, resolve_display_time, AppConfig, AppError, Comment, ExportDocument, Friend,
    GuestbookMessage, Locale, Result, TimelinePost,
};

/// Rendering options for the HTML report.
#[derive(Debug, Clone, Copy)]
pub struct HtmlOptions {
    pub locale: Locale,
    /// Offset applied to every displayed timestamp.
    pub utc_offset: FixedOffset,
}

impl HtmlOptions {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            locale: config.export.locale,
            utc_offset: config.utc_offset(),
        }
    }
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

/// Localized text of the report.
#[derive(Debug)]
struct Labels {
    title: &'static str,
    generated_at: &'static str,
    moments: &'static str,
    no_moments: &'static str,
    from: &'static str,
    image_alt: &'static str,
    likes: &'static str,
    views: &'static str,
    deleted: &'static str,
    reconstructed: &'static str,
    comments: &'static str,
    board_messages: &'static str,
    no_board_messages: &'static str,
    friends: &'static str,
    no_friends: &'static str,
    friend_id: &'static str,
    friend_name: &'static str,
    added_time: &'static str,
}

const ZH_CN: Labels = Labels {
    title: "QQ空间数据导出",
    generated_at: "生成时间：",
    moments: "说说",
    no_moments: "暂无说说数据。",
    from: "来自",
    image_alt: "说说图片",
    likes: "点赞",
    views: "浏览",
    deleted: "已删除",
    reconstructed: "已重建",
    comments: "评论",
    board_messages: "留言板",
    no_board_messages: "暂无留言板数据。",
    friends: "好友",
    no_friends: "暂无好友数据。",
    friend_id: "好友QQ",
    friend_name: "昵称",
    added_time: "添加时间",
};

const EN: Labels = Labels {
    title: "QZone Data Export",
    generated_at: "Generated at: ",
    moments: "Timeline Posts",
    no_moments: "No timeline posts.",
    from: "From",
    image_alt: "post image",
    likes: "Likes",
    views: "Views",
    deleted: "Deleted",
    reconstructed: "Reconstructed",
    comments: "Comments",
    board_messages: "Guestbook",
    no_board_messages: "No guestbook messages.",
    friends: "Friends",
    no_friends: "No friends.",
    friend_id: "Friend QQ",
    friend_name: "Name",
    added_time: "Added",
};

impl Locale {
    const fn labels(self) -> &'static Labels {
        match self {
            Self::ZhCn => &ZH_CN,
            Self::En => &EN,
        }
    }
}

struct CommentView<'a> {
    user: &'a str,
    time: String,
    content: &'a str,
}

struct MomentView<'a> {
    sender: &'a str,
    time: String,
    content: &'a str,
    image_urls: Vec<&'a str>,
    likes: u64,
    views: u64,
    is_deleted: bool,
    is_reconstructed: bool,
    comments: Vec<CommentView<'a>>,
}

struct MessageView<'a> {
    sender: &'a str,
    time: String,
    content: &'a str,
}

struct FriendView<'a> {
    friend_id: &'a str,
    name: &'a str,
    added_time: String,
}

#[derive(Template)]
#[template(path = "export.html")]
struct ExportPage<'a> {
    lang: &'static str,
    labels: &'static Labels,
    user_id: &'a str,
    generated_at: String,
    moments: Vec<MomentView<'a>>,
    board_messages: Vec<MessageView<'a>>,
    friends: Vec<FriendView<'a>>,
}

/// Renders export documents as standalone HTML pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer {
    options: HtmlOptions,
}

impl HtmlRenderer {
    #[must_use]
    pub const fn new(options: HtmlOptions) -> Self {
        Self { options }
    }

    /// Render the document as a UTF-8 HTML page.
    ///
    /// # Errors
    /// Returns `AppError::Render` if template substitution fails.
    pub fn render(&self, doc: &ExportDocument) -> Result<Vec<u8>> {
        let offset = self.options.utc_offset;
        let page = ExportPage {
            lang: self.options.locale.html_lang(),
            labels: self.options.locale.labels(),
            user_id: doc.user_id(),
            generated_at: format_time(Some(doc.generated_at()), offset),
            moments: doc.moments().iter().map(|m| moment_view(m, offset)).collect(),
            board_messages: doc
                .board_messages()
                .iter()
                .map(|m| message_view(m, offset))
                .collect(),
            friends: doc.friends().iter().map(|f| friend_view(f, offset)).collect(),
        };

        let html = page.render().map_err(AppError::render)?;
        Ok(html.into_bytes())
    }
}

fn moment_view(moment: &TimelinePost, offset: FixedOffset) -> MomentView<'_> {
    MomentView {
        sender: &moment.sender,
        time: resolve_display_time(&moment.time_text, moment.timestamp, offset),
        content: &moment.content,
        image_urls: moment.image_urls.iter().map(|u| safe_url(u)).collect(),
        likes: moment.likes,
        views: moment.views,
        is_deleted: moment.is_deleted,
        is_reconstructed: moment.is_reconstructed,
        comments: moment
            .comments
            .iter()
            .map(|c| comment_view(c, offset))
            .collect(),
    }
}

fn comment_view(comment: &Comment, offset: FixedOffset) -> CommentView<'_> {
    CommentView {
        user: &comment.user,
        time: resolve_display_time(&comment.time_text, comment.timestamp, offset),
        content: &comment.content,
    }
}

fn message_view(message: &GuestbookMessage, offset: FixedOffset) -> MessageView<'_> {
    MessageView {
        sender: &message.sender,
        time: resolve_display_time(&message.time_text, message.timestamp, offset),
        content: &message.content,
    }
}

fn friend_view(friend: &Friend, offset: FixedOffset) -> FriendView<'_> {
    FriendView {
        friend_id: &friend.friend_id,
        name: &friend.name,
        added_time: format_time(friend.added_time, offset),
    }
}

/// Keeps web and relative URLs; anything with another scheme becomes `#`.
fn safe_url(url: &str) -> &str {
    let trimmed = url.trim();
    let scheme_end = trimmed.find(':');
    let path_start = trimmed.find(['/', '?', '#']);

    let has_scheme = match (scheme_end, path_start) {
        (Some(colon), Some(path)) => colon < path,
        (Some(_), None) => true,
        (None, _) => false,
    };

    if !has_scheme {
        return trimmed;
    }

    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed
    } else {
        "#"
    }
}
