//! Output formats for export documents.
//!
//! Supports JSON and HTML; Excel is recognised but not implemented.

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Table};
use serde::Serialize;

use crate::domain::{
    AppError, ExportDocument, ExportSummary, Friend, GuestbookMessage, Result, TimelinePost,
};

use super::html_report::HtmlRenderer;

/// Export format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    /// Indented JSON dump of the three record lists.
    #[default]
    Json,
    /// Standalone HTML report.
    Html,
    /// Spreadsheet (not implemented).
    Excel,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "html" | "htm" => Ok(Self::Html),
            "excel" | "xlsx" => Ok(Self::Excel),
            _ => Err(format!("Unknown format: {s}. Use: json, html, excel")),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => write!(f, "JSON"),
            Self::Html => write!(f, "HTML"),
            Self::Excel => write!(f, "Excel"),
        }
    }
}

impl ExportFormat {
    /// File extension of the artifact.
    ///
    /// Excel's extension names the format only; the sink never writes one.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Html => "html",
            Self::Excel => "xlsx",
        }
    }

    /// Render a document in this format.
    ///
    /// # Errors
    /// Returns the format's encoding error, or `NotImplemented` for Excel.
    pub fn render(self, doc: &ExportDocument, html: &HtmlRenderer) -> Result<Vec<u8>> {
        match self {
            Self::Json => render_json(doc),
            Self::Html => html.render(doc),
            Self::Excel => render_excel(doc),
        }
    }
}

/// JSON view of a document: the record lists only.
#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct JsonExport<'a> {
    moments: &'a [TimelinePost],
    board_messages: &'a [GuestbookMessage],
    friends: &'a [Friend],
}

/// Encodes the record lists as 2-space indented JSON.
///
/// # Errors
/// Returns `AppError::Serialization` if encoding fails.
pub fn render_json(doc: &ExportDocument) -> Result<Vec<u8>> {
    let view = JsonExport {
        moments: doc.moments(),
        board_messages: doc.board_messages(),
        friends: doc.friends(),
    };

    serde_json::to_vec_pretty(&view).map_err(|e| AppError::serialization("export document", e))
}

/// Spreadsheet export.
///
/// # Errors
/// Always returns `AppError::NotImplemented`.
pub fn render_excel(_doc: &ExportDocument) -> Result<Vec<u8>> {
    Err(AppError::NotImplemented {
        feature: "Excel export",
    })
}

/// Formats the record counts of a document as a table.
pub fn format_summary(user_id: &str, summary: &ExportSummary) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Section", "Records"]);

    table.add_row(vec!["Timeline posts".to_string(), summary.moments.to_string()]);
    table.add_row(vec!["Comments".to_string(), summary.comments.to_string()]);
    table.add_row(vec![
        "Guestbook messages".to_string(),
        summary.board_messages.to_string(),
    ]);
    table.add_row(vec!["Friends".to_string(), summary.friends.to_string()]);

    format!("{} {}\n{table}", "📊 Archive of".bold(), user_id.cyan())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use crate::domain::Comment;

    fn sample_doc() -> ExportDocument {
        let ts = Utc.with_ymd_and_hms(2012, 5, 1, 4, 30, 0).unwrap();
        let moments = vec![TimelinePost {
            sender: "10001".into(),
            content: "<b>bold</b> & \"quoted\"".into(),
            image_urls: vec!["https://a/1.jpg".into(), "https://a/2.jpg".into()],
            likes: 3,
            views: 10,
            is_deleted: false,
            is_reconstructed: true,
            timestamp: Some(ts),
            time_text: String::new(),
            comments: vec![Comment {
                user: "20002".into(),
                content: "reply".into(),
                timestamp: None,
                time_text: "昨天".into(),
            }],
        }];
        let board = vec![GuestbookMessage {
            sender: "30003".into(),
            content: "hello".into(),
            timestamp: Some(ts),
            time_text: "2012-05-01".into(),
        }];
        let friends = vec![Friend {
            friend_id: "40004".into(),
            name: "Bob".into(),
            added_time: None,
        }];
        ExportDocument::new("10001", ts, moments, board, friends)
    }

    #[derive(serde::Deserialize)]
    #[serde(rename_all = "PascalCase")]
    struct ParsedExport {
        moments: Vec<TimelinePost>,
        board_messages: Vec<GuestbookMessage>,
        friends: Vec<Friend>,
    }

    #[test]
    fn test_json_round_trip() {
        let doc = sample_doc();
        let bytes = render_json(&doc).unwrap();
        let parsed: ParsedExport = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(parsed.moments, doc.moments());
        assert_eq!(parsed.board_messages, doc.board_messages());
        assert_eq!(parsed.friends, doc.friends());
    }

    #[test]
    fn test_json_layout() {
        let bytes = render_json(&sample_doc()).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.starts_with("{\n  \"Moments\": ["));
        let moments = text.find("\"Moments\"").unwrap();
        let board = text.find("\"BoardMessages\"").unwrap();
        let friends = text.find("\"Friends\"").unwrap();
        assert!(moments < board && board < friends);

        // subject and generation time are not part of the dump
        assert!(!text.contains("GeneratedAt"));
        assert!(!text.contains("UserId"));

        let sender = text.find("\"Sender\"").unwrap();
        let likes = text.find("\"Likes\"").unwrap();
        let comments = text.find("\"Comments\"").unwrap();
        assert!(sender < likes && likes < comments);
        assert!(text.contains("\"AddedTime\": null"));
    }

    #[test]
    fn test_json_is_stable_when_reencoded() {
        let bytes = render_json(&sample_doc()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let again = serde_json::to_vec_pretty(&value).unwrap();
        assert_eq!(again, bytes);
    }

    #[test]
    fn test_json_keeps_markup_literal() {
        let bytes = render_json(&sample_doc()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            value["Moments"][0]["Content"],
            "<b>bold</b> & \"quoted\""
        );

        let text = String::from_utf8(bytes).unwrap();
        assert!(!text.contains("&lt;"));
        assert!(!text.contains("&amp;"));
    }

    #[test]
    fn test_empty_document_json() {
        let doc = ExportDocument::new("1", Utc::now(), Vec::new(), Vec::new(), Vec::new());
        let text = String::from_utf8(render_json(&doc).unwrap()).unwrap();
        assert_eq!(
            text,
            "{\n  \"Moments\": [],\n  \"BoardMessages\": [],\n  \"Friends\": []\n}"
        );
    }

    #[test]
    fn test_excel_not_implemented() {
        let err = ExportFormat::Excel
            .render(&sample_doc(), &HtmlRenderer::default())
            .unwrap_err();
        assert!(matches!(err, AppError::NotImplemented { .. }));
    }

    #[test]
    fn test_export_format_from_str() {
        assert_eq!("json".parse::<ExportFormat>(), Ok(ExportFormat::Json));
        assert_eq!("HTML".parse::<ExportFormat>(), Ok(ExportFormat::Html));
        assert_eq!("excel".parse::<ExportFormat>(), Ok(ExportFormat::Excel));
        assert!("csv".parse::<ExportFormat>().is_err());
        assert_eq!(ExportFormat::Html.extension(), "html");
    }

    #[test]
    fn test_format_summary() {
        let out = format_summary("10001", &sample_doc().summary());
        assert!(out.contains("Timeline posts"));
        assert!(out.contains("Guestbook messages"));
        assert!(out.contains("10001"));
    }
}
