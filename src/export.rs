//! CSV export of the filtered comment view.
//!
//! The output is UTF-8 prefixed with a byte-order-mark so spreadsheet tools
//! pick the right encoding, with a fixed Japanese header row. Fields follow
//! the usual CSV quoting rules: anything containing a comma, double quote,
//! or newline is wrapped in quotes with internal quotes doubled.

use std::path::Path;

use anyhow::{Context, Result};

use crate::filter::strip_html;
use crate::model::Comment;

pub const CSV_HEADER: &str = "投稿者名,コメント,いいね数,投稿日時";

const UTF8_BOM: &str = "\u{feff}";
const FILENAME_SUFFIX: &str = "_comments.csv";

fn escape_csv_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_owned()
    }
}

/// Renders the filtered comments as one CSV document: BOM, header, then one
/// row per comment in filtered order. Comment bodies are exported as plain
/// text with markup stripped.
pub fn comments_to_csv(comments: &[&Comment]) -> String {
    let mut rows = Vec::with_capacity(comments.len() + 1);
    rows.push(CSV_HEADER.to_owned());
    for comment in comments {
        rows.push(
            [
                escape_csv_field(&comment.author),
                escape_csv_field(&strip_html(&comment.text)),
                escape_csv_field(&comment.likes.to_string()),
                escape_csv_field(&comment.published_at),
            ]
            .join(","),
        );
    }
    format!("{UTF8_BOM}{}", rows.join("\n"))
}

/// True for characters kept verbatim in export filenames: ASCII
/// alphanumerics, underscore, hyphen, Hiragana/Katakana, and CJK Unified
/// ideographs. Everything else becomes an underscore.
fn is_filename_safe(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || c == '_'
        || c == '-'
        || ('\u{3040}'..='\u{30ff}').contains(&c)
        || ('\u{4e00}'..='\u{9faf}').contains(&c)
}

/// Derives the export filename from the video title.
pub fn export_filename(video_title: &str) -> String {
    let safe: String = video_title
        .chars()
        .map(|c| if is_filename_safe(c) { c } else { '_' })
        .collect();
    format!("{safe}{FILENAME_SUFFIX}")
}

/// Writes the CSV document to `path`.
pub fn write_csv(path: &Path, csv: &str) -> Result<()> {
    std::fs::write(path, csv).with_context(|| format!("writing CSV to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn comment(author: &str, text: &str, likes: u64) -> Comment {
        Comment {
            author: author.to_owned(),
            author_thumbnail: None,
            text: text.to_owned(),
            likes,
            published_at: "2024-01-01T00:00:00Z".to_owned(),
        }
    }

    #[test]
    fn escapes_commas_quotes_and_newlines() {
        assert_eq!(escape_csv_field("plain"), "plain");
        assert_eq!(escape_csv_field("a,b"), "\"a,b\"");
        assert_eq!(escape_csv_field("a\nb"), "\"a\nb\"");
        // The documented compatibility case: a,"b" renders as "a,""b""".
        assert_eq!(escape_csv_field("a,\"b\""), "\"a,\"\"b\"\"\"");
    }

    #[test]
    fn csv_starts_with_bom_and_header() {
        let c = comment("A", "hi", 5);
        let csv = comments_to_csv(&[&c]);
        assert!(csv.starts_with('\u{feff}'));
        let mut lines = csv.trim_start_matches('\u{feff}').lines();
        assert_eq!(lines.next(), Some(CSV_HEADER));
        assert_eq!(lines.next(), Some("A,hi,5,2024-01-01T00:00:00Z"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn csv_rows_follow_filtered_order_and_strip_markup() {
        let first = comment("A", "first <b>bold</b>", 1);
        let second = comment("B", "second", 2);
        let csv = comments_to_csv(&[&first, &second]);
        let body: Vec<&str> = csv.trim_start_matches('\u{feff}').lines().skip(1).collect();
        assert_eq!(body[0], "A,first bold,1,2024-01-01T00:00:00Z");
        assert_eq!(body[1], "B,second,2,2024-01-01T00:00:00Z");
    }

    #[test]
    fn empty_view_yields_header_only() {
        let csv = comments_to_csv(&[]);
        assert_eq!(csv, format!("\u{feff}{CSV_HEADER}"));
    }

    #[test]
    fn filename_keeps_ascii_and_japanese() {
        assert_eq!(
            export_filename("My Video 2024"),
            "My_Video_2024_comments.csv"
        );
        assert_eq!(export_filename("動画タイトル"), "動画タイトル_comments.csv");
    }

    #[test]
    fn filename_replaces_everything_else() {
        assert_eq!(export_filename("a/b:c*d"), "a_b_c_d_comments.csv");
        assert_eq!(export_filename("emoji🎥title"), "emoji_title_comments.csv");
    }

    #[test]
    fn write_csv_creates_the_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let c = comment("A", "hi", 0);
        write_csv(&path, &comments_to_csv(&[&c])).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with('\u{feff}'));
        assert!(written.contains("A,hi,0"));
    }
}
