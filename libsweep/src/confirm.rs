//! Interactive confirmation before anything is deleted

use std::io::{BufRead, Write};

use crate::error::Result;
use crate::types::PostRecord;

const DISPLAY_TIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S";
/// Shown for posts whose `created_at` could not be parsed
const UNKNOWN_TIME: &str = "0001/01/01 00:00:00";

const MAX_TEXT_CHARS: usize = 50;
const TRUNCATED_TEXT_CHARS: usize = 47;

/// Decision taken at the confirmation gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Cancelled,
    DryRun,
}

/// Shorten text to at most 50 characters, marking truncation with `...`
pub fn truncate_text(text: &str) -> String {
    if text.chars().count() > MAX_TEXT_CHARS {
        let head: String = text.chars().take(TRUNCATED_TEXT_CHARS).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

/// Format one selected post as a display line
pub fn format_post_line(index: usize, post: &PostRecord) -> String {
    let date = post
        .created_at
        .map(|dt| dt.format(DISPLAY_TIME_FORMAT).to_string())
        .unwrap_or_else(|| UNKNOWN_TIME.to_string());

    format!(
        "{}: [{}] {} (ID: {})",
        index + 1,
        date,
        truncate_text(&post.text),
        post.id
    )
}

/// Print the selection
pub fn render_selection(posts: &[PostRecord], out: &mut dyn Write) -> Result<()> {
    writeln!(out, "\nTweets from your archive:")?;
    writeln!(out, "=========================")?;
    for (index, post) in posts.iter().enumerate() {
        writeln!(out, "{}", format_post_line(index, post))?;
    }
    Ok(())
}

/// Render the selection and ask the user to confirm deletion
///
/// In dry-run mode the selection is rendered and `DryRun` is returned
/// without reading any input. Otherwise a single line is read; only `y`
/// (case-insensitive, surrounding whitespace ignored) confirms.
pub fn confirm(
    posts: &[PostRecord],
    dry_run: bool,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<Confirmation> {
    render_selection(posts, out)?;

    if dry_run {
        writeln!(out, "\nDry run mode - no tweets will be deleted")?;
        return Ok(Confirmation::DryRun);
    }

    write!(out, "\nDelete the above {} tweets? [y/N]: ", posts.len())?;
    out.flush()?;

    // Raw bytes: an answer that is not UTF-8 cancels instead of failing
    let mut response = Vec::new();
    input.read_until(b'\n', &mut response)?;

    if String::from_utf8_lossy(&response).trim().eq_ignore_ascii_case("y") {
        Ok(Confirmation::Confirmed)
    } else {
        writeln!(out, "Cancelled.")?;
        Ok(Confirmation::Cancelled)
    }
}
