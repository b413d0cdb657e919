//! Archive reading
//!
//! Locates the tweet data files inside an extracted Twitter/X archive and
//! turns them into [`PostRecord`]s. Archive data files are JavaScript
//! assignments (`window.YTD.tweets.part0 = [...]`); the assignment header is
//! stripped and the remainder is decoded as a JSON array of wrapper objects.
//!
//! Three layouts are recognized, in priority order (first match wins):
//!
//! 1. `data/tweets.js`: a single aggregate file
//! 2. `data/tweets/*.js`: a directory of shard files, ordered by name
//! 3. `data/tweet.js`: the legacy single file

use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{ArchiveError, Result};
use crate::types::PostRecord;

const AGGREGATE_FILE: &str = "data/tweets.js";
const SHARD_DIR: &str = "data/tweets";
const LEGACY_FILE: &str = "data/tweet.js";

const ASSIGNMENT_MARKER: &[u8] = b"window.";
const ASSIGNMENT_SEPARATOR: &[u8] = b"= ";

/// Wrapper object around each post in an archive data file
#[derive(Debug, Deserialize)]
struct ArchiveEntry {
    #[serde(alias = "post")]
    tweet: ArchivePost,
}

#[derive(Debug, Deserialize)]
struct ArchivePost {
    #[serde(rename = "id_str", default)]
    id: String,
    #[serde(default)]
    created_at: String,
    #[serde(rename = "full_text", default)]
    text: String,
    #[serde(default)]
    retweeted: bool,
}

impl From<ArchivePost> for PostRecord {
    fn from(post: ArchivePost) -> Self {
        PostRecord::new(post.id, post.created_at, post.text, post.retweeted)
    }
}

/// Posts extracted from an archive, plus the files that were skipped
#[derive(Debug, Default)]
pub struct Archive {
    /// Data files in discovery order
    pub files: Vec<PathBuf>,
    /// All posts, in file order then in-file order
    pub posts: Vec<PostRecord>,
    /// Per-file failures that were reported and skipped
    pub skipped: Vec<ArchiveError>,
}

/// Locate tweet data files under an archive root
///
/// # Errors
///
/// - `ArchiveError::PathNotFound` / `ArchiveError::NotADirectory` when the
///   root is unusable
/// - `ArchiveError::NoDataFiles` when none of the recognized layouts exist
pub fn discover_data_files(root: &Path) -> Result<Vec<PathBuf>> {
    let metadata = match fs::metadata(root) {
        Ok(metadata) => metadata,
        Err(_) => return Err(ArchiveError::PathNotFound(root.to_path_buf()).into()),
    };
    if !metadata.is_dir() {
        return Err(ArchiveError::NotADirectory(root.to_path_buf()).into());
    }

    let aggregate = root.join(AGGREGATE_FILE);
    if aggregate.is_file() {
        debug!("Using aggregate data file {}", aggregate.display());
        return Ok(vec![aggregate]);
    }

    let shard_dir = root.join(SHARD_DIR);
    if shard_dir.is_dir() {
        let shards = list_shard_files(&shard_dir)?;
        if !shards.is_empty() {
            debug!(
                "Using {} shard file(s) from {}",
                shards.len(),
                shard_dir.display()
            );
            return Ok(shards);
        }
    }

    let legacy = root.join(LEGACY_FILE);
    if legacy.is_file() {
        debug!("Using legacy data file {}", legacy.display());
        return Ok(vec![legacy]);
    }

    Err(ArchiveError::NoDataFiles.into())
}

fn list_shard_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|source| ArchiveError::Read {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut shards: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| path.extension().is_some_and(|ext| ext == "js"))
        .collect();
    shards.sort();
    Ok(shards)
}

/// Strip the `window.… = ` assignment header from archive file content
///
/// Content that does not start with `window.` is returned unchanged.
pub fn strip_assignment_prefix(content: &[u8]) -> std::result::Result<&[u8], String> {
    if !content.starts_with(ASSIGNMENT_MARKER) {
        return Ok(content);
    }

    content
        .windows(ASSIGNMENT_SEPARATOR.len())
        .position(|window| window == ASSIGNMENT_SEPARATOR)
        .map(|idx| &content[idx + ASSIGNMENT_SEPARATOR.len()..])
        .ok_or_else(|| "unexpected format".to_string())
}

/// Decode the posts of a single archive data file
pub fn parse_data_file(path: &Path) -> std::result::Result<Vec<PostRecord>, ArchiveError> {
    let content = fs::read(path).map_err(|source| ArchiveError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let json = strip_assignment_prefix(&content).map_err(|reason| ArchiveError::Parse {
        path: path.to_path_buf(),
        reason,
    })?;

    let entries: Vec<ArchiveEntry> =
        serde_json::from_slice(json).map_err(|e| ArchiveError::Parse {
            path: path.to_path_buf(),
            reason: format!("invalid JSON: {}", e),
        })?;

    Ok(entries.into_iter().map(|entry| entry.tweet.into()).collect())
}

/// Read every recognized data file under `root`
///
/// Progress lines are written to `out`. Files that fail to read or parse are
/// reported, recorded in [`Archive::skipped`] and skipped.
///
/// # Errors
///
/// Fatal discovery errors from [`discover_data_files`], and
/// `ArchiveError::Empty` when no post could be extracted at all.
pub fn read_archive(root: &Path, out: &mut dyn Write) -> Result<Archive> {
    let files = discover_data_files(root)?;
    writeln!(out, "Found {} tweet data files in the archive", files.len())?;

    let mut archive = Archive {
        files,
        ..Default::default()
    };

    for file in &archive.files {
        writeln!(out, "Reading {}...", file.display())?;

        match parse_data_file(file) {
            Ok(posts) => {
                debug!("Parsed {} post(s) from {}", posts.len(), file.display());
                archive.posts.extend(posts);
            }
            Err(e) => {
                warn!("Skipping {}: {}", file.display(), e);
                writeln!(out, "{}", e)?;
                archive.skipped.push(e);
            }
        }
    }

    if archive.posts.is_empty() {
        return Err(ArchiveError::Empty.into());
    }

    info!(
        "Extracted {} post(s) from {} file(s)",
        archive.posts.len(),
        archive.files.len()
    );
    writeln!(out, "Extracted {} tweets from the archive", archive.posts.len())?;

    Ok(archive)
}
