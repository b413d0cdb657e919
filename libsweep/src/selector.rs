//! Post selection: sort order, offset and limit

use std::io::Write;

use crate::error::{Result, SelectionError};
use crate::types::{PostRecord, SortOrder};

/// Upper bound on the number of posts processed in one run
pub const MAX_LIMIT: usize = 100;

/// Validated selection parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub order: SortOrder,
    pub offset: usize,
    pub limit: usize,
}

impl Selection {
    /// Create selection parameters, rejecting limits outside `1..=MAX_LIMIT`
    pub fn new(order: SortOrder, offset: usize, limit: usize) -> Result<Self> {
        if limit == 0 || limit > MAX_LIMIT {
            return Err(SelectionError::LimitOutOfRange {
                limit,
                max: MAX_LIMIT,
            }
            .into());
        }
        Ok(Self {
            order,
            offset,
            limit,
        })
    }
}

/// Sort posts in place
///
/// Both date orders are stable. Posts whose timestamp did not parse sort as
/// the earliest possible time: last for `Newest`, first for `Oldest`.
pub fn sort_posts(posts: &mut [PostRecord], order: SortOrder) {
    match order {
        SortOrder::Newest => posts.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortOrder::Oldest => posts.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortOrder::Original => {}
    }
}

/// Sort, then skip `offset` posts, then keep at most `limit`
///
/// # Errors
///
/// `SelectionError::OffsetOutOfRange` when `offset` is not below the number
/// of posts; nothing is selected in that case.
pub fn select(posts: Vec<PostRecord>, selection: &Selection) -> Result<Vec<PostRecord>> {
    select_with_progress(posts, selection, &mut std::io::sink())
}

/// [`select`], reporting each step to `out`
pub fn select_with_progress(
    mut posts: Vec<PostRecord>,
    selection: &Selection,
    out: &mut dyn Write,
) -> Result<Vec<PostRecord>> {
    sort_posts(&mut posts, selection.order);
    match selection.order {
        SortOrder::Newest => writeln!(out, "Sorted tweets by date (newest first)")?,
        SortOrder::Oldest => writeln!(out, "Sorted tweets by date (oldest first)")?,
        SortOrder::Original => writeln!(out, "Using original order from archive")?,
    }

    let total = posts.len();
    if selection.offset >= total {
        return Err(SelectionError::OffsetOutOfRange {
            offset: selection.offset,
            total,
        }
        .into());
    }

    if selection.offset > 0 {
        posts.drain(..selection.offset);
        writeln!(
            out,
            "Skipped {} tweets as specified by offset",
            selection.offset
        )?;
    }

    if posts.len() > selection.limit {
        posts.truncate(selection.limit);
        writeln!(out, "Limited to {} tweets as specified", selection.limit)?;
    }

    Ok(posts)
}
