//! Exact duplicate row detection.
//!
//! Two rows are duplicates when every column holds the same value, with a
//! missing cell equal only to another missing cell.

use crate::error::Result;
use polars::prelude::*;
use tracing::debug;

/// The table without repeated rows, first occurrences in their original order.
fn distinct_rows(df: &DataFrame) -> Result<DataFrame> {
    Ok(df.unique_stable(None, UniqueKeepStrategy::First, None)?)
}

/// Number of rows that repeat an earlier row.
pub(crate) fn count_duplicates(df: &DataFrame) -> Result<usize> {
    Ok(df.height() - distinct_rows(df)?.height())
}

/// Drop repeated rows, keeping the first occurrence and the original order.
///
/// Returns the number of rows removed.
pub(crate) fn remove_duplicates(df: &mut DataFrame) -> Result<usize> {
    let deduped = distinct_rows(df)?;
    let removed = df.height() - deduped.height();
    if removed == 0 {
        debug!("No duplicate rows found");
        return Ok(0);
    }

    *df = deduped;
    debug!("Removed {} duplicate rows", removed);
    Ok(removed)
}
