//! Joins newly computed attributes back onto the location collection.
//!
//! The merge is a schema-aware left outer join with a declared
//! replace-if-present column set: stale columns from a previous run
//! are dropped from the base before the join, so output never carries
//! ambiguous duplicate columns.

use crate::merge::error::MergeError;
use log::warn;
use polars::prelude::*;

fn column_names(frame: &DataFrame) -> Vec<String> {
    frame
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect()
}

/// Left-joins `new` onto `base` by `key`, replacing any column of
/// `base` that `new` also carries.
///
/// `replace` declares the columns expected to be replaced; an overlap
/// outside that set is surfaced as a warning (the merge still proceeds
/// last-write-wins). Rows of `base` with no counterpart in `new` keep
/// explicit nulls for the new columns — no location is silently
/// dropped. The inputs are not mutated, and merging the same `new`
/// frame twice yields the same result as merging it once.
pub fn merge(
    base: &DataFrame,
    new: &DataFrame,
    key: &str,
    replace: &[&str],
) -> Result<DataFrame, MergeError> {
    let base_columns = column_names(base);
    let new_columns = column_names(new);
    if !base_columns.iter().any(|c| c == key) {
        return Err(MergeError::MissingKeyColumn {
            key: key.to_string(),
            side: "base",
        });
    }
    if !new_columns.iter().any(|c| c == key) {
        return Err(MergeError::MissingKeyColumn {
            key: key.to_string(),
            side: "new",
        });
    }

    let mut trimmed = base.clone();
    for column in &base_columns {
        if column == key || !new_columns.iter().any(|c| c == column) {
            continue;
        }
        if !replace.iter().any(|r| r == column) {
            warn!(
                "Column '{column}' collides with an existing column not slated for replacement; \
                 keeping the newly computed values"
            );
        }
        trimmed = trimmed.drop(column)?;
    }

    // Output row order must follow the base frame (and the new frame's
    // order within one key); downstream consumers rely on stable row
    // order for diffing.
    let mut args = JoinArgs::new(JoinType::Left);
    args.maintain_order = MaintainOrderJoin::LeftRight;

    let joined = trimmed
        .lazy()
        .join(new.clone().lazy(), [col(key)], [col(key)], args)
        .collect()?;
    Ok(joined)
}
