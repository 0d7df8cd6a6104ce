//! Entity query engine: filter, sort, and count a record snapshot (PRD-06).
//!
//! Runs synchronously on every keystroke / filter change against an
//! already-materialized snapshot (tens to low hundreds of records), so it
//! must stay allocation-light and single-pass where it can. No input is
//! mutated; every call returns fresh derived structures.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::query::{QueryState, SortKey};
use crate::record::Record;
use crate::status::STATUS_ALL;

/// Result of one engine pass: the ordered visible subset and the per-status
/// badge counts.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOutput {
    /// Filtered subset of the input, ordered by the active sort key.
    pub visible: Vec<Record>,
    /// `status -> count` over the **unfiltered** collection, plus the
    /// `"all"` sentinel holding the full collection size. Badge counts stay
    /// stable while the user types a search. Statuses with no records in
    /// the snapshot are absent from the map (read missing keys as 0).
    pub counts: BTreeMap<String, usize>,
}

/// Filter and sort `records` per `state`, and count statuses.
///
/// Filtering is conjunctive across all active predicates; sorting is a
/// stable reorder of the filtered subset; counts ignore every filter except
/// the status dimension (they are computed over the full snapshot).
///
/// `state` must have been validated against the record schema via
/// [`crate::query::validate_state`]; unknown fields referenced by an
/// unvalidated state simply never match (categorical/list) or are treated
/// as unset (numeric/timestamp).
pub fn apply(records: &[Record], state: &QueryState) -> QueryOutput {
    let counts = status_counts(records);

    let needle = state.search_text.to_lowercase();
    let mut visible: Vec<Record> = records
        .iter()
        .filter(|record| matches(record, state, &needle))
        .cloned()
        .collect();
    sort_records(&mut visible, &state.sort_key);

    tracing::debug!(
        total = records.len(),
        visible = visible.len(),
        "applied query state"
    );

    QueryOutput { visible, counts }
}

/// Single-pass status histogram over the full snapshot, with the `"all"`
/// sentinel holding the collection size.
pub fn status_counts(records: &[Record]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(record.status.clone()).or_insert(0) += 1;
    }
    counts.insert(STATUS_ALL.to_string(), records.len());
    counts
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

/// Conjunction of all active predicates. `needle` is the pre-lowercased
/// search text (lowercased once per pass, not per record).
fn matches(record: &Record, state: &QueryState, needle: &str) -> bool {
    state.status_filter.matches(&record.status)
        && matches_search(record, needle)
        && matches_categorical(record, state)
        && matches_lists(record, state)
        && matches_numeric(record, state)
}

/// Case-insensitive substring match against any searchable field. An empty
/// needle matches everything.
fn matches_search(record: &Record, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    record
        .search_fields
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

/// Every constrained categorical field must hold a selected value. A record
/// missing a constrained field does not match.
fn matches_categorical(record: &Record, state: &QueryState) -> bool {
    state
        .categorical_selections
        .iter()
        .filter(|(_, selected)| !selected.is_empty())
        .all(|(field, selected)| {
            record
                .categorical
                .get(field)
                .is_some_and(|value| selected.contains(value))
        })
}

/// For list-valued fields, at least one selected value must appear in the
/// record's list.
fn matches_lists(record: &Record, state: &QueryState) -> bool {
    state
        .list_selections
        .iter()
        .filter(|(_, selected)| !selected.is_empty())
        .all(|(field, selected)| {
            record
                .lists
                .get(field)
                .is_some_and(|values| values.iter().any(|v| selected.contains(v)))
        })
}

/// Configured ranges are inclusive. Unset values (and fields absent from
/// the record) are exempt from the check: "not yet rated" is not the same
/// as "rated 0".
fn matches_numeric(record: &Record, state: &QueryState) -> bool {
    state.numeric_ranges.iter().all(|(field, range)| {
        match record.numeric.get(field) {
            Some(Some(value)) => range.contains(*value),
            Some(None) | None => true,
        }
    })
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

/// Stable descending sort by the active key. Records missing the sort field
/// (or carrying an unranked categorical value) sort last; equal keys keep
/// their input order.
fn sort_records(records: &mut [Record], sort_key: &SortKey) {
    match sort_key {
        SortKey::TimestampDesc { field } => {
            records.sort_by(|a, b| {
                desc_option(a.timestamps.get(field), b.timestamps.get(field), Ord::cmp)
            });
        }
        SortKey::NumericDesc { field } => {
            records.sort_by(|a, b| {
                desc_option(
                    a.numeric.get(field).copied().flatten().as_ref(),
                    b.numeric.get(field).copied().flatten().as_ref(),
                    f64::total_cmp,
                )
            });
        }
        SortKey::CategoricalRankDesc { field, ranks } => {
            records.sort_by(|a, b| {
                let rank = |r: &Record| {
                    r.categorical
                        .get(field)
                        .and_then(|value| ranks.rank_of(value))
                };
                desc_option(rank(a).as_ref(), rank(b).as_ref(), Ord::cmp)
            });
        }
    }
}

/// Descending comparison over optional keys with `None` ordered last.
fn desc_option<T>(
    a: Option<&T>,
    b: Option<&T>,
    cmp: impl Fn(&T, &T) -> Ordering,
) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => cmp(b, a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
