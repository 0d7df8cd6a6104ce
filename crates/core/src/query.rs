//! Query state value object and its stage/commit lifecycle (PRD-05).
//!
//! A `QueryState` captures everything a list view's filter bar holds:
//! status tab, search text, categorical/list selections, numeric ranges,
//! and the active sort key. It is an immutable value updated through a
//! reducer (`apply_update`), with `QueryDraft` providing the filter
//! dialog's stage-then-commit flow. Validation against a `RecordSchema`
//! happens once, before the engine runs.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::record::RecordSchema;
use crate::status::STATUS_ALL;
use crate::types::{FieldName, StatusValue};

// ---------------------------------------------------------------------------
// Filter primitives
// ---------------------------------------------------------------------------

/// Status tab selection: the `"all"` sentinel or one concrete status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    Only(StatusValue),
}

impl StatusFilter {
    /// Parse the wire form: `"all"` or a concrete status value.
    pub fn from_wire(value: &str) -> Self {
        if value == STATUS_ALL {
            Self::All
        } else {
            Self::Only(value.to_string())
        }
    }

    /// Whether a record with the given status passes this filter.
    pub fn matches(&self, status: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == status,
        }
    }
}

/// Inclusive numeric range `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericRange {
    pub min: f64,
    pub max: f64,
}

impl NumericRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// A range spanning the full domain (the unconstrained default).
    pub fn full() -> Self {
        Self {
            min: f64::NEG_INFINITY,
            max: f64::INFINITY,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    /// Reject inverted ranges.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.min <= self.max {
            Ok(())
        } else {
            Err(CoreError::Validation(format!(
                "Inverted numeric range: min {} > max {}",
                self.min, self.max
            )))
        }
    }
}

impl Default for NumericRange {
    fn default() -> Self {
        Self::full()
    }
}

// ---------------------------------------------------------------------------
// Categorical ranking
// ---------------------------------------------------------------------------

/// Rank used for priority-style categorical sorts.
pub const RANK_HIGH: i32 = 3;
pub const RANK_MEDIUM: i32 = 2;
pub const RANK_LOW: i32 = 1;

/// Explicit value -> integer rank map for categorical sorting.
///
/// Values outside the map (and records missing the field) sort after every
/// ranked value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoricalRank(BTreeMap<String, i32>);

impl CategoricalRank {
    pub fn new<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, i32)>,
        S: Into<String>,
    {
        Self(pairs.into_iter().map(|(v, r)| (v.into(), r)).collect())
    }

    /// The standard high/medium/low priority ranking.
    pub fn priority() -> Self {
        Self::new([("high", RANK_HIGH), ("medium", RANK_MEDIUM), ("low", RANK_LOW)])
    }

    pub fn rank_of(&self, value: &str) -> Option<i32> {
        self.0.get(value).copied()
    }
}

// ---------------------------------------------------------------------------
// Sort keys
// ---------------------------------------------------------------------------

/// The single active sort order. All variants sort descending; ties keep
/// the input order (the engine uses a stable sort).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SortKey {
    /// Most recent first by the named timestamp field.
    TimestampDesc { field: FieldName },
    /// Highest first by the named numeric field.
    NumericDesc { field: FieldName },
    /// Highest rank first by the named categorical field.
    CategoricalRankDesc {
        field: FieldName,
        ranks: CategoricalRank,
    },
}

impl SortKey {
    pub fn timestamp_desc(field: impl Into<FieldName>) -> Self {
        Self::TimestampDesc {
            field: field.into(),
        }
    }

    pub fn numeric_desc(field: impl Into<FieldName>) -> Self {
        Self::NumericDesc {
            field: field.into(),
        }
    }

    pub fn categorical_rank_desc(field: impl Into<FieldName>, ranks: CategoricalRank) -> Self {
        Self::CategoricalRankDesc {
            field: field.into(),
            ranks,
        }
    }
}

// ---------------------------------------------------------------------------
// QueryState
// ---------------------------------------------------------------------------

/// Everything a list view's filter/search/sort state holds.
///
/// Created unconstrained when a list view opens, replaced wholesale on
/// dialog commit, reset to defaults on an explicit clear. Never persisted
/// beyond the view's lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryState {
    pub status_filter: StatusFilter,
    pub search_text: String,
    /// Field -> accepted values. An empty set imposes no constraint.
    pub categorical_selections: BTreeMap<FieldName, BTreeSet<String>>,
    /// Field -> selected values for list-valued fields (any-membership).
    pub list_selections: BTreeMap<FieldName, BTreeSet<String>>,
    /// Field -> inclusive range. Defaults span the full domain.
    pub numeric_ranges: BTreeMap<FieldName, NumericRange>,
    pub sort_key: SortKey,
}

impl QueryState {
    /// The default state for a freshly opened list view: no constraints,
    /// the given sort order.
    pub fn unconstrained(sort_key: SortKey) -> Self {
        Self {
            status_filter: StatusFilter::All,
            search_text: String::new(),
            categorical_selections: BTreeMap::new(),
            list_selections: BTreeMap::new(),
            numeric_ranges: BTreeMap::new(),
            sort_key,
        }
    }

    /// Apply one update, producing the next state (pure reducer).
    pub fn apply_update(mut self, update: QueryUpdate) -> Self {
        match update {
            QueryUpdate::SetStatusFilter(filter) => self.status_filter = filter,
            QueryUpdate::SetSearchText(text) => self.search_text = text,
            QueryUpdate::SetCategorical { field, values } => {
                if values.is_empty() {
                    self.categorical_selections.remove(&field);
                } else {
                    self.categorical_selections.insert(field, values);
                }
            }
            QueryUpdate::SetListSelection { field, values } => {
                if values.is_empty() {
                    self.list_selections.remove(&field);
                } else {
                    self.list_selections.insert(field, values);
                }
            }
            QueryUpdate::SetNumericRange { field, range } => {
                self.numeric_ranges.insert(field, range);
            }
            QueryUpdate::SetSortKey(sort_key) => self.sort_key = sort_key,
            QueryUpdate::Clear => return Self::unconstrained(self.sort_key),
        }
        self
    }
}

/// One user interaction with the filter bar or dialog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "value", rename_all = "snake_case")]
pub enum QueryUpdate {
    SetStatusFilter(StatusFilter),
    SetSearchText(String),
    SetCategorical {
        field: FieldName,
        values: BTreeSet<String>,
    },
    SetListSelection {
        field: FieldName,
        values: BTreeSet<String>,
    },
    SetNumericRange {
        field: FieldName,
        range: NumericRange,
    },
    SetSortKey(SortKey),
    /// Back to the unconstrained default, keeping the sort key.
    Clear,
}

// ---------------------------------------------------------------------------
// Stage-then-commit draft
// ---------------------------------------------------------------------------

/// Filter-dialog lifecycle: edits accumulate in a staged copy and only
/// reach the committed state on `commit`. `cancel` discards the staged
/// edits; `reset` stages the unconstrained default.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryDraft {
    committed: QueryState,
    staged: QueryState,
}

impl QueryDraft {
    /// Open a dialog over the currently committed state.
    pub fn begin(committed: QueryState) -> Self {
        Self {
            staged: committed.clone(),
            committed,
        }
    }

    /// The state the list is currently rendered with.
    pub fn committed(&self) -> &QueryState {
        &self.committed
    }

    /// The state as edited so far in the dialog.
    pub fn staged(&self) -> &QueryState {
        &self.staged
    }

    /// Stage one edit without touching the committed state.
    pub fn stage(&mut self, update: QueryUpdate) {
        self.staged = self.staged.clone().apply_update(update);
    }

    /// Atomically replace the committed state with the staged edits.
    pub fn commit(&mut self) -> &QueryState {
        self.committed = self.staged.clone();
        &self.committed
    }

    /// Discard staged edits.
    pub fn cancel(&mut self) {
        self.staged = self.committed.clone();
    }

    /// Stage the unconstrained default (keeping the sort key).
    pub fn reset(&mut self) {
        self.staged = QueryState::unconstrained(self.staged.sort_key.clone());
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a `QueryState` against a record schema.
///
/// Every referenced field name must exist in the schema, numeric ranges
/// must not be inverted, and a concrete status filter must belong to the
/// schema's status set. Callers run this once per state change, before
/// `engine::apply`; the engine does not re-validate per record.
pub fn validate_state(schema: &RecordSchema, state: &QueryState) -> Result<(), CoreError> {
    if let StatusFilter::Only(status) = &state.status_filter {
        if !schema.statuses.contains(status) {
            return Err(CoreError::Validation(format!(
                "Unknown status '{status}' in status filter"
            )));
        }
    }

    for field in state.categorical_selections.keys() {
        if !schema.categorical_fields.contains(field) {
            return Err(CoreError::UnknownField {
                kind: "categorical",
                field: field.clone(),
            });
        }
    }

    for field in state.list_selections.keys() {
        if !schema.list_fields.contains(field) {
            return Err(CoreError::UnknownField {
                kind: "list",
                field: field.clone(),
            });
        }
    }

    for (field, range) in &state.numeric_ranges {
        if !schema.numeric_fields.contains(field) {
            return Err(CoreError::UnknownField {
                kind: "numeric",
                field: field.clone(),
            });
        }
        range.validate()?;
    }

    match &state.sort_key {
        SortKey::TimestampDesc { field } => {
            if !schema.timestamp_fields.contains(field) {
                return Err(CoreError::UnknownField {
                    kind: "sort timestamp",
                    field: field.clone(),
                });
            }
        }
        SortKey::NumericDesc { field } => {
            if !schema.numeric_fields.contains(field) {
                return Err(CoreError::UnknownField {
                    kind: "sort numeric",
                    field: field.clone(),
                });
            }
        }
        SortKey::CategoricalRankDesc { field, .. } => {
            if !schema.categorical_fields.contains(field) {
                return Err(CoreError::UnknownField {
                    kind: "sort categorical",
                    field: field.clone(),
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn schema() -> RecordSchema {
        RecordSchema::new()
            .with_statuses(["upcoming", "completed", "cancelled"])
            .with_categorical_fields(["priority", "location"])
            .with_numeric_fields(["total_spent", "average_rating"])
            .with_timestamp_fields(["scheduled_at", "created_at"])
            .with_list_fields(["specialties"])
    }

    fn default_state() -> QueryState {
        QueryState::unconstrained(SortKey::timestamp_desc("scheduled_at"))
    }

    // -- StatusFilter --------------------------------------------------------

    #[test]
    fn status_filter_all_matches_everything() {
        assert!(StatusFilter::All.matches("upcoming"));
        assert!(StatusFilter::All.matches("cancelled"));
    }

    #[test]
    fn status_filter_only_matches_exact_value() {
        let filter = StatusFilter::from_wire("upcoming");
        assert!(filter.matches("upcoming"));
        assert!(!filter.matches("completed"));
    }

    #[test]
    fn status_filter_wire_sentinel_is_all() {
        assert_eq!(StatusFilter::from_wire("all"), StatusFilter::All);
    }

    // -- NumericRange --------------------------------------------------------

    #[test]
    fn numeric_range_is_inclusive_both_ends() {
        let range = NumericRange::new(1.0, 5.0);
        assert!(range.contains(1.0));
        assert!(range.contains(5.0));
        assert!(!range.contains(0.999));
        assert!(!range.contains(5.001));
    }

    #[test]
    fn full_range_contains_everything() {
        let range = NumericRange::full();
        assert!(range.contains(f64::MIN));
        assert!(range.contains(0.0));
        assert!(range.contains(f64::MAX));
    }

    #[test]
    fn inverted_range_fails_validation() {
        assert_matches!(
            NumericRange::new(5.0, 1.0).validate(),
            Err(CoreError::Validation(_))
        );
    }

    // -- CategoricalRank -----------------------------------------------------

    #[test]
    fn priority_ranks_high_over_medium_over_low() {
        let ranks = CategoricalRank::priority();
        assert_eq!(ranks.rank_of("high"), Some(RANK_HIGH));
        assert_eq!(ranks.rank_of("medium"), Some(RANK_MEDIUM));
        assert_eq!(ranks.rank_of("low"), Some(RANK_LOW));
    }

    #[test]
    fn unknown_value_has_no_rank() {
        assert_eq!(CategoricalRank::priority().rank_of("urgent"), None);
    }

    // -- Reducer -------------------------------------------------------------

    #[test]
    fn reducer_sets_search_text() {
        let state = default_state().apply_update(QueryUpdate::SetSearchText("BK001".into()));
        assert_eq!(state.search_text, "BK001");
    }

    #[test]
    fn reducer_empty_selection_removes_constraint() {
        let state = default_state().apply_update(QueryUpdate::SetCategorical {
            field: "priority".into(),
            values: BTreeSet::from(["high".to_string()]),
        });
        assert_eq!(state.categorical_selections.len(), 1);

        let state = state.apply_update(QueryUpdate::SetCategorical {
            field: "priority".into(),
            values: BTreeSet::new(),
        });
        assert!(state.categorical_selections.is_empty());
    }

    #[test]
    fn clear_keeps_sort_key() {
        let sort = SortKey::numeric_desc("total_spent");
        let state = QueryState::unconstrained(sort.clone())
            .apply_update(QueryUpdate::SetSearchText("wedding".into()))
            .apply_update(QueryUpdate::SetStatusFilter(StatusFilter::from_wire(
                "upcoming",
            )))
            .apply_update(QueryUpdate::Clear);
        assert_eq!(state, QueryState::unconstrained(sort));
    }

    // -- Draft lifecycle -----------------------------------------------------

    #[test]
    fn staged_edits_do_not_touch_committed_state() {
        let mut draft = QueryDraft::begin(default_state());
        draft.stage(QueryUpdate::SetSearchText("studio".into()));
        assert_eq!(draft.committed().search_text, "");
        assert_eq!(draft.staged().search_text, "studio");
    }

    #[test]
    fn commit_replaces_committed_state_atomically() {
        let mut draft = QueryDraft::begin(default_state());
        draft.stage(QueryUpdate::SetSearchText("studio".into()));
        draft.stage(QueryUpdate::SetStatusFilter(StatusFilter::from_wire(
            "completed",
        )));
        draft.commit();
        assert_eq!(draft.committed().search_text, "studio");
        assert_eq!(
            draft.committed().status_filter,
            StatusFilter::Only("completed".into())
        );
    }

    #[test]
    fn cancel_discards_staged_edits() {
        let mut draft = QueryDraft::begin(default_state());
        draft.stage(QueryUpdate::SetSearchText("studio".into()));
        draft.cancel();
        assert_eq!(draft.staged(), draft.committed());
    }

    #[test]
    fn reset_stages_unconstrained_default() {
        let mut draft = QueryDraft::begin(
            default_state().apply_update(QueryUpdate::SetSearchText("studio".into())),
        );
        draft.reset();
        assert_eq!(draft.staged().search_text, "");
        // Committed state is untouched until commit.
        assert_eq!(draft.committed().search_text, "studio");
    }

    // -- Validation ----------------------------------------------------------

    #[test]
    fn unconstrained_state_validates() {
        assert!(validate_state(&schema(), &default_state()).is_ok());
    }

    #[test]
    fn unknown_categorical_field_is_rejected() {
        let state = default_state().apply_update(QueryUpdate::SetCategorical {
            field: "risk_level".into(),
            values: BTreeSet::from(["high".to_string()]),
        });
        assert_matches!(
            validate_state(&schema(), &state),
            Err(CoreError::UnknownField { kind: "categorical", .. })
        );
    }

    #[test]
    fn unknown_numeric_field_is_rejected() {
        let state = default_state().apply_update(QueryUpdate::SetNumericRange {
            field: "booking_count".into(),
            range: NumericRange::new(0.0, 10.0),
        });
        assert_matches!(
            validate_state(&schema(), &state),
            Err(CoreError::UnknownField { kind: "numeric", .. })
        );
    }

    #[test]
    fn unknown_sort_field_is_rejected() {
        let mut state = default_state();
        state.sort_key = SortKey::timestamp_desc("deleted_at");
        assert_matches!(
            validate_state(&schema(), &state),
            Err(CoreError::UnknownField { kind: "sort timestamp", .. })
        );
    }

    #[test]
    fn unknown_status_in_filter_is_rejected() {
        let state = default_state()
            .apply_update(QueryUpdate::SetStatusFilter(StatusFilter::from_wire(
                "refunded",
            )));
        assert_matches!(
            validate_state(&schema(), &state),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn inverted_range_is_rejected_by_state_validation() {
        let state = default_state().apply_update(QueryUpdate::SetNumericRange {
            field: "total_spent".into(),
            range: NumericRange::new(100.0, 10.0),
        });
        assert_matches!(
            validate_state(&schema(), &state),
            Err(CoreError::Validation(_))
        );
    }
}
