//! Generic filterable record and its schema (PRD-04).
//!
//! A `Record` is the projection of a domain entity (booking, customer,
//! photographer) into the shape the query engine understands: a status, a
//! set of searchable strings, and named categorical/numeric/timestamp/list
//! fields. The owning layer builds records from its models; the engine
//! never mutates them.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::types::{FieldName, StatusValue, Timestamp};

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// One entity in a collection snapshot, as seen by the query engine.
///
/// `numeric` values use `Option<f64>` so that "not yet populated" (e.g. a
/// photographer with no ratings) is distinct from a literal zero. Unset
/// values are exempt from range filters and sort after every set value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Opaque identifier, unique within a collection snapshot.
    pub id: String,
    /// One value from the record kind's closed status set.
    pub status: StatusValue,
    /// Ordered field values eligible for substring search.
    #[serde(default)]
    pub search_fields: Vec<String>,
    /// Exact-match / set-membership fields.
    #[serde(default)]
    pub categorical: BTreeMap<FieldName, String>,
    /// Range-filterable fields. `None` means "unset".
    #[serde(default)]
    pub numeric: BTreeMap<FieldName, Option<f64>>,
    /// Date fields eligible for range filters and default sort.
    #[serde(default)]
    pub timestamps: BTreeMap<FieldName, Timestamp>,
    /// Collection-valued fields (e.g. specialties) filtered by membership.
    #[serde(default)]
    pub lists: BTreeMap<FieldName, Vec<String>>,
}

impl Record {
    /// Create a record with the given id and status and no fields.
    pub fn new(id: impl Into<String>, status: impl Into<StatusValue>) -> Self {
        Self {
            id: id.into(),
            status: status.into(),
            search_fields: Vec::new(),
            categorical: BTreeMap::new(),
            numeric: BTreeMap::new(),
            timestamps: BTreeMap::new(),
            lists: BTreeMap::new(),
        }
    }

    /// Append a substring-searchable field value.
    pub fn with_search_field(mut self, value: impl Into<String>) -> Self {
        self.search_fields.push(value.into());
        self
    }

    pub fn with_categorical(
        mut self,
        field: impl Into<FieldName>,
        value: impl Into<String>,
    ) -> Self {
        self.categorical.insert(field.into(), value.into());
        self
    }

    pub fn with_numeric(mut self, field: impl Into<FieldName>, value: f64) -> Self {
        self.numeric.insert(field.into(), Some(value));
        self
    }

    /// Record the field as present but unset (e.g. no ratings yet).
    pub fn with_unset_numeric(mut self, field: impl Into<FieldName>) -> Self {
        self.numeric.insert(field.into(), None);
        self
    }

    pub fn with_timestamp(mut self, field: impl Into<FieldName>, at: Timestamp) -> Self {
        self.timestamps.insert(field.into(), at);
        self
    }

    pub fn with_list<I, S>(mut self, field: impl Into<FieldName>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lists
            .insert(field.into(), values.into_iter().map(Into::into).collect());
        self
    }
}

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// Declared field names and status set for one record kind.
///
/// A `QueryState` is validated against the schema once, before `apply` is
/// invoked; the engine itself never re-validates per record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSchema {
    pub statuses: BTreeSet<StatusValue>,
    pub categorical_fields: BTreeSet<FieldName>,
    pub numeric_fields: BTreeSet<FieldName>,
    pub timestamp_fields: BTreeSet<FieldName>,
    pub list_fields: BTreeSet<FieldName>,
}

impl RecordSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_statuses<I, S>(mut self, statuses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<StatusValue>,
    {
        self.statuses.extend(statuses.into_iter().map(Into::into));
        self
    }

    pub fn with_categorical_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<FieldName>,
    {
        self.categorical_fields
            .extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn with_numeric_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<FieldName>,
    {
        self.numeric_fields
            .extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn with_timestamp_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<FieldName>,
    {
        self.timestamp_fields
            .extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn with_list_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<FieldName>,
    {
        self.list_fields.extend(fields.into_iter().map(Into::into));
        self
    }
}
