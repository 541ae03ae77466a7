use std::{collections::HashSet, fmt::Display};

use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Couriers,
    Orders,
}

impl Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordKind::Couriers => write!(f, "couriers"),
            RecordKind::Orders => write!(f, "orders"),
        }
    }
}

/// A single problem with one field of a draft record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new<S: Into<String>>(field: &'static str, message: S) -> Self {
        Self { field, message: message.into() }
    }
}

impl Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// A record submitted for creation that has not been checked yet.
pub trait Draft {
    type Record;

    fn record_id(&self) -> i64;

    /// Checks every field and reports all of the problems found, not just the first.
    fn validate(self) -> Result<Self::Record, Vec<FieldError>>;
}

/// A record that stopped its batch from being stored. Records that could not be read at all may have no id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRecord {
    pub id: Option<i64>,
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRejection {
    pub kind: RecordKind,
    /// In submission order, one entry per id.
    pub rejected: Vec<RejectedRecord>,
}

impl BatchRejection {
    pub fn ids(&self) -> Vec<Option<i64>> {
        self.rejected.iter().map(|r| r.id).collect()
    }
}

impl Display for BatchRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let details = self
            .rejected
            .iter()
            .map(|r| match r.id {
                Some(id) => format!("{id} ({})", r.reasons.join("; ")),
                None => format!("unidentified record ({})", r.reasons.join("; ")),
            })
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{} {} were rejected: {details}", self.rejected.len(), self.kind)
    }
}

#[derive(Debug, Clone)]
enum Entry<T> {
    Readable(T),
    Unreadable(RejectedRecord),
}

/// A creation request: the drafts that were readable, plus a note of every record that was not, in submission order.
#[derive(Debug, Clone)]
pub struct Batch<T> {
    entries: Vec<Entry<T>>,
}

impl<T> Default for Batch<T> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<T> From<Vec<T>> for Batch<T> {
    fn from(drafts: Vec<T>) -> Self {
        Self { entries: drafts.into_iter().map(Entry::Readable).collect() }
    }
}

impl<T> Batch<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, draft: T) {
        self.entries.push(Entry::Readable(draft));
    }

    /// Notes a record the caller could not turn into a draft. Its presence rejects the whole batch.
    pub fn push_unreadable<S: Into<String>>(&mut self, id: Option<i64>, reason: S) {
        self.entries.push(Entry::Unreadable(RejectedRecord { id, reasons: vec![reason.into()] }));
    }

    pub fn drafts(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().filter_map(|e| match e {
            Entry::Readable(draft) => Some(draft),
            Entry::Unreadable(_) => None,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Draft> Batch<T> {
    /// The ids of the readable drafts.
    pub fn ids(&self) -> Vec<i64> {
        self.drafts().map(Draft::record_id).collect()
    }

    /// Validates every draft. `existing` holds the ids that are already in storage.
    ///
    /// Either every record passes and the validated records come back in submission order, or the rejection lists
    /// every failing record.
    pub fn validate(self, kind: RecordKind, existing: &[i64]) -> Result<Vec<T::Record>, BatchRejection> {
        let mut rejected = Vec::new();
        let mut seen = HashSet::new();
        let mut valid = Vec::with_capacity(self.entries.len());
        for entry in self.entries {
            let draft = match entry {
                Entry::Readable(draft) => draft,
                Entry::Unreadable(record) => {
                    if let Some(id) = record.id {
                        seen.insert(id);
                    }
                    rejected.push(record);
                    continue;
                },
            };
            let id = draft.record_id();
            let mut reasons = Vec::new();
            if !seen.insert(id) {
                reasons.push(format!("id {id} appears more than once in the batch"));
            }
            if existing.contains(&id) {
                reasons.push(format!("id {id} already exists"));
            }
            match draft.validate() {
                Ok(record) if reasons.is_empty() => valid.push(record),
                Ok(_) => rejected.push(RejectedRecord { id: Some(id), reasons }),
                Err(errors) => {
                    reasons.extend(errors.iter().map(ToString::to_string));
                    rejected.push(RejectedRecord { id: Some(id), reasons });
                },
            }
        }
        if rejected.is_empty() {
            return Ok(valid);
        }
        let rejection = BatchRejection { kind, rejected: merge_by_id(rejected) };
        debug!("🚚️ Batch rejected. {rejection}");
        Err(rejection)
    }
}

/// Folds repeat entries for the same id into the first one. Records without an id are kept as they are.
fn merge_by_id(records: Vec<RejectedRecord>) -> Vec<RejectedRecord> {
    let mut merged: Vec<RejectedRecord> = Vec::with_capacity(records.len());
    for record in records {
        match merged.iter_mut().find(|m| m.id.is_some() && m.id == record.id) {
            Some(existing) => existing.reasons.extend(record.reasons),
            None => merged.push(record),
        }
    }
    merged
}
