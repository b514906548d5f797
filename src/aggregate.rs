use crate::types::CaseRecord;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::fmt;

/// Columns of the cleaned table that reports group by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    ReportDate,
    CaseLocation,
    ClinicalStatus,
    RecoveryStatus,
    Sex,
}

/// A grouping key: either a calendar date or a categorical value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GroupKey {
    Date(NaiveDate),
    Text(String),
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Date(d) => write!(f, "{d}"),
            GroupKey::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Per-group row counts, in iteration order. Date-keyed results are
/// chronological; categorical results keep first-seen order.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationResult {
    pub label: String,
    pub rows: Vec<(GroupKey, u64)>,
}

impl AggregationResult {
    /// Replace each count with the running sum in iteration order. Only
    /// meaningful for chronologically keyed results.
    pub fn cumulative(&self) -> AggregationResult {
        let mut total = 0u64;
        let rows = self
            .rows
            .iter()
            .map(|(key, count)| {
                total += count;
                (key.clone(), total)
            })
            .collect();
        AggregationResult {
            label: self.label.clone(),
            rows,
        }
    }

    pub fn max_count(&self) -> u64 {
        self.rows.iter().map(|(_, c)| *c).max().unwrap_or(0)
    }

    /// Count for a categorical key, 0 when the group is absent.
    pub fn count_for(&self, key: &str) -> u64 {
        self.rows
            .iter()
            .find(|(k, _)| matches!(k, GroupKey::Text(s) if s == key))
            .map(|(_, c)| *c)
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn key_of(record: &CaseRecord, column: Column) -> Option<GroupKey> {
    match column {
        Column::ReportDate => record.report_date.map(GroupKey::Date),
        Column::CaseLocation => Some(GroupKey::Text(record.case_location.clone())),
        Column::ClinicalStatus => Some(GroupKey::Text(record.clinical_status.clone())),
        Column::RecoveryStatus => record.recovery.clone().map(GroupKey::Text),
        Column::Sex => record.sex.clone().map(GroupKey::Text),
    }
}

/// Group `records` by `column` and count rows per group. Rows whose value
/// for the column is absent are skipped. With `cumulative`, counts become a
/// running sum in iteration order; callers use that with `Column::ReportDate`
/// only, where the order is chronological.
pub fn aggregate<'a, I>(records: I, column: Column, label: &str, cumulative: bool) -> AggregationResult
where
    I: IntoIterator<Item = &'a CaseRecord>,
{
    let mut counts: HashMap<GroupKey, u64> = HashMap::new();
    let mut order: Vec<GroupKey> = Vec::new();

    for record in records {
        let Some(key) = key_of(record, column) else {
            continue;
        };
        match counts.get_mut(&key) {
            Some(count) => *count += 1,
            None => {
                counts.insert(key.clone(), 1);
                order.push(key);
            }
        }
    }

    if column == Column::ReportDate {
        order.sort();
    }

    let rows = order
        .into_iter()
        .map(|key| {
            let count = counts[&key];
            (key, count)
        })
        .collect();

    let result = AggregationResult {
        label: label.to_string(),
        rows,
    };
    if cumulative {
        result.cumulative()
    } else {
        result
    }
}
