use crate::aggregate::{aggregate, AggregationResult, Column};
use crate::reports::PATIENTS_LABEL;
use crate::types::{AgeBucketRow, CaseRecord, DECEASED, RECOVERED};

/// The patient-type filter applied before the sex and age distributions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatientFilter {
    Reported,
    Deceased,
    Recovered,
}

impl PatientFilter {
    fn matches(self, record: &CaseRecord) -> bool {
        match self {
            PatientFilter::Reported => true,
            PatientFilter::Deceased => record.recovery.as_deref() == Some(DECEASED),
            PatientFilter::Recovered => record.recovery.as_deref() == Some(RECOVERED),
        }
    }

    /// Lowercase chart-title suffix ("casos recuperados", "no existen
    /// pacientes fallecidos").
    pub fn label(self) -> &'static str {
        match self {
            PatientFilter::Reported => "reportados",
            PatientFilter::Deceased => "fallecidos",
            PatientFilter::Recovered => "recuperados",
        }
    }
}

/// Fixed age buckets: ten left-closed decades plus an open-ended tail.
/// Labels map to buckets by position.
const AGE_BUCKET_LABELS: [&str; 10] = [
    "0 - 9",
    "10 - 19",
    "20 - 29",
    "30 - 39",
    "40 - 49",
    "50 - 59",
    "60 - 69",
    "70 - 79",
    "80 - 89",
    "Mayor de 89",
];

/// Sex and age distributions for the rows matching a patient filter.
#[derive(Debug, Clone)]
pub struct Drilldown {
    pub by_sex: AggregationResult,
    pub by_age: Vec<AgeBucketRow>,
}

/// Compute both distributions over the filtered subset, or `None` when the
/// filter matches no rows at all ("no such patients" — the caller decides
/// how to say it).
pub fn distributions(records: &[CaseRecord], filter: PatientFilter) -> Option<Drilldown> {
    let subset: Vec<&CaseRecord> = records.iter().filter(|r| filter.matches(r)).collect();
    if subset.is_empty() {
        return None;
    }

    let by_sex = aggregate(subset.iter().copied(), Column::Sex, PATIENTS_LABEL, false);

    // Every bucket is emitted, zero or not, so the label axis stays stable
    // across subsets. Rows with an unrecorded age are left out.
    let mut buckets = [0u64; AGE_BUCKET_LABELS.len()];
    for record in &subset {
        if let Some(age) = record.age {
            buckets[bucket_index(age)] += 1;
        }
    }
    let by_age = AGE_BUCKET_LABELS
        .iter()
        .zip(buckets)
        .map(|(label, patients)| AgeBucketRow {
            interval: label.to_string(),
            patients,
        })
        .collect();

    Some(Drilldown { by_sex, by_age })
}

fn bucket_index(age: u32) -> usize {
    if age >= 90 {
        AGE_BUCKET_LABELS.len() - 1
    } else {
        (age / 10) as usize
    }
}
