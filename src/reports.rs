use crate::aggregate::{aggregate, AggregationResult, Column};
use crate::summary::{summarize, SummaryLevel};
use crate::types::{CaseRecord, Dataset, ScoreboardRow, SummaryStats, DECEASED, ICU, RECOVERED};

pub const DAILY_CASES_LABEL: &str = "Casos diagnosticados";
pub const PATIENTS_LABEL: &str = "Número de pacientes";

/// The five summary tables driving the dashboard charts. All derived views
/// over the same record subset; the subset itself is never touched.
#[derive(Debug, Clone)]
pub struct Report {
    pub daily_cases: AggregationResult,
    pub status_breakdown: AggregationResult,
    /// `None` at municipal granularity, which has no drill-down level left.
    pub scoreboard: Option<Vec<ScoreboardRow>>,
    pub location_breakdown: AggregationResult,
    pub recovery_breakdown: AggregationResult,
}

/// Build the full report for one record subset. `keys` lists the regions
/// the scoreboard should cover; an empty list skips the scoreboard.
pub fn build_report(records: &[CaseRecord], keys: &[String], level: SummaryLevel) -> Report {
    Report {
        daily_cases: aggregate(records, Column::ReportDate, DAILY_CASES_LABEL, false),
        status_breakdown: aggregate(records, Column::ClinicalStatus, PATIENTS_LABEL, false),
        scoreboard: if keys.is_empty() {
            None
        } else {
            Some(summarize(records, keys, level))
        },
        location_breakdown: aggregate(records, Column::CaseLocation, PATIENTS_LABEL, false),
        recovery_breakdown: aggregate(records, Column::RecoveryStatus, PATIENTS_LABEL, false),
    }
}

/// The user-selected report granularity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReportScope {
    National,
    Departmental(String),
    Municipal {
        department: String,
        municipality: String,
    },
}

/// The record subset a scope selects, plus everything the report builder
/// needs to run over it.
#[derive(Debug, Clone)]
pub struct ScopedData {
    pub records: Vec<CaseRecord>,
    pub keys: Vec<String>,
    pub level: SummaryLevel,
    pub name: String,
}

impl ReportScope {
    /// Stable identifier used as the memoization key for this scope.
    pub fn cache_key(&self) -> String {
        match self {
            ReportScope::National => "national".to_string(),
            ReportScope::Departmental(d) => format!("dept:{d}"),
            ReportScope::Municipal {
                department,
                municipality,
            } => format!("muni:{department}/{municipality}"),
        }
    }

    /// Select the rows this scope covers and the key list for its
    /// scoreboard: all departments nationally, the department's observed
    /// municipalities departmentally, nothing at municipal level.
    pub fn select(&self, data: &Dataset) -> ScopedData {
        match self {
            ReportScope::National => ScopedData {
                records: data.records.clone(),
                keys: data.departments.clone(),
                level: SummaryLevel::Department,
                name: "Colombia".to_string(),
            },
            ReportScope::Departmental(department) => {
                let records: Vec<CaseRecord> = data
                    .records
                    .iter()
                    .filter(|r| r.department.as_deref() == Some(department.as_str()))
                    .cloned()
                    .collect();
                let keys = municipalities_of(&records);
                ScopedData {
                    records,
                    keys,
                    level: SummaryLevel::Municipality,
                    name: department.clone(),
                }
            }
            ReportScope::Municipal {
                department,
                municipality,
            } => {
                let records: Vec<CaseRecord> = data
                    .records
                    .iter()
                    .filter(|r| {
                        r.department.as_deref() == Some(department.as_str())
                            && r.municipality.as_deref() == Some(municipality.as_str())
                    })
                    .cloned()
                    .collect();
                ScopedData {
                    records,
                    keys: Vec::new(),
                    level: SummaryLevel::Department,
                    name: municipality.clone(),
                }
            }
        }
    }
}

/// Distinct municipalities in first-seen order, absent values excluded.
pub fn municipalities_of<'a, I>(records: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a CaseRecord>,
{
    let mut seen: Vec<String> = Vec::new();
    for record in records {
        if let Some(m) = record.municipality.as_deref() {
            if !seen.iter().any(|s| s == m) {
                seen.push(m.to_string());
            }
        }
    }
    seen
}

/// Dataset-wide totals for the JSON export.
pub fn dataset_summary(data: &Dataset) -> SummaryStats {
    let recovered = data
        .records
        .iter()
        .filter(|r| r.recovery.as_deref() == Some(RECOVERED))
        .count() as u64;
    let deceased = data
        .records
        .iter()
        .filter(|r| r.case_location == DECEASED)
        .count() as u64;
    let icu = data
        .records
        .iter()
        .filter(|r| r.case_location == ICU)
        .count() as u64;
    SummaryStats {
        total_cases: data.records.len(),
        departments: data.departments.len(),
        municipalities: data.municipalities.len(),
        recovered,
        deceased,
        icu,
    }
}
