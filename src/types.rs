use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Canonical categorical values as they appear in the cleaned table.
///
/// The dataset is Spanish-language; these are the exact strings the
/// aggregations match against after normalization.
pub const RECOVERED: &str = "Recuperado";
pub const DECEASED: &str = "Fallecido";
pub const ICU: &str = "Hospital UCI";
pub const SEX_FEMALE: &str = "Femenino";
pub const SEX_MALE: &str = "Masculino";

/// Sentinel for a missing case-location value. Dataset convention: rows
/// without a case location are deaths not attributed to COVID.
pub const LOCATION_MISSING: &str = "Fallecido NO COVID";

/// Sentinel for a missing clinical-status value.
pub const STATUS_MISSING: &str = "N/A";

/// Special districts reported under their own name but belonging to a
/// parent department. Closed list; extend only by editing it.
pub const DEPARTMENT_REMAP: [(&str, &str); 4] = [
    ("BARRANQUILLA", "ATLANTICO"),
    ("CARTAGENA", "BOLIVAR"),
    ("Buenaventura D.E.", "VALLE"),
    ("STA MARTA D.E.", "MAGDALENA"),
];

/// One row of the source CSV, exactly as published. Every field is optional
/// so that blank cells deserialize instead of failing the whole row.
#[derive(Debug, Deserialize)]
pub struct RawRow {
    #[serde(rename = "ID de caso")]
    pub case_id: Option<String>,
    #[serde(rename = "Fecha de notificación")]
    pub notification_date: Option<String>,
    #[serde(rename = "Nombre municipio")]
    pub municipality: Option<String>,
    #[serde(rename = "Nombre departamento")]
    pub department: Option<String>,
    #[serde(rename = "Ubicación del caso")]
    pub case_location: Option<String>,
    #[serde(rename = "Recuperado")]
    pub recovery: Option<String>,
    #[serde(rename = "Edad")]
    pub age: Option<String>,
    #[serde(rename = "Sexo")]
    pub sex: Option<String>,
    #[serde(rename = "Estado")]
    pub clinical_status: Option<String>,
    #[serde(rename = "Fecha de muerte")]
    pub death_date: Option<String>,
    #[serde(rename = "Fecha de diagnóstico")]
    pub diagnosis_date: Option<String>,
    #[serde(rename = "Fecha de recuperación")]
    pub recovery_date: Option<String>,
    #[serde(rename = "fecha reporte web")]
    pub report_date: Option<String>,
}

/// One cleaned case record. Date fields keep `None` for values that were
/// blank or unparsable; categorical fields are canonicalized by the loader.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseRecord {
    pub case_id: i64,
    pub notification_date: Option<NaiveDate>,
    pub diagnosis_date: Option<NaiveDate>,
    pub report_date: Option<NaiveDate>,
    pub recovery_date: Option<NaiveDate>,
    pub death_date: Option<NaiveDate>,
    pub department: Option<String>,
    pub municipality: Option<String>,
    pub case_location: String,
    pub recovery: Option<String>,
    pub clinical_status: String,
    pub sex: Option<String>,
    pub age: Option<u32>,
}

/// The cleaned table plus the distinct region sets observed in it.
/// Built once by the loader and read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub records: Vec<CaseRecord>,
    /// Sorted, deduplicated department names (absent values excluded).
    pub departments: Vec<String>,
    /// Sorted, deduplicated municipality names (absent values excluded).
    pub municipalities: Vec<String>,
}

/// One scoreboard line: confirmed/recovered/deceased/ICU counts for a
/// department or municipality.
#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct ScoreboardRow {
    #[serde(rename = "Nombre")]
    #[tabled(rename = "Nombre")]
    pub name: String,
    #[serde(rename = "Confirmados")]
    #[tabled(rename = "Confirmados")]
    pub confirmed: u64,
    #[serde(rename = "Recuperados")]
    #[tabled(rename = "Recuperados")]
    pub recovered: u64,
    #[serde(rename = "Fallecidos")]
    #[tabled(rename = "Fallecidos")]
    pub deceased: u64,
    #[serde(rename = "En UCI")]
    #[tabled(rename = "En UCI")]
    pub icu: u64,
}

impl ScoreboardRow {
    pub fn empty(name: &str) -> Self {
        Self {
            name: name.to_string(),
            confirmed: 0,
            recovered: 0,
            deceased: 0,
            icu: 0,
        }
    }
}

/// One age-bucket line of the age distribution drill-down.
#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct AgeBucketRow {
    #[serde(rename = "Intervalos")]
    #[tabled(rename = "Intervalos")]
    pub interval: String,
    #[serde(rename = "Número de pacientes")]
    #[tabled(rename = "Número de pacientes")]
    pub patients: u64,
}

/// Dataset-wide totals exported as JSON next to the report files.
#[derive(Debug, Serialize, PartialEq)]
pub struct SummaryStats {
    pub total_cases: usize,
    pub departments: usize,
    pub municipalities: usize,
    pub recovered: u64,
    pub deceased: u64,
    pub icu: u64,
}
