use crate::error::LoadError;
use crate::types::{
    CaseRecord, Dataset, RawRow, DEPARTMENT_REMAP, LOCATION_MISSING, SEX_FEMALE, SEX_MALE,
    STATUS_MISSING,
};
use crate::util::{parse_date_safe, parse_i64_safe, parse_u32_safe};
use chrono::NaiveDate;
use csv::ReaderBuilder;
use log::{info, warn};
use std::collections::BTreeSet;
use std::fs::File;

/// All 13 columns the dataset must carry. Header validation runs before any
/// row is deserialized so a renamed column fails loudly instead of silently
/// yielding empty fields.
const REQUIRED_COLUMNS: [&str; 13] = [
    "ID de caso",
    "Fecha de notificación",
    "Nombre municipio",
    "Nombre departamento",
    "Ubicación del caso",
    "Recuperado",
    "Edad",
    "Sexo",
    "Estado",
    "Fecha de muerte",
    "Fecha de diagnóstico",
    "Fecha de recuperación",
    "fecha reporte web",
];

/// Post-load diagnostics, printed by the console layer.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    /// Rows skipped entirely (CSV-level parse failure or unusable case id).
    pub parse_errors: usize,
    /// Individual date values that were present but unparsable.
    pub blank_dates: usize,
}

/// Read, clean and type the case-line CSV.
///
/// Returns the cleaned table together with the distinct department and
/// municipality sets observed in it. Fails only on file-level problems;
/// malformed field values degrade per record instead.
pub fn load_dataset(path: &str) -> Result<(Dataset, LoadReport), LoadError> {
    info!("reading dataset from {path}");
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_string(),
        source,
    })?;
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(file);

    let headers = rdr.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(LoadError::MissingColumn(column.to_string()));
        }
    }

    let mut records: Vec<CaseRecord> = Vec::new();
    let mut total_rows = 0usize;
    let mut parse_errors = 0usize;
    let mut blank_dates = 0usize;

    for result in rdr.deserialize::<RawRow>() {
        total_rows += 1;
        let row = match result {
            Ok(r) => r,
            Err(_) => {
                parse_errors += 1;
                continue;
            }
        };

        // The case id is the one column every aggregation counts by; a row
        // without a usable id cannot participate in any report.
        let Some(case_id) = parse_i64_safe(row.case_id.as_deref()) else {
            parse_errors += 1;
            continue;
        };

        let mut parse_date = |raw: Option<&str>| -> Option<NaiveDate> {
            let present = raw.map(str::trim).is_some_and(|s| !s.is_empty());
            let parsed = parse_date_safe(raw);
            if present && parsed.is_none() {
                blank_dates += 1;
            }
            parsed
        };
        let notification_date = parse_date(row.notification_date.as_deref());
        let diagnosis_date = parse_date(row.diagnosis_date.as_deref());
        let report_date = parse_date(row.report_date.as_deref());
        let recovery_date = parse_date(row.recovery_date.as_deref());
        let death_date = parse_date(row.death_date.as_deref());

        records.push(CaseRecord {
            case_id,
            notification_date,
            diagnosis_date,
            report_date,
            recovery_date,
            death_date,
            department: row.department.as_deref().map(canonical_department),
            municipality: row.municipality.map(|m| m.trim().to_string()),
            case_location: match row.case_location {
                Some(loc) => canonical_location(loc),
                None => LOCATION_MISSING.to_string(),
            },
            recovery: row.recovery.map(canonical_recovery),
            clinical_status: match row.clinical_status {
                Some(status) => canonical_status(status),
                None => STATUS_MISSING.to_string(),
            },
            sex: row.sex.as_deref().map(canonical_sex),
            age: parse_u32_safe(row.age.as_deref()),
        });
    }

    let departments: BTreeSet<String> = records
        .iter()
        .filter_map(|r| r.department.clone())
        .collect();
    let municipalities: BTreeSet<String> = records
        .iter()
        .filter_map(|r| r.municipality.clone())
        .collect();

    let report = LoadReport {
        total_rows,
        loaded_rows: records.len(),
        parse_errors,
        blank_dates,
    };
    info!(
        "{} of {} rows loaded, {} departments, {} municipalities",
        report.loaded_rows,
        report.total_rows,
        departments.len(),
        municipalities.len()
    );
    if report.parse_errors > 0 {
        warn!("{} rows skipped as unparsable", report.parse_errors);
    }

    let dataset = Dataset {
        records,
        departments: departments.into_iter().collect(),
        municipalities: municipalities.into_iter().collect(),
    };
    Ok((dataset, report))
}

/// Expand single-letter sex codes to the full labels.
fn canonical_sex(raw: &str) -> String {
    match raw.trim() {
        "f" | "F" => SEX_FEMALE.to_string(),
        "m" | "M" => SEX_MALE.to_string(),
        other => other.to_string(),
    }
}

/// Fold the special districts into their parent departments. Closed list;
/// every other department name passes through unchanged.
fn canonical_department(raw: &str) -> String {
    let trimmed = raw.trim();
    for (district, department) in DEPARTMENT_REMAP {
        if trimmed == district {
            return department.to_string();
        }
    }
    trimmed.to_string()
}

/// Fold known capitalization variants of case-location to one spelling.
fn canonical_location(raw: String) -> String {
    match raw.trim() {
        "casa" | "CASA" => "Casa".to_string(),
        other => other.to_string(),
    }
}

/// Fold known capitalization variants of clinical status to one spelling.
fn canonical_status(raw: String) -> String {
    match raw.trim() {
        "moderado" => "Moderado".to_string(),
        "LEVE" => "Leve".to_string(),
        other => other.to_string(),
    }
}

fn canonical_recovery(raw: String) -> String {
    match raw.trim() {
        "fallecido" => "Fallecido".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "ID de caso,Fecha de notificación,Nombre municipio,Nombre departamento,Ubicación del caso,Recuperado,Edad,Sexo,Estado,Fecha de muerte,Fecha de diagnóstico,Fecha de recuperación,fecha reporte web";

    fn write_csv(lines: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{HEADER}").unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn loads_and_normalizes_rows() {
        let file = write_csv(&[
            "1,2/03/2020 0:00:00,MEDELLIN,ANTIOQUIA,casa,Recuperado,34,f,LEVE,,5/03/2020 0:00:00,20/03/2020 0:00:00,6/03/2020 0:00:00",
            "2,3/03/2020 0:00:00,BARRANQUILLA,BARRANQUILLA,,fallecido,71,M,,10/03/2020 0:00:00,6/03/2020 0:00:00,,7/03/2020 0:00:00",
        ]);
        let (dataset, report) = load_dataset(file.path().to_str().unwrap()).unwrap();
        assert_eq!(report.loaded_rows, 2);
        assert_eq!(report.parse_errors, 0);

        let first = &dataset.records[0];
        assert_eq!(first.sex.as_deref(), Some(SEX_FEMALE));
        assert_eq!(first.case_location, "Casa");
        assert_eq!(first.clinical_status, "Leve");
        assert_eq!(first.age, Some(34));
        assert_eq!(
            first.report_date,
            NaiveDate::from_ymd_opt(2020, 3, 6)
        );

        let second = &dataset.records[1];
        assert_eq!(second.department.as_deref(), Some("ATLANTICO"));
        assert_eq!(second.case_location, LOCATION_MISSING);
        assert_eq!(second.clinical_status, STATUS_MISSING);
        assert_eq!(second.recovery.as_deref(), Some("Fallecido"));

        assert_eq!(dataset.departments, vec!["ANTIOQUIA", "ATLANTICO"]);
        assert_eq!(dataset.municipalities, vec!["BARRANQUILLA", "MEDELLIN"]);
    }

    #[test]
    fn unparsable_dates_degrade_to_absent() {
        let file = write_csv(&[
            "1,sin dato,MEDELLIN,ANTIOQUIA,Casa,Activo,20,F,Leve,,,,6/03/2020 0:00:00",
        ]);
        let (dataset, report) = load_dataset(file.path().to_str().unwrap()).unwrap();
        assert_eq!(dataset.records[0].notification_date, None);
        assert!(dataset.records[0].report_date.is_some());
        assert_eq!(report.blank_dates, 1);
    }

    #[test]
    fn row_without_case_id_is_skipped() {
        let file = write_csv(&[
            ",2/03/2020 0:00:00,MEDELLIN,ANTIOQUIA,Casa,Activo,20,F,Leve,,,,6/03/2020 0:00:00",
            "7,2/03/2020 0:00:00,MEDELLIN,ANTIOQUIA,Casa,Activo,20,F,Leve,,,,6/03/2020 0:00:00",
        ]);
        let (dataset, report) = load_dataset(file.path().to_str().unwrap()).unwrap();
        assert_eq!(report.total_rows, 2);
        assert_eq!(report.parse_errors, 1);
        assert_eq!(dataset.records.len(), 1);
        assert_eq!(dataset.records[0].case_id, 7);
    }

    #[test]
    fn missing_column_is_a_load_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "ID de caso,Sexo").unwrap();
        writeln!(file, "1,F").unwrap();
        file.flush().unwrap();
        let err = load_dataset(file.path().to_str().unwrap()).unwrap_err();
        match err {
            LoadError::MissingColumn(col) => assert_eq!(col, "Fecha de notificación"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let err = load_dataset("no_such_file.csv").unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn loading_twice_is_idempotent() {
        let file = write_csv(&[
            "1,2/03/2020 0:00:00,MEDELLIN,ANTIOQUIA,Casa,Recuperado,34,f,Leve,,5/03/2020 0:00:00,20/03/2020 0:00:00,6/03/2020 0:00:00",
            "2,3/03/2020 0:00:00,BOGOTA,BOGOTA D.C.,Hospital UCI,Activo,71,M,Grave,,6/03/2020 0:00:00,,7/03/2020 0:00:00",
        ]);
        let path = file.path().to_str().unwrap();
        let (first, _) = load_dataset(path).unwrap();
        let (second, _) = load_dataset(path).unwrap();
        assert_eq!(first, second);
    }
}
