// Entry point and console flow.
//
// The binary exposes the report engine through a small menu:
// - Option [1] loads and cleans the case-line CSV, printing diagnostics.
// - Option [2] asks for a report granularity (national / departmental /
//   municipal) and a patient-type filter, then previews the summary tables
//   and exports them to CSV/JSON files.
mod aggregate;
mod cache;
mod drilldown;
mod error;
mod loader;
mod output;
mod reports;
mod summary;
mod types;
mod util;

use cache::Memo;
use drilldown::PatientFilter;
use once_cell::sync::Lazy;
use reports::{Report, ReportScope};
use std::io::{self, Write};
use std::sync::Mutex;
use types::Dataset;

// COVID-19 positive cases in Colombia (datos.gov.co).
const FILE: &str = "Casos_positivos_de_COVID-19_en_Colombia.csv";

const SCOREBOARD_FILE: &str = "resumen_regional.csv";
const DAILY_CASES_FILE: &str = "casos_diarios.csv";
const SUMMARY_FILE: &str = "summary.json";

// In-memory app state: the dataset is loaded once and reused across report
// runs in a single session.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| Mutex::new(AppState { data: None }));

// Per-scope report cache. Purely an optimization: cleared whenever the
// dataset is (re)loaded, so cached reports always match the current data.
static REPORT_MEMO: Lazy<Memo<String, Report>> = Lazy::new(Memo::new);

struct AppState {
    data: Option<Dataset>,
}

/// Read a single line of input after printing the common "Enter choice:" prompt.
fn read_choice() -> String {
    print!("Enter choice: ");
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

/// Ask whether to go back to the report selection menu after a report run.
fn prompt_back_to_menu() -> bool {
    loop {
        print!("Back to Report Selection (Y/N): ");
        let _ = io::stdout().flush();
        let mut buf = String::new();
        io::stdin().read_line(&mut buf).ok();
        match buf.trim().to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// Numbered selection from a list; loops until a valid index is entered.
fn choose_from_list(title: &str, items: &[String]) -> Option<String> {
    if items.is_empty() {
        return None;
    }
    println!("{title}:");
    for (i, item) in items.iter().enumerate() {
        println!("[{}] {}", i + 1, item);
    }
    loop {
        match read_choice().parse::<usize>() {
            Ok(n) if (1..=items.len()).contains(&n) => return Some(items[n - 1].clone()),
            _ => println!("Invalid choice. Enter a number between 1 and {}.", items.len()),
        }
    }
}

/// Handle option [1]: load and clean the CSV file.
fn handle_load() {
    match loader::load_dataset(FILE) {
        Ok((data, load_report)) => {
            println!(
                "Processing dataset... ({} of {} rows loaded)",
                util::format_int(load_report.loaded_rows as i64),
                util::format_int(load_report.total_rows as i64)
            );
            if load_report.parse_errors > 0 {
                println!(
                    "Note: {} rows skipped due to parse errors.",
                    util::format_int(load_report.parse_errors as i64)
                );
            }
            if load_report.blank_dates > 0 {
                println!(
                    "Note: {} date values could not be parsed and were left absent.",
                    util::format_int(load_report.blank_dates as i64)
                );
            }
            println!(
                "{} departments, {} municipalities\n",
                util::format_int(data.departments.len() as i64),
                util::format_int(data.municipalities.len() as i64)
            );
            let mut state = APP_STATE.lock().unwrap();
            state.data = Some(data);
            REPORT_MEMO.clear();
        }
        Err(e) => {
            eprintln!("Failed to load dataset: {}\n", e);
        }
    }
}

/// Prompt for the report granularity and resolve it against the loaded sets.
fn prompt_scope(data: &Dataset) -> Option<ReportScope> {
    println!("Report granularity:");
    println!("[1] Nacional");
    println!("[2] Departamental");
    println!("[3] Municipal");
    loop {
        match read_choice().as_str() {
            "1" => return Some(ReportScope::National),
            "2" => {
                let department = choose_from_list("Departamento", &data.departments)?;
                return Some(ReportScope::Departmental(department));
            }
            "3" => {
                let department = choose_from_list("Departamento", &data.departments)?;
                let towns = reports::municipalities_of(
                    data.records
                        .iter()
                        .filter(|r| r.department.as_deref() == Some(department.as_str())),
                );
                let municipality = choose_from_list("Municipio", &towns)?;
                return Some(ReportScope::Municipal {
                    department,
                    municipality,
                });
            }
            _ => println!("Invalid choice. Please enter 1, 2 or 3."),
        }
    }
}

fn prompt_patient_filter() -> PatientFilter {
    println!("Patient type:");
    println!("[1] Reportados");
    println!("[2] Fallecidos");
    println!("[3] Recuperados");
    loop {
        match read_choice().as_str() {
            "1" => return PatientFilter::Reported,
            "2" => return PatientFilter::Deceased,
            "3" => return PatientFilter::Recovered,
            _ => println!("Invalid choice. Please enter 1, 2 or 3."),
        }
    }
}

/// Handle option [2]: build and render one report run.
fn handle_generate_reports() {
    let data = {
        let state = APP_STATE.lock().unwrap();
        state.data.clone()
    };
    let Some(data) = data else {
        println!("Error: No data loaded. Please load the dataset first (option 1).\n");
        return;
    };

    let Some(scope) = prompt_scope(&data) else {
        println!("Nothing to report: the selected level has no entries.\n");
        return;
    };
    let filter = prompt_patient_filter();

    println!("\nGenerating reports...\n");
    let scoped = scope.select(&data);
    let report = REPORT_MEMO.get_or_insert_with(scope.cache_key(), || {
        reports::build_report(&scoped.records, &scoped.keys, scoped.level)
    });

    println!("Histórico de casos reportados en {}", scoped.name);
    output::preview_aggregation(&report.daily_cases.cumulative(), "Fecha de reporte", 5);

    println!("Histórico de casos diarios reportados en {}", scoped.name);
    output::preview_aggregation(&report.daily_cases, "Fecha de reporte", 5);
    if let Err(e) = output::write_aggregation_csv(DAILY_CASES_FILE, &report.daily_cases, "Fecha de reporte") {
        eprintln!("Write error: {}", e);
    }
    println!("(Full daily series exported to {})\n", DAILY_CASES_FILE);

    println!("Distribución por atención de casos reportados");
    output::preview_aggregation(&report.recovery_breakdown, "Recuperado", 10);

    println!("Distribución por estado de casos reportados");
    output::preview_aggregation(&report.status_breakdown, "Estado", 10);

    println!("Distribución por ubicación de casos reportados");
    output::preview_aggregation(&report.location_breakdown, "Ubicación del caso", 10);

    if let Some(board) = &report.scoreboard {
        match scope {
            ReportScope::National => println!("Resumen nacional"),
            _ => println!("Resumen departamental"),
        }
        output::preview_table_rows(board, 10);
        if let Err(e) = output::write_csv(SCOREBOARD_FILE, board) {
            eprintln!("Write error: {}", e);
        }
        println!("(Full scoreboard exported to {})\n", SCOREBOARD_FILE);
    }

    match drilldown::distributions(&scoped.records, filter) {
        Some(drill) => {
            println!("Distribución por sexo de casos {}", filter.label());
            output::preview_aggregation(&drill.by_sex, "Sexo", 10);

            println!("Distribución por edad de casos {}", filter.label());
            output::preview_table_rows(&drill.by_age, drill.by_age.len());
        }
        None => {
            println!("No existen pacientes {}\n", filter.label());
        }
    }

    let summary = reports::dataset_summary(&data);
    if let Err(e) = output::write_json(SUMMARY_FILE, &summary) {
        eprintln!("Write error: {}", e);
    }
    println!("(Dataset totals exported to {})\n", SUMMARY_FILE);
}

fn main() {
    env_logger::init();
    loop {
        println!("Select an option:");
        println!("[1] Load the dataset");
        println!("[2] Generate reports\n");
        match read_choice().as_str() {
            "1" => {
                handle_load();
            }
            "2" => {
                println!();
                handle_generate_reports();
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            _ => {
                println!("Invalid choice. Please enter 1 or 2.\n");
            }
        }
    }
}
