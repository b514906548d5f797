use crate::aggregate::AggregationResult;
use serde::Serialize;
use std::error::Error;
use tabled::builder::Builder;
use tabled::{settings::Style, Table, Tabled};

pub fn write_csv<T: Serialize>(path: &str, rows: &[T]) -> Result<(), Box<dyn Error>> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Export an aggregation as a two-column CSV. The key column is named by
/// the caller since the result only knows its count label.
pub fn write_aggregation_csv(
    path: &str,
    result: &AggregationResult,
    key_header: &str,
) -> Result<(), Box<dyn Error>> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record([key_header, result.label.as_str()])?;
    for (key, count) in &result.rows {
        wtr.write_record([key.to_string(), count.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &str, value: &T) -> Result<(), Box<dyn Error>> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

/// Print the first `max_rows` rows of a report as a markdown table.
pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().cloned().take(max_rows).collect();
    if slice.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}

/// Print the first `max_rows` groups of an aggregation as a markdown table.
/// Built by hand because the key column name varies per report.
pub fn preview_aggregation(result: &AggregationResult, key_header: &str, max_rows: usize) {
    if result.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let mut builder = Builder::default();
    builder.push_record([key_header, result.label.as_str()]);
    for (key, count) in result.rows.iter().take(max_rows) {
        builder.push_record([key.to_string(), count.to_string()]);
    }
    let mut table = builder.build();
    table.with(Style::markdown());
    println!("{}\n", table);
}
