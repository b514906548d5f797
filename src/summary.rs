use crate::aggregate::{aggregate, Column};
use crate::types::{CaseRecord, ScoreboardRow, DECEASED, ICU, RECOVERED};

/// Which administrative level the scoreboard keys name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SummaryLevel {
    Department,
    Municipality,
}

impl SummaryLevel {
    fn matches(self, record: &CaseRecord, key: &str) -> bool {
        let field = match self {
            SummaryLevel::Department => record.department.as_deref(),
            SummaryLevel::Municipality => record.municipality.as_deref(),
        };
        field == Some(key)
    }
}

/// Build one scoreboard row per key, sorted descending by confirmed count
/// (stable, so ties keep the incoming key order).
///
/// The match count per key is branched on explicitly. A key with a single
/// matching row is scored from that row's case-location alone; a key with
/// many rows is scored from full column counts. A key with no rows yields a
/// zero-filled row rather than an error.
pub fn summarize(records: &[CaseRecord], keys: &[String], level: SummaryLevel) -> Vec<ScoreboardRow> {
    let mut rows: Vec<ScoreboardRow> = keys
        .iter()
        .map(|key| {
            let matches: Vec<&CaseRecord> = records
                .iter()
                .filter(|r| level.matches(r, key))
                .collect();
            match matches.as_slice() {
                [] => ScoreboardRow::empty(key),
                [only] => single_case(key, *only),
                _ => scoreboard(key, &matches),
            }
        })
        .collect();
    rows.sort_by(|a, b| b.confirmed.cmp(&a.confirmed));
    rows
}

/// A key with exactly one confirmed case. The case-location value alone
/// decides which outcome column the case lands in.
fn single_case(key: &str, record: &CaseRecord) -> ScoreboardRow {
    let mut row = ScoreboardRow::empty(key);
    row.confirmed = 1;
    match record.case_location.as_str() {
        RECOVERED => row.recovered = 1,
        DECEASED => row.deceased = 1,
        ICU => row.icu = 1,
        _ => {}
    }
    row
}

fn scoreboard(key: &str, matches: &[&CaseRecord]) -> ScoreboardRow {
    // Confirmed is the last value of the cumulative daily series, i.e. the
    // running total once every reported day has been summed.
    let confirmed = aggregate(matches.iter().copied(), Column::ReportDate, "Casos", true).max_count();
    let deceased = matches.iter().filter(|r| r.case_location == DECEASED).count() as u64;
    let icu = matches.iter().filter(|r| r.case_location == ICU).count() as u64;
    let recovered = matches
        .iter()
        .filter(|r| r.recovery.as_deref() == Some(RECOVERED))
        .count() as u64;
    ScoreboardRow {
        name: key.to_string(),
        confirmed,
        recovered,
        deceased,
        icu,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::test_support::record;

    fn keys(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn scoreboard_counts_and_descending_order() {
        let rows = vec![
            record(1, "A", "Casa", "Activo", "2020-03-01"),
            record(2, "A", "Fallecido", "Fallecido", "2020-03-02"),
            record(3, "B", "Hospital UCI", "Activo", "2020-03-01"),
        ];
        let board = summarize(&rows, &keys(&["A", "B"]), SummaryLevel::Department);
        assert_eq!(
            board,
            vec![
                ScoreboardRow {
                    name: "A".into(),
                    confirmed: 2,
                    recovered: 0,
                    deceased: 1,
                    icu: 0,
                },
                ScoreboardRow {
                    name: "B".into(),
                    confirmed: 1,
                    recovered: 0,
                    deceased: 0,
                    icu: 1,
                },
            ]
        );
    }

    #[test]
    fn absent_key_yields_zero_row() {
        let rows = vec![record(1, "A", "Casa", "Activo", "2020-03-01")];
        let board = summarize(&rows, &keys(&["C"]), SummaryLevel::Department);
        assert_eq!(board, vec![ScoreboardRow::empty("C")]);
    }

    #[test]
    fn single_row_key_scored_from_case_location() {
        let rows = vec![
            record(1, "B", "Hospital UCI", "Activo", "2020-03-01"),
            record(2, "A", "Casa", "Activo", "2020-03-01"),
            record(3, "A", "Casa", "Activo", "2020-03-02"),
        ];
        let board = summarize(&rows, &keys(&["B"]), SummaryLevel::Department);
        assert_eq!(board[0].confirmed, 1);
        assert_eq!(board[0].icu, 1);
        assert_eq!(board[0].recovered, 0);
        assert_eq!(board[0].deceased, 0);
    }

    #[test]
    fn confirmed_equals_row_count_per_region() {
        let rows = vec![
            record(1, "A", "Casa", "Activo", "2020-03-01"),
            record(2, "A", "Casa", "Recuperado", "2020-03-02"),
            record(3, "A", "Casa", "Activo", "2020-03-02"),
            record(4, "B", "Casa", "Activo", "2020-03-05"),
            record(5, "C", "Casa", "Activo", "2020-03-06"),
            record(6, "C", "Casa", "Activo", "2020-03-07"),
        ];
        let all = keys(&["A", "B", "C"]);
        let board = summarize(&rows, &all, SummaryLevel::Department);
        for row in &board {
            let expected = rows
                .iter()
                .filter(|r| r.department.as_deref() == Some(row.name.as_str()))
                .count() as u64;
            assert_eq!(row.confirmed, expected, "region {}", row.name);
        }
        let total: u64 = board.iter().map(|r| r.confirmed).sum();
        assert_eq!(total, rows.len() as u64);
    }

    #[test]
    fn ties_keep_key_order() {
        let rows = vec![
            record(1, "A", "Casa", "Activo", "2020-03-01"),
            record(2, "B", "Casa", "Activo", "2020-03-01"),
        ];
        let board = summarize(&rows, &keys(&["B", "A"]), SummaryLevel::Department);
        let names: Vec<&str> = board.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["B", "A"]);
    }

    #[test]
    fn municipality_level_uses_municipality_column() {
        let mut r1 = record(1, "A", "Casa", "Activo", "2020-03-01");
        r1.municipality = Some("MEDELLIN".into());
        let mut r2 = record(2, "A", "Casa", "Activo", "2020-03-02");
        r2.municipality = Some("MEDELLIN".into());
        let rows = vec![r1, r2];
        let board = summarize(&rows, &keys(&["MEDELLIN"]), SummaryLevel::Municipality);
        assert_eq!(board[0].confirmed, 2);
    }
}
