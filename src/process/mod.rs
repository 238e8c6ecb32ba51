//! Cleaning pipeline that turns the header-heavy spreadsheet export into a
//! canonical row set.
//!
//! Stages run in a fixed order, each feeding the next: drop the boilerplate
//! header rows, stringify every cell, drop blank rows, drop blank columns,
//! keep only depot rows, then project positional columns onto the canonical
//! schema. The whole pipeline is pure: no I/O, and a failure never leaves
//! partial state behind — the caller can simply run it again on fresh input.

use crate::config::{DepotMatch, ReportConfig};
use crate::error::ProcessError;
use crate::fetch::RawTable;
use calamine::Data;
use tracing::debug;

/// The cleaned, filtered report: canonical column names (a subset of the
/// configured schema, in declared order) and one row of text per record,
/// aligned with `columns`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl NormalizedTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Run the full cleaning pipeline over a raw export.
///
/// An empty table at entry yields [`ProcessError::NoInput`] before any
/// stage runs; a table that cleans down to zero depot records yields
/// [`ProcessError::NoMatches`]. Short inputs (fewer rows than the header
/// skip) fall into the latter case rather than faulting.
pub fn normalize(raw: &RawTable, cfg: &ReportConfig) -> Result<NormalizedTable, ProcessError> {
    if raw.is_empty() {
        return Err(ProcessError::NoInput);
    }

    // 1) header skip + 2) stringify
    let mut rows: Vec<Vec<String>> = raw
        .rows
        .iter()
        .skip(cfg.header_rows)
        .map(|row| row.iter().map(cell_text).collect())
        .collect();

    // 3) blank rows
    rows.retain(|row| !row_is_blank(row));

    // 4) blank columns, remembering each survivor's source position
    let (rows, source_cols) = drop_blank_columns(rows);
    debug!(
        rows = rows.len(),
        columns = source_cols.len(),
        "cleaned export"
    );

    // 5) depot filter
    let rows: Vec<Vec<String>> = rows
        .into_iter()
        .filter(|row| row_matches_depot(row, &cfg.depot_spellings, cfg.depot_match))
        .collect();
    if rows.is_empty() {
        return Err(ProcessError::NoMatches);
    }

    // 6) projection onto the canonical schema
    Ok(project_columns(rows, &source_cols, &cfg.columns))
}

/// Cell to text. A missing cell becomes empty text, never a literal
/// "missing" marker; everything else keeps its spreadsheet formatting.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

fn row_is_blank(row: &[String]) -> bool {
    row.iter().all(|cell| cell.trim().is_empty())
}

/// Drop columns whose every cell is blank. Returns the surviving rows and,
/// for each surviving column, its index in the original export — the
/// canonical schema addresses columns by source position, so that index
/// must outlive the removal.
fn drop_blank_columns(rows: Vec<Vec<String>>) -> (Vec<Vec<String>>, Vec<usize>) {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    let kept: Vec<usize> = (0..width)
        .filter(|&col| {
            rows.iter()
                .any(|row| row.get(col).is_some_and(|cell| !cell.trim().is_empty()))
        })
        .collect();

    let rows = rows
        .into_iter()
        .map(|row| {
            kept.iter()
                .map(|&col| row.get(col).cloned().unwrap_or_default())
                .collect()
        })
        .collect();
    (rows, kept)
}

fn row_matches_depot(row: &[String], spellings: &[String], policy: DepotMatch) -> bool {
    let substring_hit = row
        .iter()
        .any(|cell| spellings.iter().any(|depot| cell.contains(depot.as_str())));
    match policy {
        DepotMatch::Substring => substring_hit,
        DepotMatch::SubstringOrBlankTail => {
            substring_hit || row.last().is_some_and(|cell| cell.trim().is_empty())
        }
    }
}

/// Map surviving source columns through the `(source index, name)` schema.
/// Output columns are exactly those present in the input, in the schema's
/// declared order; unmapped columns are dropped.
fn project_columns(
    rows: Vec<Vec<String>>,
    source_cols: &[usize],
    schema: &[(usize, String)],
) -> NormalizedTable {
    let selected: Vec<(usize, &str)> = schema
        .iter()
        .filter_map(|(source, name)| {
            source_cols
                .iter()
                .position(|&kept| kept == *source)
                .map(|pos| (pos, name.as_str()))
        })
        .collect();

    let columns = selected.iter().map(|(_, name)| name.to_string()).collect();
    let rows = rows
        .iter()
        .map(|row| {
            selected
                .iter()
                .map(|(pos, _)| row.get(*pos).cloned().unwrap_or_default())
                .collect()
        })
        .collect();
    NormalizedTable { columns, rows }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_row(cells: &[&str]) -> Vec<Data> {
        cells
            .iter()
            .map(|s| {
                if s.is_empty() {
                    Data::Empty
                } else {
                    Data::String(s.to_string())
                }
            })
            .collect()
    }

    /// Ten rows: seven boilerplate, one header row, two depot records with
    /// values in source columns 0, 2, 5, 9, 10, 12 and 15.
    fn sample_export() -> RawTable {
        let mut rows: Vec<Vec<Data>> = (0..7)
            .map(|i| text_row(&[&format!("DAILY ORDER REPORT {i}"), "", "", ""]))
            .collect();
        rows.push(text_row(&[
            "Date", "", "Number", "", "", "Depot", "", "", "", "Vol", "Price", "", "Brv", "", "",
            "Bdc",
        ]));
        rows.push(text_row(&[
            "01-05-2024",
            "",
            "ORD-1",
            "",
            "",
            "BOST-KUMASI",
            "",
            "",
            "",
            "30000",
            "9.50",
            "",
            "GT-1111-22",
            "",
            "",
            "BLUE OCEAN",
        ]));
        rows.push(text_row(&[
            "01-05-2024",
            "",
            "ORD-2",
            "",
            "",
            "BOST - KUMASI",
            "",
            "",
            "",
            "27000",
            "9.45",
            "",
            "GT-3333-44",
            "",
            "",
            "JUWEL",
        ]));
        RawTable { rows }
    }

    #[test]
    fn empty_input_is_rejected_before_any_stage() {
        let err = normalize(&RawTable::default(), &ReportConfig::default()).unwrap_err();
        assert!(matches!(err, ProcessError::NoInput));
    }

    #[test]
    fn short_input_reports_no_matches_not_an_index_fault() {
        for n in 1..8 {
            let raw = RawTable {
                rows: (0..n).map(|_| text_row(&["BOST-KUMASI"])).collect(),
            };
            let err = normalize(&raw, &ReportConfig::default()).unwrap_err();
            assert!(matches!(err, ProcessError::NoMatches), "n = {n}");
        }
    }

    #[test]
    fn end_to_end_sample_yields_two_canonical_records() {
        let table = normalize(&sample_export(), &ReportConfig::default()).unwrap();
        assert_eq!(
            table.columns,
            vec![
                "ORDER DATE",
                "ORDER NUMBER",
                "PRODUCTS",
                "VOLUME",
                "EX REF PRICE",
                "BRV NUMBER",
                "BDC"
            ]
        );
        assert_eq!(table.rows.len(), 2);
        assert_eq!(
            table.rows[0],
            vec![
                "01-05-2024",
                "ORD-1",
                "BOST-KUMASI",
                "30000",
                "9.50",
                "GT-1111-22",
                "BLUE OCEAN"
            ]
        );
        assert_eq!(table.rows[1][2], "BOST - KUMASI");
    }

    #[test]
    fn one_match_one_miss_keeps_exactly_one_record() {
        let mut raw = sample_export();
        // rewrite the second record to another depot
        raw.rows[9] = text_row(&[
            "01-05-2024",
            "",
            "ORD-2",
            "",
            "",
            "TEMA DEPOT",
            "",
            "",
            "",
            "27000",
            "9.45",
            "",
            "GT-3333-44",
            "",
            "",
            "JUWEL",
        ]);
        let table = normalize(&raw, &ReportConfig::default()).unwrap();
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0][1], "ORD-1");
    }

    #[test]
    fn no_depot_rows_reports_no_matches() {
        let mut raw = sample_export();
        raw.rows.truncate(8);
        let err = normalize(&raw, &ReportConfig::default()).unwrap_err();
        assert!(matches!(err, ProcessError::NoMatches));
    }

    #[test]
    fn null_cells_become_empty_text() {
        assert_eq!(cell_text(&Data::Empty), "");
        assert_eq!(cell_text(&Data::String("x".into())), "x");
        // numbers keep their spreadsheet formatting, no "missing" sentinel
        assert_eq!(cell_text(&Data::Float(30000.0)), "30000");
    }

    #[test]
    fn blank_removal_is_idempotent() {
        let rows = vec![
            vec!["a".to_string(), String::new(), "b".to_string()],
            vec![String::new(), "  ".to_string(), String::new()],
            vec!["c".to_string(), String::new(), String::new()],
        ];

        let mut once = rows.clone();
        once.retain(|row| !row_is_blank(row));
        let (once, kept) = drop_blank_columns(once);
        assert_eq!(kept, vec![0, 2]);

        let mut twice = once.clone();
        twice.retain(|row| !row_is_blank(row));
        let (twice, kept_again) = drop_blank_columns(twice);
        assert_eq!(twice, once);
        assert_eq!(kept_again, vec![0, 1]);
    }

    #[test]
    fn whitespace_only_rows_are_blank() {
        let raw = RawTable {
            rows: (0..9)
                .map(|_| text_row(&["  ", "\t", " "]))
                .collect(),
        };
        let err = normalize(&raw, &ReportConfig::default()).unwrap_err();
        assert!(matches!(err, ProcessError::NoMatches));
    }

    #[test]
    fn projection_emits_canonical_names_in_canonical_order() {
        // only source columns 15 and 0 carry data: output must still be
        // ORDER DATE before BDC
        let mut rows: Vec<Vec<Data>> = (0..7).map(|_| text_row(&["boilerplate"])).collect();
        let mut record = vec![Data::Empty; 16];
        record[0] = Data::String("02-05-2024".into());
        record[15] = Data::String("BOST-KUMASI".into());
        rows.push(record);

        let table = normalize(&RawTable { rows }, &ReportConfig::default()).unwrap();
        assert_eq!(table.columns, vec!["ORDER DATE", "BDC"]);
        assert_eq!(table.rows, vec![vec!["02-05-2024", "BOST-KUMASI"]]);
    }

    #[test]
    fn depot_match_is_case_sensitive_substring() {
        let spellings: Vec<String> = vec!["BOST-KUMASI".into(), "BOST - KUMASI".into()];
        let hit = vec!["x".to_string(), "via BOST-KUMASI depot".to_string()];
        let miss = vec!["bost-kumasi".to_string()];
        assert!(row_matches_depot(&hit, &spellings, DepotMatch::Substring));
        assert!(!row_matches_depot(&miss, &spellings, DepotMatch::Substring));
    }

    #[test]
    fn blank_tail_policy_also_keeps_rows_with_empty_last_cell() {
        let spellings: Vec<String> = vec!["BOST-KUMASI".into()];
        let row = vec!["ORD-9".to_string(), " ".to_string()];
        assert!(!row_matches_depot(
            &row,
            &spellings,
            DepotMatch::Substring
        ));
        assert!(row_matches_depot(
            &row,
            &spellings,
            DepotMatch::SubstringOrBlankTail
        ));
    }

    #[test]
    fn ragged_rows_never_index_fault() {
        let mut rows: Vec<Vec<Data>> = (0..7).map(|_| text_row(&["boilerplate"])).collect();
        rows.push(text_row(&["01-05-2024", "", "ORD-1"]));
        rows.push(text_row(&[
            "01-05-2024",
            "",
            "ORD-2",
            "",
            "",
            "BOST-KUMASI",
        ]));
        let table = normalize(&RawTable { rows }, &ReportConfig::default()).unwrap();
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.columns, vec!["ORDER DATE", "ORDER NUMBER", "PRODUCTS"]);
    }
}
