//! CSV rendering: canonical header row first, then one line per record.

use crate::error::RenderError;
use crate::process::NormalizedTable;

/// Serialize a normalized table to CSV bytes. Values containing
/// delimiters, quotes or newlines get standard CSV quoting from the
/// writer; an empty table is rejected rather than serialized as a lone
/// header line.
pub fn render(table: &NormalizedTable) -> Result<Vec<u8>, RenderError> {
    if table.is_empty() {
        return Err(RenderError::NoData);
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(&table.columns)
        .map_err(|e| RenderError::LayoutFailure(format!("writing header: {e}")))?;
    for row in &table.rows {
        writer
            .write_record(row)
            .map_err(|e| RenderError::LayoutFailure(format!("writing record: {e}")))?;
    }
    writer
        .into_inner()
        .map_err(|e| RenderError::LayoutFailure(format!("flushing csv: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> NormalizedTable {
        NormalizedTable {
            columns: vec!["ORDER DATE".into(), "PRODUCTS".into(), "BDC".into()],
            rows: vec![
                vec![
                    "01-05-2024".into(),
                    "PREMIUM, UNLEADED".into(),
                    "say \"hi\"".into(),
                ],
                vec!["02-05-2024".into(), "GASOIL\nBULK".into(), "JUWEL".into()],
            ],
        }
    }

    #[test]
    fn empty_table_is_rejected() {
        let empty = NormalizedTable {
            columns: vec!["ORDER DATE".into()],
            rows: vec![],
        };
        assert!(matches!(render(&empty), Err(RenderError::NoData)));
    }

    #[test]
    fn header_row_comes_first() {
        let bytes = render(&table()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("ORDER DATE,PRODUCTS,BDC\n"), "got: {text}");
    }

    #[test]
    fn round_trips_through_a_csv_reader() {
        let source = table();
        let bytes = render(&source).unwrap();

        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let header: Vec<String> = reader
            .headers()
            .unwrap()
            .iter()
            .map(str::to_string)
            .collect();
        assert_eq!(header, source.columns);

        let rows: Vec<Vec<String>> = reader
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect();
        assert_eq!(rows, source.rows);
    }
}
