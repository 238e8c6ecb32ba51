use crate::error::FetchError;
use calamine::{Data, Reader, Xlsx};
use std::io::Cursor;
use tracing::debug;

/// The export exactly as decoded: rows × columns of spreadsheet cells,
/// boilerplate header rows included. Cells keep their spreadsheet types
/// until the normalizer stringifies them.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub rows: Vec<Vec<Data>>,
}

impl RawTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Decode the first worksheet of an xlsx payload into a [`RawTable`].
///
/// A workbook with no sheets or no rows yields [`FetchError::Empty`]; a
/// body that is not a workbook at all is a transport-class failure.
pub fn decode_workbook(bytes: &[u8]) -> Result<RawTable, FetchError> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))
        .map_err(|e| FetchError::Transport(format!("decoding workbook: {e}")))?;

    let sheet = match workbook.sheet_names().first() {
        Some(name) => name.clone(),
        None => return Err(FetchError::Empty),
    };

    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| FetchError::Transport(format!("reading sheet {sheet}: {e}")))?;

    let rows: Vec<Vec<Data>> = range.rows().map(<[Data]>::to_vec).collect();
    debug!(sheet = %sheet, rows = rows.len(), "decoded workbook");

    if rows.is_empty() {
        return Err(FetchError::Empty);
    }
    Ok(RawTable { rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_are_a_transport_failure() {
        let err = decode_workbook(b"not a zip archive").unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)), "got: {err:?}");
    }
}
