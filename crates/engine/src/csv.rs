use std::fs::File;
use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CsvError {
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("file has no header row")]
    EmptyFile,
}

/// A headered CSV file as raw text: the header labels and every non-blank
/// data row, in file order. The first record is always the header — there is
/// no detection heuristic.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

pub fn read_rows(path: &Path) -> Result<CsvTable, CsvError> {
    let file = File::open(path)?;
    parse_rows(file)
}

pub fn parse_rows<R: std::io::Read>(input: R) -> Result<CsvTable, CsvError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(CsvError::EmptyFile);
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue; // blank line
        }
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(CsvTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_headers_and_rows_in_order() {
        let data = b"Date,Payer,Credits\n01/02/2025,ACME,100\n02/02/2025,GLOBEX,200\n";
        let table = parse_rows(&data[..]).unwrap();
        assert_eq!(table.headers, vec!["Date", "Payer", "Credits"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0], vec!["01/02/2025", "ACME", "100"]);
        assert_eq!(table.rows[1], vec!["02/02/2025", "GLOBEX", "200"]);
    }

    #[test]
    fn blank_rows_are_dropped() {
        let data = b"Date,Payer\n,,\n01/02/2025,ACME\n   ,\n";
        let table = parse_rows(&data[..]).unwrap();
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0][1], "ACME");
    }

    #[test]
    fn ragged_rows_survive() {
        let data = b"Date,Payer,Credits,Balance\n01/02/2025,ACME\n";
        let table = parse_rows(&data[..]).unwrap();
        assert_eq!(table.rows[0].len(), 2); // short row kept as-is
    }

    #[test]
    fn cells_keep_raw_text() {
        let data = b"Date,Payer\n01/02/2025,  spaced out  \n";
        let table = parse_rows(&data[..]).unwrap();
        assert_eq!(table.rows[0][1], "  spaced out  ");
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(parse_rows(&b""[..]), Err(CsvError::EmptyFile)));
    }

    #[test]
    fn header_only_file_has_no_rows() {
        let table = parse_rows(&b"Date,Payer,Credits\n"[..]).unwrap();
        assert!(table.rows.is_empty());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = read_rows(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, CsvError::Io(_)));
    }
}
