//! Statement file ingestion
//!
//! Decodes uploaded bank statements into the loosely-typed cell table the
//! normalizer consumes. Two formats: delimited text (CSV, with `;`/`,`
//! delimiter sniffing for Brazilian exports) and, behind the `xlsx`
//! feature, spreadsheet binaries via calamine.
//!
//! Decode failures are fatal with no partial result; everything after
//! decoding (header inference, field detection, admission) belongs to
//! [`crate::statement`].

use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use crate::error::{Error, Result};
use crate::statement::Cell;

/// Decode a statement file into a cell table
///
/// Dispatches on the file extension: `xlsx`/`xls`/`ods` go through the
/// spreadsheet reader, everything else is treated as delimited text.
pub fn read_table(path: &Path) -> Result<Vec<Vec<Cell>>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        #[cfg(feature = "xlsx")]
        "xlsx" | "xls" | "ods" => read_spreadsheet(path),
        #[cfg(not(feature = "xlsx"))]
        "xlsx" | "xls" | "ods" => Err(Error::Statement(format!(
            "Spreadsheet support is not enabled (rebuild with the `xlsx` feature): {}",
            path.display()
        ))),
        _ => {
            let file = File::open(path)?;
            read_delimited(file)
        }
    }
}

/// Decode delimited text from any reader
///
/// The header row is NOT consumed here — the normalizer owns header
/// inference, so the reader runs in no-headers mode and hands every row
/// through as data.
pub fn read_delimited<R: Read + Seek>(mut reader: R) -> Result<Vec<Vec<Cell>>> {
    let delimiter = sniff_delimiter(&mut reader)?;
    reader.seek(SeekFrom::Start(0))?;

    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(reader);

    let mut table = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let row: Vec<Cell> = record
            .iter()
            .map(|field| {
                let field = field.trim();
                if field.is_empty() {
                    Cell::Empty
                } else {
                    Cell::Text(field.to_string())
                }
            })
            .collect();
        table.push(row);
    }

    if table.is_empty() {
        return Err(Error::Statement("Statement file contains no rows".into()));
    }

    debug!("Decoded {} delimited rows", table.len());
    Ok(table)
}

/// Pick `;` or `,` by counting occurrences in the first line
///
/// Brazilian bank exports commonly use `;` because `,` is the decimal
/// separator.
fn sniff_delimiter<R: Read>(reader: &mut R) -> Result<u8> {
    let mut buf_reader = BufReader::new(reader);
    let mut first_line = String::new();
    buf_reader.read_line(&mut first_line)?;

    let semicolons = first_line.matches(';').count();
    let commas = first_line.matches(',').count();

    Ok(if semicolons > commas { b';' } else { b',' })
}

/// Decode the first worksheet of a spreadsheet binary
#[cfg(feature = "xlsx")]
fn read_spreadsheet(path: &Path) -> Result<Vec<Vec<Cell>>> {
    use calamine::{Data, Reader};

    let mut workbook = calamine::open_workbook_auto(path)
        .map_err(|e| Error::Statement(format!("Failed to open {}: {}", path.display(), e)))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| Error::Statement("Workbook has no sheets".into()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| Error::Statement(format!("Failed to read sheet {}: {}", sheet_name, e)))?;

    let mut table = Vec::new();
    for row in range.rows() {
        let cells: Vec<Cell> = row
            .iter()
            .map(|data| match data {
                Data::String(s) => {
                    let s = s.trim();
                    if s.is_empty() {
                        Cell::Empty
                    } else {
                        Cell::Text(s.to_string())
                    }
                }
                Data::Float(f) => Cell::Number(*f),
                Data::Int(i) => Cell::Number(*i as f64),
                Data::Bool(b) => Cell::Text(b.to_string()),
                Data::DateTime(dt) => Cell::Text(excel_serial_to_date(dt.as_f64())),
                Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
                Data::Error(_) | Data::Empty => Cell::Empty,
            })
            .collect();
        table.push(cells);
    }

    if table.is_empty() {
        return Err(Error::Statement(format!(
            "Sheet {} contains no rows",
            sheet_name
        )));
    }

    debug!("Decoded {} spreadsheet rows from {}", table.len(), sheet_name);
    Ok(table)
}

/// Render an Excel serial date as YYYY-MM-DD
///
/// Excel's epoch is 1899-12-30, accounting for the 1900 leap year bug.
#[cfg(feature = "xlsx")]
fn excel_serial_to_date(serial: f64) -> String {
    let base = chrono::NaiveDate::from_ymd_opt(1899, 12, 30).expect("valid epoch");
    let date = base + chrono::Duration::days(serial as i64);
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_delimited_comma() {
        let csv = "Data,Descrição,Valor\n01/05/2024,Mercado,-120.50\n";
        let table = read_delimited(Cursor::new(csv)).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table[0][0], Cell::Text("Data".to_string()));
        assert_eq!(table[1][1], Cell::Text("Mercado".to_string()));
    }

    #[test]
    fn test_read_delimited_semicolon() {
        // Brazilian export style: `;` delimits, `,` is the decimal separator
        let csv = "Data;Descrição;Valor\n01/05/2024;Mercado;-120,50\n";
        let table = read_delimited(Cursor::new(csv)).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table[1][2], Cell::Text("-120,50".to_string()));
    }

    #[test]
    fn test_empty_cells_become_empty() {
        let csv = "Data,Descrição,Valor\n01/05/2024,,42\n";
        let table = read_delimited(Cursor::new(csv)).unwrap();

        assert_eq!(table[1][1], Cell::Empty);
    }

    #[test]
    fn test_empty_file_is_an_error() {
        let result = read_delimited(Cursor::new(""));
        assert!(matches!(result, Err(Error::Statement(_))));
    }

    #[test]
    fn test_read_table_dispatches_on_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("extrato.csv");
        std::fs::write(&path, "Data;Descrição;Valor\n01/05/2024;Mercado;-120,50\n").unwrap();

        let table = read_table(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table[1][0], Cell::Text("01/05/2024".to_string()));
    }

    #[test]
    fn test_ragged_rows_are_tolerated() {
        let csv = "Data,Descrição,Valor\n01/05/2024,Mercado\n";
        let table = read_delimited(Cursor::new(csv)).unwrap();

        assert_eq!(table[1].len(), 2);
    }

    #[cfg(feature = "xlsx")]
    #[test]
    fn test_excel_serial_to_date() {
        assert_eq!(excel_serial_to_date(45413.0), "2024-05-01");
        assert_eq!(excel_serial_to_date(1.0), "1899-12-31");
    }
}
