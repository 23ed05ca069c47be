use std::collections::HashMap;
use std::fs;
use std::io::{Read, Seek};
use std::path::Path;

use calamine::{open_workbook_auto, open_workbook_auto_from_rs, DataType, Range, Reader, Sheets};

use crate::error::SheetError;
use crate::raw_row::{Cell, RawRow};

/// Reads the rows of an uploaded sheet, header row excluded.
///
/// Workbooks (`.xlsx`, `.xlsm`, `.xls`, `.ods`) use the first worksheet.
/// `.csv` files are read as text, `.json` files as an array of row objects.
pub fn read_rows(path: &Path) -> Result<Vec<RawRow>, SheetError> {
    let extension = path
        .extension()
        .and_then(|extension| extension.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    tracing::debug!(path = %path.display(), "Reading question sheet");

    match extension.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => {
            let mut workbook = open_workbook_auto(path)?;
            rows_from_workbook(&mut workbook)
        }
        "csv" => rows_from_csv(fs::File::open(path)?),
        "json" => rows_from_json(&fs::read(path)?),
        other => Err(SheetError::UnsupportedFormat(other.to_owned())),
    }
}

/// Reads an in-memory workbook, such as an uploaded file body.
pub fn read_workbook_bytes(bytes: Vec<u8>) -> Result<Vec<RawRow>, SheetError> {
    let mut workbook = open_workbook_auto_from_rs(std::io::Cursor::new(bytes))?;

    rows_from_workbook(&mut workbook)
}

pub fn rows_from_workbook<RS: Read + Seek>(
    workbook: &mut Sheets<RS>,
) -> Result<Vec<RawRow>, SheetError> {
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(SheetError::NoWorksheet)??;

    rows_from_range(&range)
}

pub fn rows_from_range(range: &Range<DataType>) -> Result<Vec<RawRow>, SheetError> {
    let mut rows = range.rows();
    let headers = header_names(
        rows.next()
            .ok_or(SheetError::EmptySheet)?
            .iter()
            .map(|data| cell_from_data(data).as_text().unwrap_or_default()),
    );

    if headers.iter().all(Option::is_none) {
        return Err(SheetError::EmptySheet);
    }

    Ok(rows
        .map(|cells| {
            headers
                .iter()
                .zip(cells)
                .filter_map(|(header, data)| {
                    header
                        .as_ref()
                        .map(|header| (header.clone(), cell_from_data(data)))
                })
                .collect()
        })
        .collect())
}

pub fn rows_from_csv<R: Read>(reader: R) -> Result<Vec<RawRow>, SheetError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = header_names(reader.headers()?.iter().map(str::to_owned));
    if headers.iter().all(Option::is_none) {
        return Err(SheetError::EmptySheet);
    }

    reader
        .records()
        .map(|record| -> Result<RawRow, SheetError> {
            let record = record?;

            Ok(headers
                .iter()
                .zip(record.iter())
                .filter_map(|(header, value)| {
                    header
                        .as_ref()
                        .map(|header| (header.clone(), Cell::from(value)))
                })
                .collect())
        })
        .collect()
}

pub fn rows_from_json(raw_data: &[u8]) -> Result<Vec<RawRow>, SheetError> {
    Ok(serde_json::from_slice(raw_data)?)
}

fn cell_from_data(data: &DataType) -> Cell {
    match data {
        DataType::Empty | DataType::Error(_) => Cell::Empty,
        DataType::String(text) => Cell::Text(text.clone()),
        DataType::Float(number) => Cell::Number(*number),
        DataType::Int(number) => Cell::Number(*number as f64),
        DataType::Bool(value) => Cell::Bool(*value),
        other => Cell::Text(other.to_string()),
    }
}

/// Trims header names, drops blank ones and numbers repeats as
/// `Name.1`, `Name.2`, ...
fn header_names(raw: impl Iterator<Item = String>) -> Vec<Option<String>> {
    let mut seen: HashMap<String, usize> = HashMap::new();

    raw.map(|name| {
        let name = name.trim().to_owned();
        if name.is_empty() {
            return None;
        }

        let count = seen.entry(name.to_lowercase()).or_insert(0);
        let header = if *count == 0 {
            name
        } else {
            format!("{name}.{count}")
        };
        *count += 1;

        Some(header)
    })
    .collect()
}
