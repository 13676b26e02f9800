use calamine::{Data, Range, Reader};
use std::collections::HashMap;
use std::io::Cursor;
use thiserror::Error;

/// Ошибки чтения книги Excel
#[derive(Debug, Error)]
pub enum SpreadsheetError {
    #[error("cannot read workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("workbook has no worksheets")]
    NoWorksheet,
}

/// Первый лист книги: строка заголовков и строки значений.
///
/// Значения приведены к строкам, пустая ячейка — `None`.
/// Каждая строка имеет ровно `headers.len()` ячеек.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl Sheet {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, None);
                row
            })
            .collect();
        Self { headers, rows }
    }

    fn from_range(range: &Range<Data>) -> Self {
        let mut iter = range.rows();
        let headers = match iter.next() {
            Some(first) => header_names(first),
            None => return Sheet::default(),
        };
        let rows = iter
            .map(|cells| cells.iter().map(cell_value).collect())
            .collect();
        Sheet::new(headers, rows)
    }
}

/// Читает первый лист из `.xlsx` / `.xls` / `.ods`
pub fn read_first_sheet(bytes: &[u8]) -> Result<Sheet, SpreadsheetError> {
    let mut workbook = calamine::open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(SpreadsheetError::NoWorksheet)??;
    Ok(Sheet::from_range(&range))
}

/// Имена колонок: пустой заголовок → "Unnamed: N", повтор → "name.1", "name.2"...
fn header_names(cells: &[Data]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    cells
        .iter()
        .enumerate()
        .map(|(idx, cell)| {
            let base = cell_value(cell).unwrap_or_else(|| format!("Unnamed: {}", idx));
            let count = seen.entry(base.clone()).or_insert(0);
            let name = if *count == 0 {
                base
            } else {
                format!("{}.{}", base, count)
            };
            *count += 1;
            name
        })
        .collect()
}

fn cell_value(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(s.clone()),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => Some(format_float(*f)),
        Data::Bool(b) => Some(if *b { "True" } else { "False" }.to_string()),
        Data::DateTime(dt) => Some(
            dt.as_datetime()
                .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| format_float(dt.as_f64())),
        ),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
        Data::Error(e) => Some(e.to_string()),
    }
}

/// Целые числа без ".0": номера закупок и ИНН хранятся в Excel как float
fn format_float(f: f64) -> String {
    if f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}
