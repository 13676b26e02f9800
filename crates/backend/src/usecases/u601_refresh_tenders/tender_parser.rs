use contracts::enums::Branch;
use contracts::projections::p950_tender_registry::{Dataset, TenderRow};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::domain::a101_branch_mapping::{classify, LocalityMapping};
use crate::shared::columns::{self, TENDER_LOCALITY, TENDER_NAME};
use crate::shared::spreadsheet::{self, Sheet, SpreadsheetError};

/// Группа 1: наружное освещение
const OUTDOOR_MARKER: &str = "наруж";

/// Группа 2: строительство/монтаж КЛ, ВЛ, ТП
static INSTALLATION_INCLUDE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(КЛ-|ВЛ-|\bТП\b)").expect("valid include pattern"));

/// ...кроме поставок и БКТП
static INSTALLATION_EXCLUDE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)отпу|БКТП").expect("valid exclude pattern"));

/// Результат разбора одного файла закупок
#[derive(Debug, PartialEq)]
pub enum ParseOutcome {
    /// Строки, разложенные по филиалам (только из этого файла)
    Parsed(Dataset),
    /// Нет колонки с наименованием закупки
    NoTenderColumn,
    /// Ни одна строка не прошла фильтры
    NoMatchingRows,
}

/// Подходит ли закупка по наименованию
pub fn is_relevant_tender(name: &str) -> bool {
    let outdoor_lighting = name.to_lowercase().contains(OUTDOOR_MARKER);
    let installation =
        INSTALLATION_INCLUDE.is_match(name) && !INSTALLATION_EXCLUDE.is_match(name);
    outdoor_lighting || installation
}

/// Разбирает файл Excel и раскладывает подходящие закупки по филиалам
pub fn parse_tender_file(
    bytes: &[u8],
    mapping: &LocalityMapping,
) -> Result<ParseOutcome, SpreadsheetError> {
    let sheet = spreadsheet::read_first_sheet(bytes)?;
    Ok(parse_sheet(&sheet, mapping))
}

pub fn parse_sheet(sheet: &Sheet, mapping: &LocalityMapping) -> ParseOutcome {
    let headers: Vec<String> = sheet.headers.iter().map(|h| h.trim().to_string()).collect();

    let tender_col = match columns::find_column(&headers, &TENDER_NAME) {
        Some(col) => col,
        None => return ParseOutcome::NoTenderColumn,
    };
    let locality_col = columns::find_column(&headers, &TENDER_LOCALITY);

    let mut dataset = Dataset::new();
    for cells in &sheet.rows {
        let name = cells.get(tender_col).and_then(|c| c.as_deref()).unwrap_or("");
        if !is_relevant_tender(name) {
            continue;
        }

        let locality = locality_col.and_then(|col| cells.get(col)).and_then(|c| c.as_deref());
        let branch = classify(locality, mapping);
        dataset.push(branch, to_row(&headers, cells, tender_col));
    }

    if dataset.is_empty() {
        ParseOutcome::NoMatchingRows
    } else {
        ParseOutcome::Parsed(dataset)
    }
}

/// Строка целиком; пустое наименование сохраняется как ""
fn to_row(headers: &[String], cells: &[Option<String>], tender_col: usize) -> TenderRow {
    let mut row = TenderRow::new();
    for (idx, (header, cell)) in headers.iter().zip(cells).enumerate() {
        let value = match cell {
            Some(v) => Value::String(v.clone()),
            None if idx == tender_col => Value::String(String::new()),
            None => Value::Null,
        };
        row.insert(header.clone(), value);
    }
    row
}

/// Сводка "филиал: N" по непустым филиалам, для логов
pub fn describe(dataset: &Dataset) -> String {
    dataset
        .iter()
        .filter(|(_, rows)| !rows.is_empty())
        .map(|(branch, rows)| format!("{}: {}", branch, rows.len()))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a101_branch_mapping::MappingEntry;
    use serde_json::json;

    fn sheet(headers: &[&str], rows: &[&[Option<&str>]]) -> Sheet {
        Sheet::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.map(str::to_string)).collect())
                .collect(),
        )
    }

    fn mapping() -> LocalityMapping {
        vec![
            MappingEntry::new("краснодар", "Краснодарские ЭС"),
            MappingEntry::new("армавир", "Армавирские ЭС"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_outdoor_lighting_always_included() {
        assert!(is_relevant_tender("Ремонт сетей наружного освещения"));
        assert!(is_relevant_tender("НАРУЖНОЕ ОСВЕЩЕНИЕ, БКТП"));
        assert!(is_relevant_tender("наружное освещение"));
    }

    #[test]
    fn test_installation_include_and_exclude() {
        assert!(is_relevant_tender("ВЛ-10"));
        assert!(is_relevant_tender("Строительство кл-0,4 кВ"));
        assert!(is_relevant_tender("Реконструкция ТП-125"));
        assert!(is_relevant_tender("Замена трансформатора в ТП"));
        assert!(!is_relevant_tender("ВЛ-10, БКТП"));
        assert!(!is_relevant_tender("Поставка БКТП"));
        assert!(!is_relevant_tender("ВЛ-6 отпуск электроэнергии"));
        // "ТП" внутри слова не считается
        assert!(!is_relevant_tender("Услуги АТП"));
        assert!(!is_relevant_tender("Канцелярские товары"));
        assert!(!is_relevant_tender(""));
    }

    #[test]
    fn test_no_tender_column_skips_file() {
        let sheet = sheet(&["Дата", "Город"], &[&[Some("01.01.2024"), Some("Краснодар")]]);
        assert_eq!(parse_sheet(&sheet, &mapping()), ParseOutcome::NoTenderColumn);
    }

    #[test]
    fn test_no_matching_rows_skips_file() {
        let sheet = sheet(
            &["Наименование закупки"],
            &[&[Some("Бумага офисная")], &[None]],
        );
        assert_eq!(parse_sheet(&sheet, &mapping()), ParseOutcome::NoMatchingRows);
    }

    #[test]
    fn test_rows_routed_by_locality() {
        let sheet = sheet(
            &["№", " Наименование закупки ", "Населенный пункт"],
            &[
                &[Some("1"), Some("Строительство ВЛ-10 кВ"), Some("г. Краснодар")],
                &[Some("2"), Some("Поставка БКТП"), Some("Краснодар")],
                &[Some("3"), Some("Наружное освещение"), Some("Армавир")],
                &[Some("4"), Some("Монтаж КЛ-0,4"), None],
                &[Some("5"), Some("Реконструкция ТП"), Some("Майкоп")],
            ],
        );
        let dataset = match parse_sheet(&sheet, &mapping()) {
            ParseOutcome::Parsed(d) => d,
            other => panic!("unexpected outcome: {:?}", other),
        };

        assert_eq!(dataset.rows(Branch::Krasnodar).len(), 1);
        assert_eq!(dataset.rows(Branch::Armavir).len(), 1);
        let other: Vec<_> = dataset
            .rows(Branch::Other)
            .iter()
            .map(|r| r["№"].clone())
            .collect();
        assert_eq!(other, vec![json!("4"), json!("5")]);

        let row = &dataset.rows(Branch::Krasnodar)[0];
        let keys: Vec<_> = row.keys().cloned().collect();
        assert_eq!(keys, vec!["№", "Наименование закупки", "Населенный пункт"]);
        assert_eq!(row["Населенный пункт"], json!("г. Краснодар"));
        assert_eq!(dataset.rows(Branch::Other)[0]["Населенный пункт"], Value::Null);
    }

    #[test]
    fn test_without_locality_column_everything_is_other() {
        let sheet = sheet(
            &["Наименование", "Сумма"],
            &[&[Some("ВЛ-10 Краснодар"), None]],
        );
        match parse_sheet(&sheet, &mapping()) {
            ParseOutcome::Parsed(d) => {
                assert_eq!(d.rows(Branch::Other).len(), 1);
                assert_eq!(d.rows(Branch::Other)[0]["Сумма"], Value::Null);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_parse_tender_file_rejects_garbage() {
        assert!(parse_tender_file(b"PK\x03\x04broken", &mapping()).is_err());
    }
}
