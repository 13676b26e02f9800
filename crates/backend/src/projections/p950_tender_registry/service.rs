use contracts::enums::Branch;
use contracts::projections::p950_tender_registry::{RegistryStatusDto, TenderRow};
use serde_json::{Map, Value};

use super::store::TenderStore;
use crate::shared::format::format_last_update;

/// Файл выгрузки
#[derive(Debug, Clone, PartialEq)]
pub struct CsvExport {
    pub file_name: String,
    pub content: Vec<u8>,
}

impl CsvExport {
    fn empty() -> Self {
        Self {
            file_name: "export.csv".to_string(),
            content: Vec::new(),
        }
    }
}

/// Список филиалов и время последнего обновления
pub fn status(store: &TenderStore) -> RegistryStatusDto {
    let snapshot = store.snapshot();
    RegistryStatusDto {
        branches: Branch::names().into_iter().map(str::to_string).collect(),
        last_update: format_last_update(snapshot.refreshed_at),
        last_update_at: snapshot.refreshed_at,
        total_rows: snapshot.dataset.total_rows(),
    }
}

/// Строки одного филиала (`{ "<филиал>": [...] }`) либо весь реестр.
/// Неизвестный филиал заменяется на "Прочие".
pub fn query(store: &TenderStore, filial: Option<&str>) -> Value {
    let snapshot = store.snapshot();
    match filial.map(str::trim).filter(|f| !f.is_empty()) {
        Some(name) => {
            let branch = Branch::from_name_or_other(name);
            let rows = snapshot.dataset.rows(branch).to_vec();
            let mut result = Map::new();
            result.insert(
                branch.display_name().to_string(),
                Value::Array(rows.into_iter().map(Value::Object).collect()),
            );
            Value::Object(result)
        }
        None => serde_json::to_value(&snapshot.dataset).unwrap_or(Value::Null),
    }
}

/// Выгрузка строк филиала в CSV.
///
/// Без `indices` (или если ни один индекс не распознан) выгружается весь
/// филиал; индексы за пределами списка отбрасываются. Неизвестный филиал
/// дает пустой файл.
pub fn export_csv(
    store: &TenderStore,
    filial: Option<&str>,
    indices: Option<&str>,
) -> anyhow::Result<CsvExport> {
    let branch = match filial.and_then(Branch::from_name) {
        Some(branch) => branch,
        None => return Ok(CsvExport::empty()),
    };

    let snapshot = store.snapshot();
    let rows = snapshot.dataset.rows(branch);
    let selected = select_rows(rows, indices);

    Ok(CsvExport {
        file_name: format!("{}.csv", branch.display_name()),
        content: rows_to_csv(&selected)?,
    })
}

/// Индексы вида "0,2,5"; нечисловые элементы пропускаются
pub fn parse_indices(raw: &str) -> Vec<usize> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()))
        .filter_map(|s| s.parse().ok())
        .collect()
}

pub fn select_rows<'a>(rows: &'a [TenderRow], indices: Option<&str>) -> Vec<&'a TenderRow> {
    let parsed = indices.map(parse_indices).unwrap_or_default();
    if parsed.is_empty() {
        return rows.iter().collect();
    }
    parsed.into_iter().filter_map(|i| rows.get(i)).collect()
}

/// Колонки — объединение ключей строк в порядке первого появления
pub fn rows_to_csv(rows: &[&TenderRow]) -> anyhow::Result<Vec<u8>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let mut columns: Vec<&str> = Vec::new();
    for row in rows {
        for key in row.keys() {
            if !columns.contains(&key.as_str()) {
                columns.push(key);
            }
        }
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&columns)?;
    for row in rows {
        writer.write_record(columns.iter().map(|c| cell_text(row.get(*c))))?;
    }
    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to finish CSV export: {}", e))
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
