use super::mapping::{LocalityMapping, MappingEntry};
use crate::shared::columns::{self, MAPPING_BRANCH, MAPPING_LOCALITY};
use crate::shared::remote::MappingSource;
use crate::shared::spreadsheet::{self, Sheet};

/// Загружает таблицу привязки.
///
/// Ошибка скачивания или разбора не фатальна: возвращается пустая таблица,
/// и все закупки попадают в "Прочие".
pub async fn load_mapping(source: &dyn MappingSource) -> LocalityMapping {
    let bytes = match source.fetch_mapping().await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!("Unable to download mapping file: {}", e);
            return LocalityMapping::default();
        }
    };

    let sheet = match spreadsheet::read_first_sheet(&bytes) {
        Ok(sheet) => sheet,
        Err(e) => {
            tracing::warn!("Cannot parse mapping file: {}", e);
            return LocalityMapping::default();
        }
    };

    let mapping = mapping_from_sheet(&sheet);
    tracing::info!("Mapping loaded: {} entries", mapping.len());
    mapping
}

/// Строит таблицу привязки из листа.
///
/// Колонки ищутся по заголовкам; если не найдена хотя бы одна из двух,
/// берутся первые две колонки листа.
pub fn mapping_from_sheet(sheet: &Sheet) -> LocalityMapping {
    let resolved = (
        columns::find_column(&sheet.headers, &MAPPING_LOCALITY),
        columns::find_column(&sheet.headers, &MAPPING_BRANCH),
    );
    let (locality_col, branch_col) = match resolved {
        (Some(l), Some(b)) => (l, b),
        _ if sheet.headers.len() >= 2 => {
            tracing::debug!(
                "Mapping headers {:?} not recognized, using first two columns",
                sheet.headers
            );
            (0, 1)
        }
        _ => {
            tracing::warn!("Mapping file has fewer than two columns");
            return LocalityMapping::default();
        }
    };

    sheet
        .rows
        .iter()
        .filter_map(|row| {
            let locality = non_blank(row.get(locality_col))?;
            let branch = non_blank(row.get(branch_col))?;
            Some(MappingEntry::new(locality, branch))
        })
        .collect()
}

fn non_blank(cell: Option<&Option<String>>) -> Option<&str> {
    cell.and_then(|c| c.as_deref()).filter(|v| !v.trim().is_empty())
}
