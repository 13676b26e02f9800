use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::enums::Branch;

/// Итог одного цикла обновления реестра закупок
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshReport {
    /// ID цикла (для поиска в логах)
    pub session_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Всего элементов в папке
    pub files_listed: usize,
    /// Из них таблиц Excel
    pub spreadsheets: usize,
    /// Таблиц, давших хотя бы одну строку
    pub files_processed: usize,
    /// Таблиц, пропущенных из-за ошибок или отсутствия нужных строк
    pub files_skipped: usize,

    /// Количество записей в таблице привязки
    pub mapping_entries: usize,
    pub rows_by_branch: BTreeMap<Branch, usize>,
}

impl RefreshReport {
    pub fn total_rows(&self) -> usize {
        self.rows_by_branch.values().sum()
    }
}
