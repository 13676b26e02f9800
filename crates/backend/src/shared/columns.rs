//! Поиск колонок по подстрокам в заголовках.
//!
//! Файлы закупок и файл привязки заполняются вручную, поэтому точных имен
//! колонок нет: каждой роли соответствует набор ключевых подстрок.

/// Роль колонки и ключевые подстроки (в нижнем регистре)
#[derive(Debug, Clone, Copy)]
pub struct ColumnRole {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
}

/// Наименование закупки
pub const TENDER_NAME: ColumnRole = ColumnRole {
    name: "tender_name",
    keywords: &["наименование"],
};

/// Населенный пункт в файле закупок
pub const TENDER_LOCALITY: ColumnRole = ColumnRole {
    name: "tender_locality",
    keywords: &["насел", "город", "мест"],
};

/// Населенный пункт в файле привязки
pub const MAPPING_LOCALITY: ColumnRole = ColumnRole {
    name: "mapping_locality",
    keywords: &["locality", "насел", "город"],
};

/// Филиал в файле привязки
pub const MAPPING_BRANCH: ColumnRole = ColumnRole {
    name: "mapping_branch",
    keywords: &["filial", "филиал"],
};

impl ColumnRole {
    pub fn matches(&self, header: &str) -> bool {
        let header = header.trim().to_lowercase();
        self.keywords.iter().any(|k| header.contains(k))
    }
}

/// Индекс первой колонки, заголовок которой подходит под роль
pub fn find_column<S: AsRef<str>>(headers: &[S], role: &ColumnRole) -> Option<usize> {
    headers.iter().position(|h| role.matches(h.as_ref()))
}
