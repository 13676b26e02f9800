/// Запись привязки: населенный пункт → филиал.
///
/// `locality` обрезан и в нижнем регистре, `branch` только обрезан:
/// название филиала сверяется с `Branch` точно.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
    pub locality: String,
    pub branch: String,
}

impl MappingEntry {
    pub fn new(locality: &str, branch: &str) -> Self {
        Self {
            locality: locality.trim().to_lowercase(),
            branch: branch.trim().to_string(),
        }
    }
}

/// Таблица привязки в порядке строк исходного файла.
/// После загрузки только читается; порядок определяет приоритет совпадений.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalityMapping {
    entries: Vec<MappingEntry>,
}

impl LocalityMapping {
    pub fn new(entries: Vec<MappingEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<MappingEntry> for LocalityMapping {
    fn from_iter<I: IntoIterator<Item = MappingEntry>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
