use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::enums::Branch;

/// Строка закупки: все колонки исходного файла в исходном порядке.
/// Значение ячейки — строка либо `null`, если ячейка пустая.
pub type TenderRow = serde_json::Map<String, serde_json::Value>;

/// Набор закупок, разложенный по филиалам.
///
/// Всегда содержит все 12 филиалов (списки могут быть пустыми).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<Branch, Vec<TenderRow>>")]
pub struct Dataset {
    #[serde(flatten)]
    buckets: BTreeMap<Branch, Vec<TenderRow>>,
}

impl Dataset {
    pub fn new() -> Self {
        Self {
            buckets: Branch::ALL.into_iter().map(|b| (b, Vec::new())).collect(),
        }
    }

    pub fn rows(&self, branch: Branch) -> &[TenderRow] {
        self.buckets.get(&branch).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn push(&mut self, branch: Branch, row: TenderRow) {
        self.buckets.entry(branch).or_default().push(row);
    }

    /// Дописывает строки `other` в конец соответствующих списков
    pub fn merge(&mut self, other: Dataset) {
        for (branch, rows) in other.buckets {
            self.buckets.entry(branch).or_default().extend(rows);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Branch, &[TenderRow])> {
        self.buckets.iter().map(|(b, rows)| (*b, rows.as_slice()))
    }

    pub fn total_rows(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_rows() == 0
    }

    /// Количество строк по каждому филиалу
    pub fn counts(&self) -> BTreeMap<Branch, usize> {
        self.buckets.iter().map(|(b, rows)| (*b, rows.len())).collect()
    }
}

impl Default for Dataset {
    fn default() -> Self {
        Self::new()
    }
}

impl From<BTreeMap<Branch, Vec<TenderRow>>> for Dataset {
    fn from(buckets: BTreeMap<Branch, Vec<TenderRow>>) -> Self {
        let mut dataset = Dataset::new();
        for (branch, rows) in buckets {
            dataset.buckets.insert(branch, rows);
        }
        dataset
    }
}

/// Состояние реестра для главной страницы
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryStatusDto {
    pub branches: Vec<String>,
    /// "%Y-%m-%d %H:%M UTC" либо "никогда"
    pub last_update: String,
    pub last_update_at: Option<DateTime<Utc>>,
    pub total_rows: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(name: &str) -> TenderRow {
        let mut r = TenderRow::new();
        r.insert("Наименование".into(), json!(name));
        r
    }

    #[test]
    fn test_new_dataset_has_all_branches() {
        let dataset = Dataset::new();
        assert_eq!(dataset.iter().count(), Branch::COUNT);
        assert!(dataset.is_empty());
        for branch in Branch::ALL {
            assert!(dataset.rows(branch).is_empty());
        }
    }

    #[test]
    fn test_merge_keeps_order() {
        let mut acc = Dataset::new();
        acc.push(Branch::Sochi, row("a"));

        let mut part = Dataset::new();
        part.push(Branch::Sochi, row("b"));
        part.push(Branch::Other, row("c"));
        acc.merge(part);

        let names: Vec<_> = acc
            .rows(Branch::Sochi)
            .iter()
            .map(|r| r["Наименование"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(acc.rows(Branch::Other).len(), 1);
        assert_eq!(acc.total_rows(), 3);
    }

    #[test]
    fn test_serializes_keyed_by_branch_name() {
        let mut dataset = Dataset::new();
        dataset.push(Branch::Krasnodar, row("ВЛ-10"));
        let value = serde_json::to_value(&dataset).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), Branch::COUNT);
        assert_eq!(obj["Краснодарские ЭС"][0]["Наименование"], json!("ВЛ-10"));
        assert_eq!(obj["Прочие"], json!([]));
    }

    #[test]
    fn test_deserialize_fills_missing_branches() {
        let dataset: Dataset =
            serde_json::from_value(json!({ "Сочинские ЭС": [{ "Наименование": "x" }] })).unwrap();
        assert_eq!(dataset.iter().count(), Branch::COUNT);
        assert_eq!(dataset.rows(Branch::Sochi).len(), 1);
    }
}
