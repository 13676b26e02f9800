use chrono::{DateTime, Utc};
use contracts::projections::p950_tender_registry::Dataset;
use once_cell::sync::Lazy;
use std::sync::{Arc, RwLock};

/// Опубликованное состояние реестра: данные и время их получения
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TenderSnapshot {
    pub dataset: Dataset,
    /// `None` — успешных обновлений еще не было
    pub refreshed_at: Option<DateTime<Utc>>,
}

/// In-memory хранилище реестра закупок.
///
/// Снимок заменяется целиком под коротким write-lock; читатели получают
/// `Arc` на неизменяемый снимок и никогда не видят частично обновленных данных.
#[derive(Debug, Default)]
pub struct TenderStore {
    current: RwLock<Arc<TenderSnapshot>>,
}

static TENDER_STORE: Lazy<Arc<TenderStore>> = Lazy::new(|| Arc::new(TenderStore::new()));

/// Общее хранилище процесса
pub fn global() -> Arc<TenderStore> {
    Arc::clone(&*TENDER_STORE)
}

impl TenderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Текущий снимок
    pub fn snapshot(&self) -> Arc<TenderSnapshot> {
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&*guard)
    }

    /// Публикует новые данные вместо текущих
    pub fn publish(&self, dataset: Dataset, refreshed_at: DateTime<Utc>) {
        let snapshot = Arc::new(TenderSnapshot {
            dataset,
            refreshed_at: Some(refreshed_at),
        });
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        *guard = snapshot;
    }
}
