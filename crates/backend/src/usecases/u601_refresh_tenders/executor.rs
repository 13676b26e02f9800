use anyhow::{Context, Result};
use chrono::Utc;
use contracts::projections::p950_tender_registry::Dataset;
use contracts::usecases::u601_refresh_tenders::RefreshReport;
use std::sync::Arc;
use uuid::Uuid;

use super::tender_parser::{self, ParseOutcome};
use crate::domain::a101_branch_mapping::{self, LocalityMapping};
use crate::projections::p950_tender_registry::TenderStore;
use crate::shared::remote::{MappingSource, RemoteFolder, RemoteItem};

/// Executor для UseCase обновления реестра закупок
pub struct RefreshExecutor {
    folder: Arc<dyn RemoteFolder>,
    mapping_source: Arc<dyn MappingSource>,
    store: Arc<TenderStore>,
}

impl RefreshExecutor {
    pub fn new(
        folder: Arc<dyn RemoteFolder>,
        mapping_source: Arc<dyn MappingSource>,
        store: Arc<TenderStore>,
    ) -> Self {
        Self {
            folder,
            mapping_source,
            store,
        }
    }

    /// Один цикл обновления.
    ///
    /// Ошибка получения списка файлов прерывает цикл, опубликованные данные
    /// остаются прежними. Ошибки отдельных файлов и файла привязки только
    /// логируются.
    pub async fn refresh(&self) -> Result<RefreshReport> {
        let session_id = Uuid::new_v4().to_string();
        let started_at = Utc::now();
        tracing::info!("[{}] Starting tender registry refresh", session_id);

        let items = self
            .folder
            .list_files()
            .await
            .context("failed to list remote tender folder")?;
        let spreadsheets: Vec<&RemoteItem> = items.iter().filter(|i| i.is_spreadsheet()).collect();
        tracing::info!(
            "[{}] Folder contains {} items, {} spreadsheets",
            session_id,
            items.len(),
            spreadsheets.len()
        );

        let mapping = a101_branch_mapping::load_mapping(self.mapping_source.as_ref()).await;
        if mapping.is_empty() {
            tracing::warn!(
                "[{}] Mapping is empty, all tenders will be routed to \"Прочие\"",
                session_id
            );
        }

        let mut dataset = Dataset::new();
        let mut processed = 0usize;
        let mut skipped = 0usize;

        for item in &spreadsheets {
            match self.process_file(&session_id, item, &mapping).await {
                Some(part) => {
                    dataset.merge(part);
                    processed += 1;
                }
                None => skipped += 1,
            }
        }

        let finished_at = Utc::now();
        let report = RefreshReport {
            session_id: session_id.clone(),
            started_at,
            finished_at,
            files_listed: items.len(),
            spreadsheets: spreadsheets.len(),
            files_processed: processed,
            files_skipped: skipped,
            mapping_entries: mapping.len(),
            rows_by_branch: dataset.counts(),
        };

        self.store.publish(dataset, finished_at);

        tracing::info!(
            "[{}] Refresh completed: {} rows from {} files ({} skipped) in {} ms",
            session_id,
            report.total_rows(),
            processed,
            skipped,
            (finished_at - started_at).num_milliseconds()
        );
        Ok(report)
    }

    /// Скачивает и разбирает один файл; `None` — файл пропущен
    async fn process_file(
        &self,
        session_id: &str,
        item: &RemoteItem,
        mapping: &LocalityMapping,
    ) -> Option<Dataset> {
        let path = match item.path.as_deref() {
            Some(path) if !path.is_empty() => path,
            _ => {
                tracing::warn!("[{}] Skipping {}: no path in listing", session_id, item.name);
                return None;
            }
        };

        let bytes = match self.folder.fetch_file(path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("[{}] Failed to download {}: {}", session_id, item.name, e);
                return None;
            }
        };

        match tender_parser::parse_tender_file(&bytes, mapping) {
            Ok(ParseOutcome::Parsed(part)) => {
                tracing::info!(
                    "[{}] {}: {}",
                    session_id,
                    item.name,
                    tender_parser::describe(&part)
                );
                Some(part)
            }
            Ok(ParseOutcome::NoTenderColumn) => {
                tracing::warn!(
                    "[{}] Skipping {}: no tender name column",
                    session_id,
                    item.name
                );
                None
            }
            Ok(ParseOutcome::NoMatchingRows) => {
                tracing::debug!("[{}] {}: no matching tenders", session_id, item.name);
                None
            }
            Err(e) => {
                tracing::warn!("[{}] Failed to parse {}: {}", session_id, item.name, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::remote::RemoteError;
    use async_trait::async_trait;
    use contracts::enums::Branch;
    use rust_xlsxwriter::Workbook;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn xlsx(rows: &[&[&str]]) -> Vec<u8> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                if !value.is_empty() {
                    worksheet.write_string(r as u32, c as u16, *value).unwrap();
                }
            }
        }
        workbook.save_to_buffer().unwrap()
    }

    fn item(name: &str) -> RemoteItem {
        RemoteItem {
            name: name.to_string(),
            path: Some(format!("/{}", name)),
            item_type: Some("file".to_string()),
        }
    }

    /// Папка в памяти; `fail_listing` имитирует недоступность API
    struct FakeFolder {
        items: Vec<RemoteItem>,
        files: HashMap<String, Vec<u8>>,
        fail_listing: AtomicBool,
    }

    impl FakeFolder {
        fn new(files: Vec<(&str, Vec<u8>)>, extra: Vec<RemoteItem>) -> Self {
            let mut items: Vec<RemoteItem> = files.iter().map(|(name, _)| item(name)).collect();
            items.extend(extra);
            Self {
                items,
                files: files
                    .into_iter()
                    .map(|(name, bytes)| (format!("/{}", name), bytes))
                    .collect(),
                fail_listing: AtomicBool::new(false),
            }
        }
    }

    #[async_trait]
    impl RemoteFolder for FakeFolder {
        async fn list_files(&self) -> Result<Vec<RemoteItem>, RemoteError> {
            if self.fail_listing.load(Ordering::SeqCst) {
                return Err(RemoteError::Status {
                    url: "https://cloud-api.yandex.net/v1/disk/public/resources".into(),
                    status: 503,
                    body: "unavailable".into(),
                });
            }
            Ok(self.items.clone())
        }

        async fn fetch_file(&self, path: &str) -> Result<Vec<u8>, RemoteError> {
            self.files
                .get(path)
                .cloned()
                .ok_or_else(|| RemoteError::MissingHref(path.to_string()))
        }
    }

    struct FakeMapping(Option<Vec<u8>>);

    #[async_trait]
    impl MappingSource for FakeMapping {
        async fn fetch_mapping(&self) -> Result<Vec<u8>, RemoteError> {
            self.0
                .clone()
                .ok_or_else(|| RemoteError::Decode("mapping unavailable".into()))
        }
    }

    fn mapping_bytes() -> Vec<u8> {
        xlsx(&[
            &["Населенный пункт", "Филиал"],
            &["Краснодар", "Краснодарские ЭС"],
            &["Сочи", "Сочинские ЭС"],
        ])
    }

    fn tenders_a() -> Vec<u8> {
        xlsx(&[
            &["Наименование закупки", "Город"],
            &["Строительство ВЛ-10 кВ", "г. Краснодар"],
            &["Наружное освещение", "Сочи"],
            &["Поставка БКТП", "Сочи"],
        ])
    }

    fn tenders_b() -> Vec<u8> {
        xlsx(&[
            &["Наименование", "Населенный пункт"],
            &["Реконструкция ТП-5", "Краснодар"],
            &["Монтаж КЛ-0,4", "Анапа"],
        ])
    }

    fn executor(folder: Arc<FakeFolder>, mapping: FakeMapping) -> (RefreshExecutor, Arc<TenderStore>) {
        let store = Arc::new(TenderStore::new());
        let executor = RefreshExecutor::new(folder, Arc::new(mapping), Arc::clone(&store));
        (executor, store)
    }

    #[tokio::test]
    async fn test_refresh_publishes_classified_rows() {
        let folder = Arc::new(FakeFolder::new(
            vec![("a.xlsx", tenders_a()), ("b.XLS", tenders_b())],
            vec![
                item("notes.txt"),
                RemoteItem {
                    name: "Архив.xlsx".into(),
                    path: Some("/Архив.xlsx".into()),
                    item_type: Some("dir".into()),
                },
            ],
        ));
        let (executor, store) = executor(folder, FakeMapping(Some(mapping_bytes())));

        let report = executor.refresh().await.unwrap();
        assert_eq!(report.files_listed, 4);
        assert_eq!(report.spreadsheets, 2);
        assert_eq!(report.files_processed, 2);
        assert_eq!(report.files_skipped, 0);
        assert_eq!(report.mapping_entries, 2);
        assert_eq!(report.total_rows(), 4);

        let snapshot = store.snapshot();
        assert!(snapshot.refreshed_at.is_some());
        assert_eq!(snapshot.dataset.iter().count(), Branch::COUNT);

        // порядок файлов сохраняется внутри филиала
        let krasnodar: Vec<_> = snapshot
            .dataset
            .rows(Branch::Krasnodar)
            .iter()
            .map(|r| {
                r.get("Наименование закупки")
                    .or_else(|| r.get("Наименование"))
                    .cloned()
                    .unwrap()
            })
            .collect();
        assert_eq!(
            krasnodar,
            vec![json!("Строительство ВЛ-10 кВ"), json!("Реконструкция ТП-5")]
        );
        assert_eq!(snapshot.dataset.rows(Branch::Sochi).len(), 1);
        assert_eq!(snapshot.dataset.rows(Branch::Other).len(), 1);
    }

    #[tokio::test]
    async fn test_bad_files_are_skipped() {
        let mut folder = FakeFolder::new(
            vec![("broken.xlsx", b"not excel".to_vec()), ("a.xlsx", tenders_a())],
            vec![item("missing.xlsx")],
        );
        folder.items.push(RemoteItem {
            name: "nopath.xlsx".into(),
            path: None,
            item_type: None,
        });
        let (executor, store) = executor(Arc::new(folder), FakeMapping(Some(mapping_bytes())));

        let report = executor.refresh().await.unwrap();
        assert_eq!(report.spreadsheets, 4);
        assert_eq!(report.files_processed, 1);
        assert_eq!(report.files_skipped, 3);
        assert_eq!(store.snapshot().dataset.total_rows(), 2);
    }

    #[tokio::test]
    async fn test_mapping_failure_routes_everything_to_other() {
        let folder = Arc::new(FakeFolder::new(vec![("a.xlsx", tenders_a())], vec![]));
        let (executor, store) = executor(folder, FakeMapping(None));

        let report = executor.refresh().await.unwrap();
        assert_eq!(report.mapping_entries, 0);

        let snapshot = store.snapshot();
        assert_eq!(snapshot.dataset.rows(Branch::Other).len(), 2);
        assert_eq!(snapshot.dataset.total_rows(), 2);
    }

    #[tokio::test]
    async fn test_listing_failure_keeps_previous_snapshot() {
        let folder = Arc::new(FakeFolder::new(vec![("a.xlsx", tenders_a())], vec![]));
        let (executor, store) = executor(Arc::clone(&folder), FakeMapping(Some(mapping_bytes())));

        executor.refresh().await.unwrap();
        let before = store.snapshot();

        folder.fail_listing.store(true, Ordering::SeqCst);
        assert!(executor.refresh().await.is_err());

        let after = store.snapshot();
        assert!(Arc::ptr_eq(&before, &after));
        assert_eq!(*before, *after);
    }

    #[tokio::test]
    async fn test_listing_failure_before_first_refresh() {
        let folder = Arc::new(FakeFolder::new(vec![], vec![]));
        folder.fail_listing.store(true, Ordering::SeqCst);
        let (executor, store) = executor(folder, FakeMapping(Some(mapping_bytes())));

        assert!(executor.refresh().await.is_err());
        let snapshot = store.snapshot();
        assert!(snapshot.refreshed_at.is_none());
        assert!(snapshot.dataset.is_empty());
    }
}
