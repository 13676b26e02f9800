use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

use crate::usecases::u601_refresh_tenders::RefreshExecutor;

/// Фоновый воркер обновления реестра закупок.
///
/// Первое обновление — сразу при запуске, затем пауза на полный интервал
/// после завершения каждого цикла, поэтому циклы не пересекаются.
pub struct RefreshWorker {
    executor: Arc<RefreshExecutor>,
    interval: Duration,
}

impl RefreshWorker {
    pub fn new(executor: Arc<RefreshExecutor>, interval: Duration) -> Self {
        Self { executor, interval }
    }

    /// Запускает цикл обновления (работает все время жизни процесса)
    pub async fn run_loop(&self) {
        info!(
            "Tender refresh worker started with interval {} seconds",
            self.interval.as_secs()
        );
        loop {
            self.run_once().await;
            tokio::time::sleep(self.interval).await;
        }
    }

    /// Один цикл; ошибка логируется, прежние данные остаются опубликованными
    pub async fn run_once(&self) {
        match self.executor.refresh().await {
            Ok(report) => info!(
                "Tender registry refreshed: {} rows, {} of {} spreadsheets processed",
                report.total_rows(),
                report.files_processed,
                report.spreadsheets
            ),
            Err(e) => error!("Error during tender registry refresh: {:#}", e),
        }
    }
}
