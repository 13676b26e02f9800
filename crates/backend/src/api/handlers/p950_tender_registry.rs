use axum::{
    extract::Query,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use contracts::projections::p950_tender_registry::RegistryStatusDto;
use serde::Deserialize;

use crate::projections::p950_tender_registry::{service, store};

#[derive(Debug, Deserialize)]
pub struct DataParams {
    pub filial: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExportParams {
    pub filial: Option<String>,
    pub indices: Option<String>,
}

/// GET /api/tenders/status
pub async fn status() -> Json<RegistryStatusDto> {
    Json(service::status(&store::global()))
}

/// GET /api/tenders/data?filial=...
pub async fn data(Query(params): Query<DataParams>) -> Json<serde_json::Value> {
    Json(service::query(&store::global(), params.filial.as_deref()))
}

/// GET /api/tenders/export?filial=...&indices=0,2
pub async fn export(Query(params): Query<ExportParams>) -> Response {
    let result = service::export_csv(
        &store::global(),
        params.filial.as_deref(),
        params.indices.as_deref(),
    );

    match result {
        Ok(export) => {
            tracing::info!(
                "Tender export {}: {} bytes",
                export.file_name,
                export.content.len()
            );
            let disposition = format!(
                "attachment; filename=\"export.csv\"; filename*=UTF-8''{}",
                urlencoding::encode(&export.file_name)
            );
            (
                [
                    (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                export.content,
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to export tenders: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
