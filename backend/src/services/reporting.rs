//! Tabular export of calculation results

use axum::{
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::models::OutputFormat;

/// Reporting service for turning result rows into CSV
pub struct ReportingService;

impl ReportingService {
    /// Export rows to CSV with a header line
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record)
                .map_err(|e| AppError::Export(format!("CSV serialization error: {}", e)))?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| AppError::Export(format!("CSV writer error: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| AppError::Export(format!("UTF-8 conversion error: {}", e)))
    }

    /// Render `body` as JSON, or `rows` as a CSV attachment named `filename`
    pub fn respond<B, R>(
        format: OutputFormat,
        body: &B,
        rows: &[R],
        filename: &str,
    ) -> AppResult<Response>
    where
        B: Serialize,
        R: Serialize,
    {
        match format {
            OutputFormat::Json => Ok(Json(body).into_response()),
            OutputFormat::Csv => {
                let csv = Self::export_to_csv(rows)?;
                let disposition = format!("attachment; filename=\"{}\"", filename);
                Ok((
                    [
                        (header::CONTENT_TYPE, "text/csv".to_string()),
                        (header::CONTENT_DISPOSITION, disposition),
                    ],
                    csv,
                )
                    .into_response())
            }
        }
    }
}
