use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_xlsxwriter::{Format, Workbook};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::metrics_dto::{DateRange, ExportRequest};
use crate::error::{Error, Result};
use crate::utils::time::format_day;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Excel,
    Json,
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "csv" => Ok(ExportFormat::Csv),
            "excel" => Ok(ExportFormat::Excel),
            "json" => Ok(ExportFormat::Json),
            other => Err(Error::UnsupportedFormat(other.to_string())),
        }
    }
}

impl ExportFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Excel => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ExportFormat::Json => "application/json",
        }
    }

    pub fn filename(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "metrics.csv",
            ExportFormat::Excel => "metrics.xlsx",
            ExportFormat::Json => "metrics.json",
        }
    }
}

/// One exported line: a sample flattened to display form.
#[derive(Debug, Clone, Serialize)]
pub struct ExportRow {
    pub date: String,
    pub metric: String,
    pub value: f64,
}

pub struct ExportFile {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub filename: &'static str,
}

#[derive(Debug, sqlx::FromRow)]
struct SampleRow {
    recorded_at: DateTime<Utc>,
    metric: String,
    value: f64,
}

#[derive(Clone)]
pub struct ExportService {
    pool: PgPool,
}

impl ExportService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Materializes the requested samples in the requested format. The format
    /// string is parsed before anything touches the store, so an unsupported
    /// format never runs a query.
    pub async fn export(&self, req: &ExportRequest) -> Result<ExportFile> {
        let format: ExportFormat = req.format.parse()?;
        let rows = self.load_rows(&req.metric_ids, &req.date_range).await?;

        let bytes = match format {
            ExportFormat::Csv => build_csv(&rows).into_bytes(),
            ExportFormat::Excel => build_xlsx(&rows)?,
            ExportFormat::Json => serde_json::to_vec_pretty(&rows)?,
        };

        tracing::info!(
            format = ?format,
            rows = rows.len(),
            "metrics export generated"
        );

        Ok(ExportFile {
            bytes,
            content_type: format.content_type(),
            filename: format.filename(),
        })
    }

    async fn load_rows(&self, metric_ids: &[Uuid], range: &DateRange) -> Result<Vec<ExportRow>> {
        let samples = sqlx::query_as::<_, SampleRow>(
            r#"
            SELECT ms.recorded_at, m.name AS metric, ms.value
            FROM metric_samples ms
            JOIN metrics m ON m.id = ms.metric_id
            WHERE ms.metric_id = ANY($1)
              AND ms.recorded_at >= $2
              AND ms.recorded_at <= $3
            ORDER BY ms.recorded_at
            "#,
        )
        .bind(metric_ids)
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.pool)
        .await?;

        Ok(samples
            .into_iter()
            .map(|row| ExportRow {
                date: format_day(row.recorded_at),
                metric: row.metric,
                value: row.value,
            })
            .collect())
    }
}

fn build_csv(rows: &[ExportRow]) -> String {
    let mut out = String::from("date,metric,value\n");
    for row in rows {
        out.push_str(&format!(
            "{},{},{}\n",
            csv_escape(&row.date),
            csv_escape(&row.metric),
            row.value
        ));
    }
    out
}

fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn build_xlsx(rows: &[ExportRow]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Metrics")?;

    worksheet.set_column_width(0, 14)?;
    worksheet.set_column_width(1, 28)?;
    worksheet.set_column_width(2, 14)?;

    let header_format = Format::new().set_bold();
    worksheet.write_string_with_format(0, 0, "date", &header_format)?;
    worksheet.write_string_with_format(0, 1, "metric", &header_format)?;
    worksheet.write_string_with_format(0, 2, "value", &header_format)?;

    for (idx, row) in rows.iter().enumerate() {
        let row_idx = idx as u32 + 1;
        worksheet.write_string(row_idx, 0, &row.date)?;
        worksheet.write_string(row_idx, 1, &row.metric)?;
        worksheet.write_number(row_idx, 2, row.value)?;
    }

    let buffer = workbook.save_to_buffer()?;
    Ok(buffer)
}
