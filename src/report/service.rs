use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use log::{info, warn};

use crate::db::Database;
use crate::errors::ReportError;
use crate::grouping::group_by_intervals;
use crate::models::Report;
use crate::report::{ReportExporter, ReportRenderer};

/// Builds interval reports from the call store and exports them through a
/// flavor-selected renderer. Holds no state between requests beyond the
/// configured collaborators.
pub struct ReportService {
    db: Database,
    renderers: Vec<Box<dyn ReportRenderer>>,
    exporter: Box<dyn ReportExporter>,
}

impl ReportService {
    pub fn new(
        db: Database,
        renderers: Vec<Box<dyn ReportRenderer>>,
        exporter: Box<dyn ReportExporter>,
    ) -> Self {
        Self {
            db,
            renderers,
            exporter,
        }
    }

    /// Fetches calls in `[start, end]` and buckets them by `interval_size`.
    pub async fn generate_report(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        interval_size: Duration,
    ) -> Result<Report, ReportError> {
        if start > end {
            return Err(ReportError::InvalidDateRange { start, end });
        }
        if interval_size <= Duration::zero() {
            return Err(ReportError::InvalidIntervalSize);
        }

        let calls = self
            .db
            .get_calls_by_date_range(start, end)
            .await
            .map_err(ReportError::Store)?;

        Ok(Report::new(
            interval_size,
            group_by_intervals(&calls, interval_size),
        ))
    }

    /// Generates a report, renders it with the renderer registered under
    /// `flavor` and hands the bytes to the exporter under `name`. Returns the
    /// report so callers can inspect it independently of the exported bytes.
    pub async fn export_report(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        interval_size: Duration,
        name: &str,
        flavor: &str,
    ) -> Result<Report, ReportError> {
        let report = self.generate_report(start, end, interval_size).await?;

        let renderer = self
            .renderers
            .iter()
            .find(|renderer| renderer.flavor() == flavor)
            .ok_or_else(|| {
                warn!("No renderer registered for flavor '{flavor}'");
                ReportError::UnknownFlavor(flavor.to_string())
            })?;

        let rendered = renderer.render_report(&report);
        self.exporter
            .export_report(&rendered, name, flavor)
            .map_err(ReportError::Export)?;

        info!(
            "Exported report '{name}' ({} calls, {} intervals)",
            report.distinct_calls().len(),
            report.bucket_count()
        );

        Ok(report)
    }

    /// Flavors with a registered renderer.
    pub fn flavors(&self) -> BTreeSet<String> {
        self.renderers
            .iter()
            .map(|renderer| renderer.flavor().to_string())
            .collect()
    }
}
