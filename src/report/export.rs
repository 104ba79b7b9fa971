use anyhow::{Context, Result};
use log::info;

/// Persists rendered report bytes under a destination name. Fire-and-forget:
/// failures propagate, nothing is retried.
pub trait ReportExporter: Send + Sync {
    fn export_report(&self, data: &[u8], name: &str, flavor: &str) -> Result<()>;
}

/// Writes the rendered report to a file at `name`.
pub struct FileReportExporter;

impl ReportExporter for FileReportExporter {
    fn export_report(&self, data: &[u8], name: &str, flavor: &str) -> Result<()> {
        info!("Saving report of flavor '{flavor}' to '{name}'");
        std::fs::write(name, data).with_context(|| format!("failed to write report to {name}"))
    }
}
