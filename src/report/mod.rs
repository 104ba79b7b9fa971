pub mod export;
pub mod render;
pub mod service;

pub use export::{FileReportExporter, ReportExporter};
pub use render::{ReportRenderer, TextReportRenderer};
pub use service::ReportService;
