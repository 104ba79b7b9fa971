pub mod cli;
pub mod db;
pub mod errors;
pub mod grouping;
pub mod models;
pub mod report;

pub use db::Database;
pub use errors::ReportError;
pub use models::{Call, Report};
