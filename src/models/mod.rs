pub mod call;
pub mod report;

pub use call::Call;
pub use report::{Report, ReportFlavor};
