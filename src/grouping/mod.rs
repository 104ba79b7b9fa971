pub mod algorithm;

pub use algorithm::group_by_intervals;
