pub mod stats;

pub use stats::GetStatsError;
