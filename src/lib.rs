pub mod config;
pub mod errors;
pub mod models;
pub mod report;
pub mod series;
pub mod stats;
pub mod storage;

pub use config::Config;
pub use errors::{MetricsError, Result};
pub use report::{build_fleet_summary, build_report, build_report_at, to_json};
pub use series::{CanonicalSeries, RawSample, normalize};
pub use stats::{build_window, build_windows, reduce};
pub use storage::load_document;
