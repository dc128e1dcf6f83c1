//! mutasi-report: export, reconciliation and console rendering for parsed
//! statements

pub mod console;
pub mod error;
pub mod export;
pub mod reconcile;

pub use console::render_summary;
pub use error::ExportError;
pub use export::{ExportFormat, export, write_csv_bundle, write_json};
pub use reconcile::{Reconciliation, reconcile};
