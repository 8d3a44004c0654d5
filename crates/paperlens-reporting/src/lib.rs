pub mod export;
pub mod types;

pub use export::{export_comparison, export_json, export_library};
pub use types::{ExportError, ExportFormat};
