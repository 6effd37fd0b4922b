pub mod json;

pub use json::{ProgressSnapshot, export_snapshot, import_snapshot, restore_snapshot};
