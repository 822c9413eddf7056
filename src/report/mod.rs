pub mod record;

pub use record::{list_reports, load_report, save_debug_log, save_report, PageFailure, RunReport};
