pub mod import_outcome;
pub mod key_identifier;
pub mod key_record;
pub mod session_report;
