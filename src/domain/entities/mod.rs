pub mod run_result;
pub mod run_summary;
