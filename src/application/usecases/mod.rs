pub mod get_report;
