//! Concrete adapter implementations for ports.

pub mod caching_locator;
pub mod csv_report_adapter;
pub mod directory_locator;
pub mod file_config_adapter;
pub mod ticker_table_adapter;
