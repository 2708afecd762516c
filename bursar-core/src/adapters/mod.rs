//! Adapter implementations of the port traits

pub mod csv_source;
pub mod demo;
pub mod duckdb;
pub mod json_source;

pub use csv_source::CsvUserSource;
pub use demo::DemoSource;
pub use duckdb::DuckDbStore;
pub use json_source::{JsonRecordSource, JsonUserSource};
