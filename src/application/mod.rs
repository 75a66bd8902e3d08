pub mod controller;
pub mod export;

pub use controller::ChartController;
pub use export::{csv_export, export_file_name};
