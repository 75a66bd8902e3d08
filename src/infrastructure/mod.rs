pub mod export;
pub mod http;
pub mod services;

pub use http::{ApiConfig, HttpSeriesClient};
