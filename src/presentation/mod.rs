pub mod chart_view;
pub mod wasm_api;
