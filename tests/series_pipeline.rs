//! Wire payload to chart-ready data, end to end: serde decode, normalize,
//! indicator resolution and the CSV view of the result.

use stock_chart_wasm::application::export::csv_export;
use stock_chart_wasm::domain::market_data::{IndicatorKind, IndicatorSet, SeriesResponse};
use wasm_bindgen_test::*;

#[wasm_bindgen_test(unsupported = test)]
fn messy_payload_comes_out_chronological_and_aligned() {
    // out of order, one duplicate day in two date formats, one garbage date,
    // one null close, and a backend SMA-20 column riding along
    let payload: SeriesResponse = serde_json::from_str(
        r#"{
            "currency": "EUR",
            "dates": ["2024-03-04", "2024-03-01", "2024-03-01T00:00:00Z", "whenever", "2024-03-03"],
            "closes": [104.0, 101.0, 999.0, 55.0, null],
            "indicators": { "sma_20": [104.5, 101.5, null, null, 103.5] }
        }"#,
    )
    .expect("tolerant decode");

    let normalized = payload.normalize();
    assert_eq!(normalized.series.closes(), vec![Some(101.0), None, Some(104.0)]);

    let indicators = IndicatorSet::with_backend(&normalized.series, normalized.indicators.as_ref());
    // the backend column survives the reorder and stays row-aligned
    assert!(indicators.available(IndicatorKind::Sma20));
    assert_eq!(indicators.value_at(IndicatorKind::Sma20, 0), Some(101.5));
    assert_eq!(indicators.value_at(IndicatorKind::Sma20, 1), Some(103.5));
    assert_eq!(indicators.value_at(IndicatorKind::Sma20, 2), Some(104.5));
    // three closes are too few to compute the others locally
    assert!(!indicators.available(IndicatorKind::Sma50));
    assert!(!indicators.available(IndicatorKind::Rsi14));

    let text = csv_export(&normalized.series, &indicators).expect("csv");
    let lines: Vec<&str> = text.split("\r\n").collect();
    assert_eq!(lines[1], "2024-03-01T00:00:00Z,101.0000,101.5000,,");
    assert_eq!(lines[2], "2024-03-03T00:00:00Z,,103.5000,,");
    assert_eq!(lines[3], "2024-03-04T00:00:00Z,104.0000,104.5000,,");
}

#[wasm_bindgen_test(unsupported = test)]
fn oversized_backend_arrays_are_clamped_to_the_rows() {
    let payload: SeriesResponse = serde_json::from_str(
        r#"{
            "dates": ["2024-03-01", "2024-03-02"],
            "closes": [101.0, 102.0],
            "indicators": { "rsi": [40.0, 60.0, 70.0, 80.0, 90.0] }
        }"#,
    )
    .expect("decode");

    let normalized = payload.normalize();
    let backend = normalized.indicators.expect("kept");
    assert_eq!(backend.rsi, Some(vec![Some(40.0), Some(60.0)]));
}

#[wasm_bindgen_test(unsupported = test)]
fn one_surviving_row_is_not_plottable() {
    let payload: SeriesResponse = serde_json::from_str(
        r#"{"dates": ["2024-03-01", "later"], "closes": [101.0, 102.0]}"#,
    )
    .expect("decode");

    let normalized = payload.normalize();
    assert_eq!(normalized.series.len(), 1);
    assert!(!normalized.series.is_plottable());
}
