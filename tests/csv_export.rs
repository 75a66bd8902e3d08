use stock_chart_wasm::application::export::{csv_export, export_file_name};
use stock_chart_wasm::domain::market_data::{
    BackendIndicators, IndicatorSet, PricePoint, PriceSeries, StockId, Timeframe, Timestamp,
};
use wasm_bindgen_test::*;

const DAY_MS: u64 = 86_400_000;

fn series(closes: &[Option<f64>]) -> PriceSeries {
    PriceSeries::from_points(
        closes
            .iter()
            .enumerate()
            .map(|(i, close)| PricePoint::new(Timestamp::from_millis(i as u64 * DAY_MS), *close))
            .collect(),
    )
}

#[wasm_bindgen_test(unsupported = test)]
fn header_and_gap_rows_match_the_contract() {
    let series = series(&[Some(101.5), None, Some(103.25)]);
    let backend = BackendIndicators {
        sma_20: Some(vec![None, Some(101.375), Some(102.123_456)]),
        sma_50: None,
        rsi: Some(vec![None, None, Some(55.5)]),
    };
    let indicators = IndicatorSet::with_backend(&series, Some(&backend));

    let text = csv_export(&series, &indicators).expect("csv");
    let lines: Vec<&str> = text.split("\r\n").collect();

    assert_eq!(lines[0], "timestamp,price,sma20,sma50,rsi");
    assert_eq!(lines[1], "1970-01-01T00:00:00Z,101.5000,,,");
    assert_eq!(lines[2], "1970-01-02T00:00:00Z,,101.3750,,");
    assert_eq!(lines[3], "1970-01-03T00:00:00Z,103.2500,102.1235,,55.5000");
    assert_eq!(lines[4], "", "file ends with a CRLF");
    assert_eq!(lines.len(), 5);
}

#[wasm_bindgen_test(unsupported = test)]
fn every_point_gets_a_row_even_inside_gaps() {
    let closes: Vec<Option<f64>> =
        (0..40).map(|i| if i % 7 == 3 { None } else { Some(100.0 + i as f64) }).collect();
    let series = series(&closes);
    let indicators = IndicatorSet::compute(&series);

    let text = csv_export(&series, &indicators).expect("csv");
    let rows = text.split("\r\n").filter(|line| !line.is_empty()).count();
    assert_eq!(rows, series.len() + 1);
}

#[wasm_bindgen_test(unsupported = test)]
fn computed_columns_carry_four_decimals() {
    let closes: Vec<Option<f64>> = (1..=25).map(|v| Some(v as f64)).collect();
    let series = series(&closes);
    let indicators = IndicatorSet::compute(&series);

    let text = csv_export(&series, &indicators).expect("csv");
    let lines: Vec<&str> = text.split("\r\n").collect();

    // before the SMA-20 window closes the column stays empty
    assert_eq!(lines[1], "1970-01-01T00:00:00Z,1.0000,,,");
    // index 19 is the first full window: mean of 1..=20
    assert_eq!(lines[20], "1970-01-20T00:00:00Z,20.0000,10.5000,,100.0000");
    // a strictly rising series pins RSI at 100, SMA-50 never fills
    assert_eq!(lines[25], "1970-01-25T00:00:00Z,25.0000,15.5000,,100.0000");
}

#[wasm_bindgen_test(unsupported = test)]
fn empty_series_exports_header_only() {
    let series = PriceSeries::empty();
    let text = csv_export(&series, &IndicatorSet::empty()).expect("csv");
    assert_eq!(text, "timestamp,price,sma20,sma50,rsi\r\n");
}

#[wasm_bindgen_test(unsupported = test)]
fn file_names_use_ticker_and_range_key() {
    let stock = StockId::new("msft").expect("ticker");
    assert_eq!(export_file_name(&stock, Timeframe::SixMonths, "csv"), "MSFT_6m.csv");
    assert_eq!(export_file_name(&stock, Timeframe::Max, "png"), "MSFT_max.png");
}
