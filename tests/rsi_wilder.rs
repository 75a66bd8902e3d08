use stock_chart_wasm::domain::market_data::{
    IndicatorKind, IndicatorSet, PricePoint, PriceSeries, RSI_PERIOD, Timestamp, rsi,
};
use wasm_bindgen_test::*;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn series(closes: &[Option<f64>]) -> PriceSeries {
    let points = closes
        .iter()
        .enumerate()
        .map(|(i, close)| PricePoint::new(Timestamp::from_millis(i as u64 * 86_400_000), *close))
        .collect();
    PriceSeries::from_points(points)
}

#[wasm_bindgen_test(unsupported = test)]
fn values_start_at_the_period_index() {
    let closes: Vec<Option<f64>> = (1..=20).map(|v| Some(v as f64)).collect();
    let result = rsi(&closes, RSI_PERIOD);
    assert!(result[..RSI_PERIOD].iter().all(Option::is_none));
    assert!(result[RSI_PERIOD].is_some());
}

#[wasm_bindgen_test(unsupported = test)]
fn seed_is_the_simple_mean_of_first_deltas() {
    // deltas: +1 +1 -1 -> avg_gain 2/3, avg_loss 1/3, rs 2, rsi 100 - 100/3
    let closes = vec![Some(10.0), Some(11.0), Some(12.0), Some(11.0)];
    let result = rsi(&closes, 3);
    let seed = result[3].expect("seed at period index");
    assert!(approx(seed, 100.0 - 100.0 / 3.0), "seed {seed}");
}

#[wasm_bindgen_test(unsupported = test)]
fn recursion_smooths_after_the_seed() {
    // next delta +2: avg_gain (2/3*2+2)/3 = 10/9, avg_loss (1/3*2+0)/3 = 2/9
    // rs = 5, rsi = 100 - 100/6
    let closes = vec![Some(10.0), Some(11.0), Some(12.0), Some(11.0), Some(13.0)];
    let result = rsi(&closes, 3);
    let value = result[4].expect("smoothed value");
    assert!(approx(value, 100.0 - 100.0 / 6.0), "value {value}");
}

#[wasm_bindgen_test(unsupported = test)]
fn pure_uptrend_pins_at_one_hundred() {
    let closes: Vec<Option<f64>> = (1..=10).map(|v| Some(v as f64)).collect();
    let result = rsi(&closes, 3);
    for value in result.into_iter().skip(3) {
        assert_eq!(value, Some(100.0));
    }
}

#[wasm_bindgen_test(unsupported = test)]
fn values_stay_inside_the_scale() {
    let closes: Vec<Option<f64>> = [100.0, 92.0, 104.0, 88.0, 111.0, 90.0, 107.0, 95.0, 102.0]
        .iter()
        .map(|v| Some(*v))
        .collect();
    for value in rsi(&closes, 4).into_iter().flatten() {
        assert!((0.0..=100.0).contains(&value), "out of scale: {value}");
    }
}

#[wasm_bindgen_test(unsupported = test)]
fn gap_restarts_the_accumulation_run() {
    let closes = vec![
        Some(10.0),
        Some(11.0),
        Some(12.0),
        None,
        Some(10.0),
        Some(11.0),
        Some(12.0),
        Some(11.0),
    ];
    let result = rsi(&closes, 3);
    // the run before the gap never reaches three deltas, the one after
    // completes at index 7
    assert!(result[..7].iter().all(Option::is_none));
    assert!(result[7].is_some());
}

#[wasm_bindgen_test(unsupported = test)]
fn fourteen_closes_are_not_enough_for_rsi_fourteen() {
    let closes: Vec<Option<f64>> = (0..RSI_PERIOD).map(|v| Some(v as f64)).collect();
    let set = IndicatorSet::compute(&series(&closes));
    assert!(!set.available(IndicatorKind::Rsi14));

    let closes: Vec<Option<f64>> = (0..=RSI_PERIOD).map(|v| Some(v as f64)).collect();
    let set = IndicatorSet::compute(&series(&closes));
    assert!(set.available(IndicatorKind::Rsi14));
}
