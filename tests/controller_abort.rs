#![cfg(all(feature = "render", target_arch = "wasm32"))]

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use futures::future::LocalBoxFuture;
use gloo_timers::future::sleep;
use leptos::*;
use stock_chart_wasm::application::ChartController;
use stock_chart_wasm::domain::chart::{ChartState, LoadPhase, ReadyKind};
use stock_chart_wasm::domain::errors::FetchError;
use stock_chart_wasm::domain::market_data::{SeriesRepository, SeriesResponse, StockId, Timeframe};
use wasm_bindgen_test::*;
wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

fn two_day_payload() -> SeriesResponse {
    SeriesResponse {
        dates: vec!["2024-01-01".to_string(), "2024-01-02".to_string()],
        closes: vec![Some(10.0), Some(11.0)],
        indicators: None,
    }
}

/// Answers every request after a fixed delay and records which timeframes
/// were asked for.
struct SlowRepository {
    delay_ms: u64,
    calls: Rc<RefCell<Vec<Timeframe>>>,
}

impl SeriesRepository for SlowRepository {
    fn fetch_series(
        &self,
        _stock: &StockId,
        timeframe: Timeframe,
    ) -> LocalBoxFuture<'_, Result<SeriesResponse, FetchError>> {
        self.calls.borrow_mut().push(timeframe);
        let delay = self.delay_ms;
        Box::pin(async move {
            sleep(Duration::from_millis(delay)).await;
            Ok(two_day_payload())
        })
    }
}

/// Fails the first request, succeeds afterwards.
struct FlakyRepository {
    calls: Rc<RefCell<u32>>,
}

impl SeriesRepository for FlakyRepository {
    fn fetch_series(
        &self,
        _stock: &StockId,
        _timeframe: Timeframe,
    ) -> LocalBoxFuture<'_, Result<SeriesResponse, FetchError>> {
        *self.calls.borrow_mut() += 1;
        let first = *self.calls.borrow() == 1;
        Box::pin(async move {
            sleep(Duration::from_millis(5)).await;
            if first { Err(FetchError::Status(502)) } else { Ok(two_day_payload()) }
        })
    }
}

#[wasm_bindgen_test(async)]
async fn rapid_switch_lands_on_the_last_request() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let state = create_rw_signal(ChartState::new(StockId::new("SAP").unwrap()));
    let controller = ChartController::new(
        state,
        Rc::new(SlowRepository { delay_ms: 40, calls: Rc::clone(&calls) }),
    );

    controller.select_timeframe(Timeframe::OneMonth);
    controller.select_timeframe(Timeframe::SixMonths);
    sleep(Duration::from_millis(150)).await;

    // both requests went out, only the second was allowed to land
    assert_eq!(*calls.borrow(), vec![Timeframe::OneMonth, Timeframe::SixMonths]);
    state.with_untracked(|s| {
        assert_eq!(s.view.timeframe, Timeframe::SixMonths);
        assert_eq!(s.phase, LoadPhase::Ready(ReadyKind::Plotted));
        assert_eq!(s.generation, 2);
    });
}

#[wasm_bindgen_test(async)]
async fn retry_after_failure_reloads() {
    let calls = Rc::new(RefCell::new(0));
    let state = create_rw_signal(ChartState::new(StockId::new("SAP").unwrap()));
    let controller =
        ChartController::new(state, Rc::new(FlakyRepository { calls: Rc::clone(&calls) }));

    controller.select_timeframe(Timeframe::default());
    sleep(Duration::from_millis(50)).await;
    state.with_untracked(|s| {
        assert_eq!(s.phase, LoadPhase::Failed(FetchError::Status(502)));
    });

    controller.retry();
    sleep(Duration::from_millis(50)).await;
    assert_eq!(*calls.borrow(), 2);
    state.with_untracked(|s| {
        assert_eq!(s.phase, LoadPhase::Ready(ReadyKind::Plotted));
        assert_eq!(s.series.len(), 2);
    });
}
