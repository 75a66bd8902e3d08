//! Drives the chart state machine: dispatches messages into the reducer and
//! runs the async fetches the transitions call for.

use std::cell::RefCell;
use std::rc::Rc;

use futures::future::{AbortHandle, Abortable};
use leptos::*;

use crate::domain::chart::{ChartMsg, ChartState};
use crate::domain::logging::LogComponent;
use crate::domain::market_data::{IndicatorKind, SeriesRepository, Timeframe};
use crate::{log_debug, log_error, log_info};

const COMPONENT: LogComponent = LogComponent::Application("controller");

/// One controller per mounted chart. Cloning shares the underlying signal,
/// repository and abort slot, so widget callbacks can each hold their own
/// copy.
#[derive(Clone)]
pub struct ChartController {
    state: RwSignal<ChartState>,
    repository: Rc<dyn SeriesRepository>,
    inflight: Rc<RefCell<Option<AbortHandle>>>,
}

impl ChartController {
    pub fn new(state: RwSignal<ChartState>, repository: Rc<dyn SeriesRepository>) -> Self {
        Self { state, repository, inflight: Rc::new(RefCell::new(None)) }
    }

    /// Select a timeframe. If the reducer accepts the transition (generation
    /// moves), the superseded request is aborted and a new fetch spawns.
    pub fn select_timeframe(&self, timeframe: Timeframe) {
        self.dispatch_load(ChartMsg::TimeframeSelected(timeframe));
    }

    /// Retry after a failure.
    pub fn retry(&self) {
        self.dispatch_load(ChartMsg::RetryRequested);
    }

    pub fn toggle_indicator(&self, kind: IndicatorKind) {
        self.state.update(|s| s.apply(ChartMsg::IndicatorToggled(kind)));
    }

    pub fn hover(&self, index: Option<usize>) {
        self.state.update(|s| s.apply(ChartMsg::HoverMoved(index)));
    }

    pub fn clear_hover(&self) {
        self.state.update(|s| s.apply(ChartMsg::HoverCleared));
    }

    fn dispatch_load(&self, msg: ChartMsg) {
        let before = self.state.with_untracked(|s| s.generation);
        self.state.update(|s| s.apply(msg));
        let generation = self.state.with_untracked(|s| s.generation);
        if generation == before {
            return;
        }
        self.spawn_fetch(generation);
    }

    fn spawn_fetch(&self, generation: u64) {
        if let Some(previous) = self.inflight.borrow_mut().take() {
            previous.abort();
        }
        let (handle, registration) = AbortHandle::new_pair();
        *self.inflight.borrow_mut() = Some(handle);

        let state = self.state;
        let repository = Rc::clone(&self.repository);
        let (stock, timeframe) =
            state.with_untracked(|s| (s.stock.clone(), s.view.timeframe));
        log_info!(
            COMPONENT,
            "📊 loading {} range {} (request {})",
            stock,
            timeframe.as_query(),
            generation
        );

        spawn_local(async move {
            let fetch = repository.fetch_series(&stock, timeframe);
            match Abortable::new(fetch, registration).await {
                Ok(Ok(response)) => {
                    let normalized = response.normalize();
                    log_info!(
                        COMPONENT,
                        "✅ {} rows for {} (request {})",
                        normalized.series.len(),
                        stock,
                        generation
                    );
                    state.update(|s| {
                        s.apply(ChartMsg::FetchSucceeded {
                            generation,
                            series: normalized.series,
                            backend: normalized.indicators,
                        });
                    });
                }
                Ok(Err(error)) => {
                    log_error!(COMPONENT, "❌ fetch for {} failed: {}", stock, error);
                    state.update(|s| s.apply(ChartMsg::FetchFailed { generation, error }));
                }
                Err(_aborted) => {
                    log_debug!(COMPONENT, "🛑 request {} superseded, dropped", generation);
                }
            }
        });
    }
}
