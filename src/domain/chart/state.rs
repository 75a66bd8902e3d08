//! Chart state machine.
//!
//! Every widget interaction and fetch outcome becomes a [`ChartMsg`], and
//! [`ChartState::apply`] is the only place transitions happen. The reducer is
//! synchronous and side-effect free, async work lives in the application
//! layer and reports back through messages carrying the generation token of
//! the request that spawned them.

use strum::IntoEnumIterator;

use crate::domain::errors::FetchError;
use crate::domain::market_data::{
    BackendIndicators, IndicatorKind, IndicatorSet, PricePoint, PriceSeries, StockId, Timeframe,
};

/// What a `Ready` chart actually shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyKind {
    /// At least two valid points, the chart draws.
    Plotted,
    /// Fetch succeeded but the series cannot form a line.
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadPhase {
    Idle,
    Loading,
    Ready(ReadyKind),
    Failed(FetchError),
}

impl LoadPhase {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_plotted(&self) -> bool {
        matches!(self, Self::Ready(ReadyKind::Plotted))
    }
}

/// Which overlays the user switched on. Off by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndicatorVisibility {
    sma20: bool,
    sma50: bool,
    rsi: bool,
}

impl IndicatorVisibility {
    pub fn is_on(&self, kind: IndicatorKind) -> bool {
        match kind {
            IndicatorKind::Sma20 => self.sma20,
            IndicatorKind::Sma50 => self.sma50,
            IndicatorKind::Rsi14 => self.rsi,
        }
    }

    pub fn toggle(&mut self, kind: IndicatorKind) {
        let slot = self.slot(kind);
        *slot = !*slot;
    }

    pub fn set(&mut self, kind: IndicatorKind, on: bool) {
        *self.slot(kind) = on;
    }

    fn slot(&mut self, kind: IndicatorKind) -> &mut bool {
        match kind {
            IndicatorKind::Sma20 => &mut self.sma20,
            IndicatorKind::Sma50 => &mut self.sma50,
            IndicatorKind::Rsi14 => &mut self.rsi,
        }
    }
}

/// Presentation-facing knobs that survive reloads.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewState {
    pub timeframe: Timeframe,
    pub visible: IndicatorVisibility,
    pub hover: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartMsg {
    /// User picked a range button. Selecting the active range of a healthy
    /// chart is a no-op; from `Idle` or `Failed` it always starts a load.
    TimeframeSelected(Timeframe),
    /// Retry button on the error overlay.
    RetryRequested,
    FetchSucceeded {
        generation: u64,
        series: PriceSeries,
        backend: Option<BackendIndicators>,
    },
    FetchFailed {
        generation: u64,
        error: FetchError,
    },
    IndicatorToggled(IndicatorKind),
    HoverMoved(Option<usize>),
    HoverCleared,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartState {
    pub stock: StockId,
    pub phase: LoadPhase,
    pub series: PriceSeries,
    pub indicators: IndicatorSet,
    pub view: ViewState,
    /// Token of the most recent load. Results stamped with an older value
    /// arrive from a superseded request and are discarded.
    pub generation: u64,
}

impl ChartState {
    pub fn new(stock: StockId) -> Self {
        Self {
            stock,
            phase: LoadPhase::Idle,
            series: PriceSeries::empty(),
            indicators: IndicatorSet::empty(),
            view: ViewState::default(),
            generation: 0,
        }
    }

    pub fn apply(&mut self, msg: ChartMsg) {
        match msg {
            ChartMsg::TimeframeSelected(timeframe) => {
                let restartable = matches!(self.phase, LoadPhase::Idle | LoadPhase::Failed(_));
                if timeframe == self.view.timeframe && !restartable {
                    return;
                }
                self.view.timeframe = timeframe;
                self.begin_load();
            }
            ChartMsg::RetryRequested => {
                if matches!(self.phase, LoadPhase::Failed(_)) {
                    self.begin_load();
                }
            }
            ChartMsg::FetchSucceeded { generation, series, backend } => {
                if generation != self.generation {
                    return;
                }
                self.indicators = IndicatorSet::with_backend(&series, backend.as_ref());
                for kind in IndicatorKind::iter() {
                    if self.view.visible.is_on(kind) && !self.indicators.available(kind) {
                        self.view.visible.set(kind, false);
                    }
                }
                self.view.hover = series.last_valid_index();
                self.phase = LoadPhase::Ready(if series.is_plottable() {
                    ReadyKind::Plotted
                } else {
                    ReadyKind::Empty
                });
                self.series = series;
            }
            ChartMsg::FetchFailed { generation, error } => {
                if generation != self.generation {
                    return;
                }
                self.phase = LoadPhase::Failed(error);
            }
            ChartMsg::IndicatorToggled(kind) => {
                if self.indicators.available(kind) {
                    self.view.visible.toggle(kind);
                }
            }
            ChartMsg::HoverMoved(index) => {
                self.view.hover = match index {
                    Some(i) if !self.series.is_empty() => Some(i.min(self.series.len() - 1)),
                    _ => None,
                };
            }
            ChartMsg::HoverCleared => {
                self.view.hover = self.series.last_valid_index();
            }
        }
    }

    fn begin_load(&mut self) {
        self.generation += 1;
        self.phase = LoadPhase::Loading;
    }

    /// Point under the cursor, when the hover index lands on one.
    pub fn hovered_point(&self) -> Option<&PricePoint> {
        self.series.get(self.view.hover?)
    }
}
