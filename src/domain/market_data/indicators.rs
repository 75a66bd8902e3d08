use std::collections::VecDeque;

use strum::{AsRefStr, Display as StrumDisplay, EnumIter, EnumString};

use super::entities::PriceSeries;
use super::repositories::BackendIndicators;

/// The closed set of overlays this chart knows how to draw. Adding one means
/// adding a variant, the compiler then points at every site that must learn
/// about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, EnumIter, EnumString, AsRefStr)]
pub enum IndicatorKind {
    #[strum(serialize = "sma_20")]
    Sma20,
    #[strum(serialize = "sma_50")]
    Sma50,
    #[strum(serialize = "rsi")]
    Rsi14,
}

impl IndicatorKind {
    /// Samples needed before the first value can exist: the SMA window, or
    /// period + 1 closes for RSI (fourteen deltas need fifteen closes).
    pub fn min_samples(&self) -> usize {
        match self {
            Self::Sma20 => 20,
            Self::Sma50 => 50,
            Self::Rsi14 => RSI_PERIOD + 1,
        }
    }

    /// Column name in CSV exports.
    pub fn column(&self) -> &'static str {
        match self {
            Self::Sma20 => "sma20",
            Self::Sma50 => "sma50",
            Self::Rsi14 => "rsi",
        }
    }

    /// Toggle label in the indicator bar.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Sma20 => "SMA 20",
            Self::Sma50 => "SMA 50",
            Self::Rsi14 => "RSI 14",
        }
    }

    /// The RSI draws into its own 0-100 pane below the price chart.
    pub fn is_oscillator(&self) -> bool {
        matches!(self, Self::Rsi14)
    }
}

pub const RSI_PERIOD: usize = 14;

/// Simple moving average over a rolling window, O(n) via a running sum.
///
/// Output is index-aligned with the input. A gap (missing or non-finite close)
/// clears the window: averaging across a data hole would silently blend
/// unrelated regimes, so the first value after a gap appears a full window
/// later. Entries before the window fills are `None`.
pub fn sma(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if window == 0 {
        return out;
    }
    let mut win: VecDeque<f64> = VecDeque::with_capacity(window + 1);
    let mut sum = 0.0;
    for (i, value) in values.iter().enumerate() {
        match value {
            Some(close) if close.is_finite() => {
                sum += close;
                win.push_back(*close);
                if win.len() > window {
                    if let Some(evicted) = win.pop_front() {
                        sum -= evicted;
                    }
                }
                if win.len() == window {
                    out[i] = Some(sum / window as f64);
                }
            }
            _ => {
                win.clear();
                sum = 0.0;
            }
        }
    }
    out
}

/// Relative Strength Index with Wilder smoothing.
///
/// The seed at index `period` of a run is the simple mean of the first
/// `period` deltas; afterwards gains and losses decay recursively with
/// `avg = (avg * (period - 1) + x) / period`. A zero average loss pins the
/// value at 100 rather than dividing by zero. Gaps reset the accumulation the
/// same way the SMA window restarts.
pub fn rsi(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 {
        return out;
    }
    let mut prev: Option<f64> = None;
    let mut gain_sum = 0.0;
    let mut loss_sum = 0.0;
    let mut deltas = 0usize;
    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    for (i, value) in values.iter().enumerate() {
        match value {
            Some(close) if close.is_finite() => {
                if let Some(prev_close) = prev {
                    let delta = close - prev_close;
                    let gain = delta.max(0.0);
                    let loss = (-delta).max(0.0);
                    if deltas < period {
                        gain_sum += gain;
                        loss_sum += loss;
                        deltas += 1;
                        if deltas == period {
                            avg_gain = gain_sum / period as f64;
                            avg_loss = loss_sum / period as f64;
                            out[i] = Some(rsi_from_averages(avg_gain, avg_loss));
                        }
                    } else {
                        avg_gain = (avg_gain * (period as f64 - 1.0) + gain) / period as f64;
                        avg_loss = (avg_loss * (period as f64 - 1.0) + loss) / period as f64;
                        out[i] = Some(rsi_from_averages(avg_gain, avg_loss));
                    }
                }
                prev = Some(*close);
            }
            _ => {
                prev = None;
                gain_sum = 0.0;
                loss_sum = 0.0;
                deltas = 0;
            }
        }
    }
    out
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 { 100.0 } else { 100.0 - 100.0 / (1.0 + avg_gain / avg_loss) }
}

/// All indicator series for one price series, index-aligned with it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IndicatorSet {
    pub sma20: Vec<Option<f64>>,
    pub sma50: Vec<Option<f64>>,
    pub rsi: Vec<Option<f64>>,
}

impl IndicatorSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Compute every indicator locally from the series closes.
    pub fn compute(series: &PriceSeries) -> Self {
        let closes = series.closes();
        Self { sma20: sma(&closes, 20), sma50: sma(&closes, 50), rsi: rsi(&closes, RSI_PERIOD) }
    }

    /// Prefer server-computed arrays where the payload carries them, falling
    /// back to local computation per indicator. A provided array is trusted
    /// as-is; entries past its end count as gaps.
    pub fn with_backend(series: &PriceSeries, backend: Option<&BackendIndicators>) -> Self {
        let Some(b) = backend else {
            return Self::compute(series);
        };
        let closes = series.closes();
        let fit = |provided: &Option<Vec<Option<f64>>>| {
            provided.as_ref().map(|arr| {
                let mut fitted = arr.clone();
                fitted.resize(closes.len(), None);
                fitted
            })
        };
        Self {
            sma20: fit(&b.sma_20).unwrap_or_else(|| sma(&closes, 20)),
            sma50: fit(&b.sma_50).unwrap_or_else(|| sma(&closes, 50)),
            rsi: fit(&b.rsi).unwrap_or_else(|| rsi(&closes, RSI_PERIOD)),
        }
    }

    pub fn get(&self, kind: IndicatorKind) -> &[Option<f64>] {
        match kind {
            IndicatorKind::Sma20 => &self.sma20,
            IndicatorKind::Sma50 => &self.sma50,
            IndicatorKind::Rsi14 => &self.rsi,
        }
    }

    /// An indicator is available once it produced at least one value. Short
    /// series and gap-riddled series fail this check, and their toggles render
    /// disabled instead of erroring.
    pub fn available(&self, kind: IndicatorKind) -> bool {
        self.get(kind).iter().any(Option::is_some)
    }

    pub fn value_at(&self, kind: IndicatorKind, index: usize) -> Option<f64> {
        self.get(kind).get(index).copied().flatten()
    }
}
