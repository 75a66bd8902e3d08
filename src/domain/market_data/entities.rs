pub use super::value_objects::{PricePoint, StockId, Timeframe, Timestamp};

/// Domain entity - the closing-price series of one stock over one timeframe.
///
/// A series is immutable once built: timeframe switches and refetches replace
/// it wholesale instead of patching points in. The constructor enforces the
/// ordering invariant (ascending unique timestamps), so downstream index math
/// never has to re-check it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series from raw points: sorts by timestamp and drops duplicate
    /// timestamps, first occurrence wins.
    pub fn from_points(mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| p.ts);
        points.dedup_by_key(|p| p.ts);
        Self { points }
    }

    pub fn empty() -> Self {
        Self { points: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn get(&self, index: usize) -> Option<&PricePoint> {
        self.points.get(index)
    }

    /// Closes in series order, gaps preserved as `None`.
    pub fn closes(&self) -> Vec<Option<f64>> {
        self.points.iter().map(|p| if p.is_valid() { p.close } else { None }).collect()
    }

    /// Number of points carrying a finite close.
    pub fn valid_len(&self) -> usize {
        self.points.iter().filter(|p| p.is_valid()).count()
    }

    /// Index of the newest point with a finite close.
    pub fn last_valid_index(&self) -> Option<usize> {
        self.points.iter().rposition(PricePoint::is_valid)
    }

    /// A series can be drawn as a line once it has two valid points.
    pub fn is_plottable(&self) -> bool {
        self.valid_len() >= 2
    }

    /// Latest finite close, used by the hover readout default.
    pub fn last_close(&self) -> Option<f64> {
        self.last_valid_index().and_then(|i| self.points[i].close)
    }
}
