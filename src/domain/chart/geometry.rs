/// Padding between the SVG border and the plot area, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Insets {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Insets {
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self { top, right, bottom, left }
    }
}

impl Default for Insets {
    fn default() -> Self {
        Self::new(16.0, 16.0, 24.0, 56.0)
    }
}

/// One pane's pixel geometry. Maps series indices to X and prices to Y, and
/// inverts X back to an index for hover resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotFrame {
    pub width: f64,
    pub height: f64,
    pub insets: Insets,
}

impl PlotFrame {
    pub const fn new(width: f64, height: f64, insets: Insets) -> Self {
        Self { width, height, insets }
    }

    pub fn plot_width(&self) -> f64 {
        (self.width - self.insets.left - self.insets.right).max(0.0)
    }

    pub fn plot_height(&self) -> f64 {
        (self.height - self.insets.top - self.insets.bottom).max(0.0)
    }

    /// X coordinate of the bottom plot edge, where area fills close.
    pub fn baseline_y(&self) -> f64 {
        self.insets.top + self.plot_height()
    }

    /// Screen X for a series index. Indices spread evenly over the plot
    /// width; a series of zero or one points sits at the horizontal center.
    pub fn x_for_index(&self, index: usize, len: usize) -> f64 {
        if len <= 1 {
            return self.insets.left + self.plot_width() / 2.0;
        }
        self.insets.left + self.plot_width() * index as f64 / (len - 1) as f64
    }

    /// Screen Y for a price. Highest price maps to the top edge. A collapsed
    /// domain puts everything at the vertical center.
    pub fn y_for_price(&self, price: f64, domain: &PriceDomain) -> f64 {
        let range = domain.range();
        if range == 0.0 {
            return self.insets.top + self.plot_height() / 2.0;
        }
        let normalized = (price - domain.min) / range;
        self.insets.top + self.plot_height() * (1.0 - normalized)
    }

    /// Nearest series index for a screen X, the inverse of `x_for_index`.
    /// Coordinates outside the plot clamp to the first or last index, so the
    /// result is `None` only for an empty series.
    pub fn index_at_x(&self, x: f64, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        if len == 1 {
            return Some(0);
        }
        let step = self.plot_width() / (len - 1) as f64;
        if step <= 0.0 {
            return Some(0);
        }
        let raw = ((x - self.insets.left) / step).round();
        if raw <= 0.0 {
            return Some(0);
        }
        Some((raw as usize).min(len - 1))
    }
}

/// Inclusive price range of the Y axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceDomain {
    pub min: f64,
    pub max: f64,
}

/// Headroom added above and below the observed extremes.
const DOMAIN_PADDING: f64 = 0.05;
/// Relative half-width used when every value is identical.
const FLAT_EPSILON: f64 = 0.005;

impl Default for PriceDomain {
    /// The unit range, same fallback [`PriceDomain::of_many`] uses for
    /// all-gap input.
    fn default() -> Self {
        Self::fixed(0.0, 1.0)
    }
}

impl PriceDomain {
    pub const fn fixed(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// The RSI pane always spans the full oscillator scale.
    pub const fn oscillator() -> Self {
        Self::fixed(0.0, 100.0)
    }

    pub fn of(values: &[Option<f64>]) -> Self {
        Self::of_many(&[values])
    }

    /// Domain covering every finite value across the given series, padded by
    /// 5% on both sides. All-gap input falls back to the unit range, and a
    /// flat series widens by a value-relative epsilon so the line draws
    /// mid-pane instead of on a zero-height axis.
    pub fn of_many(series: &[&[Option<f64>]]) -> Self {
        let mut bounds: Option<(f64, f64)> = None;
        for values in series {
            for value in values.iter().flatten() {
                if !value.is_finite() {
                    continue;
                }
                bounds = Some(match bounds {
                    Some((lo, hi)) => (lo.min(*value), hi.max(*value)),
                    None => (*value, *value),
                });
            }
        }
        let Some((lo, hi)) = bounds else {
            return Self { min: 0.0, max: 1.0 };
        };
        let span = hi - lo;
        if span == 0.0 {
            let epsilon = lo.abs().max(1.0) * FLAT_EPSILON;
            return Self { min: lo - epsilon, max: hi + epsilon };
        }
        let pad = span * DOMAIN_PADDING;
        Self { min: lo - pad, max: hi + pad }
    }

    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// `count + 1` evenly spaced axis values, ascending from `min` to `max`.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        if count == 0 {
            return Vec::new();
        }
        (0..=count).map(|i| self.min + self.range() * i as f64 / count as f64).collect()
    }
}
