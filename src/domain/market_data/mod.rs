pub mod entities;
pub mod indicators;
pub mod repositories;
pub mod value_objects;

pub use entities::PriceSeries;
pub use indicators::{IndicatorKind, IndicatorSet, RSI_PERIOD, rsi, sma};
pub use repositories::{
    BackendIndicators, NormalizedSeries, SeriesRepository, SeriesResponse,
};
pub use value_objects::{PricePoint, StockId, Timeframe, Timestamp};
