use derive_more::{Constructor, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display as StrumDisplay, EnumIter, EnumString};

/// Value Object - epoch milliseconds, UTC.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    From,
    Into,
    Deref,
    Constructor,
    Serialize,
    Deserialize,
)]
pub struct Timestamp(u64);

impl Timestamp {
    pub fn value(&self) -> u64 {
        self.0
    }

    pub fn from_millis(value: u64) -> Self {
        Self(value)
    }
}

/// Value Object - instrument identifier ("SAP", "AAPL", ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deref, Display, Serialize, Deserialize)]
#[display(fmt = "{}", _0)]
pub struct StockId(String);

impl StockId {
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err("stock id cannot be empty".to_string());
        }
        Ok(Self(trimmed.to_uppercase()))
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

/// Value Object - chart range selectable in the timeframe bar. The serialized
/// form doubles as the REST `range` query value.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    StrumDisplay,
    EnumIter,
    EnumString,
    AsRefStr,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum Timeframe {
    #[strum(serialize = "1m")]
    #[serde(rename = "1m")]
    OneMonth,

    #[strum(serialize = "3m")]
    #[serde(rename = "3m")]
    ThreeMonths,

    #[strum(serialize = "6m")]
    #[serde(rename = "6m")]
    SixMonths,

    #[default]
    #[strum(serialize = "1y")]
    #[serde(rename = "1y")]
    OneYear,

    #[strum(serialize = "3y")]
    #[serde(rename = "3y")]
    ThreeYears,

    #[strum(serialize = "5y")]
    #[serde(rename = "5y")]
    FiveYears,

    #[strum(serialize = "max")]
    #[serde(rename = "max")]
    Max,
}

impl Timeframe {
    pub fn as_query(&self) -> &str {
        self.as_ref()
    }

    /// Ranges longer than a year label the x-axis by month, the rest by day.
    pub fn spans_years(&self) -> bool {
        matches!(self, Self::ThreeYears | Self::FiveYears | Self::Max)
    }
}

/// Value Object - one sample of the series. `close` is `None` where the venue
/// reported no trade; gaps are never interpolated away.
#[derive(Debug, Clone, Copy, PartialEq, Constructor, Serialize, Deserialize)]
pub struct PricePoint {
    pub ts: Timestamp,
    pub close: Option<f64>,
}

impl PricePoint {
    /// A point counts as valid only with a finite close.
    pub fn is_valid(&self) -> bool {
        self.close.is_some_and(f64::is_finite)
    }
}
