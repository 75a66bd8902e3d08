use futures::future::LocalBoxFuture;
use serde::Deserialize;

use crate::domain::errors::FetchError;
use crate::domain::logging::LogComponent;
use crate::log_warn;
use crate::time_utils::parse_series_date;

use super::entities::PriceSeries;
use super::value_objects::{PricePoint, StockId, Timeframe};

/// Port for fetching one stock's price history. The HTTP client implements it
/// for production, tests plug in scripted fakes.
pub trait SeriesRepository {
    fn fetch_series(
        &self,
        stock: &StockId,
        timeframe: Timeframe,
    ) -> LocalBoxFuture<'_, Result<SeriesResponse, FetchError>>;
}

/// Wire payload of the series endpoint. Arrays are index-aligned by row;
/// `indicators` is optional, servers without the precompute path omit it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SeriesResponse {
    pub dates: Vec<String>,
    pub closes: Vec<Option<f64>>,
    #[serde(default)]
    pub indicators: Option<BackendIndicators>,
}

/// Server-side indicator arrays. Each is optional independently, and a
/// present array may be shorter or longer than the price rows.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct BackendIndicators {
    #[serde(default)]
    pub sma_20: Option<Vec<Option<f64>>>,
    #[serde(default)]
    pub sma_50: Option<Vec<Option<f64>>>,
    #[serde(default)]
    pub rsi: Option<Vec<Option<f64>>>,
}

/// A response turned into domain shape: chronological, deduplicated, with
/// any backend indicator arrays permuted alongside the rows.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedSeries {
    pub series: PriceSeries,
    pub indicators: Option<BackendIndicators>,
}

struct Row {
    point: PricePoint,
    sma20: Option<f64>,
    sma50: Option<f64>,
    rsi: Option<f64>,
}

impl SeriesResponse {
    /// Normalize the payload for charting.
    ///
    /// Rows are keyed by `dates`: entries whose date does not parse are
    /// dropped, missing closes become gaps, and rows end up sorted by
    /// timestamp with the earliest occurrence winning on duplicates.
    /// Backend indicator values travel with their row through the reorder.
    pub fn normalize(self) -> NormalizedSeries {
        let backend = self.indicators.unwrap_or_default();
        let keep_sma20 = backend.sma_20.is_some();
        let keep_sma50 = backend.sma_50.is_some();
        let keep_rsi = backend.rsi.is_some();
        let sma20_in = backend.sma_20.unwrap_or_default();
        let sma50_in = backend.sma_50.unwrap_or_default();
        let rsi_in = backend.rsi.unwrap_or_default();

        let mut rows: Vec<Row> = Vec::with_capacity(self.dates.len());
        let mut dropped = 0usize;
        for (i, raw_date) in self.dates.iter().enumerate() {
            let Some(ts) = parse_series_date(raw_date) else {
                dropped += 1;
                continue;
            };
            rows.push(Row {
                point: PricePoint::new(ts, self.closes.get(i).copied().flatten()),
                sma20: sma20_in.get(i).copied().flatten(),
                sma50: sma50_in.get(i).copied().flatten(),
                rsi: rsi_in.get(i).copied().flatten(),
            });
        }
        if dropped > 0 {
            log_warn!(
                LogComponent::Domain("series"),
                "dropped {} rows with unparseable dates",
                dropped
            );
        }

        rows.sort_by_key(|row| row.point.ts);
        rows.dedup_by_key(|row| row.point.ts);

        let mut points = Vec::with_capacity(rows.len());
        let mut sma20 = Vec::with_capacity(rows.len());
        let mut sma50 = Vec::with_capacity(rows.len());
        let mut rsi = Vec::with_capacity(rows.len());
        for row in rows {
            points.push(row.point);
            sma20.push(row.sma20);
            sma50.push(row.sma50);
            rsi.push(row.rsi);
        }

        let indicators = (keep_sma20 || keep_sma50 || keep_rsi).then(|| BackendIndicators {
            sma_20: keep_sma20.then_some(sma20),
            sma_50: keep_sma50.then_some(sma50),
            rsi: keep_rsi.then_some(rsi),
        });

        NormalizedSeries { series: PriceSeries::from_points(points), indicators }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(dates: &[&str], closes: &[Option<f64>]) -> SeriesResponse {
        SeriesResponse {
            dates: dates.iter().map(|d| d.to_string()).collect(),
            closes: closes.to_vec(),
            indicators: None,
        }
    }

    #[test]
    fn normalize_sorts_rows_chronologically() {
        let dates = ["2024-01-03", "2024-01-01", "2024-01-02"];
        let normalized = response(&dates, &[Some(3.0), Some(1.0), Some(2.0)]).normalize();
        assert_eq!(normalized.series.closes(), vec![Some(1.0), Some(2.0), Some(3.0)]);
    }

    #[test]
    fn normalize_drops_unparseable_dates() {
        let dates = ["2024-01-01", "not a date", "2024-01-03"];
        let normalized = response(&dates, &[Some(1.0), Some(2.0), Some(3.0)]).normalize();
        assert_eq!(normalized.series.len(), 2);
        assert_eq!(normalized.series.closes(), vec![Some(1.0), Some(3.0)]);
    }

    #[test]
    fn normalize_first_occurrence_wins_on_duplicates() {
        let normalized =
            response(&["2024-01-01", "2024-01-01"], &[Some(1.0), Some(9.0)]).normalize();
        assert_eq!(normalized.series.closes(), vec![Some(1.0)]);
    }

    #[test]
    fn normalize_short_closes_become_gaps() {
        let normalized = response(&["2024-01-01", "2024-01-02"], &[Some(1.0)]).normalize();
        assert_eq!(normalized.series.closes(), vec![Some(1.0), None]);
    }

    #[test]
    fn normalize_carries_indicator_values_through_reorder() {
        let mut payload = response(&["2024-01-02", "2024-01-01"], &[Some(2.0), Some(1.0)]);
        payload.indicators = Some(BackendIndicators {
            sma_20: Some(vec![Some(20.2), Some(20.1)]),
            sma_50: None,
            rsi: None,
        });
        let normalized = payload.normalize();
        let backend = normalized.indicators.expect("indicators kept");
        assert_eq!(backend.sma_20, Some(vec![Some(20.1), Some(20.2)]));
        assert_eq!(backend.sma_50, None);
    }

    #[test]
    fn normalize_without_indicators_yields_none() {
        let normalized = response(&["2024-01-01"], &[Some(1.0)]).normalize();
        assert_eq!(normalized.indicators, None);
    }

    #[test]
    fn payload_parses_with_and_without_indicators() {
        let bare: SeriesResponse =
            serde_json::from_str(r#"{"dates":["2024-01-01"],"closes":[101.5]}"#).expect("bare");
        assert_eq!(bare.indicators, None);

        let full: SeriesResponse = serde_json::from_str(
            r#"{"dates":["2024-01-01"],"closes":[null],"indicators":{"sma_20":[null]}}"#,
        )
        .expect("full");
        assert_eq!(full.closes, vec![None]);
        let backend = full.indicators.expect("present");
        assert_eq!(backend.sma_20, Some(vec![None]));
        assert_eq!(backend.rsi, None);
    }
}
