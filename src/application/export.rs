//! CSV assembly for the export button. Rasterization lives in the
//! infrastructure layer, this side is pure and host-testable.

use csv::{Terminator, WriterBuilder};

use crate::domain::errors::ExportError;
use crate::domain::market_data::{IndicatorKind, IndicatorSet, PriceSeries, StockId, Timeframe};
use crate::time_utils::format_timestamp_iso;

/// Render the series and all indicator columns as CSV text.
///
/// One row per series point regardless of gaps or toggle state, CRLF line
/// endings, ISO 8601 timestamps, numeric fields with four decimals and gaps
/// as empty fields.
pub fn csv_export(series: &PriceSeries, indicators: &IndicatorSet) -> Result<String, ExportError> {
    let mut writer =
        WriterBuilder::new().terminator(Terminator::CRLF).from_writer(Vec::new());
    writer
        .write_record([
            "timestamp",
            "price",
            IndicatorKind::Sma20.column(),
            IndicatorKind::Sma50.column(),
            IndicatorKind::Rsi14.column(),
        ])
        .map_err(|e| ExportError::Csv(e.to_string()))?;
    for (i, point) in series.points().iter().enumerate() {
        writer
            .write_record([
                format_timestamp_iso(point.ts),
                decimal(point.close),
                decimal(indicators.value_at(IndicatorKind::Sma20, i)),
                decimal(indicators.value_at(IndicatorKind::Sma50, i)),
                decimal(indicators.value_at(IndicatorKind::Rsi14, i)),
            ])
            .map_err(|e| ExportError::Csv(e.to_string()))?;
    }
    let bytes = writer.into_inner().map_err(|e| ExportError::Csv(e.error().to_string()))?;
    String::from_utf8(bytes).map_err(|e| ExportError::Csv(e.to_string()))
}

fn decimal(value: Option<f64>) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => format!("{v:.4}"),
        None => String::new(),
    }
}

/// `SAP_1y.csv`, `SAP_1y.png`.
pub fn export_file_name(stock: &StockId, timeframe: Timeframe, extension: &str) -> String {
    format!("{}_{}.{}", stock.value(), timeframe.as_query(), extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_combines_stock_and_range() {
        let stock = StockId::new("sap").unwrap();
        assert_eq!(export_file_name(&stock, Timeframe::OneYear, "csv"), "SAP_1y.csv");
        assert_eq!(export_file_name(&stock, Timeframe::Max, "png"), "SAP_max.png");
    }
}
