use futures::future::LocalBoxFuture;
use gloo::net::http::Request;
use once_cell::sync::OnceCell;

use crate::domain::errors::FetchError;
use crate::domain::logging::{LogComponent, LogLevel, get_logger};
use crate::domain::market_data::{SeriesRepository, SeriesResponse, StockId, Timeframe};

const COMPONENT: LogComponent = LogComponent::Infrastructure("SeriesAPI");

/// Where the backend lives. Set once from the host page at mount time.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub base_url: String,
}

static API_CONFIG: OnceCell<ApiConfig> = OnceCell::new();

impl ApiConfig {
    /// First call wins, later calls are ignored and return `false`. Charts on
    /// the same page share one backend.
    pub fn init(base_url: impl Into<String>) -> bool {
        API_CONFIG.set(Self { base_url: base_url.into() }).is_ok()
    }

    pub fn get() -> Option<&'static ApiConfig> {
        API_CONFIG.get()
    }
}

/// REST client for the stock series endpoint.
pub struct HttpSeriesClient {
    base_url: String,
}

impl HttpSeriesClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self { base_url: base_url.trim_end_matches('/').to_string() }
    }

    pub fn from_config() -> Result<Self, FetchError> {
        ApiConfig::get()
            .map(|config| Self::new(config.base_url.clone()))
            .ok_or_else(|| FetchError::BadRequest("series endpoint not configured".to_string()))
    }

    pub fn series_url(&self, stock: &StockId, timeframe: Timeframe) -> String {
        format!(
            "{}/api/stocks/{}/series?range={}",
            self.base_url,
            stock.value(),
            timeframe.as_query()
        )
    }

    async fn fetch(&self, url: String) -> Result<SeriesResponse, FetchError> {
        get_logger().info(COMPONENT, &format!("📡 Fetching series from: {url}"));

        let response = Request::get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Network(format!("{e:?}")))?;

        if !response.ok() {
            get_logger().log_with_metadata(
                LogLevel::Error,
                COMPONENT,
                &format!("❌ series request rejected with HTTP {}", response.status()),
                &url,
            );
            return Err(FetchError::Status(response.status()));
        }

        let payload: SeriesResponse =
            response.json().await.map_err(|e| FetchError::Decode(format!("{e:?}")))?;
        get_logger().info(COMPONENT, &format!("✅ Received {} series rows", payload.dates.len()));
        Ok(payload)
    }
}

impl SeriesRepository for HttpSeriesClient {
    fn fetch_series(
        &self,
        stock: &StockId,
        timeframe: Timeframe,
    ) -> LocalBoxFuture<'_, Result<SeriesResponse, FetchError>> {
        let url = self.series_url(stock, timeframe);
        Box::pin(self.fetch(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_url_has_stable_shape() {
        let client = HttpSeriesClient::new("https://quotes.example.com/");
        let stock = StockId::new("sap").unwrap();
        assert_eq!(
            client.series_url(&stock, Timeframe::SixMonths),
            "https://quotes.example.com/api/stocks/SAP/series?range=6m"
        );
    }

    #[test]
    fn config_gates_client_construction() {
        // the config cell is process-wide, so ordering matters inside one test
        assert!(matches!(
            HttpSeriesClient::from_config(),
            Err(FetchError::BadRequest(_))
        ));
        assert!(ApiConfig::init("https://quotes.example.com"));
        assert!(!ApiConfig::init("https://second.example.com"), "first init wins");
        let client = HttpSeriesClient::from_config().expect("configured");
        let stock = StockId::new("SAP").unwrap();
        let url = client.series_url(&stock, Timeframe::OneYear);
        assert!(url.starts_with("https://quotes.example.com/"));
    }
}
