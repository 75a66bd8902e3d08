use std::fmt::{Display, Formatter, Result as FmtResult};

/// Root error type for the chart module.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartError {
    Fetch(FetchError),
    Export(ExportError),
    Mount(MountError),
}

/// Series fetch failures. All of them are recoverable: the chart keeps its
/// previous data and offers a retry.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Transport-level failure (offline, DNS, CORS).
    Network(String),
    /// Server answered with a non-success status code.
    Status(u16),
    /// Body arrived but could not be decoded into a series payload.
    Decode(String),
    /// The request could not even be built (unconfigured endpoint, bad range key).
    BadRequest(String),
}

/// Export failures abort the export only, chart state is untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportError {
    Csv(String),
    /// The SVG markup could not be decoded into an image.
    Decode(String),
    /// Canvas was unavailable or PNG encoding failed.
    Canvas(String),
    /// The browser refused the download handoff.
    Download(String),
}

/// Errors while mounting a chart into the host page.
#[derive(Debug, Clone, PartialEq)]
pub enum MountError {
    ContainerNotFound(String),
    InvalidStock(String),
}

impl Display for ChartError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ChartError::Fetch(e) => write!(f, "Fetch Error: {}", e),
            ChartError::Export(e) => write!(f, "Export Error: {}", e),
            ChartError::Mount(e) => write!(f, "Mount Error: {}", e),
        }
    }
}

impl Display for FetchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            FetchError::Network(msg) => write!(f, "network failure: {}", msg),
            FetchError::Status(code) => write!(f, "server responded with HTTP {}", code),
            FetchError::Decode(msg) => write!(f, "malformed series payload: {}", msg),
            FetchError::BadRequest(msg) => write!(f, "invalid request: {}", msg),
        }
    }
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ExportError::Csv(msg) => write!(f, "CSV assembly failed: {}", msg),
            ExportError::Decode(msg) => write!(f, "SVG decode failed: {}", msg),
            ExportError::Canvas(msg) => write!(f, "canvas rasterization failed: {}", msg),
            ExportError::Download(msg) => write!(f, "download failed: {}", msg),
        }
    }
}

impl Display for MountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            MountError::ContainerNotFound(id) => write!(f, "container '{}' not found", id),
            MountError::InvalidStock(msg) => write!(f, "invalid stock id: {}", msg),
        }
    }
}

impl std::error::Error for ChartError {}
impl std::error::Error for FetchError {}
impl std::error::Error for ExportError {}
impl std::error::Error for MountError {}

impl From<FetchError> for ChartError {
    fn from(error: FetchError) -> Self {
        ChartError::Fetch(error)
    }
}

impl From<ExportError> for ChartError {
    fn from(error: ExportError) -> Self {
        ChartError::Export(error)
    }
}

impl From<MountError> for ChartError {
    fn from(error: MountError) -> Self {
        ChartError::Mount(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn umbrella_prefixes_layer_messages() {
        let fetch: ChartError = FetchError::Status(503).into();
        assert_eq!(fetch.to_string(), "Fetch Error: server responded with HTTP 503");

        let export: ChartError = ExportError::Decode("bad svg".to_string()).into();
        assert_eq!(export.to_string(), "Export Error: SVG decode failed: bad svg");

        let mount: ChartError = MountError::ContainerNotFound("chart".to_string()).into();
        assert_eq!(mount.to_string(), "Mount Error: container 'chart' not found");
    }
}
