pub mod geometry;
pub mod path;
pub mod state;

pub use geometry::{Insets, PlotFrame, PriceDomain};
pub use path::{area_path, line_path};
pub use state::{ChartMsg, ChartState, IndicatorVisibility, LoadPhase, ReadyKind, ViewState};
