//! JS-facing entry points. The host page calls [`mount_chart`] once per
//! widget placeholder; everything after that is driven from inside Leptos.

use std::rc::Rc;
use std::str::FromStr;

use leptos::*;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::wasm_bindgen;
use web_sys::HtmlElement;

use crate::domain::errors::{ChartError, FetchError, MountError};
use crate::domain::logging::LogComponent;
use crate::domain::market_data::{SeriesRepository, StockId, Timeframe};
use crate::global_state::mounted_charts;
use crate::infrastructure::{ApiConfig, HttpSeriesClient};
use crate::log_info;
use crate::presentation::chart_view::StockChart;

const COMPONENT: LogComponent = LogComponent::Presentation("WasmApi");

/// Mount a chart widget into the container element with id `container_id`.
///
/// `api_base` configures the shared backend endpoint on first use (later
/// calls reuse the existing configuration). `initial_range` takes a range
/// key like `"6m"`; pass `null` or an empty string for the default.
#[wasm_bindgen]
pub fn mount_chart(
    container_id: &str,
    stock_id: &str,
    api_base: &str,
    initial_range: Option<String>,
) -> Result<(), JsValue> {
    let stock = StockId::new(stock_id)
        .map_err(|reason| js_error(MountError::InvalidStock(reason)))?;

    let initial_timeframe = match initial_range.as_deref().map(str::trim).filter(|r| !r.is_empty())
    {
        Some(raw) => Timeframe::from_str(raw).map_err(|_| {
            js_error(FetchError::BadRequest(format!("unknown range key '{raw}'")))
        })?,
        None => Timeframe::default(),
    };

    if !api_base.trim().is_empty() {
        ApiConfig::init(api_base.trim());
    }
    let client = HttpSeriesClient::from_config().map_err(js_error)?;
    let repository: Rc<dyn SeriesRepository> = Rc::new(client);

    let target: HtmlElement = gloo::utils::document()
        .get_element_by_id(container_id)
        .ok_or_else(|| js_error(MountError::ContainerNotFound(container_id.to_string())))?
        .dyn_into()
        .map_err(|_| {
            js_error(MountError::ContainerNotFound(format!(
                "{container_id} is not an HTML element"
            )))
        })?;

    let uid = mounted_charts().get_untracked();
    mounted_charts().set(uid + 1);
    log_info!(COMPONENT, "🎨 mounting chart #{} for {} into '{}'", uid, stock, container_id);

    mount_to(target, move || {
        view! {
            <StockChart
                stock=stock
                repository=repository
                initial_timeframe=initial_timeframe
                uid=uid
            />
        }
    });
    Ok(())
}

/// How many charts this page has mounted so far.
#[wasm_bindgen]
pub fn mounted_chart_count() -> usize {
    mounted_charts().get_untracked()
}

fn js_error(error: impl Into<ChartError>) -> JsValue {
    JsValue::from_str(&error.into().to_string())
}
