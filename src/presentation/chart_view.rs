//! 🦀 Leptos components for the stock chart widget.

use std::rc::Rc;

use leptos::*;
use strum::IntoEnumIterator;

use crate::application::{ChartController, csv_export, export_file_name};
use crate::domain::chart::{
    ChartState, IndicatorVisibility, Insets, LoadPhase, PlotFrame, PriceDomain, ReadyKind,
    area_path, line_path,
};
use crate::domain::errors::ExportError;
use crate::domain::logging::LogComponent;
use crate::domain::market_data::{IndicatorKind, SeriesRepository, StockId, Timeframe};
use crate::global_state::{export_notice, exporting};
use crate::infrastructure::export::{download_bytes, download_text, rasterize_svg};
use crate::log_error;
use crate::time_utils::{format_date_full, format_date_label};

const COMPONENT: LogComponent = LogComponent::Presentation("StockChart");

const CHART_WIDTH: f64 = 800.0;
const PRICE_PANE_HEIGHT: f64 = 420.0;
const RSI_PANE_HEIGHT: f64 = 140.0;
const CHART_INSETS: Insets = Insets::new(16.0, 16.0, 24.0, 56.0);
pub const CHART_BACKGROUND: &str = "#10141b";

const OVERLAY_KINDS: [IndicatorKind; 2] = [IndicatorKind::Sma20, IndicatorKind::Sma50];
const ALL_KINDS: [IndicatorKind; 3] =
    [IndicatorKind::Sma20, IndicatorKind::Sma50, IndicatorKind::Rsi14];

/// Widget stylesheet. Served from a `<style>` element on mount and embedded
/// into the serialized SVG at PNG export, which renders outside the page
/// stylesheet.
const CHART_CSS: &str = r#"
.stock-chart {
    font-family: 'SF Pro Display', -apple-system, BlinkMacSystemFont, sans-serif;
    background: #10141b;
    border: 1px solid #2a3442;
    border-radius: 10px;
    padding: 16px;
    color: #e0e6ec;
    max-width: 832px;
}
.chart-head {
    display: flex;
    align-items: baseline;
    gap: 14px;
    margin-bottom: 10px;
}
.stock-name { font-size: 20px; font-weight: bold; color: #72c685; }
.last-price { font-size: 18px; }
.hover-readout {
    margin-left: auto;
    font-family: 'Courier New', monospace;
    font-size: 12px;
    color: #aab4c0;
}
.timeframe-bar, .indicator-bar, .export-bar {
    display: flex;
    gap: 6px;
    margin-bottom: 10px;
    flex-wrap: wrap;
}
.range-btn, .indicator-btn, .export-btn, .retry-btn {
    background: #1b2330;
    color: #e0e6ec;
    border: 1px solid #4a5d73;
    padding: 4px 12px;
    border-radius: 5px;
    cursor: pointer;
    font-size: 12px;
}
.range-btn:hover, .indicator-btn:hover:enabled, .export-btn:hover:enabled {
    background: #2a3442;
}
.range-btn.active { background: #72c685; color: #10141b; border-color: #72c685; }
.indicator-btn.active { background: #5aa9e6; color: #10141b; border-color: #5aa9e6; }
.indicator-btn:disabled, .export-btn:disabled {
    opacity: 0.4;
    cursor: not-allowed;
}
.pane-wrap { position: relative; }
.chart-svg { display: block; background: #10141b; cursor: crosshair; }
/* hover math reads offsetX against the svg, never a painted child */
.chart-svg * { pointer-events: none; }
.grid-line { stroke: #2a3442; stroke-width: 1; }
.tick-label { fill: #aab4c0; font-size: 10px; text-anchor: end; }
.date-label { fill: #aab4c0; font-size: 10px; text-anchor: middle; }
.price-area { fill: rgba(90, 169, 230, 0.12); stroke: none; }
.price-line { fill: none; stroke: #5aa9e6; stroke-width: 2; }
.sma20-line { fill: none; stroke: #f2c14e; stroke-width: 1.5; }
.sma50-line { fill: none; stroke: #e4572e; stroke-width: 1.5; }
.rsi-line { fill: none; stroke: #9b5de5; stroke-width: 1.5; }
.rsi-guide { stroke: #4a5d73; stroke-width: 1; stroke-dasharray: 4 3; }
.crosshair { stroke: #8899aa; stroke-width: 1; stroke-dasharray: 3 3; }
.hover-dot { fill: #5aa9e6; stroke: #10141b; stroke-width: 1.5; }
.overlay {
    position: absolute;
    inset: 0;
    display: flex;
    align-items: center;
    justify-content: center;
    background: rgba(16, 20, 27, 0.7);
}
.overlay-box {
    background: #1b2330;
    border: 1px solid #4a5d73;
    border-radius: 8px;
    padding: 14px 22px;
    text-align: center;
    font-size: 13px;
}
.overlay-box.error { border-color: #e4572e; }
.retry-btn { display: block; margin: 10px auto 0; }
.export-bar { margin-top: 10px; margin-bottom: 0; align-items: center; }
.export-notice { color: #e4572e; font-size: 12px; }
"#;

fn price_frame() -> PlotFrame {
    PlotFrame::new(CHART_WIDTH, PRICE_PANE_HEIGHT, CHART_INSETS)
}

fn rsi_frame() -> PlotFrame {
    PlotFrame::new(CHART_WIDTH, RSI_PANE_HEIGHT, CHART_INSETS)
}

/// 📈 One mounted chart: range bar, indicator toggles, SVG panes, export row.
#[component]
pub fn StockChart(
    stock: StockId,
    repository: Rc<dyn SeriesRepository>,
    initial_timeframe: Timeframe,
    uid: usize,
) -> impl IntoView {
    let state = create_rw_signal(ChartState::new(stock));
    let controller = ChartController::new(state, repository);
    controller.select_timeframe(initial_timeframe);

    let svg_id = format!("stock-chart-svg-{uid}");
    let stock_label = state.with_untracked(|s| s.stock.value().to_string());
    let head_controller = controller.clone();
    let pane_controller = controller.clone();

    view! {
        <style>{CHART_CSS}</style>
        <div class="stock-chart">
            <div class="chart-head">
                <span class="stock-name">{stock_label}</span>
                <span class="last-price">
                    {move || {
                        state.with(|s| match s.series.last_close() {
                            Some(close) => format!("{close:.2}"),
                            None => "--".to_string(),
                        })
                    }}
                </span>
                <HoverReadout state=state />
            </div>
            <TimeframeBar state=state controller=head_controller />
            <IndicatorToggles state=state controller=controller />
            <PricePane state=state controller=pane_controller svg_id=svg_id.clone() />
            {move || {
                state
                    .with(|s| s.view.visible.is_on(IndicatorKind::Rsi14))
                    .then(|| view! { <RsiPane state=state /> })
            }}
            <ExportBar state=state svg_id=svg_id />
        </div>
    }
}

/// Row of range buttons, one per selectable timeframe.
#[component]
fn TimeframeBar(state: RwSignal<ChartState>, controller: ChartController) -> impl IntoView {
    view! {
        <div class="timeframe-bar">
            {Timeframe::iter()
                .map(|timeframe| {
                    let controller = controller.clone();
                    view! {
                        <button
                            class="range-btn"
                            class:active=move || state.with(|s| s.view.timeframe == timeframe)
                            on:click=move |_| controller.select_timeframe(timeframe)
                        >
                            {timeframe.as_query().to_uppercase()}
                        </button>
                    }
                })
                .collect_view()}
        </div>
    }
}

/// Indicator toggles. A toggle disables while its series has no values, for
/// example RSI on a range shorter than fifteen closes.
#[component]
fn IndicatorToggles(state: RwSignal<ChartState>, controller: ChartController) -> impl IntoView {
    view! {
        <div class="indicator-bar">
            {ALL_KINDS
                .into_iter()
                .map(|kind| {
                    let controller = controller.clone();
                    view! {
                        <button
                            class="indicator-btn"
                            class:active=move || state.with(|s| s.view.visible.is_on(kind))
                            prop:disabled=move || state.with(|s| !s.indicators.available(kind))
                            title=format!("needs {} closes", kind.min_samples())
                            on:click=move |_| controller.toggle_indicator(kind)
                        >
                            {kind.label()}
                        </button>
                    }
                })
                .collect_view()}
        </div>
    }
}

/// Everything hover-independent drawn for the price pane, built in one pass
/// over the state. The crosshair reads `domain` and the live hover index
/// through its own closure instead of living here.
#[derive(Clone, Debug, PartialEq, Default)]
struct PriceView {
    area: String,
    line: String,
    sma20: Option<String>,
    sma50: Option<String>,
    ticks: Vec<(f64, String)>,
    labels: Vec<(f64, String)>,
    domain: PriceDomain,
}

/// Fingerprint of everything that can change the drawn layers. Hover is not
/// part of the key: pointer moves update the crosshair closures alone and
/// never rebuild path data.
fn repaint_key(state: &ChartState) -> (u64, bool, Timeframe, IndicatorVisibility) {
    (state.generation, state.phase.is_loading(), state.view.timeframe, state.view.visible)
}

#[component]
fn PricePane(
    state: RwSignal<ChartState>,
    controller: ChartController,
    svg_id: String,
) -> impl IntoView {
    let frame = price_frame();
    let repaint = create_memo(move |_| state.with(repaint_key));
    let model = create_memo(move |_| {
        repaint.with(|_| ());
        state.with_untracked(|s| build_price_view(s, &frame))
    });

    let hover_controller = controller.clone();
    let handle_mouse_move = move |event: web_sys::MouseEvent| {
        let len = state.with_untracked(|s| s.series.len());
        hover_controller.hover(frame.index_at_x(event.offset_x() as f64, len));
    };
    let leave_controller = controller.clone();
    let handle_mouse_leave = move |_: web_sys::MouseEvent| leave_controller.clear_hover();

    view! {
        <div class="pane-wrap">
            <svg
                id=svg_id
                class="chart-svg"
                width=CHART_WIDTH
                height=PRICE_PANE_HEIGHT
                viewBox=format!("0 0 {CHART_WIDTH} {PRICE_PANE_HEIGHT}")
                xmlns="http://www.w3.org/2000/svg"
                on:mousemove=handle_mouse_move
                on:mouseleave=handle_mouse_leave
            >
                {move || {
                    model
                        .get()
                        .ticks
                        .into_iter()
                        .map(|(y, label)| {
                            let y = format!("{y:.2}");
                            view! {
                                <line
                                    class="grid-line"
                                    x1=format!("{:.2}", CHART_INSETS.left)
                                    y1=y.clone()
                                    x2=format!("{:.2}", CHART_WIDTH - CHART_INSETS.right)
                                    y2=y.clone()
                                ></line>
                                <text
                                    class="tick-label"
                                    x=format!("{:.2}", CHART_INSETS.left - 6.0)
                                    y=y
                                >
                                    {label}
                                </text>
                            }
                        })
                        .collect_view()
                }}
                {move || {
                    model
                        .get()
                        .labels
                        .into_iter()
                        .map(|(x, label)| {
                            view! {
                                <text
                                    class="date-label"
                                    x=format!("{x:.2}")
                                    y=format!("{:.2}", PRICE_PANE_HEIGHT - 8.0)
                                >
                                    {label}
                                </text>
                            }
                        })
                        .collect_view()
                }}
                <path class="price-area" d=move || model.with(|m| m.area.clone())></path>
                <path class="price-line" d=move || model.with(|m| m.line.clone())></path>
                {move || {
                    model
                        .with(|m| m.sma20.clone())
                        .map(|d| view! { <path class="sma20-line" d=d></path> })
                }}
                {move || {
                    model
                        .with(|m| m.sma50.clone())
                        .map(|d| view! { <path class="sma50-line" d=d></path> })
                }}
                {move || {
                    let domain = model.with(|m| m.domain);
                    state
                        .with(|s| hover_marker(s, &frame, &domain))
                        .map(|(x, dot)| {
                            let x = format!("{x:.2}");
                            view! {
                                <line
                                    class="crosshair"
                                    x1=x.clone()
                                    y1=format!("{:.2}", CHART_INSETS.top)
                                    x2=x.clone()
                                    y2=format!("{:.2}", PRICE_PANE_HEIGHT - CHART_INSETS.bottom)
                                ></line>
                                {dot
                                    .map(|y| {
                                        view! {
                                            <circle
                                                class="hover-dot"
                                                cx=x.clone()
                                                cy=format!("{y:.2}")
                                                r="3.5"
                                            ></circle>
                                        }
                                    })}
                            }
                        })
                }}
            </svg>
            <StatusOverlay state=state controller=controller />
        </div>
    }
}

fn build_price_view(state: &ChartState, frame: &PlotFrame) -> PriceView {
    if state.series.valid_len() == 0 {
        return PriceView::default();
    }
    let closes = state.series.closes();

    let mut layers: Vec<&[Option<f64>]> = vec![&closes];
    for kind in OVERLAY_KINDS {
        if state.view.visible.is_on(kind) {
            layers.push(state.indicators.get(kind));
        }
    }
    let domain = PriceDomain::of_many(&layers);

    let points = screen_points(&closes, frame, &domain);
    let line = line_path(&points);
    let first_x = points.iter().find_map(|(x, y)| y.is_some().then_some(*x));
    let last_x = points.iter().rev().find_map(|(x, y)| y.is_some().then_some(*x));
    let area = match (first_x, last_x) {
        (Some(first), Some(last)) => area_path(&line, first, last, frame.baseline_y()),
        _ => String::new(),
    };

    let overlay_path = |kind: IndicatorKind| {
        state
            .view
            .visible
            .is_on(kind)
            .then(|| line_path(&screen_points(state.indicators.get(kind), frame, &domain)))
            .filter(|path| !path.is_empty())
    };

    let ticks = domain
        .ticks(4)
        .into_iter()
        .map(|value| (frame.y_for_price(value, &domain), format!("{value:.2}")))
        .collect();

    PriceView {
        area,
        line,
        sma20: overlay_path(IndicatorKind::Sma20),
        sma50: overlay_path(IndicatorKind::Sma50),
        ticks,
        labels: date_labels(state, frame),
        domain,
    }
}

/// Crosshair geometry for the hovered index: the vertical line's X and, when
/// the point has a finite close, the dot's Y.
fn hover_marker(
    state: &ChartState,
    frame: &PlotFrame,
    domain: &PriceDomain,
) -> Option<(f64, Option<f64>)> {
    let len = state.series.len();
    let index = state.view.hover.filter(|i| *i < len)?;
    let x = frame.x_for_index(index, len);
    let dot = state
        .hovered_point()
        .and_then(|point| point.close)
        .filter(|close| close.is_finite())
        .map(|close| frame.y_for_price(close, domain));
    Some((x, dot))
}

fn screen_points(
    values: &[Option<f64>],
    frame: &PlotFrame,
    domain: &PriceDomain,
) -> Vec<(f64, Option<f64>)> {
    let len = values.len();
    values
        .iter()
        .enumerate()
        .map(|(i, value)| {
            (frame.x_for_index(i, len), value.map(|v| frame.y_for_price(v, domain)))
        })
        .collect()
}

fn date_labels(state: &ChartState, frame: &PlotFrame) -> Vec<(f64, String)> {
    let len = state.series.len();
    if len < 2 {
        return Vec::new();
    }
    let slots = 4usize;
    let mut out = Vec::new();
    let mut previous = usize::MAX;
    for slot in 0..=slots {
        let index = (len - 1) * slot / slots;
        if index == previous {
            continue;
        }
        previous = index;
        if let Some(point) = state.series.get(index) {
            out.push((
                frame.x_for_index(index, len),
                format_date_label(point.ts, state.view.timeframe),
            ));
        }
    }
    out
}

/// Oscillator pane under the price chart, fixed 0-100 scale with 30/70 guides.
#[component]
fn RsiPane(state: RwSignal<ChartState>) -> impl IntoView {
    let frame = rsi_frame();
    let domain = PriceDomain::oscillator();
    let repaint = create_memo(move |_| state.with(repaint_key));
    let line = create_memo(move |_| {
        repaint.with(|_| ());
        state.with_untracked(|s| {
            line_path(&screen_points(s.indicators.get(IndicatorKind::Rsi14), &frame, &domain))
        })
    });
    let guide = move |level: f64| {
        let y = format!("{:.2}", frame.y_for_price(level, &domain));
        view! {
            <line
                class="rsi-guide"
                x1=format!("{:.2}", CHART_INSETS.left)
                y1=y.clone()
                x2=format!("{:.2}", CHART_WIDTH - CHART_INSETS.right)
                y2=y.clone()
            ></line>
            <text class="tick-label" x=format!("{:.2}", CHART_INSETS.left - 6.0) y=y>
                {format!("{level:.0}")}
            </text>
        }
    };

    view! {
        <svg
            class="chart-svg"
            width=CHART_WIDTH
            height=RSI_PANE_HEIGHT
            viewBox=format!("0 0 {CHART_WIDTH} {RSI_PANE_HEIGHT}")
            xmlns="http://www.w3.org/2000/svg"
        >
            {guide(30.0)}
            {guide(70.0)}
            <path class="rsi-line" d=move || line.get()></path>
            {move || {
                state
                    .with(|s| {
                        let len = s.series.len();
                        s.view.hover.filter(|i| *i < len).map(|i| frame.x_for_index(i, len))
                    })
                    .map(|x| {
                        let x = format!("{x:.2}");
                        view! {
                            <line
                                class="crosshair"
                                x1=x.clone()
                                y1=format!("{:.2}", CHART_INSETS.top)
                                x2=x
                                y2=format!("{:.2}", RSI_PANE_HEIGHT - CHART_INSETS.bottom)
                            ></line>
                        }
                    })
            }}
        </svg>
    }
}

/// Date, close and enabled indicator values for the hovered point.
#[component]
fn HoverReadout(state: RwSignal<ChartState>) -> impl IntoView {
    view! { <div class="hover-readout">{move || state.with(readout_line)}</div> }
}

fn readout_line(state: &ChartState) -> String {
    let Some(index) = state.view.hover else {
        return String::new();
    };
    let Some(point) = state.hovered_point() else {
        return String::new();
    };
    let mut parts = vec![
        format_date_full(point.ts),
        match point.close {
            Some(close) => format!("close {close:.2}"),
            None => "close n/a".to_string(),
        },
    ];
    for kind in ALL_KINDS {
        if !state.view.visible.is_on(kind) {
            continue;
        }
        let rendered = match state.indicators.value_at(kind, index) {
            Some(value) if kind.is_oscillator() => format!("{value:.1}"),
            Some(value) => format!("{value:.2}"),
            None => "n/a".to_string(),
        };
        parts.push(format!("{} {rendered}", kind.label()));
    }
    parts.join(" | ")
}

/// Loading, failure and empty overlays above the price pane.
#[component]
fn StatusOverlay(state: RwSignal<ChartState>, controller: ChartController) -> impl IntoView {
    move || {
        state.with(|s| match &s.phase {
            LoadPhase::Loading => view! {
                <div class="overlay">
                    <div class="overlay-box">"📡 Loading series..."</div>
                </div>
            }
            .into_view(),
            LoadPhase::Failed(error) => {
                let retry = controller.clone();
                view! {
                    <div class="overlay">
                        <div class="overlay-box error">
                            <div>{format!("⚠️ {error}")}</div>
                            <button class="retry-btn" on:click=move |_| retry.retry()>
                                "Retry"
                            </button>
                        </div>
                    </div>
                }
                .into_view()
            }
            LoadPhase::Ready(ReadyKind::Empty) => view! {
                <div class="overlay">
                    <div class="overlay-box">"Not enough data to plot this range"</div>
                </div>
            }
            .into_view(),
            LoadPhase::Idle | LoadPhase::Ready(ReadyKind::Plotted) => ().into_view(),
        })
    }
}

/// CSV and PNG download row. PNG rasterizes off the live SVG node, so the
/// buttons lock while an export is in flight.
#[component]
fn ExportBar(state: RwSignal<ChartState>, svg_id: String) -> impl IntoView {
    let on_csv = move |_: web_sys::MouseEvent| {
        let (series, indicators, stock, timeframe) = state.with_untracked(|s| {
            (s.series.clone(), s.indicators.clone(), s.stock.clone(), s.view.timeframe)
        });
        let outcome = csv_export(&series, &indicators).and_then(|text| {
            download_text(
                &export_file_name(&stock, timeframe, "csv"),
                "text/csv;charset=utf-8",
                &text,
            )
        });
        match outcome {
            Ok(()) => export_notice().set(None),
            Err(error) => {
                log_error!(COMPONENT, "❌ CSV export failed: {}", error);
                export_notice().set(Some(error.to_string()));
            }
        }
    };

    let on_png = move |_: web_sys::MouseEvent| {
        if exporting().get_untracked() {
            return;
        }
        let (stock, timeframe) =
            state.with_untracked(|s| (s.stock.clone(), s.view.timeframe));
        let svg_id = svg_id.clone();
        spawn_local(async move {
            exporting().set(true);
            match export_chart_png(&svg_id, &stock, timeframe).await {
                Ok(()) => export_notice().set(None),
                Err(error) => {
                    log_error!(COMPONENT, "❌ PNG export failed: {}", error);
                    export_notice().set(Some(error.to_string()));
                }
            }
            exporting().set(false);
        });
    };

    view! {
        <div class="export-bar">
            <button class="export-btn" prop:disabled=move || exporting().get() on:click=on_csv>
                "⬇ CSV"
            </button>
            <button class="export-btn" prop:disabled=move || exporting().get() on:click=on_png>
                "⬇ PNG"
            </button>
            {move || {
                export_notice()
                    .get()
                    .map(|notice| view! { <span class="export-notice">{notice}</span> })
            }}
        </div>
    }
}

async fn export_chart_png(
    svg_id: &str,
    stock: &StockId,
    timeframe: Timeframe,
) -> Result<(), ExportError> {
    let element = gloo::utils::document()
        .get_element_by_id(svg_id)
        .ok_or_else(|| ExportError::Canvas(format!("chart svg '{svg_id}' not in document")))?;
    let markup = inline_chart_styles(&element.outer_html());
    let bytes = rasterize_svg(
        &markup,
        CHART_WIDTH as u32,
        PRICE_PANE_HEIGHT as u32,
        CHART_BACKGROUND,
    )
    .await?;
    download_bytes(&export_file_name(stock, timeframe, "png"), "image/png", &bytes)
}

/// The serialized SVG rasterizes as a standalone image document, out of reach
/// of the page stylesheet. Splice the chart rules into the markup right after
/// the opening tag so classed elements keep their strokes and fills.
fn inline_chart_styles(svg: &str) -> String {
    match svg.find('>') {
        Some(end) => format!("{}<style>{}</style>{}", &svg[..=end], CHART_CSS, &svg[end + 1..]),
        None => svg.to_string(),
    }
}
