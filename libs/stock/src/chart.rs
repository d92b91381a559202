use std::{fmt, str::FromStr};

use anyhow::{Error, bail, ensure};
use charming::{
    Chart, ImageFormat, ImageRenderer,
    component::{Axis, DataZoom, DataZoomType, Grid, Legend, Title},
    element::{
        AreaStyle, AxisLabel, AxisType, ItemStyle, Label, LabelPosition, LineStyle,
        LineStyleType, SplitLine, Symbol, TextStyle, Tooltip, Trigger,
    },
    series::{Candlestick, Line},
};
use serde::Serialize;

use crate::indicators;
use crate::price_client::Bar;

const FIGURE_HEIGHT: u32 = 1000;
const LIVE_HEIGHT: u32 = 300;
const RSI_PERIODS: [usize; 2] = [6, 12];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Line,
    Candlestick,
    Sma,
    Ema,
    Macd,
    Rsi,
    Ohlc,
}

impl ChartKind {
    /// Dropdown order.
    pub const ALL: [ChartKind; 7] = [
        ChartKind::Line,
        ChartKind::Candlestick,
        ChartKind::Sma,
        ChartKind::Ema,
        ChartKind::Macd,
        ChartKind::Rsi,
        ChartKind::Ohlc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Line => "Line",
            ChartKind::Candlestick => "Candlestick",
            ChartKind::Sma => "SMA",
            ChartKind::Ema => "EMA",
            ChartKind::Macd => "MACD",
            ChartKind::Rsi => "RSI",
            ChartKind::Ohlc => "OHLC",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ChartKind::Line => "Line",
            ChartKind::Candlestick => "Candlestick",
            ChartKind::Sma => "Simple moving average",
            ChartKind::Ema => "Exponential moving average",
            ChartKind::Macd => "MACD",
            ChartKind::Rsi => "RSI",
            ChartKind::Ohlc => "OHLC",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match ChartKind::ALL.iter().find(|k| k.as_str() == s.trim()) {
            Some(kind) => Ok(*kind),
            None => bail!("unknown chart type: {s}"),
        }
    }
}

/// `{label, value}` pair for the chart dropdown.
#[derive(Debug, Clone, Serialize)]
pub struct ChartOption {
    pub label: &'static str,
    pub value: &'static str,
}

pub fn chart_options() -> Vec<ChartOption> {
    ChartKind::ALL
        .iter()
        .map(|k| ChartOption {
            label: k.label(),
            value: k.as_str(),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartTheme {
    pub background: &'static str,
    pub text: &'static str,
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self {
            background: "#000000",
            text: "#FFFFFF",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeStep {
    Day,
    Month,
    Year,
}

/// Range-selector button shown above the x-axis slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RangePreset {
    pub label: &'static str,
    pub count: u32,
    pub step: RangeStep,
}

pub fn range_presets() -> Vec<RangePreset> {
    let preset = |label, count, step| RangePreset { label, count, step };
    vec![
        preset("10D", 7, RangeStep::Day),
        preset("15D", 15, RangeStep::Day),
        preset("1m", 1, RangeStep::Month),
        preset("3m", 3, RangeStep::Month),
        preset("6m", 6, RangeStep::Month),
        preset("1y", 1, RangeStep::Year),
    ]
}

/// An ECharts option plus the pixel height the page should give it.
#[derive(Serialize)]
pub struct Figure {
    pub height: u32,
    pub option: Chart,
}

fn dates(bars: &[Bar]) -> Vec<String> {
    bars.iter()
        .map(|b| b.date.format("%Y-%m-%d").to_string())
        .collect()
}

fn closes(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

fn title(text: impl Into<String>, theme: &ChartTheme) -> Title {
    Title::new()
        .text(text.into())
        .left("center")
        .text_style(TextStyle::new().color(theme.text).font_size(16))
}

fn base_chart(dates: Vec<String>, theme: &ChartTheme) -> Chart {
    let grid_line = SplitLine::new().line_style(LineStyle::new().color("#2d2f45"));

    Chart::new()
        .background_color(theme.background)
        .tooltip(Tooltip::new().trigger(Trigger::Axis))
        .x_axis(
            Axis::new()
                .type_(AxisType::Category)
                .data(dates)
                .axis_label(AxisLabel::new().color(theme.text)),
        )
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .scale(true)
                .axis_label(AxisLabel::new().color(theme.text))
                .split_line(grid_line),
        )
}

fn line(name: &str, data: Vec<f64>) -> Line {
    Line::new().name(name).data(data).symbol(Symbol::None)
}

/// Warm-up rows have no value; NaN serializes as `null`, leaving a gap.
fn with_gaps(values: Vec<Option<f64>>) -> Vec<f64> {
    values.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect()
}

/// Build the main figure for `kind`.
///
/// Returns `None` when there are no bars to draw. `windows` are the
/// moving-average lengths used by the SMA and EMA charts.
pub fn build_figure(
    kind: ChartKind,
    bars: &[Bar],
    windows: &[usize],
    theme: &ChartTheme,
) -> Result<Option<Figure>, Error> {
    if bars.is_empty() {
        return Ok(None);
    }
    ensure!(!windows.is_empty(), "no moving-average windows configured");

    let closes = closes(bars);
    let mut chart = base_chart(dates(bars), theme)
        .title(title(kind.as_str(), theme))
        .legend(
            Legend::new()
                .top("5%")
                .text_style(TextStyle::new().color(theme.text)),
        )
        .grid(Grid::new().top("10%").bottom("15%"))
        .data_zoom(
            DataZoom::new()
                .type_(DataZoomType::Inside)
                .start(0.0)
                .end(100.0),
        )
        .data_zoom(
            DataZoom::new()
                .type_(DataZoomType::Slider)
                .start(0.0)
                .end(100.0),
        );

    match kind {
        ChartKind::Line => {
            chart = chart.series(line("Close", closes).area_style(AreaStyle::new()));
        }
        ChartKind::Candlestick => {
            chart = chart.series(Candlestick::new().name("Candlestick").data(ohlc_rows(bars)));
        }
        ChartKind::Sma => {
            for &n in windows {
                let values = indicators::sma(&closes, n)?;
                chart = chart.series(line(&format!("{n} Days"), with_gaps(values)));
            }
        }
        ChartKind::Ema => {
            for &n in windows {
                let values = indicators::ema(&closes, n)?;
                chart = chart.series(line(&format!("{n} Days"), values));
            }
        }
        ChartKind::Macd => {
            let macd = indicators::macd(&closes)?;
            chart = chart
                .series(line("MACD", macd.macd))
                .series(line("Signal", macd.signal))
                .series(
                    line("Histogram", macd.histogram).line_style(
                        LineStyle::new()
                            .color("royalblue")
                            .width(2)
                            .type_(LineStyleType::Dotted),
                    ),
                );
        }
        ChartKind::Rsi => {
            for period in RSI_PERIODS {
                let values = indicators::rsi(&closes, period)?;
                chart = chart.series(line(&format!("RSI {period} Day"), values));
            }
        }
        ChartKind::Ohlc => {
            // Hollow rising bodies so the bars read as open/close ticks.
            chart = chart.series(
                Candlestick::new()
                    .name("OHLC")
                    .data(ohlc_rows(bars))
                    .item_style(
                        ItemStyle::new()
                            .color("transparent")
                            .border_color("#00d084"),
                    ),
            );
        }
    }

    Ok(Some(Figure {
        height: FIGURE_HEIGHT,
        option: chart,
    }))
}

/// ECharts candlestick rows are ordered `[open, close, low, high]`.
fn ohlc_rows(bars: &[Bar]) -> Vec<Vec<f64>> {
    bars.iter()
        .map(|b| vec![b.open, b.close, b.low, b.high])
        .collect()
}

/// Single-marker readout of the latest close.
pub fn build_live_price(symbol: &str, bars: &[Bar], theme: &ChartTheme) -> Option<Figure> {
    let last = bars.last()?;
    let symbol = symbol.to_uppercase();

    let mut heading = title(format!("Live Price of {symbol}"), theme);

    if let Some(prev) = bars.len().checked_sub(2).map(|i| bars[i].close) {
        let delta = last.close - prev;
        let pct = if prev != 0.0 { delta / prev * 100.0 } else { 0.0 };
        heading = heading.subtext(format!("{delta:+.2} ({pct:+.2}%)"));
    }

    let chart = base_chart(vec![last.date.format("%Y-%m-%d").to_string()], theme)
        .title(heading)
        .series(
            Line::new()
                .name("Live Price")
                .data(vec![last.close])
                .symbol(Symbol::Circle)
                .symbol_size(10.0)
                .item_style(ItemStyle::new().color("red"))
                .label(
                    Label::new()
                        .show(true)
                        .position(LabelPosition::Top)
                        .formatter(format!("${:.2}", last.close).as_str()),
                ),
        );

    Some(Figure {
        height: LIVE_HEIGHT,
        option: chart,
    })
}

/// Rasterize a figure to PNG bytes.
pub fn render_png(figure: &Figure, width: u32) -> Result<Vec<u8>, Error> {
    ensure!(width > 0, "width must be positive");
    let mut renderer = ImageRenderer::new(width, figure.height);
    let png_bytes = renderer.render_format(ImageFormat::Png, &figure.option)?;
    Ok(png_bytes)
}
