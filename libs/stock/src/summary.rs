use serde::Serialize;

use crate::price_client::Bar;

/// One row of the attribute/value info table under the charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfoRow {
    pub attribute: String,
    pub value: String,
}

fn row(attribute: &str, value: impl Into<String>) -> InfoRow {
    InfoRow {
        attribute: attribute.to_string(),
        value: value.into(),
    }
}

pub fn summarize(bars: &[Bar]) -> Vec<InfoRow> {
    let (Some(first), Some(last)) = (bars.first(), bars.last()) else {
        return Vec::new();
    };

    let mut rows = vec![
        row("Last close", format!("${:.2}", last.close)),
        row("Open", format!("${:.2}", last.open)),
        row("Day high", format!("${:.2}", last.high)),
        row("Day low", format!("${:.2}", last.low)),
        row("Volume", last.volume.to_string()),
    ];

    if let Some(prev) = bars.len().checked_sub(2).map(|i| &bars[i]) {
        let delta = last.close - prev.close;
        let pct = if prev.close != 0.0 {
            delta / prev.close * 100.0
        } else {
            0.0
        };
        rows.push(row("Change", format!("{delta:+.2} ({pct:+.2}%)")));
    }

    let high = bars.iter().map(|b| b.high).fold(f64::MIN, f64::max);
    let low = bars.iter().map(|b| b.low).fold(f64::MAX, f64::min);

    rows.extend([
        row("Period high", format!("${high:.2}")),
        row("Period low", format!("${low:.2}")),
        row("Rows", bars.len().to_string()),
        row("From", first.date.format("%Y-%m-%d").to_string()),
        row("To", last.date.format("%Y-%m-%d").to_string()),
    ]);

    rows
}
