use anyhow::{Error, anyhow};
use serde::Serialize;
use ta::Next;
use ta::indicators::{MovingAverageConvergenceDivergence, RelativeStrengthIndex};

const MACD_FAST: usize = 12;
const MACD_SLOW: usize = 26;
const MACD_SIGNAL: usize = 9;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MacdSeries {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

/// MACD with the usual 12/26/9 periods.
pub fn macd(closes: &[f64]) -> Result<MacdSeries, Error> {
    let mut indicator = MovingAverageConvergenceDivergence::new(MACD_FAST, MACD_SLOW, MACD_SIGNAL)
        .map_err(|e| anyhow!("invalid macd periods: {e:?}"))?;

    let mut out = MacdSeries {
        macd: Vec::with_capacity(closes.len()),
        signal: Vec::with_capacity(closes.len()),
        histogram: Vec::with_capacity(closes.len()),
    };

    for &x in closes {
        let o = indicator.next(x);
        out.macd.push(o.macd);
        out.signal.push(o.signal);
        out.histogram.push(o.histogram);
    }

    Ok(out)
}

pub fn rsi(closes: &[f64], period: usize) -> Result<Vec<f64>, Error> {
    let mut indicator = RelativeStrengthIndex::new(period)
        .map_err(|e| anyhow!("invalid rsi period {period}: {e:?}"))?;

    Ok(closes.iter().map(|&x| indicator.next(x)).collect())
}
