use anyhow::{Error, anyhow};
use ta::Next;
use ta::indicators::{ExponentialMovingAverage, SimpleMovingAverage};

/// Rolling mean over `window` rows.
///
/// The first `window - 1` rows have no full window and are `None`.
pub fn sma(closes: &[f64], window: usize) -> Result<Vec<Option<f64>>, Error> {
    let mut sma = SimpleMovingAverage::new(window)
        .map_err(|e| anyhow!("invalid sma window {window}: {e:?}"))?;

    Ok(closes
        .iter()
        .enumerate()
        .map(|(i, &x)| {
            let value = sma.next(x);
            (i + 1 >= window).then_some(value)
        })
        .collect())
}

/// Exponential moving average with `alpha = 2 / (span + 1)`, seeded with the
/// first close.
pub fn ema(closes: &[f64], span: usize) -> Result<Vec<f64>, Error> {
    let mut ema = ExponentialMovingAverage::new(span)
        .map_err(|e| anyhow!("invalid ema span {span}: {e:?}"))?;

    Ok(closes.iter().map(|&x| ema.next(x)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn sma_warms_up_before_first_full_window() {
        let closes = [1.0, 2.0, 3.0, 4.0, 5.0];
        let out = sma(&closes, 3).unwrap();

        assert_eq!(out.len(), closes.len());
        assert_eq!(out[0], None);
        assert_eq!(out[1], None);
        assert!(approx(out[2].unwrap(), 2.0));
        assert!(approx(out[3].unwrap(), 3.0));
        assert!(approx(out[4].unwrap(), 4.0));
    }

    #[test]
    fn sma_window_longer_than_series_is_all_none() {
        let out = sma(&[1.0, 2.0], 10).unwrap();
        assert_eq!(out, vec![None, None]);
    }

    #[test]
    fn zero_window_is_an_error() {
        assert!(sma(&[1.0], 0).is_err());
        assert!(ema(&[1.0], 0).is_err());
    }

    #[test]
    fn ema_is_seeded_and_recursive() {
        let closes = [10.0, 20.0, 30.0];
        let out = ema(&closes, 3).unwrap();
        // alpha = 0.5
        assert!(approx(out[0], 10.0));
        assert!(approx(out[1], 15.0));
        assert!(approx(out[2], 22.5));
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(sma(&[], 10).unwrap().is_empty());
        assert!(ema(&[], 10).unwrap().is_empty());
    }
}
