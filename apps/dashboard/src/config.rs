use std::{env::var, net::SocketAddr, path::PathBuf};

use anyhow::{Context, Result, ensure};

/// One century of daily bars.
const MAX_HISTORY_DAYS: i64 = 36_500;

#[derive(Clone, Debug)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub tickers_path: PathBuf,
    /// How far back `/dash/graph` fetches daily bars.
    pub history_days: i64,
    pub ma_windows: Vec<usize>,
    /// Simulated purchase price = live price * markup.
    pub purchase_markup: f64,
    pub version: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            tickers_path: PathBuf::from("tickers.json"),
            history_days: 5 * 365,
            ma_windows: vec![10, 30],
            purchase_markup: 1.1,
            version: "Unknown".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(addr) = lookup("BIND_ADDR") {
            config.bind_addr = addr
                .parse()
                .with_context(|| format!("invalid BIND_ADDR: {addr}"))?;
        }
        if let Some(path) = lookup("TICKERS_PATH") {
            config.tickers_path = PathBuf::from(path);
        }
        if let Some(days) = lookup("HISTORY_DAYS") {
            config.history_days = days
                .trim()
                .parse()
                .with_context(|| format!("invalid HISTORY_DAYS: {days}"))?;
            ensure!(
                (1..=MAX_HISTORY_DAYS).contains(&config.history_days),
                "HISTORY_DAYS must be between 1 and {MAX_HISTORY_DAYS}"
            );
        }
        if let Some(windows) = lookup("MA_WINDOWS") {
            config.ma_windows = parse_windows(&windows)?;
        }
        if let Some(markup) = lookup("PURCHASE_MARKUP") {
            config.purchase_markup = markup
                .trim()
                .parse()
                .with_context(|| format!("invalid PURCHASE_MARKUP: {markup}"))?;
            ensure!(
                config.purchase_markup.is_finite() && config.purchase_markup > 0.0,
                "PURCHASE_MARKUP must be a positive number"
            );
        }
        if let Some(version) = lookup("APP_VERSION") {
            config.version = version;
        }

        Ok(config)
    }
}

fn parse_windows(raw: &str) -> Result<Vec<usize>> {
    let windows = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<usize>()
                .with_context(|| format!("invalid MA_WINDOWS entry: {s}"))
        })
        .collect::<Result<Vec<_>>>()?;

    ensure!(!windows.is_empty(), "MA_WINDOWS is empty");
    ensure!(windows.iter().all(|&w| w > 0), "MA_WINDOWS entries must be positive");
    Ok(windows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_env() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.history_days, 1825);
        assert_eq!(config.ma_windows, vec![10, 30]);
        assert_eq!(config.purchase_markup, 1.1);
        assert_eq!(config.version, "Unknown");
    }

    #[test]
    fn overrides_from_env() {
        let config = Config::from_lookup(lookup(&[
            ("BIND_ADDR", "127.0.0.1:8050"),
            ("TICKERS_PATH", "/srv/tickers.txt"),
            ("HISTORY_DAYS", "365"),
            ("MA_WINDOWS", "10, 15,30,100"),
            ("PURCHASE_MARKUP", "1.0"),
            ("APP_VERSION", "v1.2.0"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8050");
        assert_eq!(config.tickers_path, PathBuf::from("/srv/tickers.txt"));
        assert_eq!(config.history_days, 365);
        assert_eq!(config.ma_windows, vec![10, 15, 30, 100]);
        assert_eq!(config.purchase_markup, 1.0);
        assert_eq!(config.version, "v1.2.0");
    }

    #[test]
    fn history_window_upper_bound_is_inclusive() {
        let config = Config::from_lookup(lookup(&[("HISTORY_DAYS", "36500")])).unwrap();
        assert_eq!(config.history_days, 36_500);

        let err = Config::from_lookup(lookup(&[("HISTORY_DAYS", "36501")])).unwrap_err();
        assert!(err.to_string().contains("between 1 and 36500"));
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(Config::from_lookup(lookup(&[("BIND_ADDR", "nowhere")])).is_err());
        assert!(Config::from_lookup(lookup(&[("HISTORY_DAYS", "0")])).is_err());
        assert!(Config::from_lookup(lookup(&[("HISTORY_DAYS", "100000000")])).is_err());
        assert!(Config::from_lookup(lookup(&[("MA_WINDOWS", "10,zero")])).is_err());
        assert!(Config::from_lookup(lookup(&[("MA_WINDOWS", "0")])).is_err());
        assert!(Config::from_lookup(lookup(&[("MA_WINDOWS", " , ")])).is_err());
        assert!(Config::from_lookup(lookup(&[("PURCHASE_MARKUP", "-1")])).is_err());
    }
}
