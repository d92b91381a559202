use std::{io::ErrorKind, path::Path};

use anyhow::{Context, Error, ensure};
use rand::seq::SliceRandom;
use tracing::{info, warn};

pub const DEFAULT_SYMBOLS: [&str; 5] = ["AAPL", "GOOGL", "MSFT", "AMZN", "TSLA"];

/// The ticker universe offered in the dashboard dropdown.
///
/// Never empty; entries are trimmed, upper-cased and de-duplicated with
/// their first-seen order kept.
#[derive(Debug, Clone)]
pub struct SymbolStore {
    symbols: Vec<String>,
}

impl SymbolStore {
    pub fn from_symbols<I, S>(symbols: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out: Vec<String> = Vec::new();
        for symbol in symbols {
            let symbol = Self::normalize(symbol.as_ref());
            if !symbol.is_empty() && !out.contains(&symbol) {
                out.push(symbol);
            }
        }

        ensure!(!out.is_empty(), "ticker list is empty");
        Ok(Self { symbols: out })
    }

    /// Load tickers from `path`.
    ///
    /// Accepts a JSON array of strings, or plain text with one symbol per
    /// line (`#` starts a comment). A missing file falls back to
    /// [`DEFAULT_SYMBOLS`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();

        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(path = %path.display(), "ticker file not found, using default tickers");
                return Self::from_symbols(DEFAULT_SYMBOLS);
            }
            Err(e) => {
                return Err(Error::from(e)
                    .context(format!("failed to read ticker file {}", path.display())));
            }
        };

        let store = Self::parse(&raw)
            .with_context(|| format!("invalid ticker file {}", path.display()))?;
        info!(path = %path.display(), total = store.len(), "loaded tickers");
        Ok(store)
    }

    fn parse(raw: &str) -> Result<Self, Error> {
        if raw.trim_start().starts_with('[') {
            let symbols: Vec<String> = serde_json::from_str(raw)?;
            return Self::from_symbols(symbols);
        }

        Self::from_symbols(
            raw.lines()
                .map(|line| line.split('#').next().unwrap_or_default()),
        )
    }

    fn normalize(symbol: &str) -> String {
        symbol.trim().to_uppercase()
    }

    pub fn list(&self) -> &[String] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always false once constructed.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        let symbol = Self::normalize(symbol);
        self.symbols.iter().any(|s| *s == symbol)
    }

    /// Initial dropdown value.
    pub fn random_pick(&self) -> &str {
        self.symbols
            .choose(&mut rand::thread_rng())
            .map(String::as_str)
            .unwrap_or(DEFAULT_SYMBOLS[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("{}-{}", std::process::id(), name));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn loads_json_array() {
        let path = temp_file("tickers.json", r#"["aapl", " msft ", "AAPL", "ge"]"#);
        let store = SymbolStore::load(&path).unwrap();
        assert_eq!(store.list(), ["AAPL", "MSFT", "GE"]);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn loads_plain_text_with_comments() {
        let path = temp_file("tickers.txt", "# watchlist\nTSLA\n\nf  # ford\nDIS\n");
        let store = SymbolStore::load(&path).unwrap();
        assert_eq!(store.list(), ["TSLA", "F", "DIS"]);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn missing_file_uses_defaults() {
        let store = SymbolStore::load("/definitely/not/here/tickers.json").unwrap();
        assert_eq!(store.list(), DEFAULT_SYMBOLS);
    }

    #[test]
    fn empty_list_is_rejected() {
        assert!(SymbolStore::from_symbols(Vec::<String>::new()).is_err());
        assert!(SymbolStore::from_symbols(["", "   "]).is_err());

        let path = temp_file("empty.json", "[]");
        assert!(SymbolStore::load(&path).is_err());
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn every_entry_is_a_non_empty_symbol() {
        let store = SymbolStore::from_symbols(DEFAULT_SYMBOLS).unwrap();
        assert!(!store.is_empty());
        assert!(
            store
                .list()
                .iter()
                .all(|s| !s.is_empty() && *s == s.to_uppercase())
        );
    }

    #[test]
    fn random_pick_comes_from_list() {
        let store = SymbolStore::from_symbols(["F", "GE", "DAL"]).unwrap();
        for _ in 0..20 {
            assert!(store.contains(store.random_pick()));
        }
        assert!(store.contains(" ge "));
        assert!(!store.contains("AAPL"));
    }
}
