use std::time::Duration as StdDuration;

use anyhow::{Context, Error, Result, anyhow, bail};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use reqwest::{
    Client, StatusCode, Url,
    header::{HeaderMap, HeaderValue, USER_AGENT},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const DEFAULT_BASE_API: &str = "https://query1.finance.yahoo.com";
const BROWSER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36";

#[derive(Clone)]
pub struct PriceClient {
    client: Client,
    base_api: String,
}

impl PriceClient {
    pub fn new(base_api: impl Into<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_AGENT));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(StdDuration::from_secs(15))
            .build()?;

        Ok(Self {
            client,
            base_api: base_api.into(),
        })
    }

    /// Reads `PRICE_API_BASE_URL`, falling back to the public Yahoo endpoint.
    pub fn from_env() -> Result<Self> {
        let base_api =
            std::env::var("PRICE_API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_API.to_string());
        Self::new(base_api)
    }

    pub fn base_api(&self) -> &str {
        &self.base_api
    }

    /// `{base}/v8/finance/chart/{symbol}` with the symbol percent-encoded as
    /// a single path segment.
    fn chart_url(&self, symbol: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_api)
            .with_context(|| format!("invalid price api base url: {}", self.base_api))?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("price api base url cannot hold a path: {}", self.base_api))?
            .pop_if_empty()
            .extend(["v8", "finance", "chart", symbol]);
        Ok(url)
    }

    async fn get_chart(&self, symbol: &str, query: &[(&str, String)]) -> Result<ChartResponse> {
        let res = self
            .client
            .get(self.chart_url(symbol)?)
            .query(query)
            .send()
            .await?;

        // Unknown symbols come back as 404 with a `chart.error` body.
        if res.status() == StatusCode::NOT_FOUND {
            let body: ChartResponse = res
                .json()
                .await
                .with_context(|| format!("unreadable 404 body for {symbol}"))?;
            return Ok(body);
        }

        let body = res.error_for_status()?.json().await?;
        Ok(body)
    }

    /// Fetch bars covering `now - duration .. now`.
    ///
    /// An unknown symbol or a result without timestamps yields an empty
    /// Vec; callers decide what "no rows" means for them.
    pub async fn fetch_price(
        &self,
        symbol: &str,
        duration: Duration,
        interval: Interval,
    ) -> Result<Vec<Bar>, Error> {
        let end = Utc::now();
        let start = end
            .checked_sub_signed(duration)
            .ok_or_else(|| {
                anyhow!(
                    "history window of {} days is out of range",
                    duration.num_days()
                )
            })?;

        let res = self
            .get_chart(
                symbol,
                &[
                    ("period1", start.timestamp().to_string()),
                    ("period2", end.timestamp().to_string()),
                    ("interval", interval.as_str().to_string()),
                    ("includePrePost", "false".to_string()),
                ],
            )
            .await?;

        let Some(result) = res.into_result(symbol)? else {
            return Ok(Vec::new());
        };

        let bars = result.bars();
        debug!(symbol, bars = bars.len(), "parsed chart result");
        Ok(bars)
    }

    pub async fn fetch_live_price(&self, symbol: &str) -> Result<LiveQuote, Error> {
        let res = self
            .get_chart(
                symbol,
                &[
                    ("range", "1d".to_string()),
                    ("interval", Interval::Minute1.as_str().to_string()),
                ],
            )
            .await?;

        let result = res
            .into_result(symbol)?
            .ok_or_else(|| anyhow!("no quote found for {symbol}"))?;

        result.live_quote(symbol)
    }
}

//
// Match Yahoo chart API JSON
// https://query1.finance.yahoo.com/v8/finance/chart/{symbol}
//
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interval {
    Minute1,
    Minute5,
    Minute15,
    Minute30,
    Hour1,
    Day1,
    Week1,
    Month1,
}

impl Interval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Minute1 => "1m",
            Interval::Minute5 => "5m",
            Interval::Minute15 => "15m",
            Interval::Minute30 => "30m",
            Interval::Hour1 => "1h",
            Interval::Day1 => "1d",
            Interval::Week1 => "1wk",
            Interval::Month1 => "1mo",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    /// Trading date in the exchange's own timezone.
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiveQuote {
    pub symbol: String,
    pub price: f64,
    pub previous_close: Option<f64>,
    pub currency: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartEnvelope,
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: Option<Meta>,
    timestamp: Option<Vec<i64>>,
    indicators: Option<Indicators>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Meta {
    currency: Option<String>,
    exchange_timezone_name: Option<String>,
    regular_market_price: Option<f64>,
    chart_previous_close: Option<f64>,
    previous_close: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Option<Vec<Quote>>,
}

#[derive(Debug, Default, Deserialize)]
struct Quote {
    open: Option<Vec<Option<f64>>>,
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
    volume: Option<Vec<Option<u64>>>,
}

fn value_at<T: Copy>(series: &Option<Vec<Option<T>>>, idx: usize) -> Option<T> {
    series.as_ref().and_then(|v| v.get(idx)).and_then(|v| *v)
}

impl ChartResponse {
    fn into_result(self, symbol: &str) -> Result<Option<ChartResult>> {
        if let Some(err) = self.chart.error {
            if err.code == "Not Found" {
                warn!(symbol, "provider has no data for symbol");
                return Ok(None);
            }
            bail!(
                "chart api error for {symbol}: {} ({})",
                err.code,
                err.description.unwrap_or_default()
            );
        }

        Ok(self.chart.result.and_then(|r| r.into_iter().next()))
    }
}

impl ChartResult {
    fn timezone(&self) -> Tz {
        self.meta
            .as_ref()
            .and_then(|m| m.exchange_timezone_name.as_deref())
            .and_then(|name| name.parse::<Tz>().ok())
            .unwrap_or(chrono_tz::America::New_York)
    }

    fn quote(&self) -> Option<&Quote> {
        self.indicators
            .as_ref()
            .and_then(|i| i.quote.as_ref())
            .and_then(|q| q.first())
    }

    fn bars(&self) -> Vec<Bar> {
        let timestamps = self.timestamp.as_deref().unwrap_or_default();
        let Some(quote) = self.quote() else {
            return Vec::new();
        };
        let tz = self.timezone();

        timestamps
            .iter()
            .enumerate()
            .filter_map(|(idx, &ts)| {
                let timestamp = DateTime::<Utc>::from_timestamp(ts, 0)?;
                Some(Bar {
                    timestamp,
                    date: timestamp.with_timezone(&tz).date_naive(),
                    open: value_at(&quote.open, idx)?,
                    high: value_at(&quote.high, idx)?,
                    low: value_at(&quote.low, idx)?,
                    close: value_at(&quote.close, idx)?,
                    volume: value_at(&quote.volume, idx).unwrap_or(0),
                })
            })
            .collect()
    }

    fn live_quote(&self, symbol: &str) -> Result<LiveQuote> {
        let meta = self.meta.as_ref();
        let last_close = self.bars().last().map(|b| b.close);

        let price = meta
            .and_then(|m| m.regular_market_price)
            .or(last_close)
            .ok_or_else(|| anyhow!("no live price available for {symbol}"))?;

        Ok(LiveQuote {
            symbol: symbol.to_string(),
            price,
            previous_close: meta.and_then(|m| m.chart_previous_close.or(m.previous_close)),
            currency: meta.and_then(|m| m.currency.clone()),
        })
    }
}
