//! Upbit quotation API client.
//!
//! Only the public, unauthenticated endpoints are used: market listing,
//! candles and tickers.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::{Client, StatusCode};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};
use trading_core::error::DataError;
use trading_core::traits::MarketData;
use trading_core::types::{Bar, Timeframe};

/// Candles returned per request by the API.
const MAX_CANDLES_PER_REQUEST: usize = 200;

const CANDLE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const CURSOR_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Upbit API configuration.
#[derive(Debug, Clone)]
pub struct UpbitConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl UpbitConfig {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            timeout,
        }
    }
}

impl Default for UpbitConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.upbit.com".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Deserialize)]
struct UpbitMarket {
    market: String,
}

#[derive(Debug, Deserialize)]
struct UpbitCandle {
    candle_date_time_utc: String,
    opening_price: f64,
    high_price: f64,
    low_price: f64,
    trade_price: f64,
    candle_acc_trade_volume: f64,
}

#[derive(Debug, Deserialize)]
struct UpbitTicker {
    #[allow(dead_code)]
    market: String,
    trade_price: f64,
}

/// Candle endpoint path for a timeframe.
fn candle_path(timeframe: Timeframe) -> &'static str {
    match timeframe {
        Timeframe::Minute1 => "minutes/1",
        Timeframe::Minute5 => "minutes/5",
        Timeframe::Minute15 => "minutes/15",
        Timeframe::Minute30 => "minutes/30",
        Timeframe::Hour1 => "minutes/60",
        Timeframe::Hour4 => "minutes/240",
        Timeframe::Daily => "days",
        Timeframe::Weekly => "weeks",
        Timeframe::Monthly => "months",
    }
}

fn filter_markets(markets: Vec<UpbitMarket>, quote_currency: &str) -> Vec<String> {
    let prefix = format!("{quote_currency}-");
    markets
        .into_iter()
        .map(|m| m.market)
        .filter(|m| m.starts_with(&prefix))
        .collect()
}

fn parse_candle(candle: &UpbitCandle) -> Result<Bar, DataError> {
    let ts = NaiveDateTime::parse_from_str(&candle.candle_date_time_utc, CANDLE_TIME_FORMAT)
        .map_err(|e| DataError::Parse(format!("candle time {:?}: {}", candle.candle_date_time_utc, e)))?
        .and_utc()
        .timestamp_millis();
    Ok(Bar::new(
        ts,
        candle.opening_price,
        candle.high_price,
        candle.low_price,
        candle.trade_price,
        candle.candle_acc_trade_volume,
    ))
}

/// Convert a newest-first candle page to bars, oldest first.
fn parse_candles(candles: &[UpbitCandle]) -> Result<Vec<Bar>, DataError> {
    candles.iter().rev().map(parse_candle).collect()
}

/// `to` cursor for the page preceding `page` (oldest first).
fn page_cursor(page: &[Bar]) -> Option<String> {
    page.first().map(|bar| bar.datetime().format(CURSOR_FORMAT).to_string())
}

/// Join pages fetched newest first into one oldest-first series. A candle
/// repeated on a page boundary is kept once.
fn stitch_pages(pages: Vec<Vec<Bar>>) -> Vec<Bar> {
    let mut bars: Vec<Bar> = pages.into_iter().rev().flatten().collect();
    bars.dedup_by_key(|bar| bar.timestamp);
    bars
}

fn parse_ticker(symbol: &str, tickers: Vec<UpbitTicker>) -> Result<Decimal, DataError> {
    let ticker = tickers
        .into_iter()
        .next()
        .ok_or_else(|| DataError::unavailable(symbol, "empty ticker response"))?;
    Decimal::from_f64(ticker.trade_price)
        .ok_or_else(|| DataError::Parse(format!("{symbol}: trade price {}", ticker.trade_price)))
}

/// Upbit REST client implementing [`MarketData`].
pub struct UpbitClient {
    config: UpbitConfig,
    client: Client,
}

impl UpbitClient {
    /// Create a new client.
    pub fn new(config: UpbitConfig) -> Result<Self, DataError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| DataError::Http(e.to_string()))?;

        info!(base_url = %config.base_url, "Upbit client ready");
        Ok(Self { config, client })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, params: &[(&str, String)]) -> Result<T, DataError> {
        let url = format!("{}{}", self.config.base_url, path);

        let resp = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| DataError::Http(e.to_string()))?;

        let status = resp.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(DataError::RateLimited);
        }
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(DataError::Http(format!("{}: {}", status, text)));
        }

        resp.json().await.map_err(|e| DataError::Parse(e.to_string()))
    }
}

#[async_trait]
impl MarketData for UpbitClient {
    async fn list_instruments(&self, quote_currency: &str) -> Result<Vec<String>, DataError> {
        let markets: Vec<UpbitMarket> = self.get_json("/v1/market/all", &[]).await?;
        let listed = filter_markets(markets, quote_currency);
        debug!(quote_currency, count = listed.len(), "markets listed");
        Ok(listed)
    }

    async fn get_bars(&self, symbol: &str, timeframe: Timeframe, count: usize) -> Result<Vec<Bar>, DataError> {
        let path = format!("/v1/candles/{}", candle_path(timeframe));
        let mut pages: Vec<Vec<Bar>> = Vec::new();
        let mut remaining = count;
        let mut to: Option<String> = None;

        // Pages walk backwards in time from `to`
        while remaining > 0 {
            let batch = remaining.min(MAX_CANDLES_PER_REQUEST);
            let mut params = vec![("market", symbol.to_string()), ("count", batch.to_string())];
            if let Some(to) = &to {
                params.push(("to", to.clone()));
            }

            let candles: Vec<UpbitCandle> = self.get_json(&path, &params).await?;
            let page = parse_candles(&candles)?;
            let Some(cursor) = page_cursor(&page) else {
                break;
            };
            to = Some(cursor);

            let received = page.len();
            pages.push(page);
            remaining = remaining.saturating_sub(received);
            if received < batch {
                break;
            }
        }

        let bars = stitch_pages(pages);
        if bars.is_empty() {
            return Err(DataError::unavailable(symbol, "no candles returned"));
        }
        debug!(symbol, %timeframe, count = bars.len(), "candles fetched");
        Ok(bars)
    }

    async fn current_price(&self, symbol: &str) -> Result<Decimal, DataError> {
        let tickers: Vec<UpbitTicker> = self
            .get_json("/v1/ticker", &[("markets", symbol.to_string())])
            .await?;
        parse_ticker(symbol, tickers)
    }

    fn name(&self) -> &str {
        "upbit"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANDLES: &str = r#"[
        {"market":"KRW-BTC","candle_date_time_utc":"2024-03-01T02:00:00","candle_date_time_kst":"2024-03-01T11:00:00",
         "opening_price":85000000.0,"high_price":85500000.0,"low_price":84800000.0,"trade_price":85200000.0,
         "timestamp":1709258399000,"candle_acc_trade_price":1.0,"candle_acc_trade_volume":12.5,"unit":60},
        {"market":"KRW-BTC","candle_date_time_utc":"2024-03-01T01:00:00","candle_date_time_kst":"2024-03-01T10:00:00",
         "opening_price":84000000.0,"high_price":85100000.0,"low_price":83900000.0,"trade_price":85000000.0,
         "timestamp":1709254799000,"candle_acc_trade_price":1.0,"candle_acc_trade_volume":20.0,"unit":60}
    ]"#;

    #[test]
    fn test_candles_reversed_to_oldest_first() {
        let candles: Vec<UpbitCandle> = serde_json::from_str(CANDLES).unwrap();
        let bars = parse_candles(&candles).unwrap();

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].timestamp, 1_709_254_800_000);
        assert_eq!(bars[0].close, 85_000_000.0);
        assert_eq!(bars[1].timestamp, 1_709_258_400_000);
        assert_eq!(bars[1].volume, 12.5);
    }

    #[test]
    fn test_bad_candle_time_is_parse_error() {
        let candles: Vec<UpbitCandle> = serde_json::from_str(
            r#"[{"candle_date_time_utc":"yesterday","opening_price":1.0,"high_price":1.0,
                 "low_price":1.0,"trade_price":1.0,"candle_acc_trade_volume":1.0}]"#,
        )
        .unwrap();

        assert!(matches!(parse_candles(&candles), Err(DataError::Parse(_))));
    }

    #[test]
    fn test_markets_filtered_by_quote() {
        let markets: Vec<UpbitMarket> = serde_json::from_str(
            r#"[{"market":"KRW-BTC","korean_name":"비트코인","english_name":"Bitcoin"},
                {"market":"BTC-ETH","korean_name":"이더리움","english_name":"Ethereum"},
                {"market":"KRW-ETH","korean_name":"이더리움","english_name":"Ethereum"}]"#,
        )
        .unwrap();

        assert_eq!(filter_markets(markets, "KRW"), vec!["KRW-BTC", "KRW-ETH"]);
    }

    #[test]
    fn test_ticker_price() {
        let tickers: Vec<UpbitTicker> =
            serde_json::from_str(r#"[{"market":"KRW-XRP","trade_price":712.5,"change":"RISE"}]"#).unwrap();
        assert_eq!(parse_ticker("KRW-XRP", tickers).unwrap(), Decimal::new(7125, 1));

        assert!(matches!(
            parse_ticker("KRW-XRP", vec![]),
            Err(DataError::Unavailable { .. })
        ));
    }

    fn hourly(hours: &[i64]) -> Vec<Bar> {
        hours
            .iter()
            .map(|h| Bar::new(h * 3_600_000, 1.0, 1.0, 1.0, 1.0, 1.0))
            .collect()
    }

    #[test]
    fn test_page_cursor_is_oldest_bar() {
        let candles: Vec<UpbitCandle> = serde_json::from_str(CANDLES).unwrap();
        let page = parse_candles(&candles).unwrap();

        assert_eq!(page_cursor(&page).as_deref(), Some("2024-03-01T01:00:00Z"));
        assert_eq!(page_cursor(&[]), None);
    }

    #[test]
    fn test_pages_stitched_oldest_first() {
        // Fetched newest page first; hour 3 repeats on the boundary
        let pages = vec![hourly(&[3, 4, 5]), hourly(&[0, 1, 2, 3])];
        let bars = stitch_pages(pages);

        let hours: Vec<i64> = bars.iter().map(|b| b.timestamp / 3_600_000).collect();
        assert_eq!(hours, vec![0, 1, 2, 3, 4, 5]);
        assert!(stitch_pages(vec![]).is_empty());
    }

    #[test]
    fn test_candle_paths() {
        assert_eq!(candle_path(Timeframe::Hour1), "minutes/60");
        assert_eq!(candle_path(Timeframe::Hour4), "minutes/240");
        assert_eq!(candle_path(Timeframe::Daily), "days");
    }
}
