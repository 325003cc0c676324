//! Implements the `Quotes` trait with `reqwest`, calling the exchange rates service for currencies
//! and Alpha Vantage for stock prices.

use crate::api::Quotes;
use crate::model::{Amount, CurrencyRate, Quote, StockPrice};
use crate::{Config, Result};
use anyhow::{bail, Context};
use serde::Deserialize;
use std::str::FromStr;
use tracing::{debug, error, info, warn};
use url::Url;

/// All currency rates are quoted against the rouble.
const TARGET_CURRENCY: &str = "RUB";
const API_KEY_HEADER: &str = "apikey";

/// Implements the `Quotes` trait by making one GET request per lookup. There is no retry and no
/// timeout beyond the client's default.
pub(crate) struct HttpQuotes {
    client: reqwest::Client,
    currency_url: Url,
    stock_url: Url,
    currency_api_key: String,
    stock_api_key: String,
}

impl HttpQuotes {
    pub(crate) fn new(config: &Config) -> Result<Self> {
        if config.currency_api_key().is_none() {
            warn!("No currency API key is configured, currency rates will likely be unavailable");
        }
        if config.stock_api_key().is_none() {
            warn!("No stock API key is configured, stock prices will likely be unavailable");
        }
        Self::new_with_urls(
            config.currency_url().clone(),
            config.stock_url().clone(),
            config.currency_api_key().unwrap_or_default(),
            config.stock_api_key().unwrap_or_default(),
        )
    }

    pub(crate) fn new_with_urls(
        currency_url: Url,
        stock_url: Url,
        currency_api_key: impl Into<String>,
        stock_api_key: impl Into<String>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context("Unable to create the HTTP client")?;
        Ok(Self {
            client,
            currency_url,
            stock_url,
            currency_api_key: currency_api_key.into(),
            stock_api_key: stock_api_key.into(),
        })
    }

    async fn fetch_currency_rate(&self, code: &str) -> Result<Option<Amount>> {
        let response = self
            .client
            .get(self.currency_url.clone())
            .query(&[("amount", "1"), ("to", TARGET_CURRENCY), ("from", code)])
            .header(API_KEY_HEADER, &self.currency_api_key)
            .send()
            .await
            .with_context(|| format!("Failed to send the request to {}", self.currency_url))?;
        let response = check_status(response).await?;

        let body: ConvertResponse = response
            .json()
            .await
            .context("Failed to parse the currency rate response")?;
        Ok(body.result)
    }

    async fn fetch_stock_price(&self, symbol: &str) -> Result<Option<Amount>> {
        let response = self
            .client
            .get(self.stock_url.clone())
            .query(&[
                ("function", "GLOBAL_QUOTE"),
                ("symbol", symbol),
                ("apikey", self.stock_api_key.as_str()),
            ])
            .header(API_KEY_HEADER, &self.stock_api_key)
            .send()
            .await
            .with_context(|| format!("Failed to send the request to {}", self.stock_url))?;
        let response = check_status(response).await?;

        let body: GlobalQuoteResponse = response
            .json()
            .await
            .context("Failed to parse the stock price response")?;
        Ok(body
            .global_quote
            .price
            .and_then(|p| match Amount::from_str(&p) {
                Ok(price) => Some(price),
                Err(e) => {
                    warn!("The price '{p}' for {symbol} is not a number: {e}");
                    None
                }
            }))
    }
}

#[async_trait::async_trait]
impl Quotes for HttpQuotes {
    async fn currency_rate(&self, code: &str) -> Quote<CurrencyRate> {
        info!("Requesting the rate for '{code}' from {}", self.currency_url);
        match self.fetch_currency_rate(code).await {
            Ok(rate) => {
                debug!("Rate for '{code}' is {rate:?}");
                Quote::Found(CurrencyRate {
                    currency: code.to_string(),
                    rate,
                })
            }
            Err(e) => {
                error!("Currency rate request for '{code}' failed: {e:#}");
                Quote::unavailable()
            }
        }
    }

    async fn stock_price(&self, symbol: &str) -> Quote<StockPrice> {
        info!("Requesting the price for '{symbol}' from {}", self.stock_url);
        match self.fetch_stock_price(symbol).await {
            Ok(price) => {
                debug!("Price for '{symbol}' is {price:?}");
                Quote::Found(StockPrice {
                    stock: symbol.to_string(),
                    price,
                })
            }
            Err(e) => {
                error!("Stock price request for '{symbol}' failed: {e:#}");
                Quote::unavailable()
            }
        }
    }
}

/// Turns a non-success status into an error carrying the response body.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unable to read response body".to_string());
    bail!("Request failed with status {status}: {body}")
}

/// `{"result": 81.25, ...}`
#[derive(Debug, Deserialize)]
struct ConvertResponse {
    result: Option<Amount>,
}

/// `{"Global Quote": {"05. price": "196.9800", ...}}`
#[derive(Debug, Deserialize)]
struct GlobalQuoteResponse {
    #[serde(rename = "Global Quote")]
    global_quote: GlobalQuote,
}

#[derive(Debug, Deserialize)]
struct GlobalQuote {
    #[serde(rename = "05. price")]
    price: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serves exactly one HTTP response on a local port and hands back the raw request.
    async fn serve_once(status: &'static str, body: &'static str) -> (Url, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&request).to_string()
        });
        let url = Url::parse(&format!("http://{addr}/endpoint")).unwrap();
        (url, handle)
    }

    /// A URL on a port nothing listens on.
    async fn closed_url() -> Url {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        Url::parse(&format!("http://{addr}/endpoint")).unwrap()
    }

    #[tokio::test]
    async fn test_currency_rate_success() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"success": true, "query": {"from": "USD", "to": "RUB", "amount": 1}, "result": 81.25}"#,
        )
        .await;
        let quotes = HttpQuotes::new_with_urls(url, closed_url().await, "secret", "").unwrap();

        let quote = quotes.currency_rate("USD").await;
        assert_eq!(
            quote,
            Quote::Found(CurrencyRate {
                currency: "USD".to_string(),
                rate: Some(Amount::from_str("81.25").unwrap()),
            })
        );

        let request = server.await.unwrap();
        let first_line = request.lines().next().unwrap();
        assert!(first_line.starts_with("GET /endpoint?"));
        assert!(first_line.contains("amount=1"));
        assert!(first_line.contains("to=RUB"));
        assert!(first_line.contains("from=USD"));
        assert!(request.to_lowercase().contains("apikey: secret"));
    }

    #[tokio::test]
    async fn test_currency_rate_missing_result_is_null() {
        let (url, _server) = serve_once("200 OK", r#"{"success": true}"#).await;
        let quotes = HttpQuotes::new_with_urls(url, closed_url().await, "", "").unwrap();
        let quote = quotes.currency_rate("EUR").await;
        assert_eq!(serde_json::to_string(&quote).unwrap(), r#"{"currency":"EUR","rate":null}"#);
    }

    #[tokio::test]
    async fn test_currency_rate_bad_status_is_unavailable() {
        let (url, _server) = serve_once("401 Unauthorized", r#"{"message": "No API key"}"#).await;
        let quotes = HttpQuotes::new_with_urls(url, closed_url().await, "", "").unwrap();
        let quote = quotes.currency_rate("USD").await;
        assert_eq!(serde_json::to_string(&quote).unwrap(), "{}");
    }

    #[tokio::test]
    async fn test_currency_rate_transport_error_is_unavailable() {
        let quotes =
            HttpQuotes::new_with_urls(closed_url().await, closed_url().await, "", "").unwrap();
        let quote = quotes.currency_rate("USD").await;
        assert!(!quote.is_found());
        assert_eq!(serde_json::to_string(&quote).unwrap(), "{}");
    }

    #[tokio::test]
    async fn test_stock_price_success() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"Global Quote": {"01. symbol": "AAPL", "05. price": "196.9800"}}"#,
        )
        .await;
        let quotes = HttpQuotes::new_with_urls(closed_url().await, url, "", "stock-key").unwrap();

        let quote = quotes.stock_price("AAPL").await;
        let price = quote.found().unwrap();
        assert_eq!(price.stock, "AAPL");
        assert_eq!(price.price, Some(Amount::from_str("196.98").unwrap()));
        assert_eq!(
            serde_json::to_string(&quote).unwrap(),
            r#"{"stock":"AAPL","price":196.98}"#
        );

        let request = server.await.unwrap();
        let first_line = request.lines().next().unwrap();
        assert!(first_line.contains("function=GLOBAL_QUOTE"));
        assert!(first_line.contains("symbol=AAPL"));
        assert!(first_line.contains("apikey=stock-key"));
    }

    #[tokio::test]
    async fn test_stock_price_unknown_symbol_has_null_price() {
        let (url, _server) = serve_once("200 OK", r#"{"Global Quote": {}}"#).await;
        let quotes = HttpQuotes::new_with_urls(closed_url().await, url, "", "").unwrap();
        let quote = quotes.stock_price("NOPE").await;
        assert_eq!(serde_json::to_string(&quote).unwrap(), r#"{"stock":"NOPE","price":null}"#);
    }

    #[tokio::test]
    async fn test_stock_price_unexpected_body_is_unavailable() {
        let (url, _server) =
            serve_once("200 OK", r#"{"Information": "rate limit reached"}"#).await;
        let quotes = HttpQuotes::new_with_urls(closed_url().await, url, "", "").unwrap();
        assert!(!quotes.stock_price("AAPL").await.is_found());
    }

    #[tokio::test]
    async fn test_stock_price_transport_error_is_unavailable() {
        let quotes =
            HttpQuotes::new_with_urls(closed_url().await, closed_url().await, "", "").unwrap();
        let quote = quotes.stock_price("AAPL").await;
        assert_eq!(serde_json::to_string(&quote).unwrap(), "{}");
    }
}
