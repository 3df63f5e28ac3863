use async_trait::async_trait;
use log::{info, warn};
use reqwest::{Client, StatusCode};

use crate::config::Config;
use crate::error::{BoardError, BoardResult};
use crate::models::{RatesResponse, RatesSnapshot};

/// Something that can produce a fresh rates snapshot for a base currency.
#[async_trait]
pub trait RateSource {
    async fn fetch_all_exchange_rates(&self, base: &str) -> BoardResult<RatesSnapshot>;
}

/// Client for the public `exchangerate-api.com` v4 endpoint.
pub struct ExchangeRateApi {
    client: Client,
    api_url: String,
}

impl ExchangeRateApi {
    pub fn new(config: &Config) -> BoardResult<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            api_url: config.api_url.clone(),
        })
    }

    fn url_for(&self, base: &str) -> String {
        format!("{}/{}", self.api_url, base)
    }
}

#[async_trait]
impl RateSource for ExchangeRateApi {
    async fn fetch_all_exchange_rates(&self, base: &str) -> BoardResult<RatesSnapshot> {
        let api_url = self.url_for(base);
        info!("Fetching exchange rates from {}", api_url);

        let response = self.client.get(&api_url).send().await?;

        match response.status() {
            StatusCode::OK => {
                let body = response.text().await?;
                let snapshot = parse_rates(base, &body)?;
                info!("Fetched {} rates for {}", snapshot.rates.len(), snapshot.base);
                Ok(snapshot)
            }
            StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => {
                warn!("Rate endpoint refused request: {}", response.status());
                Err(BoardError::RequestLimit)
            }
            status => {
                warn!("Rate endpoint answered {}", status);
                Err(BoardError::Status(status))
            }
        }
    }
}

/// Decodes a response body into a validated snapshot.
pub fn parse_rates(base: &str, body: &str) -> BoardResult<RatesSnapshot> {
    let response: RatesResponse = serde_json::from_str(body)?;
    RatesSnapshot::from_response(base, response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serves a single canned HTTP response on a local port and hands back
    /// the request line it received.
    async fn serve_once(status: &'static str, body: &'static str) -> (Config, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request: Vec<u8> = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();

            String::from_utf8_lossy(&request)
                .lines()
                .next()
                .unwrap_or_default()
                .to_string()
        });

        let config = Config {
            api_url: format!("http://{}/v4/latest", addr),
            timeout: Duration::from_secs(5),
            ..Config::default()
        };
        (config, server)
    }

    async fn fetch_from(status: &'static str, body: &'static str) -> (BoardResult<RatesSnapshot>, String) {
        let (config, server) = serve_once(status, body).await;
        let api = ExchangeRateApi::new(&config).unwrap();
        let result = api.fetch_all_exchange_rates("CNY").await;
        (result, server.await.unwrap())
    }

    #[tokio::test]
    async fn test_ok_response_is_parsed() {
        let (result, request_line) = fetch_from(
            "200 OK",
            r#"{"base": "CNY", "date": "2026-10-19", "rates": {"USD": 0.14, "EUR": 0.128}}"#,
        )
        .await;

        assert_eq!(request_line, "GET /v4/latest/CNY HTTP/1.1");
        let snapshot = result.unwrap();
        assert_eq!(snapshot.base, "CNY");
        assert_eq!(snapshot.date.as_deref(), Some("2026-10-19"));
        assert_eq!(snapshot.rate("EUR").unwrap(), 0.128);
    }

    #[tokio::test]
    async fn test_ok_response_with_bad_body_is_payload_error() {
        let (result, _) = fetch_from("200 OK", r#"{"result": "error"}"#).await;
        assert!(matches!(result, Err(BoardError::Payload(_))));
    }

    #[tokio::test]
    async fn test_too_many_requests_is_request_limit() {
        let (result, _) = fetch_from("429 Too Many Requests", "{}").await;
        assert!(matches!(result, Err(BoardError::RequestLimit)));
    }

    #[tokio::test]
    async fn test_forbidden_is_request_limit() {
        let (result, _) = fetch_from("403 Forbidden", "{}").await;
        assert!(matches!(result, Err(BoardError::RequestLimit)));
    }

    #[tokio::test]
    async fn test_server_error_keeps_status() {
        let (result, _) = fetch_from("500 Internal Server Error", "{}").await;
        assert!(matches!(
            result,
            Err(BoardError::Status(status)) if status == StatusCode::INTERNAL_SERVER_ERROR
        ));
    }

    #[test]
    fn test_url_for_base() {
        let config = Config {
            api_url: "http://localhost:9999/v4/latest".to_string(),
            ..Config::default()
        };
        let api = ExchangeRateApi::new(&config).unwrap();
        assert_eq!(api.url_for("CNY"), "http://localhost:9999/v4/latest/CNY");
    }

    #[test]
    fn test_parse_rates_ok() {
        let snapshot = parse_rates("CNY", r#"{"rates": {"USD": 0.1408, "EUR": 0.1282}}"#).unwrap();
        assert_eq!(snapshot.rates.len(), 2);
        assert_eq!(snapshot.base, "CNY");
    }

    #[test]
    fn test_parse_rates_malformed_body() {
        let err = parse_rates("CNY", "<html>busy</html>").unwrap_err();
        assert!(matches!(err, BoardError::Payload(_)));
    }

    #[test]
    fn test_parse_rates_wrong_shape() {
        let err = parse_rates("CNY", r#"{"rates": ["USD", 0.14]}"#).unwrap_err();
        assert!(matches!(err, BoardError::Payload(_)));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_fetch_error() {
        // Bind and release a port so nothing is listening on it.
        let addr = TcpListener::bind("127.0.0.1:0")
            .await
            .unwrap()
            .local_addr()
            .unwrap();
        let config = Config {
            api_url: format!("http://{}/v4/latest", addr),
            timeout: Duration::from_secs(2),
            ..Config::default()
        };
        let api = ExchangeRateApi::new(&config).unwrap();
        let err = api.fetch_all_exchange_rates("CNY").await.unwrap_err();
        assert!(matches!(err, BoardError::Fetch(_)));
    }
}
