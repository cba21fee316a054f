//! API client for communicating with the AQI server

use anyhow::{Context, Result};
use aqi_lib::{AqiCategory, HealthResponse, PollutantReading, ReadinessResponse};
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// API client for the AQI server
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = Url::parse(base_url).context("Invalid API URL")?;

        Ok(Self { client, base_url })
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.base_url.join(path).context("Invalid path")?;

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .context("Failed to send request")?;

        Self::parse(response).await
    }

    /// Predict the AQI for a reading
    pub async fn predict(&self, reading: &PollutantReading) -> Result<PredictionResponse> {
        self.post("api/v1/predict", reading).await
    }

    /// Overall and per-component health. A 503 still carries a health body.
    pub async fn health(&self) -> Result<HealthResponse> {
        self.fetch_status("healthz").await
    }

    pub async fn readiness(&self) -> Result<ReadinessResponse> {
        self.fetch_status("readyz").await
    }

    async fn send_get(&self, path: &str) -> Result<Response> {
        let url = self.base_url.join(path).context("Invalid path")?;

        self.client
            .get(url)
            .send()
            .await
            .context("Failed to send request")
    }

    async fn fetch_status<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send_get(path).await?;
        if response.status() == StatusCode::SERVICE_UNAVAILABLE {
            return response.json().await.context("Failed to parse response");
        }
        Self::parse(response).await
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            anyhow::bail!("API error ({}): {}", status, message);
        }

        response.json().await.context("Failed to parse response")
    }
}

// API response types

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub reading: PollutantReading,
    pub aqi: f64,
    pub category: AqiCategory,
    pub category_label: String,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use aqi_lib::ComponentStatus;

    fn client_for(server: &mockito::ServerGuard) -> ApiClient {
        ApiClient::new(&server.url(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_predict_posts_reading() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v1/predict")
            .match_body(mockito::Matcher::PartialJsonString(
                r#"{"pm25": 35.0, "co": 0.8}"#.to_string(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"reading":{"pm25":35.0,"pm10":60.0,"no2":20.0,"so2":5.0,"co":0.8,"o3":30.0},
                    "aqi":46.42,"category":"good","category_label":"Good","color":"Green"}"#,
            )
            .create_async()
            .await;

        let reading = PollutantReading::new(35.0, 60.0, 20.0, 5.0, 0.8, 30.0);
        let response = client_for(&server).predict(&reading).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.aqi, 46.42);
        assert_eq!(response.category, AqiCategory::Good);
        assert_eq!(response.reading, reading);
    }

    #[tokio::test]
    async fn test_error_body_is_surfaced() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/v1/predict")
            .with_status(422)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":"SO2 must be at least 0.0, got -1","code":422,"field":"so2"}"#)
            .create_async()
            .await;

        let err = client_for(&server)
            .predict(&PollutantReading::default())
            .await
            .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("422"), "{}", message);
        assert!(message.contains("SO2 must be at least 0.0"), "{}", message);
    }

    #[tokio::test]
    async fn test_health_accepts_unavailable() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/healthz")
            .with_status(503)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"status":"unhealthy","components":{"artifacts":{"status":"unhealthy","message":"gone","last_check_timestamp":0}}}"#,
            )
            .create_async()
            .await;

        let health = client_for(&server).health().await.unwrap();
        assert_eq!(health.status, ComponentStatus::Unhealthy);
        assert_eq!(
            health.components["artifacts"].message.as_deref(),
            Some("gone")
        );
    }

    #[tokio::test]
    async fn test_server_error_is_reported() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/readyz")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let err = client_for(&server).readiness().await.unwrap_err();
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn test_invalid_url_rejected() {
        assert!(ApiClient::new("not a url", Duration::from_secs(1)).is_err());
    }
}
