//! Data access for the monitoring backend.
//!
//! [`Backend`] is the seam between the refresh engine and the outside
//! world: one method per backend resource, no retries, no caching.
//! [`HttpBackend`] is the production implementation; tests substitute an
//! in-memory stub.

pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub use types::{
    AlertRecord, AlertsResponse, AvailabilityResponse, NewTarget, Overview, Target, TargetId,
    TimeseriesPoint, TimeseriesResponse,
};

/// Failure of a single backend request.
///
/// One failure per request; whether to surface it, downgrade it to an
/// unknown value, or abort a whole cycle is the caller's decision.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure: DNS, connect, timeout.
    #[error("network error: {0}")]
    Network(String),
    /// The backend answered with a non-success status.
    #[error("HTTP {status}")]
    Http { status: u16 },
    /// The body did not match the expected shape.
    #[error("invalid response: {0}")]
    Decode(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// A monitoring backend the dashboard reads from and mutates.
///
/// Object-safe so the refresh engine can hold an `Arc<dyn Backend>` and
/// tests can script responses without a server.
#[async_trait]
pub trait Backend: Send + Sync + std::fmt::Debug {
    /// Fetch the target list with latest probe results.
    async fn overview(&self) -> ApiResult<Overview>;

    /// Fetch one target's availability ratio over a lookback window.
    async fn availability(&self, id: TargetId, hours: u32) -> ApiResult<AvailabilityResponse>;

    /// Fetch one target's response-time series over a lookback window.
    async fn timeseries(&self, id: TargetId, minutes: u32) -> ApiResult<TimeseriesResponse>;

    /// Fetch the most recent alerts, newest first.
    async fn alerts(&self, limit: u32) -> ApiResult<AlertsResponse>;

    /// Create a target; the response carries the backend-assigned id.
    async fn create_target(&self, payload: &NewTarget) -> ApiResult<Target>;

    /// Delete a target and its history.
    async fn delete_target(&self, id: TargetId) -> ApiResult<()>;
}

/// HTTP implementation of [`Backend`].
#[derive(Debug, Clone)]
pub struct HttpBackend {
    http: reqwest::Client,
    base: String,
}

impl HttpBackend {
    /// Create a client for the given base URL (e.g. `http://127.0.0.1:8000`)
    /// with one fixed per-request timeout. Timeouts surface as
    /// [`ApiError::Network`].
    pub fn new(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(Self {
            http,
            base: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// The address requests go to, for the header line.
    pub fn base_url(&self) -> &str {
        &self.base
    }

    async fn get_json<T>(&self, path_and_query: &str) -> ApiResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = format!("{}{}", self.base, path_and_query);
        let response = self.http.get(&url).send().await.map_err(send_error)?;
        decode_json(response).await
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn overview(&self) -> ApiResult<Overview> {
        self.get_json("/api/dashboard/overview").await
    }

    async fn availability(&self, id: TargetId, hours: u32) -> ApiResult<AvailabilityResponse> {
        self.get_json(&format!(
            "/api/dashboard/availability?target_id={}&hours={}",
            id, hours
        ))
        .await
    }

    async fn timeseries(&self, id: TargetId, minutes: u32) -> ApiResult<TimeseriesResponse> {
        self.get_json(&format!(
            "/api/dashboard/timeseries?target_id={}&minutes={}",
            id, minutes
        ))
        .await
    }

    async fn alerts(&self, limit: u32) -> ApiResult<AlertsResponse> {
        self.get_json(&format!("/api/alerts?limit={}", limit)).await
    }

    async fn create_target(&self, payload: &NewTarget) -> ApiResult<Target> {
        let url = format!("{}/api/targets", self.base);
        let response = self.http.post(&url).json(payload).send().await.map_err(send_error)?;
        decode_json(response).await
    }

    async fn delete_target(&self, id: TargetId) -> ApiResult<()> {
        let url = format!("{}/api/targets/{}", self.base, id);
        let response = self.http.delete(&url).send().await.map_err(send_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Http { status: status.as_u16() });
        }
        // Body is `{"status": "deleted"}`; nothing in it we need.
        Ok(())
    }
}

fn send_error(err: reqwest::Error) -> ApiError {
    ApiError::Network(err.to_string())
}

async fn decode_json<T>(response: reqwest::Response) -> ApiResult<T>
where
    T: serde::de::DeserializeOwned,
{
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::Http { status: status.as_u16() });
    }
    response.json::<T>().await.map_err(|e| {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Network(e.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        // Not resolvable, fails without a server
        let backend =
            HttpBackend::new("http://256.256.256.256", Duration::from_millis(250)).unwrap();
        let err = backend.overview().await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(ApiError::Http { status: 503 }.to_string(), "HTTP 503");
        assert_eq!(
            ApiError::Network("connection refused".to_string()).to_string(),
            "network error: connection refused"
        );
        assert_eq!(
            ApiError::Decode("missing field `targets`".to_string()).to_string(),
            "invalid response: missing field `targets`"
        );
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let backend = HttpBackend::new("http://localhost:8000/", Duration::from_secs(1)).unwrap();
        assert_eq!(backend.base_url(), "http://localhost:8000");
    }
}
