//! Wire types for the monitoring backend's HTTP API.
//!
//! These types match the JSON payloads served by the backend's dashboard,
//! alert, and target endpoints. The client treats them as read-only
//! snapshots; the business semantics behind them (how availability is
//! computed, when alerts fire) live server-side.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier for a monitored target.
///
/// Opaque to the client: compared for equality, used as a map key, and
/// echoed back in query parameters, never interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetId(pub i64);

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A monitored target with its latest probe result folded in.
///
/// The backend owns these; the client holds a read-only copy replaced
/// wholesale on every overview refresh. The `latest_*` fields are absent
/// until the first probe of the target completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    pub id: TargetId,
    pub name: String,
    pub url: String,
    pub enabled: bool,

    /// Status code of the most recent probe, if it got an HTTP response.
    #[serde(default)]
    pub latest_status_code: Option<u16>,
    /// Probe-level failure (DNS error, timeout, connection refused).
    #[serde(default)]
    pub latest_error: Option<String>,
    /// Total response time of the most recent probe.
    #[serde(default)]
    pub latest_response_time_ms: Option<f64>,
    /// DNS resolution time of the most recent probe.
    #[serde(default)]
    pub latest_dns_time_ms: Option<f64>,
    /// When the most recent probe ran (RFC 3339).
    #[serde(default)]
    pub latest_ts: Option<String>,
}

/// Payload of `GET /api/dashboard/overview`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Overview {
    /// Lookback window the `latest_*` fields are drawn from.
    #[serde(default)]
    pub window_minutes: u32,
    #[serde(default)]
    pub targets: Vec<Target>,
}

/// Payload of `GET /api/dashboard/availability`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub target_id: TargetId,
    pub hours: u32,
    /// Fraction of successful checks in the window, or `null` when the
    /// backend has no samples for this target yet.
    pub availability: Option<f64>,
}

/// One sample in a response-time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeseriesPoint {
    /// Sample timestamp (RFC 3339).
    pub ts: String,
    /// Response time, or `null` for a failed check.
    pub response_time_ms: Option<f64>,
}

/// Payload of `GET /api/dashboard/timeseries`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeseriesResponse {
    pub target_id: TargetId,
    pub minutes: u32,
    #[serde(default)]
    pub series: Vec<TimeseriesPoint>,
}

/// One alert row from `GET /api/alerts`.
///
/// Backend order is authoritative (newest first); the client never
/// re-sorts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertRecord {
    #[serde(default)]
    pub id: i64,
    /// When the alert fired (RFC 3339).
    pub ts: String,
    pub target_id: TargetId,
    pub message: String,
}

/// Payload of `GET /api/alerts`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertsResponse {
    #[serde(default)]
    pub alerts: Vec<AlertRecord>,
}

/// Request body for `POST /api/targets`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTarget {
    pub name: String,
    pub url: String,
    pub interval_sec: u32,
    pub timeout_sec: u32,
    pub enabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_overview() {
        let json = r#"{
            "window_minutes": 15,
            "targets": [
                {
                    "id": 1,
                    "name": "api",
                    "url": "https://api.example.com/health",
                    "enabled": true,
                    "latest_status_code": 200,
                    "latest_error": null,
                    "latest_response_time_ms": 42.5,
                    "latest_dns_time_ms": 3.1,
                    "latest_ts": "2025-06-01T12:00:00+00:00"
                },
                {
                    "id": 2,
                    "name": "fresh",
                    "url": "https://fresh.example.com",
                    "enabled": true
                }
            ]
        }"#;

        let overview: Overview = serde_json::from_str(json).unwrap();
        assert_eq!(overview.window_minutes, 15);
        assert_eq!(overview.targets.len(), 2);

        let probed = &overview.targets[0];
        assert_eq!(probed.id, TargetId(1));
        assert_eq!(probed.latest_status_code, Some(200));
        assert_eq!(probed.latest_response_time_ms, Some(42.5));

        // A target never probed has no latest_* fields at all
        let fresh = &overview.targets[1];
        assert_eq!(fresh.id, TargetId(2));
        assert!(fresh.latest_status_code.is_none());
        assert!(fresh.latest_ts.is_none());
    }

    #[test]
    fn test_deserialize_availability_null() {
        let json = r#"{"target_id": 7, "hours": 24, "availability": null}"#;
        let response: AvailabilityResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.target_id, TargetId(7));
        assert!(response.availability.is_none());
    }

    #[test]
    fn test_deserialize_timeseries_with_gaps() {
        let json = r#"{
            "target_id": 3,
            "minutes": 60,
            "series": [
                {"ts": "2025-06-01T12:00:00+00:00", "response_time_ms": 10.0},
                {"ts": "2025-06-01T12:01:00+00:00", "response_time_ms": null}
            ]
        }"#;

        let response: TimeseriesResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.series.len(), 2);
        assert_eq!(response.series[0].response_time_ms, Some(10.0));
        assert!(response.series[1].response_time_ms.is_none());
    }

    #[test]
    fn test_deserialize_alerts() {
        let json = r#"{
            "alerts": [
                {"id": 9, "ts": "2025-06-01T12:00:00+00:00", "target_id": 3, "message": "2 consecutive failures"}
            ]
        }"#;

        let response: AlertsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.alerts.len(), 1);
        assert_eq!(response.alerts[0].target_id, TargetId(3));
        assert_eq!(response.alerts[0].message, "2 consecutive failures");
    }

    #[test]
    fn test_serialize_new_target() {
        let payload = NewTarget {
            name: "api".to_string(),
            url: "https://api.example.com".to_string(),
            interval_sec: 60,
            timeout_sec: 10,
            enabled: true,
        };

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["name"], "api");
        assert_eq!(json["interval_sec"], 60);
        assert_eq!(json["enabled"], true);
    }
}
