//! Probe status derivation.

use crate::api::Target;

/// Health of a target, derived from its latest probe on every render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStatus {
    /// Latest probe got a successful response (2xx or 3xx).
    Up,
    /// Latest probe failed or got an error status.
    Down,
    /// No probe result yet.
    Unknown,
}

impl ProbeStatus {
    /// Display label for the status column.
    pub fn label(&self) -> &'static str {
        match self {
            ProbeStatus::Up => "up",
            ProbeStatus::Down => "down",
            ProbeStatus::Unknown => "unknown",
        }
    }
}

/// Derive the displayed status from a target's latest probe fields.
///
/// A probe-level error always means down, even when a status code is
/// also present. No samples at all means unknown.
pub fn probe_status(target: &Target) -> ProbeStatus {
    if let Some(err) = &target.latest_error {
        if !err.is_empty() {
            return ProbeStatus::Down;
        }
    }
    match target.latest_status_code {
        None => ProbeStatus::Unknown,
        Some(code) if (200..400).contains(&code) => ProbeStatus::Up,
        Some(_) => ProbeStatus::Down,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::TargetId;

    fn target(code: Option<u16>, error: Option<&str>) -> Target {
        Target {
            id: TargetId(1),
            name: "api".to_string(),
            url: "https://api.example.com".to_string(),
            enabled: true,
            latest_status_code: code,
            latest_error: error.map(|e| e.to_string()),
            latest_response_time_ms: None,
            latest_dns_time_ms: None,
            latest_ts: None,
        }
    }

    #[test]
    fn test_success_codes_are_up() {
        assert_eq!(probe_status(&target(Some(200), None)), ProbeStatus::Up);
        assert_eq!(probe_status(&target(Some(301), None)), ProbeStatus::Up);
        assert_eq!(probe_status(&target(Some(399), None)), ProbeStatus::Up);
    }

    #[test]
    fn test_error_codes_are_down() {
        assert_eq!(probe_status(&target(Some(404), None)), ProbeStatus::Down);
        assert_eq!(probe_status(&target(Some(500), None)), ProbeStatus::Down);
    }

    #[test]
    fn test_probe_error_wins_over_status_code() {
        let status = probe_status(&target(Some(200), Some("DNS error: timed out")));
        assert_eq!(status, ProbeStatus::Down);
    }

    #[test]
    fn test_no_samples_is_unknown() {
        assert_eq!(probe_status(&target(None, None)), ProbeStatus::Unknown);
        // An empty error string is not an error
        assert_eq!(probe_status(&target(None, Some(""))), ProbeStatus::Unknown);
    }
}
