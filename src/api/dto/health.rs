//! Health check DTOs for API responses.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Health check response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "status": "healthy",
    "version": "0.1.0",
    "timestamp": "2025-01-15T03:05:00Z",
    "checks": {
        "database": {
            "status": "healthy",
            "message": "Connected",
            "response_time_ms": 3
        },
        "notifications": {
            "status": "healthy",
            "message": "WhatsApp via fonnte"
        }
    }
}))]
pub struct HealthResponse {
    pub status: HealthStatus,
    #[schema(example = "0.1.0")]
    pub version: String,
    /// Time of the check (RFC 3339, UTC)
    #[schema(value_type = String, format = DateTime)]
    pub timestamp: String,
    /// Per-component results keyed by component name
    pub checks: BTreeMap<String, ComponentHealth>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl HealthStatus {
    /// The worse of two statuses.
    pub fn combine(self, other: HealthStatus) -> HealthStatus {
        match (self, other) {
            (HealthStatus::Unhealthy, _) | (_, HealthStatus::Unhealthy) => HealthStatus::Unhealthy,
            (HealthStatus::Degraded, _) | (_, HealthStatus::Degraded) => HealthStatus::Degraded,
            _ => HealthStatus::Healthy,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ComponentHealth {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,
}

impl HealthResponse {
    pub fn new(
        version: String,
        timestamp: String,
        checks: BTreeMap<String, ComponentHealth>,
    ) -> Self {
        let status = checks
            .values()
            .fold(HealthStatus::Healthy, |acc, check| acc.combine(check.status));
        Self {
            status,
            version,
            timestamp,
            checks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(status: HealthStatus) -> ComponentHealth {
        ComponentHealth {
            status,
            message: None,
            response_time_ms: None,
        }
    }

    #[test]
    fn test_health_status_serialization() {
        let json = serde_json::to_string(&HealthStatus::Degraded).unwrap();
        assert_eq!(json, "\"degraded\"");
    }

    #[test]
    fn test_overall_status_is_worst_component() {
        let mut checks = BTreeMap::new();
        checks.insert("database".to_string(), check(HealthStatus::Healthy));
        checks.insert("notifications".to_string(), check(HealthStatus::Degraded));
        let response = HealthResponse::new("0.1.0".into(), "now".into(), checks);
        assert_eq!(response.status, HealthStatus::Degraded);

        let mut checks = BTreeMap::new();
        checks.insert("database".to_string(), check(HealthStatus::Unhealthy));
        checks.insert("notifications".to_string(), check(HealthStatus::Degraded));
        let response = HealthResponse::new("0.1.0".into(), "now".into(), checks);
        assert_eq!(response.status, HealthStatus::Unhealthy);
    }

    #[test]
    fn test_optional_fields_are_omitted() {
        let value = serde_json::to_value(check(HealthStatus::Healthy)).unwrap();
        assert_eq!(value, serde_json::json!({ "status": "healthy" }));
    }
}
