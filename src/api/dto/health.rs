//! DTOs for health check endpoint.

use serde::Serialize;

use crate::config::StorageBackend;

/// Overall service state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Healthy,
    Degraded,
}

/// Outcome of a single component check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckState {
    Ok,
    Error,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: ServiceStatus,
    pub version: &'static str,
    pub checks: HealthChecks,
}

#[derive(Debug, Serialize)]
pub struct HealthChecks {
    pub storage: StorageCheck,
}

/// Storage reachability, reported with the active backend.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageCheck {
    pub status: CheckState,
    pub backend: StorageBackend,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StorageCheck {
    pub fn ok(backend: StorageBackend, accounts: i64) -> Self {
        Self {
            status: CheckState::Ok,
            backend,
            message: Some(format!("{backend}, {accounts} accounts")),
        }
    }

    pub fn failed(backend: StorageBackend, reason: impl std::fmt::Display) -> Self {
        Self {
            status: CheckState::Error,
            backend,
            message: Some(format!("Storage error: {reason}")),
        }
    }
}

impl HealthResponse {
    /// Derives the overall status from the component checks.
    pub fn from_checks(checks: HealthChecks) -> Self {
        let status = match checks.storage.status {
            CheckState::Ok => ServiceStatus::Healthy,
            CheckState::Error => ServiceStatus::Degraded,
        };

        Self {
            status,
            version: env!("CARGO_PKG_VERSION"),
            checks,
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == ServiceStatus::Healthy
    }
}
