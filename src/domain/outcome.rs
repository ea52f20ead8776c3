use serde::Serialize;

use crate::domain::validation::ValidationResult;
use crate::domain::value::RequestId;

/// Provider name reported in every gateway-related envelope.
pub const PROVIDER: &str = "M360";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    CredentialsMissing,
    ApiError,
    SystemError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
/// Gateway environment a call was (or would have been) sent to.
pub enum Environment {
    Sandbox,
    Production,
}

impl Environment {
    /// `Sandbox` when either the environment label or the base URL mentions "sandbox".
    pub fn detect(label: &str, base_url: &str) -> Self {
        let mentions_sandbox = |value: &str| value.to_ascii_lowercase().contains("sandbox");
        if mentions_sandbox(label) || mentions_sandbox(base_url) {
            Self::Sandbox
        } else {
            Self::Production
        }
    }
}

/// The single result shape returned for every send call.
///
/// Optional fields are omitted from the serialized form when unset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchOutcome {
    pub status: OutcomeStatus,
    pub message: String,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_errors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempts: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<Environment>,
}

impl DispatchOutcome {
    pub fn success(
        request_id: &RequestId,
        environment: Environment,
        response: serde_json::Value,
        attempts: u32,
    ) -> Self {
        Self {
            response: Some(response),
            attempts: Some(attempts),
            ..Self::gateway(
                OutcomeStatus::Success,
                "SMS sent successfully",
                request_id,
                environment,
            )
        }
    }

    /// Validation or business-rule rejection.
    pub fn rejected(
        request_id: &RequestId,
        message: impl Into<String>,
        result: &ValidationResult,
    ) -> Self {
        Self {
            status: OutcomeStatus::Error,
            message: message.into(),
            request_id: request_id.as_str().to_owned(),
            validation_errors: Some(result.messages()),
            error_type: None,
            response: None,
            attempts: None,
            provider: None,
            environment: None,
        }
    }

    pub fn credentials_missing(
        request_id: &RequestId,
        environment: Environment,
        variables: &[&str],
    ) -> Self {
        let message = format!(
            "{PROVIDER} credentials are not configured; set {}",
            variables.join(" and ")
        );
        Self {
            error_type: Some(ErrorKind::CredentialsMissing),
            ..Self::gateway(OutcomeStatus::Error, message, request_id, environment)
        }
    }

    pub fn api_error(
        request_id: &RequestId,
        environment: Environment,
        message: impl Into<String>,
        attempts: u32,
    ) -> Self {
        Self {
            error_type: Some(ErrorKind::ApiError),
            attempts: Some(attempts),
            ..Self::gateway(OutcomeStatus::Error, message, request_id, environment)
        }
    }

    pub fn system_error(
        request_id: &RequestId,
        environment: Environment,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error_type: Some(ErrorKind::SystemError),
            ..Self::gateway(OutcomeStatus::Error, message, request_id, environment)
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == OutcomeStatus::Success
    }

    fn gateway(
        status: OutcomeStatus,
        message: impl Into<String>,
        request_id: &RequestId,
        environment: Environment,
    ) -> Self {
        Self {
            status,
            message: message.into(),
            request_id: request_id.as_str().to_owned(),
            validation_errors: None,
            error_type: None,
            response: None,
            attempts: None,
            provider: Some(PROVIDER),
            environment: Some(environment),
        }
    }
}
