use std::fmt;

use crate::config::{APP_KEY_VAR, APP_SECRET_VAR, GatewayConfig};

/// Value used for the app key when neither the request nor the configuration provides one.
pub const PLACEHOLDER_APP_KEY: &str = "your_m360_app_key";
/// Value used for the app secret when neither the request nor the configuration provides one.
pub const PLACEHOLDER_APP_SECRET: &str = "your_m360_app_secret";

/// Shorter credentials are treated as unset.
pub const MIN_CREDENTIAL_LEN: usize = 8;

/// Accepted despite its length so connectivity checks can reach the gateway without real keys.
pub const TEST_CREDENTIAL: &str = "test";

const PLACEHOLDER_SENTINELS: [&str; 5] = [
    PLACEHOLDER_APP_KEY,
    PLACEHOLDER_APP_SECRET,
    "your_app_key",
    "your_app_secret",
    "changeme",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Where a credential value came from.
pub enum CredentialSource {
    /// Supplied with the send request.
    Request,
    /// Read from the gateway configuration (environment).
    Environment,
    /// Nothing was supplied; the fixed placeholder is used.
    Placeholder,
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    value: String,
    source: CredentialSource,
}

impl Credential {
    /// Pick the first non-blank of `request`, `configured`, then `placeholder`.
    pub fn resolve(
        request: Option<&str>,
        configured: Option<&str>,
        placeholder: &'static str,
    ) -> Self {
        fn non_blank(value: Option<&str>) -> Option<&str> {
            value.filter(|value| !value.trim().is_empty())
        }

        if let Some(value) = non_blank(request) {
            return Self {
                value: value.trim().to_owned(),
                source: CredentialSource::Request,
            };
        }
        if let Some(value) = non_blank(configured) {
            return Self {
                value: value.trim().to_owned(),
                source: CredentialSource::Environment,
            };
        }
        Self {
            value: placeholder.to_owned(),
            source: CredentialSource::Placeholder,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn source(&self) -> CredentialSource {
        self.source
    }

    /// `true` when the value cannot be a real credential.
    ///
    /// This is a sanity check on configuration, not an authentication gate.
    pub fn is_missing(&self) -> bool {
        if self.source == CredentialSource::Placeholder {
            return true;
        }
        let value = self.value.trim();
        if value == TEST_CREDENTIAL {
            return false;
        }
        value.is_empty()
            || PLACEHOLDER_SENTINELS.contains(&value)
            || value.chars().count() < MIN_CREDENTIAL_LEN
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("value", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

/// App key and secret sent with every gateway call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayCredentials {
    app_key: Credential,
    app_secret: Credential,
}

impl GatewayCredentials {
    /// Resolve each credential independently: request override, then configuration,
    /// then placeholder.
    pub fn resolve(
        request_key: Option<&str>,
        request_secret: Option<&str>,
        config: &GatewayConfig,
    ) -> Self {
        Self {
            app_key: Credential::resolve(
                request_key,
                config.app_key.as_deref(),
                PLACEHOLDER_APP_KEY,
            ),
            app_secret: Credential::resolve(
                request_secret,
                config.app_secret.as_deref(),
                PLACEHOLDER_APP_SECRET,
            ),
        }
    }

    pub fn app_key(&self) -> &Credential {
        &self.app_key
    }

    pub fn app_secret(&self) -> &Credential {
        &self.app_secret
    }

    /// Environment variables that must be set before dispatch can proceed.
    pub fn missing_variables(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.app_key.is_missing() {
            missing.push(APP_KEY_VAR);
        }
        if self.app_secret.is_missing() {
            missing.push(APP_SECRET_VAR);
        }
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(app_key: Option<&str>, app_secret: Option<&str>) -> GatewayConfig {
        GatewayConfig {
            app_key: app_key.map(str::to_owned),
            app_secret: app_secret.map(str::to_owned),
            ..Default::default()
        }
    }

    #[test]
    fn request_value_wins_over_configuration() {
        let creds = GatewayCredentials::resolve(
            Some("request-key-123"),
            None,
            &config(Some("config-key-123"), Some("config-secret-123")),
        );
        assert_eq!(creds.app_key().as_str(), "request-key-123");
        assert_eq!(creds.app_key().source(), CredentialSource::Request);
        assert_eq!(creds.app_secret().as_str(), "config-secret-123");
        assert_eq!(creds.app_secret().source(), CredentialSource::Environment);
        assert!(creds.missing_variables().is_empty());
    }

    #[test]
    fn blank_request_value_falls_through() {
        let creds =
            GatewayCredentials::resolve(Some("  "), Some(""), &config(Some("config-key-123"), None));
        assert_eq!(creds.app_key().source(), CredentialSource::Environment);
        assert_eq!(creds.app_secret().source(), CredentialSource::Placeholder);
        assert_eq!(creds.app_secret().as_str(), PLACEHOLDER_APP_SECRET);
    }

    #[test]
    fn nothing_configured_reports_both_variables() {
        let creds = GatewayCredentials::resolve(None, None, &config(None, None));
        assert_eq!(creds.missing_variables(), vec![APP_KEY_VAR, APP_SECRET_VAR]);
    }

    #[test]
    fn placeholder_and_short_values_are_missing() {
        let creds = GatewayCredentials::resolve(
            Some("your_app_key"),
            Some("abc"),
            &config(None, None),
        );
        assert_eq!(creds.missing_variables(), vec![APP_KEY_VAR, APP_SECRET_VAR]);
    }

    #[test]
    fn test_sentinel_is_allowed_through() {
        let creds = GatewayCredentials::resolve(Some("test"), Some("test"), &config(None, None));
        assert!(creds.missing_variables().is_empty());
    }

    #[test]
    fn debug_output_redacts_values() {
        let creds = GatewayCredentials::resolve(
            Some("request-key-123"),
            Some("super-secret-value"),
            &config(None, None),
        );
        let debug = format!("{creds:?}");
        assert!(!debug.contains("super-secret-value"));
        assert!(!debug.contains("request-key-123"));
        assert!(debug.contains("Request"));
    }
}
