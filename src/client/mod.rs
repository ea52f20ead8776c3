//! Client layer: runs the validation pipeline and dispatches to the gateway.

mod retry;

use std::any::Any;
use std::error::Error as StdError;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::Arc;

use futures::FutureExt;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tracing::{Instrument, debug, error, info, warn};

use crate::config::GatewayConfig;
use crate::domain::{
    DispatchOutcome, GatewayCredentials, PROVIDER, RawSmsRequest, RequestId, SmsRequest,
    ValidatedSms, ValidationError, ValidationResult, check_business_rules,
};
use crate::transport::{
    StatusClass, classify_status, decode_send_sms_response, encode_send_sms_json,
};

pub use retry::RetryPolicy;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone)]
/// Status and body of one gateway HTTP exchange.
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Outbound HTTP seam.
///
/// The default implementation uses `reqwest`; hosts can supply their own (for example to
/// share a connection pool or to stub the gateway in tests). Implementations must be safe
/// to call concurrently.
pub trait HttpTransport: Send + Sync {
    /// POST `body` (already JSON-encoded) to `url`.
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        body: String,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    fn new(config: &GatewayConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .read_timeout(config.read_timeout())
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self { client })
    }
}

impl HttpTransport for ReqwestTransport {
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        body: String,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let response = self
                .client
                .post(url)
                .header(CONTENT_TYPE, "application/json")
                .header(ACCEPT, "application/json")
                .body(body)
                .send()
                .await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

#[derive(Debug, thiserror::Error)]
/// Failures while building the client or talking to the gateway.
pub enum GatewayError {
    /// Connection, TLS, or timeout failure. Retryable.
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// HTTP 4xx: the gateway rejected the request. Never retried.
    #[error("HTTP {status}: {}", .body.as_deref().unwrap_or("<empty body>"))]
    ClientStatus { status: u16, body: Option<String> },

    /// HTTP 5xx. Retryable.
    #[error("HTTP {status}: {}", .body.as_deref().unwrap_or("<empty body>"))]
    ServerStatus { status: u16, body: Option<String> },

    /// Any other non-200 status, e.g. `202` or a redirect. Never retried.
    #[error("HTTP {status}: {}", .body.as_deref().unwrap_or("<empty body>"))]
    UnexpectedStatus { status: u16, body: Option<String> },

    /// The configured base URL does not parse.
    #[error("invalid gateway url: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] Box<dyn StdError + Send + Sync>),
}

impl GatewayError {
    /// Whether another attempt could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::ServerStatus { .. })
    }
}

/// Builder for [`M360Client`].
pub struct M360ClientBuilder {
    config: GatewayConfig,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl M360ClientBuilder {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            config,
            transport: None,
        }
    }

    /// Override the gateway URL.
    pub fn endpoint(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    /// Override the environment label (`sandbox` / `production`).
    pub fn environment(mut self, label: impl Into<String>) -> Self {
        self.config.environment = label.into();
        self
    }

    pub fn connect_timeout_secs(mut self, secs: u64) -> Self {
        self.config.connect_timeout_secs = secs;
        self
    }

    pub fn read_timeout_secs(mut self, secs: u64) -> Self {
        self.config.read_timeout_secs = secs;
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    pub fn retry(mut self, policy: RetryPolicy) -> Self {
        self.config.retry = policy;
        self
    }

    /// Use a custom transport instead of the built-in `reqwest` one.
    ///
    /// Timeouts and user agent from the configuration are then the transport's concern.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build a [`M360Client`]. Fails when the base URL is invalid or the HTTP client
    /// cannot be created.
    pub fn build(self) -> Result<M360Client, GatewayError> {
        url::Url::parse(&self.config.base_url)?;

        let http = match self.transport {
            Some(transport) => transport,
            None => Arc::new(
                ReqwestTransport::new(&self.config)
                    .map_err(|err| GatewayError::Build(Box::new(err)))?,
            ),
        };

        Ok(M360Client {
            config: Arc::new(self.config),
            http,
        })
    }
}

#[derive(Clone)]
/// M360 SMS client.
///
/// Every `send*` call runs the full pipeline: normalize, validate, check business rules,
/// resolve credentials, dispatch. None of them return an error; every result, including
/// rejections and gateway failures, is a [`DispatchOutcome`].
pub struct M360Client {
    config: Arc<GatewayConfig>,
    http: Arc<dyn HttpTransport>,
}

impl M360Client {
    /// Create a client with the built-in HTTP transport.
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        Self::builder(config).build()
    }

    pub fn builder(config: GatewayConfig) -> M360ClientBuilder {
        M360ClientBuilder::new(config)
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Validate and send one request.
    ///
    /// A panic raised while dispatching (for example inside a custom [`HttpTransport`]) is
    /// reported as a `system_error` outcome.
    pub async fn send(&self, request: RawSmsRequest) -> DispatchOutcome {
        let request = SmsRequest::normalize(request);
        let request_id = RequestId::or_generate(request.request_id.as_deref());
        let span = tracing::info_span!("sms_dispatch", request_id = %request_id);

        async move {
            let dispatch = AssertUnwindSafe(self.dispatch(request, request_id.clone()));
            match dispatch.catch_unwind().await {
                Ok(outcome) => outcome,
                Err(panic) => {
                    error!(reason = panic_reason(panic.as_ref()), "SMS dispatch panicked");
                    DispatchOutcome::system_error(
                        &request_id,
                        self.config.environment_tag(),
                        "Unexpected error while sending the SMS",
                    )
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Like [`M360Client::send`], starting from an untyped JSON value.
    ///
    /// Values that do not match the request shape are rejected; the caller's
    /// `request_id` is kept when it can be read.
    pub async fn send_value(&self, value: serde_json::Value) -> DispatchOutcome {
        let request_id = value
            .get(RequestId::FIELD)
            .and_then(serde_json::Value::as_str)
            .map(str::to_owned);

        match serde_json::from_value::<RawSmsRequest>(value) {
            Ok(raw) => self.send(raw).await,
            Err(err) => malformed(request_id.as_deref(), err),
        }
    }

    /// Like [`M360Client::send`], starting from a JSON document.
    pub async fn send_json(&self, body: &str) -> DispatchOutcome {
        match serde_json::from_str::<serde_json::Value>(body) {
            Ok(value) => self.send_value(value).await,
            Err(err) => malformed(None, err),
        }
    }

    async fn dispatch(&self, request: SmsRequest, request_id: RequestId) -> DispatchOutcome {
        let environment = self.config.environment_tag();

        let sms = match ValidatedSms::parse(&request, request_id.clone()) {
            Ok(sms) => sms,
            Err(result) => {
                warn!(errors = ?result.messages(), "request failed validation");
                return DispatchOutcome::rejected(&request_id, "Validation failed", &result);
            }
        };

        let rules = check_business_rules(&sms);
        if !rules.is_valid() {
            warn!(errors = ?rules.messages(), "request failed business rules");
            return DispatchOutcome::rejected(
                &request_id,
                "Business rule validation failed",
                &rules,
            );
        }
        debug!(recipients = sms.recipients().len(), "request approved");

        let credentials = GatewayCredentials::resolve(
            request.app_key.as_deref(),
            request.app_secret.as_deref(),
            &self.config,
        );
        let missing = credentials.missing_variables();
        if !missing.is_empty() {
            warn!(?missing, ?environment, "gateway credentials are not configured");
            return DispatchOutcome::credentials_missing(&request_id, environment, &missing);
        }
        debug!(
            app_key_source = ?credentials.app_key().source(),
            app_secret_source = ?credentials.app_secret().source(),
            "credentials resolved"
        );

        let body = match encode_send_sms_json(&sms, &credentials) {
            Ok(body) => body,
            Err(err) => {
                error!(error = %err, "failed to encode gateway payload");
                return DispatchOutcome::system_error(
                    &request_id,
                    environment,
                    "Unexpected error while preparing the SMS request",
                );
            }
        };

        let (result, attempts) = self.post_with_retry(body).await;
        match result {
            Ok(response) => {
                info!(attempts, ?environment, "SMS accepted by gateway");
                DispatchOutcome::success(&request_id, environment, response, attempts)
            }
            Err(err) => {
                error!(
                    attempts,
                    retryable = err.is_retryable(),
                    error = %err,
                    "gateway call failed"
                );
                DispatchOutcome::api_error(
                    &request_id,
                    environment,
                    format!("{PROVIDER} API error: {err}"),
                    attempts,
                )
            }
        }
    }

    /// Returns the final result and the number of attempts made.
    async fn post_with_retry(
        &self,
        body: String,
    ) -> (Result<serde_json::Value, GatewayError>, u32) {
        let policy = &self.config.retry;
        let mut attempt = 1;
        loop {
            match self.post_once(body.clone()).await {
                Err(err) if err.is_retryable() && policy.allows_retry(attempt) => {
                    let delay = policy.backoff(attempt);
                    warn!(attempt, ?delay, error = %err, "gateway call failed, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                result => return (result, attempt),
            }
        }
    }

    async fn post_once(&self, body: String) -> Result<serde_json::Value, GatewayError> {
        let response = self
            .http
            .post_json(&self.config.base_url, body)
            .await
            .map_err(GatewayError::Transport)?;

        let body = if response.body.trim().is_empty() {
            None
        } else {
            Some(response.body)
        };

        match classify_status(response.status) {
            StatusClass::Success => Ok(decode_send_sms_response(
                body.as_deref().unwrap_or("null"),
            )),
            StatusClass::ClientError => Err(GatewayError::ClientStatus {
                status: response.status,
                body,
            }),
            StatusClass::ServerError => Err(GatewayError::ServerStatus {
                status: response.status,
                body,
            }),
            StatusClass::Unexpected => Err(GatewayError::UnexpectedStatus {
                status: response.status,
                body,
            }),
        }
    }
}

fn panic_reason(panic: &(dyn Any + Send)) -> &str {
    panic
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("<non-string panic payload>")
}

fn malformed(request_id: Option<&str>, err: serde_json::Error) -> DispatchOutcome {
    let request_id = RequestId::or_generate(request_id);
    warn!(%request_id, error = %err, "request has an unsupported shape");
    let result = ValidationResult::from(ValidationError::Malformed {
        reason: err.to_string(),
    });
    DispatchOutcome::rejected(&request_id, "Validation failed", &result)
}
