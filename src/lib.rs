//! Validating Rust client for the M360 SMS gateway HTTP API.
//!
//! Every send runs one pipeline: the request is normalized, checked for format and
//! content policy, credentials are resolved, and only then is the payload posted to the
//! gateway. The result is always a [`DispatchOutcome`] envelope, never an error.
//!
//! ```rust,no_run
//! use m360_sms::{GatewayConfig, M360Client, RawSmsRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = M360Client::new(GatewayConfig::from_env()?)?;
//!     let outcome = client
//!         .send(RawSmsRequest {
//!             from: Some("M360".to_owned()),
//!             to: Some(vec!["09171234567".to_owned()]),
//!             text: Some("hello".to_owned()),
//!             ..Default::default()
//!         })
//!         .await;
//!     println!("{}", serde_json::to_string(&outcome)?);
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod config;
pub mod domain;
mod transport;

pub use crate::client::{
    BoxFuture, GatewayError, HttpResponse, HttpTransport, M360Client, M360ClientBuilder,
    RetryPolicy,
};
pub use crate::config::GatewayConfig;
pub use crate::domain::{
    CredentialSource, DispatchOutcome, Environment, ErrorKind, GatewayCredentials,
    MessageContent, OutcomeStatus, PhMobileNumber, RawSmsRequest, RequestId, SenderId,
    SmsRequest, ValidatedSms, ValidationError, ValidationResult, check_business_rules, validate,
};
