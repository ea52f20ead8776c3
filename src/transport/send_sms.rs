use serde::Serialize;

use crate::domain::{GatewayCredentials, PhMobileNumber, ValidatedSms};

/// How a gateway HTTP status is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// `200`: the body is the provider's response.
    Success,
    /// `400..=499`: the request itself was rejected; never retried.
    ClientError,
    /// `500` and above: a transient server-side failure.
    ServerError,
    /// Any other status (other 2xx, 1xx, 3xx). The gateway may already have queued the
    /// message, so it is never retried.
    Unexpected,
}

pub fn classify_status(status: u16) -> StatusClass {
    match status {
        200 => StatusClass::Success,
        400..=499 => StatusClass::ClientError,
        500.. => StatusClass::ServerError,
        _ => StatusClass::Unexpected,
    }
}

#[derive(Debug, Serialize)]
struct SendSmsPayload<'a> {
    app_key: &'a str,
    app_secret: &'a str,
    from: &'a str,
    to: Vec<&'a str>,
    dcs: u8,
    request_id: &'a str,
    content: ContentPayload<'a>,
}

#[derive(Debug, Serialize)]
struct ContentPayload<'a> {
    text: &'a str,
}

pub fn encode_send_sms_json(
    sms: &ValidatedSms,
    credentials: &GatewayCredentials,
) -> Result<String, serde_json::Error> {
    let payload = SendSmsPayload {
        app_key: credentials.app_key().as_str(),
        app_secret: credentials.app_secret().as_str(),
        from: sms.sender().as_str(),
        to: sms.recipients().iter().map(PhMobileNumber::raw).collect(),
        dcs: sms.dcs().value(),
        request_id: sms.request_id().as_str(),
        content: ContentPayload {
            text: sms.text().as_str(),
        },
    };
    serde_json::to_string(&payload)
}

/// Parse a successful response body, keeping it unmodified.
///
/// Bodies that are not JSON are wrapped as `{"raw": "<body>"}`.
pub fn decode_send_sms_response(body: &str) -> serde_json::Value {
    serde_json::from_str(body).unwrap_or_else(|_| serde_json::json!({ "raw": body }))
}
