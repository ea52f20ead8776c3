use serde::Deserialize;

use crate::domain::validation::{ValidationError, ValidationResult};
use crate::domain::value::{DataCodingScheme, MessageText, PhMobileNumber, RequestId, SenderId};

/// Send request as it arrives from the caller.
///
/// Both `text` and `content.text` are accepted; [`SmsRequest::normalize`] picks one.
/// Unknown fields are rejected at deserialization time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawSmsRequest {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<Vec<String>>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub content: Option<MessageContent>,
    #[serde(default)]
    pub dcs: Option<u8>,
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub app_key: Option<String>,
    #[serde(default)]
    pub app_secret: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MessageContent {
    #[serde(default)]
    pub text: Option<String>,
}

/// Canonical request: one sender, one recipient list, one resolved text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SmsRequest {
    pub from: String,
    pub to: Vec<String>,
    pub text: String,
    pub dcs: Option<u8>,
    pub request_id: Option<String>,
    pub app_key: Option<String>,
    pub app_secret: Option<String>,
}

impl SmsRequest {
    /// Reconcile the alternate input shapes. Never fails; gaps are left for validation.
    pub fn normalize(raw: RawSmsRequest) -> Self {
        let text = match raw.text {
            Some(text) if !text.trim().is_empty() => text,
            _ => raw.content.and_then(|content| content.text).unwrap_or_default(),
        };

        Self {
            from: raw.from.map(|from| from.trim().to_owned()).unwrap_or_default(),
            to: raw.to.unwrap_or_default(),
            text,
            dcs: raw.dcs,
            request_id: raw.request_id,
            app_key: raw.app_key,
            app_secret: raw.app_secret,
        }
    }
}

/// Request whose fields all passed format validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSms {
    from: SenderId,
    to: Vec<PhMobileNumber>,
    text: MessageText,
    dcs: DataCodingScheme,
    request_id: RequestId,
}

impl ValidatedSms {
    /// Run every format check and either build the typed request or report all failures.
    pub fn parse(request: &SmsRequest, request_id: RequestId) -> Result<Self, ValidationResult> {
        let (from, to, text) = parse_fields(request)?;
        Ok(Self {
            from,
            to,
            text,
            dcs: request.dcs.map(DataCodingScheme::new).unwrap_or_default(),
            request_id,
        })
    }

    pub fn sender(&self) -> &SenderId {
        &self.from
    }

    pub fn recipients(&self) -> &[PhMobileNumber] {
        &self.to
    }

    pub fn text(&self) -> &MessageText {
        &self.text
    }

    pub fn dcs(&self) -> DataCodingScheme {
        self.dcs
    }

    pub fn request_id(&self) -> &RequestId {
        &self.request_id
    }
}

/// Format validation without building the typed request.
pub fn validate(request: &SmsRequest) -> ValidationResult {
    match parse_fields(request) {
        Ok(_) => ValidationResult::valid(),
        Err(result) => result,
    }
}

type ParsedFields = (SenderId, Vec<PhMobileNumber>, MessageText);

// Errors are collected in field order: sender, recipients, text.
fn parse_fields(request: &SmsRequest) -> Result<ParsedFields, ValidationResult> {
    let mut errors = Vec::new();

    let from = SenderId::new(request.from.as_str())
        .map_err(|err| errors.push(err))
        .ok();

    if request.to.is_empty() {
        errors.push(ValidationError::Empty {
            field: PhMobileNumber::FIELD,
        });
    }
    let to = request
        .to
        .iter()
        .enumerate()
        .filter_map(|(index, value)| {
            PhMobileNumber::new(value.as_str())
                .map_err(|_| {
                    errors.push(ValidationError::InvalidRecipient {
                        index,
                        input: value.clone(),
                    })
                })
                .ok()
        })
        .collect::<Vec<_>>();

    let text = MessageText::new(request.text.as_str())
        .map_err(|err| errors.push(err))
        .ok();

    match (from, text) {
        (Some(from), Some(text)) if errors.is_empty() => Ok((from, to, text)),
        _ => Err(ValidationResult::from_errors(errors)),
    }
}
