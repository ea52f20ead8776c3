use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::validation::ValidationError;

static PH_MOBILE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^09[0-9]{9}$").expect("PH mobile pattern is a valid regex"));

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Sender id shown on the handset (`from`).
///
/// Invariant: non-empty after trimming and at most [`SenderId::MAX_LEN`] characters.
pub struct SenderId(String);

impl SenderId {
    /// JSON field name used by M360 (`from`).
    pub const FIELD: &'static str = "from";

    /// Longest sender id the gateway accepts.
    pub const MAX_LEN: usize = 11;

    /// Create a validated [`SenderId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        let len = trimmed.chars().count();
        if len > Self::MAX_LEN {
            return Err(ValidationError::TooLong {
                field: Self::FIELD,
                max: Self::MAX_LEN,
                actual: len,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated sender id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Philippine mobile number in local form (`09XXXXXXXXX`).
///
/// Invariant: exactly 11 ASCII digits starting with `09`. No normalization is applied.
pub struct PhMobileNumber(String);

impl PhMobileNumber {
    /// JSON field name used by M360 (`to`).
    pub const FIELD: &'static str = "to";

    /// Create a validated [`PhMobileNumber`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        if !PH_MOBILE_PATTERN.is_match(&value) {
            return Err(ValidationError::InvalidPhoneNumber { input: value });
        }
        Ok(Self(value))
    }

    /// The number exactly as it will be sent.
    pub fn raw(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// SMS message text (`content.text`).
///
/// Invariant: non-empty after trimming and at most [`MessageText::MAX_LEN`] characters.
/// The original value (including whitespace) is preserved.
pub struct MessageText(String);

impl MessageText {
    /// Field name reported in validation errors.
    pub const FIELD: &'static str = "text";

    /// Single GSM-7 segment.
    pub const MAX_LEN: usize = 160;

    /// Create validated message text.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        let len = value.chars().count();
        if len > Self::MAX_LEN {
            return Err(ValidationError::TooLong {
                field: Self::FIELD,
                max: Self::MAX_LEN,
                actual: len,
            });
        }
        Ok(Self(value))
    }

    /// Borrow the message text as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    /// Always `false` for a constructed value; provided alongside [`MessageText::len`].
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
/// Data coding scheme (`dcs`). `0` selects the default GSM alphabet.
pub struct DataCodingScheme(u8);

impl DataCodingScheme {
    /// JSON field name used by M360 (`dcs`).
    pub const FIELD: &'static str = "dcs";

    /// Wrap a raw coding scheme value (no range validation is performed).
    pub fn new(value: u8) -> Self {
        Self(value)
    }

    /// The raw scheme value sent to the gateway.
    pub fn value(self) -> u8 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Caller-visible correlation id (`request_id`).
///
/// Invariant: non-empty after trimming.
pub struct RequestId(String);

impl RequestId {
    /// JSON field name used by M360 (`request_id`).
    pub const FIELD: &'static str = "request_id";

    /// Create a validated [`RequestId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Generate a fresh, unique id of the form `sms_<uuid>`.
    pub fn generate() -> Self {
        Self(format!("sms_{}", uuid::Uuid::new_v4().simple()))
    }

    /// Use `value` when it is a usable id, otherwise generate one.
    pub fn or_generate(value: Option<&str>) -> Self {
        value
            .and_then(|value| Self::new(value).ok())
            .unwrap_or_else(Self::generate)
    }

    /// Borrow the id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sender_id_trims_and_enforces_length() {
        let sender = SenderId::new("  M360Test ").unwrap();
        assert_eq!(sender.as_str(), "M360Test");

        assert!(SenderId::new("A".repeat(11)).is_ok());
        assert_eq!(
            SenderId::new("A".repeat(12)).unwrap_err(),
            ValidationError::TooLong {
                field: SenderId::FIELD,
                max: 11,
                actual: 12
            }
        );
        assert_eq!(
            SenderId::new("   ").unwrap_err(),
            ValidationError::Empty {
                field: SenderId::FIELD
            }
        );
    }

    #[test]
    fn ph_mobile_number_requires_local_format() {
        assert_eq!(
            PhMobileNumber::new("09171234567").unwrap().raw(),
            "09171234567"
        );

        for bad in [
            "9171234567",
            "0917123456",
            "091712345678",
            "+639171234567",
            "0817123456a",
            " 09171234567",
            "09171234567\n",
        ] {
            assert!(
                matches!(
                    PhMobileNumber::new(bad),
                    Err(ValidationError::InvalidPhoneNumber { .. })
                ),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn message_text_length_boundary() {
        let at_limit = MessageText::new("a".repeat(160)).unwrap();
        assert_eq!(at_limit.len(), 160);
        assert!(!at_limit.is_empty());

        assert_eq!(
            MessageText::new("a".repeat(161)).unwrap_err(),
            ValidationError::TooLong {
                field: MessageText::FIELD,
                max: 160,
                actual: 161
            }
        );
        assert!(MessageText::new(" \t ").is_err());
        assert_eq!(MessageText::new(" hi ").unwrap().as_str(), " hi ");
    }

    #[test]
    fn message_text_counts_characters_not_bytes() {
        let text = "ñ".repeat(160);
        assert!(text.len() > 160);
        assert!(MessageText::new(text).is_ok());
    }

    #[test]
    fn request_id_generation_is_unique_and_prefixed() {
        let a = RequestId::generate();
        let b = RequestId::generate();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("sms_"));

        assert_eq!(RequestId::or_generate(Some(" req-1 ")).as_str(), "req-1");
        assert!(RequestId::or_generate(Some("  ")).as_str().starts_with("sms_"));
        assert!(RequestId::or_generate(None).as_str().starts_with("sms_"));
    }

    #[test]
    fn dcs_defaults_to_zero() {
        assert_eq!(DataCodingScheme::default().value(), 0);
        assert_eq!(DataCodingScheme::new(8).value(), 8);
    }
}
