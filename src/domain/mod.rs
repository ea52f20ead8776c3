//! Domain layer: strong types, validation, and content policy (no I/O).

mod credentials;
mod outcome;
mod request;
mod rules;
mod validation;
mod value;

pub use credentials::{
    Credential, CredentialSource, GatewayCredentials, MIN_CREDENTIAL_LEN, PLACEHOLDER_APP_KEY,
    PLACEHOLDER_APP_SECRET, TEST_CREDENTIAL,
};
pub use outcome::{DispatchOutcome, Environment, ErrorKind, OutcomeStatus, PROVIDER};
pub use request::{MessageContent, RawSmsRequest, SmsRequest, ValidatedSms, validate};
pub use rules::{
    MAX_SPECIAL_CHAR_PERCENT, SPAM_KEYWORD_THRESHOLD, SPAM_KEYWORDS, check_business_rules,
    spam_keywords, special_character_count,
};
pub use validation::{ValidationError, ValidationResult};
pub use value::{DataCodingScheme, MessageText, PhMobileNumber, RequestId, SenderId};

#[cfg(test)]
mod tests {
    use super::*;

    fn request(from: &str, to: &[&str], text: &str) -> SmsRequest {
        SmsRequest {
            from: from.to_owned(),
            to: to.iter().map(|it| (*it).to_owned()).collect(),
            text: text.to_owned(),
            ..Default::default()
        }
    }

    #[test]
    fn content_text_normalizes_like_flat_text() {
        let flat = SmsRequest::normalize(RawSmsRequest {
            from: Some("M360".to_owned()),
            to: Some(vec!["09171234567".to_owned()]),
            text: Some("Hello".to_owned()),
            ..Default::default()
        });
        let nested = SmsRequest::normalize(RawSmsRequest {
            from: Some("M360".to_owned()),
            to: Some(vec!["09171234567".to_owned()]),
            content: Some(MessageContent {
                text: Some("Hello".to_owned()),
            }),
            ..Default::default()
        });
        assert_eq!(flat, nested);
        assert_eq!(nested.text, "Hello");
    }

    #[test]
    fn blank_flat_text_falls_back_to_content() {
        let normalized = SmsRequest::normalize(RawSmsRequest {
            text: Some("   ".to_owned()),
            content: Some(MessageContent {
                text: Some("from content".to_owned()),
            }),
            ..Default::default()
        });
        assert_eq!(normalized.text, "from content");
    }

    #[test]
    fn normalize_trims_sender_and_defaults_missing_fields() {
        let normalized = SmsRequest::normalize(RawSmsRequest {
            from: Some("  M360  ".to_owned()),
            ..Default::default()
        });
        assert_eq!(normalized.from, "M360");
        assert!(normalized.to.is_empty());
        assert!(normalized.text.is_empty());
    }

    #[test]
    fn raw_request_deserializes_both_shapes_and_rejects_unknown_fields() {
        let raw: RawSmsRequest = serde_json::from_str(
            r#"{"from":"M360","to":["09171234567"],"content":{"text":"Hi"},"dcs":0}"#,
        )
        .unwrap();
        assert_eq!(SmsRequest::normalize(raw).text, "Hi");

        assert!(serde_json::from_str::<RawSmsRequest>(r#"{"from":"M360","msg":"Hi"}"#).is_err());
        assert!(serde_json::from_str::<RawSmsRequest>(r#"{"to":"09171234567"}"#).is_err());
    }

    #[test]
    fn missing_sender_is_reported() {
        let result = validate(&request("", &["09171234567"], "Hello"));
        assert!(!result.is_valid());
        assert!(result.errors().contains(&ValidationError::Empty {
            field: SenderId::FIELD
        }));
    }

    #[test]
    fn invalid_recipients_are_reported_with_index_and_value() {
        let result = validate(&request("M360", &["09171234567", "12345", "0917"], "Hello"));
        assert_eq!(
            result.errors(),
            &[
                ValidationError::InvalidRecipient {
                    index: 1,
                    input: "12345".to_owned()
                },
                ValidationError::InvalidRecipient {
                    index: 2,
                    input: "0917".to_owned()
                },
            ]
        );
        assert!(result.messages()[0].contains("index 1: 12345"));
    }

    #[test]
    fn empty_recipients_are_reported() {
        let result = validate(&request("M360", &[], "Hello"));
        assert_eq!(
            result.errors(),
            &[ValidationError::Empty {
                field: PhMobileNumber::FIELD
            }]
        );
    }

    #[test]
    fn text_length_boundary_cites_actual_length() {
        assert!(validate(&request("M360", &["09171234567"], &"a".repeat(160))).is_valid());

        let result = validate(&request("M360", &["09171234567"], &"a".repeat(161)));
        assert!(!result.is_valid());
        assert!(result.messages()[0].contains("161"), "{:?}", result.messages());
    }

    #[test]
    fn sender_length_boundary() {
        assert!(validate(&request("ABCDEFGHIJK", &["09171234567"], "Hello")).is_valid());
        let result = validate(&request("ABCDEFGHIJKL", &["09171234567"], "Hello"));
        assert_eq!(
            result.errors(),
            &[ValidationError::TooLong {
                field: SenderId::FIELD,
                max: SenderId::MAX_LEN,
                actual: 12
            }]
        );
    }

    #[test]
    fn errors_accumulate_without_short_circuit() {
        let result = validate(&request("", &["bad"], ""));
        assert_eq!(
            result.errors(),
            &[
                ValidationError::Empty {
                    field: SenderId::FIELD
                },
                ValidationError::InvalidRecipient {
                    index: 0,
                    input: "bad".to_owned()
                },
                ValidationError::Empty {
                    field: MessageText::FIELD
                },
            ]
        );
    }

    #[test]
    fn validate_does_not_depend_on_request_id() {
        let with_id = SmsRequest {
            request_id: Some("req-1".to_owned()),
            ..request("M360", &["09171234567"], "Hello")
        };
        let without_id = SmsRequest {
            request_id: Some("   ".to_owned()),
            ..request("", &["09171234567"], "Hello")
        };
        assert!(validate(&with_id).is_valid());
        assert_eq!(
            validate(&without_id).errors(),
            &[ValidationError::Empty {
                field: SenderId::FIELD
            }]
        );
    }

    #[test]
    fn parse_builds_typed_request_with_default_dcs() {
        let sms = ValidatedSms::parse(
            &request("M360", &["09171234567"], "Hello"),
            RequestId::new("req-1").unwrap(),
        )
        .unwrap();
        assert_eq!(sms.sender().as_str(), "M360");
        assert_eq!(sms.recipients()[0].raw(), "09171234567");
        assert_eq!(sms.text().as_str(), "Hello");
        assert_eq!(sms.dcs(), DataCodingScheme::new(0));
        assert_eq!(sms.request_id().as_str(), "req-1");
    }
}
