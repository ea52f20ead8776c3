//! Content policy applied after format validation.

use std::collections::HashSet;

use crate::domain::request::ValidatedSms;
use crate::domain::validation::{ValidationError, ValidationResult};
use crate::domain::value::PhMobileNumber;

/// Keywords that mark a message as likely spam, matched case-insensitively as substrings.
pub const SPAM_KEYWORDS: [&str; 6] = ["FREE", "WIN", "PRIZE", "URGENT", "CLICK", "CONGRATULATIONS"];

/// Number of distinct keywords at which a message is rejected.
pub const SPAM_KEYWORD_THRESHOLD: usize = 3;

/// Share of special characters (percent of text length) a message may contain.
pub const MAX_SPECIAL_CHAR_PERCENT: usize = 30;

/// Check duplicate recipients, spam keywords, and the special-character ratio.
///
/// All three rules run; every violation is reported.
pub fn check_business_rules(sms: &ValidatedSms) -> ValidationResult {
    let mut errors = Vec::new();

    if let Some(err) = duplicate_recipients(sms.recipients()) {
        errors.push(err);
    }

    let keywords = spam_keywords(sms.text().as_str());
    if keywords.len() >= SPAM_KEYWORD_THRESHOLD {
        errors.push(ValidationError::SpamContent { keywords });
    }

    let length = sms.text().len();
    let count = special_character_count(sms.text().as_str());
    // Exactly at the limit passes.
    if count * 100 > length * MAX_SPECIAL_CHAR_PERCENT {
        errors.push(ValidationError::ExcessiveSpecialCharacters {
            count,
            length,
            max_percent: MAX_SPECIAL_CHAR_PERCENT,
        });
    }

    ValidationResult::from_errors(errors)
}

fn duplicate_recipients(recipients: &[PhMobileNumber]) -> Option<ValidationError> {
    let unique = recipients
        .iter()
        .map(|recipient| recipient.raw().trim())
        .collect::<HashSet<_>>()
        .len();
    (unique < recipients.len()).then(|| ValidationError::DuplicateRecipients {
        unique,
        total: recipients.len(),
    })
}

/// Distinct spam keywords present in `text`, in [`SPAM_KEYWORDS`] order.
pub fn spam_keywords(text: &str) -> Vec<&'static str> {
    let upper = text.to_uppercase();
    SPAM_KEYWORDS
        .iter()
        .copied()
        .filter(|keyword| upper.contains(keyword))
        .collect()
}

/// Characters that are not an ASCII letter, ASCII digit, or space.
pub fn special_character_count(text: &str) -> usize {
    text.chars()
        .filter(|c| !(c.is_ascii_alphanumeric() || *c == ' '))
        .count()
}
