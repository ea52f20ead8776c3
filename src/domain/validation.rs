use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty {
        field: &'static str,
    },
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },
    InvalidPhoneNumber {
        input: String,
    },
    InvalidRecipient {
        index: usize,
        input: String,
    },
    DuplicateRecipients {
        unique: usize,
        total: usize,
    },
    SpamContent {
        keywords: Vec<&'static str>,
    },
    ExcessiveSpecialCharacters {
        count: usize,
        length: usize,
        max_percent: usize,
    },
    Malformed {
        reason: String,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::TooLong { field, max, actual } => {
                write!(f, "{field} is too long: {actual} characters (max {max})")
            }
            Self::InvalidPhoneNumber { input } => {
                write!(f, "invalid phone number: {input} (expected 09XXXXXXXXX)")
            }
            Self::InvalidRecipient { index, input } => {
                write!(
                    f,
                    "invalid recipient at index {index}: {input} (expected 09XXXXXXXXX)"
                )
            }
            Self::DuplicateRecipients { unique, total } => {
                write!(f, "duplicate recipients: {unique} unique out of {total}")
            }
            Self::SpamContent { keywords } => {
                write!(
                    f,
                    "message looks like spam: contains {}",
                    keywords.join(", ")
                )
            }
            Self::ExcessiveSpecialCharacters {
                count,
                length,
                max_percent,
            } => write!(
                f,
                "too many special characters: {count} of {length} (max {max_percent}%)"
            ),
            Self::Malformed { reason } => write!(f, "malformed request: {reason}"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Outcome of one validation stage.
///
/// Errors keep the order in which the checks ran; an empty list means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self::default()
    }

    pub fn from_errors(errors: Vec<ValidationError>) -> Self {
        Self { errors }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Human-readable messages, one per error.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

impl From<ValidationError> for ValidationResult {
    fn from(value: ValidationError) -> Self {
        Self {
            errors: vec![value],
        }
    }
}
