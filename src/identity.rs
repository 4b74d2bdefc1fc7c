//! Player identity and the rules for accepting it

use std::fmt;

use serde::{Deserialize, Serialize};

pub const NAME_MIN_LEN: usize = 4;
pub const NAME_MAX_LEN: usize = 30;
pub const EMAIL_MIN_LEN: usize = 6;
pub const EMAIL_MAX_LEN: usize = 50;

/// Who is playing this session
///
/// Empty in identity-less (promotional) mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

impl Identity {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    /// Identity-less mode
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn is_anonymous(&self) -> bool {
        self.email.is_empty()
    }
}

/// Why captured text was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    NameTooShort,
    NameTooLong,
    InvalidEmail,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NameTooShort => write!(f, "Name must be at least {} characters.", NAME_MIN_LEN),
            Self::NameTooLong => write!(f, "Name must be at most {} characters.", NAME_MAX_LEN),
            Self::InvalidEmail => write!(f, "Please enter a valid email address."),
        }
    }
}

impl std::error::Error for ValidationError {}

pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let len = name.chars().count();
    if len < NAME_MIN_LEN {
        Err(ValidationError::NameTooShort)
    } else if len > NAME_MAX_LEN {
        Err(ValidationError::NameTooLong)
    } else {
        Ok(())
    }
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let len = email.chars().count();
    if (EMAIL_MIN_LEN..=EMAIL_MAX_LEN).contains(&len) && is_email_shaped(email) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail)
    }
}

/// `local@label.rest` with the usual address character classes
///
/// local: `[A-Za-z0-9_.+-]+`, label: `[A-Za-z0-9-]+`, rest: `[A-Za-z0-9-.]+`
fn is_email_shaped(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    let Some((label, rest)) = domain.split_once('.') else {
        return false;
    };

    let local_ok = !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '+' | '-'));
    let label_ok = !label.is_empty()
        && label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-');
    let rest_ok = !rest.is_empty()
        && rest
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.'));

    local_ok && label_ok && rest_ok
}
