//! Registration form rules.
//!
//! Pure functions over [`RegistrationInput`]; presentation (the alert) lives
//! in the form behavior. A field that is absent from the form is `None` and
//! its rules are skipped.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// `local@domain.tld`: one `@`, no whitespace, a dot after the `@`.
/// U+FEFF counts as whitespace here, as it does for browser form input.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@\x{FEFF}]+@[^\s@\x{FEFF}]+\.[^\s@\x{FEFF}]+$").expect("email pattern is valid")
});

pub const USERNAME_MIN: usize = 3;
pub const USERNAME_MAX: usize = 100;
pub const FULL_NAME_MIN: usize = 2;
pub const FULL_NAME_MAX: usize = 200;
pub const PHONE_MAX: usize = 20;

/// Raw values read from the registration form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationInput {
    pub username: Option<String>,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub phone: Option<String>,
}

impl RegistrationInput {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        full_name: impl Into<String>,
    ) -> Self {
        Self {
            username: Some(username.into()),
            email: Some(email.into()),
            full_name: Some(full_name.into()),
            phone: None,
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Username,
    Email,
    FullName,
    Phone,
}

impl Field {
    /// The form input `name` attribute.
    pub fn input_name(&self) -> &'static str {
        match self {
            Field::Username => "username",
            Field::Email => "email",
            Field::FullName => "full_name",
            Field::Phone => "phone",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.input_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    UsernameTooShort,
    UsernameTooLong,
    EmailShape,
    FullNameTooShort,
    FullNameTooLong,
    PhoneTooLong,
}

impl Rule {
    pub fn field(&self) -> Field {
        match self {
            Rule::UsernameTooShort | Rule::UsernameTooLong => Field::Username,
            Rule::EmailShape => Field::Email,
            Rule::FullNameTooShort | Rule::FullNameTooLong => Field::FullName,
            Rule::PhoneTooLong => Field::Phone,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Rule::UsernameTooShort => "Username must be at least 3 characters long.",
            Rule::UsernameTooLong => "Username must be at most 100 characters long.",
            Rule::EmailShape => "Please enter a valid email address.",
            Rule::FullNameTooShort => "Full name must be at least 2 characters long.",
            Rule::FullNameTooLong => "Full name must be at most 200 characters long.",
            Rule::PhoneTooLong => "Phone number must be at most 20 characters long.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub field: Field,
    pub rule: Rule,
    pub message: String,
}

impl From<Rule> for Violation {
    fn from(rule: Rule) -> Self {
        Self {
            field: rule.field(),
            rule,
            message: rule.message().to_string(),
        }
    }
}

/// Outcome of validating a registration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn has(&self, rule: Rule) -> bool {
        self.violations.iter().any(|v| v.rule == rule)
    }

    pub fn fields(&self) -> Vec<Field> {
        self.violations.iter().map(|v| v.field).collect()
    }

    /// All messages, each followed by a newline, in rule order.
    pub fn message(&self) -> String {
        self.violations
            .iter()
            .map(|v| format!("{}\n", v.message))
            .collect()
    }
}

/// Whether `email` has the `local@domain.tld` shape.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

fn trimmed_len(value: &str) -> usize {
    value
        .trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}')
        .chars()
        .count()
}

/// Run every rule whose field is present.
pub fn validate(input: &RegistrationInput) -> ValidationReport {
    let mut violations = Vec::new();

    if let Some(username) = &input.username {
        let len = trimmed_len(username);
        if len < USERNAME_MIN {
            violations.push(Rule::UsernameTooShort.into());
        } else if len > USERNAME_MAX {
            violations.push(Rule::UsernameTooLong.into());
        }
    }

    if let Some(email) = &input.email {
        if !is_valid_email(email) {
            violations.push(Rule::EmailShape.into());
        }
    }

    if let Some(full_name) = &input.full_name {
        let len = trimmed_len(full_name);
        if len < FULL_NAME_MIN {
            violations.push(Rule::FullNameTooShort.into());
        } else if len > FULL_NAME_MAX {
            violations.push(Rule::FullNameTooLong.into());
        }
    }

    if let Some(phone) = &input.phone {
        if trimmed_len(phone) > PHONE_MAX {
            violations.push(Rule::PhoneTooLong.into());
        }
    }

    ValidationReport { violations }
}
