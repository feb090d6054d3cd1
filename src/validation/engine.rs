//! Rule-driven form validation
//!
//! Each action names its fields and, per field, whether it is required and
//! which checks its value must pass. Validation reports every failing
//! field at once rather than stopping at the first.

use crate::core::Drops;
use crate::crypto::is_valid_address;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Built-in rule set, keyed by action name
const BUILTIN_RULES: &str = include_str!("rules.json");

/// Largest NFT transfer fee, in 1/100_000 units (50%)
pub const MAX_TRANSFER_FEE: u64 = 50_000;

/// Raw form input: field name to text as entered
pub type Form = BTreeMap<String, String>;

/// One field that failed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validation errors
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Unknown action: {0}")]
    UnknownAction(String),
    #[error("Invalid input: {}", join_errors(.0))]
    Invalid(Vec<FieldError>),
    #[error("Invalid rule set: {0}")]
    RuleSet(#[from] serde_json::Error),
}

impl ValidationError {
    /// Failing fields, empty for non-field errors
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            ValidationError::Invalid(errors) => errors,
            _ => &[],
        }
    }
}

fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

// =============================================================================
// Rules
// =============================================================================

/// A single check a field value must pass
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Check {
    /// Classic `r…` address with a valid checksum
    Address,
    /// Native amount in display units
    XrpAmount,
    Uint32,
    PositiveInteger {
        #[serde(default)]
        max: Option<u64>,
    },
    /// Decimal number, non-negative unless `signed`
    Decimal {
        #[serde(default)]
        signed: bool,
    },
    /// Hex string of at most `max_len` characters
    Hex { max_len: usize },
    /// Hex string of exactly `len` characters
    ExactHex { len: usize },
    MaxLength { max: usize },
    /// NFT transfer fee, 0 to 50_000
    TransferFee,
    /// Three-letter code (not XRP) or 40 hex characters
    Currency,
    OneOf { values: Vec<String> },
    /// Comma-separated list of allowed values
    ListOf { values: Vec<String>, max: usize },
}

impl Check {
    /// Why `value` fails this check, or `None` if it passes
    fn failure(&self, value: &str) -> Option<String> {
        match self {
            Check::Address => {
                (!is_valid_address(value)).then(|| "is not a valid address".to_string())
            }
            Check::XrpAmount => Drops::from_xrp(value).err().map(|e| e.to_string()),
            Check::Uint32 => value
                .parse::<u32>()
                .err()
                .map(|_| "must be a whole number between 0 and 4294967295".to_string()),
            Check::PositiveInteger { max } => match value.parse::<u64>() {
                Ok(0) | Err(_) => Some("must be a positive whole number".to_string()),
                Ok(n) => match max {
                    Some(max) if n > *max => Some(format!("must be at most {}", max)),
                    _ => None,
                },
            },
            Check::Decimal { signed } => match value.parse::<f64>() {
                Ok(n) if !n.is_finite() => Some("must be a number".to_string()),
                Ok(n) if !signed && n.is_sign_negative() => {
                    Some("must not be negative".to_string())
                }
                Ok(_) => None,
                Err(_) => Some("must be a number".to_string()),
            },
            Check::Hex { max_len } => {
                if !is_hex(value) {
                    Some("must be hexadecimal".to_string())
                } else if value.len() > *max_len {
                    Some(format!("must be at most {} hex characters", max_len))
                } else {
                    None
                }
            }
            Check::ExactHex { len } => (!is_hex(value) || value.len() != *len)
                .then(|| format!("must be exactly {} hex characters", len)),
            Check::MaxLength { max } => (value.len() > *max)
                .then(|| format!("must be at most {} characters", max)),
            Check::TransferFee => match value.parse::<u64>() {
                Ok(n) if n <= MAX_TRANSFER_FEE => None,
                _ => Some(format!("must be between 0 and {}", MAX_TRANSFER_FEE)),
            },
            Check::Currency => (!is_currency(value))
                .then(|| "must be a 3-letter code other than XRP or 40 hex characters".to_string()),
            Check::OneOf { values } => (!values.iter().any(|v| v == value))
                .then(|| format!("must be one of: {}", values.join(", "))),
            Check::ListOf { values, max } => {
                let items = split_list(value);
                if items.is_empty() {
                    Some("must list at least one value".to_string())
                } else if items.len() > *max {
                    Some(format!("must list at most {} values", max))
                } else if let Some(bad) = items.iter().find(|i| !values.iter().any(|v| v == *i)) {
                    Some(format!("unknown value {}", bad))
                } else {
                    let mut unique = items.clone();
                    unique.sort_unstable();
                    unique.dedup();
                    (unique.len() != items.len()).then(|| "lists a value twice".to_string())
                }
            }
        }
    }
}

fn is_hex(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_hexdigit())
}

fn is_currency(value: &str) -> bool {
    match value.len() {
        3 => value != "XRP" && value.chars().all(|c| c.is_ascii_alphanumeric()),
        40 => is_hex(value),
        _ => false,
    }
}

/// Split a comma-separated list, dropping blanks
pub fn split_list(value: &str) -> Vec<&str> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Rules for one field
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldRule {
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub checks: Vec<Check>,
}

// =============================================================================
// Validator
// =============================================================================

/// Validates forms against a rule set
#[derive(Debug, Clone)]
pub struct Validator {
    rules: BTreeMap<String, BTreeMap<String, FieldRule>>,
}

impl Validator {
    /// The rule set shipped with the crate
    pub fn builtin() -> Result<Self, ValidationError> {
        Self::from_json(BUILTIN_RULES)
    }

    pub fn from_json(json: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            rules: serde_json::from_str(json)?,
        })
    }

    /// Names of every action with rules
    pub fn actions(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    pub fn fields(&self, action: &str) -> Option<&BTreeMap<String, FieldRule>> {
        self.rules.get(action)
    }

    /// Check every field of `form` the action has rules for.
    ///
    /// Blank values count as absent. Fields without rules are ignored.
    pub fn validate(&self, action: &str, form: &Form) -> Result<(), ValidationError> {
        let rules = self
            .rules
            .get(action)
            .ok_or_else(|| ValidationError::UnknownAction(action.to_string()))?;

        let mut errors = Vec::new();
        for (field, rule) in rules {
            let value = form.get(field).map(|v| v.trim()).filter(|v| !v.is_empty());
            let Some(value) = value else {
                if rule.required {
                    errors.push(FieldError {
                        field: field.clone(),
                        message: "is required".to_string(),
                    });
                }
                continue;
            };

            if let Some(message) = rule.checks.iter().find_map(|c| c.failure(value)) {
                errors.push(FieldError {
                    field: field.clone(),
                    message,
                });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            log::debug!("{} failed validation on {} fields", action, errors.len());
            Err(ValidationError::Invalid(errors))
        }
    }
}
