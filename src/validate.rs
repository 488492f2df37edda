//! Client-side validation rules.
//!
//! Each rule returns `Result<(), ValidationError>`; screens chain them with `?` in priority order
//! so the first failing rule is the one reported.

// std
use std::sync::LazyLock;
// crates.io
use regex::Regex;
use time::{Date, macros::format_description};
// self
use crate::_prelude::*;

/// Minimum password length in characters.
pub const MIN_PASSWORD_LEN: usize = 6;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
		.unwrap_or_else(|e| unreachable!("email pattern is a valid literal: {e}"))
});

/// Rule that rejected a submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
	/// Field was empty or whitespace-only.
	Required,
	/// Field was shorter than the minimum length.
	MinLength,
	/// Field did not equal its confirmation.
	Mismatch,
	/// Field was not a well-formed email address.
	EmailFormat,
	/// No option was picked from a fixed choice set.
	Selection,
	/// Field was not a `YYYY-MM-DD` calendar date.
	DateFormat,
}

/// First failing validation rule, with the message shown to the user.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("{message}")]
pub struct ValidationError {
	/// Field that failed.
	pub field: &'static str,
	/// Rule that failed.
	pub rule: Rule,
	/// User-facing message.
	pub message: String,
}
impl ValidationError {
	/// Creates a new validation error.
	pub fn new(field: &'static str, rule: Rule, message: impl Into<String>) -> Self {
		Self { field, rule, message: message.into() }
	}
}

/// Fails when `value` is empty after trimming.
pub fn required(field: &'static str, value: &str, message: &str) -> Result<(), ValidationError> {
	if value.trim().is_empty() {
		Err(ValidationError::new(field, Rule::Required, message))
	} else {
		Ok(())
	}
}

/// Fails when `value` has fewer than `min` characters.
pub fn min_length(
	field: &'static str,
	value: &str,
	min: usize,
	message: &str,
) -> Result<(), ValidationError> {
	if value.chars().count() < min {
		Err(ValidationError::new(field, Rule::MinLength, message))
	} else {
		Ok(())
	}
}

/// Fails when `value` and `confirmation` differ.
pub fn equals(
	field: &'static str,
	value: &str,
	confirmation: &str,
	message: &str,
) -> Result<(), ValidationError> {
	if value == confirmation {
		Ok(())
	} else {
		Err(ValidationError::new(field, Rule::Mismatch, message))
	}
}

/// Returns `true` when `value` matches the accepted email pattern.
pub fn is_email(value: &str) -> bool {
	EMAIL_PATTERN.is_match(value)
}

/// Fails when `value` is blank or not a well-formed email address.
pub fn email(field: &'static str, value: &str, message: &str) -> Result<(), ValidationError> {
	if value.trim().is_empty() || !is_email(value) {
		Err(ValidationError::new(field, Rule::EmailFormat, message))
	} else {
		Ok(())
	}
}

/// Parses a `YYYY-MM-DD` calendar date as produced by date inputs.
pub fn parse_date(value: &str) -> Option<Date> {
	Date::parse(value.trim(), format_description!("[year]-[month]-[day]")).ok()
}

/// Fails when `value` is not a valid `YYYY-MM-DD` calendar date.
pub fn date(field: &'static str, value: &str, message: &str) -> Result<(), ValidationError> {
	match parse_date(value) {
		Some(_) => Ok(()),
		None => Err(ValidationError::new(field, Rule::DateFormat, message)),
	}
}

/// Fails when no option was picked.
pub fn selected<T>(
	field: &'static str,
	choice: Option<&T>,
	message: &str,
) -> Result<(), ValidationError> {
	match choice {
		Some(_) => Ok(()),
		None => Err(ValidationError::new(field, Rule::Selection, message)),
	}
}
