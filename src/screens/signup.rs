//! Member signup screen.

// self
use crate::{
	_prelude::*,
	form::{FieldValue, FormField, FormModel},
	http::ApiClient,
	obs::ScreenKind,
	screen::{FormScreen, ScreenFuture},
	shell::{Navigation, Route},
	validate::{self, MIN_PASSWORD_LEN, ValidationError},
};

/// Signup form values.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SignupForm {
	/// Display name.
	pub username: String,
	/// Login email.
	pub email: String,
	/// Password.
	pub password: String,
	/// Password confirmation.
	pub passwordcheck: String,
	/// Birthday as `YYYY-MM-DD`.
	pub birthday: String,
}
impl FormModel for SignupForm {
	type Field = SignupField;

	fn apply(&mut self, field: Self::Field, value: FieldValue) {
		let slot = match field {
			SignupField::Username => &mut self.username,
			SignupField::Email => &mut self.email,
			SignupField::Password => &mut self.password,
			SignupField::PasswordCheck => &mut self.passwordcheck,
			SignupField::Birthday => &mut self.birthday,
		};

		*slot = value.into_text();
	}
}

/// Signup form fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignupField {
	/// `username`
	Username,
	/// `email`
	Email,
	/// `password`
	Password,
	/// `passwordcheck`
	PasswordCheck,
	/// `birthday`
	Birthday,
}
impl FormField for SignupField {
	const ALL: &'static [Self] =
		&[Self::Username, Self::Birthday, Self::Email, Self::Password, Self::PasswordCheck];

	fn name(self) -> &'static str {
		match self {
			Self::Username => "username",
			Self::Email => "email",
			Self::Password => "password",
			Self::PasswordCheck => "passwordcheck",
			Self::Birthday => "birthday",
		}
	}
}

/// Body sent to the signup endpoint.
#[derive(Debug, Serialize)]
pub struct SignupRequest<'a> {
	/// Display name.
	pub name: &'a str,
	/// Login email.
	pub email: &'a str,
	/// Password.
	pub password: &'a str,
	/// Birthday as `YYYY-MM-DD`.
	pub birth_date: &'a str,
}
impl<'a> From<&'a SignupForm> for SignupRequest<'a> {
	fn from(form: &'a SignupForm) -> Self {
		Self {
			name: &form.username,
			email: &form.email,
			password: &form.password,
			birth_date: &form.birthday,
		}
	}
}

/// Signup screen definition.
#[derive(Clone, Copy, Debug, Default)]
pub struct SignupScreen;
impl SignupScreen {
	/// Success message.
	pub const SUCCESS: &'static str =
		"Signup completed successfully. Redirecting to the login page.";
	/// Fallback when the backend gives no usable reason.
	pub const FALLBACK: &'static str = "An unknown error occurred during signup.";
}
impl FormScreen for SignupScreen {
	type Accepted = ();
	type Model = SignupForm;

	const KIND: ScreenKind = ScreenKind::Signup;

	fn initial(&self) -> Self::Model {
		SignupForm::default()
	}

	fn validate(&self, values: &Self::Model) -> Result<(), ValidationError> {
		validate::required("username", &values.username, "User name is required.")?;
		validate::email("email", &values.email, "Enter a valid email address.")?;
		validate::min_length(
			"password",
			&values.password,
			MIN_PASSWORD_LEN,
			"Password must be at least 6 characters.",
		)?;
		validate::equals(
			"passwordcheck",
			&values.password,
			&values.passwordcheck,
			"Passwords do not match.",
		)?;
		validate::required("birthday", &values.birthday, "Birthday is required.")?;
		validate::date("birthday", &values.birthday, "Enter your birthday as YYYY-MM-DD.")?;

		Ok(())
	}

	fn send<'a>(
		&'a self,
		client: &'a ApiClient,
		values: Self::Model,
	) -> ScreenFuture<'a, Self::Accepted> {
		Box::pin(async move {
			client
				.post_json(&client.config().endpoints.signup, &SignupRequest::from(&values))
				.await?;

			Ok(())
		})
	}

	fn success_message(&self) -> &str {
		Self::SUCCESS
	}

	fn navigation(&self) -> Navigation {
		Navigation::after(Route::Login, Duration::milliseconds(1_500))
	}

	fn message_keys(&self) -> &'static [&'static str] {
		&["error", "message"]
	}

	fn fallback_message(&self, _status: Option<u16>) -> String {
		Self::FALLBACK.to_owned()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::validate::Rule;

	fn valid() -> SignupForm {
		SignupForm {
			username: "Kim".into(),
			email: "kim@test.com".into(),
			password: "secret1".into(),
			passwordcheck: "secret1".into(),
			birthday: "2000-01-01".into(),
		}
	}

	fn failing_rule(form: SignupForm) -> (&'static str, Rule) {
		let err = SignupScreen.validate(&form).expect_err("Form fixture should be refused.");

		(err.field, err.rule)
	}

	#[test]
	fn valid_form_passes() {
		SignupScreen.validate(&valid()).expect("Valid signup form should pass.");
	}

	#[test]
	fn rules_run_in_priority_order() {
		let everything_wrong = SignupForm {
			username: " ".into(),
			email: "kim".into(),
			password: "abc".into(),
			passwordcheck: "abd".into(),
			birthday: String::new(),
		};

		assert_eq!(failing_rule(everything_wrong.clone()), ("username", Rule::Required));

		let form = SignupForm { username: "Kim".into(), ..everything_wrong };

		assert_eq!(failing_rule(form.clone()), ("email", Rule::EmailFormat));

		let form = SignupForm { email: "kim@test.com".into(), ..form };

		assert_eq!(failing_rule(form.clone()), ("password", Rule::MinLength));

		let form = SignupForm { password: "secret1".into(), ..form };

		// Mismatch is reported before the missing birthday.
		assert_eq!(failing_rule(form.clone()), ("passwordcheck", Rule::Mismatch));

		let form = SignupForm { passwordcheck: "secret1".into(), ..form };

		assert_eq!(failing_rule(form.clone()), ("birthday", Rule::Required));

		let form = SignupForm { birthday: "2000-13-01".into(), ..form };

		assert_eq!(failing_rule(form), ("birthday", Rule::DateFormat));
	}

	#[test]
	fn short_password_message_is_length_specific() {
		let err = SignupScreen
			.validate(&SignupForm { password: "12345".into(), passwordcheck: "12345".into(), ..valid() })
			.expect_err("Five characters must be refused.");

		assert_eq!(err.message, "Password must be at least 6 characters.");
	}

	#[test]
	fn request_maps_field_names() {
		let form = valid();
		let body = serde_json::to_value(SignupRequest::from(&form))
			.expect("Signup request should serialize.");

		assert_eq!(
			body,
			serde_json::json!({
				"name": "Kim",
				"email": "kim@test.com",
				"password": "secret1",
				"birth_date": "2000-01-01"
			}),
		);
	}

	#[test]
	fn failure_prefers_error_field() {
		let err = Error::Rejected {
			status: 409,
			body: Some(serde_json::json!({ "error": "email already registered", "message": "x" })),
		};

		assert_eq!(SignupScreen.failure_message(&err), "email already registered");
		assert_eq!(
			SignupScreen.failure_message(&Error::Rejected { status: 500, body: None }),
			SignupScreen::FALLBACK,
		);
	}
}
