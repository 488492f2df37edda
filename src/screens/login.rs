//! Login screen: exchanges credentials for a bearer token and stores the session.

// self
use crate::{
	_prelude::*,
	form::{FieldValue, FormField, FormModel},
	http::ApiClient,
	obs::ScreenKind,
	screen::{FormScreen, ScreenFuture},
	session::{Session, UserProfile},
	shell::{Navigation, Route},
	validate::{self, ValidationError},
};

/// Login form values.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoginForm {
	/// Login email.
	pub email: String,
	/// Password.
	pub password: String,
}
impl FormModel for LoginForm {
	type Field = LoginField;

	fn apply(&mut self, field: Self::Field, value: FieldValue) {
		match field {
			LoginField::Email => self.email = value.into_text(),
			LoginField::Password => self.password = value.into_text(),
		}
	}
}

/// Login form fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoginField {
	/// `email`
	Email,
	/// `password`
	Password,
}
impl FormField for LoginField {
	const ALL: &'static [Self] = &[Self::Email, Self::Password];

	fn name(self) -> &'static str {
		match self {
			Self::Email => "email",
			Self::Password => "password",
		}
	}
}

/// Body sent to the login endpoint.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
	/// Login email.
	pub email: &'a str,
	/// Password.
	pub password: &'a str,
}

/// Successful login payload.
#[derive(Clone, Debug, Deserialize)]
pub struct LoginResponse {
	/// Opaque bearer token.
	pub token: String,
	/// Profile of the logged-in user.
	#[serde(default)]
	pub user: UserProfile,
}

/// Login screen definition.
#[derive(Clone, Copy, Debug, Default)]
pub struct LoginScreen;
impl LoginScreen {
	/// Success message.
	pub const SUCCESS: &'static str = "Login succeeded. Redirecting to the main page.";
	/// Fallback when the backend gives no usable reason.
	pub const FALLBACK: &'static str = "Please check your email or password again.";
}
impl FormScreen for LoginScreen {
	type Accepted = LoginResponse;
	type Model = LoginForm;

	const KIND: ScreenKind = ScreenKind::Login;

	fn initial(&self) -> Self::Model {
		LoginForm::default()
	}

	fn validate(&self, values: &Self::Model) -> Result<(), ValidationError> {
		validate::required("email", &values.email, "Email is required.")?;
		validate::required("password", &values.password, "Password is required.")?;

		Ok(())
	}

	fn send<'a>(
		&'a self,
		client: &'a ApiClient,
		values: Self::Model,
	) -> ScreenFuture<'a, Self::Accepted> {
		Box::pin(async move {
			let body = LoginRequest { email: &values.email, password: &values.password };

			client.post_json(&client.config().endpoints.login, &body).await?.decode()
		})
	}

	fn on_accepted<'a>(
		&'a self,
		client: &'a ApiClient,
		accepted: Self::Accepted,
	) -> ScreenFuture<'a, ()> {
		Box::pin(async move {
			Session::new(accepted.token, accepted.user).persist(client.storage().as_ref()).await?;

			Ok(())
		})
	}

	fn success_message(&self) -> &str {
		Self::SUCCESS
	}

	fn navigation(&self) -> Navigation {
		Navigation::after(Route::Landing, Duration::milliseconds(1_000))
	}

	fn message_keys(&self) -> &'static [&'static str] {
		&["message", "error"]
	}

	fn fallback_message(&self, _status: Option<u16>) -> String {
		Self::FALLBACK.to_owned()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{error::TransportError, screen::NETWORK_FAILURE_MESSAGE, validate::Rule};

	#[test]
	fn blank_fields_are_refused_in_order() {
		let screen = LoginScreen;
		let err = screen
			.validate(&LoginForm { email: "  ".into(), password: String::new() })
			.expect_err("Blank email must be refused.");

		assert_eq!((err.field, err.rule), ("email", Rule::Required));

		let err = screen
			.validate(&LoginForm { email: "kim@test.com".into(), password: " ".into() })
			.expect_err("Blank password must be refused.");

		assert_eq!((err.field, err.rule), ("password", Rule::Required));
	}

	#[test]
	fn failure_messages_fix_the_malformed_lookup() {
		let screen = LoginScreen;
		let with_message = Error::Rejected {
			status: 401,
			body: Some(serde_json::json!({ "message": "invalid credentials" })),
		};
		let nested_only = Error::Rejected {
			status: 401,
			body: Some(serde_json::json!({ "console": { "error": "ignored" } })),
		};

		assert_eq!(screen.failure_message(&with_message), "invalid credentials");
		assert_eq!(screen.failure_message(&nested_only), LoginScreen::FALLBACK);
		assert_eq!(
			screen.failure_message(&TransportError::Io(std::io::ErrorKind::ConnectionRefused.into()).into()),
			NETWORK_FAILURE_MESSAGE,
		);
	}

	#[test]
	fn login_request_serializes_both_fields() {
		let body = serde_json::to_value(LoginRequest { email: "kim@test.com", password: "secret1" })
			.expect("Login request should serialize.");

		assert_eq!(body, serde_json::json!({ "email": "kim@test.com", "password": "secret1" }));
	}
}
