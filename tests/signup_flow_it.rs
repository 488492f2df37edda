// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use team_portal::{
	_preludet::*,
	form::FormError,
	screen::{ScreenController, SubmissionState, SubmitOutcome},
	screens::{SignupField, SignupForm, SignupScreen},
	shell::{Route, Shell},
	validate::Rule,
};

fn fill(controller: &ScreenController<SignupScreen>, fields: &[(&str, &str)]) {
	for (name, value) in fields {
		controller.handle_change(name, value).expect("Signup field should exist.");
	}
}

const VALID: &[(&str, &str)] = &[
	("username", "Kim"),
	("email", "kim@test.com"),
	("password", "secret1"),
	("passwordcheck", "secret1"),
	("birthday", "2000-01-01"),
];

#[tokio::test]
async fn accepted_signup_sends_mapped_body_and_redirects_to_login() {
	let server = MockServer::start_async().await;
	let (client, storage) = build_test_client(&server.base_url());
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/users/signup").json_body(json!({
				"name": "Kim",
				"email": "kim@test.com",
				"password": "secret1",
				"birth_date": "2000-01-01"
			}));
			then.status(201).json_body(json!({ "id": 42 }));
		})
		.await;
	let shell = Shell::new(client.storage().clone());
	let controller = ScreenController::new(SignupScreen, client);

	shell.navigate(Route::Signup);
	fill(&controller, VALID);

	let outcome = controller.submit().await;

	mock.assert_async().await;

	let SubmitOutcome::Succeeded { message, navigation } = outcome else {
		panic!("Signup should succeed, got {outcome:?}.");
	};

	assert_eq!(message, SignupScreen::SUCCESS);
	assert_eq!(navigation.route, Route::Login);
	assert_eq!(navigation.delay, Duration::milliseconds(1_500));
	// Successful submit resets the form; signup never touches the session.
	assert_eq!(controller.values(), SignupForm::default());
	assert!(storage.snapshot().is_empty());

	tokio::time::pause();

	let start = tokio::time::Instant::now();

	assert!(shell.follow(navigation).await);
	assert!(start.elapsed() >= std::time::Duration::from_millis(1_500));
	assert_eq!(shell.current(), Route::Login);
}

#[tokio::test]
async fn leaving_before_the_redirect_cancels_it() {
	let server = MockServer::start_async().await;
	let (client, _storage) = build_test_client(&server.base_url());
	let _mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/users/signup");
			then.status(201);
		})
		.await;
	let shell = Shell::new(client.storage().clone());
	let controller = ScreenController::new(SignupScreen, client);

	fill(&controller, VALID);
	controller.submit().await;

	let navigation = controller.take_navigation().expect("Navigation should be scheduled.");

	tokio::time::pause();

	let (applied, ()) = tokio::join!(shell.follow(navigation), async {
		shell.navigate(Route::Register);
	});

	assert!(!applied);
	assert_eq!(shell.current(), Route::Register);
}

#[tokio::test]
async fn invalid_signup_never_sends_a_request() {
	let server = MockServer::start_async().await;
	let (client, _storage) = build_test_client(&server.base_url());
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/users/signup");
			then.status(201);
		})
		.await;
	let controller = ScreenController::new(SignupScreen, client);

	fill(&controller, VALID);
	controller.change(SignupField::PasswordCheck, "secret2");

	let SubmitOutcome::Invalid(err) = controller.submit().await else {
		panic!("Mismatched passwords must be refused.");
	};

	assert_eq!((err.field, err.rule), ("passwordcheck", Rule::Mismatch));
	assert_eq!(controller.submission(), SubmissionState::Invalid(err));
	assert!(controller.can_submit());

	controller.change(SignupField::PasswordCheck, "secret1");
	controller.change(SignupField::Birthday, "01/01/2000");

	let SubmitOutcome::Invalid(err) = controller.submit().await else {
		panic!("Malformed birthday must be refused.");
	};

	assert_eq!((err.field, err.rule), ("birthday", Rule::DateFormat));

	mock.assert_calls_async(0).await;
}

#[tokio::test]
async fn duplicate_email_reports_error_field_first() {
	let server = MockServer::start_async().await;
	let (client, _storage) = build_test_client(&server.base_url());
	let _mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/users/signup");
			then.status(409)
				.json_body(json!({ "error": "email already registered", "message": "Conflict" }));
		})
		.await;
	let controller = ScreenController::new(SignupScreen, client);

	fill(&controller, VALID);

	assert_eq!(
		controller.submit().await,
		SubmitOutcome::Failed { message: "email already registered".into() },
	);
	// Values are kept on failure.
	assert_eq!(controller.values().username, "Kim");
	assert!(controller.take_navigation().is_none());

	// Editing after a failure clears the message.
	controller.change(SignupField::Email, "kim2@test.com");

	assert_eq!(controller.submission(), SubmissionState::Idle);
}

#[tokio::test]
async fn unknown_field_names_are_rejected() {
	let (client, _storage) = build_test_client("http://127.0.0.1:9");
	let controller = ScreenController::new(SignupScreen, client);
	let err = controller
		.handle_change("nickname", "kimmy")
		.expect_err("Unknown field must be refused.");

	assert!(matches!(err, FormError::UnknownField { ref name } if name == "nickname"));
	assert_eq!(controller.values(), SignupForm::default());
}
