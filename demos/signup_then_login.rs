//! Walks a new member through signup and login against a mock backend, then logs out.
//!
//! 1. Fill the signup form through name-keyed change events and submit it.
//! 2. Follow the scheduled navigation to the login screen.
//! 3. Log in; the session is stored and the landing screen offers a logout action.
//! 4. Call an authenticated endpoint, then log out.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
// self
use team_portal::{
	config::ClientConfig,
	http::ApiClient,
	screen::{ScreenController, SubmitOutcome},
	screens::{LoginScreen, SignupScreen},
	session::{MemorySessionStorage, SessionStorage},
	shell::{Affordance, Shell},
	url::Url,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let signup_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/users/signup");
			then.status(201).json_body(json!({ "id": 1 }));
		})
		.await;
	let login_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/users/login");
			then.status(200).json_body(json!({
				"token": "demo-token",
				"user": { "id": 1, "name": "Kim", "email": "kim@test.com" }
			}));
		})
		.await;
	let me_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/users/me").header("authorization", "Bearer demo-token");
			then.status(200).json_body(json!({ "name": "Kim" }));
		})
		.await;
	let storage: Arc<dyn SessionStorage> = Arc::new(MemorySessionStorage::default());
	let config = ClientConfig::builder(Url::parse(&server.base_url())?).build()?;
	let client = ApiClient::new(config, storage.clone())?;
	let shell = Shell::new(storage);

	println!("Landing affordance before login: {:?}.", shell.landing().await);

	shell.open("/signup");

	let signup = ScreenController::new(SignupScreen, client.clone());

	for (name, value) in [
		("username", "Kim"),
		("email", "kim@test.com"),
		("password", "secret1"),
		("passwordcheck", "secret1"),
		("birthday", "2000-01-01"),
	] {
		signup.handle_change(name, value)?;
	}

	match signup.submit().await {
		SubmitOutcome::Succeeded { message, navigation } => {
			println!("{message}");

			shell.follow(navigation).await;
		},
		other => println!("Signup did not complete: {other:?}."),
	}

	println!("Now on {}.", shell.current());

	let login = ScreenController::new(LoginScreen, client.clone());

	login.handle_change("email", "kim@test.com")?;
	login.handle_change("password", "secret1")?;

	if let SubmitOutcome::Succeeded { message, navigation } = login.submit().await {
		println!("{message}");

		shell.follow(navigation).await;
	}

	assert_eq!(shell.landing().await, Affordance::LogOut);

	let me = client.get_json("users/me").await?;

	println!("Authenticated profile: {}.", me.body);

	shell.logout().await?;

	println!("Landing affordance after logout: {:?}.", shell.landing().await);

	signup_mock.assert_async().await;
	login_mock.assert_async().await;
	me_mock.assert_async().await;

	Ok(())
}
