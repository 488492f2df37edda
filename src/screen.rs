//! Submit-flow state machine shared by every form screen.
//!
//! A [`ScreenController`] owns one screen instance: its [`Form`], its [`SubmissionState`], and the
//! navigation it wants after a successful submit. The flow is
//! `idle -> submitting -> {succeeded, failed}`; validation failures refuse the transition and
//! leave an inline message ([`SubmissionState::Invalid`]). Editing a field after a result moves
//! the state back to idle.
//!
//! At most one submission is in flight per controller: a second [`ScreenController::submit`]
//! while one is pending returns [`SubmitOutcome::Ignored`] without touching the network. After
//! [`ScreenController::unmount`], late responses are dropped without writing anything.

// self
use crate::{
	_prelude::*,
	form::{Form, FormError, FormModel},
	http::ApiClient,
	obs::{self, ScreenKind, SubmitLabel, SubmitSpan},
	shell::Navigation,
	validate::ValidationError,
};

/// Message shown when no response arrived at all.
pub const NETWORK_FAILURE_MESSAGE: &str = "Network error or the server cannot be reached.";

/// Boxed future returned by [`FormScreen`] hooks.
pub type ScreenFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// Screen-specific pieces of the submit flow.
pub trait FormScreen
where
	Self: 'static + Send + Sync,
{
	/// Record backing the form.
	type Model: FormModel;
	/// Decoded success payload.
	type Accepted: Send;

	/// Label used in spans, metrics, and logs.
	const KIND: ScreenKind;

	/// Values the form starts with and resets to.
	fn initial(&self) -> Self::Model;

	/// Runs the screen's rules in priority order, reporting the first failure.
	fn validate(&self, values: &Self::Model) -> Result<(), ValidationError>;

	/// Sends the submission and decodes the success payload.
	fn send<'a>(
		&'a self,
		client: &'a ApiClient,
		values: Self::Model,
	) -> ScreenFuture<'a, Self::Accepted>;

	/// Side effects of an accepted submission (e.g. persisting the session).
	fn on_accepted<'a>(
		&'a self,
		client: &'a ApiClient,
		accepted: Self::Accepted,
	) -> ScreenFuture<'a, ()> {
		let _ = (client, accepted);

		Box::pin(async { Ok(()) })
	}

	/// Message shown after success.
	fn success_message(&self) -> &str;

	/// Where to go after success, and how long to wait first.
	fn navigation(&self) -> Navigation;

	/// Body fields checked, in order, for a server-supplied failure message.
	fn message_keys(&self) -> &'static [&'static str] {
		&["message"]
	}

	/// Message used when the backend rejected the request without a usable message, or when
	/// the client failed in an unexpected way (`status` is `None`).
	fn fallback_message(&self, status: Option<u16>) -> String;

	/// Converts any submit failure into the message shown to the user.
	fn failure_message(&self, error: &Error) -> String {
		match error {
			Error::Rejected { status, body } => server_message(body.as_ref(), self.message_keys())
				.unwrap_or_else(|| self.fallback_message(Some(*status))),
			Error::Transport(_) => NETWORK_FAILURE_MESSAGE.to_owned(),
			Error::Validation(e) => e.message.clone(),
			_ => self.fallback_message(None),
		}
	}
}

/// Extracts the first non-blank string found under `keys` in a JSON object body.
pub fn server_message(body: Option<&JsonValue>, keys: &[&str]) -> Option<String> {
	let object = body?.as_object()?;

	keys.iter().find_map(|key| {
		object
			.get(*key)
			.and_then(JsonValue::as_str)
			.map(str::trim)
			.filter(|message| !message.is_empty())
			.map(str::to_owned)
	})
}

/// Per-screen submission status.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SubmissionState {
	/// Nothing pending, nothing to show.
	#[default]
	Idle,
	/// Idle with an inline validation message; no request was sent.
	Invalid(ValidationError),
	/// A request is in flight; the submit control is disabled.
	Submitting,
	/// The backend accepted the submission.
	Succeeded {
		/// Success message.
		message: String,
	},
	/// The backend rejected the submission or could not be reached.
	Failed {
		/// Error message.
		message: String,
	},
}
impl SubmissionState {
	/// Returns `true` while a request is in flight.
	pub fn is_loading(&self) -> bool {
		matches!(self, Self::Submitting)
	}

	/// Error message to display, if any.
	pub fn error_message(&self) -> Option<&str> {
		match self {
			Self::Invalid(e) => Some(&e.message),
			Self::Failed { message } => Some(message),
			_ => None,
		}
	}

	/// Success message to display, if any.
	pub fn success_message(&self) -> Option<&str> {
		match self {
			Self::Succeeded { message } => Some(message),
			_ => None,
		}
	}
}

/// Result of one [`ScreenController::submit`] call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
	/// Validation refused the submission; no request was sent.
	Invalid(ValidationError),
	/// Another submission was already in flight; nothing was sent.
	Ignored,
	/// The controller was unmounted before the response arrived; nothing was written.
	Detached,
	/// The backend accepted the submission.
	Succeeded {
		/// Success message.
		message: String,
		/// Navigation scheduled after success.
		navigation: Navigation,
	},
	/// The submission failed.
	Failed {
		/// Error message.
		message: String,
	},
}

#[derive(Debug)]
struct ControllerState<M>
where
	M: FormModel,
{
	form: Form<M>,
	submission: SubmissionState,
	navigation: Option<Navigation>,
	mounted: bool,
}

/// One mounted instance of a form screen.
pub struct ScreenController<S>
where
	S: FormScreen,
{
	screen: S,
	client: ApiClient,
	state: Mutex<ControllerState<S::Model>>,
}
impl<S> ScreenController<S>
where
	S: FormScreen,
{
	/// Mounts `screen` with fresh form values.
	pub fn new(screen: S, client: ApiClient) -> Self {
		let form = Form::new(screen.initial());

		Self {
			screen,
			client,
			state: Mutex::new(ControllerState {
				form,
				submission: SubmissionState::Idle,
				navigation: None,
				mounted: true,
			}),
		}
	}

	/// Screen definition.
	pub fn screen(&self) -> &S {
		&self.screen
	}

	/// Snapshot of the current form values.
	pub fn values(&self) -> S::Model {
		self.state.lock().form.values().clone()
	}

	/// Snapshot of the submission state.
	pub fn submission(&self) -> SubmissionState {
		self.state.lock().submission.clone()
	}

	/// Returns `true` when the submit control should be enabled.
	pub fn can_submit(&self) -> bool {
		let state = self.state.lock();

		state.mounted && !state.submission.is_loading()
	}

	/// Name-keyed change handler for UI events.
	pub fn handle_change(&self, name: &str, raw: &str) -> Result<(), FormError> {
		let mut state = self.state.lock();

		state.form.handle_change(name, raw)?;
		Self::settle_after_edit(&mut state);

		Ok(())
	}

	/// Typed change handler.
	pub fn change(&self, field: <S::Model as FormModel>::Field, raw: &str) {
		let mut state = self.state.lock();

		state.form.change(field, raw);
		Self::settle_after_edit(&mut state);
	}

	/// Replaces every value at once, e.g. when restoring a saved draft.
	pub fn set(&self, values: S::Model) {
		let mut state = self.state.lock();

		state.form.set(values);
		Self::settle_after_edit(&mut state);
	}

	/// Raw setter for click-driven fields.
	pub fn update(&self, f: impl FnOnce(&mut S::Model)) {
		let mut state = self.state.lock();

		state.form.update(f);
		Self::settle_after_edit(&mut state);
	}

	/// Restores the initial form values.
	pub fn reset(&self) {
		self.state.lock().form.reset();
	}

	/// Takes the navigation requested by the last successful submit.
	pub fn take_navigation(&self) -> Option<Navigation> {
		self.state.lock().navigation.take()
	}

	/// Detaches the controller; in-flight responses will be ignored.
	pub fn unmount(&self) {
		let mut state = self.state.lock();

		state.mounted = false;
		state.navigation = None;
	}

	/// Returns `true` until [`ScreenController::unmount`] is called.
	pub fn is_mounted(&self) -> bool {
		self.state.lock().mounted
	}

	/// Validates and submits the current values.
	pub async fn submit(&self) -> SubmitOutcome {
		obs::record_submit_outcome(S::KIND, SubmitLabel::Attempt);

		let values = match self.begin() {
			Ok(values) => values,
			Err(outcome) => {
				let label = match outcome {
					SubmitOutcome::Invalid(_) => SubmitLabel::Invalid,
					_ => SubmitLabel::Ignored,
				};

				obs::record_submit_outcome(S::KIND, label);

				return outcome;
			},
		};
		let span = SubmitSpan::new(S::KIND, "submit");
		let result = span.instrument(self.exchange(values)).await;
		let outcome = self.finish(result);
		let label = match &outcome {
			SubmitOutcome::Succeeded { .. } => SubmitLabel::Success,
			SubmitOutcome::Failed { .. } => SubmitLabel::Failure,
			_ => SubmitLabel::Ignored,
		};

		span.record_outcome(label);
		obs::record_submit_outcome(S::KIND, label);

		outcome
	}

	fn begin(&self) -> Result<S::Model, SubmitOutcome> {
		let mut state = self.state.lock();

		if !state.mounted {
			return Err(SubmitOutcome::Detached);
		}
		if state.submission.is_loading() {
			#[cfg(feature = "tracing")]
			tracing::debug!(screen = %S::KIND, "submission already in flight");

			return Err(SubmitOutcome::Ignored);
		}

		state.navigation = None;

		if let Err(e) = self.screen.validate(state.form.values()) {
			#[cfg(feature = "tracing")]
			tracing::debug!(screen = %S::KIND, field = e.field, rule = ?e.rule, "validation refused submission");

			state.submission = SubmissionState::Invalid(e.clone());

			return Err(SubmitOutcome::Invalid(e));
		}

		state.submission = SubmissionState::Submitting;

		Ok(state.form.values().clone())
	}

	/// Returns `Ok(false)` when the controller was unmounted before side effects ran.
	async fn exchange(&self, values: S::Model) -> Result<bool> {
		let accepted = self.screen.send(&self.client, values).await?;

		if !self.is_mounted() {
			return Ok(false);
		}

		self.screen.on_accepted(&self.client, accepted).await?;

		Ok(true)
	}

	fn finish(&self, result: Result<bool>) -> SubmitOutcome {
		let mut state = self.state.lock();

		if !state.mounted {
			#[cfg(feature = "tracing")]
			tracing::debug!(screen = %S::KIND, "dropping response for unmounted screen");

			return SubmitOutcome::Detached;
		}

		match result {
			Ok(true) => {
				let message = self.screen.success_message().to_owned();
				let navigation = self.screen.navigation();

				state.form.reset();
				state.submission = SubmissionState::Succeeded { message: message.clone() };
				state.navigation = Some(navigation);

				SubmitOutcome::Succeeded { message, navigation }
			},
			// Unmounted between the response and the side effects.
			Ok(false) => SubmitOutcome::Detached,
			Err(e) => {
				#[cfg(feature = "tracing")]
				tracing::warn!(screen = %S::KIND, status = ?e.status(), error = %e, "submission failed");

				let message = self.screen.failure_message(&e);

				state.submission = SubmissionState::Failed { message: message.clone() };

				SubmitOutcome::Failed { message }
			},
		}
	}

	fn settle_after_edit(state: &mut ControllerState<S::Model>) {
		if !state.submission.is_loading() {
			state.submission = SubmissionState::Idle;
		}
	}
}
impl<S> Debug for ScreenController<S>
where
	S: FormScreen,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let state = self.state.lock();

		f.debug_struct("ScreenController")
			.field("screen", &S::KIND)
			.field("submission", &state.submission)
			.field("mounted", &state.mounted)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn server_message_prefers_keys_in_order() {
		let body = serde_json::json!({ "error": "duplicate email", "message": "conflict" });

		assert_eq!(
			server_message(Some(&body), &["error", "message"]).as_deref(),
			Some("duplicate email"),
		);
		assert_eq!(server_message(Some(&body), &["message"]).as_deref(), Some("conflict"));
	}

	#[test]
	fn server_message_ignores_blank_and_non_string_values() {
		let body = serde_json::json!({ "message": "  ", "error": { "console": "nested" } });

		assert_eq!(server_message(Some(&body), &["message", "error"]), None);
		assert_eq!(server_message(None, &["message"]), None);
		assert_eq!(server_message(Some(&JsonValue::from("text")), &["message"]), None);
	}

	#[test]
	fn submission_state_exposes_messages() {
		let failed = SubmissionState::Failed { message: "nope".into() };
		let succeeded = SubmissionState::Succeeded { message: "yes".into() };

		assert_eq!(failed.error_message(), Some("nope"));
		assert_eq!(failed.success_message(), None);
		assert_eq!(succeeded.success_message(), Some("yes"));
		assert!(SubmissionState::Submitting.is_loading());
		assert_eq!(SubmissionState::default(), SubmissionState::Idle);
	}
}
