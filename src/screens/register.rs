//! Team registration screen.
//!
//! Besides text inputs the form has three click-driven pickers (member-count tier, activity day,
//! skill level). UIs set those through [`ScreenController::update`](crate::screen::ScreenController::update);
//! name-keyed events are accepted too and coerced by each field's [`FieldKind`].

// self
use crate::{
	_prelude::*,
	form::{FieldKind, FieldValue, FormField, FormModel},
	http::ApiClient,
	obs::ScreenKind,
	screen::{FormScreen, ScreenFuture},
	shell::{Navigation, Route},
	validate::{self, MIN_PASSWORD_LEN, Rule, ValidationError},
};

/// Member-count tiers offered by the picker.
pub const MEMBER_COUNT_TIERS: [i64; 4] = [5, 10, 20, 30];

/// Day of the week the team usually meets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityDay {
	/// Monday.
	Monday,
	/// Tuesday.
	Tuesday,
	/// Wednesday.
	Wednesday,
	/// Thursday.
	Thursday,
	/// Friday.
	Friday,
	/// Saturday.
	Saturday,
	/// Sunday.
	Sunday,
}
impl ActivityDay {
	/// Every day, Monday first.
	pub const ALL: [Self; 7] = [
		Self::Monday,
		Self::Tuesday,
		Self::Wednesday,
		Self::Thursday,
		Self::Friday,
		Self::Saturday,
		Self::Sunday,
	];

	/// Lowercase English name.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Monday => "monday",
			Self::Tuesday => "tuesday",
			Self::Wednesday => "wednesday",
			Self::Thursday => "thursday",
			Self::Friday => "friday",
			Self::Saturday => "saturday",
			Self::Sunday => "sunday",
		}
	}
}
impl FromStr for ActivityDay {
	type Err = ValidationError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let needle = s.trim().to_ascii_lowercase();

		Self::ALL
			.into_iter()
			.find(|day| day.as_str() == needle || day.as_str()[..3] == needle)
			.ok_or_else(TeamRegistrationScreen::missing_day)
	}
}

/// Skill level picked on a 1 to 5 scale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SkillLevel(u8);
impl SkillLevel {
	/// Lowest level.
	pub const MIN: u8 = 1;
	/// Highest level.
	pub const MAX: u8 = 5;

	/// Returns the level when `value` is on the scale.
	pub fn new(value: i64) -> Option<Self> {
		u8::try_from(value).ok().filter(|v| (Self::MIN..=Self::MAX).contains(v)).map(Self)
	}

	/// Numeric level.
	pub const fn get(self) -> u8 {
		self.0
	}
}

/// Team registration form values.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TeamRegistrationForm {
	/// Team name.
	pub team_name: String,
	/// Region the team plays in.
	pub region: String,
	/// Member-count tier; `0` until one is picked.
	pub member_count: i64,
	/// Usual activity day.
	pub activity_day: Option<ActivityDay>,
	/// Contact email, also used to log in.
	pub email: String,
	/// Password.
	pub password: String,
	/// Free-form introduction (optional).
	pub introduction: String,
	/// Contact handle or phone number.
	pub contact: String,
	/// Skill level.
	pub level: Option<SkillLevel>,
}
impl FormModel for TeamRegistrationForm {
	type Field = TeamRegistrationField;

	fn apply(&mut self, field: Self::Field, value: FieldValue) {
		match field {
			TeamRegistrationField::TeamName => self.team_name = value.into_text(),
			TeamRegistrationField::Region => self.region = value.into_text(),
			TeamRegistrationField::MemberCount => self.member_count = value.into_integer(),
			TeamRegistrationField::ActivityDay =>
				self.activity_day = value.into_text().parse().ok(),
			TeamRegistrationField::Email => self.email = value.into_text(),
			TeamRegistrationField::Password => self.password = value.into_text(),
			TeamRegistrationField::Introduction => self.introduction = value.into_text(),
			TeamRegistrationField::Contact => self.contact = value.into_text(),
			TeamRegistrationField::Level => self.level = SkillLevel::new(value.into_integer()),
		}
	}
}

/// Team registration form fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TeamRegistrationField {
	/// `team_name`
	TeamName,
	/// `region`
	Region,
	/// `member_count`
	MemberCount,
	/// `activity_day`
	ActivityDay,
	/// `email`
	Email,
	/// `password`
	Password,
	/// `introduction`
	Introduction,
	/// `contact`
	Contact,
	/// `level`
	Level,
}
impl FormField for TeamRegistrationField {
	const ALL: &'static [Self] = &[
		Self::TeamName,
		Self::Region,
		Self::MemberCount,
		Self::ActivityDay,
		Self::Email,
		Self::Password,
		Self::Introduction,
		Self::Contact,
		Self::Level,
	];

	fn name(self) -> &'static str {
		match self {
			Self::TeamName => "team_name",
			Self::Region => "region",
			Self::MemberCount => "member_count",
			Self::ActivityDay => "activity_day",
			Self::Email => "email",
			Self::Password => "password",
			Self::Introduction => "introduction",
			Self::Contact => "contact",
			Self::Level => "level",
		}
	}

	fn kind(self) -> FieldKind {
		match self {
			Self::MemberCount | Self::Level => FieldKind::Integer,
			_ => FieldKind::Text,
		}
	}
}

/// Body sent to the team registration endpoint.
#[derive(Debug, Serialize)]
pub struct TeamRegistrationRequest<'a> {
	/// Team name.
	pub team_name: &'a str,
	/// Region.
	pub region: &'a str,
	/// Member-count tier.
	pub member_count: i64,
	/// Activity day.
	pub activity_day: ActivityDay,
	/// Contact email.
	pub email: &'a str,
	/// Password.
	pub password: &'a str,
	/// Introduction.
	pub introduction: &'a str,
	/// Contact handle.
	pub contact: &'a str,
	/// Skill level.
	pub level: SkillLevel,
}
impl<'a> TryFrom<&'a TeamRegistrationForm> for TeamRegistrationRequest<'a> {
	type Error = ValidationError;

	fn try_from(form: &'a TeamRegistrationForm) -> Result<Self, Self::Error> {
		let (activity_day, level) = match (form.activity_day, form.level) {
			(Some(day), Some(level)) => (day, level),
			(None, _) => return Err(TeamRegistrationScreen::missing_day()),
			(_, None) => return Err(TeamRegistrationScreen::missing_level()),
		};

		Ok(Self {
			team_name: &form.team_name,
			region: &form.region,
			member_count: form.member_count,
			activity_day,
			email: &form.email,
			password: &form.password,
			introduction: &form.introduction,
			contact: &form.contact,
			level,
		})
	}
}

/// Team registration screen definition.
#[derive(Clone, Copy, Debug, Default)]
pub struct TeamRegistrationScreen;
impl TeamRegistrationScreen {
	/// Success message.
	pub const SUCCESS: &'static str =
		"Team registration completed successfully. Redirecting to the login page.";
	/// Fallback for failures that carry no HTTP status.
	pub const FALLBACK: &'static str = "An unknown error occurred during team registration.";

	fn missing_day() -> ValidationError {
		ValidationError::new("activity_day", Rule::Selection, "Choose an activity day.")
	}

	fn missing_level() -> ValidationError {
		ValidationError::new("level", Rule::Selection, "Choose a skill level.")
	}
}
impl FormScreen for TeamRegistrationScreen {
	type Accepted = ();
	type Model = TeamRegistrationForm;

	const KIND: ScreenKind = ScreenKind::Register;

	fn initial(&self) -> Self::Model {
		TeamRegistrationForm::default()
	}

	fn validate(&self, values: &Self::Model) -> Result<(), ValidationError> {
		validate::required("team_name", &values.team_name, "Team name is required.")?;
		validate::required("region", &values.region, "Region is required.")?;
		validate::email("email", &values.email, "Enter a valid email address.")?;
		validate::min_length(
			"password",
			&values.password,
			MIN_PASSWORD_LEN,
			"Password must be at least 6 characters.",
		)?;
		validate::selected(
			"member_count",
			MEMBER_COUNT_TIERS.iter().find(|tier| **tier == values.member_count),
			"Choose how many members the team has.",
		)?;
		validate::selected(
			"activity_day",
			values.activity_day.as_ref(),
			&Self::missing_day().message,
		)?;
		validate::required("contact", &values.contact, "Contact information is required.")?;
		validate::selected("level", values.level.as_ref(), &Self::missing_level().message)?;

		Ok(())
	}

	fn send<'a>(
		&'a self,
		client: &'a ApiClient,
		values: Self::Model,
	) -> ScreenFuture<'a, Self::Accepted> {
		Box::pin(async move {
			let body = TeamRegistrationRequest::try_from(&values)?;

			client.post_json(&client.config().endpoints.register, &body).await?;

			Ok(())
		})
	}

	fn success_message(&self) -> &str {
		Self::SUCCESS
	}

	fn navigation(&self) -> Navigation {
		Navigation::after(Route::Login, Duration::milliseconds(1_500))
	}

	fn fallback_message(&self, status: Option<u16>) -> String {
		match status {
			Some(status) => format!("Server error: {status}"),
			None => Self::FALLBACK.to_owned(),
		}
	}
}
