//! Typed form state shared by every screen.
//!
//! Each screen declares a record type implementing [`FormModel`] and a field enum implementing
//! [`FormField`]. The field enum is the schema: it names each field for UI events and declares
//! how raw input is coerced ([`FieldKind`]). [`Form`] keeps the current and initial records and
//! routes change events through the model's dispatch table.

// self
use crate::_prelude::*;

/// How raw input for a field is coerced before storage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FieldKind {
	/// Stored verbatim.
	#[default]
	Text,
	/// Parsed as a trimmed integer; unparsable input becomes `0`.
	Integer,
}
impl FieldKind {
	/// Applies the coercion rule to raw input.
	pub fn coerce(self, raw: &str) -> FieldValue {
		match self {
			Self::Text => FieldValue::Text(raw.to_owned()),
			Self::Integer => FieldValue::Integer(raw.trim().parse().unwrap_or(0)),
		}
	}
}

/// Coerced field value handed to [`FormModel::apply`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldValue {
	/// Text input.
	Text(String),
	/// Numeric input.
	Integer(i64),
}
impl FieldValue {
	/// Returns the value as text, rendering integers in decimal.
	pub fn into_text(self) -> String {
		match self {
			Self::Text(text) => text,
			Self::Integer(number) => number.to_string(),
		}
	}

	/// Returns the value as an integer; text is parsed with the [`FieldKind::Integer`] rule.
	pub fn into_integer(self) -> i64 {
		match self {
			Self::Text(text) => text.trim().parse().unwrap_or(0),
			Self::Integer(number) => number,
		}
	}
}

/// Field identifier enum for one form.
pub trait FormField
where
	Self: 'static + Copy + Debug + Eq + Send + Sync,
{
	/// Every field of the form, in display order.
	const ALL: &'static [Self];

	/// Name used by UI change events.
	fn name(self) -> &'static str;

	/// Coercion rule for raw input.
	fn kind(self) -> FieldKind {
		FieldKind::Text
	}

	/// Resolves a UI field name.
	fn from_name(name: &str) -> Option<Self> {
		Self::ALL.iter().copied().find(|field| field.name() == name)
	}
}

/// Strongly typed record backing a form.
pub trait FormModel
where
	Self: 'static + Clone + Debug + PartialEq + Send + Sync,
{
	/// Field identifiers for this record.
	type Field: FormField;

	/// Writes a coerced value into the field.
	fn apply(&mut self, field: Self::Field, value: FieldValue);
}

/// Errors raised by [`Form::handle_change`].
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum FormError {
	/// The UI referenced a field the form does not declare.
	#[error("Form has no field named `{name}`.")]
	UnknownField {
		/// Name that failed to resolve.
		name: String,
	},
}

/// Current and initial values of a form.
#[derive(Clone, Debug, PartialEq)]
pub struct Form<M>
where
	M: FormModel,
{
	initial: M,
	values: M,
}
impl<M> Form<M>
where
	M: FormModel,
{
	/// Creates a form whose current values start at `initial`.
	pub fn new(initial: M) -> Self {
		Self { values: initial.clone(), initial }
	}

	/// Current values.
	pub fn values(&self) -> &M {
		&self.values
	}

	/// Values the form resets to.
	pub fn initial(&self) -> &M {
		&self.initial
	}

	/// Coerces `raw` with the field's [`FieldKind`] and stores it.
	pub fn change(&mut self, field: M::Field, raw: &str) {
		let value = field.kind().coerce(raw);

		self.values.apply(field, value);
	}

	/// Name-keyed change handler for UI events.
	pub fn handle_change(&mut self, name: &str, raw: &str) -> Result<(), FormError> {
		let field = M::Field::from_name(name)
			.ok_or_else(|| FormError::UnknownField { name: name.to_owned() })?;

		self.change(field, raw);

		Ok(())
	}

	/// Replaces every value, e.g. from a click-driven picker.
	pub fn set(&mut self, values: M) {
		self.values = values;
	}

	/// Updates values in place.
	pub fn update(&mut self, f: impl FnOnce(&mut M)) {
		f(&mut self.values);
	}

	/// Restores the initial values.
	pub fn reset(&mut self) {
		self.values = self.initial.clone();
	}

	/// Returns `true` when nothing differs from the initial values.
	pub fn is_pristine(&self) -> bool {
		self.values == self.initial
	}
}
impl<M> Default for Form<M>
where
	M: FormModel + Default,
{
	fn default() -> Self {
		Self::new(M::default())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[derive(Clone, Debug, Default, PartialEq)]
	struct Roster {
		title: String,
		seats: i64,
	}

	#[derive(Clone, Copy, Debug, PartialEq, Eq)]
	enum RosterField {
		Title,
		Seats,
	}
	impl FormField for RosterField {
		const ALL: &'static [Self] = &[Self::Title, Self::Seats];

		fn name(self) -> &'static str {
			match self {
				Self::Title => "title",
				Self::Seats => "seats",
			}
		}

		fn kind(self) -> FieldKind {
			match self {
				Self::Title => FieldKind::Text,
				Self::Seats => FieldKind::Integer,
			}
		}
	}

	impl FormModel for Roster {
		type Field = RosterField;

		fn apply(&mut self, field: Self::Field, value: FieldValue) {
			match field {
				RosterField::Title => self.title = value.into_text(),
				RosterField::Seats => self.seats = value.into_integer(),
			}
		}
	}

	#[test]
	fn integer_fields_coerce_and_default_to_zero() {
		let mut form = Form::<Roster>::default();

		form.handle_change("seats", " 12 ").expect("Known field should accept input.");

		assert_eq!(form.values().seats, 12);

		form.handle_change("seats", "twelve").expect("Known field should accept input.");

		assert_eq!(form.values().seats, 0);
	}

	#[test]
	fn text_fields_are_stored_verbatim() {
		let mut form = Form::<Roster>::default();

		form.handle_change("title", "  Night Owls ").expect("Known field should accept input.");

		assert_eq!(form.values().title, "  Night Owls ");
	}

	#[test]
	fn unknown_names_leave_values_untouched() {
		let mut form = Form::<Roster>::default();
		let err = form.handle_change("captain", "Lee").expect_err("Unknown field must fail.");

		assert_eq!(err, FormError::UnknownField { name: "captain".into() });
		assert!(form.is_pristine());
	}

	#[test]
	fn reset_restores_every_field() {
		let initial = Roster { title: "Draft".into(), seats: 3 };
		let mut form = Form::new(initial.clone());

		form.change(RosterField::Title, "Final");
		form.update(|values| values.seats = 9);

		assert!(!form.is_pristine());

		form.reset();

		assert_eq!(form.values().title, initial.title);
		assert_eq!(form.values().seats, initial.seats);
		assert_eq!(form.values(), form.initial());
	}
}
