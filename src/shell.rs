//! Navigation shell: route table, landing-screen session reflection, logout, and delayed
//! navigation after a successful submit.

// self
use crate::{
	_prelude::*,
	session::{Session, SessionStorage},
};

/// User-facing routes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Route {
	/// `/`
	#[default]
	Landing,
	/// `/login`
	Login,
	/// `/signup`
	Signup,
	/// `/register`
	Register,
	/// `/profile`, linked from the landing screen but not built yet.
	Profile,
}
impl Route {
	/// Every route, in display order.
	pub const ALL: [Self; 5] =
		[Self::Landing, Self::Login, Self::Signup, Self::Register, Self::Profile];

	/// Path the route is served at.
	pub const fn path(self) -> &'static str {
		match self {
			Self::Landing => "/",
			Self::Login => "/login",
			Self::Signup => "/signup",
			Self::Register => "/register",
			Self::Profile => "/profile",
		}
	}

	/// Resolves a path; unknown paths fall back to [`Route::Landing`].
	pub fn from_path(path: &str) -> Self {
		let path = path.split(['?', '#']).next().unwrap_or_default();
		let trimmed = path.trim_end_matches('/');
		let normalized = if trimmed.is_empty() { "/" } else { trimmed };

		Self::ALL.into_iter().find(|route| route.path() == normalized).unwrap_or_default()
	}

	/// Returns `false` for routes that only exist as links.
	pub const fn is_implemented(self) -> bool {
		!matches!(self, Self::Profile)
	}
}
impl Display for Route {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.path())
	}
}

/// Navigation requested after a successful submit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Navigation {
	/// Destination.
	pub route: Route,
	/// Delay before leaving, so the success message stays visible.
	pub delay: Duration,
}
impl Navigation {
	/// Creates a delayed navigation.
	pub const fn after(route: Route, delay: Duration) -> Self {
		Self { route, delay }
	}
}

/// Session-dependent affordance on the landing screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Affordance {
	/// No token stored; offer the login link.
	LogIn,
	/// A token is stored; offer logout.
	LogOut,
}

#[derive(Debug, Default)]
struct ShellState {
	current: Route,
	// Bumped on every navigation so a delayed one can tell it was superseded.
	epoch: u64,
}

/// Tracks the current route and reflects session presence.
pub struct Shell {
	storage: Arc<dyn SessionStorage>,
	state: Mutex<ShellState>,
}
impl Shell {
	/// Creates a shell at [`Route::Landing`].
	pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
		Self { storage, state: Mutex::new(ShellState::default()) }
	}

	/// Current route.
	pub fn current(&self) -> Route {
		self.state.lock().current
	}

	/// Navigates immediately.
	pub fn navigate(&self, route: Route) {
		let mut state = self.state.lock();

		state.current = route;
		state.epoch += 1;

		#[cfg(feature = "tracing")]
		tracing::debug!(route = route.path(), "navigated");
	}

	/// Navigates to a path, falling back to the landing route for unknown paths.
	pub fn open(&self, path: &str) -> Route {
		let route = Route::from_path(path);

		self.navigate(route);

		route
	}

	/// Waits out the navigation delay, then navigates unless another navigation happened in the
	/// meantime. Returns whether the navigation was applied.
	pub async fn follow(&self, navigation: Navigation) -> bool {
		let epoch = self.state.lock().epoch;

		tokio::time::sleep(navigation.delay.unsigned_abs()).await;

		let mut state = self.state.lock();

		if state.epoch != epoch {
			return false;
		}

		state.current = navigation.route;
		state.epoch += 1;

		true
	}

	/// Reads the session to pick the landing affordance.
	///
	/// The read is asynchronous, so a UI may briefly render [`Affordance::LogIn`] before this
	/// resolves. Storage failures are treated as logged out; the backend still checks the token on
	/// every request.
	pub async fn landing(&self) -> Affordance {
		match Session::token(self.storage.as_ref()).await {
			Ok(Some(_)) => Affordance::LogOut,
			Ok(None) => Affordance::LogIn,
			Err(_e) => {
				#[cfg(feature = "tracing")]
				tracing::warn!(error = %_e, "failed to read session for landing screen");

				Affordance::LogIn
			},
		}
	}

	/// Drops the stored session and returns to the landing route.
	pub async fn logout(&self) -> Result<()> {
		Session::clear(self.storage.as_ref()).await?;
		self.navigate(Route::Landing);

		Ok(())
	}
}
impl Debug for Shell {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Shell").field("current", &self.current()).finish()
	}
}
