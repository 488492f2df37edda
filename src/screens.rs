//! Concrete form screens: login, member signup, and team registration.

pub mod login;
pub mod register;
pub mod signup;

pub use login::*;
pub use register::*;
pub use signup::*;
