//! Application settings.

use std::path::PathBuf;

use serde::Deserialize;

/// Settings for an [`crate::App`].
///
/// All fields have defaults, so a deserialized settings file only needs to
/// name what it overrides.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
	/// Enable debug behavior. Off in production.
	pub debug: bool,
	/// URL prefix the application-wide static directory is served under.
	pub static_url: String,
	/// Application-wide static directory; `None` disables app-level static
	/// serving (blueprint static folders still work).
	pub static_dir: Option<PathBuf>,
	/// Set the `Secure` attribute on the CSRF cookie.
	pub csrf_cookie_secure: bool,
	/// Attach the baseline security header stage.
	pub security_headers: bool,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			debug: false,
			static_url: "/static".to_string(),
			static_dir: None,
			csrf_cookie_secure: false,
			security_headers: true,
		}
	}
}
