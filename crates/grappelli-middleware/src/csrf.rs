//! CSRF (Cross-Site Request Forgery) protection.
//!
//! The double-submit scheme: a random token lives in a cookie readable by
//! the page's scripts, clients echo it back in a `csrf_token` form field or
//! an `X-CSRF-Token` header, and state-changing requests are rejected unless
//! the echoed value agrees with the cookie. Token comparison is
//! constant-time, and token values are never logged.
//!
//! The stage also issues the token: when a request arrives without the
//! cookie, the response leaves with a freshly generated one so the next
//! form render can embed it.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use hyper::Method;
use rand::RngCore;

use grappelli_http::{
	CookieOptions, Handler, Middleware, Request, Response, Result, SameSite,
};

/// Length of the raw token in bytes; the cookie carries its hex form.
const TOKEN_BYTES: usize = 32;

/// CSRF stage configuration.
#[derive(Debug, Clone)]
pub struct CsrfConfig {
	/// Cookie holding the token (default `csrf_token`).
	pub cookie_name: String,
	/// Form field the token is echoed back in (default `csrf_token`).
	pub form_field: String,
	/// Header the token may be supplied in instead of the form field
	/// (default `X-CSRF-Token`, matched case-insensitively).
	pub header_name: String,
	/// Set the `Secure` attribute on the token cookie.
	pub cookie_secure: bool,
	/// Paths excluded from validation, e.g. webhook receivers.
	pub exempt_paths: HashSet<String>,
}

impl Default for CsrfConfig {
	fn default() -> Self {
		Self {
			cookie_name: "csrf_token".to_string(),
			form_field: "csrf_token".to_string(),
			header_name: "X-CSRF-Token".to_string(),
			cookie_secure: false,
			exempt_paths: HashSet::new(),
		}
	}
}

impl CsrfConfig {
	/// Add a path exempt from validation, builder-style.
	pub fn add_exempt_path(mut self, path: impl Into<String>) -> Self {
		self.exempt_paths.insert(path.into());
		self
	}
}

/// CSRF protection middleware.
pub struct CsrfMiddleware {
	config: CsrfConfig,
}

impl Default for CsrfMiddleware {
	fn default() -> Self {
		Self::new()
	}
}

impl CsrfMiddleware {
	pub fn new() -> Self {
		Self {
			config: CsrfConfig::default(),
		}
	}

	pub fn with_config(config: CsrfConfig) -> Self {
		Self { config }
	}

	/// Methods that never change state and skip validation.
	fn is_safe_method(method: &Method) -> bool {
		matches!(
			*method,
			Method::GET | Method::HEAD | Method::OPTIONS | Method::TRACE
		)
	}

	fn generate_token() -> String {
		let mut bytes = [0u8; TOKEN_BYTES];
		rand::thread_rng().fill_bytes(&mut bytes);
		hex::encode(bytes)
	}

	/// The token the client echoed back, from the form field or the header.
	fn supplied_token(&self, request: &Request) -> Option<String> {
		request
			.form()
			.remove(&self.config.form_field)
			.or_else(|| request.header(&self.config.header_name).map(str::to_string))
	}

	/// Validate an unsafe request against the cookie token.
	fn is_valid(&self, request: &Request) -> bool {
		let cookie_token = request.cookie(&self.config.cookie_name);
		let supplied_token = self.supplied_token(request);
		let valid = match (&cookie_token, &supplied_token) {
			(Some(cookie), Some(supplied)) => {
				constant_time_eq(supplied.as_bytes(), cookie.as_bytes())
			}
			_ => false,
		};
		if !valid {
			// Presence only, never the values.
			tracing::warn!(
				path = %request.path(),
				method = %request.method,
				has_cookie_token = cookie_token.is_some(),
				has_supplied_token = supplied_token.is_some(),
				"csrf rejection"
			);
		}
		valid
	}

	fn rejection() -> Response {
		Response::forbidden()
			.with_body("<h1>403 Forbidden</h1><p>CSRF validation failed.</p>")
			.with_stop_chain(true)
	}

	fn issue_token(&self, response: Response) -> Response {
		let token = Self::generate_token();
		// Not HttpOnly: page scripts and form renderers must read it back.
		response.set_cookie(
			&self.config.cookie_name,
			&token,
			CookieOptions {
				secure: self.config.cookie_secure,
				http_only: false,
				same_site: SameSite::Lax,
				..CookieOptions::default()
			},
		)
	}
}

#[async_trait]
impl Middleware for CsrfMiddleware {
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response> {
		let exempt = self.config.exempt_paths.contains(request.path());
		if !exempt && !Self::is_safe_method(&request.method) && !self.is_valid(&request) {
			return Ok(Self::rejection());
		}

		let needs_token = request.cookie(&self.config.cookie_name).is_none();
		let response = next.handle(request).await?;

		if needs_token {
			return Ok(self.issue_token(response));
		}
		Ok(response)
	}
}

/// Constant-time comparison to prevent timing attacks.
///
/// Hashes both inputs with SHA-256 to produce fixed-length digests, then
/// compares the digests in constant time using `subtle`. This prevents
/// leaking the length of either input through timing.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
	use sha2::{Digest, Sha256};
	use subtle::ConstantTimeEq;

	let hash_a = Sha256::digest(a);
	let hash_b = Sha256::digest(b);
	hash_a.ct_eq(&hash_b).into()
}
