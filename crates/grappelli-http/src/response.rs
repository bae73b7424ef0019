//! Framework-level HTTP response object.

use bytes::Bytes;
use hyper::{HeaderMap, StatusCode};
use serde::Serialize;

use crate::error::Error;

/// `SameSite` attribute for cookies set on a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
	Strict,
	Lax,
	None,
}

/// Attributes for a `Set-Cookie` header built by [`Response::set_cookie`].
#[derive(Debug, Clone)]
pub struct CookieOptions {
	pub path: String,
	pub secure: bool,
	pub http_only: bool,
	pub same_site: SameSite,
	pub max_age: Option<u64>,
}

impl Default for CookieOptions {
	fn default() -> Self {
		Self {
			path: "/".to_string(),
			secure: false,
			http_only: false,
			same_site: SameSite::Lax,
			max_age: None,
		}
	}
}

/// HTTP response representation.
pub struct Response {
	pub status: StatusCode,
	pub headers: HeaderMap,
	pub body: Bytes,
	/// When true the middleware chain stops processing and returns this
	/// response immediately.
	stop_chain: bool,
}

impl Response {
	/// Create a response with the given status code.
	///
	/// # Examples
	///
	/// ```
	/// use grappelli_http::Response;
	/// use hyper::StatusCode;
	///
	/// let response = Response::new(StatusCode::OK);
	/// assert_eq!(response.status, StatusCode::OK);
	/// assert!(response.body.is_empty());
	/// ```
	pub fn new(status: StatusCode) -> Self {
		Self {
			status,
			headers: HeaderMap::new(),
			body: Bytes::new(),
			stop_chain: false,
		}
	}

	/// HTTP 200 OK.
	pub fn ok() -> Self {
		Self::new(StatusCode::OK)
	}

	/// HTTP 403 Forbidden.
	pub fn forbidden() -> Self {
		Self::new(StatusCode::FORBIDDEN)
	}

	/// HTTP 404 Not Found.
	pub fn not_found() -> Self {
		Self::new(StatusCode::NOT_FOUND)
	}

	/// HTTP 405 Method Not Allowed.
	pub fn method_not_allowed() -> Self {
		Self::new(StatusCode::METHOD_NOT_ALLOWED)
	}

	/// HTTP 500 Internal Server Error.
	pub fn internal_server_error() -> Self {
		Self::new(StatusCode::INTERNAL_SERVER_ERROR)
	}

	/// A 200 response carrying an HTML body.
	///
	/// This is the framework's plain-string handler contract: a handler that
	/// produces a bare string is served as HTML with the default content
	/// type.
	///
	/// # Examples
	///
	/// ```
	/// use grappelli_http::Response;
	///
	/// let response = Response::html("<h1>Hello</h1>");
	/// assert_eq!(
	///     response.headers.get("content-type").unwrap(),
	///     "text/html; charset=utf-8"
	/// );
	/// ```
	pub fn html(body: impl Into<Bytes>) -> Self {
		Self::ok().with_body(body).with_typed_header(
			hyper::header::CONTENT_TYPE,
			hyper::header::HeaderValue::from_static("text/html; charset=utf-8"),
		)
	}

	/// Set the response body.
	pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	/// Add a header. Invalid names or values are ignored.
	pub fn with_header(mut self, name: &str, value: &str) -> Self {
		if let (Ok(name), Ok(value)) = (
			hyper::header::HeaderName::from_bytes(name.as_bytes()),
			hyper::header::HeaderValue::from_str(value),
		) {
			self.headers.insert(name, value);
		}
		self
	}

	/// Add a header using typed name and value.
	pub fn with_typed_header(
		mut self,
		name: hyper::header::HeaderName,
		value: hyper::header::HeaderValue,
	) -> Self {
		self.headers.insert(name, value);
		self
	}

	/// Serialize `data` as the JSON body and set the content type.
	///
	/// # Examples
	///
	/// ```
	/// use grappelli_http::Response;
	/// use serde_json::json;
	///
	/// let response = Response::ok().with_json(&json!({"ok": true})).unwrap();
	/// assert_eq!(
	///     response.headers.get("content-type").unwrap(),
	///     "application/json"
	/// );
	/// ```
	pub fn with_json<T: Serialize>(mut self, data: &T) -> crate::Result<Self> {
		let json = serde_json::to_vec(data).map_err(|e| Error::Serialization(e.to_string()))?;
		self.body = Bytes::from(json);
		self.headers.insert(
			hyper::header::CONTENT_TYPE,
			hyper::header::HeaderValue::from_static("application/json"),
		);
		Ok(self)
	}

	/// Append a `Set-Cookie` header for `name=value` with the given
	/// attributes. Multiple cookies may be set on one response.
	///
	/// # Examples
	///
	/// ```
	/// use grappelli_http::{CookieOptions, Response};
	///
	/// let response = Response::ok().set_cookie("csrf_token", "abc", CookieOptions::default());
	/// let cookie = response.headers.get("set-cookie").unwrap().to_str().unwrap();
	/// assert!(cookie.starts_with("csrf_token=abc"));
	/// assert!(cookie.contains("SameSite=Lax"));
	/// ```
	pub fn set_cookie(mut self, name: &str, value: &str, options: CookieOptions) -> Self {
		let mut cookie = format!("{}={}; Path={}", name, value, options.path);

		if options.secure {
			cookie.push_str("; Secure");
		}
		if options.http_only {
			cookie.push_str("; HttpOnly");
		}
		match options.same_site {
			SameSite::Strict => cookie.push_str("; SameSite=Strict"),
			SameSite::Lax => cookie.push_str("; SameSite=Lax"),
			SameSite::None => cookie.push_str("; SameSite=None"),
		}
		if let Some(max_age) = options.max_age {
			cookie.push_str(&format!("; Max-Age={}", max_age));
		}

		if let Ok(value) = hyper::header::HeaderValue::from_str(&cookie) {
			self.headers.append(hyper::header::SET_COOKIE, value);
		}
		self
	}

	/// Whether the middleware chain should stop and return this response.
	pub fn should_stop_chain(&self) -> bool {
		self.stop_chain
	}

	/// Mark this response as terminating the middleware chain, used by
	/// short-circuiting stages (CSRF rejection, static file hits).
	pub fn with_stop_chain(mut self, stop: bool) -> Self {
		self.stop_chain = stop;
		self
	}
}

impl From<Error> for Response {
	fn from(error: Error) -> Self {
		let body = serde_json::json!({ "error": error.to_string() });
		Response::new(error.status_code())
			.with_json(&body)
			.unwrap_or_else(|_| Response::internal_server_error())
	}
}
