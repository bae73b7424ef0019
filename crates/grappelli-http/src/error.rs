//! Framework-wide error taxonomy.
//!
//! Resolution failures (`NotFound`, `MethodNotAllowed`) are routine outcomes
//! of dispatch and are translated into 404/405 responses by the terminal
//! dispatch stage. Configuration errors are raised while the route table is
//! being built and are fatal to startup; they are never expected at request
//! time.

use hyper::{Method, StatusCode};

/// Result alias used throughout the framework.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Framework error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// No route matched the request path.
	#[error("no route found for {0}")]
	NotFound(String),

	/// A route matched the path but not the request method.
	#[error("method {method} not allowed for {path}")]
	MethodNotAllowed {
		method: Method,
		path: String,
		/// Methods that *are* accepted for this path, for the `Allow` header.
		allowed: Vec<Method>,
	},

	/// Invalid setup detected while building the application (duplicate
	/// endpoint, bad pattern, missing reverse-URL parameter). Fatal at
	/// startup.
	#[error("configuration error: {0}")]
	Configuration(String),

	/// Request failed a security check (e.g. CSRF validation).
	#[error("authorization error: {0}")]
	Authorization(String),

	/// Transactional resource failure (commit/rollback).
	#[error("database error: {0}")]
	Database(String),

	#[error("serialization error: {0}")]
	Serialization(String),

	#[error("internal error: {0}")]
	Internal(String),
}

impl Error {
	/// The HTTP status this error maps to when it reaches the client.
	///
	/// # Examples
	///
	/// ```
	/// use grappelli_http::Error;
	/// use hyper::StatusCode;
	///
	/// assert_eq!(Error::NotFound("/missing".into()).status_code(), StatusCode::NOT_FOUND);
	/// assert_eq!(Error::Authorization("csrf".into()).status_code(), StatusCode::FORBIDDEN);
	/// ```
	pub fn status_code(&self) -> StatusCode {
		match self {
			Error::NotFound(_) => StatusCode::NOT_FOUND,
			Error::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
			Error::Authorization(_) => StatusCode::FORBIDDEN,
			Error::Configuration(_)
			| Error::Database(_)
			| Error::Serialization(_)
			| Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}
