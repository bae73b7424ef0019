//! Framework-level HTTP request object.
//!
//! The transport layer parses the wire protocol and constructs a [`Request`]
//! through [`Request::builder`]. Each request is owned exclusively by the
//! task handling it; routers inject extracted path parameters via
//! [`Request::set_path_param`].

use bytes::Bytes;
use hyper::{HeaderMap, Method, Uri, Version};
use percent_encoding::percent_decode_str;
use std::collections::HashMap;
use std::fmt;

use crate::error::{Error, Result};

/// A typed path-parameter value extracted by a route converter.
///
/// `str` and `path` converters capture strings; the `int` converter yields
/// an integer. Handlers read these from [`Request::path_params`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
	Str(String),
	Int(i64),
}

impl ParamValue {
	/// Returns the string form of the value, if it is one.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			ParamValue::Str(s) => Some(s),
			ParamValue::Int(_) => None,
		}
	}

	/// Returns the integer form of the value, if it is one.
	pub fn as_int(&self) -> Option<i64> {
		match self {
			ParamValue::Int(n) => Some(*n),
			ParamValue::Str(_) => None,
		}
	}
}

impl fmt::Display for ParamValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ParamValue::Str(s) => f.write_str(s),
			ParamValue::Int(n) => write!(f, "{}", n),
		}
	}
}

impl From<&str> for ParamValue {
	fn from(value: &str) -> Self {
		ParamValue::Str(value.to_string())
	}
}

impl From<i64> for ParamValue {
	fn from(value: i64) -> Self {
		ParamValue::Int(value)
	}
}

/// HTTP request representation.
pub struct Request {
	pub method: Method,
	pub uri: Uri,
	pub version: Version,
	pub headers: HeaderMap,
	pub body: Bytes,
	/// Raw query parameters parsed from the URI.
	pub query_params: HashMap<String, String>,
	/// Typed path parameters, populated by the router during dispatch.
	pub path_params: HashMap<String, ParamValue>,
	is_secure: bool,
}

impl Request {
	/// Start building a request.
	///
	/// # Examples
	///
	/// ```
	/// use grappelli_http::Request;
	/// use hyper::Method;
	///
	/// let request = Request::builder()
	///     .method(Method::GET)
	///     .uri("/users/42")
	///     .build()
	///     .unwrap();
	/// assert_eq!(request.path(), "/users/42");
	/// ```
	pub fn builder() -> RequestBuilder {
		RequestBuilder::default()
	}

	/// The request path, without query string.
	pub fn path(&self) -> &str {
		self.uri.path()
	}

	/// Whether the request arrived over HTTPS.
	pub fn is_secure(&self) -> bool {
		self.is_secure
	}

	/// Fetch a header value as a string, if present and valid UTF-8.
	///
	/// Header name lookup is case-insensitive.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.get(name).and_then(|v| v.to_str().ok())
	}

	/// Parse the `Cookie` header into name/value pairs.
	///
	/// # Examples
	///
	/// ```
	/// use grappelli_http::Request;
	/// use hyper::Method;
	///
	/// let request = Request::builder()
	///     .method(Method::GET)
	///     .uri("/")
	///     .header("Cookie", "sessionid=abc; csrf_token=xyz")
	///     .build()
	///     .unwrap();
	///
	/// let cookies = request.cookies();
	/// assert_eq!(cookies.get("csrf_token").map(String::as_str), Some("xyz"));
	/// ```
	pub fn cookies(&self) -> HashMap<String, String> {
		let mut cookies = HashMap::new();
		if let Some(header) = self.header("cookie") {
			for pair in header.split(';') {
				let mut parts = pair.trim().splitn(2, '=');
				if let (Some(name), Some(value)) = (parts.next(), parts.next()) {
					cookies.insert(name.to_string(), value.to_string());
				}
			}
		}
		cookies
	}

	/// Fetch a single cookie by name.
	pub fn cookie(&self, name: &str) -> Option<String> {
		self.cookies().remove(name)
	}

	/// Parse the body as `application/x-www-form-urlencoded` form fields.
	///
	/// Returns an empty map when the body is not a valid urlencoded form.
	/// Multipart bodies are out of scope for this layer.
	pub fn form(&self) -> HashMap<String, String> {
		serde_urlencoded::from_bytes::<Vec<(String, String)>>(&self.body)
			.map(|pairs| pairs.into_iter().collect())
			.unwrap_or_default()
	}

	/// URL-decoded query parameters.
	pub fn decoded_query_params(&self) -> HashMap<String, String> {
		self.query_params
			.iter()
			.map(|(k, v)| {
				let key = percent_decode_str(k).decode_utf8_lossy().to_string();
				let value = percent_decode_str(v).decode_utf8_lossy().to_string();
				(key, value)
			})
			.collect()
	}

	/// Set a path parameter. Called by the router when a dynamic route's
	/// converters have run.
	pub fn set_path_param(&mut self, name: impl Into<String>, value: ParamValue) {
		self.path_params.insert(name.into(), value);
	}

	/// Fetch a typed path parameter by name.
	pub fn path_param(&self, name: &str) -> Option<&ParamValue> {
		self.path_params.get(name)
	}

	fn parse_query_params(uri: &Uri) -> HashMap<String, String> {
		uri.query()
			.map(|q| {
				q.split('&')
					.filter_map(|pair| {
						// Split on the first '=' only so '=' survives in values.
						let mut parts = pair.splitn(2, '=');
						Some((
							parts.next()?.to_string(),
							parts.next().unwrap_or("").to_string(),
						))
					})
					.collect()
			})
			.unwrap_or_default()
	}
}

/// Builder for [`Request`].
#[derive(Default)]
pub struct RequestBuilder {
	method: Option<Method>,
	uri: Option<String>,
	version: Option<Version>,
	headers: HeaderMap,
	body: Bytes,
	is_secure: bool,
}

impl RequestBuilder {
	pub fn method(mut self, method: Method) -> Self {
		self.method = Some(method);
		self
	}

	pub fn uri(mut self, uri: impl Into<String>) -> Self {
		self.uri = Some(uri.into());
		self
	}

	pub fn version(mut self, version: Version) -> Self {
		self.version = Some(version);
		self
	}

	/// Replace the full header map.
	pub fn headers(mut self, headers: HeaderMap) -> Self {
		self.headers = headers;
		self
	}

	/// Append a single header. Invalid names or values are ignored.
	pub fn header(mut self, name: &str, value: &str) -> Self {
		if let (Ok(name), Ok(value)) = (
			hyper::header::HeaderName::from_bytes(name.as_bytes()),
			hyper::header::HeaderValue::from_str(value),
		) {
			self.headers.append(name, value);
		}
		self
	}

	pub fn body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	/// Mark the request as arriving over TLS.
	pub fn secure(mut self, secure: bool) -> Self {
		self.is_secure = secure;
		self
	}

	/// Finish building the request.
	///
	/// # Errors
	///
	/// Fails when the method is missing or the URI does not parse.
	pub fn build(self) -> Result<Request> {
		let method = self
			.method
			.ok_or_else(|| Error::Internal("request builder: method not set".into()))?;
		let uri: Uri = self
			.uri
			.ok_or_else(|| Error::Internal("request builder: uri not set".into()))?
			.parse()
			.map_err(|e| Error::Internal(format!("request builder: invalid uri: {}", e)))?;
		let query_params = Request::parse_query_params(&uri);

		Ok(Request {
			method,
			uri,
			version: self.version.unwrap_or(Version::HTTP_11),
			headers: self.headers,
			body: self.body,
			query_params,
			path_params: HashMap::new(),
			is_secure: self.is_secure,
		})
	}
}
