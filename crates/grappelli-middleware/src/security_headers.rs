//! Baseline security response headers.
//!
//! Applied on the way out, after the inner pipeline has produced its
//! response. Headers are injected only when absent so a handler that sets
//! its own value wins.

use std::sync::Arc;

use async_trait::async_trait;
use hyper::header::{HeaderName, HeaderValue};

use grappelli_http::{Handler, Middleware, Request, Response, Result};

/// Security header configuration.
#[derive(Debug, Clone)]
pub struct SecurityHeadersConfig {
	/// Set `X-Content-Type-Options: nosniff`.
	pub content_type_nosniff: bool,
	/// `X-Frame-Options` value, `None` to omit.
	pub frame_options: Option<String>,
	/// `Referrer-Policy` value, `None` to omit.
	pub referrer_policy: Option<String>,
	/// `X-XSS-Protection` value for legacy browsers, `None` to omit.
	pub xss_protection: Option<String>,
	/// `Content-Security-Policy` value, `None` to omit. Off by default
	/// since a useful policy is application-specific.
	pub content_security_policy: Option<String>,
	/// Send `Strict-Transport-Security` on HTTPS responses.
	pub hsts_enabled: bool,
	/// HSTS max-age in seconds (default: 31536000 = 1 year).
	pub hsts_seconds: u32,
	/// Include subdomains in HSTS.
	pub hsts_include_subdomains: bool,
}

impl Default for SecurityHeadersConfig {
	fn default() -> Self {
		Self {
			content_type_nosniff: true,
			frame_options: Some("DENY".to_string()),
			referrer_policy: Some("same-origin".to_string()),
			xss_protection: Some("1; mode=block".to_string()),
			content_security_policy: None,
			hsts_enabled: true,
			hsts_seconds: 31536000, // 1 year
			hsts_include_subdomains: false,
		}
	}
}

/// Security headers middleware.
pub struct SecurityHeadersMiddleware {
	config: SecurityHeadersConfig,
}

impl Default for SecurityHeadersMiddleware {
	fn default() -> Self {
		Self::new()
	}
}

impl SecurityHeadersMiddleware {
	pub fn new() -> Self {
		Self {
			config: SecurityHeadersConfig::default(),
		}
	}

	pub fn with_config(config: SecurityHeadersConfig) -> Self {
		Self { config }
	}

	fn build_hsts_header(&self) -> String {
		let mut value = format!("max-age={}", self.config.hsts_seconds);
		if self.config.hsts_include_subdomains {
			value.push_str("; includeSubDomains");
		}
		value
	}

	fn inject(response: &mut Response, name: HeaderName, value: &str) {
		if response.headers.contains_key(&name) {
			return;
		}
		if let Ok(value) = HeaderValue::from_str(value) {
			response.headers.insert(name, value);
		}
	}
}

#[async_trait]
impl Middleware for SecurityHeadersMiddleware {
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response> {
		let is_secure = request.is_secure();
		let mut response = next.handle(request).await?;

		if self.config.content_type_nosniff {
			Self::inject(
				&mut response,
				HeaderName::from_static("x-content-type-options"),
				"nosniff",
			);
		}
		if let Some(ref value) = self.config.frame_options {
			Self::inject(&mut response, HeaderName::from_static("x-frame-options"), value);
		}
		if let Some(ref value) = self.config.referrer_policy {
			Self::inject(&mut response, HeaderName::from_static("referrer-policy"), value);
		}
		if let Some(ref value) = self.config.xss_protection {
			Self::inject(&mut response, HeaderName::from_static("x-xss-protection"), value);
		}
		if let Some(ref value) = self.config.content_security_policy {
			Self::inject(
				&mut response,
				HeaderName::from_static("content-security-policy"),
				value,
			);
		}
		if self.config.hsts_enabled && is_secure {
			Self::inject(
				&mut response,
				HeaderName::from_static("strict-transport-security"),
				&self.build_hsts_header(),
			);
		}

		Ok(response)
	}
}
