//! Application assembly.
//!
//! [`App`] owns the settings, the routing table and the optional session
//! backend, and turns them into one [`MiddlewareChain`] the transport layer
//! can serve. Stage order, outermost first: security headers, CSRF, static
//! files, resource session, then the router as terminal handler.

use std::sync::Arc;

use hyper::Method;

use grappelli_http::{Handler, MiddlewareChain, Result};
use grappelli_middleware::csrf::{CsrfConfig, CsrfMiddleware};
use grappelli_middleware::db_session::{SessionBackend, SessionMiddleware};
use grappelli_middleware::security_headers::SecurityHeadersMiddleware;
use grappelli_middleware::static_files::StaticFilesMiddleware;
use grappelli_urls::{Blueprint, Router};

use crate::settings::Settings;

/// A grappelli application.
pub struct App {
	settings: Settings,
	router: Router,
	/// Blueprint static mounts, in registration order. These are served
	/// ahead of the application-wide static directory.
	static_mounts: Vec<(String, std::path::PathBuf)>,
	session_backend: Option<Arc<dyn SessionBackend>>,
	csrf_config: CsrfConfig,
}

impl App {
	pub fn new(settings: Settings) -> Self {
		let csrf_config = CsrfConfig {
			cookie_secure: settings.csrf_cookie_secure,
			..CsrfConfig::default()
		};
		Self {
			settings,
			router: Router::new(),
			static_mounts: Vec::new(),
			session_backend: None,
			csrf_config,
		}
	}

	pub fn settings(&self) -> &Settings {
		&self.settings
	}

	/// Register a route on the application router.
	///
	/// # Errors
	///
	/// Fails when the endpoint name is taken or the pattern is invalid.
	pub fn route(
		&mut self,
		pattern: &str,
		endpoint: impl Into<String>,
		methods: Vec<Method>,
		handler: Arc<dyn Handler>,
	) -> Result<()> {
		self.router.add_route(pattern, endpoint, methods, handler)
	}

	/// Register a blueprint's routes and static mount.
	pub fn register_blueprint(&mut self, blueprint: &Blueprint) -> Result<()> {
		blueprint.register(&mut self.router)?;
		if let Some(mount) = blueprint.static_mount() {
			self.static_mounts.push(mount);
		}
		tracing::info!(blueprint = blueprint.name(), "blueprint registered");
		Ok(())
	}

	/// Attach the resource session backend. Without one the session stage
	/// is omitted from the chain.
	pub fn set_session_backend(&mut self, backend: Arc<dyn SessionBackend>) {
		self.session_backend = Some(backend);
	}

	/// Exclude a path from CSRF validation.
	pub fn csrf_exempt(&mut self, path: impl Into<String>) {
		self.csrf_config.exempt_paths.insert(path.into());
	}

	/// Reverse a URL for a named endpoint.
	///
	/// # Errors
	///
	/// Fails when the endpoint is unknown or a pattern parameter is missing.
	pub fn url_for(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<String> {
		self.router.url_for(endpoint, params)
	}

	/// Assemble the middleware chain around the router.
	pub fn into_handler(self) -> MiddlewareChain {
		let mut chain = MiddlewareChain::new(Arc::new(self.router));

		if self.settings.security_headers {
			chain.add_middleware(Arc::new(SecurityHeadersMiddleware::new()));
		}

		chain.add_middleware(Arc::new(CsrfMiddleware::with_config(self.csrf_config)));

		let mut static_files = StaticFilesMiddleware::new();
		for (url_prefix, directory) in self.static_mounts {
			static_files = static_files.with_mount(url_prefix, directory);
		}
		if let Some(static_dir) = self.settings.static_dir {
			static_files = static_files.with_mount(self.settings.static_url, static_dir);
		}
		chain.add_middleware(Arc::new(static_files));

		if let Some(backend) = self.session_backend {
			chain.add_middleware(Arc::new(SessionMiddleware::new(backend)));
		}

		chain
	}
}
