//! Route grouping with a shared URL prefix.
//!
//! A blueprint collects routes under a common prefix and endpoint namespace,
//! then registers them into a [`Router`] in one step. A blueprint may also
//! declare its own static directory, which the static file stage serves
//! under the blueprint's prefix ahead of the application-wide directory.

use std::path::PathBuf;
use std::sync::Arc;

use hyper::Method;

use grappelli_http::{Handler, Result};

use crate::router::Router;

struct BlueprintRoute {
	pattern: String,
	endpoint: String,
	methods: Vec<Method>,
	handler: Arc<dyn Handler>,
}

/// A named group of routes mounted under a URL prefix.
pub struct Blueprint {
	name: String,
	url_prefix: String,
	routes: Vec<BlueprintRoute>,
	static_folder: Option<PathBuf>,
	static_url_path: String,
}

impl Blueprint {
	/// Create a blueprint. The prefix is prepended to every route pattern;
	/// an empty prefix mounts routes at the root.
	pub fn new(name: impl Into<String>, url_prefix: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			url_prefix: url_prefix.into(),
			routes: Vec::new(),
			static_folder: None,
			static_url_path: "/static".to_string(),
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn url_prefix(&self) -> &str {
		&self.url_prefix
	}

	/// Add a route, builder-style. The endpoint is namespaced as
	/// `<blueprint>.<endpoint>` at registration time.
	pub fn route(
		mut self,
		pattern: &str,
		endpoint: impl Into<String>,
		methods: Vec<Method>,
		handler: Arc<dyn Handler>,
	) -> Self {
		self.routes.push(BlueprintRoute {
			pattern: pattern.to_string(),
			endpoint: endpoint.into(),
			methods,
			handler,
		});
		self
	}

	/// Declare a static directory served under this blueprint's prefix.
	pub fn with_static_folder(mut self, folder: impl Into<PathBuf>) -> Self {
		self.static_folder = Some(folder.into());
		self
	}

	/// Override the URL path component for this blueprint's static files
	/// (default `/static`).
	pub fn with_static_url_path(mut self, path: impl Into<String>) -> Self {
		self.static_url_path = path.into();
		self
	}

	/// The static mount for this blueprint, as a `(url_prefix, directory)`
	/// pair, when a static folder was declared.
	pub fn static_mount(&self) -> Option<(String, PathBuf)> {
		self.static_folder
			.as_ref()
			.map(|folder| (join_url(&self.url_prefix, &self.static_url_path), folder.clone()))
	}

	/// Register every route into `router`, applying the URL prefix and the
	/// endpoint namespace.
	///
	/// # Errors
	///
	/// Fails on the first route the router rejects; earlier routes of this
	/// blueprint stay registered.
	pub fn register(&self, router: &mut Router) -> Result<()> {
		for route in &self.routes {
			let pattern = join_url(&self.url_prefix, &route.pattern);
			let endpoint = format!("{}.{}", self.name, route.endpoint);
			router.add_route(&pattern, endpoint, route.methods.clone(), route.handler.clone())?;
		}
		Ok(())
	}
}

/// Join a URL prefix and a path with exactly one slash between them, so a
/// trailing slash on the prefix does not produce `//` in the pattern.
fn join_url(prefix: &str, path: &str) -> String {
	format!(
		"{}/{}",
		prefix.trim_end_matches('/'),
		path.trim_start_matches('/')
	)
}

#[cfg(test)]
mod tests {
	use super::*;
	use async_trait::async_trait;
	use grappelli_http::{Request, Response};

	struct NoopHandler;

	#[async_trait]
	impl Handler for NoopHandler {
		async fn handle(&self, _request: Request) -> Result<Response> {
			Ok(Response::ok())
		}
	}

	#[test]
	fn test_register_applies_prefix_and_namespace() {
		let blueprint = Blueprint::new("admin", "/admin")
			.route("/dashboard", "dashboard", vec![], Arc::new(NoopHandler))
			.route("/users/<int:id>", "user", vec![], Arc::new(NoopHandler));

		let mut router = Router::new();
		blueprint.register(&mut router).unwrap();

		assert!(router.resolve(&Method::GET, "/admin/dashboard").is_ok());
		assert!(router.resolve(&Method::GET, "/admin/users/3").is_ok());
		assert_eq!(
			router.url_for("admin.user", &[("id", "3")]).unwrap(),
			"/admin/users/3"
		);
	}

	#[test]
	fn test_trailing_prefix_slash_is_normalized() {
		let blueprint = Blueprint::new("admin", "/admin/")
			.route("/dashboard", "dashboard", vec![], Arc::new(NoopHandler));

		let mut router = Router::new();
		blueprint.register(&mut router).unwrap();

		assert!(router.resolve(&Method::GET, "/admin/dashboard").is_ok());
		assert!(router.resolve(&Method::GET, "/admin//dashboard").is_err());
		assert_eq!(
			router.url_for("admin.dashboard", &[]).unwrap(),
			"/admin/dashboard"
		);
	}

	#[test]
	fn test_static_mount_combines_prefix_and_path() {
		let blueprint = Blueprint::new("admin", "/admin").with_static_folder("admin/static");
		let (url, dir) = blueprint.static_mount().unwrap();
		assert_eq!(url, "/admin/static");
		assert_eq!(dir, PathBuf::from("admin/static"));

		let bare = Blueprint::new("main", "");
		assert!(bare.static_mount().is_none());
	}
}
