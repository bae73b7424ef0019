//! A single routing table entry.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use hyper::Method;

use grappelli_http::{Handler, ParamValue, Result};

use crate::pattern::PathPattern;

/// How a route matches incoming paths.
#[derive(Debug, Clone)]
pub enum RouteKind {
	/// No parameter tokens; matched by exact string equality.
	Static(String),
	/// Compiled pattern with typed parameter converters.
	Dynamic(PathPattern),
}

/// A registered route: an endpoint name, a match rule, the accepted methods
/// and the handler to dispatch to.
pub struct Route {
	endpoint: String,
	kind: RouteKind,
	methods: Vec<Method>,
	handler: Arc<dyn Handler>,
}

impl Route {
	/// Build a route from a pattern string, classifying it as static or
	/// dynamic by the presence of `<kind:name>` tokens.
	///
	/// An empty method list defaults to `GET` only.
	///
	/// # Errors
	///
	/// Fails when the pattern is dynamic and does not compile, e.g. a
	/// duplicate parameter name.
	pub fn new(
		pattern: &str,
		endpoint: impl Into<String>,
		methods: Vec<Method>,
		handler: Arc<dyn Handler>,
	) -> Result<Self> {
		let kind = if pattern.contains('<') {
			RouteKind::Dynamic(PathPattern::new(pattern)?)
		} else {
			RouteKind::Static(pattern.to_string())
		};
		let methods = if methods.is_empty() {
			vec![Method::GET]
		} else {
			methods
		};
		Ok(Self {
			endpoint: endpoint.into(),
			kind,
			methods,
			handler,
		})
	}

	pub fn endpoint(&self) -> &str {
		&self.endpoint
	}

	pub fn kind(&self) -> &RouteKind {
		&self.kind
	}

	/// The pattern string as registered.
	pub fn pattern(&self) -> &str {
		match &self.kind {
			RouteKind::Static(path) => path,
			RouteKind::Dynamic(pattern) => pattern.pattern(),
		}
	}

	pub fn methods(&self) -> &[Method] {
		&self.methods
	}

	pub fn handler(&self) -> Arc<dyn Handler> {
		self.handler.clone()
	}

	/// Whether this route accepts the given method.
	pub fn allows(&self, method: &Method) -> bool {
		self.methods.contains(method)
	}

	/// Whether this route is matched by exact path equality.
	pub fn is_static(&self) -> bool {
		matches!(self.kind, RouteKind::Static(_))
	}

	/// Match a path against this route, yielding converted parameters.
	///
	/// Static routes yield an empty map on an exact match. A dynamic route
	/// whose converter rejects a captured segment yields `None`, so
	/// resolution falls through to later routes.
	pub fn match_path(&self, path: &str) -> Option<HashMap<String, ParamValue>> {
		match &self.kind {
			RouteKind::Static(route_path) => (route_path.as_str() == path).then(HashMap::new),
			RouteKind::Dynamic(pattern) => pattern.matches(path),
		}
	}

	/// Whether the path fits this route's shape, ignoring converters.
	pub fn matches_shape(&self, path: &str) -> bool {
		match &self.kind {
			RouteKind::Static(route_path) => route_path.as_str() == path,
			RouteKind::Dynamic(pattern) => pattern.matches_shape(path),
		}
	}
}

impl fmt::Debug for Route {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Route")
			.field("endpoint", &self.endpoint)
			.field("kind", &self.kind)
			.field("methods", &self.methods)
			.finish_non_exhaustive()
	}
}
