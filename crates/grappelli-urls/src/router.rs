//! The routing table and terminal dispatch stage.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use hyper::Method;

use grappelli_http::{Error, Handler, ParamValue, Request, Response, Result};

use crate::route::Route;

/// The routing table.
///
/// Static routes live in a hash map keyed by exact path; dynamic routes are
/// kept in registration order and scanned linearly, so when two dynamic
/// patterns both match a path, the one registered first wins. Routes are also
/// indexed by endpoint name for reverse URL generation.
#[derive(Default)]
pub struct Router {
	static_routes: HashMap<String, Arc<Route>>,
	dynamic_routes: Vec<Arc<Route>>,
	endpoints: HashMap<String, Arc<Route>>,
}

impl Router {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a route.
	///
	/// An empty `methods` list defaults to `GET` only. Registration is
	/// atomic: on error the table is unchanged.
	///
	/// # Errors
	///
	/// Fails with [`Error::Configuration`] when the endpoint name is already
	/// taken, a static path is already registered, or the pattern does not
	/// compile.
	pub fn add_route(
		&mut self,
		pattern: &str,
		endpoint: impl Into<String>,
		methods: Vec<Method>,
		handler: Arc<dyn Handler>,
	) -> Result<()> {
		let endpoint = endpoint.into();
		if self.endpoints.contains_key(&endpoint) {
			return Err(Error::Configuration(format!(
				"endpoint {:?} is already registered",
				endpoint
			)));
		}

		let route = Route::new(pattern, endpoint.clone(), methods, handler)?;
		if route.is_static() && self.static_routes.contains_key(route.pattern()) {
			return Err(Error::Configuration(format!(
				"static route {:?} is already registered",
				route.pattern()
			)));
		}

		let route = Arc::new(route);
		if route.is_static() {
			self.static_routes
				.insert(route.pattern().to_string(), route.clone());
		} else {
			self.dynamic_routes.push(route.clone());
		}
		self.endpoints.insert(endpoint, route);
		Ok(())
	}

	/// Number of registered routes.
	pub fn len(&self) -> usize {
		self.endpoints.len()
	}

	pub fn is_empty(&self) -> bool {
		self.endpoints.is_empty()
	}

	/// Look up a route by endpoint name.
	pub fn route(&self, endpoint: &str) -> Option<&Arc<Route>> {
		self.endpoints.get(endpoint)
	}

	/// Resolve a method and path to a route and its converted parameters.
	///
	/// Static routes are consulted first by exact path. Dynamic routes are
	/// then scanned in registration order; routes not accepting the method
	/// are skipped before any pattern work happens. When no route matches
	/// but at least one would have matched under a different method, the
	/// failure is reported as [`Error::MethodNotAllowed`] carrying the union
	/// of methods those routes accept; otherwise it is [`Error::NotFound`].
	pub fn resolve(
		&self,
		method: &Method,
		path: &str,
	) -> Result<(Arc<Route>, HashMap<String, ParamValue>)> {
		if let Some(route) = self.static_routes.get(path) {
			if route.allows(method) {
				return Ok((route.clone(), HashMap::new()));
			}
			return Err(Error::MethodNotAllowed {
				method: method.clone(),
				path: path.to_string(),
				allowed: route.methods().to_vec(),
			});
		}

		for route in &self.dynamic_routes {
			if !route.allows(method) {
				continue;
			}
			if let Some(params) = route.match_path(path) {
				return Ok((route.clone(), params));
			}
		}

		// Nothing matched under this method. A second pass over the
		// method-incompatible dynamic routes decides between 404 and 405.
		// Shape only: converter outcomes are ignored here, so a segment
		// that fits a pattern's regex but fails conversion (an overflowing
		// int) still classifies the path as 405.
		let mut allowed: Vec<Method> = Vec::new();
		for route in &self.dynamic_routes {
			if route.allows(method) || !route.matches_shape(path) {
				continue;
			}
			for m in route.methods() {
				if !allowed.contains(m) {
					allowed.push(m.clone());
				}
			}
		}
		if !allowed.is_empty() {
			allowed.sort_by(|a, b| a.as_str().cmp(b.as_str()));
			return Err(Error::MethodNotAllowed {
				method: method.clone(),
				path: path.to_string(),
				allowed,
			});
		}

		Err(Error::NotFound(path.to_string()))
	}

	/// Generate a URL for a named endpoint.
	///
	/// For dynamic routes every parameter token is substituted with the
	/// matching value from `params`; parameters not named by the pattern are
	/// ignored.
	///
	/// # Errors
	///
	/// Fails with [`Error::Configuration`] when the endpoint is unknown or a
	/// pattern parameter has no value in `params`.
	///
	/// # Examples
	///
	/// ```
	/// use std::sync::Arc;
	/// use async_trait::async_trait;
	/// use grappelli_http::{Handler, Request, Response};
	/// use grappelli_urls::Router;
	///
	/// struct Show;
	///
	/// #[async_trait]
	/// impl Handler for Show {
	///     async fn handle(&self, _request: Request) -> grappelli_http::Result<Response> {
	///         Ok(Response::ok())
	///     }
	/// }
	///
	/// let mut router = Router::new();
	/// router.add_route("/users/<int:id>", "user_show", vec![], Arc::new(Show)).unwrap();
	/// assert_eq!(router.url_for("user_show", &[("id", "42")]).unwrap(), "/users/42");
	/// ```
	pub fn url_for(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<String> {
		let route = self.endpoints.get(endpoint).ok_or_else(|| {
			Error::Configuration(format!("unknown endpoint {:?}", endpoint))
		})?;

		match route.kind() {
			crate::route::RouteKind::Static(path) => Ok(path.clone()),
			crate::route::RouteKind::Dynamic(pattern) => {
				let mut url = pattern.pattern().to_string();
				for param in pattern.params() {
					let value = params
						.iter()
						.find(|(name, _)| *name == param.name)
						.map(|(_, value)| *value)
						.ok_or_else(|| {
							Error::Configuration(format!(
								"missing parameter {:?} for endpoint {:?}",
								param.name, endpoint
							))
						})?;
					url = url.replace(&param.token, value);
				}
				Ok(url)
			}
		}
	}
}

/// The router is the terminal stage of the middleware chain: it resolves the
/// request, injects converted path parameters and invokes the matched
/// handler. Resolution failures become 404/405 responses here; handler
/// errors propagate unchanged.
#[async_trait]
impl Handler for Router {
	async fn handle(&self, mut request: Request) -> Result<Response> {
		let path = request.path().to_string();
		let method = request.method.clone();
		match self.resolve(&method, &path) {
			Ok((route, params)) => {
				tracing::debug!(endpoint = route.endpoint(), path = %path, "dispatching");
				for (name, value) in params {
					request.set_path_param(name, value);
				}
				route.handler().handle(request).await
			}
			Err(Error::NotFound(_)) => {
				tracing::debug!(path = %path, "no route matched");
				Ok(Response::not_found()
					.with_body(format!("<h1>404 Not Found</h1><p>{}</p>", path)))
			}
			Err(Error::MethodNotAllowed { method, allowed, .. }) => {
				tracing::debug!(path = %path, %method, "method not allowed");
				let allow = allowed
					.iter()
					.map(Method::as_str)
					.collect::<Vec<_>>()
					.join(", ");
				Ok(Response::method_not_allowed()
					.with_header("Allow", &allow)
					.with_body("<h1>405 Method Not Allowed</h1>"))
			}
			Err(err) => Err(err),
		}
	}
}
