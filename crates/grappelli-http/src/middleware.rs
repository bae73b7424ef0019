//! Handler and middleware abstractions.
//!
//! A [`Handler`] turns a request into a response. A [`Middleware`] wraps a
//! handler: it receives the request and an `Arc<dyn Handler>` representing
//! the rest of the pipeline, and either short-circuits by producing a
//! response itself or delegates inward, optionally transforming the result
//! on the way back out.
//!
//! [`MiddlewareChain`] composes an ordered list of middleware around a
//! terminal handler. Stages are nested so that the first stage added is the
//! outermost: it sees the request first and the response last.
//!
//! ```
//! use grappelli_http::{Handler, Middleware, MiddlewareChain, Request, Response};
//! use async_trait::async_trait;
//! use std::sync::Arc;
//!
//! struct Hello;
//!
//! #[async_trait]
//! impl Handler for Hello {
//!     async fn handle(&self, _request: Request) -> grappelli_http::Result<Response> {
//!         Ok(Response::html("hello"))
//!     }
//! }
//!
//! let chain = MiddlewareChain::new(Arc::new(Hello));
//! # let _ = chain;
//! ```

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::Result;
use crate::request::Request;
use crate::response::Response;

/// Handler trait for processing requests.
///
/// All request handlers implement this trait, including the router's
/// terminal dispatch stage and the composed middleware chain itself.
#[async_trait]
pub trait Handler: Send + Sync {
	/// Handle an HTTP request and produce a response.
	///
	/// # Errors
	///
	/// Returns an error if the request cannot be processed; the transport
	/// layer turns unhandled errors into 500-equivalent responses.
	async fn handle(&self, request: Request) -> Result<Response>;
}

/// Blanket implementation so `Arc<dyn Handler>` is itself a handler.
#[async_trait]
impl<T: Handler + ?Sized> Handler for Arc<T> {
	async fn handle(&self, request: Request) -> Result<Response> {
		(**self).handle(request).await
	}
}

/// Middleware trait for request/response processing.
#[async_trait]
pub trait Middleware: Send + Sync {
	/// Process a request through this middleware.
	///
	/// `next` is the rest of the pipeline. Not calling it short-circuits:
	/// no inner stage (including the router) runs for this request.
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response>;

	/// Whether this middleware should run for the given request.
	///
	/// Returning `false` removes the stage from the chain for this request
	/// only. Defaults to `true`.
	fn should_continue(&self, _request: &Request) -> bool {
		true
	}
}

/// Onion-style middleware composition around a terminal handler.
///
/// Stage order is fixed at build time and preserved per request: the stage
/// added first is outermost. The chain itself implements [`Handler`], so it
/// is what the transport layer ultimately invokes.
pub struct MiddlewareChain {
	middlewares: Vec<Arc<dyn Middleware>>,
	handler: Arc<dyn Handler>,
}

impl MiddlewareChain {
	/// Create a chain that terminates in `handler`.
	pub fn new(handler: Arc<dyn Handler>) -> Self {
		Self {
			middlewares: Vec::new(),
			handler,
		}
	}

	/// Add a middleware, builder-style. Earlier additions are outermost.
	pub fn with_middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
		self.middlewares.push(middleware);
		self
	}

	/// Add a middleware in place.
	pub fn add_middleware(&mut self, middleware: Arc<dyn Middleware>) {
		self.middlewares.push(middleware);
	}
}

#[async_trait]
impl Handler for MiddlewareChain {
	async fn handle(&self, request: Request) -> Result<Response> {
		if self.middlewares.is_empty() {
			return self.handler.handle(request).await;
		}

		// Compose right-to-left so the first-added middleware ends up
		// outermost. Stages whose should_continue declines the request are
		// left out of this request's nesting entirely.
		let mut current: Arc<dyn Handler> = self.handler.clone();
		for middleware in self.middlewares.iter().rev() {
			if !middleware.should_continue(&request) {
				continue;
			}
			current = Arc::new(ComposedHandler {
				middleware: middleware.clone(),
				next: current,
			});
		}

		current.handle(request).await
	}
}

/// One middleware wrapped around the rest of the pipeline.
struct ComposedHandler {
	middleware: Arc<dyn Middleware>,
	next: Arc<dyn Handler>,
}

#[async_trait]
impl Handler for ComposedHandler {
	async fn handle(&self, request: Request) -> Result<Response> {
		self.middleware.process(request, self.next.clone()).await
	}
}
