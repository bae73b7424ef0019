//! Handler adapters.

use std::future::Future;

use async_trait::async_trait;

use grappelli_http::{Handler, Request, Response, Result};

/// Adapts an async closure into a [`Handler`].
///
/// ```
/// use std::sync::Arc;
/// use grappelli_http::{Request, Response};
/// use grappelli_urls::{FnHandler, Router};
///
/// let mut router = Router::new();
/// router.add_route(
///     "/hello",
///     "hello",
///     vec![],
///     Arc::new(FnHandler::new(|_request: Request| async { Ok(Response::html("hi")) })),
/// ).unwrap();
/// ```
pub struct FnHandler<F> {
	f: F,
}

impl<F, Fut> FnHandler<F>
where
	F: Fn(Request) -> Fut + Send + Sync,
	Fut: Future<Output = Result<Response>> + Send,
{
	pub fn new(f: F) -> Self {
		Self { f }
	}
}

#[async_trait]
impl<F, Fut> Handler for FnHandler<F>
where
	F: Fn(Request) -> Fut + Send + Sync,
	Fut: Future<Output = Result<Response>> + Send,
{
	async fn handle(&self, request: Request) -> Result<Response> {
		(self.f)(request).await
	}
}
