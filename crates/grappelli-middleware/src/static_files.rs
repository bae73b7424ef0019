//! Static file serving.
//!
//! Serves files from one or more mounted directories, each under its own URL
//! prefix. Mounts are consulted in the order they were added, so blueprint
//! directories registered before the application-wide one shadow it. Any
//! path under a mounted prefix short-circuits the chain: with the file on a
//! hit, with a 404 when no mount has it. The router is never consulted for
//! static paths; only paths outside every prefix fall through.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use hyper::Method;

use grappelli_http::{Handler, Middleware, Request, Response, Result};

struct StaticMount {
	url_prefix: String,
	directory: PathBuf,
}

/// Static file middleware.
#[derive(Default)]
pub struct StaticFilesMiddleware {
	mounts: Vec<StaticMount>,
}

impl StaticFilesMiddleware {
	pub fn new() -> Self {
		Self::default()
	}

	/// Mount a directory under a URL prefix, builder-style. Earlier mounts
	/// take precedence when prefixes overlap.
	pub fn with_mount(mut self, url_prefix: impl Into<String>, directory: impl Into<PathBuf>) -> Self {
		self.mounts.push(StaticMount {
			url_prefix: url_prefix.into(),
			directory: directory.into(),
		});
		self
	}

	/// Whether the request path falls under this mount's URL prefix.
	fn prefix_matches(mount: &StaticMount, request_path: &str) -> bool {
		request_path
			.strip_prefix(&mount.url_prefix)
			.is_some_and(|rest| rest.starts_with('/'))
	}

	/// Resolve a request path against one mount, rejecting anything that
	/// would escape the mounted directory.
	fn resolve_path(mount: &StaticMount, request_path: &str) -> Option<PathBuf> {
		let rest = request_path.strip_prefix(&mount.url_prefix)?;
		let rest = rest.strip_prefix('/')?;
		if rest.is_empty() {
			return None;
		}

		// Only plain path segments are allowed; "..", absolute components
		// and drive prefixes would escape the mount.
		let relative = Path::new(rest);
		if !relative.components().all(|c| matches!(c, Component::Normal(_))) {
			return None;
		}

		Some(mount.directory.join(relative))
	}

	async fn serve(path: &Path, method: &Method) -> Option<Response> {
		let metadata = tokio::fs::metadata(path).await.ok()?;
		if !metadata.is_file() {
			return None;
		}

		let content_type = mime_guess::from_path(path).first_or_octet_stream();
		let body = if *method == Method::HEAD {
			Bytes::new()
		} else {
			Bytes::from(tokio::fs::read(path).await.ok()?)
		};

		Some(
			Response::ok()
				.with_header("Content-Type", content_type.as_ref())
				.with_header("Content-Length", &metadata.len().to_string())
				.with_body(body)
				.with_stop_chain(true),
		)
	}
}

#[async_trait]
impl Middleware for StaticFilesMiddleware {
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response> {
		let mut prefix_matched = false;
		for mount in &self.mounts {
			if !Self::prefix_matches(mount, request.path()) {
				continue;
			}
			prefix_matched = true;
			let Some(path) = Self::resolve_path(mount, request.path()) else {
				continue;
			};
			if let Some(response) = Self::serve(&path, &request.method).await {
				tracing::debug!(path = %request.path(), file = %path.display(), "static hit");
				return Ok(response);
			}
		}

		// Static prefixes own their URL space: a miss under a mounted
		// prefix is answered here, not by the router.
		if prefix_matched {
			tracing::debug!(path = %request.path(), "static miss");
			return Ok(Response::not_found()
				.with_body("<h1>404 Not Found</h1>")
				.with_stop_chain(true));
		}

		next.handle(request).await
	}

	fn should_continue(&self, request: &Request) -> bool {
		matches!(request.method, Method::GET | Method::HEAD)
	}
}
