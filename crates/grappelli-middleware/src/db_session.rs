//! Per-request resource sessions.
//!
//! Wraps the inner pipeline in a session obtained from a
//! [`SessionBackend`], typically a database transaction scope. A successful
//! response commits; any error rolls back; the session is released
//! unconditionally, including when the request task is cancelled mid-flight,
//! via a drop guard.

use std::sync::Arc;

use async_trait::async_trait;

use grappelli_http::{Handler, Middleware, Request, Response, Result};

/// One session's worth of resource state.
#[async_trait]
pub trait ResourceSession: Send + Sync {
	/// Persist the work done during the request.
	async fn commit(&mut self) -> Result<()>;

	/// Discard the work done during the request.
	async fn rollback(&mut self) -> Result<()>;

	/// Return the underlying resource to its pool.
	///
	/// Must be cheap, synchronous and idempotent: it runs on every exit
	/// path, including drop during task cancellation.
	fn release(&mut self);
}

/// Source of per-request sessions.
#[async_trait]
pub trait SessionBackend: Send + Sync {
	/// Open a session for one request.
	///
	/// # Errors
	///
	/// An error here fails the request before any inner stage runs.
	async fn begin(&self) -> Result<Box<dyn ResourceSession>>;
}

/// Resource session middleware.
pub struct SessionMiddleware {
	backend: Arc<dyn SessionBackend>,
}

impl SessionMiddleware {
	pub fn new(backend: Arc<dyn SessionBackend>) -> Self {
		Self { backend }
	}
}

/// Holds the session so release runs even when the future is dropped.
struct SessionGuard {
	session: Option<Box<dyn ResourceSession>>,
}

impl SessionGuard {
	async fn commit(&mut self) -> Result<()> {
		match self.session.as_mut() {
			Some(session) => session.commit().await,
			None => Ok(()),
		}
	}

	async fn rollback(&mut self) -> Result<()> {
		match self.session.as_mut() {
			Some(session) => session.rollback().await,
			None => Ok(()),
		}
	}
}

impl Drop for SessionGuard {
	fn drop(&mut self) {
		if let Some(session) = self.session.as_mut() {
			session.release();
		}
	}
}

#[async_trait]
impl Middleware for SessionMiddleware {
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response> {
		let session = self.backend.begin().await?;
		let mut guard = SessionGuard {
			session: Some(session),
		};

		match next.handle(request).await {
			Ok(response) => match guard.commit().await {
				Ok(()) => Ok(response),
				Err(commit_err) => {
					if let Err(rollback_err) = guard.rollback().await {
						tracing::error!(error = %rollback_err, "rollback after failed commit also failed");
					}
					Err(commit_err)
				}
			},
			Err(err) => {
				if let Err(rollback_err) = guard.rollback().await {
					tracing::error!(error = %rollback_err, "rollback failed");
				}
				Err(err)
			}
		}
	}
}
