//! Middleware stages for the grappelli framework.
//!
//! Each stage implements [`grappelli_http::Middleware`] and wraps the rest
//! of the pipeline. The canonical stage order, outermost first, is:
//!
//! 1. [`SecurityHeadersMiddleware`] so every response leaving the server
//!    carries the baseline headers,
//! 2. [`CsrfMiddleware`] so forged requests are rejected before any work,
//! 3. [`StaticFilesMiddleware`] so asset requests never touch the router
//!    or a resource session,
//! 4. [`SessionMiddleware`] so only application handlers pay for a session,
//! 5. the router as the terminal handler.

pub mod csrf;
pub mod db_session;
pub mod security_headers;
pub mod static_files;

pub use csrf::{CsrfConfig, CsrfMiddleware};
pub use db_session::{ResourceSession, SessionBackend, SessionMiddleware};
pub use security_headers::{SecurityHeadersConfig, SecurityHeadersMiddleware};
pub use static_files::StaticFilesMiddleware;
