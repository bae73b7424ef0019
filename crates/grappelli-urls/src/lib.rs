//! URL routing for the grappelli framework.
//!
//! The route table distinguishes static routes (no parameter tokens, matched
//! by exact string equality) from dynamic routes (patterns like
//! `/users/<int:id>`, matched by a compiled pattern plus typed converters).
//! Static lookups are O(1); dynamic routes are scanned in registration
//! order, which is the documented match-priority contract.
//!
//! The [`Router`] also implements [`grappelli_http::Handler`], acting as the
//! terminal dispatch stage of the middleware chain: it resolves the request,
//! injects converted path parameters and invokes the matched handler,
//! translating resolution failures into 404/405 responses.

pub mod blueprint;
pub mod converters;
pub mod handlers;
pub mod pattern;
pub mod route;
pub mod router;

pub use blueprint::Blueprint;
pub use converters::ConverterKind;
pub use handlers::FnHandler;
pub use pattern::PathPattern;
pub use route::Route;
pub use router::Router;
