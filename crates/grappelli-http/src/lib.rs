//! HTTP primitives for the grappelli framework.
//!
//! This crate provides the types every other grappelli crate builds on:
//!
//! - [`Request`] / [`Response`] - framework-level request and response
//!   objects, constructed by the transport layer and produced by handlers
//! - [`Handler`] / [`Middleware`] - the core processing abstractions
//! - [`MiddlewareChain`] - onion-style composition of middleware around a
//!   terminal handler
//! - [`Error`] / [`Result`] - the framework-wide error taxonomy

pub mod error;
pub mod middleware;
pub mod request;
pub mod response;

pub use error::{Error, Result};
pub use middleware::{Handler, Middleware, MiddlewareChain};
pub use request::{ParamValue, Request, RequestBuilder};
pub use response::{CookieOptions, Response, SameSite};
