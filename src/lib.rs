//! # Grappelli
//!
//! A request-dispatch core for HTTP application servers: a routing table
//! with typed path parameters, reverse URL generation, and an onion-style
//! middleware pipeline.
//!
//! ## Quick Example
//!
//! ```
//! use std::sync::Arc;
//! use grappelli::prelude::*;
//!
//! # tokio_test::block_on(async {
//! let mut app = App::new(Settings::default());
//! app.route(
//!     "/users/<int:id>",
//!     "user_show",
//!     vec![],
//!     Arc::new(FnHandler::new(|request: Request| async move {
//!         let id = request.path_param("id").and_then(ParamValue::as_int).unwrap_or(0);
//!         Ok(Response::html(format!("<h1>user {}</h1>", id)))
//!     })),
//! ).unwrap();
//!
//! assert_eq!(app.url_for("user_show", &[("id", "42")]).unwrap(), "/users/42");
//!
//! let handler = app.into_handler();
//! let request = Request::builder().method(Method::GET).uri("/users/42").build().unwrap();
//! let response = handler.handle(request).await.unwrap();
//! assert_eq!(response.status, StatusCode::OK);
//! # });
//! ```

pub mod app;
pub mod settings;

pub use app::App;
pub use settings::Settings;

pub use grappelli_http::{
	CookieOptions, Error, Handler, Middleware, MiddlewareChain, ParamValue, Request,
	RequestBuilder, Response, Result, SameSite,
};
pub use grappelli_middleware::{
	CsrfConfig, CsrfMiddleware, ResourceSession, SecurityHeadersConfig,
	SecurityHeadersMiddleware, SessionBackend, SessionMiddleware, StaticFilesMiddleware,
};
pub use grappelli_urls::{Blueprint, ConverterKind, FnHandler, PathPattern, Route, Router};

pub use hyper::{Method, StatusCode};

pub mod prelude {
	pub use crate::{
		App, Blueprint, Error, FnHandler, Handler, Method, Middleware, MiddlewareChain,
		ParamValue, Request, Response, Result, Router, Settings, StatusCode,
	};

	pub use async_trait::async_trait;
}
