//! End-to-end routing table behavior.

use std::sync::Arc;

use async_trait::async_trait;
use hyper::Method;

use grappelli_http::{Error, Handler, ParamValue, Request, Response, Result};
use grappelli_urls::Router;

struct Endpoint(&'static str);

#[async_trait]
impl Handler for Endpoint {
	async fn handle(&self, _request: Request) -> Result<Response> {
		Ok(Response::ok().with_body(self.0))
	}
}

fn endpoint(name: &'static str) -> Arc<dyn Handler> {
	Arc::new(Endpoint(name))
}

#[test]
fn static_route_shadows_nothing_and_wins_over_dynamic() {
	let mut router = Router::new();
	router
		.add_route("/users/<str:name>", "user_by_name", vec![], endpoint("dyn"))
		.unwrap();
	router
		.add_route("/users/me", "me", vec![], endpoint("static"))
		.unwrap();

	// The static table is consulted first even though the dynamic route was
	// registered earlier and also matches.
	let (route, _) = router.resolve(&Method::GET, "/users/me").unwrap();
	assert_eq!(route.endpoint(), "me");

	let (route, params) = router.resolve(&Method::GET, "/users/alice").unwrap();
	assert_eq!(route.endpoint(), "user_by_name");
	assert_eq!(params["name"], ParamValue::Str("alice".into()));
}

#[test]
fn method_checked_before_pattern_for_dynamic_routes() {
	let mut router = Router::new();
	router
		.add_route(
			"/posts/<int:id>",
			"post_delete",
			vec![Method::DELETE],
			endpoint("delete"),
		)
		.unwrap();
	router
		.add_route("/posts/<str:slug>", "post_show", vec![], endpoint("show"))
		.unwrap();

	// A GET skips the DELETE-only route without pattern work, so the numeric
	// path lands on the later, method-compatible route.
	let (route, params) = router.resolve(&Method::GET, "/posts/42").unwrap();
	assert_eq!(route.endpoint(), "post_show");
	assert_eq!(params["slug"], ParamValue::Str("42".into()));
}

#[test]
fn wrong_method_on_existing_dynamic_path_reports_405() {
	let mut router = Router::new();
	router
		.add_route(
			"/articles/<int:id>",
			"article_update",
			vec![Method::PUT, Method::PATCH],
			endpoint("update"),
		)
		.unwrap();

	let err = router.resolve(&Method::GET, "/articles/9").unwrap_err();
	match err {
		Error::MethodNotAllowed { method, allowed, .. } => {
			assert_eq!(method, Method::GET);
			assert_eq!(allowed, vec![Method::PATCH, Method::PUT]);
		}
		other => panic!("expected MethodNotAllowed, got {:?}", other),
	}

	// A path no route matches under any method is still a plain 404.
	let err = router.resolve(&Method::GET, "/articles/none").unwrap_err();
	assert!(matches!(err, Error::NotFound(_)));
}

#[test]
fn url_for_round_trips_through_resolve() {
	let mut router = Router::new();
	router
		.add_route(
			"/users/<int:id>/files/<path:subpath>",
			"user_file",
			vec![],
			endpoint("file"),
		)
		.unwrap();

	let url = router
		.url_for("user_file", &[("id", "5"), ("subpath", "docs/a.txt")])
		.unwrap();
	assert_eq!(url, "/users/5/files/docs/a.txt");

	let (route, params) = router.resolve(&Method::GET, &url).unwrap();
	assert_eq!(route.endpoint(), "user_file");
	assert_eq!(params["id"], ParamValue::Int(5));
	assert_eq!(params["subpath"], ParamValue::Str("docs/a.txt".into()));
}

#[test]
fn large_table_preserves_registration_order_and_static_speedup() {
	let mut router = Router::new();

	// A broad dynamic route registered first must keep winning over every
	// later dynamic registration that also matches.
	router
		.add_route("/r/<str:any>", "catch_first", vec![], endpoint("first"))
		.unwrap();
	for i in 0..1000 {
		router
			.add_route(
				&format!("/r{}/<str:x>", i),
				format!("dyn{}", i),
				vec![],
				endpoint("later"),
			)
			.unwrap();
		router
			.add_route(&format!("/s{}", i), format!("static{}", i), vec![], endpoint("s"))
			.unwrap();
	}

	let (route, _) = router.resolve(&Method::GET, "/r/anything").unwrap();
	assert_eq!(route.endpoint(), "catch_first");

	let (route, _) = router.resolve(&Method::GET, "/s999").unwrap();
	assert_eq!(route.endpoint(), "static999");

	let (route, _) = router.resolve(&Method::GET, "/r500/x").unwrap();
	assert_eq!(route.endpoint(), "dyn500");
}

#[tokio::test]
async fn router_dispatches_as_terminal_handler() {
	let mut router = Router::new();
	router
		.add_route("/hello", "hello", vec![], endpoint("hello body"))
		.unwrap();

	let request = Request::builder()
		.method(Method::GET)
		.uri("/hello?x=1")
		.build()
		.unwrap();
	let response = router.handle(request).await.unwrap();
	assert_eq!(response.body, "hello body");
}
