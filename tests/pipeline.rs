//! Full pipeline behavior: settings, routing, middleware stages and the
//! terminal dispatch, assembled the way a real application would.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;

use grappelli::prelude::*;
use grappelli::{ResourceSession, SessionBackend};

struct PageHandler(&'static str);

#[async_trait]
impl Handler for PageHandler {
	async fn handle(&self, _request: Request) -> Result<Response> {
		Ok(Response::html(self.0))
	}
}

fn page(body: &'static str) -> Arc<dyn Handler> {
	Arc::new(PageHandler(body))
}

fn get(path: &str) -> Request {
	Request::builder()
		.method(Method::GET)
		.uri(path)
		.build()
		.unwrap()
}

#[tokio::test]
async fn dispatch_with_default_settings() {
	let mut app = App::new(Settings::default());
	app.route("/", "index", vec![], page("<h1>index</h1>")).unwrap();

	let handler = app.into_handler();
	let response = handler.handle(get("/")).await.unwrap();

	assert_eq!(response.status, StatusCode::OK);
	assert_eq!(response.body, "<h1>index</h1>");
	// Ambient stages ran: security headers and a CSRF cookie for the
	// cookieless request.
	assert_eq!(
		response.headers.get("x-content-type-options").unwrap(),
		"nosniff"
	);
	let cookie = response.headers.get("set-cookie").unwrap().to_str().unwrap();
	assert!(cookie.starts_with("csrf_token="));
}

#[tokio::test]
async fn unknown_path_is_404_with_headers() {
	let app = App::new(Settings::default());
	let handler = app.into_handler();

	let response = handler.handle(get("/nope")).await.unwrap();
	assert_eq!(response.status, StatusCode::NOT_FOUND);
	assert_eq!(response.headers.get("x-frame-options").unwrap(), "DENY");
}

#[tokio::test]
async fn post_without_csrf_token_never_reaches_handler() {
	let mut app = App::new(Settings::default());
	app.route("/submit", "submit", vec![Method::POST], page("saved")).unwrap();

	let handler = app.into_handler();
	let request = Request::builder()
		.method(Method::POST)
		.uri("/submit")
		.body("title=x")
		.build()
		.unwrap();

	let response = handler.handle(request).await.unwrap();
	assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn post_with_matching_csrf_token_dispatches() {
	let mut app = App::new(Settings::default());
	app.route("/submit", "submit", vec![Method::POST], page("saved")).unwrap();

	let handler = app.into_handler();
	let request = Request::builder()
		.method(Method::POST)
		.uri("/submit")
		.header("Cookie", "csrf_token=tok")
		.body("csrf_token=tok&title=x")
		.build()
		.unwrap();

	let response = handler.handle(request).await.unwrap();
	assert_eq!(response.status, StatusCode::OK);
	assert_eq!(response.body, "saved");
}

#[tokio::test]
async fn exempt_path_accepts_tokenless_post() {
	let mut app = App::new(Settings::default());
	app.route("/hooks/pay", "pay_hook", vec![Method::POST], page("received"))
		.unwrap();
	app.csrf_exempt("/hooks/pay");

	let handler = app.into_handler();
	let request = Request::builder()
		.method(Method::POST)
		.uri("/hooks/pay")
		.body("event=charge")
		.build()
		.unwrap();

	let response = handler.handle(request).await.unwrap();
	assert_eq!(response.body, "received");
}

#[tokio::test]
async fn static_files_shadow_routes_and_skip_sessions() {
	struct CountingBackend {
		sessions: Arc<Mutex<u32>>,
	}

	struct NoopSession;

	#[async_trait]
	impl ResourceSession for NoopSession {
		async fn commit(&mut self) -> Result<()> {
			Ok(())
		}
		async fn rollback(&mut self) -> Result<()> {
			Ok(())
		}
		fn release(&mut self) {}
	}

	#[async_trait]
	impl SessionBackend for CountingBackend {
		async fn begin(&self) -> Result<Box<dyn ResourceSession>> {
			*self.sessions.lock().unwrap() += 1;
			Ok(Box::new(NoopSession))
		}
	}

	let dir = TempDir::new().unwrap();
	std::fs::write(dir.path().join("app.css"), ".a{}").unwrap();

	let sessions = Arc::new(Mutex::new(0));
	let mut app = App::new(Settings {
		static_dir: Some(dir.path().to_path_buf()),
		..Settings::default()
	});
	app.route("/", "index", vec![], page("index")).unwrap();
	app.set_session_backend(Arc::new(CountingBackend {
		sessions: sessions.clone(),
	}));

	let handler = app.into_handler();

	// A static hit short-circuits before the session stage.
	let response = handler.handle(get("/static/app.css")).await.unwrap();
	assert_eq!(response.body, ".a{}");
	assert_eq!(response.headers.get("content-type").unwrap(), "text/css");
	assert_eq!(*sessions.lock().unwrap(), 0);

	// A routed request opens exactly one session.
	let response = handler.handle(get("/")).await.unwrap();
	assert_eq!(response.body, "index");
	assert_eq!(*sessions.lock().unwrap(), 1);
}

#[tokio::test]
async fn static_prefix_owns_its_url_space_on_misses() {
	let dir = TempDir::new().unwrap();
	std::fs::write(dir.path().join("app.css"), ".a{}").unwrap();

	let mut app = App::new(Settings {
		static_dir: Some(dir.path().to_path_buf()),
		..Settings::default()
	});
	// A route under the static prefix must never see requests for it.
	app.route("/static/<str:name>", "shadowed", vec![], page("should not be reached"))
		.unwrap();

	let handler = app.into_handler();

	let response = handler.handle(get("/static/missing.js")).await.unwrap();
	assert_eq!(response.status, StatusCode::NOT_FOUND);

	let response = handler.handle(get("/static/app.css")).await.unwrap();
	assert_eq!(response.body, ".a{}");
}

#[tokio::test]
async fn blueprint_statics_take_precedence_over_app_statics() {
	let app_dir = TempDir::new().unwrap();
	std::fs::create_dir(app_dir.path().join("admin")).unwrap();
	std::fs::write(app_dir.path().join("admin").join("ui.js"), "app copy").unwrap();
	let admin_dir = TempDir::new().unwrap();
	std::fs::write(admin_dir.path().join("ui.js"), "admin copy").unwrap();

	let mut app = App::new(Settings {
		static_dir: Some(app_dir.path().to_path_buf()),
		..Settings::default()
	});
	let admin = Blueprint::new("admin", "")
		.with_static_folder(admin_dir.path())
		.with_static_url_path("/static/admin")
		.route("/admin", "home", vec![], page("admin home"));
	app.register_blueprint(&admin).unwrap();

	let handler = app.into_handler();

	let response = handler.handle(get("/static/admin/ui.js")).await.unwrap();
	assert_eq!(response.body, "admin copy");

	let response = handler.handle(get("/admin")).await.unwrap();
	assert_eq!(response.body, "admin home");
}

#[tokio::test]
async fn wrong_method_yields_405_with_allow() {
	let mut app = App::new(Settings::default());
	app.route("/submit", "submit", vec![Method::POST], page("saved")).unwrap();

	let handler = app.into_handler();
	let response = handler.handle(get("/submit")).await.unwrap();

	assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
	assert_eq!(response.headers.get("allow").unwrap(), "POST");
}
