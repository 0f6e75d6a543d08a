//! Minimal "Login with Facebook" web server.
//!
//! Reads `FACEBOOK_CLIENT_ID` and `FACEBOOK_CLIENT_SECRET` from the environment, plus an
//! optional `FACEBOOK_REDIRECT_URI` (defaults to `http://localhost:8080/callback`, which must be
//! listed under the app's "Valid OAuth Redirect URIs"). Run with `--features tracing` to see flow
//! spans.

// std
use std::{env, sync::Arc};
// crates.io
use axum::{
	Router,
	body::Body,
	extract::{Request, State},
	http::{HeaderValue, Response, header::CONTENT_TYPE},
	routing::get,
};
use color_eyre::{Result, eyre::WrapErr};
use tokio::net::TcpListener;
// self
use facebook_login::{
	config::LoginConfig,
	context,
	flows::{DefaultFailureHandler, FacebookLogin, Handler, StateCookieConfig, StateHandler},
	url::Url,
};

const LISTEN_ADDR: &str = "127.0.0.1:8080";

type DynHandler = Arc<dyn Handler<(), String>>;

#[derive(Clone)]
struct App {
	login: DynHandler,
	callback: DynHandler,
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;
	tracing_subscriber::fmt::init();

	let redirect_uri = Url::parse(
		&env::var("FACEBOOK_REDIRECT_URI")
			.unwrap_or_else(|_| "http://localhost:8080/callback".into()),
	)?;
	// Browsers drop `Secure` cookies set over plain HTTP.
	let state_cookie = match redirect_uri.scheme() {
		"https" => StateCookieConfig::default(),
		_ => StateCookieConfig::debug_only(),
	};
	let config = LoginConfig::builder(env::var("FACEBOOK_CLIENT_ID").wrap_err("FACEBOOK_CLIENT_ID")?)
		.client_secret(env::var("FACEBOOK_CLIENT_SECRET").wrap_err("FACEBOOK_CLIENT_SECRET")?)
		.redirect_uri(redirect_uri)
		.build()?;
	let login = FacebookLogin::new(config)?;
	let graph = login.graph().clone();
	let welcome = move |request: facebook_login::oauth::oauth2::http::Request<()>| {
		let graph = graph.clone();

		async move {
			let body = match context::user_from_context(request.extensions()) {
				Ok(user) => {
					let picture = graph
						.picture_url(&user, 180, 180)
						.map(|url| format!("\nPicture: {url}"))
						.unwrap_or_default();

					format!("Welcome {}! Your email is {}.{picture}", user.name, user.email)
				},
				Err(e) => e.to_string(),
			};
			let mut response = Response::new(body);

			response
				.headers_mut()
				.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"));

			response
		}
	};
	let app = App {
		login: Arc::new(StateHandler::new(
			state_cookie.clone(),
			login.login_handler(DefaultFailureHandler),
		)),
		callback: Arc::new(StateHandler::new(
			state_cookie,
			login.callback_handler(welcome, DefaultFailureHandler),
		)),
	};
	let router = Router::new()
		.route("/", get(home))
		.route("/login", get(start_login))
		.route("/callback", get(finish_login))
		.with_state(app);
	let listener = TcpListener::bind(LISTEN_ADDR).await?;

	println!("Listening on http://{LISTEN_ADDR}.");

	axum::serve(listener, router).await?;

	Ok(())
}

async fn home() -> Response<Body> {
	let mut response =
		Response::new(Body::from("<p><a href=\"/login\">Login with Facebook</a></p>"));

	response.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static("text/html; charset=utf-8"));

	response
}

async fn start_login(State(app): State<App>, request: Request) -> Response<Body> {
	app.login.call(request.map(|_| ())).await.map(Body::from)
}

async fn finish_login(State(app): State<App>, request: Request) -> Response<Body> {
	app.callback.call(request.map(|_| ())).await.map(Body::from)
}
