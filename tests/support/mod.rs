//! Shared fixtures for the login integration tests.

#![allow(dead_code)]

// std
use std::sync::{
	Arc,
	atomic::{AtomicUsize, Ordering},
};
// crates.io
use httpmock::prelude::*;
// self
use facebook_login::{
	auth::AccessToken,
	config::LoginConfig,
	context,
	flows::{FacebookLogin, Handler, ReqwestFacebookLogin},
	http::ReqwestHttpClient,
	oauth::oauth2::http::{Extensions, Request, Response, StatusCode},
	url::Url,
};

pub const CLIENT_ID: &str = "app-it";
pub const CLIENT_SECRET: &str = "secret-it";
pub const REDIRECT_URI: &str = "https://app.example.com/callback";
pub const ME_PATH: &str = "/v2.9/me";
pub const TOKEN_PATH: &str = "/v2.9/oauth/access_token";

/// Builds a configuration whose endpoints all live on `server`.
pub fn build_config(server: &MockServer) -> LoginConfig {
	LoginConfig::builder(CLIENT_ID)
		.client_secret(CLIENT_SECRET)
		.redirect_uri(Url::parse(REDIRECT_URI).expect("Redirect URI should parse successfully."))
		.authorization_endpoint(
			Url::parse(&server.url("/v2.9/dialog/oauth"))
				.expect("Mock authorization endpoint should parse successfully."),
		)
		.token_endpoint(
			Url::parse(&server.url(TOKEN_PATH)).expect("Mock token endpoint should parse successfully."),
		)
		.graph_endpoint(
			Url::parse(&server.url("/v2.9/")).expect("Mock Graph endpoint should parse successfully."),
		)
		.build()
		.expect("Login configuration should build successfully.")
}

/// Builds a reqwest client that accepts the self-signed certificate served by `httpmock`.
pub fn insecure_http_client() -> ReqwestHttpClient {
	let client = facebook_login::reqwest::Client::builder()
		.danger_accept_invalid_certs(true)
		.danger_accept_invalid_hostnames(true)
		.build()
		.expect("Insecure reqwest client should build successfully.");

	ReqwestHttpClient::with_client(client)
}

/// Builds a reqwest-backed facade pointed at `server`.
pub fn build_login(server: &MockServer) -> ReqwestFacebookLogin {
	FacebookLogin::with_http_client(build_config(server), insecure_http_client())
		.expect("Login facade should build successfully.")
}

/// Request carrying `token` in its context.
pub fn request_with_token(token: &str) -> Request<()> {
	let mut request = Request::new(());

	*request.extensions_mut() = context::with_token(Extensions::new(), AccessToken::new(token));

	request
}

/// Callback request for `query` whose context expects `state`.
pub fn callback_request(query: &str, state: &str) -> Request<()> {
	let mut request = Request::builder()
		.uri(format!("/callback?{query}"))
		.body(())
		.expect("Callback request should build successfully.");

	*request.extensions_mut() = context::with_state(Extensions::new(), state);

	request
}

/// Counts continuation invocations and renders what each one saw.
#[derive(Clone, Debug, Default)]
pub struct Outcomes {
	successes: Arc<AtomicUsize>,
	failures: Arc<AtomicUsize>,
}
impl Outcomes {
	/// Success continuation answering `200` with `id|name|email`.
	pub fn success(&self) -> impl Handler<(), String> + Clone + use<> {
		let hits = self.successes.clone();

		move |request: Request<()>| {
			hits.fetch_add(1, Ordering::SeqCst);

			async move {
				let user = context::user_from_context(request.extensions())
					.expect("Success continuation should see the user.");

				Response::new(format!("{}|{}|{}", user.id, user.name, user.email))
			}
		}
	}

	/// Failure continuation answering `400` with the attached error's message.
	pub fn failure(&self) -> impl Handler<(), String> + Clone + use<> {
		let hits = self.failures.clone();

		move |request: Request<()>| {
			hits.fetch_add(1, Ordering::SeqCst);

			async move {
				let error = context::error_from_context(request.extensions())
					.expect("Failure continuation should see the error.");
				let mut response = Response::new(error.to_string());

				*response.status_mut() = StatusCode::BAD_REQUEST;

				response
			}
		}
	}

	pub fn successes(&self) -> usize {
		self.successes.load(Ordering::SeqCst)
	}

	pub fn failures(&self) -> usize {
		self.failures.load(Ordering::SeqCst)
	}
}
