//! Login flows exposed as request handlers, plus the facade that builds them.
//!
//! A complete login wires three handlers into the host server:
//!
//! - [`LoginHandler`] redirects to the Facebook dialog;
//! - [`CallbackHandler`] validates `state`, exchanges the code, and continues with
//! - [`ProfileHandler`], which resolves the user and dispatches to the caller's continuations.
//!
//! [`StateHandler`] wraps the login and callback handlers and keeps the CSRF `state` in a
//! short-lived cookie. [`ProfileHandler`] also stands alone when another component already placed
//! a token in the request context.

pub mod callback;
pub mod handler;
pub mod login;
pub mod profile;
pub mod state;

pub use callback::*;
pub use handler::*;
pub use login::*;
pub use profile::*;
pub use state::*;

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, User},
	config::LoginConfig,
	graph::GraphClient,
	http::HttpTransport,
	oauth::OAuthClient,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Login facade specialized for the crate's default reqwest transport.
pub type ReqwestFacebookLogin = FacebookLogin<ReqwestHttpClient>;

/// Owns the login configuration and transport, and builds the flow handlers.
///
/// Cloning is cheap; every clone shares the same transport.
pub struct FacebookLogin<C>
where
	C: ?Sized + HttpTransport,
{
	config: LoginConfig,
	oauth: Arc<OAuthClient<C>>,
	graph: GraphClient<C>,
}
impl<C> FacebookLogin<C>
where
	C: ?Sized + HttpTransport,
{
	/// Creates a facade that reuses the caller-provided transport.
	pub fn with_http_client(config: LoginConfig, http_client: impl Into<Arc<C>>) -> Result<Self> {
		let http_client = http_client.into();
		let oauth = OAuthClient::from_config(&config, http_client.clone())?;
		let graph = GraphClient::new(&config, http_client);

		Ok(Self { config, oauth: Arc::new(oauth), graph })
	}

	/// Returns the validated configuration.
	pub fn config(&self) -> &LoginConfig {
		&self.config
	}

	/// Returns the Graph API client.
	pub fn graph(&self) -> &GraphClient<C> {
		&self.graph
	}

	/// Builds the login dialog URL for `state`.
	pub fn authorize_url(&self, state: &str) -> Url {
		self.oauth.authorize_url(state)
	}

	/// Exchanges an authorization code for an access token.
	pub async fn exchange_code(&self, code: &str) -> Result<AccessToken> {
		self.oauth.exchange_code(code).await
	}

	/// Fetches and validates the user `token` belongs to.
	pub async fn fetch_user(&self, token: &AccessToken) -> Result<User> {
		self.graph.me(token).await?.into_user()
	}

	/// Builds the redirect handler.
	pub fn login_handler<F>(&self, failure: F) -> LoginHandler<C, F> {
		LoginHandler::new(self.oauth.clone(), failure)
	}

	/// Builds the profile handler for requests that already carry a token.
	pub fn profile_handler<S, F>(&self, success: S, failure: F) -> ProfileHandler<C, S, F> {
		ProfileHandler::new(self.graph.clone(), success, failure)
	}

	/// Builds the callback handler, which ends in `success` or `failure`.
	pub fn callback_handler<S, F>(&self, success: S, failure: F) -> CallbackHandler<C, S, F> {
		CallbackHandler::new(self.oauth.clone(), self.profile_handler(success, failure))
	}
}
#[cfg(feature = "reqwest")]
impl FacebookLogin<ReqwestHttpClient> {
	/// Creates a facade that provisions its own reqwest-backed transport.
	pub fn new(config: LoginConfig) -> Result<Self> {
		Self::with_http_client(config, ReqwestHttpClient::default())
	}
}
impl<C> Clone for FacebookLogin<C>
where
	C: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self { config: self.config.clone(), oauth: self.oauth.clone(), graph: self.graph.clone() }
	}
}
impl<C> Debug for FacebookLogin<C>
where
	C: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("FacebookLogin")
			.field("config", &self.config)
			.field("oauth", &self.oauth)
			.field("graph", &self.graph)
			.finish()
	}
}
