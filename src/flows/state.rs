//! CSRF `state` carried between the login redirect and the callback in a short-lived cookie.

// crates.io
use cookie::{Cookie, SameSite};
use oauth2::http::{
	HeaderMap,
	header::{COOKIE, HeaderValue, SET_COOKIE},
};
// self
use crate::{
	_prelude::*,
	context,
	flows::{Handler, HandlerFuture, generate_state},
};

/// Default name of the state cookie.
pub const DEFAULT_STATE_COOKIE: &str = "facebook_login_state";

const DEFAULT_STATE_MAX_AGE: Duration = Duration::seconds(60);

/// Attributes of the state cookie issued by [`StateHandler`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateCookieConfig {
	/// Cookie name.
	pub name: String,
	/// Optional `Domain` attribute.
	pub domain: Option<String>,
	/// `Path` attribute.
	pub path: String,
	/// `Max-Age` attribute; the login must complete within this window.
	pub max_age: Duration,
	/// Whether the cookie is hidden from scripts.
	pub http_only: bool,
	/// Whether the cookie is only sent over HTTPS.
	pub secure: bool,
}
impl StateCookieConfig {
	/// Default attributes with `Secure` turned off, for plain-HTTP development servers only.
	pub fn debug_only() -> Self {
		Self { secure: false, ..Default::default() }
	}

	/// Overrides the cookie name.
	pub fn name(mut self, name: impl Into<String>) -> Self {
		self.name = name.into();

		self
	}

	/// Sets the `Domain` attribute.
	pub fn domain(mut self, domain: impl Into<String>) -> Self {
		self.domain = Some(domain.into());

		self
	}

	/// Overrides the cookie lifetime.
	pub fn max_age(mut self, max_age: Duration) -> Self {
		self.max_age = max_age;

		self
	}

	/// Builds the cookie carrying `state`.
	pub fn issue(&self, state: &str) -> Cookie<'static> {
		let mut builder = Cookie::build((self.name.clone(), state.to_owned()))
			.path(self.path.clone())
			.max_age(self.max_age)
			.http_only(self.http_only)
			.secure(self.secure)
			.same_site(SameSite::Lax);

		if let Some(domain) = &self.domain {
			builder = builder.domain(domain.clone());
		}

		builder.build()
	}

	/// Reads a non-empty state cookie from the request headers.
	pub fn read(&self, headers: &HeaderMap) -> Option<String> {
		headers
			.get_all(COOKIE)
			.iter()
			.filter_map(|value| value.to_str().ok())
			.flat_map(Cookie::split_parse)
			.filter_map(|cookie| cookie.ok())
			.find(|cookie| cookie.name() == self.name && !cookie.value().is_empty())
			.map(|cookie| cookie.value().to_owned())
	}
}
impl Default for StateCookieConfig {
	fn default() -> Self {
		Self {
			name: DEFAULT_STATE_COOKIE.into(),
			domain: None,
			path: "/".into(),
			max_age: DEFAULT_STATE_MAX_AGE,
			http_only: true,
			secure: true,
		}
	}
}

/// Places the login `state` into the request context before calling `inner`.
///
/// A request that already carries the state cookie reuses its value. Otherwise a fresh state is
/// generated and issued as a cookie on `inner`'s response. Wrap both the login and the callback
/// handlers so the callback sees the value the login redirect used.
pub struct StateHandler<H> {
	config: StateCookieConfig,
	inner: H,
}
impl<H> StateHandler<H> {
	/// Wraps `inner` with the cookie described by `config`.
	pub fn new(config: StateCookieConfig, inner: H) -> Self {
		Self { config, inner }
	}

	/// Returns the cookie attributes.
	pub fn config(&self) -> &StateCookieConfig {
		&self.config
	}

	/// Resolves the state and awaits `inner`.
	pub async fn serve<B, R>(&self, request: Request<B>) -> Response<R>
	where
		H: Handler<B, R>,
	{
		if let Some(state) = self.config.read(request.headers()) {
			return self
				.inner
				.call(context::map_context(request, |ctx| context::with_state(ctx, &state)))
				.await;
		}

		let state = generate_state();
		let cookie = self.config.issue(&state);
		let mut response = self
			.inner
			.call(context::map_context(request, |ctx| context::with_state(ctx, &state)))
			.await;

		if let Ok(value) = HeaderValue::from_str(&cookie.to_string()) {
			response.headers_mut().append(SET_COOKIE, value);
		}

		response
	}
}
impl<B, R, H> Handler<B, R> for StateHandler<H>
where
	B: 'static + Send,
	R: 'static + Send,
	H: Handler<B, R>,
{
	fn call(&self, request: Request<B>) -> HandlerFuture<'_, Response<R>> {
		Box::pin(self.serve(request))
	}
}
impl<H> Clone for StateHandler<H>
where
	H: Clone,
{
	fn clone(&self) -> Self {
		Self { config: self.config.clone(), inner: self.inner.clone() }
	}
}
impl<H> Debug for StateHandler<H> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("StateHandler").field("config", &self.config).finish_non_exhaustive()
	}
}
