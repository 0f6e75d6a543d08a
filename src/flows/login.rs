//! Redirect to the Facebook login dialog.

// crates.io
use oauth2::http::header::LOCATION;
use rand::{Rng, distr::Alphanumeric};
// self
use crate::{
	_prelude::*,
	context,
	error::ConfigError,
	flows::{Handler, HandlerFuture},
	http::HttpTransport,
	oauth::OAuthClient,
	obs::{FlowKind, FlowOutcome, FlowSpan},
};

const STATE_LEN: usize = 32;

/// Generates an unguessable `state` value for one login attempt.
///
/// [`StateHandler`](crate::flows::StateHandler) keeps it in a short-lived cookie and places it into
/// the request context with [`context::with_state`] for both the login and the callback requests.
pub fn generate_state() -> String {
	rand::rng().sample_iter(Alphanumeric).take(STATE_LEN).map(char::from).collect()
}

/// Answers `302 Found` pointing at the login dialog for the `state` in the request context.
pub struct LoginHandler<C, F>
where
	C: ?Sized + HttpTransport,
{
	oauth: Arc<OAuthClient<C>>,
	failure: F,
}
impl<C, F> LoginHandler<C, F>
where
	C: ?Sized + HttpTransport,
{
	/// Creates a handler redirecting through `oauth`, with `failure` for requests lacking state.
	pub fn new(oauth: Arc<OAuthClient<C>>, failure: F) -> Self {
		Self { oauth, failure }
	}

	/// Builds the redirect, or dispatches to the failure continuation.
	pub async fn serve<B, R>(&self, request: Request<B>) -> Response<R>
	where
		R: Default,
		F: Handler<B, R>,
	{
		let span = FlowSpan::new(FlowKind::Login, "redirect");

		let redirect = span.in_scope(|| self.redirect(request.extensions()));

		match redirect {
			Ok(response) => {
				span.record(FlowOutcome::Success);

				response
			},
			Err(e) => {
				span.record(FlowOutcome::Failure);

				self.failure
					.call(context::map_context(request, |ctx| context::with_error(ctx, e)))
					.await
			},
		}
	}

	fn redirect<R>(&self, ctx: &Extensions) -> Result<Response<R>>
	where
		R: Default,
	{
		let state = context::state_from_context(ctx)?;
		let location = self.oauth.authorize_url(&state);

		Response::builder()
			.status(StatusCode::FOUND)
			.header(LOCATION, location.as_str())
			.body(R::default())
			.map_err(|e| ConfigError::from(e).into())
	}
}
impl<B, R, C, F> Handler<B, R> for LoginHandler<C, F>
where
	B: 'static + Send,
	R: 'static + Send + Default,
	C: ?Sized + HttpTransport,
	F: Handler<B, R>,
{
	fn call(&self, request: Request<B>) -> HandlerFuture<'_, Response<R>> {
		Box::pin(self.serve(request))
	}
}
impl<C, F> Clone for LoginHandler<C, F>
where
	C: ?Sized + HttpTransport,
	F: Clone,
{
	fn clone(&self) -> Self {
		Self { oauth: self.oauth.clone(), failure: self.failure.clone() }
	}
}
impl<C, F> Debug for LoginHandler<C, F>
where
	C: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("LoginHandler").field("oauth", &self.oauth).finish_non_exhaustive()
	}
}
