//! Handler abstraction shared by the login flows and the continuations they dispatch to.

// crates.io
use oauth2::http::header::{CONTENT_TYPE, HeaderValue};
// self
use crate::{_prelude::*, context};

/// Boxed `Send` future returned by [`Handler::call`].
pub type HandlerFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a + Send>>;

/// Request handler over `oauth2::http` requests.
///
/// Every flow in this crate is a handler, and so are the success and failure continuations callers
/// plug into them. Any `Fn(Request<B>) -> impl Future<Output = Response<R>>` closure qualifies.
pub trait Handler<B, R>
where
	Self: Send + Sync,
{
	/// Handles `request` and produces a response.
	fn call(&self, request: Request<B>) -> HandlerFuture<'_, Response<R>>;
}
impl<B, R, F, Fut> Handler<B, R> for F
where
	F: Send + Sync + Fn(Request<B>) -> Fut,
	Fut: 'static + Send + Future<Output = Response<R>>,
{
	fn call(&self, request: Request<B>) -> HandlerFuture<'_, Response<R>> {
		Box::pin(self(request))
	}
}

/// Failure continuation answering `400 Bad Request` with the attached error's message.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultFailureHandler;
impl<B, R> Handler<B, R> for DefaultFailureHandler
where
	R: 'static + Send + From<String>,
{
	fn call(&self, request: Request<B>) -> HandlerFuture<'_, Response<R>> {
		let message = match context::error_from_context(request.extensions()) {
			Some(error) => error.to_string(),
			None => "Login failed.".into(),
		};

		Box::pin(async move {
			let mut response = Response::new(R::from(message));

			*response.status_mut() = StatusCode::BAD_REQUEST;
			response
				.headers_mut()
				.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"));

			response
		})
	}
}
