//! Graph `me` orchestration: token in, user out, exactly one continuation.
//!
//! [`ProfileHandler`] walks a fixed path for every request:
//!
//! 1. read the access token from the request context (missing token fails without any fetch);
//! 2. fetch `me` from the Graph API and validate the outcome;
//! 3. attach the user and dispatch to the success continuation.
//!
//! Failures at steps 1 and 2 are attached to the context with [`context::with_error`] and handed to
//! the failure continuation instead. Nothing is retried.

// self
use crate::{
	_prelude::*,
	auth::User,
	context,
	flows::{Handler, HandlerFuture},
	graph::GraphClient,
	http::HttpTransport,
	obs::{FlowKind, FlowOutcome, FlowSpan},
};

/// Resolves the Facebook user for a request that already carries an access token.
pub struct ProfileHandler<C, S, F>
where
	C: ?Sized + HttpTransport,
{
	graph: GraphClient<C>,
	success: S,
	pub(super) failure: F,
}
impl<C, S, F> ProfileHandler<C, S, F>
where
	C: ?Sized + HttpTransport,
{
	/// Creates a handler dispatching to `success` or `failure`.
	pub fn new(graph: GraphClient<C>, success: S, failure: F) -> Self {
		Self { graph, success, failure }
	}

	/// Runs the lookup and awaits whichever continuation it dispatched to.
	pub async fn serve<B, R>(&self, request: Request<B>) -> Response<R>
	where
		S: Handler<B, R>,
		F: Handler<B, R>,
	{
		let span = FlowSpan::new(FlowKind::Profile, "fetch_me");

		let resolved = span.instrument(self.resolve_user(request.extensions())).await;

		match resolved {
			Ok(user) => {
				span.record(FlowOutcome::Success);

				self.success
					.call(context::map_context(request, |ctx| context::with_user(ctx, user)))
					.await
			},
			Err(e) => {
				span.record(FlowOutcome::Failure);

				self.failure
					.call(context::map_context(request, |ctx| context::with_error(ctx, e)))
					.await
			},
		}
	}

	async fn resolve_user(&self, ctx: &Extensions) -> Result<User> {
		let token = context::token_from_context(ctx)?;

		self.graph.me(&token).await?.into_user()
	}
}
impl<B, R, C, S, F> Handler<B, R> for ProfileHandler<C, S, F>
where
	B: 'static + Send,
	R: 'static + Send,
	C: ?Sized + HttpTransport,
	S: Handler<B, R>,
	F: Handler<B, R>,
{
	fn call(&self, request: Request<B>) -> HandlerFuture<'_, Response<R>> {
		Box::pin(self.serve(request))
	}
}
impl<C, S, F> Clone for ProfileHandler<C, S, F>
where
	C: ?Sized + HttpTransport,
	S: Clone,
	F: Clone,
{
	fn clone(&self) -> Self {
		Self { graph: self.graph.clone(), success: self.success.clone(), failure: self.failure.clone() }
	}
}
impl<C, S, F> Debug for ProfileHandler<C, S, F>
where
	C: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ProfileHandler").field("graph", &self.graph).finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::sync::atomic::{AtomicUsize, Ordering};
	// crates.io
	use oauth2::{AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse};
	// self
	use super::*;
	use crate::{
		auth::AccessToken,
		config::LoginConfig,
		error::TransportError,
		http::{ResponseMetadata, ResponseMetadataSlot},
	};

	#[derive(Debug, ThisError)]
	#[error("connection refused")]
	struct Refused;

	/// Transport whose every request fails before a response arrives.
	struct RefusingTransport {
		calls: Arc<AtomicUsize>,
	}
	impl HttpTransport for RefusingTransport {
		type Handle = RefusingHandle;
		type TransportError = Refused;

		fn with_metadata(&self, slot: ResponseMetadataSlot) -> Self::Handle {
			RefusingHandle { calls: self.calls.clone(), slot }
		}
	}

	struct RefusingHandle {
		calls: Arc<AtomicUsize>,
		slot: ResponseMetadataSlot,
	}
	impl<'c> AsyncHttpClient<'c> for RefusingHandle {
		type Error = HttpClientError<Refused>;
		type Future =
			Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send + Sync>>;

		fn call(&'c self, _request: HttpRequest) -> Self::Future {
			Box::pin(async move {
				self.calls.fetch_add(1, Ordering::SeqCst);
				self.slot.take();

				Err(HttpClientError::Reqwest(Box::new(Refused)))
			})
		}
	}

	fn handler(
		calls: Arc<AtomicUsize>,
	) -> ProfileHandler<
		RefusingTransport,
		impl Handler<(), String> + use<>,
		impl Handler<(), String> + use<>,
	> {
		let config = LoginConfig::builder("app-id")
			.client_secret("app-secret")
			.redirect_uri(
				Url::parse("https://app.example.com/callback").expect("Redirect URI should parse."),
			)
			.build()
			.expect("Config should build.");
		let graph = GraphClient::new(&config, RefusingTransport { calls });
		let success = |request: Request<()>| async move {
			let user = context::user_from_context(request.extensions())
				.expect("Success continuation should see the user.");

			Response::new(format!("success:{}", user.id))
		};
		let failure = |request: Request<()>| async move {
			let error = context::error_from_context(request.extensions())
				.expect("Failure continuation should see the error.");

			Response::new(format!("failure:{error}"))
		};

		ProfileHandler::new(graph, success, failure)
	}

	#[tokio::test]
	async fn missing_token_fails_without_fetching() {
		let calls = Arc::new(AtomicUsize::new(0));
		let response: Response<String> = handler(calls.clone()).serve(Request::new(())).await;

		assert_eq!(response.into_body(), "failure:Context is missing the OAuth 2.0 token.");
		assert_eq!(calls.load(Ordering::SeqCst), 0);
	}

	#[tokio::test]
	async fn network_failure_becomes_user_request_error() {
		let calls = Arc::new(AtomicUsize::new(0));
		let handler = handler(calls.clone());
		let mut request = Request::new(());

		*request.extensions_mut() =
			context::with_token(Extensions::new(), AccessToken::new("any-token"));

		let response: Response<String> = handler.serve(request).await;

		assert_eq!(
			response.into_body(),
			"failure:Unable to get user from the Graph API: Network error occurred while calling the Graph API."
		);
		assert_eq!(calls.load(Ordering::SeqCst), 1);
	}

	#[test]
	fn transport_error_is_kept_as_source() {
		let err = crate::graph::validate_response(
			None,
			None::<&ResponseMetadata>,
			Some(TransportError::network("the Graph API", Refused)),
		)
		.expect_err("Network failure must not validate.");

		assert!(matches!(err, Error::UserRequest { source: Some(TransportError::Network { .. }), .. }));
	}
}
