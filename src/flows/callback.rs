//! Authorization code callback: state check, code exchange, then the profile lookup.

// crates.io
use constant_time_eq::constant_time_eq;
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	context,
	flows::{Handler, HandlerFuture, ProfileHandler},
	http::HttpTransport,
	oauth::OAuthClient,
	obs::{FlowKind, FlowOutcome, FlowSpan},
};

/// Query parameters Facebook appends to the redirect URI.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallbackParams {
	/// Authorization code to exchange.
	pub code: Option<String>,
	/// Echoed `state` value.
	pub state: Option<String>,
	/// Error code when the dialog did not grant access.
	pub error: Option<String>,
	/// Short machine-readable reason accompanying `error`.
	pub error_reason: Option<String>,
	/// Human-readable description accompanying `error`.
	pub error_description: Option<String>,
}
impl CallbackParams {
	/// Parses the callback query string. Unknown keys are ignored; empty values count as absent.
	pub fn from_query(query: Option<&str>) -> Self {
		let mut params = Self::default();

		for (key, value) in form_urlencoded::parse(query.unwrap_or_default().as_bytes()) {
			if value.is_empty() {
				continue;
			}

			let slot = match key.as_ref() {
				"code" => &mut params.code,
				"state" => &mut params.state,
				"error" => &mut params.error,
				"error_reason" => &mut params.error_reason,
				"error_description" => &mut params.error_description,
				_ => continue,
			};

			*slot = Some(value.into_owned());
		}

		params
	}

	/// Returns the authorization code once the callback is known to belong to `expected_state`.
	///
	/// The state comparison runs in constant time.
	pub fn authorization_code(self, expected_state: &str) -> Result<String> {
		if !self
			.state
			.as_deref()
			.is_some_and(|state| constant_time_eq(state.as_bytes(), expected_state.as_bytes()))
		{
			return Err(Error::StateMismatch);
		}
		if let Some(error) = self.error {
			let reason = self.error_description.or(self.error_reason).unwrap_or(error);

			return Err(Error::AccessDenied { reason });
		}

		self.code.ok_or(Error::MissingCode)
	}
}

/// Exchanges the callback's authorization code and hands the request to a [`ProfileHandler`].
///
/// Failures before the exchange completes go to the profile handler's failure continuation, so a
/// login has a single failure path no matter where it stopped.
pub struct CallbackHandler<C, S, F>
where
	C: ?Sized + HttpTransport,
{
	oauth: Arc<OAuthClient<C>>,
	profile: ProfileHandler<C, S, F>,
}
impl<C, S, F> CallbackHandler<C, S, F>
where
	C: ?Sized + HttpTransport,
{
	/// Creates a handler exchanging codes through `oauth` and resolving users through `profile`.
	pub fn new(oauth: Arc<OAuthClient<C>>, profile: ProfileHandler<C, S, F>) -> Self {
		Self { oauth, profile }
	}

	/// Runs the exchange and awaits whichever continuation ends the login.
	pub async fn serve<B, R>(&self, request: Request<B>) -> Response<R>
	where
		S: Handler<B, R>,
		F: Handler<B, R>,
	{
		let span = FlowSpan::new(FlowKind::Callback, "exchange_code");
		let code = context::state_from_context(request.extensions()).and_then(|expected| {
			CallbackParams::from_query(request.uri().query()).authorization_code(&expected)
		});
		let exchanged = match code {
			Ok(code) => span.instrument(self.oauth.exchange_code(&code)).await,
			Err(e) => Err(e),
		};

		match exchanged {
			Ok(token) => {
				span.record(FlowOutcome::Success);

				self.profile
					.serve(context::map_context(request, |ctx| context::with_token(ctx, token)))
					.await
			},
			Err(e) => {
				span.record(FlowOutcome::Failure);

				self.profile
					.failure
					.call(context::map_context(request, |ctx| context::with_error(ctx, e)))
					.await
			},
		}
	}
}
impl<B, R, C, S, F> Handler<B, R> for CallbackHandler<C, S, F>
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
impl<C, S, F> Clone for CallbackHandler<C, S, F>
where
	C: ?Sized + HttpTransport,
	S: Clone,
	F: Clone,
{
	fn clone(&self) -> Self {
		Self { oauth: self.oauth.clone(), profile: self.profile.clone() }
	}
}
impl<C, S, F> Debug for CallbackHandler<C, S, F>
where
	C: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CallbackHandler")
			.field("oauth", &self.oauth)
			.field("profile", &self.profile)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn query_parsing_decodes_and_skips_empty_values() {
		let params = CallbackParams::from_query(Some("code=AQ%2Fxyz&state=abc&error=&extra=1"));

		assert_eq!(params.code.as_deref(), Some("AQ/xyz"));
		assert_eq!(params.state.as_deref(), Some("abc"));
		assert_eq!(params.error, None);
		assert_eq!(CallbackParams::from_query(None), CallbackParams::default());
	}

	#[test]
	fn state_is_checked_before_anything_else() {
		let forged = CallbackParams::from_query(Some("code=c&state=forged&error=access_denied"));

		assert!(matches!(forged.authorization_code("expected"), Err(Error::StateMismatch)));
		assert!(matches!(
			CallbackParams::default().authorization_code("expected"),
			Err(Error::StateMismatch)
		));
	}

	#[test]
	fn state_must_match_byte_for_byte() {
		for echoed in ["expecte", "expected-", "Expected", "expected\u{0}"] {
			let params = CallbackParams { code: Some("c".into()), state: Some(echoed.into()), ..Default::default() };

			assert!(matches!(params.authorization_code("expected"), Err(Error::StateMismatch)));
		}

		let exact = CallbackParams { code: Some("c".into()), state: Some("expected".into()), ..Default::default() };

		assert_eq!(exact.authorization_code("expected").expect("Exact state should match."), "c");
	}

	#[test]
	fn provider_errors_prefer_the_description() {
		let denied = CallbackParams::from_query(Some(
			"state=s&error=access_denied&error_reason=user_denied&error_description=Permissions+error",
		));
		let bare = CallbackParams::from_query(Some("state=s&error=access_denied"));

		assert!(matches!(
			denied.authorization_code("s"),
			Err(Error::AccessDenied { reason }) if reason == "Permissions error"
		));
		assert!(matches!(
			bare.authorization_code("s"),
			Err(Error::AccessDenied { reason }) if reason == "access_denied"
		));
	}

	#[test]
	fn code_is_required_after_state_matches() {
		let missing = CallbackParams::from_query(Some("state=s"));
		let present = CallbackParams::from_query(Some("state=s&code=abc"));

		assert!(matches!(missing.authorization_code("s"), Err(Error::MissingCode)));
		assert_eq!(present.authorization_code("s").expect("Code should be returned."), "abc");
	}
}
