//! Request-scoped context carrier.
//!
//! The context of an in-flight request is its [`Extensions`] map. Every value this crate stores
//! there is wrapped in a private newtype, so the type-keyed map can never hand one of them to
//! (or take one from) unrelated code that happens to store an `Arc<User>` or a `String`.
//!
//! Setters consume the context and return it with the association added; getters never mutate.
//! Nothing here is shared across requests, so no locking is involved.

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, User},
};

#[derive(Clone)]
struct UserKey(Arc<User>);

#[derive(Clone)]
struct TokenKey(Arc<AccessToken>);

#[derive(Clone)]
struct StateKey(Arc<str>);

#[derive(Clone)]
struct ErrorKey(Arc<Error>);

/// Returns `ctx` with the Facebook user stored in it.
pub fn with_user(mut ctx: Extensions, user: impl Into<Arc<User>>) -> Extensions {
	ctx.insert(UserKey(user.into()));

	ctx
}

/// Returns the Facebook user stored in `ctx`.
///
/// A missing user means the caller ran before the profile handler dispatched to its success
/// continuation; treat [`Error::MissingUser`] as a wiring bug, not a login outcome.
pub fn user_from_context(ctx: &Extensions) -> Result<Arc<User>> {
	ctx.get::<UserKey>().map(|key| key.0.clone()).ok_or(Error::MissingUser)
}

/// Returns `ctx` with the OAuth 2.0 access token stored in it.
pub fn with_token(mut ctx: Extensions, token: impl Into<Arc<AccessToken>>) -> Extensions {
	ctx.insert(TokenKey(token.into()));

	ctx
}

/// Returns the access token stored in `ctx`.
pub fn token_from_context(ctx: &Extensions) -> Result<Arc<AccessToken>> {
	ctx.get::<TokenKey>().map(|key| key.0.clone()).ok_or(Error::MissingToken)
}

/// Returns `ctx` with the expected OAuth 2.0 `state` stored in it.
pub fn with_state(mut ctx: Extensions, state: impl AsRef<str>) -> Extensions {
	ctx.insert(StateKey(Arc::from(state.as_ref())));

	ctx
}

/// Returns the expected `state` stored in `ctx`.
pub fn state_from_context(ctx: &Extensions) -> Result<Arc<str>> {
	ctx.get::<StateKey>().map(|key| key.0.clone()).ok_or(Error::MissingState)
}

/// Returns `ctx` with the login failure stored in it.
pub fn with_error(mut ctx: Extensions, error: impl Into<Arc<Error>>) -> Extensions {
	ctx.insert(ErrorKey(error.into()));

	ctx
}

/// Returns the login failure stored in `ctx`, if a flow attached one.
pub fn error_from_context(ctx: &Extensions) -> Option<Arc<Error>> {
	ctx.get::<ErrorKey>().map(|key| key.0.clone())
}

/// Rebuilds `request` with its context passed through `f`.
pub(crate) fn map_context<B>(
	request: Request<B>,
	f: impl FnOnce(Extensions) -> Extensions,
) -> Request<B> {
	let (mut parts, body) = request.into_parts();

	parts.extensions = f(std::mem::take(&mut parts.extensions));

	Request::from_parts(parts, body)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn user_round_trips_through_context() {
		let expected = Arc::new(User { id: "12".into(), name: "Gopher".into(), ..User::default() });
		let ctx = with_user(Extensions::new(), expected.clone());
		let user = user_from_context(&ctx).expect("Stored user should be retrievable.");

		assert!(Arc::ptr_eq(&expected, &user));
		assert_eq!(*user, *expected);
	}

	#[test]
	fn untouched_context_reports_missing_user() {
		let err = user_from_context(&Extensions::new()).expect_err("Empty context has no user.");

		assert!(matches!(err, Error::MissingUser));
		assert_eq!(err.to_string(), "Context is missing the Facebook user.");
	}

	#[test]
	fn private_keys_ignore_foreign_values() {
		let mut ctx = Extensions::new();

		ctx.insert(Arc::new(User { id: "foreign".into(), ..User::default() }));
		ctx.insert(String::from("foreign-state"));

		assert!(matches!(user_from_context(&ctx), Err(Error::MissingUser)));
		assert!(matches!(state_from_context(&ctx), Err(Error::MissingState)));
	}

	#[test]
	fn token_state_and_error_round_trip() {
		let ctx = with_token(Extensions::new(), AccessToken::new("any-token"));
		let ctx = with_state(ctx, "expected-state");
		let ctx = with_error(ctx, Error::StateMismatch);
		let token = token_from_context(&ctx).expect("Stored token should be retrievable.");
		let state = state_from_context(&ctx).expect("Stored state should be retrievable.");

		assert_eq!(token.secret.expose(), "any-token");
		assert_eq!(&*state, "expected-state");
		assert!(matches!(error_from_context(&ctx).as_deref(), Some(Error::StateMismatch)));
		assert!(matches!(token_from_context(&Extensions::new()), Err(Error::MissingToken)));
	}

	#[test]
	fn map_context_preserves_request_parts() {
		let request = Request::builder()
			.uri("/callback?code=abc")
			.body(())
			.expect("Fixture request should build.");
		let request = map_context(request, |ctx| with_state(ctx, "s"));

		assert_eq!(request.uri().query(), Some("code=abc"));
		assert!(state_from_context(request.extensions()).is_ok());
	}
}
