//! Login-level error types shared across flows, the Graph client, and the context carrier.

// self
use crate::{_prelude::*, config::LoginConfigError};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical login error exposed by public APIs and attached to failing request contexts.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, body decoding).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// The request context carries no OAuth 2.0 token; the exchange step never ran.
	#[error("Context is missing the OAuth 2.0 token.")]
	MissingToken,
	/// The request context carries no expected `state` value.
	#[error("Context is missing the OAuth 2.0 state.")]
	MissingState,
	/// The request context carries no Facebook user; read before the profile handler ran.
	#[error("Context is missing the Facebook user.")]
	MissingUser,
	/// The Graph API answered successfully but without a usable user id.
	#[error("Unable to get Facebook user.")]
	InvalidUser,
	/// The Graph API call failed or answered with a non-200 status.
	#[error("Unable to get user from the Graph API: {reason}.")]
	UserRequest {
		/// Short description of the failed call.
		reason: String,
		/// Underlying transport failure, when one occurred.
		#[source]
		source: Option<TransportError>,
	},

	/// The callback query carries no authorization code.
	#[error("Callback is missing the authorization code.")]
	MissingCode,
	/// The callback `state` does not match the one issued with the login redirect.
	#[error("Authorization state mismatch.")]
	StateMismatch,
	/// The user (or Facebook) declined the authorization request.
	#[error("Provider denied the authorization request: {reason}.")]
	AccessDenied {
		/// Provider-supplied reason string.
		reason: String,
	},
	/// Provider rejected the grant (e.g., a stale or reused code).
	#[error("Provider rejected the grant: {reason}.")]
	InvalidGrant {
		/// Provider-supplied reason string.
		reason: String,
	},
	/// Client authentication failed or credentials are malformed.
	#[error("Client authentication failed: {reason}.")]
	InvalidClient {
		/// Provider-supplied reason string.
		reason: String,
	},
	/// Token endpoint returned an unexpected but well-formed response.
	#[error("Token endpoint returned an unexpected response: {message}.")]
	TokenEndpoint {
		/// Provider- or crate-supplied message summarizing the failure.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// Token endpoint responded with JSON that could not be parsed.
	#[error("Token endpoint returned malformed JSON.")]
	TokenResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
}
/// Configuration and request-construction failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Login configuration failed validation.
	#[error(transparent)]
	Login(#[from] LoginConfigError),
	/// A configured endpoint cannot be turned into a request URL.
	#[error("Configuration contains an invalid URL.")]
	InvalidEndpoint {
		/// Underlying parsing failure.
		#[source]
		source: oauth2::url::ParseError,
	},
	/// Token endpoint returned an excessively large `expires_in`.
	#[error("The expires_in value exceeds the supported range.")]
	ExpiresInOutOfRange,
	/// Token endpoint returned a non-positive duration.
	#[error("The expires_in value must be positive.")]
	NonPositiveExpiresIn,
}

/// Transport-level failures (network, IO, body decoding).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling {endpoint}.")]
	Network {
		/// Endpoint label (`token endpoint`, `Graph API`).
		endpoint: &'static str,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred during transport.")]
	Io(#[from] std::io::Error),
	/// Response body is not the JSON shape the caller expected.
	#[error("Graph API returned malformed JSON.")]
	Decode {
		/// Structured parsing failure including the JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// HTTP client reported an error without a typed source.
	#[error("HTTP client error occurred: {message}.")]
	Other {
		/// Client-supplied message.
		message: String,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error raised while calling `endpoint`.
	pub fn network(
		endpoint: &'static str,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self::Network { endpoint, source: Box::new(src) }
	}
}
