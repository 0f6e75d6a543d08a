//! OAuth 2.0 client for the Facebook login dialog and token endpoint.

pub use oauth2;

// crates.io
use oauth2::{
	AuthType, AuthorizationCode, ClientId, ClientSecret, EndpointNotSet, EndpointSet,
	HttpClientError, RedirectUrl, RequestTokenError, TokenResponse, TokenUrl,
	basic::{BasicClient, BasicErrorResponse, BasicErrorResponseType, BasicRequestTokenError},
};
// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	config::LoginConfig,
	error::ConfigError,
	http::{self, HttpTransport, ResponseMetadata, ResponseMetadataSlot},
};

type ConfiguredBasicClient =
	BasicClient<EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

const TOKEN_ENDPOINT: &str = "the token endpoint";

/// Builds authorize URLs and exchanges authorization codes for access tokens.
///
/// Facebook expects the app secret in the request body, so the client always posts
/// `client_id`/`client_secret` as form fields instead of using HTTP Basic.
pub struct OAuthClient<C>
where
	C: ?Sized + HttpTransport,
{
	oauth_client: ConfiguredBasicClient,
	http_client: Arc<C>,
	authorization: Url,
	client_id: String,
	redirect_uri: Url,
	scope: Option<String>,
}
impl<C> OAuthClient<C>
where
	C: ?Sized + HttpTransport,
{
	/// Configures the client from a validated [`LoginConfig`].
	pub fn from_config(config: &LoginConfig, http_client: impl Into<Arc<C>>) -> Result<Self> {
		let token_url = TokenUrl::new(config.endpoints.token.to_string())
			.map_err(|source| ConfigError::InvalidEndpoint { source })?;
		let redirect_url = RedirectUrl::new(config.redirect_uri.to_string())
			.map_err(|source| ConfigError::InvalidEndpoint { source })?;
		let oauth_client = BasicClient::new(ClientId::new(config.client_id.clone()))
			.set_client_secret(ClientSecret::new(config.client_secret.expose().to_owned()))
			.set_token_uri(token_url)
			.set_redirect_uri(redirect_url)
			.set_auth_type(AuthType::RequestBody);

		Ok(Self {
			oauth_client,
			http_client: http_client.into(),
			authorization: config.endpoints.authorization.clone(),
			client_id: config.client_id.clone(),
			redirect_uri: config.redirect_uri.clone(),
			scope: config.scope_param(),
		})
	}

	/// Builds the login dialog URL carrying `state`.
	pub fn authorize_url(&self, state: &str) -> Url {
		let mut url = self.authorization.clone();
		let mut pairs = url.query_pairs_mut();

		pairs.append_pair("client_id", &self.client_id);
		pairs.append_pair("redirect_uri", self.redirect_uri.as_str());
		pairs.append_pair("response_type", "code");

		if let Some(scope) = &self.scope {
			pairs.append_pair("scope", scope);
		}

		pairs.append_pair("state", state);

		drop(pairs);

		url
	}

	/// Exchanges an authorization code for an access token.
	pub async fn exchange_code(&self, code: &str) -> Result<AccessToken> {
		let slot = ResponseMetadataSlot::default();
		let handle = self.http_client.with_metadata(slot.clone());
		let response = self
			.oauth_client
			.exchange_code(AuthorizationCode::new(code.to_owned()))
			.request_async(&handle)
			.await
			.map_err(|e| map_request_error(slot.take(), e))?;
		let mut token = AccessToken::new(response.access_token().secret().to_owned());

		if token.secret.is_empty() {
			let meta = slot.take();

			return Err(Error::TokenEndpoint {
				message: "access_token is empty".into(),
				status: meta_status(meta.as_ref()),
				retry_after: meta_retry_after(meta.as_ref()),
			});
		}

		if let Some(expires_in) = response.expires_in() {
			let secs =
				i64::try_from(expires_in.as_secs()).map_err(|_| ConfigError::ExpiresInOutOfRange)?;

			if secs <= 0 {
				return Err(ConfigError::NonPositiveExpiresIn.into());
			}

			token = token.expires_in(Duration::seconds(secs))?;
		}

		Ok(token)
	}
}
impl<C> Debug for OAuthClient<C>
where
	C: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OAuthClient")
			.field("authorization", &self.authorization)
			.field("client_id", &self.client_id)
			.field("redirect_uri", &self.redirect_uri)
			.field("scope", &self.scope)
			.finish()
	}
}

fn map_request_error<E>(
	meta: Option<ResponseMetadata>,
	err: BasicRequestTokenError<HttpClientError<E>>,
) -> Error
where
	E: 'static + Send + Sync + StdError,
{
	let meta = meta.as_ref();

	match err {
		RequestTokenError::ServerResponse(response) => map_server_response_error(response, meta),
		RequestTokenError::Request(e) => http::transport_error(TOKEN_ENDPOINT, e).into(),
		RequestTokenError::Parse(source, _body) =>
			Error::TokenResponseParse { source, status: meta_status(meta) },
		RequestTokenError::Other(message) => Error::TokenEndpoint {
			message,
			status: meta_status(meta),
			retry_after: meta_retry_after(meta),
		},
	}
}

fn map_server_response_error(
	response: BasicErrorResponse,
	meta: Option<&ResponseMetadata>,
) -> Error {
	let reason = match response.error_description() {
		Some(description) => description.clone(),
		None => response.error().as_ref().to_owned(),
	};

	match response.error() {
		BasicErrorResponseType::InvalidGrant => Error::InvalidGrant { reason },
		BasicErrorResponseType::InvalidClient | BasicErrorResponseType::UnauthorizedClient =>
			Error::InvalidClient { reason },
		_ => Error::TokenEndpoint {
			message: reason,
			status: meta_status(meta),
			retry_after: meta_retry_after(meta),
		},
	}
}

fn meta_status(meta: Option<&ResponseMetadata>) -> Option<u16> {
	meta.and_then(|value| value.status)
}

fn meta_retry_after(meta: Option<&ResponseMetadata>) -> Option<Duration> {
	meta.and_then(|value| value.retry_after)
}
