//! Graph API client used to resolve the logged-in user.
//!
//! [`GraphClient::me`] performs exactly one GET per call and never retries. Its outcome is a
//! [`MeResponse`] carrying the decoded user, the response metadata, and any transport failure,
//! which [`validate_response`] then reduces to a single success-or-error verdict.

mod validate;

pub use validate::*;

// crates.io
use oauth2::{
	AsyncHttpClient,
	http::{
		Method,
		header::{ACCEPT, AUTHORIZATION},
	},
};
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, User},
	config::LoginConfig,
	error::{ConfigError, TransportError},
	http::{self, HttpTransport, ResponseMetadata, ResponseMetadataSlot},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

const GRAPH_API: &str = "the Graph API";

/// Outcome of one Graph `me` call.
#[derive(Debug, Default)]
pub struct MeResponse {
	/// User decoded from a 2xx body.
	pub user: Option<User>,
	/// Status and Retry-After of the response, when one arrived.
	pub metadata: Option<ResponseMetadata>,
	/// Transport or decoding failure.
	pub error: Option<TransportError>,
}
impl MeResponse {
	/// Validates the outcome and returns the user on success.
	pub fn into_user(self) -> Result<User> {
		validate_response(self.user.as_ref(), self.metadata.as_ref(), self.error)?;

		self.user.ok_or(Error::InvalidUser)
	}
}

/// Client for the Graph API endpoints the login needs.
pub struct GraphClient<C>
where
	C: ?Sized + HttpTransport,
{
	http_client: Arc<C>,
	endpoint: Url,
	fields: Option<String>,
}
impl<C> GraphClient<C>
where
	C: ?Sized + HttpTransport,
{
	/// Creates a client rooted at the configured Graph base.
	pub fn new(config: &LoginConfig, http_client: impl Into<Arc<C>>) -> Self {
		Self {
			http_client: http_client.into(),
			endpoint: config.endpoints.graph.clone(),
			fields: config.fields_param(),
		}
	}

	/// Returns the URL `me` requests are sent to.
	pub fn me_url(&self) -> Result<Url> {
		let mut url =
			self.endpoint.join("me").map_err(|source| ConfigError::InvalidEndpoint { source })?;

		if let Some(fields) = &self.fields {
			url.query_pairs_mut().append_pair("fields", fields);
		}

		Ok(url)
	}

	/// Fetches the user the `token` belongs to.
	///
	/// Graph answers with `text/javascript` unless asked otherwise, so the request always sends
	/// `Accept: application/json`. The body is only decoded for 2xx statuses. `Err` is reserved
	/// for requests that could not be built; transport outcomes land in the [`MeResponse`].
	pub async fn me(&self, token: &AccessToken) -> Result<MeResponse> {
		let request = oauth2::http::Request::builder()
			.method(Method::GET)
			.uri(self.me_url()?.as_str())
			.header(ACCEPT, "application/json")
			.header(AUTHORIZATION, token.secret.bearer_header())
			.body(Vec::new())
			.map_err(ConfigError::from)?;
		let slot = ResponseMetadataSlot::default();
		let handle = self.http_client.with_metadata(slot.clone());
		let outcome = match handle.call(request).await {
			Ok(response) => {
				let metadata =
					slot.take().unwrap_or_else(|| ResponseMetadata::from_response(&response));

				if response.status().is_success() {
					match decode_user(response.body()) {
						Ok(user) =>
							MeResponse { user: Some(user), metadata: Some(metadata), error: None },
						Err(e) => MeResponse { user: None, metadata: Some(metadata), error: Some(e) },
					}
				} else {
					MeResponse { user: None, metadata: Some(metadata), error: None }
				}
			},
			Err(e) => MeResponse {
				user: None,
				metadata: slot.take(),
				error: Some(http::transport_error(GRAPH_API, e)),
			},
		};

		Ok(outcome)
	}

	/// Builds the profile picture URL for `user`.
	pub fn picture_url(&self, user: &User, width: u32, height: u32) -> Result<Url> {
		if !user.has_id() {
			return Err(Error::InvalidUser);
		}

		let mut url = self
			.endpoint
			.join(&format!("{}/picture", user.id))
			.map_err(|source| ConfigError::InvalidEndpoint { source })?;

		url.query_pairs_mut()
			.append_pair("width", &width.to_string())
			.append_pair("height", &height.to_string());

		Ok(url)
	}
}
#[cfg(feature = "reqwest")]
impl GraphClient<ReqwestHttpClient> {
	/// Creates a client backed by a default reqwest transport.
	pub fn with_default_transport(config: &LoginConfig) -> Self {
		Self::new(config, ReqwestHttpClient::default())
	}
}
impl<C> Clone for GraphClient<C>
where
	C: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			endpoint: self.endpoint.clone(),
			fields: self.fields.clone(),
		}
	}
}
impl<C> Debug for GraphClient<C>
where
	C: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("GraphClient")
			.field("endpoint", &self.endpoint)
			.field("fields", &self.fields)
			.finish()
	}
}

fn decode_user(body: &[u8]) -> Result<User, TransportError> {
	let mut de = serde_json::Deserializer::from_slice(body);

	serde_path_to_error::deserialize(&mut de).map_err(|source| TransportError::Decode { source })
}
