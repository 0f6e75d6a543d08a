// std
use std::{iter::IntoIterator, net::IpAddr};
// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	config::{
		DEFAULT_AUTHORIZATION_ENDPOINT, DEFAULT_GRAPH_ENDPOINT, DEFAULT_TOKEN_ENDPOINT,
		LoginConfig, LoginEndpoints,
	},
};

const DEFAULT_SCOPES: &[&str] = &["email"];
const DEFAULT_PROFILE_FIELDS: &[&str] = &["name", "email"];

/// Errors raised while constructing or validating a [`LoginConfig`].
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum LoginConfigError {
	/// App id is empty or whitespace.
	#[error("Client id cannot be empty.")]
	EmptyClientId,
	/// App secret was never supplied.
	#[error("Missing client secret.")]
	MissingClientSecret,
	/// Redirect URI was never supplied.
	#[error("Missing redirect URI.")]
	MissingRedirectUri,
	/// A built-in endpoint constant failed to parse.
	#[error("The {endpoint} endpoint is not a valid URL: {url}.")]
	InvalidEndpoint {
		/// Which endpoint failed to parse.
		endpoint: &'static str,
		/// Raw value that failed to parse.
		url: String,
	},
	/// Endpoints must use HTTPS unless they point at a loopback host.
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// The Graph base must be a directory so `me` joins beneath it.
	#[error("The graph endpoint must end with `/`: {url}.")]
	GraphEndpointNotDirectory {
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Reject scope delimiters that are control characters.
	#[error("Scope delimiter must be a printable character.")]
	InvalidScopeDelimiter {
		/// Invalid delimiter that was supplied.
		delimiter: char,
	},
}

/// Builder for [`LoginConfig`] values.
#[derive(Debug)]
pub struct LoginConfigBuilder {
	/// Facebook app id.
	pub client_id: String,
	/// Facebook app secret.
	pub client_secret: Option<TokenSecret>,
	/// Registered redirect URI.
	pub redirect_uri: Option<Url>,
	/// Requested permissions (defaults to `email`).
	pub scopes: Option<Vec<String>>,
	/// Requested Graph fields (defaults to `name,email`).
	pub profile_fields: Option<Vec<String>>,
	/// Authorization endpoint override.
	pub authorization_endpoint: Option<Url>,
	/// Token endpoint override.
	pub token_endpoint: Option<Url>,
	/// Graph API base override.
	pub graph_endpoint: Option<Url>,
	/// Scope delimiter (defaults to `,`).
	pub scope_delimiter: char,
}
impl LoginConfigBuilder {
	/// Creates a new builder seeded with the provided app id.
	pub fn new(client_id: impl Into<String>) -> Self {
		Self {
			client_id: client_id.into(),
			client_secret: None,
			redirect_uri: None,
			scopes: None,
			profile_fields: None,
			authorization_endpoint: None,
			token_endpoint: None,
			graph_endpoint: None,
			scope_delimiter: ',',
		}
	}

	/// Sets the app secret.
	pub fn client_secret(mut self, secret: impl Into<String>) -> Self {
		self.client_secret = Some(TokenSecret::new(secret));

		self
	}

	/// Sets the redirect URI.
	pub fn redirect_uri(mut self, url: Url) -> Self {
		self.redirect_uri = Some(url);

		self
	}

	/// Requests one more permission.
	pub fn scope(mut self, scope: impl Into<String>) -> Self {
		self.scopes.get_or_insert_with(Vec::new).push(scope.into());

		self
	}

	/// Requests multiple permissions.
	pub fn scopes<I, S>(mut self, scopes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.scopes.get_or_insert_with(Vec::new).extend(scopes.into_iter().map(Into::into));

		self
	}

	/// Replaces the Graph fields requested from `me`.
	pub fn profile_fields<I, S>(mut self, fields: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.profile_fields = Some(fields.into_iter().map(Into::into).collect());

		self
	}

	/// Overrides the authorization endpoint.
	pub fn authorization_endpoint(mut self, url: Url) -> Self {
		self.authorization_endpoint = Some(url);

		self
	}

	/// Overrides the token endpoint.
	pub fn token_endpoint(mut self, url: Url) -> Self {
		self.token_endpoint = Some(url);

		self
	}

	/// Overrides the Graph API base.
	pub fn graph_endpoint(mut self, url: Url) -> Self {
		self.graph_endpoint = Some(url);

		self
	}

	/// Overrides the scope delimiter.
	pub fn scope_delimiter(mut self, delimiter: char) -> Self {
		self.scope_delimiter = delimiter;

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<LoginConfig, LoginConfigError> {
		if self.client_id.trim().is_empty() {
			return Err(LoginConfigError::EmptyClientId);
		}

		let client_secret = self.client_secret.ok_or(LoginConfigError::MissingClientSecret)?;
		let redirect_uri = self.redirect_uri.ok_or(LoginConfigError::MissingRedirectUri)?;
		let endpoints = LoginEndpoints {
			authorization: endpoint_or_default(
				"authorization",
				self.authorization_endpoint,
				DEFAULT_AUTHORIZATION_ENDPOINT,
			)?,
			token: endpoint_or_default("token", self.token_endpoint, DEFAULT_TOKEN_ENDPOINT)?,
			graph: endpoint_or_default("graph", self.graph_endpoint, DEFAULT_GRAPH_ENDPOINT)?,
		};
		let config = LoginConfig {
			client_id: self.client_id,
			client_secret,
			redirect_uri,
			scopes: self.scopes.unwrap_or_else(|| owned(DEFAULT_SCOPES)),
			profile_fields: self.profile_fields.unwrap_or_else(|| owned(DEFAULT_PROFILE_FIELDS)),
			endpoints,
			scope_delimiter: self.scope_delimiter,
		};

		config.validate()?;

		Ok(config)
	}
}

impl LoginConfig {
	/// Validates invariants for the configuration.
	fn validate(&self) -> Result<(), LoginConfigError> {
		validate_endpoint("authorization", &self.endpoints.authorization)?;
		validate_endpoint("token", &self.endpoints.token)?;
		validate_endpoint("graph", &self.endpoints.graph)?;

		if !self.endpoints.graph.path().ends_with('/') {
			return Err(LoginConfigError::GraphEndpointNotDirectory {
				url: self.endpoints.graph.to_string(),
			});
		}
		if self.scope_delimiter.is_control() {
			return Err(LoginConfigError::InvalidScopeDelimiter {
				delimiter: self.scope_delimiter,
			});
		}

		Ok(())
	}
}

/// Serialized form of [`LoginConfig`]; deserialization goes through [`LoginConfigBuilder::build`].
#[derive(Deserialize)]
pub(crate) struct LoginConfigSeed {
	client_id: String,
	client_secret: Option<TokenSecret>,
	redirect_uri: Option<Url>,
	scopes: Option<Vec<String>>,
	profile_fields: Option<Vec<String>>,
	endpoints: Option<LoginEndpoints>,
	scope_delimiter: Option<char>,
}
impl TryFrom<LoginConfigSeed> for LoginConfig {
	type Error = LoginConfigError;

	fn try_from(seed: LoginConfigSeed) -> Result<Self, Self::Error> {
		let mut builder = LoginConfigBuilder::new(seed.client_id);

		builder.client_secret = seed.client_secret;
		builder.redirect_uri = seed.redirect_uri;
		builder.scopes = seed.scopes;
		builder.profile_fields = seed.profile_fields;

		if let Some(endpoints) = seed.endpoints {
			builder.authorization_endpoint = Some(endpoints.authorization);
			builder.token_endpoint = Some(endpoints.token);
			builder.graph_endpoint = Some(endpoints.graph);
		}
		if let Some(delimiter) = seed.scope_delimiter {
			builder.scope_delimiter = delimiter;
		}

		builder.build()
	}
}

fn endpoint_or_default(
	name: &'static str,
	value: Option<Url>,
	default: &str,
) -> Result<Url, LoginConfigError> {
	match value {
		Some(url) => Ok(url),
		None => Url::parse(default)
			.map_err(|_| LoginConfigError::InvalidEndpoint { endpoint: name, url: default.into() }),
	}
}

fn validate_endpoint(name: &'static str, url: &Url) -> Result<(), LoginConfigError> {
	if url.scheme() == "https" || is_loopback(url) {
		Ok(())
	} else {
		Err(LoginConfigError::InsecureEndpoint { endpoint: name, url: url.to_string() })
	}
}

fn is_loopback(url: &Url) -> bool {
	match url.host_str() {
		Some("localhost") => true,
		Some(host) => host
			.trim_start_matches('[')
			.trim_end_matches(']')
			.parse::<IpAddr>()
			.is_ok_and(|ip| ip.is_loopback()),
		None => false,
	}
}

fn owned(values: &[&str]) -> Vec<String> {
	values.iter().map(|value| (*value).to_owned()).collect()
}
