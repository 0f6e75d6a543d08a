//! Validated login configuration consumed by every flow.
//!
//! Credentials, redirect URI, scopes, and endpoints are supplied by the caller at construction
//! time; nothing in the crate embeds them. The defaults point at Facebook's v2.9 dialog, token,
//! and Graph endpoints.

/// Builder API for assembling login configurations.
pub mod builder;

pub use builder::*;

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Default Facebook authorization dialog.
pub const DEFAULT_AUTHORIZATION_ENDPOINT: &str = "https://www.facebook.com/v2.9/dialog/oauth";
/// Default Facebook token endpoint.
pub const DEFAULT_TOKEN_ENDPOINT: &str = "https://graph.facebook.com/v2.9/oauth/access_token";
/// Default Graph API base; must end with `/` so relative paths join beneath it.
pub const DEFAULT_GRAPH_ENDPOINT: &str = "https://graph.facebook.com/v2.9/";

/// Endpoint set used by the login flows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginEndpoints {
	/// Authorization dialog users are redirected to.
	pub authorization: Url,
	/// Token endpoint used for the code exchange.
	pub token: Url,
	/// Graph API base used for profile lookups.
	pub graph: Url,
}

/// Immutable login configuration.
///
/// Deserializing runs the same validation and defaults as [`LoginConfigBuilder::build`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "builder::LoginConfigSeed")]
pub struct LoginConfig {
	/// Facebook app id.
	pub client_id: String,
	/// Facebook app secret; redacted from `Debug`.
	pub client_secret: TokenSecret,
	/// Redirect URI registered under "Valid OAuth Redirect URIs".
	pub redirect_uri: Url,
	/// Permissions requested in the login dialog.
	pub scopes: Vec<String>,
	/// Profile fields requested from Graph `me` (`id` is always returned).
	pub profile_fields: Vec<String>,
	/// Endpoint definitions.
	pub endpoints: LoginEndpoints,
	/// Character used to join scopes in the authorize URL.
	pub scope_delimiter: char,
}
impl LoginConfig {
	/// Creates a new builder for the provided app id.
	pub fn builder(client_id: impl Into<String>) -> LoginConfigBuilder {
		LoginConfigBuilder::new(client_id)
	}

	/// Joins the configured scopes with the scope delimiter.
	pub fn scope_param(&self) -> Option<String> {
		join_non_empty(&self.scopes, self.scope_delimiter)
	}

	/// Joins the configured profile fields for the Graph `fields` parameter.
	pub fn fields_param(&self) -> Option<String> {
		join_non_empty(&self.profile_fields, ',')
	}
}
impl Debug for LoginConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("LoginConfig")
			.field("client_id", &self.client_id)
			.field("client_secret", &"<redacted>")
			.field("redirect_uri", &self.redirect_uri)
			.field("scopes", &self.scopes)
			.field("profile_fields", &self.profile_fields)
			.field("endpoints", &self.endpoints)
			.field("scope_delimiter", &self.scope_delimiter)
			.finish()
	}
}

fn join_non_empty(values: &[String], delimiter: char) -> Option<String> {
	if values.is_empty() {
		return None;
	}

	Some(values.join(&*delimiter.encode_utf8(&mut [0; 4])))
}
