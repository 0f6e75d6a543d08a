#![cfg(feature = "reqwest")]

// self
use facebook_login::{
	config::{LoginConfig, LoginConfigError},
	error::{ConfigError, Error},
	flows::FacebookLogin,
	url::Url,
};

fn url(value: &str) -> Url {
	Url::parse(value).expect("Fixture URL should parse successfully.")
}

#[test]
fn default_facade_targets_facebook() {
	let config = LoginConfig::builder("app-id")
		.client_secret("app-secret")
		.redirect_uri(url("https://app.example.com/callback"))
		.scopes(["email", "user_friends"])
		.build()
		.expect("Login configuration should build successfully.");
	let login = FacebookLogin::new(config).expect("Login facade should build successfully.");
	let authorize = login.authorize_url("state-xyz");

	assert_eq!(authorize.host_str(), Some("www.facebook.com"));
	assert!(authorize.as_str().contains("scope=email%2Cuser_friends"));
	assert_eq!(
		login.graph().me_url().expect("Me URL should build.").as_str(),
		"https://graph.facebook.com/v2.9/me?fields=name%2Cemail"
	);
	assert!(!format!("{login:?}").contains("app-secret"));
}

#[test]
fn insecure_endpoints_are_rejected_with_a_config_error() {
	let err = LoginConfig::builder("app-id")
		.client_secret("app-secret")
		.redirect_uri(url("https://app.example.com/callback"))
		.token_endpoint(url("http://graph.example.com/oauth/access_token"))
		.build()
		.expect_err("Plain-HTTP token endpoint must be rejected.");

	assert_eq!(
		err.to_string(),
		"The token endpoint must use HTTPS: http://graph.example.com/oauth/access_token."
	);

	let err = Error::from(ConfigError::from(err));

	assert!(matches!(
		err,
		Error::Config(ConfigError::Login(LoginConfigError::InsecureEndpoint { endpoint: "token", .. }))
	));
}

#[test]
fn custom_scope_delimiter_is_applied() {
	let config = LoginConfig::builder("app-id")
		.client_secret("app-secret")
		.redirect_uri(url("https://app.example.com/callback"))
		.scopes(["email", "public_profile"])
		.scope_delimiter(' ')
		.build()
		.expect("Space-delimited configuration should build successfully.");

	assert_eq!(config.scope_param().as_deref(), Some("email public_profile"));

	let err = LoginConfig::builder("app-id")
		.client_secret("app-secret")
		.redirect_uri(url("https://app.example.com/callback"))
		.scope_delimiter('\n')
		.build()
		.expect_err("Control-character delimiter must be rejected.");

	assert_eq!(err, LoginConfigError::InvalidScopeDelimiter { delimiter: '\n' });
}
