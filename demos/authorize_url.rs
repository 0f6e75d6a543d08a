//! Prints the Facebook login dialog URL for a fresh `state`.
//!
//! Reads `FACEBOOK_CLIENT_ID`, `FACEBOOK_CLIENT_SECRET`, and `FACEBOOK_REDIRECT_URI` from the
//! environment.

// std
use std::env;
// crates.io
use color_eyre::{Result, eyre::WrapErr};
// self
use facebook_login::{
	config::LoginConfig,
	flows::{FacebookLogin, generate_state},
	url::Url,
};

fn main() -> Result<()> {
	color_eyre::install()?;

	let config = LoginConfig::builder(env::var("FACEBOOK_CLIENT_ID").wrap_err("FACEBOOK_CLIENT_ID")?)
		.client_secret(env::var("FACEBOOK_CLIENT_SECRET").wrap_err("FACEBOOK_CLIENT_SECRET")?)
		.redirect_uri(Url::parse(
			&env::var("FACEBOOK_REDIRECT_URI").wrap_err("FACEBOOK_REDIRECT_URI")?,
		)?)
		.scopes(["email", "public_profile"])
		.build()?;
	let login = FacebookLogin::new(config)?;
	let state = generate_state();

	println!("Send your user to {}.", login.authorize_url(&state));
	println!("Keep state `{state}` to validate the callback.");

	Ok(())
}
