//! Login with Facebook for Rust web servers: OAuth 2.0 redirects, code exchanges, and Graph API
//! identity resolution behind composable request handlers.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod context;
pub mod error;
pub mod flows;
pub mod graph;
pub mod http;
pub mod oauth;
pub mod obs;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for tests; enabled via `cfg(test)` or the `test` crate
	//! feature.

	pub use crate::_prelude::*;

	// self
	use crate::{config::LoginConfig, flows::FacebookLogin, http::ReqwestHttpClient};

	/// Login facade type alias used by reqwest-backed tests.
	pub type ReqwestTestLogin = FacebookLogin<ReqwestHttpClient>;

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Constructs a [`FacebookLogin`] over the insecure test transport.
	pub fn build_reqwest_test_login(config: LoginConfig) -> ReqwestTestLogin {
		FacebookLogin::with_http_client(config, test_reqwest_http_client())
			.expect("Test login facade should build.")
	}
}

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use oauth2::http::{Extensions, Request, Response, StatusCode};
	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)]
use {
	axum as _, color_eyre as _, httpmock as _, tokio as _, tracing_subscriber as _,
};
