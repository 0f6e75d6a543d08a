//! Bearer credential issued by the Facebook token endpoint.

pub mod secret;

// self
use crate::{_prelude::*, auth::token::secret::TokenSecret, error::ConfigError};

/// Access token handed to the profile handler through the request context.
///
/// Facebook omits `expires_in` for some token kinds, so the expiry is optional. The value lives
/// only as long as the request that carries it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
	/// Bearer secret; callers must avoid logging it.
	pub secret: TokenSecret,
	/// Instant the token endpoint answered.
	pub issued_at: OffsetDateTime,
	/// Expiry instant derived from `issued_at + expires_in`, when the provider reported one.
	pub expires_at: Option<OffsetDateTime>,
}
impl AccessToken {
	/// Wraps a bearer secret issued now without expiry information.
	pub fn new(secret: impl Into<String>) -> Self {
		Self {
			secret: TokenSecret::new(secret),
			issued_at: OffsetDateTime::now_utc(),
			expires_at: None,
		}
	}

	/// Overrides the issued-at instant.
	pub fn issued_at(mut self, instant: OffsetDateTime) -> Self {
		self.issued_at = instant;

		self
	}

	/// Sets an absolute expiry instant.
	pub fn expires_at(mut self, instant: OffsetDateTime) -> Self {
		self.expires_at = Some(instant);

		self
	}

	/// Sets a relative expiry counted from the issued-at instant.
	///
	/// Fails with [`ConfigError::ExpiresInOutOfRange`] when the expiry is not representable.
	pub fn expires_in(mut self, duration: Duration) -> Result<Self> {
		let expires_at =
			self.issued_at.checked_add(duration).ok_or(ConfigError::ExpiresInOutOfRange)?;

		self.expires_at = Some(expires_at);

		Ok(self)
	}

	/// Returns `true` if the token carries an expiry at or before `instant`.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		self.expires_at.is_some_and(|expires_at| instant >= expires_at)
	}

	/// Returns `true` if the token is expired relative to the current clock.
	pub fn is_expired(&self) -> bool {
		self.is_expired_at(OffsetDateTime::now_utc())
	}
}
impl Debug for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AccessToken")
			.field("secret", &"<redacted>")
			.field("issued_at", &self.issued_at)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}
