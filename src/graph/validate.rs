// self
use crate::{_prelude::*, auth::User, error::TransportError, http::ResponseMetadata};

/// Decides whether a Graph `me` outcome identifies a user.
///
/// - Any transport error, or a status other than `200 OK`, yields [`Error::UserRequest`] with the
///   transport error (if any) as its source.
/// - Otherwise a missing user or an empty `id` yields [`Error::InvalidUser`].
/// - Otherwise the outcome is valid.
pub fn validate_response(
	user: Option<&User>,
	metadata: Option<&ResponseMetadata>,
	error: Option<TransportError>,
) -> Result<()> {
	let status = metadata.and_then(|meta| meta.status);

	if error.is_some() || !metadata.is_some_and(ResponseMetadata::is_ok) {
		let reason = match (&error, status) {
			(Some(e), _) => e.to_string().trim_end_matches('.').to_owned(),
			(None, Some(code)) => format!("unexpected status {code}"),
			(None, None) => "no response received".into(),
		};

		return Err(Error::UserRequest { reason, source: error });
	}
	if !user.is_some_and(User::has_id) {
		return Err(Error::InvalidUser);
	}

	Ok(())
}
