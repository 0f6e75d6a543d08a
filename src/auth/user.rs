//! Facebook identity record resolved from the Graph API `me` endpoint.

// self
use crate::_prelude::*;

/// A Facebook user.
///
/// User ids are unique per app (app-scoped ids), not across apps. Fields missing from the
/// Graph response decode as empty strings; an empty `id` marks the record unusable.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
	/// App-scoped user id.
	pub id: String,
	/// Display name.
	pub name: String,
	/// Primary email; empty when the `email` permission was not granted.
	pub email: String,
}
impl User {
	/// Returns `true` when the record carries a non-empty id.
	pub fn has_id(&self) -> bool {
		!self.id.is_empty()
	}
}
