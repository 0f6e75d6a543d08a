//! Transport primitives shared by the token exchange and the Graph API client.
//!
//! [`HttpTransport`] is the crate's only dependency on an HTTP stack. Both outbound calls of a
//! login (the code exchange and the `me` lookup) go through handles it produces, and each handle
//! publishes [`ResponseMetadata`] into a per-call [`ResponseMetadataSlot`] so error mapping can
//! report the status and Retry-After hint of the response that failed.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// crates.io
use oauth2::{
	AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse,
	http::header::{HeaderMap, RETRY_AFTER},
};
use time::format_description::well_known::Rfc2822;
// self
use crate::{_prelude::*, error::TransportError};

/// Abstraction over HTTP transports able to execute the login's outbound requests.
///
/// Implementations must be `Send + Sync + 'static` so one transport can back every handler of a
/// server, and the handles they return must own whatever state their request futures need so
/// those futures stay `Send` across executor hops.
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// [`AsyncHttpClient`] handle tied to a [`ResponseMetadataSlot`].
	type Handle: for<'c> AsyncHttpClient<
			'c,
			Error = HttpClientError<Self::TransportError>,
			Future: 'c + Send,
		>
		+ 'static
		+ Send
		+ Sync;

	/// Builds an [`AsyncHttpClient`] handle that records outcomes in `slot`.
	///
	/// # Metadata Contract
	///
	/// - Call [`ResponseMetadataSlot::take`] before submitting the request.
	/// - Once a response (successful or not) is available, save its status and headers with
	///   [`ResponseMetadataSlot::store`].
	fn with_metadata(&self, slot: ResponseMetadataSlot) -> Self::Handle;
}

/// Metadata captured from the most recent HTTP response.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResponseMetadata {
	/// HTTP status code, if a response arrived.
	pub status: Option<u16>,
	/// Retry-After hint expressed as a relative duration.
	pub retry_after: Option<Duration>,
}
impl ResponseMetadata {
	/// Captures status and Retry-After from a raw response.
	pub fn from_response(response: &HttpResponse) -> Self {
		Self {
			status: Some(response.status().as_u16()),
			retry_after: parse_retry_after(response.headers()),
		}
	}

	/// Returns `true` when the captured status is exactly `200 OK`.
	pub fn is_ok(&self) -> bool {
		self.status == Some(StatusCode::OK.as_u16())
	}
}

/// Thread-safe slot for sharing [`ResponseMetadata`] between transport and error layers.
#[derive(Clone, Debug, Default)]
pub struct ResponseMetadataSlot(Arc<Mutex<Option<ResponseMetadata>>>);
impl ResponseMetadataSlot {
	/// Stores new metadata for the current request.
	pub fn store(&self, meta: ResponseMetadata) {
		*self.0.lock() = Some(meta);
	}

	/// Returns the captured metadata, if any, consuming it from the slot.
	pub fn take(&self) -> Option<ResponseMetadata> {
		self.0.lock().take()
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Neither the token endpoint nor Graph `me` should redirect; configure any custom client
/// accordingly before wrapping it.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestHttpClient {
	type Handle = InstrumentedHandle;
	type TransportError = ReqwestError;

	fn with_metadata(&self, slot: ResponseMetadataSlot) -> Self::Handle {
		InstrumentedHandle(Arc::new(InstrumentedHttpClient { client: self.0.clone(), slot }))
	}
}

#[cfg(feature = "reqwest")]
struct InstrumentedHttpClient {
	client: ReqwestClient,
	slot: ResponseMetadataSlot,
}

/// Handle returned by [`ReqwestHttpClient`] that records response metadata.
#[cfg(feature = "reqwest")]
#[derive(Clone)]
pub struct InstrumentedHandle(Arc<InstrumentedHttpClient>);
#[cfg(feature = "reqwest")]
impl<'c> AsyncHttpClient<'c> for InstrumentedHandle {
	type Error = HttpClientError<ReqwestError>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send + Sync>>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		let inner = Arc::clone(&self.0);

		Box::pin(async move {
			inner.slot.take();

			let response = inner
				.client
				.execute(request.try_into().map_err(Box::new)?)
				.await
				.map_err(Box::new)?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let retry_after = parse_retry_after(&headers);

			inner.slot.store(ResponseMetadata { status: Some(status.as_u16()), retry_after });

			let mut raw = HttpResponse::new(response.bytes().await.map_err(Box::new)?.to_vec());

			*raw.status_mut() = status;
			*raw.headers_mut() = headers;

			Ok(raw)
		})
	}
}

/// Maps a transport failure raised while calling `endpoint` into [`TransportError`].
pub(crate) fn transport_error<E>(endpoint: &'static str, err: HttpClientError<E>) -> TransportError
where
	E: 'static + Send + Sync + StdError,
{
	match err {
		HttpClientError::Reqwest(inner) => TransportError::network(endpoint, inner),
		HttpClientError::Http(inner) => TransportError::network(endpoint, inner),
		HttpClientError::Io(inner) => TransportError::Io(inner),
		HttpClientError::Other(message) => TransportError::Other { message },
		_ => TransportError::Other { message: format!("unrecognized failure calling {endpoint}") },
	}
}

fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
	let raw = headers.get(RETRY_AFTER)?.to_str().ok()?.trim();

	if let Ok(secs) = raw.parse::<u64>() {
		return Some(Duration::seconds(i64::try_from(secs).ok()?));
	}
	if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
		let delta = moment - OffsetDateTime::now_utc();

		if delta.is_positive() {
			return Some(delta);
		}
	}

	None
}
