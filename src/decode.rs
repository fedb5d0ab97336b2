//! Payload decoding for the remote collections
//!
//! Every collection endpoint returns a JSON array of records. Decoding is
//! pure and stateless; failures carry the resource name so a malformed
//! `users` payload can be told apart from a malformed `posts` payload.

use crate::error::DecodeError;
use serde::de::DeserializeOwned;

/// Decode a JSON array payload into a vector of records
///
/// `resource` names the collection in the error, normally
/// [`Resource::name`](crate::types::Resource::name).
///
/// # Errors
/// Returns [`DecodeError`] if the payload is not valid JSON or is not an
/// array of records of type `T`.
pub fn decode_records<T: DeserializeOwned>(
    resource: &'static str,
    payload: &[u8],
) -> Result<Vec<T>, DecodeError> {
    serde_json::from_slice(payload).map_err(|source| DecodeError { resource, source })
}
