use crate::error::Error;
use hyper::{
    body::Bytes,
    header::{HeaderName, HeaderValue},
    HeaderMap,
};
use std::collections::BTreeMap;

/// Repeated headers are joined with `", "` in the order they arrived.
pub fn extract_headers(header_map: &HeaderMap) -> BTreeMap<String, String> {
    // it currently ignores header values with opaque characters
    let mut headers = BTreeMap::<String, String>::new();
    for (key, value) in header_map
        .iter()
        .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str(), v)))
    {
        headers
            .entry(String::from(key))
            .and_modify(|joined| {
                joined.push_str(", ");
                joined.push_str(value);
            })
            .or_insert_with(|| String::from(value));
    }

    headers
}

pub fn put_headers<'a, I: IntoIterator<Item = (&'a String, &'a String)>>(
    header_map: &mut HeaderMap<HeaderValue>,
    headers: I,
) -> Result<(), Error> {
    for (key, value) in headers {
        let header_name = HeaderName::from_lowercase(key.to_lowercase().as_bytes())?;
        let header_value = HeaderValue::from_str(value)?;
        header_map.append(header_name, header_value);
    }

    Ok(())
}

/// An empty payload is treated as "no body" so GET requests don't record `""`. Bodies that aren't
/// UTF-8 can't be kept in a contract and are an [`Error::InvalidBody`].
pub fn body_text(bytes: &Bytes) -> Result<Option<String>, Error> {
    if bytes.is_empty() {
        return Ok(None);
    }

    String::from_utf8(bytes.to_vec())
        .map(Some)
        .map_err(|_| Error::InvalidBody)
}
