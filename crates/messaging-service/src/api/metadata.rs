//! Conversion of HTTP headers into call metadata

use axum::http::HeaderMap;
use testbed_messaging_core::CallMetadata;

/// One metadata entry per header value, in arrival order
///
/// Values that are not valid visible ASCII are skipped.
pub fn call_metadata(headers: &HeaderMap) -> CallMetadata {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|content| (name.as_str().to_string(), content.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use testbed_messaging_core::resolve_reply_address;

    #[test]
    fn test_reply_to_header_reaches_resolver() {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", HeaderValue::from_static("application/json"));
        headers.insert("replyto", HeaderValue::from_static("http://tb:8080/itbsrv/MessagingClient"));

        let metadata = call_metadata(&headers);
        assert_eq!(metadata.entries().len(), 2);
        assert_eq!(
            resolve_reply_address(&metadata).as_deref(),
            Some("http://tb:8080/itbsrv/MessagingClient?wsdl")
        );
    }

    #[test]
    fn test_opaque_values_are_skipped() {
        let mut headers = HeaderMap::new();
        headers.insert("replyto", HeaderValue::from_bytes(b"\xfa\xfb").unwrap());
        assert!(call_metadata(&headers).entries().is_empty());
    }
}
