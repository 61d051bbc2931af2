//! Reply address extraction
//!
//! The test bed tells the adapter where to send asynchronous results through a
//! reply-to header attached to the `initiate` call. The transport hands the
//! headers over as [`CallMetadata`]; this module only deals with plain strings.

/// Name of the header carrying the test bed's reply address
pub const REPLY_TO_HEADER: &str = "ReplyTo";

/// Suffix under which the callback service describes itself
pub const DESCRIPTION_SUFFIX: &str = "?wsdl";

/// One header attached to an inbound call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataEntry {
    pub name: String,
    pub content: String,
}

/// Transport-neutral view of the headers of an inbound call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallMetadata {
    entries: Vec<MetadataEntry>,
}

impl CallMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.push(name, content);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, content: impl Into<String>) {
        self.entries.push(MetadataEntry {
            name: name.into(),
            content: content.into(),
        });
    }

    pub fn entries(&self) -> &[MetadataEntry] {
        &self.entries
    }
}

impl FromIterator<(String, String)> for CallMetadata {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(name, content)| MetadataEntry { name, content })
                .collect(),
        }
    }
}

/// Extract the callback address from inbound call metadata
///
/// The first reply-to header wins. Its content is trimmed and, unless it
/// already ends with the description suffix (any case), the suffix is appended.
/// A header with blank content counts as absent.
pub fn resolve_reply_address(metadata: &CallMetadata) -> Option<String> {
    let entry = metadata
        .entries()
        .iter()
        .find(|entry| entry.name.eq_ignore_ascii_case(REPLY_TO_HEADER))?;

    let trimmed = entry.content.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(normalize_address(trimmed))
}

fn normalize_address(trimmed: &str) -> String {
    let mut address = trimmed.to_string();
    if !address.to_ascii_lowercase().ends_with(DESCRIPTION_SUFFIX) {
        address.push_str(DESCRIPTION_SUFFIX);
    }
    address
}

/// Address of the callable service behind a description address
pub fn service_endpoint(address: &str) -> &str {
    let cut = address.len().saturating_sub(DESCRIPTION_SUFFIX.len());
    match address.get(cut..) {
        Some(tail) if tail.eq_ignore_ascii_case(DESCRIPTION_SUFFIX) => &address[..cut],
        _ => address,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_header_resolves_to_none() {
        let metadata = CallMetadata::new().with_entry("Content-Type", "application/json");
        assert_eq!(resolve_reply_address(&metadata), None);
        assert_eq!(resolve_reply_address(&CallMetadata::new()), None);
    }

    #[test]
    fn test_suffix_is_appended() {
        let metadata = CallMetadata::new().with_entry(REPLY_TO_HEADER, "  http://orchestrator/cb \n");
        assert_eq!(
            resolve_reply_address(&metadata).as_deref(),
            Some("http://orchestrator/cb?wsdl")
        );
    }

    #[test]
    fn test_existing_suffix_is_kept_case_insensitively() {
        let metadata = CallMetadata::new().with_entry("replyto", "http://orchestrator/cb?WSDL");
        assert_eq!(
            resolve_reply_address(&metadata).as_deref(),
            Some("http://orchestrator/cb?WSDL")
        );
    }

    #[test]
    fn test_blank_header_is_absent() {
        let metadata = CallMetadata::new().with_entry(REPLY_TO_HEADER, "   ");
        assert_eq!(resolve_reply_address(&metadata), None);
    }

    #[test]
    fn test_first_header_wins() {
        let metadata: CallMetadata = vec![
            ("X-Other".to_string(), "ignored".to_string()),
            ("ReplyTo".to_string(), "http://first".to_string()),
            ("ReplyTo".to_string(), "http://second".to_string()),
        ]
        .into_iter()
        .collect();
        assert_eq!(resolve_reply_address(&metadata).as_deref(), Some("http://first?wsdl"));
    }

    #[test]
    fn test_service_endpoint_strips_description_suffix() {
        assert_eq!(service_endpoint("http://tb/cb?wsdl"), "http://tb/cb");
        assert_eq!(service_endpoint("http://tb/cb?WSDL"), "http://tb/cb");
        assert_eq!(service_endpoint("http://tb/cb"), "http://tb/cb");
        assert_eq!(service_endpoint("?w"), "?w");
    }
}
