//! Wire types exchanged with the test bed
//!
//! These mirror the messaging service contract: reports, named content values,
//! parameter declarations and the request/response pairs of each operation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Overall result of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TestResultType {
    Success,
    Failure,
    Warning,
    Undefined,
}

/// How a content value is to be interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValueEmbedding {
    String,
    Base64,
    Uri,
}

/// Named, possibly nested value
///
/// A value of type `"map"` or `"list"` carries its children in `items`,
/// in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnyContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding_method: Option<ValueEmbedding>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<AnyContent>,
}

impl AnyContent {
    /// Create a simple string value
    pub fn simple(name: impl Into<String>, value: impl Into<String>, embedding: ValueEmbedding) -> Self {
        Self {
            name: Some(name.into()),
            value: Some(value.into()),
            content_type: Some("string".to_string()),
            embedding_method: Some(embedding),
            items: Vec::new(),
        }
    }

    /// Create an empty map value
    pub fn map() -> Self {
        Self {
            content_type: Some("map".to_string()),
            ..Default::default()
        }
    }

    /// Look up a direct child by name
    pub fn item(&self, name: &str) -> Option<&AnyContent> {
        self.items.iter().find(|item| item.name.as_deref() == Some(name))
    }
}

/// Collect every input carrying the given name, in order
pub fn inputs_named<'a>(items: &'a [AnyContent], name: &str) -> Vec<&'a AnyContent> {
    items
        .iter()
        .filter(|item| item.name.as_deref() == Some(name))
        .collect()
}

/// Outcome record delivered to the test bed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub result: TestResultType,
    pub date: DateTime<Utc>,
    pub context: AnyContent,
}

impl Report {
    /// Create a report stamped now with an empty map context
    pub fn new(result: TestResultType) -> Self {
        Self {
            result,
            date: Utc::now(),
            context: AnyContent::map(),
        }
    }

    pub fn success() -> Self {
        Self::new(TestResultType::Success)
    }

    pub fn failure() -> Self {
        Self::new(TestResultType::Failure)
    }

    /// Append a named value to the report context
    pub fn with_context_item(mut self, item: AnyContent) -> Self {
        self.context.items.push(item);
        self
    }
}

/// Whether a parameter must be supplied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Usage {
    #[serde(rename = "R")]
    Required,
    #[serde(rename = "O")]
    Optional,
}

/// How a parameter value is provided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConfigurationKind {
    Simple,
    Binary,
    Uri,
}

/// Declared input or output of the module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypedParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: String,
    #[serde(rename = "use")]
    pub usage: Usage,
    pub kind: ConfigurationKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
}

impl TypedParameter {
    pub fn new(
        name: impl Into<String>,
        param_type: impl Into<String>,
        usage: Usage,
        kind: ConfigurationKind,
        desc: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            param_type: param_type.into(),
            usage,
            kind,
            desc: Some(desc.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleMetadata {
    pub name: String,
    pub version: String,
}

/// Capability descriptor returned by `describe`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleDefinition {
    pub id: String,
    pub metadata: ModuleMetadata,
    pub inputs: Vec<TypedParameter>,
}

/// A single key/value configuration entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    pub name: String,
    pub value: String,
}

/// Configuration supplied for one actor of the test case
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorConfiguration {
    #[serde(default)]
    pub actor: String,
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub config: Vec<Configuration>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiateRequest {
    #[serde(default)]
    pub actor_configuration: Vec<ActorConfiguration>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiateResponse {
    pub session_id: String,
    #[serde(default)]
    pub configs: Vec<ActorConfiguration>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendRequest {
    pub session_id: String,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub config: Vec<Configuration>,
    #[serde(default)]
    pub input: Vec<AnyContent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendResponse {
    pub report: Report,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiveRequest {
    pub session_id: String,
    #[serde(default)]
    pub call_id: Option<String>,
    #[serde(default)]
    pub input: Vec<AnyContent>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeginTransactionRequest {
    pub session_id: String,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub config: Vec<Configuration>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicRequest {
    pub session_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizeRequest {
    pub session_id: String,
}

/// Payload of the outbound notification to the test bed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotifyForMessageRequest {
    pub session_id: String,
    pub report: Report,
}

/// Empty acknowledgement returned by operations without output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgement {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_report_has_empty_map_context() {
        let report = Report::new(TestResultType::Warning);
        assert_eq!(report.result, TestResultType::Warning);
        assert_eq!(report.context.content_type.as_deref(), Some("map"));
        assert!(report.context.items.is_empty());
    }

    #[test]
    fn test_context_items_keep_insertion_order() {
        let report = Report::success()
            .with_context_item(AnyContent::simple("b", "2", ValueEmbedding::String))
            .with_context_item(AnyContent::simple("a", "1", ValueEmbedding::String));

        let names: Vec<_> = report.context.items.iter().filter_map(|i| i.name.as_deref()).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(report.context.item("a").and_then(|i| i.value.as_deref()), Some("1"));
    }

    #[test]
    fn test_inputs_named_collects_duplicates() {
        let items = vec![
            AnyContent::simple("messageToSend", "one", ValueEmbedding::String),
            AnyContent::simple("other", "x", ValueEmbedding::String),
            AnyContent::simple("messageToSend", "two", ValueEmbedding::String),
        ];
        let found = inputs_named(&items, "messageToSend");
        assert_eq!(found.len(), 2);
        assert!(inputs_named(&items, "missing").is_empty());
    }

    #[test]
    fn test_send_request_wire_format() {
        let request: SendRequest = serde_json::from_value(json!({
            "sessionId": "abc",
            "input": [{ "name": "messageToSend", "value": "hello", "type": "string", "embeddingMethod": "STRING" }]
        }))
        .unwrap();

        assert_eq!(request.session_id, "abc");
        assert_eq!(request.input[0].embedding_method, Some(ValueEmbedding::String));
        assert!(request.config.is_empty());
    }

    #[test]
    fn test_result_and_usage_serialization() {
        assert_eq!(serde_json::to_value(TestResultType::Failure).unwrap(), json!("FAILURE"));
        let param = TypedParameter::new("p", "string", Usage::Optional, ConfigurationKind::Simple, "d");
        let value = serde_json::to_value(&param).unwrap();
        assert_eq!(value["use"], json!("O"));
        assert_eq!(value["kind"], json!("SIMPLE"));
        assert_eq!(value["type"], json!("string"));
    }
}
