//! Service identity

use serde::{Deserialize, Serialize};

/// Identity strings reported by `describe`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceIdentity {
    pub id: String,
    pub version: String,
}

impl ServiceIdentity {
    pub fn new(id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: version.into(),
        }
    }
}

impl Default for ServiceIdentity {
    fn default() -> Self {
        Self {
            id: "testbed-messaging".to_string(),
            version: "1.0.0".to_string(),
        }
    }
}
