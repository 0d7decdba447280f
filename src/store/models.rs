use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One stored match, kept as the raw JSON element it was read from.
///
/// Every field is untrusted and looked up by name through the configured
/// field map; non-object elements simply have no fields.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchRecord(Value);

impl MatchRecord {
    pub fn from_value(value: Value) -> Self {
        MatchRecord(value)
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }
}

impl From<Value> for MatchRecord {
    fn from(value: Value) -> Self {
        MatchRecord(value)
    }
}
