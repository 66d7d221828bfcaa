use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::decode::Entity;

/// Instance metadata from `meta`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub uri: String,
    /// Server software version, e.g. `2024.11.0`.
    pub version: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub maintainer_name: Option<String>,
    #[serde(default)]
    pub maintainer_email: Option<String>,
    pub langs: Vec<String>,
    #[serde(default)]
    pub icon_url: Option<String>,
    #[serde(default)]
    pub banner_url: Option<String>,
    pub disable_registration: bool,
    pub email_required_for_signup: bool,
    pub max_note_text_length: u64,
    /// Feature flags. Only the detailed form carries them.
    #[serde(default)]
    pub features: Option<BTreeMap<String, Value>>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Entity for Meta {
    const NAME: &'static str = "Meta";
}

impl Meta {
    /// Whether a feature flag is present and `true`.
    pub fn has_feature(&self, name: &str) -> bool {
        matches!(
            self.features.as_ref().and_then(|f| f.get(name)),
            Some(Value::Bool(true))
        )
    }
}
