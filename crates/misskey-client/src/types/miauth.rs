use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::user::UserDetailed;
use crate::decode::Entity;

/// Outcome of polling a MiAuth session.
///
/// `ok` stays `false` until the user approves the session in a browser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MiAuthResult {
    pub ok: bool,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<UserDetailed>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Entity for MiAuthResult {
    const NAME: &'static str = "MiAuthResult";
}
