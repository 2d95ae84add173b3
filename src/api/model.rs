//! Serde read models for the remote API's JSON responses.
//!
//! Only the fields this tool acts on are required; everything else is
//! optional so that additions on the remote side do not break decoding.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::SwitchError;

/// Service details, as returned by `GET /service/{id}`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ServiceDetails {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub name: String,

    /// Ascending by creation; the last entry is the latest version.
    #[serde(default)]
    pub versions: Vec<ServiceVersion>,
}

impl ServiceDetails {
    #[must_use]
    pub fn latest_version(&self) -> Option<&ServiceVersion> {
        self.versions.last()
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ServiceVersion {
    pub number: u32,

    #[serde(default)]
    pub active: bool,

    #[serde(default)]
    pub deployed: bool,

    #[serde(default)]
    pub locked: bool,

    #[serde(default)]
    pub staging: bool,

    #[serde(default)]
    pub testing: bool,

    #[serde(default)]
    pub service_id: String,

    #[serde(default)]
    pub comment: Option<String>,

    #[serde(default)]
    pub created_at: Option<String>,

    #[serde(default)]
    pub updated_at: Option<String>,

    #[serde(default)]
    pub deleted_at: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Dictionary {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub service_id: String,

    #[serde(default)]
    pub version: u32,

    #[serde(default)]
    pub write_only: bool,

    #[serde(default)]
    pub created_at: Option<String>,

    #[serde(default)]
    pub updated_at: Option<String>,

    #[serde(default)]
    pub deleted_at: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DictionaryItem {
    #[serde(default)]
    pub dictionary_id: String,

    #[serde(default)]
    pub service_id: String,

    pub item_key: String,

    pub item_value: String,
}

/// Decode a response body, naming `what` in the error.
pub fn decode<T: DeserializeOwned>(what: &'static str, body: &str) -> Result<T, SwitchError> {
    serde_json::from_str(body).map_err(|e| SwitchError::Decode { what, source: e })
}
