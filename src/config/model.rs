//! Serde data structures for the services file.
//!
//! Contains [`Config`] (the root) and [`Service`]. Both derive
//! `Serialize` and `Deserialize` with `deny_unknown_fields` for strict
//! parsing.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub services: Vec<Service>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Service {
    pub name: String,

    pub id: String,

    /// Dictionary id recorded by a previous run. Never trusted: the
    /// remote id is re-resolved on every run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dictionary: Option<String>,
}

impl Service {
    /// The locally recorded dictionary id, treating `""` as absent.
    #[must_use]
    pub fn recorded_dictionary(&self) -> Option<&str> {
        self.dictionary.as_deref().filter(|d| !d.is_empty())
    }
}
