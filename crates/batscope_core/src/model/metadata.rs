//! Run header information shared by scalar and vector files

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// strptime format of the `datetime` run attribute
pub const DATETIME_FORMAT: &str = "%Y%m%d-%H:%M:%S";

/// Header lines (`version`, `run`, `attr`) collected while parsing a file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    /// Result file format version
    pub version: Option<u32>,
    /// Run identifier as written by the simulator
    pub run_id: Option<String>,
    /// `attr` key/value pairs (configname, datetime, network, ...)
    pub attributes: BTreeMap<String, String>,
}

impl RunMetadata {
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Name of the simulation configuration this run belongs to
    pub fn config_name(&self) -> Option<&str> {
        self.attribute("configname")
    }

    /// Run start time parsed from the `datetime` attribute
    pub fn started_at(&self) -> Option<jiff::civil::DateTime> {
        let raw = self.attribute("datetime")?;
        match jiff::civil::DateTime::strptime(DATETIME_FORMAT, raw) {
            Ok(dt) => Some(dt),
            Err(err) => {
                tracing::debug!("ignoring unparsable run datetime {raw:?}: {err}");
                None
            }
        }
    }

    /// Fill fields that are still unset from another file of the same run
    pub fn merge_missing(&mut self, other: &RunMetadata) {
        if self.version.is_none() {
            self.version = other.version;
        }
        if self.run_id.is_none() {
            self.run_id.clone_from(&other.run_id);
        }
        for (key, value) in &other.attributes {
            self.attributes
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
    }
}
