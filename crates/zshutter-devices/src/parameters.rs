//! Configuration-parameter profile.
//!
//! A name -> `{index, size}` table carried next to the descriptor table.
//! It plays no part in command translation; the core only validates it and
//! frames `CONFIGURATION_SET` values for whoever persists settings.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::protocol::mapping::{MappingError, MappingResult};

/// Parameter sizes the configuration command class allows.
pub const VALID_SIZES: [u8; 3] = [1, 2, 4];

/// One configuration parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationParameter {
    /// Parameter number on the device
    pub index: u8,
    /// Value size in bytes
    pub size: u8,
}

impl ConfigurationParameter {
    /// Inclusive value range: signed minimum up to unsigned maximum.
    pub fn value_range(&self) -> (i64, i64) {
        let bits = u32::from(self.size) * 8;
        (-(1i64 << (bits - 1)), (1i64 << bits) - 1)
    }
}

/// Configuration parameters keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterProfile {
    parameters: BTreeMap<String, ConfigurationParameter>,
}

impl ParameterProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a JSON profile (`{"name": {"index": 10, "size": 2}}`).
    pub fn from_json_str(json: &str) -> MappingResult<Self> {
        let profile: Self =
            serde_json::from_str(json).map_err(|e| MappingError::Profile(e.to_string()))?;
        profile.validate()?;
        Ok(profile)
    }

    /// Load and validate a JSON profile from disk.
    pub fn from_path(path: impl AsRef<Path>) -> MappingResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| MappingError::Profile(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }

    /// Add a parameter, returning the entry it replaced.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        index: u8,
        size: u8,
    ) -> Option<ConfigurationParameter> {
        self.parameters.insert(name.into(), ConfigurationParameter { index, size })
    }

    pub fn get(&self, name: &str) -> Option<&ConfigurationParameter> {
        self.parameters.get(name)
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigurationParameter)> {
        self.parameters.iter().map(|(name, p)| (name.as_str(), p))
    }

    /// Indices must be unique and sizes one of 1, 2 or 4.
    pub fn validate(&self) -> MappingResult<()> {
        let mut by_index: HashMap<u8, &str> = HashMap::with_capacity(self.parameters.len());
        for (name, parameter) in &self.parameters {
            if !VALID_SIZES.contains(&parameter.size) {
                return Err(MappingError::InvalidParameterSize {
                    name: name.clone(),
                    size: parameter.size,
                });
            }
            if let Some(existing) = by_index.insert(parameter.index, name) {
                return Err(MappingError::DuplicateParameterIndex {
                    index: parameter.index,
                    existing: existing.to_string(),
                    conflicting: name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Frame a value for the named parameter.
    pub fn configuration_set(&self, name: &str, value: i64) -> MappingResult<ConfigurationSet> {
        let parameter = self
            .get(name)
            .ok_or_else(|| MappingError::UnknownParameter(name.to_string()))?;

        let (min, max) = parameter.value_range();
        if value < min || value > max {
            return Err(MappingError::ParameterOutOfRange {
                name: name.to_string(),
                value,
                size: parameter.size,
            });
        }

        Ok(ConfigurationSet {
            index: parameter.index,
            size: parameter.size,
            value,
        })
    }
}

/// `CONFIGURATION_SET` frame contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationSet {
    pub index: u8,
    pub size: u8,
    pub value: i64,
}

impl ConfigurationSet {
    /// Value bytes, big-endian, `size` bytes wide.
    pub fn value_bytes(&self) -> Vec<u8> {
        let bytes = self.value.to_be_bytes();
        bytes[bytes.len() - self.size as usize..].to_vec()
    }
}
