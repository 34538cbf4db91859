//! Institution registry: code to display-name resolution.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{BacenError, Result};

/// One record of the consolidated institutions export.
///
/// Extra fields present in the export are ignored on parse.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstitutionRecord {
    /// Institution code as exported, any width.
    #[serde(rename = "CodInst")]
    pub code: String,
    /// Institution display name.
    #[serde(rename = "NomeInstituicao")]
    pub name: String,
}

/// Registry mapping 8-digit institution codes to display names.
///
/// Codes are zero-padded on insert and on lookup, so both sides of the
/// ledger join agree on the key width.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InstitutionRegistry {
    names: HashMap<String, String>,
}

/// Zero-pads an institution code to 8 digits.
#[must_use]
pub fn pad_code(code: &str) -> String {
    format!("{code:0>8}")
}

impl InstitutionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from parsed records.
    #[must_use]
    pub fn from_records(records: impl IntoIterator<Item = InstitutionRecord>) -> Self {
        let names = records
            .into_iter()
            .map(|r| (pad_code(&r.code), r.name))
            .collect();
        Self { names }
    }

    /// Parses the consolidated institutions JSON export.
    ///
    /// # Errors
    /// Returns [`BacenError::Parse`] if the JSON is malformed.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let records: Vec<InstitutionRecord> =
            serde_json::from_str(json).map_err(|e| BacenError::Parse(e.to_string()))?;
        Ok(Self::from_records(records))
    }

    /// Registers one code/name pair.
    pub fn insert(&mut self, code: impl AsRef<str>, name: impl Into<String>) {
        self.names.insert(pad_code(code.as_ref()), name.into());
    }

    /// Looks up the display name for a code of any width.
    ///
    /// Unmatched codes return `None`; that is expected data, not an error.
    #[must_use]
    pub fn name(&self, code: &str) -> Option<&str> {
        self.names.get(&pad_code(code)).map(String::as_str)
    }

    /// Returns the number of registered institutions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if no institutions are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
