//! Panel Fault Data Module
//!
//! The fault table pairs one boolean per panel slot with the layout's
//! row-major enumeration order: entry `i` belongs to the `i`-th placement
//! (row 0 left to right, then row 1, and so on).

use serde::Deserialize;
use std::path::Path;

use crate::error::TwinError;

// ===================== FAULT TABLE =====================

/// Ordered fault flags, one per panel slot in row-major order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FaultTable {
    flags: Vec<bool>,
}

impl FaultTable {
    /// Table of `count` slots with no faults.
    pub fn healthy(count: usize) -> Self {
        Self { flags: vec![false; count] }
    }

    /// Table of `count` slots where the listed indices are faulty.
    ///
    /// # Errors
    /// Returns `OutOfRangeFault` if an index does not fit in the table.
    pub fn with_faulty(count: usize, faulty: &[usize]) -> Result<Self, TwinError> {
        let mut table = Self::healthy(count);
        for &index in faulty {
            let slot = table
                .flags
                .get_mut(index)
                .ok_or(TwinError::OutOfRangeFault { required: index + 1, available: count })?;
            *slot = true;
        }
        Ok(table)
    }

    /// Parse a fault document of the form `{"panels": [{"hasError": false}, ...]}`.
    pub fn from_json(json: &str) -> Result<Self, TwinError> {
        let doc: FaultDocument = serde_json::from_str(json)?;
        Ok(doc.into())
    }

    /// Read a fault document from disk.
    pub fn load(path: &Path) -> Result<Self, TwinError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Fault flag of slot `index`, or None past the end of the table.
    pub fn get(&self, index: usize) -> Option<bool> {
        self.flags.get(index).copied()
    }

    /// Indices of all faulty slots.
    pub fn faulty_indices(&self) -> Vec<usize> {
        self.flags.iter().enumerate().filter(|(_, f)| **f).map(|(i, _)| i).collect()
    }
}

impl From<Vec<bool>> for FaultTable {
    fn from(flags: Vec<bool>) -> Self {
        Self { flags }
    }
}

// ===================== JSON DOCUMENT =====================

#[derive(Debug, Deserialize)]
struct FaultDocument {
    panels: Vec<PanelStatus>,
}

#[derive(Debug, Deserialize)]
struct PanelStatus {
    #[serde(rename = "hasError", default)]
    has_error: bool,
}

impl From<FaultDocument> for FaultTable {
    fn from(doc: FaultDocument) -> Self {
        doc.panels.into_iter().map(|p| p.has_error).collect::<Vec<_>>().into()
    }
}

// ===================== TESTS =====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_faulty_marks_only_listed_slots() {
        let table = FaultTable::with_faulty(25, &[16]).unwrap();
        assert_eq!(table.len(), 25);
        assert_eq!(table.get(16), Some(true));
        assert_eq!(table.get(15), Some(false));
        assert_eq!(table.get(25), None);
        assert_eq!(table.faulty_indices(), vec![16]);
    }

    #[test]
    fn test_with_faulty_rejects_index_past_end() {
        let err = FaultTable::with_faulty(10, &[3, 10]).unwrap_err();
        assert!(matches!(err, TwinError::OutOfRangeFault { required: 11, available: 10 }));
    }

    #[test]
    fn test_from_json_document() {
        let json = r#"{"panels": [{"hasError": false}, {"hasError": true}, {}]}"#;
        let table = FaultTable::from_json(json).unwrap();
        assert_eq!(table, FaultTable::from(vec![false, true, false]));
    }

    #[test]
    fn test_from_json_rejects_malformed_input() {
        assert!(matches!(FaultTable::from_json("{\"panels\": 3}"), Err(TwinError::Json(_))));
        assert!(matches!(FaultTable::from_json("not json"), Err(TwinError::Json(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let err = FaultTable::load(Path::new("/nonexistent/faults.json")).unwrap_err();
        assert!(matches!(err, TwinError::Io(_)));
    }
}
