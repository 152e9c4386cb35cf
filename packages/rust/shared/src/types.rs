//! Core domain types for municipality adjacency data.

use serde::{Deserialize, Serialize};

/// Default header name of the primary entity field.
pub const DEFAULT_ENTITY_COLUMN: &str = "NM_MUN";

/// Default header name of the neighbor field.
pub const DEFAULT_NEIGHBOR_COLUMN: &str = "NM_LIM";

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// One directed adjacency edge: `entity` borders `neighbor`.
///
/// Values are kept exactly as they appear in the source line. A row that is
/// too short for a resolved column position yields an empty string there.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    /// Primary municipality name.
    pub entity: String,
    /// Name of a municipality bordering `entity`.
    pub neighbor: String,
}

impl Record {
    pub fn new(entity: impl Into<String>, neighbor: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            neighbor: neighbor.into(),
        }
    }

    /// Whether the entity value is usable as a selector entry.
    pub fn has_entity(&self) -> bool {
        !self.entity.trim().is_empty()
    }

    /// Whether the neighbor value is usable as a result entry.
    pub fn has_neighbor(&self) -> bool {
        !self.neighbor.trim().is_empty()
    }
}

// ---------------------------------------------------------------------------
// ColumnNames
// ---------------------------------------------------------------------------

/// Header field names that locate the two required columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnNames {
    pub entity: String,
    pub neighbor: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            entity: DEFAULT_ENTITY_COLUMN.into(),
            neighbor: DEFAULT_NEIGHBOR_COLUMN.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// SelectOption
// ---------------------------------------------------------------------------

/// A single entry handed to the selection widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    /// Value reported back when the entry is chosen (empty = no selection).
    pub value: String,
    /// Text shown to the user.
    pub label: String,
    /// Disabled entries are shown but cannot be chosen.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
}

impl SelectOption {
    /// An entry whose value and label are the same municipality name.
    pub fn entity(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            value: name.clone(),
            label: name,
            disabled: false,
        }
    }

    /// The leading "no selection" entry.
    pub fn placeholder(label: impl Into<String>) -> Self {
        Self {
            value: String::new(),
            label: label.into(),
            disabled: false,
        }
    }

    /// A non-selectable status entry (loading, error).
    pub fn notice(label: impl Into<String>) -> Self {
        Self {
            value: String::new(),
            label: label.into(),
            disabled: true,
        }
    }

    /// Whether choosing this entry means "nothing selected".
    pub fn is_placeholder(&self) -> bool {
        self.value.is_empty()
    }
}
