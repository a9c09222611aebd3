//! Plain-data table descriptions.
//!
//! Field and action descriptions carry no behavior of their own; they
//! reference handler ids that are resolved through a [`Handlers`] registry
//! bound alongside the config. This keeps configurations serializable and
//! testable independent of the closures that implement behavior.
//!
//! [`Handlers`]: crate::Handlers

use serde::{Deserialize, Serialize};

/// Describes one displayable attribute of a record type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Dotted-path attribute key used to read a value from a record.
    pub key: String,
    /// Human-readable column header.
    pub label: String,
    /// Value substituted when the record lacks this attribute.
    #[serde(default)]
    pub default_value: String,
    /// Whether the column is visible by default.
    #[serde(default = "default_true")]
    pub toggled: bool,
    /// Whether this column participates in free-text filtering.
    #[serde(default)]
    pub filterable: bool,
    /// Registered display handler overriding the direct attribute read.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    /// Registered handler invoked when the rendered cell is activated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_select: Option<String>,
}

fn default_true() -> bool {
    true
}

impl FieldSpec {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            default_value: String::new(),
            toggled: true,
            filterable: false,
            display: None,
            on_select: None,
        }
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = value.into();
        self
    }

    pub fn toggled(mut self, toggled: bool) -> Self {
        self.toggled = toggled;
        self
    }

    pub fn filterable(mut self, filterable: bool) -> Self {
        self.filterable = filterable;
        self
    }

    /// Display through the registered handler `id` instead of reading `key`.
    pub fn display_with(mut self, id: impl Into<String>) -> Self {
        self.display = Some(id.into());
        self
    }

    /// Run the registered handler `id` when the cell is activated.
    pub fn on_select(mut self, id: impl Into<String>) -> Self {
        self.on_select = Some(id.into());
        self
    }
}

/// Describes one invocable operation, exposed per-row or on the toolbar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionSpec {
    /// Registered action handler id.
    pub id: String,
    /// Short presentation glyph or tag.
    pub icon: String,
    /// Human-readable label.
    pub label: String,
}

impl ActionSpec {
    pub fn new(id: impl Into<String>, icon: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            icon: icon.into(),
            label: label.into(),
        }
    }
}

/// Full description of a record table: ordered fields plus row-level and
/// toolbar-level actions. Immutable once bound to a table instance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableConfig {
    pub label: String,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
    #[serde(default)]
    pub row_actions: Vec<ActionSpec>,
    #[serde(default)]
    pub toolbar_actions: Vec<ActionSpec>,
}

impl TableConfig {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    pub fn row_action(mut self, action: ActionSpec) -> Self {
        self.row_actions.push(action);
        self
    }

    pub fn toolbar_action(mut self, action: ActionSpec) -> Self {
        self.toolbar_actions.push(action);
        self
    }

    pub fn field_by_key(&self, key: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.key == key)
    }
}
