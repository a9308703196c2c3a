//! Config schema and value descriptors
//!
//! A schema maps each field name to either a plain default value or a
//! default carrying metadata: an environment-variable override name and an
//! interactive prompt policy. The two cases are a tagged variant so the
//! resolution engine can tell them apart at runtime even when both wrap the
//! same base type.

use serde_json::Value;
use std::collections::BTreeMap;

/// When to prompt for a field whose resolved value is still empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptPolicy {
    /// Prompt with a generated message naming the key
    Ask,
    /// Prompt with this literal message
    AskWith(String),
}

/// Metadata attached to a described default value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescriptorOptions {
    /// Environment variable consulted after explicit overrides
    pub env_override: Option<String>,
    /// Prompt policy for values still empty after all non-interactive sources
    pub prompt: Option<PromptPolicy>,
}

/// A schema entry: a raw default, or a default with metadata
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaValue {
    /// A bare default value with no metadata
    Plain(Value),
    /// A default value plus descriptor options
    Described {
        /// The default value; its base type is the field's type
        default: Value,
        /// Env-override and prompt metadata
        options: DescriptorOptions,
    },
}

impl SchemaValue {
    /// The default value, regardless of variant
    pub const fn default_value(&self) -> &Value {
        match self {
            Self::Plain(value) | Self::Described { default: value, .. } => value,
        }
    }

    /// Descriptor options, if this entry carries any
    pub const fn options(&self) -> Option<&DescriptorOptions> {
        match self {
            Self::Plain(_) => None,
            Self::Described { options, .. } => Some(options),
        }
    }
}

/// Full shape of a configuration object: field name to default-or-descriptor.
///
/// Never mutated by the resolution engine; snapshots are built from owned
/// clones of the defaults.
#[derive(Debug, Clone, Default)]
pub struct ConfigSchema {
    entries: BTreeMap<String, SchemaValue>,
}

impl ConfigSchema {
    /// Create an empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field with a plain default value
    #[must_use]
    pub fn with_default(mut self, key: &str, default: impl Into<Value>) -> Self {
        self.entries
            .insert(key.to_string(), SchemaValue::Plain(default.into()));
        self
    }

    /// Add a field with a default value and descriptor options
    #[must_use]
    pub fn with_described(
        mut self,
        key: &str,
        default: impl Into<Value>,
        options: DescriptorOptions,
    ) -> Self {
        self.entries.insert(
            key.to_string(),
            SchemaValue::Described {
                default: default.into(),
                options,
            },
        );
        self
    }

    /// Whether the schema declares this key
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterate over entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &SchemaValue)> {
        self.entries.iter()
    }

    /// Number of declared fields
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the schema declares no fields
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Whether a value counts as empty for prompting purposes.
///
/// Matches null, false, zero, and the empty string.
pub(crate) fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}
