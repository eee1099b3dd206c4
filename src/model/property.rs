use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Well-known property keys shared by the analyzer and the emitters.
pub mod keys {
    pub const VARIABLE: &str = "variable";
    pub const TYPE: &str = "type";
    pub const EXPRESSION: &str = "expression";
    pub const CONDITION: &str = "condition";
    pub const CLIENT: &str = "client";
    pub const PATH: &str = "path";
    pub const TARGET_TYPE: &str = "targetType";
    pub const COLLECTION: &str = "collection";
    pub const SUBJECT: &str = "subject";
    pub const STATEMENT: &str = "statement";
    pub const METHOD: &str = "method";
    pub const VIEW: &str = "view";

    /// Keys that never serialize as call arguments: they describe the
    /// binding and diagram view, not the call itself.
    pub const INTERNAL: &[&str] = &[VARIABLE, TYPE, VIEW];
}

/// How a property's value should be edited and re-parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueType {
    Expression,
    TypeDescriptor,
    Identifier,
    Choice(Vec<String>),
}

/// A reference back to the catalog parameter a property was derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterRef {
    pub name: String,
    pub type_signature: String,
    pub default_value: Option<String>,
    pub optional: bool,
}

/// One displayable, possibly editable value attached to a node or branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub label: String,
    pub value: String,
    pub value_type: ValueType,
    pub editable: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub documentation: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub advanced: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub parameter: Option<ParameterRef>,
}

impl Property {
    pub fn builder() -> PropertyBuilder {
        PropertyBuilder::default()
    }

    /// Shorthand for an editable expression-valued property.
    pub fn expression(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self::builder()
            .label(label)
            .value(value)
            .value_type(ValueType::Expression)
            .editable()
            .build()
    }

    /// Shorthand for an editable identifier-valued property.
    pub fn identifier(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self::builder()
            .label(label)
            .value(value)
            .value_type(ValueType::Identifier)
            .editable()
            .build()
    }

    /// Shorthand for a type-descriptor property.
    pub fn type_descriptor(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self::builder()
            .label(label)
            .value(value)
            .value_type(ValueType::TypeDescriptor)
            .editable()
            .build()
    }
}

/// Step-wise construction of a [`Property`].
#[derive(Debug, Clone)]
pub struct PropertyBuilder {
    label: String,
    value: String,
    value_type: ValueType,
    editable: bool,
    documentation: Option<String>,
    advanced: bool,
    parameter: Option<ParameterRef>,
}

impl Default for PropertyBuilder {
    fn default() -> Self {
        Self {
            label: String::new(),
            value: String::new(),
            value_type: ValueType::Expression,
            editable: false,
            documentation: None,
            advanced: false,
            parameter: None,
        }
    }
}

impl PropertyBuilder {
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn value_type(mut self, value_type: ValueType) -> Self {
        self.value_type = value_type;
        self
    }

    pub fn editable(mut self) -> Self {
        self.editable = true;
        self
    }

    pub fn documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }

    pub fn advanced(mut self) -> Self {
        self.advanced = true;
        self
    }

    pub fn parameter(mut self, parameter: ParameterRef) -> Self {
        self.parameter = Some(parameter);
        self
    }

    pub fn build(self) -> Property {
        Property {
            label: self.label,
            value: self.value,
            value_type: self.value_type,
            editable: self.editable,
            documentation: self.documentation,
            advanced: self.advanced,
            parameter: self.parameter,
        }
    }
}

/// An insertion-ordered property map with unique keys. Order is significant
/// for rendering and for positional argument emission, so a plain hash map
/// will not do.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyBag {
    entries: Vec<(String, Property)>,
}

impl PropertyBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a property under `key`. An existing key is overwritten in
    /// place, keeping its original position.
    pub fn insert(&mut self, key: impl Into<String>, property: Property) {
        let key = key.into();
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = property;
        } else {
            self.entries.push((key, property));
        }
    }

    pub fn get(&self, key: &str) -> Option<&Property> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, p)| p)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Property)> {
        self.entries.iter().map(|(k, p)| (k.as_str(), p))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for PropertyBag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, property) in &self.entries {
            map.serialize_entry(key, property)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for PropertyBag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct BagVisitor;

        impl<'de> Visitor<'de> for BagVisitor {
            type Value = PropertyBag;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a property map")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut bag = PropertyBag::new();
                while let Some((key, property)) = access.next_entry::<String, Property>()? {
                    bag.insert(key, property);
                }
                Ok(bag)
            }
        }

        deserializer.deserialize_map(BagVisitor)
    }
}
