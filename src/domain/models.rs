use geo::MultiPolygon;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Double,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub field_type: FieldType,
    #[serde(default)]
    pub alias: String,
}

impl FieldDef {
    pub fn new(name: &str, field_type: FieldType, alias: &str) -> Self {
        Self {
            name: name.to_string(),
            field_type,
            alias: alias.to_string(),
        }
    }
}

/// One vector feature: an opaque polygon geometry (lon/lat) plus its
/// attribute row. Attribute values are JSON scalars; a `Null` value is an
/// empty cell (a field declared but not populated for this row).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    pub geometry: MultiPolygon<f64>,
    pub attrs: BTreeMap<String, serde_json::Value>,
}

impl Feature {
    pub fn attr_str(&self, field: &str) -> Option<&str> {
        self.attrs.get(field).and_then(|v| v.as_str())
    }

    pub fn attr_f64(&self, field: &str) -> Option<f64> {
        self.attrs.get(field).and_then(|v| v.as_f64())
    }

    pub fn set_attr(&mut self, field: &str, value: serde_json::Value) {
        self.attrs.insert(field.to_string(), value);
    }
}

/// A named dataset: declared schema plus feature rows. Both the external
/// sources and the scratch-store intermediates use this shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureClass {
    pub name: String,
    pub fields: Vec<FieldDef>,
    pub features: Vec<Feature>,
}

impl FeatureClass {
    pub fn empty(name: &str, fields: Vec<FieldDef>) -> Self {
        Self {
            name: name.to_string(),
            fields,
            features: Vec::new(),
        }
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }
}
