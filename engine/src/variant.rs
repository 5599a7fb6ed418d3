//! Variant axes, options, and the materialized child records.

use crate::VariantKey;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single selectable value on one axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantOption {
    /// Display value, e.g. "Red"
    pub value: String,
}

impl VariantOption {
    /// Create a new option.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

/// A named axis owning an ordered list of options.
///
/// Option order is significant: the 1-based position of an option is what a
/// variant key encodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantType {
    /// Axis name, e.g. "Color"
    pub value: String,
    /// Ordered options for this axis
    pub options: Vec<VariantOption>,
}

impl VariantType {
    /// Create a new axis from already-built options.
    pub fn new(value: impl Into<String>, options: Vec<VariantOption>) -> Self {
        Self {
            value: value.into(),
            options,
        }
    }

    /// Create a new axis from plain string values.
    pub fn with_values<I, S>(value: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            value: value.into(),
            options: values.into_iter().map(VariantOption::new).collect(),
        }
    }

    /// Number of options on this axis.
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    /// Look up an option value by 1-based index. Index 0 and out-of-range
    /// indices resolve to `None`.
    pub fn option_value(&self, index: usize) -> Option<&str> {
        let slot = index.checked_sub(1)?;
        self.options.get(slot).map(|o| o.value.as_str())
    }
}

/// One resolved axis pick inside a selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionItem {
    /// Position of the axis in the type list
    pub type_index: usize,
    /// 1-based option index on that axis
    pub option_index: usize,
    /// Axis name
    pub type_value: String,
    /// Picked option value; empty when the index resolved to nothing
    pub option_value: String,
}

/// An ordered, possibly partial set of axis picks. The evaluation context for
/// conditions.
pub type Selection = Vec<SelectionItem>;

/// A materialized combination record.
///
/// The typed fields cover the catalog basics; `extra` carries any additional
/// caller fields and is flattened into the same JSON object. Field transforms
/// address every slot, typed or extra, by its serialized name (`"cost"`,
/// `"sku"`, `"imageIds"`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildVariant {
    /// Key identifying which combination this record belongs to
    pub variant_key: VariantKey,
    /// Optional display title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Stock keeping unit, empty until the user fills it in
    pub sku: String,
    /// Unit cost, unset until the user fills it in
    pub cost: Option<f64>,
    /// Stock on hand, unset until the user fills it in
    pub stock: Option<i64>,
    /// Attached image ids
    pub image_ids: Vec<u64>,
    /// Caller-defined extra fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChildVariant {
    /// Create a default record for a key.
    pub fn new(variant_key: impl Into<VariantKey>) -> Self {
        Self {
            variant_key: variant_key.into(),
            title: None,
            sku: String::new(),
            cost: None,
            stock: None,
            image_ids: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Read a named field slot as a JSON value. Unset optional fields and
    /// unknown names yield `None`.
    pub fn field(&self, name: &str) -> Option<Value> {
        match name {
            "variantKey" => Some(Value::String(self.variant_key.clone())),
            "title" => self.title.clone().map(Value::String),
            "sku" => Some(Value::String(self.sku.clone())),
            "cost" => self
                .cost
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number),
            "stock" => self.stock.map(Value::from),
            "imageIds" => Some(Value::from(self.image_ids.clone())),
            _ => self.extra.get(name).cloned(),
        }
    }

    /// Write a named field slot. Typed slots only accept values of their own
    /// shape; anything else is ignored. Unknown names land in `extra`.
    pub fn set_field(&mut self, name: &str, value: Value) {
        match name {
            "variantKey" => {
                if let Some(key) = value.as_str() {
                    self.variant_key = key.to_string();
                }
            }
            "title" => {
                if let Some(title) = value.as_str() {
                    self.title = Some(title.to_string());
                }
            }
            "sku" => {
                if let Some(sku) = value.as_str() {
                    self.sku = sku.to_string();
                }
            }
            "cost" => {
                if let Some(cost) = value.as_f64() {
                    self.cost = Some(cost);
                }
            }
            "stock" => {
                if let Some(stock) = integral(&value) {
                    self.stock = Some(stock);
                }
            }
            "imageIds" => {
                if let Ok(ids) = serde_json::from_value::<Vec<u64>>(value) {
                    self.image_ids = ids;
                }
            }
            _ => {
                self.extra.insert(name.to_string(), value);
            }
        }
    }
}

/// Whole-number view of a JSON number, whether stored as int or float.
fn integral(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    value
        .as_f64()
        .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
        .map(|f| f as i64)
}

/// Normalization used wherever names and option values are compared loosely.
pub(crate) fn normalize_value(value: &str) -> String {
    value.trim().to_lowercase()
}
