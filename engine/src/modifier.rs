//! Modifier rules: derived field values per combination.
//!
//! A modifier pairs a trigger condition with an ordered list of field
//! transforms. Modifiers replay in list order and transforms within a
//! modifier replay in their own order, each seeing the cumulative result of
//! everything before it, so reordering the list can change the outcome.
//!
//! The transform matrix is total; no pairing of slot shape and operand ever
//! errors:
//! - numeric slot + numeric operand: add/subtract/multiply/set arithmetic
//! - string slot: add appends the operand as text, set replaces with it;
//!   subtract/multiply do nothing
//! - unset slot: set/add initialize it with the operand; subtract/multiply
//!   do nothing
//! - anything else (numeric slot + text operand, array slots, ...) does
//!   nothing

use crate::{evaluate, ChildVariant, FieldName, LogicCondition, RuleId, SelectionItem};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Transform operation on one field slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldOperation {
    Add,
    Subtract,
    Multiply,
    Set,
}

/// Transform operand: a number or a piece of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OperandValue {
    Number(f64),
    Text(String),
}

impl OperandValue {
    /// Operand rendered as text, for string slots.
    fn as_text(&self) -> String {
        match self {
            OperandValue::Number(n) => n.to_string(),
            OperandValue::Text(s) => s.clone(),
        }
    }

    /// Operand as a JSON value, for initializing unset slots.
    fn to_value(&self) -> Option<Value> {
        match self {
            OperandValue::Number(n) => number_value(*n),
            OperandValue::Text(s) => Some(Value::String(s.clone())),
        }
    }
}

impl From<f64> for OperandValue {
    fn from(value: f64) -> Self {
        OperandValue::Number(value)
    }
}

impl From<i64> for OperandValue {
    fn from(value: i64) -> Self {
        OperandValue::Number(value as f64)
    }
}

impl From<&str> for OperandValue {
    fn from(value: &str) -> Self {
        OperandValue::Text(value.to_string())
    }
}

impl From<String> for OperandValue {
    fn from(value: String) -> Self {
        OperandValue::Text(value)
    }
}

/// One field transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldTransform {
    pub field: FieldName,
    pub operation: FieldOperation,
    pub value: OperandValue,
}

impl FieldTransform {
    pub fn new(
        field: impl Into<FieldName>,
        operation: FieldOperation,
        value: impl Into<OperandValue>,
    ) -> Self {
        Self {
            field: field.into(),
            operation,
            value: value.into(),
        }
    }
}

/// A single modifier rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantModifier {
    pub id: RuleId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "if")]
    pub condition: LogicCondition,
    #[serde(rename = "then")]
    pub transforms: Vec<FieldTransform>,
}

impl VariantModifier {
    pub fn new(
        id: impl Into<RuleId>,
        condition: LogicCondition,
        transforms: Vec<FieldTransform>,
    ) -> Self {
        Self {
            id: id.into(),
            description: None,
            condition,
            transforms,
        }
    }
}

/// Apply a modifier list to a base record, producing the derived record.
///
/// The base is never mutated; the derived record starts as a clone and
/// accumulates every transform of every triggered modifier, in order.
pub fn apply_modifiers(
    base: &ChildVariant,
    selection: &[SelectionItem],
    modifiers: &[VariantModifier],
) -> ChildVariant {
    let mut derived = base.clone();
    for modifier in modifiers {
        if !evaluate(selection, &modifier.condition) {
            continue;
        }
        for transform in &modifier.transforms {
            apply_transform(&mut derived, transform);
        }
    }
    derived
}

fn apply_transform(child: &mut ChildVariant, transform: &FieldTransform) {
    let current = child.field(&transform.field);
    if let Some(next) = transformed(current, transform.operation, &transform.value) {
        child.set_field(&transform.field, next);
    }
}

/// The transform matrix. `None` means no-op.
fn transformed(
    current: Option<Value>,
    operation: FieldOperation,
    operand: &OperandValue,
) -> Option<Value> {
    match current {
        Some(Value::Number(n)) => {
            let current = n.as_f64()?;
            let OperandValue::Number(operand) = operand else {
                return None;
            };
            let next = match operation {
                FieldOperation::Add => current + operand,
                FieldOperation::Subtract => current - operand,
                FieldOperation::Multiply => current * operand,
                FieldOperation::Set => *operand,
            };
            number_value(next)
        }
        Some(Value::String(s)) => match operation {
            FieldOperation::Add => Some(Value::String(format!("{}{}", s, operand.as_text()))),
            FieldOperation::Set => Some(Value::String(operand.as_text())),
            _ => None,
        },
        None | Some(Value::Null) => match operation {
            FieldOperation::Set | FieldOperation::Add => operand.to_value(),
            _ => None,
        },
        _ => None,
    }
}

/// Build a JSON number, preferring the integer representation for whole
/// results so integer slots keep accepting them.
fn number_value(n: f64) -> Option<Value> {
    if n.fract() == 0.0 && n >= i64::MIN as f64 && n <= i64::MAX as f64 {
        Some(Value::from(n as i64))
    } else {
        serde_json::Number::from_f64(n).map(Value::Number)
    }
}
