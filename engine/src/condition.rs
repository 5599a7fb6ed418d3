//! Boolean condition trees over selections.
//!
//! Conditions are finite trees: leaves compare one axis pick against a target
//! value or value set, groups combine children with AND/OR. The same trees
//! drive both constraints and modifiers.

use crate::SelectionItem;
use serde::{Deserialize, Serialize};

/// Leaf comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonOperator {
    Equals,
    NotEquals,
    In,
    NotIn,
}

/// Group combinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GroupOperator {
    And,
    Or,
}

/// Target of a leaf comparison: a single value or a value set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionTarget {
    One(String),
    Many(Vec<String>),
}

/// A leaf comparison against one axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleCondition {
    /// Axis name the comparison targets
    pub type_value: String,
    /// Value or value set to compare against
    pub option_value: OptionTarget,
    /// Comparison operator; inferred from the target shape when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<ComparisonOperator>,
}

impl SimpleCondition {
    /// Operator with the omitted-operator inference applied: a value set
    /// means `in`, a single value means `equals`.
    pub fn resolved_operator(&self) -> ComparisonOperator {
        self.operator.unwrap_or(match self.option_value {
            OptionTarget::One(_) => ComparisonOperator::Equals,
            OptionTarget::Many(_) => ComparisonOperator::In,
        })
    }
}

/// An AND/OR group of child conditions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupCondition {
    pub operator: GroupOperator,
    pub conditions: Vec<LogicCondition>,
}

/// A condition tree node.
///
/// Serialized untagged: JSON shape discriminates the variants (a group has
/// `conditions`, a leaf has `typeValue`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LogicCondition {
    Group(GroupCondition),
    Simple(SimpleCondition),
}

impl LogicCondition {
    /// Leaf: axis picked `value`.
    pub fn equals(type_value: impl Into<String>, value: impl Into<String>) -> Self {
        LogicCondition::Simple(SimpleCondition {
            type_value: type_value.into(),
            option_value: OptionTarget::One(value.into()),
            operator: Some(ComparisonOperator::Equals),
        })
    }

    /// Leaf: axis picked anything but `value`.
    pub fn not_equals(type_value: impl Into<String>, value: impl Into<String>) -> Self {
        LogicCondition::Simple(SimpleCondition {
            type_value: type_value.into(),
            option_value: OptionTarget::One(value.into()),
            operator: Some(ComparisonOperator::NotEquals),
        })
    }

    /// Leaf: axis picked one of `values`.
    pub fn is_in<I, S>(type_value: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        LogicCondition::Simple(SimpleCondition {
            type_value: type_value.into(),
            option_value: OptionTarget::Many(values.into_iter().map(Into::into).collect()),
            operator: Some(ComparisonOperator::In),
        })
    }

    /// Leaf: axis picked none of `values`.
    pub fn not_in<I, S>(type_value: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        LogicCondition::Simple(SimpleCondition {
            type_value: type_value.into(),
            option_value: OptionTarget::Many(values.into_iter().map(Into::into).collect()),
            operator: Some(ComparisonOperator::NotIn),
        })
    }

    /// Group: every child must hold.
    pub fn all(conditions: Vec<LogicCondition>) -> Self {
        LogicCondition::Group(GroupCondition {
            operator: GroupOperator::And,
            conditions,
        })
    }

    /// Group: at least one child must hold.
    pub fn any(conditions: Vec<LogicCondition>) -> Self {
        LogicCondition::Group(GroupCondition {
            operator: GroupOperator::Or,
            conditions,
        })
    }
}

/// Evaluate a condition tree against a selection.
///
/// An axis that is not in the selection never satisfies a leaf. An empty
/// group is false regardless of its operator. A leaf whose target shape does
/// not fit its operator (a set for `equals`, a single value for `in`) is
/// false.
pub fn evaluate(selection: &[SelectionItem], condition: &LogicCondition) -> bool {
    match condition {
        LogicCondition::Group(group) => {
            if group.conditions.is_empty() {
                return false;
            }
            match group.operator {
                GroupOperator::And => group
                    .conditions
                    .iter()
                    .all(|child| evaluate(selection, child)),
                GroupOperator::Or => group
                    .conditions
                    .iter()
                    .any(|child| evaluate(selection, child)),
            }
        }
        LogicCondition::Simple(simple) => {
            let picked = match selection
                .iter()
                .find(|item| item.type_value == simple.type_value)
            {
                Some(item) => item.option_value.as_str(),
                None => return false,
            };
            match (simple.resolved_operator(), &simple.option_value) {
                (ComparisonOperator::Equals, OptionTarget::One(value)) => picked == value,
                (ComparisonOperator::NotEquals, OptionTarget::One(value)) => picked != value,
                (ComparisonOperator::In, OptionTarget::Many(values)) => {
                    values.iter().any(|value| value == picked)
                }
                (ComparisonOperator::NotIn, OptionTarget::Many(values)) => {
                    !values.iter().any(|value| value == picked)
                }
                _ => false,
            }
        }
    }
}
