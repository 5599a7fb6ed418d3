//! Constraint rules: which combinations are allowed to exist.
//!
//! A constraint pairs a trigger condition with an allow/disallow effect on one
//! target axis. All constraints are evaluated independently; every rule that
//! blocks a selection is reported, not just the first.

use crate::{evaluate, LogicCondition, RuleId, SelectionItem, VariantOption, VariantType};
use serde::{Deserialize, Serialize};

/// Whether the listed options are the only ones permitted, or forbidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstraintAction {
    Allow,
    Disallow,
}

/// Effect applied to the target axis when the trigger condition holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintEffect {
    /// Axis the effect applies to
    pub type_value: String,
    pub action: ConstraintAction,
    /// Option values the action refers to
    pub options: Vec<String>,
}

impl ConstraintEffect {
    /// Only the listed options remain permitted on the axis.
    pub fn allow<I, S>(type_value: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            type_value: type_value.into(),
            action: ConstraintAction::Allow,
            options: options.into_iter().map(Into::into).collect(),
        }
    }

    /// The listed options become forbidden on the axis.
    pub fn disallow<I, S>(type_value: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            type_value: type_value.into(),
            action: ConstraintAction::Disallow,
            options: options.into_iter().map(Into::into).collect(),
        }
    }
}

/// A single constraint rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantConstraint {
    pub id: RuleId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "if")]
    pub condition: LogicCondition,
    #[serde(rename = "then")]
    pub effect: ConstraintEffect,
}

impl VariantConstraint {
    pub fn new(id: impl Into<RuleId>, condition: LogicCondition, effect: ConstraintEffect) -> Self {
        Self {
            id: id.into(),
            description: None,
            condition,
            effect,
        }
    }
}

/// Outcome of a constraint pass over one selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionValidity {
    pub valid: bool,
    /// Ids of every constraint that blocked the selection
    pub blocked_by: Vec<RuleId>,
}

/// Check a selection against a constraint list.
///
/// A triggered constraint only blocks when its target axis is actually part
/// of the selection: a rule never invalidates an axis the user has not picked
/// yet.
pub fn validate_selection(
    selection: &[SelectionItem],
    constraints: &[VariantConstraint],
) -> SelectionValidity {
    let mut blocked_by = Vec::new();
    for constraint in constraints {
        if !evaluate(selection, &constraint.condition) {
            continue;
        }
        let picked = selection
            .iter()
            .find(|item| item.type_value == constraint.effect.type_value);
        let Some(picked) = picked else {
            continue;
        };
        let listed = constraint
            .effect
            .options
            .iter()
            .any(|option| *option == picked.option_value);
        let blocks = match constraint.effect.action {
            ConstraintAction::Allow => !listed,
            ConstraintAction::Disallow => listed,
        };
        if blocks {
            blocked_by.push(constraint.id.clone());
        }
    }
    SelectionValidity {
        valid: blocked_by.is_empty(),
        blocked_by,
    }
}

/// Filter one axis's options down to those still selectable given the rest of
/// the current selection.
///
/// Each candidate is tried in a hypothetical selection (the current one with
/// any prior pick on the axis replaced) and kept iff that selection
/// validates. One full constraint pass per candidate.
pub fn available_options<'a>(
    variant_type: &'a VariantType,
    current: &[SelectionItem],
    constraints: &[VariantConstraint],
) -> Vec<&'a VariantOption> {
    let type_index = current
        .iter()
        .find(|item| item.type_value == variant_type.value)
        .map(|item| item.type_index)
        .unwrap_or(0);

    variant_type
        .options
        .iter()
        .enumerate()
        .filter(|(index, option)| {
            let mut hypothetical: Vec<SelectionItem> = current
                .iter()
                .filter(|item| item.type_value != variant_type.value)
                .cloned()
                .collect();
            hypothetical.push(SelectionItem {
                type_index,
                option_index: index + 1,
                type_value: variant_type.value.clone(),
                option_value: option.value.clone(),
            });
            validate_selection(&hypothetical, constraints).valid
        })
        .map(|(_, option)| option)
        .collect()
}
