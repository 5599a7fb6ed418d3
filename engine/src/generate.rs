//! Combination enumeration.
//!
//! Walks the full Cartesian product of the option lists, keys each
//! combination, merges in previously known records by key, and filters out
//! combinations built from blank options. The only guaranteed output order is
//! ascending by the key comparator.
//!
//! Enumeration is exhaustive by design: the cost is O(product of option
//! counts), exponential in the number of axes. Bounding axis and option
//! counts is up to the caller.

use crate::{
    compare_keys, indices_to_key, selection_for_key, ChildVariant, VariantType,
    DEFAULT_KEY_SEPARATOR,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Knobs for enumeration and labeling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateOptions {
    /// Separator between index segments in keys
    pub key_separator: String,
    /// Separator between option values in human labels
    pub label_separator: String,
    /// Drop combinations whose label is blank or ragged
    pub filter_invalid_titles: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            key_separator: DEFAULT_KEY_SEPARATOR.to_string(),
            label_separator: " - ".to_string(),
            filter_invalid_titles: true,
        }
    }
}

/// Enumerate every 1-based index tuple for the type list.
///
/// An empty type list yields nothing. An axis with zero options contributes
/// no indices, which collapses the whole product to zero tuples.
pub fn generate_combinations(types: &[VariantType]) -> Vec<Vec<usize>> {
    let mut result = Vec::new();
    let mut current = Vec::with_capacity(types.len());
    push_axis(types, 0, &mut current, &mut result);
    result
}

fn push_axis(
    types: &[VariantType],
    axis: usize,
    current: &mut Vec<usize>,
    result: &mut Vec<Vec<usize>>,
) {
    if axis == types.len() {
        if !current.is_empty() {
            result.push(current.clone());
        }
        return;
    }
    for index in 1..=types[axis].option_count() {
        current.push(index);
        push_axis(types, axis + 1, current, result);
        current.pop();
    }
}

/// Human label for a combination: its option values joined by the label
/// separator.
pub fn variant_label(key: &str, types: &[VariantType], options: &GenerateOptions) -> String {
    selection_for_key(key, types, &options.key_separator)
        .iter()
        .map(|item| item.option_value.clone())
        .collect::<Vec<_>>()
        .join(&options.label_separator)
}

/// A label is rejected when it is blank, or when its trimmed form starts or
/// ends with the separator (which happens when an option value is blank).
fn is_valid_label(label: &str, label_separator: &str) -> bool {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        return false;
    }
    for marker in [label_separator.trim(), "-"] {
        if !marker.is_empty() && (trimmed.starts_with(marker) || trimmed.ends_with(marker)) {
            return false;
        }
    }
    true
}

/// Materialize the combination set, reusing known records by key and filling
/// the gaps with blank defaults.
pub fn generate_children(
    types: &[VariantType],
    existing: &[ChildVariant],
    options: &GenerateOptions,
) -> Vec<ChildVariant> {
    generate_children_with(types, existing, options, |key| ChildVariant::new(key))
}

/// Same as [`generate_children`], with a caller-supplied factory for fresh
/// records.
pub fn generate_children_with<F>(
    types: &[VariantType],
    existing: &[ChildVariant],
    options: &GenerateOptions,
    factory: F,
) -> Vec<ChildVariant>
where
    F: Fn(&str) -> ChildVariant,
{
    let known: HashMap<&str, &ChildVariant> = existing
        .iter()
        .map(|child| (child.variant_key.as_str(), child))
        .collect();

    let mut children: Vec<ChildVariant> = generate_combinations(types)
        .into_iter()
        .map(|indices| {
            let key = indices_to_key(&indices, &options.key_separator);
            match known.get(key.as_str()) {
                Some(child) => (*child).clone(),
                None => factory(&key),
            }
        })
        .collect();

    children.sort_by(|a, b| compare_keys(&a.variant_key, &b.variant_key, &options.key_separator));

    if options.filter_invalid_titles {
        children.retain(|child| {
            is_valid_label(
                &variant_label(&child.variant_key, types, options),
                &options.label_separator,
            )
        });
    }

    children
}
