//! Reconciliation of existing records onto an edited type list.
//!
//! Keys are positional, so inserting, removing, or reordering an axis shifts
//! every key without changing which logical variant a record represents.
//! Reconciliation therefore re-identifies records by a **value signature**
//! built from option values instead of indices.
//!
//! # Algorithm
//!
//! 1. For each existing record, resolve its option values under the old type
//!    list and derive its signature; build a signature → record map (first
//!    record wins a collision)
//! 2. Generate the fresh combination set under the new type list
//! 3. For each fresh combination, derive its own signature; on a hit, carry
//!    the old record's full field set forward under the new key
//! 4. Report every existing record whose signature never matched as dropped
//!
//! Signatures are restricted to the axes present in both lists, ordered as
//! the new list orders them. That is what lets a record survive axis
//! insertion and removal, not just reordering: the values it has on the
//! surviving axes are the identity that matters.

use crate::{
    generate_children, selection_for_key, variant::normalize_value, ChildVariant, GenerateOptions,
    SelectionItem, VariantType,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Joins signature segments. U+001F cannot appear in user-visible option
/// text, so joined values cannot collide with a legitimate single value.
pub const SIGNATURE_DELIMITER: &str = "\u{1f}";

/// How option values are normalized before signature comparison. Values are
/// always trimmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SignatureMode {
    /// "Red" and "RED" identify the same variant (default)
    #[default]
    CaseInsensitive,
    /// Values must match exactly after trimming
    CaseSensitive,
}

impl SignatureMode {
    fn normalize(self, value: &str) -> String {
        let trimmed = value.trim();
        match self {
            SignatureMode::CaseInsensitive => trimmed.to_lowercase(),
            SignatureMode::CaseSensitive => trimmed.to_string(),
        }
    }
}

/// Result of a reconciliation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileResult {
    /// The new combination set, with old records carried forward where their
    /// signature matched
    pub children: Vec<ChildVariant>,
    /// Existing records that matched no new combination; their user-entered
    /// data is about to be lost and the caller should say so
    pub dropped: Vec<ChildVariant>,
}

/// Join normalized option values into a signature.
pub fn value_signature<I, S>(values: I, mode: SignatureMode) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .map(|value| mode.normalize(value.as_ref()))
        .collect::<Vec<_>>()
        .join(SIGNATURE_DELIMITER)
}

/// Signature of a key's full option-value tuple under a type list.
pub fn signature_for_key(
    key: &str,
    types: &[VariantType],
    separator: &str,
    mode: SignatureMode,
) -> String {
    let selection = selection_for_key(key, types, separator);
    value_signature(selection.iter().map(|item| item.option_value.as_str()), mode)
}

/// Signature restricted to the shared axes, in shared-axis order. `None`
/// when there are no shared axes: with nothing in common there is no identity
/// to match on.
fn shared_signature(
    selection: &[SelectionItem],
    shared: &[String],
    mode: SignatureMode,
) -> Option<String> {
    if shared.is_empty() {
        return None;
    }
    let values = shared.iter().map(|name| {
        selection
            .iter()
            .find(|item| normalize_value(&item.type_value) == *name)
            .map(|item| item.option_value.as_str())
            .unwrap_or("")
    });
    Some(value_signature(values, mode))
}

/// Rebuild the combination set for an edited type list, carrying existing
/// records over by value signature.
pub fn reconcile(
    old_types: &[VariantType],
    new_types: &[VariantType],
    existing: &[ChildVariant],
    mode: SignatureMode,
    options: &GenerateOptions,
) -> ReconcileResult {
    // Axes present in both lists, in new-list order.
    let old_names: HashSet<String> = old_types
        .iter()
        .map(|ty| normalize_value(&ty.value))
        .collect();
    let shared: Vec<String> = new_types
        .iter()
        .map(|ty| normalize_value(&ty.value))
        .filter(|name| old_names.contains(name))
        .collect();

    let mut by_signature: HashMap<String, &ChildVariant> = HashMap::new();
    let mut old_signatures: Vec<Option<String>> = Vec::with_capacity(existing.len());
    for child in existing {
        let selection = selection_for_key(&child.variant_key, old_types, &options.key_separator);
        let signature = shared_signature(&selection, &shared, mode);
        if let Some(signature) = &signature {
            by_signature.entry(signature.clone()).or_insert(child);
        }
        old_signatures.push(signature);
    }

    let fresh = generate_children(new_types, &[], options);

    let mut matched: HashSet<String> = HashSet::new();
    let children: Vec<ChildVariant> = fresh
        .into_iter()
        .map(|child| {
            let selection =
                selection_for_key(&child.variant_key, new_types, &options.key_separator);
            let Some(signature) = shared_signature(&selection, &shared, mode) else {
                return child;
            };
            match by_signature.get(&signature) {
                Some(old) => {
                    matched.insert(signature);
                    let mut carried = (*old).clone();
                    carried.variant_key = child.variant_key.clone();
                    carried
                }
                None => child,
            }
        })
        .collect();

    let dropped = existing
        .iter()
        .zip(&old_signatures)
        .filter(|(_, signature)| match signature {
            Some(signature) => !matched.contains(signature),
            None => true,
        })
        .map(|(child, _)| child.clone())
        .collect();

    ReconcileResult { children, dropped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VariantType;

    fn color_size() -> Vec<VariantType> {
        vec![
            VariantType::with_values("Color", ["Red", "Blue"]),
            VariantType::with_values("Size", ["S", "M"]),
        ]
    }

    fn red_medium_record() -> ChildVariant {
        let mut child = ChildVariant::new("1-2");
        child.sku = "RM".to_string();
        child.cost = Some(19.5);
        child.stock = Some(4);
        child
    }

    #[test]
    fn unchanged_types_carry_everything() {
        let types = color_size();
        let existing = vec![red_medium_record()];
        let result = reconcile(
            &types,
            &types,
            &existing,
            SignatureMode::default(),
            &GenerateOptions::default(),
        );

        assert!(result.dropped.is_empty());
        assert_eq!(result.children.len(), 4);
        assert_eq!(result.children[1], red_medium_record());
    }

    #[test]
    fn option_reorder_moves_the_key() {
        let old = color_size();
        let new = vec![
            VariantType::with_values("Color", ["Blue", "Red"]),
            VariantType::with_values("Size", ["S", "M"]),
        ];
        let result = reconcile(
            &old,
            &new,
            &[red_medium_record()],
            SignatureMode::default(),
            &GenerateOptions::default(),
        );

        assert!(result.dropped.is_empty());
        let carried = result
            .children
            .iter()
            .find(|c| c.sku == "RM")
            .expect("record carried");
        // Red is now option 2
        assert_eq!(carried.variant_key, "2-2");
        assert_eq!(carried.cost, Some(19.5));
    }

    #[test]
    fn axis_reorder_survives() {
        let old = color_size();
        let new = vec![
            VariantType::with_values("Size", ["S", "M"]),
            VariantType::with_values("Color", ["Red", "Blue"]),
        ];
        let result = reconcile(
            &old,
            &new,
            &[red_medium_record()],
            SignatureMode::default(),
            &GenerateOptions::default(),
        );

        assert!(result.dropped.is_empty());
        let carried = result.children.iter().find(|c| c.sku == "RM").unwrap();
        assert_eq!(carried.variant_key, "2-1"); // M, Red
    }

    #[test]
    fn axis_insertion_keeps_user_data() {
        let old = color_size();
        let new = vec![
            VariantType::with_values("Material", ["Cotton"]),
            VariantType::with_values("Color", ["Red", "Blue"]),
            VariantType::with_values("Size", ["S", "M"]),
        ];
        let result = reconcile(
            &old,
            &new,
            &[red_medium_record()],
            SignatureMode::default(),
            &GenerateOptions::default(),
        );

        assert!(result.dropped.is_empty());
        let carried = result.children.iter().find(|c| c.sku == "RM").unwrap();
        assert_eq!(carried.variant_key, "1-1-2"); // Cotton, Red, M
        assert_eq!(carried.cost, Some(19.5));
        assert_eq!(carried.stock, Some(4));
    }

    #[test]
    fn multi_option_insertion_fans_the_record_out() {
        let old = color_size();
        let new = vec![
            VariantType::with_values("Material", ["Cotton", "Silk"]),
            VariantType::with_values("Color", ["Red", "Blue"]),
            VariantType::with_values("Size", ["S", "M"]),
        ];
        let result = reconcile(
            &old,
            &new,
            &[red_medium_record()],
            SignatureMode::default(),
            &GenerateOptions::default(),
        );

        // the Red-M data seeds both the Cotton and the Silk branch
        let carriers: Vec<&str> = result
            .children
            .iter()
            .filter(|c| c.sku == "RM")
            .map(|c| c.variant_key.as_str())
            .collect();
        assert_eq!(carriers, vec!["1-1-2", "2-1-2"]);
        assert!(result.dropped.is_empty());
    }

    #[test]
    fn axis_removal_first_record_wins() {
        let old = vec![
            VariantType::with_values("Material", ["Cotton", "Silk"]),
            VariantType::with_values("Color", ["Red", "Blue"]),
            VariantType::with_values("Size", ["S", "M"]),
        ];
        let mut cotton = ChildVariant::new("1-1-2");
        cotton.sku = "COTTON-RM".to_string();
        let mut silk = ChildVariant::new("2-1-2");
        silk.sku = "SILK-RM".to_string();

        let result = reconcile(
            &old,
            &color_size(),
            &[cotton, silk],
            SignatureMode::default(),
            &GenerateOptions::default(),
        );

        let carried = result
            .children
            .iter()
            .find(|c| c.variant_key == "1-2")
            .unwrap();
        assert_eq!(carried.sku, "COTTON-RM");
        // the silk record collided on the same signature, which did match, so
        // it is not reported dropped; collisions are the caller's to avoid
        assert!(result.dropped.is_empty());
    }

    #[test]
    fn vanished_option_drops_the_record() {
        let old = color_size();
        let new = vec![
            VariantType::with_values("Color", ["Green", "Blue"]),
            VariantType::with_values("Size", ["S", "M"]),
        ];
        let result = reconcile(
            &old,
            &new,
            &[red_medium_record()],
            SignatureMode::default(),
            &GenerateOptions::default(),
        );

        assert_eq!(result.dropped.len(), 1);
        assert_eq!(result.dropped[0].sku, "RM");
        // the fresh set is still complete, just blank where the match failed
        assert_eq!(result.children.len(), 4);
        assert!(result.children.iter().all(|c| c.sku.is_empty()));
    }

    #[test]
    fn matching_trims_and_case_folds_by_default() {
        let old = vec![VariantType::with_values("Color", ["RED "])];
        let new = vec![VariantType::with_values("Color", ["Red"])];
        let mut record = ChildVariant::new("1");
        record.sku = "R".to_string();

        let result = reconcile(
            &old,
            &new,
            &[record.clone()],
            SignatureMode::CaseInsensitive,
            &GenerateOptions::default(),
        );
        assert!(result.dropped.is_empty());
        assert_eq!(result.children[0].sku, "R");

        let strict = reconcile(
            &old,
            &new,
            &[record],
            SignatureMode::CaseSensitive,
            &GenerateOptions::default(),
        );
        assert_eq!(strict.dropped.len(), 1);
    }

    #[test]
    fn disjoint_type_lists_drop_everything() {
        let old = color_size();
        let new = vec![VariantType::with_values("Material", ["Cotton"])];
        let result = reconcile(
            &old,
            &new,
            &[red_medium_record()],
            SignatureMode::default(),
            &GenerateOptions::default(),
        );

        assert_eq!(result.dropped.len(), 1);
        assert_eq!(result.children.len(), 1);
        assert!(result.children[0].sku.is_empty());
    }

    #[test]
    fn malformed_keys_degrade_to_dropped() {
        let types = color_size();
        let mut garbage = ChildVariant::new("x-y");
        garbage.sku = "??".to_string();

        let result = reconcile(
            &types,
            &types,
            &[garbage],
            SignatureMode::default(),
            &GenerateOptions::default(),
        );
        assert_eq!(result.dropped.len(), 1);
        assert_eq!(result.children.len(), 4);
    }

    #[test]
    fn signature_helpers() {
        let sig = value_signature(["Red", " M "], SignatureMode::CaseInsensitive);
        assert_eq!(sig, format!("red{SIGNATURE_DELIMITER}m"));

        let keyed = signature_for_key("1-2", &color_size(), "-", SignatureMode::CaseInsensitive);
        assert_eq!(keyed, sig);

        let strict = value_signature(["Red", " M "], SignatureMode::CaseSensitive);
        assert_eq!(strict, format!("Red{SIGNATURE_DELIMITER}M"));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn arb_axes() -> impl Strategy<Value = Vec<VariantType>> {
            proptest::collection::vec(1usize..4, 1..4).prop_map(|counts| {
                counts
                    .iter()
                    .enumerate()
                    .map(|(axis, count)| {
                        VariantType::with_values(
                            format!("axis{axis}"),
                            (0..*count).map(|i| format!("a{axis}v{i}")),
                        )
                    })
                    .collect()
            })
        }

        fn arb_permuted_axes() -> impl Strategy<Value = (Vec<VariantType>, Vec<VariantType>)> {
            arb_axes().prop_flat_map(|types| {
                let indices: Vec<usize> = (0..types.len()).collect();
                (Just(types), Just(indices).prop_shuffle()).prop_map(|(types, order)| {
                    let permuted = order.iter().map(|&i| types[i].clone()).collect();
                    (types, permuted)
                })
            })
        }

        proptest! {
            /// Across any axis permutation every record survives with its
            /// option-value identity and user data intact.
            #[test]
            fn permutation_preserves_every_record((old, new) in arb_permuted_axes()) {
                let options = GenerateOptions::default();
                let mut existing = generate_children(&old, &[], &options);
                for child in &mut existing {
                    let mut values: Vec<String> =
                        selection_for_key(&child.variant_key, &old, "-")
                            .iter()
                            .map(|item| item.option_value.clone())
                            .collect();
                    values.sort();
                    child.sku = values.join("|");
                    child.cost = Some(1.0);
                }

                let result = reconcile(&old, &new, &existing, SignatureMode::default(), &options);
                prop_assert!(result.dropped.is_empty());
                prop_assert_eq!(result.children.len(), existing.len());

                for child in &result.children {
                    let mut values: Vec<String> =
                        selection_for_key(&child.variant_key, &new, "-")
                            .iter()
                            .map(|item| item.option_value.clone())
                            .collect();
                    values.sort();
                    prop_assert_eq!(&child.sku, &values.join("|"));
                    prop_assert_eq!(child.cost, Some(1.0));
                }
            }
        }
    }
}
