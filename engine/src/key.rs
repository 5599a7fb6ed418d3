//! Variant key codec.
//!
//! A key encodes one combination as 1-based option indices joined by a
//! separator, e.g. `"2-1-3"`. A key is positional: index *i* refers to the
//! *i*-th entry of the type list that produced it, so a key is only meaningful
//! next to that list.

use crate::{Selection, SelectionItem, VariantType};
use std::cmp::Ordering;

/// Separator used between index segments unless the caller overrides it.
pub const DEFAULT_KEY_SEPARATOR: &str = "-";

/// Join 1-based indices into a key string.
pub fn indices_to_key(indices: &[usize], separator: &str) -> String {
    indices
        .iter()
        .map(|index| index.to_string())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Split a key back into indices.
///
/// Never fails: segments that do not parse as an integer degrade to 0, which
/// downstream lookups treat as "no such option".
pub fn key_to_indices(key: &str, separator: &str) -> Vec<usize> {
    key.split(separator)
        .map(|segment| segment.trim().parse::<usize>().unwrap_or(0))
        .collect()
}

/// Total order over keys: lexicographic on the parsed index tuples, with the
/// shorter tuple zero-padded. This is the generation order of the combination
/// set.
pub fn compare_keys(a: &str, b: &str, separator: &str) -> Ordering {
    let left = key_to_indices(a, separator);
    let right = key_to_indices(b, separator);
    let len = left.len().max(right.len());
    for i in 0..len {
        let l = left.get(i).copied().unwrap_or(0);
        let r = right.get(i).copied().unwrap_or(0);
        match l.cmp(&r) {
            Ordering::Equal => continue,
            unequal => return unequal,
        }
    }
    Ordering::Equal
}

/// Resolve a key against a type list into a flat selection.
///
/// Lookups that miss (zero index, out-of-range index, more segments than
/// axes) resolve to empty strings rather than failing.
pub fn selection_for_key(key: &str, types: &[VariantType], separator: &str) -> Selection {
    key_to_indices(key, separator)
        .into_iter()
        .enumerate()
        .map(|(type_index, option_index)| {
            let ty = types.get(type_index);
            SelectionItem {
                type_index,
                option_index,
                type_value: ty.map(|t| t.value.clone()).unwrap_or_default(),
                option_value: ty
                    .and_then(|t| t.option_value(option_index))
                    .map(str::to_string)
                    .unwrap_or_default(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VariantType;

    fn test_types() -> Vec<VariantType> {
        vec![
            VariantType::with_values("Color", ["Red", "Blue"]),
            VariantType::with_values("Size", ["S", "M"]),
        ]
    }

    #[test]
    fn indices_roundtrip() {
        let key = indices_to_key(&[2, 1, 3], "-");
        assert_eq!(key, "2-1-3");
        assert_eq!(key_to_indices(&key, "-"), vec![2, 1, 3]);
    }

    #[test]
    fn custom_separator() {
        assert_eq!(indices_to_key(&[1, 2], "/"), "1/2");
        assert_eq!(key_to_indices("1/2", "/"), vec![1, 2]);
    }

    #[test]
    fn malformed_segments_parse_as_zero() {
        assert_eq!(key_to_indices("1-x-3", "-"), vec![1, 0, 3]);
        assert_eq!(key_to_indices("", "-"), vec![0]);
        assert_eq!(key_to_indices("--", "-"), vec![0, 0, 0]);
    }

    #[test]
    fn comparison_is_numeric_not_textual() {
        // "10" > "2" numerically even though "10" < "2" as text
        assert_eq!(compare_keys("10-1", "2-1", "-"), Ordering::Greater);
        assert_eq!(compare_keys("2-1", "10-1", "-"), Ordering::Less);
    }

    #[test]
    fn comparison_zero_pads_short_keys() {
        assert_eq!(compare_keys("1", "1-0", "-"), Ordering::Equal);
        assert_eq!(compare_keys("1", "1-1", "-"), Ordering::Less);
        assert_eq!(compare_keys("1-1", "1", "-"), Ordering::Greater);
    }

    #[test]
    fn selection_resolves_values() {
        let selection = selection_for_key("2-1", &test_types(), "-");
        assert_eq!(selection.len(), 2);
        assert_eq!(selection[0].type_value, "Color");
        assert_eq!(selection[0].option_value, "Blue");
        assert_eq!(selection[0].option_index, 2);
        assert_eq!(selection[1].type_value, "Size");
        assert_eq!(selection[1].option_value, "S");
    }

    #[test]
    fn selection_misses_resolve_to_empty_strings() {
        let selection = selection_for_key("9-0-5", &test_types(), "-");
        assert_eq!(selection[0].type_value, "Color");
        assert_eq!(selection[0].option_value, "");
        assert_eq!(selection[1].option_value, "");
        // third segment has no axis at all
        assert_eq!(selection[2].type_value, "");
        assert_eq!(selection[2].option_value, "");
    }
}
