//! Non-fatal audit of a variant type list.
//!
//! Duplicate axis names or option values make keys ambiguous to humans and
//! signatures lossy, but the original editing flow tolerates them, so they
//! are reported as warnings and never enforced.

use crate::{variant::normalize_value, VariantType};
use std::collections::HashSet;
use thiserror::Error;

/// A single audit finding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationWarning {
    #[error("duplicate variant type name: {0}")]
    DuplicateTypeName(String),

    #[error("duplicate option value '{option}' in variant type '{type_value}'")]
    DuplicateOptionValue { type_value: String, option: String },

    #[error("blank option value in variant type '{0}'")]
    BlankOptionValue(String),

    #[error("variant type '{0}' has no options")]
    EmptyOptions(String),
}

/// Audit a type list. Names and values are compared after trimming and
/// case-folding.
pub fn check_variant_types(types: &[VariantType]) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let mut seen_types = HashSet::new();

    for ty in types {
        if !seen_types.insert(normalize_value(&ty.value)) {
            warnings.push(ValidationWarning::DuplicateTypeName(ty.value.clone()));
        }
        if ty.options.is_empty() {
            warnings.push(ValidationWarning::EmptyOptions(ty.value.clone()));
        }

        let mut seen_options = HashSet::new();
        for option in &ty.options {
            if option.value.trim().is_empty() {
                warnings.push(ValidationWarning::BlankOptionValue(ty.value.clone()));
                continue;
            }
            if !seen_options.insert(normalize_value(&option.value)) {
                warnings.push(ValidationWarning::DuplicateOptionValue {
                    type_value: ty.value.clone(),
                    option: option.value.clone(),
                });
            }
        }
    }

    warnings
}
