//! # Variantry Engine
//!
//! A deterministic variant combination and rule engine for product catalogs.
//!
//! Given a list of variant axes (Color, Size, ...) and their options, this
//! crate enumerates every concrete child variant, keeps user-entered data
//! (SKU, cost, stock) attached to the right child across edits to the axis
//! list, and runs two rule systems over the result: constraints that decide
//! which combinations may exist, and modifiers that derive per-combination
//! field values.
//!
//! ## Design Principles
//!
//! - **No IO**: the engine has no knowledge of files, network, or platform
//! - **Deterministic**: same inputs always produce same outputs
//! - **Total**: malformed input degrades (zero indices, empty values,
//!   skipped transforms) instead of failing - there are no error returns
//! - **Testable**: pure logic, no mocks needed
//!
//! ## Core Concepts
//!
//! ### Keys and selections
//!
//! Each combination is identified by a [`VariantKey`]: 1-based option
//! indices joined by a separator, `"2-1"` meaning second option of the first
//! axis, first option of the second. Resolving a key against the axis list
//! yields a [`Selection`] of `(axis, option)` pairs - the context every rule
//! is evaluated in.
//!
//! ### Children
//!
//! A [`ChildVariant`] is the materialized record for one combination. Its
//! typed fields cover the catalog basics and an extra map carries any
//! caller-defined fields; modifiers treat all of them as named slots.
//!
//! ### Rules
//!
//! [`VariantConstraint`]s pair a [`LogicCondition`] with an allow/disallow
//! effect on one axis. [`VariantModifier`]s pair a condition with ordered
//! field transforms. Conditions are recursive AND/OR trees over the
//! selection and are shared by both rule systems.
//!
//! ### Reconciliation
//!
//! Editing the axis list shifts keys, so [`reconcile`] re-identifies records
//! by a signature of their option *values* instead. Records that cannot be
//! re-attached are reported as dropped, never silently discarded.
//!
//! ## Quick Start
//!
//! ```rust
//! use variantry_engine::{
//!     generate_children, selection_for_key, validate_selection, ConstraintEffect,
//!     GenerateOptions, LogicCondition, VariantConstraint, VariantType,
//! };
//!
//! // 1. Describe the axes
//! let types = vec![
//!     VariantType::with_values("Color", ["Red", "Blue"]),
//!     VariantType::with_values("Size", ["S", "M"]),
//! ];
//!
//! // 2. Enumerate the children
//! let options = GenerateOptions::default();
//! let children = generate_children(&types, &[], &options);
//! assert_eq!(children.len(), 4);
//! assert_eq!(children[0].variant_key, "1-1");
//!
//! // 3. Check a combination against a rule
//! let rule = VariantConstraint::new(
//!     "red-needs-medium",
//!     LogicCondition::equals("Color", "Red"),
//!     ConstraintEffect::allow("Size", ["M"]),
//! );
//! let selection = selection_for_key("1-1", &types, &options.key_separator);
//! let validity = validate_selection(&selection, &[rule]);
//! assert!(!validity.valid);
//! assert_eq!(validity.blocked_by, vec!["red-needs-medium".to_string()]);
//! ```
//!
//! For the assembled flow - enumerate, edit axes, reconcile, validate,
//! derive - see [`VariantCatalog`].

pub mod catalog;
pub mod condition;
pub mod constraint;
pub mod generate;
pub mod key;
pub mod modifier;
pub mod reconcile;
pub mod variant;
pub mod warnings;

// Re-export main types at crate root
pub use catalog::{MaterializedVariant, VariantCatalog};
pub use condition::{
    evaluate, ComparisonOperator, GroupCondition, GroupOperator, LogicCondition, OptionTarget,
    SimpleCondition,
};
pub use constraint::{
    available_options, validate_selection, ConstraintAction, ConstraintEffect, SelectionValidity,
    VariantConstraint,
};
pub use generate::{
    generate_children, generate_children_with, generate_combinations, variant_label,
    GenerateOptions,
};
pub use key::{
    compare_keys, indices_to_key, key_to_indices, selection_for_key, DEFAULT_KEY_SEPARATOR,
};
pub use modifier::{
    apply_modifiers, FieldOperation, FieldTransform, OperandValue, VariantModifier,
};
pub use reconcile::{
    reconcile, signature_for_key, value_signature, ReconcileResult, SignatureMode,
    SIGNATURE_DELIMITER,
};
pub use variant::{ChildVariant, Selection, SelectionItem, VariantOption, VariantType};
pub use warnings::{check_variant_types, ValidationWarning};

/// Type aliases for clarity
pub type VariantKey = String;
pub type RuleId = String;
pub type FieldName = String;
