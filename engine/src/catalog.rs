//! Catalog - the embedding surface tying the pieces together.
//!
//! A [`VariantCatalog`] owns one product's axes, rule sets, and materialized
//! children, and walks them through the whole pipeline: enumerate, reconcile
//! on type edits, validate, derive. It is an ordinary value - everything it
//! computes is a function of what it holds, and callers that want finer
//! control can use the free functions directly.

use crate::{
    apply_modifiers, available_options, check_variant_types, generate_children, reconcile,
    selection_for_key, validate_selection, ChildVariant, GenerateOptions, RuleId, Selection,
    SelectionItem, SignatureMode, ValidationWarning, VariantConstraint, VariantModifier,
    VariantOption, VariantType,
};
use serde::{Deserialize, Serialize};

/// One renderable row: the stored record plus everything computed for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterializedVariant {
    /// The stored record
    pub child: ChildVariant,
    /// Whether the combination passes the constraint set
    pub valid: bool,
    /// Ids of the constraints that blocked it
    pub blocked_by: Vec<RuleId>,
    /// The modifier-derived record; only computed for valid combinations
    pub derived: Option<ChildVariant>,
}

/// A product's variant state: axes, rules, and children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantCatalog {
    types: Vec<VariantType>,
    constraints: Vec<VariantConstraint>,
    modifiers: Vec<VariantModifier>,
    children: Vec<ChildVariant>,
    options: GenerateOptions,
    signature_mode: SignatureMode,
}

impl VariantCatalog {
    /// Create a catalog and materialize its children.
    pub fn new(types: Vec<VariantType>) -> Self {
        Self::with_config(types, GenerateOptions::default(), SignatureMode::default())
    }

    /// Create a catalog with explicit generation and matching settings.
    pub fn with_config(
        types: Vec<VariantType>,
        options: GenerateOptions,
        signature_mode: SignatureMode,
    ) -> Self {
        let children = generate_children(&types, &[], &options);
        Self {
            types,
            constraints: Vec::new(),
            modifiers: Vec::new(),
            children,
            options,
            signature_mode,
        }
    }

    pub fn types(&self) -> &[VariantType] {
        &self.types
    }

    pub fn children(&self) -> &[ChildVariant] {
        &self.children
    }

    pub fn constraints(&self) -> &[VariantConstraint] {
        &self.constraints
    }

    pub fn modifiers(&self) -> &[VariantModifier] {
        &self.modifiers
    }

    /// Replace the constraint set.
    pub fn set_constraints(&mut self, constraints: Vec<VariantConstraint>) {
        self.constraints = constraints;
    }

    /// Replace the modifier set.
    pub fn set_modifiers(&mut self, modifiers: Vec<VariantModifier>) {
        self.modifiers = modifiers;
    }

    /// Look up a stored record by key.
    pub fn child(&self, key: &str) -> Option<&ChildVariant> {
        self.children.iter().find(|c| c.variant_key == key)
    }

    /// Store user-entered data for a known key. Returns false when the key is
    /// not part of the current combination set.
    pub fn upsert_child(&mut self, child: ChildVariant) -> bool {
        match self
            .children
            .iter_mut()
            .find(|c| c.variant_key == child.variant_key)
        {
            Some(slot) => {
                *slot = child;
                true
            }
            None => false,
        }
    }

    /// Replace the type list, reconciling existing children onto it.
    ///
    /// Returns the records whose data could not be carried over, for the
    /// caller to warn about before committing the edit.
    pub fn set_types(&mut self, new_types: Vec<VariantType>) -> Vec<ChildVariant> {
        let result = reconcile(
            &self.types,
            &new_types,
            &self.children,
            self.signature_mode,
            &self.options,
        );
        self.types = new_types;
        self.children = result.children;
        result.dropped
    }

    /// Resolve a key into a selection against this catalog's axes.
    pub fn selection_for(&self, key: &str) -> Selection {
        selection_for_key(key, &self.types, &self.options.key_separator)
    }

    /// Compute the full renderable table: validity, blocking rules, and
    /// derived fields per child.
    pub fn rows(&self) -> Vec<MaterializedVariant> {
        self.children
            .iter()
            .map(|child| {
                let selection = self.selection_for(&child.variant_key);
                let validity = validate_selection(&selection, &self.constraints);
                let derived = validity
                    .valid
                    .then(|| apply_modifiers(child, &selection, &self.modifiers));
                MaterializedVariant {
                    child: child.clone(),
                    valid: validity.valid,
                    blocked_by: validity.blocked_by,
                    derived,
                }
            })
            .collect()
    }

    /// Options of one axis still selectable next to `current`.
    pub fn available_options(
        &self,
        type_value: &str,
        current: &[SelectionItem],
    ) -> Vec<&VariantOption> {
        self.types
            .iter()
            .find(|ty| ty.value == type_value)
            .map(|ty| available_options(ty, current, &self.constraints))
            .unwrap_or_default()
    }

    /// Non-fatal findings about the current type list.
    pub fn audit(&self) -> Vec<ValidationWarning> {
        check_variant_types(&self.types)
    }
}
