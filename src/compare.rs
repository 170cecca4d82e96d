//! Token tree comparison
//!
//! Compares two token forests structurally by identity, then inspects
//! color values of tokens present on both sides. Results are plain data,
//! stored verbatim in comparison history, and carry the reconciliation
//! state (replacement suggestions and acceptances) layered on top.

use crate::color::hex_eq;
use crate::flatten::{flatten, index};
use crate::model::{Brand, Theme, TokenNode, TokenSummary, TokenThemes};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// One color delta in a single brand/theme slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorChange {
    pub brand: Brand,
    pub theme: Theme,
    pub old_color: String,
    pub new_color: String,
}

/// A token present in both versions whose colors differ.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenModification {
    /// Identity of the token (path, or name when no path exists)
    pub token_path: String,
    /// Display name from the old version
    pub token_name: String,
    /// Per-slot deltas, legacy before new brand, light before dark
    pub color_changes: Vec<ColorChange>,
}

/// Full result of comparing an old and a new token forest.
///
/// The three change lists come out of [`compare`]; the suggestion fields
/// start empty and are edited afterwards through the methods below.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonChanges {
    /// Tokens only the new version has, in new-tree traversal order
    pub added: Vec<TokenSummary>,
    /// Tokens only the old version has, in old-tree traversal order
    pub removed: Vec<TokenSummary>,
    /// Tokens in both versions with differing colors, in old-tree order
    pub modified: Vec<TokenModification>,
    /// Removed-token identity to suggested replacement identity
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub replacement_suggestions: BTreeMap<String, String>,
    /// Removed-token identities whose suggestion was accepted
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub accepted_suggestions: BTreeSet<String>,
}

impl ComparisonChanges {
    /// True when the comparison found no structural or color changes.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }

    /// Total number of changed tokens across all three lists.
    pub fn total_changes(&self) -> usize {
        self.added.len() + self.removed.len() + self.modified.len()
    }

    /// The suggested replacement for a removed token, if any.
    pub fn suggestion_for(&self, removed_identity: &str) -> Option<&str> {
        self.replacement_suggestions
            .get(removed_identity)
            .map(String::as_str)
    }

    /// Whether the suggestion for a removed token has been accepted.
    pub fn is_accepted(&self, removed_identity: &str) -> bool {
        self.accepted_suggestions.contains(removed_identity)
    }

    /// Record or overwrite a replacement suggestion for a removed token.
    /// Acceptance state is untouched.
    pub fn add_replacement_suggestion(&mut self, removed_identity: &str, replacement: &str) {
        self.replacement_suggestions
            .insert(removed_identity.to_string(), replacement.to_string());
    }

    /// Drop the suggestion for a removed token, along with its acceptance.
    /// No-op when no suggestion exists.
    pub fn remove_replacement_suggestion(&mut self, removed_identity: &str) {
        self.replacement_suggestions.remove(removed_identity);
        self.accepted_suggestions.remove(removed_identity);
    }

    /// Mark the existing suggestion for a removed token as accepted.
    /// No-op when no suggestion exists; acceptance never outlives its
    /// suggestion.
    pub fn accept_auto_suggestion(&mut self, removed_identity: &str) {
        if self.replacement_suggestions.contains_key(removed_identity) {
            self.accepted_suggestions.insert(removed_identity.to_string());
        }
    }

    /// Withdraw acceptance for a removed token, keeping the suggestion.
    /// No-op when nothing was accepted.
    pub fn reject_auto_suggestion(&mut self, removed_identity: &str) {
        self.accepted_suggestions.remove(removed_identity);
    }
}

/// Compare two token forests.
///
/// Identity is path-or-name. A token counts as added or removed by
/// identity alone; tokens present on both sides are checked slot by slot
/// for color differences. Suggestion fields of the result start empty.
pub fn compare(old: &[TokenNode], new: &[TokenNode]) -> ComparisonChanges {
    let old_flat = flatten(old);
    let new_flat = flatten(new);
    let old_index = index(&old_flat);
    let new_index = index(&new_flat);

    ComparisonChanges {
        added: missing_from(&new_flat, &new_index, &old_index),
        removed: missing_from(&old_flat, &old_index, &new_index),
        modified: modifications(&old_flat, &old_index, &new_index),
        ..Default::default()
    }
}

/// Summaries of tokens in `own` whose identity does not appear in `other`,
/// in traversal order, deduped to the last occurrence's values.
fn missing_from(
    own_order: &[&TokenNode],
    own_index: &HashMap<&str, &TokenNode>,
    other_index: &HashMap<&str, &TokenNode>,
) -> Vec<TokenSummary> {
    let mut seen = HashSet::new();
    let mut missing = Vec::new();
    for token in own_order {
        let identity = token.identity();
        if !seen.insert(identity) || other_index.contains_key(identity) {
            continue;
        }
        if let Some(node) = own_index.get(identity) {
            missing.push(TokenSummary::from(*node));
        }
    }
    missing
}

/// Modifications for tokens present in both indexes, in old-tree order.
fn modifications(
    old_order: &[&TokenNode],
    old_index: &HashMap<&str, &TokenNode>,
    new_index: &HashMap<&str, &TokenNode>,
) -> Vec<TokenModification> {
    let mut seen = HashSet::new();
    let mut modified = Vec::new();
    for token in old_order {
        let identity = token.identity();
        if !seen.insert(identity) {
            continue;
        }
        let (Some(old_node), Some(new_node)) = (old_index.get(identity), new_index.get(identity))
        else {
            continue;
        };
        let (Some(old_modes), Some(new_modes)) = (&old_node.modes, &new_node.modes) else {
            continue;
        };
        let changes = color_changes(old_modes, new_modes);
        if !changes.is_empty() {
            modified.push(TokenModification {
                token_path: identity.to_string(),
                token_name: old_node.name.clone(),
                color_changes: changes,
            });
        }
    }
    modified
}

/// Color deltas between two mode sets.
///
/// A slot contributes a change only when both sides define a value there
/// and the hex values differ after normalization. One-sided slots are not
/// changes.
fn color_changes(old: &TokenThemes, new: &TokenThemes) -> Vec<ColorChange> {
    let mut changes = Vec::new();
    for brand in Brand::ALL {
        for theme in Theme::ALL {
            let (Some(old_value), Some(new_value)) =
                (old.value(brand, theme), new.value(brand, theme))
            else {
                continue;
            };
            if !hex_eq(&old_value.hex, &new_value.hex) {
                changes.push(ColorChange {
                    brand,
                    theme,
                    old_color: old_value.hex.clone(),
                    new_color: new_value.hex.clone(),
                });
            }
        }
    }
    changes
}
