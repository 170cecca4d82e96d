//! Tree flattening and identity indexing
//!
//! Comparison and export work on the flat token list, not the tree. The
//! flat order is depth-first pre-order over the whole forest; children are
//! always traversed, even under nodes marked as tokens.

use crate::model::{NodeKind, TokenNode, TokenSummary};
use std::collections::{HashMap, HashSet};

/// All token nodes of a forest in depth-first pre-order.
pub fn flatten(roots: &[TokenNode]) -> Vec<&TokenNode> {
    let mut tokens = Vec::new();
    collect_tokens(roots, &mut tokens);
    tokens
}

fn collect_tokens<'a>(nodes: &'a [TokenNode], out: &mut Vec<&'a TokenNode>) {
    for node in nodes {
        if node.kind == NodeKind::Token {
            out.push(node);
        }
        collect_tokens(&node.children, out);
    }
}

/// Index a flat token list by identity.
///
/// Duplicate identities are legal in malformed exports; the last
/// occurrence wins, matching plain map insertion order.
pub fn index<'a>(tokens: &[&'a TokenNode]) -> HashMap<&'a str, &'a TokenNode> {
    let mut map = HashMap::with_capacity(tokens.len());
    for token in tokens {
        map.insert(token.identity(), *token);
    }
    map
}

/// Number of leaf tokens in a forest.
pub fn token_count(roots: &[TokenNode]) -> usize {
    flatten(roots).len()
}

/// Number of group nodes in a forest.
pub fn group_count(roots: &[TokenNode]) -> usize {
    roots
        .iter()
        .map(|node| usize::from(node.kind == NodeKind::Group) + group_count(&node.children))
        .sum()
}

/// Detached summaries of every distinct token in a forest.
///
/// Ordered by first occurrence in traversal order; for duplicate
/// identities the summary carries the last occurrence's values.
pub fn token_summaries(roots: &[TokenNode]) -> Vec<TokenSummary> {
    let flat = flatten(roots);
    let by_identity = index(&flat);
    let mut seen = HashSet::new();
    let mut summaries = Vec::new();
    for token in &flat {
        let identity = token.identity();
        if seen.insert(identity) {
            if let Some(node) = by_identity.get(identity) {
                summaries.push(TokenSummary::from(*node));
            }
        }
    }
    summaries
}
