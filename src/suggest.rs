//! Replacement suggestions for removed tokens
//!
//! When a comparison removes tokens, each one gets at most one suggested
//! replacement drawn from the new version's tokens. Name matches beat
//! path-overlap matches; ties go to the earliest candidate in traversal
//! order, so results are deterministic for a given pair of files.

use crate::model::TokenSummary;
use std::collections::{BTreeMap, HashSet};

/// Suggest a replacement for every removed token that has a plausible one.
///
/// `candidates` should be the full token list of the new version, in
/// traversal order. Removed tokens without any match are absent from the
/// returned map.
pub fn suggest_replacements(
    removed: &[TokenSummary],
    candidates: &[TokenSummary],
) -> BTreeMap<String, String> {
    let mut suggestions = BTreeMap::new();
    for gone in removed {
        if let Some(candidate) = best_candidate(gone, candidates) {
            suggestions.insert(
                gone.identity().to_string(),
                candidate.identity().to_string(),
            );
        }
    }
    suggestions
}

/// Pick the best replacement candidate for one removed token.
///
/// A case-insensitive exact name match wins outright. Failing that, the
/// candidate sharing the most path segments wins; zero shared segments
/// means no suggestion at all.
fn best_candidate<'a>(
    removed: &TokenSummary,
    candidates: &'a [TokenSummary],
) -> Option<&'a TokenSummary> {
    let removed_name = removed.name.to_lowercase();
    if let Some(hit) = candidates
        .iter()
        .find(|c| c.name.to_lowercase() == removed_name)
    {
        return Some(hit);
    }

    let removed_segments = segments(removed.identity());
    let mut best: Option<(&TokenSummary, usize)> = None;
    for candidate in candidates {
        let shared = segments(candidate.identity())
            .intersection(&removed_segments)
            .count();
        if shared == 0 {
            continue;
        }
        // Strictly-greater keeps the earliest candidate on ties.
        match best {
            Some((_, score)) if shared <= score => {}
            _ => best = Some((candidate, shared)),
        }
    }
    best.map(|(candidate, _)| candidate)
}

fn segments(identity: &str) -> HashSet<&str> {
    identity.split('/').filter(|s| !s.is_empty()).collect()
}
