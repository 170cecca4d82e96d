//! Swatch - design token tooling for two-brand design systems
//!
//! Import token exports, diff versions, reconcile removed tokens, generate
//! platform assets.
//!
//! # Overview
//!
//! A token file is a tree of groups and tokens; each token carries hex
//! color values per brand (legacy, new brand) and appearance (light,
//! dark). Swatch compares two versions of such a tree, records the result
//! in a local history, lets you attach replacement suggestions to removed
//! tokens, and generates Xcode asset catalogs plus Swift constants from
//! the current baseline.
//!
//! # Token identity
//!
//! Tokens are matched across files by their slash-separated `path`, or by
//! `name` for tokens without one. Node ids are local to a parse and never
//! compared.
//!
//! # Quick Start
//!
//! ```
//! use swatch::parse::parse_document;
//! use swatch::compare::compare;
//!
//! let old = parse_document(r##"[
//!     {"name": "Primary", "type": "token", "path": "color/primary",
//!      "modes": {"legacy": {"light": {"hex": "#112233"}}}}
//! ]"##).unwrap();
//! let new = parse_document(r##"[
//!     {"name": "Primary", "type": "token", "path": "color/primary",
//!      "modes": {"legacy": {"light": {"hex": "#996633"}}}},
//!     {"name": "Accent", "type": "token", "path": "color/accent"}
//! ]"##).unwrap();
//!
//! let changes = compare(&old.tokens, &new.tokens);
//! assert_eq!(changes.added.len(), 1);
//! assert_eq!(changes.modified.len(), 1);
//! assert_eq!(changes.modified[0].color_changes[0].new_color, "#996633");
//! ```

pub mod analyze;
pub mod color;
pub mod compare;
pub mod config;
pub mod export;
pub mod flatten;
pub mod history;
pub mod model;
pub mod parse;
pub mod report;
pub mod suggest;

pub use analyze::{analyze_usage, AnalyzeError, OrphanedToken, TokenUsage, UsageReport};
pub use color::{hex_eq, parse_hex, Rgba};
pub use compare::{compare, ColorChange, ComparisonChanges, TokenModification};
pub use config::Config;
pub use export::{
    asset_catalog, exportable_tokens, generate, swift_constants, write_files, ExportFormat,
    GeneratedFile,
};
pub use flatten::{flatten, group_count, index, token_count, token_summaries};
pub use history::{
    Baseline, ComparisonEntry, FileStamp, HistoryError, HistoryStore, ImportEntry, MAX_ENTRIES,
};
pub use model::{
    set_enabled, Appearance, Brand, NodeKind, Theme, TokenMetadata, TokenNode, TokenSummary,
    TokenThemes, TokenValue,
};
pub use parse::{load_file, parse_document, ParseError, TokenFile};
pub use suggest::suggest_replacements;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_exports() {
        // Verify core types are re-exported from crate root
        let _ = MAX_ENTRIES;
        let node = TokenNode::token("Primary");
        assert_eq!(node.identity(), "Primary");
    }
}
