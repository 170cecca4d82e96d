//! Terminal report rendering
//!
//! Builds the human-readable output for comparisons and usage scans as
//! plain strings so the CLI just prints them. Color swatches use
//! truecolor background blocks; `colored` drops the escapes on its own
//! when stdout is not a terminal.

use crate::analyze::UsageReport;
use crate::color::parse_hex;
use crate::compare::ComparisonChanges;
use crate::history::FileStamp;
use crate::model::TokenSummary;
use colored::Colorize;
use std::fmt::Write as _;

/// How many used tokens the usage report lists before truncating.
const TOP_USED: usize = 10;

/// A two-character block colored with the given hex value, or an empty
/// string when the value does not parse.
pub fn swatch(hex: &str) -> String {
    match parse_hex(hex) {
        Some(rgba) => "  ".on_truecolor(rgba.r, rgba.g, rgba.b).to_string(),
        None => String::new(),
    }
}

/// Render a full comparison report.
pub fn comparison_report(changes: &ComparisonChanges, old: &FileStamp, new: &FileStamp) -> String {
    let mut out = String::new();

    writeln!(
        out,
        "{} {} -> {}",
        "Comparison:".bold(),
        old.file_name,
        new.file_name
    )
    .unwrap();
    if let Some(line) = stamp_line(old) {
        writeln!(out, "  old: {}", line.dimmed()).unwrap();
    }
    if let Some(line) = stamp_line(new) {
        writeln!(out, "  new: {}", line.dimmed()).unwrap();
    }
    writeln!(out).unwrap();

    if changes.is_empty() {
        writeln!(out, "{}", "No changes".green()).unwrap();
        return out;
    }

    writeln!(
        out,
        "{} added, {} removed, {} modified",
        changes.added.len().to_string().green(),
        changes.removed.len().to_string().red(),
        changes.modified.len().to_string().yellow()
    )
    .unwrap();

    if !changes.added.is_empty() {
        writeln!(out, "\n{}", "Added:".green().bold()).unwrap();
        for token in &changes.added {
            writeln!(out, "  {} {} {}", "+".green(), token.identity(), summary_swatches(token)).unwrap();
        }
    }

    if !changes.removed.is_empty() {
        writeln!(out, "\n{}", "Removed:".red().bold()).unwrap();
        for token in &changes.removed {
            writeln!(out, "  {} {} {}", "-".red(), token.identity(), summary_swatches(token)).unwrap();
            if let Some(replacement) = changes.suggestion_for(token.identity()) {
                let marker = if changes.is_accepted(token.identity()) {
                    " (accepted)".green().to_string()
                } else {
                    String::new()
                };
                writeln!(
                    out,
                    "      suggestion: {}{}",
                    replacement.cyan(),
                    marker
                )
                .unwrap();
            }
        }
    }

    if !changes.modified.is_empty() {
        writeln!(out, "\n{}", "Modified:".yellow().bold()).unwrap();
        for modification in &changes.modified {
            writeln!(
                out,
                "  {} {} ({})",
                "~".yellow(),
                modification.token_path,
                modification.token_name
            )
            .unwrap();
            for change in &modification.color_changes {
                writeln!(
                    out,
                    "      {}/{}: {} {} -> {} {}",
                    change.brand,
                    change.theme,
                    change.old_color,
                    swatch(&change.old_color),
                    change.new_color,
                    swatch(&change.new_color)
                )
                .unwrap();
            }
        }
    }

    out
}

/// One dimmed metadata line for a file stamp, if it carries any metadata.
fn stamp_line(stamp: &FileStamp) -> Option<String> {
    let metadata = stamp.metadata.as_ref()?;
    let mut parts = Vec::new();
    if let Some(date) = metadata.display_date() {
        parts.push(format!("exported {}", date));
    }
    if let Some(version) = &metadata.version {
        parts.push(format!("v{}", version));
    }
    if let Some(generator) = &metadata.generator {
        parts.push(generator.clone());
    }
    if parts.is_empty() {
        return None;
    }
    Some(parts.join(", "))
}

/// Swatches for a token's defined values, legacy before new brand.
fn summary_swatches(token: &TokenSummary) -> String {
    let Some(modes) = &token.modes else {
        return String::new();
    };
    let mut out = String::new();
    for brand in crate::model::Brand::ALL {
        for theme in crate::model::Theme::ALL {
            if let Some(value) = modes.value(brand, theme) {
                out.push_str(&swatch(&value.hex));
            }
        }
    }
    out
}

/// Render a usage scan report.
pub fn usage_report(report: &UsageReport) -> String {
    let mut out = String::new();

    writeln!(out, "{}", "Token usage".bold()).unwrap();
    writeln!(
        out,
        "  scanned {} directories, {} files",
        report.scanned_directories.len(),
        report.files_scanned
    )
    .unwrap();
    for dir in &report.scanned_directories {
        writeln!(out, "    {} ({} files)", dir.path.dimmed(), dir.files_scanned).unwrap();
    }
    writeln!(out).unwrap();
    writeln!(
        out,
        "  used: {} ({:.1}%)   orphaned: {}   total usages: {}",
        report.used_count().to_string().green(),
        report.usage_percentage(),
        report.orphaned_count().to_string().red(),
        report.total_usages
    )
    .unwrap();

    if !report.used.is_empty() {
        writeln!(out, "\n{}", "Most used:".green().bold()).unwrap();
        for usage in report.used.iter().take(TOP_USED) {
            writeln!(
                out,
                "  {:>4}x {} ({})",
                usage.usage_count,
                usage.enum_case,
                usage.identity.dimmed()
            )
            .unwrap();
        }
        if report.used.len() > TOP_USED {
            writeln!(out, "  ... and {} more", report.used.len() - TOP_USED).unwrap();
        }
    }

    if !report.orphaned.is_empty() {
        writeln!(out, "\n{}", "Orphaned:".red().bold()).unwrap();
        for orphan in &report.orphaned {
            writeln!(
                out,
                "  {} {} ({})",
                "-".red(),
                orphan.enum_case,
                orphan.identity.dimmed()
            )
            .unwrap();
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::{OrphanedToken, ScannedDirectory, TokenUsage};
    use crate::compare::{ColorChange, TokenModification};
    use crate::model::{Brand, Theme, TokenMetadata};

    fn stamp(name: &str) -> FileStamp {
        FileStamp {
            file_name: name.to_string(),
            metadata: None,
        }
    }

    fn summary(identity: &str) -> TokenSummary {
        TokenSummary {
            id: identity.to_string(),
            name: identity.to_string(),
            path: Some(identity.to_string()),
            modes: None,
        }
    }

    #[test]
    fn test_empty_comparison_says_no_changes() {
        let report = comparison_report(
            &ComparisonChanges::default(),
            &stamp("a.json"),
            &stamp("b.json"),
        );
        assert!(report.contains("a.json"));
        assert!(report.contains("b.json"));
        assert!(report.contains("No changes"));
    }

    #[test]
    fn test_comparison_sections() {
        let changes = ComparisonChanges {
            added: vec![summary("color/new")],
            removed: vec![summary("color/gone")],
            modified: vec![TokenModification {
                token_path: "color/primary".to_string(),
                token_name: "Primary".to_string(),
                color_changes: vec![ColorChange {
                    brand: Brand::Legacy,
                    theme: Theme::Dark,
                    old_color: "#111111".to_string(),
                    new_color: "#222222".to_string(),
                }],
            }],
            ..Default::default()
        };
        let report = comparison_report(&changes, &stamp("a.json"), &stamp("b.json"));
        assert!(report.contains("Added:"));
        assert!(report.contains("color/new"));
        assert!(report.contains("Removed:"));
        assert!(report.contains("color/gone"));
        assert!(report.contains("Modified:"));
        assert!(report.contains("color/primary"));
        assert!(report.contains("legacy/dark"));
        assert!(report.contains("#111111"));
        assert!(report.contains("-> #222222"));
    }

    #[test]
    fn test_suggestion_and_acceptance_shown() {
        let mut changes = ComparisonChanges {
            removed: vec![summary("color/gone")],
            ..Default::default()
        };
        changes.add_replacement_suggestion("color/gone", "color/replacement");
        let report = comparison_report(&changes, &stamp("a.json"), &stamp("b.json"));
        assert!(report.contains("suggestion: "));
        assert!(report.contains("color/replacement"));
        assert!(!report.contains("(accepted)"));

        changes.accept_auto_suggestion("color/gone");
        let report = comparison_report(&changes, &stamp("a.json"), &stamp("b.json"));
        assert!(report.contains("(accepted)"));
    }

    #[test]
    fn test_metadata_lines() {
        let old = FileStamp {
            file_name: "a.json".to_string(),
            metadata: Some(TokenMetadata {
                exported_at: Some("2024-03-01T12:00:00Z".to_string()),
                version: Some("1.4.0".to_string()),
                generator: Some("figma-export".to_string()),
            }),
        };
        let report = comparison_report(&ComparisonChanges::default(), &old, &stamp("b.json"));
        assert!(report.contains("exported 2024-03-01 12:00"));
        assert!(report.contains("v1.4.0"));
        assert!(report.contains("figma-export"));
    }

    #[test]
    fn test_usage_report_sections() {
        let report = UsageReport {
            used: vec![TokenUsage {
                enum_case: "colorBrandPrimary".to_string(),
                identity: "color/brand/primary".to_string(),
                usage_count: 42,
                files: vec!["View.swift".to_string()],
            }],
            orphaned: vec![OrphanedToken {
                enum_case: "colorOldAccent".to_string(),
                identity: "color/old/accent".to_string(),
            }],
            scanned_directories: vec![ScannedDirectory {
                path: "Sources".to_string(),
                files_scanned: 12,
            }],
            files_scanned: 12,
            total_usages: 42,
        };
        let rendered = usage_report(&report);
        assert!(rendered.contains("Token usage"));
        assert!(rendered.contains("scanned 1 directories, 12 files"));
        assert!(rendered.contains("42x colorBrandPrimary"));
        assert!(rendered.contains("Orphaned:"));
        assert!(rendered.contains("colorOldAccent"));
        assert!(rendered.contains("(50.0%)"));
    }

    #[test]
    fn test_swatch_handles_unparseable() {
        assert_eq!(swatch("not-a-color"), "");
    }
}
