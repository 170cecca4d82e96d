//! Token usage analysis
//!
//! Scans source trees for references to the generated token constants and
//! reports which tokens are actually used, which are orphaned, and where
//! the usages live. Only enabled tokens that would be exported take part.

use crate::config::Config;
use crate::export::{enum_case, exportable_tokens};
use crate::model::TokenNode;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug)]
pub enum AnalyzeError {
    Io(std::io::Error),
    Regex(regex::Error),
}

impl std::fmt::Display for AnalyzeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalyzeError::Io(e) => write!(f, "IO error: {}", e),
            AnalyzeError::Regex(e) => write!(f, "Regex error: {}", e),
        }
    }
}

impl std::error::Error for AnalyzeError {}

impl From<std::io::Error> for AnalyzeError {
    fn from(e: std::io::Error) -> Self {
        AnalyzeError::Io(e)
    }
}

impl From<regex::Error> for AnalyzeError {
    fn from(e: regex::Error) -> Self {
        AnalyzeError::Regex(e)
    }
}

pub type Result<T> = std::result::Result<T, AnalyzeError>;

/// Usage of one token constant across the scanned sources.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsage {
    pub enum_case: String,
    pub identity: String,
    pub usage_count: usize,
    pub files: Vec<String>,
}

/// A token whose constant never appears in the scanned sources.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrphanedToken {
    pub enum_case: String,
    pub identity: String,
}

/// One scanned source directory.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScannedDirectory {
    pub path: String,
    pub files_scanned: usize,
}

/// Full result of a usage scan.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageReport {
    /// Used tokens, most referenced first
    pub used: Vec<TokenUsage>,
    /// Orphaned tokens, alphabetical by constant name
    pub orphaned: Vec<OrphanedToken>,
    pub scanned_directories: Vec<ScannedDirectory>,
    pub files_scanned: usize,
    pub total_usages: usize,
}

impl UsageReport {
    pub fn used_count(&self) -> usize {
        self.used.len()
    }

    pub fn orphaned_count(&self) -> usize {
        self.orphaned.len()
    }

    /// Share of tokens with at least one usage, as a percentage.
    pub fn usage_percentage(&self) -> f64 {
        let total = self.used.len() + self.orphaned.len();
        if total == 0 {
            return 0.0;
        }
        self.used.len() as f64 * 100.0 / total as f64
    }
}

/// Scan `dirs` for usages of the forest's token constants.
///
/// A usage is a `.constantName` reference followed by a word boundary,
/// the way generated constants appear at call sites. Files that cannot
/// be read as text are skipped; missing directories are an error.
pub fn analyze_usage(roots: &[TokenNode], dirs: &[PathBuf], config: &Config) -> Result<UsageReport> {
    for dir in dirs {
        if !dir.is_dir() {
            return Err(AnalyzeError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("source directory not found: {}", dir.display()),
            )));
        }
    }

    // Mirror the constant dedup of generation so the scan looks for
    // exactly the constants that exist.
    let mut targets: Vec<(String, String)> = Vec::new();
    let mut seen = HashSet::new();
    for token in exportable_tokens(roots, config) {
        let case = enum_case(token.identity());
        if case.is_empty() || !seen.insert(case.clone()) {
            continue;
        }
        targets.push((case, token.identity().to_string()));
    }

    let patterns: Vec<Regex> = targets
        .iter()
        .map(|(case, _)| Regex::new(&format!(r"\.{}\b", regex::escape(case))))
        .collect::<std::result::Result<_, _>>()?;

    let extensions: HashSet<String> = config
        .analyze
        .extensions
        .iter()
        .map(|e| e.to_lowercase())
        .collect();

    let mut counts = vec![0usize; targets.len()];
    let mut files_hit: Vec<Vec<String>> = vec![Vec::new(); targets.len()];
    let mut scanned_directories = Vec::with_capacity(dirs.len());

    for dir in dirs {
        let mut files_scanned = 0usize;
        let source_files: Vec<PathBuf> = WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.path()
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| extensions.contains(&ext.to_ascii_lowercase()))
                    .unwrap_or(false)
            })
            .map(|e| e.path().to_path_buf())
            .collect();

        for path in source_files {
            let Ok(content) = fs::read_to_string(&path) else {
                continue; // binary or unreadable, not an error
            };
            files_scanned += 1;
            let display = display_path(&path, dir);
            for (i, pattern) in patterns.iter().enumerate() {
                let hits = pattern.find_iter(&content).count();
                if hits > 0 {
                    counts[i] += hits;
                    files_hit[i].push(display.clone());
                }
            }
        }

        scanned_directories.push(ScannedDirectory {
            path: dir.display().to_string(),
            files_scanned,
        });
    }

    let mut used = Vec::new();
    let mut orphaned = Vec::new();
    for (i, (case, identity)) in targets.into_iter().enumerate() {
        if counts[i] > 0 {
            used.push(TokenUsage {
                enum_case: case,
                identity,
                usage_count: counts[i],
                files: std::mem::take(&mut files_hit[i]),
            });
        } else {
            orphaned.push(OrphanedToken {
                enum_case: case,
                identity,
            });
        }
    }

    used.sort_by(|a, b| {
        b.usage_count
            .cmp(&a.usage_count)
            .then_with(|| a.enum_case.cmp(&b.enum_case))
    });
    orphaned.sort_by(|a, b| a.enum_case.cmp(&b.enum_case));

    let files_scanned = scanned_directories.iter().map(|d| d.files_scanned).sum();
    let total_usages = used.iter().map(|u| u.usage_count).sum();

    Ok(UsageReport {
        used,
        orphaned,
        scanned_directories,
        files_scanned,
        total_usages,
    })
}

fn display_path(path: &Path, dir: &Path) -> String {
    path.strip_prefix(dir).unwrap_or(path).display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::set_enabled;
    use std::fs;
    use tempfile::TempDir;

    fn forest() -> Vec<TokenNode> {
        vec![
            TokenNode::token("Primary").with_path("color/brand/primary"),
            TokenNode::token("Accent").with_path("color/accent"),
        ]
    }

    fn write_source(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_counts_usages_and_orphans() {
        let tmp = TempDir::new().unwrap();
        write_source(
            tmp.path(),
            "View.swift",
            "let c = DesignToken.colorBrandPrimary\nlet d = Theme.colorBrandPrimary\n",
        );
        write_source(tmp.path(), "Other.swift", "// no tokens here\n");

        let report =
            analyze_usage(&forest(), &[tmp.path().to_path_buf()], &Config::default()).unwrap();
        assert_eq!(report.used_count(), 1);
        assert_eq!(report.used[0].enum_case, "colorBrandPrimary");
        assert_eq!(report.used[0].usage_count, 2);
        assert_eq!(report.used[0].files, vec!["View.swift".to_string()]);
        assert_eq!(report.orphaned_count(), 1);
        assert_eq!(report.orphaned[0].enum_case, "colorAccent");
        assert_eq!(report.files_scanned, 2);
        assert_eq!(report.total_usages, 2);
        assert!((report.usage_percentage() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_word_boundary_prevents_prefix_matches() {
        let tmp = TempDir::new().unwrap();
        write_source(
            tmp.path(),
            "View.swift",
            "let c = DesignToken.colorAccentStrong\n",
        );
        let report =
            analyze_usage(&forest(), &[tmp.path().to_path_buf()], &Config::default()).unwrap();
        // "colorAccentStrong" must not count as a usage of "colorAccent".
        assert_eq!(report.used_count(), 0);
        assert_eq!(report.orphaned_count(), 2);
    }

    #[test]
    fn test_only_configured_extensions_are_scanned() {
        let tmp = TempDir::new().unwrap();
        write_source(tmp.path(), "View.swift", ".colorBrandPrimary");
        write_source(tmp.path(), "notes.md", ".colorAccent");

        let report =
            analyze_usage(&forest(), &[tmp.path().to_path_buf()], &Config::default()).unwrap();
        assert_eq!(report.files_scanned, 1);
        assert_eq!(report.used_count(), 1);
        assert_eq!(report.used[0].enum_case, "colorBrandPrimary");
    }

    #[test]
    fn test_disabled_tokens_are_not_analyzed() {
        let tmp = TempDir::new().unwrap();
        write_source(tmp.path(), "View.swift", ".colorBrandPrimary");
        let mut tokens = forest();
        set_enabled(&mut tokens, "color/brand/primary", false);

        let report =
            analyze_usage(&tokens, &[tmp.path().to_path_buf()], &Config::default()).unwrap();
        assert!(report.used.iter().all(|u| u.enum_case != "colorBrandPrimary"));
        assert!(report
            .orphaned
            .iter()
            .all(|o| o.enum_case != "colorBrandPrimary"));
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let err = analyze_usage(
            &forest(),
            &[PathBuf::from("/nonexistent/sources")],
            &Config::default(),
        )
        .unwrap_err();
        assert!(matches!(err, AnalyzeError::Io(_)));
    }

    #[test]
    fn test_used_sorted_by_count_descending() {
        let tmp = TempDir::new().unwrap();
        write_source(
            tmp.path(),
            "View.swift",
            ".colorAccent .colorBrandPrimary .colorAccent\n",
        );
        let report =
            analyze_usage(&forest(), &[tmp.path().to_path_buf()], &Config::default()).unwrap();
        assert_eq!(report.used[0].enum_case, "colorAccent");
        assert_eq!(report.used[1].enum_case, "colorBrandPrimary");
    }

    #[test]
    fn test_empty_forest_scans_cleanly() {
        let tmp = TempDir::new().unwrap();
        write_source(tmp.path(), "View.swift", "anything");
        let report =
            analyze_usage(&[], &[tmp.path().to_path_buf()], &Config::default()).unwrap();
        assert_eq!(report.used_count(), 0);
        assert_eq!(report.orphaned_count(), 0);
        assert!((report.usage_percentage() - 0.0).abs() < f64::EPSILON);
        assert_eq!(report.files_scanned, 1);
    }

    #[test]
    fn test_nested_directories_are_walked() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("Features/Home")).unwrap();
        write_source(
            &tmp.path().join("Features/Home"),
            "HomeView.swift",
            ".colorBrandPrimary",
        );
        let report =
            analyze_usage(&forest(), &[tmp.path().to_path_buf()], &Config::default()).unwrap();
        assert_eq!(report.used_count(), 1);
        assert_eq!(
            report.used[0].files,
            vec!["Features/Home/HomeView.swift".to_string()]
        );
    }
}
