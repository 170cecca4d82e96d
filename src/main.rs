//! swatch CLI
//!
//! Subcommands wrap the library: compare and reconcile token files,
//! manage the imported baseline, generate assets, and scan for usage.

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use colored::Colorize;
use std::path::{Path, PathBuf};

use swatch::config::Config;
use swatch::history::{Baseline, ComparisonEntry, FileStamp, HistoryStore, ImportEntry};
use swatch::model::{set_enabled, TokenNode};
use swatch::parse::load_file;
use swatch::report;
use swatch::{
    analyze_usage, compare, flatten, group_count, suggest_replacements, token_count,
    token_summaries, ExportFormat,
};

#[derive(Parser)]
#[command(
    name = "swatch",
    version,
    about = "Design token tooling - import, diff, reconcile, export"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two token files, or the baseline against a new file
    Compare {
        /// Old-version token file (the new file when --base is set)
        first: PathBuf,
        /// New-version token file (omit when using --base)
        second: Option<PathBuf>,
        /// Compare the stored baseline against FIRST
        #[arg(long)]
        base: bool,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
        /// Do not record the comparison in history
        #[arg(long)]
        no_history: bool,
    },
    /// Import a token file as the new baseline
    Import {
        /// Token file to import
        file: PathBuf,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Summarize a token file without touching any state
    Show {
        /// Token file to inspect
        file: PathBuf,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show or clear the stored baseline
    Baseline {
        /// Remove the stored baseline
        #[arg(long)]
        clear: bool,
    },
    /// Enable a baseline token for asset generation
    Enable {
        /// Token identity (path, or name when it has no path)
        identity: String,
    },
    /// Disable a baseline token for asset generation
    Disable {
        /// Token identity (path, or name when it has no path)
        identity: String,
    },
    /// Edit replacement suggestions on a recorded comparison
    Reconcile {
        /// History entry id (defaults to the most recent comparison)
        #[arg(long, global = true)]
        entry: Option<String>,
        #[command(subcommand)]
        action: ReconcileAction,
    },
    /// Generate platform assets from a token file or the baseline
    Export {
        /// Token file to export (defaults to the baseline)
        file: Option<PathBuf>,
        /// Output directory
        #[arg(long, default_value = "generated")]
        out: PathBuf,
        /// Artifacts to generate
        #[arg(long, value_enum, default_value_t = FormatArg::Both)]
        format: FormatArg,
    },
    /// Scan source directories for token constant usage
    Analyze {
        /// Token file to analyze (defaults to the baseline)
        file: Option<PathBuf>,
        /// Source directory to scan (repeatable)
        #[arg(long = "src", required = true)]
        src: Vec<PathBuf>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// List, prune, or clear recorded comparisons and imports
    History {
        /// Work on import history instead of comparisons
        #[arg(long)]
        imports: bool,
        /// Remove one entry by id
        #[arg(long)]
        remove: Option<String>,
        /// Remove all entries
        #[arg(long)]
        clear: bool,
        /// Print entries as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate shell completions
    Completion {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum ReconcileAction {
    /// Record a replacement suggestion for a removed token
    Suggest {
        /// Identity of the removed token
        removed: String,
        /// Identity of the replacement token
        replacement: String,
    },
    /// Drop the suggestion for a removed token
    Drop {
        /// Identity of the removed token
        removed: String,
    },
    /// Accept the recorded suggestion for a removed token
    Accept {
        /// Identity of the removed token
        removed: String,
    },
    /// Withdraw acceptance for a removed token
    Reject {
        /// Identity of the removed token
        removed: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    /// Asset catalog only
    Catalog,
    /// Swift constants only
    Swift,
    /// Asset catalog and Swift constants
    Both,
}

impl From<FormatArg> for ExportFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Catalog => ExportFormat::Catalog,
            FormatArg::Swift => ExportFormat::Swift,
            FormatArg::Both => ExportFormat::Both,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(message) = run(cli) {
        eprintln!("{} {}", "error:".red().bold(), message);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Commands::Compare {
            first,
            second,
            base,
            json,
            no_history,
        } => cmd_compare(&first, second.as_deref(), base, json, no_history),
        Commands::Import { file, json } => cmd_import(&file, json),
        Commands::Show { file, json } => cmd_show(&file, json),
        Commands::Baseline { clear } => cmd_baseline(clear),
        Commands::Enable { identity } => cmd_set_enabled(&identity, true),
        Commands::Disable { identity } => cmd_set_enabled(&identity, false),
        Commands::Reconcile { entry, action } => cmd_reconcile(entry.as_deref(), &action),
        Commands::Export { file, out, format } => cmd_export(file.as_deref(), &out, format.into()),
        Commands::Analyze { file, src, json } => cmd_analyze(file.as_deref(), &src, json),
        Commands::History {
            imports,
            remove,
            clear,
            json,
        } => cmd_history(imports, remove.as_deref(), clear, json),
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "swatch", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// One side of a comparison: where it came from plus its forest.
struct Side {
    stamp: FileStamp,
    tokens: Vec<TokenNode>,
}

fn load_side(path: &Path) -> Result<Side, String> {
    let file = load_file(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    Ok(Side {
        stamp: FileStamp {
            file_name: file_name_of(path),
            metadata: file.metadata,
        },
        tokens: file.tokens,
    })
}

fn baseline_side(store: &HistoryStore) -> Result<Side, String> {
    let baseline = store
        .baseline()
        .map_err(|e| e.to_string())?
        .ok_or_else(|| "no baseline imported yet; run `swatch import <file>` first".to_string())?;
    Ok(Side {
        stamp: FileStamp {
            file_name: baseline.file_name,
            metadata: baseline.metadata,
        },
        tokens: baseline.tokens,
    })
}

fn file_name_of(path: &Path) -> String {
    match path.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => path.display().to_string(),
    }
}

fn fmt_timestamp(raw: &str) -> String {
    match chrono::DateTime::parse_from_rfc3339(raw) {
        Ok(parsed) => parsed.format("%Y-%m-%d %H:%M").to_string(),
        Err(_) => raw.to_string(),
    }
}

fn cmd_compare(
    first: &Path,
    second: Option<&Path>,
    base: bool,
    json: bool,
    no_history: bool,
) -> Result<(), String> {
    let store = HistoryStore::open().map_err(|e| e.to_string())?;
    let (old_side, new_side) = if base {
        if second.is_some() {
            return Err(
                "--base compares the baseline against one file; drop the second argument"
                    .to_string(),
            );
        }
        (baseline_side(&store)?, load_side(first)?)
    } else {
        let second =
            second.ok_or_else(|| "expected two token files (or --base with one)".to_string())?;
        (load_side(first)?, load_side(second)?)
    };

    let mut changes = compare(&old_side.tokens, &new_side.tokens);
    changes.replacement_suggestions =
        suggest_replacements(&changes.removed, &token_summaries(&new_side.tokens));

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&changes).map_err(|e| e.to_string())?
        );
    } else {
        print!(
            "{}",
            report::comparison_report(&changes, &old_side.stamp, &new_side.stamp)
        );
    }

    if !no_history {
        let entry = ComparisonEntry::new(old_side.stamp, new_side.stamp, changes);
        store.add_comparison(entry).map_err(|e| e.to_string())?;
    }
    Ok(())
}

fn cmd_import(file: &Path, json: bool) -> Result<(), String> {
    let store = HistoryStore::open().map_err(|e| e.to_string())?;
    let side = load_side(file)?;
    let count = token_count(&side.tokens);

    let baseline = Baseline {
        file_name: side.stamp.file_name,
        imported_at: chrono::Local::now().to_rfc3339(),
        metadata: side.stamp.metadata,
        tokens: side.tokens,
    };
    store.set_baseline(&baseline).map_err(|e| e.to_string())?;
    store
        .add_import(ImportEntry::new(
            &baseline.file_name,
            count,
            baseline.metadata.clone(),
        ))
        .map_err(|e| e.to_string())?;

    if json {
        let summary = serde_json::json!({
            "fileName": baseline.file_name,
            "tokenCount": count,
            "metadata": baseline.metadata,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).map_err(|e| e.to_string())?
        );
        return Ok(());
    }

    println!(
        "{} {} ({} tokens)",
        "Imported".green().bold(),
        baseline.file_name,
        count
    );
    if let Some(metadata) = &baseline.metadata {
        if let Some(date) = metadata.display_date() {
            println!("   exported {}", date);
        }
        if let Some(version) = &metadata.version {
            println!("   version {}", version);
        }
    }
    println!("   baseline: {}", store.dir().join("baseline.json").display());
    Ok(())
}

fn cmd_show(file: &Path, json: bool) -> Result<(), String> {
    let parsed = load_file(file).map_err(|e| format!("{}: {}", file.display(), e))?;
    let tokens = token_count(&parsed.tokens);
    let groups = group_count(&parsed.tokens);
    let disabled = flatten(&parsed.tokens)
        .iter()
        .filter(|t| !t.is_enabled)
        .count();

    if json {
        let summary = serde_json::json!({
            "fileName": file_name_of(file),
            "tokenCount": tokens,
            "groupCount": groups,
            "disabledCount": disabled,
            "metadata": parsed.metadata,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).map_err(|e| e.to_string())?
        );
        return Ok(());
    }

    println!("{}", file_name_of(file).bold());
    println!("   {} tokens in {} groups", tokens, groups);
    if disabled > 0 {
        println!("   {} disabled", disabled.to_string().yellow());
    }
    if let Some(metadata) = &parsed.metadata {
        if let Some(date) = metadata.display_date() {
            println!("   exported {}", date);
        }
        if let Some(version) = &metadata.version {
            println!("   version {}", version);
        }
        if let Some(generator) = &metadata.generator {
            println!("   generator {}", generator);
        }
    }
    Ok(())
}

fn cmd_baseline(clear: bool) -> Result<(), String> {
    let store = HistoryStore::open().map_err(|e| e.to_string())?;
    if clear {
        if store.clear_baseline().map_err(|e| e.to_string())? {
            println!("{}", "Baseline cleared".green());
        } else {
            println!("No baseline stored");
        }
        return Ok(());
    }

    match store.baseline().map_err(|e| e.to_string())? {
        Some(baseline) => {
            let disabled = flatten(&baseline.tokens)
                .iter()
                .filter(|t| !t.is_enabled)
                .count();
            println!("{}", baseline.file_name.bold());
            println!("   imported {}", fmt_timestamp(&baseline.imported_at));
            println!("   {} tokens", token_count(&baseline.tokens));
            if disabled > 0 {
                println!("   {} disabled", disabled.to_string().yellow());
            }
            if let Some(metadata) = &baseline.metadata {
                if let Some(date) = metadata.display_date() {
                    println!("   exported {}", date);
                }
            }
        }
        None => println!("No baseline stored. Run `swatch import <file>` first."),
    }
    Ok(())
}

fn cmd_set_enabled(identity: &str, enabled: bool) -> Result<(), String> {
    let store = HistoryStore::open().map_err(|e| e.to_string())?;
    let mut baseline = store
        .baseline()
        .map_err(|e| e.to_string())?
        .ok_or_else(|| "no baseline imported yet; run `swatch import <file>` first".to_string())?;

    if !set_enabled(&mut baseline.tokens, identity, enabled) {
        return Err(format!(
            "no token with identity '{}' in the baseline",
            identity
        ));
    }
    store.set_baseline(&baseline).map_err(|e| e.to_string())?;

    if enabled {
        println!("{} {}", "Enabled".green(), identity);
    } else {
        println!("{} {}", "Disabled".yellow(), identity);
    }
    Ok(())
}

fn cmd_reconcile(entry: Option<&str>, action: &ReconcileAction) -> Result<(), String> {
    let store = HistoryStore::open().map_err(|e| e.to_string())?;
    let updated = store
        .update_comparison(entry, |changes| match action {
            ReconcileAction::Suggest {
                removed,
                replacement,
            } => changes.add_replacement_suggestion(removed, replacement),
            ReconcileAction::Drop { removed } => changes.remove_replacement_suggestion(removed),
            ReconcileAction::Accept { removed } => changes.accept_auto_suggestion(removed),
            ReconcileAction::Reject { removed } => changes.reject_auto_suggestion(removed),
        })
        .map_err(|e| e.to_string())?;

    let Some(updated) = updated else {
        return Err(match entry {
            Some(id) => format!("no comparison entry with id {}", id),
            None => "no comparisons recorded yet".to_string(),
        });
    };

    let removed = match action {
        ReconcileAction::Suggest { removed, .. }
        | ReconcileAction::Drop { removed }
        | ReconcileAction::Accept { removed }
        | ReconcileAction::Reject { removed } => removed,
    };
    match updated.changes.suggestion_for(removed) {
        Some(replacement) if updated.changes.is_accepted(removed) => {
            println!("{} {} -> {}", "accepted".green(), removed, replacement);
        }
        Some(replacement) => {
            println!("{} {} -> {}", "suggested".cyan(), removed, replacement);
        }
        None => println!("no suggestion recorded for {}", removed),
    }
    Ok(())
}

fn cmd_export(file: Option<&Path>, out: &Path, format: ExportFormat) -> Result<(), String> {
    let config = Config::load();
    let tokens = match file {
        Some(path) => load_side(path)?.tokens,
        None => {
            let store = HistoryStore::open().map_err(|e| e.to_string())?;
            baseline_side(&store)?.tokens
        }
    };

    let files = swatch::generate(&tokens, &config, format);
    let written = swatch::write_files(&files, out).map_err(|e| format!("writing assets: {}", e))?;

    for path in &written {
        println!("   {} {}", "Creating".green(), path.display());
    }
    println!(
        "\n{} {} files under {}",
        "Generated".green().bold(),
        written.len(),
        out.display()
    );
    Ok(())
}

fn cmd_analyze(file: Option<&Path>, src: &[PathBuf], json: bool) -> Result<(), String> {
    let config = Config::load();
    let tokens = match file {
        Some(path) => load_side(path)?.tokens,
        None => {
            let store = HistoryStore::open().map_err(|e| e.to_string())?;
            baseline_side(&store)?.tokens
        }
    };

    let usage = analyze_usage(&tokens, src, &config).map_err(|e| e.to_string())?;
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&usage).map_err(|e| e.to_string())?
        );
    } else {
        print!("{}", report::usage_report(&usage));
    }
    Ok(())
}

fn cmd_history(
    imports: bool,
    remove: Option<&str>,
    clear: bool,
    json: bool,
) -> Result<(), String> {
    let store = HistoryStore::open().map_err(|e| e.to_string())?;

    if let Some(id) = remove {
        let removed = if imports {
            store.remove_import(id).map_err(|e| e.to_string())?
        } else {
            store.remove_comparison(id).map_err(|e| e.to_string())?
        };
        if !removed {
            return Err(format!("no entry with id {}", id));
        }
        println!("{} {}", "Removed".green(), id);
        return Ok(());
    }

    if clear {
        if imports {
            store.clear_imports().map_err(|e| e.to_string())?;
        } else {
            store.clear_comparisons().map_err(|e| e.to_string())?;
        }
        println!("{}", "History cleared".green());
        return Ok(());
    }

    if imports {
        let entries = store.imports();
        if json {
            println!(
                "{}",
                serde_json::to_string_pretty(&entries).map_err(|e| e.to_string())?
            );
            return Ok(());
        }
        if entries.is_empty() {
            println!("No imports recorded");
            return Ok(());
        }
        for (i, entry) in entries.iter().enumerate() {
            println!(
                "{}. {} ({} tokens)  {}",
                i + 1,
                entry.file_name.bold(),
                entry.token_count,
                fmt_timestamp(&entry.imported_at).dimmed()
            );
            println!("   id: {}", entry.id.dimmed());
        }
        return Ok(());
    }

    let entries = store.comparisons();
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&entries).map_err(|e| e.to_string())?
        );
        return Ok(());
    }
    if entries.is_empty() {
        println!("No comparisons recorded");
        return Ok(());
    }
    for (i, entry) in entries.iter().enumerate() {
        println!(
            "{}. {} -> {}  {}",
            i + 1,
            entry.old_file.file_name.bold(),
            entry.new_file.file_name.bold(),
            fmt_timestamp(&entry.compared_at).dimmed()
        );
        println!(
            "   {} added, {} removed, {} modified  id: {}",
            entry.changes.added.len().to_string().green(),
            entry.changes.removed.len().to_string().red(),
            entry.changes.modified.len().to_string().yellow(),
            entry.id.dimmed()
        );
    }
    Ok(())
}
