//! Asset generation from a token tree
//!
//! Turns the enabled tokens of a forest into an Xcode asset catalog and a
//! generated Swift constants file. Generation is pure: it produces
//! path/contents pairs and leaves writing to the caller.

use crate::config::Config;
use crate::flatten::flatten;
use crate::model::{Appearance, Brand, TokenNode};
use serde_json::json;
use std::collections::{BTreeSet, HashSet};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

/// Root directory name of the generated asset catalog.
pub const CATALOG_DIR: &str = "Colors.xcassets";

/// Which artifacts to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Asset catalog only
    Catalog,
    /// Swift constants file only
    Swift,
    /// Both artifacts
    Both,
}

/// One generated file, relative to the chosen output directory.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedFile {
    pub relative_path: PathBuf,
    pub contents: String,
}

/// Generate the requested artifacts for a forest.
pub fn generate(roots: &[TokenNode], config: &Config, format: ExportFormat) -> Vec<GeneratedFile> {
    let mut files = Vec::new();
    if matches!(format, ExportFormat::Catalog | ExportFormat::Both) {
        files.extend(asset_catalog(roots, config));
    }
    if matches!(format, ExportFormat::Swift | ExportFormat::Both) {
        files.push(GeneratedFile {
            relative_path: PathBuf::from(format!("{}.swift", config.export.constant_namespace)),
            contents: swift_constants(roots, config),
        });
    }
    files
}

/// Write generated files under `out_dir`, creating directories as needed.
/// Returns the full paths written.
pub fn write_files(files: &[GeneratedFile], out_dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(files.len());
    for file in files {
        let path = out_dir.join(&file.relative_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, &file.contents)?;
        written.push(path);
    }
    Ok(written)
}

/// Enabled tokens that pass the export name filters, in traversal order.
pub fn exportable_tokens<'a>(roots: &'a [TokenNode], config: &Config) -> Vec<&'a TokenNode> {
    flatten(roots)
        .into_iter()
        .filter(|t| t.is_enabled && config.export_allows(&t.name))
        .collect()
}

/// Derive the camelCase constant name for a token identity.
///
/// Splits on path and word separators, strips anything that is not
/// alphanumeric, and guards against a leading digit. May come out empty
/// for degenerate names; callers skip those.
pub fn enum_case(identity: &str) -> String {
    let mut out = String::new();
    for word in identity.split(['/', '-', '_', ' ', '.']) {
        let word: String = word.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
        if word.is_empty() {
            continue;
        }
        if out.is_empty() {
            out.push_str(&word.to_lowercase());
        } else {
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                out.extend(first.to_uppercase());
                out.push_str(&chars.as_str().to_lowercase());
            }
        }
    }
    if out.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

/// Generate the asset catalog: one colorset per brand per token, plus the
/// folder marker files Xcode expects.
pub fn asset_catalog(roots: &[TokenNode], config: &Config) -> Vec<GeneratedFile> {
    let tokens = exportable_tokens(roots, config);
    let mut colorsets = Vec::new();
    let mut folders = BTreeSet::new();

    for brand in Brand::ALL {
        for token in &tokens {
            let Some(appearance) = token.modes.as_ref().and_then(|m| m.appearance(brand)) else {
                continue;
            };
            let Some(contents) = colorset_contents(appearance) else {
                continue;
            };
            let dir = colorset_dir(brand, token);
            for ancestor in dir.ancestors().skip(1) {
                if ancestor.as_os_str().is_empty() {
                    break;
                }
                folders.insert(ancestor.to_path_buf());
            }
            colorsets.push(GeneratedFile {
                relative_path: dir.join("Contents.json"),
                contents,
            });
        }
    }

    let mut files = Vec::with_capacity(folders.len() + colorsets.len() + 1);
    folders.insert(PathBuf::from(CATALOG_DIR));
    for folder in folders {
        files.push(GeneratedFile {
            relative_path: folder.join("Contents.json"),
            contents: pretty(&folder_info()),
        });
    }
    files.extend(colorsets);
    files
}

/// Directory of one colorset inside the catalog.
fn colorset_dir(brand: Brand, token: &TokenNode) -> PathBuf {
    let mut dir = PathBuf::from(CATALOG_DIR);
    dir.push(brand.dir_name());
    if let Some(path) = &token.path {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        for segment in segments.iter().take(segments.len().saturating_sub(1)) {
            dir.push(safe_component(segment));
        }
    }
    dir.push(format!("{}.colorset", safe_component(&token.name)));
    dir
}

/// Contents.json for one colorset, or `None` when the appearance defines
/// no value at all.
fn colorset_contents(appearance: &Appearance) -> Option<String> {
    let mut colors = Vec::new();
    if let Some(light) = &appearance.light {
        colors.push(json!({
            "idiom": "universal",
            "color": color_components(&light.hex),
        }));
    }
    if let Some(dark) = &appearance.dark {
        colors.push(json!({
            "appearances": [{"appearance": "luminosity", "value": "dark"}],
            "idiom": "universal",
            "color": color_components(&dark.hex),
        }));
    }
    if colors.is_empty() {
        return None;
    }
    Some(pretty(&json!({
        "colors": colors,
        "info": {"author": "swatch", "version": 1},
    })))
}

/// The srgb component object Xcode expects. Unparseable hex values fall
/// back to opaque black rather than aborting the whole export.
fn color_components(hex: &str) -> serde_json::Value {
    let rgba = crate::color::parse_hex(hex).unwrap_or(crate::color::Rgba {
        r: 0,
        g: 0,
        b: 0,
        a: 0xFF,
    });
    json!({
        "color-space": "srgb",
        "components": {
            "alpha": format!("{:.3}", f64::from(rgba.a) / 255.0),
            "blue": format!("0x{:02X}", rgba.b),
            "green": format!("0x{:02X}", rgba.g),
            "red": format!("0x{:02X}", rgba.r),
        },
    })
}

fn folder_info() -> serde_json::Value {
    json!({"info": {"author": "swatch", "version": 1}})
}

fn pretty(value: &serde_json::Value) -> String {
    // Valid JSON values always serialize
    serde_json::to_string_pretty(value).unwrap_or_default()
}

fn safe_component(name: &str) -> String {
    name.replace(['/', '\\'], "-")
}

/// Generate the Swift constants file for a forest.
///
/// Each token becomes one static constant holding its hex values per
/// brand and theme. Duplicate constant names keep the first token and
/// drop later ones with a marker comment.
pub fn swift_constants(roots: &[TokenNode], config: &Config) -> String {
    let tokens = exportable_tokens(roots, config);
    let namespace = &config.export.constant_namespace;
    let mut out = String::new();

    writeln!(out, "// Generated by swatch. Do not edit by hand.").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "import Foundation").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "/// Hex values of one design token per brand and appearance.").unwrap();
    writeln!(out, "public struct TokenColors {{").unwrap();
    writeln!(out, "    public let legacyLight: String?").unwrap();
    writeln!(out, "    public let legacyDark: String?").unwrap();
    writeln!(out, "    public let newBrandLight: String?").unwrap();
    writeln!(out, "    public let newBrandDark: String?").unwrap();
    writeln!(out, "}}").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "public enum {} {{", namespace).unwrap();

    let mut seen = HashSet::new();
    let mut first = true;
    for token in tokens {
        let case = enum_case(token.identity());
        if case.is_empty() {
            continue;
        }
        if !seen.insert(case.clone()) {
            writeln!(out, "    // duplicate constant skipped: {}", escape_swift(token.identity())).unwrap();
            continue;
        }
        if !first {
            writeln!(out).unwrap();
        }
        first = false;
        writeln!(out, "    /// {}", escape_swift(token.identity())).unwrap();
        writeln!(out, "    public static let {} = TokenColors(", case).unwrap();
        writeln!(out, "        legacyLight: {},", slot(token, Brand::Legacy, true)).unwrap();
        writeln!(out, "        legacyDark: {},", slot(token, Brand::Legacy, false)).unwrap();
        writeln!(out, "        newBrandLight: {},", slot(token, Brand::NewBrand, true)).unwrap();
        writeln!(out, "        newBrandDark: {}", slot(token, Brand::NewBrand, false)).unwrap();
        writeln!(out, "    )").unwrap();
    }

    writeln!(out, "}}").unwrap();
    out
}

/// Swift literal for one brand/theme slot: a quoted hex string or `nil`.
fn slot(token: &TokenNode, brand: Brand, light: bool) -> String {
    let theme = if light {
        crate::model::Theme::Light
    } else {
        crate::model::Theme::Dark
    };
    match token.modes.as_ref().and_then(|m| m.value(brand, theme)) {
        Some(value) => format!("\"{}\"", escape_swift(&value.hex)),
        None => "nil".to_string(),
    }
}

fn escape_swift(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
