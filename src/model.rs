//! Token tree data model
//!
//! A token export is a forest of nodes. Groups provide structure, tokens
//! carry color values per brand and appearance. Wire format is camelCase
//! JSON as produced by the design-tool export pipeline.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// What a tree node is: a structural group or a concrete token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Group,
    Token,
}

/// One node in a token tree.
///
/// The `id` is generated locally when the node is created or parsed; it is
/// never read from or written to token files. Stable identity across files
/// comes from [`TokenNode::identity`] instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenNode {
    /// Local instance id, fresh per parse
    #[serde(skip, default = "new_node_id")]
    pub id: String,
    /// Display name
    pub name: String,
    /// Node kind
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Slash-separated logical path (e.g. "color/brand/primary")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Whether the token takes part in asset generation
    #[serde(default = "default_enabled")]
    pub is_enabled: bool,
    /// Child nodes; empty for leaves
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TokenNode>,
    /// Color values, usually present on tokens only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modes: Option<TokenThemes>,
}

fn new_node_id() -> String {
    Uuid::new_v4().to_string()
}

fn default_enabled() -> bool {
    true
}

impl TokenNode {
    /// Create a leaf token node with a fresh id.
    pub fn token(name: &str) -> Self {
        TokenNode {
            id: new_node_id(),
            name: name.to_string(),
            kind: NodeKind::Token,
            path: None,
            is_enabled: true,
            children: Vec::new(),
            modes: None,
        }
    }

    /// Create a group node with a fresh id.
    pub fn group(name: &str, children: Vec<TokenNode>) -> Self {
        TokenNode {
            id: new_node_id(),
            name: name.to_string(),
            kind: NodeKind::Group,
            path: None,
            is_enabled: true,
            children,
            modes: None,
        }
    }

    /// Builder-style path assignment.
    pub fn with_path(mut self, path: &str) -> Self {
        self.path = Some(path.to_string());
        self
    }

    /// Builder-style modes assignment.
    pub fn with_modes(mut self, modes: TokenThemes) -> Self {
        self.modes = Some(modes);
        self
    }

    /// Stable identity: the path when present, the name otherwise.
    pub fn identity(&self) -> &str {
        self.path.as_deref().unwrap_or(&self.name)
    }
}

/// Flip the enabled flag on the node with the given identity, anywhere in
/// the forest. Returns whether a matching node was found.
pub fn set_enabled(nodes: &mut [TokenNode], identity: &str, enabled: bool) -> bool {
    for node in nodes {
        if node.identity() == identity {
            node.is_enabled = enabled;
            return true;
        }
        if set_enabled(&mut node.children, identity, enabled) {
            return true;
        }
    }
    false
}

/// Per-brand color values of a token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TokenThemes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legacy: Option<Appearance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_brand: Option<Appearance>,
}

impl TokenThemes {
    /// Values for one brand, if that brand is defined.
    pub fn appearance(&self, brand: Brand) -> Option<&Appearance> {
        match brand {
            Brand::Legacy => self.legacy.as_ref(),
            Brand::NewBrand => self.new_brand.as_ref(),
        }
    }

    /// The value in one brand/theme slot, if defined.
    pub fn value(&self, brand: Brand, theme: Theme) -> Option<&TokenValue> {
        self.appearance(brand).and_then(|a| a.value(theme))
    }
}

/// Light and dark values of a token within one brand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Appearance {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub light: Option<TokenValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dark: Option<TokenValue>,
}

impl Appearance {
    /// The value for one theme, if defined.
    pub fn value(&self, theme: Theme) -> Option<&TokenValue> {
        match theme {
            Theme::Light => self.light.as_ref(),
            Theme::Dark => self.dark.as_ref(),
        }
    }
}

/// A single color value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenValue {
    /// Hex color string as exported, e.g. "#1A2B3C" or "1a2b3cff"
    pub hex: String,
    /// Name of the primitive this value aliases, when the export knows it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primitive_name: Option<String>,
}

impl TokenValue {
    /// Plain hex value with no primitive reference.
    pub fn hex(hex: &str) -> Self {
        TokenValue {
            hex: hex.to_string(),
            primitive_name: None,
        }
    }
}

/// The two brands a token file can carry values for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Brand {
    Legacy,
    NewBrand,
}

impl Brand {
    /// Both brands, in reporting order.
    pub const ALL: [Brand; 2] = [Brand::Legacy, Brand::NewBrand];

    /// Directory name used in generated asset catalogs.
    pub fn dir_name(self) -> &'static str {
        match self {
            Brand::Legacy => "Legacy",
            Brand::NewBrand => "NewBrand",
        }
    }
}

impl fmt::Display for Brand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Brand::Legacy => write!(f, "legacy"),
            Brand::NewBrand => write!(f, "new brand"),
        }
    }
}

/// Light or dark appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    /// Both themes, in reporting order.
    pub const ALL: [Theme; 2] = [Theme::Light, Theme::Dark];
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

/// A detached snapshot of one token, used in comparison results and
/// history entries. Carries everything reporting needs without holding a
/// reference into the source tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenSummary {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modes: Option<TokenThemes>,
}

impl TokenSummary {
    /// Stable identity: the path when present, the name otherwise.
    pub fn identity(&self) -> &str {
        self.path.as_deref().unwrap_or(&self.name)
    }
}

impl From<&TokenNode> for TokenSummary {
    fn from(node: &TokenNode) -> Self {
        TokenSummary {
            id: node.id.clone(),
            name: node.name.clone(),
            path: node.path.clone(),
            modes: node.modes.clone(),
        }
    }
}

/// Descriptive metadata from a token file's envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TokenMetadata {
    /// Export timestamp as written by the export tool
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<String>,
    /// Version label of the export
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Tool that produced the file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator: Option<String>,
}

/// Accepted `exportedAt` layouts, tried in order after RFC 3339.
const EXPORT_DATE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%Y-%m-%d",
];

impl TokenMetadata {
    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.exported_at.is_none() && self.version.is_none() && self.generator.is_none()
    }

    /// Parse `exportedAt` into a UTC timestamp, accepting the handful of
    /// layouts seen from export tools in the wild. Unknown layouts yield
    /// `None`; the raw string is still available for display.
    pub fn parsed_exported_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.exported_at.as_deref()?.trim();
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Some(parsed.with_timezone(&Utc));
        }
        for format in EXPORT_DATE_FORMATS {
            if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
                return Some(parsed.and_utc());
            }
            if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
                if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
                    return Some(midnight.and_utc());
                }
            }
        }
        None
    }

    /// Export date formatted for display, falling back to the raw string.
    pub fn display_date(&self) -> Option<String> {
        match self.parsed_exported_at() {
            Some(parsed) => Some(parsed.format("%Y-%m-%d %H:%M").to_string()),
            None => self.exported_at.clone(),
        }
    }
}
