//! Token file loading
//!
//! Token exports come in two shapes: a bare JSON array of root nodes, or
//! an envelope object with metadata fields next to a `tokens` array. Both
//! parse into the same [`TokenFile`].

use crate::model::{TokenMetadata, TokenNode};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

#[derive(Debug)]
pub enum ParseError {
    Io(std::io::Error),
    Json(serde_json::Error),
    UnsupportedRoot,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Io(e) => write!(f, "IO error: {}", e),
            ParseError::Json(e) => write!(f, "JSON error: {}", e),
            ParseError::UnsupportedRoot => {
                write!(f, "top-level JSON must be an array of nodes or an object with a tokens array")
            }
        }
    }
}

impl std::error::Error for ParseError {}

impl From<std::io::Error> for ParseError {
    fn from(e: std::io::Error) -> Self {
        ParseError::Io(e)
    }
}

impl From<serde_json::Error> for ParseError {
    fn from(e: serde_json::Error) -> Self {
        ParseError::Json(e)
    }
}

pub type Result<T> = std::result::Result<T, ParseError>;

/// A parsed token file: the forest plus whatever envelope metadata the
/// export carried.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenFile {
    pub tokens: Vec<TokenNode>,
    pub metadata: Option<TokenMetadata>,
}

/// Envelope object form of a token export.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope {
    #[serde(default)]
    exported_at: Option<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    generator: Option<String>,
    #[serde(default)]
    tokens: Vec<TokenNode>,
}

/// Parse a token document from a JSON string.
///
/// Sniffs the top-level shape: arrays are a bare forest, objects are an
/// envelope with optional metadata. Anything else is rejected.
pub fn parse_document(data: &str) -> Result<TokenFile> {
    let value: Value = serde_json::from_str(data)?;
    match value {
        Value::Array(_) => {
            let tokens: Vec<TokenNode> = serde_json::from_value(value)?;
            Ok(TokenFile {
                tokens,
                metadata: None,
            })
        }
        Value::Object(_) => {
            let envelope: Envelope = serde_json::from_value(value)?;
            let metadata = TokenMetadata {
                exported_at: envelope.exported_at,
                version: envelope.version,
                generator: envelope.generator,
            };
            Ok(TokenFile {
                tokens: envelope.tokens,
                metadata: if metadata.is_empty() { None } else { Some(metadata) },
            })
        }
        _ => Err(ParseError::UnsupportedRoot),
    }
}

/// Read and parse a token file from disk.
pub fn load_file(path: &Path) -> Result<TokenFile> {
    let content = fs::read_to_string(path)?;
    parse_document(&content)
}
