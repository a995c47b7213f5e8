//! Tile path validation and key derivation.
//!
//! A tile is addressed by four raw path segments: a dataset version and the
//! zoom/x/y coordinates. Only once all four pass validation is a [`TileKey`]
//! built from them.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::TileError;

/// File extension of every stored tile.
pub const TILE_EXTENSION: &str = "jpg";

/// Dataset version: `v1` through `v99`, no leading zeros.
fn version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^v([1-9]|[1-9][0-9])$").unwrap())
}

/// Decimal literal: optional sign, digits with optional fraction, optional exponent.
fn decimal_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[+-]?([0-9]+\.?[0-9]*|\.[0-9]+)([eE][+-]?[0-9]+)?$").unwrap()
    })
}

/// Unsigned hexadecimal, octal or binary integer literal.
fn radix_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^0([xX][0-9a-fA-F]+|[oO][0-7]+|[bB][01]+)$").unwrap())
}

/// Check whether `version` is a valid dataset version (`v1`..`v99`).
pub fn is_valid_version(version: &str) -> bool {
    version_pattern().is_match(version)
}

/// Whitespace and line terminators that `Number()` strips before parsing.
///
/// Narrower than [`char::is_whitespace`]: U+0085 (NEL) is not in the set.
fn is_js_whitespace(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n'
            | '\u{b}'
            | '\u{c}'
            | '\r'
            | ' '
            | '\u{a0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200a}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202f}'
            | '\u{205f}'
            | '\u{3000}'
            | '\u{feff}'
    )
}

/// Check whether a coordinate segment converts to a number.
///
/// This is a loose check with the semantics of JavaScript's `Number()`:
/// surrounding whitespace is ignored, a blank string counts as zero, signed
/// decimals with fraction or exponent are accepted, as are `Infinity` and
/// unsigned `0x`/`0o`/`0b` literals. No range or integer check is done.
pub fn is_numeric(segment: &str) -> bool {
    let trimmed = segment.trim_matches(is_js_whitespace);

    if trimmed.is_empty() {
        return true;
    }

    let unsigned = trimmed
        .strip_prefix('+')
        .or_else(|| trimmed.strip_prefix('-'))
        .unwrap_or(trimmed);
    if unsigned == "Infinity" {
        return true;
    }

    decimal_pattern().is_match(trimmed) || radix_pattern().is_match(trimmed)
}

// =============================================================================
// Tile Request
// =============================================================================

/// Raw path segments of a tile request, unvalidated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileRequest {
    /// Dataset version (e.g. "v1")
    pub version: String,

    /// Zoom level segment
    pub z: String,

    /// Column segment
    pub x: String,

    /// Row segment
    pub y: String,
}

impl TileRequest {
    pub fn new(
        version: impl Into<String>,
        z: impl Into<String>,
        x: impl Into<String>,
        y: impl Into<String>,
    ) -> Self {
        Self {
            version: version.into(),
            z: z.into(),
            x: x.into(),
            y: y.into(),
        }
    }

    /// Validate the segments and derive the storage key.
    ///
    /// The version is checked first; coordinates are only looked at once the
    /// version is known to be valid.
    pub fn validate(&self) -> Result<TileKey, TileError> {
        if !is_valid_version(&self.version) {
            return Err(TileError::InvalidVersion {
                version: self.version.clone(),
            });
        }

        for segment in [&self.z, &self.x, &self.y] {
            if !is_numeric(segment) {
                return Err(TileError::InvalidCoordinates {
                    value: segment.clone(),
                });
            }
        }

        Ok(TileKey(format!(
            "{}/{}/{}/{}.{}",
            self.version, self.z, self.x, self.y, TILE_EXTENSION
        )))
    }
}

// =============================================================================
// Tile Key
// =============================================================================

/// Object-store key of a validated tile: `{version}/{z}/{x}/{y}.jpg`.
///
/// Segments are kept verbatim; `0x1` is not rewritten to `1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TileKey(String);

impl TileKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Full object key under an optional bucket prefix.
    pub fn with_prefix(&self, prefix: Option<&str>) -> String {
        match prefix {
            Some(prefix) => format!("{}/{}", prefix, self.0),
            None => self.0.clone(),
        }
    }
}

impl std::fmt::Display for TileKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalise a key prefix: strip surrounding slashes, drop it if nothing is left.
pub fn normalize_prefix(prefix: &str) -> Option<String> {
    let trimmed = prefix.trim_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
