//! Parsing of path-style identifiers.

use crate::error::{ServiceError, ServiceResult};

fn invalid(value: &str) -> ServiceError {
    ServiceError::InvalidIdentifier(value.to_string())
}

/// ## Summary
/// Parses a non-negative 32-bit id.
///
/// ## Errors
/// Returns `InvalidIdentifier` for empty, non-numeric, negative or overflowing input.
pub fn parse_legacy_id(value: &str) -> ServiceResult<i32> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(value));
    }
    value.parse::<i32>().map_err(|_overflow| invalid(value))
}

/// ## Summary
/// Extracts the id from `{id}[/{filename...}]`.
///
/// ## Errors
/// Returns `InvalidIdentifier` if the leading segment is not a valid id.
pub fn parse_retrieve_path(rest: &str) -> ServiceResult<i32> {
    let rest = rest.trim_start_matches('/');
    let id = rest.split('/').next().unwrap_or_default();
    parse_legacy_id(id)
}

/// A handle with whatever path followed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlePath {
    pub handle: String,
    pub extra: Vec<String>,
}

impl HandlePath {
    /// ## Summary
    /// Splits `prefix/suffix[/extra...]`.
    ///
    /// ## Errors
    /// Returns `InvalidIdentifier` if either handle part is missing.
    pub fn parse(rest: &str) -> ServiceResult<Self> {
        let mut segments = rest
            .trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty());
        let (Some(prefix), Some(suffix)) = (segments.next(), segments.next()) else {
            return Err(invalid(rest));
        };

        Ok(Self {
            handle: format!("{prefix}/{suffix}"),
            extra: segments.map(ToString::to_string).collect(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BitstreamSelector {
    Sequence(i32),
    Name(String),
}

/// `{prefix}/{suffix}/{sequence}/{filename}` or `{prefix}/{suffix}/{filename}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitstreamPath {
    pub handle: String,
    pub selector: BitstreamSelector,
}

impl BitstreamPath {
    /// ## Summary
    /// Parses a bitstream path. A numeric first segment after the handle is the
    /// sequence id and anything after it is decorative; otherwise the remaining
    /// path is the bitstream name.
    ///
    /// ## Errors
    /// Returns `InvalidIdentifier` if the handle is incomplete or nothing follows it.
    pub fn parse(rest: &str) -> ServiceResult<Self> {
        let HandlePath { handle, extra } = HandlePath::parse(rest)?;
        let Some(first) = extra.first() else {
            return Err(invalid(rest));
        };

        let selector = match parse_legacy_id(first) {
            Ok(sequence_id) => BitstreamSelector::Sequence(sequence_id),
            Err(_) => BitstreamSelector::Name(extra.join("/")),
        };

        Ok(Self { handle, selector })
    }
}
