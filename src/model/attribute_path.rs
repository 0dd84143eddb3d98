//! ScimAttributePath value object for mapping targets.
//!
//! A mapping target must name a SCIM attribute the provisioning service can
//! write to. Two forms are accepted:
//!
//! - dotted paths: `userName`, `name.familyName`
//! - value filters: `emails[type eq "work"].value`
//!
//! Either form may be prefixed with a schema URN such as
//! `urn:ietf:params:scim:schemas:extension:enterprise:2.0:User:`.

use crate::error::{ValidationError, ValidationResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

const SCHEMA_URN_PREFIX: &str = "urn:ietf:params:scim:schemas:";

/// A validated SCIM attribute path.
///
/// ## Examples
///
/// ```rust
/// use vault_sso_config::model::ScimAttributePath;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let path = ScimAttributePath::new(r#"emails[type eq "work"].value"#)?;
///     assert_eq!(path.root_attribute(), "emails");
///     assert!(path.is_filter());
///
///     assert!(ScimAttributePath::new("name..familyName").is_err());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScimAttributePath {
    raw: String,
    root_start: usize,
    filter: bool,
}

impl ScimAttributePath {
    /// Parse and validate an attribute path.
    pub fn new(value: impl Into<String>) -> ValidationResult<Self> {
        let raw = value.into();
        let root_start = schema_prefix_len(&raw)?;
        let filter = validate_attribute_expression(&raw, &raw[root_start..])?;
        Ok(Self {
            raw,
            root_start,
            filter,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The schema URN prefix, without the trailing colon, if present.
    pub fn schema_urn(&self) -> Option<&str> {
        if self.root_start == 0 {
            None
        } else {
            Some(&self.raw[..self.root_start - 1])
        }
    }

    /// The top-level attribute name (`emails` for `emails[type eq "work"].value`).
    pub fn root_attribute(&self) -> &str {
        let expression = &self.raw[self.root_start..];
        let end = expression
            .find(|c| c == '.' || c == '[')
            .unwrap_or(expression.len());
        &expression[..end]
    }

    /// Whether the path uses the value-filter form.
    pub fn is_filter(&self) -> bool {
        self.filter
    }
}

/// Length of the schema URN prefix including its trailing colon, or 0.
fn schema_prefix_len(raw: &str) -> ValidationResult<usize> {
    if !raw.starts_with(SCHEMA_URN_PREFIX) {
        return Ok(0);
    }

    // The attribute expression follows the last colon that precedes any filter.
    let search_end = raw.find('[').unwrap_or(raw.len());
    match raw[..search_end].rfind(':') {
        Some(idx) if idx + 1 < raw.len() && idx >= SCHEMA_URN_PREFIX.len() => Ok(idx + 1),
        _ => Err(ValidationError::invalid_path(
            raw,
            "schema URN is not followed by an attribute name",
        )),
    }
}

/// Validate the attribute part of a path. Returns whether it uses a filter.
fn validate_attribute_expression(raw: &str, expression: &str) -> ValidationResult<bool> {
    if expression.is_empty() {
        return Err(ValidationError::invalid_path(raw, "path is empty"));
    }

    match expression.find('[') {
        None => {
            for segment in expression.split('.') {
                validate_attribute_name(raw, segment)?;
            }
            Ok(false)
        }
        Some(open) => {
            validate_attribute_name(raw, &expression[..open])?;

            let rest = &expression[open + 1..];
            let close = filter_end(rest)
                .ok_or_else(|| ValidationError::invalid_path(raw, "unterminated filter"))?;
            validate_filter(raw, &rest[..close])?;

            let sub_attribute = rest[close + 1..].strip_prefix('.').ok_or_else(|| {
                ValidationError::invalid_path(raw, "filter must be followed by '.<subAttribute>'")
            })?;
            validate_attribute_name(raw, sub_attribute)?;
            Ok(true)
        }
    }
}

/// Index of the `]` closing a filter. A `]` inside the quoted value does not
/// end the filter.
fn filter_end(rest: &str) -> Option<usize> {
    match rest.find('"') {
        Some(open_quote) => {
            let close_quote = open_quote + 1 + rest[open_quote + 1..].find('"')?;
            rest[close_quote + 1..]
                .starts_with(']')
                .then_some(close_quote + 1)
        }
        None => rest.find(']'),
    }
}

/// Validate `<subAttr> eq "<value>"`.
fn validate_filter(raw: &str, filter: &str) -> ValidationResult<()> {
    let (attribute, value) = filter
        .split_once(" eq ")
        .ok_or_else(|| ValidationError::invalid_path(raw, "filter must use 'eq'"))?;
    validate_attribute_name(raw, attribute)?;

    let literal = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .ok_or_else(|| ValidationError::invalid_path(raw, "filter value must be quoted"))?;
    if literal.is_empty() || literal.contains('"') {
        return Err(ValidationError::invalid_path(
            raw,
            "filter value must be a non-empty quoted string",
        ));
    }
    Ok(())
}

/// SCIM ATTRNAME: ALPHA followed by ALPHA / DIGIT / "-" / "_".
fn validate_attribute_name(raw: &str, name: &str) -> ValidationResult<()> {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        Some(_) => {
            return Err(ValidationError::invalid_path(
                raw,
                format!("attribute name '{}' must start with a letter", name),
            ));
        }
        None => return Err(ValidationError::invalid_path(raw, "empty path segment")),
    }

    if chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        Ok(())
    } else {
        Err(ValidationError::invalid_path(
            raw,
            format!("attribute name '{}' contains invalid characters", name),
        ))
    }
}

impl fmt::Display for ScimAttributePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl Serialize for ScimAttributePath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.raw.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ScimAttributePath {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}

impl TryFrom<String> for ScimAttributePath {
    type Error = ValidationError;

    fn try_from(value: String) -> ValidationResult<Self> {
        Self::new(value)
    }
}

impl TryFrom<&str> for ScimAttributePath {
    type Error = ValidationError;

    fn try_from(value: &str) -> ValidationResult<Self> {
        Self::new(value)
    }
}
