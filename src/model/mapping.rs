//! Ordered attribute mappings from identity-provider fields to SCIM paths.
//!
//! Mappings keep the order in which entries were added, both in memory and in
//! the serialized JSON object, so the persisted document reads the same way
//! the operator configured it.

use super::attribute_path::ScimAttributePath;
use crate::error::{ValidationError, ValidationResult};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Top-level attributes a group mapping may target.
pub const GROUP_LEVEL_ATTRIBUTES: &[&str] = &["displayName", "members", "externalId", "id"];

/// One source field → target path pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
    pub source_field: String,
    pub target: ScimAttributePath,
}

/// Ordered, duplicate-free mapping of user attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeMapping {
    entries: Vec<MappingEntry>,
}

impl AttributeMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mapping, validating both sides.
    ///
    /// Fails if the source field is malformed, the target is not a valid SCIM
    /// path, or the source field is already mapped.
    pub fn insert(
        &mut self,
        source_field: impl Into<String>,
        target: impl Into<String>,
    ) -> ValidationResult<()> {
        let source_field = source_field.into();
        validate_source_field(&source_field)?;
        if self.get(&source_field).is_some() {
            return Err(ValidationError::DuplicateMappingSource { source_field });
        }

        let target = ScimAttributePath::new(target)?;
        self.entries.push(MappingEntry {
            source_field,
            target,
        });
        Ok(())
    }

    /// Builder-style variant of [`insert`](Self::insert).
    pub fn with(
        mut self,
        source_field: impl Into<String>,
        target: impl Into<String>,
    ) -> ValidationResult<Self> {
        self.insert(source_field, target)?;
        Ok(self)
    }

    pub fn get(&self, source_field: &str) -> Option<&ScimAttributePath> {
        self.entries
            .iter()
            .find(|entry| entry.source_field == source_field)
            .map(|entry| &entry.target)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MappingEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Ordered mapping restricted to group-level attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupMapping {
    inner: AttributeMapping,
}

impl GroupMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mapping whose target root must be one of [`GROUP_LEVEL_ATTRIBUTES`].
    pub fn insert(
        &mut self,
        source_field: impl Into<String>,
        target: impl Into<String>,
    ) -> ValidationResult<()> {
        let target = target.into();
        let path = ScimAttributePath::new(target.as_str())?;
        if !GROUP_LEVEL_ATTRIBUTES.contains(&path.root_attribute()) {
            return Err(ValidationError::NotGroupAttribute { path: target });
        }
        self.inner.insert(source_field, target)
    }

    pub fn with(
        mut self,
        source_field: impl Into<String>,
        target: impl Into<String>,
    ) -> ValidationResult<Self> {
        self.insert(source_field, target)?;
        Ok(self)
    }

    pub fn get(&self, source_field: &str) -> Option<&ScimAttributePath> {
        self.inner.get(source_field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MappingEntry> {
        self.inner.iter()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

fn validate_source_field(source_field: &str) -> ValidationResult<()> {
    let valid = !source_field.is_empty()
        && source_field
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.');
    if valid {
        Ok(())
    } else {
        Err(ValidationError::InvalidSourceField {
            source_field: source_field.to_string(),
        })
    }
}

impl Serialize for AttributeMapping {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.source_field, &entry.target)?;
        }
        map.end()
    }
}

struct MappingVisitor;

impl<'de> Visitor<'de> for MappingVisitor {
    type Value = Vec<(String, String)>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of source field names to SCIM attribute paths")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut pairs = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((source, target)) = access.next_entry::<String, String>()? {
            pairs.push((source, target));
        }
        Ok(pairs)
    }
}

impl<'de> Deserialize<'de> for AttributeMapping {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let pairs = deserializer.deserialize_map(MappingVisitor)?;
        let mut mapping = AttributeMapping::new();
        for (source, target) in pairs {
            mapping
                .insert(source, target)
                .map_err(serde::de::Error::custom)?;
        }
        Ok(mapping)
    }
}

impl Serialize for GroupMapping {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.inner.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for GroupMapping {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let pairs = deserializer.deserialize_map(MappingVisitor)?;
        let mut mapping = GroupMapping::new();
        for (source, target) in pairs {
            mapping
                .insert(source, target)
                .map_err(serde::de::Error::custom)?;
        }
        Ok(mapping)
    }
}
