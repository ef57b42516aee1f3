//! Typed accessors over the weakly-typed compose tree.
//!
//! Documents stay `serde_yaml::Value` end to end so unknown keys survive untouched;
//! `Mapping` keeps insertion order, which keeps rewritten output diffable.

use crate::composer::errors::{ComposerError, ComposerResult};
use serde_yaml::{Mapping, Value};

/// Mutable handles to the top-level sections the rewriter touches.
#[derive(Default)]
pub struct SectionsMut<'a> {
    pub services: Option<&'a mut Value>,
    pub networks: Option<&'a mut Value>,
    pub volumes: Option<&'a mut Value>,
    pub secrets: Option<&'a mut Value>,
    pub configs: Option<&'a mut Value>,
}

pub fn root_mapping(doc: &Value) -> ComposerResult<&Mapping> {
    doc.as_mapping()
        .ok_or_else(|| ComposerError::invalid_document("compose document must be a YAML mapping"))
}

pub fn root_mapping_mut(doc: &mut Value) -> ComposerResult<&mut Mapping> {
    doc.as_mapping_mut()
        .ok_or_else(|| ComposerError::invalid_document("compose document must be a YAML mapping"))
}

/// Splits the root mapping into disjoint mutable section handles in a single pass.
pub fn sections_mut(root: &mut Mapping) -> SectionsMut<'_> {
    let mut sections = SectionsMut::default();
    for (key, value) in root.iter_mut() {
        match key.as_str() {
            Some("services") => sections.services = Some(value),
            Some("networks") => sections.networks = Some(value),
            Some("volumes") => sections.volumes = Some(value),
            Some("secrets") => sections.secrets = Some(value),
            Some("configs") => sections.configs = Some(value),
            _ => {}
        }
    }
    sections
}

/// Interprets a section value: absent or `null` is `None`, a mapping is `Some`, anything
/// else is a malformed document.
pub fn as_section_mut<'a>(
    value: Option<&'a mut Value>,
    section: &str,
) -> ComposerResult<Option<&'a mut Mapping>> {
    match value {
        None => Ok(None),
        Some(Value::Null) => Ok(None),
        Some(Value::Mapping(mapping)) => Ok(Some(mapping)),
        Some(other) => Err(ComposerError::invalid_document(format!(
            "'{}' must be a mapping, found {}",
            section,
            kind(other)
        ))),
    }
}

pub fn as_section<'a>(value: Option<&'a Value>, section: &str) -> ComposerResult<Option<&'a Mapping>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Mapping(mapping)) => Ok(Some(mapping)),
        Some(other) => Err(ComposerError::invalid_document(format!(
            "'{}' must be a mapping, found {}",
            section,
            kind(other)
        ))),
    }
}

/// Keys of a name-keyed section, in document order. Keys must be strings.
pub fn section_names(section: &Mapping, what: &str) -> ComposerResult<Vec<String>> {
    section
        .keys()
        .map(|key| {
            key.as_str().map(str::to_string).ok_or_else(|| {
                ComposerError::invalid_document(format!("{} name must be a string", what))
            })
        })
        .collect()
}

/// Service names declared in the document, in document order.
pub fn service_names(doc: &Value) -> ComposerResult<Vec<String>> {
    let root = root_mapping(doc)?;
    match as_section(root.get("services"), "services")? {
        Some(services) => section_names(services, "Service"),
        None => Ok(Vec::new()),
    }
}

/// The body of one service. An empty (`null`) body yields `None` unless `materialize`
/// is set, in which case it is replaced by an empty mapping first.
pub fn service_body_mut<'a>(
    name: &Value,
    body: &'a mut Value,
    materialize: bool,
) -> ComposerResult<Option<&'a mut Mapping>> {
    if body.is_null() && materialize {
        *body = Value::Mapping(Mapping::new());
    }
    match body {
        Value::Null => Ok(None),
        Value::Mapping(mapping) => Ok(Some(mapping)),
        other => Err(ComposerError::invalid_document(format!(
            "service '{}' must be a mapping, found {}",
            name.as_str().unwrap_or("?"),
            kind(other)
        ))),
    }
}

pub fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
