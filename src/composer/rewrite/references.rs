//! Shared rules for rewriting a reference to a renamed object wherever it appears:
//! as a plain string, as `name:modifier`, inside a sequence, as a mapping key, or as
//! the `source` of a longhand entry.

use crate::composer::{
    errors::{ComposerError, ComposerResult},
    types::Renames,
};
use serde_yaml::{Mapping, Value};

/// How a referenced name is embedded in a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefShape {
    /// The whole string is the name (`depends_on`, network lists).
    Exact,
    /// `name[:modifier]`; only the part before the first colon is a name
    /// (`links`, `volumes_from`, shorthand secrets and configs).
    Colon,
}

/// Returns the rewritten string, or `None` when `s` does not reference a renamed object.
pub fn rewrite_str(s: &str, renames: &Renames, shape: RefShape) -> Option<String> {
    match shape {
        RefShape::Exact => renames.get(s).map(str::to_string),
        RefShape::Colon => {
            let (name, rest) = match s.split_once(':') {
                Some((name, rest)) => (name, Some(rest)),
                None => (s, None),
            };
            let new_name = renames.get(name)?;
            Some(match rest {
                Some(rest) => format!("{}:{}", new_name, rest),
                None => new_name.to_string(),
            })
        }
    }
}

pub fn rewrite_in_place(s: &mut String, renames: &Renames, shape: RefShape) -> bool {
    match rewrite_str(s, renames, shape) {
        Some(new) => {
            *s = new;
            true
        }
        None => false,
    }
}

/// Rewrites a string value in place. Non-strings are left alone.
pub fn rewrite_string_value(value: &mut Value, renames: &Renames, shape: RefShape) -> bool {
    match value {
        Value::String(s) => rewrite_in_place(s, renames, shape),
        _ => false,
    }
}

/// Renames mapping keys found in `renames`, keeping every entry in its original position
/// and its value untouched.
///
/// Fails without touching the mapping when a new name equals a key that keeps its name
/// (an exempt entry such as the managed network, or an undeclared one).
pub fn rename_keys(mapping: &mut Mapping, renames: &Renames) -> ComposerResult<usize> {
    let hits = mapping
        .keys()
        .filter(|k| k.as_str().is_some_and(|k| renames.contains(k)))
        .count();
    if hits == 0 {
        return Ok(0);
    }

    for (old, new) in renames.iter() {
        if mapping.contains_key(old) && mapping.contains_key(new) && !renames.contains(new) {
            return Err(ComposerError::name_collision(old, new));
        }
    }

    let entries = std::mem::take(mapping);
    for (key, value) in entries {
        let key = match key.as_str().and_then(|k| renames.get(k)) {
            Some(new) => Value::String(new.to_string()),
            None => key,
        };
        mapping.insert(key, value);
    }
    Ok(hits)
}

/// Rewrites a reference field that may be a single string, a sequence of strings, or a
/// mapping keyed by name. Returns how many references changed.
pub fn rewrite_reference_field(
    value: &mut Value,
    renames: &Renames,
    shape: RefShape,
) -> ComposerResult<usize> {
    let changed = match value {
        Value::String(s) => rewrite_in_place(s, renames, shape) as usize,
        Value::Sequence(items) => items
            .iter_mut()
            .map(|item| rewrite_string_value(item, renames, shape) as usize)
            .sum(),
        Value::Mapping(mapping) => rename_keys(mapping, renames)?,
        _ => 0,
    };
    Ok(changed)
}

/// Rewrites the `source` of a longhand entry; `target` and other keys are untouched.
pub fn rewrite_source(entry: &mut Mapping, renames: &Renames) -> bool {
    entry
        .get_mut("source")
        .is_some_and(|source| rewrite_string_value(source, renames, RefShape::Exact))
}

/// Rewrites a per-service list whose entries are shorthand strings or longhand
/// `{source, target, ...}` objects (`secrets`, `configs`).
pub fn rewrite_mount_list(value: &mut Value, renames: &Renames) -> usize {
    let Value::Sequence(entries) = value else {
        return 0;
    };

    let mut changed = 0;
    for entry in entries.iter_mut() {
        let hit = match entry.as_mapping_mut() {
            Some(longhand) => rewrite_source(longhand, renames),
            None => rewrite_string_value(entry, renames, RefShape::Colon),
        };
        changed += hit as usize;
    }
    changed
}
