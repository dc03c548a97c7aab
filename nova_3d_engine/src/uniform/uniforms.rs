/// Uniform registry - named, typed shader parameter store.
///
/// Construction merges one or more lists (later lists override earlier ones
/// by name). `set_value` is lenient: unknown names are ignored. Struct and
/// StructArray entries merge field by field so that independent producers
/// (e.g. several lights sharing one `lights` slot) never clobber each other.

use rustc_hash::FxHashMap;
use crate::engine_warn;
use super::uniform::{Uniform, UniformValue};

/// Named uniform store with lenient, partial-merge updates
#[derive(Debug, Clone, Default)]
pub struct Uniforms {
    /// Entries in first-registration order
    entries: Vec<Uniform>,
    /// name -> index into `entries`
    names: FxHashMap<String, usize>,
}

impl Uniforms {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry from a single list
    pub fn from_list(list: Vec<Uniform>) -> Self {
        Self::merged([list])
    }

    /// Create a registry from several lists
    ///
    /// Later lists override earlier ones by name (last write wins). An
    /// overridden entry keeps the position of its first registration.
    pub fn merged<I>(lists: I) -> Self
    where
        I: IntoIterator<Item = Vec<Uniform>>,
    {
        let mut uniforms = Self::new();
        for list in lists {
            for uniform in list {
                uniforms.insert(uniform);
            }
        }
        uniforms
    }

    /// Add an entry, replacing any entry with the same name
    pub fn insert(&mut self, uniform: Uniform) {
        match self.names.get(&uniform.name) {
            Some(&index) => self.entries[index] = uniform,
            None => {
                self.names.insert(uniform.name.clone(), self.entries.len());
                self.entries.push(uniform);
            }
        }
    }

    /// Find an entry by name
    pub fn find(&self, name: &str) -> Option<&Uniform> {
        let index = *self.names.get(name)?;
        self.entries.get(index)
    }

    /// Find an entry's value by name
    pub fn value(&self, name: &str) -> Option<&UniformValue> {
        self.find(name).map(|u| &u.value)
    }

    /// Whether an entry with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// Update an entry's value
    ///
    /// - unknown name: no-op
    /// - Struct entry: only sub-entries named in `value` change
    /// - StructArray entry: same rule per array index; extra elements are appended
    /// - anything else: full replacement
    pub fn set_value(&mut self, name: &str, value: UniformValue) {
        let Some(&index) = self.names.get(name) else {
            return;
        };
        merge_value(name, &mut self.entries[index].value, value);
    }

    /// Iterate entries in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Uniform> {
        self.entries.iter()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|u| u.name.as_str()).collect()
    }
}

/// Apply the partial-merge rule to one stored value
fn merge_value(name: &str, stored: &mut UniformValue, incoming: UniformValue) {
    match stored {
        UniformValue::Struct(fields) => match incoming {
            UniformValue::Struct(updates) => merge_fields(fields, updates),
            other => engine_warn!("nova3d::Uniforms",
                "Ignoring {:?} update of struct uniform '{}'", other.uniform_type(), name),
        },
        UniformValue::StructArray(items) => match incoming {
            UniformValue::StructArray(updates) => {
                for (i, update) in updates.into_iter().enumerate() {
                    match items.get_mut(i) {
                        // placeholder element left by an earlier append
                        Some(fields) if fields.is_empty() => *fields = update,
                        Some(fields) => merge_fields(fields, update),
                        None => items.push(update),
                    }
                }
            }
            other => engine_warn!("nova3d::Uniforms",
                "Ignoring {:?} update of struct array uniform '{}'", other.uniform_type(), name),
        },
        _ => {
            if stored.uniform_type() != incoming.uniform_type() {
                engine_warn!("nova3d::Uniforms", "Uniform '{}' changes type from {:?} to {:?}",
                    name, stored.uniform_type(), incoming.uniform_type());
            }
            *stored = incoming;
        }
    }
}

/// Overwrite the fields whose names match; unknown fields are ignored
fn merge_fields(fields: &mut [Uniform], updates: Vec<Uniform>) {
    for update in updates {
        if let Some(field) = fields.iter_mut().find(|f| f.name == update.name) {
            merge_value(&update.name, &mut field.value, update.value);
        }
    }
}

#[cfg(test)]
#[path = "uniforms_tests.rs"]
mod tests;
