//! Merge rules for config documents.
//!
//! - Arrays concatenate: the target's entries come first.
//! - Objects merge recursively.
//! - Anything else in the source replaces the target value.

use serde_json::{Map, Value};

use super::types::{COMPILER_OPTIONS, MODULE_OPTION};

/// Merge `source` into `target` in place.
pub fn merge_into(target: &mut Map<String, Value>, source: Map<String, Value>) {
  for (key, value) in source {
    match target.get_mut(&key) {
      Some(existing) => merge_value(existing, value),
      None => {
        target.insert(key, value);
      }
    }
  }
}

fn merge_value(target: &mut Value, source: Value) {
  match (target, source) {
    (Value::Array(existing), Value::Array(incoming)) => existing.extend(incoming),
    (Value::Object(existing), Value::Object(incoming)) => merge_into(existing, incoming),
    (slot, incoming) => *slot = incoming,
  }
}

/// Whether the template fixes the output-module format.
pub fn fixes_module_format(template: &Map<String, Value>) -> bool {
  template
    .get(COMPILER_OPTIONS)
    .and_then(|options| options.get(MODULE_OPTION))
    .is_some_and(|module| !module.is_null())
}

/// Remove options from `overrides` that `template` does not allow to change.
///
/// Returns true when something was dropped.
pub fn drop_protected_options(template: &Map<String, Value>, overrides: &mut Map<String, Value>) -> bool {
  if !fixes_module_format(template) {
    return false;
  }

  overrides
    .get_mut(COMPILER_OPTIONS)
    .and_then(Value::as_object_mut)
    .and_then(|options| options.remove(MODULE_OPTION))
    .is_some()
}
