//! The synthesis transform.

use std::path::Path;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::component::ComponentDescriptor;
use crate::util::path::{normalize, to_config_string};

use super::load::load_override;
use super::merge::{drop_protected_options, merge_into};
use super::paths::{absolutize, redirect_references};
use super::types::{BuildUnitConfig, COMPILER_OPTIONS, Synthesis, SynthesisOptions};

/// Produce the config document for one component.
///
/// Layers, lowest precedence first:
/// 1. a deep copy of `template`
/// 2. the package override file, if one is found and readable
/// 3. the forced values: `include`, `exclude`, `compilerOptions.outDir` and
///    `compilerOptions.rootDir`
///
/// Arrays concatenate across all layers. An override cannot change the
/// output-module format once the template sets it. Every path field is then
/// resolved against the package directory.
///
/// An unreadable override is reported on the returned [`Synthesis`] and
/// otherwise ignored.
pub fn synthesize(
  component: &ComponentDescriptor,
  template: &Map<String, Value>,
  options: &SynthesisOptions,
) -> Synthesis {
  let package_dir = component.package_dir_abs.as_path();
  let root_dir_abs = normalize(&component.root_dir_abs());
  let out_dir_abs = normalize(&component.out_dir_abs(&options.dist_dir));

  let mut document = template.clone();
  let mut override_path = None;
  let mut override_failure = None;

  match load_override(package_dir) {
    Ok(Some((path, mut overrides))) => {
      if drop_protected_options(template, &mut overrides) {
        debug!(
          component = %component.id,
          path = %path.display(),
          "ignoring module format from package override"
        );
      }
      merge_into(&mut document, overrides);
      override_path = Some(path);
    }
    Ok(None) => {}
    Err(e) => {
      warn!(component = %component.id, error = %e, "package override unusable, continuing without it");
      override_failure = Some(e);
    }
  }

  merge_into(&mut document, forced_overrides(&root_dir_abs, &out_dir_abs, options));
  absolutize(&mut document, package_dir);
  redirect_references(&mut document, &options.component_configs);

  Synthesis {
    config: BuildUnitConfig {
      document,
      out_dir_abs,
      root_dir_abs,
    },
    override_path,
    override_failure,
  }
}

fn forced_overrides(root_dir_abs: &Path, out_dir_abs: &Path, options: &SynthesisOptions) -> Map<String, Value> {
  let mut compiler_options = Map::new();
  compiler_options.insert("outDir".to_string(), Value::String(to_config_string(out_dir_abs)));
  compiler_options.insert("rootDir".to_string(), Value::String(to_config_string(root_dir_abs)));

  let mut forced = Map::new();
  forced.insert(
    "include".to_string(),
    Value::Array(vec![Value::String(to_config_string(root_dir_abs))]),
  );
  forced.insert(
    "exclude".to_string(),
    Value::Array(options.ignore_patterns.iter().cloned().map(Value::String).collect()),
  );
  forced.insert(COMPILER_OPTIONS.to_string(), Value::Object(compiler_options));
  forced
}
