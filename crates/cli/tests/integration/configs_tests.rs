//! Configs command integration tests.

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn configs_writes_component_configs_and_manifest() {
  let env = TestEnv::with_components(&["ui/button"]);

  env
    .cmd()
    .arg("configs")
    .assert()
    .success()
    .stdout(predicate::str::contains("ui/button"))
    .stdout(predicate::str::contains("Manifest written"));

  let config_path = env.cache_root().join("ui_button").join("dist.tsconfig.json");
  let config: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&config_path).unwrap()).unwrap();
  assert_eq!(config["compilerOptions"]["module"], "commonjs");

  let manifest: serde_json::Value =
    serde_json::from_str(&std::fs::read_to_string(env.cache_root().join("tsconfig.json")).unwrap()).unwrap();
  assert_eq!(
    manifest["references"][0]["path"],
    serde_json::json!(config_path.to_string_lossy())
  );
}

#[test]
fn cache_dir_env_overrides_settings() {
  let env = TestEnv::with_components(&["card"]);
  let cache = tempfile::TempDir::new().unwrap();

  env
    .cmd()
    .env("COMPBUILD_CACHE_DIR", cache.path())
    .arg("configs")
    .assert()
    .success();

  assert!(cache.path().join("typescript/card/dist.tsconfig.json").is_file());
  assert!(!env.cache_root().exists());
}
