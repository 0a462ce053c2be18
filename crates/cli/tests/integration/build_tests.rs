//! Build command integration tests.
#![cfg(unix)]

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn build_succeeds_for_clean_components() {
  let env = TestEnv::with_components(&["button", "card"]);

  env
    .cmd()
    .arg("build")
    .assert()
    .success()
    .stdout(predicate::str::contains("button"))
    .stdout(predicate::str::contains("card"))
    .stdout(predicate::str::contains("Build complete!"));
}

#[test]
fn rebuild_skips_unchanged_components() {
  let env = TestEnv::with_components(&["button"]);

  env.cmd().arg("build").assert().success();

  env
    .cmd()
    .arg("build")
    .assert()
    .success()
    .stdout(predicate::str::contains("All components are up to date"));
}

#[test]
fn compiler_errors_fail_the_build() {
  let env = TestEnv::with_components(&["ok", "broken"]);

  env
    .cmd()
    .arg("build")
    .assert()
    .failure()
    .stderr(predicate::str::contains("error TS2322"))
    .stderr(predicate::str::contains("1 error(s) found"));
}

#[test]
fn json_output_lists_component_results() {
  let env = TestEnv::with_components(&["ok", "broken"]);

  let output = env.cmd().args(["build", "--output", "json"]).output().unwrap();
  assert!(!output.status.success());

  let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  let results = result["componentsResults"].as_array().unwrap();
  assert_eq!(results.len(), 2);

  let broken = results.iter().find(|r| r["id"] == "broken").unwrap();
  assert_eq!(broken["errors"].as_array().unwrap().len(), 1);
  let ok = results.iter().find(|r| r["id"] == "ok").unwrap();
  assert!(ok["errors"].as_array().unwrap().is_empty());
}

#[test]
fn missing_compiler_is_fatal() {
  let env = TestEnv::with_components(&["button"]);
  env.write_file(
    "compbuild.json",
    r#"{
      "backend": { "command": "/no/such/tsc" },
      "components": [{ "id": "button", "rootDir": "packages/button/src", "packageDir": "packages/button" }]
    }"#,
  );

  env
    .cmd()
    .arg("build")
    .assert()
    .failure()
    .stderr(predicate::str::contains("Build failed"));
}
